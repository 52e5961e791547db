use contracts::domain::a003_tool_registry::aggregate::ToolRegistryEntry;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub ingest: IngestConfig,
    #[serde(default)]
    pub tools: Vec<ToolRegistryEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Каталог со сборкой фронтенда (trunk dist), раздаётся как fallback
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// OpenAI-совместимый endpoint
    pub api_base: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: i32,
    /// Имя переменной окружения с API ключом
    pub api_key_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VectorStoreConfig {
    pub collection: String,
    pub keyspace: String,
    pub endpoint_env: String,
    pub token_env: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    pub dir: String,
    pub source: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 8000

[cors]
allowed_origins = [
    "http://localhost:3000",
    "http://localhost:5173",
    "https://udyamitra-frontend.vercel.app",
    "https://udyamitra-mcps.onrender.com",
]

[llm]
api_base = "https://api.groq.com/openai/v1"
model = "meta-llama/llama-4-maverick-17b-128e-instruct"
temperature = 0.2
max_tokens = 1024
api_key_env = "GROQ_API_KEY"

[embedding]
url = "https://adityapeopleplus-embedding-generator.hf.space/embed"
timeout_secs = 30

[vector_store]
collection = "Mospi_data"
keyspace = "default_keyspace"
endpoint_env = "ASTRA_DB_ENDPOINT_2"
token_env = "ASTRA_DB_TOKEN_2"

[ingest]
dir = "data/raw/pdfs/new"
source = "DGFT"
chunk_size = 700
chunk_overlap = 100

[[tools]]
tool_name = "SchemeExplainer"
intents = ["explain", "scheme_info", "learn_about_scheme"]
endpoint = "https://udyamitra-mcps.onrender.com/scheme_explainer"
input_schema = "SchemeMetadata"
output_schema = "SchemeExplanationResponse"
description = "Explains a government scheme for the user's profile"

[[tools]]
tool_name = "EligibilityChecker"
intents = ["check_eligibility", "eligibility"]
endpoint = "https://udyamitra-mcps.onrender.com/eligibility_checker"
input_schema = "SchemeMetadata"
output_schema = "EligibilityCheckResponse"
description = "Checks whether the user qualifies for a scheme"

[[tools]]
tool_name = "DocumentationHelper"
intents = ["register", "documents_required", "apply"]
endpoint = "https://udyamitra-mcps.onrender.com/documentation_helper"
input_schema = "SchemeMetadata"
output_schema = "DocumentationResponse"
description = "Lists documents and steps needed to apply"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// `EMBEDDING_API_URL` overrides the embedding endpoint in both cases.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = match find_config_file() {
        Some(config_path) => {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Config>(&contents)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            default_config()?
        }
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

pub fn default_config() -> anyhow::Result<Config> {
    Ok(toml::from_str(DEFAULT_CONFIG)?)
}

fn find_config_file() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let exe_dir = exe_path.parent()?;
    let config_path = exe_dir.join("config.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        tracing::warn!("config.toml not found at: {}", config_path.display());
        None
    }
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = std::env::var("EMBEDDING_API_URL") {
        if !url.trim().is_empty() {
            config.embedding.url = url;
        }
    }
}

impl LlmConfig {
    /// API ключ из переменной окружения, указанной в конфиге
    pub fn api_key(&self) -> anyhow::Result<String> {
        std::env::var(&self.api_key_env)
            .map_err(|_| anyhow::anyhow!("environment variable {} is not set", self.api_key_env))
    }
}

impl VectorStoreConfig {
    pub fn endpoint(&self) -> anyhow::Result<String> {
        std::env::var(&self.endpoint_env)
            .map_err(|_| anyhow::anyhow!("environment variable {} is not set", self.endpoint_env))
    }

    pub fn token(&self) -> anyhow::Result<String> {
        std::env::var(&self.token_env)
            .map_err(|_| anyhow::anyhow!("environment variable {} is not set", self.token_env))
    }
}

impl ServerConfig {
    /// Resolves a relative static_dir against the current directory
    pub fn static_dir_path(&self) -> Option<PathBuf> {
        self.static_dir.as_deref().map(|dir| {
            let path = Path::new(dir);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }
}
