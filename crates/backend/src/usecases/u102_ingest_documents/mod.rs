pub mod chunker;
pub mod executor;
pub mod loader;

pub use chunker::TextSplitter;
pub use executor::{IngestError, IngestExecutor};
