pub mod executor;
pub mod pipeline;
pub mod response;

pub use executor::ChatSession;
pub use pipeline::{Pipeline, PipelineError, PipelineOutput, PipelineRunner};
pub use response::extract_response_from_results;
