pub mod extractor;
pub mod location_normalizer;
pub mod prompt;

pub use extractor::{MetadataError, MetadataExtractor};
pub use location_normalizer::LocationNormalizer;
