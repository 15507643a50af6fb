pub mod dataset;
pub mod encoding;
pub mod extractor;
pub mod pipeline;
pub mod reader;
