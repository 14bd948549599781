pub mod dataset;
pub mod timestamp;
pub mod types;

pub use dataset::{Dataset, Metadata, WordTable, DEFAULT_SOURCE};
pub use types::{ProcessingStatus, WordEntry};
