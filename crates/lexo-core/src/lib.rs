pub mod classify;
pub mod error;
pub mod observer;
pub mod parser;
pub mod pipeline;
pub mod stats;
pub mod store;
pub mod wordlist;

pub use classify::{Action, classify};
pub use error::PipelineError;
pub use observer::{PipelineEvent, PipelineObserver, TracingObserver};
pub use parser::{ParseError, parse};
pub use pipeline::{Pipeline, RunReport};
pub use stats::RunStats;
pub use store::{DatasetStore, StoreError};
pub use wordlist::{WordListError, read_word_list};

#[cfg(test)]
mod tests;
