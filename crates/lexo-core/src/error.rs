use crate::store::StoreError;
use crate::wordlist::WordListError;

/// Run-level failures. Per-word failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    WordList(#[from] WordListError),
}

impl PipelineError {
    pub fn is_corrupt_state(&self) -> bool {
        matches!(self, PipelineError::Store(StoreError::CorruptState { .. }))
    }
}
