use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sled engine error: {0}")]
    Engine(#[from] sled::Error),
    #[error("failed to (de)serialize a stored record: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("store has already been closed")]
    Closed
}
