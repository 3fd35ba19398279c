use thiserror::Error;

/// Errors that can occur at the JSON ingestion/serialization boundary.
///
/// The transformation engines themselves have no fatal error conditions:
/// missing references and depth-guard trips degrade the output and log
/// instead of aborting (see the `extract` module docs).
#[derive(Error, Debug)]
pub enum WorkflowParseError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Failed to serialize workflow JSON: {0}")]
    JsonSerializeError(serde_json::Error),
}
