use thiserror::Error;

/// Unified error type for the host boundary: loading layers and documents
/// from JSON text or files.
///
/// Parsing, merging and compiling never fail, so nothing here comes from
/// them. Returned by loaders like [`RuleLayer::from_json()`](crate::RuleLayer::from_json)
/// and [`AgentLogicDocument::from_file()`](crate::AgentLogicDocument::from_file).
#[derive(Debug, Error)]
pub enum RadlogicError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
