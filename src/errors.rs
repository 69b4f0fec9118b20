use crate::approval::ApprovalError;

/// Failures of the zone creation and ownership paths.
///
/// All of these are recoverable: the caller reports them and may retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("No selection points set")]
    NoSelection,

    #[error("Zone name must be between 1 and {max} characters")]
    InvalidName { max: usize },

    #[error("Zone with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Zone intersects with existing zone '{zone}' owned by {owner}")]
    Overlap { zone: String, owner: String },

    #[error("External service rejected zone creation: {0}")]
    ApprovalRejected(String),

    #[error("External service unavailable: {0}")]
    ApprovalUnavailable(String),

    #[error("Zone not found")]
    NotFound,
}

impl From<ApprovalError> for RegistryError {
    fn from(e: ApprovalError) -> Self {
        match e {
            ApprovalError::Rejected(reason) => RegistryError::ApprovalRejected(reason),
            ApprovalError::Unavailable(reason) => RegistryError::ApprovalUnavailable(reason),
        }
    }
}
