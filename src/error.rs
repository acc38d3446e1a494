use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Index {index} out of range for list '{list}' (length {len})")]
    IndexOutOfRange {
        list: String,
        index: usize,
        len: usize,
    },

    #[error("Duplicate list name: {0}")]
    DuplicateListName(String),

    #[error("Invalid list name: {0:?}")]
    InvalidListName(String),

    #[error("Duplicate issue ID: {0}")]
    DuplicateIssueId(String),

    #[error("Invalid issue ID: {0:?}")]
    InvalidIssueId(String),

    #[error("No unused issue IDs left")]
    IdSpaceExhausted,

    #[error("No unused generated list names left")]
    ListNamesExhausted,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Board not initialized")]
    BoardNotInitialized,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] anyhow::Error),
}

impl From<toml::de::Error> for BoardError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl BoardError {
    /// Returns true for errors caused by a malformed action rather than a
    /// failing collaborator
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::ListNotFound(_)
                | Self::IndexOutOfRange { .. }
                | Self::DuplicateListName(_)
                | Self::InvalidListName(_)
                | Self::DuplicateIssueId(_)
                | Self::InvalidIssueId(_)
                | Self::IdSpaceExhausted
                | Self::ListNamesExhausted
        )
    }
}
