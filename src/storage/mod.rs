use crate::{
    domain::{BoardConfig, BoardState},
    error::Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod file_storage;

/// A board snapshot as written to storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedBoard {
    pub saved_at: DateTime<Utc>,
    pub state: BoardState,
}

impl SavedBoard {
    pub fn new(state: BoardState) -> Self {
        Self {
            saved_at: Utc::now(),
            state,
        }
    }
}

/// Storage trait for persisting board snapshots
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend, writing a default board if none exists
    async fn initialize(&self) -> Result<()>;

    /// Saves a board snapshot
    async fn save_board(&self, state: &BoardState) -> Result<()>;

    /// Loads the last saved board, re-checking its invariants
    async fn load_board(&self) -> Result<SavedBoard>;

    /// Loads the board configuration, falling back to defaults
    async fn load_config(&self) -> Result<BoardConfig>;

    /// Checks if a board has been saved
    async fn is_initialized(&self) -> bool;
}
