use crate::{
    domain::{BoardConfig, BoardState},
    error::{BoardError, Result},
    storage::{SavedBoard, Storage},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File-based storage implementation
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const BOARD_DIR: &'static str = ".issueboard";
    const BOARD_FILE: &'static str = "board.json";
    const BOARD_TMP_FILE: &'static str = "board.json.tmp";
    const CONFIG_FILE: &'static str = "config.toml";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::BOARD_DIR),
        }
    }

    fn board_file(&self) -> PathBuf {
        self.root_path.join(Self::BOARD_FILE)
    }

    fn board_tmp_file(&self) -> PathBuf {
        self.root_path.join(Self::BOARD_TMP_FILE)
    }

    fn config_file(&self) -> PathBuf {
        self.root_path.join(Self::CONFIG_FILE)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        if !self.board_file().exists() {
            let config = self.load_config().await?;
            let state = BoardState::new(&config)?;
            self.save_board(&state).await?;
            info!(path = %self.board_file().display(), "Created board");
        }

        Ok(())
    }

    async fn save_board(&self, state: &BoardState) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(&SavedBoard::new(state.clone()))?;
        // board.json is only ever replaced by a complete file
        let tmp_file = self.board_tmp_file();
        fs::write(&tmp_file, json).await?;
        fs::rename(&tmp_file, self.board_file()).await?;
        debug!(lists = state.list_count(), issues = state.issue_count(), "Saved board");

        Ok(())
    }

    async fn load_board(&self) -> Result<SavedBoard> {
        let board_file = self.board_file();

        if !board_file.exists() {
            return Err(BoardError::BoardNotInitialized);
        }

        let contents = fs::read_to_string(&board_file).await?;
        let saved: SavedBoard = serde_json::from_str(&contents)?;

        Ok(saved)
    }

    async fn load_config(&self) -> Result<BoardConfig> {
        let config_file = self.config_file();

        if !config_file.exists() {
            return Ok(BoardConfig::default());
        }

        let contents = fs::read_to_string(&config_file).await?;
        BoardConfig::from_toml_str(&contents)
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.board_file().exists()
    }
}
