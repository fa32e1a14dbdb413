use crate::components::room_summary::RoomSummary;
use crate::config::AgentConfig;
use crate::error::AppResult;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Keeps the last rendered summary across deep sleeps
pub trait StateStore: Send {
    /// State at wake-up; `None` forces the next summary to be drawn
    fn load(&self) -> Option<RoomSummary>;

    fn save(&self, state: Option<&RoomSummary>) -> AppResult<()>;
}

/// Nothing survives a sleep, every wake is a cold boot
#[derive(Debug, Default)]
pub struct EphemeralState;

impl StateStore for EphemeralState {
    fn load(&self) -> Option<RoomSummary> {
        None
    }

    fn save(&self, _state: Option<&RoomSummary>) -> AppResult<()> {
        Ok(())
    }
}

/// Stores the last rendered summary as JSON on disk
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Option<RoomSummary> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read state {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Discarding unreadable state {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, state: Option<&RoomSummary>) -> AppResult<()> {
        match state {
            Some(summary) => {
                fs::write(&self.path, serde_json::to_string(summary)?)?;
            }
            None => match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }
}

/// Pick the state store the config asks for
pub fn store_for(config: &AgentConfig) -> Box<dyn StateStore> {
    match &config.state_path {
        Some(path) => Box::new(FileStateStore::new(path)),
        None => Box::new(EphemeralState),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RoomSummary {
        RoomSummary {
            room_name: "Oak".to_string(),
            todays_date: "12/25".to_string(),
            events: Vec::new(),
        }
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("roomsign-state-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_file_store_keeps_summary() {
        let path = temp_path();
        let store = FileStateStore::new(&path);

        assert_eq!(store.load(), None);

        store.save(Some(&sample())).unwrap();
        assert_eq!(store.load(), Some(sample()));

        store.save(None).unwrap();
        assert_eq!(store.load(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_ignores_corrupt_state() {
        let path = temp_path();
        fs::write(&path, "{not json").unwrap();

        let store = FileStateStore::new(&path);
        assert_eq!(store.load(), None);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_ephemeral_store_forgets() {
        let store = EphemeralState;
        store.save(Some(&sample())).unwrap();
        assert_eq!(store.load(), None);
    }
}
