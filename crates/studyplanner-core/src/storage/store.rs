//! Load/save of the state document.
//!
//! Stores are write-through: the planner calls [`StateStore::save`] after
//! every mutating command. Loading an absent or empty store yields the
//! default state; a document that cannot be parsed or fails its integrity
//! check is reported as [`CoreError::CorruptState`] and left on disk
//! untouched.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::state::PlannerState;
use crate::error::{CoreError, Result};

/// State document file name inside the data directory.
pub const STATE_FILE: &str = "study_plan.json";

/// Backing store for [`PlannerState`].
pub trait StateStore {
    /// Load the full state, or the default state if nothing was saved yet.
    fn load(&self) -> Result<PlannerState>;

    /// Replace the stored state with `state`.
    fn save(&mut self, state: &PlannerState) -> Result<()>;

    /// Where the state lives, for messages.
    fn location(&self) -> &Path;
}

fn parse_document(path: &Path, text: &str) -> Result<PlannerState> {
    if text.trim().is_empty() {
        return Ok(PlannerState::default());
    }
    let state: PlannerState =
        serde_json::from_str(text).map_err(|e| CoreError::CorruptState {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    state
        .check_integrity()
        .map_err(|reason| CoreError::CorruptState {
            path: path.to_path_buf(),
            reason,
        })?;
    Ok(state)
}

fn encode(path: &Path, state: &PlannerState) -> Result<String> {
    state.to_document().map_err(|e| CoreError::Persistence {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// JSON file on local disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/study_plan.json`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(super::data_dir()?.join(STATE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn persistence_error(&self, source: std::io::Error) -> CoreError {
        CoreError::Persistence {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<PlannerState> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file, starting fresh");
                return Ok(PlannerState::default());
            }
            Err(e) => return Err(self.persistence_error(e)),
        };

        String::from_utf8(bytes)
            .map_err(|e| CoreError::CorruptState {
                path: self.path.clone(),
                reason: e.to_string(),
            })
            .and_then(|text| parse_document(&self.path, &text))
            .map_err(|e| {
                warn!(error = %e, "refusing to load state file");
                e
            })
    }

    /// Write temp file → fsync → rename, so a crash mid-write never
    /// leaves a truncated document behind.
    fn save(&mut self, state: &PlannerState) -> Result<()> {
        let text = encode(&self.path, state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.persistence_error(e))?;
            }
        }

        let tmp_path = self.tmp_path();
        let write_tmp = || -> std::io::Result<()> {
            let mut file = std::fs::File::create(&tmp_path)?;
            file.write_all(text.as_bytes())?;
            file.sync_all()
        };
        if let Err(e) = write_tmp() {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(self.persistence_error(e));
        }

        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            self.persistence_error(e)
        })?;

        debug!(path = %self.path.display(), bytes = text.len(), "state saved");
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// In-memory document, for tests and embedding.
///
/// Keeps the serialized text rather than the struct so loads go through
/// the same parsing and integrity checks as the file store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    document: Option<String>,
    fail_saves: bool,
    saves: usize,
    location: PathBuf,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            document: None,
            fail_saves: false,
            saves: 0,
            location: PathBuf::from("<memory>"),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw document text.
    pub fn with_document(text: impl Into<String>) -> Self {
        Self {
            document: Some(text.into()),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail with a `Persistence` error.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<PlannerState> {
        match &self.document {
            Some(text) => parse_document(&self.location, text),
            None => Ok(PlannerState::default()),
        }
    }

    fn save(&mut self, state: &PlannerState) -> Result<()> {
        if self.fail_saves {
            return Err(CoreError::Persistence {
                path: self.location.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "simulated write failure"),
            });
        }
        self.document = Some(encode(&self.location, state)?);
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::{Priority, Subject};

    fn sample_state() -> PlannerState {
        let mut state = PlannerState::default();
        state.subjects.push(Subject::create("Math", 4.5, Priority::Coding, None, &[]).unwrap());
        state.user_stats.points = 42;
        state
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(STATE_FILE));
        assert_eq!(store.load().unwrap(), PlannerState::default());
    }

    #[test]
    fn empty_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), PlannerState::default());
    }

    #[test]
    fn truncated_file_is_corrupt_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        std::fs::write(&path, "{\"subjects\": [").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, CoreError::CorruptState { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"subjects\": [");
    }

    #[test]
    fn invalid_utf8_is_corrupt_not_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        std::fs::write(&path, b"{\"subjects\": [\xff\xfe]}").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, CoreError::CorruptState { .. }), "{err}");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join(STATE_FILE));
        let state = sample_state();
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn save_into_missing_parent_that_is_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut store = JsonFileStore::new(blocker.join(STATE_FILE));
        let err = store.save(&sample_state()).unwrap_err();
        assert!(matches!(err, CoreError::Persistence { .. }));
    }

    #[test]
    fn memory_store_can_fail_saves() {
        let mut store = MemoryStore::new();
        store.set_fail_saves(true);
        assert!(matches!(
            store.save(&sample_state()),
            Err(CoreError::Persistence { .. })
        ));
        assert_eq!(store.save_count(), 0);
        store.set_fail_saves(false);
        let state = sample_state();
        store.save(&state).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap(), state);
    }
}
