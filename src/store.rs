use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::state::{parse_stored_state, AppState};

pub const HOME_ENV: &str = "PAPASAPO_HOME";
const STATE_FILE: &str = "state.json";
const CELEBRATION_FILE: &str = "celebration-seen";

pub fn resolve_home(flag: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Ok(path) = std::env::var(HOME_ENV) {
        return Ok(PathBuf::from(path));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home).join(".papasapo"));
    }
    Err(AppError::InvalidInput(format!(
        "unable to resolve the papasapo home; set {HOME_ENV} or --home"
    )))
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    fn celebration_path(&self) -> PathBuf {
        self.root.join(CELEBRATION_FILE)
    }

    pub fn open_lock(&self) -> Result<fd_lock::RwLock<File>, AppError> {
        let lock_path = self.state_path().with_extension("lock");
        ensure_parent_dir(&lock_path)?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(lock_path)?;
        Ok(fd_lock::RwLock::new(file))
    }

    // A missing or unreadable record reads as "no saved state", which
    // routes the user back to setup.
    pub fn load_state(&self) -> Option<AppState> {
        let raw = fs::read_to_string(self.state_path()).ok()?;
        parse_stored_state(&raw)
    }

    // Whole-record overwrite, staged through a tmp file so an interrupted
    // write cannot leave a torn record behind.
    pub fn save_state(&self, state: &AppState) -> Result<(), AppError> {
        let path = self.state_path();
        ensure_parent_dir(&path)?;
        let tmp_path = path.with_extension("tmp");
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, state)?;
        writer.flush()?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    pub fn celebration_seen(&self) -> bool {
        self.celebration_path().exists()
    }

    // Best effort: losing the marker only means the banner shows again.
    pub fn mark_celebration_seen(&self) {
        let path = self.celebration_path();
        if ensure_parent_dir(&path).is_ok() {
            let _ = fs::write(path, "true\n");
        }
    }
}
