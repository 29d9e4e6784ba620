use crate::error::{ClientError, ClientErrorExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SESSION_FILE_NAME: &str = ".caphub-session";

/// What survives between invocations: the token and the server it belongs to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    pub server: String,
    pub username: String,
    pub token: String,
}

impl std::fmt::Debug for SavedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedSession")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$HOME/.caphub-session`, or the working directory when `HOME` is unset.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map_or_else(PathBuf::new, PathBuf::from)
            .join(SESSION_FILE_NAME)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved session for `server`.
    ///
    /// A missing file, a session saved for another server, or an unreadable file all yield
    /// `None`; only the last is logged.
    #[must_use]
    pub fn load(&self, server: &str) -> Option<SavedSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), "Cannot read session file: {e}");
                return None;
            }
        };

        match serde_json::from_str::<SavedSession>(&raw) {
            Ok(session) if session.server == server => Some(session),
            Ok(session) => {
                debug!(saved = %session.server, server, "Ignoring session saved for another server");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Ignoring malformed session file: {e}");
                None
            }
        }
    }

    pub fn save(&self, session: &SavedSession) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Creating {}", parent.display()))?;
        }

        let json = serde_json::to_vec_pretty(session)?;
        let mut file = open_private(&self.path)
            .context(format!("Writing {}", self.path.display()))?;
        file.write_all(&json).context(format!("Writing {}", self.path.display()))?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Deletes the file; returns whether there was one.
    pub fn clear(&self) -> Result<bool, ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).context(format!("Removing {}", self.path.display())),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}
