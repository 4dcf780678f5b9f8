//! Persistence of the logged-in user between runs.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use super::{Session, SessionUser};
use crate::api::error::ReviewError;

const SESSION_FILE_NAME: &str = "session.json";

/// Storage for the logged-in user record.
pub trait SessionStore {
    /// Loads the persisted session; an empty store yields an anonymous one.
    ///
    /// # Errors
    ///
    /// Returns an error when stored data exists but cannot be read.
    fn load(&self) -> Result<Session, ReviewError>;

    /// Persists the user record after login.
    ///
    /// # Errors
    ///
    /// Returns an error when the record cannot be written.
    fn save(&self, user: &SessionUser) -> Result<(), ReviewError>;

    /// Forgets the persisted user record.
    ///
    /// # Errors
    ///
    /// Returns an error when the record exists but cannot be removed.
    fn clear(&self) -> Result<(), ReviewError>;
}

/// Stores the user record as JSON in a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSessionStore {
    path: Utf8PathBuf,
}

impl FileSessionStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }

    fn file_name(&self) -> Result<&str, ReviewError> {
        self.path.file_name().ok_or_else(|| ReviewError::Io {
            message: format!("invalid session path '{}': no file name", self.path),
        })
    }

    fn parent(&self) -> Utf8PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        }
    }

    /// Opens the parent directory, or `None` when it does not exist yet.
    fn open_parent(&self) -> Result<Option<Dir>, ReviewError> {
        let parent = self.parent();
        match Dir::open_ambient_dir(&parent, ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(ReviewError::Io {
                message: format!("failed to open session directory '{parent}': {error}"),
            }),
        }
    }

    fn create_parent(&self) -> Result<Dir, ReviewError> {
        let parent = self.parent();
        let (root, relative) = if parent.is_absolute() {
            let relative = parent.strip_prefix("/").map_err(|_| ReviewError::Io {
                message: format!("failed to normalise session directory '{parent}'"),
            })?;
            (Utf8PathBuf::from("/"), relative.to_path_buf())
        } else {
            (Utf8PathBuf::from("."), parent.clone())
        };

        let base = Dir::open_ambient_dir(&root, ambient_authority()).map_err(|error| {
            ReviewError::Io {
                message: format!("failed to open '{root}' for the session file: {error}"),
            }
        })?;
        if relative.as_str().is_empty() || relative == Utf8Path::new(".") {
            return Ok(base);
        }

        base.create_dir_all(&relative)
            .map_err(|error| ReviewError::Io {
                message: format!("failed to create session directory '{parent}': {error}"),
            })?;
        base.open_dir(&relative).map_err(|error| ReviewError::Io {
            message: format!("failed to open session directory '{parent}': {error}"),
        })
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Session, ReviewError> {
        let file_name = self.file_name()?;
        let Some(dir) = self.open_parent()? else {
            return Ok(Session::anonymous());
        };

        let content = match dir.read_to_string(file_name) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Session::anonymous());
            }
            Err(error) => {
                return Err(ReviewError::Io {
                    message: format!("failed to read session file '{}': {error}", self.path),
                });
            }
        };

        let user: Option<SessionUser> =
            serde_json::from_str(&content).map_err(|error| ReviewError::Io {
                message: format!("failed to parse session file '{}': {error}", self.path),
            })?;
        Ok(user.map_or_else(Session::anonymous, Session::authenticated))
    }

    fn save(&self, user: &SessionUser) -> Result<(), ReviewError> {
        let file_name = self.file_name()?;
        let dir = self.create_parent()?;
        let json = serde_json::to_string_pretty(user).map_err(|error| ReviewError::Io {
            message: format!("failed to serialise session for '{}': {error}", self.path),
        })?;

        dir.write(file_name, json).map_err(|error| ReviewError::Io {
            message: format!("failed to write session file '{}': {error}", self.path),
        })?;
        tracing::debug!("saved session for {} to {}", user.id, self.path);
        Ok(())
    }

    fn clear(&self) -> Result<(), ReviewError> {
        let file_name = self.file_name()?;
        let Some(dir) = self.open_parent()? else {
            return Ok(());
        };

        match dir.remove_file(file_name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ReviewError::Io {
                message: format!("failed to remove session file '{}': {error}", self.path),
            }),
        }
    }
}

/// Resolves the default session file location.
///
/// Defaults to `${XDG_STATE_HOME}/junket/session.json` when
/// `XDG_STATE_HOME` is set, else to
/// `${HOME}/.local/state/junket/session.json`.
///
/// # Errors
///
/// Returns [`ReviewError::Configuration`] when neither `XDG_STATE_HOME` nor
/// `HOME` is available.
pub fn default_session_path() -> Result<Utf8PathBuf, ReviewError> {
    let xdg = std::env::var("XDG_STATE_HOME")
        .ok()
        .filter(|value| !value.is_empty());
    let home = std::env::var("HOME").ok().filter(|value| !value.is_empty());

    resolve_session_path(xdg.as_deref(), home.as_deref())
}

pub(crate) fn resolve_session_path(
    xdg_state_home: Option<&str>,
    home: Option<&str>,
) -> Result<Utf8PathBuf, ReviewError> {
    if let Some(state_home) = xdg_state_home {
        return Ok(Utf8PathBuf::from(state_home)
            .join("junket")
            .join(SESSION_FILE_NAME));
    }

    if let Some(home_dir) = home {
        return Ok(Utf8PathBuf::from(home_dir)
            .join(".local")
            .join("state")
            .join("junket")
            .join(SESSION_FILE_NAME));
    }

    Err(ReviewError::Configuration {
        message: "unable to resolve session file: neither XDG_STATE_HOME nor HOME is set"
            .to_owned(),
    })
}
