use std::{fmt, io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserDirError {
    #[error("Could not expand '{0}': {1}")]
    Expand(String, String),
    #[error("The templates directory ('{0}') does not exist. It should contain one folder per template.")]
    NotFound(String),
    #[error("Permission denied for '{0}'.")]
    PermissionDenied(String),
    #[error("Could not resolve '{0}': {1}")]
    Io(String, #[source] io::Error),
    #[error("'{0}' is not a directory.")]
    NotADirectory(String),
}

/// An existing directory named on the command line (or in the
/// environment), with `~` and `$VARS` expanded.
#[derive(Clone, PartialEq, Eq)]
pub struct UserDir(PathBuf);

impl UserDir {
    pub fn into_path(self) -> PathBuf {
        self.0
    }
}

impl From<PathBuf> for UserDir {
    fn from(path: PathBuf) -> Self {
        UserDir(path)
    }
}

impl fmt::Debug for UserDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for UserDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Expands and canonicalizes `raw`, which must name an existing directory.
pub fn resolve(raw: &str) -> Result<UserDir, UserDirError> {
    let expanded =
        shellexpand::full(raw).map_err(|e| UserDirError::Expand(raw.to_string(), e.to_string()))?;
    let path = PathBuf::from(expanded.into_owned())
        .canonicalize()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => UserDirError::NotFound(raw.to_string()),
            io::ErrorKind::PermissionDenied => UserDirError::PermissionDenied(raw.to_string()),
            _ => UserDirError::Io(raw.to_string(), e),
        })?;
    if !path.is_dir() {
        return Err(UserDirError::NotADirectory(raw.to_string()));
    }
    Ok(UserDir(path))
}
