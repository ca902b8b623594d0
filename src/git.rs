use std::{
    fs, io,
    path::{Path, PathBuf},
    process::Command,
};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the version-control metadata directory left behind by a clone.
pub const VCS_DIR: &str = ".git";

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("Git command not found. Please ensure git is installed and in PATH.")]
    GitNotFound,
    #[error("Could not run git: {0}")]
    Spawn(#[source] io::Error),
    #[error("Failed to clone '{url}':\n{stderr}")]
    Failed { url: String, stderr: String },
    #[error("Could not remove the version-control metadata ('{}'): {}", .1.display(), .0)]
    StripMetadata(#[source] io::Error, PathBuf),
}

/// Fetches a remote repository into a local directory.
pub trait Cloner {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<(), CloneError>;
}

/// Clones by shelling out to the `git` executable on the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct GitCloner;

impl Cloner for GitCloner {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<(), CloneError> {
        info!(url, destination = %destination.display(), "cloning repository");

        let mut cmd = Command::new("git");
        cmd.arg("clone").arg(url).arg(destination);
        debug!(?cmd, "running git");

        let output = cmd.output().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CloneError::GitNotFound,
            _ => CloneError::Spawn(e),
        })?;

        if !output.status.success() {
            return Err(CloneError::Failed {
                url: url.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Removes the `.git` directory of a freshly cloned project, so that it
/// starts without the template's history. A missing directory is fine.
pub fn strip_vcs_metadata(project: &Path) -> Result<(), CloneError> {
    let vcs_dir = project.join(VCS_DIR);
    match fs::remove_dir_all(&vcs_dir) {
        Ok(()) => {
            debug!(path = %vcs_dir.display(), "removed version-control metadata");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CloneError::StripMetadata(e, vcs_dir)),
    }
}
