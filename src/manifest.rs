use serde_json::Value;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// File name of the project manifest, both in templates and in the
/// scaffolded projects.
pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Could not access the project manifest ('{}'): {}", .1.display(), .0)]
    Io(#[source] io::Error, PathBuf),
    #[error("Could not parse the project manifest ('{}'): {}", .1.display(), .0)]
    Parse(#[source] serde_json::Error, PathBuf),
    #[error("The project manifest ('{}') is not a JSON object.", .0.display())]
    NotAnObject(PathBuf),
}

/// Overwrites the `name` field of the manifest at `path`.
///
/// Keys keep their original order, and every other field is written back
/// untouched, numbers included (`1e3` stays `1e3`). If the manifest has no
/// `name`, one is appended.
pub fn set_name(path: &Path, name: &str) -> Result<(), ManifestError> {
    let contents = fs::read_to_string(path).map_err(|e| ManifestError::Io(e, path.to_path_buf()))?;
    let patched = with_name(&contents, name).map_err(|e| match e {
        PatchError::Parse(e) => ManifestError::Parse(e, path.to_path_buf()),
        PatchError::NotAnObject => ManifestError::NotAnObject(path.to_path_buf()),
    })?;
    fs::write(path, patched).map_err(|e| ManifestError::Io(e, path.to_path_buf()))
}

#[derive(Debug)]
enum PatchError {
    Parse(serde_json::Error),
    NotAnObject,
}

fn with_name(contents: &str, name: &str) -> Result<String, PatchError> {
    let mut manifest: Value = serde_json::from_str(contents).map_err(PatchError::Parse)?;
    let fields = manifest.as_object_mut().ok_or(PatchError::NotAnObject)?;
    fields.insert("name".to_string(), Value::String(name.to_string()));
    serde_json::to_string_pretty(&manifest).map_err(PatchError::Parse)
}
