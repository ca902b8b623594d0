use crate::{config::DEFAULT_SORT, manifest::MANIFEST_FILE};
use serde::Deserialize;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// A scaffolding starting point: either a directory of files to copy,
/// or a pointer to a remote repository to clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub description: String,
    pub sort: i64,
    pub repository: Option<String>,
    pub path: PathBuf,
}

/// The subset of a template's `package.json` that we care about.
#[derive(Debug, Default, Deserialize)]
struct TemplateManifest {
    #[serde(default)]
    project: Option<Value>,
}

/// Catalog metadata, found under the `project` key of a template's manifest.
#[derive(Debug, Default)]
struct ProjectMeta {
    description: Option<String>,
    sort: Option<i64>,
    repository: Option<String>,
}

impl ProjectMeta {
    /// Picks each field out of the `project` block on its own, so that one
    /// unusable value only loses that value.
    fn from_value(project: &Value) -> Self {
        ProjectMeta {
            description: project.get("description").and_then(as_text),
            sort: project.get("sort").and_then(as_sort),
            repository: project
                .get("repository")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integers are taken as they are; fractional values (and numeric strings)
/// are truncated toward zero.
fn as_sort(value: &Value) -> Option<i64> {
    let sort = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    };
    if sort.is_none() {
        debug!(value = %value, "ignoring unusable sort value");
    }
    sort
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

impl Template {
    /// Builds a template out of a directory in the templates root.
    ///
    /// The directory name is the template name. Metadata is read from the
    /// directory's manifest, if there is one; a missing or unreadable
    /// manifest is not an error, and simply yields the default metadata.
    pub fn infer_from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let meta = read_project_meta(&path).unwrap_or_default();

        Template {
            name,
            description: meta.description.unwrap_or_default(),
            sort: meta.sort.unwrap_or(DEFAULT_SORT),
            repository: meta.repository.filter(|r| !r.is_empty()),
            path,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.repository.is_some()
    }
}

fn read_project_meta(template_dir: &Path) -> Option<ProjectMeta> {
    let manifest_path = template_dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return None;
    }
    let contents = match fs::read_to_string(&manifest_path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path = %manifest_path.display(), error = %err, "could not read template manifest");
            return None;
        }
    };
    match serde_json::from_str::<TemplateManifest>(&contents) {
        Ok(manifest) => manifest.project.as_ref().map(ProjectMeta::from_value),
        Err(err) => {
            warn!(path = %manifest_path.display(), error = %err, "ignoring malformed template manifest");
            None
        }
    }
}
