use crate::userpath::UserDir;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable that, if set, overrides the templates directory.
pub const TEMPLATES_ENV: &str = "KRIS_TEMPLATES";

/// Sort value for templates whose manifest does not specify one.
pub const DEFAULT_SORT: i64 = 9999;

/// Suggested project name when prompting.
pub const DEFAULT_PROJECT_NAME: &str = "project-template";

/// Template preselected in the template prompt, if it exists.
pub const DEFAULT_TEMPLATE: &str = "react-app";

/// What the user is told to run once the project has been created.
pub const INSTALL_COMMAND: &str = "npm install";

const TEMPLATES_DIR_NAME: &str = "templates";

/// Gets the templates directory shipped alongside the executable, namely
/// `(executable directory)/templates`.
fn install_templates_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    Some(exe.parent()?.join(TEMPLATES_DIR_NAME))
}

/// Gets the per-user templates directory, namely
/// `(default data directory)/kris/templates`, where the default data
/// directory is given by the `dirs` crate.
fn user_templates_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("kris").join(TEMPLATES_DIR_NAME))
}

/// Resolves the root directory of the template catalog.
///
/// A user-provided directory always wins. Otherwise the directory installed
/// next to the executable is used; if that one does not exist, the per-user
/// data directory is used instead. The returned path is not guaranteed to
/// exist.
pub fn templates_dir(user_override: Option<UserDir>) -> PathBuf {
    if let Some(dir) = user_override {
        debug!(path = %dir, "using user-provided templates directory");
        return dir.into_path();
    }

    let installed = install_templates_dir();
    if let Some(installed) = installed.as_ref().filter(|p| p.is_dir()) {
        debug!(path = %installed.display(), "using installed templates directory");
        return installed.clone();
    }

    match user_templates_dir() {
        Some(user_dir) if user_dir.is_dir() => {
            debug!(path = %user_dir.display(), "using per-user templates directory");
            user_dir
        }
        _ => installed
            .or_else(user_templates_dir)
            .unwrap_or_else(|| PathBuf::from(TEMPLATES_DIR_NAME)),
    }
}
