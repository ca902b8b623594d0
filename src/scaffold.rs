use crate::{
    copy::{self, CopyError},
    git::{self, CloneError, Cloner},
    manifest::{self, ManifestError, MANIFEST_FILE},
    template::Template,
    walkdir,
};
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::fs::DirEntry;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("{} already exists.", .0.display())]
    TargetExists(PathBuf),
    #[error("Could not create the project directory ('{}'): {}", .1.display(), .0)]
    CreateDir(#[source] io::Error, PathBuf),
    #[error("Could not start the copy: {0}")]
    Runtime(#[source] io::Error),
    #[error(transparent)]
    Clone(#[from] CloneError),
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// A project about to be scaffolded: where it goes, and from what.
#[derive(Debug)]
pub struct TargetProject<'t> {
    pub name: String,
    pub path: PathBuf,
    pub template: &'t Template,
}

impl<'t> TargetProject<'t> {
    /// The project `name`, created from `template`, inside `base_dir`.
    pub fn new(base_dir: &Path, name: &str, template: &'t Template) -> Self {
        TargetProject {
            name: name.to_string(),
            path: base_dir.join(name),
            template,
        }
    }

    /// Checks that nothing exists at the target path yet.
    pub fn ensure_free(&self) -> Result<(), ScaffoldError> {
        if self.path.exists() {
            return Err(ScaffoldError::TargetExists(self.path.clone()));
        }
        Ok(())
    }

    /// Writes the project to disk, returning the path of the new project.
    ///
    /// Fails with `TargetExists`, before touching the filesystem, if the
    /// target path is taken. Other failures may leave a partially written
    /// project behind.
    pub fn create(&self, cloner: &impl Cloner) -> Result<PathBuf, ScaffoldError> {
        self.ensure_free()?;

        match &self.template.repository {
            Some(url) => self.clone_remote(url, cloner)?,
            None => self.copy_local()?,
        }

        info!(project = %self.name, path = %self.path.display(), "project initialized");
        Ok(self.path.clone())
    }

    fn clone_remote(&self, url: &str, cloner: &impl Cloner) -> Result<(), ScaffoldError> {
        std::fs::create_dir_all(&self.path)
            .map_err(|e| ScaffoldError::CreateDir(e, self.path.clone()))?;
        cloner.clone_repo(url, &self.path)?;
        git::strip_vcs_metadata(&self.path)?;
        Ok(())
    }

    fn copy_local(&self) -> Result<(), ScaffoldError> {
        info!(template = %self.template.name, "copying template files");
        std::fs::create_dir_all(&self.path)
            .map_err(|e| ScaffoldError::CreateDir(e, self.path.clone()))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(ScaffoldError::Runtime)?;
        let copied = runtime.block_on(async {
            let entries = Box::pin(walkdir::visit(&self.template.path, is_copied));
            copy::recursive_copy(&self.template.path, &self.path, entries).await
        })?;
        info!(copied, "template files copied");

        // A linked manifest belongs to whatever it points at; leave it be.
        let manifest_path = self.path.join(MANIFEST_FILE);
        match std::fs::symlink_metadata(&manifest_path) {
            Ok(meta) if meta.is_file() => manifest::set_name(&manifest_path, &self.name)?,
            Ok(_) => debug!(
                path = %manifest_path.display(),
                "manifest is not a regular file, not renaming"
            ),
            Err(_) => {}
        }
        Ok(())
    }
}

/// Whether a top-level template entry makes it into the new project.
/// Dependency caches and build output are left behind.
fn is_copied(entry: &DirEntry) -> bool {
    let name = entry.file_name();
    let name = name.to_string_lossy();
    name != "node_modules" && !name.contains("dist")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DEFAULT_SORT, git::VCS_DIR};
    use std::{cell::RefCell, fs};
    use tempfile::TempDir;

    /// Stands in for `git clone`: writes a couple of files and a `.git`
    /// directory into the destination.
    #[derive(Default)]
    struct FakeCloner {
        calls: RefCell<Vec<(String, PathBuf)>>,
        fail: bool,
    }

    impl Cloner for FakeCloner {
        fn clone_repo(&self, url: &str, destination: &Path) -> Result<(), CloneError> {
            self.calls
                .borrow_mut()
                .push((url.to_string(), destination.to_path_buf()));
            if self.fail {
                return Err(CloneError::Failed {
                    url: url.to_string(),
                    stderr: "fatal: could not read from remote repository".to_string(),
                });
            }
            fs::create_dir_all(destination.join(VCS_DIR).join("refs")).unwrap();
            fs::write(destination.join(VCS_DIR).join("HEAD"), "ref: refs/heads/main").unwrap();
            fs::write(destination.join("README.md"), "# remote").unwrap();
            fs::write(destination.join(MANIFEST_FILE), r#"{ "name": "remote-app" }"#).unwrap();
            Ok(())
        }
    }

    fn remote_template(root: &Path) -> Template {
        Template {
            name: "remote-app".to_string(),
            description: "Cloned from git".to_string(),
            sort: DEFAULT_SORT,
            repository: Some("https://example.com/remote-app.git".to_string()),
            path: root.join("remote-app"),
        }
    }

    fn local_template(root: &Path) -> Template {
        let dir = root.join("react-app");
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::create_dir_all(dir.join("node_modules/react")).unwrap();
        fs::create_dir_all(dir.join("dist/assets")).unwrap();
        fs::write(dir.join("node_modules/react/index.js"), "").unwrap();
        fs::write(dir.join("dist/assets/app.js"), "").unwrap();
        fs::write(dir.join("dist.zip"), "").unwrap();
        fs::write(dir.join("src/main.jsx"), "console.log('hi');").unwrap();
        fs::write(
            dir.join(MANIFEST_FILE),
            "{\n  \"name\": \"react-app\",\n  \"version\": \"0.1.0\",\n  \"project\": {\n    \"sort\": 1\n  }\n}",
        )
        .unwrap();
        Template::infer_from_path(dir)
    }

    #[test]
    fn remote_template_is_cloned_without_history() {
        let templates = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let template = remote_template(templates.path());
        let cloner = FakeCloner::default();

        let project = TargetProject::new(cwd.path(), "foo", &template);
        let path = project.create(&cloner).unwrap();

        assert_eq!(path, cwd.path().join("foo"));
        assert!(path.join("README.md").is_file());
        assert!(!path.join(VCS_DIR).exists());
        assert_eq!(
            *cloner.calls.borrow(),
            vec![(
                "https://example.com/remote-app.git".to_string(),
                cwd.path().join("foo")
            )]
        );
        // The manifest of a cloned project is left alone.
        assert_eq!(
            fs::read_to_string(path.join(MANIFEST_FILE)).unwrap(),
            r#"{ "name": "remote-app" }"#
        );
    }

    #[test]
    fn local_template_is_copied_and_renamed() {
        let templates = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let template = local_template(templates.path());
        let cloner = FakeCloner::default();

        let project = TargetProject::new(cwd.path(), "bar", &template);
        let path = project.create(&cloner).unwrap();

        assert!(cloner.calls.borrow().is_empty());
        assert_eq!(
            fs::read_to_string(path.join("src/main.jsx")).unwrap(),
            "console.log('hi');"
        );
        assert!(!path.join("node_modules").exists());
        assert!(!path.join("dist").exists());
        assert!(!path.join("dist.zip").exists());
        assert_eq!(
            fs::read_to_string(path.join(MANIFEST_FILE)).unwrap(),
            "{\n  \"name\": \"bar\",\n  \"version\": \"0.1.0\",\n  \"project\": {\n    \"sort\": 1\n  }\n}"
        );
        // The template itself is untouched.
        assert!(fs::read_to_string(template.path.join(MANIFEST_FILE))
            .unwrap()
            .contains("\"react-app\""));
    }

    #[test]
    fn local_template_without_manifest() {
        let templates = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let dir = templates.path().join("static-site");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("index.html"), "<html></html>").unwrap();
        let template = Template::infer_from_path(dir);

        let project = TargetProject::new(cwd.path(), "site", &template);
        let path = project.create(&FakeCloner::default()).unwrap();

        assert!(path.join("index.html").is_file());
        assert!(!path.join(MANIFEST_FILE).exists());
    }

    #[test]
    fn existing_target_is_refused_without_writes() {
        let templates = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let template = local_template(templates.path());
        let cloner = FakeCloner::default();
        fs::create_dir(cwd.path().join("bar")).unwrap();

        let project = TargetProject::new(cwd.path(), "bar", &template);
        let result = project.create(&cloner);

        assert!(matches!(result, Err(ScaffoldError::TargetExists(_))));
        assert_eq!(fs::read_dir(cwd.path().join("bar")).unwrap().count(), 0);
        assert!(cloner.calls.borrow().is_empty());
    }

    #[test]
    fn existing_file_target_is_refused() {
        let templates = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let template = remote_template(templates.path());
        let cloner = FakeCloner::default();
        fs::write(cwd.path().join("foo"), "taken").unwrap();

        let result = TargetProject::new(cwd.path(), "foo", &template).create(&cloner);

        assert!(matches!(result, Err(ScaffoldError::TargetExists(_))));
        assert_eq!(fs::read_to_string(cwd.path().join("foo")).unwrap(), "taken");
        assert!(cloner.calls.borrow().is_empty());
    }

    #[test]
    fn clone_failure_propagates() {
        let templates = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let template = remote_template(templates.path());
        let cloner = FakeCloner {
            fail: true,
            ..FakeCloner::default()
        };

        let result = TargetProject::new(cwd.path(), "foo", &template).create(&cloner);

        assert!(matches!(
            result,
            Err(ScaffoldError::Clone(CloneError::Failed { .. }))
        ));
    }

    #[test]
    fn created_path_outlives_the_project() {
        let templates = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let template = remote_template(templates.path());

        let path = TargetProject::new(cwd.path(), "foo", &template)
            .create(&FakeCloner::default())
            .unwrap();

        assert_eq!(path, cwd.path().join("foo"));
        assert!(path.join("README.md").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn linked_manifest_is_not_renamed_through_the_link() {
        let templates = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        let shared_manifest = shared.path().join(MANIFEST_FILE);
        fs::write(&shared_manifest, r#"{ "name": "shared" }"#).unwrap();
        let dir = templates.path().join("linked");
        fs::create_dir(&dir).unwrap();
        std::os::unix::fs::symlink(&shared_manifest, dir.join(MANIFEST_FILE)).unwrap();
        let template = Template::infer_from_path(dir);

        let path = TargetProject::new(cwd.path(), "baz", &template)
            .create(&FakeCloner::default())
            .unwrap();

        assert!(fs::symlink_metadata(path.join(MANIFEST_FILE))
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(
            fs::read_to_string(&shared_manifest).unwrap(),
            r#"{ "name": "shared" }"#
        );
    }
}
