use crate::{config::DEFAULT_TEMPLATE, template::Template};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("The templates path ('{}') exists, but is not a directory!", .0.display())]
    NotADirectory(PathBuf),
    #[error(
        "Could not read the contents of the templates directory ('{}'): '{}'",
        .1.display(),
        .0
    )]
    ReadDir(#[source] io::Error, PathBuf),
}

/// The ordered list of templates available for scaffolding.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    templates: Vec<Template>,
}

impl Catalog {
    /// Scans the immediate subdirectories of `root`, each one being a template.
    ///
    /// Templates are ordered by their sort value. Templates with equal sort
    /// values are ordered by name, as the directory listing is sorted before
    /// the (stable) sort by value.
    ///
    /// A `root` that does not exist yields an empty catalog.
    pub fn scan(root: &Path) -> Result<Self, CatalogError> {
        if !root.exists() {
            info!(path = %root.display(), "templates directory does not exist");
            return Ok(Catalog::default());
        }
        if !root.is_dir() {
            return Err(CatalogError::NotADirectory(root.to_path_buf()));
        }

        let items = fs::read_dir(root).map_err(|e| CatalogError::ReadDir(e, root.to_path_buf()))?;
        let mut dirs = Vec::new();
        for item in items {
            let item = item.map_err(|e| CatalogError::ReadDir(e, root.to_path_buf()))?;
            let path = item.path();
            if !path.is_dir() {
                continue;
            }
            dirs.push(path);
        }
        dirs.sort();

        let templates = dirs.into_iter().map(Template::infer_from_path).collect();
        let catalog = Catalog::from_templates(templates);
        debug!(count = catalog.len(), "scanned templates");
        Ok(catalog)
    }

    pub fn from_templates(mut templates: Vec<Template>) -> Self {
        templates.sort_by_key(|t| t.sort);
        Catalog { templates }
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Index of the template that should be preselected when prompting.
    pub fn default_choice(&self) -> usize {
        self.templates
            .iter()
            .position(|t| t.name == DEFAULT_TEMPLATE)
            .unwrap_or(0)
    }
}
