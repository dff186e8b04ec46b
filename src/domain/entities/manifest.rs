use crate::domain::value_objects::project_type::ProjectType;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// One project to keep in sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Logical name, unique within a manifest
    pub name: String,

    /// Backend the project is synced from
    #[serde(rename = "type")]
    pub project_type: ProjectType,

    /// Absolute path of the working copy
    pub base_dir: PathBuf,

    /// Backend connection options (`P4PORT`, `Url`, ...)
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl ProjectEntry {
    pub fn new(
        name: impl Into<String>,
        project_type: ProjectType,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            project_type,
            base_dir: base_dir.into(),
            options: HashMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// The set of projects an operator wants synced
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub projects: Vec<ProjectEntry>,
}

impl Manifest {
    pub fn new(projects: Vec<ProjectEntry>) -> Self {
        Self { projects }
    }

    /// Check structural rules: non-empty, unique non-empty names, absolute directories
    ///
    /// Backend options are checked later, when projects are constructed.
    pub fn validate(&self) -> Result<(), String> {
        if self.projects.is_empty() {
            return Err("manifest lists no projects".to_string());
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err("project name must not be empty".to_string());
            }
            if !seen.insert(project.name.as_str()) {
                return Err(format!("duplicate project name '{}'", project.name));
            }
            if !project.base_dir.is_absolute() {
                return Err(format!(
                    "project '{}' base_dir must be absolute: {}",
                    project.name,
                    project.base_dir.display()
                ));
            }
        }
        Ok(())
    }

    /// Look up a project by name
    pub fn find(&self, name: &str) -> Option<&ProjectEntry> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Projects whose names are in `names`; all projects when `names` is empty
    pub fn select(&self, names: &[String]) -> Result<Vec<&ProjectEntry>, String> {
        if names.is_empty() {
            return Ok(self.projects.iter().collect());
        }
        names
            .iter()
            .map(|name| {
                self.find(name)
                    .ok_or_else(|| format!("unknown project '{}'", name))
            })
            .collect()
    }
}
