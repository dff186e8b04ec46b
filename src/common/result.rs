use crate::common::error::SyncError;
use std::collections::HashMap;
use std::path::PathBuf;

/// Result alias used across the crate
///
/// # Examples
///
/// ```
/// use vcsync::common::result::SyncResult;
/// use vcsync::common::error::SyncError;
///
/// fn require_url() -> SyncResult<String> {
///     Err(SyncError::missing_option("core", "Url"))
/// }
///
/// assert!(require_url().is_err());
/// ```
pub type SyncResult<T> = Result<T, SyncError>;

/// Lookups into a project's option map
pub trait OptionsExt {
    /// Fetch a required option, failing with [`SyncError::MissingOption`]
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use vcsync::common::result::OptionsExt;
    ///
    /// let mut options = HashMap::new();
    /// options.insert("Url".to_string(), "https://example.com/core.git".to_string());
    ///
    /// assert!(options.required("core", "Url").is_ok());
    /// assert!(options.required("core", "Branch").is_err());
    /// ```
    fn required(&self, project: &str, option: &str) -> SyncResult<String>;

    /// Fetch an optional option, treating an empty value as absent
    fn optional(&self, option: &str) -> Option<String>;
}

impl OptionsExt for HashMap<String, String> {
    fn required(&self, project: &str, option: &str) -> SyncResult<String> {
        self.get(option)
            .cloned()
            .ok_or_else(|| SyncError::missing_option(project, option))
    }

    fn optional(&self, option: &str) -> Option<String> {
        self.get(option).filter(|value| !value.is_empty()).cloned()
    }
}

/// Conversion helpers for foreign results
pub trait ResultExt<T> {
    /// Attach a message and path to an I/O failure
    fn with_filesystem_error(self, message: impl Into<String>, path: Option<PathBuf>)
        -> SyncResult<T>;
}

impl<T> ResultExt<T> for Result<T, std::io::Error> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<PathBuf>,
    ) -> SyncResult<T> {
        self.map_err(|e| SyncError::filesystem_error_with_source(message, path, e))
    }
}
