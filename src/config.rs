//! Options shared by the engine, the file driver and the CLI.

/// The only legacy resource type this engine understands.
pub const LEGACY_RESOURCE_TYPE: &str = "aws_s3_bucket";

/// Migration settings.
///
/// ```rust
/// use tfrefactor_core::MigrateOptions;
///
/// let options = MigrateOptions::default()
///     .with_ignore_arguments(["policy"])
///     .with_ignore_names(["legacy_logs"])
///     .with_csv(true);
/// assert_eq!(options.resource_type, "aws_s3_bucket");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateOptions {
    /// Resource type to migrate, e.g. `aws_s3_bucket`.
    pub resource_type: String,
    /// Arguments of the resource that are left alone.
    pub ignore_arguments: Vec<String>,
    /// Resource names that are left alone.
    pub ignore_names: Vec<String>,
    /// Regular expressions for paths the file driver skips.
    pub ignore_paths: Vec<String>,
    /// Write a `<file>_new_resources.csv` manifest next to each migrated file.
    pub csv: bool,
    /// Descend into sub-directories.
    pub recursive: bool,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            resource_type: LEGACY_RESOURCE_TYPE.to_string(),
            ignore_arguments: Vec::new(),
            ignore_names: Vec::new(),
            ignore_paths: Vec::new(),
            csv: false,
            recursive: false,
        }
    }
}

impl MigrateOptions {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Default::default()
        }
    }

    pub fn with_ignore_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore_paths<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_paths = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_csv(mut self, csv: bool) -> Self {
        self.csv = csv;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}
