//! Conversion configuration, programmatic or loaded from YAML.
//!
//! # File format
//!
//! ```yaml
//! # openapi-sheet.yaml
//! # How reference cycles are cut: `ancestors` (any ref already being
//! # expanded) or `parent` (only a direct self-reference).
//! cycle_guard: ancestors
//!
//! # Hard limit on nested schema expansion.
//! max_depth: 64
//!
//! # Operations without tags: `group` them or `fail` the conversion.
//! missing_tags: group
//! untagged_group: default
//!
//! sheet:
//!   # Response status shown in the sheet.
//!   success_status: "200"
//!   # Content type used when an operation has no request body.
//!   content_type: application/json
//! ```

use std::path::Path;

use serde::Deserialize;

/// Default group name for operations that declare no tags.
pub const DEFAULT_UNTAGGED_GROUP: &str = "default";

/// Default limit on nested schema expansion.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How the field builder detects reference cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleGuard {
    /// Skip a ref that is already anywhere in the chain being expanded.
    #[default]
    Ancestors,
    /// Skip a ref only when it equals the schema that declares it.
    ///
    /// Longer cycles are cut by `max_depth` as a [`DepthLimit`](crate::Error::DepthLimit) error.
    Parent,
}

impl CycleGuard {
    /// Whether expanding `reference` under `chain` would re-enter a cycle.
    pub(crate) fn blocks(self, reference: &str, chain: &[&str]) -> bool {
        match self {
            Self::Ancestors => chain.contains(&reference),
            Self::Parent => chain.last() == Some(&reference),
        }
    }
}

/// What to do with operations that declare no `tags`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTags {
    /// Put them in the untagged group.
    #[default]
    Group,
    /// Fail the conversion with [`MalformedInput`](crate::Error::MalformedInput).
    Fail,
}

/// Project-level config file.
///
/// Loaded from a YAML file via [`ProjectConfig::load`], then applied to a
/// [`ConvertConfig`] via [`ConvertConfig::with_project_config`].
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Cycle detection mode.
    pub cycle_guard: CycleGuard,

    /// Maximum schema nesting depth.
    pub max_depth: usize,

    /// Policy for operations without tags.
    pub missing_tags: MissingTags,

    /// Group name used for untagged operations.
    pub untagged_group: String,

    /// Sheet projection settings.
    pub sheet: SheetConfig,
}

/// Settings for [`build_sheet`](crate::build_sheet).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Response status whose payload fills the response section.
    pub success_status: String,

    /// Content type reported when an operation has no request payload.
    pub content_type: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            cycle_guard: CycleGuard::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            missing_tags: MissingTags::default(),
            untagged_group: DEFAULT_UNTAGGED_GROUP.to_string(),
            sheet: SheetConfig::default(),
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            success_status: "200".to_string(),
            content_type: "application/json".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Load config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }
}

/// Configuration for a single conversion.
///
/// # Example
///
/// ```ignore
/// let config = ConvertConfig::new()
///     .cycle_guard(CycleGuard::Parent)
///     .missing_tags(MissingTags::Fail);
/// let doc = openapi_sheet::convert(&text, &config)?;
/// ```
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub(crate) cycle_guard: CycleGuard,
    pub(crate) max_depth: usize,
    pub(crate) missing_tags: MissingTags,
    pub(crate) untagged_group: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cycle_guard: CycleGuard::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            missing_tags: MissingTags::default(),
            untagged_group: DEFAULT_UNTAGGED_GROUP.to_string(),
        }
    }

    /// Apply settings from a [`ProjectConfig`].
    ///
    /// Builder methods called after this override config values.
    #[must_use]
    pub fn with_project_config(mut self, project: &ProjectConfig) -> Self {
        self.cycle_guard = project.cycle_guard;
        self.max_depth = project.max_depth;
        self.missing_tags = project.missing_tags;
        self.untagged_group.clone_from(&project.untagged_group);
        self
    }

    /// Set the cycle detection mode.
    #[must_use]
    pub fn cycle_guard(mut self, guard: CycleGuard) -> Self {
        self.cycle_guard = guard;
        self
    }

    /// Set the maximum schema nesting depth.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the policy for operations without tags.
    #[must_use]
    pub fn missing_tags(mut self, policy: MissingTags) -> Self {
        self.missing_tags = policy;
        self
    }

    /// Set the group name used for untagged operations.
    #[must_use]
    pub fn untagged_group(mut self, name: &str) -> Self {
        self.untagged_group = name.to_string();
        self
    }
}
