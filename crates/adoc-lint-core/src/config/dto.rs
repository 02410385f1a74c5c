//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to the rule model by the loader.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw TOML representation of a rule file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfigDto {
    /// Reporter and CLI settings.
    #[serde(default)]
    pub settings: SettingsDto,

    /// Header attribute rules.
    #[serde(default)]
    pub metadata: Vec<MetadataDto>,

    /// Top-level section rules.
    #[serde(default)]
    pub sections: Vec<SectionDto>,
}

/// `[settings]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SettingsDto {
    /// Context lines shown around each finding.
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
    /// Lowest severity that fails a run.
    #[serde(default = "default_severity_str")]
    pub fail_on: String,
    /// Glob patterns of inputs to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for SettingsDto {
    fn default() -> Self {
        Self {
            context_lines: default_context_lines(),
            fail_on: default_severity_str(),
            exclude: Vec::new(),
        }
    }
}

/// `[[metadata]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MetadataDto {
    /// Attribute name without colons.
    pub name: String,
    /// Attribute must be present.
    #[serde(default)]
    pub required: bool,
    /// Minimum value length.
    #[serde(default)]
    pub min_length: Option<usize>,
    /// Maximum value length.
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Pattern the whole value must match.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

/// `[[sections]]` / `[[sections.subsections]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionDto {
    /// Rule name used in messages.
    pub name: String,
    /// Section level (0 = document title).
    pub level: u8,
    /// Order tag among sibling sections.
    #[serde(default)]
    pub order: Option<u32>,
    /// Severity inherited by the section's constraints.
    #[serde(default)]
    pub severity: Option<String>,
    /// Occurrence bounds.
    #[serde(default)]
    pub occurrence: Option<OccurrenceDto>,
    /// Title constraints.
    #[serde(default)]
    pub title: Option<FieldDto>,
    /// Block rules in lookup order.
    #[serde(default)]
    pub blocks: Vec<BlockDto>,
    /// Nested section rules.
    #[serde(default)]
    pub subsections: Vec<SectionDto>,
}

/// Occurrence bounds table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OccurrenceDto {
    /// Minimum count (default 0).
    #[serde(default)]
    pub min: usize,
    /// Maximum count (default unbounded).
    #[serde(default)]
    pub max: Option<usize>,
    /// Severity override.
    #[serde(default)]
    pub severity: Option<String>,
}

/// `[[sections.blocks]]` entry.
///
/// Keys other than the common ones are per-kind constraint fields,
/// checked against the kind's vocabulary by the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDto {
    /// Block kind tag, e.g. `listing`.
    pub kind: String,
    /// Rule name (default: the kind tag).
    #[serde(default)]
    pub name: Option<String>,
    /// Severity inherited by the block's constraints.
    #[serde(default)]
    pub severity: Option<String>,
    /// Occurrence bounds among sibling blocks.
    #[serde(default)]
    pub occurrence: Option<OccurrenceDto>,
    /// Order tag among sibling blocks.
    #[serde(default)]
    pub order: Option<u32>,
    /// Per-kind constraint fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldDto>,
}

/// One constraint field of a block, or a section title.
///
/// Which keys are meaningful depends on the field; the loader rejects
/// keys a field does not understand.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FieldDto {
    /// Value must be present.
    #[serde(default)]
    pub required: Option<bool>,
    /// Minimum text length.
    #[serde(default)]
    pub min_length: Option<usize>,
    /// Maximum text length.
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Pattern the whole value must match.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Pattern that must not occur anywhere.
    #[serde(default)]
    pub forbidden: Option<String>,
    /// Permitted values.
    #[serde(default)]
    pub allowed: Option<Vec<String>>,
    /// Lower bound of a count or number.
    #[serde(default)]
    pub min: Option<u64>,
    /// Upper bound of a count or number.
    #[serde(default)]
    pub max: Option<u64>,
    /// Words per sentence (sentences only).
    #[serde(default)]
    pub words: Option<Box<FieldDto>>,
    /// Severity override.
    #[serde(default)]
    pub severity: Option<String>,
}

impl FieldDto {
    /// Names of the keys that were set.
    #[must_use]
    pub fn present_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.required.is_some() {
            keys.push("required");
        }
        if self.min_length.is_some() {
            keys.push("min-length");
        }
        if self.max_length.is_some() {
            keys.push("max-length");
        }
        if self.pattern.is_some() {
            keys.push("pattern");
        }
        if self.forbidden.is_some() {
            keys.push("forbidden");
        }
        if self.allowed.is_some() {
            keys.push("allowed");
        }
        if self.min.is_some() {
            keys.push("min");
        }
        if self.max.is_some() {
            keys.push("max");
        }
        if self.words.is_some() {
            keys.push("words");
        }
        if self.severity.is_some() {
            keys.push("severity");
        }
        keys
    }
}

fn default_context_lines() -> usize {
    2
}

fn default_severity_str() -> String {
    "error".to_string()
}
