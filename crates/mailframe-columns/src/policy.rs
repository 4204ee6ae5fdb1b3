#![forbid(unsafe_code)]

//! Policy-as-data configuration for the column layout.
//!
//! Every tunable of the layout lives in [`LayoutPolicy`]: the fixed width
//! budget, the column-count range, the defaults a new group is seeded with
//! and the debounce windows. `LayoutPolicy::default()` is the built-in
//! behavior; with the `policy-config` feature the same struct loads from
//! TOML or JSON.
//!
//! ```toml
//! # mailframe-policy.toml
//! total_width_px = 640
//! default_columns = 3
//! group_debounce_ms = 120
//! ```
//!
//! ```rust,ignore
//! let policy = LayoutPolicy::from_toml_file("mailframe-policy.toml")?;
//! ```

#[cfg(feature = "policy-config")]
use std::path::Path;
use std::time::Duration;

use mailframe_core::attr::parse_int;

use crate::config::VerticalAlign;

/// Tunables of the column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutPolicy {
    /// Width budget shared by all columns, in pixels.
    pub total_width_px: u32,
    /// Horizontal padding of the outer wrapper cell.
    pub gutter_px: u32,
    /// Smallest allowed column count.
    pub min_columns: u8,
    /// Largest allowed column count.
    pub max_columns: u8,
    /// Column count of a freshly dropped group, and of unreadable counts.
    pub default_columns: u8,
    /// Alignment of a freshly dropped group.
    pub default_align: VerticalAlign,
    /// Padding of a freshly dropped group.
    pub default_padding_px: u32,
    /// Quiet window before a group reconcile runs.
    pub group_debounce_ms: u64,
    /// Quiet window before a column attribute sync runs.
    pub column_debounce_ms: u64,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            total_width_px: 600,
            gutter_px: 20,
            min_columns: 1,
            max_columns: 4,
            default_columns: 2,
            default_align: VerticalAlign::Top,
            default_padding_px: 20,
            group_debounce_ms: 150,
            column_debounce_ms: 100,
        }
    }
}

impl LayoutPolicy {
    /// Load from a TOML string and validate.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PolicyError> {
        let policy: Self = toml::from_str(s)?;
        policy.into_validated()
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_str(s)?;
        policy.into_validated()
    }

    /// Load from a JSON file on disk and validate.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to TOML.
    #[cfg(feature = "policy-config")]
    pub fn to_toml_string(&self) -> Result<String, PolicyError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the policy
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.total_width_px == 0 {
            errors.push("total_width_px must be > 0".into());
        }
        if self.min_columns == 0 {
            errors.push("min_columns must be >= 1".into());
        }
        if self.min_columns > self.max_columns {
            errors.push(format!(
                "min_columns ({}) must be <= max_columns ({})",
                self.min_columns, self.max_columns
            ));
        }
        if u32::from(self.max_columns) > self.total_width_px {
            errors.push(format!(
                "max_columns ({}) must not exceed total_width_px ({})",
                self.max_columns, self.total_width_px
            ));
        }
        if !(self.min_columns..=self.max_columns).contains(&self.default_columns) {
            errors.push(format!(
                "default_columns ({}) must be within {}..={}",
                self.default_columns, self.min_columns, self.max_columns
            ));
        }

        errors
    }

    /// Check the policy, turning failures into an error.
    pub fn into_validated(self) -> Result<Self, PolicyError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(PolicyError::Validation(errors))
        }
    }

    /// Clamp a count into the allowed range.
    #[must_use]
    pub fn clamp_column_count(&self, count: i64) -> u8 {
        let (lo, hi) = (self.min_columns.max(1), self.max_columns.max(1));
        let clamped = count.clamp(i64::from(lo), i64::from(hi.max(lo)));
        u8::try_from(clamped).unwrap_or(hi)
    }

    /// Coerce a raw count attribute: unreadable → default, otherwise
    /// clamped.
    #[must_use]
    pub fn coerce_column_count(&self, raw: &str) -> u8 {
        parse_int(raw).map_or(self.default_columns, |v| self.clamp_column_count(v))
    }

    /// Width of each column for `count` columns: `floor(total / count)`.
    /// The remainder is left unassigned.
    #[must_use]
    pub fn column_width(&self, count: u8) -> u32 {
        self.total_width_px / u32::from(count.max(1))
    }

    /// Quiet window for group reconciles.
    #[must_use]
    pub fn group_debounce(&self) -> Duration {
        Duration::from_millis(self.group_debounce_ms)
    }

    /// Quiet window for column attribute syncs.
    #[must_use]
    pub fn column_debounce(&self) -> Duration {
        Duration::from_millis(self.column_debounce_ms)
    }
}

/// Errors loading a [`LayoutPolicy`].
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "policy-config")]
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
