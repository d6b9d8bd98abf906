use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Entry types a deployment may enable.
pub const ALLOWED_ENTRY_TYPES: [&str; 7] = [
    "analyses",
    "biosamples",
    "cohorts",
    "datasets",
    "g_variants",
    "individuals",
    "runs",
];

const MAX_FILTER_CATEGORIES: usize = 3;
const MAX_LABELS_PER_CATEGORY: usize = 6;
const DEFAULT_MUTED: &str = "#9E9E9E";

/// Front-end settings. Built once at startup and passed to whatever needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Base URL of the upstream Beacon API.
    pub api_url: String,
    pub ui: UiSettings,
    #[serde(default)]
    pub entry_types: Vec<String>,
    #[serde(default)]
    pub common_filters: CommonFilters,
    #[serde(default)]
    pub genomic_annotations: GenomicAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub colors: Colors,
    #[serde(default)]
    pub logos: Logos,
}

/// Colours as `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    pub primary: String,
    pub dark_primary: String,
    pub secondary: String,
    #[serde(default)]
    pub muted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logos {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub founders: Vec<String>,
}

/// Quick filters shown above the search bar, grouped by category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonFilters {
    #[serde(default)]
    pub filter_categories: Vec<String>,
    #[serde(default)]
    pub filter_labels: BTreeMap<String, Vec<FilterLabel>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterLabel {
    /// Filtering term id sent to the API.
    pub key: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenomicAnnotations {
    #[serde(default)]
    pub visible_genomic_categories: Vec<String>,
}

/// Colours consumed by the cell renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub primary: String,
    pub secondary: String,
    pub muted: String,
}

impl Settings {
    /// Read, parse and validate a settings file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Parse and validate a settings document.
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let settings: Settings =
            serde_json::from_str(contents).map_err(|e| format!("Invalid config: {e}"))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the constraints serde cannot express. Reports every problem.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems: Vec<String> = vec![];

        if self.api_url.trim().is_empty() {
            problems.push("apiUrl must not be empty".to_string());
        }

        let colors = &self.ui.colors;
        for (name, value) in [
            ("primary", Some(&colors.primary)),
            ("darkPrimary", Some(&colors.dark_primary)),
            ("secondary", Some(&colors.secondary)),
            ("muted", colors.muted.as_ref()),
        ] {
            if let Some(value) = value {
                if !is_hex_color(value) {
                    problems.push(format!("ui.colors.{name} must be #RRGGBB, got '{value}'"));
                }
            }
        }

        for entry_type in &self.entry_types {
            if !ALLOWED_ENTRY_TYPES.contains(&entry_type.as_str()) {
                problems.push(format!("unknown entry type '{entry_type}'"));
            }
        }

        let filters = &self.common_filters;
        if filters.filter_categories.len() > MAX_FILTER_CATEGORIES {
            problems.push(format!(
                "commonFilters allows at most {MAX_FILTER_CATEGORIES} categories, got {}",
                filters.filter_categories.len()
            ));
        }
        for (category, labels) in &filters.filter_labels {
            if !filters.filter_categories.contains(category) {
                problems.push(format!("filter labels for undeclared category '{category}'"));
            }
            if labels.len() > MAX_LABELS_PER_CATEGORY {
                problems.push(format!(
                    "category '{category}' allows at most {MAX_LABELS_PER_CATEGORY} labels, got {}",
                    labels.len()
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }

    /// Colours for cell rendering.
    pub fn theme(&self) -> Theme {
        let colors = &self.ui.colors;
        Theme {
            primary: colors.primary.clone(),
            secondary: colors.secondary.clone(),
            muted: colors
                .muted
                .clone()
                .unwrap_or_else(|| DEFAULT_MUTED.to_string()),
        }
    }

    /// Filter labels of one category, in configured order.
    pub fn filters_for(&self, category: &str) -> &[FilterLabel] {
        self.common_filters
            .filter_labels
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// `$XDG_CONFIG_HOME/beacon-ui/config.json` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("beacon-ui");
    path.push("config.json");
    Some(path)
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|ch| ch.is_ascii_hexdigit())
}
