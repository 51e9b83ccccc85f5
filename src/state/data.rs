/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the storage layer and the UI layer.

use serde::{Deserialize, Serialize};

/// A single prompt mix in the library
///
/// Serialized field names are camelCase so the persisted file and the
/// import/export format stay interchangeable with other tools that read
/// the same JSON shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mix {
    /// Unique identifier, immutable after creation
    pub id: String,
    /// Image location (http(s) URL or local path), treated as opaque text
    pub url: String,
    /// Display title
    pub title: String,
    /// Generation prompt, free text
    pub prompt: String,
    /// Negative prompt, absent for mixes that never had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Creation timestamp in milliseconds since epoch, never mutated
    pub created_at: i64,
}

/// Form payload for creating or editing a mix
///
/// Carries every user-editable field; `id` and `created_at` are
/// always supplied by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MixDraft {
    pub url: String,
    pub title: String,
    pub prompt: String,
    pub negative_prompt: Option<String>,
}

/// Gallery layout selected in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Full-width rows with the complete prompt and negative prompt
    Details,
    /// Compact cards wrapped into columns
    Grid,
    /// Single-column rows with a prompt preview
    List,
}

/// Sort order applied by the query pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    /// Descending by creation time
    Newest,
    /// Ascending by creation time
    Oldest,
    /// Ascending by title
    TitleAsc,
    /// Descending by title
    TitleDesc,
}

impl SortOption {
    /// All options, in the order they appear in the sort picker
    pub const ALL: [SortOption; 4] = [
        SortOption::Newest,
        SortOption::Oldest,
        SortOption::TitleAsc,
        SortOption::TitleDesc,
    ];
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SortOption::Newest => "Newest First",
            SortOption::Oldest => "Oldest First",
            SortOption::TitleAsc => "Title (A-Z)",
            SortOption::TitleDesc => "Title (Z-A)",
        })
    }
}

/// Color scheme preference, persisted as plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppTheme {
    Light,
    Dark,
}

impl AppTheme {
    /// Value written to the `theme` file
    pub fn as_str(self) -> &'static str {
        match self {
            AppTheme::Light => "light",
            AppTheme::Dark => "dark",
        }
    }

    /// Parse a persisted value; anything unrecognized falls back to light
    pub fn from_str(value: &str) -> Self {
        match value.trim() {
            "dark" => AppTheme::Dark,
            _ => AppTheme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AppTheme::Light => AppTheme::Dark,
            AppTheme::Dark => AppTheme::Light,
        }
    }
}
