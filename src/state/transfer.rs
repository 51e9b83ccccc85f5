/// Import/export engine for the mix library
///
/// Export produces a self-describing JSON document; import accepts that
/// document back, plus the legacy bare-array shape, validates each entry
/// explicitly, and merges by id against the existing store.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::data::Mix;

/// Format version written into exports. Read back but unused on import;
/// there is no cross-version migration.
pub const EXPORT_VERSION: u32 = 1;

/// Filename stem used when the library name is empty after trimming
const FALLBACK_EXPORT_NAME: &str = "mix-library";

/// The document shape written by export
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub title: String,
    pub version: u32,
    pub mixes: Vec<Mix>,
}

/// Why an import was rejected as a whole. Every variant leaves the
/// store untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Parse(String),
    #[error("unrecognized file format: expected a mix array or an object with a `mixes` array")]
    UnrecognizedShape,
    #[error("no valid mixes found")]
    NoValidMixes,
}

/// Why a single entry inside an otherwise valid document was dropped
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("entry is not an object")]
    NotAnObject,
    #[error("missing or empty `{0}`")]
    MissingField(&'static str),
}

/// Result of a successful import, ready to merge
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// Records with ids not already in the store, in document order.
    /// The caller places these BEFORE the existing records.
    pub new_mixes: Vec<Mix>,
    /// Candidates dropped because their id was already present
    pub duplicates: usize,
    /// Library name carried by the document, when it had one
    pub library_title: Option<String>,
}

/// Serialize the full library as a pretty-printed export document
pub fn export_json(library_name: &str, mixes: &[Mix]) -> String {
    let document = ExportDocument {
        title: library_name.to_string(),
        version: EXPORT_VERSION,
        mixes: mixes.to_vec(),
    };

    // ExportDocument contains no map keys that can fail to serialize
    serde_json::to_string_pretty(&document).unwrap_or_default()
}

/// Synthesize the suggested export filename:
/// `{count}-{sanitized-library-name}-{YYYY-MM-DD}.json`
pub fn export_file_name(count: usize, library_name: &str, date: NaiveDate) -> String {
    format!("{}-{}-{}.json", count, slug(library_name), date.format("%Y-%m-%d"))
}

/// Replace whitespace runs with a single dash; fall back to a fixed
/// stem when the trimmed name is empty.
fn slug(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return FALLBACK_EXPORT_NAME.to_string();
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Parse and validate an uploaded document against the existing store.
///
/// Accepted shapes:
/// 1. a bare array of mix objects (legacy, carries no library name)
/// 2. `{ "mixes": [...], "title": "..." }` with `title` optional
///
/// Entries missing an `id` or `title` are dropped silently (counted in
/// the diagnostics log only). Candidates whose id is already in the
/// store, or repeated within the document itself, count as duplicates.
pub fn import_document(text: &str, existing: &[Mix]) -> Result<Import, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Parse(e.to_string()))?;

    let (entries, library_title) = match &value {
        Value::Array(entries) => (entries, None),
        Value::Object(obj) => match obj.get("mixes") {
            Some(Value::Array(entries)) => (
                entries,
                obj.get("title").and_then(Value::as_str).map(str::to_string),
            ),
            _ => return Err(ImportError::UnrecognizedShape),
        },
        _ => return Err(ImportError::UnrecognizedShape),
    };

    let mut invalid = 0usize;
    let mut candidates = Vec::new();
    for entry in entries {
        match validate_entry(entry) {
            Ok(mix) => candidates.push(mix),
            Err(e) => {
                invalid += 1;
                eprintln!("⚠️  Skipping import entry: {}", e);
            }
        }
    }

    if invalid > 0 {
        eprintln!("📊 Dropped {} invalid entries during import", invalid);
    }

    if candidates.is_empty() {
        return Err(ImportError::NoValidMixes);
    }

    let existing_ids: HashSet<&str> = existing.iter().map(|m| m.id.as_str()).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = 0usize;
    let mut new_mixes = Vec::new();

    for mix in candidates {
        if existing_ids.contains(mix.id.as_str()) || !seen.insert(mix.id.clone()) {
            duplicates += 1;
        } else {
            new_mixes.push(mix);
        }
    }

    Ok(Import {
        new_mixes,
        duplicates,
        library_title,
    })
}

/// Convert one JSON entry into a typed Mix.
///
/// `id` and `title` must be present and non-empty; a numeric value is
/// accepted in its string form (zero counts as absent). Every other
/// field defaults when missing.
fn validate_entry(entry: &Value) -> Result<Mix, EntryError> {
    let obj = entry.as_object().ok_or(EntryError::NotAnObject)?;

    let required = |field: &'static str| match obj.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Ok(n.to_string()),
        _ => Err(EntryError::MissingField(field)),
    };
    let optional = |field: &str| {
        obj.get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default()
    };

    Ok(Mix {
        id: required("id")?,
        title: required("title")?,
        url: optional("url"),
        prompt: optional("prompt"),
        negative_prompt: obj
            .get("negativePrompt")
            .and_then(Value::as_str)
            .map(str::to_string),
        created_at: obj.get("createdAt").and_then(Value::as_i64).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix(id: &str, title: &str, created_at: i64) -> Mix {
        Mix {
            id: id.to_string(),
            url: format!("https://example.com/{}.png", id),
            title: title.to_string(),
            prompt: format!("prompt for {}", title),
            negative_prompt: None,
            created_at,
        }
    }

    #[test]
    fn test_export_import_round_trip() {
        let original = vec![mix("a", "First", 100), mix("b", "Second", 200)];
        let json = export_json("My Library", &original);

        let import = import_document(&json, &[]).unwrap();
        assert_eq!(import.new_mixes, original);
        assert_eq!(import.duplicates, 0);
        assert_eq!(import.library_title.as_deref(), Some("My Library"));
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let store = vec![mix("a", "First", 100), mix("b", "Second", 200)];
        let json = export_json("Lib", &store);

        let import = import_document(&json, &store).unwrap();
        assert!(import.new_mixes.is_empty());
        assert_eq!(import.duplicates, 2);
    }

    #[test]
    fn test_bare_array_shape() {
        let import = import_document(r#"[{"id":"x","title":"T"}]"#, &[]).unwrap();
        assert_eq!(import.new_mixes.len(), 1);
        assert_eq!(import.new_mixes[0].id, "x");
        assert_eq!(import.new_mixes[0].title, "T");
        assert_eq!(import.new_mixes[0].created_at, 0);
        // Bare arrays carry no library name
        assert_eq!(import.library_title, None);
    }

    #[test]
    fn test_empty_mixes_array_is_no_valid_mixes() {
        let result = import_document(r#"{"mixes":[],"title":"Foo"}"#, &[]);
        assert_eq!(result, Err(ImportError::NoValidMixes));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(matches!(
            import_document("{not json", &[]),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn test_unrecognized_shapes_are_rejected() {
        assert_eq!(
            import_document(r#"{"title":"no mixes key"}"#, &[]),
            Err(ImportError::UnrecognizedShape)
        );
        assert_eq!(
            import_document("42", &[]),
            Err(ImportError::UnrecognizedShape)
        );
        assert_eq!(
            import_document(r#"{"mixes":"not an array"}"#, &[]),
            Err(ImportError::UnrecognizedShape)
        );
    }

    #[test]
    fn test_entries_without_id_or_title_are_dropped() {
        let text = r#"[
            {"id":"keep","title":"Kept"},
            {"id":"","title":"Empty id"},
            {"title":"No id"},
            {"id":"no-title"},
            "not an object"
        ]"#;

        let import = import_document(text, &[]).unwrap();
        assert_eq!(import.new_mixes.len(), 1);
        assert_eq!(import.new_mixes[0].id, "keep");
        // Invalid entries are not reported as duplicates
        assert_eq!(import.duplicates, 0);
    }

    #[test]
    fn test_numeric_ids_and_titles_are_coerced_to_strings() {
        let text = r#"[
            {"id":42,"title":"Numeric id"},
            {"id":"t","title":7},
            {"id":0,"title":"Zero id is absent"}
        ]"#;

        let import = import_document(text, &[]).unwrap();
        assert_eq!(import.new_mixes.len(), 2);
        assert_eq!(import.new_mixes[0].id, "42");
        assert_eq!(import.new_mixes[1].title, "7");
    }

    #[test]
    fn test_duplicates_within_the_document_keep_the_first() {
        let text = r#"[
            {"id":"x","title":"First"},
            {"id":"x","title":"Second"}
        ]"#;

        let import = import_document(text, &[]).unwrap();
        assert_eq!(import.new_mixes.len(), 1);
        assert_eq!(import.new_mixes[0].title, "First");
        assert_eq!(import.duplicates, 1);
    }

    #[test]
    fn test_partial_overlap_reports_both_counts() {
        let store = vec![mix("a", "Existing", 1)];
        let text = r#"{"mixes":[
            {"id":"a","title":"Existing"},
            {"id":"b","title":"New"}
        ]}"#;

        let import = import_document(text, &store).unwrap();
        assert_eq!(import.new_mixes.len(), 1);
        assert_eq!(import.new_mixes[0].id, "b");
        assert_eq!(import.duplicates, 1);
        assert_eq!(import.library_title, None);
    }

    #[test]
    fn test_export_document_fields() {
        let mixes = vec![mix("a", "One", 10)];
        let json = export_json("Lib", &mixes);
        let doc: ExportDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(doc.title, "Lib");
        assert_eq!(doc.version, EXPORT_VERSION);
        assert_eq!(doc.mixes, mixes);
    }

    #[test]
    fn test_export_file_name_sanitizes_whitespace() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        assert_eq!(
            export_file_name(12, "My  Prompt   Library", date),
            "12-My-Prompt-Library-2026-08-30.json"
        );
        assert_eq!(
            export_file_name(0, "   ", date),
            "0-mix-library-2026-08-30.json"
        );
    }
}
