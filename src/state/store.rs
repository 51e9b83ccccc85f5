use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use super::data::{AppTheme, Mix, MixDraft};

/// Default library display name, used until the user renames the library
pub const DEFAULT_LIBRARY_NAME: &str = "Prompt Library";

/// The Storage service owns the on-disk state of the application.
///
/// It persists three independent slots as per-key files inside the
/// user's data directory:
/// - `mixes.json` — the full mix list, replaced wholesale on every save
/// - `theme`      — "light" or "dark"
/// - `library`    — the library display name
///
/// Every read fails soft: missing or unreadable state yields a default
/// and a logged diagnostic, never an error the caller has to handle.
/// The in-memory list stays authoritative for the session even when a
/// write fails.
#[derive(Debug)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Create a Storage instance rooted in the user's data directory.
    ///
    /// The directory is created on first run:
    /// - Linux: ~/.local/share/mix-gallery/
    /// - macOS: ~/Library/Application Support/mix-gallery/
    /// - Windows: %APPDATA%\mix-gallery\
    pub fn new() -> Self {
        let mut dir = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");
        dir.push("mix-gallery");

        Self::with_dir(dir)
    }

    /// Create a Storage instance rooted at an explicit directory
    pub fn with_dir(dir: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("⚠️  Failed to create data directory {}: {}", dir.display(), e);
        }

        println!("📁 Library storage at: {}", dir.display());

        Storage { dir }
    }

    fn mixes_path(&self) -> PathBuf {
        self.dir.join("mixes.json")
    }

    fn theme_path(&self) -> PathBuf {
        self.dir.join("theme")
    }

    fn library_name_path(&self) -> PathBuf {
        self.dir.join("library")
    }

    /// Load the persisted mix list.
    ///
    /// A missing file (first run) or malformed content yields an empty
    /// list; the failure is logged and never propagated.
    pub fn load_mixes(&self) -> Vec<Mix> {
        let path = self.mixes_path();
        if !path.exists() {
            return Vec::new();
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("⚠️  Failed to read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(mixes) => mixes,
            Err(e) => {
                eprintln!("⚠️  Failed to parse {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    /// Persist the full mix list, replacing whatever was stored before.
    ///
    /// Write failures (disk full, permissions) are logged and swallowed.
    pub fn save_mixes(&self, mixes: &[Mix]) {
        let json = match serde_json::to_string(mixes) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("⚠️  Failed to serialize mix list: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(self.mixes_path(), json) {
            eprintln!("⚠️  Failed to save mix list: {}", e);
        }
    }

    /// Load the persisted theme preference, defaulting to light
    pub fn load_theme(&self) -> AppTheme {
        match fs::read_to_string(self.theme_path()) {
            Ok(text) => AppTheme::from_str(&text),
            Err(_) => AppTheme::Light,
        }
    }

    pub fn save_theme(&self, theme: AppTheme) {
        if let Err(e) = fs::write(self.theme_path(), theme.as_str()) {
            eprintln!("⚠️  Failed to save theme preference: {}", e);
        }
    }

    /// Load the library display name, defaulting when unset
    pub fn load_library_name(&self) -> String {
        match fs::read_to_string(self.library_name_path()) {
            Ok(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_LIBRARY_NAME.to_string(),
        }
    }

    pub fn save_library_name(&self, name: &str) {
        if let Err(e) = fs::write(self.library_name_path(), name) {
            eprintln!("⚠️  Failed to save library name: {}", e);
        }
    }
}

/// Build a new mix from form data.
///
/// Generates a fresh UUID v4 identifier and stamps the creation time in
/// milliseconds. Does not touch any list; the caller decides where the
/// record goes and persists the result.
pub fn create_mix(draft: &MixDraft) -> Mix {
    Mix {
        id: Uuid::new_v4().to_string(),
        url: draft.url.clone(),
        title: draft.title.clone(),
        prompt: draft.prompt.clone(),
        negative_prompt: draft.negative_prompt.clone(),
        created_at: Utc::now().timestamp_millis(),
    }
}

/// Replace every user-editable field of the matching mix.
///
/// `id` and `created_at` are never touched. No-op when no record
/// matches.
pub fn update_mix(mixes: &mut [Mix], id: &str, draft: &MixDraft) {
    if let Some(mix) = mixes.iter_mut().find(|m| m.id == id) {
        mix.url = draft.url.clone();
        mix.title = draft.title.clone();
        mix.prompt = draft.prompt.clone();
        mix.negative_prompt = draft.negative_prompt.clone();
    }
}

/// Remove the mix with the given id. No-op when absent.
pub fn delete_mix(mixes: &mut Vec<Mix>, id: &str) {
    mixes.retain(|m| m.id != id);
}

/// Sample records materialized on first run so the gallery is not empty
pub fn seed_mixes() -> Vec<Mix> {
    let now = Utc::now().timestamp_millis();

    vec![
        Mix {
            id: "1".to_string(),
            url: "https://picsum.photos/id/1018/800/600".to_string(),
            title: "Mountain Cinematic".to_string(),
            prompt: "A cinematic wide shot of a mountain range at sunset, golden hour, \
                     volumetric lighting, photorealistic, 8k"
                .to_string(),
            negative_prompt: None,
            created_at: now,
        },
        Mix {
            id: "2".to_string(),
            url: "https://picsum.photos/id/1015/800/600".to_string(),
            title: "River Valley Fantasy".to_string(),
            prompt: "Fantasy landscape, river flowing through a lush green valley, \
                     floating islands in the sky, dreamlike atmosphere, vivid colors"
                .to_string(),
            negative_prompt: None,
            created_at: now - 10_000,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn draft(title: &str) -> MixDraft {
        MixDraft {
            url: "https://example.com/img.png".to_string(),
            title: title.to_string(),
            prompt: "prompt".to_string(),
            negative_prompt: None,
        }
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let d = draft("T");
        let ids: HashSet<String> = (0..100).map(|_| create_mix(&d).id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_update_preserves_id_and_created_at() {
        let mut mixes = vec![create_mix(&draft("Before"))];
        let id = mixes[0].id.clone();
        let created_at = mixes[0].created_at;

        let new_draft = MixDraft {
            url: "file:///other.png".to_string(),
            title: "After".to_string(),
            prompt: "new prompt".to_string(),
            negative_prompt: Some("blurry".to_string()),
        };
        update_mix(&mut mixes, &id, &new_draft);

        assert_eq!(mixes[0].id, id);
        assert_eq!(mixes[0].created_at, created_at);
        assert_eq!(mixes[0].title, "After");
        assert_eq!(mixes[0].negative_prompt.as_deref(), Some("blurry"));
    }

    #[test]
    fn test_update_unknown_id_is_a_noop() {
        let mut mixes = vec![create_mix(&draft("Only"))];
        let before = mixes.clone();

        update_mix(&mut mixes, "no-such-id", &draft("Changed"));

        assert_eq!(mixes, before);
    }

    #[test]
    fn test_delete_unknown_id_is_a_noop() {
        let mut mixes = vec![create_mix(&draft("Only"))];
        delete_mix(&mut mixes, "no-such-id");
        assert_eq!(mixes.len(), 1);

        let id = mixes[0].id.clone();
        delete_mix(&mut mixes, &id);
        assert!(mixes.is_empty());
    }

    #[test]
    fn test_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());

        let mixes = seed_mixes();
        storage.save_mixes(&mixes);
        assert_eq!(storage.load_mixes(), mixes);

        storage.save_theme(AppTheme::Dark);
        assert_eq!(storage.load_theme(), AppTheme::Dark);

        storage.save_library_name("My Mixes");
        assert_eq!(storage.load_library_name(), "My Mixes");
    }

    #[test]
    fn test_load_fails_soft_on_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());

        std::fs::write(dir.path().join("mixes.json"), "not json at all").unwrap();
        assert!(storage.load_mixes().is_empty());
    }

    #[test]
    fn test_defaults_when_nothing_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().to_path_buf());

        assert!(storage.load_mixes().is_empty());
        assert_eq!(storage.load_theme(), AppTheme::Light);
        assert_eq!(storage.load_library_name(), DEFAULT_LIBRARY_NAME);
    }
}
