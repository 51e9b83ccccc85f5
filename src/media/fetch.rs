use std::fs;
use std::path::PathBuf;

use tokio::task;

/// Stand-in image fetched when a mix url fails to load
pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/400/300";

/// Shared cache slot for the stand-in image
pub const DEFAULT_IMAGE_CACHE_ID: &str = "placeholder";

/// Get the image cache directory
/// Returns ~/.cache/mix-gallery/images on Linux
pub fn get_image_cache_dir() -> PathBuf {
    let mut path = dirs_next::cache_dir()
        .or_else(dirs_next::home_dir)
        .expect("Could not determine cache directory");

    path.push("mix-gallery");
    path.push("images");

    // Ensure the directory exists
    fs::create_dir_all(&path).expect("Failed to create image cache directory");

    path
}

/// True when the mix url points at a web resource rather than a local file
pub fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Cache filename for a mix id. Imported ids are arbitrary strings, so
/// anything that is not filename-safe is replaced.
fn cache_file_name(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Load the image bytes for a mix
///
/// Tier 1: disk cache hit (previously fetched remote image)
/// Tier 2: HTTP fetch for remote urls, plain file read for local paths
///
/// Fetched remote bytes are written back to the cache best-effort; a
/// failed cache write never fails the load.
pub async fn load_image(id: String, url: String) -> Result<Vec<u8>, String> {
    // Spawn blocking because both the HTTP client and the file reads are synchronous
    task::spawn_blocking(move || load_image_blocking(&id, &url))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Blocking implementation of image loading
fn load_image_blocking(id: &str, url: &str) -> Result<Vec<u8>, String> {
    if url.trim().is_empty() {
        return Err("No image url".to_string());
    }

    let cached = get_image_cache_dir().join(cache_file_name(id));

    // Tier 1: cached copy from an earlier fetch
    if cached.exists() {
        if let Ok(bytes) = fs::read(&cached) {
            return Ok(bytes);
        }
    }

    // Tier 2: fetch or read the original
    let bytes = if is_remote(url) {
        fetch_remote(url)?
    } else {
        fs::read(url).map_err(|e| format!("Failed to read {}: {}", url, e))?
    };

    if is_remote(url) {
        if let Err(e) = fs::write(&cached, &bytes) {
            eprintln!("⚠️  Failed to cache image for {}: {}", id, e);
        }
    }

    Ok(bytes)
}

/// Download an image over HTTP
fn fetch_remote(url: &str) -> Result<Vec<u8>, String> {
    let mut response = ureq::get(url)
        .call()
        .map_err(|e| format!("Request failed for {}: {}", url, e))?;

    response
        .body_mut()
        .read_to_vec()
        .map_err(|e| format!("Failed to read image body from {}: {}", url, e))
}

/// Drop the cached copy for a mix, if any. Called when a mix is deleted
/// or its url edited.
pub fn evict_cached_image(id: &str) {
    let cached = get_image_cache_dir().join(cache_file_name(id));
    if cached.exists() {
        if let Err(e) = fs::remove_file(&cached) {
            eprintln!("⚠️  Failed to evict cached image for {}: {}", id, e);
        }
    }
}
