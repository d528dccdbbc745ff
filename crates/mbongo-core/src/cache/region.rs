use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fetch::FetchedResponse;

/// Region holding the application shell. Bump the version suffix whenever
/// the shell changes shape; activation purges regions that no longer match.
pub const STATIC_REGION: &str = "mbongo-static-v1";

/// Region holding API responses captured while online.
pub const DATA_REGION: &str = "mbongo-data-v1";

/// A response stored in, or about to enter, a cache region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    #[serde(rename = "contentType")]
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    #[serde(rename = "fetchedAt")]
    pub fetched_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn from_fetched(url: &str, fetched: FetchedResponse) -> Self {
        CachedResponse {
            url: url.to_string(),
            status: fetched.status,
            content_type: fetched.content_type,
            body: fetched.body,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, for JSON API responses.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One named cache region: a directory of response files keyed by URL.
///
/// Entries for the same URL overwrite each other; there is no per-entry
/// expiry and no size bound. The only eviction is whole-region removal
/// at activation time.
#[derive(Debug, Clone)]
pub struct CacheRegion {
    name: String,
    dir: PathBuf,
}

impl CacheRegion {
    pub fn open(root: &Path, name: &str) -> Result<Self> {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache region: {}", name))?;
        Ok(Self {
            name: name.to_string(),
            dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(entry_file_name(url))
    }

    /// Store a response, replacing any prior entry for the same URL.
    pub fn put(&self, response: &CachedResponse) -> Result<()> {
        let path = self.entry_path(&response.url);
        let contents = serde_json::to_vec(response)
            .with_context(|| format!("Failed to serialize cache entry: {}", response.url))?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache entry: {}", path.display()))?;
        Ok(())
    }

    /// Exact-URL lookup. Unreadable or corrupt entries count as a miss.
    pub fn get(&self, url: &str) -> Option<CachedResponse> {
        let path = self.entry_path(url);
        if !path.exists() {
            return None;
        }

        let contents = match std::fs::read(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(region = %self.name, %url, error = %e, "Failed to read cache entry");
                return None;
            }
        };

        match serde_json::from_slice(&contents) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(region = %self.name, %url, error = %e, "Failed to parse cache entry");
                None
            }
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entry_path(url).exists()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        std::fs::read_dir(&self.dir)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// File name for a URL: a readable slug plus a hash so distinct URLs never
/// collide on sanitization.
fn entry_file_name(url: &str) -> String {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    let digest = hasher.finish();

    let slug: String = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .take(48)
        .collect();

    format!("{}-{:016x}.json", slug, digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_for(url: &str, body: &str) -> CachedResponse {
        CachedResponse {
            url: url.to_string(),
            status: 200,
            content_type: Some("application/json".to_string()),
            body: body.as_bytes().to_vec(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let region = CacheRegion::open(dir.path(), STATIC_REGION).expect("open");

        let url = "https://wallet.example.com/api/balance";
        assert!(region.get(url).is_none());

        region.put(&response_for(url, "{\"balance\":10000}")).expect("put");
        let cached = region.get(url).expect("hit");
        assert_eq!(cached.url, url);
        assert_eq!(cached.body_text(), "{\"balance\":10000}");
    }

    #[test]
    fn test_put_overwrites_same_url() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let region = CacheRegion::open(dir.path(), DATA_REGION).expect("open");

        let url = "https://wallet.example.com/api/balance";
        region.put(&response_for(url, "old")).expect("put");
        region.put(&response_for(url, "new")).expect("put");

        assert_eq!(region.len(), 1);
        assert_eq!(region.get(url).expect("hit").body_text(), "new");
    }

    #[test]
    fn test_lookup_is_exact() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let region = CacheRegion::open(dir.path(), DATA_REGION).expect("open");

        region
            .put(&response_for("https://wallet.example.com/api/balance", "x"))
            .expect("put");
        assert!(region.get("https://wallet.example.com/api/balance/").is_none());
        assert!(region.get("https://wallet.example.com/api/Balance").is_none());
    }

    #[test]
    fn test_entry_file_names_distinct_after_sanitization() {
        // Both sanitize to the same slug; the hash keeps them apart.
        let a = entry_file_name("https://w.example.com/a/b");
        let b = entry_file_name("https://w.example.com/a?b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let region = CacheRegion::open(dir.path(), DATA_REGION).expect("open");

        let url = "https://wallet.example.com/api/balance";
        region.put(&response_for(url, "ok")).expect("put");
        std::fs::write(region.entry_path(url), b"not json").expect("corrupt");

        assert!(region.get(url).is_none());
    }
}
