use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::fetch::{FetchError, FetchedResponse, Fetcher};
use super::region::{CacheRegion, CachedResponse, DATA_REGION, STATIC_REGION};

/// Path segment that routes a request to the network-first strategy.
pub const API_MARKER: &str = "/api/";

/// Application shell fetched at install time, relative to the wallet
/// origin. Callers resolve these against their origin before installing.
pub const APP_SHELL: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.json",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Network,
    Cache,
}

#[derive(Debug, Clone)]
pub struct ServedResponse {
    pub response: CachedResponse,
    pub source: ServedFrom,
}

/// Offline request cache with two named regions.
///
/// The static region is populated once at install with the application
/// shell; the data region fills opportunistically as API requests succeed.
/// `activate` reclaims regions left behind by older versions. Request
/// handling follows two strategies: network-first with cache fallback for
/// API URLs, cache-first with network passthrough for everything else.
pub struct OfflineCache {
    root: PathBuf,
    static_region: CacheRegion,
    data_region: CacheRegion,
    fetcher: Arc<dyn Fetcher>,
    network_ok: AtomicBool,
}

impl OfflineCache {
    pub fn new(root: PathBuf, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create cache root: {}", root.display()))?;
        let static_region = CacheRegion::open(&root, STATIC_REGION)?;
        let data_region = CacheRegion::open(&root, DATA_REGION)?;

        Ok(Self {
            root,
            static_region,
            data_region,
            fetcher,
            network_ok: AtomicBool::new(true),
        })
    }

    /// Populate the static region with the application shell.
    ///
    /// All-or-nothing: every listed URL is fetched first, and nothing is
    /// stored unless all of them came back successful. Returns the number
    /// of entries stored.
    pub async fn install(&self, shell: &[&str]) -> Result<usize> {
        let fetches = shell.iter().map(|url| self.fetch_shell_asset(url));
        let responses = futures::future::try_join_all(fetches).await?;

        for response in &responses {
            self.static_region.put(response)?;
        }

        info!(
            count = responses.len(),
            region = %self.static_region.name(),
            "Installed application shell"
        );
        Ok(responses.len())
    }

    async fn fetch_shell_asset(&self, url: &str) -> Result<CachedResponse> {
        let fetched = self
            .probe_fetch(url)
            .await
            .with_context(|| format!("Failed to fetch shell asset: {}", url))?;

        if !fetched.is_success() {
            return Err(anyhow::anyhow!(
                "Shell asset {} returned status {}",
                url,
                fetched.status
            ));
        }
        Ok(CachedResponse::from_fetched(url, fetched))
    }

    /// Delete every cache region whose name is not currently recognized.
    /// This is the only eviction the cache performs. Returns the names of
    /// the purged regions.
    pub fn activate(&self) -> Result<Vec<String>> {
        let mut purged = Vec::new();

        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list cache root: {}", self.root.display()))?;
        for entry in entries {
            let entry = entry.context("Failed to read cache root entry")?;
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name == STATIC_REGION || name == DATA_REGION {
                continue;
            }

            std::fs::remove_dir_all(entry.path())
                .with_context(|| format!("Failed to remove stale cache region: {}", name))?;
            info!(region = %name, "Removed old cache region");
            purged.push(name);
        }

        Ok(purged)
    }

    /// Serve one request through the cache.
    ///
    /// API URLs never produce an `Err`: a network failure falls back to the
    /// data region, and `Ok(None)` means offline with nothing cached. For
    /// everything else a cache miss while offline is a real failure, the
    /// same as it would be with no cache at all.
    pub async fn handle(&self, url: &str) -> Result<Option<ServedResponse>, FetchError> {
        if is_api_url(url) {
            Ok(self.handle_api(url).await)
        } else {
            self.handle_static(url).await.map(Some)
        }
    }

    /// Network-first. A live reply is served as-is; successful ones are
    /// copied into the data region, overwriting any prior entry for the
    /// same URL.
    async fn handle_api(&self, url: &str) -> Option<ServedResponse> {
        match self.probe_fetch(url).await {
            Ok(fetched) => {
                let response = CachedResponse::from_fetched(url, fetched);
                if response.is_success() {
                    if let Err(e) = self.data_region.put(&response) {
                        warn!(%url, error = %e, "Failed to cache API response");
                    }
                }
                Some(ServedResponse {
                    response,
                    source: ServedFrom::Network,
                })
            }
            Err(e) => {
                debug!(%url, error = %e, "Network failed, falling back to cache");
                self.data_region.get(url).map(|response| ServedResponse {
                    response,
                    source: ServedFrom::Cache,
                })
            }
        }
    }

    /// Cache-first across both regions, then the network. A passthrough
    /// fetch is not stored.
    async fn handle_static(&self, url: &str) -> Result<ServedResponse, FetchError> {
        if let Some(response) = self.static_region.get(url).or_else(|| self.data_region.get(url)) {
            return Ok(ServedResponse {
                response,
                source: ServedFrom::Cache,
            });
        }

        let fetched = self.probe_fetch(url).await?;
        Ok(ServedResponse {
            response: CachedResponse::from_fetched(url, fetched),
            source: ServedFrom::Network,
        })
    }

    /// Fetch through the shared fetcher, recording whether the network
    /// answered at all.
    async fn probe_fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
        let result = self.fetcher.fetch(url).await;
        self.network_ok.store(result.is_ok(), Ordering::Relaxed);
        result
    }

    /// Advisory connectivity flag based on the most recent fetch. Starts
    /// optimistic; a request that fails flips it until one succeeds.
    pub fn is_offline(&self) -> bool {
        !self.network_ok.load(Ordering::Relaxed)
    }
}

/// True when the path portion of the URL contains the API marker. Query
/// strings and fragments are not considered part of the path.
fn is_api_url(url: &str) -> bool {
    let path = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    path.contains(API_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Scripted fetcher: serves canned bodies per URL, or refuses
    /// everything when offline.
    struct FakeFetcher {
        responses: Mutex<HashMap<String, (u16, String)>>,
        offline: AtomicBool,
        fetches: AtomicUsize,
    }

    impl FakeFetcher {
        fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                offline: AtomicBool::new(false),
                fetches: AtomicUsize::new(0),
            }
        }

        fn serve(&self, url: &str, status: u16, body: &str) {
            self.responses
                .lock()
                .expect("lock")
                .insert(url.to_string(), (status, body.to_string()));
        }

        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::Relaxed);
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedResponse, FetchError> {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            if self.offline.load(Ordering::Relaxed) {
                return Err(FetchError::Transport("connection refused".to_string()));
            }
            let responses = self.responses.lock().expect("lock");
            match responses.get(url) {
                Some((status, body)) => Ok(FetchedResponse {
                    status: *status,
                    content_type: Some("application/json".to_string()),
                    body: body.as_bytes().to_vec(),
                }),
                None => Ok(FetchedResponse {
                    status: 404,
                    content_type: None,
                    body: b"not found".to_vec(),
                }),
            }
        }
    }

    fn cache_with_fetcher() -> (tempfile::TempDir, Arc<FakeFetcher>, OfflineCache) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let fetcher = Arc::new(FakeFetcher::new());
        let cache = OfflineCache::new(dir.path().join("caches"), fetcher.clone())
            .expect("create cache");
        (dir, fetcher, cache)
    }

    #[tokio::test]
    async fn test_install_stores_every_shell_asset() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        fetcher.serve("/", 200, "<html>shell</html>");
        fetcher.serve("/index.html", 200, "<html>shell</html>");
        fetcher.serve("/manifest.json", 200, "{}");

        let count = cache
            .install(&["/", "/index.html", "/manifest.json"])
            .await
            .expect("install");
        assert_eq!(count, 3);
        assert!(cache.static_region.contains("/index.html"));
        assert!(cache.data_region.is_empty());
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        fetcher.serve("/", 200, "ok");
        // "/missing.js" is not scripted and comes back 404.

        let result = cache.install(&["/", "/missing.js"]).await;
        assert!(result.is_err());
        assert!(cache.static_region.is_empty()); // nothing kept from the partial run
    }

    #[tokio::test]
    async fn test_activate_purges_unrecognized_regions() {
        let (_dir, _fetcher, cache) = cache_with_fetcher();

        // A region left behind by an older version.
        std::fs::create_dir_all(cache.root.join("mbongo-static-v0")).expect("mkdir");
        std::fs::write(cache.root.join("mbongo-static-v0/stale.json"), b"{}").expect("write");

        let purged = cache.activate().expect("activate");
        assert_eq!(purged, vec!["mbongo-static-v0".to_string()]);
        assert!(!cache.root.join("mbongo-static-v0").exists());
        assert!(cache.root.join(STATIC_REGION).exists());
        assert!(cache.root.join(DATA_REGION).exists());
    }

    #[tokio::test]
    async fn test_activate_with_only_current_regions_purges_nothing() {
        let (_dir, _fetcher, cache) = cache_with_fetcher();
        let purged = cache.activate().expect("activate");
        assert!(purged.is_empty());
    }

    #[tokio::test]
    async fn test_api_request_served_live_and_cached() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        let url = "https://wallet.example.com/api/balance";
        fetcher.serve(url, 200, "{\"balance\":10000}");

        let served = cache.handle(url).await.expect("handle").expect("served");
        assert_eq!(served.source, ServedFrom::Network);
        assert_eq!(served.response.body_text(), "{\"balance\":10000}");
        assert!(cache.data_region.contains(url));
    }

    #[tokio::test]
    async fn test_api_failure_falls_back_to_cached_copy() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        let url = "https://wallet.example.com/api/balance";
        fetcher.serve(url, 200, "{\"balance\":10000}");

        cache.handle(url).await.expect("handle").expect("served");
        fetcher.set_offline(true);

        let served = cache.handle(url).await.expect("no error").expect("served");
        assert_eq!(served.source, ServedFrom::Cache);
        assert_eq!(served.response.body_text(), "{\"balance\":10000}");
    }

    #[tokio::test]
    async fn test_api_failure_without_cache_is_empty_not_error() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        fetcher.set_offline(true);

        let served = cache
            .handle("https://wallet.example.com/api/history")
            .await
            .expect("no error");
        assert!(served.is_none());
    }

    #[tokio::test]
    async fn test_api_error_status_served_but_not_cached() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        let url = "https://wallet.example.com/api/balance";
        fetcher.serve(url, 500, "boom");

        let served = cache.handle(url).await.expect("handle").expect("served");
        assert_eq!(served.response.status, 500);
        assert!(!cache.data_region.contains(url)); // only 2xx responses are kept
    }

    #[tokio::test]
    async fn test_static_served_from_cache_without_network() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        fetcher.serve("/index.html", 200, "<html>shell</html>");
        cache.install(&["/index.html"]).await.expect("install");

        fetcher.set_offline(true);
        let before = fetcher.fetches();
        let served = cache
            .handle("/index.html")
            .await
            .expect("handle")
            .expect("served");
        assert_eq!(served.source, ServedFrom::Cache);
        assert_eq!(fetcher.fetches(), before); // no network touch on a hit
    }

    #[tokio::test]
    async fn test_static_miss_passes_through_uncached() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        let url = "/pages/about.html";
        fetcher.serve(url, 200, "about");

        let served = cache.handle(url).await.expect("handle").expect("served");
        assert_eq!(served.source, ServedFrom::Network);
        assert!(!cache.static_region.contains(url));
        assert!(!cache.data_region.contains(url));
    }

    #[tokio::test]
    async fn test_static_miss_offline_fails() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        fetcher.set_offline(true);

        let result = cache.handle("/pages/about.html").await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_offline_probe_tracks_last_fetch() {
        let (_dir, fetcher, cache) = cache_with_fetcher();
        let url = "https://wallet.example.com/api/balance";
        fetcher.serve(url, 200, "{}");

        assert!(!cache.is_offline()); // optimistic before any fetch

        fetcher.set_offline(true);
        cache.handle(url).await.expect("handle");
        assert!(cache.is_offline());

        fetcher.set_offline(false);
        cache.handle(url).await.expect("handle");
        assert!(!cache.is_offline());
    }

    #[test]
    fn test_is_api_url() {
        assert!(is_api_url("https://wallet.example.com/api/balance"));
        assert!(is_api_url("/api/history"));
        assert!(!is_api_url("/index.html"));
        assert!(!is_api_url("https://wallet.example.com/assets/app.js"));
        // The marker only counts in the path, not in query or fragment.
        assert!(!is_api_url("/search?redirect=/api/balance"));
        assert!(!is_api_url("/docs#/api/usage"));
    }
}
