//! Vault client with a bounded query cache in front of the listing endpoint.

use color_eyre::Result;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::cache::{BoundedCache, NoopSnapshot, SnapshotStore, SqliteSnapshot};
use crate::config::Config;

use super::client::VaultClient;
use super::error::ApiError;
use super::params::QueryParams;
use super::types::{Download, FilePage};

/// Vault client that answers repeated list queries from a bounded cache.
///
/// A cache hit short-circuits the network entirely; there is no revalidation
/// or staleness check. Failed fetches are never cached. Deletes and
/// downloads always go remote.
#[derive(Clone)]
pub struct CachedVaultClient {
  inner: VaultClient,
  cache: Arc<Mutex<BoundedCache<FilePage>>>,
}

impl CachedVaultClient {
  pub fn new(config: &Config) -> Result<Self> {
    let inner = VaultClient::new(config)?;

    let store: Box<dyn SnapshotStore> = if config.cache.persist {
      Box::new(SqliteSnapshot::open()?)
    } else {
      Box::new(NoopSnapshot)
    };
    let cache = BoundedCache::new(config.cache.capacity, store);

    Ok(Self {
      inner,
      cache: Arc::new(Mutex::new(cache)),
    })
  }

  /// List one page of files, from cache when the exact query was seen before.
  pub async fn list_files(&self, params: &QueryParams) -> Result<FilePage, ApiError> {
    let inner = self.inner.clone();
    let remote_params = params.clone();

    fetch_page(&self.cache, params, move || async move {
      inner.list_files(&remote_params).await
    })
    .await
  }

  /// Number of cached pages, for the header display.
  pub fn cached_pages(&self) -> usize {
    self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
  }

  /// Drop all cached pages (the `:refresh` command).
  pub fn clear_cache(&self) {
    if let Ok(mut cache) = self.cache.lock() {
      cache.clear();
    }
  }

  pub async fn delete_file(&self, key: &str) -> Result<(), ApiError> {
    self.inner.delete_file(key).await
  }

  pub async fn download_file(&self, key: &str) -> Result<Download, ApiError> {
    self.inner.download_file(key).await
  }
}

/// Cache-or-fetch for one parameter set.
///
/// Kept free of `CachedVaultClient` so the caching contract is testable with
/// an arbitrary fetcher. The lock is never held across the await: the cache
/// mutates only in synchronous turns.
async fn fetch_page<F, Fut>(
  cache: &Mutex<BoundedCache<FilePage>>,
  params: &QueryParams,
  fetcher: F,
) -> Result<FilePage, ApiError>
where
  F: FnOnce() -> Fut,
  Fut: Future<Output = Result<FilePage, ApiError>>,
{
  let key = params.cache_key();

  let hit = lock_cache(cache)?.get(&key).cloned();
  if let Some(page) = hit {
    debug!(page = params.page, "query cache hit");
    return Ok(page);
  }

  debug!(page = params.page, "query cache miss, fetching");
  let page = fetcher().await?;

  lock_cache(cache)?.put(key, page.clone());
  Ok(page)
}

fn lock_cache(
  cache: &Mutex<BoundedCache<FilePage>>,
) -> Result<std::sync::MutexGuard<'_, BoundedCache<FilePage>>, ApiError> {
  cache
    .lock()
    .map_err(|e| ApiError::Internal(format!("cache lock poisoned: {e}")))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};

  fn empty_page() -> FilePage {
    FilePage {
      files: Vec::new(),
      total_count: Some(0),
      has_next_page: false,
    }
  }

  fn test_cache(capacity: usize) -> Mutex<BoundedCache<FilePage>> {
    Mutex::new(BoundedCache::new(capacity, Box::new(NoopSnapshot)))
  }

  async fn fetch_counting(
    cache: &Mutex<BoundedCache<FilePage>>,
    params: &QueryParams,
    calls: &Arc<AtomicU32>,
  ) -> Result<FilePage, ApiError> {
    let calls = calls.clone();
    fetch_page(cache, params, move || async move {
      calls.fetch_add(1, Ordering::SeqCst);
      Ok(empty_page())
    })
    .await
  }

  #[tokio::test]
  async fn test_identical_params_fetch_once() {
    let cache = test_cache(10);
    let params = QueryParams::default();
    let calls = Arc::new(AtomicU32::new(0));

    fetch_counting(&cache, &params, &calls).await.unwrap();
    fetch_counting(&cache, &params, &calls).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_failure_is_not_cached() {
    let cache = test_cache(10);
    let params = QueryParams::default();

    let result = fetch_page(&cache, &params, || async {
      Err(ApiError::Status(500))
    })
    .await;
    assert!(matches!(result, Err(ApiError::Status(500))));
    assert_eq!(lock_cache(&cache).unwrap().len(), 0);

    // The next call goes remote again.
    let calls = Arc::new(AtomicU32::new(0));
    fetch_counting(&cache, &params, &calls).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_unauthenticated_propagates() {
    let cache = test_cache(10);
    let result = fetch_page(&cache, &QueryParams::default(), || async {
      Err(ApiError::Unauthenticated)
    })
    .await;

    assert!(matches!(result, Err(e) if e.is_unauthenticated()));
  }

  #[tokio::test]
  async fn test_capacity_two_evicts_first_query() {
    let cache = test_cache(2);
    let calls = Arc::new(AtomicU32::new(0));

    let a = QueryParams::default();
    let b = a.next_page();
    let c = b.next_page();

    for params in [&a, &b, &c] {
      fetch_counting(&cache, params, &calls).await.unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(lock_cache(&cache).unwrap().len(), 2);

    // B and C are retained; A was evicted and misses again.
    fetch_counting(&cache, &b, &calls).await.unwrap();
    fetch_counting(&cache, &c, &calls).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    fetch_counting(&cache, &a, &calls).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
  }
}
