//! In-memory archive store.
//!
//! Archives live in a `RwLock`-protected list in creation order. Nothing is
//! captured from the network: new archives carry no screenshot or snapshot
//! until one is attached with `insert`.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{Archive, ArchiveError, ArchiveService, normalize_url};

const SLUG_LENGTH: usize = 8;

#[derive(Debug, Default)]
pub struct MemoryArchiveStore {
    archives: RwLock<Vec<Archive>>,
}

impl MemoryArchiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fully formed archive, replacing any archive with the same slug.
    pub async fn insert(&self, archive: Archive) {
        let mut archives = self.archives.write().await;
        archives.retain(|existing| existing.slug != archive.slug);
        archives.push(archive);
    }

    pub async fn len(&self) -> usize {
        self.archives.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.archives.read().await.is_empty()
    }
}

#[async_trait]
impl ArchiveService for MemoryArchiveStore {
    async fn create(&self, url: &str) -> Result<Archive, ArchiveError> {
        let url = normalize_url(url)?;
        let mut archives = self.archives.write().await;

        let slug = loop {
            let candidate: String = Uuid::new_v4().simple().to_string()[..SLUG_LENGTH].to_string();
            if !archives.iter().any(|archive| archive.slug == candidate) {
                break candidate;
            }
        };

        let archive = Archive {
            slug,
            url,
            title: None,
            created_at: Utc::now(),
            screenshot: None,
            snapshot: None,
        };
        debug!(slug = %archive.slug, url = %archive.url, "Archive created");
        archives.push(archive.clone());
        Ok(archive)
    }

    async fn find(&self, slug: &str) -> Result<Option<Archive>, ArchiveError> {
        let archives = self.archives.read().await;
        Ok(archives.iter().find(|archive| archive.slug == slug).cloned())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Archive>, ArchiveError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let archives = self.archives.read().await;
        Ok(archives
            .iter()
            .rev()
            .filter(|archive| {
                archive.url.to_lowercase().contains(&query)
                    || archive
                        .title
                        .as_ref()
                        .is_some_and(|title| title.to_lowercase().contains(&query))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_previous(&self, url: &str) -> Result<usize, ArchiveError> {
        let url = normalize_url(url)?;
        let archives = self.archives.read().await;
        Ok(archives.iter().filter(|archive| archive.url == url).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_find() {
        let store = MemoryArchiveStore::new();
        let archive = store.create("https://example.com").await.unwrap();

        assert_eq!(archive.slug.len(), SLUG_LENGTH);
        assert_eq!(archive.url, "https://example.com/");
        assert_eq!(store.find(&archive.slug).await.unwrap(), Some(archive));
        assert_eq!(store.find("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_rejects_invalid_urls() {
        let store = MemoryArchiveStore::new();
        assert!(matches!(
            store.create("not a url").await,
            Err(ArchiveError::InvalidUrl(_))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn search_is_newest_first_and_limited() {
        let store = MemoryArchiveStore::new();
        let first = store.create("https://rust-lang.org/learn").await.unwrap();
        let second = store.create("https://docs.rs/axum").await.unwrap();
        let third = store.create("https://rust-lang.org/tools").await.unwrap();

        let results = store.search("RUST-LANG", 10).await.unwrap();
        assert_eq!(results, vec![third.clone(), first]);

        let limited = store.search("https", 1).await.unwrap();
        assert_eq!(limited, vec![third]);

        assert_eq!(store.search("docs.rs", 10).await.unwrap(), vec![second]);

        assert!(store.search("   ", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn counts_previous_archives_of_same_url() {
        let store = MemoryArchiveStore::new();
        store.create("https://example.com").await.unwrap();
        store.create("https://example.com/").await.unwrap();
        store.create("https://example.org/").await.unwrap();

        assert_eq!(store.count_previous("https://example.com").await.unwrap(), 2);
        assert_eq!(store.count_previous("https://example.net").await.unwrap(), 0);
        assert!(store.count_previous("nope").await.is_err());
    }
}
