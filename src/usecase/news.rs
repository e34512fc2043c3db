//! News feed use cases.

use std::sync::Arc;

use super::policy::{read_through, ReadOutcome};
use crate::error::DataError;
use crate::models::{NewsArticle, NewsCategory, NewsFeed};
use crate::net::Connectivity;
use crate::repos::{NewsSource, WriteRepository};

/// Fetches the news feed for a category, caching the result per owner.
pub struct FetchNews<S, L> {
    connectivity: Connectivity,
    remote: Arc<S>,
    cache: Arc<L>,
}

impl<S, L> FetchNews<S, L>
where
    S: NewsSource,
    L: WriteRepository<Entity = NewsFeed>,
{
    pub fn new(connectivity: Connectivity, remote: Arc<S>, cache: Arc<L>) -> Self {
        Self {
            connectivity,
            remote,
            cache,
        }
    }

    pub async fn execute(
        &self,
        owner_id: &str,
        category: NewsCategory,
    ) -> Result<Option<ReadOutcome<NewsFeed>>, DataError> {
        read_through(
            self.connectivity.is_online(),
            || async move { self.remote.fetch(category).await.map(Some) },
            self.cache.as_ref(),
            owner_id,
        )
        .await
    }
}

/// Optimistic local like. Never talks to the backend: there is no
/// likes write-back endpoint, so the count is device-local until the
/// next fetch overwrites it.
pub struct LikeArticle<L> {
    cache: Arc<L>,
}

impl<L> LikeArticle<L>
where
    L: WriteRepository<Entity = NewsFeed>,
{
    pub fn new(cache: Arc<L>) -> Self {
        Self { cache }
    }

    /// Returns the updated article, or `Ok(None)` when the article is
    /// not in the owner's cached feed.
    pub async fn execute(
        &self,
        owner_id: &str,
        article_id: &str,
    ) -> Result<Option<NewsArticle>, DataError> {
        let Some(mut feed) = self.cache.get(owner_id).await? else {
            return Ok(None);
        };

        let Some(updated) = feed.like(article_id).cloned() else {
            return Ok(None);
        };

        self.cache.save(&feed, owner_id).await?;
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repos::{LocalRepository, ReadRepository};
    use crate::store::{EntityKind, MemoryStore};

    struct StubNews {
        articles: Vec<NewsArticle>,
        fail: Option<ErrorKind>,
    }

    impl NewsSource for StubNews {
        async fn fetch(&self, category: NewsCategory) -> Result<NewsFeed, DataError> {
            match self.fail {
                Some(kind) => Err(DataError::remote(kind, "news backend failure")),
                None => Ok(NewsFeed::new(category, self.articles.clone())),
            }
        }
    }

    fn article(id: &str) -> NewsArticle {
        NewsArticle {
            id: id.to_string(),
            title: "Market prices this week".to_string(),
            description: "Maize and beans".to_string(),
            author: "K. Mutua".to_string(),
            read_time: "3 min".to_string(),
            likes: 5,
            image_url: None,
            category: NewsCategory::Market,
        }
    }

    fn cache() -> Arc<LocalRepository<NewsFeed>> {
        Arc::new(LocalRepository::new(
            Arc::new(MemoryStore::new()),
            "zao",
            EntityKind::NewsFeed,
        ))
    }

    #[tokio::test]
    async fn test_fetch_caches_feed_per_owner() {
        let cache = cache();
        let fetch = FetchNews::new(
            Connectivity::new(true),
            Arc::new(StubNews {
                articles: vec![article("a1")],
                fail: None,
            }),
            cache.clone(),
        );

        let outcome = fetch
            .execute("u1", NewsCategory::Market)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.value.articles.len(), 1);

        let cached = cache.get("u1").await.unwrap().unwrap();
        assert_eq!(cached.category, NewsCategory::Market);
    }

    #[tokio::test]
    async fn test_fetch_offline_serves_cached_feed() {
        let cache = cache();
        cache
            .save(&NewsFeed::new(NewsCategory::Crops, vec![article("a1")]), "u1")
            .await
            .unwrap();

        let fetch = FetchNews::new(
            Connectivity::new(false),
            Arc::new(StubNews {
                articles: Vec::new(),
                fail: Some(ErrorKind::Network),
            }),
            cache,
        );

        // The cached feed is served even when it was fetched for a
        // different category; the cache holds one feed per owner.
        let outcome = fetch
            .execute("u1", NewsCategory::All)
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.is_cached());
        assert_eq!(outcome.value.category, NewsCategory::Crops);
    }

    #[tokio::test]
    async fn test_like_increments_and_persists() {
        let cache = cache();
        cache
            .save(&NewsFeed::new(NewsCategory::Market, vec![article("a1")]), "u1")
            .await
            .unwrap();

        let like = LikeArticle::new(cache.clone());

        let updated = like.execute("u1", "a1").await.unwrap().unwrap();
        assert_eq!(updated.likes, 6);

        // The increment survived in the cache
        let cached = cache.get("u1").await.unwrap().unwrap();
        assert_eq!(cached.articles[0].likes, 6);
    }

    #[tokio::test]
    async fn test_like_unknown_article_is_none() {
        let cache = cache();
        cache
            .save(&NewsFeed::new(NewsCategory::Market, vec![article("a1")]), "u1")
            .await
            .unwrap();

        let like = LikeArticle::new(cache);
        assert!(like.execute("u1", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_like_without_cached_feed_is_none() {
        let like = LikeArticle::new(cache());
        assert!(like.execute("u1", "a1").await.unwrap().is_none());
    }
}
