//! Remote news repository.

use std::sync::Arc;

use crate::error::{DataError, ErrorKind};
use crate::models::{NewsArticle, NewsCategory, NewsFeed};
use crate::net::RemoteClient;

/// Category-parameterized read side of the news backend.
///
/// News reads take a category, so this sits outside the plain
/// owner-keyed repository contract; the local cache half is still a
/// [`LocalRepository<NewsFeed>`](super::LocalRepository). There is no
/// write half: likes never leave the device.
pub trait NewsSource: Send + Sync {
    fn fetch(
        &self,
        category: NewsCategory,
    ) -> impl std::future::Future<Output = Result<NewsFeed, DataError>> + Send;
}

/// News source backed by the news backend.
pub struct RemoteNewsRepository {
    client: Arc<RemoteClient>,
}

impl RemoteNewsRepository {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

impl NewsSource for RemoteNewsRepository {
    async fn fetch(&self, category: NewsCategory) -> Result<NewsFeed, DataError> {
        let payload = self
            .client
            .get_query("/news", &[("category", category.as_str())])
            .await?;

        let articles: Vec<NewsArticle> = serde_json::from_value(payload).map_err(|e| {
            DataError::remote(ErrorKind::Unknown, format!("Unexpected news payload: {}", e))
        })?;

        Ok(NewsFeed::new(category, articles))
    }
}
