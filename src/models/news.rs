use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed set of news categories exposed by the news backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    All,
    Crops,
    Livestock,
    Market,
    Technology,
    Weather,
}

impl NewsCategory {
    /// Query-parameter value for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::All => "all",
            NewsCategory::Crops => "crops",
            NewsCategory::Livestock => "livestock",
            NewsCategory::Market => "market",
            NewsCategory::Technology => "technology",
            NewsCategory::Weather => "weather",
        }
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single article in the news feed.
///
/// Likes are mutated optimistically on the device and never written
/// back; the server count is taken as-is on the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    /// Reading-time label, e.g. "5 min"
    pub read_time: String,
    pub likes: u32,
    pub image_url: Option<String>,
    pub category: NewsCategory,
}

/// The cached news list for one owner: the most recently fetched
/// category, overwritten on each successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsFeed {
    pub category: NewsCategory,
    pub articles: Vec<NewsArticle>,
    pub fetched_at: DateTime<Utc>,
}

impl NewsFeed {
    pub fn new(category: NewsCategory, articles: Vec<NewsArticle>) -> Self {
        Self {
            category,
            articles,
            fetched_at: Utc::now(),
        }
    }

    /// Optimistic local like. Returns the updated article, or `None`
    /// when the id is not in this feed.
    pub fn like(&mut self, article_id: &str) -> Option<&NewsArticle> {
        let article = self.articles.iter_mut().find(|a| a.id == article_id)?;
        article.likes += 1;
        Some(&*article)
    }
}
