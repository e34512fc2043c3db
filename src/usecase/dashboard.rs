//! Dashboard aggregate fetch.
//!
//! The home screen needs weather, news, and the farm profile at once.
//! The three fetches fan out in parallel and each branch degrades
//! independently; the dashboard never fails as a whole.

use std::sync::Arc;

use super::policy::ReadOutcome;
use super::{AppFetchNews, AppFetchWeather, AppGetFarmProfile};
use crate::error::DataError;
use crate::models::{FarmerProfile, NewsArticle, NewsCategory, WeatherSnapshot};

/// Aggregate handed to the dashboard screen. Absent branches render
/// as placeholders.
#[derive(Debug)]
pub struct Dashboard {
    pub weather: Option<WeatherSnapshot>,
    pub news: Vec<NewsArticle>,
    pub profile: Option<FarmerProfile>,
}

/// Fans out the three dashboard fetches.
pub struct FetchDashboard {
    weather: Arc<AppFetchWeather>,
    news: Arc<AppFetchNews>,
    profile: Arc<AppGetFarmProfile>,
}

impl FetchDashboard {
    pub fn new(
        weather: Arc<AppFetchWeather>,
        news: Arc<AppFetchNews>,
        profile: Arc<AppGetFarmProfile>,
    ) -> Self {
        Self {
            weather,
            news,
            profile,
        }
    }

    pub async fn execute(&self, owner_id: &str, category: NewsCategory) -> Dashboard {
        let (weather, news, profile) = futures::join!(
            self.weather.execute(owner_id),
            self.news.execute(owner_id, category),
            self.profile.execute(owner_id),
        );

        Dashboard {
            weather: branch("weather", weather).map(|outcome| outcome.value),
            news: branch("news", news)
                .map(|outcome| outcome.value.articles)
                .unwrap_or_default(),
            profile: branch("farm-profile", profile).map(|outcome| outcome.value),
        }
    }
}

fn branch<T>(
    name: &str,
    result: Result<Option<ReadOutcome<T>>, DataError>,
) -> Option<ReadOutcome<T>> {
    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(branch = name, error = %e, "dashboard branch failed");
            None
        }
    }
}
