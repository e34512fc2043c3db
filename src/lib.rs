//! Zao Core Library
//!
//! Offline-first data access and sync for the Zao mobile apps: shared
//! models, remote/local repository pairs, the connectivity policy that
//! arbitrates between them, and the background sync service that
//! replays locally-held writes when the device comes back online.

pub mod config;
pub mod container;
pub mod error;
pub mod models;
pub mod net;
pub mod repos;
pub mod store;
pub mod sync;
pub mod usecase;

pub use config::{Config, ConfigError};
pub use container::{keys, ContainerError, ContainerState, DependencyContainer};
pub use error::{DataError, ErrorKind};
pub use models::{
    CurrentConditions, FarmSize, FarmerProfile, FarmerType, ForecastDay, NewsArticle,
    NewsCategory, NewsFeed, UserAccount, WeatherSnapshot,
};
pub use net::{Connectivity, RemoteClient};
pub use repos::{
    LocalRepository, NewsSource, ReadRepository, RemoteFarmerRepository, RemoteNewsRepository,
    RemoteUserRepository, RemoteWeatherRepository, WriteRepository,
};
pub use store::{cache_key, EntityKind, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use sync::{SyncReport, SyncService};
pub use usecase::{
    AuthService, Dashboard, DataSource, FetchDashboard, FetchNews, FetchWeather, GetFarmProfile,
    GetUserAccount, LikeArticle, ReadOutcome, Registration, SaveFarmProfile, SaveUserAccount,
    ValidateFarmProfile, WriteOutcome,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
