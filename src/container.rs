//! Dependency container.
//!
//! Builds and owns every client, repository, and use case as a
//! process-wide singleton set. The container is a plain constructed
//! value passed down from the application root (no global state), so
//! every test builds its own. Initialization is single-flight: late
//! concurrent callers share the first caller's pass and can never
//! construct duplicate singletons.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use thiserror::Error;

use crate::config::Config;
use crate::models::{FarmerProfile, NewsFeed, UserAccount, WeatherSnapshot};
use crate::net::{Connectivity, RemoteClient};
use crate::repos::{
    LocalRepository, RemoteFarmerRepository, RemoteNewsRepository, RemoteUserRepository,
    RemoteWeatherRepository,
};
use crate::store::{EntityKind, FileStore, KeyValueStore};
use crate::sync::SyncService;
use crate::usecase::{
    AuthService, FetchDashboard, FetchNews, FetchWeather, GetFarmProfile, GetUserAccount,
    LikeArticle, SaveFarmProfile, SaveUserAccount, ValidateFarmProfile,
};

/// Registry keys, in registration order.
pub mod keys {
    pub const STORE_CACHE: &str = "store.cache";
    pub const STORE_SECURE: &str = "store.secure";
    pub const CLIENT_API: &str = "client.api";
    pub const CLIENT_WEATHER: &str = "client.weather";
    pub const CLIENT_NEWS: &str = "client.news";
    pub const CONNECTIVITY: &str = "connectivity";
    pub const REPO_FARMER_REMOTE: &str = "repo.farmer.remote";
    pub const REPO_FARMER_LOCAL: &str = "repo.farmer.local";
    pub const REPO_WEATHER_REMOTE: &str = "repo.weather.remote";
    pub const REPO_WEATHER_LOCAL: &str = "repo.weather.local";
    pub const REPO_NEWS_REMOTE: &str = "repo.news.remote";
    pub const REPO_NEWS_LOCAL: &str = "repo.news.local";
    pub const REPO_ACCOUNT_REMOTE: &str = "repo.account.remote";
    pub const REPO_ACCOUNT_LOCAL: &str = "repo.account.local";
    pub const USECASE_VALIDATE_FARM_PROFILE: &str = "usecase.validate_farm_profile";
    pub const USECASE_GET_FARM_PROFILE: &str = "usecase.get_farm_profile";
    pub const USECASE_SAVE_FARM_PROFILE: &str = "usecase.save_farm_profile";
    pub const USECASE_FETCH_WEATHER: &str = "usecase.fetch_weather";
    pub const USECASE_FETCH_NEWS: &str = "usecase.fetch_news";
    pub const USECASE_LIKE_ARTICLE: &str = "usecase.like_article";
    pub const USECASE_AUTH: &str = "usecase.auth";
    pub const USECASE_GET_ACCOUNT: &str = "usecase.get_account";
    pub const USECASE_SAVE_ACCOUNT: &str = "usecase.save_account";
    pub const USECASE_DASHBOARD: &str = "usecase.dashboard";
    pub const SYNC_SERVICE: &str = "sync.service";
}

/// Container lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

/// Wiring errors. These indicate a programming mistake and are never
/// swallowed or defaulted.
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Dependency container is not initialized")]
    NotInitialized,

    #[error("Dependency container initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Unknown dependency '{key}'. Available: {}", .available.join(", "))]
    UnknownDependency { key: String, available: Vec<String> },

    #[error("Dependency '{0}' has a different type than requested")]
    TypeMismatch(String),
}

struct Registry {
    entries: BTreeMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl Registry {
    fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    fn put<T: Send + Sync + 'static + ?Sized>(&mut self, key: &'static str, value: Arc<T>) {
        self.entries.insert(key, Box::new(value));
    }

    fn get<T: Send + Sync + 'static + ?Sized>(&self, key: &str) -> Result<Arc<T>, ContainerError> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| ContainerError::UnknownDependency {
                key: key.to_string(),
                available: self.entries.keys().map(|k| k.to_string()).collect(),
            })?;

        entry
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| ContainerError::TypeMismatch(key.to_string()))
    }
}

const STATE_UNINITIALIZED: u8 = 0;
const STATE_INITIALIZING: u8 = 1;
const STATE_READY: u8 = 2;
const STATE_FAILED: u8 = 3;

/// Owner of every wired singleton.
pub struct DependencyContainer {
    config: Config,
    state: AtomicU8,
    failure: OnceLock<String>,
    registry: OnceLock<Registry>,
    init_lock: tokio::sync::Mutex<()>,
}

impl DependencyContainer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: AtomicU8::new(STATE_UNINITIALIZED),
            failure: OnceLock::new(),
            registry: OnceLock::new(),
            init_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> ContainerState {
        match self.state.load(Ordering::Acquire) {
            STATE_INITIALIZING => ContainerState::Initializing,
            STATE_READY => ContainerState::Ready,
            STATE_FAILED => ContainerState::Failed,
            _ => ContainerState::Uninitialized,
        }
    }

    /// Builds every dependency in order: stores and clients first,
    /// then repositories, then use cases (which take repositories as
    /// constructor arguments).
    ///
    /// Idempotent and safe to call from concurrent tasks: the first
    /// caller runs the pass, late callers wait and share its outcome.
    /// Failed attempts are retried with a fixed backoff; after the
    /// configured number of attempts the container stays failed.
    pub async fn initialize(&self) -> Result<(), ContainerError> {
        let _guard = self.init_lock.lock().await;

        match self.state() {
            ContainerState::Ready => return Ok(()),
            ContainerState::Failed => {
                return Err(ContainerError::InitializationFailed(
                    self.failure.get().cloned().unwrap_or_default(),
                ));
            }
            _ => {}
        }

        self.state.store(STATE_INITIALIZING, Ordering::Release);

        let attempts = self.config.init_retry_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.build_registry() {
                Ok(registry) => {
                    let _ = self.registry.set(registry);
                    self.state.store(STATE_READY, Ordering::Release);
                    tracing::info!(attempt, "dependency container ready");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "container initialization attempt failed");
                    last_error = e;
                    if attempt < attempts {
                        tokio::time::sleep(self.config.init_retry_backoff()).await;
                    }
                }
            }
        }

        let _ = self.failure.set(last_error.clone());
        self.state.store(STATE_FAILED, Ordering::Release);
        Err(ContainerError::InitializationFailed(last_error))
    }

    /// Looks up a singleton registered under `key`.
    ///
    /// Fails loudly when called before [`initialize`](Self::initialize)
    /// completes, or for a key that was never registered.
    pub fn get<T: Send + Sync + 'static + ?Sized>(&self, key: &str) -> Result<Arc<T>, ContainerError> {
        match self.state() {
            ContainerState::Ready => {}
            ContainerState::Failed => {
                return Err(ContainerError::InitializationFailed(
                    self.failure.get().cloned().unwrap_or_default(),
                ));
            }
            _ => return Err(ContainerError::NotInitialized),
        }

        let registry = self.registry.get().ok_or(ContainerError::NotInitialized)?;
        registry.get(key)
    }

    fn build_registry(&self) -> Result<Registry, String> {
        let cfg = &self.config;
        let ns = cfg.namespace.as_str();

        // Core services
        let cache: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::open(&cfg.data_dir, ns).map_err(|e| e.to_string())?);
        let secure: Arc<dyn KeyValueStore> = Arc::new(
            FileStore::open(&cfg.data_dir, &format!("{}-secure", ns)).map_err(|e| e.to_string())?,
        );
        let api = Arc::new(
            RemoteClient::new(&cfg.api_base_url, cfg.request_timeout())
                .map_err(|e| e.to_string())?,
        );
        let weather_client = Arc::new(
            RemoteClient::new(&cfg.weather_base_url, cfg.request_timeout())
                .map_err(|e| e.to_string())?,
        );
        let news_client = Arc::new(
            RemoteClient::new(&cfg.news_base_url, cfg.request_timeout())
                .map_err(|e| e.to_string())?,
        );
        let connectivity = Connectivity::new(true);

        // Repositories
        let farmer_remote = Arc::new(RemoteFarmerRepository::new(api.clone()));
        let farmer_local: Arc<LocalRepository<FarmerProfile>> = Arc::new(LocalRepository::new(
            cache.clone(),
            ns,
            EntityKind::FarmerProfile,
        ));
        let weather_remote = Arc::new(RemoteWeatherRepository::new(weather_client.clone()));
        let weather_local: Arc<LocalRepository<WeatherSnapshot>> = Arc::new(LocalRepository::new(
            cache.clone(),
            ns,
            EntityKind::WeatherSnapshot,
        ));
        let news_remote = Arc::new(RemoteNewsRepository::new(news_client.clone()));
        let news_local: Arc<LocalRepository<NewsFeed>> =
            Arc::new(LocalRepository::new(cache.clone(), ns, EntityKind::NewsFeed));
        let account_remote = Arc::new(RemoteUserRepository::new(api.clone()));
        let account_local: Arc<LocalRepository<UserAccount>> = Arc::new(LocalRepository::new(
            secure.clone(),
            ns,
            EntityKind::UserAccount,
        ));

        // Use cases
        let validate_farm_profile = Arc::new(ValidateFarmProfile);
        let get_farm_profile = Arc::new(GetFarmProfile::new(
            connectivity.clone(),
            farmer_remote.clone(),
            farmer_local.clone(),
        ));
        let save_farm_profile = Arc::new(SaveFarmProfile::new(
            connectivity.clone(),
            farmer_remote.clone(),
            farmer_local.clone(),
        ));
        let fetch_weather = Arc::new(FetchWeather::new(
            connectivity.clone(),
            weather_remote.clone(),
            weather_local.clone(),
        ));
        let fetch_news = Arc::new(FetchNews::new(
            connectivity.clone(),
            news_remote.clone(),
            news_local.clone(),
        ));
        let like_article = Arc::new(LikeArticle::new(news_local.clone()));
        let auth = Arc::new(AuthService::new(api.clone(), account_local.clone()));
        let get_account = Arc::new(GetUserAccount::new(
            connectivity.clone(),
            account_remote.clone(),
            account_local.clone(),
        ));
        let save_account = Arc::new(SaveUserAccount::new(
            connectivity.clone(),
            account_remote.clone(),
            account_local.clone(),
        ));
        let dashboard = Arc::new(FetchDashboard::new(
            fetch_weather.clone(),
            fetch_news.clone(),
            get_farm_profile.clone(),
        ));

        let sync_service = Arc::new(SyncService::new(
            connectivity.clone(),
            api.clone(),
            farmer_local.clone(),
            farmer_remote.clone(),
            account_local.clone(),
            account_remote.clone(),
        ));

        let mut registry = Registry::new();
        registry.put(keys::STORE_CACHE, cache);
        registry.put(keys::STORE_SECURE, secure);
        registry.put(keys::CLIENT_API, api);
        registry.put(keys::CLIENT_WEATHER, weather_client);
        registry.put(keys::CLIENT_NEWS, news_client);
        registry.put(keys::CONNECTIVITY, Arc::new(connectivity));
        registry.put(keys::REPO_FARMER_REMOTE, farmer_remote);
        registry.put(keys::REPO_FARMER_LOCAL, farmer_local);
        registry.put(keys::REPO_WEATHER_REMOTE, weather_remote);
        registry.put(keys::REPO_WEATHER_LOCAL, weather_local);
        registry.put(keys::REPO_NEWS_REMOTE, news_remote);
        registry.put(keys::REPO_NEWS_LOCAL, news_local);
        registry.put(keys::REPO_ACCOUNT_REMOTE, account_remote);
        registry.put(keys::REPO_ACCOUNT_LOCAL, account_local);
        registry.put(keys::USECASE_VALIDATE_FARM_PROFILE, validate_farm_profile);
        registry.put(keys::USECASE_GET_FARM_PROFILE, get_farm_profile);
        registry.put(keys::USECASE_SAVE_FARM_PROFILE, save_farm_profile);
        registry.put(keys::USECASE_FETCH_WEATHER, fetch_weather);
        registry.put(keys::USECASE_FETCH_NEWS, fetch_news);
        registry.put(keys::USECASE_LIKE_ARTICLE, like_article);
        registry.put(keys::USECASE_AUTH, auth);
        registry.put(keys::USECASE_GET_ACCOUNT, get_account);
        registry.put(keys::USECASE_SAVE_ACCOUNT, save_account);
        registry.put(keys::USECASE_DASHBOARD, dashboard);
        registry.put(keys::SYNC_SERVICE, sync_service);

        Ok(registry)
    }
}
