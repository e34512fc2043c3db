//! Use cases: one orchestrator per screen-facing operation.
//!
//! Each use case composes a remote/local repository pair under the
//! shared connectivity policy in [`policy`]. The `App*` aliases are
//! the concrete shapes the dependency container wires.

mod auth;
mod dashboard;
mod farmer;
mod news;
mod policy;
mod weather;

pub use auth::{AuthService, GetUserAccount, Registration, SaveUserAccount};
pub use dashboard::{Dashboard, FetchDashboard};
pub use farmer::{GetFarmProfile, SaveFarmProfile, ValidateFarmProfile};
pub use news::{FetchNews, LikeArticle};
pub use policy::{read_through, write_through, DataSource, ReadOutcome, WriteOutcome};
pub use weather::FetchWeather;

use crate::models::{FarmerProfile, NewsFeed, UserAccount, WeatherSnapshot};
use crate::repos::{
    LocalRepository, RemoteFarmerRepository, RemoteNewsRepository, RemoteUserRepository,
    RemoteWeatherRepository,
};

pub type AppGetFarmProfile =
    GetFarmProfile<RemoteFarmerRepository, LocalRepository<FarmerProfile>>;
pub type AppSaveFarmProfile =
    SaveFarmProfile<RemoteFarmerRepository, LocalRepository<FarmerProfile>>;
pub type AppFetchWeather = FetchWeather<RemoteWeatherRepository, LocalRepository<WeatherSnapshot>>;
pub type AppFetchNews = FetchNews<RemoteNewsRepository, LocalRepository<NewsFeed>>;
pub type AppLikeArticle = LikeArticle<LocalRepository<NewsFeed>>;
pub type AppGetUserAccount = GetUserAccount<RemoteUserRepository, LocalRepository<UserAccount>>;
pub type AppSaveUserAccount = SaveUserAccount<RemoteUserRepository, LocalRepository<UserAccount>>;
