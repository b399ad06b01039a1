use config::Config;
use std::sync::Arc;

use services::{IncidentService, LocationService, StatsService};

pub mod cache;
pub mod config;
pub mod error;
pub mod geofence;
pub mod middleware;
pub mod models;
pub mod queue;
pub mod repository;
pub mod routes;
pub mod services;
pub mod utils;
pub mod webhook;
pub mod worker;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub incidents: Arc<IncidentService>,
    pub locations: Arc<LocationService>,
    pub stats: Arc<StatsService>,
}
