use std::sync::Arc;

use analyzer::Analyzer;
use config::Config;
use datastore::Datastore;
use notifier::Notifier;

pub mod analyzer;
pub mod config;
pub mod datastore;
pub mod middleware;
pub mod notifier;
pub mod points;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Datastore>,
    pub analyzer: Arc<dyn Analyzer>,
    pub notifier: Arc<dyn Notifier>,
}
