//! Session setup and initialization

use crate::api::ApiClient;
use crate::api::auth::{Credentials, SessionPolicy};
use crate::config::Config;
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::dashboard::{DashboardAggregator, DashboardConfig};
use crate::events::{Event, EventSender};
use log::debug;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything one CLI invocation needs to run a dashboard action.
pub struct SessionData {
    pub aggregator: DashboardAggregator,
    /// Receiving end of the aggregator's event channel
    pub event_receiver: mpsc::Receiver<Event>,
    /// Token holder shared with the request middleware
    pub credentials: Credentials,
}

/// Sets up an authenticated dashboard session
///
/// 1. Loads the stored token into a shared credentials holder
/// 2. Builds the API client with the session policy as middleware
/// 3. Creates the event channel and the aggregator
///
/// # Arguments
/// * `config` - Loaded configuration (may be logged out)
/// * `config_path` - Where the token lives, so a rejected session can be forgotten
/// * `api_url` - Resolved API base URL
/// * `dashboard_config` - Aggregator tunables
pub fn setup_session(
    config: &Config,
    config_path: PathBuf,
    api_url: String,
    dashboard_config: DashboardConfig,
) -> Result<SessionData, Box<dyn Error>> {
    debug!("Using API at {}", api_url);

    let credentials = Credentials::new(config.api_token.clone());
    let policy = SessionPolicy::new(credentials.clone()).with_config_path(config_path);
    let client = ApiClient::new(api_url, Arc::new(policy))?;

    let (events, event_receiver) = EventSender::channel(EVENT_QUEUE_SIZE);
    let aggregator = DashboardAggregator::new(Arc::new(client), events, dashboard_config);

    Ok(SessionData {
        aggregator,
        event_receiver,
        credentials,
    })
}
