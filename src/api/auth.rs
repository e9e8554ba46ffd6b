//! Request middleware: bearer-token injection and the session-expiry policy.

use crate::config::Config;
use crate::consts::cli_consts::network::UNAUTHORIZED_EXEMPT_PREFIXES;
use log::{debug, warn};
use reqwest::RequestBuilder;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Hooks the API client runs around every request.
pub trait AuthInterceptor: Send + Sync {
    /// Decorate an outgoing request, e.g. with an `Authorization` header.
    fn decorate(&self, request: RequestBuilder) -> RequestBuilder;

    /// Called when the server answers `401` for `path` (relative to the API base URL).
    fn on_unauthorized(&self, path: &str);
}

/// Shared, cloneable holder for the session token.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    token: Arc<RwLock<Option<String>>>,
}

impl Credentials {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(token)),
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    pub fn clear(&self) {
        self.set(None);
    }
}

/// Default policy: attach `Bearer <token>`; on 401 forget the token in memory and on disk,
/// except for exempt path prefixes.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    credentials: Credentials,
    config_path: Option<PathBuf>,
    exempt_prefixes: Vec<String>,
}

impl SessionPolicy {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            config_path: None,
            exempt_prefixes: UNAUTHORIZED_EXEMPT_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Also drop the token from the config file at `path` on 401.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn with_exempt_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.exempt_prefixes = prefixes;
        self
    }

    fn is_exempt(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        self.exempt_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.trim_start_matches('/')))
    }
}

impl AuthInterceptor for SessionPolicy {
    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn on_unauthorized(&self, path: &str) {
        if self.is_exempt(path) {
            debug!("401 on exempt path {}; keeping credentials", path);
            return;
        }

        warn!("Session rejected on {}; clearing stored credentials", path);
        self.credentials.clear();
        if let Some(config_path) = &self.config_path {
            if let Err(e) = Config::forget_token(config_path) {
                warn!("Failed to clear token from {}: {}", config_path.display(), e);
            }
        }
    }
}
