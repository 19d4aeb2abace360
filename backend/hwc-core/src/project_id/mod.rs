//! Lazily resolved, shared project id.
//!
//! # Resolution order
//! 1. `project_id` from the configuration
//! 2. `enterprise_project_id`, unless it is the `"0"` sentinel
//! 3. IAM lookup by region name (only with access key, secret key and domain id)
//! 4. The `"0"` sentinel
//!
//! # Locking
//! Readers take the shared lock. The slow path re-checks under the exclusive
//! lock, releases it for the IAM call, then re-acquires it to publish. A result
//! fetched for an older configuration generation is dropped.

pub mod iam;

pub use iam::{IamClient, IamProject};

use crate::DEFAULT_ENTERPRISE_PROJECT_ID;
use crate::IAM_ENDPOINT;
use crate::config::EffectiveConfig;
use crate::error::{CloudError, ProjectIdError};
use crate::retry::RetryEngine;

use std::sync::Arc;

use log::{debug, info, warn};
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

static GLOBAL: Lazy<Arc<ProjectIdResolver>> = Lazy::new(|| Arc::new(ProjectIdResolver::new()));

#[derive(Debug, Default)]
struct CacheState {
    config: Option<Arc<EffectiveConfig>>,
    project_id: String,
    loaded: bool,
    /// Bumped by every re-init and refresh.
    generation: u64,
}

enum Resolution {
    Ready(String),
    Fetch {
        config: Arc<EffectiveConfig>,
        generation: u64,
    },
}

#[derive(Debug)]
pub struct ProjectIdResolver {
    state: RwLock<CacheState>,
    /// Built on first remote lookup unless injected.
    iam: OnceCell<IamClient>,
}

impl Default for ProjectIdResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectIdResolver {
    /// Uninitialised resolver talking to the public IAM endpoint.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            iam: OnceCell::new(),
        }
    }

    pub fn with_iam_client(iam: IamClient) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            iam: OnceCell::with_value(iam),
        }
    }

    /// Process-wide instance.
    pub fn global() -> &'static Arc<ProjectIdResolver> {
        &GLOBAL
    }

    /// Bind a configuration and drop any cached id. Resolution stays lazy.
    pub fn init_with_config(&self, config: &EffectiveConfig) {
        let mut state = self.state.write();
        state.config = Some(Arc::new(config.clone()));
        state.project_id.clear();
        state.loaded = false;
        state.generation = state.generation.wrapping_add(1);
        debug!("Project id resolver initialised (generation {})", state.generation);
    }

    /// Resolve the project id, caching it.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectIdError::NotInitialized`] if [`Self::init_with_config`]
    /// was never called. Lookup failures fall back to `"0"`.
    pub async fn project_id(&self) -> Result<String, ProjectIdError> {
        loop {
            let (config, generation) = match self.resolve_locally()? {
                Resolution::Ready(project_id) => return Ok(project_id),
                Resolution::Fetch { config, generation } => (config, generation),
            };

            let fetched = self.fetch_remote(&config).await;

            if let Some(project_id) = self.publish(generation, fetched) {
                return Ok(project_id);
            }
            debug!("Configuration changed during project id lookup, resolving again");
        }
    }

    /// Drop the cached id and resolve it again.
    ///
    /// # Errors
    ///
    /// Same as [`Self::project_id`].
    pub async fn refresh_project_id(&self) -> Result<String, ProjectIdError> {
        {
            let mut state = self.state.write();
            state.loaded = false;
            state.project_id.clear();
            state.generation = state.generation.wrapping_add(1);
        }
        info!("Refreshing project id");
        self.project_id().await
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    /// Cached id without triggering resolution. Empty when not loaded.
    pub fn cached_project_id(&self) -> String {
        self.state.read().project_id.clone()
    }

    fn resolve_locally(&self) -> Result<Resolution, ProjectIdError> {
        {
            let state = self.state.read();
            if state.loaded {
                return Ok(Resolution::Ready(state.project_id.clone()));
            }
        }

        let mut state = self.state.write();
        if state.loaded {
            return Ok(Resolution::Ready(state.project_id.clone()));
        }

        let Some(config) = state.config.clone() else {
            return Err(ProjectIdError::not_initialized());
        };

        let credentials = &config.credentials;
        let local = if !credentials.project_id.is_empty() {
            Some(credentials.project_id.clone())
        } else if !credentials.enterprise_project_id.is_empty()
            && credentials.enterprise_project_id != DEFAULT_ENTERPRISE_PROJECT_ID
        {
            Some(credentials.enterprise_project_id.clone())
        } else if !credentials.can_query_iam() {
            Some(DEFAULT_ENTERPRISE_PROJECT_ID.to_string())
        } else {
            None
        };

        match local {
            Some(project_id) => {
                debug!("Project id resolved from configuration: {project_id}");
                state.project_id = project_id.clone();
                state.loaded = true;
                Ok(Resolution::Ready(project_id))
            }
            None => Ok(Resolution::Fetch {
                generation: state.generation,
                config,
            }),
        }
    }

    /// Commit `project_id` unless the generation moved on. Returns the cached value.
    fn publish(&self, generation: u64, project_id: String) -> Option<String> {
        let mut state = self.state.write();
        if state.generation != generation {
            return None;
        }
        if !state.loaded {
            state.project_id = project_id;
            state.loaded = true;
        }
        Some(state.project_id.clone())
    }

    fn iam_client(&self) -> Result<&IamClient, CloudError> {
        self.iam.get_or_try_init(|| IamClient::new(IAM_ENDPOINT))
    }

    async fn fetch_remote(&self, config: &EffectiveConfig) -> String {
        let iam = match self.iam_client() {
            Ok(iam) => iam,
            Err(e) => {
                warn!("IAM client unavailable, using {DEFAULT_ENTERPRISE_PROJECT_ID}: {e}");
                return DEFAULT_ENTERPRISE_PROJECT_ID.to_string();
            }
        };

        let engine = match RetryEngine::new(config.retry_policy()) {
            Ok(engine) => engine,
            Err(e) => {
                warn!("Invalid retry policy, skipping project id lookup: {e}");
                return DEFAULT_ENTERPRISE_PROJECT_ID.to_string();
            }
        };

        let credentials = &config.credentials;
        let cancel = CancellationToken::new();
        match engine
            .execute(&cancel, || iam.project_id_for_region(credentials))
            .await
        {
            Ok(project_id) if !project_id.is_empty() => project_id,
            Ok(_) => {
                warn!("IAM returned an empty project id, using {DEFAULT_ENTERPRISE_PROJECT_ID}");
                DEFAULT_ENTERPRISE_PROJECT_ID.to_string()
            }
            Err(e) => {
                warn!("Project id lookup failed, using {DEFAULT_ENTERPRISE_PROJECT_ID}: {e}");
                DEFAULT_ENTERPRISE_PROJECT_ID.to_string()
            }
        }
    }
}
