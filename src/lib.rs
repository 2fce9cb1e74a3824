//! Fitness Sharks Rust Client Library
//!
//! A client for the Fitness Sharks gym backend: authentication, trainers,
//! membership and training plans, subscriptions and user administration,
//! plus the connectivity probe that finds a reachable backend and the admin
//! flows that keep trainer photos on the device.
//!
//! Every operation returns [`Result`]; the error's `Display` text is the
//! message meant for the user.

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod probe;
pub mod resources;

mod fetch;

use url::Url;

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::fetch::Transport;
use crate::models::{MembershipPlan, Trainer, TrainingPlan};
use crate::resources::{Resource, Subscriptions, Users};

pub use crate::error::{Error, Result};
pub use fitness_sharks_storage as storage;

/// The main entry point for the Fitness Sharks client.
///
/// A client is immutable: its base URL never changes. The connectivity probe
/// returns a new client rather than rewriting this one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    transport: Transport,
    options: ClientOptions,
}

impl ApiClient {
    /// Create a new client
    ///
    /// # Example
    ///
    /// ```
    /// use fitness_sharks::{ApiClient, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_base_url("http://localhost:8080/api");
    /// let client = ApiClient::new(options).unwrap();
    /// assert_eq!(client.base_url().as_str(), "http://localhost:8080/api");
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self> {
        let base_url = options.resolve_url(&options.base_url)?;
        let http_client = Transport::http_client(
            &options,
            options.request_timeout,
            options.with_credentials,
        )?;
        log::debug!("client configured for {}", base_url);

        Ok(Self {
            transport: Transport::new(http_client, base_url, options.backend_port),
            options,
        })
    }

    /// Create a client from `FITNESS_SHARKS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Login, registration, logout and session checks
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(&self.transport)
    }

    /// `/trainers`
    pub fn trainers(&self) -> Resource<'_, Trainer> {
        Resource::new(&self.transport, "/trainers")
    }

    /// `/memberships`
    pub fn memberships(&self) -> Resource<'_, MembershipPlan> {
        Resource::new(&self.transport, "/memberships")
    }

    /// `/plans`
    pub fn plans(&self) -> Resource<'_, TrainingPlan> {
        Resource::new(&self.transport, "/plans")
    }

    pub fn subscriptions(&self) -> Subscriptions<'_> {
        Subscriptions::new(&self.transport)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.transport)
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::admin::TrainerRoster;
    pub use crate::auth::{Credentials, Registration};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::probe::{find_working_backend, retry_with_probe, ConnectionReport};
    pub use crate::ApiClient;
}
