//! Authentication and session management

mod types;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::fetch::Transport;
use crate::models::Role;

pub use types::*;

/// Client for the backend's session-cookie authentication
pub struct Auth<'a> {
    transport: &'a Transport,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// Register a new account with the given role
    pub async fn register(&self, registration: &Registration, role: Role) -> Result<RegisteredUser> {
        let username = registration.username();
        let body = RegisterBody {
            username: username.clone(),
            email: &registration.email,
            password: &registration.password,
            full_name: registration.full_name.as_deref(),
            phone: registration.phone.as_deref(),
        };

        let reply = self
            .transport
            .post("/auth/register")
            .json(&body)?
            .execute::<Value>()
            .await?;

        match AuthReply::from_value(reply)? {
            AuthReply::Created => {
                log::info!("registered {}", username);
                Ok(RegisteredUser {
                    username,
                    email: registration.email.clone(),
                    role,
                })
            }
            _ => Err(Error::Rejected("Registration failed".to_string())),
        }
    }

    /// Log in. The session cookie is kept when the client has credentials
    /// enabled.
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionUser> {
        let reply = self
            .transport
            .post("/auth/login")
            .json(credentials)?
            .execute::<Value>()
            .await?;

        match AuthReply::from_value(reply)? {
            AuthReply::LoggedIn { user } => {
                log::info!("logged in as {} ({:?})", user.username, user.role);
                Ok(user)
            }
            _ => Err(Error::Rejected("Login failed".to_string())),
        }
    }

    /// End the current session
    pub async fn logout(&self) -> Result<()> {
        let reply = self
            .transport
            .post("/auth/logout")
            .execute::<Value>()
            .await?;

        match AuthReply::from_value(reply)? {
            AuthReply::LoggedOut => Ok(()),
            _ => Err(Error::Rejected("Logout failed".to_string())),
        }
    }

    /// Check the current session
    pub async fn session(&self) -> Result<SessionInfo> {
        let reply = self.transport.get("/auth/session").execute::<Value>().await?;

        if reply.get("user").and_then(Value::as_str).is_none() {
            return Err(Error::NoActiveSession);
        }
        serde_json::from_value(reply).map_err(Error::decode)
    }
}
