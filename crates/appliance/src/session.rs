//! Session-token authentication
//!
//! The appliance hands out a session token from `POST /rest/login-sessions`;
//! every subsequent request carries it in the `Auth` header.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated session against one appliance.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub acquired_at: DateTime<Utc>,
}

impl Session {
    /// How long ago the token was issued. The appliance expires idle
    /// sessions server-side; callers can use this to decide to re-login.
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.acquired_at
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    #[serde(rename = "userName")]
    user_name: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(rename = "sessionID")]
    session_id: String,
}

/// Authenticate against the appliance and return a session.
pub fn login(
    agent: &ureq::Agent,
    base: &str,
    username: &str,
    password: &str,
    api_version: u32,
) -> Result<Session> {
    let url = format!("{base}/rest/login-sessions");
    log::debug!("logging in to {url}");

    let mut response = agent
        .post(&url)
        .header("X-Api-Version", api_version.to_string())
        .header("Content-Type", "application/json")
        .send_json(LoginRequest {
            user_name: username,
            password,
        })
        .map_err(|err| match err {
            ureq::Error::StatusCode(401 | 403) => {
                Error::Auth(format!("login rejected for user '{username}'"))
            }
            other => other.into(),
        })?;

    let body: LoginResponse = response.body_mut().read_json()?;
    if body.session_id.is_empty() {
        return Err(Error::Auth("appliance returned an empty session token".into()));
    }

    Ok(Session {
        token: body.session_id,
        acquired_at: Utc::now(),
    })
}
