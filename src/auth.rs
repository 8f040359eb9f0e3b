// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::http_client;

/// The slice of the identity collaborator the core consumes: id, email,
/// optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl Identity {
    /// Display name, falling back to the email local part.
    pub fn display_label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// An authenticated session as issued by the identity collaborator.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: Identity,
    pub access_token: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity service rejected request ({status}): {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// `None` means the account was created but needs email confirmation
    /// before a session is issued.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Option<AuthSession>, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    async fn current_identity(&self, access_token: &str) -> Result<Identity, AuthError>;
}

/// Password-grant client for the hosted backend's auth endpoints.
pub struct HttpAuth {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpAuth {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(HttpAuth {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }
}

async fn check(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(AuthError::Api {
        status: status.as_u16(),
        message,
    })
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<SignUpMetadata<'a>>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    full_name: &'a str,
}

#[derive(Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserPayload,
}

#[derive(Deserialize)]
struct SignUpResponse {
    user: Option<UserPayload>,
    #[serde(default)]
    session: Option<SessionPayload>,
}

#[derive(Deserialize)]
struct SessionPayload {
    access_token: String,
}

impl From<UserPayload> for Identity {
    fn from(user: UserPayload) -> Self {
        Identity {
            id: user.id,
            email: user.email,
            display_name: user.user_metadata.full_name,
        }
    }
}

#[async_trait]
impl AuthService for HttpAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let url = format!("{}?grant_type=password", self.auth_url("token"));
        let response = check(
            self.client
                .post(url)
                .header("apikey", &self.api_key)
                .json(&PasswordGrant { email, password })
                .send()
                .await?,
        )
        .await?;
        let token: TokenResponse = response.json().await?;
        Ok(AuthSession {
            identity: token.user.into(),
            access_token: token.access_token,
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Option<AuthSession>, AuthError> {
        let response = check(
            self.client
                .post(self.auth_url("signup"))
                .header("apikey", &self.api_key)
                .json(&SignUpRequest {
                    email,
                    password,
                    data: display_name.map(|full_name| SignUpMetadata { full_name }),
                })
                .send()
                .await?,
        )
        .await?;
        let payload: SignUpResponse = response.json().await?;
        match (payload.user, payload.session) {
            (Some(user), Some(session)) => Ok(Some(AuthSession {
                identity: user.into(),
                access_token: session.access_token,
            })),
            _ => Ok(None),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        check(
            self.client
                .post(self.auth_url("logout"))
                .header("apikey", &self.api_key)
                .bearer_auth(access_token)
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    async fn current_identity(&self, access_token: &str) -> Result<Identity, AuthError> {
        let response = check(
            self.client
                .get(self.auth_url("user"))
                .header("apikey", &self.api_key)
                .bearer_auth(access_token)
                .send()
                .await?,
        )
        .await?;
        let user: UserPayload = response.json().await?;
        Ok(user.into())
    }
}
