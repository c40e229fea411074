//! Role gating for the HTTP API.
//!
//! Identity is established outside this service: an operator configures a
//! table of opaque access tokens, each bound to a role, and clients send
//! `Authorization: Bearer <token>`. The [`Caller`] extractor turns that header
//! into a role and handlers call [`Caller::require`] with the roles allowed to
//! run the operation.
//!
//! With an empty token table the server runs in open mode: every request is
//! accepted and no role checks apply.

use crate::error::{AppError, AppResult};
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::{ready, Ready};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Chefe,
    Funcionario,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Chefe => "chefe",
            Role::Funcionario => "funcionario",
        };
        f.write_str(name)
    }
}

/// Roles that manage workers, pallets and tasks and export the work log.
pub const MANAGERS: &[Role] = &[Role::Admin, Role::Chefe];
/// Roles that register work on the shop floor.
pub const SCANNERS: &[Role] = &[Role::Chefe, Role::Funcionario];
pub const ANY_ROLE: &[Role] = &[Role::Admin, Role::Chefe, Role::Funcionario];

/// Token to role table, shared with handlers as `web::Data<AccessTokens>`.
#[derive(Debug, Clone, Default)]
pub struct AccessTokens {
    tokens: Arc<HashMap<String, Role>>,
}

impl AccessTokens {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Role)>,
    {
        Self {
            tokens: Arc::new(entries.into_iter().collect()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn role_for(&self, token: &str) -> Option<Role> {
        self.tokens.get(token).copied()
    }
}

/// The authenticated caller of a request. `role` is `None` in open mode.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    role: Option<Role>,
}

impl Caller {
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn require(&self, allowed: &[Role]) -> AppResult<()> {
        match self.role {
            None => Ok(()),
            Some(role) if allowed.contains(&role) => Ok(()),
            Some(role) => Err(AppError::Forbidden(role.to_string())),
        }
    }

    fn from_header(tokens: &AccessTokens, header: Option<&str>) -> AppResult<Self> {
        if tokens.is_open() {
            return Ok(Caller { role: None });
        }
        let token = header
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;
        let role = tokens.role_for(token).ok_or(AppError::Unauthorized)?;
        Ok(Caller { role: Some(role) })
    }
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let result = match req.app_data::<web::Data<AccessTokens>>() {
            Some(tokens) => Caller::from_header(tokens, header),
            None => Err(AppError::Internal("access token table not configured".into())),
        };
        ready(result)
    }
}
