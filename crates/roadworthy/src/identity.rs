//! Authenticated principal handed in by the identity provider.
//!
//! The service trusts an upstream gateway to authenticate callers and to
//! forward the result as `x-user-id`, `x-user-email`, and `x-user-roles`
//! headers. Handlers extract a [`Principal`] from those headers and enforce
//! role guards with [`Principal::require`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_ROLES_HEADER: &str = "x-user-roles";

/// Identifier wrapper for directory users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Access roles a user may hold; a user can hold several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Inspector,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Inspector => "INSPECTOR",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Some(Role::Owner),
            "INSPECTOR" => Some(Role::Inspector),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// The authenticated caller as asserted by the upstream identity provider.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn require(&self, role: Role) -> Result<(), AuthError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(AuthError::RoleRequired(role))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing identity header {0}")]
    MissingHeader(&'static str),
    #[error("invalid identity header {0}")]
    InvalidHeader(&'static str),
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    #[error("{} role required", .0.label())]
    RoleRequired(Role),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::RoleRequired(_) => StatusCode::FORBIDDEN,
            AuthError::MissingHeader(_)
            | AuthError::InvalidHeader(_)
            | AuthError::UnknownRole(_) => StatusCode::UNAUTHORIZED,
        };

        let body = axum::Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

fn header_value(parts: &Parts, name: &'static str) -> Result<String, AuthError> {
    let value = parts
        .headers
        .get(name)
        .ok_or(AuthError::MissingHeader(name))?;
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidHeader(name))?
        .trim();
    if value.is_empty() {
        return Err(AuthError::MissingHeader(name));
    }
    Ok(value.to_string())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER)?;
        let email = header_value(parts, USER_EMAIL_HEADER)?;
        let raw_roles = header_value(parts, USER_ROLES_HEADER)?;

        let mut roles = Vec::new();
        for token in raw_roles.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let role =
                Role::parse(token).ok_or_else(|| AuthError::UnknownRole(token.to_string()))?;
            if !roles.contains(&role) {
                roles.push(role);
            }
        }

        Ok(Principal {
            user_id: UserId(user_id),
            email,
            roles,
        })
    }
}
