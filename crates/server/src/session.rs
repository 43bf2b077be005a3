// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity extraction for the server.
//!
//! Authentication is delegated to an upstream proxy, which forwards the
//! verified identity in request headers. This extractor trusts those
//! headers and turns them into a domain user.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use gymhours_api::{ApiError, authenticate_stub};
use gymhours_domain::User;
use tracing::{debug, warn};

use crate::HttpError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Extractor for the authenticated caller.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionUser { user, .. }: SessionUser,
/// ) -> Result<Json<Response>, HttpError> {
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if:
/// - An identity header is missing or not valid UTF-8
/// - The role is unknown
/// - The id or name is empty
pub struct SessionUser {
    pub user: User,
    /// Peer address, when the server was started with connect info.
    pub remote_ip: Option<String>,
}

fn header<'a>(parts: &'a Parts, name: &'static str) -> Result<&'a str, SessionError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| {
            debug!(header = name, "Missing identity header");
            SessionError::MissingHeader(name)
        })?
        .to_str()
        .map_err(|_| {
            warn!(header = name, "Invalid identity header encoding");
            SessionError::InvalidHeader(name)
        })
}

impl<S: Send + Sync> FromRequestParts<S> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)?;
        let role = header(parts, USER_ROLE_HEADER)?;
        let name = header(parts, USER_NAME_HEADER)?;

        let user = authenticate_stub(user_id, role, name).map_err(|e| {
            warn!(error = %e, "Authentication failed");
            SessionError::Rejected(e.to_string())
        })?;

        let remote_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        debug!(user_uuid = user.uuid(), role = %user.user_type(), "Caller identified");
        Ok(Self { user, remote_ip })
    }
}

/// Identity extraction errors.
#[derive(Debug)]
pub enum SessionError {
    MissingHeader(&'static str),
    InvalidHeader(&'static str),
    /// The supplied identity was rejected.
    Rejected(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let reason = match self {
            Self::MissingHeader(name) => format!("missing {name} header"),
            Self::InvalidHeader(name) => format!("invalid {name} header"),
            Self::Rejected(reason) => reason,
        };
        HttpError::from(ApiError::AuthenticationFailed { reason }).into_response()
    }
}
