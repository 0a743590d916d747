//! Bearer token authentication for mutating job endpoints.
//!
//! Handlers opt in by taking an [`AuthenticatedUser`] argument. A request
//! without a valid `Authorization: Bearer <token>` header is answered with 401
//! before the handler body runs.

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError,
    dev::Payload,
    http::{StatusCode, header},
    web,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::{Ready, ready};
use tracing::{debug, error, warn};

use crate::api::validation::ErrorResponse;

/// Authentication errors
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header
    MissingToken,

    /// Header is not "Bearer <token>"
    InvalidFormat,

    /// Signature or claims did not verify
    InvalidToken(String),

    /// Token has expired
    Expired,

    /// Signing failed while issuing a token
    Signing(String),

    /// No `JwtAuth` registered as app data
    NotConfigured,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Unauthorized: missing token"),
            AuthError::InvalidFormat => {
                write!(f, "Unauthorized: expected 'Bearer <token>'")
            }
            AuthError::InvalidToken(_) => write!(f, "Unauthorized: invalid token"),
            AuthError::Expired => write!(f, "Unauthorized: token has expired"),
            AuthError::Signing(msg) => write!(f, "Failed to sign token: {}", msg),
            AuthError::NotConfigured => write!(f, "Authentication is not configured"),
        }
    }
}

impl std::error::Error for AuthError {}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Signing(_) | AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::InvalidToken(detail) => warn!("Rejected token: {}", detail),
            AuthError::Signing(_) | AuthError::NotConfigured => error!("{}", self),
            _ => warn!("{}", self),
        }
        ErrorResponse::new(self.status_code(), self.to_string()).into_response()
    }
}

/// Token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 token issuer and validator
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 60;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `username` valid for `ttl`
    pub fn issue(&self, username: &str, is_admin: bool, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }

    /// Strip the "Bearer " prefix from an Authorization header value
    pub fn extract_token(auth_header: &str) -> Result<&str, AuthError> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidFormat)?
            .trim();

        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(token)
    }
}

/// Caller identity from a verified bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: Claims,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
    let auth = req
        .app_data::<web::Data<JwtAuth>>()
        .ok_or(AuthError::NotConfigured)?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let claims = auth.validate_token(JwtAuth::extract_token(auth_header)?)?;
    debug!("Authenticated request from {}", claims.username);

    Ok(AuthenticatedUser { claims })
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
