use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::domain::{
    auth::{assert_credential, Credential, LocalCredential},
    error::Error,
};

const REALM: &str = r#"Basic realm="Authentication Required""#;

fn basic_regex() -> &'static Regex {
    static BASIC_REGEX: OnceLock<Regex> = OnceLock::new();
    BASIC_REGEX.get_or_init(|| Regex::new(r"^(?i:Basic)\s+(\S+)$").unwrap())
}

pub async fn require_basic_auth(
    State(local): State<Arc<LocalCredential>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(credential) = extract_credential(request.headers()) else {
        debug!("basic authentication missing or malformed");
        return Error::Unauthorized("authentication is required".into()).into_response();
    };

    if let Err(err) = assert_credential(&local, &credential) {
        return err.into_response();
    }

    next.run(request).await
}

pub fn extract_credential(headers: &HeaderMap) -> Option<Credential> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = basic_regex().captures(value)?.get(1)?.as_str();

    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credential {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn unauthorized() -> Response {
    let mut response = (StatusCode::UNAUTHORIZED, "Unauthorized Access").into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(REALM));
    response
}
