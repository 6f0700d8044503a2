use std::fmt::Display;

use serde::Deserialize;

use crate::domain::Result;

pub mod command;

/// Raw answer of the upstream user lookup, the status is kept so it can be
/// forwarded to the caller when the body is unusable.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[async_trait::async_trait]
pub trait IdentityDriven: Send + Sync {
    async fn find_user(&self, account_id: &str) -> Result<UpstreamResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upn(String);
impl Upn {
    /// Everything before the first `@`, or the whole value when there is none.
    pub fn from_email(email: &str) -> Self {
        let local_part = email
            .split_once('@')
            .map(|(local_part, _)| local_part)
            .unwrap_or(email);

        Self(local_part.to_string())
    }
}
impl Display for Upn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Deserialize)]
struct Profile {
    #[serde(rename = "emailAddress")]
    email_address: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    Malformed(String),
    MissingEmail,
}

pub fn parse_profile(body: &[u8]) -> std::result::Result<String, ParseError> {
    let profile: Profile =
        serde_json::from_slice(body).map_err(|err| ParseError::Malformed(err.to_string()))?;

    profile.email_address.ok_or(ParseError::MissingEmail)
}
