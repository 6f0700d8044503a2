use tracing::debug;

use super::{error::Error, Result};

pub type Account = String;
pub type ApiKey = String;

/// The single account/api key pair callers must present.
#[derive(Clone)]
pub struct LocalCredential {
    pub account: Account,
    pub api_key: ApiKey,
}
impl LocalCredential {
    pub fn new(account: &str, api_key: &str) -> Self {
        Self {
            account: account.to_string(),
            api_key: api_key.to_string(),
        }
    }
}
impl std::fmt::Debug for LocalCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCredential")
            .field("account", &self.account)
            .field("api_key", &"***")
            .finish()
    }
}

/// Username and password taken from a basic auth header, alive for one request.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

pub fn verify_credentials(local: &LocalCredential, username: &str, password: &str) -> bool {
    if username.is_empty() || password.is_empty() {
        return false;
    }

    username == local.account && password == local.api_key
}

pub fn assert_credential(local: &LocalCredential, credential: &Credential) -> Result<()> {
    if !verify_credentials(local, &credential.username, &credential.password) {
        debug!("credential rejected");
        return Err(Error::Unauthorized("invalid credential".into()));
    }

    Ok(())
}
