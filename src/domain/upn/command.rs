use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{error::Error, Result};

use super::{parse_profile, IdentityDriven, ParseError, Upn};

/// Status reported when the upstream never answered.
pub const UPSTREAM_UNREACHABLE_STATUS: u16 = 502;

pub async fn fetch(identity: Arc<dyn IdentityDriven>, cmd: FetchCmd) -> Result<Upn> {
    let response = match identity.find_user(&cmd.account_id).await {
        Ok(response) => response,
        Err(error) => {
            warn!(?error, account_id = cmd.account_id, "upstream lookup failed");
            return Err(Error::NotFound(UPSTREAM_UNREACHABLE_STATUS));
        }
    };
    debug!(
        account_id = cmd.account_id,
        status = response.status,
        "upstream lookup answered"
    );

    // the upstream status is forwarded even when it was a 200
    match parse_profile(&response.body) {
        Ok(email) => Ok(Upn::from_email(&email)),
        Err(ParseError::MissingEmail) => {
            warn!(
                account_id = cmd.account_id,
                status = response.status,
                "upstream profile has no email address"
            );
            Err(Error::NotFound(response.status))
        }
        Err(ParseError::Malformed(error)) => {
            warn!(
                error,
                account_id = cmd.account_id,
                status = response.status,
                "upstream profile malformed"
            );
            Err(Error::NotFound(response.status))
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchCmd {
    pub account_id: String,
}
impl FetchCmd {
    pub fn new(account_id: String) -> Self {
        Self { account_id }
    }
}
