use std::sync::Arc;

use axum::extract::{Path, State};

use crate::domain::{
    upn::{self, IdentityDriven},
    Result,
};

pub async fn get_upn(
    State(identity): State<Arc<dyn IdentityDriven>>,
    Path(account_id): Path<String>,
) -> Result<String> {
    let cmd = upn::command::FetchCmd::new(account_id);

    let upn = upn::command::fetch(identity, cmd).await?;

    Ok(upn.to_string())
}
