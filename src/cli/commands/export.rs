//! Data export command handler

use std::path::Path;

use crate::services::{export_snapshot, write_export};
use crate::state::SharedState;

pub async fn cmd_export(state: &SharedState, path: Option<&Path>) -> anyhow::Result<()> {
    let actor = state.session_actor().await?;
    let export = export_snapshot(&state.store, state.clock.as_ref(), actor.as_ref()).await?;
    let written = write_export(&export, path).await?;

    println!(
        "Exported {} users and {} requests to {}",
        export.users.len(),
        export.requests.len(),
        written.display()
    );
    Ok(())
}
