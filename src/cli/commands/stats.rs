//! Request statistics command handler

use crate::state::SharedState;

pub async fn cmd_stats(state: &SharedState) -> anyhow::Result<()> {
    let actor = state.session_actor().await?;
    let stats = state.requests.stats(actor.as_ref()).await?;

    println!("Requests: {}", stats.total);
    println!("{:-<30}", "");
    println!("  New:      {}", stats.new);
    println!("  Solved:   {}", stats.solved);
    println!("  Rejected: {}", stats.rejected);
    Ok(())
}
