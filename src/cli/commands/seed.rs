//! Demo data command handler

use crate::services::seed_demo_data;
use crate::state::SharedState;

pub async fn cmd_seed(state: &SharedState) -> anyhow::Result<()> {
    if seed_demo_data(&state.store, state.clock.as_ref()).await? {
        println!("Demo data written: 3 users, 4 requests.");
        println!("Accounts: admin/admin, user/user123, petrov/petrov123");
    } else {
        println!("Storage already initialized; nothing to do.");
    }
    Ok(())
}
