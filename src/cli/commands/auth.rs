//! Account and session command handlers

use crate::models::NewUser;
use crate::state::SharedState;

pub async fn cmd_register(state: &SharedState, input: NewUser) -> anyhow::Result<()> {
    let user = state.identity.register(input).await?;

    println!("Registered {} ({})", user.full_name(), user.login);
    println!("  ID: {} | Email: {}", user.id, user.email);
    println!();
    println!("Log in with: softbuy login {} <password>", user.login);
    Ok(())
}

pub async fn cmd_login(state: &SharedState, login: &str, password: &str) -> anyhow::Result<()> {
    let user = state.identity.login(login, password).await?;
    println!("Logged in as {} [{}]", user.full_name(), user.role);
    Ok(())
}

pub async fn cmd_logout(state: &SharedState) -> anyhow::Result<()> {
    if state.identity.logout().await? {
        println!("Logged out.");
    } else {
        println!("Nobody is logged in.");
    }
    Ok(())
}

pub async fn cmd_whoami(state: &SharedState) -> anyhow::Result<()> {
    let Some(user) = state.identity.current_user().await? else {
        println!("Not logged in.");
        println!();
        println!("Log in with: softbuy login <login> <password>");
        return Ok(());
    };

    println!("{} ({})", user.full_name(), user.login);
    println!("  ID: {} | Role: {} | Email: {}", user.id, user.role, user.email);
    if let Some(registered) = user.registration_date {
        println!("  Registered: {}", registered.format("%Y-%m-%d %H:%M"));
    }
    Ok(())
}
