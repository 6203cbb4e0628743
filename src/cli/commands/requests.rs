//! Support request command handlers

use crate::domain::RequestId;
use crate::models::{Request, RequestStatus};
use crate::services::{NewRequest, RequestQuery, RequestView};
use crate::state::SharedState;

fn status_indicator(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::New => "•",
        RequestStatus::Solved => "✓",
        RequestStatus::Rejected => "✗",
    }
}

fn print_summary(view: &RequestView) {
    let request = &view.request;
    println!(
        "{} #{} {} [{}]",
        status_indicator(request.status),
        request.id,
        request.title,
        request.category.label()
    );

    let mut line = format!(
        "  Status: {} | Created: {}",
        request.status,
        request.created_at.format("%Y-%m-%d %H:%M")
    );
    if let (Some(name), Some(email)) = (&view.owner_name, &view.owner_email) {
        line.push_str(&format!(" | Owner: {name} <{email}>"));
    }
    println!("{line}");
}

fn print_outcome(request: &Request) {
    if let Some(at) = request.solved_at {
        println!("Solved:   {}", at.format("%Y-%m-%d %H:%M"));
    }
    if let Some(at) = request.rejected_at {
        println!("Rejected: {}", at.format("%Y-%m-%d %H:%M"));
    }
    if let Some(reason) = &request.rejection_reason {
        println!("Reason:   {reason}");
    }
}

pub async fn cmd_list_requests(state: &SharedState, query: &RequestQuery) -> anyhow::Result<()> {
    let actor = state.session_actor().await?;
    let page = state.requests.list_requests(actor.as_ref(), query).await?;

    if page.items.is_empty() {
        println!("No requests found.");
        return Ok(());
    }

    println!(
        "Requests ({} matching, page {}/{})",
        page.total_count, page.page, page.total_pages
    );
    println!("{:-<70}", "");

    for view in &page.items {
        print_summary(view);
    }

    if page.page < page.total_pages {
        println!();
        println!("Next page: --page {}", page.page + 1);
    }
    Ok(())
}

pub async fn cmd_create_request(state: &SharedState, request: NewRequest) -> anyhow::Result<()> {
    let actor = state.session_actor().await?;
    let created = state
        .requests
        .create_request(actor.as_ref(), request)
        .await?;

    println!("Created request #{}: {}", created.id, created.title);
    Ok(())
}

pub async fn cmd_show_request(state: &SharedState, id: RequestId) -> anyhow::Result<()> {
    let actor = state.session_actor().await?;
    let view = state.requests.get_request(actor.as_ref(), id).await?;

    print_summary(&view);
    println!();
    println!("{}", view.request.description);
    println!();
    print_outcome(&view.request);
    Ok(())
}

pub async fn cmd_solve_request(state: &SharedState, id: RequestId) -> anyhow::Result<()> {
    let actor = state.session_actor().await?;
    let solved = state.requests.solve(actor.as_ref(), id).await?;
    println!("Request #{} marked as {}.", solved.id, solved.status);
    Ok(())
}

pub async fn cmd_reject_request(
    state: &SharedState,
    id: RequestId,
    reason: &str,
) -> anyhow::Result<()> {
    let actor = state.session_actor().await?;
    let rejected = state.requests.reject(actor.as_ref(), id, reason).await?;
    println!("Request #{} rejected.", rejected.id);
    print_outcome(&rejected);
    Ok(())
}

pub async fn cmd_delete_request(state: &SharedState, id: RequestId) -> anyhow::Result<()> {
    let actor = state.session_actor().await?;
    state.requests.delete_own(actor.as_ref(), id).await?;
    println!("Request #{id} withdrawn.");
    Ok(())
}

pub async fn cmd_purge_request(state: &SharedState, id: RequestId) -> anyhow::Result<()> {
    let actor = state.session_actor().await?;
    if state.requests.delete_admin(actor.as_ref(), id).await? {
        println!("Request #{id} deleted.");
    } else {
        println!("Request #{id} was already gone.");
    }
    Ok(())
}
