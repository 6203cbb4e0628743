mod auth;
mod export;
mod requests;
mod seed;
mod stats;

pub use auth::{cmd_login, cmd_logout, cmd_register, cmd_whoami};
pub use export::cmd_export;
pub use requests::{
    cmd_create_request, cmd_delete_request, cmd_list_requests, cmd_purge_request,
    cmd_reject_request, cmd_show_request, cmd_solve_request,
};
pub use seed::cmd_seed;
pub use stats::cmd_stats;
