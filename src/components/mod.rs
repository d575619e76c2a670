//! UI Components
//!
//! Leptos components over the active-workspace context.

mod active_workspace_status;
mod workspace_switcher;

pub use active_workspace_status::ActiveWorkspaceStatus;
pub use workspace_switcher::WorkspaceSwitcher;
