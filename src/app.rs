//! Workspace Console App
//!
//! Root component: owns the active-workspace session for the page.

use leptos::prelude::*;

use crate::components::{ActiveWorkspaceStatus, WorkspaceSwitcher};
use crate::config::ConsoleConfig;
use crate::context::provide_active_workspace;

#[component]
pub fn App(config: ConsoleConfig) -> impl IntoView {
    match provide_active_workspace(&config) {
        Ok(_) => view! {
            <main class="main-content">
                <WorkspaceSwitcher />
                <ActiveWorkspaceStatus />
            </main>
        }
        .into_any(),
        Err(e) => {
            log::error!("{}", e);
            view! { <p class="workspace-status error">{e.to_string()}</p> }.into_any()
        }
    }
}
