//! Active Workspace Status Component
//!
//! One-line summary of the resolution: loading, active workspace, or none.

use leptos::prelude::*;

use crate::context::{use_active_workspace, use_workspace_info};
use crate::resolver::ResolutionPhase;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn ActiveWorkspaceStatus() -> impl IntoView {
    let store = use_app_store();
    let ctx = use_active_workspace();
    let info = use_workspace_info();

    let message = move || match store.phase().get() {
        ResolutionPhase::Uninitialized | ResolutionPhase::Loading => "Loading workspaces...".to_string(),
        ResolutionPhase::ResolvedEmpty => {
            let last_used = ctx.last_used_workspace();
            if last_used.is_empty() {
                "No active workspace".to_string()
            } else {
                format!("No active workspace (last used: {})", last_used)
            }
        }
        ResolutionPhase::Resolved => format!(
            "Workspace {} (namespace {})",
            info.workspace.get(),
            info.namespace.get()
        ),
    };

    view! {
        <p class="workspace-status">{message}</p>
    }
}
