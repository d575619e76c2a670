//! Workspace Switcher Component
//!
//! Tab bar for switching the active workspace.

use leptos::prelude::*;

use crate::context::use_active_workspace;
use crate::models::Workspace;

fn tab_title(ws: &Workspace) -> String {
    match (ws.owner(), ws.role()) {
        (Some(owner), Some(role)) => format!("{} · {} ({})", ws.namespace(), owner, role),
        (Some(owner), None) => format!("{} · {}", ws.namespace(), owner),
        _ => ws.namespace(),
    }
}

/// Workspace Switcher component
#[component]
pub fn WorkspaceSwitcher() -> impl IntoView {
    let ctx = use_active_workspace();

    view! {
        <div class="workspace-tab-bar">
            <Show
                when=move || ctx.workspaces_loaded()
                fallback=|| view! { <span class="workspace-tab loading">"..."</span> }
            >
                <For
                    each=move || ctx.workspaces()
                    key=|ws| ws.name().to_string()
                    children=move |ws| {
                        let name = ws.name().to_string();
                        let is_active = {
                            let name = name.clone();
                            move || ctx.workspace() == name
                        };
                        let tab_class = move || {
                            if is_active() { "workspace-tab active" } else { "workspace-tab" }
                        };
                        let label = if ws.is_home() { format!("{} (home)", name) } else { name.clone() };

                        view! {
                            <button
                                class=tab_class
                                title=tab_title(&ws)
                                on:click=move |_| ctx.set_workspace(&name)
                            >
                                {label}
                            </button>
                        }
                    }
                />
            </Show>

            <button class="workspace-refresh-btn" on:click=move |_| ctx.refresh()>
                "⟳"
            </button>
        </div>
    }
}
