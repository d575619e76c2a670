//! Active Workspace Context
//!
//! Leptos glue around `WorkspaceSession`: one session per providing view,
//! fed by `popstate` and `storage` events, torn down with its owner.

use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::commands::{ApiWorkspaceSource, WorkspaceListSource};
use crate::config::ConsoleConfig;
use crate::error::WorkspaceResult;
use crate::models::Workspace;
use crate::persist::{LocalStorageStore, MemoryStore, WorkspaceStore};
use crate::route::WorkspaceRoutes;
use crate::session::WorkspaceSession;
use crate::store::{store_publish, AppState, AppStateStoreFields, AppStore};
use crate::sync::{HistoryNavigator, Lifecycle};

/// Handle to the active workspace, provided via context
#[derive(Clone, Copy)]
pub struct ActiveWorkspace {
    session: StoredValue<WorkspaceSession, LocalStorage>,
    store: AppStore,
}

/// Workspace and namespace for namespace-scoped views
#[derive(Clone, Copy)]
pub struct WorkspaceInfo {
    pub workspace: Signal<String>,
    pub namespace: Signal<String>,
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

fn persisted_store(key: &str) -> Box<dyn WorkspaceStore> {
    match LocalStorageStore::new(key) {
        Some(store) => Box::new(store),
        None => {
            log::warn!("local storage unavailable, last used workspace will not survive reloads");
            Box::new(MemoryStore::default())
        }
    }
}

/// Create the session for this view and provide it to descendants
pub fn provide_active_workspace(config: &ConsoleConfig) -> WorkspaceResult<ActiveWorkspace> {
    let routes = WorkspaceRoutes::new(&config.route_segment)?;
    let lifecycle = Lifecycle::new();
    let session = WorkspaceSession::new(
        routes,
        persisted_store(&config.storage_key),
        Rc::new(ApiWorkspaceSource::new(config.workspaces_api.as_str())),
        Box::new(HistoryNavigator),
        lifecycle.clone(),
        &current_path(),
    );

    let ctx = ActiveWorkspace {
        session: StoredValue::new_local(session),
        store: Store::new(AppState::default()),
    };
    ctx.publish();
    provide_context(ctx.store);
    provide_context(ctx);

    let on_popstate = window_event_listener(ev::popstate, move |_| ctx.url_changed(&current_path()));
    let storage_key = config.storage_key.clone();
    let on_storage = window_event_listener(ev::storage, move |ev| {
        if ev.key().as_deref() == Some(storage_key.as_str()) {
            ctx.persisted_changed();
        }
    });
    on_cleanup(move || {
        lifecycle.end();
        on_popstate.remove();
        on_storage.remove();
    });

    ctx.refresh();
    Ok(ctx)
}

/// Get the active workspace handle from context
pub fn use_active_workspace() -> ActiveWorkspace {
    expect_context::<ActiveWorkspace>()
}

pub fn use_workspace_info() -> WorkspaceInfo {
    let ctx = use_active_workspace();
    WorkspaceInfo {
        workspace: Signal::derive(move || ctx.workspace()),
        namespace: Signal::derive(move || ctx.namespace()),
    }
}

impl ActiveWorkspace {
    pub fn workspace(&self) -> String {
        self.store.active().with(|s| s.workspace.clone())
    }

    pub fn namespace(&self) -> String {
        self.store.active().with(|s| s.namespace.clone())
    }

    pub fn last_used_workspace(&self) -> String {
        self.store.active().with(|s| s.last_used_workspace.clone())
    }

    pub fn workspaces(&self) -> Vec<Workspace> {
        self.store.active().with(|s| s.workspaces.clone())
    }

    pub fn workspaces_loaded(&self) -> bool {
        self.store.active().with(|s| s.workspaces_loaded)
    }

    /// Explicit selection: persisted, published and navigated immediately
    pub fn set_workspace(&self, name: &str) {
        if self.session.try_update_value(|s| s.set_workspace(name)) == Some(true) {
            self.publish();
        }
    }

    /// Reload the workspace list; an older in-flight load is superseded
    pub fn refresh(&self) {
        let Some((ticket, source)) = self.session.try_update_value(|s| s.begin_refresh()) else {
            return;
        };
        let this = *self;
        spawn_local(async move {
            let result = source.list_workspaces().await;
            if this.session.try_update_value(|s| s.finish_refresh(ticket, result)) == Some(true) {
                this.publish();
            }
        });
    }

    fn url_changed(&self, path: &str) {
        if self.session.try_update_value(|s| s.url_changed(path)) == Some(true) {
            self.publish();
        }
    }

    fn persisted_changed(&self) {
        if self.session.try_update_value(|s| s.persisted_changed()) == Some(true) {
            self.publish();
        }
    }

    fn publish(&self) {
        let snapshot = self.session.try_with_value(|s| {
            if s.lifecycle().is_alive() {
                Some((s.state().clone(), s.phase()))
            } else {
                None
            }
        });
        if let Some(Some((active, phase))) = snapshot {
            store_publish(&self.store, active, phase);
        }
    }
}
