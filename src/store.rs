//! Global Application State Store
//!
//! Uses Leptos reactive_stores so views subscribe to the fields they read.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::resolver::{ActiveWorkspaceState, ResolutionPhase};

/// Published active-workspace state
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub active: ActiveWorkspaceState,
    pub phase: ResolutionPhase,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// Replace the published state, touching only fields that changed
pub fn store_publish(store: &AppStore, active: ActiveWorkspaceState, phase: ResolutionPhase) {
    if store.active().with_untracked(|current| *current != active) {
        *store.active().write() = active;
    }
    if store.phase().get_untracked() != phase {
        *store.phase().write() = phase;
    }
}
