//! Navigation Synchronizer
//!
//! Keeps the location's workspace segment in line with the resolved
//! workspace. The only place a navigation command is issued from.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::route::WorkspaceRoutes;

/// Routing capability consumed by the synchronizer
pub trait Navigator {
    /// Replace the current history entry with `path`
    fn replace(&self, path: &str);
}

/// Browser history; corrections never add back-navigation entries
pub struct HistoryNavigator;

impl Navigator for HistoryNavigator {
    fn replace(&self, path: &str) {
        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            log::warn!("history unavailable, cannot navigate to {}", path);
            return;
        };
        if let Err(e) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path)) {
            log::error!("failed to navigate to {}: {:?}", path, e);
        }
    }
}

/// Liveness of one observation context; clones share the flag.
/// Atomic because Leptos `on_cleanup` callbacks must be `Send + Sync`.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    alive: Arc<AtomicBool>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self { alive: Arc::new(AtomicBool::new(true)) }
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Tear down; later updates against this context are discarded
    pub fn end(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

pub struct NavigationSynchronizer {
    navigator: Box<dyn Navigator>,
    routes: WorkspaceRoutes,
    lifecycle: Lifecycle,
    /// Target of the last navigation, until the location confirms it
    issued: Option<String>,
}

impl NavigationSynchronizer {
    pub fn new(navigator: Box<dyn Navigator>, routes: WorkspaceRoutes, lifecycle: Lifecycle) -> Self {
        Self { navigator, routes, lifecycle, issued: None }
    }

    pub fn routes(&self) -> &WorkspaceRoutes {
        &self.routes
    }

    /// Navigate once if `path` names a workspace other than `resolved`.
    ///
    /// Returns the target path when a navigation was issued.
    pub fn sync(&mut self, resolved: &str, path: &str) -> Option<String> {
        if !self.lifecycle.is_alive() {
            log::debug!("context torn down, suppressing navigation for '{}'", resolved);
            return None;
        }
        let Some(route) = self.routes.parse(path) else {
            self.issued = None;
            return None;
        };
        if resolved.is_empty() || route.workspace == resolved {
            self.issued = None;
            return None;
        }

        let target = self.routes.rewrite(&route, resolved);
        if self.issued.as_deref() == Some(target.as_str()) {
            return None;
        }
        log::info!("redirecting {} -> {}", path, target);
        self.navigator.replace(&target);
        self.issued = Some(target.clone());
        Some(target)
    }
}
