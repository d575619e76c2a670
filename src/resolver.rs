//! Active Workspace Resolver
//!
//! Combines the URL candidate, the persisted candidate, the home workspace
//! and the loaded workspace list into one active workspace.
//!
//! `resolve` is the pure transition; `ActiveWorkspaceResolver` feeds it from
//! discrete events and owns the write-back of the home default.

use serde::{Deserialize, Serialize};

use crate::error::WorkspaceError;
use crate::home::select_home;
use crate::models::{tenant_namespace, Workspace};
use crate::persist::WorkspaceStore;

/// Lifecycle of a resolution, as seen by consumers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPhase {
    #[default]
    Uninitialized,
    /// Waiting for the workspace list
    Loading,
    Resolved,
    /// No workspace could be determined, or the list failed to load
    ResolvedEmpty,
}

/// Resolved, externally observed state
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveWorkspaceState {
    pub workspace: String,
    pub namespace: String,
    pub last_used_workspace: String,
    pub workspaces: Vec<Workspace>,
    pub workspaces_loaded: bool,
}

/// Inputs of one resolution pass
#[derive(Clone, Copy, Debug)]
pub struct ResolverInputs<'a> {
    pub url_candidate: Option<&'a str>,
    pub persisted_candidate: &'a str,
    pub workspaces: &'a [Workspace],
    pub workspaces_loaded: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub workspace: String,
    pub phase: ResolutionPhase,
    /// The home workspace was chosen and should become the persisted value
    pub capture_home: bool,
}

fn contains(workspaces: &[Workspace], name: &str) -> bool {
    !name.is_empty() && workspaces.iter().any(|ws| ws.name() == name)
}

/// Pick the active workspace. URL beats persisted beats home.
pub fn resolve(inputs: &ResolverInputs<'_>) -> Resolution {
    let (workspace, capture_home) = if !inputs.workspaces_loaded {
        return Resolution {
            workspace: String::new(),
            phase: ResolutionPhase::Loading,
            capture_home: false,
        };
    } else if let Some(url) = inputs.url_candidate.filter(|c| contains(inputs.workspaces, c)) {
        (url.to_string(), false)
    } else if contains(inputs.workspaces, inputs.persisted_candidate) {
        (inputs.persisted_candidate.to_string(), false)
    } else if let Some(home) = select_home(Some(inputs.workspaces)) {
        (home.name().to_string(), true)
    } else {
        (String::new(), false)
    };

    let phase = if workspace.is_empty() {
        ResolutionPhase::ResolvedEmpty
    } else {
        ResolutionPhase::Resolved
    };
    Resolution { workspace, phase, capture_home }
}

enum ListState {
    Pending,
    Loaded(Vec<Workspace>),
    Failed,
}

/// Event-driven resolver around `resolve`
pub struct ActiveWorkspaceResolver {
    store: Box<dyn WorkspaceStore>,
    url_candidate: Option<String>,
    list: ListState,
    /// Explicit selection, authoritative until the location names another workspace
    selection: Option<String>,
    last_resolved: Option<String>,
    state: ActiveWorkspaceState,
    phase: ResolutionPhase,
}

impl ActiveWorkspaceResolver {
    pub fn new(store: Box<dyn WorkspaceStore>) -> Self {
        Self {
            store,
            url_candidate: None,
            list: ListState::Pending,
            selection: None,
            last_resolved: None,
            state: ActiveWorkspaceState::default(),
            phase: ResolutionPhase::Uninitialized,
        }
    }

    pub fn state(&self) -> &ActiveWorkspaceState {
        &self.state
    }

    pub fn phase(&self) -> ResolutionPhase {
        self.phase
    }

    /// Start observing; the list is expected to load afterwards
    pub fn mount(&mut self, url_candidate: Option<String>) -> bool {
        self.url_candidate = url_candidate;
        self.list = ListState::Pending;
        self.recompute()
    }

    /// A location naming the current selection keeps it; any other drops it
    pub fn url_changed(&mut self, url_candidate: Option<String>) -> bool {
        if self.selection.is_some() && self.selection != url_candidate {
            self.selection = None;
        }
        self.url_candidate = url_candidate;
        self.recompute()
    }

    /// Apply the outcome of a list fetch. Failures degrade, never propagate.
    pub fn list_loaded(&mut self, result: Result<Vec<Workspace>, WorkspaceError>) -> bool {
        self.list = match result {
            Ok(workspaces) => {
                log::debug!("loaded {} workspaces", workspaces.len());
                ListState::Loaded(workspaces)
            }
            Err(e) => {
                log::error!("{}", e);
                ListState::Failed
            }
        };
        self.recompute()
    }

    /// The persisted value may have been changed by another writer
    pub fn persisted_changed(&mut self) -> bool {
        self.recompute()
    }

    /// Explicit user selection: persisted and observed immediately
    pub fn set_workspace(&mut self, name: &str) -> bool {
        log::info!("workspace '{}' selected", name);
        self.store.set(name);
        self.selection = Some(name.to_string());
        self.recompute()
    }

    fn recompute(&mut self) -> bool {
        let mut persisted = self.store.get();
        let (workspace, phase) = match &self.list {
            ListState::Loaded(workspaces) => {
                match self.selection.as_deref() {
                    Some(name) if contains(workspaces, name) => (name.to_string(), ResolutionPhase::Resolved),
                    _ => {
                        if let Some(name) = self.selection.take() {
                            log::warn!("selected workspace '{}' is not available", name);
                        }
                        let resolution = resolve(&ResolverInputs {
                            url_candidate: self.url_candidate.as_deref(),
                            persisted_candidate: &persisted,
                            workspaces,
                            workspaces_loaded: true,
                        });
                        if resolution.capture_home {
                            log::info!("defaulting to home workspace '{}'", resolution.workspace);
                            self.store.set(&resolution.workspace);
                            persisted = self.store.get();
                        }
                        (resolution.workspace, resolution.phase)
                    }
                }
            }
            ListState::Pending => (self.selection.clone().unwrap_or_default(), ResolutionPhase::Loading),
            ListState::Failed => {
                // Nothing can be validated: after an earlier success the URL
                // still beats the cached resolution; before it, stay empty.
                let url = self
                    .last_resolved
                    .as_ref()
                    .and(self.url_candidate.clone())
                    .filter(|c| !c.is_empty());
                let workspace = self
                    .selection
                    .clone()
                    .or(url)
                    .or_else(|| self.last_resolved.clone())
                    .unwrap_or_default();
                let phase = if workspace.is_empty() {
                    ResolutionPhase::ResolvedEmpty
                } else {
                    ResolutionPhase::Resolved
                };
                (workspace, phase)
            }
        };

        let workspaces = match &self.list {
            ListState::Loaded(workspaces) => workspaces.clone(),
            _ => Vec::new(),
        };
        if !workspace.is_empty() && !workspaces.is_empty() {
            self.last_resolved = Some(workspace.clone());
        }
        let namespace = workspaces
            .iter()
            .find(|ws| ws.name() == workspace)
            .map(Workspace::namespace)
            .unwrap_or_else(|| tenant_namespace(&workspace));

        let next = ActiveWorkspaceState {
            namespace,
            last_used_workspace: persisted,
            workspaces_loaded: matches!(self.list, ListState::Loaded(_)),
            workspaces,
            workspace,
        };
        let changed = next != self.state || phase != self.phase;
        if changed && next.workspace != self.state.workspace {
            log::info!("active workspace: '{}' ({:?})", next.workspace, phase);
        }
        self.state = next;
        self.phase = phase;
        changed
    }
}
