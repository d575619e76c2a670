//! Workspace Session
//!
//! One observation of the active workspace: resolver, synchronizer and list
//! source wired together, with fetch generations and teardown handling.

use std::rc::Rc;

use crate::commands::WorkspaceListSource;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::models::Workspace;
use crate::persist::WorkspaceStore;
use crate::resolver::{ActiveWorkspaceResolver, ActiveWorkspaceState, ResolutionPhase};
use crate::route::WorkspaceRoutes;
use crate::sync::{Lifecycle, NavigationSynchronizer, Navigator};

/// Identifies one list fetch; only the newest may be applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

pub struct WorkspaceSession {
    resolver: ActiveWorkspaceResolver,
    synchronizer: NavigationSynchronizer,
    source: Rc<dyn WorkspaceListSource>,
    lifecycle: Lifecycle,
    path: String,
    generation: u64,
}

impl WorkspaceSession {
    pub fn new(
        routes: WorkspaceRoutes,
        store: Box<dyn WorkspaceStore>,
        source: Rc<dyn WorkspaceListSource>,
        navigator: Box<dyn Navigator>,
        lifecycle: Lifecycle,
        path: &str,
    ) -> Self {
        let url_candidate = routes.workspace_of(path);
        let mut resolver = ActiveWorkspaceResolver::new(store);
        resolver.mount(url_candidate);
        Self {
            resolver,
            synchronizer: NavigationSynchronizer::new(navigator, routes, lifecycle.clone()),
            source,
            lifecycle,
            path: path.to_string(),
            generation: 0,
        }
    }

    pub fn state(&self) -> &ActiveWorkspaceState {
        self.resolver.state()
    }

    pub fn phase(&self) -> ResolutionPhase {
        self.resolver.phase()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Start a list fetch, superseding any fetch still in flight
    pub fn begin_refresh(&mut self) -> (FetchTicket, Rc<dyn WorkspaceListSource>) {
        self.generation += 1;
        (FetchTicket { generation: self.generation }, Rc::clone(&self.source))
    }

    /// Apply a fetch outcome. Stale or torn-down results are discarded.
    pub fn finish_refresh(&mut self, ticket: FetchTicket, result: WorkspaceResult<Vec<Workspace>>) -> bool {
        if let Err(stale) = self.check_current(ticket) {
            log::debug!("{}", stale);
            return false;
        }
        let changed = self.resolver.list_loaded(result);
        self.synchronize() || changed
    }

    /// Fetch the list and apply it
    pub async fn refresh(&mut self) -> bool {
        let (ticket, source) = self.begin_refresh();
        let result = source.list_workspaces().await;
        self.finish_refresh(ticket, result)
    }

    pub fn url_changed(&mut self, path: &str) -> bool {
        if !self.lifecycle.is_alive() {
            return false;
        }
        self.path = path.to_string();
        let changed = self.resolver.url_changed(self.synchronizer.routes().workspace_of(path));
        self.synchronize() || changed
    }

    pub fn persisted_changed(&mut self) -> bool {
        if !self.lifecycle.is_alive() {
            return false;
        }
        let changed = self.resolver.persisted_changed();
        self.synchronize() || changed
    }

    pub fn set_workspace(&mut self, name: &str) -> bool {
        if !self.lifecycle.is_alive() {
            log::debug!("context torn down, ignoring selection of '{}'", name);
            return false;
        }
        let changed = self.resolver.set_workspace(name);
        self.synchronize() || changed
    }

    /// End the observation; pending fetches and navigations are dropped
    pub fn teardown(&self) {
        self.lifecycle.end();
    }

    fn check_current(&self, ticket: FetchTicket) -> Result<(), WorkspaceError> {
        if !self.lifecycle.is_alive() {
            return Err(WorkspaceError::StaleContext("workspace list arrived after teardown".into()));
        }
        if ticket.generation != self.generation {
            return Err(WorkspaceError::StaleContext(format!(
                "superseded fetch {} (current {})",
                ticket.generation, self.generation
            )));
        }
        Ok(())
    }

    /// Correct the location if it disagrees with the resolution
    fn synchronize(&mut self) -> bool {
        let resolved = self.resolver.state().workspace.clone();
        match self.synchronizer.sync(&resolved, &self.path) {
            Some(target) => {
                self.path = target;
                let url_candidate = self.synchronizer.routes().workspace_of(&self.path);
                self.resolver.url_changed(url_candidate)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use crate::sync::tests::RecordingNavigator;
    use async_trait::async_trait;
    use std::cell::RefCell;

    /// Returns a fixed outcome and counts calls
    struct ScriptedSource {
        result: RefCell<WorkspaceResult<Vec<Workspace>>>,
        calls: RefCell<usize>,
    }

    impl ScriptedSource {
        fn ok(workspaces: Vec<Workspace>) -> Rc<Self> {
            Rc::new(Self { result: RefCell::new(Ok(workspaces)), calls: RefCell::new(0) })
        }

        fn failing() -> Rc<Self> {
            Rc::new(Self {
                result: RefCell::new(Err(WorkspaceError::ListFetch("failed".into()))),
                calls: RefCell::new(0),
            })
        }
    }

    #[async_trait(?Send)]
    impl WorkspaceListSource for ScriptedSource {
        async fn list_workspaces(&self) -> WorkspaceResult<Vec<Workspace>> {
            *self.calls.borrow_mut() += 1;
            self.result.borrow().clone()
        }
    }

    fn mock_workspaces() -> Vec<Workspace> {
        serde_json::from_str(
            r#"[
                {
                    "apiVersion": "toolchain.dev.openshift.com/v1alpha1",
                    "kind": "Workspace",
                    "metadata": { "name": "workspace-one", "namespace": "toolchain-host-operator" },
                    "status": {
                        "type": "home",
                        "namespaces": [
                            { "name": "workspace-one-tenant", "type": "default" },
                            { "name": "myworkspace-extra" }
                        ],
                        "owner": "john",
                        "role": "admin"
                    }
                },
                {
                    "apiVersion": "toolchain.dev.openshift.com/v1alpha1",
                    "kind": "Workspace",
                    "metadata": { "name": "workspace-two", "namespace": "toolchain-host-operator" },
                    "status": {
                        "namespaces": [{ "name": "workspace-two-tenant", "type": "default" }],
                        "owner": "doe",
                        "role": "admin"
                    }
                }
            ]"#,
        )
        .unwrap()
    }

    struct Harness {
        session: WorkspaceSession,
        store: MemoryStore,
        navigator: RecordingNavigator,
    }

    fn harness(path: &str, persisted: &str, source: Rc<dyn WorkspaceListSource>) -> Harness {
        let store = MemoryStore::new(persisted);
        let navigator = RecordingNavigator::default();
        let session = WorkspaceSession::new(
            WorkspaceRoutes::new("workspaces").unwrap(),
            Box::new(store.clone()),
            source,
            Box::new(navigator.clone()),
            Lifecycle::new(),
            path,
        );
        Harness { session, store, navigator }
    }

    const APPLICATIONS: &str = "/stonesoup/workspaces/test-ws/applications";

    #[test]
    fn test_default_values() {
        let h = harness(APPLICATIONS, "test-ws", ScriptedSource::ok(mock_workspaces()));
        let state = h.session.state();
        assert_eq!(h.session.phase(), ResolutionPhase::Loading);
        assert_eq!(state.workspace, "");
        assert_eq!(state.namespace, "");
        assert_eq!(state.last_used_workspace, "test-ws");
        assert!(state.workspaces.is_empty());
        assert!(!state.workspaces_loaded);
        assert!(h.navigator.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_sets_workspaces_from_api() {
        let mut h = harness(APPLICATIONS, "", ScriptedSource::ok(mock_workspaces()));
        assert!(h.session.refresh().await);
        assert_eq!(h.session.state().workspace, "workspace-one");
        assert_eq!(h.session.state().workspaces.len(), 2);
        assert_eq!(h.store.get(), "workspace-one");
    }

    #[tokio::test]
    async fn test_home_workspace_for_first_time_user() {
        let mut workspaces = mock_workspaces();
        let mut two = workspaces.remove(1);
        two.status.get_or_insert_with(Default::default).status_type = Some("home".into());

        let mut h = harness(APPLICATIONS, "", ScriptedSource::ok(vec![two]));
        h.session.refresh().await;
        assert_eq!(h.session.state().workspace, "workspace-two");
        assert_eq!(h.session.state().namespace, "workspace-two-tenant");
    }

    #[tokio::test]
    async fn test_api_error_with_teardown() {
        let mut h = harness(APPLICATIONS, "", ScriptedSource::failing());
        let (ticket, source) = h.session.begin_refresh();
        h.session.teardown();
        let result = source.list_workspaces().await;

        assert!(!h.session.finish_refresh(ticket, result));
        assert_eq!(h.session.state().workspace, "");
        assert!(h.session.state().workspaces.is_empty());
        assert!(!h.session.state().workspaces_loaded);
        assert!(h.navigator.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_settles_empty() {
        let mut h = harness(APPLICATIONS, "", ScriptedSource::failing());
        h.session.refresh().await;
        assert_eq!(h.session.phase(), ResolutionPhase::ResolvedEmpty);
        assert_eq!(h.session.state().workspace, "");
        assert!(!h.session.state().workspaces_loaded);
        assert!(h.navigator.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_selects_workspace_from_url() {
        let mut h = harness(
            "/stonesoup/workspaces/workspace-two/applications",
            "workspace-one",
            ScriptedSource::ok(mock_workspaces()),
        );
        h.session.refresh().await;
        assert_eq!(h.session.state().workspace, "workspace-two");
        assert!(h.navigator.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_persisted_when_url_invalid() {
        let mut workspaces = mock_workspaces();
        workspaces.push(Workspace::new("test-ws"));
        let mut h = harness(
            "/stonesoup/workspaces/workspace-invalid/applications",
            "test-ws",
            ScriptedSource::ok(workspaces),
        );
        h.session.refresh().await;

        assert_eq!(h.session.state().workspace, "test-ws");
        assert_eq!(*h.navigator.calls.borrow(), vec!["/stonesoup/workspaces/test-ws/applications"]);
        assert_eq!(h.session.path(), "/stonesoup/workspaces/test-ws/applications");
    }

    #[tokio::test]
    async fn test_honors_persisted_workspace() {
        let mut h = harness("/stonesoup/overview", "workspace-two", ScriptedSource::ok(mock_workspaces()));
        h.session.refresh().await;
        assert_eq!(h.session.state().workspace, "workspace-two");
    }

    #[tokio::test]
    async fn test_no_navigation_on_non_workspace_pages() {
        let mut h = harness("/stonesoup/overview", "", ScriptedSource::ok(mock_workspaces()));
        h.session.refresh().await;
        assert_eq!(h.session.state().workspace, "workspace-one");
        assert!(h.navigator.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_navigates_to_resolved_workspace() {
        let mut h = harness(APPLICATIONS, "", ScriptedSource::ok(mock_workspaces()));
        h.session.refresh().await;
        assert_eq!(
            *h.navigator.calls.borrow(),
            vec!["/stonesoup/workspaces/workspace-one/applications"]
        );
    }

    #[tokio::test]
    async fn test_repeated_resolution_is_idempotent() {
        let source = ScriptedSource::ok(mock_workspaces());
        let mut h = harness(APPLICATIONS, "", source.clone());
        h.session.refresh().await;
        let first = h.session.state().clone();

        assert!(!h.session.refresh().await);
        assert!(!h.session.persisted_changed());
        assert_eq!(h.session.state(), &first);
        assert_eq!(h.navigator.calls.borrow().len(), 1);
        assert_eq!(*source.calls.borrow(), 2);
    }

    #[tokio::test]
    async fn test_superseded_fetch_is_discarded() {
        let mut h = harness(APPLICATIONS, "", ScriptedSource::ok(mock_workspaces()));
        let (old, _) = h.session.begin_refresh();
        let (current, _) = h.session.begin_refresh();

        assert!(!h.session.finish_refresh(old, Ok(vec![Workspace::new("stale")])));
        assert!(!h.session.state().workspaces_loaded);

        assert!(h.session.finish_refresh(current, Ok(mock_workspaces())));
        assert_eq!(h.session.state().workspace, "workspace-one");
    }

    #[tokio::test]
    async fn test_set_workspace_navigates_and_persists() {
        let mut h = harness(APPLICATIONS, "", ScriptedSource::ok(mock_workspaces()));
        h.session.refresh().await;

        assert!(h.session.set_workspace("workspace-two"));
        assert_eq!(h.store.get(), "workspace-two");
        assert_eq!(h.session.state().workspace, "workspace-two");
        assert_eq!(
            h.navigator.calls.borrow().last().map(String::as_str),
            Some("/stonesoup/workspaces/workspace-two/applications")
        );
        assert_eq!(h.session.path(), "/stonesoup/workspaces/workspace-two/applications");
    }

    #[tokio::test]
    async fn test_set_workspace_off_route_does_not_navigate() {
        let mut h = harness("/stonesoup/overview", "", ScriptedSource::ok(mock_workspaces()));
        h.session.refresh().await;
        h.session.set_workspace("workspace-two");
        assert_eq!(h.session.state().workspace, "workspace-two");
        assert!(h.navigator.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_url_change_after_load() {
        let mut h = harness("/stonesoup/overview", "", ScriptedSource::ok(mock_workspaces()));
        h.session.refresh().await;
        assert!(h.session.url_changed("/stonesoup/workspaces/workspace-two/components"));
        assert_eq!(h.session.state().workspace, "workspace-two");
        assert!(h.navigator.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_set_workspace_while_loading_on_workspace_route() {
        let mut h = harness(APPLICATIONS, "", ScriptedSource::ok(mock_workspaces()));
        assert!(h.session.set_workspace("workspace-two"));

        assert_eq!(h.store.get(), "workspace-two");
        assert_eq!(h.session.path(), "/stonesoup/workspaces/workspace-two/applications");
        assert_eq!(h.session.state().workspace, "workspace-two");
        assert_eq!(h.session.phase(), ResolutionPhase::Loading);

        h.session.refresh().await;
        assert_eq!(h.session.state().workspace, "workspace-two");
        assert_eq!(
            *h.navigator.calls.borrow(),
            vec!["/stonesoup/workspaces/workspace-two/applications"]
        );
    }

    #[tokio::test]
    async fn test_set_workspace_after_list_failure_on_workspace_route() {
        let source = ScriptedSource::ok(mock_workspaces());
        let mut h = harness(APPLICATIONS, "", source.clone());
        h.session.refresh().await;
        *source.result.borrow_mut() = Err(WorkspaceError::ListFetch("failed".into()));
        h.session.refresh().await;
        assert_eq!(h.session.state().workspace, "workspace-one");

        h.session.set_workspace("workspace-two");
        assert_eq!(h.session.state().workspace, "workspace-two");
        assert_eq!(h.session.path(), "/stonesoup/workspaces/workspace-two/applications");

        h.session.persisted_changed();
        assert_eq!(h.session.state().workspace, "workspace-two");
        assert_eq!(
            *h.navigator.calls.borrow(),
            vec![
                "/stonesoup/workspaces/workspace-one/applications",
                "/stonesoup/workspaces/workspace-two/applications",
            ]
        );
    }

    #[tokio::test]
    async fn test_location_wins_over_cache_after_list_failure() {
        let source = ScriptedSource::ok(mock_workspaces());
        let mut h = harness("/stonesoup/overview", "", source.clone());
        h.session.refresh().await;
        *source.result.borrow_mut() = Err(WorkspaceError::ListFetch("failed".into()));
        h.session.refresh().await;

        h.session.url_changed("/stonesoup/workspaces/workspace-two/components");
        assert_eq!(h.session.state().workspace, "workspace-two");
        h.session.url_changed("/stonesoup/workspaces/workspace-one/components");
        assert_eq!(h.session.state().workspace, "workspace-one");
        assert!(h.navigator.calls.borrow().is_empty());
    }

    #[test]
    fn test_updates_ignored_after_teardown() {
        let mut h = harness(APPLICATIONS, "", ScriptedSource::ok(mock_workspaces()));
        h.session.teardown();
        assert!(!h.session.set_workspace("workspace-two"));
        assert!(!h.session.url_changed("/stonesoup/workspaces/workspace-two/applications"));
        assert_eq!(h.store.get(), "");
        assert!(!h.session.lifecycle().is_alive());
    }
}
