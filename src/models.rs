//! Frontend Models
//!
//! Data structures matching the cluster `Workspace` resource.

use serde::{Deserialize, Serialize};

/// Status type marking the user's home workspace
pub const HOME_WORKSPACE_TYPE: &str = "home";

/// Namespace type marking the workspace's default namespace
const DEFAULT_NAMESPACE_TYPE: &str = "default";

/// Suffix of the derived namespace when the status lists none
const TENANT_SUFFIX: &str = "-tenant";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Backing namespace listed under a workspace's status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceNamespace {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub namespace_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceStatus {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub status_type: Option<String>,
    #[serde(default)]
    pub namespaces: Vec<WorkspaceNamespace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Workspace data structure (matches the cluster resource)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkspaceStatus>,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta { name: name.into(), namespace: None },
            status: None,
        }
    }

    /// Mark this workspace as the user's home workspace
    pub fn home(mut self) -> Self {
        self.status.get_or_insert_with(Default::default).status_type =
            Some(HOME_WORKSPACE_TYPE.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn status_type(&self) -> Option<&str> {
        self.status.as_ref()?.status_type.as_deref()
    }

    pub fn is_home(&self) -> bool {
        self.status_type() == Some(HOME_WORKSPACE_TYPE)
    }

    pub fn owner(&self) -> Option<&str> {
        self.status.as_ref()?.owner.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.status.as_ref()?.role.as_deref()
    }

    /// Effective resource namespace for this workspace.
    ///
    /// Prefers the status namespace typed `default`, then the first listed
    /// namespace, then `<name>-tenant`.
    pub fn namespace(&self) -> String {
        let namespaces = self.status.as_ref().map(|s| s.namespaces.as_slice()).unwrap_or_default();
        namespaces
            .iter()
            .find(|ns| ns.namespace_type.as_deref() == Some(DEFAULT_NAMESPACE_TYPE))
            .or_else(|| namespaces.first())
            .map(|ns| ns.name.clone())
            .unwrap_or_else(|| tenant_namespace(self.name()))
    }
}

/// Namespace assumed for a workspace whose record is not (yet) known
pub fn tenant_namespace(workspace: &str) -> String {
    if workspace.is_empty() {
        String::new()
    } else {
        format!("{}{}", workspace, TENANT_SUFFIX)
    }
}

/// Kubernetes list envelope returned by the workspaces API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkspaceList {
    #[serde(default)]
    pub items: Vec<Workspace>,
}
