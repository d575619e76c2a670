//! Console Configuration
//!
//! Injected by the hosting console as `window.__WORKSPACE_CONSOLE_CONFIG__`;
//! every field is optional.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::error::{WorkspaceError, WorkspaceResult};

/// Global the hosting console may set before the plugin loads
pub const CONFIG_GLOBAL: &str = "__WORKSPACE_CONSOLE_CONFIG__";

pub const DEFAULT_STORAGE_KEY: &str = "active-workspace";
pub const DEFAULT_ROUTE_SEGMENT: &str = "workspaces";
pub const DEFAULT_WORKSPACES_API: &str = "/api/k8s/apis/toolchain.dev.openshift.com/v1alpha1/workspaces";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsoleConfig {
    /// Persisted-store key of the last used workspace
    pub storage_key: String,
    /// Path segment introducing a workspace name
    pub route_segment: String,
    /// Endpoint listing the user's workspaces
    pub workspaces_api: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            route_segment: DEFAULT_ROUTE_SEGMENT.to_string(),
            workspaces_api: DEFAULT_WORKSPACES_API.to_string(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_json(text: &str) -> WorkspaceResult<Self> {
        serde_json::from_str(text).map_err(|e| WorkspaceError::Config(e.to_string()))
    }

    /// Read the injected global; `Ok(None)` when the host set none
    pub fn from_window() -> WorkspaceResult<Option<Self>> {
        let Some(window) = web_sys::window() else {
            return Ok(None);
        };
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
            .map_err(|e| WorkspaceError::Config(format!("{:?}", e)))?;
        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value)
            .map(Some)
            .map_err(|e| WorkspaceError::Config(e.to_string()))
    }

    /// Injected config, or defaults when absent or invalid
    pub fn load() -> Self {
        match Self::from_window() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }
}
