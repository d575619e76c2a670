//! Workspace Commands
//!
//! Source of the workspaces visible to the current user.

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::fetch_error;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::models::{Workspace, WorkspaceList};

/// Asynchronous supplier of the workspace list
#[async_trait(?Send)]
pub trait WorkspaceListSource {
    async fn list_workspaces(&self) -> WorkspaceResult<Vec<Workspace>>;
}

/// Lists workspaces from the cluster API
pub struct ApiWorkspaceSource {
    url: String,
}

impl ApiWorkspaceSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait(?Send)]
impl WorkspaceListSource for ApiWorkspaceSource {
    async fn list_workspaces(&self) -> WorkspaceResult<Vec<Workspace>> {
        let body = get_text(&self.url).await?;
        parse_workspace_list(&body)
    }
}

/// Decode a Kubernetes `WorkspaceList` body
pub fn parse_workspace_list(body: &str) -> WorkspaceResult<Vec<Workspace>> {
    serde_json::from_str::<WorkspaceList>(body)
        .map(|list| list.items)
        .map_err(|e| WorkspaceError::ListFetch(format!("malformed workspace list: {}", e)))
}

async fn get_text(url: &str) -> WorkspaceResult<String> {
    let window = web_sys::window().ok_or_else(|| WorkspaceError::ListFetch("no window".into()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| fetch_error("request", e))?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(|e| fetch_error("headers", e))?;

    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| fetch_error("fetch", e))?;
    let response: Response = value.dyn_into().map_err(|e| fetch_error("response", e))?;
    if !response.ok() {
        return Err(WorkspaceError::ListFetch(format!("HTTP {} from {}", response.status(), url)));
    }

    let text = JsFuture::from(response.text().map_err(|e| fetch_error("body", e))?)
        .await
        .map_err(|e| fetch_error("body", e))?;
    text.as_string()
        .ok_or_else(|| WorkspaceError::ListFetch("response body is not text".into()))
}
