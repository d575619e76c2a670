//! Backend Command Wrappers
//!
//! Frontend bindings to the cluster API, organized by domain.

mod workspace;

use wasm_bindgen::JsValue;

use crate::error::WorkspaceError;

pub use workspace::*;

/// Wrap a JavaScript exception raised by a fetch step
fn fetch_error(step: &str, err: JsValue) -> WorkspaceError {
    WorkspaceError::ListFetch(format!("{}: {:?}", step, err))
}
