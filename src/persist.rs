//! Persisted Workspace Store
//!
//! Last-used workspace name kept in durable client-side storage.
//! Reads degrade to an empty value and writes are best effort; no
//! storage failure ever reaches the caller.

use std::cell::RefCell;
use std::rc::Rc;

/// Get/set capability for the last-used workspace name
pub trait WorkspaceStore {
    /// Last-used workspace name, or `""` if never set
    fn get(&self) -> String;

    /// Overwrite the persisted value (last write wins)
    fn set(&self, name: &str);
}

/// Browser `localStorage` under a fixed key
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    /// Returns `None` when the browser exposes no usable storage
    pub fn new(key: impl Into<String>) -> Option<Self> {
        storage()?;
        Some(Self { key: key.into() })
    }
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl WorkspaceStore for LocalStorageStore {
    fn get(&self) -> String {
        storage()
            .and_then(|s| s.get_item(&self.key).ok().flatten())
            .unwrap_or_default()
    }

    fn set(&self, name: &str) {
        let Some(storage) = storage() else {
            log::warn!("local storage unavailable, dropping workspace '{}'", name);
            return;
        };
        if let Err(e) = storage.set_item(&self.key, name) {
            log::warn!("failed to persist workspace '{}': {:?}", name, e);
        }
    }
}

/// In-memory store; clones share the same value
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    value: Rc<RefCell<String>>,
}

impl MemoryStore {
    pub fn new(initial: impl Into<String>) -> Self {
        Self { value: Rc::new(RefCell::new(initial.into())) }
    }
}

impl WorkspaceStore for MemoryStore {
    fn get(&self) -> String {
        self.value.borrow().clone()
    }

    fn set(&self, name: &str) {
        *self.value.borrow_mut() = name.to_string();
    }
}
