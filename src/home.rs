//! Home Workspace Selection

use crate::models::Workspace;

/// Pick the workspace flagged as the user's home workspace.
///
/// Returns the first entry whose status type is exactly `home`.
/// `None` or an empty list yields `None`.
pub fn select_home(workspaces: Option<&[Workspace]>) -> Option<&Workspace> {
    workspaces?.iter().find(|ws| ws.is_home())
}
