//! Workspace Routes
//!
//! Recognises workspace-scoped paths of the form
//! `<prefix>/workspaces/{name}[/<rest>]` and rewrites their workspace segment.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use crate::error::{WorkspaceError, WorkspaceResult};

/// Characters escaped when a workspace name is written into a path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Matcher for workspace-scoped routes
#[derive(Clone, Debug)]
pub struct WorkspaceRoutes {
    segment: String,
    pattern: Regex,
}

/// A path split around its workspace segment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceRoute<'a> {
    pub prefix: &'a str,
    pub workspace: String,
    pub rest: &'a str,
}

impl WorkspaceRoutes {
    pub fn new(segment: &str) -> WorkspaceResult<Self> {
        let segment = segment.trim_matches('/');
        if segment.is_empty() || segment.contains('/') {
            return Err(WorkspaceError::Config(format!("invalid route segment '{}'", segment)));
        }
        let pattern = Regex::new(&format!(
            r"^(?P<prefix>.*?)/{}/(?P<name>[^/]+)(?P<rest>/.*)?$",
            regex::escape(segment)
        ))
        .map_err(|e| WorkspaceError::Config(e.to_string()))?;
        Ok(Self { segment: segment.to_string(), pattern })
    }

    /// Split `path` if it is workspace-scoped
    pub fn parse<'a>(&self, path: &'a str) -> Option<WorkspaceRoute<'a>> {
        let caps = self.pattern.captures(path)?;
        let workspace = percent_decode_str(caps.name("name")?.as_str())
            .decode_utf8_lossy()
            .into_owned();
        Some(WorkspaceRoute {
            prefix: caps.name("prefix").map_or("", |m| m.as_str()),
            workspace,
            rest: caps.name("rest").map_or("", |m| m.as_str()),
        })
    }

    /// Workspace named by `path`, if any
    pub fn workspace_of(&self, path: &str) -> Option<String> {
        self.parse(path).map(|route| route.workspace)
    }

    /// `route` with its workspace segment replaced by `workspace`
    pub fn rewrite(&self, route: &WorkspaceRoute<'_>, workspace: &str) -> String {
        format!(
            "{}/{}/{}{}",
            route.prefix,
            self.segment,
            utf8_percent_encode(workspace, SEGMENT),
            route.rest
        )
    }
}
