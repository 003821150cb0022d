use std::collections::BTreeSet;

use crate::error::{NodeError, Result};

/// Known peer endpoints, deduplicated and iterated in sorted order.
#[derive(Debug, Default, Clone)]
pub struct NodeRegistry {
    nodes: BTreeSet<String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an endpoint; true if it was not known yet.
    pub fn add(&mut self, endpoint: impl Into<String>) -> bool {
        self.nodes.insert(endpoint.into())
    }

    /// Snapshot of the current endpoints.
    pub fn list(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }

    pub fn contains(&self, endpoint: &str) -> bool {
        self.nodes.contains(endpoint)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Canonical form of a peer endpoint: trimmed, `http://` added when no
/// scheme is given, no trailing slash. The host part must be non-empty.
pub fn normalize_endpoint(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let (scheme, rest) = if let Some(rest) = trimmed.strip_prefix("https://") {
        ("https://", rest)
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        ("http://", rest)
    } else {
        ("http://", trimmed)
    };
    let host = rest.trim_end_matches('/');
    if host.is_empty() || host.contains("://") || host.chars().any(char::is_whitespace) {
        return Err(NodeError::InvalidEndpoint(raw.to_string()));
    }
    Ok(format!("{scheme}{host}"))
}
