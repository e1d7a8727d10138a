//! Fixed path redirects.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use shop_core::RoutingConfig;
use tracing::error;

/// Source path to target path. Built once at startup and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectTable {
    entries: BTreeMap<String, String>,
}

impl RedirectTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            entries: config.redirects.clone(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every distinct cycle in the table.
    ///
    /// Each cycle is listed once, rotated to start at its smallest path, with
    /// the first path repeated at the end (`["/a", "/b", "/a"]`).
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut found = BTreeSet::new();
        for source in self.entries.keys() {
            if let Resolution::Cycle(chain) = trace(source, self) {
                found.insert(normalize_cycle(&chain));
            }
        }
        found.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for RedirectTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Cut the lead-in off a traced chain and rotate the loop to a canonical start.
fn normalize_cycle(chain: &[String]) -> Vec<String> {
    let Some(repeated) = chain.last() else {
        return Vec::new();
    };
    let start = chain.iter().position(|p| p == repeated).unwrap_or(0);
    let mut ring: Vec<String> = chain[start..chain.len() - 1].to_vec();
    if let Some(min_at) = ring
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
    {
        ring.rotate_left(min_at);
    }
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    ring
}

/// Outcome of walking the table from one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No entry for the path, or the walk came back to it unchanged.
    NoRedirect,
    /// Final path of the chain.
    Redirect(String),
    /// Paths visited in order, ending with the one seen twice.
    Cycle(Vec<String>),
}

/// Walk the redirect chain from `path`.
pub fn trace(path: &str, table: &RedirectTable) -> Resolution {
    let mut chain = vec![path.to_string()];
    let mut visited: HashSet<&str> = HashSet::from([path]);
    let mut current = path;

    while let Some(next) = table.get(current) {
        chain.push(next.to_string());
        if !visited.insert(next) {
            return Resolution::Cycle(chain);
        }
        current = next;
    }

    if current == path {
        Resolution::NoRedirect
    } else {
        Resolution::Redirect(current.to_string())
    }
}

/// Final redirect target for `path`, or `None` when the path is not
/// redirected. A cycle is logged and treated as no redirect.
pub fn resolve(path: &str, table: &RedirectTable) -> Option<String> {
    match trace(path, table) {
        Resolution::Redirect(target) => Some(target),
        Resolution::NoRedirect => None,
        Resolution::Cycle(chain) => {
            error!(path, chain = %chain.join(" -> "), "redirect cycle detected");
            None
        }
    }
}
