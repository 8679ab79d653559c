//! Selection-preference persistence.
//!
//! Preferences are stored as JSON documents of the shape
//! `{"nodes": {"selectCount": n, "children": {...}}}` with default fields
//! omitted. A file may hold several concatenated documents; the loader
//! drains them in order, later documents overwriting earlier ones where
//! they overlap.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::node::Node;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Selection counts for one node and its descendants.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct NodePrefs {
    #[serde(rename = "selectCount", default, skip_serializing_if = "is_zero")]
    pub(crate) select_count: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) children: BTreeMap<String, NodePrefs>,
}

fn is_zero(count: &u32) -> bool {
    *count == 0
}

impl NodePrefs {
    pub(crate) fn is_empty(&self) -> bool {
        self.select_count == 0 && self.children.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct PrefsDoc {
    #[serde(default)]
    nodes: Option<NodePrefs>,
}

/// Drain every document in the file onto the live trie. A malformed
/// document is reported and draining stops; documents already applied stay
/// applied.
pub(crate) fn load_into<T>(root: &mut Node<T>, path: &Path) -> Result<(), PrefsError> {
    let text = fs::read_to_string(path)?;
    let mut stream = serde_json::Deserializer::from_str(&text).into_iter::<PrefsDoc>();
    for doc in &mut stream {
        match doc {
            Ok(doc) => {
                if let Some(nodes) = &doc.nodes {
                    root.apply_prefs(nodes);
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "malformed preferences document"
                );
                break;
            }
        }
    }
    Ok(())
}

/// Write exactly one document plus a trailing newline, atomically.
pub(crate) fn save_from<T>(root: &Node<T>, path: &Path) -> Result<(), PrefsError> {
    let doc = PrefsDoc {
        nodes: Some(root.collect_prefs()),
    };
    let mut text = serde_json::to_string(&doc)?;
    text.push('\n');

    let tmp = path.with_extension("tmp");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
