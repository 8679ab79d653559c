//! The dictionary handle.
//!
//! `Dict` is a cloneable handle over a shared trie: cloning retains, dropping
//! releases, and the trie is freed when the last handle or result set drops.
//! The lock serializes access as an implementation detail; the supported
//! model is single-threaded cooperative per dictionary.

pub(crate) mod node;
mod prefs;

pub use prefs::PrefsError;

use node::Node;

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::matches::Matches;
use crate::settings::settings;
use crate::split::split_delimited;

pub struct Dict<T> {
    root: Arc<RwLock<Node<T>>>,
}

impl<T> Clone for Dict<T> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
        }
    }
}

impl<T> Default for Dict<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Dict<T> {
    pub fn new() -> Self {
        Self {
            root: Arc::new(RwLock::new(Node::new(None, 0, 0))),
        }
    }

    fn read_root(&self) -> RwLockReadGuard<'_, Node<T>> {
        self.root.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_root(&self) -> RwLockWriteGuard<'_, Node<T>> {
        self.root.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop the whole trie. Handles stay valid and see an empty dictionary.
    pub fn clear(&self) {
        self.write_root().clear();
    }

    /// Load selection counts from `path` onto the current trie. Best-effort:
    /// failures are reported and the dictionary keeps whatever state it has.
    pub fn load_prefs(&self, path: &Path) {
        let mut root = self.write_root();
        if let Err(err) = prefs::load_into(&mut root, path) {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "unable to load preferences"
            );
        }
    }

    /// Save selection counts to `path`, overwriting it. Best-effort.
    pub fn save_prefs(&self, path: &Path) {
        let root = self.read_root();
        if let Err(err) = prefs::save_from(&root, path) {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "unable to save preferences"
            );
        }
    }
}

impl<T: Clone + PartialEq> Dict<T> {
    /// Register `userdata` at the path given as explicit segments.
    ///
    /// Re-registering an existing path keeps the first userdata and raises
    /// echelon and selection count to the given values if larger; the result
    /// is `true` iff the stored userdata equals `userdata` afterwards.
    pub fn add_path<S: AsRef<str>>(
        &self,
        path: &[S],
        userdata: T,
        echelon: u32,
        select_count: u32,
    ) -> bool {
        let segments: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
        self.write_root()
            .add(&segments, userdata, echelon, select_count)
    }

    /// Register `userdata` at the path obtained by splitting `delimited`.
    pub fn add_delimited(
        &self,
        delimited: &str,
        delimiter: char,
        userdata: T,
        echelon: u32,
        select_count: u32,
    ) -> bool {
        let segments = split_delimited(delimited, delimiter);
        self.write_root()
            .add(&segments, userdata, echelon, select_count)
    }

    /// Unregister `userdata` at the given path. `false` when the path is
    /// absent or holds different userdata.
    pub fn remove_path<S: AsRef<str>>(&self, path: &[S], userdata: &T) -> bool {
        let segments: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
        self.write_root().remove(&segments, userdata)
    }

    pub fn remove_delimited(&self, delimited: &str, delimiter: char, userdata: &T) -> bool {
        let segments = split_delimited(delimited, delimiter);
        self.write_root().remove(&segments, userdata)
    }

    /// Rank every registered path against `needle`.
    ///
    /// `None` for an empty needle; otherwise a sorted result set, empty when
    /// nothing scored valid. The set shares ownership of the trie, so
    /// selection feedback stays safe however long the caller keeps it.
    pub fn search<S: AsRef<str>>(&self, needle: &[S]) -> Option<Matches<T>> {
        if needle.is_empty() {
            return None;
        }
        let needle_bytes: Vec<&[u8]> = needle.iter().map(|s| s.as_ref().as_bytes()).collect();

        let mut hits = Vec::new();
        {
            let root = self.read_root();
            let mut trail = Vec::new();
            root.search(&mut trail, &needle_bytes, &mut hits);
        }
        let mut matches = Matches::from_hits(Arc::clone(&self.root), hits);
        matches.sort();

        let cap = settings().search.max_matches;
        if cap != 0 {
            matches.keep_first(cap);
        }
        Some(matches)
    }
}
