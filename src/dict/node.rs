//! Trie vertex keyed by segment name.
//!
//! Keys are case-sensitive; case folding happens only inside scoring.
//! Interior nodes emptied by `remove` are kept, so the trie never shrinks
//! except through `clear`.

use std::collections::HashMap;

use crate::matches::Match;
use crate::matching::score_match;

use super::prefs::NodePrefs;

pub(crate) struct Node<T> {
    userdata: Option<T>,
    echelon: u32,
    select_count: u32,
    children: HashMap<String, Node<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new(userdata: Option<T>, echelon: u32, select_count: u32) -> Self {
        Self {
            userdata,
            echelon,
            select_count,
            children: HashMap::new(),
        }
    }

    pub(crate) fn inc_select_count(&mut self) {
        self.select_count += 1;
    }

    pub(crate) fn clear(&mut self) {
        self.children.clear();
    }

    /// Walk or create children along `segments`; merge the registration into
    /// the terminal node. Returns `true` iff the stored userdata equals the
    /// given one afterwards.
    pub(crate) fn add(
        &mut self,
        segments: &[&str],
        userdata: T,
        echelon: u32,
        select_count: u32,
    ) -> bool
    where
        T: Clone + PartialEq,
    {
        match segments.split_first() {
            Some((first, rest)) => {
                let child = self
                    .children
                    .entry((*first).to_string())
                    .or_insert_with(|| Node::new(None, echelon, select_count));
                child.add(rest, userdata, echelon, select_count)
            }
            None => {
                if self.userdata.is_none() {
                    self.userdata = Some(userdata.clone());
                }
                self.echelon = self.echelon.max(echelon);
                self.select_count = self.select_count.max(select_count);
                self.userdata.as_ref() == Some(&userdata)
            }
        }
    }

    /// Walk children along `segments`; clear the terminal userdata when it
    /// equals the given one. The emptied node stays in place.
    pub(crate) fn remove(&mut self, segments: &[&str], userdata: &T) -> bool
    where
        T: PartialEq,
    {
        match segments.split_first() {
            Some((first, rest)) => match self.children.get_mut(*first) {
                Some(child) => child.remove(rest, userdata),
                None => false,
            },
            None => {
                if self.userdata.as_ref() == Some(userdata) {
                    self.userdata = None;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Score every registered descendant against `needle`, appending valid
    /// hits. Child iteration order is unspecified; ranking comes from the
    /// final sort.
    pub(crate) fn search<'a>(
        &'a self,
        trail: &mut Vec<&'a str>,
        needle: &[&[u8]],
        hits: &mut Vec<Match<T>>,
    ) where
        T: Clone,
    {
        for (segment, child) in &self.children {
            trail.push(segment.as_str());
            if let Some(userdata) = &child.userdata {
                let prefixes: Vec<&[u8]> = trail.iter().map(|s| s.as_bytes()).collect();
                let score = score_match(&prefixes, needle);
                if score.is_valid() {
                    hits.push(Match::new(
                        trail.iter().map(|s| s.to_string()).collect(),
                        userdata.clone(),
                        score,
                        child.echelon,
                        child.select_count,
                    ));
                }
            }
            child.search(trail, needle, hits);
            trail.pop();
        }
    }

    /// Resolve a path captured at search time against the live trie.
    pub(crate) fn node_at_mut(&mut self, path: &[String]) -> Option<&mut Node<T>> {
        let mut node = self;
        for segment in path {
            node = node.children.get_mut(segment)?;
        }
        Some(node)
    }

    /// Overwrite selection counts from a loaded preferences tree. Segments
    /// missing on either side are skipped.
    pub(crate) fn apply_prefs(&mut self, prefs: &NodePrefs) {
        self.select_count = prefs.select_count;
        for (segment, child_prefs) in &prefs.children {
            if let Some(child) = self.children.get_mut(segment) {
                child.apply_prefs(child_prefs);
            }
        }
    }

    /// Collect selection counts into a preferences tree, omitting subtrees
    /// that hold nothing but defaults.
    pub(crate) fn collect_prefs(&self) -> NodePrefs {
        let mut prefs = NodePrefs {
            select_count: self.select_count,
            ..NodePrefs::default()
        };
        for (segment, child) in &self.children {
            let child_prefs = child.collect_prefs();
            if !child_prefs.is_empty() {
                prefs.children.insert(segment.clone(), child_prefs);
            }
        }
        prefs
    }
}
