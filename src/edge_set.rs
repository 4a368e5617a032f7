//! Edge bookkeeping for the rewiring loops.

use std::collections::HashMap;

use rand::Rng;

use crate::{Edge, Node};

/// Normalizes an unordered vertex pair to `(min, max)`.
pub fn ordered(u: Node, v: Node) -> Edge {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// Edge set with O(1) membership, removal, and uniform sampling.
///
/// Edges live in a flat vector so `choose` is a single index draw; a map
/// from edge to vector slot keeps removal constant-time via swap-remove.
#[derive(Debug, Default, Clone)]
pub struct EdgeSet {
    edges: Vec<Edge>,
    slots: HashMap<Edge, usize>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            edges: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, e: &Edge) -> bool {
        self.slots.contains_key(e)
    }

    /// Inserts `e`; returns false if it was already present.
    pub fn insert(&mut self, e: Edge) -> bool {
        if self.slots.contains_key(&e) {
            return false;
        }
        self.slots.insert(e, self.edges.len());
        self.edges.push(e);
        true
    }

    /// Removes `e`; returns false if it was absent.
    pub fn remove(&mut self, e: &Edge) -> bool {
        let slot = match self.slots.remove(e) {
            Some(slot) => slot,
            None => return false,
        };
        self.edges.swap_remove(slot);
        if slot < self.edges.len() {
            self.slots.insert(self.edges[slot], slot);
        }
        true
    }

    /// Uniformly random member.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> Option<Edge> {
        if self.edges.is_empty() {
            None
        } else {
            Some(self.edges[rng.gen_range(0..self.edges.len())])
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }
}
