//! Small helper datastructures shared by the traversals.

use std::iter::FromIterator;

/// Set of node indices backed by a dense `Vec<bool>` that grows on demand.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct NodeSet {
    marks: Vec<bool>,
    len: usize,
}

impl NodeSet {

    pub fn new() -> Self {
        NodeSet::default()
    }

    /// Returns an empty set that can hold the ids `0..capacity` without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        NodeSet {
            marks: vec![false; capacity],
            len: 0,
        }
    }

    /// Inserts `node`. Returns `true` if it was not already present.
    pub fn insert(&mut self, node: usize) -> bool {
        if node >= self.marks.len() {
            self.marks.resize(node + 1, false);
        }
        if self.marks[node] {
            false
        } else {
            self.marks[node] = true;
            self.len += 1;
            true
        }
    }

    /// Removes `node`. Returns `true` if it was present.
    pub fn remove(&mut self, node: &usize) -> bool {
        match self.marks.get_mut(*node) {
            Some(mark) if *mark => {
                *mark = false;
                self.len -= 1;
                true
            },
            _ => false,
        }
    }

    pub fn contains(&self, node: &usize) -> bool {
        self.marks.get(*node).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the contained ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item=usize> + '_ {
        self.marks.iter()
            .enumerate()
            .filter_map(|(node, mark)| if *mark { Some(node) } else { None })
    }
}

impl FromIterator<usize> for NodeSet {
    fn from_iter<I: IntoIterator<Item=usize>>(iter: I) -> Self {
        let mut set = NodeSet::new();
        for node in iter {
            set.insert(node);
        }
        set
    }
}

impl Extend<usize> for NodeSet {
    fn extend<I: IntoIterator<Item=usize>>(&mut self, iter: I) {
        for node in iter {
            self.insert(node);
        }
    }
}
