//! Order-statistic AVL tree, used by the hypervolume sweep and the
//! EAF sweep to maintain a dynamic set of keys with `O(log n)`
//! insert/delete/predecessor/successor/rank/select.
//!
//! Nodes live in an arena (`Vec<Node<K, V>>`) and reference each other by
//! `u32` index rather than pointer, with `NULL = u32::MAX` as the sentinel.
//! This avoids parent-pointer cycles and keeps the tree cache-local; the
//! arena (and therefore every handle into it) is scoped to a single engine
//! call, matching the "transient indices" lifecycle in the data model.

use std::cmp::Ordering;

const NULL: u32 = u32::MAX;

/// Opaque handle to a node previously returned by [`Avl::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handle(u32);

struct Node<K, V> {
    key: K,
    value: V,
    left: u32,
    right: u32,
    parent: u32,
    height: i32,
    /// Size of the subtree rooted at this node (including itself).
    size: u32,
}

/// An order-statistic AVL tree keyed by `K` with an arbitrary payload `V`.
///
/// `K` need only be `PartialOrd`; callers are responsible for never
/// inserting two keys that compare as `None` to each other (e.g. NaN),
/// which would make tree order ill-defined.
pub struct Avl<K, V> {
    nodes: Vec<Node<K, V>>,
    root: u32,
}

impl<K: PartialOrd, V> Default for Avl<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialOrd, V> Avl<K, V> {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NULL,
        }
    }

    /// Number of elements currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size_of(self.root) as usize
    }

    /// Whether the tree has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root == NULL
    }

    fn size_of(&self, idx: u32) -> u32 {
        if idx == NULL {
            0
        } else {
            self.nodes[idx as usize].size
        }
    }

    fn height_of(&self, idx: u32) -> i32 {
        if idx == NULL {
            -1
        } else {
            self.nodes[idx as usize].height
        }
    }

    fn update(&mut self, idx: u32) {
        let n = &self.nodes[idx as usize];
        let (l, r) = (n.left, n.right);
        self.nodes[idx as usize].height = 1 + self.height_of(l).max(self.height_of(r));
        self.nodes[idx as usize].size = 1 + self.size_of(l) + self.size_of(r);
    }

    fn balance_factor(&self, idx: u32) -> i32 {
        let n = &self.nodes[idx as usize];
        self.height_of(n.left) - self.height_of(n.right)
    }

    fn set_child(&mut self, parent: u32, child: u32, is_left: bool) {
        if parent != NULL {
            if is_left {
                self.nodes[parent as usize].left = child;
            } else {
                self.nodes[parent as usize].right = child;
            }
        }
        if child != NULL {
            self.nodes[child as usize].parent = parent;
        }
    }

    fn rotate_left(&mut self, x: u32) -> u32 {
        let y = self.nodes[x as usize].right;
        let parent = self.nodes[x as usize].parent;
        let was_left = parent != NULL && self.nodes[parent as usize].left == x;

        let t2 = self.nodes[y as usize].left;
        self.set_child(x, t2, false);
        self.set_child(y, x, true);
        self.set_child(parent, y, was_left);
        if parent == NULL {
            self.root = y;
        }

        self.update(x);
        self.update(y);
        y
    }

    fn rotate_right(&mut self, x: u32) -> u32 {
        let y = self.nodes[x as usize].left;
        let parent = self.nodes[x as usize].parent;
        let was_left = parent != NULL && self.nodes[parent as usize].left == x;

        let t2 = self.nodes[y as usize].right;
        self.set_child(x, t2, true);
        self.set_child(y, x, false);
        self.set_child(parent, y, was_left);
        if parent == NULL {
            self.root = y;
        }

        self.update(x);
        self.update(y);
        y
    }

    fn rebalance_from(&mut self, mut idx: u32) {
        while idx != NULL {
            self.update(idx);
            let bf = self.balance_factor(idx);
            if bf > 1 {
                if self.balance_factor(self.nodes[idx as usize].left) < 0 {
                    let left = self.nodes[idx as usize].left;
                    self.rotate_left(left);
                }
                idx = self.rotate_right(idx);
            } else if bf < -1 {
                if self.balance_factor(self.nodes[idx as usize].right) > 0 {
                    let right = self.nodes[idx as usize].right;
                    self.rotate_right(right);
                }
                idx = self.rotate_left(idx);
            }
            idx = self.nodes[idx as usize].parent;
        }
    }

    /// Insert `key`/`value`, returning a handle that stays valid until the
    /// node is [`Avl::delete`]d.
    pub fn insert(&mut self, key: K, value: V) -> Handle {
        let idx = self.nodes.len() as u32;
        self.nodes.push(Node {
            key,
            value,
            left: NULL,
            right: NULL,
            parent: NULL,
            height: 0,
            size: 1,
        });

        if self.root == NULL {
            self.root = idx;
            return Handle(idx);
        }

        let mut cur = self.root;
        loop {
            let go_left = self.nodes[idx as usize]
                .key
                .partial_cmp(&self.nodes[cur as usize].key)
                .expect("key is not comparable (NaN?)")
                == Ordering::Less;
            let next = if go_left {
                self.nodes[cur as usize].left
            } else {
                self.nodes[cur as usize].right
            };
            if next == NULL {
                self.set_child(cur, idx, go_left);
                break;
            }
            cur = next;
        }
        self.rebalance_from(cur);
        Handle(idx)
    }

    /// Remove the node referenced by `handle`.
    pub fn delete(&mut self, handle: Handle) {
        let idx = handle.0;
        let (left, right, parent) = {
            let n = &self.nodes[idx as usize];
            (n.left, n.right, n.parent)
        };
        let was_left = parent != NULL && self.nodes[parent as usize].left == idx;

        if left == NULL || right == NULL {
            let child = if left == NULL { right } else { left };
            self.set_child(parent, child, was_left);
            if parent == NULL {
                self.root = child;
            }
            self.rebalance_from(parent);
        } else {
            // Find in-order successor (leftmost node of the right subtree).
            let mut succ = right;
            while self.nodes[succ as usize].left != NULL {
                succ = self.nodes[succ as usize].left;
            }
            let succ_parent = self.nodes[succ as usize].parent;
            let succ_right = self.nodes[succ as usize].right;

            if succ_parent != idx {
                self.set_child(succ_parent, succ_right, true);
                self.set_child(succ, right, false);
            }
            self.set_child(succ, left, true);
            self.set_child(parent, succ, was_left);
            if parent == NULL {
                self.root = succ;
            }
            let rebalance_start = if succ_parent == idx {
                succ
            } else {
                succ_parent
            };
            self.rebalance_from(rebalance_start);
        }
    }

    /// Value stored at `handle`.
    #[must_use]
    pub fn value(&self, handle: Handle) -> &V {
        &self.nodes[handle.0 as usize].value
    }

    /// Mutable value stored at `handle`.
    pub fn value_mut(&mut self, handle: Handle) -> &mut V {
        &mut self.nodes[handle.0 as usize].value
    }

    /// Key stored at `handle`.
    #[must_use]
    pub fn key(&self, handle: Handle) -> &K {
        &self.nodes[handle.0 as usize].key
    }

    /// Handle of the minimum-key node, if any.
    #[must_use]
    pub fn min(&self) -> Option<Handle> {
        self.extreme(self.root, true)
    }

    /// Handle of the maximum-key node, if any.
    #[must_use]
    pub fn max(&self) -> Option<Handle> {
        self.extreme(self.root, false)
    }

    fn extreme(&self, mut idx: u32, go_left: bool) -> Option<Handle> {
        if idx == NULL {
            return None;
        }
        loop {
            let next = if go_left {
                self.nodes[idx as usize].left
            } else {
                self.nodes[idx as usize].right
            };
            if next == NULL {
                return Some(Handle(idx));
            }
            idx = next;
        }
    }

    /// In-order successor of `handle`.
    #[must_use]
    pub fn next(&self, handle: Handle) -> Option<Handle> {
        let idx = handle.0;
        if self.nodes[idx as usize].right != NULL {
            return self.extreme(self.nodes[idx as usize].right, true);
        }
        let mut cur = idx;
        let mut parent = self.nodes[idx as usize].parent;
        while parent != NULL && self.nodes[parent as usize].right == cur {
            cur = parent;
            parent = self.nodes[parent as usize].parent;
        }
        if parent == NULL {
            None
        } else {
            Some(Handle(parent))
        }
    }

    /// In-order predecessor of `handle`.
    #[must_use]
    pub fn prev(&self, handle: Handle) -> Option<Handle> {
        let idx = handle.0;
        if self.nodes[idx as usize].left != NULL {
            return self.extreme(self.nodes[idx as usize].left, false);
        }
        let mut cur = idx;
        let mut parent = self.nodes[idx as usize].parent;
        while parent != NULL && self.nodes[parent as usize].left == cur {
            cur = parent;
            parent = self.nodes[parent as usize].parent;
        }
        if parent == NULL {
            None
        } else {
            Some(Handle(parent))
        }
    }

    /// Zero-based rank (in-order position) of `handle`.
    #[must_use]
    pub fn rank(&self, handle: Handle) -> usize {
        let mut rank = self.size_of(self.nodes[handle.0 as usize].left) as usize;
        let mut cur = handle.0;
        let mut parent = self.nodes[cur as usize].parent;
        while parent != NULL {
            if self.nodes[parent as usize].right == cur {
                rank += self.size_of(self.nodes[parent as usize].left) as usize + 1;
            }
            cur = parent;
            parent = self.nodes[cur as usize].parent;
        }
        rank
    }

    /// The `i`-th smallest element (zero-based), if `i < len()`.
    #[must_use]
    pub fn select(&self, i: usize) -> Option<Handle> {
        if i >= self.len() {
            return None;
        }
        let mut idx = self.root;
        let mut remaining = i as u32;
        loop {
            let left_size = self.size_of(self.nodes[idx as usize].left);
            match remaining.cmp(&left_size) {
                Ordering::Less => idx = self.nodes[idx as usize].left,
                Ordering::Equal => return Some(Handle(idx)),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    idx = self.nodes[idx as usize].right;
                }
            }
        }
    }

    /// Find the handle whose key compares equal to `key`, if any.
    #[must_use]
    pub fn find_by_key(&self, key: &K) -> Option<Handle> {
        let mut idx = self.root;
        while idx != NULL {
            let n = &self.nodes[idx as usize];
            match key.partial_cmp(&n.key).expect("key is not comparable") {
                Ordering::Less => idx = n.left,
                Ordering::Equal => return Some(Handle(idx)),
                Ordering::Greater => idx = n.right,
            }
        }
        None
    }

    /// Iterate all (key, value) pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        let mut cur = self.min();
        std::iter::from_fn(move || {
            let h = cur?;
            cur = self.next(h);
            Some((self.key(h), self.value(h)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_inorder() {
        let mut t: Avl<i64, ()> = Avl::new();
        for k in [5, 3, 8, 1, 4, 7, 9, 2, 6, 0] {
            t.insert(k, ());
        }
        let keys: Vec<i64> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());
        assert_eq!(t.len(), 10);
    }

    #[test]
    fn rank_and_select_are_inverse() {
        let mut t: Avl<i64, ()> = Avl::new();
        for k in [50, 20, 80, 10, 40, 70, 90] {
            t.insert(k, ());
        }
        for i in 0..t.len() {
            let h = t.select(i).unwrap();
            assert_eq!(t.rank(h), i);
        }
    }

    #[test]
    fn delete_preserves_order() {
        let mut t: Avl<i64, ()> = Avl::new();
        let mut handles = Vec::new();
        for k in 0..20 {
            handles.push(t.insert(k, ()));
        }
        // delete every other element
        for h in handles.into_iter().step_by(2) {
            t.delete(h);
        }
        let keys: Vec<i64> = t.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (1..20).step_by(2).collect::<Vec<_>>());
    }

    #[test]
    fn next_prev_roundtrip() {
        let mut t: Avl<i64, ()> = Avl::new();
        for k in [3, 1, 4, 1_000, 5, 9, 2, 6] {
            t.insert(k, ());
        }
        let min = t.min().unwrap();
        let mut count = 1;
        let mut cur = min;
        while let Some(n) = t.next(cur) {
            count += 1;
            cur = n;
        }
        assert_eq!(count, t.len());
        assert_eq!(Some(cur), t.next(t.prev(cur).unwrap()));
    }
}
