use std::cmp::{self, Ordering};
use std::fmt;
use std::iter::FusedIterator;

/// An ordered collection of keys stored in an AVL tree.
///
/// Keys that compare equal are kept side by side, one node per insertion.
/// Every mutation restores the AVL balance on its way back to the root, so the
/// height stays logarithmic in the number of keys.
pub struct AvlTree<K: Ord> {
    root: Link<K>,
    num_nodes: usize,
}

type Link<K> = Option<Box<Node<K>>>;

#[derive(Clone)]
struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    height: isize,
}

impl<K: Ord> AvlTree<K> {
    /// Creates an empty tree.
    /// No memory is allocated until the first key is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of keys in the tree, duplicates included.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the root node: 0 for a single key, -1 for an
    /// empty tree.
    pub fn height(&self) -> isize {
        link_height(&self.root)
    }

    /// Removes all keys.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns true if at least one key equal to `key` is stored.
    pub fn contains(&self, key: &K) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return true,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        false
    }

    /// Returns how many stored keys compare equal to `key`.
    pub fn count(&self, key: &K) -> usize {
        Node::count(&self.root, key)
    }

    /// Returns the smallest key.
    pub fn first(&self) -> Option<&K> {
        self.root.as_deref().map(|root| &root.find_min().key)
    }

    /// Returns the largest key.
    pub fn last(&self) -> Option<&K> {
        self.root.as_deref().map(|root| &root.find_max().key)
    }

    /// Inserts a key.
    ///
    /// A key equal to one already present is stored as a separate node to the
    /// right of it, so the in-order sequence keeps insertion order among
    /// equal keys until a rotation or removal moves them.
    pub fn insert(&mut self, key: K) {
        self.root = Some(Node::insert(self.root.take(), key));
        self.num_nodes += 1;
    }

    /// Removes one key equal to `key`.
    ///
    /// When several keys compare equal, the one found first on the way down
    /// from the root is removed. Returns whether a key was removed; a missing
    /// key leaves the tree untouched.
    pub fn remove(&mut self, key: &K) -> bool {
        let (root, removed) = Node::remove(self.root.take(), key);
        self.root = root;
        if removed {
            debug_assert!(self.num_nodes >= 1);
            self.num_nodes -= 1;
        }
        removed
    }

    /// Removes every key equal to `key` and returns how many were removed.
    pub fn remove_all(&mut self, key: &K) -> usize {
        let mut removed = 0;
        while self.remove(key) {
            removed += 1;
        }
        debug_assert!(!self.contains(key));
        removed
    }

    /// Walks the keys in order, passing each one together with the height of
    /// its node (leaves report 0) to `visit`.
    ///
    /// The walk stops as soon as `visit` returns false.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&K, isize) -> bool,
    {
        Node::traverse(&self.root, &mut visit);
    }

    /// Returns an iterator over the keys in order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root, self.num_nodes)
    }

    /// Asserts the tree invariants: non-decreasing in-order sequence, exact
    /// cached heights, AVL balance at every node and a matching node count.
    ///
    /// Panics on the first violation.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        fn check<'a, K: Ord>(
            link: &'a Link<K>,
            last_key: &mut Option<&'a K>,
            num_nodes: &mut usize,
        ) -> isize {
            let Some(node) = link else {
                return -1;
            };

            let left_height = check(&node.left, last_key, num_nodes);

            // Check in-order sequence
            if let Some(last_key) = *last_key {
                assert!(*last_key <= node.key);
            }
            *last_key = Some(&node.key);
            *num_nodes += 1;

            let right_height = check(&node.right, last_key, num_nodes);

            // Check height
            assert_eq!(node.height, cmp::max(left_height, right_height) + 1);

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            node.height
        }

        let mut num_nodes = 0;
        check(&self.root, &mut None, &mut num_nodes);
        assert_eq!(num_nodes, self.num_nodes);
    }
}

fn link_height<K>(link: &Link<K>) -> isize {
    match link {
        None => -1,
        Some(node) => node.height,
    }
}

impl<K> Node<K> {
    fn leaf(key: K) -> Box<Self> {
        Box::new(Node {
            key,
            left: None,
            right: None,
            height: 0,
        })
    }

    fn balance_factor(&self) -> isize {
        link_height(&self.right) - link_height(&self.left)
    }

    fn fix_height(&mut self) {
        self.height = cmp::max(link_height(&self.left), link_height(&self.right)) + 1;
    }

    fn find_min(&self) -> &Self {
        let mut node = self;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        node
    }

    fn find_max(&self) -> &Self {
        let mut node = self;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        node
    }

    fn rotate_left(mut node: Box<Self>) -> Box<Self> {
        match node.right.take() {
            None => node,
            Some(mut right) => {
                node.right = right.left.take();
                node.fix_height();
                right.left = Some(node);
                right.fix_height();
                right
            }
        }
    }

    fn rotate_right(mut node: Box<Self>) -> Box<Self> {
        match node.left.take() {
            None => node,
            Some(mut left) => {
                node.left = left.right.take();
                node.fix_height();
                left.right = Some(node);
                left.fix_height();
                left
            }
        }
    }

    // Restore the AVL condition at a node whose subtrees are balanced and
    // differ in height by at most two. Returns the new subtree root.
    fn balance(mut node: Box<Self>) -> Box<Self> {
        node.fix_height();

        let factor = node.balance_factor();
        debug_assert!((-2..=2).contains(&factor));
        match factor {
            2 => {
                // Right-left case
                if node.right.as_ref().map_or(false, |right| right.balance_factor() < 0) {
                    node.right = node.right.take().map(Self::rotate_right);
                }
                Self::rotate_left(node)
            }
            -2 => {
                // Left-right case
                if node.left.as_ref().map_or(false, |left| left.balance_factor() > 0) {
                    node.left = node.left.take().map(Self::rotate_left);
                }
                Self::rotate_right(node)
            }
            _ => node,
        }
    }

    // Detach the leftmost node of a subtree.
    // Returns it together with what remains of the subtree.
    fn remove_min(mut node: Box<Self>) -> (Box<Self>, Link<K>) {
        match node.left.take() {
            None => {
                let rest = node.right.take();
                (node, rest)
            }
            Some(left) => {
                let (min, rest) = Self::remove_min(left);
                node.left = rest;
                (min, Some(Self::balance(node)))
            }
        }
    }

    fn traverse<F>(link: &Link<K>, visit: &mut F) -> bool
    where
        F: FnMut(&K, isize) -> bool,
    {
        match link {
            None => true,
            Some(node) => {
                Self::traverse(&node.left, visit)
                    && visit(&node.key, node.height)
                    && Self::traverse(&node.right, visit)
            }
        }
    }
}

impl<K: Ord> Node<K> {
    fn insert(link: Link<K>, key: K) -> Box<Self> {
        match link {
            None => Self::leaf(key),
            Some(mut node) => {
                if key < node.key {
                    node.left = Some(Self::insert(node.left.take(), key));
                } else {
                    node.right = Some(Self::insert(node.right.take(), key));
                }
                Self::balance(node)
            }
        }
    }

    fn remove(link: Link<K>, key: &K) -> (Link<K>, bool) {
        let Some(mut node) = link else {
            return (None, false);
        };

        let removed = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, removed) = Self::remove(node.left.take(), key);
                node.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = Self::remove(node.right.take(), key);
                node.right = right;
                removed
            }
            Ordering::Equal => {
                let left = node.left.take();
                return match node.right.take() {
                    // Without a right subtree the left one is a single leaf at most
                    None => (left, true),
                    Some(right) => {
                        // Promote the in-order successor. It may compare equal
                        // to the removed key, which still sorts it after `left`.
                        let (mut successor, rest) = Self::remove_min(right);
                        successor.left = left;
                        successor.right = rest;
                        (Some(Self::balance(successor)), true)
                    }
                };
            }
        };
        (Some(Self::balance(node)), removed)
    }

    // Equal keys may sit on both sides of a matching node after rotations,
    // but never on the far side of a greater or smaller one.
    fn count(link: &Link<K>, key: &K) -> usize {
        match link {
            None => 0,
            Some(node) => match key.cmp(&node.key) {
                Ordering::Less => Self::count(&node.left, key),
                Ordering::Greater => Self::count(&node.right, key),
                Ordering::Equal => 1 + Self::count(&node.left, key) + Self::count(&node.right, key),
            },
        }
    }
}

impl<K: Ord> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone> Clone for AvlTree<K> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            num_nodes: self.num_nodes,
        }
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: Ord> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the keys of an [`AvlTree`].
pub struct Iter<'a, K> {
    // Nodes whose key and right subtree are still to be visited
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: &'a Link<K>, len: usize) -> Self {
        let capacity = usize::try_from(link_height(root) + 1).unwrap_or(0);
        let mut iter = Self {
            stack: Vec::with_capacity(capacity),
            remaining: len,
        };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<K>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}
