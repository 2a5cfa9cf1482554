//! An AVL tree of ordered keys.
//!
//! [`AvlTree`] keeps its keys sorted and its height logarithmic. Keys that
//! compare equal are all kept, one node per insertion, and [`AvlTree::remove`]
//! takes out one of them at a time.
//!
//! ```
//! use avltree::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for key in ["A", "B", "C", "A"] {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.height(), 2);
//!
//! tree.remove(&"A");
//! let keys: Vec<_> = tree.iter().copied().collect();
//! assert_eq!(keys, ["A", "B", "C"]);
//! ```
//!
//! The tree is not synchronized. Mutations take `&mut self`, so sharing one
//! between threads needs an outer lock.

mod tree;
pub use tree::{AvlTree, Iter};
