//! # Sapling: An Unbalanced Binary Search Tree
//!
//! This crate provides an ordered collection of unique values stored in a plain
//! (non-self-balancing) binary search tree, with stack-based in-order iteration
//! in both directions, in-place deletion, pluggable ordering, and simple binary
//! and text persistence.
//!
//! ## Design Overview
//!
//! **Arena Nodes**: Nodes live in an index-based arena. Each node stores its
//! payload plus optional ids of its `parent`, `left` and `right` nodes. The
//! parent link is a back-reference used by deletion and by successor and
//! predecessor walks; a node is only ever released through the child link that
//! owns it.
//!
//! **Pluggable Ordering**: The tree is generic over a
//! [`Comparator`](compare::Comparator), a strict "ordered before" predicate.
//! Two values are the same key when neither is ordered before the other.
//! [`Tree`] uses the natural [`Ord`] order.
//!
//! **In-Place Deletion**: Removing a node with two children copies its in-order
//! successor's value into it and unlinks the successor instead. The removed
//! node's slot, and every cursor parked on it, keeps its identity.
//!
//! **Path-Stack Iteration**: Traversals keep the path of pending ancestors on a
//! stack instead of walking parent links. See the [`iter`] module.
//!
//! ### Tree Structure
//!
//! ```text
//!                    ┌─────────────────┐
//!                    │  GenericTree    │  <- arena, root id, comparator
//!                    └────────┬────────┘
//!                             │ root
//!                             ▼
//!                        ┌─────────┐
//!                        │   10    │  parent: None
//!                        └────┬────┘
//!                   left ┌────┴────┐ right
//!                        ▼         ▼
//!                   ┌───────┐  ┌───────┐
//!                   │   7   │  │  15   │  parent: 10
//!                   └───────┘  └───┬───┘
//!                              ┌───┴───┐
//!                              ▼       ▼
//!                            ┌────┐  ┌────┐
//!                            │ 12 │  │ 17 │  parent: 15
//!                            └────┘  └────┘
//! ```
//!
//! The shape depends only on insertion order. Sorted input degenerates into a
//! list with O(n) height; no rebalancing is ever performed.
//!
//! ## Basic Usage
//!
//! ```
//! use sapling::Tree;
//!
//! let mut tree = Tree::new();
//! for value in [10, 7, 15, 17, 5] {
//!     tree.insert(value);
//! }
//!
//! // Re-inserting is a no-op that returns the stored value.
//! assert_eq!(*tree.insert(7), 7);
//! assert_eq!(tree.len(), 5);
//!
//! assert_eq!(tree.search(&15), Some(&15));
//! assert_eq!(tree.search(&16), None);
//!
//! tree.remove(&10);
//! let values: Vec<_> = tree.iter().copied().collect();
//! assert_eq!(values, vec![5, 7, 15, 17]);
//!
//! let reversed: Vec<_> = tree.iter().rev().copied().collect();
//! assert_eq!(reversed, vec![17, 15, 7, 5]);
//! ```
//!
//! ## Thread Safety
//!
//! The tree has no interior mutability. It can be sent or shared across
//! threads when its values and comparator can, but concurrent mutation needs
//! external locking.

use std::cmp::Ordering;
use std::fmt;

pub mod compare;
pub mod error;
pub mod iter;
pub(crate) mod node;
pub mod persist;

#[cfg(feature = "serde")]
mod serde_impl;

#[cfg(test)]
mod util;

use compare::{Comparator, Natural};
use iter::{Cursor, Direction, IntoIter, Iter, PreOrder};
use node::{Arena, Node, NodeId, Side};

// ---------------------------------------------------------------------------
// Public Type Aliases
// ---------------------------------------------------------------------------

/// A search tree ordered by the values' [`Ord`] implementation.
///
/// This is the recommended type for most uses. To order by anything else,
/// use [`GenericTree`] with a custom [`Comparator`].
pub type Tree<T> = GenericTree<T, Natural>;

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// An unbalanced binary search tree with a configurable ordering.
///
/// # Type Parameters
///
/// - `T`: The stored value type. Values double as their own keys.
/// - `C`: The ordering, a [`Comparator<T>`]. Default is [`Natural`].
///
/// # Internal Structure
///
/// - An **arena** of node slots. Removed slots are recycled.
/// - The **root** id, `None` for an empty tree.
/// - The **comparator** instance used for every descent.
///
/// The element count is the arena's occupied slot count, so it always equals
/// the number of nodes reachable from the root.
pub struct GenericTree<T, C = Natural> {
	arena: Arena<T>,
	root: Option<NodeId>,
	comparator: C,
}

impl<T, C: Default> Default for GenericTree<T, C> {
	fn default() -> Self {
		Self::with_comparator(C::default())
	}
}

// ---------------------------------------------------------------------------
// GenericTree Implementation
// ---------------------------------------------------------------------------

impl<T, C> GenericTree<T, C> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates an empty tree. Does not allocate.
	///
	/// # Example
	///
	/// ```
	/// use sapling::Tree;
	///
	/// let tree: Tree<String> = Tree::new();
	/// assert!(tree.is_empty());
	/// assert_eq!(tree.height(), 0);
	/// ```
	pub fn new() -> Self
	where
		C: Default,
	{
		Self::with_comparator(C::default())
	}

	/// Creates an empty tree that orders values with `comparator`.
	///
	/// # Example
	///
	/// ```
	/// use sapling::{compare::Descending, GenericTree};
	///
	/// let tree: GenericTree<i32, _> = [1, 3, 2].into_iter().fold(
	///     GenericTree::with_comparator(Descending),
	///     |mut tree, v| {
	///         tree.insert(v);
	///         tree
	///     },
	/// );
	/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
	/// ```
	pub fn with_comparator(comparator: C) -> Self {
		GenericTree {
			arena: Arena::new(),
			root: None,
			comparator,
		}
	}

	/// Creates an empty tree with room for `capacity` nodes before reallocating.
	pub fn with_capacity(capacity: usize) -> Self
	where
		C: Default,
	{
		GenericTree {
			arena: Arena::with_capacity(capacity),
			root: None,
			comparator: C::default(),
		}
	}

	/// Returns the comparator this tree orders by.
	pub fn comparator(&self) -> &C {
		&self.comparator
	}

	// -----------------------------------------------------------------------
	// Tree Metadata
	// -----------------------------------------------------------------------

	/// Returns the number of values in the tree. O(1).
	#[inline]
	pub fn len(&self) -> usize {
		self.arena.len()
	}

	/// Returns `true` if the tree contains no values.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.root.is_none()
	}

	/// Returns the number of nodes on the longest root-to-leaf path.
	///
	/// - Height 0: empty tree
	/// - Height 1: only a root
	/// - Height n: insertion order produced a chain of n nodes somewhere
	///
	/// This walks the whole tree.
	pub fn height(&self) -> usize {
		let mut deepest = 0;
		let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();
		while let Some((id, depth)) = stack.pop() {
			deepest = deepest.max(depth);
			let node = self.arena.get(id);
			stack.extend(node.left.map(|child| (child, depth + 1)));
			stack.extend(node.right.map(|child| (child, depth + 1)));
		}
		deepest
	}

	// -----------------------------------------------------------------------
	// Extremes
	// -----------------------------------------------------------------------

	/// Returns the root value.
	///
	/// Returns [`Error::EmptyTree`](error::Error::EmptyTree) if the tree is empty.
	pub fn root(&self) -> error::Result<&T> {
		self.root.map(|id| &self.arena.get(id).value).ok_or(error::Error::EmptyTree)
	}

	/// Returns the smallest value under the tree's ordering.
	///
	/// Returns [`Error::EmptyTree`](error::Error::EmptyTree) if the tree is empty.
	///
	/// # Example
	///
	/// ```
	/// use sapling::{error::Error, Tree};
	///
	/// let mut tree: Tree<i32> = Tree::new();
	/// assert!(matches!(tree.min(), Err(Error::EmptyTree)));
	///
	/// tree.extend([3, 1, 2]);
	/// assert_eq!(*tree.min()?, 1);
	/// assert_eq!(*tree.max()?, 3);
	/// # Ok::<(), Error>(())
	/// ```
	pub fn min(&self) -> error::Result<&T> {
		self.first().ok_or(error::Error::EmptyTree)
	}

	/// Returns the largest value under the tree's ordering.
	///
	/// Returns [`Error::EmptyTree`](error::Error::EmptyTree) if the tree is empty.
	pub fn max(&self) -> error::Result<&T> {
		self.last().ok_or(error::Error::EmptyTree)
	}

	/// Returns the smallest value, or `None` if the tree is empty.
	pub fn first(&self) -> Option<&T> {
		self.root.map(|id| &self.arena.get(self.leftmost(id)).value)
	}

	/// Returns the largest value, or `None` if the tree is empty.
	pub fn last(&self) -> Option<&T> {
		self.root.map(|id| &self.arena.get(self.rightmost(id)).value)
	}

	/// Returns the `n`-th smallest value (zero-based), or `None` if `n >= len()`.
	///
	/// This walks `n` steps of an in-order traversal.
	pub fn nth(&self, n: usize) -> Option<&T> {
		self.iter().nth(n)
	}

	// -----------------------------------------------------------------------
	// Iterators
	// -----------------------------------------------------------------------

	/// Returns an iterator over the values in ascending order.
	///
	/// The iterator is double-ended: `iter().rev()` walks in descending order.
	pub fn iter(&self) -> Iter<'_, T> {
		Iter::new(&self.arena, self.root)
	}

	/// Returns an iterator over the values in descending order.
	pub fn iter_rev(&self) -> std::iter::Rev<Iter<'_, T>> {
		self.iter().rev()
	}

	/// Returns an iterator over the values in pre-order (root, left, right).
	pub fn pre_order(&self) -> PreOrder<'_, T> {
		PreOrder::new(&self.arena, self.root)
	}

	/// Returns a cursor at the smallest value.
	///
	/// The cursor does not borrow the tree. See [`Cursor`] for its validity rules.
	pub fn begin(&self) -> Cursor {
		Cursor::new(&self.arena, self.root, Direction::Forward)
	}

	/// Returns the past-the-end cursor for ascending traversal.
	pub fn end(&self) -> Cursor {
		Cursor::end(Direction::Forward)
	}

	/// Returns a cursor at the largest value, advancing in descending order.
	pub fn rbegin(&self) -> Cursor {
		Cursor::new(&self.arena, self.root, Direction::Reverse)
	}

	/// Returns the past-the-end cursor for descending traversal.
	pub fn rend(&self) -> Cursor {
		Cursor::end(Direction::Reverse)
	}

	// -----------------------------------------------------------------------
	// Clearing
	// -----------------------------------------------------------------------

	/// Removes every value. Every outstanding cursor is invalidated.
	///
	/// # Example
	///
	/// ```
	/// use sapling::Tree;
	///
	/// let mut tree: Tree<i32> = (0..10).collect();
	/// tree.clear();
	/// assert!(tree.is_empty());
	/// assert_eq!(tree.len(), 0);
	/// ```
	pub fn clear(&mut self) {
		self.arena.clear();
		self.root = None;
	}

	// -----------------------------------------------------------------------
	// Navigation Helpers
	// -----------------------------------------------------------------------

	fn leftmost(&self, mut id: NodeId) -> NodeId {
		while let Some(left) = self.arena.get(id).left {
			id = left;
		}
		id
	}

	fn rightmost(&self, mut id: NodeId) -> NodeId {
		while let Some(right) = self.arena.get(id).right {
			id = right;
		}
		id
	}

	/// Next node in ascending order.
	///
	/// With a right child this is the leftmost node of the right subtree.
	/// Otherwise climb while we are a right child; the first parent reached
	/// from its left side is the successor. Running off the root means none.
	fn successor_of(&self, id: NodeId) -> Option<NodeId> {
		if let Some(right) = self.arena.get(id).right {
			return Some(self.leftmost(right));
		}
		let mut child = id;
		let mut parent = self.arena.get(id).parent;
		while let Some(p) = parent {
			if self.arena.get(p).right != Some(child) {
				break;
			}
			child = p;
			parent = self.arena.get(p).parent;
		}
		parent
	}

	/// Previous node in ascending order. Mirror of [`successor_of`](Self::successor_of).
	fn predecessor_of(&self, id: NodeId) -> Option<NodeId> {
		if let Some(left) = self.arena.get(id).left {
			return Some(self.rightmost(left));
		}
		let mut child = id;
		let mut parent = self.arena.get(id).parent;
		while let Some(p) = parent {
			if self.arena.get(p).left != Some(child) {
				break;
			}
			child = p;
			parent = self.arena.get(p).parent;
		}
		parent
	}

	fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
		if self.arena.get(parent).left == Some(child) {
			Side::Left
		} else {
			Side::Right
		}
	}

	/// Points whatever link held `old` (a parent's child link, or the root) at `new`.
	fn replace_link(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
		match parent {
			None => self.root = new,
			Some(p) => {
				let side = self.side_of(p, old);
				*self.arena.get_mut(p).child_mut(side) = new;
			}
		}
	}

	// -----------------------------------------------------------------------
	// Node Removal
	// -----------------------------------------------------------------------

	/// Unlinks a node with at most one child and releases its slot.
	///
	/// ```text
	/// Leaf:                      One child:
	///     P            P             P            P
	///    /     ──►                  /     ──►    /
	///   X                          X            C
	///                               \
	///                                C
	/// ```
	fn splice_out(&mut self, id: NodeId) -> Node<T> {
		let (parent, child) = {
			let node = self.arena.get(id);
			debug_assert!(node.left.is_none() || node.right.is_none());
			(node.parent, node.left.or(node.right))
		};
		if let Some(child) = child {
			self.arena.get_mut(child).parent = parent;
		}
		self.replace_link(parent, id, child);
		self.arena.free(id)
	}

	/// Removes the value held by `id` and returns it.
	///
	/// # Two Children
	///
	/// ```text
	/// Before:                    After:
	///         X                          S        <- same node as X, new value
	///       /   \                      /   \
	///      A     R                    A     R
	///           / \                        / \
	///          S   ..                     T   ..
	///           \
	///            T
	/// ```
	///
	/// The successor `S` has no left child, so it is spliced out with the
	/// one-child rule and its value moves into `X`. `X` keeps its id.
	fn remove_node(&mut self, id: NodeId) -> T {
		let node = self.arena.get(id);
		match (node.left, node.right) {
			(Some(_), Some(right)) => {
				let successor = self.leftmost(right);
				tracing::trace!(node = ?id, ?successor, "removing node with two children");
				let detached = self.splice_out(successor);
				std::mem::replace(&mut self.arena.get_mut(id).value, detached.value)
			}
			_ => {
				tracing::trace!(node = ?id, leaf = node.is_leaf(), "removing node with at most one child");
				self.splice_out(id).value
			}
		}
	}
}

impl<T, C: Comparator<T>> GenericTree<T, C> {
	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Descends from the root to the node holding a value equivalent to `key`.
	fn find(&self, key: &T) -> Option<NodeId> {
		let mut current = self.root;
		while let Some(id) = current {
			let node = self.arena.get(id);
			current = match self.comparator.compare(key, &node.value) {
				Ordering::Equal => return Some(id),
				Ordering::Less => node.left,
				Ordering::Greater => node.right,
			};
		}
		None
	}

	/// Returns the stored value equivalent to `key`, or `None`.
	///
	/// # Example
	///
	/// ```
	/// use sapling::Tree;
	///
	/// let tree: Tree<&str> = ["root", "sdf", "awer"].into_iter().collect();
	/// assert_eq!(tree.search(&"sdf"), Some(&"sdf"));
	/// assert_eq!(tree.search(&"nope"), None);
	/// ```
	pub fn search(&self, key: &T) -> Option<&T> {
		self.find(key).map(|id| &self.arena.get(id).value)
	}

	/// Returns the stored value equivalent to `key`.
	///
	/// Returns [`Error::NotFound`](error::Error::NotFound) if there is none.
	pub fn try_search(&self, key: &T) -> error::Result<&T> {
		self.search(key).ok_or(error::Error::NotFound)
	}

	/// Returns `true` if a value equivalent to `key` is stored.
	pub fn contains(&self, key: &T) -> bool {
		self.find(key).is_some()
	}

	/// Returns the value following `key` in ascending order.
	///
	/// Returns `None` if `key` is not stored or is the largest value.
	///
	/// # Example
	///
	/// ```
	/// use sapling::Tree;
	///
	/// let tree: Tree<i32> = [10, 7, 15, 12].into_iter().collect();
	/// assert_eq!(tree.successor(&10), Some(&12));
	/// assert_eq!(tree.successor(&7), Some(&10));
	/// assert_eq!(tree.successor(&15), None);
	/// assert_eq!(tree.predecessor(&12), Some(&10));
	/// assert_eq!(tree.predecessor(&8), None); // not stored
	/// ```
	pub fn successor(&self, key: &T) -> Option<&T> {
		let id = self.successor_of(self.find(key)?)?;
		Some(&self.arena.get(id).value)
	}

	/// Returns the value preceding `key` in ascending order.
	///
	/// Returns `None` if `key` is not stored or is the smallest value.
	pub fn predecessor(&self, key: &T) -> Option<&T> {
		let id = self.predecessor_of(self.find(key)?)?;
		Some(&self.arena.get(id).value)
	}

	// -----------------------------------------------------------------------
	// Public API: Write Operations
	// -----------------------------------------------------------------------

	/// Descends to where `value` belongs and links a new node there.
	///
	/// Returns the id of the node now holding the key and whether it was created.
	/// When an equivalent value exists, `value` is dropped and nothing changes.
	fn insert_node(&mut self, value: T) -> (NodeId, bool) {
		let Some(mut current) = self.root else {
			let id = self.arena.alloc(Node::new(value, None));
			self.root = Some(id);
			return (id, true);
		};

		loop {
			let node = self.arena.get(current);
			let side = match self.comparator.compare(&value, &node.value) {
				Ordering::Equal => return (current, false),
				Ordering::Less => Side::Left,
				Ordering::Greater => Side::Right,
			};
			match node.child(side) {
				Some(next) => current = next,
				None => {
					let id = self.arena.alloc(Node::new(value, Some(current)));
					*self.arena.get_mut(current).child_mut(side) = Some(id);
					return (id, true);
				}
			}
		}
	}

	/// Inserts `value` and returns a reference to the stored value for its key.
	///
	/// If an equivalent value is already stored, this is a no-op: `value` is
	/// dropped and the existing value is returned unchanged.
	///
	/// # Example
	///
	/// ```
	/// use sapling::Tree;
	///
	/// let mut tree = Tree::new();
	/// let first: *const i32 = tree.insert(7);
	/// let again: *const i32 = tree.insert(7);
	///
	/// assert_eq!(first, again);
	/// assert_eq!(tree.len(), 1);
	/// ```
	pub fn insert(&mut self, value: T) -> &T {
		let (id, _) = self.insert_node(value);
		&self.arena.get(id).value
	}

	/// Inserts `value`, returning `true` if a new node was created.
	pub fn insert_new(&mut self, value: T) -> bool {
		self.insert_node(value).1
	}

	/// Removes the value equivalent to `key`, returning `true` if one was stored.
	///
	/// Removing an absent key is a no-op.
	///
	/// # Example
	///
	/// ```
	/// use sapling::Tree;
	///
	/// let mut tree: Tree<i32> = [10, 7, 15].into_iter().collect();
	/// assert!(tree.remove(&10));
	/// assert!(!tree.remove(&10));
	/// assert_eq!(tree.len(), 2);
	/// ```
	pub fn remove(&mut self, key: &T) -> bool {
		self.take(key).is_some()
	}

	/// Removes the value equivalent to `key` and returns it.
	pub fn take(&mut self, key: &T) -> Option<T> {
		let id = self.find(key)?;
		Some(self.remove_node(id))
	}
}

// ---------------------------------------------------------------------------
// Trait Implementations
// ---------------------------------------------------------------------------

/// Copies by reinserting every value in pre-order, which rebuilds the same shape.
impl<T: Clone, C: Comparator<T> + Clone> Clone for GenericTree<T, C> {
	fn clone(&self) -> Self {
		let mut tree = GenericTree {
			arena: Arena::with_capacity(self.len()),
			root: None,
			comparator: self.comparator.clone(),
		};
		for value in self.pre_order() {
			tree.insert(value.clone());
		}
		tree
	}
}

impl<T: fmt::Debug, C> fmt::Debug for GenericTree<T, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

/// Trees are equal when their in-order sequences are equal. Shapes may differ.
impl<T: PartialEq, C> PartialEq for GenericTree<T, C> {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().eq(other.iter())
	}
}

impl<T: Eq, C> Eq for GenericTree<T, C> {}

impl<T, C: Comparator<T> + Default> FromIterator<T> for GenericTree<T, C> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut tree = Self::new();
		tree.extend(iter);
		tree
	}
}

impl<T, C: Comparator<T>> Extend<T> for GenericTree<T, C> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for value in iter {
			self.insert_node(value);
		}
	}
}

impl<'a, T: Copy + 'a, C: Comparator<T>> Extend<&'a T> for GenericTree<T, C> {
	fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
		self.extend(iter.into_iter().copied());
	}
}

impl<'t, T, C> IntoIterator for &'t GenericTree<T, C> {
	type Item = &'t T;
	type IntoIter = Iter<'t, T>;

	fn into_iter(self) -> Iter<'t, T> {
		self.iter()
	}
}

impl<T, C> IntoIterator for GenericTree<T, C> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	/// Consumes the tree, yielding its values in ascending order.
	fn into_iter(self) -> IntoIter<T> {
		let mut order = Vec::with_capacity(self.len());
		let mut cursor = self.begin();
		while let Some(id) = cursor.pop(&self.arena) {
			order.push(id);
		}
		let mut slots = self.arena.into_slots();
		let values = order.into_iter().filter_map(|id| slots[id.index()].take()).collect();
		IntoIter::new(values)
	}
}

// ===========================================================================
// Test-Only Validation Module
// ===========================================================================

/// Invariant validation for testing.
#[cfg(any(test, feature = "test-utils"))]
impl<T: fmt::Debug, C: Comparator<T>> GenericTree<T, C> {
	/// Validates all tree invariants. Panics with diagnostic info if any invariant is violated.
	///
	/// # Invariants Checked
	///
	/// 1. Root linkage: the root has no parent
	/// 2. Parent consistency: every child's `parent` is the node linking to it
	/// 3. Ordering: every value lies strictly between the bounds inherited from its ancestors
	/// 4. Size consistency: reachable nodes == `len()` == occupied arena slots
	pub fn assert_invariants(&self) {
		let Some(root) = self.root else {
			assert_eq!(self.arena.len(), 0, "Empty tree has {} occupied slots", self.arena.len());
			return;
		};

		// Invariant 1: Root linkage
		assert_eq!(
			self.arena.get(root).parent,
			None,
			"Root {:?} has parent {:?}",
			root,
			self.arena.get(root).parent
		);

		let mut reachable = 0usize;
		let mut stack: Vec<(NodeId, Option<&T>, Option<&T>)> = vec![(root, None, None)];
		while let Some((id, lower, upper)) = stack.pop() {
			reachable += 1;
			let node = self.arena.get(id);

			// Invariant 3: Ordering
			if let Some(lower) = lower {
				assert!(
					self.comparator.less(lower, &node.value),
					"Value {:?} not after lower bound {:?}",
					node.value,
					lower
				);
			}
			if let Some(upper) = upper {
				assert!(
					self.comparator.less(&node.value, upper),
					"Value {:?} not before upper bound {:?}",
					node.value,
					upper
				);
			}

			// Invariant 2: Parent consistency
			for (side, child) in [(Side::Left, node.left), (Side::Right, node.right)] {
				let Some(child) = child else {
					continue;
				};
				let child_node = self
					.arena
					.try_get(child)
					.unwrap_or_else(|| panic!("{:?} links to vacant {:?}", id, child));
				assert_eq!(
					child_node.parent,
					Some(id),
					"{:?} child {:?} of {:?} has parent {:?}",
					side,
					child,
					id,
					child_node.parent
				);
				match side {
					Side::Left => stack.push((child, lower, Some(&node.value))),
					Side::Right => stack.push((child, Some(&node.value), upper)),
				}
			}
		}

		// Invariant 4: Size consistency
		assert_eq!(reachable, self.len(), "Reachable {} != len {}", reachable, self.len());
		assert!(
			reachable <= self.arena.len() + self.arena.vacant(),
			"Reachable {} exceeds slot count",
			reachable
		);
	}
}
