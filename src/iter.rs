//! Iterators and cursors for the `GenericTree` data structure
//!
//! All in-order traversal is driven by a path stack of node ids. Building a
//! traversal from a subtree root pushes the root and then its whole inner
//! spine (left children going forward, right children in reverse), so the top
//! of the stack is the first element to visit. Advancing pops the top and
//! pushes the inner spine of its outer child.
//!
//! ```text
//!            10                 forward stack after construction: [10, 7, 5]
//!           /  \                after one step (5 popped):        [10, 7]
//!          7    15              after two steps (7 popped):       [10]
//!         /    /  \             after three steps (10 popped):    [15, 12]
//!        5    12   17
//! ```
//!
//! [`Cursor`] is the detached form: it borrows nothing, so the tree may be
//! modified while it is held. [`Iter`] borrows the tree and implements the
//! standard iterator traits.

use std::fmt;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::node::{Arena, NodeId, Side};
use crate::GenericTree;

/// Path stacks up to this depth stay inline.
const INLINE_DEPTH: usize = 16;

type PathStack = SmallVec<[NodeId; INLINE_DEPTH]>;

/// Direction of an in-order traversal.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
	/// Ascending order under the tree's comparator.
	Forward,
	/// Descending order under the tree's comparator.
	Reverse,
}

impl Direction {
	/// The child followed when building the spine.
	#[inline]
	fn inner(self) -> Side {
		match self {
			Direction::Forward => Side::Left,
			Direction::Reverse => Side::Right,
		}
	}

	/// The child whose spine is pushed after popping a node.
	#[inline]
	fn outer(self) -> Side {
		match self {
			Direction::Forward => Side::Right,
			Direction::Reverse => Side::Left,
		}
	}
}

/// A position in an in-order traversal that does not borrow the tree.
///
/// Obtained from [`GenericTree::begin`], [`GenericTree::end`],
/// [`GenericTree::rbegin`] and [`GenericTree::rend`]. Reading and advancing
/// take the tree as an argument.
///
/// # Validity
///
/// A cursor stays valid while values are inserted. It is invalidated when the
/// node it points at, or any node still on its pending stack, is removed. An
/// invalidated cursor never touches freed memory, but it may report `None`
/// early, skip values, or land on an unrelated value once the slot is reused.
/// Removing values while holding a cursor you intend to keep using is
/// unsupported.
///
/// # Example
///
/// ```
/// use sapling::Tree;
///
/// let mut tree: Tree<i32> = [10, 7, 15].into_iter().collect();
///
/// let mut cursor = tree.begin();
/// assert_eq!(cursor.get(&tree), Some(&7));
///
/// // Insertion does not invalidate the cursor.
/// tree.insert(12);
/// cursor.advance(&tree);
/// assert_eq!(cursor.get(&tree), Some(&10));
/// cursor.advance(&tree);
/// assert_eq!(cursor.get(&tree), Some(&12));
/// cursor.advance_by(&tree, 2);
/// assert!(cursor == tree.end());
/// ```
#[derive(Clone)]
pub struct Cursor {
	direction: Direction,
	stack: PathStack,
}

impl Cursor {
	pub(crate) fn new<T>(arena: &Arena<T>, root: Option<NodeId>, direction: Direction) -> Self {
		let mut cursor = Cursor::end(direction);
		cursor.push_spine(arena, root);
		cursor
	}

	pub(crate) fn end(direction: Direction) -> Self {
		Cursor {
			direction,
			stack: SmallVec::new(),
		}
	}

	/// Pushes `from` and then every inner child below it.
	fn push_spine<T>(&mut self, arena: &Arena<T>, from: Option<NodeId>) {
		let mut next = from;
		while let Some(id) = next {
			let Some(node) = arena.try_get(id) else {
				break;
			};
			self.stack.push(id);
			next = node.child(self.direction.inner());
		}
	}

	/// Pops the current node and moves to the next one, returning the popped id.
	pub(crate) fn pop<T>(&mut self, arena: &Arena<T>) -> Option<NodeId> {
		let id = self.stack.pop()?;
		let outer = arena.try_get(id).and_then(|node| node.child(self.direction.outer()));
		self.push_spine(arena, outer);
		Some(id)
	}

	/// The node at the current position.
	#[inline]
	pub(crate) fn current(&self) -> Option<NodeId> {
		self.stack.last().copied()
	}

	/// Traversal direction of this cursor.
	pub fn direction(&self) -> Direction {
		self.direction
	}

	/// Returns `true` once the traversal is exhausted.
	#[inline]
	pub fn is_end(&self) -> bool {
		self.stack.is_empty()
	}

	/// Returns the value at the current position, or `None` at the end.
	pub fn get<'t, T, C>(&self, tree: &'t GenericTree<T, C>) -> Option<&'t T> {
		self.current().and_then(|id| tree.arena.try_get(id)).map(|node| &node.value)
	}

	/// Moves to the next position. Advancing an end cursor does nothing.
	pub fn advance<T, C>(&mut self, tree: &GenericTree<T, C>) -> &mut Self {
		self.pop(&tree.arena);
		self
	}

	/// Moves `n` positions forward, stopping early at the end.
	pub fn advance_by<T, C>(&mut self, tree: &GenericTree<T, C>, n: usize) -> &mut Self {
		for _ in 0..n {
			if self.pop(&tree.arena).is_none() {
				break;
			}
		}
		self
	}
}

/// Two cursors are equal when they point at the same node, or are both at the end.
impl PartialEq for Cursor {
	fn eq(&self, other: &Self) -> bool {
		self.current() == other.current()
	}
}

impl Eq for Cursor {}

impl fmt::Debug for Cursor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Cursor")
			.field("direction", &self.direction)
			.field("depth", &self.stack.len())
			.field("current", &self.current())
			.finish()
	}
}

/// Borrowing in-order iterator over the values of a tree.
///
/// Yields ascending values from the front and descending values from the
/// back; the two ends never cross.
pub struct Iter<'t, T> {
	arena: &'t Arena<T>,
	front: Cursor,
	back: Cursor,
	remaining: usize,
}

impl<'t, T> Iter<'t, T> {
	pub(crate) fn new(arena: &'t Arena<T>, root: Option<NodeId>) -> Self {
		Iter {
			arena,
			front: Cursor::new(arena, root, Direction::Forward),
			back: Cursor::new(arena, root, Direction::Reverse),
			remaining: arena.len(),
		}
	}

	/// Returns the value the next call to `next` would yield.
	pub fn peek(&self) -> Option<&'t T> {
		if self.remaining == 0 {
			return None;
		}
		self.front.current().map(|id| &self.arena.get(id).value)
	}
}

impl<T> Clone for Iter<'_, T> {
	fn clone(&self) -> Self {
		Iter {
			arena: self.arena,
			front: self.front.clone(),
			back: self.back.clone(),
			remaining: self.remaining,
		}
	}
}

impl<'t, T> Iterator for Iter<'t, T> {
	type Item = &'t T;

	fn next(&mut self) -> Option<&'t T> {
		if self.remaining == 0 {
			return None;
		}
		let id = self.front.pop(self.arena)?;
		self.remaining -= 1;
		Some(&self.arena.get(id).value)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<'t, T> DoubleEndedIterator for Iter<'t, T> {
	fn next_back(&mut self) -> Option<&'t T> {
		if self.remaining == 0 {
			return None;
		}
		let id = self.back.pop(self.arena)?;
		self.remaining -= 1;
		Some(&self.arena.get(id).value)
	}
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.clone()).finish()
	}
}

/// Owning in-order iterator, produced by `GenericTree::into_iter`.
pub struct IntoIter<T> {
	inner: std::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
	pub(crate) fn new(values: Vec<T>) -> Self {
		IntoIter {
			inner: values.into_iter(),
		}
	}
}

impl<T> Iterator for IntoIter<T> {
	type Item = T;

	#[inline]
	fn next(&mut self) -> Option<T> {
		self.inner.next()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<T> DoubleEndedIterator for IntoIter<T> {
	#[inline]
	fn next_back(&mut self) -> Option<T> {
		self.inner.next_back()
	}
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("IntoIter").field(&self.inner.as_slice()).finish()
	}
}

/// Pre-order (node, left subtree, right subtree) iterator.
///
/// This is the order persistence writes in: reinserting the values in this
/// order into an empty tree with the same comparator rebuilds the same shape.
pub struct PreOrder<'t, T> {
	arena: &'t Arena<T>,
	stack: PathStack,
}

impl<'t, T> PreOrder<'t, T> {
	pub(crate) fn new(arena: &'t Arena<T>, root: Option<NodeId>) -> Self {
		PreOrder {
			arena,
			stack: root.into_iter().collect(),
		}
	}
}

impl<'t, T> Iterator for PreOrder<'t, T> {
	type Item = &'t T;

	fn next(&mut self) -> Option<&'t T> {
		let node = self.arena.get(self.stack.pop()?);
		// Right first so the left subtree is popped before it.
		self.stack.extend(node.right);
		self.stack.extend(node.left);
		Some(&node.value)
	}
}

impl<T> FusedIterator for PreOrder<'_, T> {}

#[cfg(test)]
mod tests {
	use crate::Tree;

	fn sample() -> Tree<i32> {
		[10, 7, 15, 17, 5, 226, 12, 20, 13].into_iter().collect()
	}

	#[test]
	fn forward_cursor_walks_ascending() {
		let tree = sample();
		let mut cursor = tree.begin();
		let mut seen = Vec::new();
		while let Some(v) = cursor.get(&tree) {
			seen.push(*v);
			cursor.advance(&tree);
		}
		assert_eq!(seen, vec![5, 7, 10, 12, 13, 15, 17, 20, 226]);
		assert!(cursor.is_end());
		assert_eq!(cursor, tree.end());
	}

	#[test]
	fn reverse_cursor_walks_descending() {
		let tree = sample();
		let mut cursor = tree.rbegin();
		let mut seen = Vec::new();
		while !cursor.is_end() {
			seen.push(*cursor.get(&tree).unwrap());
			cursor.advance(&tree);
		}
		assert_eq!(seen, vec![226, 20, 17, 15, 13, 12, 10, 7, 5]);
		assert_eq!(cursor, tree.rend());
	}

	#[test]
	fn cursor_construction_pushes_spine() {
		let tree = sample();
		// 10 -> 7 -> 5 for forward, 10 -> 15 -> 17 -> 226 for reverse.
		assert_eq!(tree.begin().stack.len(), 3);
		assert_eq!(tree.rbegin().stack.len(), 4);
	}

	#[test]
	fn cursor_equality_compares_position() {
		let tree = sample();
		let mut a = tree.begin();
		let mut b = tree.begin();
		assert_eq!(a, b);
		a.advance(&tree);
		assert_ne!(a, b);
		b.advance(&tree);
		assert_eq!(a, b);
		assert_eq!(tree.end(), tree.rend());
	}

	#[test]
	fn advance_by_stops_at_end() {
		let tree = sample();
		let mut cursor = tree.begin();
		cursor.advance_by(&tree, 2);
		assert_eq!(cursor.get(&tree), Some(&10));
		cursor.advance_by(&tree, 100);
		assert!(cursor.is_end());
		cursor.advance(&tree);
		assert!(cursor.is_end());
		assert_eq!(cursor.get(&tree), None);
	}

	#[test]
	fn cloned_cursor_is_independent() {
		let tree = sample();
		let mut a = tree.begin();
		let b = a.clone();
		a.advance(&tree);
		assert_eq!(a.get(&tree), Some(&7));
		assert_eq!(b.get(&tree), Some(&5));
	}

	#[test]
	fn cursor_survives_insertion() {
		let mut tree = sample();
		let mut cursor = tree.begin();
		cursor.advance_by(&tree, 4); // at 13
		tree.insert(14);
		tree.insert(1);
		let rest: Vec<i32> = std::iter::from_fn(|| {
			let v = cursor.get(&tree).copied();
			cursor.advance(&tree);
			v
		})
		.collect();
		assert_eq!(rest, vec![13, 14, 15, 17, 20, 226]);
	}

	#[test]
	fn iter_meets_in_the_middle() {
		let tree = sample();
		let mut iter = tree.iter();
		assert_eq!(iter.len(), 9);
		assert_eq!(iter.next(), Some(&5));
		assert_eq!(iter.next_back(), Some(&226));
		assert_eq!(iter.next(), Some(&7));
		assert_eq!(iter.next_back(), Some(&20));
		let middle: Vec<_> = iter.by_ref().copied().collect();
		assert_eq!(middle, vec![10, 12, 13, 15, 17]);
		assert_eq!(iter.next(), None);
		assert_eq!(iter.next_back(), None);
	}

	#[test]
	fn iter_peek_does_not_advance() {
		let tree = sample();
		let mut iter = tree.iter();
		assert_eq!(iter.peek(), Some(&5));
		assert_eq!(iter.peek(), Some(&5));
		iter.next();
		assert_eq!(iter.peek(), Some(&7));
	}

	#[test]
	fn removed_cursor_target_never_panics() {
		let mut tree = sample();
		let mut cursor = tree.begin();
		cursor.advance(&tree);
		assert_eq!(cursor.get(&tree), Some(&7));

		// Free the cursor's node and its left neighbour, then refill one slot.
		assert!(tree.remove(&7));
		assert!(tree.remove(&5));
		tree.insert(1000);
		tree.assert_invariants();

		let mut seen = Vec::new();
		for _ in 0..64 {
			if cursor.is_end() {
				break;
			}
			if let Some(v) = cursor.get(&tree) {
				seen.push(*v);
			}
			cursor.advance(&tree);
		}
		assert!(cursor.is_end());
		assert!(seen.iter().all(|v| tree.contains(v)), "stale walk yielded {:?}", seen);
		assert_eq!(seen, vec![10, 12, 13, 15, 17, 20, 226, 1000]);
	}

	#[test]
	fn pre_order_visits_root_first() {
		let tree = sample();
		let order: Vec<_> = tree.pre_order().copied().collect();
		assert_eq!(order, vec![10, 7, 5, 15, 12, 13, 17, 226, 20]);
	}

	#[test]
	fn empty_tree_iterators() {
		let tree: Tree<u8> = Tree::new();
		assert!(tree.begin().is_end());
		assert!(tree.rbegin().is_end());
		assert_eq!(tree.iter().next(), None);
		assert_eq!(tree.pre_order().next(), None);
		assert_eq!(tree.into_iter().next(), None);
	}

	#[test]
	fn into_iter_is_double_ended() {
		let mut iter = sample().into_iter();
		assert_eq!(iter.next(), Some(5));
		assert_eq!(iter.next_back(), Some(226));
		assert_eq!(iter.len(), 7);
	}
}
