//! Node storage for the search tree.
//!
//! Nodes live in an [`Arena`] and refer to each other through [`NodeId`]s
//! rather than pointers. A removed node's slot goes onto a free list and is
//! handed out again by the next allocation.
//!
//! ```text
//!   slots: [ Occupied(10) | Vacant | Occupied(7) | Occupied(15) ]
//!                 │                      ▲              ▲
//!                 ├── left ──────────────┘              │
//!                 └── right ────────────────────────────┘
//!   free:  [1]
//! ```
//!
//! Ownership follows the tree shape: the tree owns the root, every other node
//! is owned by the one child link that reaches it. `parent` is a plain
//! back-reference and is never used to release a slot.

use std::fmt;

/// Index of a node slot inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
	#[inline]
	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}
}

/// Which child link of a parent refers to a node.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Side {
	Left,
	Right,
}

/// A single tree node: one payload plus its three links.
pub(crate) struct Node<T> {
	pub(crate) value: T,
	pub(crate) parent: Option<NodeId>,
	pub(crate) left: Option<NodeId>,
	pub(crate) right: Option<NodeId>,
}

impl<T> Node<T> {
	pub(crate) fn new(value: T, parent: Option<NodeId>) -> Self {
		Node {
			value,
			parent,
			left: None,
			right: None,
		}
	}

	#[inline]
	pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
		match side {
			Side::Left => self.left,
			Side::Right => self.right,
		}
	}

	#[inline]
	pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
		match side {
			Side::Left => &mut self.left,
			Side::Right => &mut self.right,
		}
	}

	#[inline]
	pub(crate) fn is_leaf(&self) -> bool {
		self.left.is_none() && self.right.is_none()
	}
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Node")
			.field("value", &self.value)
			.field("parent", &self.parent)
			.field("left", &self.left)
			.field("right", &self.right)
			.finish()
	}
}

enum Slot<T> {
	Occupied(Node<T>),
	Vacant,
}

/// Slot storage with a free list.
pub(crate) struct Arena<T> {
	slots: Vec<Slot<T>>,
	free: Vec<NodeId>,
	occupied: usize,
}

impl<T> Arena<T> {
	pub(crate) fn new() -> Self {
		Arena {
			slots: Vec::new(),
			free: Vec::new(),
			occupied: 0,
		}
	}

	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Arena {
			slots: Vec::with_capacity(capacity),
			free: Vec::new(),
			occupied: 0,
		}
	}

	/// Number of occupied slots.
	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.occupied
	}

	/// Stores `node`, reusing a vacant slot when one exists.
	pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
		self.occupied += 1;
		if let Some(id) = self.free.pop() {
			self.slots[id.index()] = Slot::Occupied(node);
			id
		} else {
			let id = NodeId(
				u32::try_from(self.slots.len()).expect("arena exceeds u32::MAX nodes"),
			);
			self.slots.push(Slot::Occupied(node));
			id
		}
	}

	/// Vacates the slot and hands back the node it held.
	///
	/// # Panics
	///
	/// Panics if the slot is already vacant.
	pub(crate) fn free(&mut self, id: NodeId) -> Node<T> {
		match std::mem::replace(&mut self.slots[id.index()], Slot::Vacant) {
			Slot::Occupied(node) => {
				self.occupied -= 1;
				self.free.push(id);
				node
			}
			Slot::Vacant => panic!("double free of {:?}", id),
		}
	}

	/// Returns the node in `id`, or `None` if the slot is vacant or out of range.
	#[inline]
	pub(crate) fn try_get(&self, id: NodeId) -> Option<&Node<T>> {
		match self.slots.get(id.index()) {
			Some(Slot::Occupied(node)) => Some(node),
			_ => None,
		}
	}

	/// Returns the node in `id`.
	///
	/// # Panics
	///
	/// Panics if the slot is vacant. Ids reachable from the root never are.
	#[inline]
	pub(crate) fn get(&self, id: NodeId) -> &Node<T> {
		match self.try_get(id) {
			Some(node) => node,
			None => unreachable!("dangling {:?}", id),
		}
	}

	#[inline]
	pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<T> {
		match self.slots.get_mut(id.index()) {
			Some(Slot::Occupied(node)) => node,
			_ => unreachable!("dangling {:?}", id),
		}
	}

	/// Drops every node and forgets all slots.
	pub(crate) fn clear(&mut self) {
		self.slots.clear();
		self.free.clear();
		self.occupied = 0;
	}

	/// Consumes the arena, yielding each slot's payload indexed by [`NodeId`].
	pub(crate) fn into_slots(self) -> Vec<Option<T>> {
		self.slots
			.into_iter()
			.map(|slot| match slot {
				Slot::Occupied(node) => Some(node.value),
				Slot::Vacant => None,
			})
			.collect()
	}

	#[cfg(any(test, feature = "test-utils"))]
	pub(crate) fn vacant(&self) -> usize {
		self.free.len()
	}
}
