//! Test utilities for building trees of an exact shape from JSON fixtures
//!
//! A fixture is a nested object: `{"value": 10, "left": {...}, "right": {...}}`
//! with `left`/`right` omitted for missing children. Fixtures are linked into
//! the arena directly, so no insertion order has to be worked out by hand.
use crate::node::{Node, NodeId, Side};
use crate::GenericTree;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Deserialize, Debug)]
struct TreeNode<T> {
	value: T,
	left: Option<Box<TreeNode<T>>>,
	right: Option<Box<TreeNode<T>>>,
}

fn translate_node<T, C>(
	tree: &mut GenericTree<T, C>,
	tree_node: TreeNode<T>,
	parent: Option<NodeId>,
) -> NodeId {
	let TreeNode {
		value,
		left,
		right,
	} = tree_node;
	let id = tree.arena.alloc(Node::new(value, parent));
	for (side, child) in [(Side::Left, left), (Side::Right, right)] {
		if let Some(child) = child {
			let child_id = translate_node(tree, *child, Some(id));
			*tree.arena.get_mut(id).child_mut(side) = Some(child_id);
		}
	}
	id
}

pub fn sample_tree<T: DeserializeOwned, C: Default>(json: &str) -> GenericTree<T, C> {
	let json_tree: Option<TreeNode<T>> = serde_json::from_str(json).unwrap();
	let mut tree = GenericTree::new();
	if let Some(root) = json_tree {
		let id = translate_node(&mut tree, root, None);
		tree.root = Some(id);
	}
	tree
}

/// Renders the tree's shape in the fixture format.
pub fn shape_of<T: Serialize, C>(tree: &GenericTree<T, C>) -> Value {
	fn render<T: Serialize, C>(tree: &GenericTree<T, C>, id: NodeId) -> Value {
		let node = tree.arena.get(id);
		let mut out = json!({ "value": node.value });
		if let Some(left) = node.left {
			out["left"] = render(tree, left);
		}
		if let Some(right) = node.right {
			out["right"] = render(tree, right);
		}
		out
	}
	tree.root.map_or(Value::Null, |id| render(tree, id))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Tree;

	const SAMPLE: &str = r#"{
		"value": 50,
		"left": {
			"value": 30,
			"left": { "value": 20 },
			"right": { "value": 40 }
		},
		"right": {
			"value": 70,
			"left": {
				"value": 60,
				"right": { "value": 65 }
			},
			"right": { "value": 80 }
		}
	}"#;

	#[test]
	fn fixture_round_trips_through_shape() {
		let tree: Tree<i32> = sample_tree(SAMPLE);
		tree.assert_invariants();
		assert_eq!(tree.len(), 8);
		let expected: Value = serde_json::from_str(SAMPLE).unwrap();
		assert_eq!(shape_of(&tree), expected);
	}

	#[test]
	fn fixture_matches_insertion_in_pre_order() {
		let tree: Tree<i32> = sample_tree(SAMPLE);
		let rebuilt: Tree<i32> = tree.pre_order().copied().collect();
		assert_eq!(shape_of(&rebuilt), shape_of(&tree));
	}

	#[test]
	fn null_fixture_is_empty() {
		let tree: Tree<i32> = sample_tree("null");
		assert!(tree.is_empty());
		assert_eq!(shape_of(&tree), Value::Null);
	}

	#[test]
	fn remove_root_reattaches_successor_right_child() {
		let mut tree: Tree<i32> = sample_tree(SAMPLE);
		assert!(tree.remove(&50));
		tree.assert_invariants();

		// 60 moves into the root node; its right child 65 takes its place under 70.
		let expected = json!({
			"value": 60,
			"left": {
				"value": 30,
				"left": { "value": 20 },
				"right": { "value": 40 }
			},
			"right": {
				"value": 70,
				"left": { "value": 65 },
				"right": { "value": 80 }
			}
		});
		assert_eq!(shape_of(&tree), expected);
	}

	#[test]
	fn remove_inner_node_with_adjacent_successor() {
		let mut tree: Tree<i32> = sample_tree(SAMPLE);
		assert!(tree.remove(&30));
		tree.assert_invariants();

		let expected = json!({
			"value": 50,
			"left": {
				"value": 40,
				"left": { "value": 20 }
			},
			"right": {
				"value": 70,
				"left": {
					"value": 60,
					"right": { "value": 65 }
				},
				"right": { "value": 80 }
			}
		});
		assert_eq!(shape_of(&tree), expected);
	}

	#[test]
	fn remove_one_child_splices_into_left_link() {
		let mut tree: Tree<i32> = sample_tree(SAMPLE);
		assert!(tree.remove(&60));
		tree.assert_invariants();
		assert_eq!(shape_of(&tree)["right"]["left"], json!({ "value": 65 }));
	}
}
