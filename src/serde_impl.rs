//! `serde` support, enabled by the `serde` feature.
//!
//! A tree serializes as a sequence of its values in pre-order, the same order
//! the binary and text formats use, and deserializes by inserting each element.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::compare::Comparator;
use crate::GenericTree;

impl<T: Serialize, C> Serialize for GenericTree<T, C> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut seq = serializer.serialize_seq(Some(self.len()))?;
		for value in self.pre_order() {
			seq.serialize_element(value)?;
		}
		seq.end()
	}
}

struct TreeVisitor<T, C> {
	marker: PhantomData<fn() -> GenericTree<T, C>>,
}

impl<'de, T, C> Visitor<'de> for TreeVisitor<T, C>
where
	T: Deserialize<'de>,
	C: Comparator<T> + Default,
{
	type Value = GenericTree<T, C>;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a sequence of tree values")
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
		let mut tree = GenericTree::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(value) = seq.next_element()? {
			tree.insert_new(value);
		}
		Ok(tree)
	}
}

impl<'de, T, C> Deserialize<'de> for GenericTree<T, C>
where
	T: Deserialize<'de>,
	C: Comparator<T> + Default,
{
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_seq(TreeVisitor {
			marker: PhantomData,
		})
	}
}
