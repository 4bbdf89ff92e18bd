//! Orderings a tree can be parameterised with.
//!
//! A [`Comparator`] is a strict "ordered before" predicate. The tree never
//! asks for equality directly: two keys are equivalent when neither is ordered
//! before the other, which is what makes a descending or field-projecting
//! comparator collapse duplicates the same way the natural order does.

use std::cmp::Ordering;
use std::fmt;

/// A strict weak ordering over `T`.
pub trait Comparator<T: ?Sized> {
	/// Returns `true` if `a` is ordered strictly before `b`.
	fn less(&self, a: &T, b: &T) -> bool;

	/// Three-way comparison derived from [`less`](Self::less).
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		if self.less(a, b) {
			Ordering::Less
		} else if self.less(b, a) {
			Ordering::Greater
		} else {
			Ordering::Equal
		}
	}
}

/// Ascending order via [`Ord`]. The default for [`Tree`](crate::Tree).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
	#[inline]
	fn less(&self, a: &T, b: &T) -> bool {
		a < b
	}

	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		a.cmp(b)
	}
}

/// Descending order via [`Ord`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Descending;

impl<T: Ord + ?Sized> Comparator<T> for Descending {
	#[inline]
	fn less(&self, a: &T, b: &T) -> bool {
		b < a
	}

	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		b.cmp(a)
	}
}

/// A comparator backed by a closure returning "is `a` before `b`".
///
/// ```
/// use sapling::{compare::ByFn, GenericTree};
///
/// let mut tree = GenericTree::with_comparator(ByFn(|a: &(u32, char), b: &(u32, char)| a.0 < b.0));
/// tree.insert((2, 'b'));
/// tree.insert((1, 'a'));
/// tree.insert((2, 'z'));
///
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.search(&(2, '?')), Some(&(2, 'b')));
/// ```
#[derive(Clone, Copy, Default)]
pub struct ByFn<F>(pub F);

impl<T: ?Sized, F> Comparator<T> for ByFn<F>
where
	F: Fn(&T, &T) -> bool,
{
	#[inline]
	fn less(&self, a: &T, b: &T) -> bool {
		(self.0)(a, b)
	}
}

impl<F> fmt::Debug for ByFn<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("ByFn(..)")
	}
}
