//! # Error Types for the Search Tree
//!
//! Most tree operations cannot fail: inserting a duplicate key is a no-op that
//! returns the stored value, removing an absent key is a no-op, and lookups
//! report absence with `None`. The variants below cover the remaining cases:
//!
//! - reading an extremum (or the root) of an empty tree,
//! - explicit "must exist" lookups,
//! - persistence, where files may be missing and input may be malformed.
//!
//! ## Persistence Failure Flow
//!
//! ```text
//! save_binary(path)
//!      │
//!      ▼
//! Open file ─────────────► Err(IoUnavailable) ───► nothing written
//!      │
//!      ▼ (Ok)
//! Write count + records ─► Err(Io) ───────────────► stream left as written
//!      │
//!      ▼
//! Ok(())
//! ```
//!
//! Restoring works the same way in reverse: values decoded before a failure
//! stay inserted in the target tree.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by tree operations.
#[derive(Error, Debug)]
pub enum Error {
	/// A lookup that requires the key to exist did not find it.
	///
	/// Only [`try_search`](crate::GenericTree::try_search) produces this.
	/// [`search`](crate::GenericTree::search) returns `None` instead.
	#[error("key not found")]
	NotFound,

	/// The operation needs at least one element.
	///
	/// Returned by [`min`](crate::GenericTree::min),
	/// [`max`](crate::GenericTree::max) and [`root`](crate::GenericTree::root).
	/// Check [`is_empty`](crate::GenericTree::is_empty) first, or use the
	/// `Option` returning [`first`](crate::GenericTree::first) and
	/// [`last`](crate::GenericTree::last).
	#[error("tree is empty")]
	EmptyTree,

	/// A file could not be opened for saving or loading.
	///
	/// The operation was skipped entirely: no bytes were written and the tree
	/// was not modified.
	#[error("cannot open {}", path.display())]
	IoUnavailable {
		/// The path that failed to open.
		path: PathBuf,
		/// The underlying error from the operating system.
		#[source]
		source: std::io::Error,
	},

	/// Reading or writing failed after the stream was opened.
	#[error("i/o failure")]
	Io(#[from] std::io::Error),

	/// Binary input ended inside the record count header.
	#[error("truncated header: read {read} of {} bytes", crate::persist::COUNT_WIDTH)]
	TruncatedHeader {
		/// Header bytes available before end of input.
		read: usize,
	},

	/// Binary input ended before the announced number of records was read.
	#[error("truncated input: expected {expected} records, read {read}")]
	Truncated {
		/// The record count stored in the header.
		expected: u64,
		/// The number of complete records decoded.
		read: u64,
	},

	/// A fixed-width binary record was not a valid encoding of the payload.
	#[error("record {index} does not decode")]
	Decode {
		/// Zero-based record index in file order.
		index: u64,
	},

	/// A whitespace-delimited text token failed to parse.
	#[error("cannot parse {token:?} on line {line}")]
	Parse {
		/// The offending token.
		token: String,
		/// One-based line number of the token.
		line: usize,
	},
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;
