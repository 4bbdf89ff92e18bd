//! # Binary and Text Persistence
//!
//! Both formats write values in pre-order (node, left subtree, right subtree).
//! Restoring inserts values in file order, so loading into an empty tree with
//! the same comparator rebuilds the exact shape that was saved.
//!
//! ## Binary Format
//!
//! ```text
//! ┌──────────────────┬───────────┬───────────┬─────┬───────────┐
//! │ count: u64 (LE)  │ record 0  │ record 1  │ ... │ record n-1│
//! └──────────────────┴───────────┴───────────┴─────┴───────────┘
//!                      └─ T::WIDTH bytes each, T::encode ─┘
//! ```
//!
//! Only payloads implementing [`FixedCodec`] can be written this way. The
//! trait is implemented for the primitive numeric types, `bool`, `char`, and
//! arrays of codec types; anything holding heap data has no fixed-size byte
//! representation and must use the text format (or serde).
//!
//! ## Text Format
//!
//! One value per line using [`Display`]. Reading splits the whole input on
//! whitespace and parses each token with [`FromStr`].
//!
//! ## Files
//!
//! The `save_*` and `load_*` helpers open a path first. If that fails they
//! return [`Error::IoUnavailable`] without writing anything or touching the
//! tree.

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use crate::compare::Comparator;
use crate::error::{Error, Result};
use crate::GenericTree;

/// Width in bytes of the binary element count header.
pub const COUNT_WIDTH: usize = 8;

// ---------------------------------------------------------------------------
// Fixed-Width Codec
// ---------------------------------------------------------------------------

/// A value with a stable fixed-size byte representation.
///
/// # Example
///
/// ```
/// use sapling::persist::FixedCodec;
///
/// let mut buf = [0u8; 4];
/// 0x0102_0304u32.encode(&mut buf);
/// assert_eq!(buf, [4, 3, 2, 1]);
/// assert_eq!(u32::decode(&buf), Some(0x0102_0304));
/// ```
pub trait FixedCodec: Sized {
	/// Number of bytes every encoded value occupies.
	const WIDTH: usize;

	/// Writes exactly `WIDTH` bytes into `out`.
	///
	/// `out` is always `WIDTH` bytes long.
	fn encode(&self, out: &mut [u8]);

	/// Reads a value back from exactly `WIDTH` bytes.
	///
	/// Returns `None` if the bytes are not a valid encoding.
	fn decode(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_fixed_codec_le {
	($($ty:ty),* $(,)?) => {
		$(
			impl FixedCodec for $ty {
				const WIDTH: usize = std::mem::size_of::<$ty>();

				#[inline]
				fn encode(&self, out: &mut [u8]) {
					out.copy_from_slice(&self.to_le_bytes());
				}

				#[inline]
				fn decode(bytes: &[u8]) -> Option<Self> {
					bytes.try_into().ok().map(<$ty>::from_le_bytes)
				}
			}
		)*
	};
}

impl_fixed_codec_le!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

impl FixedCodec for bool {
	const WIDTH: usize = 1;

	fn encode(&self, out: &mut [u8]) {
		out[0] = u8::from(*self);
	}

	fn decode(bytes: &[u8]) -> Option<Self> {
		match bytes {
			[0] => Some(false),
			[1] => Some(true),
			_ => None,
		}
	}
}

impl FixedCodec for char {
	const WIDTH: usize = 4;

	fn encode(&self, out: &mut [u8]) {
		u32::from(*self).encode(out);
	}

	fn decode(bytes: &[u8]) -> Option<Self> {
		u32::decode(bytes).and_then(char::from_u32)
	}
}

impl<T: FixedCodec, const N: usize> FixedCodec for [T; N] {
	const WIDTH: usize = T::WIDTH * N;

	fn encode(&self, out: &mut [u8]) {
		for (item, chunk) in self.iter().zip(out.chunks_exact_mut(T::WIDTH.max(1))) {
			item.encode(chunk);
		}
	}

	fn decode(bytes: &[u8]) -> Option<Self> {
		if bytes.len() != Self::WIDTH {
			return None;
		}
		let items: Vec<T> = (0..N)
			.map(|i| T::decode(&bytes[i * T::WIDTH..(i + 1) * T::WIDTH]))
			.collect::<Option<_>>()?;
		items.try_into().ok()
	}
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_for_write(path: &Path) -> Result<BufWriter<File>> {
	File::create(path).map(BufWriter::new).map_err(|source| {
		tracing::warn!(path = %path.display(), error = %source, "skipping save, cannot open file");
		Error::IoUnavailable {
			path: path.to_path_buf(),
			source,
		}
	})
}

fn open_for_read(path: &Path) -> Result<BufReader<File>> {
	File::open(path).map(BufReader::new).map_err(|source| {
		tracing::warn!(path = %path.display(), error = %source, "skipping load, cannot open file");
		Error::IoUnavailable {
			path: path.to_path_buf(),
			source,
		}
	})
}

/// Fills `buf` completely, or reports how many bytes were available at end of input.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
	let mut filled = 0;
	while filled < buf.len() {
		match reader.read(&mut buf[filled..]) {
			Ok(0) => break,
			Ok(n) => filled += n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		}
	}
	Ok(filled)
}

// ---------------------------------------------------------------------------
// Binary Persistence
// ---------------------------------------------------------------------------

impl<T: FixedCodec, C> GenericTree<T, C> {
	/// Writes the element count and every value, in pre-order, to `writer`.
	///
	/// # Example
	///
	/// ```
	/// use sapling::Tree;
	///
	/// let tree: Tree<u16> = [2, 1, 3].into_iter().collect();
	/// let mut bytes = Vec::new();
	/// tree.write_binary(&mut bytes)?;
	///
	/// assert_eq!(bytes.len(), 8 + 3 * 2);
	/// assert_eq!(&bytes[..8], &3u64.to_le_bytes());
	/// assert_eq!(&bytes[8..], &[2, 0, 1, 0, 3, 0]);
	/// # Ok::<(), sapling::error::Error>(())
	/// ```
	pub fn write_binary<W: Write>(&self, mut writer: W) -> Result<()> {
		writer.write_all(&(self.len() as u64).to_le_bytes())?;
		let mut record = vec![0u8; T::WIDTH];
		for value in self.pre_order() {
			value.encode(&mut record);
			writer.write_all(&record)?;
		}
		writer.flush()?;
		tracing::debug!(count = self.len(), width = T::WIDTH, "wrote binary tree");
		Ok(())
	}

	/// Saves the tree to `path` in the binary format.
	pub fn save_binary<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let writer = open_for_write(path.as_ref())?;
		self.write_binary(writer)
	}
}

impl<T: FixedCodec, C: Comparator<T>> GenericTree<T, C> {
	/// Reads a binary stream and inserts every record into this tree.
	///
	/// Returns the number of values newly inserted (duplicates of stored keys
	/// are skipped). Records decoded before an error stay inserted.
	pub fn read_binary<R: Read>(&mut self, mut reader: R) -> Result<usize> {
		let mut header = [0u8; COUNT_WIDTH];
		let got = read_full(&mut reader, &mut header)?;
		if got < COUNT_WIDTH {
			return Err(Error::TruncatedHeader {
				read: got,
			});
		}
		let expected = u64::from_le_bytes(header);
		// A zero-width payload has a single value, so a longer stream consumes no
		// input per record and can only be corrupt.
		if T::WIDTH == 0 && expected > 1 {
			return Err(Error::Decode {
				index: 1,
			});
		}

		let mut record = vec![0u8; T::WIDTH];
		let mut inserted = 0;
		for index in 0..expected {
			if read_full(&mut reader, &mut record)? < T::WIDTH {
				return Err(Error::Truncated {
					expected,
					read: index,
				});
			}
			let value = T::decode(&record).ok_or(Error::Decode {
				index,
			})?;
			if self.insert_new(value) {
				inserted += 1;
			}
		}
		tracing::debug!(expected, inserted, "read binary tree");
		Ok(inserted)
	}

	/// Loads records from the binary file at `path` into this tree.
	pub fn load_binary<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
		let reader = open_for_read(path.as_ref())?;
		self.read_binary(reader)
	}
}

// ---------------------------------------------------------------------------
// Text Persistence
// ---------------------------------------------------------------------------

impl<T: Display, C> GenericTree<T, C> {
	/// Writes every value on its own line, in pre-order.
	///
	/// # Example
	///
	/// ```
	/// use sapling::Tree;
	///
	/// let tree: Tree<i32> = [10, 7, 15].into_iter().collect();
	/// let mut out = Vec::new();
	/// tree.write_text(&mut out)?;
	/// assert_eq!(String::from_utf8(out).unwrap(), "10\n7\n15\n");
	/// # Ok::<(), sapling::error::Error>(())
	/// ```
	pub fn write_text<W: Write>(&self, mut writer: W) -> Result<()> {
		for value in self.pre_order() {
			writeln!(writer, "{}", value)?;
		}
		writer.flush()?;
		tracing::debug!(count = self.len(), "wrote text tree");
		Ok(())
	}

	/// Saves the tree to `path` in the text format.
	pub fn save_text<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let writer = open_for_write(path.as_ref())?;
		self.write_text(writer)
	}
}

impl<T: FromStr, C: Comparator<T>> GenericTree<T, C> {
	/// Parses whitespace-delimited tokens until end of input, inserting each.
	///
	/// Returns the number of values newly inserted. Stops at the first token
	/// that does not parse, reporting it as [`Error::Parse`]; values before it
	/// stay inserted.
	pub fn read_text<R: BufRead>(&mut self, reader: R) -> Result<usize> {
		let mut inserted = 0;
		for (line_no, line) in reader.lines().enumerate() {
			let line = line?;
			for token in line.split_whitespace() {
				let value = token.parse::<T>().map_err(|_| Error::Parse {
					token: token.to_string(),
					line: line_no + 1,
				})?;
				if self.insert_new(value) {
					inserted += 1;
				}
			}
		}
		tracing::debug!(inserted, "read text tree");
		Ok(inserted)
	}

	/// Loads values from the text file at `path` into this tree.
	pub fn load_text<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
		let reader = open_for_read(path.as_ref())?;
		self.read_text(reader)
	}
}
