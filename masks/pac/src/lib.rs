//! Face mask container (`00CE.pac` style) consumed by the engine's asset pipeline.
//!
//! The layout is fixed byte for byte, all integers little endian `u32`:
//!
//! ```text
//! header   reserved(0) first_block_offset(0x0C) num_blocks
//! block    tag(0x4C) byte_len name[64] reserved(0) reserved(1) entry*
//! entry    tag(0x10) size(0x28) index reserved(1) 0x10 0x18 count(1) start end
//! ```
//!
//! A block's `byte_len` is `0x4C + 0x28 * entries + 4`, which is also its full size on disk.

use byteorder::{
	LE,
	ReadBytesExt,
	WriteBytesExt
};

use std::io;
use thiserror::Error;

use fmk_core::{
	io_ext::{
		ReadBinExt,
		WriteBinExt
	},
	mask::Range
};

pub const HEADER_SIZE: u32 = 0x0C;
pub const BLOCK_TAG: u32 = 0x4C;
pub const BLOCK_TRAILER: u32 = 4;
pub const NAME_LEN: usize = 64;
pub const ENTRY_TAG: u32 = 0x10;
pub const ENTRY_SIZE: u32 = 0x28;
pub const RANGE_LIST_OFFSET: u32 = 0x10;
pub const RANGE_COUNT_OFFSET: u32 = 0x18;
pub const RANGES_PER_ENTRY: u32 = 1;

pub const HEAD_CONTAINER: &str = "M_Head";
pub const BODY_CONTAINER: &str = "M_Body";

#[derive(Error, Debug)]
pub enum PacImportError {
	#[error("I/O error")]
	IO {
		#[from]
		source: io::Error,
	},
	#[error("Unexpected {field}: expected {expected:#x}, found {found:#x}")]
	Field {
		field: &'static str,
		expected: u32,
		found: u32,
	},
	#[error("Block length {0:#x} does not hold a whole number of mask entries")]
	BlockLength(u32),
	#[error("Invalid mask range {start}..={end}")]
	Range {
		start: u32,
		end: u32,
	},
}

/// Reads a `u32` that must hold a fixed structural value
#[cfg(feature = "import")]
fn read_fixed<R>(buf: &mut R, field: &'static str, expected: u32) -> Result<u32, PacImportError>
where
	R: ReadBytesExt,
{
	let found = buf.read_u32::<LE>()?;
	if found != expected {
		return Err(PacImportError::Field {
			field: field,
			expected: expected,
			found: found,
		});
	}

	Ok(found)
}

/// Maps an object's numeric identity to the container it masks
#[derive(Clone, Debug, PartialEq)]
pub struct NamingPolicy {
	pub head: String,
	pub body: String,
}

impl NamingPolicy {
	/// Object 0 is the head, everything else belongs to the body
	pub fn container_name(&self, index: u32) -> &str {
		match index {
			0 => &self.head,
			_ => &self.body,
		}
	}
}

impl Default for NamingPolicy {
	fn default() -> Self {
		Self {
			head: HEAD_CONTAINER.to_string(),
			body: BODY_CONTAINER.to_string(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Header {
	reserved0: u32, // always 0
	pub first_block_offset: u32,
	pub num_blocks: u32,
}

impl Header {
	pub fn new(num_blocks: u32) -> Header {
		Header {
			reserved0: 0,
			first_block_offset: HEADER_SIZE,
			num_blocks: num_blocks,
		}
	}

	#[cfg(feature = "import")]
	fn read<R>(buf: &mut R) -> Result<Header, PacImportError>
	where
		R: ReadBytesExt,
	{
		Ok(Header {
			reserved0: read_fixed(buf, "header reserved field", 0)?,
			first_block_offset: read_fixed(buf, "first block offset", HEADER_SIZE)?,
			num_blocks: buf.read_u32::<LE>()?,
		})
	}

	#[cfg(feature = "export")]
	fn write<W>(&self, buf: &mut W) -> io::Result<()>
	where
		W: WriteBytesExt + ?Sized,
	{
		buf.write_u32::<LE>(self.reserved0)?;
		buf.write_u32::<LE>(self.first_block_offset)?;
		buf.write_u32::<LE>(self.num_blocks)
	}
}

/// One range record within a block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaskEntry {
	/// 0-based position within the owning block
	pub index: u32,
	pub range: Range,
}

impl MaskEntry {
	#[cfg(feature = "import")]
	fn read<R>(index: u32, buf: &mut R) -> Result<MaskEntry, PacImportError>
	where
		R: ReadBytesExt,
	{
		read_fixed(buf, "entry tag", ENTRY_TAG)?;
		read_fixed(buf, "entry size", ENTRY_SIZE)?;
		read_fixed(buf, "entry index", index)?;
		read_fixed(buf, "entry reserved field", 1)?;
		read_fixed(buf, "range list offset", RANGE_LIST_OFFSET)?;
		read_fixed(buf, "range count offset", RANGE_COUNT_OFFSET)?;
		read_fixed(buf, "range count", RANGES_PER_ENTRY)?;

		let start = buf.read_u32::<LE>()?;
		let end = buf.read_u32::<LE>()?;
		if start == 0 || start > end {
			return Err(PacImportError::Range {
				start: start,
				end: end,
			});
		}

		Ok(MaskEntry {
			index: index,
			range: Range::new(start, end),
		})
	}

	#[cfg(feature = "export")]
	fn write<W>(&self, buf: &mut W) -> io::Result<()>
	where
		W: WriteBytesExt + ?Sized,
	{
		buf.write_u32::<LE>(ENTRY_TAG)?;
		buf.write_u32::<LE>(ENTRY_SIZE)?;
		buf.write_u32::<LE>(self.index)?;
		buf.write_u32::<LE>(1)?;
		buf.write_u32::<LE>(RANGE_LIST_OFFSET)?;
		buf.write_u32::<LE>(RANGE_COUNT_OFFSET)?;
		buf.write_u32::<LE>(RANGES_PER_ENTRY)?;
		buf.write_u32::<LE>(self.range.start)?;
		buf.write_u32::<LE>(self.range.end)
	}
}

/// Per-object section of a container
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectBlock {
	pub name: String,
	pub entries: Vec<MaskEntry>,
}

impl ObjectBlock {
	pub fn new(name: &str, ranges: &[Range]) -> ObjectBlock {
		ObjectBlock {
			name: name.to_string(),
			entries: ranges.iter().enumerate().map(|(i, r)| MaskEntry {
				index: i as u32,
				range: *r,
			}).collect(),
		}
	}

	/// Size of the block on disk, as stored in its length field
	pub fn byte_len(&self) -> u32 {
		BLOCK_TAG + ENTRY_SIZE * self.entries.len() as u32 + BLOCK_TRAILER
	}

	pub fn ranges(&self) -> Vec<Range> {
		self.entries.iter().map(|e| e.range).collect()
	}

	#[cfg(feature = "import")]
	fn read<R>(buf: &mut R) -> Result<ObjectBlock, PacImportError>
	where
		R: ReadBytesExt,
	{
		read_fixed(buf, "block tag", BLOCK_TAG)?;

		let length = buf.read_u32::<LE>()?;
		let fixed = BLOCK_TAG + BLOCK_TRAILER;
		if length < fixed || (length - fixed) % ENTRY_SIZE != 0 {
			return Err(PacImportError::BlockLength(length));
		}

		let name = buf.read_fixed_str(NAME_LEN)?;
		read_fixed(buf, "block reserved field", 0)?;
		read_fixed(buf, "block reserved field", 1)?;

		let mut entries = vec![];
		for i in 0..((length - fixed) / ENTRY_SIZE) {
			entries.push(MaskEntry::read(i, buf)?);
		}

		Ok(ObjectBlock {
			name: name,
			entries: entries,
		})
	}

	#[cfg(feature = "export")]
	fn write<W>(&self, buf: &mut W) -> io::Result<()>
	where
		W: WriteBytesExt + ?Sized,
	{
		buf.write_u32::<LE>(BLOCK_TAG)?;
		buf.write_u32::<LE>(self.byte_len())?;
		buf.write_fixed_str(&self.name, NAME_LEN)?;
		buf.write_u32::<LE>(0)?;
		buf.write_u32::<LE>(1)?;

		for entry in self.entries.iter() {
			entry.write(buf)?;
		}

		Ok(())
	}
}

/// In-memory container document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PacContainer {
	pub blocks: Vec<ObjectBlock>,
}

impl PacContainer {
	pub fn new() -> PacContainer {
		PacContainer::default()
	}

	/// Appends a block for `ranges`. Objects without any range are never emitted, so nothing is
	/// added and `false` is returned.
	pub fn push(&mut self, name: &str, ranges: &[Range]) -> bool {
		if ranges.is_empty() {
			return false;
		}

		self.blocks.push(ObjectBlock::new(name, ranges));
		true
	}

	pub fn header(&self) -> Header {
		Header::new(self.blocks.len() as u32)
	}

	/// Total size of the serialised container
	pub fn byte_len(&self) -> usize {
		HEADER_SIZE as usize + self.blocks.iter().map(|b| b.byte_len() as usize).sum::<usize>()
	}

	#[cfg(feature = "export")]
	pub fn write<W>(&self, buf: &mut W) -> io::Result<()>
	where
		W: WriteBytesExt + ?Sized,
	{
		self.header().write(buf)?;

		for block in self.blocks.iter() {
			block.write(buf)?;
		}

		Ok(())
	}

	#[cfg(feature = "import")]
	pub fn read<R>(buf: &mut R) -> Result<PacContainer, PacImportError>
	where
		R: ReadBytesExt,
	{
		let header = Header::read(buf)?;

		let mut blocks = vec![];
		for _ in 0..header.num_blocks {
			blocks.push(ObjectBlock::read(buf)?);
		}

		Ok(PacContainer {
			blocks: blocks,
		})
	}
}
