use std::io::{
	Read,
	Result,
	Write
};

pub trait ReadBinExt: Read {
	/// Reads a NUL-padded string field of exactly `len` bytes
	#[inline]
	fn read_fixed_str(&mut self, len: usize) -> Result<String> {
		let mut buf = vec![0; len];
		self.read_exact(&mut buf)?;

		Ok(buf.iter().take_while(|&&b| b != 0).map(|&b| b as char).collect())
	}
}

impl<R> ReadBinExt for R
where
	R: Read + ?Sized,
{
}

pub trait WriteBinExt: Write {
	/// Writes `s` into a field of exactly `len` bytes, truncating long strings and padding short
	/// ones with NULs. Non-ASCII characters are written as `?`.
	#[inline]
	fn write_fixed_str(&mut self, s: &str, len: usize) -> Result<()> {
		let mut buf = vec![0; len];

		for (dst, c) in buf.iter_mut().zip(s.chars()) {
			*dst = if c.is_ascii() {
				c as u8
			} else {
				b'?'
			};
		}

		self.write_all(&buf)
	}
}

impl<W> WriteBinExt for W
where
	W: Write + ?Sized,
{
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_fixed_str() {
		let mut data = &b"M_Body\x00\x00\x00\x00tail"[..];
		assert_eq!("M_Body".to_string(), data.read_fixed_str(10).unwrap());
		assert_eq!(data, &b"tail"[..]);
	}

	#[test]
	fn test_write_fixed_str() {
		let mut out = vec![];
		out.write_fixed_str("M_Head", 8).unwrap();
		assert_eq!(out, b"M_Head\x00\x00".to_vec());

		let mut out = vec![];
		out.write_fixed_str("abcdefgh", 4).unwrap();
		assert_eq!(out, b"abcd".to_vec());

		let mut out = vec![];
		out.write_fixed_str("näme", 6).unwrap();
		assert_eq!(out, b"n?me\x00\x00".to_vec());
	}
}
