//! Text face mask lists: for every masked object, one line with its identifier followed by one
//! line of comma-separated face ordinals.
//!
//! ```text
//! Object0
//! 1,2,3,17
//! Object3
//! 4,5
//! ```

use std::io::{
	self,
	Write
};

use thiserror::Error;

use fmk_core::mask::Ordinal;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineEnding {
	Lf,
	CrLf,
}

impl LineEnding {
	pub fn as_str(self) -> &'static str {
		match self {
			LineEnding::Lf => "\n",
			LineEnding::CrLf => "\r\n",
		}
	}
}

impl Default for LineEnding {
	fn default() -> Self {
		LineEnding::Lf
	}
}

#[derive(Error, Debug, PartialEq)]
pub enum ListImportError {
	#[error("Object {0:?} has no ordinal line")]
	MissingOrdinals(String),
	#[error("Malformed ordinal list on line {line}: {text:?}")]
	Ordinals {
		line: usize,
		text: String,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListEntry {
	pub name: String,
	pub ordinals: Vec<Ordinal>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaskList {
	pub entries: Vec<ListEntry>,
}

impl MaskList {
	pub fn new() -> MaskList {
		MaskList::default()
	}

	/// Appends an object's ordinals; objects with nothing masked are left out
	pub fn push(&mut self, name: &str, ordinals: &[Ordinal]) -> bool {
		if ordinals.is_empty() {
			return false;
		}

		self.entries.push(ListEntry {
			name: name.to_string(),
			ordinals: ordinals.to_vec(),
		});
		true
	}

	#[cfg(feature = "export")]
	pub fn format(&self, ending: LineEnding) -> String {
		let mut out = String::new();

		for entry in self.entries.iter() {
			out.push_str(&entry.name);
			out.push_str(ending.as_str());

			let ordinals: Vec<String> = entry.ordinals.iter().map(|o| o.to_string()).collect();
			out.push_str(&ordinals.join(","));
			out.push_str(ending.as_str());
		}

		out
	}

	#[cfg(feature = "export")]
	pub fn write<W>(&self, buf: &mut W, ending: LineEnding) -> io::Result<()>
	where
		W: Write + ?Sized,
	{
		buf.write_all(self.format(ending).as_bytes())
	}

	/// Parses a mask list written with either line ending
	#[cfg(feature = "import")]
	pub fn parse(input: &str) -> Result<MaskList, ListImportError> {
		let mut entries = vec![];
		let mut lines = input.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

		while let Some((_, name)) = lines.next() {
			let name = name.trim();
			let (i, text) = lines.next().ok_or_else(|| ListImportError::MissingOrdinals(name.to_string()))?;

			let ordinals = import::ordinals(text).map_err(|_| ListImportError::Ordinals {
				line: i + 1,
				text: text.to_string(),
			})?;

			entries.push(ListEntry {
				name: name.to_string(),
				ordinals: ordinals,
			});
		}

		Ok(MaskList {
			entries: entries,
		})
	}
}

#[cfg(feature = "import")]
mod import {
	use nom::{
		character::complete::{
			char,
			u32
		},
		combinator::all_consuming,
		error::Error,
		Finish,
		multi::separated_list1
	};

	use fmk_core::{
		mask::Ordinal,
		nom_ext::ws
	};

	/// Parses a full line of comma-separated ordinals
	pub fn ordinals(input: &str) -> Result<Vec<Ordinal>, Error<&str>> {
		all_consuming(separated_list1(ws(char(',')), ws(u32)))(input)
			.finish()
			.map(|(_, ordinals)| ordinals)
	}
}
