#[cfg(feature = "io_ext")]
pub mod io_ext;

#[cfg(feature = "nom_ext")]
pub mod nom_ext;

pub mod mask;
pub mod scene;

use thiserror::Error;

/// Template used to render an object's canonical identifier
pub const OBJECT_PREFIX: &str = "Object";

#[derive(Clone, Error, Debug, PartialEq)]
pub enum IdentityError {
	#[error("No decimal numeral in object name: {0:?}")]
	NoNumeral(String),
	#[error("Object number out of range in name: {0:?}")]
	Overflow(String),
}

/// Numeric identity of a host object, derived from its free-text display name
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ObjectIdentity {
	pub index: u32,
}

impl ObjectIdentity {
	/// Extracts the first run of decimal digits in `name`, so `"3 yCS_skin"` and `"Object3"` both
	/// resolve to index 3.
	///
	/// The digits are read as a number, so leading zeros are not kept: `"007 skin"` has index 7
	/// and renders as `Object7`, never `Object007`.
	pub fn parse(name: &str) -> Result<ObjectIdentity, IdentityError> {
		let start = match name.find(|c: char| c.is_ascii_digit()) {
			Some(pos) => pos,
			None => return Err(IdentityError::NoNumeral(name.to_string())),
		};

		let digits = &name[start..];
		let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());

		match digits[..end].parse::<u32>() {
			Ok(index) => Ok(ObjectIdentity {
				index: index,
			}),
			Err(_) => Err(IdentityError::Overflow(name.to_string())),
		}
	}

	/// Canonical identifier, e.g. `Object4`, with the index in plain decimal
	pub fn object_name(&self) -> String {
		format!("{}{}", OBJECT_PREFIX, self.index)
	}
}
