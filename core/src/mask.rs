use std::{
	collections::{
		hash_map::Entry,
		HashMap
	},
	ops::RangeInclusive
};

/// 1-based position of a face within a source face list
pub type Ordinal = u32;

/// 1-based vertex identifier, as written in a face list
pub type VertexId = u32;

/// Geometric identity of a triangle: its three vertex identifiers, sorted so that winding and
/// listing order do not matter
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FaceKey([VertexId; 3]);

impl FaceKey {
	pub fn new(a: VertexId, b: VertexId, c: VertexId) -> FaceKey {
		let mut verts = [a, b, c];
		verts.sort_unstable();
		FaceKey(verts)
	}

	/// Builds a key from a vertex list, if it describes a triangle
	pub fn from_slice(verts: &[VertexId]) -> Option<FaceKey> {
		match verts {
			[a, b, c] => Some(FaceKey::new(*a, *b, *c)),
			_ => None,
		}
	}

	pub fn vertices(&self) -> [VertexId; 3] {
		self.0
	}
}

/// Lookup from a face's identity to its ordinal in the source face list.
///
/// Ordinals are dense and assigned in encounter order starting at 1. When two source faces share
/// a vertex set the first one keeps the key; later ones still consume an ordinal but can never be
/// looked up (see [`FaceOrderIndex::shadowed`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceOrderIndex {
	ordinals: HashMap<FaceKey, Ordinal>,
	count: Ordinal,
	shadowed: u32,
}

impl FaceOrderIndex {
	fn push(&mut self, key: FaceKey) {
		self.count += 1;

		match self.ordinals.entry(key) {
			Entry::Occupied(_) => self.shadowed += 1,
			Entry::Vacant(slot) => {
				slot.insert(self.count);
			},
		}
	}

	/// Returns the ordinal of the face with the given identity
	pub fn lookup(&self, key: &FaceKey) -> Option<Ordinal> {
		self.ordinals.get(key).copied()
	}

	/// Number of indexed faces, i.e. the highest ordinal handed out
	pub fn len(&self) -> usize {
		self.count as usize
	}

	pub fn is_empty(&self) -> bool {
		self.count == 0
	}

	/// Number of faces whose vertex set repeats an earlier face
	pub fn shadowed(&self) -> u32 {
		self.shadowed
	}
}

impl FromIterator<FaceKey> for FaceOrderIndex {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = FaceKey>,
	{
		let mut index = FaceOrderIndex::default();
		for key in iter {
			index.push(key);
		}

		index
	}
}

/// Closed interval of consecutive ordinals
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Range {
	pub start: Ordinal,
	pub end: Ordinal,
}

impl Range {
	pub fn new(start: Ordinal, end: Ordinal) -> Range {
		debug_assert!(start <= end, "inverted range {}..={}", start, end);
		Range {
			start: start,
			end: end,
		}
	}

	pub fn len(&self) -> u32 {
		self.end - self.start + 1
	}

	pub fn contains(&self, ordinal: Ordinal) -> bool {
		self.start <= ordinal && ordinal <= self.end
	}

	pub fn ordinals(&self) -> RangeInclusive<Ordinal> {
		self.start..=self.end
	}
}

/// Collapses sorted, distinct ordinals into the minimal list of ascending, non-overlapping ranges.
/// An empty input yields no ranges.
pub fn compress(ordinals: &[Ordinal]) -> Vec<Range> {
	let mut ranges = vec![];
	let mut iter = ordinals.iter().copied();

	let mut current = match iter.next() {
		Some(first) => Range::new(first, first),
		None => return ranges,
	};

	for ordinal in iter {
		debug_assert!(ordinal > current.end, "ordinals must be sorted and distinct");

		if current.end.checked_add(1) == Some(ordinal) {
			current.end = ordinal;
		} else {
			ranges.push(current);
			current = Range::new(ordinal, ordinal);
		}
	}
	ranges.push(current);

	ranges
}
