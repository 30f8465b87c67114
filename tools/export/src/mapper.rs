use log::debug;

use fmk_core::{
	mask::{
		FaceKey,
		FaceOrderIndex,
		Ordinal,
		VertexId
	},
	scene::HostFace
};

/// Selected faces of one object, resolved to face list ordinals
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchResult {
	/// Sorted and free of duplicates
	pub ordinals: Vec<Ordinal>,
	/// Selected faces with no counterpart in the face list
	pub unmatched: u32,
}

impl MatchResult {
	fn finish(mut ordinals: Vec<Ordinal>, unmatched: u32) -> MatchResult {
		ordinals.sort_unstable();
		ordinals.dedup();

		MatchResult {
			ordinals: ordinals,
			unmatched: unmatched,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.ordinals.is_empty()
	}
}

/// Converts the host's 0-based vertex identifiers into a face list key
fn face_key(face: &HostFace) -> Option<FaceKey> {
	let verts: Option<Vec<VertexId>> = face.vertices.iter().map(|v| v.checked_add(1)).collect();
	FaceKey::from_slice(&verts?)
}

/// Looks up every selected face among `faces` in `index`. Faces that cannot be found are counted
/// and skipped.
pub fn map<'a, I>(faces: I, index: &FaceOrderIndex) -> MatchResult
where
	I: IntoIterator<Item = &'a HostFace>,
{
	let mut ordinals = vec![];
	let mut unmatched = 0;

	for face in faces.into_iter().filter(|f| f.is_selected()) {
		match face_key(face).and_then(|key| index.lookup(&key)) {
			Some(ordinal) => ordinals.push(ordinal),
			None => {
				debug!("Face {:?} not found in face list", face.vertices);
				unmatched += 1;
			},
		}
	}

	MatchResult::finish(ordinals, unmatched)
}

/// Uses the host's own face order: a selected face's ordinal is its position among `faces` plus one
pub fn map_host_order<'a, I>(faces: I) -> MatchResult
where
	I: IntoIterator<Item = &'a HostFace>,
{
	let ordinals = faces.into_iter()
		.zip(1..)
		.filter(|(face, _)| face.is_selected())
		.map(|(_, ordinal)| ordinal)
		.collect();

	MatchResult::finish(ordinals, 0)
}
