use nom::error::Error as NomError;

use std::{
	fs,
	io,
	path::Path
};

use thiserror::Error;

use fmk_core::mask::{
	FaceKey,
	FaceOrderIndex,
	VertexId
};

use crate::{
	directive,
	vertex_refs
};

#[derive(Error, Debug)]
pub enum ObjImportError {
	#[error("I/O error")]
	IO {
		#[from]
		source: io::Error,
	},
	#[error("Bad vertex reference {token:?} on line {line}")]
	VertexRef {
		line: usize,
		token: String,
	},
}

/// Extracts the vertex identifiers of a face directive line. Returns `None` for every other line,
/// and the offending token if a reference is not a positive integer.
pub fn face_vertices(line: &str) -> Option<Result<Vec<VertexId>, String>> {
	match directive::<NomError<&str>>(line) {
		Ok((args, "f")) => Some(vertex_refs(args).and_then(|refs| {
			refs.iter()
				.map(|&r| VertexId::try_from(r).ok().filter(|&v| v > 0).ok_or_else(|| r.to_string()))
				.collect()
		})),
		_ => None,
	}
}

/// Builds the canonical face order of a face list. Only triangles receive an ordinal; faces with
/// any other vertex count are skipped since the list is expected to be triangulated already.
pub fn face_order(input: &str) -> Result<FaceOrderIndex, ObjImportError> {
	let mut keys = vec![];

	for (i, line) in input.lines().enumerate() {
		if let Some(verts) = face_vertices(line) {
			let verts = verts.map_err(|token| ObjImportError::VertexRef {
				line: i + 1,
				token: token,
			})?;

			if let Some(key) = FaceKey::from_slice(&verts) {
				keys.push(key);
			}
		}
	}

	Ok(keys.into_iter().collect())
}

/// Reads a face list from disk. Invalid UTF-8 is replaced rather than rejected.
pub fn read<P>(path: P) -> Result<FaceOrderIndex, ObjImportError>
where
	P: AsRef<Path>,
{
	let data = fs::read(path)?;
	face_order(&String::from_utf8_lossy(&data))
}
