//! Selection snapshots: a Wavefront export of the live scene in which the selected faces are
//! grouped under a dedicated group name.
//!
//! ```text
//! o 3 yCS_skin
//! # kind: mesh
//! v 0 0 0
//! ...
//! g unselected
//! f 1 2 3
//! g selected
//! f 2 3 4
//! ```
//!
//! Every object in the file counts as selected, in file order. Vertex references are global and
//! 1-based as in any Wavefront file; they are converted to object-local 0-based identifiers.

use nom::{
	bytes::complete::tag,
	character::complete::char,
	error::Error as NomError,
	IResult,
	sequence::preceded
};

use std::{
	fs,
	io,
	path::Path
};

use thiserror::Error;

use fmk_core::{
	nom_ext::{
		rest_of_line,
		ws
	},
	scene::{
		FaceFlag,
		Host,
		HostFace,
		ObjectKind,
		SceneObject
	}
};

use crate::{
	directive,
	vertex_refs
};

/// Group name marking selected faces unless configured otherwise
pub const DEFAULT_SELECTION_GROUP: &str = "selected";

#[derive(Error, Debug)]
pub enum SnapshotError {
	#[error("I/O error")]
	IO {
		#[from]
		source: io::Error,
	},
	#[error("Face declared before any object on line {0}")]
	Orphan(usize),
	#[error("Bad vertex reference {token:?} on line {line}")]
	VertexRef {
		line: usize,
		token: String,
	},
	#[error("Vertex {vertex} on line {line} does not belong to object {object:?}")]
	ForeignVertex {
		line: usize,
		vertex: i64,
		object: String,
	},
}

/// Parses a `# kind: <word>` annotation
fn kind_comment(input: &str) -> IResult<&str, ObjectKind> {
	let (input, word) = preceded(char('#'), preceded(ws(tag("kind:")), rest_of_line))(input)?;

	Ok((input, match word {
		"mesh" => ObjectKind::Mesh,
		_ => ObjectKind::Other,
	}))
}

/// Object being assembled, with the number of vertices declared before it
struct Pending {
	object: SceneObject,
	base: i64,
}

/// Production host: a scene captured from the editor as a Wavefront selection snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapshotHost {
	objects: Vec<SceneObject>,
}

impl SnapshotHost {
	pub fn parse(input: &str, selection_group: &str) -> Result<SnapshotHost, SnapshotError> {
		let mut objects = vec![];
		let mut pending: Option<Pending> = None;
		let mut num_verts = 0i64;
		let mut selected = false;

		for (i, raw) in input.lines().enumerate() {
			let line = raw.trim_start();

			if let Ok((_, kind)) = kind_comment(line) {
				if let Some(p) = pending.as_mut() {
					p.object.kind = kind;
				}
				continue;
			}

			let (args, keyword) = match directive::<NomError<&str>>(line) {
				Ok(parsed) => parsed,
				Err(_) => continue,
			};

			match keyword {
				"o" => {
					if let Some(p) = pending.take() {
						objects.push(p.object);
					}

					pending = Some(Pending {
						object: SceneObject::new(args.trim(), ObjectKind::Mesh),
						base: num_verts,
					});
					selected = false;
				},
				"v" => num_verts += 1,
				"g" => selected = args.split_whitespace().any(|g| g == selection_group),
				"f" => {
					let p = pending.as_mut().ok_or(SnapshotError::Orphan(i + 1))?;
					let refs = vertex_refs(args).map_err(|token| SnapshotError::VertexRef {
						line: i + 1,
						token: token,
					})?;

					let mut verts = Vec::with_capacity(refs.len());
					for r in refs {
						if r == 0 {
							return Err(SnapshotError::VertexRef {
								line: i + 1,
								token: "0".to_string(),
							});
						}

						// negative references count back from the last declared vertex
						let global = if r < 0 {
							num_verts + r + 1
						} else {
							r
						};

						let local = u32::try_from(global - p.base - 1).map_err(|_| SnapshotError::ForeignVertex {
							line: i + 1,
							vertex: r,
							object: p.object.name.clone(),
						})?;

						verts.push(local);
					}

					let flags = if selected {
						FaceFlag::SELECTED
					} else {
						FaceFlag::empty()
					};

					p.object.faces.push(HostFace::new(verts, flags));
				},
				_ => {},
			}
		}

		if let Some(p) = pending {
			objects.push(p.object);
		}

		Ok(SnapshotHost {
			objects: objects,
		})
	}

	pub fn read<P>(path: P, selection_group: &str) -> Result<SnapshotHost, SnapshotError>
	where
		P: AsRef<Path>,
	{
		let data = fs::read(path)?;
		SnapshotHost::parse(&String::from_utf8_lossy(&data), selection_group)
	}

	pub fn objects(&self) -> &[SceneObject] {
		&self.objects
	}
}

impl Host for SnapshotHost {
	type Object = SceneObject;

	fn selected_objects(&self) -> Vec<&SceneObject> {
		self.objects.iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use fmk_core::scene::HostObject;

	use super::*;

	static TWO_OBJECTS: &str = "mtllib scene.mtl
o 0 yCS_head
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
g unselected
f 1/1 2/1 3/1
g mask selected
f 4 3 2

o 1 yCS_body
# kind: mesh
v 0 0 1
v 1 0 1
v 0 1 1
g selected
f 5 6 7
f -1 -3 -2
g default
f 7 6 5

o Armature
# kind: armature
";

	#[test]
	fn test_snapshot_objects() {
		let host = SnapshotHost::parse(TWO_OBJECTS, DEFAULT_SELECTION_GROUP).unwrap();
		let objects = host.selected_objects();
		assert_eq!(objects.len(), 3);

		let head = objects[0];
		assert_eq!(head.name(), "0 yCS_head");
		assert_eq!(head.kind(), ObjectKind::Mesh);
		assert_eq!(head.faces().len(), 2);
		assert!(!head.faces()[0].is_selected());
		assert_eq!(head.faces()[1].vertices, vec![3, 2, 1]);
		assert!(head.faces()[1].is_selected());

		let body = objects[1];
		assert_eq!(body.name(), "1 yCS_body");
		assert_eq!(body.faces()[0].vertices, vec![0, 1, 2]);
		assert_eq!(body.faces()[1].vertices, vec![2, 0, 1]);
		assert!(body.faces()[1].is_selected());
		assert!(!body.faces()[2].is_selected());

		assert_eq!(objects[2].kind(), ObjectKind::Other);
		assert!(objects[2].faces().is_empty());
	}

	#[test]
	fn test_custom_selection_group() {
		let host = SnapshotHost::parse(TWO_OBJECTS, "default").unwrap();
		let body = host.objects()[1].clone();
		let selected: Vec<bool> = body.faces.iter().map(|f| f.is_selected()).collect();
		assert_eq!(selected, vec![false, false, true]);
	}

	#[test]
	fn test_bare_group_resets_selection() {
		let input = "o 0 a\nv 0 0 0\nv 0 0 0\nv 0 0 0\nv 0 0 0\ng selected\nf 1 2 3\ng\nf 2 3 4\n";
		let host = SnapshotHost::parse(input, DEFAULT_SELECTION_GROUP).unwrap();
		let selected: Vec<bool> = host.objects()[0].faces.iter().map(|f| f.is_selected()).collect();
		assert_eq!(selected, vec![true, false]);
	}

	#[test]
	fn test_bare_object_starts_new_object() {
		let input = "o 0 a\nv 0 0 0\nv 0 0 0\nv 0 0 0\ng selected\nf 1 2 3\no\nv 0 0 0\nv 0 0 0\nv 0 0 0\nf 4 5 6\n";
		let host = SnapshotHost::parse(input, DEFAULT_SELECTION_GROUP).unwrap();
		let objects = host.objects();
		assert_eq!(objects.len(), 2);
		assert_eq!(objects[0].faces.len(), 1);
		assert_eq!(objects[1].name, "");
		assert_eq!(objects[1].faces[0].vertices, vec![0, 1, 2]);
		assert!(!objects[1].faces[0].is_selected());
	}

	#[test]
	fn test_orphan_face() {
		match SnapshotHost::parse("v 0 0 0\nf 1 1 1\n", DEFAULT_SELECTION_GROUP) {
			Err(SnapshotError::Orphan(2)) => {},
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn test_foreign_vertex() {
		let input = "o 0 a\nv 0 0 0\nv 0 0 0\nv 0 0 0\no 1 b\nv 0 0 0\nf 1 2 4\n";
		match SnapshotHost::parse(input, DEFAULT_SELECTION_GROUP) {
			Err(SnapshotError::ForeignVertex { line, vertex, object }) => {
				assert_eq!(line, 7);
				assert_eq!(vertex, 1);
				assert_eq!(object, "1 b");
			},
			other => panic!("unexpected {:?}", other),
		}
	}
}
