use std::{
	fs,
	path::Path
};

use tempfile::tempdir;

use fmk_core::{
	mask::Range,
	scene::{
		MemoryHost,
		ObjectKind,
		SceneObject
	}
};
use fmk_export::{
	export,
	ExportCfg,
	ExportError,
	ObjectError,
	SourceLocator,
	writer::{
		ListWriter,
		PacWriter
	}
};
use fmk_masks_list::MaskList;
use fmk_masks_pac::PacContainer;

/// Three triangles over seven vertices, in export order
static FACE_LIST: &str = "o mesh
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
v 2 0 0
v 2 1 0
v 2 2 0
f 1/1/1 2/2/1 3/3/1
f 2/2/1 3/3/1 4/4/1
f 5/5/1 6/6/1 7/7/1
";

fn write_face_list(dir: &Path, name: &str) {
	fs::write(dir.join(format!("{}.obj", name)), FACE_LIST).unwrap();
}

/// Selection with two faces matching ordinals 2 and 3, listed with a different winding
fn skin(name: &str) -> SceneObject {
	SceneObject::new(name, ObjectKind::Mesh)
		.tri([0, 1, 2], false)
		.tri([3, 2, 1], true)
		.tri([6, 4, 5], true)
}

fn words(values: &[u32]) -> Vec<u8> {
	values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[test]
fn test_pac_export() {
	let dir = tempdir().unwrap();
	write_face_list(dir.path(), "3 yCS_skin");

	let mut host = MemoryHost::new();
	host.add_selected(skin("3 yCS_skin"));

	let out = dir.path().join("00CE.pac");
	let summary = export(&host, &ExportCfg::for_output(&out), &PacWriter::default(), &out).unwrap();
	assert!(summary.is_clean());
	assert_eq!(summary.exported, vec!["3 yCS_skin".to_string()]);

	let data = fs::read(&out).unwrap();
	let mut expected = words(&[0, 0x0C, 1, 0x4C, 120]);
	let mut name = b"M_Body".to_vec();
	name.resize(64, 0);
	expected.extend(name);
	expected.extend(words(&[0, 1, 0x10, 0x28, 0, 1, 0x10, 0x18, 1, 2, 3]));
	assert_eq!(data, expected);
}

#[test]
fn test_empty_objects_are_omitted_everywhere() {
	let dir = tempdir().unwrap();
	write_face_list(dir.path(), "0 yCS_head");
	write_face_list(dir.path(), "1 yCS_body");

	let mut host = MemoryHost::new();
	host.add_selected(SceneObject::new("0 yCS_head", ObjectKind::Mesh).tri([2, 1, 0], true));
	host.add_selected(SceneObject::new("1 yCS_body", ObjectKind::Mesh)
		.tri([0, 1, 2], false)
		.tri([0, 1, 5], true));

	let cfg = ExportCfg::for_output(&dir.path().join("masks"));

	let pac_path = dir.path().join("masks.pac");
	let summary = export(&host, &cfg, &PacWriter::default(), &pac_path).unwrap();
	assert_eq!(summary.empty, vec!["1 yCS_body".to_string()]);
	assert_eq!(summary.unmatched, vec![("1 yCS_body".to_string(), 1)]);
	assert_eq!(summary.unmatched_faces(), 1);

	let pac = PacContainer::read(&mut fs::read(&pac_path).unwrap().as_slice()).unwrap();
	assert_eq!(pac.header().num_blocks, 1);
	assert_eq!(pac.blocks[0].name, "M_Head");
	assert_eq!(pac.blocks[0].ranges(), vec![Range::new(1, 1)]);

	let list_path = dir.path().join("masks.txt");
	export(&host, &cfg, &ListWriter::default(), &list_path).unwrap();
	assert_eq!(fs::read_to_string(&list_path).unwrap(), "Object0\n1\n");
}

#[test]
fn test_failed_objects_do_not_stop_the_export() {
	let dir = tempdir().unwrap();
	write_face_list(dir.path(), "2 yCS_skin");
	fs::write(dir.path().join("4 yCS_skin.obj"), "f 1 2 three\n").unwrap();

	let mut host = MemoryHost::new();
	host.add_selected(skin("1 yCS_skin"));
	host.add_selected(skin("yCS_skin"));
	host.add_selected(skin("4 yCS_skin"));
	host.add_selected(skin("2 yCS_skin"));

	let out = dir.path().join("masks.txt");
	let summary = export(&host, &ExportCfg::for_output(&out), &ListWriter::default(), &out).unwrap();

	assert_eq!(summary.exported, vec!["2 yCS_skin".to_string()]);
	assert_eq!(summary.skipped.len(), 3);
	assert!(matches!(summary.skipped[0].1, ObjectError::SourceNotFound { .. }));
	assert!(matches!(summary.skipped[1].1, ObjectError::MalformedName(_)));
	assert!(matches!(summary.skipped[2].1, ObjectError::SourceUnreadable { .. }));

	assert_eq!(fs::read_to_string(&out).unwrap(), "Object2\n2,3\n");
}

#[test]
fn test_single_source_is_shared() {
	let dir = tempdir().unwrap();
	let source = dir.path().join("original.obj");
	fs::write(&source, FACE_LIST).unwrap();

	let mut host = MemoryHost::new();
	host.add_selected(skin("0 head"));
	host.add_selected(SceneObject::new("5 body", ObjectKind::Mesh).tri([0, 1, 2], true));

	let cfg = ExportCfg {
		source: SourceLocator::Single(source),
		mesh_only: true,
	};

	let out = dir.path().join("masks.txt");
	export(&host, &cfg, &ListWriter::default(), &out).unwrap();

	let list = MaskList::parse(&fs::read_to_string(&out).unwrap()).unwrap();
	assert_eq!(list.entries.len(), 2);
	assert_eq!(list.entries[0].name, "Object0");
	assert_eq!(list.entries[0].ordinals, vec![2, 3]);
	assert_eq!(list.entries[1].name, "Object5");
	assert_eq!(list.entries[1].ordinals, vec![1]);
}

#[test]
fn test_write_failure_is_fatal() {
	let dir = tempdir().unwrap();

	let mut host = MemoryHost::new();
	host.add_selected(skin("0 head"));

	let cfg = ExportCfg {
		source: SourceLocator::HostOrder,
		mesh_only: true,
	};

	let out = dir.path().join("missing").join("masks.pac");
	match export(&host, &cfg, &PacWriter::default(), &out) {
		Err(ExportError::WriteFailure { path, .. }) => assert_eq!(path, out),
		other => panic!("unexpected {:?}", other),
	}
	assert!(!out.exists());
}

#[test]
fn test_export_replaces_existing_output() {
	let dir = tempdir().unwrap();
	let out = dir.path().join("masks.txt");
	fs::write(&out, "stale contents that are longer than the new list\n").unwrap();

	let mut host = MemoryHost::new();
	host.add_selected(skin("7 skin"));

	let cfg = ExportCfg {
		source: SourceLocator::HostOrder,
		mesh_only: true,
	};

	export(&host, &cfg, &ListWriter::default(), &out).unwrap();
	assert_eq!(fs::read_to_string(&out).unwrap(), "Object7\n2,3\n");

	let leftovers = fs::read_dir(dir.path()).unwrap().count();
	assert_eq!(leftovers, 1);
}

#[test]
fn test_names_cannot_leave_the_source_dir() {
	let dir = tempdir().unwrap();
	let masks = dir.path().join("masks");
	fs::create_dir(&masks).unwrap();
	write_face_list(dir.path(), "3 skin");
	write_face_list(&masks, "4 skin");

	let mut host = MemoryHost::new();
	host.add_selected(skin("../3 skin"));
	host.add_selected(skin("4 skin"));

	let out = masks.join("masks.txt");
	let summary = export(&host, &ExportCfg::for_output(&out), &ListWriter::default(), &out).unwrap();

	assert_eq!(summary.skipped, vec![("../3 skin".to_string(), ObjectError::UnsafeName("../3 skin".to_string()))]);
	assert_eq!(fs::read_to_string(&out).unwrap(), "Object4\n2,3\n");
}

#[cfg(unix)]
#[test]
fn test_output_mode_matches_a_plain_write() {
	use std::os::unix::fs::PermissionsExt;

	let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;

	let dir = tempdir().unwrap();
	let plain = dir.path().join("plain.txt");
	fs::write(&plain, "").unwrap();

	let mut host = MemoryHost::new();
	host.add_selected(skin("7 skin"));

	let cfg = ExportCfg {
		source: SourceLocator::HostOrder,
		mesh_only: true,
	};

	let out = dir.path().join("masks.txt");
	export(&host, &cfg, &ListWriter::default(), &out).unwrap();
	assert_eq!(mode(&out), mode(&plain));

	// replacing a file keeps its mode
	fs::set_permissions(&out, fs::Permissions::from_mode(0o640)).unwrap();
	export(&host, &cfg, &PacWriter::default(), &out).unwrap();
	assert_eq!(mode(&out), 0o640);
}
