use bitflags::bitflags;

bitflags! {
	pub struct FaceFlag: u32 {
		const SELECTED = 1;
	}
}

impl Default for FaceFlag {
	fn default() -> Self {
		FaceFlag::empty()
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObjectKind {
	Mesh,
	Other,
}

/// A polygon as the host reports it
#[derive(Clone, Debug, PartialEq)]
pub struct HostFace {
	/// Object-local, 0-based vertex identifiers in listing order
	pub vertices: Vec<u32>,
	pub flags: FaceFlag,
}

impl HostFace {
	pub fn new(vertices: Vec<u32>, flags: FaceFlag) -> HostFace {
		HostFace {
			vertices: vertices,
			flags: flags,
		}
	}

	pub fn is_selected(&self) -> bool {
		self.flags.contains(FaceFlag::SELECTED)
	}
}

/// Read-only view of one object living in the host editor
pub trait HostObject {
	/// Free-text display name
	fn name(&self) -> &str;

	fn kind(&self) -> ObjectKind;

	/// Every face of the object, in the host's own face order
	fn faces(&self) -> &[HostFace];
}

/// Capabilities the mask exporters need from a 3D editor
pub trait Host {
	type Object: HostObject;

	/// Objects currently selected, in selection order
	fn selected_objects(&self) -> Vec<&Self::Object>;
}

/// Plain object snapshot, shared by host adapters that materialise their scene up front
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
	pub name: String,
	pub kind: ObjectKind,
	pub faces: Vec<HostFace>,
}

impl SceneObject {
	pub fn new(name: &str, kind: ObjectKind) -> SceneObject {
		SceneObject {
			name: name.to_string(),
			kind: kind,
			faces: vec![],
		}
	}

	/// Adds a triangle given by 0-based vertex identifiers
	pub fn tri(mut self, verts: [u32; 3], selected: bool) -> SceneObject {
		let flags = if selected {
			FaceFlag::SELECTED
		} else {
			FaceFlag::empty()
		};

		self.faces.push(HostFace::new(verts.to_vec(), flags));
		self
	}
}

impl HostObject for SceneObject {
	fn name(&self) -> &str {
		&self.name
	}

	fn kind(&self) -> ObjectKind {
		self.kind
	}

	fn faces(&self) -> &[HostFace] {
		&self.faces
	}
}

/// In-memory host, used wherever no editor is attached
#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
	objects: Vec<SceneObject>,
	selection: Vec<usize>,
}

impl MemoryHost {
	pub fn new() -> MemoryHost {
		MemoryHost::default()
	}

	/// Adds an object to the scene, returning its handle
	pub fn add(&mut self, object: SceneObject) -> usize {
		self.objects.push(object);
		self.objects.len() - 1
	}

	/// Appends an object to the selection; selecting twice is a no-op
	pub fn select(&mut self, handle: usize) {
		if handle < self.objects.len() && !self.selection.contains(&handle) {
			self.selection.push(handle);
		}
	}

	/// Adds an object and selects it
	pub fn add_selected(&mut self, object: SceneObject) -> usize {
		let handle = self.add(object);
		self.select(handle);
		handle
	}
}

impl Host for MemoryHost {
	type Object = SceneObject;

	fn selected_objects(&self) -> Vec<&SceneObject> {
		self.selection.iter().map(|&i| &self.objects[i]).collect()
	}
}
