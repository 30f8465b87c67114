use std::io::{
	self,
	Write
};

use fmk_core::mask::compress;
use fmk_masks_list::{
	LineEnding,
	MaskList
};
use fmk_masks_pac::{
	NamingPolicy,
	PacContainer
};

use crate::ObjectMask;

/// Output format of an export
pub trait MaskWriter {
	/// Short name used in log output
	fn format_name(&self) -> &'static str;

	/// Serialises the masks of every exported object into `buf`
	fn write(&self, objects: &[ObjectMask], buf: &mut dyn Write) -> io::Result<()>;
}

/// Binary container: ordinals are compressed into ranges, one block per object
#[derive(Clone, Debug, Default)]
pub struct PacWriter {
	pub naming: NamingPolicy,
}

impl PacWriter {
	pub fn container(&self, objects: &[ObjectMask]) -> PacContainer {
		let mut pac = PacContainer::new();

		for object in objects.iter() {
			let name = self.naming.container_name(object.identity.index);
			pac.push(name, &compress(&object.ordinals));
		}

		pac
	}
}

impl MaskWriter for PacWriter {
	fn format_name(&self) -> &'static str {
		"PAC container"
	}

	fn write(&self, objects: &[ObjectMask], buf: &mut dyn Write) -> io::Result<()> {
		self.container(objects).write(buf)
	}
}

/// Text list: every ordinal spelled out, no range compression
#[derive(Clone, Debug, Default)]
pub struct ListWriter {
	pub line_ending: LineEnding,
}

impl ListWriter {
	pub fn list(&self, objects: &[ObjectMask]) -> MaskList {
		let mut list = MaskList::new();

		for object in objects.iter() {
			list.push(&object.identity.object_name(), &object.ordinals);
		}

		list
	}
}

impl MaskWriter for ListWriter {
	fn format_name(&self) -> &'static str {
		"mask list"
	}

	fn write(&self, objects: &[ObjectMask], buf: &mut dyn Write) -> io::Result<()> {
		self.list(objects).write(buf, self.line_ending)
	}
}
