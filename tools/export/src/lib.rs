pub mod mapper;
pub mod writer;

use log::{
	debug,
	info,
	warn
};

use std::{
	collections::HashMap,
	fmt::{
		self,
		Display,
		Formatter
	},
	fs,
	io::{
		self,
		BufWriter,
		Write
	},
	path::{
		Component,
		Path,
		PathBuf
	}
};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use tempfile::{
	Builder,
	NamedTempFile
};
use thiserror::Error;

use fmk_core::{
	IdentityError,
	mask::{
		FaceOrderIndex,
		Ordinal
	},
	ObjectIdentity,
	scene::{
		Host,
		HostObject,
		ObjectKind
	}
};
use fmk_models_wavefront::obj::{
	self,
	ObjImportError
};

use mapper::MatchResult;
use writer::MaskWriter;

/// Extension of per-object face lists
pub const FACE_LIST_EXT: &str = "obj";

/// Where the canonical face order of each object comes from
#[derive(Clone, Debug, PartialEq)]
pub enum SourceLocator {
	/// `<dir>/<display name>.obj` for every object
	Directory(PathBuf),
	/// One face list shared by every object
	Single(PathBuf),
	/// No face list, the host's face order is canonical
	HostOrder,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportCfg {
	pub source: SourceLocator,
	/// Skip objects that are not meshes
	pub mesh_only: bool,
}

impl ExportCfg {
	/// Configuration looking for face lists next to the output file
	pub fn for_output(path: &Path) -> ExportCfg {
		ExportCfg {
			source: SourceLocator::Directory(output_dir(path).to_path_buf()),
			..ExportCfg::default()
		}
	}
}

impl Default for ExportCfg {
	fn default() -> Self {
		Self {
			source: SourceLocator::Directory(PathBuf::from(".")),
			mesh_only: true,
		}
	}
}

/// Failure confined to a single object; the export carries on without it
#[derive(Clone, Error, Debug, PartialEq)]
pub enum ObjectError {
	#[error("Face list not found: {}", path.display())]
	SourceNotFound {
		path: PathBuf,
	},
	#[error("Face list {} is unreadable: {reason}", path.display())]
	SourceUnreadable {
		path: PathBuf,
		reason: String,
	},
	#[error(transparent)]
	MalformedName(#[from] IdentityError),
	#[error("Object name {0:?} cannot name a face list file")]
	UnsafeName(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
	#[error("Unable to write {}: {source}", path.display())]
	WriteFailure {
		path: PathBuf,
		source: io::Error,
	},
}

/// Matched ordinals of one exported object
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectMask {
	/// Display name in the host
	pub name: String,
	pub identity: ObjectIdentity,
	pub ordinals: Vec<Ordinal>,
}

/// Everything that happened to the selected objects during an export
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportSummary {
	pub exported: Vec<String>,
	/// Objects left out because none of their selected faces matched
	pub empty: Vec<String>,
	/// Non-mesh objects
	pub ignored: Vec<String>,
	pub skipped: Vec<(String, ObjectError)>,
	/// Unmatched selected faces per object
	pub unmatched: Vec<(String, u32)>,
}

impl ExportSummary {
	pub fn unmatched_faces(&self) -> u32 {
		self.unmatched.iter().map(|(_, n)| n).sum()
	}

	/// True when every selected mesh contributed and every selected face matched
	pub fn is_clean(&self) -> bool {
		self.empty.is_empty() && self.skipped.is_empty() && self.unmatched.is_empty()
	}
}

impl Display for ExportSummary {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		writeln!(f, "Exported {} object(s)", self.exported.len())?;

		for name in self.empty.iter() {
			writeln!(f, "  {}: no selected face matched", name)?;
		}
		for (name, err) in self.skipped.iter() {
			writeln!(f, "  {}: skipped, {}", name, err)?;
		}
		for (name, count) in self.unmatched.iter() {
			writeln!(f, "  {}: {} selected face(s) not found", name, count)?;
		}
		if !self.ignored.is_empty() {
			writeln!(f, "  ignored non-mesh object(s): {}", self.ignored.join(", "))?;
		}

		Ok(())
	}
}

fn output_dir(path: &Path) -> &Path {
	match path.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => dir,
		_ => Path::new("."),
	}
}

/// Builds the face order index of one face list
fn load_face_order(path: &Path) -> Result<FaceOrderIndex, ObjectError> {
	if !path.is_file() {
		return Err(ObjectError::SourceNotFound {
			path: path.to_path_buf(),
		});
	}

	let index = obj::read(path).map_err(|e| ObjectError::SourceUnreadable {
		path: path.to_path_buf(),
		reason: match e {
			ObjImportError::IO { source } => source.to_string(),
			other => other.to_string(),
		},
	})?;

	if index.shadowed() > 0 {
		warn!("{} face(s) in {} repeat the vertex set of an earlier face; the first one wins",
			index.shadowed(), path.display());
	}
	debug!("Indexed {} triangles from {}", index.len(), path.display());

	Ok(index)
}

/// Path of the face list of `name` in `dir`. Names that would not stay a single file inside `dir`,
/// such as ones holding a separator or `..`, are rejected.
fn face_list_path(dir: &Path, name: &str) -> Result<PathBuf, ObjectError> {
	let file_name = format!("{}.{}", name, FACE_LIST_EXT);
	let mut components = Path::new(&file_name).components();

	match (components.next(), components.next()) {
		(Some(Component::Normal(_)), None) if !name.contains(|c: char| c == '/' || c == '\\') => Ok(dir.join(file_name)),
		_ => Err(ObjectError::UnsafeName(name.to_string())),
	}
}

/// Face order indices, built at most once per face list during an export
type SourceCache = HashMap<PathBuf, Result<FaceOrderIndex, ObjectError>>;

fn match_object<O>(object: &O, cfg: &ExportCfg, cache: &mut SourceCache) -> Result<MatchResult, ObjectError>
where
	O: HostObject,
{
	let path = match &cfg.source {
		SourceLocator::Directory(dir) => face_list_path(dir, object.name())?,
		SourceLocator::Single(path) => path.clone(),
		SourceLocator::HostOrder => return Ok(mapper::map_host_order(object.faces())),
	};

	let index = cache.entry(path)
		.or_insert_with_key(|path| load_face_order(path))
		.as_ref()
		.map_err(Clone::clone)?;

	Ok(mapper::map(object.faces(), index))
}

/// Resolves the selection of every selected object against its face list. Objects that fail are
/// recorded in the summary and left out.
pub fn collect<H>(host: &H, cfg: &ExportCfg) -> (Vec<ObjectMask>, ExportSummary)
where
	H: Host,
{
	let mut masks = vec![];
	let mut summary = ExportSummary::default();
	let mut cache = SourceCache::new();

	for object in host.selected_objects() {
		let name = object.name().to_string();

		if cfg.mesh_only && object.kind() != ObjectKind::Mesh {
			debug!("Ignoring non-mesh object {}", name);
			summary.ignored.push(name);
			continue;
		}

		let identity = match ObjectIdentity::parse(&name) {
			Ok(identity) => identity,
			Err(e) => {
				warn!("Skipping {}: {}", name, e);
				summary.skipped.push((name, e.into()));
				continue;
			},
		};

		let result = match match_object(object, cfg, &mut cache) {
			Ok(result) => result,
			Err(e) => {
				warn!("Skipping {}: {}", name, e);
				summary.skipped.push((name, e));
				continue;
			},
		};

		if result.unmatched > 0 {
			warn!("{} selected face(s) of {} not found in its face list", result.unmatched, name);
			summary.unmatched.push((name.clone(), result.unmatched));
		}

		if result.is_empty() {
			info!("{}: nothing to export", name);
			summary.empty.push(name);
			continue;
		}

		info!("{}: {} face(s) as {}", name, result.ordinals.len(), identity.object_name());
		summary.exported.push(name.clone());
		masks.push(ObjectMask {
			name: name,
			identity: identity,
			ordinals: result.ordinals,
		});
	}

	(masks, summary)
}

/// Creates the temporary sibling of `path`. It gets the permissions of the file it will replace,
/// or those of a plain create (0o666 less the umask) when there is none yet.
fn temp_sibling(path: &Path) -> io::Result<NamedTempFile> {
	let mut builder = Builder::new();
	#[cfg(unix)]
	{
		builder.permissions(fs::Permissions::from_mode(0o666));
	}

	let tmp = builder.tempfile_in(output_dir(path))?;

	if let Ok(meta) = fs::metadata(path) {
		tmp.as_file().set_permissions(meta.permissions())?;
	}

	Ok(tmp)
}

/// Writes a file through a temporary sibling which replaces `path` only once fully written, so a
/// failed write never leaves a truncated file behind
pub fn write_atomic<F>(path: &Path, fill: F) -> io::Result<()>
where
	F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
	let mut tmp = temp_sibling(path)?;

	{
		let mut buf = BufWriter::new(tmp.as_file_mut());
		fill(&mut buf)?;
		buf.flush()?;
	}

	tmp.as_file().sync_all()?;
	tmp.persist(path).map_err(|e| e.error)?;

	Ok(())
}

/// Runs a complete export: collects the selection of every selected object and writes it to
/// `path` in the format of `writer`
pub fn export<H, W>(host: &H, cfg: &ExportCfg, writer: &W, path: &Path) -> Result<ExportSummary, ExportError>
where
	H: Host,
	W: MaskWriter + ?Sized,
{
	let (masks, summary) = collect(host, cfg);

	write_atomic(path, |buf| writer.write(&masks, buf)).map_err(|e| ExportError::WriteFailure {
		path: path.to_path_buf(),
		source: e,
	})?;

	info!("Wrote {} with {} object(s) to {}", writer.format_name(), masks.len(), path.display());

	Ok(summary)
}
