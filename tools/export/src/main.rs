use clap::{
	Args,
	Parser,
	Subcommand
};

use std::{
	error::Error,
	fs,
	path::{
		Path,
		PathBuf
	}
};

use fmk_export::{
	export,
	ExportCfg,
	SourceLocator,
	writer::{
		ListWriter,
		MaskWriter,
		PacWriter
	}
};
use fmk_masks_list::{
	LineEnding,
	MaskList
};
use fmk_masks_pac::{
	BODY_CONTAINER,
	HEAD_CONTAINER,
	NamingPolicy,
	PacContainer
};
use fmk_models_wavefront::snapshot::{
	DEFAULT_SELECTION_GROUP,
	SnapshotHost
};

#[derive(Parser)]
#[command(name = "fmk-export")]
#[command(about = "Export selected mesh faces as engine face masks", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Args)]
struct SelectionArgs {
	/// Wavefront selection snapshot of the scene
	#[arg(long)]
	snapshot: PathBuf,

	/// Group marking the selected faces in the snapshot
	#[arg(long, default_value = DEFAULT_SELECTION_GROUP)]
	selection_group: String,

	/// Directory with one `<object name>.obj` face list per object [default: the output's directory]
	#[arg(long, conflicts_with_all = ["source", "host_order"])]
	source_dir: Option<PathBuf>,

	/// Single face list shared by every object
	#[arg(long, conflicts_with = "host_order")]
	source: Option<PathBuf>,

	/// Use the snapshot's own face order instead of face lists
	#[arg(long)]
	host_order: bool,

	/// Also export objects that are not meshes
	#[arg(long)]
	include_non_mesh: bool,

	/// Output file
	#[arg(short, long)]
	out: PathBuf,
}

impl SelectionArgs {
	fn cfg(&self) -> ExportCfg {
		let mut cfg = ExportCfg::for_output(&self.out);

		if let Some(dir) = &self.source_dir {
			cfg.source = SourceLocator::Directory(dir.clone());
		} else if let Some(path) = &self.source {
			cfg.source = SourceLocator::Single(path.clone());
		} else if self.host_order {
			cfg.source = SourceLocator::HostOrder;
		}

		cfg.mesh_only = !self.include_non_mesh;
		cfg
	}
}

#[derive(Subcommand)]
enum Commands {
	/// Write a binary PAC mask container
	Pac {
		#[command(flatten)]
		selection: SelectionArgs,

		/// Container name of object 0
		#[arg(long, default_value = HEAD_CONTAINER)]
		head_name: String,

		/// Container name of every other object
		#[arg(long, default_value = BODY_CONTAINER)]
		body_name: String,
	},
	/// Write a text mask list
	List {
		#[command(flatten)]
		selection: SelectionArgs,

		/// Terminate lines with CR LF
		#[arg(long)]
		crlf: bool,
	},
	/// Print the contents of a PAC container or mask list
	Inspect {
		file: PathBuf,
	},
}

fn run_export(selection: &SelectionArgs, writer: &dyn MaskWriter) -> Result<(), Box<dyn Error>> {
	let host = SnapshotHost::read(&selection.snapshot, &selection.selection_group)?;
	let summary = export(&host, &selection.cfg(), writer, &selection.out)?;

	print!("{}", summary);
	Ok(())
}

fn inspect(path: &Path) -> Result<(), Box<dyn Error>> {
	let data = fs::read(path)?;

	if path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("pac")) {
		let pac = PacContainer::read(&mut data.as_slice())?;
		println!("{} block(s)", pac.blocks.len());

		for block in pac.blocks.iter() {
			println!("{} ({} bytes)", block.name, block.byte_len());
			for entry in block.entries.iter() {
				println!("  #{}: {}..={}", entry.index, entry.range.start, entry.range.end);
			}
		}
	} else {
		let list = MaskList::parse(&String::from_utf8_lossy(&data))?;

		for entry in list.entries.iter() {
			println!("{}: {} face(s)", entry.name, entry.ordinals.len());
		}
	}

	Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();

	match cli.command {
		Commands::Pac { selection, head_name, body_name } => {
			let writer = PacWriter {
				naming: NamingPolicy {
					head: head_name,
					body: body_name,
				},
			};
			run_export(&selection, &writer)
		},
		Commands::List { selection, crlf } => {
			let writer = ListWriter {
				line_ending: if crlf {
					LineEnding::CrLf
				} else {
					LineEnding::Lf
				},
			};
			run_export(&selection, &writer)
		},
		Commands::Inspect { file } => inspect(&file),
	}
}
