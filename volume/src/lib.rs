mod slice;
mod stack;
mod writer;

use std::path::{Path, PathBuf};

use common::{Progress, Stage};

pub use slice::SampleKind;
pub use stack::Volume;
pub use writer::{identity_header, nifti_path, save};

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("File not found: {}", .0.display())]
	NotFound(PathBuf),

	#[error("No slices found in {}", .0.display())]
	EmptyStack(PathBuf),

	#[error(
		"Slice {} has {}x{} pixels, expected {}x{}",
		.path.display(),
		.found.0,
		.found.1,
		.expected.0,
		.expected.1
	)]
	ShapeMismatch {
		path: PathBuf,
		expected: (usize, usize),
		found: (usize, usize),
	},

	#[error("Invalid configuration: {0}")]
	Configuration(String),

	#[error(transparent)]
	Image(#[from] image::ImageError),

	#[error(transparent)]
	Shape(#[from] ndarray::ShapeError),

	#[error(transparent)]
	Nifti(#[from] nifti::NiftiError),

	#[error(transparent)]
	Folder(#[from] common::Error),

	#[error(transparent)]
	IO(#[from] std::io::Error),
}

/// Numbered file names `{prefix}{index}.{extension}` with zero padded indices.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Range {
	/// File name prefix for numbered slices, for example `concrete_y00_`
	#[arg(long, requires_all = ["first", "last"])]
	pub prefix: Option<String>,

	/// First index of the numbered slices
	#[arg(long, requires = "prefix")]
	pub first: Option<u32>,

	/// Last index of the numbered slices, inclusive
	#[arg(long, requires = "prefix")]
	pub last: Option<u32>,

	/// Digits of the zero padded index
	#[arg(long, default_value_t = 5)]
	pub digits: usize,
}

impl Range {
	fn is_set(&self) -> bool {
		self.prefix.is_some() || self.first.is_some() || self.last.is_some()
	}

	fn files(&self, folder: &Path, extension: &str) -> Result<Option<Vec<PathBuf>>, Error> {
		let (prefix, first, last) = match (&self.prefix, self.first, self.last) {
			(None, None, None) => return Ok(None),
			(Some(prefix), Some(first), Some(last)) => (prefix, first, last),
			_ => {
				return Err(Error::Configuration(String::from(
					"numbered slices need a prefix, a first and a last index",
				)))
			},
		};
		if first > last {
			return Err(Error::Configuration(format!(
				"first index {} is after last index {}",
				first, last
			)));
		}
		let extension = extension.trim_start_matches('.');
		let files = (first..=last)
			.map(|index| {
				folder.join(format!(
					"{}{:0>width$}.{}",
					prefix,
					index,
					extension,
					width = self.digits
				))
			})
			.collect();
		Ok(Some(files))
	}
}

/// Convert every image into its own volume
#[derive(clap::Parser, Debug, Clone)]
pub struct SliceCommand {
	/// Image file or folder with images
	pub input: PathBuf,

	/// Output folder for the volumes
	#[arg(long, short)]
	pub output_folder: PathBuf,

	/// Image extensions used for folder input, the first one names numbered slices
	#[arg(long, value_delimiter = ',', default_values = ["jpg", "jpeg"])]
	pub extensions: Vec<String>,

	#[command(flatten)]
	pub range: Range,
}

/// Combine the images of a folder into one volume
#[derive(clap::Parser, Debug, Clone)]
pub struct StackCommand {
	/// Folder with the slices, sorted by file name
	pub input: PathBuf,

	/// Output volume, `.nii` is added when missing
	#[arg(long, short)]
	pub output_file: PathBuf,

	/// Image extensions of the slices
	#[arg(long, value_delimiter = ',', default_values = ["tif", "tiff"])]
	pub extensions: Vec<String>,
}

fn slice_inputs(command: &SliceCommand) -> Result<Vec<PathBuf>, Error> {
	let input = &command.input;
	if input.is_file() {
		if command.range.is_set() {
			return Err(Error::Configuration(format!(
				"numbered slices need an input folder, {} is a file",
				input.display()
			)));
		}
		return Ok(vec![input.clone()]);
	}
	if !input.is_dir() {
		return Err(Error::NotFound(input.clone()));
	}
	let extension = command
		.extensions
		.first()
		.ok_or_else(|| Error::Configuration(String::from("no image extension given")))?;
	match command.range.files(input, extension)? {
		Some(files) => Ok(files),
		None => Ok(common::list_files(input, &command.extensions)?),
	}
}

/// Returns the written volumes.
pub fn run_slices(command: SliceCommand) -> Result<Vec<PathBuf>, Error> {
	let stage = Stage::new("Setup");
	let inputs = slice_inputs(&command)?;
	common::setup_folder(&command.output_folder)?;
	stage.finish();

	let mut progress = Progress::new("Convert", inputs.len());
	let mut outputs = Vec::with_capacity(inputs.len());
	for input in inputs {
		let stem = input
			.file_stem()
			.ok_or_else(|| Error::NotFound(input.clone()))?;
		let mut output = command.output_folder.join(stem);
		output.set_extension("nii");

		let volume = Volume::from_image(&input)?;
		save(&volume, &output)?;
		log::info!("Converted {} to {}", input.display(), output.display());
		outputs.push(output);
		progress.step();
	}
	progress.finish();

	Ok(outputs)
}

/// Returns the written volume.
pub fn run_stack(command: StackCommand) -> Result<PathBuf, Error> {
	if !command.input.is_dir() {
		return Err(Error::NotFound(command.input));
	}
	let files = common::list_files(&command.input, &command.extensions)?;
	if files.is_empty() {
		return Err(Error::EmptyStack(command.input));
	}
	log::info!("Stacking {} slices from {}", files.len(), command.input.display());

	let mut progress = Progress::new("Load", files.len());
	let volume = Volume::from_stack(&files, |_| progress.step())?;
	progress.finish();

	let stage = Stage::new("Save");
	let output = nifti_path(&command.output_file);
	save(&volume, &output)?;
	stage.finish();

	let (height, width, depth) = volume.dim();
	log::info!(
		"Saved {}x{}x{} {:?} volume to {}",
		height,
		width,
		depth,
		volume.kind(),
		output.display()
	);
	Ok(output)
}
