mod checks;
mod mesh;
mod report;
mod table;
mod writer;

use std::path::PathBuf;

use common::Stage;

pub use checks::{close_pairs, duplicates, ClosePair, Duplicate};
pub use mesh::{build, Builder, Color, Counts, Mesh, PointSet};
pub use report::Report;
pub use table::{parse, read, Class, KeyPoint, Schema, NEGATIVE_FLAG, POSITIVE_FLAG};
pub use writer::{save, Format, PolyData};

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Key file not found: {}", .0.display())]
	NotFound(PathBuf),

	#[error("Line {line} has {found} columns, expected at least {expected}")]
	SchemaMismatch {
		line: usize,
		expected: usize,
		found: usize,
	},

	#[error("Line {line}: invalid value '{value}' for column {column}")]
	InvalidNumber {
		line: usize,
		column: &'static str,
		value: String,
	},

	#[error("Invalid configuration: {0}")]
	Configuration(String),

	#[error(transparent)]
	Vtk(#[from] vtkio::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Folder(#[from] common::Error),

	#[error(transparent)]
	IO(#[from] std::io::Error),
}

/// Shapes written for each row.
#[derive(clap::ValueEnum, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
	/// White sphere for every row
	Spheres,
	/// Red, green and blue arrow for the orientation vectors
	Arrows,
	/// Spheres and arrows in one mesh
	Both,
	/// Yellow sphere for positive rows, blue sphere for negative rows
	PositiveNegative,
	/// Positions as vertices with the scale as point data
	Points,
}

impl Mode {
	pub fn suffix(self) -> &'static str {
		match self {
			Self::Spheres => "_spheres",
			Self::Arrows => "_arrows",
			Self::Both => "_combined",
			Self::PositiveNegative => "_positive_negative",
			Self::Points => "_points",
		}
	}

	pub fn uses_orientation(self) -> bool {
		matches!(self, Self::Arrows | Self::Both)
	}
}

#[derive(clap::Args, Debug, Clone)]
pub struct Settings {
	/// Column layout of the key file
	#[arg(long, value_enum, default_value_t = Schema::Points)]
	pub columns: Schema,

	/// Lines skipped at the start of the key file
	#[arg(long, default_value_t = 6)]
	pub header_lines: usize,

	/// Distance below which two different rows are reported as close
	#[arg(long, default_value_t = 0.1)]
	pub threshold: f64,
}

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct Geometry {
	/// Sphere radius as multiple of the scale column
	#[arg(long, default_value_t = 1.0)]
	pub radius_multiplier: f64,

	/// Length of the orientation arrows
	#[arg(long, default_value_t = 10.0)]
	pub arrow_scale: f64,

	/// Sphere subdivisions around the z axis
	#[arg(long, default_value_t = 16)]
	pub theta_resolution: u32,

	/// Sphere subdivisions from pole to pole
	#[arg(long, default_value_t = 16)]
	pub phi_resolution: u32,

	/// Subdivisions of the arrow shaft and tip
	#[arg(long, default_value_t = 6)]
	pub arrow_resolution: u32,
}

impl Geometry {
	pub fn arrow(&self) -> primitives::Arrow {
		primitives::Arrow {
			tip_resolution: self.arrow_resolution,
			shaft_resolution: self.arrow_resolution,
			..Default::default()
		}
	}
}

impl Default for Geometry {
	fn default() -> Self {
		Self {
			radius_multiplier: 1.0,
			arrow_scale: 10.0,
			theta_resolution: 16,
			phi_resolution: 16,
			arrow_resolution: 6,
		}
	}
}

/// Convert a key file into a VTK mesh
#[derive(clap::Parser, Debug, Clone)]
pub struct Command {
	/// Key file with one feature per row
	pub input: PathBuf,

	/// Output base path, the mode suffix and format extension replace its extension
	#[arg(long, short)]
	pub output: PathBuf,

	/// Shapes written for each row
	#[arg(long, value_enum, default_value_t = Mode::Spheres)]
	pub mode: Mode,

	/// Output file format
	#[arg(long, value_enum, default_value_t = Format::Vtp)]
	pub format: Format,

	/// Do not write the json report
	#[arg(long)]
	pub no_report: bool,

	#[command(flatten)]
	pub settings: Settings,

	#[command(flatten)]
	pub geometry: Geometry,
}

pub fn run(command: Command) -> Result<Report, Error> {
	let settings = &command.settings;
	if command.mode == Mode::PositiveNegative && !settings.columns.has_flag() {
		return Err(Error::Configuration(format!(
			"mode positive-negative needs the InfoFlag column, the key file has only {} columns",
			settings.columns.columns()
		)));
	}
	if settings.threshold.is_nan() || settings.threshold <= 0.0 {
		return Err(Error::Configuration(format!(
			"threshold must be positive, got {}",
			settings.threshold
		)));
	}

	let mut report = Report::new(
		command.input.clone(),
		settings.columns,
		command.mode,
		command.format,
		settings.threshold,
	);

	let stage = Stage::new("Read");
	let points = read(&command.input, settings.columns, settings.header_lines)?;
	report.rows = points.len();
	stage.finish();
	log::info!("Read {} rows from {}", points.len(), command.input.display());

	let stage = Stage::new("Check");
	report.set_duplicates(duplicates(&points));
	report.set_close_pairs(close_pairs(&points, settings.threshold));
	stage.finish();

	let stage = Stage::new("Mesh");
	let output = common::with_suffix(
		&command.output,
		command.mode.suffix(),
		command.format.extension(),
	);
	let title = format!("{} {:?}", command.input.display(), command.mode);
	if command.mode == Mode::Points {
		save(&PointSet::new(&points), &title, command.format, &output)?;
	} else {
		if command.mode.uses_orientation() && !settings.columns.has_orientation() {
			report.warn(format!(
				"Key file with {} columns has no orientation vectors, no arrows are written",
				settings.columns.columns()
			));
		}
		let (mesh, counts) = build(&points, command.mode, command.geometry);
		report.counts = counts;
		report.cells = mesh.cells();
		save(&mesh, &title, command.format, &output)?;
	}
	stage.finish();
	log::info!("Saved {}", output.display());
	report.outputs.push(output);

	if command.mode == Mode::PositiveNegative {
		log::info!(
			"Positive features: {}, negative features: {}, skipped: {}",
			report.counts.positive,
			report.counts.negative,
			report.counts.skipped
		);
	}

	if !command.no_report {
		let path = common::with_suffix(&command.output, "_report", "json");
		report.save(&path)?;
		log::info!("Saved report {}", path.display());
	}

	Ok(report)
}
