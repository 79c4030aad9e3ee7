use std::{
	fs::File,
	io::BufWriter,
	path::{Path, PathBuf},
};

use crate::{
	checks::{ClosePair, Duplicate},
	mesh::Counts,
	Error,
	Format,
	Mode,
	Schema,
};

/// Summary of one key file conversion, saved as json next to the mesh.
#[derive(serde::Serialize, Debug, Clone)]
pub struct Report {
	pub input: PathBuf,
	pub schema: Schema,
	pub mode: Mode,
	pub format: Format,
	pub rows: usize,
	pub threshold: f64,
	pub duplicates: Vec<Duplicate>,
	pub close_pairs: Vec<ClosePair>,
	pub counts: Counts,
	pub cells: usize,
	pub outputs: Vec<PathBuf>,
	pub warnings: Vec<String>,
}

impl Report {
	pub fn new(input: PathBuf, schema: Schema, mode: Mode, format: Format, threshold: f64) -> Self {
		Self {
			input,
			schema,
			mode,
			format,
			rows: 0,
			threshold,
			duplicates: Vec::new(),
			close_pairs: Vec::new(),
			counts: Counts::default(),
			cells: 0,
			outputs: Vec::new(),
			warnings: Vec::new(),
		}
	}

	pub fn warn(&mut self, message: String) {
		log::warn!("{}", message);
		self.warnings.push(message);
	}

	pub fn set_duplicates(&mut self, duplicates: Vec<Duplicate>) {
		for duplicate in &duplicates {
			let [x, y, z] = duplicate.position;
			self.warn(format!(
				"Duplicate position ({}, {}, {}) in rows {:?}",
				x, y, z, duplicate.rows
			));
		}
		self.duplicates = duplicates;
	}

	pub fn set_close_pairs(&mut self, close_pairs: Vec<ClosePair>) {
		for pair in &close_pairs {
			self.warn(format!(
				"Rows {} and {} are {:.6} apart, closer than {}",
				pair.first, pair.second, pair.distance, self.threshold
			));
		}
		self.close_pairs = close_pairs;
	}

	pub fn save(&self, path: &Path) -> Result<(), Error> {
		common::setup_parent(path)?;
		let file = File::create(path)?;
		serde_json::to_writer_pretty(BufWriter::new(file), self)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn warnings_are_collected() {
		let mut report = Report::new(PathBuf::from("a.key"), Schema::Points, Mode::Spheres, Format::Vtp, 0.1);
		report.set_duplicates(vec![Duplicate { position: [1.0, 2.0, 3.0], rows: vec![0, 4] }]);
		report.set_close_pairs(vec![ClosePair { first: 1, second: 2, distance: 0.05 }]);
		assert_eq!(report.warnings, [
			"Duplicate position (1, 2, 3) in rows [0, 4]",
			"Rows 1 and 2 are 0.050000 apart, closer than 0.1",
		]);
	}

	#[test]
	fn saved_as_json() {
		let folder = tempfile::tempdir().unwrap();
		let path = folder.path().join("report.json");
		let mut report = Report::new(
			PathBuf::from("a.key"),
			Schema::Classified,
			Mode::PositiveNegative,
			Format::Vtk,
			0.1,
		);
		report.rows = 3;
		report.save(&path).unwrap();

		let value: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
		assert_eq!(value["schema"], "classified");
		assert_eq!(value["mode"], "positive-negative");
		assert_eq!(value["format"], "vtk");
		assert_eq!(value["rows"], 3);
		assert_eq!(value["counts"]["spheres"], 0);
	}
}
