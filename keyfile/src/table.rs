use std::{
	fs::File,
	io::{BufRead, BufReader},
	path::Path,
};

use nalgebra as na;

use crate::Error;

pub const POSITIVE_FLAG: i64 = 0;
pub const NEGATIVE_FLAG: i64 = 16;

/// Column layout of a key file. Columns after the expected ones are ignored.
#[derive(clap::ValueEnum, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Schema {
	/// Position and scale
	#[value(name = "4")]
	Points,
	/// Position, scale and three orientation vectors
	#[value(name = "13")]
	Oriented,
	/// Oriented columns followed by three extra values and the classification flag
	#[value(name = "17")]
	Classified,
}

impl Schema {
	pub fn column_names(self) -> &'static [&'static str] {
		const NAMES: [&str; 17] = [
			"X", "Y", "Z", "Scale", "o11", "o12", "o13", "o21", "o22", "o23", "o31", "o32", "o33", "e1", "e2",
			"e3", "InfoFlag",
		];
		&NAMES[..self.columns()]
	}

	pub fn columns(self) -> usize {
		match self {
			Self::Points => 4,
			Self::Oriented => 13,
			Self::Classified => 17,
		}
	}

	pub fn has_orientation(self) -> bool {
		matches!(self, Self::Oriented | Self::Classified)
	}

	pub fn has_flag(self) -> bool {
		matches!(self, Self::Classified)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
	Positive,
	Negative,
	Other,
}

/// One row of a key file.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPoint {
	pub position: na::Point3<f64>,
	pub scale: f64,
	pub orientation: Option<[na::Vector3<f64>; 3]>,
	pub extra: Option<[f64; 3]>,
	pub info_flag: Option<i64>,
}

impl KeyPoint {
	pub fn new(position: na::Point3<f64>, scale: f64) -> Self {
		Self {
			position,
			scale,
			orientation: None,
			extra: None,
			info_flag: None,
		}
	}

	pub fn class(&self) -> Option<Class> {
		self.info_flag.map(|flag| match flag {
			POSITIVE_FLAG => Class::Positive,
			NEGATIVE_FLAG => Class::Negative,
			_ => Class::Other,
		})
	}
}

pub fn read(path: &Path, schema: Schema, header_lines: usize) -> Result<Vec<KeyPoint>, Error> {
	if !path.is_file() {
		return Err(Error::NotFound(path.to_path_buf()));
	}
	let file = File::open(path)?;
	parse(BufReader::new(file), schema, header_lines)
}

/// Skips `header_lines` lines and reads one point per non blank line.
pub fn parse(reader: impl BufRead, schema: Schema, header_lines: usize) -> Result<Vec<KeyPoint>, Error> {
	let mut points = Vec::new();
	let mut values = [0.0; 17];
	for (index, line) in reader.lines().enumerate().skip(header_lines) {
		let line = line?;
		let number = index + 1;
		let fields = line.split_whitespace().collect::<Vec<_>>();
		if fields.is_empty() {
			continue;
		}
		if fields.len() < schema.columns() {
			return Err(Error::SchemaMismatch {
				line: number,
				expected: schema.columns(),
				found: fields.len(),
			});
		}
		for (column, (value, field)) in values.iter_mut().zip(&fields).take(schema.columns()).enumerate() {
			*value = field.parse().map_err(|_| Error::InvalidNumber {
				line: number,
				column: schema.column_names()[column],
				value: field.to_string(),
			})?;
		}
		points.push(row(&values, schema, number)?);
	}
	Ok(points)
}

fn row(values: &[f64; 17], schema: Schema, line: usize) -> Result<KeyPoint, Error> {
	let mut point = KeyPoint::new(na::point![values[0], values[1], values[2]], values[3]);
	if schema.has_orientation() {
		let vector = |start: usize| na::vector![values[start], values[start + 1], values[start + 2]];
		point.orientation = Some([vector(4), vector(7), vector(10)]);
	}
	if schema.has_flag() {
		point.extra = Some([values[13], values[14], values[15]]);
		let flag = values[16];
		if !flag.is_finite() || flag.fract() != 0.0 {
			return Err(Error::InvalidNumber {
				line,
				column: "InfoFlag",
				value: flag.to_string(),
			});
		}
		point.info_flag = Some(flag as i64);
	}
	Ok(point)
}
