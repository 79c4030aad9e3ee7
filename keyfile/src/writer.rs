use std::path::Path;

use vtkio::model::*;

use crate::{
	mesh::{Mesh, PointSet},
	Error,
};

#[derive(clap::ValueEnum, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
	/// XML PolyData
	#[default]
	Vtp,
	/// Legacy ASCII
	Vtk,
}

impl Format {
	pub fn extension(self) -> &'static str {
		match self {
			Self::Vtp => "vtp",
			Self::Vtk => "vtk",
		}
	}

	fn version(self) -> Version {
		match self {
			Self::Vtp => Version { major: 1, minor: 0 },
			Self::Vtk => Version { major: 4, minor: 2 },
		}
	}

	fn cells<const N: usize>(self, cells: impl ExactSizeIterator<Item = [u32; N]>) -> VertexNumbers {
		let count = cells.len();
		match self {
			Self::Vtp => {
				let mut connectivity = Vec::with_capacity(count * N);
				let mut offsets = Vec::with_capacity(count);
				for cell in cells {
					connectivity.extend(cell.map(u64::from));
					offsets.push(connectivity.len() as u64);
				}
				VertexNumbers::XML { connectivity, offsets }
			},
			Self::Vtk => {
				let mut vertices = Vec::with_capacity(count * (N + 1));
				for cell in cells {
					vertices.push(N as u32);
					vertices.extend(cell);
				}
				VertexNumbers::Legacy { num_cells: count as u32, vertices }
			},
		}
	}
}

/// Conversion into a single VTK PolyData piece.
pub trait PolyData {
	fn piece(&self, format: Format) -> PolyDataPiece;
}

fn coordinates(points: &[nalgebra::Point3<f64>]) -> IOBuffer {
	IOBuffer::F64(points.iter().flat_map(|p| [p.x, p.y, p.z]).collect())
}

impl PolyData for Mesh {
	fn piece(&self, format: Format) -> PolyDataPiece {
		let colors = self.colors.iter().flat_map(|c| c.0).collect::<Vec<u8>>();
		PolyDataPiece {
			points: coordinates(&self.points),
			verts: None,
			lines: None,
			polys: Some(format.cells(self.triangles.iter().copied())),
			strips: None,
			data: Attributes {
				point: Vec::new(),
				cell: vec![Attribute::scalars("Colors", 3).with_data(IOBuffer::U8(colors))],
			},
		}
	}
}

impl PolyData for PointSet {
	fn piece(&self, format: Format) -> PolyDataPiece {
		let count = self.points.len() as u32;
		PolyDataPiece {
			points: coordinates(&self.points),
			verts: Some(format.cells((0..count).map(|index| [index]))),
			lines: None,
			polys: None,
			strips: None,
			data: Attributes {
				point: vec![Attribute::scalars("Scale", 1).with_data(IOBuffer::F64(self.scales.clone()))],
				cell: Vec::new(),
			},
		}
	}
}

pub fn save(data: &impl PolyData, title: &str, format: Format, path: &Path) -> Result<(), Error> {
	common::setup_parent(path)?;
	let vtk = Vtk {
		version: format.version(),
		title: String::from(title),
		byte_order: ByteOrder::LittleEndian,
		file_path: None,
		data: DataSet::inline(data.piece(format)),
	};
	match format {
		Format::Vtp => {
			let mut buffer = Vec::new();
			vtk.write_xml(&mut buffer)?;
			std::fs::write(path, buffer)?;
		},
		Format::Vtk => vtk.export_ascii(path)?,
	}
	Ok(())
}
