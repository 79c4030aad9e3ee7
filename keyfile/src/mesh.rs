use nalgebra as na;
use primitives::Shape;

use crate::{table::Class, Geometry, KeyPoint, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
	pub const WHITE: Self = Self([255, 255, 255]);
	pub const YELLOW: Self = Self([255, 255, 0]);
	pub const RED: Self = Self([255, 0, 0]);
	pub const GREEN: Self = Self([0, 255, 0]);
	pub const BLUE: Self = Self([0, 0, 255]);

	pub const POSITIVE: Self = Self::YELLOW;
	pub const NEGATIVE: Self = Self::BLUE;

	/// Color for the arrow of the first, second and third orientation vector.
	pub const ORIENTATION: [Self; 3] = [Self::RED, Self::GREEN, Self::BLUE];
}

/// Triangles of all appended shapes with one color per triangle.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
	pub points: Vec<na::Point3<f64>>,
	pub triangles: Vec<[u32; 3]>,
	pub colors: Vec<Color>,
}

impl Mesh {
	pub fn append(&mut self, shape: &Shape, color: Color) {
		let offset = self.points.len() as u32;
		self.points.extend_from_slice(&shape.points);
		self.triangles.extend(
			shape
				.triangles
				.iter()
				.map(|triangle| triangle.map(|index| index + offset)),
		);
		self.colors
			.extend(std::iter::repeat(color).take(shape.triangles.len()));
		debug_assert_eq!(self.colors.len(), self.triangles.len());
	}

	pub fn cells(&self) -> usize {
		self.triangles.len()
	}
}

/// Key points as vertices with their scale.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
	pub points: Vec<na::Point3<f64>>,
	pub scales: Vec<f64>,
}

impl PointSet {
	pub fn new(points: &[KeyPoint]) -> Self {
		Self {
			points: points.iter().map(|p| p.position).collect(),
			scales: points.iter().map(|p| p.scale).collect(),
		}
	}
}

#[derive(serde::Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
	pub spheres: usize,
	pub arrows: usize,
	pub positive: usize,
	pub negative: usize,
	pub skipped: usize,
}

pub struct Builder {
	geometry: Geometry,
	arrow: Shape,
	mesh: Mesh,
	counts: Counts,
}

impl Builder {
	pub fn new(geometry: Geometry) -> Self {
		Self {
			arrow: geometry.arrow().shape(),
			geometry,
			mesh: Mesh::default(),
			counts: Counts::default(),
		}
	}

	pub fn sphere(&mut self, point: &KeyPoint, color: Color) {
		let sphere = Shape::sphere(
			point.position,
			point.scale * self.geometry.radius_multiplier,
			self.geometry.theta_resolution,
			self.geometry.phi_resolution,
		);
		self.mesh.append(&sphere, color);
		self.counts.spheres += 1;
	}

	/// One arrow per orientation vector, nothing for rows without orientation.
	pub fn arrows(&mut self, point: &KeyPoint) {
		let Some(orientation) = point.orientation else {
			return;
		};
		for (axis, color) in orientation.into_iter().zip(Color::ORIENTATION) {
			let placement = primitives::placement(point.position, axis, self.geometry.arrow_scale);
			let arrow = self.arrow.clone().transformed(&placement);
			self.mesh.append(&arrow, color);
			self.counts.arrows += 1;
		}
	}

	/// Yellow sphere for positive rows, blue for negative, other rows are skipped.
	pub fn classified(&mut self, point: &KeyPoint) {
		match point.class() {
			Some(Class::Positive) => {
				self.sphere(point, Color::POSITIVE);
				self.counts.positive += 1;
			},
			Some(Class::Negative) => {
				self.sphere(point, Color::NEGATIVE);
				self.counts.negative += 1;
			},
			Some(Class::Other) | None => self.counts.skipped += 1,
		}
	}

	pub fn finish(self) -> (Mesh, Counts) {
		(self.mesh, self.counts)
	}
}

/// Shapes of all rows in row order, spheres before the arrows of the same row.
pub fn build(points: &[KeyPoint], mode: Mode, geometry: Geometry) -> (Mesh, Counts) {
	let mut builder = Builder::new(geometry);
	for point in points {
		match mode {
			Mode::Spheres => builder.sphere(point, Color::WHITE),
			Mode::Arrows => builder.arrows(point),
			Mode::Both => {
				builder.sphere(point, Color::WHITE);
				builder.arrows(point);
			},
			Mode::PositiveNegative => builder.classified(point),
			Mode::Points => {},
		}
	}
	builder.finish()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn geometry() -> Geometry {
		Geometry {
			radius_multiplier: 3.0,
			arrow_scale: 50.0,
			theta_resolution: 8,
			phi_resolution: 6,
			arrow_resolution: 6,
		}
	}

	fn oriented(x: f64, scale: f64, flag: Option<i64>) -> KeyPoint {
		KeyPoint {
			orientation: Some([
				na::vector![1.0, 0.0, 0.0],
				na::vector![0.0, 1.0, 0.0],
				na::vector![0.0, 0.0, 1.0],
			]),
			info_flag: flag,
			..KeyPoint::new(na::point![x, 0.0, 0.0], scale)
		}
	}

	const SPHERE_CELLS: usize = 2 * 8 * (6 - 2);

	#[test]
	fn append_offsets_indices() {
		let mut mesh = Mesh::default();
		let shape = Shape {
			points: vec![na::Point3::origin(); 3],
			triangles: vec![[0, 1, 2]],
		};
		mesh.append(&shape, Color::RED);
		mesh.append(&shape, Color::GREEN);
		assert_eq!(mesh.triangles, [[0, 1, 2], [3, 4, 5]]);
		assert_eq!(mesh.colors, [Color::RED, Color::GREEN]);
	}

	#[test]
	fn one_sphere_per_row() {
		let points = [oriented(0.0, 1.0, None), oriented(10.0, 0.5, None)];
		let (mesh, counts) = build(&points, Mode::Spheres, geometry());
		assert_eq!(counts, Counts { spheres: 2, ..Default::default() });
		assert_eq!(mesh.cells(), 2 * SPHERE_CELLS);
		assert_eq!(mesh.colors.len(), mesh.cells());
		assert!(mesh.colors.iter().all(|&c| c == Color::WHITE));

		let points_per_sphere = mesh.points.len() / 2;
		for (index, point) in points.iter().enumerate() {
			let radius = point.scale * 3.0;
			for p in &mesh.points[index * points_per_sphere..(index + 1) * points_per_sphere] {
				assert!(((p - point.position).norm() - radius).abs() < 1e-9);
			}
		}
	}

	#[test]
	fn three_arrows_per_row() {
		let points = [oriented(0.0, 1.0, None), oriented(1.0, 1.0, None)];
		let (mesh, counts) = build(&points, Mode::Arrows, geometry());
		assert_eq!(counts.arrows, 6);
		assert_eq!(counts.spheres, 0);
		let arrow_cells = geometry().arrow().cells();
		assert_eq!(mesh.cells(), 6 * arrow_cells);
		for (index, chunk) in mesh.colors.chunks(arrow_cells).enumerate() {
			assert!(chunk.iter().all(|&c| c == Color::ORIENTATION[index % 3]));
		}
	}

	#[test]
	fn arrows_are_rotated_and_scaled() {
		let point = KeyPoint {
			orientation: Some([na::vector![0.0, 0.0, 1.0]; 3]),
			..KeyPoint::new(na::point![1.0, 2.0, 3.0], 1.0)
		};
		let (mesh, _) = build(&[point], Mode::Arrows, geometry());
		// unit arrow along x rotated around z points along y
		let tip = mesh
			.points
			.iter()
			.max_by(|a, b| a.y.total_cmp(&b.y))
			.unwrap();
		assert!((tip - na::point![1.0, 52.0, 3.0]).norm() < 1e-9);
	}

	#[test]
	fn rows_without_orientation_have_no_arrows() {
		let points = [KeyPoint::new(na::point![0.0, 0.0, 0.0], 1.0)];
		let (mesh, counts) = build(&points, Mode::Both, geometry());
		assert_eq!(counts.spheres, 1);
		assert_eq!(counts.arrows, 0);
		assert_eq!(mesh.cells(), SPHERE_CELLS);
	}

	#[test]
	fn both_keeps_row_order() {
		let points = [oriented(0.0, 1.0, None)];
		let (mesh, counts) = build(&points, Mode::Both, geometry());
		assert_eq!((counts.spheres, counts.arrows), (1, 3));
		assert!(mesh.colors[..SPHERE_CELLS].iter().all(|&c| c == Color::WHITE));
		assert_eq!(mesh.colors[SPHERE_CELLS], Color::RED);
		assert_eq!(mesh.colors.last(), Some(&Color::BLUE));
	}

	#[test]
	fn positive_negative_skips_other_flags() {
		let points = [
			oriented(0.0, 1.0, Some(0)),
			oriented(1.0, 1.0, Some(16)),
			oriented(2.0, 1.0, Some(4)),
			oriented(3.0, 1.0, Some(0)),
		];
		let (mesh, counts) = build(&points, Mode::PositiveNegative, geometry());
		assert_eq!(counts, Counts {
			spheres: 3,
			arrows: 0,
			positive: 2,
			negative: 1,
			skipped: 1,
		});
		assert_eq!(mesh.cells(), 3 * SPHERE_CELLS);
		assert_eq!(mesh.colors[0], Color::YELLOW);
		assert_eq!(mesh.colors[SPHERE_CELLS], Color::BLUE);
		assert_eq!(mesh.colors[2 * SPHERE_CELLS], Color::YELLOW);
	}

	#[test]
	fn point_set_keeps_scales() {
		let points = [oriented(0.0, 1.5, None), oriented(4.0, 2.5, None)];
		let set = PointSet::new(&points);
		assert_eq!(set.points, [na::point![0.0, 0.0, 0.0], na::point![4.0, 0.0, 0.0]]);
		assert_eq!(set.scales, [1.5, 2.5]);
	}
}
