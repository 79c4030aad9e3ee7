//! Tessellated shapes for point feature visualization.
//!
//! All shapes consist of outward facing triangles.

mod arrow;
mod sphere;

use nalgebra as na;

pub use arrow::Arrow;

#[derive(Debug, Clone, Default)]
pub struct Shape {
	pub points: Vec<na::Point3<f64>>,
	pub triangles: Vec<[u32; 3]>,
}

impl Shape {
	pub fn sphere(center: na::Point3<f64>, radius: f64, theta_resolution: u32, phi_resolution: u32) -> Self {
		sphere::sphere(center, radius, theta_resolution, phi_resolution)
	}

	pub fn cells(&self) -> usize {
		self.triangles.len()
	}

	pub fn transform(&mut self, transform: &na::Similarity3<f64>) {
		for point in self.points.iter_mut() {
			*point = transform.transform_point(point);
		}
	}

	pub fn transformed(mut self, transform: &na::Similarity3<f64>) -> Self {
		self.transform(transform);
		self
	}

	fn push(&mut self, point: na::Point3<f64>) -> u32 {
		self.points.push(point);
		self.points.len() as u32 - 1
	}
}

/// Moves a unit shape to `position`, scaled by `scale` and rotated by 90 degrees around `axis`.
///
/// A point `p` maps to `position + scale * R * p`. A zero axis keeps the orientation.
pub fn placement(position: na::Point3<f64>, axis: na::Vector3<f64>, scale: f64) -> na::Similarity3<f64> {
	let rotation = match na::Unit::try_new(axis, f64::EPSILON) {
		Some(axis) => na::UnitQuaternion::from_axis_angle(&axis, std::f64::consts::FRAC_PI_2),
		None => na::UnitQuaternion::identity(),
	};
	na::Similarity3::from_parts(na::Translation3::from(position.coords), rotation, scale)
}
