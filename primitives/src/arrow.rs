use std::f64::consts::PI;

use nalgebra as na;

use crate::Shape;

/// Unit arrow from the origin to `(1, 0, 0)`, a capped cylinder shaft with a cone tip.
#[derive(Debug, Clone, Copy)]
pub struct Arrow {
	pub tip_length: f64,
	pub tip_radius: f64,
	pub tip_resolution: u32,
	pub shaft_radius: f64,
	pub shaft_resolution: u32,
}

impl Default for Arrow {
	fn default() -> Self {
		Self {
			tip_length: 0.35,
			tip_radius: 0.1,
			tip_resolution: 6,
			shaft_radius: 0.03,
			shaft_resolution: 6,
		}
	}
}

impl Arrow {
	pub fn cells(&self) -> usize {
		let shaft = self.shaft_resolution.max(3) as usize;
		let tip = self.tip_resolution.max(3) as usize;
		3 * shaft + 2 * tip
	}

	pub fn shape(&self) -> Shape {
		let mut shape = Shape::default();
		let shaft_length = 1.0 - self.tip_length;

		let shaft_resolution = self.shaft_resolution.max(3);
		let back_center = shape.push(na::Point3::origin());
		let back = ring(&mut shape, 0.0, self.shaft_radius, shaft_resolution);
		let front = ring(&mut shape, shaft_length, self.shaft_radius, shaft_resolution);
		for k in 0..shaft_resolution {
			let next = (k + 1) % shaft_resolution;
			shape
				.triangles
				.push([back + k, back + next, front + next]);
			shape
				.triangles
				.push([back + k, front + next, front + k]);
			shape.triangles.push([back_center, back + next, back + k]);
		}

		let tip_resolution = self.tip_resolution.max(3);
		let base_center = shape.push(na::point![shaft_length, 0.0, 0.0]);
		let apex = shape.push(na::point![1.0, 0.0, 0.0]);
		let base = ring(&mut shape, shaft_length, self.tip_radius, tip_resolution);
		for k in 0..tip_resolution {
			let next = (k + 1) % tip_resolution;
			shape.triangles.push([base + k, base + next, apex]);
			shape.triangles.push([base_center, base + next, base + k]);
		}

		shape
	}
}

/// Circle in the plane `x = offset`, returns the index of the first point.
fn ring(shape: &mut Shape, offset: f64, radius: f64, resolution: u32) -> u32 {
	let first = shape.points.len() as u32;
	for k in 0..resolution {
		let angle = 2.0 * PI * k as f64 / resolution as f64;
		shape.push(na::point![offset, radius * angle.cos(), radius * angle.sin()]);
	}
	first
}
