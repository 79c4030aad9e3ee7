use std::f64::consts::PI;

use nalgebra as na;

use crate::Shape;

const MIN_RESOLUTION: u32 = 3;

/// UV sphere with a point at each pole and `phi_resolution - 2` rings of `theta_resolution` points.
pub fn sphere(center: na::Point3<f64>, radius: f64, theta_resolution: u32, phi_resolution: u32) -> Shape {
	let theta_resolution = theta_resolution.max(MIN_RESOLUTION);
	let phi_resolution = phi_resolution.max(MIN_RESOLUTION);
	let rings = phi_resolution - 2;

	let mut shape = Shape {
		points: Vec::with_capacity((2 + theta_resolution * rings) as usize),
		triangles: Vec::with_capacity((2 * theta_resolution * rings) as usize),
	};

	let north = shape.push(center + na::vector![0.0, 0.0, radius]);
	let south = shape.push(center - na::vector![0.0, 0.0, radius]);
	for i in 0..theta_resolution {
		let theta = 2.0 * PI * i as f64 / theta_resolution as f64;
		for j in 1..=rings {
			let phi = PI * j as f64 / (phi_resolution - 1) as f64;
			let direction = na::vector![phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()];
			shape.push(center + direction * radius);
		}
	}

	let ring = |i: u32, j: u32| 2 + (i % theta_resolution) * rings + (j - 1);
	for i in 0..theta_resolution {
		shape.triangles.push([north, ring(i, 1), ring(i + 1, 1)]);
		for j in 1..rings {
			shape
				.triangles
				.push([ring(i, j), ring(i, j + 1), ring(i + 1, j + 1)]);
			shape
				.triangles
				.push([ring(i, j), ring(i + 1, j + 1), ring(i + 1, j)]);
		}
		shape.triangles.push([south, ring(i + 1, rings), ring(i, rings)]);
	}

	shape
}
