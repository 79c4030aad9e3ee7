use std::collections::HashMap;

use crate::KeyPoint;

/// Rows sharing the exact same position.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct Duplicate {
	pub position: [f64; 3],
	pub rows: Vec<usize>,
}

/// Two different rows closer than the threshold.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct ClosePair {
	pub first: usize,
	pub second: usize,
	pub distance: f64,
}

/// Groups with more than one row, ordered by their first row. Rows with a NaN coordinate are never duplicates.
pub fn duplicates(points: &[KeyPoint]) -> Vec<Duplicate> {
	let mut groups = Vec::<Duplicate>::new();
	let mut lookup = HashMap::<[u64; 3], usize>::new();
	for (row, point) in points.iter().enumerate() {
		let position: [f64; 3] = point.position.coords.into();
		if position.iter().any(|v| v.is_nan()) {
			continue;
		}
		// adding zero turns -0.0 into 0.0
		let key = position.map(|v| (v + 0.0).to_bits());
		match lookup.get(&key) {
			Some(&group) => groups[group].rows.push(row),
			None => {
				lookup.insert(key, groups.len());
				groups.push(Duplicate { position, rows: vec![row] });
			},
		}
	}
	groups.retain(|group| group.rows.len() > 1);
	groups
}

/// Every pair `first < second` with `0 < distance < threshold`.
///
/// Compares all pairs, intended for key files with up to a few hundred rows.
pub fn close_pairs(points: &[KeyPoint], threshold: f64) -> Vec<ClosePair> {
	let mut pairs = Vec::new();
	for (first, a) in points.iter().enumerate() {
		for (second, b) in points.iter().enumerate().skip(first + 1) {
			let distance = (a.position - b.position).norm();
			if distance > 0.0 && distance < threshold {
				pairs.push(ClosePair { first, second, distance });
			}
		}
	}
	pairs
}

#[cfg(test)]
mod tests {
	use super::*;
	use nalgebra as na;

	fn points(positions: &[[f64; 3]]) -> Vec<KeyPoint> {
		positions
			.iter()
			.map(|&[x, y, z]| KeyPoint::new(na::point![x, y, z], 1.0))
			.collect()
	}

	#[test]
	fn identical_positions_are_grouped() {
		let points = points(&[
			[1.0, 2.0, 3.0],
			[0.0, 0.0, 0.0],
			[1.0, 2.0, 3.0],
			[-0.0, 0.0, 0.0],
			[1.0, 2.0, 3.5],
			[1.0, 2.0, 3.0],
		]);
		assert_eq!(duplicates(&points), [
			Duplicate { position: [1.0, 2.0, 3.0], rows: vec![0, 2, 5] },
			Duplicate { position: [0.0, 0.0, 0.0], rows: vec![1, 3] },
		]);
	}

	#[test]
	fn unique_positions_have_no_duplicates() {
		let points = points(&[[f64::NAN, 0.0, 0.0], [f64::NAN, 0.0, 0.0], [1.0, 0.0, 0.0]]);
		assert!(duplicates(&points).is_empty());
	}

	#[test]
	fn close_pair_is_reported_once() {
		let points = points(&[[0.0, 0.0, 0.0], [0.0, 0.05, 0.0], [5.0, 5.0, 5.0]]);
		let pairs = close_pairs(&points, 0.1);
		assert_eq!(pairs.len(), 1);
		assert_eq!((pairs[0].first, pairs[0].second), (0, 1));
		assert!((pairs[0].distance - 0.05).abs() < 1e-12);
	}

	#[test]
	fn identical_and_distant_points_are_not_close() {
		let points = points(&[[1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.09], [3.0, 0.0, 0.0]]);
		let pairs = close_pairs(&points, 0.1)
			.into_iter()
			.map(|pair| (pair.first, pair.second))
			.collect::<Vec<_>>();
		assert_eq!(pairs, [(0, 2), (1, 2)]);
		assert!(close_pairs(&points, 0.05).is_empty());
	}
}
