use std::path::{Path, PathBuf};

use image::DynamicImage;
use ndarray::{Array3, Axis};

use crate::{
	slice::{self, Sample, SampleKind},
	Error,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Volume {
	U8(Array3<u8>),
	U16(Array3<u16>),
	F32(Array3<f32>),
}

impl Volume {
	/// `(height, width, depth)`
	pub fn dim(&self) -> (usize, usize, usize) {
		match self {
			Self::U8(data) => data.dim(),
			Self::U16(data) => data.dim(),
			Self::F32(data) => data.dim(),
		}
	}

	pub fn kind(&self) -> SampleKind {
		match self {
			Self::U8(_) => SampleKind::U8,
			Self::U16(_) => SampleKind::U16,
			Self::F32(_) => SampleKind::F32,
		}
	}

	/// Single image as 8 bit grayscale volume with depth 1.
	pub fn from_image(path: &Path) -> Result<Self, Error> {
		let slice = slice::load::<u8>(path)?;
		Ok(Self::U8(slice.insert_axis(Axis(2))))
	}

	/// Stacks the files along the third axis in the given order.
	///
	/// The first file decides the slice size and sample type, all other files must have the same size.
	pub fn from_stack(files: &[PathBuf], mut loaded: impl FnMut(&Path)) -> Result<Self, Error> {
		let Some((first, rest)) = files.split_first() else {
			return Err(Error::Configuration(String::from("no slices to stack")));
		};
		let image = slice::open(first)?;
		loaded(first);
		match SampleKind::of(&image) {
			SampleKind::U8 => stack::<u8>(first, image, rest, loaded),
			SampleKind::U16 => stack::<u16>(first, image, rest, loaded),
			SampleKind::F32 => stack::<f32>(first, image, rest, loaded),
		}
	}
}

fn stack<T: Sample>(
	first: &Path,
	image: DynamicImage,
	rest: &[PathBuf],
	mut loaded: impl FnMut(&Path),
) -> Result<Volume, Error> {
	let first_slice = T::slice(&image)?;
	drop(image);
	let (height, width) = first_slice.dim();
	log::debug!(
		"Stack of {} slices with {}x{} pixels, size from {}",
		rest.len() + 1,
		width,
		height,
		first.display()
	);

	let mut data = Array3::<T>::default((height, width, rest.len() + 1));
	data.index_axis_mut(Axis(2), 0).assign(&first_slice);
	for (index, path) in rest.iter().enumerate() {
		let slice = slice::load::<T>(path)?;
		if slice.dim() != (height, width) {
			return Err(Error::ShapeMismatch {
				path: path.clone(),
				expected: (width, height),
				found: (slice.dim().1, slice.dim().0),
			});
		}
		data.index_axis_mut(Axis(2), index + 1).assign(&slice);
		loaded(path);
	}
	Ok(T::volume(data))
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{ImageBuffer, Luma};

	fn save_gray(path: &Path, width: u32, height: u32, seed: u8) {
		ImageBuffer::from_fn(width, height, |x, y| Luma([seed.wrapping_add((x + y * width) as u8)]))
			.save(path)
			.unwrap();
	}

	#[test]
	fn single_image_has_depth_one() {
		let folder = tempfile::tempdir().unwrap();
		let path = folder.path().join("slice.png");
		save_gray(&path, 5, 3, 7);

		let Volume::U8(data) = Volume::from_image(&path).unwrap() else {
			panic!("expected 8 bit volume");
		};
		assert_eq!(data.dim(), (3, 5, 1));
		for ((y, x, _), &value) in data.indexed_iter() {
			assert_eq!(value, 7u8.wrapping_add((x + y * 5) as u8));
		}
	}

	#[test]
	fn slices_keep_their_order() {
		let folder = tempfile::tempdir().unwrap();
		let files = (0..4)
			.map(|k| {
				let path = folder.path().join(format!("slice_{:03}.tif", k));
				save_gray(&path, 4, 6, k * 50);
				path
			})
			.collect::<Vec<_>>();

		let mut count = 0;
		let volume = Volume::from_stack(&files, |_| count += 1).unwrap();
		assert_eq!(count, 4);
		assert_eq!(volume.dim(), (6, 4, 4));
		let Volume::U8(data) = volume else {
			panic!("expected 8 bit volume");
		};
		for k in 0..4 {
			let expected = slice::load::<u8>(&files[k]).unwrap();
			assert_eq!(data.index_axis(Axis(2), k), expected);
		}
	}

	#[test]
	fn sixteen_bit_slices_stay_sixteen_bit() {
		let folder = tempfile::tempdir().unwrap();
		let files = (0..2)
			.map(|k| {
				let path = folder.path().join(format!("deep_{}.tif", k));
				ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(3, 3, |x, y| Luma([1000 * k + (x * 3 + y) as u16]))
					.save(&path)
					.unwrap();
				path
			})
			.collect::<Vec<_>>();

		let Volume::U16(data) = Volume::from_stack(&files, |_| {}).unwrap() else {
			panic!("expected 16 bit volume");
		};
		assert_eq!(data[[2, 1, 1]], 1000 + (1 * 3 + 2));
	}

	#[test]
	fn mismatched_slice_fails() {
		let folder = tempfile::tempdir().unwrap();
		let a = folder.path().join("a.tif");
		let b = folder.path().join("b.tif");
		save_gray(&a, 4, 4, 0);
		save_gray(&b, 4, 5, 0);

		match Volume::from_stack(&[a, b.clone()], |_| {}) {
			Err(Error::ShapeMismatch { path, expected, found }) => {
				assert_eq!(path, b);
				assert_eq!(expected, (4, 4));
				assert_eq!(found, (4, 5));
			},
			other => panic!("unexpected result {:?}", other),
		}
	}

	#[test]
	fn empty_stack_fails() {
		assert!(matches!(Volume::from_stack(&[], |_| {}), Err(Error::Configuration(_))));
	}
}
