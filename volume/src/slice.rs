use std::path::Path;

use image::{ColorType, DynamicImage, Rgb};
use ndarray::{Array2, Array3};

use crate::{Error, Volume};

/// Sample type of a slice, decided by the first image of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
	U8,
	U16,
	F32,
}

impl SampleKind {
	pub fn of(image: &DynamicImage) -> Self {
		match image.color() {
			ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 => Self::U16,
			ColorType::Rgb32F | ColorType::Rgba32F => Self::F32,
			_ => Self::U8,
		}
	}
}

/// Single channel sample stored in a volume.
///
/// Color images are reduced to ITU-R 601-2 luma, `0.299 R + 0.587 G + 0.114 B`. Gray images keep their values.
pub trait Sample: Copy + Default {
	fn slice(image: &DynamicImage) -> Result<Array2<Self>, Error>;

	fn volume(data: Array3<Self>) -> Volume;
}

/// Luma with 16 bit fixed point weights, rounded to nearest.
fn luma(r: u64, g: u64, b: u64) -> u64 {
	(r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16
}

impl Sample for u8 {
	fn slice(image: &DynamicImage) -> Result<Array2<Self>, Error> {
		let rgb = image.to_rgb8();
		let raw = rgb
			.pixels()
			.map(|&Rgb([r, g, b])| luma(r.into(), g.into(), b.into()) as u8)
			.collect();
		array(rgb.width(), rgb.height(), raw)
	}

	fn volume(data: Array3<Self>) -> Volume {
		Volume::U8(data)
	}
}

impl Sample for u16 {
	fn slice(image: &DynamicImage) -> Result<Array2<Self>, Error> {
		let rgb = image.to_rgb16();
		let raw = rgb
			.pixels()
			.map(|&Rgb([r, g, b])| luma(r.into(), g.into(), b.into()) as u16)
			.collect();
		array(rgb.width(), rgb.height(), raw)
	}

	fn volume(data: Array3<Self>) -> Volume {
		Volume::U16(data)
	}
}

impl Sample for f32 {
	fn slice(image: &DynamicImage) -> Result<Array2<Self>, Error> {
		let rgb = image.to_rgb32f();
		let raw = rgb
			.pixels()
			.map(|&Rgb([r, g, b])| 0.299 * r + 0.587 * g + 0.114 * b)
			.collect();
		array(rgb.width(), rgb.height(), raw)
	}

	fn volume(data: Array3<Self>) -> Volume {
		Volume::F32(data)
	}
}

/// Row major pixels as `(height, width)`.
fn array<T>(width: u32, height: u32, raw: Vec<T>) -> Result<Array2<T>, Error> {
	Ok(Array2::from_shape_vec((height as usize, width as usize), raw)?)
}

pub fn open(path: &Path) -> Result<DynamicImage, Error> {
	if !path.is_file() {
		return Err(Error::NotFound(path.to_path_buf()));
	}
	Ok(image::open(path)?)
}

pub fn load<T: Sample>(path: &Path) -> Result<Array2<T>, Error> {
	T::slice(&open(path)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{ImageBuffer, Luma};

	#[test]
	fn kind_follows_bit_depth() {
		let gray = DynamicImage::ImageLuma8(ImageBuffer::new(2, 2));
		let deep = DynamicImage::ImageLuma16(ImageBuffer::new(2, 2));
		let color = DynamicImage::ImageRgb16(ImageBuffer::new(2, 2));
		let float = DynamicImage::ImageRgb32F(ImageBuffer::new(2, 2));
		assert_eq!(SampleKind::of(&gray), SampleKind::U8);
		assert_eq!(SampleKind::of(&deep), SampleKind::U16);
		assert_eq!(SampleKind::of(&color), SampleKind::U16);
		assert_eq!(SampleKind::of(&float), SampleKind::F32);
	}

	#[test]
	fn gray_pixels_are_kept() {
		let image = DynamicImage::ImageLuma8(ImageBuffer::from_fn(3, 2, |x, y| Luma([(x * 10 + y) as u8])));
		let slice = u8::slice(&image).unwrap();
		assert_eq!(slice.dim(), (2, 3));
		for ((y, x), &value) in slice.indexed_iter() {
			assert_eq!(value, (x * 10 + y) as u8);
		}
	}

	#[test]
	fn color_is_reduced_to_luma() {
		let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(4, 1, Rgb([200, 200, 200])));
		let slice = u8::slice(&image).unwrap();
		assert!(slice.iter().all(|&v| v == 200));
	}

	#[test]
	fn luma_uses_601_weights() {
		let image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(4, 1, |x, _| match x {
			0 => Rgb([255, 0, 0]),
			1 => Rgb([0, 255, 0]),
			2 => Rgb([0, 0, 255]),
			_ => Rgb([10, 20, 30]),
		}));
		let slice = u8::slice(&image).unwrap();
		assert_eq!(slice.row(0).to_vec(), [76, 150, 29, 18]);

		let image = DynamicImage::ImageRgb16(ImageBuffer::from_pixel(1, 1, Rgb([65535, 0, 0])));
		assert_eq!(u16::slice(&image).unwrap()[[0, 0]], 19595);

		let image = DynamicImage::ImageRgb32F(ImageBuffer::from_pixel(1, 1, Rgb([0.0, 0.0, 1.0])));
		assert!((f32::slice(&image).unwrap()[[0, 0]] - 0.114).abs() < 1e-6);
	}

	#[test]
	fn sixteen_bit_gray_is_kept() {
		let image = DynamicImage::ImageLuma16(ImageBuffer::from_fn(3, 1, |x, _| Luma([[0, 1, 65535][x as usize]])));
		let slice = u16::slice(&image).unwrap();
		assert_eq!(slice.row(0).to_vec(), [0, 1, 65535]);
	}

	#[test]
	fn missing_file() {
		let folder = tempfile::tempdir().unwrap();
		let result = load::<u8>(&folder.path().join("missing.jpg"));
		assert!(matches!(result, Err(Error::NotFound(_))));
	}
}
