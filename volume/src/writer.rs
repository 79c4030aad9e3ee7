use std::{
	ffi::OsString,
	path::{Path, PathBuf},
};

use nifti::{writer::WriterOptions, NiftiHeader};

use crate::{Error, Volume};

const SFORM_ALIGNED: i16 = 2;
const QFORM_UNKNOWN: i16 = 0;

/// Header with an identity voxel to world transform.
pub fn identity_header() -> NiftiHeader {
	NiftiHeader {
		pixdim: [1.0; 8],
		qform_code: QFORM_UNKNOWN,
		sform_code: SFORM_ALIGNED,
		srow_x: [1.0, 0.0, 0.0, 0.0],
		srow_y: [0.0, 1.0, 0.0, 0.0],
		srow_z: [0.0, 0.0, 1.0, 0.0],
		..NiftiHeader::default()
	}
}

/// Appends `.nii` if the path has no NIfTI extension.
pub fn nifti_path(path: &Path) -> PathBuf {
	let name = path
		.file_name()
		.map(|n| n.to_string_lossy().to_lowercase())
		.unwrap_or_default();
	if name.ends_with(".nii") || name.ends_with(".nii.gz") {
		return path.to_path_buf();
	}
	let mut path = OsString::from(path.as_os_str());
	path.push(".nii");
	PathBuf::from(path)
}

pub fn save(volume: &Volume, path: &Path) -> Result<(), Error> {
	common::setup_parent(path)?;
	let header = identity_header();
	let options = WriterOptions::new(path).reference_header(&header);
	match volume {
		Volume::U8(data) => options.write_nifti(data)?,
		Volume::U16(data) => options.write_nifti(data)?,
		Volume::F32(data) => options.write_nifti(data)?,
	}
	Ok(())
}
