mod progress;

use std::path::{Path, PathBuf};

pub use progress::{Progress, Stage};

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Output folder is file: {}", .0.display())]
	OutputFolderIsFile(PathBuf),

	#[error(transparent)]
	IO(#[from] std::io::Error),
}

/// Creates the output folder if it does not exist yet. Existing content is kept.
pub fn setup_folder(path: &Path) -> Result<(), Error> {
	if path.is_file() {
		return Err(Error::OutputFolderIsFile(path.to_path_buf()));
	}
	if !path.is_dir() {
		std::fs::create_dir_all(path)?;
	}
	Ok(())
}

/// Creates the parent folder of an output file.
pub fn setup_parent(path: &Path) -> Result<(), Error> {
	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => setup_folder(parent),
		_ => Ok(()),
	}
}

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
	let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
		return false;
	};
	extensions
		.iter()
		.any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
}

/// Files in `folder` with one of the extensions, sorted by file name.
///
/// The order is lexicographic, numbered files must be zero padded to keep their numeric order.
pub fn list_files(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, Error> {
	let mut files = Vec::new();
	for entry in std::fs::read_dir(folder)? {
		let path = entry?.path();
		if path.is_file() && has_extension(&path, extensions) {
			files.push(path);
		}
	}
	files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
	Ok(files)
}

/// `folder/stem_suffix.extension` for the output base `folder/stem.any`.
pub fn with_suffix(base: &Path, suffix: &str, extension: &str) -> PathBuf {
	let stem = base
		.file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.unwrap_or_default();
	base.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}
