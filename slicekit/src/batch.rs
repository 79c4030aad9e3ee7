use std::path::Path;

use clap::Parser;

use crate::{Error, Job};

#[derive(clap::Parser, Debug)]
#[command(name = "batch", no_binary_name = true)]
struct Line {
	#[command(subcommand)]
	job: Job,
}

/// Parses all lines before running anything. Blank lines and lines starting with `#` are skipped.
pub fn parse(script: &str) -> Result<Vec<(usize, Job)>, Error> {
	let mut jobs = Vec::new();
	for (index, line) in script.lines().enumerate() {
		let line_number = index + 1;
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}
		let job = Line::try_parse_from(line.split_whitespace())
			.map_err(|source| Error::ScriptSyntax { line: line_number, source })?
			.job;
		jobs.push((line_number, job));
	}
	Ok(jobs)
}

/// Runs the jobs in order and stops at the first failure.
pub fn run(script: &Path) -> Result<(), Error> {
	if !script.is_file() {
		return Err(Error::ScriptNotFound(script.to_path_buf()));
	}
	let jobs = parse(&std::fs::read_to_string(script)?)?;
	log::info!("Running {} jobs from {}", jobs.len(), script.display());
	for (line, job) in jobs {
		log::info!("Line {}", line);
		job.run()
			.map_err(|source| Error::ScriptLine { line, source: Box::new(source) })?;
	}
	Ok(())
}
