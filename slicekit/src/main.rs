mod batch;

use std::{io::Write, path::PathBuf};

use clap::{CommandFactory, Parser};
use colored::Colorize;

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let code = if std::env::args().len() > 1 {
		cli()
	} else {
		interactive()
	};
	std::process::exit(code);
}

fn interactive() -> i32 {
	let mut c = InteractiveCommand::command();
	c.print_help().ok();

	loop {
		print!("{}", "\n=> ".bold().green());
		std::io::stdout().flush().ok();

		let mut line = String::from("slicekit ");
		match std::io::stdin().read_line(&mut line) {
			Ok(0) => break,
			Ok(_) => {},
			Err(err) => {
				report(&err.into());
				return 1;
			},
		}
		match InteractiveCommand::try_parse_from(line.split_whitespace()) {
			Ok(InteractiveCommand::Job(job)) => {
				if let Err(err) = job.run() {
					report(&err);
				}
			},
			Ok(InteractiveCommand::Batch { script }) => {
				if let Err(err) = batch::run(&script) {
					report(&err);
				}
			},
			Ok(InteractiveCommand::Quit) => break,
			Err(err) => {
				err.print().ok();
			},
		}
	}
	0
}

fn cli() -> i32 {
	let res = match Command::parse() {
		Command::Job(job) => job.run(),
		Command::Batch { script } => batch::run(&script),
	};
	match res {
		Ok(()) => 0,
		Err(err) => {
			report(&err);
			1
		},
	}
}

fn report(err: &Error) {
	eprintln!("{} {}", "Error:".bold().red(), err);
}

#[derive(clap::Subcommand, Debug)]
pub enum Job {
	/// Convert every image into its own volume
	Slices(volume::SliceCommand),
	/// Combine the images of a folder into one volume
	Stack(volume::StackCommand),
	/// Convert a key file into a VTK mesh
	Keys(keyfile::Command),
}

impl Job {
	pub fn run(self) -> Result<(), Error> {
		match self {
			Self::Slices(command) => {
				let outputs = volume::run_slices(command)?;
				log::info!("Converted {} images", outputs.len());
			},
			Self::Stack(command) => {
				volume::run_stack(command)?;
			},
			Self::Keys(command) => {
				let report = keyfile::run(command)?;
				if !report.warnings.is_empty() {
					log::warn!("{} warnings for {}", report.warnings.len(), report.input.display());
				}
			},
		}
		Ok(())
	}
}

#[derive(clap::Parser)]
#[command(version, about)]
enum Command {
	#[command(flatten)]
	Job(Job),
	/// Run a script with one command per line
	Batch { script: PathBuf },
}

#[derive(clap::Parser)]
#[command(name = "slicekit", arg_required_else_help = false)]
enum InteractiveCommand {
	#[command(flatten)]
	Job(Job),
	/// Run a script with one command per line
	Batch { script: PathBuf },
	/// Quit application
	Quit,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error(transparent)]
	Volume(#[from] volume::Error),

	#[error(transparent)]
	Keyfile(#[from] keyfile::Error),

	#[error("Script not found: {}", .0.display())]
	ScriptNotFound(PathBuf),

	#[error("Line {line}: {source}")]
	ScriptSyntax { line: usize, source: clap::Error },

	#[error("Line {line}: {source}")]
	ScriptLine { line: usize, source: Box<Error> },

	#[error(transparent)]
	IO(#[from] std::io::Error),
}
