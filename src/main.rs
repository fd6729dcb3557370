use std::{fs, process};

use clap::Parser;
use quill::run;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// quill runs scripts written in a small, dynamically typed language with
/// closures, inline objects and lists.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat CONTENTS as the script itself instead of a path to it.
    #[arg(short, long)]
    expr: bool,

    /// Log interpreter activity to stderr; repeat for more detail.
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the script to run.
    contents: String,
}

/// Installs a stderr subscriber so that script output on stdout is left
/// untouched.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                      EnvFilter::new(match verbose {
                                                          0 => "warn",
                                                          1 => "debug",
                                                          _ => "trace",
                                                      })
                                                  });

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)
                                                    .with_target(true)
                                                    .with_level(true))
                                  .with(filter)
                                  .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let script = if args.expr {
        args.contents
    } else {
        fs::read_to_string(&args.contents).unwrap_or_else(|e| {
                                              eprintln!("Failed to read the script '{}': {e}",
                                                        &args.contents);
                                              process::exit(1);
                                          })
    };

    if let Err(e) = run(&script) {
        eprintln!("{e}");
        process::exit(1);
    }
}
