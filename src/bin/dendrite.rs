//! dendrite CLI binary
//!
//! Command-line interface for document parsing and chunking.

use clap::Parser;
use dendrite::cli::{CliArgs, Runner};
use std::process;

fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                print!("{}", e);
                process::exit(0);
            }
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let runner = Runner::new(args);
    match runner.run() {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
