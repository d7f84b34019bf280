// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! test2html: render `go test -json` output as an HTML report
//!
//! Reads newline-delimited test events from a file or stdin, folds them into
//! a package/test/subtest tree, and writes a self-contained report.

use clap::Parser;
use test2html::app;
use test2html::config::Config;

fn main() {
    let config = Config::parse();

    // Logs go to stderr; stdout carries only the result line
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match app::run(&config) {
        Ok(path) => println!("Test report generated at {}", path.display()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}
