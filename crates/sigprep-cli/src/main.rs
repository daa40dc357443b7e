// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sigprep command-line front end for signature normalisation.
//
// Entry point. Initialises logging, resolves the pipeline configuration, runs
// the pipeline on one image, and writes the requested outputs.

mod cli;
mod inspect;

use clap::Parser;
use sigprep_core::error::Result;
use sigprep_core::human_errors::humanize_error;
use sigprep_pipeline::preprocess_path;

use cli::{Args, ExitCode};

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(image = %args.image.display(), "sigprep starting");

    match run(&args) {
        Ok(()) => ExitCode::Success.into(),
        Err(err) => {
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::for_error(&err).into()
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.pipeline_config()?;
    let result = preprocess_path(&args.image, config)?;

    if let Some(dir) = &args.dump_stages {
        inspect::dump_stages(&result, dir)?;
    }
    if !args.no_save {
        inspect::save_final(&result, &args.output)?;
    }

    let summary = result.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{}: skew {:.2} deg, box {}, {} skeleton px -> {}x{}",
            args.image.display(),
            summary.skew_angle,
            summary.bounding_box,
            summary.skeleton_pixels,
            result.final_image.width(),
            result.final_image.height(),
        );
    }
    Ok(())
}
