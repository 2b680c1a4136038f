use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Context;
use block_calib_rs::image_pipeline::{BlockToBmpPipeline, CalibrationConfig};
use block_calib_rs::logger;

use tracing::{debug, info};

const INPUT_FILE: &str = "block.int";
const NORMALIZED_IMAGE: &str = "normalized_image.bmp";
const THICKNESS_IMAGE: &str = "thickness_image.bmp";

fn main() -> ExitCode {
    logger::init();
    ExitCode::from(exit_status(&run()))
}

/// 0 on success. Failures print `An error occurred: ...` to stderr and map to 1.
fn exit_status(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            debug!("Run failed: {:?}", e);
            eprintln!("An error occurred: {:#}", e);
            1
        }
    }
}

fn run() -> anyhow::Result<()> {
    info!("Starting block calibration...");

    let pipeline = BlockToBmpPipeline::new(CalibrationConfig::default());
    info!("Signal threshold: {}", pipeline.config().signal_threshold);

    let (grid, mut timings) = pipeline
        .process_file_with_timings(INPUT_FILE, NORMALIZED_IMAGE)
        .with_context(|| format!("converting {} to {}", INPUT_FILE, NORMALIZED_IMAGE))?;
    println!("Image '{}' generated successfully.", NORMALIZED_IMAGE);

    if prompt_for_thickness()? {
        let thickness_timings = pipeline
            .write_thickness_file_with_timings(&grid, THICKNESS_IMAGE)
            .with_context(|| format!("writing {}", THICKNESS_IMAGE))?;
        timings.extend(thickness_timings);
        println!("Image '{}' generated successfully.", THICKNESS_IMAGE);
    }

    timings.log_summary();
    Ok(())
}

fn prompt_for_thickness() -> anyhow::Result<bool> {
    print!("Input 1 to check thickness: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading thickness prompt")?;

    Ok(wants_thickness(&line))
}

/// True when the first whitespace-separated token is the integer 1.
/// Empty input (EOF) declines.
fn wants_thickness(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .and_then(|token| token.parse::<i64>().ok())
        == Some(1)
}
