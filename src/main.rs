use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use stratos_track::{SessionSummary, TrackReader};

#[derive(Parser)]
#[command(name = "stratos-track")]
#[command(about = "Reconstruct a flight track from a captured NMEA log")]
struct Cli {
    /// The file containing GPS data
    file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut reader = match TrackReader::open(&cli.file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error opening {}: {}", cli.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut summary = SessionSummary::default();
    for sample in reader.by_ref() {
        match sample {
            Ok(s) => summary.observe(&s),
            Err(e) => {
                eprintln!("Error reading {}: {}", cli.file.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    let rejected = reader.rejections();
    log::info!(
        "{}: {} frames accepted, {} lines rejected",
        cli.file.display(),
        reader.frame_count(),
        rejected.total()
    );
    println!("{}", summary);
    println!(
        "Rejected lines: {} truncated, {} bad timestamp, {} malformed frames",
        rejected.truncated, rejected.malformed_timestamp, rejected.malformed_frame
    );
    ExitCode::SUCCESS
}
