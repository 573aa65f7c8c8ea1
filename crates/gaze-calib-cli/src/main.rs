use std::{error::Error, fs, path::Path};

use clap::Parser;
use gaze_calib::pipeline::{
    CalibrationConfig, CalibrationInput, CalibrationReport, run_calibration,
};
use log::info;

/// Calibration CLI for gaze tracking sessions.
#[derive(Debug, Parser)]
#[command(author, version, about = "Fit and score a gaze calibrator")]
struct Args {
    /// Path to JSON file containing CalibrationInput.
    #[arg(long)]
    input: String,

    /// Optional path to JSON CalibrationConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&data)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    Ok(value)
}

fn write_report_json(report: &CalibrationReport) -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn run_calibration_from_files(
    input_path: &str,
    config_path: Option<&str>,
) -> Result<String, Box<dyn Error>> {
    let input: CalibrationInput = load_json_file(Path::new(input_path))?;
    info!("loaded {} records from {input_path}", input.num_records());

    let config = if let Some(cfg_path) = config_path {
        load_json_file::<CalibrationConfig>(Path::new(cfg_path))?
    } else {
        CalibrationConfig::default()
    };

    let report = run_calibration(&input, &config)?;
    write_report_json(&report)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let json = run_calibration_from_files(&args.input, args.config.as_deref())?;
    println!("{}", json);
    Ok(())
}
