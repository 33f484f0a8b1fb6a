// src/main.rs
//! # hpcs-tool
//!
//! Command-line front end for inspecting ChemStation files through the
//! libHPCS decoding engine.
//!
//! ## Usage
//!
//! ```bash
//! # Full measurement: metadata plus the signal trace
//! hpcs-tool data DAD1A.ch
//!
//! # Metadata only
//! hpcs-tool header DAD1A.ch
//!
//! # Method parameters
//! hpcs-tool method CAL3.MTH
//!
//! # Point at a specific engine build
//! hpcs-tool --engine ./build/libHPCS.so data DAD1A.ch
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use hpcs_rs::{HpcsReader, MeasuredData, MethodInfo};

/// Inspect HP/Agilent ChemStation files via libHPCS
#[derive(Parser)]
#[command(name = "hpcs-tool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the libHPCS library (defaults to the platform lookup)
    #[arg(short, long, value_name = "LIB")]
    engine: Option<PathBuf>,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read measurement metadata and the full signal trace
    Data {
        /// Measurement file (.ch)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Read measurement metadata only
    Header {
        /// Measurement file (.ch)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Read method parameters from a method file
    Method {
        /// Method file (.MTH)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let reader = match &cli.engine {
        Some(path) => HpcsReader::load(path),
        None => HpcsReader::load_default(),
    }
    .context("cannot load the libHPCS decoding engine")?;

    match cli.command {
        Commands::Data { file } => {
            let data = reader
                .read_data(&file)
                .with_context(|| format!("cannot read '{}'", file.display()))?;
            print_measured_data(&data, true);
        }
        Commands::Header { file } => {
            let data = reader
                .read_header(&file)
                .with_context(|| format!("cannot read '{}'", file.display()))?;
            print_measured_data(&data, false);
        }
        Commands::Method { file } => {
            let info = reader
                .read_method_info(&file)
                .with_context(|| format!("cannot read '{}'", file.display()))?;
            print_method_info(&info);
        }
    }

    Ok(())
}

fn print_measured_data(data: &MeasuredData, with_trace: bool) {
    println!("File description: {}", data.file_description);
    println!("Sample info: {}", data.sample_info);
    println!("Operator name: {}", data.operator_name);
    println!("Date: {}", data.date);
    println!("Method name: {}", data.method_name);
    println!("Software version: {}", data.software_version);
    println!("Software revision: {}", data.software_revision);
    println!("Y units: {}", data.y_units);
    match data.sampling_rate {
        Some(rate) => println!("Sampling rate: {rate} Hz"),
        None => println!("Sampling rate: unknown"),
    }
    println!("File type: {}", data.file_type);
    if let Some(w) = data.detection_wavelength {
        match w.interval {
            Some(interval) => {
                println!("Detection wavelength: {} nm ({} nm interval)", w.wavelength, interval)
            }
            None => println!("Detection wavelength: {} nm", w.wavelength),
        }
    }
    if let Some(w) = data.reference_wavelength {
        match w.interval {
            Some(interval) => {
                println!("Reference wavelength: {} nm ({} nm interval)", w.wavelength, interval)
            }
            None => println!("Reference wavelength: {} nm", w.wavelength),
        }
    }

    if with_trace {
        for sample in &data.samples {
            println!("Time: {}, Value: {}", sample.time, sample.value);
        }
    }
}

fn print_method_info(info: &MethodInfo) {
    let mut parameters: Vec<(&str, &str)> = info.iter().collect();
    parameters.sort_unstable();
    for (name, value) in parameters {
        println!("{name} = {value}");
    }
}
