//! CLI tool for tilemapview - loads a tile map CSV and outputs the chart JSON
//!
//! Usage:
//!   tilemap_cli <input.csv>                   # Output JSON to stdout
//!   tilemap_cli <input.csv> -o out.json       # Output JSON to file
//!   tilemap_cli <input.csv> --width 480       # Include the layout resolved at 480px
//!   tilemap_cli <input.csv> -v                # Debug logging
//!
//! Malformed fields are reported on stderr; `RUST_LOG` overrides the filter.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde_json::json;
use tilemapview::chart_spec::build_chart_spec;
use tilemapview::normalize::load_dataset;
use tilemapview::telemetry::init_cli_tracing;
use tilemapview::ChartOptions;
use tracing::{info, warn};

fn usage() -> ! {
    eprintln!("Usage: tilemap_cli <input.csv> [-o output.json] [--width <px>] [-v]");
    std::process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let verbose = args.iter().skip(2).any(|a| a == "-v" || a == "--verbose");
    let _ = init_cli_tracing(verbose);

    if args.len() < 2 {
        usage();
    }

    let input_path = &args[1];
    let mut output_path = None;
    let mut width = None;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" if i + 1 < args.len() => {
                output_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--width" if i + 1 < args.len() => {
                match args[i + 1].parse::<f64>() {
                    Ok(w) if w > 0.0 => width = Some(w),
                    _ => {
                        eprintln!("Invalid width: {}", args[i + 1]);
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            "-v" | "--verbose" => i += 1,
            _ => usage(),
        }
    }

    // Read input file
    let text = match fs::read_to_string(input_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let data = match load_dataset(&text) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading CSV: {}", e);
            std::process::exit(1);
        }
    };
    for defect in &data.defects {
        warn!("{defect}");
    }
    info!(points = data.len(), defects = data.defects.len(), "loaded");

    let spec = build_chart_spec(&data, &ChartOptions::default());
    let value = match width {
        Some(w) => json!({ "chart": spec, "resolved": spec.resolve(w) }),
        None => json!({ "chart": spec }),
    };

    let json = match serde_json::to_string_pretty(&value) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
