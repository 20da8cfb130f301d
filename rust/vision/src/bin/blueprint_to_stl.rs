// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Convert a floor-plan sketch into an STL solid
//!
//! Usage:
//!   blueprint-to-stl <image_path> [options]

use planforge_geometry::{shapes_to_mesh, write_stl, CircleCaps, MeshConfig, ShapeCounts, StlFormat};
use planforge_vision::{BlueprintParser, DetectionConfig};
use std::env;
use std::path::PathBuf;
use std::process;

struct Options {
    image_path: PathBuf,
    output_path: PathBuf,
    format: StlFormat,
    detection: DetectionConfig,
    mesh: MeshConfig,
    print_json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let options = match parse_args(&args[1..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage();
            process::exit(1);
        }
    };

    println!("=== Blueprint to STL ===");
    println!();

    // Step 1: Detect shapes
    println!("[1/2] Parsing sketch: {}", options.image_path.display());
    let parser = BlueprintParser::new(options.detection);
    let shapes = match parser.parse_file(&options.image_path) {
        Ok(shapes) => shapes,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let counts = ShapeCounts::of(&shapes);
    println!(
        "  Shapes: {} walls, {} doors, {} windows, {} circles",
        counts.walls, counts.doors, counts.windows, counts.circles
    );
    if let Some(preview) = &parser.config().preview_path {
        println!("  Preview: {}", preview.display());
    }

    if options.print_json {
        match serde_json::to_string_pretty(&shapes) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Warning: could not serialize shapes: {}", e),
        }
    }

    if shapes.is_empty() {
        eprintln!("Error: No shapes detected.");
        eprintln!("  Try: --hough-threshold or --min-segment-length with a lower value");
        process::exit(1);
    }

    // Step 2: Extrude and export
    println!("[2/2] Writing STL: {}", options.output_path.display());
    let mesh = match shapes_to_mesh(&shapes, &options.mesh) {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("Error building mesh: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = write_stl(&mesh, &options.output_path, options.format) {
        eprintln!("Error writing STL: {}", e);
        process::exit(1);
    }

    println!();
    println!("=== Summary ===");
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Output:    {}", options.output_path.display());
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        image_path: PathBuf::from(&args[0]),
        output_path: PathBuf::from("output.stl"),
        format: StlFormat::Binary,
        detection: DetectionConfig::default(),
        mesh: MeshConfig::default(),
        print_json: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--output" => {
                options.output_path = PathBuf::from(value(args, &mut i)?);
            }
            "--ascii" => {
                options.format = StlFormat::Ascii;
            }
            "--closed-circles" => {
                options.mesh.circle_caps = CircleCaps::Closed;
            }
            "--preview" => {
                options.detection.preview_path = Some(PathBuf::from(value(args, &mut i)?));
            }
            "--no-preview" => {
                options.detection.preview_path = None;
            }
            "--min-segment-length" => {
                options.detection.min_segment_length = value(args, &mut i)?
                    .parse()
                    .map_err(|_| "Invalid min segment length value".to_string())?;
            }
            "--hough-threshold" => {
                options.detection.hough_threshold = value(args, &mut i)?
                    .parse()
                    .map_err(|_| "Invalid hough threshold value".to_string())?;
            }
            "--json" => {
                options.print_json = true;
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(options)
}

fn value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value for {}", flag))
}

fn print_usage() {
    println!("blueprint-to-stl - Convert a floor-plan sketch to an STL solid");
    println!();
    println!("Usage: blueprint-to-stl <image_path> [options]");
    println!();
    println!("Options:");
    println!("  --output <path>              Output STL file (default: output.stl)");
    println!("  --ascii                      Write ASCII STL instead of binary");
    println!("  --closed-circles             Cap circle prisms top and bottom");
    println!("  --preview <path>             Preview image path (default: uploads/preview.jpg)");
    println!("  --no-preview                 Do not write a preview image");
    println!("  --min-segment-length <px>    Shortest segment kept as a wall (default: 30)");
    println!("  --hough-threshold <votes>    Hough accumulator threshold (default: 80)");
    println!("  --json                       Print the detected shapes as JSON");
    println!("  -h, --help                   Show this help");
}
