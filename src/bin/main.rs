//! CLI binary for DataFlash Parser
//!
//! This provides the command-line interface for the DataFlash parser library.

use anyhow::Result;
use clap::{Arg, Command};
use dataflash_parser::{parse_dataflash_file, DataFlashLog, DecoderOptions, ExportOptions};
use glob::glob;
use std::path::{Path, PathBuf};

fn build_command() -> Command {
    Command::new("DataFlash Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read and decode ArduPilot DataFlash binary logs. Output to various formats.")
        .arg(
            Arg::new("files")
                .help("DataFlash files to parse (.BIN, .LOG extensions supported, case-insensitive, supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed parsing information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export records to CSV files (one .NAME.csv per message type plus .formats.csv)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Export records to a JSON Lines file (.jsonl); requires the json feature")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Reject FMT definitions whose declared length disagrees with their fields")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-resync")
                .long("no-resync")
                .help("Stop at the first corrupt frame instead of skipping to the next frame marker")
                .action(clap::ArgAction::SetTrue),
        )
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    let decoder_options = DecoderOptions {
        debug,
        resync: !matches.get_flag("no-resync"),
        validate_lengths: matches.get_flag("strict"),
    };
    let export_options = ExportOptions {
        csv: matches.get_flag("csv"),
        json: matches.get_flag("json"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };
    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();

    if debug {
        println!(
            "dataflash_parser {} (git {}{}, {})",
            env!("CARGO_PKG_VERSION"),
            option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
            if option_env!("VERGEN_GIT_DIRTY") == Some("true") {
                "-dirty"
            } else {
                ""
            },
            option_env!("VERGEN_GIT_COMMIT_DATE").unwrap_or("unknown date")
        );
        println!("Input patterns: {file_patterns:?}");
    }

    let valid_paths = collect_input_paths(&file_patterns, debug);

    if debug {
        println!("Found {} valid files to process", valid_paths.len());
    }

    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Supported extensions: .BIN, .LOG (case-insensitive)");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut processed_files = 0;

    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        match parse_dataflash_file(path, &decoder_options) {
            Ok(log) => {
                display_log_info(&log);
                if let Err(e) = export_log(&log, path, &export_options) {
                    eprintln!("Error exporting {filename}: {e:#}");
                }
                processed_files += 1;
            }
            Err(e) => {
                eprintln!("Error processing {filename}: {e:#}");
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("This could be due to:");
        eprintln!("  - Files not being valid DataFlash format");
        eprintln!("  - Corrupted or empty files");
        eprintln!("  - Telemetry (.tlog) files, which are MAVLink rather than DataFlash");
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}

fn collect_input_paths(file_patterns: &[&String], debug: bool) -> Vec<PathBuf> {
    let mut valid_paths = Vec::new();

    for pattern in file_patterns {
        if debug {
            println!("Processing pattern: {pattern}");
        }

        let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                    Ok(paths) => {
                        if debug {
                            println!("Glob pattern '{pattern}' matched {} files", paths.len());
                        }
                        paths
                    }
                    Err(e) => {
                        eprintln!("Error expanding glob pattern '{pattern}': {e}");
                        continue;
                    }
                },
                Err(e) => {
                    eprintln!("Invalid glob pattern '{pattern}': {e}");
                    continue;
                }
            }
        } else {
            vec![Path::new(pattern.as_str()).to_path_buf()]
        };

        for path in paths {
            if !path.exists() {
                eprintln!("Warning: File does not exist: {path:?}");
                continue;
            }

            if !has_valid_extension(&path) {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("none");
                eprintln!("Warning: Skipping file with unsupported extension '{ext}': {path:?}");
                continue;
            }

            if debug {
                println!("Added valid file: {path:?}");
            }
            valid_paths.push(path);
        }
    }

    valid_paths
}

fn has_valid_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_ascii_lowercase();
            ext_lower == "bin" || ext_lower == "log"
        })
        .unwrap_or(false)
}

fn display_log_info(log: &DataFlashLog) {
    println!(
        "Records: {} ({} formats, {} FMT records)",
        log.stats.total_records,
        log.formats.len(),
        log.stats.fmt_records
    );

    if let Some(ref firmware) = log.firmware {
        match log.firmware_version {
            Some(ref version) => println!("Firmware: {firmware} (version {version})"),
            None => println!("Firmware: {firmware}"),
        }
    }

    println!("Duration: {:.1}s", log.duration_seconds());

    if log.stats.failed_frames > 0 {
        println!(
            "Failed frames: {} ({} unknown types, {} bytes skipped)",
            log.stats.failed_frames, log.stats.unknown_types, log.stats.skipped_bytes
        );
    }

    let counts = log.stats.sorted_counts();
    let shown = counts.len().min(10);
    if shown > 0 {
        println!("Top messages:");
        for (name, count) in &counts[..shown] {
            match log.format_for(name) {
                Some(format) => println!(
                    "  {name:<6} {count:>8}  [{}]",
                    format.column_names().join(",")
                ),
                None => println!("  {name:<6} {count:>8}"),
            }
        }
        if counts.len() > shown {
            println!("  ... and {} more message types", counts.len() - shown);
        }
    }
}

fn export_log(log: &DataFlashLog, path: &Path, export_options: &ExportOptions) -> Result<()> {
    if export_options.csv {
        #[cfg(feature = "csv")]
        {
            let report = dataflash_parser::export_to_csv(log, path, export_options)?;
            if let Some(ref formats_path) = report.formats_path {
                println!("Exported formats to: {}", formats_path.display());
            }
            println!("Exported {} CSV files", report.csv_paths.len());
        }
        #[cfg(not(feature = "csv"))]
        eprintln!("Warning: --csv requires the csv feature; skipping CSV export");
    }

    if export_options.json {
        #[cfg(feature = "json")]
        {
            let report = dataflash_parser::export_to_json(log, path, export_options)?;
            if let Some(ref json_path) = report.json_path {
                println!("Exported records to: {}", json_path.display());
            }
        }
        #[cfg(not(feature = "json"))]
        eprintln!("Warning: --json requires the json feature; skipping JSON export");
    }

    Ok(())
}
