//! Export functionality for decoded DataFlash logs
//!
//! CSV export writes one file per message name plus a `.formats.csv`
//! listing every registered format. JSON export (feature `json`) writes the
//! records as JSON Lines.

use crate::error::Result;
use crate::types::*;
use std::path::{Path, PathBuf};

#[cfg(feature = "csv")]
use std::collections::HashSet;

/// Export options for controlling output formats
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub csv: bool,
    pub json: bool,
    pub output_dir: Option<String>,
}

/// Paths written by an export call
#[derive(Debug, Default)]
pub struct ExportReport {
    pub csv_paths: Vec<PathBuf>,
    pub formats_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// Resolve the output directory and base file name for an input log
///
/// The directory defaults to the input file's parent.
pub fn compute_export_paths(input_path: &Path, export_options: &ExportOptions) -> (PathBuf, String) {
    let base_name = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataflash")
        .to_string();

    let output_dir = match export_options.output_dir {
        Some(ref dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    (output_dir, base_name)
}

fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)?;
    }
    Ok(())
}

/// Export each message type to its own CSV file
#[cfg(feature = "csv")]
pub fn export_to_csv(
    log: &DataFlashLog,
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    let (output_dir, base_name) = compute_export_paths(input_path, export_options);
    ensure_output_dir(&output_dir)?;

    let mut report = ExportReport::default();

    let formats_path = output_dir.join(format!("{base_name}.formats.csv"));
    export_formats_to_csv(&log.formats, &formats_path)?;
    report.formats_path = Some(formats_path);

    let mut used_files: HashSet<String> = HashSet::new();
    for name in log.message_names() {
        if name == "FMT" {
            continue;
        }
        let mut file_component = sanitize_file_component(name);
        if !used_files.insert(file_component.to_ascii_lowercase()) {
            // Distinct names that clean up to the same file get their type id appended
            let msg_type = log
                .records_by_name(name)
                .next()
                .map(|r| r.msg_type)
                .unwrap_or_default();
            file_component = format!("{file_component}_{msg_type:02X}");
            used_files.insert(file_component.to_ascii_lowercase());
        }
        let path = output_dir.join(format!("{base_name}.{file_component}.csv"));
        export_message_to_csv(log, name, &path)?;
        report.csv_paths.push(path);
    }

    Ok(report)
}

#[cfg(feature = "csv")]
fn export_formats_to_csv(formats: &[(u8, Format)], output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["Type", "Name", "Length", "Format", "Columns"])?;

    for (msg_type, format) in formats {
        writer.write_record([
            msg_type.to_string(),
            format.name().to_string(),
            format.declared_length().to_string(),
            format.type_codes(),
            format.column_names().join(","),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// The header is the union of columns over every record of `name`, in
/// first-seen order, so a redefined format keeps both old and new columns.
/// Cells a record has no value for are left empty.
#[cfg(feature = "csv")]
fn export_message_to_csv(log: &DataFlashLog, name: &str, output_path: &Path) -> Result<()> {
    if log.records_by_name(name).next().is_none() {
        return Ok(());
    }

    let mut columns: Vec<&str> = Vec::new();
    for record in log.records_by_name(name) {
        for field in &record.fields {
            if !columns.contains(&field.name.as_str()) {
                columns.push(&field.name);
            }
        }
    }

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(&columns)?;

    for record in log.records_by_name(name) {
        let row: Vec<String> = columns
            .iter()
            .map(|column| record.get(column).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Export all records as JSON Lines
///
/// Each line is `{"type":..,"name":..,"fields":{..}}` with the fields in
/// column order.
#[cfg(feature = "json")]
pub fn export_to_json(
    log: &DataFlashLog,
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    use crate::error::DataFlashError;
    use std::fs::File;
    use std::io::{BufWriter, Write};

    let (output_dir, base_name) = compute_export_paths(input_path, export_options);
    ensure_output_dir(&output_dir)?;

    let json_path = output_dir.join(format!("{base_name}.jsonl"));
    let mut writer = BufWriter::new(File::create(&json_path)?);

    for record in &log.records {
        let mut fields = serde_json::Map::new();
        for field in &record.fields {
            let value = serde_json::to_value(&field.value)
                .map_err(|e| DataFlashError::Export(e.to_string()))?;
            fields.insert(field.name.clone(), value);
        }

        let mut object = serde_json::Map::new();
        object.insert("type".to_string(), record.msg_type.into());
        object.insert("name".to_string(), record.name.clone().into());
        object.insert("fields".to_string(), fields.into());
        serde_json::to_writer(&mut writer, &object)
            .map_err(|e| DataFlashError::Export(e.to_string()))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(ExportReport {
        json_path: Some(json_path),
        ..ExportReport::default()
    })
}

/// Keep message names usable inside file names
fn sanitize_file_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "UNNAMED".to_string()
    } else {
        cleaned
    }
}
