//! Firmware metadata helpers for DataFlash logs
//!
//! ArduPilot writes its firmware banner into `MSG` text records (and, on
//! newer firmware, into the `FWS` column of `VER`). These helpers pull the
//! banner out of decoded records and parse the version it carries.

use crate::types::Record;
use semver::Version;

/// Vehicle firmware names that start an ArduPilot banner
pub const VEHICLE_NAMES: &[&str] = &[
    "ArduCopter",
    "ArduPlane",
    "ArduRover",
    "ArduSub",
    "Rover",
    "AntennaTracker",
    "Blimp",
    "AP_Periph",
];

/// Extract the vehicle name from a banner like "ArduCopter V4.3.0 (5d1d6b38)"
pub fn extract_vehicle_type(banner: &str) -> Option<&'static str> {
    let first = banner.split_whitespace().next()?;
    VEHICLE_NAMES.iter().copied().find(|name| *name == first)
}

/// Extract the firmware version from a banner
///
/// Accepts `V4.3.0`, `4.3.0`, `V4.5.0-dev` and two-part `V4.3` forms.
pub fn extract_firmware_version(banner: &str) -> Option<Version> {
    for word in banner.split_whitespace() {
        let candidate = word
            .strip_prefix('V')
            .or_else(|| word.strip_prefix('v'))
            .unwrap_or(word);

        if !candidate.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        if let Ok(version) = Version::parse(candidate) {
            return Some(version);
        }

        // Two-part versions like "4.3" become "4.3.0"
        if candidate.matches('.').count() == 1 {
            if let Ok(version) = Version::parse(&format!("{}.0", candidate)) {
                return Some(version);
            }
        }
    }
    None
}

/// Find the firmware banner among decoded records
///
/// Prefers the `FWS` column of a `VER` record and falls back to the first
/// `MSG` text that starts with a known vehicle name.
pub fn find_firmware_banner<'a, I>(records: I) -> Option<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut from_msg: Option<&str> = None;

    for record in records {
        match record.name.as_str() {
            "VER" => {
                if let Some(fws) = record.get_str("FWS").filter(|s| !s.is_empty()) {
                    return Some(fws.to_string());
                }
            }
            "MSG" if from_msg.is_none() => {
                if let Some(text) = record.get_str("Message") {
                    if extract_vehicle_type(text).is_some() {
                        from_msg = Some(text);
                    }
                }
            }
            _ => {}
        }
    }

    from_msg.map(str::to_string)
}

/// Convert a `TimeUS` value to seconds
pub fn time_us_to_seconds(time_us: u64) -> f64 {
    time_us as f64 / 1_000_000.0
}
