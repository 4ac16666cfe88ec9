use crate::types::{DecodeStats, Format, Record};
use semver::Version;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete decoded DataFlash log
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataFlashLog {
    /// Formats registered at the end of the log, sorted by message type
    pub formats: Vec<(u8, Format)>,
    pub records: Vec<Record>,
    pub stats: DecodeStats,
    /// Firmware banner as written by the vehicle, e.g. "ArduCopter V4.3.0 (abc123)"
    pub firmware: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub firmware_version: Option<Version>,
}

impl DataFlashLog {
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
            records: Vec::new(),
            stats: DecodeStats::default(),
            firmware: None,
            firmware_version: None,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// All records with the given message name, in stream order
    pub fn records_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.name == name)
    }

    /// Distinct message names in order of first appearance
    pub fn message_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.name.as_str()) {
                names.push(&record.name);
            }
        }
        names
    }

    pub fn format_for(&self, name: &str) -> Option<&Format> {
        self.formats
            .iter()
            .map(|(_, format)| format)
            .find(|format| format.name() == name)
    }

    /// Span between the first and last `TimeUS` timestamps
    pub fn duration_us(&self) -> u64 {
        let mut timestamps = self.records.iter().filter_map(Record::timestamp_us);
        let Some(first) = timestamps.next() else {
            return 0;
        };
        let (min, max) = timestamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        max - min
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_us() as f64 / 1_000_000.0
    }
}

impl Default for DataFlashLog {
    fn default() -> Self {
        Self::new()
    }
}
