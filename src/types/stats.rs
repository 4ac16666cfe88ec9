use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decoding statistics for one session
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecodeStats {
    pub total_records: u32,
    pub fmt_records: u32,
    pub failed_frames: u32,
    pub unknown_types: u32,
    pub skipped_bytes: u64,
    pub total_bytes: u64,
    pub message_counts: HashMap<String, u32>,
}

impl DecodeStats {
    pub(crate) fn record_message(&mut self, name: &str) {
        self.total_records += 1;
        *self.message_counts.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Message names with counts, most frequent first
    pub fn sorted_counts(&self) -> Vec<(&str, u32)> {
        let mut counts: Vec<(&str, u32)> = self
            .message_counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_counts() {
        let mut stats = DecodeStats::default();
        stats.record_message("IMU");
        stats.record_message("GPS");
        stats.record_message("IMU");
        stats.record_message("ATT");

        assert_eq!(stats.total_records, 4);
        assert_eq!(
            stats.sorted_counts(),
            vec![("IMU", 2), ("ATT", 1), ("GPS", 1)]
        );
    }
}
