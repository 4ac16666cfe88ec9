use crate::error::{DataFlashError, Result};
use crate::types::{Format, FMT_MESSAGE_TYPE};
use std::collections::HashMap;

/// Message type id to format mapping for one decoding session
///
/// Always holds an entry for the FMT type. Entries are inserted or
/// replaced as FMT records arrive and are never removed.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: HashMap<u8, Format>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        let mut formats = HashMap::new();
        formats.insert(FMT_MESSAGE_TYPE, Format::fmt());
        Self { formats }
    }

    pub fn lookup(&self, msg_type: u8) -> Result<&Format> {
        self.formats
            .get(&msg_type)
            .ok_or(DataFlashError::UnknownMessageType(msg_type))
    }

    /// Insert or replace the format for `msg_type`
    pub fn register(&mut self, msg_type: u8, format: Format) -> Option<Format> {
        self.formats.insert(msg_type, format)
    }

    pub fn contains(&self, msg_type: u8) -> bool {
        self.formats.contains_key(&msg_type)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Format)> {
        self.formats.iter().map(|(id, format)| (*id, format))
    }

    pub fn find_by_name(&self, name: &str) -> Option<(u8, &Format)> {
        self.iter().find(|(_, format)| format.name() == name)
    }

    /// Snapshot of all formats sorted by message type
    pub fn formats(&self) -> Vec<(u8, Format)> {
        let mut formats: Vec<(u8, Format)> = self
            .formats
            .iter()
            .map(|(id, format)| (*id, format.clone()))
            .collect();
        formats.sort_by_key(|(id, _)| *id);
        formats
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
