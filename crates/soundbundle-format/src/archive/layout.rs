//! Lookup-table offset computation.

use super::ArchiveEntry;
use crate::error::{ArchiveError, ArchiveResult};

/// Size of one lookup-table record (offset + length).
pub const ENTRY_LEN: u64 = 8;

/// Size of the count field plus a lookup table of `entries` records.
pub fn header_len(entries: usize) -> u64 {
    4 + entries as u64 * ENTRY_LEN
}

/// Computes archive entries for payloads of the given lengths, in order.
///
/// The first payload starts immediately after the lookup table; each later
/// payload starts where the previous one ends. Fails when the archive would
/// not be addressable with 32-bit offsets.
pub fn layout(lengths: &[u32]) -> ArchiveResult<Vec<ArchiveEntry>> {
    let header = header_len(lengths.len());
    let payload_bytes: u64 = lengths.iter().map(|&l| u64::from(l)).sum();

    if header + payload_bytes > u64::from(u32::MAX) {
        return Err(ArchiveError::TooLarge {
            entries: lengths.len(),
            payload_bytes,
        });
    }

    let mut offset = header as u32;
    let entries = lengths
        .iter()
        .map(|&length| {
            let entry = ArchiveEntry { offset, length };
            offset += length;
            entry
        })
        .collect();

    Ok(entries)
}
