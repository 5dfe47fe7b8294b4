use crate::models::{BandwidthRecord, BandwidthSample};
use std::collections::HashMap;

/// Join the incoming and outgoing series of a bandwidth report into one
/// record per day.
///
/// The incoming series is the primary key set: every incoming sample yields
/// one record, in the same order. Each outgoing sample is written into the
/// first record with the same date; a later outgoing sample for the same
/// date overwrites an earlier one.
///
/// Dates that only appear in the outgoing series are dropped: the result
/// never holds a record without an incoming value.
pub fn join_bandwidth(
    incoming: &[BandwidthSample],
    outgoing: &[BandwidthSample],
) -> Vec<BandwidthRecord> {
    let mut records: Vec<BandwidthRecord> = incoming
        .iter()
        .map(|sample| BandwidthRecord {
            date: sample.date.clone(),
            incoming: sample.bytes.clone(),
            outgoing: None,
        })
        .collect();

    // First record per date
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(incoming.len());
    for (position, sample) in incoming.iter().enumerate() {
        index.entry(sample.date.as_str()).or_insert(position);
    }

    for sample in outgoing {
        if let Some(&position) = index.get(sample.date.as_str()) {
            records[position].outgoing = Some(sample.bytes.clone());
        }
    }

    records
}
