//! Device filter: picks likely smart plugs out of a raw scan.

use crate::scan::ScanEntry;

/// Keep only the entries that look like Hue smart plugs, preserving order.
///
/// See [`ScanEntry::is_smart_plug`] for the matching rule.
pub fn filter_smart_plugs(entries: impl IntoIterator<Item = ScanEntry>) -> Vec<ScanEntry> {
    entries
        .into_iter()
        .filter(ScanEntry::is_smart_plug)
        .collect()
}
