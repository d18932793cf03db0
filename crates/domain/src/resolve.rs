//! Resolution of a user-supplied identifier to exactly one discovered device.

use crate::error::{AmbiguousMatchError, NotFoundError, PlugError};
use crate::scan::ScanEntry;

/// Find the single candidate whose address matches `identifier`.
///
/// Addresses are compared ignoring ASCII case.
///
/// # Errors
///
/// Returns [`PlugError::NotFound`] when nothing matches and
/// [`PlugError::AmbiguousMatch`] when more than one candidate matches.
/// Addresses are expected to be unique within one scan, so the latter
/// signals a broken invariant rather than a choice to make.
pub fn resolve(
    identifier: &str,
    candidates: impl IntoIterator<Item = ScanEntry>,
) -> Result<ScanEntry, PlugError> {
    let mut matches = candidates
        .into_iter()
        .filter(|candidate| candidate.has_address(identifier));

    let Some(found) = matches.next() else {
        return Err(NotFoundError {
            identifier: identifier.to_string(),
        }
        .into());
    };

    let extra = matches.count();
    if extra > 0 {
        return Err(AmbiguousMatchError {
            identifier: identifier.to_string(),
            count: extra + 1,
        }
        .into());
    }

    Ok(found)
}
