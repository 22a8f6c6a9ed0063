//! Applying automatic fixes to source text.

use crate::types::Fix;
use tracing::warn;

/// Outcome of [`apply_fixes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Source text with the accepted fixes applied.
    pub output: String,
    /// Number of fixes applied.
    pub applied: usize,
    /// Fixes rejected for overlapping an earlier fix or an invalid range.
    pub skipped: Vec<Fix>,
}

/// Applies non-overlapping fixes to `source` in one pass.
///
/// Fixes are ordered by start offset; on overlap the earlier one wins and
/// the later one is skipped. Two fixes starting at the same offset overlap
/// when the first is an insertion there. Ranges outside `source` or off a
/// character boundary are skipped. Accepted fixes are spliced from the end
/// of the text backwards so earlier offsets stay valid.
#[must_use]
pub fn apply_fixes<'a, I>(source: &str, fixes: I) -> FixOutcome
where
    I: IntoIterator<Item = &'a Fix>,
{
    let mut candidates: Vec<&Fix> = fixes.into_iter().collect();
    candidates.sort_by_key(|f| (f.start, f.end));

    let mut accepted: Vec<&Fix> = Vec::new();
    let mut skipped = Vec::new();
    for fix in candidates {
        if !is_valid_range(source, fix) {
            warn!("Skipping fix with invalid range {}..{}", fix.start, fix.end);
            skipped.push(fix.clone());
            continue;
        }
        if let Some(previous) = accepted.last() {
            if overlaps(previous, fix) {
                warn!(
                    "Skipping fix {}..{} overlapping {}..{}",
                    fix.start, fix.end, previous.start, previous.end
                );
                skipped.push(fix.clone());
                continue;
            }
        }
        accepted.push(fix);
    }

    let mut output = source.to_string();
    for fix in accepted.iter().rev() {
        output.replace_range(fix.range(), &fix.replacement);
    }

    FixOutcome {
        output,
        applied: accepted.len(),
        skipped,
    }
}

fn is_valid_range(source: &str, fix: &Fix) -> bool {
    fix.start <= fix.end
        && fix.end <= source.len()
        && source.is_char_boundary(fix.start)
        && source.is_char_boundary(fix.end)
}

/// `next` starts at or after `previous` by sort order.
fn overlaps(previous: &Fix, next: &Fix) -> bool {
    next.start < previous.end || next.start == previous.start
}
