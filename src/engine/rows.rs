//! Interval Row Packer
//!
//! Partitions a node's children into display rows so that no two nodes in a
//! row overlap on the axis. Rows are assigned greedily, first fit, in the
//! children's given order:
//!
//! ```text
//! parent  [0 ............................................ 1000)
//! row 0   [0 .. 100)        [200 ....................... 900)
//! row 1        [50 .. 150)
//! ```
//!
//! A row accepts a child only when the child lies entirely before every node
//! already in the row or entirely after every one of them. Rows are never
//! rebalanced once created, so the result can use more rows than an optimal
//! packing would.

use super::span::{HasSpan, Span};

/// Children narrower than this many axis units are left out of the layout.
pub const MIN_PACKABLE_WIDTH: i64 = 50;

/// One entry in a laid-out row: blank space, or a node.
#[derive(Debug, PartialEq)]
pub enum RowEntry<'a, T> {
    /// Blank gap of the given width in axis units (always positive).
    Spacer(i64),
    /// A packed node.
    Node(&'a T),
}

/// Check whether a child takes part in row packing.
///
/// Children narrower than [`MIN_PACKABLE_WIDTH`] or sticking out of the
/// parent's span are dropped. Malformed spans (`start > end`) have negative
/// width and are dropped by the same rule.
#[inline]
pub fn is_packable(child: Span, parent: Span) -> bool {
    child.width() >= MIN_PACKABLE_WIDTH && parent.contains(&child)
}

/// Pack children into ordered, non-overlapping rows.
///
/// Each row is kept sorted by `start`. Running this twice over the same
/// input always yields the same assignment.
pub fn pack_rows<'a, T, I>(children: I, parent: Span) -> Vec<Vec<&'a T>>
where
    T: HasSpan + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut rows: Vec<Vec<&'a T>> = Vec::new();

    for child in children {
        let span = child.span();
        if !is_packable(span, parent) {
            continue;
        }

        let fit = rows.iter_mut().find(|row| {
            row.iter().all(|node| node.span().end <= span.start)
                || row.iter().all(|node| node.span().start >= span.end)
        });

        match fit {
            Some(row) => {
                row.push(child);
                row.sort_by_key(|node| node.span().start);
            }
            None => rows.push(vec![child]),
        }
    }

    rows
}

/// Lay out one packed row: interleave nodes with the blank gaps before them.
///
/// The gap before the first node is measured from the parent's start, every
/// later gap from the previous node's end. Gaps of zero or less are omitted.
pub fn row_entries<'a, T: HasSpan>(row: &[&'a T], parent: Span) -> Vec<RowEntry<'a, T>> {
    let mut entries = Vec::with_capacity(row.len() * 2);
    let mut cursor = parent.start;

    for &node in row {
        let span = node.span();
        let gap = span.start - cursor;
        if gap > 0 {
            entries.push(RowEntry::Spacer(gap));
        }
        entries.push(RowEntry::Node(node));
        cursor = span.end;
    }

    entries
}

// =============================================================================
// Tests
// =============================================================================
