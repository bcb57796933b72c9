use tracing::trace;

use crate::patterns::{Kind, Patterns};

/// Masks literal blocks, keeping the line count of the source intact.
///
/// Blocks nest: a begin delimiter inside a block opens another level and
/// the block only ends when every level is closed. An end delimiter outside
/// any block is left as is and does not count against later blocks: the
/// balance is clamped at zero instead of going negative, so a stray `]]>`
/// can never leave the content of a following block unmasked. An
/// unterminated block masks the rest of the source.
pub fn mask(patterns: &Patterns, source: &str) -> String {
    let (begin, end) = patterns.literal_delimiters();
    let mut masked = String::with_capacity(source.len());
    let mut balance = 0usize;
    let mut blocks = 0usize;

    for span in patterns.split(Kind::LiteralBoundary, source) {
        let piece = &source[span];
        if piece == begin {
            if balance == 0 {
                blocks += 1;
            }
            balance += 1;
        }
        if balance > 0 {
            masked.extend(piece.matches('\n'));
        } else {
            masked.push_str(piece);
        }
        if piece == end {
            balance = balance.saturating_sub(1);
        }
    }

    trace!(blocks, unterminated = (balance > 0), "masked literal blocks");
    masked
}
