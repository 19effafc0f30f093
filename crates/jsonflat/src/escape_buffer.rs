//! Accumulator for four-digit `\uXXXX` escape sequences.
//!
//! Hex digits are assembled big-endian into a 16-bit code unit. Code units in
//! the surrogate ranges cannot stand alone in Rust strings, so a high
//! surrogate is parked until the immediately following escape supplies the
//! low half, and the pair is combined into one scalar value. Anything else
//! adjacent to a lone surrogate half is an error.

use crate::error::TokenizeReason;

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    pending_high: Option<u16>,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh escape sequence; any parked high surrogate stays.
    pub(crate) fn begin(&mut self) {
        self.acc = 0;
    }

    /// Shifts one hex digit (0..=15) into the accumulator.
    pub(crate) fn push(&mut self, digit: u16) {
        self.acc = self.acc << 4 | digit;
    }

    /// Finishes an escape after its fourth digit.
    ///
    /// Returns `Ok(None)` when the code unit is a high surrogate that now
    /// waits for its other half, `Ok(Some(c))` for a completed scalar value,
    /// and an error for a lone or mismatched surrogate half.
    pub(crate) fn complete(&mut self) -> Result<Option<char>, TokenizeReason> {
        let unit = self.acc;
        match self.pending_high.take() {
            Some(high) => {
                if !(0xDC00..=0xDFFF).contains(&unit) {
                    return Err(TokenizeReason::UnpairedSurrogate);
                }
                let code =
                    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                char::from_u32(code)
                    .map(Some)
                    .ok_or(TokenizeReason::UnpairedSurrogate)
            }
            None => match unit {
                0xD800..=0xDBFF => {
                    self.pending_high = Some(unit);
                    Ok(None)
                }
                0xDC00..=0xDFFF => Err(TokenizeReason::UnpairedSurrogate),
                _ => char::from_u32(u32::from(unit))
                    .map(Some)
                    .ok_or(TokenizeReason::UnpairedSurrogate),
            },
        }
    }

    /// `true` while a high surrogate waits for its low half.
    pub(crate) fn has_pending(&self) -> bool {
        self.pending_high.is_some()
    }

    pub(crate) fn reset(&mut self) {
        self.acc = 0;
        self.pending_high = None;
    }
}
