//! Lenient UTF-8 to code point decoding.
//!
//! This is not a validator: malformed input never stops decoding. Each
//! invalid byte, stray continuation byte, or abandoned multi-byte sequence is
//! replaced by one U+FFFD and decoding resumes at the next byte.

use std::iter::Copied;
use std::slice;

/// U+FFFD, substituted for malformed input.
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

/// Lazy decoder over a byte iterator, yielding code points.
#[derive(Debug, Clone)]
pub struct Utf8Decoder<I> {
    bytes: I,
    code_point: u32,
    expected_continuation_bytes: u8,
    /// Second output produced by one input byte (ASCII after a truncated sequence)
    pending: Option<u32>,
}

/// Decode a byte slice claimed to be UTF-8.
pub fn decode_utf8(bytes: &[u8]) -> Utf8Decoder<Copied<slice::Iter<'_, u8>>> {
    Utf8Decoder::new(bytes.iter().copied())
}

impl<I: Iterator<Item = u8>> Utf8Decoder<I> {
    pub fn new(bytes: I) -> Self {
        Self {
            bytes,
            code_point: 0,
            expected_continuation_bytes: 0,
            pending: None,
        }
    }

    fn in_sequence(&self) -> bool {
        self.expected_continuation_bytes != 0
    }

    /// Feed one byte; returns the code point it completes, if any.
    fn step(&mut self, byte: u8) -> Option<u32> {
        // never valid anywhere in UTF-8
        if byte == 0xC0 || byte == 0xC1 || byte >= 0xF5 {
            self.expected_continuation_bytes = 0;
            return Some(REPLACEMENT_CHARACTER);
        }

        // 0b0xxxxxxx: ASCII
        if byte & 0x80 == 0 {
            if self.in_sequence() {
                self.expected_continuation_bytes = 0;
                self.pending = Some(u32::from(byte));
                return Some(REPLACEMENT_CHARACTER);
            }
            return Some(u32::from(byte));
        }

        // 0b11xxxxxx: lead byte
        if byte & 0xC0 == 0xC0 {
            let abandoned = self.in_sequence();
            let (payload, expected) = if byte & 0xE0 == 0xC0 {
                (byte & 0x1F, 1)
            } else if byte & 0xF0 == 0xE0 {
                (byte & 0x0F, 2)
            } else {
                // 0xF0..=0xF4; 0xF5.. was rejected above
                (byte & 0x07, 3)
            };
            self.code_point = u32::from(payload);
            self.expected_continuation_bytes = expected;
            return abandoned.then_some(REPLACEMENT_CHARACTER);
        }

        // 0b10xxxxxx: continuation byte
        if !self.in_sequence() {
            return Some(REPLACEMENT_CHARACTER);
        }
        self.code_point = (self.code_point << 6) | u32::from(byte & 0x3F);
        self.expected_continuation_bytes -= 1;
        (!self.in_sequence()).then_some(self.code_point)
    }
}

impl<I: Iterator<Item = u8>> Iterator for Utf8Decoder<I> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if let Some(code_point) = self.pending.take() {
            return Some(code_point);
        }
        while let Some(byte) = self.bytes.next() {
            if let Some(code_point) = self.step(byte) {
                return Some(code_point);
            }
        }
        // input exhausted mid-sequence
        if self.in_sequence() {
            self.expected_continuation_bytes = 0;
            return Some(REPLACEMENT_CHARACTER);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.bytes.size_hint();
        let extra = usize::from(self.pending.is_some()) + usize::from(self.in_sequence());
        (0, upper.and_then(|n| n.checked_add(extra)))
    }
}
