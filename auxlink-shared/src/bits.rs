//! MSB-first bit reader over a byte slice.

/// Reads big-endian bit fields from a byte slice.
///
/// Reads past the end of the slice yield the caller's default and still
/// advance the cursor, so a truncated header decodes to a best-effort value.
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    offset: usize,
    overrun: bool,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            overrun: false,
        }
    }

    /// Current position in bits from the start of the slice.
    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    /// True once any read has run past the end of the slice.
    #[inline]
    pub(crate) fn overrun(&self) -> bool {
        self.overrun
    }

    /// Read `bits` (at most 8) as an unsigned value, or `default` if the
    /// field does not fit in the remaining data.
    pub(crate) fn read_or_default(&mut self, bits: usize, default: u8) -> u8 {
        debug_assert!(bits <= 8);
        let end = self.offset + bits;
        if end > self.data.len() * 8 {
            self.offset = end;
            self.overrun = true;
            return default;
        }

        let mut value = 0u8;
        for bit in self.offset..end {
            let byte = self.data[bit / 8];
            value = (value << 1) | ((byte >> (7 - (bit % 8))) & 1);
        }
        self.offset = end;
        value
    }

    /// Advance to the next multiple of `bits`.
    pub(crate) fn align(&mut self, bits: usize) {
        let rem = self.offset % bits;
        if rem != 0 {
            self.offset += bits - rem;
        }
    }
}
