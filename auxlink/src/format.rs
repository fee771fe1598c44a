//! Fixed-capacity text scratch for trace lines.
//!
//! Both buffers live inline in the logging channel and are overwritten on
//! every transaction. Output that does not fit is truncated, never spilled.

use std::fmt;

const TRUNCATION_MARK: &[u8] = b"...";

/// Lowercase hex rendering of a byte slice, `"xx "` per byte.
pub struct HexDump<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Default for HexDump<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HexDump<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; N],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Replace the contents with a dump of `bytes`.
    ///
    /// Stops on a whole-entry boundary when the capacity runs out and ends
    /// with `...` if there is room for it.
    pub fn render(&mut self, bytes: &[u8]) -> &str {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";
        self.len = 0;

        for (i, byte) in bytes.iter().enumerate() {
            if self.len + 3 > N {
                self.mark_truncated();
                break;
            }
            // Keep room for the mark unless this is the last byte
            if i + 1 < bytes.len() && self.len + 3 + TRUNCATION_MARK.len() > N {
                self.mark_truncated();
                break;
            }
            self.buf[self.len] = DIGITS[(byte >> 4) as usize];
            self.buf[self.len + 1] = DIGITS[(byte & 0x0F) as usize];
            self.buf[self.len + 2] = b' ';
            self.len += 3;
        }

        self.as_str()
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII is ever written
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    fn mark_truncated(&mut self) {
        let room = N - self.len;
        let take = room.min(TRUNCATION_MARK.len());
        self.buf[self.len..self.len + take].copy_from_slice(&TRUNCATION_MARK[..take]);
        self.len += take;
    }
}

impl<const N: usize> fmt::Display for HexDump<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single trace line assembled with `write!`.
///
/// Writes past the capacity are dropped at a character boundary and still
/// report success, so a long line is cut rather than failing the format.
pub struct TraceLine<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Default for TraceLine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TraceLine<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; N],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> fmt::Write for TraceLine<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = N - self.len;
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_hex_render() {
        let mut hex = HexDump::<64>::new();
        assert_eq!(hex.render(&[0x00, 0xAB, 0x7f]), "00 ab 7f ");
        assert_eq!(hex.render(&[]), "");
        assert!(hex.is_empty());
    }

    #[test]
    fn test_hex_truncates_with_mark() {
        let mut hex = HexDump::<12>::new();
        // 4 bytes need 12; 5 bytes do not fit, so keep room for "..."
        assert_eq!(hex.render(&[1, 2, 3, 4]), "01 02 03 04 ");
        assert_eq!(hex.render(&[1, 2, 3, 4, 5]), "01 02 03 ...");
        assert!(hex.len() <= hex.capacity());
    }

    #[test]
    fn test_hex_tiny_capacity() {
        let mut hex = HexDump::<2>::new();
        assert_eq!(hex.render(&[0xFF]), "..");

        let mut hex = HexDump::<0>::new();
        assert_eq!(hex.render(&[1, 2, 3]), "");
    }

    #[test]
    fn test_trace_line_truncates() {
        let mut line = TraceLine::<8>::new();
        write!(line, "DP-AUX> {}", 42).unwrap();
        assert_eq!(line.as_str(), "DP-AUX> ");
        assert_eq!(line.len(), 8);

        line.clear();
        write!(line, "ok").unwrap();
        assert_eq!(line.as_str(), "ok");
    }

    #[test]
    fn test_trace_line_respects_char_boundary() {
        let mut line = TraceLine::<4>::new();
        write!(line, "ab→").unwrap();
        assert_eq!(line.as_str(), "ab");
    }
}
