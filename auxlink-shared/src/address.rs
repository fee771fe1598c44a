//! Relative address (RAD) of a sideband message peer.

use std::fmt;

/// Maximum number of port hops a header can carry (LCT is 4 bits).
pub const MAX_RAD_PORTS: usize = 15;

/// Sequence of downstream port numbers from the source to a branch device.
///
/// Stored inline; an empty address is the directly attached device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelativeAddress {
    ports: [u8; MAX_RAD_PORTS],
    len: u8,
}

impl RelativeAddress {
    /// The directly attached device (no hops).
    pub const fn root() -> Self {
        Self {
            ports: [0; MAX_RAD_PORTS],
            len: 0,
        }
    }

    /// Append a hop. Returns `false` (and leaves the address unchanged) when
    /// the address is already full.
    pub fn push(&mut self, port: u8) -> bool {
        let len = self.len as usize;
        if len == MAX_RAD_PORTS {
            return false;
        }
        self.ports[len] = port & 0x0F;
        self.len += 1;
        true
    }

    /// Hops from the source, nearest first.
    #[inline]
    pub fn ports(&self) -> &[u8] {
        &self.ports[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for RelativeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("root");
        }
        for (i, port) in self.ports().iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", port)?;
        }
        Ok(())
    }
}
