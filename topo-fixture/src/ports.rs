//! TCP port reservation.
//!
//! The fixture needs two blocks of three ports: one for the ensemble
//! (peer, election and client ports) and one for the zkocc caching layer.
//! Reservation is delegated to a [`PortAllocator`] so tests can substitute a
//! fixed layout.

use crate::error::FixtureError;

/// A contiguous, non-empty block of reserved TCP ports.
///
/// Every port of a block fits in `u16`; [`PortBlock::try_new`] is the only
/// constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortBlock {
    base: u16,
    count: u16,
}

impl PortBlock {
    /// Create a block of `count` ports starting at `base`.
    ///
    /// Fails with [`FixtureError::InvalidPortBlock`] if `count` is zero or
    /// the last port would pass 65535.
    pub fn try_new(base: u16, count: u16) -> Result<Self, FixtureError> {
        if count == 0 || base.checked_add(count - 1).is_none() {
            return Err(FixtureError::InvalidPortBlock { base, count });
        }
        Ok(Self { base, count })
    }

    /// First port of the block.
    pub fn base(&self) -> u16 {
        self.base
    }

    /// Number of ports in the block.
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Last port of the block.
    pub fn last(&self) -> u16 {
        self.base + (self.count - 1)
    }

    /// Iterate the ports in the block.
    pub fn ports(&self) -> impl Iterator<Item = u16> {
        let base = self.base;
        (0..self.count).map(move |i| base + i)
    }

    /// The `index`th port of the block, if it is in range.
    pub fn port(&self, index: u16) -> Option<u16> {
        (index < self.count).then(|| self.base + index)
    }

    /// Returns true if the two blocks share any port.
    pub fn overlaps(&self, other: &PortBlock) -> bool {
        self.base <= other.last() && other.base <= self.last()
    }
}

/// Source of port blocks.
pub trait PortAllocator: Send + Sync {
    /// Reserve `count` consecutive ports.
    ///
    /// Blocks returned by one allocator never overlap.
    fn reserve(&mut self, count: u16) -> Result<PortBlock, FixtureError>;
}

/// Hands out consecutive blocks starting from a fixed port.
///
/// Ports are never returned to the pool; they are released implicitly when
/// the process exits.
#[derive(Debug, Clone)]
pub struct SequentialPorts {
    next: u32,
    limit: u16,
}

impl SequentialPorts {
    /// Create an allocator handing out ports in `start..=limit`.
    pub fn new(start: u16, limit: u16) -> Self {
        Self {
            next: u32::from(start),
            limit,
        }
    }

    /// The next port that would be handed out.
    pub fn next_port(&self) -> u32 {
        self.next
    }
}

impl PortAllocator for SequentialPorts {
    fn reserve(&mut self, count: u16) -> Result<PortBlock, FixtureError> {
        let end = self.next + u32::from(count);
        if count == 0 || end > u32::from(self.limit) + 1 {
            return Err(FixtureError::PortsExhausted {
                requested: count,
                next: self.next,
                limit: self.limit,
            });
        }

        // end <= limit + 1, so next fits in u16
        let block = PortBlock::try_new(self.next as u16, count)?;
        self.next = end;
        tracing::debug!("Reserved ports {}..={}", block.base(), block.last());
        Ok(block)
    }
}
