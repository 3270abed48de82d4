//! The streamed-index table: where each post-collision value lands.

use stour_core::SiteIndex;
use stour_lattice::d3q15::NUM_VECTORS;

/// Where a `(site, direction)` pair streams to.
///
/// Decoded from the flat slot table; the hot loop never builds these —
/// it writes through [`StreamMap::slot`] directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamTarget {
    /// The value lands in a local site's distribution slot.
    ///
    /// A wall-cut direction resolves to the *same* site's inverse
    /// direction (reflection); an ordinary fluid direction resolves to
    /// the neighbouring site's same-direction slot.
    Local {
        /// Destination site.
        site: SiteIndex,
        /// Destination direction slot within that site.
        direction: usize,
    },
    /// The value crosses to another rank via the send halo.
    Halo {
        /// Position within the send-halo tail of the new buffer.
        slot: usize,
    },
}

/// Flat `(site, direction) → new-buffer slot` table.
///
/// The slot address space is `[local sites × 15 | send-halo]`: slots
/// below `site_count × 15` are local distribution positions, the tail
/// holds one slot per value that must cross to a neighbouring rank.
#[derive(Clone, Debug)]
pub struct StreamMap {
    slots: Vec<u32>,
    site_count: usize,
    halo_len: usize,
}

impl StreamMap {
    /// Wrap an already-validated slot table.
    ///
    /// Callers go through `Partition::new`, which performs the
    /// build-time range checks before constructing the map.
    pub(crate) fn new(slots: Vec<u32>, site_count: usize, halo_len: usize) -> Self {
        debug_assert_eq!(slots.len(), site_count * NUM_VECTORS);
        Self {
            slots,
            site_count,
            halo_len,
        }
    }

    /// Raw destination slot for `(site, direction)`.
    #[inline]
    pub fn slot(&self, site: SiteIndex, direction: usize) -> usize {
        self.slots[site.index() * NUM_VECTORS + direction] as usize
    }

    /// Number of local distribution slots (`site_count × 15`).
    #[inline]
    pub fn local_slots(&self) -> usize {
        self.site_count * NUM_VECTORS
    }

    /// Total addressable slots, send halo included.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.local_slots() + self.halo_len
    }

    /// Decode the destination of `(site, direction)`.
    pub fn target(&self, site: SiteIndex, direction: usize) -> StreamTarget {
        let slot = self.slot(site, direction);
        let local = self.local_slots();
        if slot < local {
            StreamTarget::Local {
                site: SiteIndex((slot / NUM_VECTORS) as u32),
                direction: slot % NUM_VECTORS,
            }
        } else {
            StreamTarget::Halo { slot: slot - local }
        }
    }
}
