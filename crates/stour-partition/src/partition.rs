//! The [`Partition`] type: one rank's sites, walls, and streaming topology.

use smallvec::SmallVec;
use stour_core::{PartitionError, SiteDescriptor, SiteIndex};
use stour_lattice::d3q15::NUM_VECTORS;

use crate::halo::HaloLayout;
use crate::stream::{StreamMap, StreamTarget};

/// Largest wall-distance fraction ever recorded on a wall link.
///
/// Fractions above one half are clamped at build time: a particle is
/// never treated as nearer to the solid node than to the fluid node it
/// started from.
pub const MAX_RECORDED_CUT: f64 = 0.5;

/// One wall-cut direction at a site.
///
/// Present only for directions actually cut by a wall within one
/// lattice step; the absence of a link means the direction is open.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallLink {
    /// The lattice direction the wall cuts.
    pub direction: usize,
    /// Distance fraction to the wall along that direction, in
    /// `(0, `[`MAX_RECORDED_CUT`]`]` after the build-time clamp.
    pub cut: f64,
}

/// Per-site wall links. Inline capacity covers the common case of a
/// site cut by a planar wall.
pub type WallLinks = SmallVec<[WallLink; 4]>;

/// One rank's immutable share of the lattice.
///
/// Built once at startup from the decomposition; only distribution
/// values flowing through it change afterwards. All structural checks
/// happen here, exactly once — the per-step loops index without
/// re-validation.
#[derive(Clone, Debug)]
pub struct Partition {
    descriptors: Vec<SiteDescriptor>,
    wall: Vec<WallLinks>,
    stream: StreamMap,
    halo: HaloLayout,
}

impl Partition {
    /// Assemble and validate a partition.
    ///
    /// `stream_slots` holds `site_count × 15` destination slots in the
    /// `[local | send-halo]` address space. `boundary_count` is the size
    /// of the boundary-value table the site descriptors refer into.
    ///
    /// Returns the first defect found; a partition that constructs is
    /// trusted for the lifetime of the run.
    pub fn new(
        descriptors: Vec<SiteDescriptor>,
        wall: Vec<WallLinks>,
        stream_slots: Vec<u32>,
        halo: HaloLayout,
        boundary_count: usize,
    ) -> Result<Self, PartitionError> {
        let site_count = descriptors.len();
        let local_slots = site_count * NUM_VECTORS;
        let slot_count = local_slots + halo.send_len();

        if stream_slots.len() != local_slots {
            return Err(PartitionError::StreamTableLengthMismatch {
                entries: stream_slots.len(),
                expected: local_slots,
            });
        }
        if wall.len() != site_count {
            return Err(PartitionError::WallTableLengthMismatch {
                rows: wall.len(),
                site_count,
            });
        }

        for (flat, &slot) in stream_slots.iter().enumerate() {
            if slot as usize >= slot_count {
                return Err(PartitionError::StreamSlotOutOfRange {
                    site: SiteIndex((flat / NUM_VECTORS) as u32),
                    direction: flat % NUM_VECTORS,
                    slot: slot as usize,
                    slot_count,
                });
            }
        }

        let mut wall = wall;
        for (s, links) in wall.iter_mut().enumerate() {
            let site = SiteIndex(s as u32);
            for link in links.iter_mut() {
                if link.direction == 0 || link.direction >= NUM_VECTORS {
                    return Err(PartitionError::InvalidWallDirection {
                        site,
                        direction: link.direction,
                    });
                }
                if !(link.cut > 0.0 && link.cut <= 1.0) {
                    return Err(PartitionError::CutDistanceOutOfRange {
                        site,
                        direction: link.direction,
                        cut: link.cut,
                    });
                }
                link.cut = link.cut.min(MAX_RECORDED_CUT);
            }
        }

        for (s, desc) in descriptors.iter().enumerate() {
            let site = SiteIndex(s as u32);
            match desc.boundary {
                None if desc.kind.requires_boundary() => {
                    return Err(PartitionError::MissingBoundaryId { site });
                }
                Some(id) if id.index() >= boundary_count => {
                    return Err(PartitionError::BoundaryIdOutOfRange {
                        site,
                        boundary: id.0,
                        boundary_count,
                    });
                }
                _ => {}
            }
        }

        halo.validate_scatter(local_slots)?;

        Ok(Self {
            descriptors,
            wall,
            stream: StreamMap::new(stream_slots, site_count, halo.send_len()),
            halo,
        })
    }

    /// Number of sites this rank owns.
    pub fn site_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Iterate over all owned site indices.
    pub fn sites(&self) -> impl Iterator<Item = SiteIndex> {
        (0..self.descriptors.len() as u32).map(SiteIndex)
    }

    /// Static attributes of a site.
    #[inline]
    pub fn descriptor(&self, site: SiteIndex) -> SiteDescriptor {
        self.descriptors[site.index()]
    }

    /// The wall links of a site; empty for sites away from walls.
    #[inline]
    pub fn wall_links(&self, site: SiteIndex) -> &[WallLink] {
        &self.wall[site.index()]
    }

    /// Whether a wall cuts the given direction at this site.
    #[inline]
    pub fn has_wall(&self, site: SiteIndex, direction: usize) -> bool {
        self.wall[site.index()]
            .iter()
            .any(|link| link.direction == direction)
    }

    /// The streamed-index table.
    #[inline]
    pub fn stream(&self) -> &StreamMap {
        &self.stream
    }

    /// Decode where `(site, direction)` streams to.
    pub fn stream_target(&self, site: SiteIndex, direction: usize) -> StreamTarget {
        self.stream.target(site, direction)
    }

    /// The halo layout for cross-rank exchange.
    pub fn halo(&self) -> &HaloLayout {
        &self.halo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use smallvec::smallvec;
    use stour_core::{BoundaryId, RankId};

    /// A self-streaming (periodic-with-itself) slot table.
    fn identity_slots(site_count: usize) -> Vec<u32> {
        (0..(site_count * NUM_VECTORS) as u32).collect()
    }

    fn no_walls(site_count: usize) -> Vec<WallLinks> {
        vec![WallLinks::new(); site_count]
    }

    #[test]
    fn minimal_fluid_partition_builds() {
        let p = Partition::new(
            vec![SiteDescriptor::fluid()],
            no_walls(1),
            identity_slots(1),
            HaloLayout::empty(),
            0,
        )
        .unwrap();
        assert_eq!(p.site_count(), 1);
        assert!(p.wall_links(SiteIndex(0)).is_empty());
        assert_eq!(
            p.stream_target(SiteIndex(0), 5),
            StreamTarget::Local {
                site: SiteIndex(0),
                direction: 5
            }
        );
    }

    #[test]
    fn out_of_range_stream_slot_is_fatal() {
        let mut slots = identity_slots(1);
        slots[3] = 99;
        let err = Partition::new(
            vec![SiteDescriptor::fluid()],
            no_walls(1),
            slots,
            HaloLayout::empty(),
            0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PartitionError::StreamSlotOutOfRange {
                direction: 3,
                slot: 99,
                ..
            }
        ));
    }

    #[test]
    fn cut_distance_must_lie_in_unit_interval() {
        for bad in [0.0, -0.25, 1.5, f64::NAN] {
            let wall: Vec<WallLinks> = vec![smallvec![WallLink {
                direction: 1,
                cut: bad,
            }]];
            let err = Partition::new(
                vec![SiteDescriptor::edge_fluid()],
                wall,
                identity_slots(1),
                HaloLayout::empty(),
                0,
            )
            .unwrap_err();
            assert!(
                matches!(err, PartitionError::CutDistanceOutOfRange { .. }),
                "cut {bad} accepted"
            );
        }
    }

    #[test]
    fn cut_distances_above_half_are_clamped() {
        let wall: Vec<WallLinks> = vec![smallvec![
            WallLink {
                direction: 1,
                cut: 0.9,
            },
            WallLink {
                direction: 3,
                cut: 0.3,
            },
        ]];
        let p = Partition::new(
            vec![SiteDescriptor::edge_fluid()],
            wall,
            identity_slots(1),
            HaloLayout::empty(),
            0,
        )
        .unwrap();
        let links = p.wall_links(SiteIndex(0));
        assert_eq!(links[0].cut, MAX_RECORDED_CUT);
        assert_eq!(links[1].cut, 0.3);
    }

    #[test]
    fn rest_direction_cannot_carry_a_wall() {
        let wall: Vec<WallLinks> = vec![smallvec![WallLink {
            direction: 0,
            cut: 0.4,
        }]];
        let err = Partition::new(
            vec![SiteDescriptor::edge_fluid()],
            wall,
            identity_slots(1),
            HaloLayout::empty(),
            0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PartitionError::InvalidWallDirection { direction: 0, .. }
        ));
    }

    #[test]
    fn inlet_without_boundary_id_is_fatal() {
        let mut desc = SiteDescriptor::inlet(BoundaryId(0));
        desc.boundary = None;
        let err = Partition::new(
            vec![desc],
            no_walls(1),
            identity_slots(1),
            HaloLayout::empty(),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, PartitionError::MissingBoundaryId { .. }));
    }

    #[test]
    fn dangling_boundary_id_is_fatal() {
        let err = Partition::new(
            vec![SiteDescriptor::outlet(BoundaryId(2))],
            no_walls(1),
            identity_slots(1),
            HaloLayout::empty(),
            2,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PartitionError::BoundaryIdOutOfRange { boundary: 2, .. }
        ));
    }

    proptest::proptest! {
        #[test]
        fn any_valid_cut_builds_and_is_clamped(cut in 0.0001f64..=1.0) {
            let wall: Vec<WallLinks> = vec![smallvec![WallLink {
                direction: 5,
                cut,
            }]];
            let p = Partition::new(
                vec![SiteDescriptor::edge_fluid()],
                wall,
                identity_slots(1),
                HaloLayout::empty(),
                0,
            )
            .unwrap();
            let recorded = p.wall_links(SiteIndex(0))[0].cut;
            proptest::prop_assert!(recorded > 0.0 && recorded <= MAX_RECORDED_CUT);
            proptest::prop_assert!((recorded - cut.min(MAX_RECORDED_CUT)).abs() < 1e-15);
        }
    }

    #[test]
    fn halo_scatter_must_target_local_slots() {
        let mut send = IndexMap::new();
        send.insert(RankId(1), 0..1);
        let mut recv = IndexMap::new();
        recv.insert(RankId(1), vec![NUM_VECTORS as u32]); // site 1 doesn't exist
        let halo = HaloLayout::new(send, recv).unwrap();
        let mut slots = identity_slots(1);
        slots[1] = NUM_VECTORS as u32; // dir 1 crosses to the halo
        let err = Partition::new(
            vec![SiteDescriptor::fluid()],
            no_walls(1),
            slots,
            halo,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, PartitionError::ScatterIndexOutOfRange { .. }));
    }
}
