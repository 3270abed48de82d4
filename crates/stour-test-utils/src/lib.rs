//! Fixture partitions and boundary tables for Stour development.
//!
//! Small, hand-wired topologies whose streaming behaviour can be
//! checked by inspection: a periodic single site, a wall-adjacent
//! pair, a single-site inlet, and a two-rank split.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use indexmap::IndexMap;
use smallvec::smallvec;
use stour_core::{BoundaryId, BoundaryValues, DensityWaveform, RankId, SiteDescriptor};
use stour_lattice::d3q15::NUM_VECTORS;
use stour_partition::{HaloLayout, Partition, WallLink, WallLinks};

/// Fifteen distribution values ascending from 0.1 by 0.1 — the
/// reference input used throughout the collision checks.
pub fn ascending_distributions() -> [f64; NUM_VECTORS] {
    core::array::from_fn(|i| (i + 1) as f64 / 10.0)
}

/// A boundary table of `count` constant waveforms at `density`.
pub fn constant_boundaries(count: usize, density: f64) -> BoundaryValues {
    BoundaryValues::new(100, vec![DensityWaveform::constant(density); count]).unwrap()
}

/// Slot table where every direction of every site streams back into
/// the same site and direction (each site periodic with itself).
pub fn self_streaming_slots(site_count: usize) -> Vec<u32> {
    (0..(site_count * NUM_VECTORS) as u32).collect()
}

/// One mid-fluid site, periodic with itself in every direction.
///
/// After a step, the site's own post-collision values come straight
/// back as its next old generation — the minimal closed system.
pub fn periodic_site() -> Partition {
    Partition::new(
        vec![SiteDescriptor::fluid()],
        vec![WallLinks::new()],
        self_streaming_slots(1),
        HaloLayout::empty(),
        0,
    )
    .unwrap()
}

/// One inlet site (boundary 0), periodic with itself.
pub fn inlet_site() -> Partition {
    Partition::new(
        vec![SiteDescriptor::inlet(BoundaryId(0))],
        vec![WallLinks::new()],
        self_streaming_slots(1),
        HaloLayout::empty(),
        1,
    )
    .unwrap()
}

/// Two sites on the x axis; site 0 sits next to a wall cutting its
/// −x direction at `cut`, site 1 is the interior neighbour.
///
/// Site 0's +x direction streams into site 1; the wall-cut direction
/// reflects into site 0's own +x slot; everything else self-wraps.
pub fn walled_pair(cut: f64) -> Partition {
    let mut slots = self_streaming_slots(2);
    slots[1] = (NUM_VECTORS + 1) as u32;
    slots[2] = 1;
    let wall: Vec<WallLinks> = vec![
        smallvec![WallLink { direction: 2, cut }],
        WallLinks::new(),
    ];
    Partition::new(
        vec![SiteDescriptor::edge_fluid(), SiteDescriptor::fluid()],
        wall,
        slots,
        HaloLayout::empty(),
        0,
    )
    .unwrap()
}

/// Two single-site partitions linked across a rank boundary.
///
/// Rank 0's site streams its +x value to rank 1; rank 1's site streams
/// its −x value to rank 0. Each incoming value lands in the matching
/// direction slot of the receiving site; all other directions
/// self-wrap. Returned in rank order `(rank 0, rank 1)`.
pub fn linked_pair() -> (Partition, Partition) {
    let halo_slot = NUM_VECTORS as u32;

    // Rank 0: +x (direction 1) crosses; −x value arrives from rank 1.
    let mut slots_a = self_streaming_slots(1);
    slots_a[1] = halo_slot;
    let mut send_a = IndexMap::new();
    send_a.insert(RankId(1), 0..1);
    let mut recv_a = IndexMap::new();
    recv_a.insert(RankId(1), vec![2u32]);
    let rank0 = Partition::new(
        vec![SiteDescriptor::fluid()],
        vec![WallLinks::new()],
        slots_a,
        HaloLayout::new(send_a, recv_a).unwrap(),
        0,
    )
    .unwrap();

    // Rank 1: −x (direction 2) crosses; +x value arrives from rank 0.
    let mut slots_b = self_streaming_slots(1);
    slots_b[2] = halo_slot;
    let mut send_b = IndexMap::new();
    send_b.insert(RankId(0), 0..1);
    let mut recv_b = IndexMap::new();
    recv_b.insert(RankId(0), vec![1u32]);
    let rank1 = Partition::new(
        vec![SiteDescriptor::fluid()],
        vec![WallLinks::new()],
        slots_b,
        HaloLayout::new(send_b, recv_b).unwrap(),
        0,
    )
    .unwrap();

    (rank0, rank1)
}
