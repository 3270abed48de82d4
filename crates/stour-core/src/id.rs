//! Strongly-typed identifiers.

use std::fmt;

/// Local index of a lattice site within one rank's partition.
///
/// Sites are numbered contiguously from zero at partition build time.
/// A `SiteIndex` is only meaningful relative to the partition that
/// issued it; it says nothing about global spatial position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteIndex(pub u32);

impl SiteIndex {
    /// The site index as a `usize` for buffer addressing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SiteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SiteIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one parallel worker owning a contiguous partition of sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RankId(pub u32);

impl fmt::Display for RankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RankId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one inlet or outlet boundary.
///
/// Boundary ids index into the [`BoundaryValues`](crate::BoundaryValues)
/// table; every inlet/outlet site carries the id of the boundary whose
/// imposed values apply to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundaryId(pub u32);

impl BoundaryId {
    /// The boundary id as a `usize` for table addressing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BoundaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BoundaryId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing discrete timestep counter.
///
/// Incremented each time the engine completes one full
/// collide-exchange-swap cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl StepId {
    /// The step that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
