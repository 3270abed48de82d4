//! Stour: a distributed lattice-Boltzmann collision-streaming engine.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Stour sub-crates. For most users, adding `stour` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use stour::prelude::*;
//!
//! // A one-site partition, periodic with itself in every direction.
//! let slots: Vec<u32> = (0..15).collect();
//! let partition = Partition::new(
//!     vec![SiteDescriptor::fluid()],
//!     vec![WallLinks::new()],
//!     slots,
//!     HaloLayout::empty(),
//!     0,
//! )
//! .unwrap();
//!
//! let config = EngineConfig {
//!     partition,
//!     boundaries: BoundaryValues::new(100, vec![]).unwrap(),
//!     tau: 1.0,
//!     initial_density: 1.0,
//!     inlet_treatment: BoundaryTreatment::FixedDensityLocalVelocity,
//!     outlet_treatment: BoundaryTreatment::FixedDensityZeroVelocity,
//!     exchange: Box::new(NullExchange),
//! };
//! let mut driver = StepDriver::new(config).unwrap();
//! driver.step().unwrap();
//!
//! let fields = driver.site_fields(SiteIndex(0));
//! assert!((fields.density - 1.0).abs() < 1e-12);
//! assert_eq!(driver.current_step(), StepId(1));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `stour-core` | IDs, site classification, boundary tables, errors |
//! | [`lattice`] | `stour-lattice` | D3Q15 velocity set and [`lattice::HydroState`] |
//! | [`partition`] | `stour-partition` | Site tables, streamed indices, halo layout |
//! | [`collide`] | `stour-collide` | Kernel, collision operators, wall closure |
//! | [`exchange`] | `stour-exchange` | Cross-rank exchange implementations |
//! | [`engine`] | `stour-engine` | The per-rank timestep driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and errors (`stour-core`).
pub use stour_core as types;

/// Velocity set and hydrodynamic state (`stour-lattice`).
///
/// The [`lattice::d3q15`] module holds the discrete velocity vectors,
/// weights, and equilibrium formula everything else builds on.
pub use stour_lattice as lattice;

/// Partition topology (`stour-partition`).
///
/// [`partition::Partition`] validates the decomposition's site
/// classification, wall links, streamed-index table, and halo layout
/// once at build time.
pub use stour_partition as partition;

/// Collision operators and wall treatment (`stour-collide`).
pub use stour_collide as collide;

/// Cross-rank exchange (`stour-exchange`).
///
/// [`exchange::ChannelExchange`] wires ranks running as threads;
/// [`exchange::NullExchange`] serves single-rank runs.
pub use stour_exchange as exchange;

/// Timestep orchestration (`stour-engine`).
///
/// [`engine::StepDriver`] is the main entry point for running a rank.
pub use stour_engine as engine;

/// Common imports for typical Stour usage.
///
/// ```rust
/// use stour::prelude::*;
/// ```
pub mod prelude {
    // Core types and errors
    pub use stour_core::{
        BoundaryId, BoundaryValues, DensityWaveform, ExchangeError, PartitionError, RankId,
        SiteDescriptor, SiteIndex, SiteKind, StepError, StepId,
    };

    // Lattice state
    pub use stour_lattice::HydroState;

    // Partition topology
    pub use stour_partition::{HaloLayout, Partition, StreamTarget, WallLink, WallLinks};

    // Collision
    pub use stour_collide::{
        BoundaryTreatment, CollisionOperator, LbgkKernel, RelaxationParameters,
        WallStreamingResolver,
    };

    // Exchange
    pub use stour_exchange::{ChannelExchange, NullExchange, PartitionExchange, RankLink};

    // Engine
    pub use stour_engine::{
        ConfigError, EngineConfig, SiteFields, StepDriver, StepMetrics,
    };
}
