//! Timestep orchestration for the Stour solver.
//!
//! [`StepDriver`] runs the per-step cycle over one rank's partition:
//! collide every site, correct wall-facing directions, exchange the
//! boundary-crossing values with neighbouring ranks, scatter what
//! arrived, and swap the distribution buffers. The old/new buffer
//! separation is the load-bearing discipline — generation N+1 depends
//! only on the fully-formed generation N, never on partially written
//! values.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod distributions;
pub mod driver;
pub mod fields;
pub mod metrics;

pub use config::{ConfigError, EngineConfig};
pub use distributions::DistributionBuffers;
pub use driver::StepDriver;
pub use fields::SiteFields;
pub use metrics::StepMetrics;
