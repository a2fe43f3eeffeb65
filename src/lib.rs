// War/CWL performance scoring and donation eligibility engine.
//
// The chat bot's command, permission, and rendering layers live elsewhere;
// this crate turns upstream game snapshots into comparable scores and
// donor lists. The split is strict: `fetch` is the only async/I/O-adjacent
// module, everything under `score` and `donation` is pure.

pub mod catalog;
pub mod config;
pub mod donation;
pub mod fetch;
pub mod metrics;
pub mod model;
pub mod score;
pub mod upstream;

pub use config::EngineConfig;
pub use fetch::Partial;
pub use upstream::{SnapshotSource, Unavailable};
