//! Titan state-vector engine.
//!
//! Layering, bottom-up: `types` (amplitude vector, checked unitaries) → `gates` (2×2 builders)
//! → `circuit` (gate/noise specs) → `ops` / `noise` / `measurement` / `metrics` → `optimizer`
//! → `session` (one live register with its RNG and name table).

pub mod types;
pub mod gates;
pub mod circuit;
pub mod ops;
pub mod noise;
pub mod measurement;
pub mod metrics;
pub mod optimizer;
pub mod snapshot;
pub mod session;
