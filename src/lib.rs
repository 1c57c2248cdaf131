//! First-half scoring-signal engine for upcoming football fixtures.
//!
//! Raw per-team fixture-history and per-fixture statistics payloads go in,
//! ranked match scores come out. Fetching, credentials and rendering belong
//! to callers; everything here is pure, synchronous data transformation.

pub mod batch;
pub mod features;
pub mod payload;
pub mod rankings;
pub mod scoring;
