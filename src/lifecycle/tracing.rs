//! # Observability & Tracing
//!
//! Structured logging for the whole subsystem via the `tracing` crate.
//!
//! Every operation logs with structured fields (`order_id`, `rider_id`,
//! `collection`) rather than formatted strings, so production log pipelines
//! can filter on them. Service entry points carry `#[instrument]` spans; the
//! store task logs each applied operation at `info` and each lookup at
//! `debug`.
//!
//! ## Usage
//!
//! ```bash
//! # Compact operational logs
//! RUST_LOG=info cargo run
//!
//! # Full payloads and store lookups
//! RUST_LOG=debug cargo run
//!
//! # Only the store's own events
//! RUST_LOG=delivery_tracking::store=debug cargo run
//! ```

/// Initializes the global tracing subscriber. Call once at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Field context carries the module; keep lines short
        .compact()
        .init();
}
