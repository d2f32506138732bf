//! # Observability
//!
//! Structured logging for the whole client via the `tracing` crate.
//! Operations on the managers are instrumented with spans and structured
//! fields (order ids, statuses, line counts), so a session's activity reads
//! as a hierarchy rather than interleaved prints.
//!
//! ```bash
//! RUST_LOG=info cargo run      # compact flow
//! RUST_LOG=debug cargo run     # full payloads and sync details
//! ```

/// Initializes the global tracing subscriber. Call once at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
