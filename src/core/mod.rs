// src/core/mod.rs

// Root of the scan engine. Everything under `core` is network-facing probe
// logic plus the pure evaluation/scoring layer; presentation and transport
// concerns live outside.

/// Data structures shared across the engine: probe results, issues, reports,
/// grades.
pub mod models;

/// Static issue catalog: key -> template lookup with a total fallback.
pub mod catalog;

/// The six independent network probes.
pub mod probe;

/// Runs the probes, evaluates their results against the catalog, and
/// assembles scored reports.
pub mod orchestrator;

/// Narrative summary boundary and the deterministic template fallback.
pub mod summary;

/// Report persistence boundary with file-backed and in-memory stores.
pub mod store;
