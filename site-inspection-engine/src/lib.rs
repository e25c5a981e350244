//! Interactive inspection viewport for BIM construction-progress analyses.
//!
//! Elements of an analysis result are drawn as status-coloured boxes with
//! their scanned points. The viewport offers axis-locked distance measurement,
//! a snapping vertical reference grid and per-status visibility filtering,
//! and talks to the hosting dashboard over JSON-RPC.

pub mod engine;
pub mod rpc;
pub mod tools;
