//! Interactive viewport tools.
//!
//! The measure tool owns every pointer interaction in the viewport: distance
//! measurement with optional axis lock and the anchorable reference grid.
//!
//! ## Controls
//!
//! | Key       | Command                          |
//! |-----------|----------------------------------|
//! | `Space`   | Toggle measure mode              |
//! | `Escape`  | Cancel measurement, hide grid    |
//! | `G`       | Toggle the reference grid        |
//! | `A` `D` `←` `→` | Lock to the X axis         |
//! | `W` `↑`   | Lock to the Y axis               |
//! | `S` `↓` `Q` `E` | Lock to the Z axis         |
//! | `R`       | Free measurement                 |
//! | `1`-`4`   | Toggle a status category         |
//!
//! Left click and drag measures while the mode is on; right click anchors the
//! grid. The same commands arrive from the dashboard through the
//! `viewport_command` RPC method.

/// Axis-locked distance measurement and the reference grid controls.
pub mod measure;
