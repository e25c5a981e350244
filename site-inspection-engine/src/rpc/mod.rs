//! JSON-RPC 2.0 bridge between the viewport and the hosting dashboard.
//!
//! The viewport runs inside an iframe. The dashboard posts requests into it
//! with `postMessage`; responses and notifications travel back to the parent
//! window the same way. A request without an ID still takes effect, it only
//! skips the response.
//!
//! ## Message Flow
//!
//! ```text
//! Dashboard (parent)                        Viewport (iframe)
//!        │                                        │
//!        ├─ {"method": "viewport_command", id} ──>│ RpcEffect::Viewport
//!        │<──────────────────── {"result", id} ───┤
//!        │                                        │
//!        │<── {"method": "measure_updated"} ──────┤ on every end point change
//! ```
//!
//! Handlers read a snapshot (`RpcContext`) and return state changes as
//! `RpcEffect`s; the system applies the effects after all responses are built,
//! so the query methods answer from one consistent frame.
//!
//! ## Methods
//!
//! | Method                   | Params                     | Effect                          |
//! |--------------------------|----------------------------|---------------------------------|
//! | `viewport_command`       | `{ command }`              | `toggle_mode`, `cancel`, `toggle_grid`, `lock_x`, `lock_y`, `lock_z`, `free` |
//! | `toggle_category`        | `{ status }`               | Hide or show a status category  |
//! | `toggle_item_visibility` | `{ guid }`                 | Per-element override            |
//! | `load_analysis`          | `{ path }` or `{ document }` | Replace the analysis result    |
//! | `get_status_summary`     |                            | Statistics, per-type summary, visibility counts |
//! | `get_overlay`            |                            | Measurement overlay snapshot    |
//! | `get_render_list`        |                            | Visible boxes and point counts  |
//! | `get_fps`                |                            | Smoothed frame rate             |
//!
//! ## Notifications
//!
//! `analysis_loaded`, `visibility_changed`, `measure_updated`, `overlay_changed`,
//! `fps_update` and `debug_message` (unparseable input).
//!
//! ## Error Codes
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params, including unknown command, status or element
//! - `-32603`: Internal error

/// JSON-RPC message types, the wasm message listener and request handlers.
pub mod web_rpc;
