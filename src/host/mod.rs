//! Host-side collaborators that drive a visibility system.
//!
//! - `Scene`: tokens on the current map
//! - `SightLayer` / `Viewer`: per-refresh visibility for a GM or player
//! - `VisibilitySession`: resolves the system once and routes events to it

pub mod scene;
pub mod session;
pub mod sight;

pub use scene::Scene;
pub use session::VisibilitySession;
pub use sight::{SightLayer, Viewer};
