//! Vision capability descriptors passed from `get_vision_capabilities` to `can_see`.

pub mod capabilities;

pub use capabilities::VisionCapabilities;
