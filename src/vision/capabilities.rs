//! Aggregated vision capabilities of a set of observers.

use serde::{Deserialize, Serialize};

/// What an observer, or a combined set of observers, can perceive.
///
/// Produced by `get_vision_capabilities` and consumed by `can_see`.
/// [`VisionCapabilities::none`] is the "no vision advantage" descriptor.
///
/// ```
/// use conditional_visibility::vision::VisionCapabilities;
///
/// let elf = VisionCapabilities::none().with_darkness().with_perception(14);
/// let cleric = VisionCapabilities::none().with_invisible().with_perception(12);
///
/// let party = elf.merge(&cleric);
/// assert!(party.see_in_darkness && party.see_invisible);
/// assert_eq!(party.passive_perception, Some(14));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisionCapabilities {
    /// Pierces invisibility (truesight, see invisibility).
    pub see_invisible: bool,
    /// Pierces obscurement (blindsight, tremorsense).
    pub see_obscured: bool,
    /// Pierces darkness (darkvision, dim vision).
    pub see_in_darkness: bool,
    /// Best passive perception among observers, if the system uses one.
    pub passive_perception: Option<i64>,
}

impl VisionCapabilities {
    /// Capabilities with no vision advantage.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            see_invisible: false,
            see_obscured: false,
            see_in_darkness: false,
            passive_perception: None,
        }
    }

    #[must_use]
    pub fn with_invisible(mut self) -> Self {
        self.see_invisible = true;
        self
    }

    #[must_use]
    pub fn with_obscured(mut self) -> Self {
        self.see_obscured = true;
        self
    }

    #[must_use]
    pub fn with_darkness(mut self) -> Self {
        self.see_in_darkness = true;
        self
    }

    #[must_use]
    pub fn with_perception(mut self, value: i64) -> Self {
        self.passive_perception = Some(value);
        self
    }

    /// Combine two descriptors: any observer's sense counts, best perception wins.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            see_invisible: self.see_invisible || other.see_invisible,
            see_obscured: self.see_obscured || other.see_obscured,
            see_in_darkness: self.see_in_darkness || other.see_in_darkness,
            passive_perception: match (self.passive_perception, other.passive_perception) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
        }
    }

    /// Check if this is the no-advantage descriptor.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::none()
    }
}
