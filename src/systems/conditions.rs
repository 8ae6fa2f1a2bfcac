//! Condition names and helpers shared by the bundled systems.

use crate::core::{AttributeValue, FlagNamespace, Token};
use crate::effects::{EffectCatalog, StatusEffect};
use crate::error::VisibilityError;
use crate::vision::VisionCapabilities;

pub const INVISIBLE: &str = "invisible";
pub const OBSCURED: &str = "obscured";
pub const IN_DARKNESS: &str = "indarkness";
pub const HIDDEN: &str = "hidden";

/// Flag holding the stealth result a hidden token rolled.
pub const STEALTH: &str = "stealth";

/// Set alongside `stealth` when the value came from a HUD roll or entry.
pub const STEALTH_ROLLED: &str = "stealthrolled";

const ICON_ROOT: &str = "modules/conditional-visibility/icons";

/// The invisible, obscured, and in-darkness effects every bundled system uses.
pub(crate) fn sense_effects() -> Vec<StatusEffect> {
    vec![
        StatusEffect::new(INVISIBLE, "Invisible", format!("{ICON_ROOT}/unknown.svg")),
        StatusEffect::new(OBSCURED, "Obscured", format!("{ICON_ROOT}/foggy.svg")),
        StatusEffect::new(IN_DARKNESS, "In Darkness", format!("{ICON_ROOT}/moon.svg")),
    ]
}

pub(crate) fn hidden_effect() -> StatusEffect {
    StatusEffect::new(HIDDEN, "Hidden", format!("{ICON_ROOT}/newspaper.svg"))
}

/// Read a boolean condition from a namespace; anything but `true` is unset.
pub(crate) fn flag(flags: &FlagNamespace, condition: &str) -> bool {
    flags
        .get(condition)
        .and_then(AttributeValue::as_bool)
        .unwrap_or(false)
}

/// Read an integer flag, rejecting values of another type.
pub(crate) fn int_flag(
    flags: &FlagNamespace,
    namespace: &str,
    key: &str,
) -> Result<Option<i64>, VisibilityError> {
    match flags.get(key) {
        None => Ok(None),
        Some(AttributeValue::Int(v)) => Ok(Some(*v)),
        Some(other) => Err(VisibilityError::InvalidFlag {
            namespace: namespace.to_string(),
            key: key.to_string(),
            found: format!("{:?}", other),
        }),
    }
}

/// Capabilities granted by a token's senses and vision alone.
pub(crate) fn sense_capabilities(token: &Token) -> VisionCapabilities {
    let senses = &token.senses;
    VisionCapabilities {
        see_invisible: senses.truesight > 0 || senses.see_invisible,
        see_obscured: senses.blindsight > 0 || senses.tremorsense > 0,
        see_in_darkness: senses.darkvision > 0 || senses.truesight > 0 || token.sight.dim > 0,
        passive_perception: None,
    }
}

/// Build a staged namespace holding exactly the catalog conditions named by
/// `icons`. Flags that are not catalog conditions are carried over.
pub(crate) fn stage_conditions(
    catalog: &EffectCatalog,
    previous: Option<&FlagNamespace>,
    icons: &[String],
) -> FlagNamespace {
    let mut staged = previous.cloned().unwrap_or_default();
    for effect in catalog.iter() {
        staged.remove(effect.id.as_str());
    }
    for icon in icons {
        match catalog.condition_id(icon) {
            Some(id) => {
                staged.insert(id.to_string(), AttributeValue::Bool(true));
            }
            None => tracing::trace!("Ignoring effect icon '{}'", icon),
        }
    }
    staged
}

/// Does a sense-based condition on the target block these observers?
pub(crate) fn blocked_by_senses(flags: &FlagNamespace, caps: &VisionCapabilities) -> bool {
    (flag(flags, INVISIBLE) && !caps.see_invisible)
        || (flag(flags, OBSCURED) && !caps.see_obscured)
        || (flag(flags, IN_DARKNESS) && !caps.see_in_darkness)
}
