//! Sight layer pass: which tokens a viewer can currently see.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::scene::Scene;
use crate::core::{Token, TokenId};
use crate::error::VisibilityError;
use crate::systems::ConditionalVisibilitySystem;
use crate::vision::VisionCapabilities;

/// Who is looking at the scene.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Viewer {
    /// The game master.
    Gm,
    /// A player looking through the tokens they control.
    Player { controlled: SmallVec<[TokenId; 4]> },
}

impl Viewer {
    /// A player controlling the given tokens.
    pub fn player(controlled: impl IntoIterator<Item = TokenId>) -> Self {
        Viewer::Player {
            controlled: controlled.into_iter().collect(),
        }
    }

    /// Tokens this viewer looks through.
    #[must_use]
    pub fn controlled(&self) -> &[TokenId] {
        match self {
            Viewer::Gm => &[],
            Viewer::Player { controlled } => controlled.as_slice(),
        }
    }
}

/// Computes visibility for one sight layer refresh.
///
/// All rule-system calls go through the fallback methods, so a failing
/// system hides tokens instead of breaking the refresh.
pub struct SightLayer<'a> {
    system: &'a dyn ConditionalVisibilitySystem,
    gm_sees_all: bool,
}

impl<'a> SightLayer<'a> {
    pub fn new(system: &'a dyn ConditionalVisibilitySystem, gm_sees_all: bool) -> Self {
        Self {
            system,
            gm_sees_all,
        }
    }

    fn observers<'s>(&self, scene: &'s Scene, viewer: &Viewer) -> Vec<&'s Token> {
        viewer
            .controlled()
            .iter()
            .filter_map(|&id| {
                let token = scene.get(id);
                if token.is_none() {
                    tracing::debug!("Viewer controls {} which is not in the scene", id);
                }
                token
            })
            .collect()
    }

    /// Combined capabilities of the viewer's observing tokens.
    #[must_use]
    pub fn observer_capabilities(&self, scene: &Scene, viewer: &Viewer) -> VisionCapabilities {
        let observers = self.observers(scene, viewer);
        self.system.vision_capabilities_or_none(&observers)
    }

    fn sees_everything(&self, viewer: &Viewer) -> bool {
        self.gm_sees_all && *viewer == Viewer::Gm
    }

    /// Ids of every token the viewer can see, in scene order.
    ///
    /// A player always sees the tokens they control.
    #[must_use]
    pub fn visible_tokens(&self, scene: &Scene, viewer: &Viewer) -> Vec<TokenId> {
        if self.sees_everything(viewer) {
            return scene.ids().collect();
        }

        let caps = self.observer_capabilities(scene, viewer);
        let controlled = viewer.controlled();
        scene
            .iter()
            .filter(|token| controlled.contains(&token.id) || self.system.is_visible(token, &caps))
            .map(|token| token.id)
            .collect()
    }

    /// Can the viewer see one specific token?
    pub fn is_token_visible(
        &self,
        scene: &Scene,
        viewer: &Viewer,
        target: TokenId,
    ) -> Result<bool, VisibilityError> {
        let token = scene.get(target).ok_or(VisibilityError::UnknownToken(target))?;
        if self.sees_everything(viewer) || viewer.controlled().contains(&target) {
            return Ok(true);
        }
        let caps = self.observer_capabilities(scene, viewer);
        Ok(self.system.is_visible(token, &caps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Senses, TokenUpdate};
    use crate::systems::conditions::IN_DARKNESS;
    use crate::systems::DefaultSystem;

    fn scene_with_lurker(system: &DefaultSystem) -> (Scene, TokenId, TokenId, TokenId) {
        let mut scene = Scene::new();
        let human = scene.spawn("Human").unwrap();
        let elf = scene.spawn("Elf").unwrap();
        if let Some(token) = scene.get_mut(elf) {
            token.senses = Senses::default().with_darkvision(60);
        }
        let lurker = scene.spawn("Lurker").unwrap();

        let icon = system.effects().icon_for(IN_DARKNESS).unwrap().to_string();
        let update = TokenUpdate::new().with_effects([icon]);
        let token = scene.get_mut(lurker).unwrap();
        token.apply(&update);
        system.recalculate_visible_status(token, &update).unwrap();

        (scene, human, elf, lurker)
    }

    #[test]
    fn test_player_sight() {
        let system = DefaultSystem::new();
        let (scene, human, elf, lurker) = scene_with_lurker(&system);
        let layer = SightLayer::new(&system, true);

        let visible = layer.visible_tokens(&scene, &Viewer::player([human]));
        assert_eq!(visible, vec![human, elf]);

        let visible = layer.visible_tokens(&scene, &Viewer::player([elf]));
        assert_eq!(visible, vec![human, elf, lurker]);
    }

    #[test]
    fn test_player_always_sees_own_tokens() {
        let system = DefaultSystem::new();
        let (scene, _, _, lurker) = scene_with_lurker(&system);
        let layer = SightLayer::new(&system, true);

        assert!(layer
            .is_token_visible(&scene, &Viewer::player([lurker]), lurker)
            .unwrap());
    }

    #[test]
    fn test_gm_sight() {
        let system = DefaultSystem::new();
        let (scene, human, elf, lurker) = scene_with_lurker(&system);

        let layer = SightLayer::new(&system, true);
        assert_eq!(layer.visible_tokens(&scene, &Viewer::Gm), vec![human, elf, lurker]);

        let restricted = SightLayer::new(&system, false);
        assert_eq!(restricted.visible_tokens(&scene, &Viewer::Gm), vec![human, elf]);
    }

    #[test]
    fn test_missing_controlled_token_is_skipped() {
        let system = DefaultSystem::new();
        let (scene, human, elf, _) = scene_with_lurker(&system);
        let layer = SightLayer::new(&system, true);

        let viewer = Viewer::player([TokenId::new(99)]);
        assert!(layer.observer_capabilities(&scene, &viewer).is_none());
        assert_eq!(layer.visible_tokens(&scene, &viewer), vec![human, elf]);
    }

    #[test]
    fn test_unknown_target() {
        let system = DefaultSystem::new();
        let scene = Scene::new();
        let layer = SightLayer::new(&system, true);

        let err = layer
            .is_token_visible(&scene, &Viewer::Gm, TokenId::new(3))
            .unwrap_err();
        assert_eq!(err, VisibilityError::UnknownToken(TokenId::new(3)));
    }
}
