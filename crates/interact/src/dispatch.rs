use oasis_common::{NodeId, Ray};
use oasis_scene::SceneGraph;

use crate::command::Commands;
use crate::registry::{InteractableId, InteractableRegistry};

/// Resolves pointer rays to interactables.
///
/// Resolution only considers geometry that belongs to a registered
/// interactable: hits are taken nearest first and each hit node is walked up
/// its parent chain to the closest registered ancestor. The first hit that
/// resolves wins; everything behind it is ignored.
#[derive(Debug, Default)]
pub struct PickDispatcher {
    modal_open: bool,
    hovered: Option<InteractableId>,
}

impl PickDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// While a modal (menu, customizer) is open, dispatch and hover do
    /// nothing.
    pub fn set_modal(&mut self, open: bool) {
        self.modal_open = open;
    }

    pub fn toggle_modal(&mut self) -> bool {
        self.modal_open = !self.modal_open;
        self.modal_open
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn hovered(&self) -> Option<&InteractableId> {
        self.hovered.as_ref()
    }

    /// Find the interactable a ray selects without invoking anything.
    pub fn resolve(
        &self,
        ray: &Ray,
        scene: &dyn SceneGraph,
        registry: &InteractableRegistry,
    ) -> Option<InteractableId> {
        let mut hits = scene.intersect(ray);
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.iter()
            .find_map(|hit| registered_ancestor(hit.node, scene, registry))
    }

    /// Invoke the handler of the interactable the ray selects, exactly once.
    pub fn dispatch(
        &mut self,
        ray: &Ray,
        scene: &dyn SceneGraph,
        registry: &mut InteractableRegistry,
        commands: &mut Commands,
    ) -> Option<InteractableId> {
        if self.modal_open {
            tracing::debug!("dispatch suppressed: modal open");
            return None;
        }
        let Some(id) = self.resolve(ray, scene, registry) else {
            tracing::debug!("dispatch: no hit");
            return None;
        };
        tracing::debug!(%id, "dispatch");
        registry.invoke(&id, commands);
        Some(id)
    }

    /// Track the hovered interactable, firing exit on the old one and enter
    /// on the new one when it changes.
    pub fn hover(
        &mut self,
        ray: &Ray,
        scene: &dyn SceneGraph,
        registry: &mut InteractableRegistry,
        commands: &mut Commands,
    ) -> Option<InteractableId> {
        if self.modal_open {
            return self.hovered.clone();
        }
        let current = self.resolve(ray, scene, registry);
        if current != self.hovered {
            if let Some(previous) = self.hovered.take() {
                if let Some(entity) = registry.get_mut(&previous) {
                    entity.hover_exit(commands);
                }
            }
            if let Some(next) = &current {
                if let Some(entity) = registry.get_mut(next) {
                    entity.hover_enter(commands);
                }
            }
            self.hovered = current.clone();
        }
        current
    }

    /// Forget the hovered interactable without firing callbacks. Called when
    /// the registry is cleared.
    pub fn reset_hover(&mut self) {
        self.hovered = None;
    }
}

fn registered_ancestor(
    node: NodeId,
    scene: &dyn SceneGraph,
    registry: &InteractableRegistry,
) -> Option<InteractableId> {
    let mut current = Some(node);
    while let Some(n) = current {
        if let Some(id) = registry.owner_of_node(n) {
            return Some(id.clone());
        }
        current = scene.parent(n);
    }
    None
}
