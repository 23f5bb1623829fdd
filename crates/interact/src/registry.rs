use oasis_common::{NodeId, WorldId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::command::Commands;

/// Side-effecting callback attached to an interactable.
pub type Callback = Box<dyn FnMut(&mut Commands)>;

/// Stable identifier of an interactable, e.g. `arcade/cabinet/pac-man`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractableId(pub String);

impl InteractableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InteractableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InteractableId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// An entity the pointer can act on.
///
/// `node` is the root of its bounding geometry in the scene: hits on that
/// node or any descendant resolve to this interactable. The scene node holds
/// no reference back; the registry keeps the node-to-id index.
pub struct Interactable {
    pub id: InteractableId,
    pub world: WorldId,
    pub node: NodeId,
    handler: Callback,
    on_hover_enter: Option<Callback>,
    on_hover_exit: Option<Callback>,
}

impl Interactable {
    pub fn new(
        id: impl Into<InteractableId>,
        world: WorldId,
        node: NodeId,
        handler: impl FnMut(&mut Commands) + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            world,
            node,
            handler: Box::new(handler),
            on_hover_enter: None,
            on_hover_exit: None,
        }
    }

    pub fn on_hover_enter(mut self, callback: impl FnMut(&mut Commands) + 'static) -> Self {
        self.on_hover_enter = Some(Box::new(callback));
        self
    }

    pub fn on_hover_exit(mut self, callback: impl FnMut(&mut Commands) + 'static) -> Self {
        self.on_hover_exit = Some(Box::new(callback));
        self
    }

    pub fn invoke(&mut self, commands: &mut Commands) {
        (self.handler)(commands);
    }

    pub fn hover_enter(&mut self, commands: &mut Commands) {
        if let Some(callback) = self.on_hover_enter.as_mut() {
            callback(commands);
        }
    }

    pub fn hover_exit(&mut self, commands: &mut Commands) {
        if let Some(callback) = self.on_hover_exit.as_mut() {
            callback(commands);
        }
    }
}

impl From<String> for InteractableId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Debug for Interactable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interactable")
            .field("id", &self.id)
            .field("world", &self.world)
            .field("node", &self.node)
            .field("hover", &(self.on_hover_enter.is_some() || self.on_hover_exit.is_some()))
            .finish()
    }
}

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("interactable '{0}' is already registered")]
    DuplicateId(InteractableId),
    #[error("scene node {node:?} already belongs to interactable '{owner}'")]
    NodeTaken { node: NodeId, owner: InteractableId },
}

/// The interactables of the active world.
///
/// BTreeMap keeps iteration deterministic. Only the world manager mutates
/// the registry; dispatch reads it and invokes handlers through it.
#[derive(Debug, Default)]
pub struct InteractableRegistry {
    by_id: BTreeMap<InteractableId, Interactable>,
    by_node: HashMap<NodeId, InteractableId>,
}

impl InteractableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entity: Interactable) -> Result<(), RegistryError> {
        if self.by_id.contains_key(&entity.id) {
            return Err(RegistryError::DuplicateId(entity.id));
        }
        if let Some(owner) = self.by_node.get(&entity.node) {
            return Err(RegistryError::NodeTaken {
                node: entity.node,
                owner: owner.clone(),
            });
        }
        tracing::trace!(id = %entity.id, world = %entity.world, "registered interactable");
        self.by_node.insert(entity.node, entity.id.clone());
        self.by_id.insert(entity.id.clone(), entity);
        Ok(())
    }

    pub fn unregister(&mut self, id: &InteractableId) -> Option<Interactable> {
        let entity = self.by_id.remove(id)?;
        self.by_node.remove(&entity.node);
        Some(entity)
    }

    /// Drop every interactable. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.by_id.len();
        self.by_id.clear();
        self.by_node.clear();
        removed
    }

    pub fn get(&self, id: &InteractableId) -> Option<&Interactable> {
        self.by_id.get(id)
    }

    pub fn get_mut(&mut self, id: &InteractableId) -> Option<&mut Interactable> {
        self.by_id.get_mut(id)
    }

    pub fn contains(&self, id: &InteractableId) -> bool {
        self.by_id.contains_key(id)
    }

    /// The interactable whose bounding root is exactly `node`.
    pub fn owner_of_node(&self, node: NodeId) -> Option<&InteractableId> {
        self.by_node.get(&node)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &InteractableId> {
        self.by_id.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interactable> {
        self.by_id.values()
    }

    /// Every world that owns at least one registered interactable.
    pub fn owners(&self) -> BTreeSet<WorldId> {
        self.by_id.values().map(|i| i.world).collect()
    }

    /// Run an interactable's handler. Returns false if it is not registered.
    pub fn invoke(&mut self, id: &InteractableId, commands: &mut Commands) -> bool {
        match self.by_id.get_mut(id) {
            Some(entity) => {
                entity.invoke(commands);
                true
            }
            None => false,
        }
    }
}
