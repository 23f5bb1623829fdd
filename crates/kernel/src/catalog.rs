use oasis_common::WorldId;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::world::World;
use crate::worlds;

/// The set of worlds that can be loaded.
#[derive(Debug, Default)]
pub struct WorldCatalog {
    worlds: BTreeMap<WorldId, Rc<World>>,
}

impl WorldCatalog {
    /// A catalog with no worlds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Social hub, arcade and race track.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        catalog.insert(worlds::social::world());
        catalog.insert(worlds::arcade::world());
        catalog.insert(worlds::race::world());
        catalog
    }

    /// Add or replace a world. Returns the one it replaced.
    pub fn insert(&mut self, world: World) -> Option<Rc<World>> {
        self.worlds.insert(world.id(), Rc::new(world))
    }

    pub fn get(&self, id: WorldId) -> Option<&World> {
        self.worlds.get(&id).map(Rc::as_ref)
    }

    /// Resolve a name and hand out the descriptor itself, detached from the
    /// catalog borrow.
    pub fn lookup(&self, name: &str) -> Option<Rc<World>> {
        self.resolve(name).and_then(|id| self.worlds.get(&id).cloned())
    }

    /// Resolve a user-facing name to a world in this catalog.
    pub fn resolve(&self, name: &str) -> Option<WorldId> {
        WorldId::parse(name).filter(|id| self.worlds.contains_key(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = WorldId> + '_ {
        self.worlds.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}
