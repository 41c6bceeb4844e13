//! Identity-keyed entity pool
//!
//! One partition per pooled kind. Each partition keeps insertion order for
//! iteration (draw order stays stable across updates) and an id index for
//! O(1) lookup. Wheels never appear here; they are owned by their vehicle.

use crate::entity::{Entity, EntityKind};
use std::collections::HashMap;

/// One kind's worth of entities, iteration order = insertion order
#[derive(Default)]
pub struct Partition {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl Partition {
    /// Create-or-update by identity. `create` builds a brand-new entity;
    /// `update` overwrites the supplied fields on an existing one, leaving
    /// identity and owned state intact.
    pub fn upsert_with(
        &mut self,
        id: &str,
        create: impl FnOnce() -> Entity,
        update: impl FnOnce(&mut Entity),
    ) -> &mut Entity {
        if let Some(&slot) = self.index.get(id) {
            update(&mut self.entities[slot]);
            &mut self.entities[slot]
        } else {
            let entity = create();
            debug_assert_eq!(entity.id, id);
            self.index.insert(id.to_string(), self.entities.len());
            self.entities.push(entity);
            self.entities.last_mut().unwrap()
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        let slot = self.index.remove(id)?;
        let entity = self.entities.remove(slot);
        for moved in self.index.values_mut() {
            if *moved > slot {
                *moved -= 1;
            }
        }
        Some(entity)
    }

    pub fn find(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&slot| &self.entities[slot])
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.index.get(id).map(|&slot| &mut self.entities[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Drop every entity whose id fails the predicate
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        let stale: Vec<String> = self
            .entities
            .iter()
            .filter(|e| !keep(&e.id))
            .map(|e| e.id.clone())
            .collect();
        for id in stale {
            self.remove(&id);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }
}

/// Process-wide scene state: every live entity, partitioned by kind
#[derive(Default)]
pub struct ScenePool {
    pub vehicles: Partition,
    pub traffic_lights: Partition,
    pub roads: Partition,
    pub buildings: Partition,
    pub destinations: Partition,
}

impl ScenePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities of one kind in stable draw order. Wheels are not pooled,
    /// so their partition is always empty.
    pub fn list(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Vehicle => self.vehicles.as_slice(),
            EntityKind::TrafficLight => self.traffic_lights.as_slice(),
            EntityKind::Road => self.roads.as_slice(),
            EntityKind::Building => self.buildings.as_slice(),
            EntityKind::Destination => self.destinations.as_slice(),
            EntityKind::Wheel => &[],
        }
    }

    /// Look up one entity by kind and id
    pub fn find(&self, kind: EntityKind, id: &str) -> Option<&Entity> {
        match kind {
            EntityKind::Vehicle => self.vehicles.find(id),
            EntityKind::TrafficLight => self.traffic_lights.find(id),
            EntityKind::Road => self.roads.find(id),
            EntityKind::Building => self.buildings.find(id),
            EntityKind::Destination => self.destinations.find(id),
            EntityKind::Wheel => None,
        }
    }

    /// Remove one entity by kind and id
    pub fn remove(&mut self, kind: EntityKind, id: &str) -> Option<Entity> {
        match kind {
            EntityKind::Vehicle => self.vehicles.remove(id),
            EntityKind::TrafficLight => self.traffic_lights.remove(id),
            EntityKind::Road => self.roads.remove(id),
            EntityKind::Building => self.buildings.remove(id),
            EntityKind::Destination => self.destinations.remove(id),
            EntityKind::Wheel => None,
        }
    }

    pub fn entity_count(&self) -> usize {
        self.vehicles.len()
            + self.traffic_lights.len()
            + self.roads.len()
            + self.buildings.len()
            + self.destinations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::KindData;
    use crossway_core::Vec3;

    fn building(id: &str) -> Entity {
        Entity::new(id, KindData::Building)
    }

    #[test]
    fn upsert_creates_then_updates_in_place() {
        let mut partition = Partition::default();
        partition.upsert_with("a", || building("a"), |_| panic!("no existing entity"));
        assert_eq!(partition.len(), 1);

        partition.upsert_with(
            "a",
            || panic!("must not recreate"),
            |e| e.transform.position = Vec3::new(1.0, 0.0, 0.0),
        );
        assert_eq!(partition.len(), 1);
        assert_eq!(partition.find("a").unwrap().transform.position.x, 1.0);
    }

    #[test]
    fn iteration_order_is_insertion_order() {
        let mut partition = Partition::default();
        for id in ["c", "a", "b"] {
            partition.upsert_with(id, || building(id), |_| {});
        }
        // Updating must not reorder
        partition.upsert_with("a", || unreachable!(), |_| {});
        let order: Vec<&str> = partition.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, ["c", "a", "b"]);
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut partition = Partition::default();
        for id in ["a", "b", "c"] {
            partition.upsert_with(id, || building(id), |_| {});
        }
        assert!(partition.remove("b").is_some());
        assert!(partition.remove("b").is_none());
        assert_eq!(partition.find("c").unwrap().id, "c");
        let order: Vec<&str> = partition.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, ["a", "c"]);
    }

    #[test]
    fn retain_drops_failing_ids() {
        let mut partition = Partition::default();
        for id in ["a", "b", "c"] {
            partition.upsert_with(id, || building(id), |_| {});
        }
        partition.retain(|id| id != "a");
        assert!(!partition.contains("a"));
        assert_eq!(partition.len(), 2);
    }

    #[test]
    fn wheel_partition_is_always_empty() {
        let pool = ScenePool::new();
        assert!(pool.list(EntityKind::Wheel).is_empty());
        assert!(pool.find(EntityKind::Wheel, "anything").is_none());
    }

    #[test]
    fn pool_find_and_remove_dispatch_by_kind() {
        let mut pool = ScenePool::new();
        pool.buildings.upsert_with("b1", || building("b1"), |_| {});
        assert!(pool.find(EntityKind::Building, "b1").is_some());
        assert!(pool.find(EntityKind::Road, "b1").is_none());
        assert!(pool.remove(EntityKind::Building, "b1").is_some());
        assert_eq!(pool.entity_count(), 0);
    }
}
