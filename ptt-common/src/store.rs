//! Entity Store
//!
//! One [`Collection`] per entity kind. Collections keep entities in insertion
//! order and index them by original and generated id. The indexes are never
//! serialized; they are rebuilt whenever a collection is loaded or mutated
//! structurally.

use crate::model::{Classroom, Entity, EntityKind, GeneratedId, OriginalId, Professor, Student, Subject};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered entities of one kind with O(1) lookup by either identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<T>", into = "Vec<T>")]
#[serde(bound(
    serialize = "T: Entity + Serialize + Clone",
    deserialize = "T: Entity + Deserialize<'de>"
))]
pub struct Collection<T> {
    items: Vec<T>,
    by_original: HashMap<OriginalId, usize>,
    by_generated: HashMap<GeneratedId, usize>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            by_original: HashMap::new(),
            by_generated: HashMap::new(),
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity, assigning it the next generated id
    ///
    /// Fails if the original id is already present or if the kind's
    /// identifier space is full.
    pub fn add(&mut self, mut entity: T) -> Result<GeneratedId> {
        if self.items.len() >= T::KIND.limit() {
            return Err(Error::CapacityExceeded {
                kind: T::KIND,
                limit: T::KIND.limit(),
            });
        }
        if self.by_original.contains_key(entity.original_id()) {
            return Err(Error::DuplicateIdentifier {
                kind: T::KIND,
                id: entity.original_id().to_string(),
            });
        }

        let index = self.items.len();
        let generated_id = index as GeneratedId;
        entity.set_generated_id(generated_id);

        self.by_original.insert(entity.original_id().clone(), index);
        self.by_generated.insert(generated_id, index);
        self.items.push(entity);

        Ok(generated_id)
    }

    pub fn get_by_original_id(&self, id: &OriginalId) -> Result<&T> {
        self.by_original
            .get(id)
            .map(|&index| &self.items[index])
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// Mutable lookup. Callers must not change the entity's identifiers.
    pub fn get_mut_by_original_id(&mut self, id: &OriginalId) -> Result<&mut T> {
        match self.by_original.get(id) {
            Some(&index) => Ok(&mut self.items[index]),
            None => Err(Error::not_found(T::KIND, id)),
        }
    }

    pub fn get_by_generated_id(&self, id: GeneratedId) -> Result<&T> {
        self.by_generated
            .get(&id)
            .map(|&index| &self.items[index])
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    pub fn contains(&self, id: &OriginalId) -> bool {
        self.by_original.contains_key(id)
    }

    /// Resolve an original id to the referenced entity's generated id
    pub fn resolve(&self, id: &OriginalId) -> Result<GeneratedId> {
        self.get_by_original_id(id).map(Entity::generated_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Mutable iteration for relationship-list pruning. Identifiers must stay as they are.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Keep only entities matching `keep`, returning how many were removed
    pub fn retain<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(keep);
        self.reindex();
        before - self.items.len()
    }

    /// Reassign generated ids as `0..len` in collection order
    pub fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.set_generated_id(index as GeneratedId);
        }
        self.reindex();
    }

    fn reindex(&mut self) {
        self.by_original.clear();
        self.by_generated.clear();
        for (index, item) in self.items.iter().enumerate() {
            self.by_original.insert(item.original_id().clone(), index);
            self.by_generated.insert(item.generated_id(), index);
        }
    }
}

impl<T: Entity> TryFrom<Vec<T>> for Collection<T> {
    type Error = Error;

    fn try_from(items: Vec<T>) -> Result<Self> {
        let mut collection = Collection {
            items: Vec::with_capacity(items.len()),
            by_original: HashMap::with_capacity(items.len()),
            by_generated: HashMap::with_capacity(items.len()),
        };
        for (index, item) in items.into_iter().enumerate() {
            if collection
                .by_original
                .insert(item.original_id().clone(), index)
                .is_some()
            {
                return Err(Error::DuplicateIdentifier {
                    kind: T::KIND,
                    id: item.original_id().to_string(),
                });
            }
            if collection
                .by_generated
                .insert(item.generated_id(), index)
                .is_some()
            {
                return Err(Error::DuplicateIdentifier {
                    kind: T::KIND,
                    id: item.generated_id().to_string(),
                });
            }
            collection.items.push(item);
        }
        Ok(collection)
    }
}

impl<T> From<Collection<T>> for Vec<T> {
    fn from(collection: Collection<T>) -> Self {
        collection.items
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Complete in-memory model: one collection per entity kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    pub classrooms: Collection<Classroom>,
    pub professors: Collection<Professor>,
    pub students: Collection<Student>,
    pub subjects: Collection<Subject>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Classroom => self.classrooms.len(),
            EntityKind::Professor => self.professors.len(),
            EntityKind::Student => self.students.len(),
            EntityKind::Subject => self.subjects.len(),
        }
    }

    /// Reverse lookup of a generated id to the entity's descriptive label
    pub fn describe(&self, kind: EntityKind, id: GeneratedId) -> Result<&str> {
        match kind {
            EntityKind::Classroom => self.classrooms.get_by_generated_id(id).map(Entity::descriptive),
            EntityKind::Professor => self.professors.get_by_generated_id(id).map(Entity::descriptive),
            EntityKind::Student => self.students.get_by_generated_id(id).map(Entity::descriptive),
            EntityKind::Subject => self.subjects.get_by_generated_id(id).map(Entity::descriptive),
        }
    }

    /// Original ids of one kind in collection order
    pub fn original_ids(&self, kind: EntityKind) -> Vec<&OriginalId> {
        match kind {
            EntityKind::Classroom => self.classrooms.iter().map(Entity::original_id).collect(),
            EntityKind::Professor => self.professors.iter().map(Entity::original_id).collect(),
            EntityKind::Student => self.students.iter().map(Entity::original_id).collect(),
            EntityKind::Subject => self.subjects.iter().map(Entity::original_id).collect(),
        }
    }

    /// Generated ids of one kind in collection order
    pub fn generated_ids(&self, kind: EntityKind) -> Vec<GeneratedId> {
        match kind {
            EntityKind::Classroom => self.classrooms.iter().map(Entity::generated_id).collect(),
            EntityKind::Professor => self.professors.iter().map(Entity::generated_id).collect(),
            EntityKind::Student => self.students.iter().map(Entity::generated_id).collect(),
            EntityKind::Subject => self.subjects.iter().map(Entity::generated_id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classroom(id: &str, capacity: u32) -> Classroom {
        Classroom {
            original_id: id.into(),
            generated_id: 0,
            descriptive: format!("P{}", id),
            lecture_capacity: capacity,
            tutorial_capacity: capacity,
        }
    }

    #[test]
    fn test_add_assigns_dense_ids() {
        let mut rooms = Collection::new();
        for i in 0..5 {
            let id = rooms.add(classroom(&format!("{}", 100 + i), 30)).unwrap();
            assert_eq!(id, i);
        }
        let ids: Vec<_> = rooms.iter().map(|c| c.generated_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_add_rejects_duplicate_original_id() {
        let mut rooms = Collection::new();
        rooms.add(classroom("7", 30)).unwrap();
        let err = rooms.add(classroom("7", 60)).unwrap_err();
        assert!(matches!(err, Error::DuplicateIdentifier { kind: EntityKind::Classroom, .. }));
        assert_eq!(rooms.len(), 1);
    }

    #[test]
    fn test_classroom_capacity_boundary() {
        let mut rooms = Collection::new();
        for i in 0..255 {
            rooms.add(classroom(&i.to_string(), 20)).unwrap();
        }
        assert_eq!(rooms.len(), 255);

        let err = rooms.add(classroom("255", 20)).unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityExceeded { kind: EntityKind::Classroom, limit: 255 }
        ));
    }

    #[test]
    fn test_lookup_miss_is_not_found() {
        let rooms: Collection<Classroom> = Collection::new();
        assert!(matches!(
            rooms.get_by_original_id(&"1".into()),
            Err(Error::NotFound { kind: EntityKind::Classroom, .. })
        ));
        assert!(matches!(
            rooms.get_by_generated_id(0),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_retain_and_renumber_keep_indexes_consistent() {
        let mut rooms = Collection::new();
        for id in ["a", "b", "c", "d"] {
            rooms.add(classroom(id, 10)).unwrap();
        }

        let removed = rooms.retain(|c| c.original_id.as_str() != "b");
        assert_eq!(removed, 1);
        assert!(!rooms.contains(&"b".into()));
        assert_eq!(rooms.get_by_generated_id(2).unwrap().original_id.as_str(), "c");
        assert!(rooms.get_by_generated_id(1).is_err());

        rooms.renumber();
        assert_eq!(rooms.resolve(&"c".into()).unwrap(), 1);
        assert_eq!(rooms.resolve(&"d".into()).unwrap(), 2);
        assert_eq!(rooms.get_by_generated_id(1).unwrap().original_id.as_str(), "c");
    }

    #[test]
    fn test_describe_by_kind() {
        let mut store = EntityStore::new();
        store.classrooms.add(classroom("97", 180)).unwrap();
        assert_eq!(store.describe(EntityKind::Classroom, 0).unwrap(), "P97");
        assert!(store.describe(EntityKind::Subject, 0).is_err());
    }
}
