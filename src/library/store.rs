use super::types::{ConsistencyReport, LibrarySnapshot, Shard, ShardType};
use super::Identifier;
use crate::error::LibraryError;
use std::collections::{BTreeMap, BTreeSet};

/// The authoritative shard catalog.
///
/// Holds three maps: the entry table, the type registry and the grouping
/// index from each source to the shards attributed to it. Every mutation
/// keeps the grouping index pointing only at live entries.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    entries: BTreeMap<Identifier, Shard>,
    types: BTreeMap<Identifier, ShardType>,
    groups: BTreeMap<Identifier, BTreeSet<Identifier>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted types and shards, rebuilding groups
    /// from each shard's source.
    pub fn from_parts(
        types: impl IntoIterator<Item = (Identifier, ShardType)>,
        shards: impl IntoIterator<Item = (Identifier, Shard)>,
    ) -> Self {
        let mut store = Self {
            types: types.into_iter().collect(),
            ..Self::default()
        };
        for (id, shard) in shards {
            store.insert(id, shard);
        }
        store
    }

    /// Restore a store exactly as `snapshot` describes it, grouping index
    /// included.
    pub fn from_snapshot(snapshot: LibrarySnapshot) -> Self {
        Self {
            entries: snapshot.shards,
            types: snapshot.shard_types,
            groups: snapshot.groups,
        }
    }

    /// Register (or replace) a shard type
    pub fn register_type(&mut self, id: Identifier, shard_type: ShardType) -> Option<ShardType> {
        self.types.insert(id, shard_type)
    }

    /// Insert a shard and link it into its source group.
    ///
    /// A shard already stored under `id` is replaced and unlinked from its
    /// own group first.
    pub fn insert(&mut self, id: Identifier, shard: Shard) -> Option<Shard> {
        let source = shard.source.clone();
        let displaced = self.entries.insert(id.clone(), shard);
        if let Some(old) = &displaced {
            self.unlink(&old.source, &id);
        }
        self.groups.entry(source).or_default().insert(id);
        displaced
    }

    /// Remove a shard. Absent identifiers are a no-op.
    pub fn remove(&mut self, id: &Identifier) -> Option<Shard> {
        let shard = self.entries.remove(id)?;
        self.unlink(&shard.source, id);
        Some(shard)
    }

    /// Remove every shard and group, returning how many shards there were.
    /// Types are a separate registry and stay.
    pub fn remove_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.groups.clear();
        count
    }

    /// Move the shard at `old_id` to `new_id` and retype it as `new_type`.
    ///
    /// The shard is unlinked from its source group under `old_id` but is
    /// NOT linked back under `new_id`: after a rekey the source group no
    /// longer points at the shard. Callers relying on group queries see the
    /// migrated shard as ungrouped until the library is reloaded.
    pub fn rekey(
        &mut self,
        old_id: &Identifier,
        new_type: &Identifier,
        new_id: Identifier,
    ) -> Result<&Shard, LibraryError> {
        if !self.types.contains_key(new_type) {
            return Err(LibraryError::UnknownShardType(new_type.clone()));
        }
        let mut shard = self
            .entries
            .remove(old_id)
            .ok_or_else(|| LibraryError::UnknownShard(old_id.clone()))?;

        self.unlink(&shard.source, old_id);
        shard.shard_type = new_type.clone();

        if let Some(displaced) = self.entries.remove(&new_id) {
            self.unlink(&displaced.source, &new_id);
        }

        Ok(&*self.entries.entry(new_id).or_insert(shard))
    }

    /// Derive the identifier a shard gets when migrated to `shard_type` on
    /// behalf of `owner`: `namespace:path_owner`.
    pub fn new_identifier_for(
        shard_type: &Identifier,
        owner: &str,
    ) -> Result<Identifier, LibraryError> {
        if !Identifier::is_valid_namespace(owner) {
            return Err(LibraryError::MalformedIdentifier {
                input: owner.to_string(),
                reason: "owner token must be non-empty and use only [a-z0-9_.-]".to_string(),
            });
        }
        Identifier::new(
            shard_type.namespace(),
            format!("{}_{}", shard_type.path(), owner),
        )
    }

    pub fn get(&self, id: &Identifier) -> Option<&Shard> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.entries.contains_key(id)
    }

    pub fn shard_type(&self, id: &Identifier) -> Option<&ShardType> {
        self.types.get(id)
    }

    pub fn has_type(&self, id: &Identifier) -> bool {
        self.types.contains_key(id)
    }

    /// Shards currently attributed to `source`
    pub fn group(&self, source: &Identifier) -> impl Iterator<Item = &Identifier> + '_ {
        self.groups.get(source).into_iter().flatten()
    }

    pub fn sources(&self) -> impl Iterator<Item = &Identifier> + '_ {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &Shard)> + '_ {
        self.entries.iter()
    }

    pub fn types(&self) -> impl Iterator<Item = (&Identifier, &ShardType)> + '_ {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn snapshot(&self) -> LibrarySnapshot {
        LibrarySnapshot {
            shard_types: self.types.clone(),
            shards: self.entries.clone(),
            groups: self.groups.clone(),
        }
    }

    /// Check the entry table against the grouping index
    pub fn consistency(&self) -> ConsistencyReport {
        let ungrouped = self
            .entries
            .iter()
            .filter(|(id, shard)| {
                !self
                    .groups
                    .get(&shard.source)
                    .is_some_and(|members| members.contains(*id))
            })
            .map(|(id, _)| id.clone())
            .collect();

        let dangling = self
            .groups
            .iter()
            .flat_map(|(source, members)| members.iter().map(move |id| (source, id)))
            .filter(|(_, id)| !self.entries.contains_key(*id))
            .map(|(source, id)| (source.clone(), id.clone()))
            .collect();

        ConsistencyReport {
            ungrouped,
            dangling,
        }
    }

    fn unlink(&mut self, source: &Identifier, id: &Identifier) {
        if let Some(members) = self.groups.get_mut(source) {
            members.remove(id);
            if members.is_empty() {
                self.groups.remove(source);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ShardContent;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    fn shard(shard_type: &str, source: &str) -> Shard {
        Shard::new(
            id(shard_type),
            id(source),
            ShardContent {
                name: "A torn page".to_string(),
                ..ShardContent::default()
            },
        )
    }

    fn create_test_store() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.register_type(id("lore:letter"), ShardType::default());
        store.register_type(id("lore:diary"), ShardType::default());
        store.insert(id("mymod:note1"), shard("lore:letter", "mymod:quest_a"));
        store
    }

    #[test]
    fn test_insert_links_group() {
        let store = create_test_store();

        let members: Vec<&Identifier> = store.group(&id("mymod:quest_a")).collect();
        assert_eq!(members, vec![&id("mymod:note1")]);
        assert!(store.consistency().is_consistent());
    }

    #[test]
    fn test_insert_replacing_moves_group() {
        let mut store = create_test_store();

        let displaced = store.insert(id("mymod:note1"), shard("lore:letter", "mymod:quest_b"));

        assert!(displaced.is_some());
        assert_eq!(store.group(&id("mymod:quest_a")).count(), 0);
        assert_eq!(store.group(&id("mymod:quest_b")).count(), 1);
        assert!(store.consistency().is_consistent());
    }

    #[test]
    fn test_remove_unlinks_group() {
        let mut store = create_test_store();

        let removed = store.remove(&id("mymod:note1"));

        assert!(removed.is_some());
        assert!(store.is_empty());
        assert_eq!(store.group(&id("mymod:quest_a")).count(), 0);
        assert_eq!(store.sources().count(), 0);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = create_test_store();

        assert!(store.remove(&id("mymod:missing")).is_none());
        assert_eq!(store.len(), 1);
        assert!(store.consistency().is_consistent());
    }

    #[test]
    fn test_remove_all_keeps_types() {
        let mut store = create_test_store();
        store.insert(id("mymod:note2"), shard("lore:diary", "mymod:quest_b"));

        assert_eq!(store.remove_all(), 2);
        assert!(store.is_empty());
        assert_eq!(store.sources().count(), 0);
        assert_eq!(store.type_count(), 2);
    }

    #[test]
    fn test_rekey_leaves_new_id_ungrouped() {
        let mut store = create_test_store();

        let moved = store
            .rekey(&id("mymod:note1"), &id("lore:diary"), id("lore:diary_othermod"))
            .unwrap();
        assert_eq!(moved.shard_type, id("lore:diary"));
        assert_eq!(moved.source, id("mymod:quest_a"));

        assert!(!store.contains(&id("mymod:note1")));
        assert!(store.contains(&id("lore:diary_othermod")));
        assert_eq!(store.group(&id("mymod:quest_a")).count(), 0);

        let report = store.consistency();
        assert_eq!(report.ungrouped, vec![id("lore:diary_othermod")]);
        assert!(report.dangling.is_empty());
    }

    #[test]
    fn test_rekey_unknown_type_checked_first() {
        let mut store = create_test_store();

        let err = store
            .rekey(&id("mymod:missing"), &id("lore:scroll"), id("lore:scroll_x"))
            .unwrap_err();
        assert_eq!(err, LibraryError::UnknownShardType(id("lore:scroll")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rekey_unknown_shard() {
        let mut store = create_test_store();

        let err = store
            .rekey(&id("mymod:missing"), &id("lore:diary"), id("lore:diary_x"))
            .unwrap_err();
        assert_eq!(err, LibraryError::UnknownShard(id("mymod:missing")));
        assert!(store.consistency().is_consistent());
    }

    #[test]
    fn test_rekey_onto_existing_unlinks_displaced() {
        let mut store = create_test_store();
        store.insert(id("lore:diary_othermod"), shard("lore:diary", "mymod:quest_b"));

        store
            .rekey(&id("mymod:note1"), &id("lore:diary"), id("lore:diary_othermod"))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.group(&id("mymod:quest_b")).count(), 0);
        assert!(store.consistency().dangling.is_empty());
    }

    #[test]
    fn test_new_identifier_for() {
        let new_id = CatalogStore::new_identifier_for(&id("lore:diary"), "othermod").unwrap();
        assert_eq!(new_id, id("lore:diary_othermod"));

        assert!(CatalogStore::new_identifier_for(&id("lore:diary"), "").is_err());
        assert!(CatalogStore::new_identifier_for(&id("lore:diary"), "Other Mod").is_err());
    }

    #[test]
    fn test_from_parts_rebuilds_groups() {
        let mut store = create_test_store();
        store
            .rekey(&id("mymod:note1"), &id("lore:diary"), id("lore:diary_othermod"))
            .unwrap();
        let snapshot = store.snapshot();

        let reloaded = CatalogStore::from_parts(snapshot.shard_types, snapshot.shards);

        assert!(reloaded.consistency().is_consistent());
        let members: Vec<&Identifier> = reloaded.group(&id("mymod:quest_a")).collect();
        assert_eq!(members, vec![&id("lore:diary_othermod")]);
    }

    #[test]
    fn test_from_snapshot_keeps_groups_as_sent() {
        let mut store = create_test_store();
        store
            .rekey(&id("mymod:note1"), &id("lore:diary"), id("lore:diary_othermod"))
            .unwrap();

        let restored = CatalogStore::from_snapshot(store.snapshot());

        assert_eq!(restored.snapshot(), store.snapshot());
        assert_eq!(restored.consistency().ungrouped, vec![id("lore:diary_othermod")]);
    }
}
