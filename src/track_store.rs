use std::{collections::BTreeMap, sync::Arc};

use crate::{observation::TrackId, subject::SubjectRecord};

/// One compliance record per tracked subject, alive until the session ends.
#[derive(Clone, Debug)]
pub struct TrackStateStore {
    records: BTreeMap<TrackId, SubjectRecord>,
    positive_items: Arc<[String]>,
}

impl TrackStateStore {
    pub fn new(positive_items: &[String]) -> Self {
        Self {
            records: BTreeMap::new(),
            positive_items: positive_items.into(),
        }
    }

    pub fn get_or_create(&mut self, track_id: TrackId) -> &mut SubjectRecord {
        let positive_items = &self.positive_items;
        self.records
            .entry(track_id)
            .or_insert_with(|| SubjectRecord::new(positive_items.iter().cloned()))
    }

    pub fn get(&self, track_id: TrackId) -> Option<&SubjectRecord> {
        self.records.get(&track_id)
    }

    /// Records ordered by track id.
    pub fn all(&self) -> impl Iterator<Item = (TrackId, &SubjectRecord)> {
        self.records.iter().map(|(id, record)| (*id, record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_reuses_existing_record() {
        let mut store = TrackStateStore::new(&["helmet".to_string()]);

        store.get_or_create(3).mark_worn("helmet");
        let record = store.get_or_create(3);

        assert!(record.is_worn("helmet"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_all_is_ordered_by_track_id() {
        let mut store = TrackStateStore::new(&[]);
        store.get_or_create(9);
        store.get_or_create(2);
        store.get_or_create(5);

        let ids: Vec<TrackId> = store.all().map(|(id, _)| id).collect();

        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn test_lookup_does_not_create() {
        let store = TrackStateStore::new(&[]);

        assert!(store.get(1).is_none());
        assert!(store.is_empty());
    }
}
