// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashMap;
use std::fmt;

use crate::ids::{IdentityGenerator, RecordId};

/// Names one editable field of a [`Record`].
pub trait FieldKey: Copy + Eq + fmt::Debug + 'static {
    /// Every field in display order.
    fn all() -> &'static [Self];
    fn label(self) -> &'static str;
}

/// A row in a growable questionnaire collection. Every field is free text;
/// enumerated fields hold the chosen option string.
pub trait Record: Clone + fmt::Debug {
    type Id: RecordId;
    type Field: FieldKey;

    /// Field defaults for a freshly added row.
    fn blank(id: Self::Id) -> Self;
    fn id(&self) -> Self::Id;
    fn field(&self, field: Self::Field) -> &str;
    fn set_field(&mut self, field: Self::Field, value: String);
}

/// Ordered, identity-keyed collection. Records live in an arena keyed by
/// identity; `order` is the display order.
#[derive(Debug, Clone)]
pub struct EntityCollectionStore<T: Record> {
    records: HashMap<T::Id, T>,
    order: Vec<T::Id>,
    ids: IdentityGenerator,
}

impl<T: Record> Default for EntityCollectionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> EntityCollectionStore<T> {
    pub fn new() -> Self {
        Self::with_ids(IdentityGenerator::new())
    }

    pub fn with_ids(ids: IdentityGenerator) -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            ids,
        }
    }

    pub fn add(&mut self) -> T::Id {
        let id = self.ids.next_id::<T::Id>();
        self.records.insert(id, T::blank(id));
        self.order.push(id);
        id
    }

    pub fn add_with<S: Into<String>>(
        &mut self,
        fields: impl IntoIterator<Item = (T::Field, S)>,
    ) -> T::Id {
        let id = self.add();
        for (field, value) in fields {
            self.update(id, field, value);
        }
        id
    }

    /// Unknown identities are ignored; returns whether a record was touched.
    pub fn update(&mut self, id: T::Id, field: T::Field, value: impl Into<String>) -> bool {
        let Some(record) = self.records.get_mut(&id) else {
            return false;
        };
        record.set_field(field, value.into());
        true
    }

    /// Unknown identities are ignored; returns whether a record was removed.
    pub fn remove(&mut self, id: T::Id) -> bool {
        if self.records.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|candidate| *candidate != id);
        true
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.records.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn ids(&self) -> &[T::Id] {
        &self.order
    }

    pub fn position(&self, id: T::Id) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityCollectionStore, Record};
    use crate::ids::{IdentityGenerator, InstrumentId};
    use crate::model::{ContractualInstrument, InstrumentField};

    fn store() -> EntityCollectionStore<ContractualInstrument> {
        EntityCollectionStore::with_ids(IdentityGenerator::starting_at(1))
    }

    #[test]
    fn add_appends_blank_record() {
        let mut instruments = store();
        let first = instruments.add();
        let second = instruments.add();

        assert_eq!(instruments.ids(), &[first, second]);
        let blank = instruments.get(second).expect("second instrument");
        assert_eq!(blank.field(InstrumentField::Percentage), "");
        assert_eq!(blank.field(InstrumentField::InstrumentType), "");
    }

    #[test]
    fn update_replaces_one_field_and_keeps_length() {
        let mut instruments = store();
        let id = instruments.add();

        assert!(instruments.update(id, InstrumentField::Percentage, "40"));
        assert!(instruments.update(id, InstrumentField::Percentage, "45"));

        assert_eq!(instruments.len(), 1);
        let record = instruments.get(id).expect("instrument");
        assert_eq!(record.field(InstrumentField::Percentage), "45");
        assert_eq!(record.field(InstrumentField::EnergySource), "");
    }

    #[test]
    fn unknown_identity_is_a_silent_no_op() {
        let mut instruments = store();
        let id = instruments.add_with([(InstrumentField::Percentage, "40")]);

        assert!(!instruments.update(InstrumentId::new(999), InstrumentField::Percentage, "1"));
        assert!(!instruments.remove(InstrumentId::new(999)));
        assert_eq!(instruments.ids(), &[id]);
        let record = instruments.get(id).expect("instrument");
        assert_eq!(record.field(InstrumentField::Percentage), "40");
    }

    #[test]
    fn remove_preserves_survivor_order() {
        let mut instruments = store();
        let a = instruments.add();
        let b = instruments.add();
        let c = instruments.add();

        assert!(instruments.remove(b));
        assert_eq!(instruments.ids(), &[a, c]);
        assert_eq!(instruments.position(c), Some(1));
        assert!(!instruments.contains(b));
    }

    #[test]
    fn removed_identity_is_never_handed_out_again() {
        let mut instruments = store();
        let first = instruments.add();
        instruments.remove(first);
        let second = instruments.add();

        assert_ne!(first, second);
        assert!(instruments.get(first).is_none());
    }

    #[test]
    fn add_with_applies_seed_fields() {
        let mut instruments = store();
        let id = instruments.add_with([
            (InstrumentField::InstrumentType, "Power purchase agreement"),
            (InstrumentField::Percentage, "60"),
        ]);
        let record = instruments.get(id).expect("seeded instrument");
        assert_eq!(
            record.field(InstrumentField::InstrumentType),
            "Power purchase agreement"
        );
        assert_eq!(record.field(InstrumentField::Percentage), "60");
    }
}
