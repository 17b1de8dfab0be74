//! List transforms applied after a successful mutation.
//!
//! These functions never look at positions to find a row: rows are matched by
//! [`Record::id`] only.

use super::Record;

/// A change to apply to a cached list, built from the server's response to a
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPatch<T: Record> {
    /// A record was created: it goes first.
    Created(T),
    /// A record was updated: it replaces the old one in place.
    Updated(T),
    /// A record was deleted.
    Deleted(T::Id),
}

impl<T: Record> ListPatch<T> {
    /// Apply the patch to `records`, returning the new list.
    #[must_use]
    pub fn apply(self, records: &[T]) -> Vec<T> {
        match self {
            Self::Created(record) => prepend(records, record),
            Self::Updated(record) => replace_by_id(records, &record),
            Self::Deleted(id) => remove_by_id(records, id),
        }
    }

    /// Id of the record the patch is about.
    pub fn record_id(&self) -> T::Id {
        match self {
            Self::Created(record) | Self::Updated(record) => record.id(),
            Self::Deleted(id) => *id,
        }
    }
}

/// `[record] ++ records`.
///
/// A row already carrying the same id is dropped first, so replaying the same
/// creation leaves a single row.
#[must_use]
pub fn prepend<T: Record>(records: &[T], record: T) -> Vec<T> {
    let id = record.id();
    let mut out = Vec::with_capacity(records.len() + 1);
    out.push(record);
    out.extend(records.iter().filter(|r| r.id() != id).cloned());
    out
}

/// Replace every row whose id matches `record`'s, keeping positions.
#[must_use]
pub fn replace_by_id<T: Record>(records: &[T], record: &T) -> Vec<T> {
    let id = record.id();
    records
        .iter()
        .map(|r| if r.id() == id { record.clone() } else { r.clone() })
        .collect()
}

/// Drop every row with the given id, keeping the order of the rest.
#[must_use]
pub fn remove_by_id<T: Record>(records: &[T], id: T::Id) -> Vec<T> {
    records.iter().filter(|r| r.id() != id).cloned().collect()
}
