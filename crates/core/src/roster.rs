//! The in-memory roster of the currently loaded page and its filtered view.

use std::collections::HashSet;

use crate::error::{DomainError, DomainResult};
use crate::id::UserId;
use crate::user::{UserPatch, UserRecord};

// ─────────────────────────────────────────────────────────────────────────────
// Roster
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered user records of a single page.
///
/// Order is the order the directory returned; ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    records: Vec<UserRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster, rejecting pages that repeat an id.
    pub fn from_records(records: Vec<UserRecord>) -> DomainResult<Self> {
        ensure_unique_ids(&records)?;
        Ok(Self { records })
    }

    /// Replace the whole roster with a freshly fetched page.
    ///
    /// On error the current records are left untouched.
    pub fn replace(&mut self, records: Vec<UserRecord>) -> DomainResult<()> {
        ensure_unique_ids(&records)?;
        self.records = records;
        Ok(())
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: UserId) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.get(id).is_some()
    }

    /// Splice acknowledged fields into the record with `id`, in place.
    ///
    /// Returns `false` when no such record is loaded (nothing changes).
    pub fn apply_patch(&mut self, id: UserId, patch: &UserPatch) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the record with `id`, keeping the order of the rest.
    ///
    /// Removing an id that is not present is a no-op.
    pub fn remove(&mut self, id: UserId) -> Option<UserRecord> {
        let idx = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(idx))
    }

    /// Records matching `query`; see [`filter_roster`].
    pub fn filtered(&self, query: &str) -> Vec<&UserRecord> {
        filter_roster(&self.records, query)
    }
}

fn ensure_unique_ids(records: &[UserRecord]) -> DomainResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            return Err(DomainError::invariant(format!(
                "duplicate user id {} in roster",
                record.id
            )));
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Filtered view
// ─────────────────────────────────────────────────────────────────────────────

/// Derived view of `records` narrowed by a search query.
///
/// A record is kept when its email, first name or last name contains `query`,
/// compared case-insensitively. Order is preserved. The empty query keeps
/// everything; any other query (including whitespace) is a literal substring.
pub fn filter_roster<'a>(records: &'a [UserRecord], query: &str) -> Vec<&'a UserRecord> {
    if query.is_empty() {
        return records.iter().collect();
    }

    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| r.matches_lowercase(&needle))
        .collect()
}
