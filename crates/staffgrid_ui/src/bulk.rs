//! Two-phase bulk removal.
//!
//! Rows leave the table as soon as a removal starts and come back at their
//! old positions if the host reports failure.

use std::fmt;

/// Rows in insertion order, each tagged with an ordinal that never changes.
///
/// Ordinals only grow, so a restored row finds its place regardless of what
/// else was removed or restored in between.
#[derive(Clone, Debug)]
pub struct OrderedRows<T> {
    rows: Vec<T>,
    ordinals: Vec<u64>,
    next_ordinal: u64,
}

impl<T> Default for OrderedRows<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            ordinals: Vec::new(),
            next_ordinal: 0,
        }
    }
}

impl<T> From<Vec<T>> for OrderedRows<T> {
    fn from(rows: Vec<T>) -> Self {
        let mut ordered = Self::default();
        for row in rows {
            ordered.push(row);
        }
        ordered
    }
}

impl<T> OrderedRows<T> {
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.rows.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: T) {
        self.rows.push(row);
        self.ordinals.push(self.next_ordinal);
        self.next_ordinal += 1;
    }

    fn insert_at_ordinal(&mut self, ordinal: u64, row: T) {
        let at = self.ordinals.partition_point(|o| *o < ordinal);
        self.rows.insert(at, row);
        self.ordinals.insert(at, ordinal);
    }
}

/// Identifies one in-flight removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RemovalTicket(pub u64);

impl fmt::Display for RemovalTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rows taken out of a table by one bulk delete.
#[derive(Clone, Debug)]
pub struct PendingRemoval<T> {
    pub ticket: RemovalTicket,
    /// Removed rows with their ordinals.
    entries: Vec<(u64, T)>,
}

impl<T> PendingRemoval<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, row)| row)
    }
}

/// Every removal a table is waiting on.
#[derive(Debug)]
pub struct Removals<T> {
    pending: Vec<PendingRemoval<T>>,
    next_ticket: u64,
}

impl<T> Default for Removals<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_ticket: 1,
        }
    }
}

impl<T: Clone> Removals<T> {
    /// Moves the rows for which `remove` holds out of `rows`.
    ///
    /// Returns `None` and leaves `rows` untouched when nothing matches.
    pub fn take(
        &mut self,
        rows: &mut OrderedRows<T>,
        mut remove: impl FnMut(&T) -> bool,
    ) -> Option<PendingRemoval<T>> {
        let mut entries = Vec::new();
        let mut kept = Vec::with_capacity(rows.len());
        let mut kept_ordinals = Vec::with_capacity(rows.len());
        let drained = rows.rows.drain(..).zip(rows.ordinals.drain(..));
        for (row, ordinal) in drained {
            if remove(&row) {
                entries.push((ordinal, row));
            } else {
                kept.push(row);
                kept_ordinals.push(ordinal);
            }
        }
        rows.rows = kept;
        rows.ordinals = kept_ordinals;

        if entries.is_empty() {
            return None;
        }

        let ticket = RemovalTicket(self.next_ticket);
        self.next_ticket += 1;
        let removal = PendingRemoval { ticket, entries };
        self.pending.push(removal.clone());
        Some(removal)
    }

    /// Forgets the rows of a removal the host completed.
    pub fn commit(&mut self, ticket: RemovalTicket) -> Option<PendingRemoval<T>> {
        let position = self.pending.iter().position(|p| p.ticket == ticket)?;
        Some(self.pending.remove(position))
    }

    /// Puts the rows of a failed removal back in insertion order.
    pub fn restore(&mut self, ticket: RemovalTicket, rows: &mut OrderedRows<T>) -> Option<usize> {
        let removal = self.commit(ticket)?;
        let count = removal.entries.len();
        for (ordinal, row) in removal.entries {
            rows.insert_at_ordinal(ordinal, row);
        }
        Some(count)
    }

    #[must_use]
    pub fn is_pending(&self, ticket: RemovalTicket) -> bool {
        self.pending.iter().any(|p| p.ticket == ticket)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.iter().map(PendingRemoval::len).sum()
    }
}
