//! Closing-entry filter.
//!
//! Every consumer that needs "working" figures goes through [`exclude_closing`]
//! (directly or via [`ClosingPolicy`]); there is no second definition of what a
//! closing movement is.

use serde::{Deserialize, Serialize};

use crate::journal::{EntryType, JournalEntry, RecordedEntry};
use crate::movement::{BalancedMovement, LedgerMovement};

/// Anything that knows the type of its owning journal entry.
pub trait EntryTyped {
    fn entry_type(&self) -> EntryType;
}

impl EntryTyped for JournalEntry {
    fn entry_type(&self) -> EntryType {
        JournalEntry::entry_type(self)
    }
}

impl EntryTyped for RecordedEntry {
    fn entry_type(&self) -> EntryType {
        self.entry().entry_type()
    }
}

impl EntryTyped for LedgerMovement {
    fn entry_type(&self) -> EntryType {
        self.entry_type
    }
}

impl EntryTyped for BalancedMovement {
    fn entry_type(&self) -> EntryType {
        self.movement.entry_type
    }
}

impl<T: EntryTyped + ?Sized> EntryTyped for &T {
    fn entry_type(&self) -> EntryType {
        (**self).entry_type()
    }
}

pub fn is_closing<T: EntryTyped + ?Sized>(item: &T) -> bool {
    item.entry_type() == EntryType::Closing
}

/// The subsequence of `items` whose owning entry is not a closing entry.
pub fn exclude_closing<T, I>(items: I) -> Vec<T>
where
    T: EntryTyped,
    I: IntoIterator<Item = T>,
{
    items.into_iter().filter(|item| !is_closing(item)).collect()
}

/// Whether closing entries take part in a computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosingPolicy {
    /// "Official" figures: closing entries included.
    #[default]
    Include,
    /// "Working" figures: closing entries removed.
    Exclude,
}

impl ClosingPolicy {
    pub fn from_include_flag(include_closing: bool) -> Self {
        if include_closing {
            ClosingPolicy::Include
        } else {
            ClosingPolicy::Exclude
        }
    }

    /// Whether a single item survives this policy.
    pub fn admits<T: EntryTyped + ?Sized>(self, item: &T) -> bool {
        match self {
            ClosingPolicy::Include => true,
            ClosingPolicy::Exclude => !is_closing(item),
        }
    }

    pub fn apply<T, I>(self, items: I) -> Vec<T>
    where
        T: EntryTyped,
        I: IntoIterator<Item = T>,
    {
        match self {
            ClosingPolicy::Include => items.into_iter().collect(),
            ClosingPolicy::Exclude => exclude_closing(items),
        }
    }
}
