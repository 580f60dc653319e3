use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopledger_core::{ClientId, EntryId, LedgerError, LedgerResult, Money};

/// Kind of journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Normal,
    /// Period-end entry, excluded from working figures.
    Closing,
}

impl FromStr for EntryType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(EntryType::Normal),
            "closing" => Ok(EntryType::Closing),
            other => Err(LedgerError::validation(format!(
                "unknown entry type '{other}' (expected normal or closing)"
            ))),
        }
    }
}

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl FromStr for Direction {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(Direction::Debit),
            "credit" => Ok(Direction::Credit),
            other => Err(LedgerError::validation(format!(
                "unknown direction '{other}' (expected debit or credit)"
            ))),
        }
    }
}

/// Account a line posts to: a client's current account or a nominal shop account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LineAccount {
    Client { client_id: ClientId },
    /// e.g. "sales", "cash".
    Nominal { code: String },
}

impl LineAccount {
    pub fn client(client_id: ClientId) -> Self {
        LineAccount::Client { client_id }
    }

    pub fn nominal(code: impl Into<String>) -> Self {
        LineAccount::Nominal { code: code.into() }
    }

    pub fn client_id(&self) -> Option<ClientId> {
        match self {
            LineAccount::Client { client_id } => Some(*client_id),
            LineAccount::Nominal { .. } => None,
        }
    }
}

/// One line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLine {
    pub account: LineAccount,
    pub direction: Direction,
    /// Magnitude in minor units. The direction carries the sign.
    pub amount: Money,
    /// Overrides the entry description for this line's movement.
    pub concept: Option<String>,
}

impl EntryLine {
    pub fn debit(account: LineAccount, amount: Money) -> Self {
        Self {
            account,
            direction: Direction::Debit,
            amount,
            concept: None,
        }
    }

    pub fn credit(account: LineAccount, amount: Money) -> Self {
        Self {
            account,
            direction: Direction::Credit,
            amount,
            concept: None,
        }
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }
}

/// Immutable, balanced accounting record.
///
/// Only constructible through [`JournalEntry::new`] (or deserialization, which
/// runs the same checks), so a value of this type is always balanced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedEntry")]
pub struct JournalEntry {
    id: EntryId,
    timestamp: DateTime<Utc>,
    entry_type: EntryType,
    description: String,
    lines: Vec<EntryLine>,
}

#[derive(Deserialize)]
struct UncheckedEntry {
    id: EntryId,
    timestamp: DateTime<Utc>,
    entry_type: EntryType,
    description: String,
    lines: Vec<EntryLine>,
}

impl TryFrom<UncheckedEntry> for JournalEntry {
    type Error = LedgerError;

    fn try_from(raw: UncheckedEntry) -> Result<Self, Self::Error> {
        JournalEntry::new(raw.id, raw.timestamp, raw.entry_type, raw.description, raw.lines)
    }
}

impl JournalEntry {
    /// Validate and build an entry.
    ///
    /// Line amounts are stored as magnitudes; a negative amount is accepted and
    /// normalized because the direction tag is authoritative.
    pub fn new(
        id: EntryId,
        timestamp: DateTime<Utc>,
        entry_type: EntryType,
        description: impl Into<String>,
        lines: Vec<EntryLine>,
    ) -> LedgerResult<Self> {
        if lines.is_empty() {
            return Err(LedgerError::validation("journal entry must have lines"));
        }

        let mut normalized = Vec::with_capacity(lines.len());
        let mut debit_total: i128 = 0;
        let mut credit_total: i128 = 0;

        for (idx, mut line) in lines.into_iter().enumerate() {
            if let LineAccount::Nominal { code } = &line.account {
                if code.trim().is_empty() {
                    return Err(LedgerError::validation(format!(
                        "line {idx}: nominal account code cannot be empty"
                    )));
                }
            }

            line.amount = line.amount.abs()?;
            match line.direction {
                Direction::Debit => debit_total += line.amount.minor_units() as i128,
                Direction::Credit => credit_total += line.amount.minor_units() as i128,
            }
            normalized.push(line);
        }

        if debit_total != credit_total {
            return Err(LedgerError::validation(format!(
                "debits must equal credits (debits={debit_total}, credits={credit_total})"
            )));
        }

        Ok(Self {
            id,
            timestamp,
            entry_type,
            description: description.into(),
            lines: normalized,
        })
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn lines(&self) -> &[EntryLine] {
        &self.lines
    }

    /// Clients touched by this entry, in line order, without duplicates.
    pub fn client_ids(&self) -> Vec<ClientId> {
        let mut ids: Vec<ClientId> = Vec::new();
        for id in self.lines.iter().filter_map(|l| l.account.client_id()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn touches_client(&self, client_id: &ClientId) -> bool {
        self.lines
            .iter()
            .any(|l| l.account.client_id().as_ref() == Some(client_id))
    }
}

/// A journal entry as persisted: carries the insertion sequence number that
/// breaks ties between movements on the same operation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEntry {
    sequence: u64,
    entry: JournalEntry,
}

impl RecordedEntry {
    /// Sequence numbers start at 1; 0 means "not assigned".
    pub fn new(sequence: u64, entry: JournalEntry) -> LedgerResult<Self> {
        if sequence == 0 {
            return Err(LedgerError::ordering(format!(
                "entry {} has no sequence number",
                entry.id()
            )));
        }
        Ok(Self { sequence, entry })
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn entry(&self) -> &JournalEntry {
        &self.entry
    }

    pub fn into_entry(self) -> JournalEntry {
        self.entry
    }
}
