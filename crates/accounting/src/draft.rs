//! Loosely typed journal entry input.
//!
//! Forms and remote callers send entry types and directions as strings and
//! amounts as whatever JSON value they happened to hold. Everything is checked
//! here, once, and turned into a typed [`JournalEntry`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use shopledger_core::{ClientId, EntryId, LedgerError, LedgerResult, Money};

use crate::journal::{Direction, EntryLine, EntryType, JournalEntry, LineAccount};

/// Wire form of a journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryDraft {
    /// Generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub entry_type: String,
    #[serde(default)]
    pub description: String,
    pub lines: Vec<DraftLine>,
}

/// Wire form of one entry line. Exactly one of `client_ref` / `account` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    #[serde(default)]
    pub client_ref: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    pub direction: String,
    pub amount: JsonValue,
    #[serde(default)]
    pub concept: Option<String>,
}

impl JournalEntryDraft {
    /// Validate the draft, converting amounts at `scale` fractional digits.
    pub fn validate(self, scale: u32) -> LedgerResult<JournalEntry> {
        let id = match self.id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<EntryId>()?,
            _ => EntryId::new(),
        };
        let entry_type: EntryType = self.entry_type.parse()?;

        let lines = self
            .lines
            .into_iter()
            .enumerate()
            .map(|(idx, line)| line.validate(scale).map_err(|e| prefix_line(idx, e)))
            .collect::<LedgerResult<Vec<_>>>()?;

        JournalEntry::new(id, self.timestamp, entry_type, self.description, lines)
    }
}

impl DraftLine {
    fn validate(self, scale: u32) -> LedgerResult<EntryLine> {
        let account = match (self.client_ref.as_deref(), self.account.as_deref()) {
            (Some(client), None) => LineAccount::client(client.parse::<ClientId>()?),
            (None, Some(code)) => LineAccount::nominal(code.trim()),
            (Some(_), Some(_)) => {
                return Err(LedgerError::validation(
                    "line cannot reference both a client and a nominal account",
                ));
            }
            (None, None) => {
                return Err(LedgerError::validation(
                    "line must reference a client or a nominal account",
                ));
            }
        };

        let direction: Direction = self.direction.parse()?;
        let amount = parse_amount(&self.amount, scale)?;
        let concept = self
            .concept
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(EntryLine {
            account,
            direction,
            amount,
            concept,
        })
    }
}

/// Accepts JSON numbers and numeric strings, including scientific notation.
fn parse_amount(value: &JsonValue, scale: u32) -> LedgerResult<Money> {
    let literal = match value {
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.trim().to_string(),
        other => {
            return Err(LedgerError::validation(format!(
                "amount must be a number or numeric string, got {other}"
            )));
        }
    };

    if literal.contains(['e', 'E']) {
        let value = Decimal::from_scientific(&literal)
            .map_err(|e| LedgerError::validation(format!("invalid amount '{literal}': {e}")))?;
        return Money::from_decimal(value, scale);
    }

    Money::parse(&literal, scale)
}

fn prefix_line(idx: usize, err: LedgerError) -> LedgerError {
    match err {
        LedgerError::Validation(msg) => LedgerError::Validation(format!("line {idx}: {msg}")),
        LedgerError::Precision(msg) => LedgerError::Precision(format!("line {idx}: {msg}")),
        other => other,
    }
}
