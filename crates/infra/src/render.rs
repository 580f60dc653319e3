//! Statement renderers.
//!
//! A [`Statement`] carries raw minor-unit amounts in the ledger's sign
//! convention (positive = client owes the shop). Everything presentational,
//! decimal formatting and the optional sign flip for "in favor of the client"
//! displays included, happens here.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use shopledger_accounting::{ClosingPolicy, Direction, EntryType, Statement};
use shopledger_core::{ClientId, EntryId, LedgerError, Money};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("failed to encode statement: {0}")]
    Encode(String),
}

/// Output format seam for statements (JSON today; PDF/HTML would plug in here).
pub trait StatementRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn render(&self, statement: &Statement) -> Result<Vec<u8>, RenderError>;
}

/// Renders statements as JSON with decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonStatementRenderer {
    pub scale: u32,
    /// Flip the sign of opening, running and final balances.
    pub invert_sign: bool,
    pub pretty: bool,
}

impl JsonStatementRenderer {
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            invert_sign: false,
            pretty: false,
        }
    }

    pub fn inverted(mut self, invert_sign: bool) -> Self {
        self.invert_sign = invert_sign;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn amount(&self, value: Money) -> String {
        value.to_decimal(self.scale).to_string()
    }

    fn balance(&self, value: Money) -> Result<String, RenderError> {
        let shown = if self.invert_sign { value.checked_neg()? } else { value };
        Ok(self.amount(shown))
    }

    fn view(&self, statement: &Statement) -> Result<StatementView, RenderError> {
        let movements = statement
            .movements
            .iter()
            .map(|m| {
                let (debit, credit) = match m.movement.direction {
                    Direction::Debit => (Some(self.amount(m.movement.amount)), None),
                    Direction::Credit => (None, Some(self.amount(m.movement.amount))),
                };
                Ok(MovementView {
                    date: m.movement.operation_date,
                    entry: m.movement.entry_ref,
                    sequence: m.movement.sequence,
                    concept: m.movement.concept.clone(),
                    closing: m.movement.entry_type == EntryType::Closing,
                    debit,
                    credit,
                    balance: self.balance(m.cumulative_balance)?,
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        Ok(StatementView {
            client: ClientView {
                id: statement.client.id,
                name: statement.client.name.clone(),
                tax_id: statement.client.tax_id.clone(),
                email: statement.client.contact.email.clone(),
                address: statement.client.contact.address.clone(),
            },
            emission_date: statement.emission_date,
            from: statement.range.from(),
            to: statement.range.to(),
            closing_policy: statement.closing_policy,
            opening_balance: self.balance(statement.opening_balance)?,
            movements,
            total_debits: self.amount(statement.total_debits),
            total_credits: self.amount(statement.total_credits),
            final_balance: self.balance(statement.final_balance)?,
        })
    }
}

impl StatementRenderer for JsonStatementRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, statement: &Statement) -> Result<Vec<u8>, RenderError> {
        let view = self.view(statement)?;
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(&view)
        } else {
            serde_json::to_vec(&view)
        };
        encoded.map_err(|e| RenderError::Encode(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatementView {
    client: ClientView,
    emission_date: NaiveDate,
    from: NaiveDate,
    to: NaiveDate,
    closing_policy: ClosingPolicy,
    opening_balance: String,
    movements: Vec<MovementView>,
    total_debits: String,
    total_credits: String,
    final_balance: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientView {
    id: ClientId,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MovementView {
    date: NaiveDate,
    entry: EntryId,
    sequence: u64,
    concept: String,
    closing: bool,
    debit: Option<String>,
    credit: Option<String>,
    balance: String,
}
