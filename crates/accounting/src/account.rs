//! Client current accounts and their derived balances.

use chrono::NaiveDate;
use serde::Serialize;

use shopledger_core::{LedgerError, LedgerResult, Money};
use shopledger_parties::Client;

use crate::balance::BalanceSummary;

/// A client's current account.
///
/// The balances are a denormalized copy of the last cumulative balance of the
/// client's canonically ordered movements. They can only change through
/// [`ClientAccount::apply_balances`], fed by the balance calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAccount {
    client: Client,
    /// Closing entries included.
    official_balance: Money,
    /// Closing entries excluded.
    working_balance: Money,
    movement_count: usize,
    last_movement_date: Option<NaiveDate>,
}

impl ClientAccount {
    pub fn open(client: Client) -> Self {
        Self {
            client,
            official_balance: Money::ZERO,
            working_balance: Money::ZERO,
            movement_count: 0,
            last_movement_date: None,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn official_balance(&self) -> Money {
        self.official_balance
    }

    pub fn working_balance(&self) -> Money {
        self.working_balance
    }

    pub fn movement_count(&self) -> usize {
        self.movement_count
    }

    pub fn last_movement_date(&self) -> Option<NaiveDate> {
        self.last_movement_date
    }

    /// Replace both balances with freshly computed ones.
    ///
    /// `official` must be the fold of every movement, `working` the fold of the
    /// same movements after closing exclusion.
    pub fn apply_balances(&mut self, official: &BalanceSummary, working: &BalanceSummary) -> LedgerResult<()> {
        for summary in [official, working] {
            if let Some(owner) = summary.client_ref() {
                if owner != self.client.id {
                    return Err(LedgerError::validation(format!(
                        "balances of client {owner} applied to account {}",
                        self.client.id
                    )));
                }
            }
        }

        if working.contains_closing() {
            return Err(LedgerError::validation(
                "working balance was computed with closing movements",
            ));
        }
        if working.movements().len() > official.movements().len() {
            return Err(LedgerError::validation(
                "working balance covers more movements than the official one",
            ));
        }

        self.official_balance = official.final_balance();
        self.working_balance = working.final_balance();
        self.movement_count = official.movements().len();
        self.last_movement_date = official.last_operation_date();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::compute_balances;
    use crate::closing::exclude_closing;
    use crate::journal::EntryType;
    use crate::testing::{client, day, movement};
    use chrono::Utc;
    use shopledger_core::ClientId;
    use shopledger_parties::RegisterClient;

    fn account_for(id: ClientId) -> ClientAccount {
        ClientAccount::open(
            Client::register(RegisterClient {
                client_id: id,
                name: "Mario Ruiz".to_string(),
                tax_id: None,
                contact: None,
                occurred_at: Utc::now(),
            })
            .unwrap(),
        )
    }

    #[test]
    fn applies_official_and_working_balances() {
        let all = vec![
            movement(1, 1, EntryType::Normal, true, 900),
            movement(31, 2, EntryType::Closing, false, 900),
        ];
        let official = compute_balances(all.clone()).unwrap();
        let working = compute_balances(exclude_closing(all)).unwrap();

        let mut account = account_for(client());
        account.apply_balances(&official, &working).unwrap();

        assert_eq!(account.official_balance(), Money::ZERO);
        assert_eq!(account.working_balance(), Money::from_minor(900));
        assert_eq!(account.movement_count(), 2);
        assert_eq!(account.last_movement_date(), Some(day(31)));
    }

    #[test]
    fn rejects_swapped_summaries() {
        let all = vec![
            movement(1, 1, EntryType::Normal, true, 900),
            movement(31, 2, EntryType::Closing, false, 900),
        ];
        let official = compute_balances(all.clone()).unwrap();
        let working = compute_balances(exclude_closing(all)).unwrap();

        let mut account = account_for(client());
        let err = account.apply_balances(&working, &official).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(account.official_balance(), Money::ZERO);
    }

    #[test]
    fn rejects_balances_of_another_client() {
        let summary = compute_balances(vec![movement(1, 1, EntryType::Normal, true, 1)]).unwrap();
        let mut account = account_for(ClientId::new());
        assert!(account.apply_balances(&summary, &summary).is_err());
    }
}
