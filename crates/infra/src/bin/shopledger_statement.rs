//! Print a client's account statement from a JSON ledger file.
//!
//! The ledger file holds `clients` (registrations), `entries` (entry drafts)
//! and `events` (business events); entries are recorded before events, each
//! list in file order.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use serde::Deserialize;

use shopledger_accounting::{BusinessEvent, ClosingPolicy, DateRange, JournalEntryDraft};
use shopledger_core::ClientId;
use shopledger_infra::{
    ClientAccounts, InMemoryJournalStore, JsonStatementRenderer, LedgerConfig, LedgerService,
    StatementRenderer,
};
use shopledger_parties::RegisterClient;

#[derive(Parser, Debug)]
#[command(name = "shopledger-statement", version, about = "Render a client's account statement")]
struct Cli {
    /// JSON ledger file with clients, entries and events
    ledger: PathBuf,

    /// Client id (UUID)
    client: ClientId,

    /// First day of the statement window (YYYY-MM-DD)
    from: NaiveDate,

    /// Last day of the statement window (YYYY-MM-DD)
    to: NaiveDate,

    /// Leave period-closing entries out of the statement
    #[arg(long)]
    exclude_closing: bool,
}

impl Cli {
    /// `None` lets the configured default decide.
    fn closing_policy(&self) -> Option<ClosingPolicy> {
        self.exclude_closing.then_some(ClosingPolicy::Exclude)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LedgerFile {
    clients: Vec<RegisterClient>,
    entries: Vec<JournalEntryDraft>,
    events: Vec<BusinessEvent>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = LedgerConfig::from_env();
    shopledger_observability::init_with(&config.log);

    let range = DateRange::new(cli.from, cli.to)?;

    let raw = std::fs::read_to_string(&cli.ledger)
        .with_context(|| format!("failed to read {}", cli.ledger.display()))?;
    let ledger: LedgerFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", cli.ledger.display()))?;

    let renderer = JsonStatementRenderer::new(config.currency_scale)
        .inverted(config.invert_display_sign)
        .pretty(true);

    let service = LedgerService::new(
        Arc::new(InMemoryJournalStore::new()),
        ClientAccounts::in_memory(),
        config,
    );

    for registration in ledger.clients {
        service.register_client(registration)?;
    }
    for (idx, draft) in ledger.entries.into_iter().enumerate() {
        service
            .record_draft(draft)
            .with_context(|| format!("entry #{} rejected", idx + 1))?;
    }
    for (idx, event) in ledger.events.into_iter().enumerate() {
        service
            .record_event(event)
            .with_context(|| format!("event #{} rejected", idx + 1))?;
    }

    let statement = service.statement(&cli.client, range, cli.closing_policy(), Utc::now().date_naive())?;
    let rendered = renderer.render(&statement)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&rendered)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const CLIENT: &str = "00000000-0000-7000-8000-000000000001";

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_positionals_and_flag() {
        let cli = Cli::try_parse_from([
            "shopledger-statement",
            "ledger.json",
            CLIENT,
            "2024-01-01",
            "2024-01-31",
            "--exclude-closing",
        ])
        .unwrap();

        assert_eq!(cli.ledger, PathBuf::from("ledger.json"));
        assert_eq!(cli.client, CLIENT.parse::<ClientId>().unwrap());
        assert_eq!(cli.to, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(cli.closing_policy(), Some(ClosingPolicy::Exclude));
    }

    #[test]
    fn missing_flag_defers_to_configuration() {
        let cli = Cli::try_parse_from(["shopledger-statement", "l.json", CLIENT, "2024-01-01", "2024-01-31"])
            .unwrap();
        assert_eq!(cli.closing_policy(), None);
    }

    #[test]
    fn misspelled_flag_is_rejected() {
        let err = Cli::try_parse_from([
            "shopledger-statement",
            "l.json",
            CLIENT,
            "2024-01-01",
            "2024-01-31",
            "--exclude-closin",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(Cli::try_parse_from(["shopledger-statement", "l.json", "not-a-uuid", "2024-01-01", "2024-01-31"]).is_err());
        assert!(Cli::try_parse_from(["shopledger-statement", "l.json", CLIENT, "2024-13-01", "2024-01-31"]).is_err());
    }
}
