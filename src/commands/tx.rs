// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::models::{
    AccountContext, Category, Transaction, TransactionDraft, TransactionKind, TransactionPatch,
    TransactionStatus,
};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, today};

pub async fn handle(m: &clap::ArgMatches) -> Result<()> {
    let config = crate::config::load()?;
    match m.subcommand() {
        Some(("add", sub)) => add(&config, sub).await?,
        Some(("list", sub)) => list(&config, sub).await?,
        Some(("edit", sub)) => edit(&config, sub).await?,
        Some(("rm", sub)) => rm(&config, sub).await?,
        _ => {}
    }
    Ok(())
}

async fn add(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind: TransactionKind = sub
        .get_one::<String>("kind")
        .unwrap()
        .parse()
        .map_err(anyhow::Error::msg)?;
    let category: Category = match sub.get_one::<String>("category") {
        Some(raw) => raw.parse().map_err(anyhow::Error::msg)?,
        None => match kind {
            TransactionKind::Income => Category::Salary,
            TransactionKind::Expense => Category::Software,
        },
    };
    let occurred_at = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };
    let account_context: AccountContext = sub
        .get_one::<String>("account")
        .unwrap()
        .parse()
        .map_err(anyhow::Error::msg)?;
    let draft = TransactionDraft {
        amount,
        kind,
        category,
        description: sub.get_one::<String>("desc").unwrap().clone(),
        occurred_at,
        account_context,
        is_recurring: sub.get_flag("recurring"),
    };

    let (controller, mut session) = super::open_session(config).await?;
    if controller.add_transaction(&mut session, draft).await {
        let tx = &session.transactions()[0];
        println!(
            "Recorded {} {} '{}' on {} ({})",
            fmt_money(&tx.amount),
            tx.kind,
            tx.description,
            tx.occurred_at,
            tx.account_context
        );
    } else {
        println!("Entry not recorded; ledger unchanged.");
    }
    Ok(())
}

#[derive(Serialize)]
pub struct LedgerRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub category: String,
    pub kind: String,
    pub account: String,
    pub recurring: bool,
    pub status: String,
    pub amount: String,
}

pub fn ledger_rows(
    transactions: &[Transaction],
    account: Option<AccountContext>,
    kind: Option<TransactionKind>,
    limit: Option<usize>,
) -> Vec<LedgerRow> {
    transactions
        .iter()
        .filter(|t| account.is_none_or(|a| t.account_context == a))
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .take(limit.unwrap_or(usize::MAX))
        .map(|t| LedgerRow {
            id: t.id.clone(),
            date: t.occurred_at.to_string(),
            description: t.description.clone(),
            category: t.category.to_string(),
            kind: t.kind.to_string(),
            account: t.account_context.to_string(),
            recurring: t.is_recurring,
            status: t.status.to_string(),
            amount: match t.kind {
                TransactionKind::Income => format!("+{}", fmt_money(&t.amount)),
                TransactionKind::Expense => format!("-{}", fmt_money(&t.amount)),
            },
        })
        .collect()
}

async fn list(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let account: Option<AccountContext> = sub
        .get_one::<String>("account")
        .map(|s| s.parse())
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let kind: Option<TransactionKind> = sub
        .get_one::<String>("kind")
        .map(|s| s.parse())
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let limit = sub.get_one::<usize>("limit").copied();

    let (_controller, session) = super::open_session(config).await?;
    let rows = ledger_rows(session.transactions(), account, kind, limit);
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data: Vec<Vec<String>> = rows
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.account.clone(),
                    if r.recurring { "yes".into() } else { "".into() },
                    r.amount.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Category", "Account", "Recurring", "Amount", "Id"],
                data,
            )
        );
    }
    Ok(())
}

async fn edit(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let mut patch = TransactionPatch::default();
    if let Some(raw) = sub.get_one::<String>("amount") {
        patch.amount = Some(parse_decimal(raw)?);
    }
    if let Some(raw) = sub.get_one::<String>("desc") {
        patch.description = Some(raw.clone());
    }
    if let Some(raw) = sub.get_one::<String>("kind") {
        patch.kind = Some(raw.parse::<TransactionKind>().map_err(anyhow::Error::msg)?);
    }
    if let Some(raw) = sub.get_one::<String>("category") {
        patch.category = Some(raw.parse::<Category>().map_err(anyhow::Error::msg)?);
    }
    if let Some(raw) = sub.get_one::<String>("date") {
        patch.occurred_at = Some(parse_date(raw)?);
    }
    if let Some(raw) = sub.get_one::<String>("account") {
        patch.account_context = Some(raw.parse::<AccountContext>().map_err(anyhow::Error::msg)?);
    }
    if let Some(flag) = sub.get_one::<bool>("recurring") {
        patch.is_recurring = Some(*flag);
    }
    if let Some(raw) = sub.get_one::<String>("status") {
        patch.status = Some(raw.parse::<TransactionStatus>().map_err(anyhow::Error::msg)?);
    }

    let (controller, mut session) = super::open_session(config).await?;
    if controller.update_transaction(&mut session, id, patch).await {
        println!("Updated {}", id);
    } else {
        println!("No change applied to {}", id);
    }
    Ok(())
}

async fn rm(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let (controller, mut session) = super::open_session(config).await?;
    if controller.delete_transaction(&mut session, id).await {
        println!("Deleted {}", id);
    } else {
        println!("{} not deleted", id);
    }
    Ok(())
}
