// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::growth::Projection;
use crate::metrics::Totals;
use crate::models::{AccountContext, Transaction, TransactionKind};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

const LEDGER_PREVIEW: usize = 8;

#[derive(Serialize)]
struct DashboardView {
    totals: Totals,
    projection: Projection,
}

pub async fn handle(m: &clap::ArgMatches) -> Result<()> {
    let config: Config = crate::config::load()?;
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let account: Option<AccountContext> = m
        .get_one::<String>("account")
        .map(|s| s.parse())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let (_controller, session) = super::open_session(&config).await?;
    let totals = session.totals();
    let projection = session.projection();
    let settings = session.settings();

    if maybe_print_json(json_flag, jsonl_flag, &DashboardView { totals: totals.clone(), projection: projection.clone() })? {
        return Ok(());
    }

    println!(
        "{}",
        pretty_table(
            &["Metric", "Value"],
            vec![
                vec!["MRR baseline".into(), fmt_money(&settings.baseline)],
                vec!["Booked income".into(), fmt_money(&totals.extra_revenue)],
                vec!["Monthly revenue".into(), fmt_money(&totals.total_revenue)],
                vec!["Monthly burn".into(), fmt_money(&totals.total_burn)],
                vec!["Daily burn".into(), fmt_money(&totals.daily_burn())],
                vec!["Net profit".into(), fmt_money(&totals.net_profit)],
                vec!["Margin".into(), format!("{}%", totals.margin)],
                vec!["Annual run rate".into(), fmt_money(&totals.annual_run_rate)],
            ],
        )
    );

    println!(
        "{}",
        pretty_table(
            &["Goal", "Value"],
            vec![
                vec!["MRR target".into(), fmt_money(&settings.target)],
                vec!["Progress".into(), format!("{}%", projection.progress_pct)],
                vec!["Gap".into(), fmt_money(&projection.gap)],
            ],
        )
    );

    if !projection.tiers.is_empty() {
        let rows: Vec<Vec<String>> = projection
            .tiers
            .iter()
            .map(|tier| {
                vec![
                    fmt_money(&tier.price),
                    format!("+{}", tier.customers_needed),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Tier price", "Customers to close gap"], rows)
        );
    }

    let preview = top_entries(session.transactions(), account, LEDGER_PREVIEW);
    if !preview.is_empty() {
        println!("{}", pretty_table(&["Description", "Category", "Account", "Amount"], preview));
    }
    Ok(())
}

/// Largest entries first, the way the dashboard ledger orders them.
fn top_entries(
    transactions: &[Transaction],
    account: Option<AccountContext>,
    limit: usize,
) -> Vec<Vec<String>> {
    let mut entries: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| account.is_none_or(|a| t.account_context == a))
        .collect();
    entries.sort_by(|a, b| b.amount.cmp(&a.amount));
    entries
        .into_iter()
        .take(limit)
        .map(|t| {
            let amount = match t.kind {
                TransactionKind::Income => format!("+{}", fmt_money(&t.amount)),
                TransactionKind::Expense => format!("-{}", fmt_money(&t.amount)),
            };
            vec![
                t.description.clone(),
                t.category.to_string(),
                t.account_context.to_string(),
                amount,
            ]
        })
        .collect()
}
