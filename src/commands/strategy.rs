// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::growth::Projection;
use crate::models::{PricingTier, RevenueSettings};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub async fn handle(m: &clap::ArgMatches) -> Result<()> {
    let config = crate::config::load()?;
    match m.subcommand() {
        Some(("show", sub)) => show(&config, sub).await?,
        Some(("set", sub)) => set(&config, sub).await?,
        Some(("tier", sub)) => match sub.subcommand() {
            Some(("add", tier_sub)) => tier_add(&config, tier_sub).await?,
            Some(("rm", tier_sub)) => tier_rm(&config, tier_sub).await?,
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct StrategyView {
    settings: RevenueSettings,
    tiers: Vec<PricingTier>,
    projection: Projection,
}

async fn show(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (_controller, session) = super::open_session(config).await?;
    let view = StrategyView {
        settings: session.settings(),
        tiers: session.tiers().to_vec(),
        projection: session.projection(),
    };
    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    println!(
        "{}",
        pretty_table(
            &["Goal", "Value"],
            vec![
                vec!["MRR baseline".into(), fmt_money(&view.settings.baseline)],
                vec!["MRR target".into(), fmt_money(&view.settings.target)],
                vec!["Progress".into(), format!("{}%", view.projection.progress_pct)],
                vec!["Gap".into(), fmt_money(&view.projection.gap)],
            ],
        )
    );

    if !view.tiers.is_empty() {
        let rows: Vec<Vec<String>> = view
            .tiers
            .iter()
            .map(|tier| {
                let customers = view
                    .projection
                    .tiers
                    .iter()
                    .find(|p| p.id == tier.id)
                    .map(|p| format!("+{}", p.customers_needed))
                    // excluded from projection when priced at or below zero
                    .unwrap_or_else(|| "n/a".into());
                vec![fmt_money(&tier.price), customers, tier.id.clone()]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Tier price", "Customers to close gap", "Id"], rows)
        );
    }
    Ok(())
}

async fn set(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let (controller, mut session) = super::open_session(config).await?;
    let current = session.settings();
    let baseline = match sub.get_one::<String>("mrr") {
        Some(raw) => parse_decimal(raw)?,
        None => current.baseline,
    };
    let target = match sub.get_one::<String>("target") {
        Some(raw) => parse_decimal(raw)?,
        None => current.target,
    };
    if controller
        .update_settings(&mut session, baseline, target)
        .await
    {
        println!(
            "Strategy updated: baseline {}, target {}",
            fmt_money(&baseline),
            fmt_money(&target)
        );
    } else {
        println!("Settings not updated.");
    }
    Ok(())
}

async fn tier_add(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let price = parse_decimal(sub.get_one::<String>("price").unwrap())?;
    let (controller, mut session) = super::open_session(config).await?;
    let mut tiers = session.tiers().to_vec();
    tiers.push(PricingTier::new(price));
    if controller.sync_tiers(&mut session, tiers).await {
        println!("Added {} tier ({} total)", fmt_money(&price), session.tiers().len());
    } else {
        println!("Tier not added.");
    }
    Ok(())
}

async fn tier_rm(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap();
    let (controller, mut session) = super::open_session(config).await?;
    let mut tiers = session.tiers().to_vec();
    let before = tiers.len();
    tiers.retain(|tier| tier.id != *id);
    if tiers.len() == before {
        println!("No tier with id {}", id);
        return Ok(());
    }
    if controller.sync_tiers(&mut session, tiers).await {
        println!("Removed tier {}", id);
    } else {
        println!("Tier not removed.");
    }
    Ok(())
}
