// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TransactionKind};

/// Summary metrics derived from the current transaction snapshot plus the
/// recurring-revenue baseline. Recomputed in full on every change; there is
/// no incremental state to keep consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Income booked as individual transactions, excluding the baseline.
    pub extra_revenue: Decimal,
    pub total_revenue: Decimal,
    pub total_burn: Decimal,
    /// Exact difference; rounding only happens for the margin.
    pub net_profit: Decimal,
    /// Percent, rounded to one decimal place. Zero when revenue is zero or
    /// negative.
    pub margin: Decimal,
    pub annual_run_rate: Decimal,
}

impl Totals {
    /// Average daily outflow assuming a 30-day month.
    pub fn daily_burn(&self) -> Decimal {
        self.total_burn / Decimal::from(30)
    }
}

pub fn compute_totals(transactions: &[Transaction], baseline: Decimal) -> Totals {
    let extra_revenue: Decimal = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income)
        .map(|t| t.amount)
        .sum();
    let total_burn: Decimal = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .map(|t| t.amount)
        .sum();
    let total_revenue = baseline + extra_revenue;
    let net_profit = total_revenue - total_burn;
    let margin = if total_revenue > Decimal::ZERO {
        (net_profit / total_revenue * Decimal::from(100)).round_dp(1)
    } else {
        Decimal::ZERO
    };
    Totals {
        extra_revenue,
        total_revenue,
        total_burn,
        net_profit,
        margin,
        annual_run_rate: total_revenue * Decimal::from(12),
    }
}
