// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::PricingTier;

/// Projection for one pricing tier: how many net-new paying customers at
/// this price close the gap to the MRR target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierProjection {
    pub id: String,
    pub price: Decimal,
    pub customers_needed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Percent of target reached, rounded to one decimal place. Zero when
    /// no target is set.
    pub progress_pct: Decimal,
    /// Shortfall between current and target recurring revenue; zero when no
    /// target is set or the target is already met.
    pub gap: Decimal,
    /// Sorted by price descending.
    pub tiers: Vec<TierProjection>,
}

/// Tiers priced at or below zero carry no valid projection and are dropped
/// from the output rather than dividing by zero.
pub fn compute_projection(current: Decimal, target: Decimal, tiers: &[PricingTier]) -> Projection {
    let (progress_pct, gap) = if target > Decimal::ZERO {
        let pct = (current / target * Decimal::from(100)).round_dp(1);
        (pct, (target - current).max(Decimal::ZERO))
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let mut out: Vec<TierProjection> = tiers
        .iter()
        .filter(|t| t.price > Decimal::ZERO)
        .map(|t| TierProjection {
            id: t.id.clone(),
            price: t.price,
            // ceil of a non-negative quotient; saturates on absurd gaps
            customers_needed: (gap / t.price).ceil().to_u64().unwrap_or(u64::MAX),
        })
        .collect();
    out.sort_by(|a, b| b.price.cmp(&a.price));

    Projection {
        progress_pct,
        gap,
        tiers: out,
    }
}
