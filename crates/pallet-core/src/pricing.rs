//! Rate lookup and price calculation.

use crate::types::{DistanceBand, RateCategory};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One weight step of a category's price list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTier {
    pub max_weight_kg: Decimal,
    /// Net price per distance band, indexed by [`DistanceBand::index`]
    pub prices: [Decimal; 4],
}

/// Tiered base rates per category. Tiers are kept in ascending weight order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    categories: HashMap<RateCategory, Vec<RateTier>>,
}

impl RateTable {
    pub fn new(categories: HashMap<RateCategory, Vec<RateTier>>) -> Self {
        Self { categories }
    }

    /// Base rate of the first tier whose ceiling covers `weight_kg`.
    pub fn find_rate(
        &self,
        category: RateCategory,
        weight_kg: Decimal,
        band: DistanceBand,
    ) -> Option<Decimal> {
        self.categories
            .get(&category)?
            .iter()
            .find(|tier| tier.max_weight_kg >= weight_kg)
            .map(|tier| tier.prices[band.index()])
    }

    /// Categories whose tiers are not in ascending weight order.
    pub fn unordered_categories(&self) -> Vec<RateCategory> {
        self.categories
            .iter()
            .filter(|(_, tiers)| {
                tiers
                    .windows(2)
                    .any(|pair| pair[0].max_weight_kg > pair[1].max_weight_kg)
            })
            .map(|(category, _)| *category)
            .collect()
    }
}

/// Percentage surcharges and the minimum net charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surcharges {
    pub minimum_net: Decimal,
    pub fuel_percent: Decimal,
    pub road_percent: Decimal,
    pub vat_percent: Decimal,
}

/// Price components, serialized as fixed two-decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    #[serde(with = "fixed2")]
    pub base_rate: Decimal,
    #[serde(with = "fixed2")]
    pub after_minimum: Decimal,
    #[serde(with = "fixed2")]
    pub fuel_surcharge: Decimal,
    #[serde(with = "fixed2")]
    pub road_surcharge: Decimal,
    #[serde(with = "fixed2")]
    pub net_total: Decimal,
    #[serde(with = "fixed2")]
    pub vat: Decimal,
    #[serde(with = "fixed2")]
    pub gross_total: Decimal,
}

fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn percent_of(value: Decimal, percent: Decimal) -> Decimal {
    money(value * percent / Decimal::ONE_HUNDRED)
}

/// Applies the minimum charge, fuel and road surcharges, then VAT.
pub fn calculate_price(base_rate: Decimal, surcharges: &Surcharges) -> PriceBreakdown {
    let base_rate = money(base_rate);
    let after_minimum = base_rate.max(money(surcharges.minimum_net));
    let fuel_surcharge = percent_of(after_minimum, surcharges.fuel_percent);
    let road_surcharge = percent_of(after_minimum, surcharges.road_percent);
    let net_total = after_minimum + fuel_surcharge + road_surcharge;
    let vat = percent_of(net_total, surcharges.vat_percent);

    PriceBreakdown {
        base_rate,
        after_minimum,
        fuel_surcharge,
        road_surcharge,
        net_total,
        vat,
        gross_total: net_total + vat,
    }
}

/// Serde adapter writing a `Decimal` as a string with exactly two decimals.
pub mod fixed2 {
    use rust_decimal::{Decimal, RoundingStrategy};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        serializer.serialize_str(&format!("{:.2}", rounded))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Decimal::from_str(raw.trim()).map_err(D::Error::custom)
    }
}
