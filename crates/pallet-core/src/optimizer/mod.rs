use crate::fit::{fit_orientation, footprint_fits};
use crate::limits::{EffectiveLimits, Settings};
use crate::pricing::calculate_price;
use crate::types::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

mod joint;
mod layout;
mod multi;
mod summary;
#[cfg(test)]
mod tests;

/// Chooses and prices pallets for furniture shipments.
pub struct Optimizer<'a> {
    tariff: &'a Tariff,
    context: ShipmentContext,
}

impl<'a> Optimizer<'a> {
    /// Validates the tariff and builds a new optimizer instance.
    pub fn new(tariff: &'a Tariff, context: ShipmentContext) -> Result<Self> {
        if tariff.pallets.is_empty() {
            return Err(OptimizerError::EmptyCatalogue);
        }

        for pallet in &tariff.pallets {
            let dimensions = [
                pallet.length_m,
                pallet.width_m,
                pallet.max_height_cm,
                pallet.max_weight_kg,
            ];
            if dimensions.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err(OptimizerError::InvalidInput(format!(
                    "Pallet '{}' needs positive dimensions and limits",
                    pallet.id
                )));
            }
        }

        if let Some(category) = tariff.rates.unordered_categories().first() {
            return Err(OptimizerError::InvalidInput(format!(
                "Rate tiers of category {:?} are not in ascending weight order",
                category
            )));
        }

        if tariff.settings.group_window == 0 {
            return Err(OptimizerError::InvalidInput(
                "settings.group_window must be at least 1".to_string(),
            ));
        }

        Ok(Self { tariff, context })
    }

    fn settings(&self) -> &Settings {
        &self.tariff.settings
    }

    fn limits_for(&self, pallet: &PalletType) -> EffectiveLimits {
        EffectiveLimits::for_pallet(pallet, &self.context.options, self.settings())
    }

    fn find_rate(&self, pallet: &PalletType, weight_kg: Decimal) -> Option<Decimal> {
        self.tariff
            .rates
            .find_rate(pallet.category, weight_kg, self.context.distance_band)
    }

    /// Ranks every pallet type for a single item.
    ///
    /// All accepted pallets are priced and sorted, but only the cheapest one
    /// and a bounded number of alternatives are returned.
    pub fn optimize(&self, item: &Item) -> Result<OptimizerResult> {
        validate_item(item)?;

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for pallet in &self.tariff.pallets {
            match self.evaluate_pallet(item, pallet) {
                Ok(quote) => accepted.push(quote),
                Err(rejection) => rejected.push(rejection),
            }
        }

        // stable: equal prices keep catalogue order
        accepted.sort_by(|a, b| a.price.gross_total.cmp(&b.price.gross_total));

        debug!(
            item = %item.id,
            accepted = accepted.len(),
            rejected = rejected.len(),
            "single item evaluated"
        );

        let mut ranked = accepted.into_iter();
        let recommended = ranked.next();
        let alternatives = ranked.take(self.settings().alternatives).collect();

        Ok(OptimizerResult {
            recommended,
            alternatives,
            rejected,
        })
    }

    /// Quotes one pallet for one item, or lists every reason it cannot carry it.
    fn evaluate_pallet(
        &self,
        item: &Item,
        pallet: &PalletType,
    ) -> std::result::Result<PalletQuote, RejectedPallet> {
        let settings = self.settings();
        let limits = self.limits_for(pallet);
        let margin = settings.packaging_margin_cm;

        let fit = fit_orientation(
            item.length_cm,
            item.width_cm,
            item.height_cm,
            pallet.length_cm(),
            pallet.width_cm(),
            limits.available_height_cm,
            margin,
        );

        let mut reasons = Vec::new();
        if !fit.fits {
            let reason = if footprint_fits(
                item.length_cm,
                item.width_cm,
                item.height_cm,
                pallet.length_cm(),
                pallet.width_cm(),
                margin,
            ) {
                RejectionReason::HeightLimit
            } else {
                RejectionReason::Overhang
            };
            reasons.push(reason);
        }
        if item.weight_kg > limits.max_weight_kg {
            reasons.push(RejectionReason::WeightLimit);
        }

        let rate = self.find_rate(pallet, to_decimal(item.weight_kg));
        match rate {
            Some(rate) if reasons.is_empty() => Ok(PalletQuote {
                pallet: pallet.clone(),
                orientation: fit.orientation,
                orientation_label: fit.label().to_string(),
                rotated: fit.rotated,
                item_height_cm: fit.height,
                limits,
                price: calculate_price(rate, &self.tariff.surcharges),
                warnings: joint::item_warnings(&fit, &limits, settings),
            }),
            _ => {
                if rate.is_none() {
                    reasons.push(RejectionReason::NoRateMatch);
                }
                Err(RejectedPallet {
                    pallet_id: pallet.id.clone(),
                    pallet_name: pallet.display_name().to_string(),
                    reasons,
                })
            }
        }
    }
}

fn validate_item(item: &Item) -> Result<()> {
    let values = [item.length_cm, item.width_cm, item.height_cm, item.weight_kg];
    if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(OptimizerError::InvalidInput(format!(
            "Item '{}' needs positive dimensions and weight",
            item.id
        )));
    }
    if Decimal::from_f64(item.weight_kg).is_none() {
        return Err(OptimizerError::InvalidInput(format!(
            "Item '{}' weighs more than can be priced",
            item.id
        )));
    }
    Ok(())
}

fn validate_items(items: &[Item]) -> Result<()> {
    if items.is_empty() {
        return Err(OptimizerError::InvalidInput(
            "At least one item must be provided".to_string(),
        ));
    }
    items.iter().try_for_each(validate_item)
}

/// Exact decimal form of a measurement already checked by [`validate_item`].
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}
