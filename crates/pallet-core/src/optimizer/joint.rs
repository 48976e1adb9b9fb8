use super::*;
use crate::fit::OrientationFit;
use crate::packer::{PackItem, RectanglePacker};
use tracing::trace;

/// Layout of a set of items that fits one pallet together.
pub(super) struct JointFit {
    pub limits: EffectiveLimits,
    pub surface_width: f64,
    pub surface_length: f64,
    pub placements: Vec<ItemPlacement>,
    pub total_weight: Decimal,
}

/// Warnings for an item resting in the given orientation.
pub(super) fn item_warnings(
    fit: &OrientationFit,
    limits: &EffectiveLimits,
    settings: &Settings,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if limits.available_height_cm - fit.height <= settings.height_warning_cm {
        warnings.push(format!(
            "Near the height limit: {:.0} cm of {:.0} cm available",
            fit.height, limits.available_height_cm
        ));
    }
    if fit.orientation.is_tilted() {
        warnings.push(format!(
            "Must be shipped tilted ({})",
            fit.orientation.label()
        ));
    }
    warnings
}

impl Optimizer<'_> {
    /// Checks weight, per-item orientation and the 2D packing of `items` on `pallet`.
    pub(super) fn joint_fit(&self, items: &[Item], pallet: &PalletType) -> Option<JointFit> {
        let settings = self.settings();
        let limits = self.limits_for(pallet);

        let Some(total_weight) = items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(to_decimal(item.weight_kg)))
        else {
            trace!(pallet = %pallet.id, "joint fit rejected: weight sum overflows");
            return None;
        };
        let max_weight = Decimal::from_f64(limits.max_weight_kg).unwrap_or(Decimal::MAX);
        if total_weight > max_weight {
            trace!(pallet = %pallet.id, %total_weight, "joint fit rejected: weight");
            return None;
        }

        let surface_width = pallet.width_cm();
        let surface_length = pallet.length_cm();

        let fits = items
            .iter()
            .map(|item| {
                let fit = fit_orientation(
                    item.length_cm,
                    item.width_cm,
                    item.height_cm,
                    surface_length,
                    surface_width,
                    limits.available_height_cm,
                    settings.packaging_margin_cm,
                );
                fit.fits.then_some(fit)
            })
            .collect::<Option<Vec<_>>>();
        let Some(fits) = fits else {
            trace!(pallet = %pallet.id, "joint fit rejected: item does not fit alone");
            return None;
        };

        let pack_items: Vec<PackItem> = fits
            .iter()
            .enumerate()
            .map(|(id, fit)| PackItem {
                id,
                width: fit.footprint_width,
                height: fit.footprint_length,
            })
            .collect();

        let packer = RectanglePacker::new(surface_width, surface_length);
        let Some(packed) = packer.pack(&pack_items) else {
            trace!(pallet = %pallet.id, count = items.len(), "joint fit rejected: packing");
            return None;
        };
        let packed = layout::center_rows(packed, packer.width(), packer.height());

        let placements = packed
            .into_iter()
            .map(|rect| {
                let item = &items[rect.id];
                let fit = &fits[rect.id];
                ItemPlacement {
                    item_id: item.id.clone(),
                    item_name: item.display_name().to_string(),
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    length: rect.height,
                    rotated: rect.rotated,
                    orientation: fit.orientation,
                    orientation_label: fit.label().to_string(),
                    height_cm: fit.height,
                    warnings: item_warnings(fit, &limits, settings),
                }
            })
            .collect();

        Some(JointFit {
            limits,
            surface_width: packer.width(),
            surface_length: packer.height(),
            placements,
            total_weight,
        })
    }
}
