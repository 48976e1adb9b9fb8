use crate::types::{PalletType, TransportOptions};
use serde::{Deserialize, Serialize};

/// Tunable constants of the optimizer.
///
/// Every field has a default so a tariff file may omit the whole block or
/// override single values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Packaging bulk added to both footprint sides of every item
    pub packaging_margin_cm: f64,
    /// Height taken by the pallet itself
    pub pallet_base_cm: f64,
    pub absolute_max_height_cm: f64,
    pub absolute_max_weight_kg: f64,
    pub van_max_height_cm: f64,
    pub van_max_weight_kg: f64,
    pub lift_max_weight_kg: f64,
    /// Items whose height comes this close to the budget get a warning
    pub height_warning_cm: f64,
    /// Largest group size tried per pallet when splitting a shipment
    pub group_window: usize,
    /// Number of alternatives listed next to a recommendation
    pub alternatives: usize,
    /// Weight used to rank pallet types by price before allocating
    pub reference_weight_kg: f64,
}

impl Settings {
    pub const DEFAULT_PACKAGING_MARGIN_CM: f64 = 5.0;
    pub const DEFAULT_PALLET_BASE_CM: f64 = 15.0;
    pub const DEFAULT_ABSOLUTE_MAX_HEIGHT_CM: f64 = 220.0;
    pub const DEFAULT_ABSOLUTE_MAX_WEIGHT_KG: f64 = 1500.0;
    pub const DEFAULT_VAN_MAX_HEIGHT_CM: f64 = 180.0;
    pub const DEFAULT_VAN_MAX_WEIGHT_KG: f64 = 400.0;
    pub const DEFAULT_LIFT_MAX_WEIGHT_KG: f64 = 750.0;
    pub const DEFAULT_HEIGHT_WARNING_CM: f64 = 10.0;
    pub const DEFAULT_GROUP_WINDOW: usize = 4;
    pub const DEFAULT_ALTERNATIVES: usize = 3;
    pub const DEFAULT_REFERENCE_WEIGHT_KG: f64 = 50.0;
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            packaging_margin_cm: Self::DEFAULT_PACKAGING_MARGIN_CM,
            pallet_base_cm: Self::DEFAULT_PALLET_BASE_CM,
            absolute_max_height_cm: Self::DEFAULT_ABSOLUTE_MAX_HEIGHT_CM,
            absolute_max_weight_kg: Self::DEFAULT_ABSOLUTE_MAX_WEIGHT_KG,
            van_max_height_cm: Self::DEFAULT_VAN_MAX_HEIGHT_CM,
            van_max_weight_kg: Self::DEFAULT_VAN_MAX_WEIGHT_KG,
            lift_max_weight_kg: Self::DEFAULT_LIFT_MAX_WEIGHT_KG,
            height_warning_cm: Self::DEFAULT_HEIGHT_WARNING_CM,
            group_window: Self::DEFAULT_GROUP_WINDOW,
            alternatives: Self::DEFAULT_ALTERNATIVES,
            reference_weight_kg: Self::DEFAULT_REFERENCE_WEIGHT_KG,
        }
    }
}

/// Height and weight ceilings that apply to one pallet for one shipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveLimits {
    /// Total loaded height including the pallet base
    pub max_height_cm: f64,
    pub max_weight_kg: f64,
    /// Height left for the items once the pallet base is subtracted
    pub available_height_cm: f64,
}

impl EffectiveLimits {
    /// Combines absolute ceilings, the pallet's own limits and transport options.
    ///
    /// The van option wins over the lift option.
    pub fn for_pallet(pallet: &PalletType, options: &TransportOptions, settings: &Settings) -> Self {
        let mut max_height_cm = settings.absolute_max_height_cm.min(pallet.max_height_cm);
        let mut max_weight_kg = settings.absolute_max_weight_kg.min(pallet.max_weight_kg);

        if options.van35 {
            max_height_cm = max_height_cm.min(settings.van_max_height_cm);
            max_weight_kg = max_weight_kg.min(settings.van_max_weight_kg);
        } else if options.lift_required {
            max_weight_kg = max_weight_kg.min(settings.lift_max_weight_kg);
        }

        Self {
            max_height_cm,
            max_weight_kg,
            available_height_cm: max_height_cm - settings.pallet_base_cm,
        }
    }
}
