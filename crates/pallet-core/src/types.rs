use crate::fit::Orientation;
use crate::limits::{EffectiveLimits, Settings};
use crate::pricing::{PriceBreakdown, RateTable, Surcharges};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Furniture item to ship. Dimensions in centimetres, weight in kilograms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
}

impl Item {
    /// Name for messages, falling back to the id when no name was given.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Tariff category a pallet type is billed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateCategory {
    Quarter,
    Half,
    Euro,
    Industrial,
    Oversize,
}

/// Distance band selecting the price column of a rate tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBand {
    Local,
    Regional,
    National,
    LongHaul,
}

impl DistanceBand {
    /// Column index inside a rate tier's price list.
    pub fn index(self) -> usize {
        match self {
            DistanceBand::Local => 0,
            DistanceBand::Regional => 1,
            DistanceBand::National => 2,
            DistanceBand::LongHaul => 3,
        }
    }
}

/// Pallet type - one entry of the catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalletType {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Footprint length in metres
    pub length_m: f64,
    /// Footprint width in metres
    pub width_m: f64,
    pub max_height_cm: f64,
    pub max_weight_kg: f64,
    pub category: RateCategory,
}

impl PalletType {
    /// Footprint length rounded to whole centimetres.
    pub fn length_cm(&self) -> f64 {
        (self.length_m * 100.0).round()
    }

    /// Footprint width rounded to whole centimetres.
    pub fn width_cm(&self) -> f64 {
        (self.width_m * 100.0).round()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Transport-mode switches that tighten the pallet limits
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Delivery by 3.5-tonne van (caps height and weight)
    #[serde(default)]
    pub van35: bool,
    /// Delivery needs a tail lift (caps weight)
    #[serde(default)]
    pub lift_required: bool,
}

/// Per-request parameters besides the items themselves
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShipmentContext {
    pub distance_band: DistanceBand,
    #[serde(default)]
    pub options: TransportOptions,
}

/// Configuration bundle: pallet catalogue, rate table and surcharges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tariff {
    pub pallets: Vec<PalletType>,
    pub rates: RateTable,
    pub surcharges: Surcharges,
    #[serde(default)]
    pub settings: Settings,
}

/// Input for the single-item entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleItemRequest {
    #[serde(flatten)]
    pub context: ShipmentContext,
    pub item: Item,
}

/// Input for the multi-item entry point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiItemRequest {
    #[serde(flatten)]
    pub context: ShipmentContext,
    pub items: Vec<Item>,
}

/// Why a pallet type cannot carry an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    Overhang,
    HeightLimit,
    WeightLimit,
    NoRateMatch,
}

/// Priced offer of one pallet type for a single item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PalletQuote {
    pub pallet: PalletType,
    pub orientation: Orientation,
    pub orientation_label: String,
    pub rotated: bool,
    /// Height the item occupies above the pallet base
    pub item_height_cm: f64,
    pub limits: EffectiveLimits,
    pub price: PriceBreakdown,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedPallet {
    pub pallet_id: String,
    pub pallet_name: String,
    pub reasons: Vec<RejectionReason>,
}

/// Output of the single-item optimizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerResult {
    pub recommended: Option<PalletQuote>,
    pub alternatives: Vec<PalletQuote>,
    pub rejected: Vec<RejectedPallet>,
}

/// Placement of an item on a pallet surface.
///
/// `x` runs across the pallet width, `y` along its length. `width` and
/// `length` include the packaging margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPlacement {
    pub item_id: String,
    pub item_name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub length: f64,
    pub rotated: bool,
    pub orientation: Orientation,
    pub orientation_label: String,
    pub height_cm: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One loaded pallet of a multi-item shipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub pallet: PalletType,
    pub surface_width_cm: f64,
    pub surface_length_cm: f64,
    pub limits: EffectiveLimits,
    pub placements: Vec<ItemPlacement>,
    pub total_weight_kg: Decimal,
    pub price: PriceBreakdown,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnallocatedReason {
    NoFit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnallocatedItem {
    pub item_id: String,
    pub item_name: String,
    pub reason: UnallocatedReason,
}

/// Output of the multi-item allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiItemResult {
    pub allocations: Vec<Allocation>,
    pub pallet_count: u32,
    /// How many pallets of each type are needed
    pub pallets_required: HashMap<String, u32>,
    #[serde(with = "crate::pricing::fixed2")]
    pub total_gross: Decimal,
    pub unallocated: Vec<UnallocatedItem>,
    pub warnings: Vec<String>,
}

/// Error type for optimization
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error("At least one pallet type must be provided")]
    EmptyCatalogue,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot load tariff: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
