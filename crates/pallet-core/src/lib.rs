//! Pallet selection and pricing for furniture shipments.
//!
//! [`Optimizer::optimize`] ranks every pallet type for a single item;
//! [`Optimizer::optimize_multi_item`] spreads several items over the cheapest
//! set of pallets it finds, with a placement for each item.

pub mod fit;
pub mod limits;
pub mod optimizer;
pub mod packer;
pub mod pricing;
pub mod svg;
mod tariff;
pub mod types;

pub use fit::{fit_orientation, Orientation, OrientationFit};
pub use limits::{EffectiveLimits, Settings};
pub use optimizer::Optimizer;
pub use packer::{PackItem, PackedRect, RectanglePacker};
pub use pricing::{calculate_price, PriceBreakdown, RateTable, RateTier, Surcharges};
pub use svg::render_svg;
pub use types::*;
