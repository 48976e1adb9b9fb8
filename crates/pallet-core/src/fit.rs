//! Orientation fitting of a cuboid item on a pallet.

use serde::{Deserialize, Serialize};

/// Ways an item can rest on the pallet.
///
/// Declaration order is the order in which orientations are tried, so upright
/// orientations win over tilted ones whenever both fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    Normal,
    Rotated,
    TiltedOnSide,
    TiltedOnSideRotated,
    TiltedOnEnd,
    TiltedOnEndRotated,
}

impl Orientation {
    pub const ALL: [Orientation; 6] = [
        Orientation::Normal,
        Orientation::Rotated,
        Orientation::TiltedOnSide,
        Orientation::TiltedOnSideRotated,
        Orientation::TiltedOnEnd,
        Orientation::TiltedOnEndRotated,
    ];

    /// Maps `(length, width, height)` to `(footprint length, footprint width, height)`.
    pub fn apply(self, length: f64, width: f64, height: f64) -> (f64, f64, f64) {
        match self {
            Orientation::Normal => (length, width, height),
            Orientation::Rotated => (width, length, height),
            Orientation::TiltedOnSide => (length, height, width),
            Orientation::TiltedOnSideRotated => (height, length, width),
            Orientation::TiltedOnEnd => (width, height, length),
            Orientation::TiltedOnEndRotated => (height, width, length),
        }
    }

    pub fn is_tilted(self) -> bool {
        !matches!(self, Orientation::Normal | Orientation::Rotated)
    }

    pub fn is_rotated(self) -> bool {
        matches!(
            self,
            Orientation::Rotated
                | Orientation::TiltedOnSideRotated
                | Orientation::TiltedOnEndRotated
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Normal => "Upright",
            Orientation::Rotated => "Upright, turned 90°",
            Orientation::TiltedOnSide => "Tilted on its side",
            Orientation::TiltedOnSideRotated => "Tilted on its side, turned 90°",
            Orientation::TiltedOnEnd => "Standing on its end",
            Orientation::TiltedOnEndRotated => "Standing on its end, turned 90°",
        }
    }
}

/// Outcome of fitting one item; footprint values include the margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationFit {
    pub fits: bool,
    pub orientation: Orientation,
    pub rotated: bool,
    pub footprint_length: f64,
    pub footprint_width: f64,
    pub height: f64,
}

impl OrientationFit {
    pub fn label(&self) -> &'static str {
        self.orientation.label()
    }
}

/// Returns the first orientation (in [`Orientation::ALL`] order) that fits.
///
/// `margin` is added to both footprint dimensions, never to the height.
/// When nothing fits the result carries `fits: false` and the dimensions of
/// the upright orientation.
pub fn fit_orientation(
    length: f64,
    width: f64,
    height: f64,
    pallet_length: f64,
    pallet_width: f64,
    max_height: f64,
    margin: f64,
) -> OrientationFit {
    let candidate = |orientation: Orientation| {
        let (l, w, h) = orientation.apply(length, width, height);
        OrientationFit {
            fits: l + margin <= pallet_length && w + margin <= pallet_width && h <= max_height,
            orientation,
            rotated: orientation.is_rotated(),
            footprint_length: l + margin,
            footprint_width: w + margin,
            height: h,
        }
    };

    Orientation::ALL
        .into_iter()
        .map(candidate)
        .find(|fit| fit.fits)
        .unwrap_or_else(|| candidate(Orientation::Normal))
}

/// True when at least one orientation's footprint fits, ignoring height.
pub fn footprint_fits(
    length: f64,
    width: f64,
    height: f64,
    pallet_length: f64,
    pallet_width: f64,
    margin: f64,
) -> bool {
    fit_orientation(
        length,
        width,
        height,
        pallet_length,
        pallet_width,
        f64::INFINITY,
        margin,
    )
    .fits
}
