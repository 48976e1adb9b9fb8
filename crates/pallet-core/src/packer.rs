//! MaxRects rectangle packer with the best-short-side-fit rule.

use std::cmp::Ordering;

/// Rectangle to place. `id` is a caller-defined key echoed in the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackItem {
    pub id: usize,
    pub width: f64,
    pub height: f64,
}

impl PackItem {
    fn long_side(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Placed rectangle in absolute surface coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedRect {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

impl PackedRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FreeRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl FreeRect {
    fn right(&self) -> f64 {
        self.x + self.width
    }

    fn bottom(&self) -> f64 {
        self.y + self.height
    }

    fn intersects(&self, used: &PackedRect) -> bool {
        used.x < self.right()
            && used.right() > self.x
            && used.y < self.bottom()
            && used.bottom() > self.y
    }

    fn contains(&self, other: &FreeRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Leftover score of a candidate placement: (short side, long side).
type FitScore = (f64, f64);

/// Packs rectangles onto a fixed surface.
///
/// The packer itself holds only the surface size; the free-rectangle list
/// lives inside a single [`RectanglePacker::pack`] call, so one instance can
/// be shared freely.
#[derive(Debug, Clone, Copy)]
pub struct RectanglePacker {
    width: f64,
    height: f64,
}

impl RectanglePacker {
    /// Creates a packer for a surface; both sides are rounded to integers.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.round(),
            height: height.round(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Places every item or returns `None`.
    ///
    /// Items are handled longest side first. A placement is never revisited,
    /// so an item that finds no room fails the whole batch.
    pub fn pack(&self, items: &[PackItem]) -> Option<Vec<PackedRect>> {
        let mut order: Vec<&PackItem> = items.iter().collect();
        order.sort_by(|a, b| {
            b.long_side()
                .partial_cmp(&a.long_side())
                .unwrap_or(Ordering::Equal)
        });

        let surface = FreeRect {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        };

        let (_, placed) = order.into_iter().try_fold(
            (vec![surface], Vec::with_capacity(items.len())),
            |(free, mut placed), item| {
                let rect = best_short_side_fit(&free, item)?;
                let free = prune_contained(split_free_rects(free, &rect));
                placed.push(rect);
                Some((free, placed))
            },
        )?;

        Some(placed)
    }
}

/// Finds the free rectangle leaving the smallest short-side leftover.
fn best_short_side_fit(free: &[FreeRect], item: &PackItem) -> Option<PackedRect> {
    let mut best: Option<(PackedRect, FitScore)> = None;

    for area in free {
        for (width, height, rotated) in [
            (item.width, item.height, false),
            (item.height, item.width, true),
        ] {
            if width > area.width || height > area.height {
                continue;
            }

            let leftover_w = area.width - width;
            let leftover_h = area.height - height;
            let score = (leftover_w.min(leftover_h), leftover_w.max(leftover_h));

            let better = match &best {
                None => true,
                Some((_, best_score)) => score < *best_score,
            };
            if better {
                best = Some((
                    PackedRect {
                        id: item.id,
                        x: area.x,
                        y: area.y,
                        width,
                        height,
                        rotated,
                    },
                    score,
                ));
            }
        }
    }

    best.map(|(rect, _)| rect)
}

/// Replaces every free rectangle hit by `used` with its maximal fragments.
fn split_free_rects(free: Vec<FreeRect>, used: &PackedRect) -> Vec<FreeRect> {
    let mut result = Vec::with_capacity(free.len() + 4);

    for area in free {
        if !area.intersects(used) {
            result.push(area);
            continue;
        }

        let fragments = [
            // left
            FreeRect {
                x: area.x,
                y: area.y,
                width: used.x - area.x,
                height: area.height,
            },
            // right
            FreeRect {
                x: used.right(),
                y: area.y,
                width: area.right() - used.right(),
                height: area.height,
            },
            // above
            FreeRect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: used.y - area.y,
            },
            // below
            FreeRect {
                x: area.x,
                y: used.bottom(),
                width: area.width,
                height: area.bottom() - used.bottom(),
            },
        ];

        result.extend(
            fragments
                .into_iter()
                .filter(|fragment| fragment.width > 0.0 && fragment.height > 0.0),
        );
    }

    result
}

/// Drops free rectangles lying wholly inside another one.
fn prune_contained(mut free: Vec<FreeRect>) -> Vec<FreeRect> {
    let mut i = 0;
    while i < free.len() {
        let mut j = i + 1;
        let mut removed = false;
        while j < free.len() {
            if free[j].contains(&free[i]) {
                free.remove(i);
                removed = true;
                break;
            }
            if free[i].contains(&free[j]) {
                free.remove(j);
            } else {
                j += 1;
            }
        }
        if !removed {
            i += 1;
        }
    }
    free
}
