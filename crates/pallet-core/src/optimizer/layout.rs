use crate::packer::PackedRect;
use std::cmp::Ordering;

/// Centers a packed layout on the pallet surface.
///
/// Rectangles whose vertical extents overlap form a row; each row is centered
/// across the surface width on its own, then the whole layout is centered
/// along the surface length. Rows never share a y range, so shifting them
/// sideways cannot create overlaps.
pub(super) fn center_rows(
    mut rects: Vec<PackedRect>,
    surface_width: f64,
    surface_length: f64,
) -> Vec<PackedRect> {
    if rects.is_empty() {
        return rects;
    }

    for row in rows_by_y_overlap(&rects) {
        let min_x = row.iter().map(|&i| rects[i].x).fold(f64::INFINITY, f64::min);
        let max_x = row
            .iter()
            .map(|&i| rects[i].right())
            .fold(f64::NEG_INFINITY, f64::max);
        let shift = (surface_width - (max_x - min_x)) / 2.0 - min_x;
        for &i in &row {
            rects[i].x += shift;
        }
    }

    let min_y = rects.iter().map(|r| r.y).fold(f64::INFINITY, f64::min);
    let max_y = rects
        .iter()
        .map(PackedRect::bottom)
        .fold(f64::NEG_INFINITY, f64::max);
    let shift = (surface_length - (max_y - min_y)) / 2.0 - min_y;
    for rect in &mut rects {
        rect.y += shift;
    }

    rects
}

/// Groups indices into connected components of overlapping y ranges.
fn rows_by_y_overlap(rects: &[PackedRect]) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| rects[a].y.partial_cmp(&rects[b].y).unwrap_or(Ordering::Equal));

    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut row_bottom = f64::NEG_INFINITY;
    for i in order {
        match rows.last_mut() {
            Some(row) if rects[i].y < row_bottom => {
                row.push(i);
                row_bottom = row_bottom.max(rects[i].bottom());
            }
            _ => {
                rows.push(vec![i]);
                row_bottom = rects[i].bottom();
            }
        }
    }
    rows
}
