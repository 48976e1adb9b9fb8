use crate::types::MultiItemResult;
use std::fmt::Write;

const MARGIN: f64 = 20.0;
const SCALE: f64 = 2.0;
const PALLET_SPACING: f64 = 40.0;

/// Draws every allocation as a top view, pallets stacked vertically.
///
/// Pallet length runs down the page, width across; tilted items are drawn
/// in orange and marked with "(T)".
pub fn render_svg(result: &MultiItemResult) -> Result<String, std::fmt::Error> {
    let mut svg = String::new();

    let max_width = result
        .allocations
        .iter()
        .map(|a| a.surface_width_cm)
        .fold(0.0, f64::max);
    let total_length: f64 = result
        .allocations
        .iter()
        .map(|a| a.surface_length_cm + PALLET_SPACING)
        .sum();

    let svg_width = (max_width / SCALE) + (2.0 * MARGIN);
    let svg_height = (total_length / SCALE) + (3.0 * MARGIN);

    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )?;

    let mut y_offset = MARGIN;

    for (index, allocation) in result.allocations.iter().enumerate() {
        let x = MARGIN;
        let pallet_width = allocation.surface_width_cm / SCALE;
        let pallet_length = allocation.surface_length_cm / SCALE;

        writeln!(
            &mut svg,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#d7b98e" stroke="#6d4c2f" stroke-width="2"/>"##,
            x, y_offset, pallet_width, pallet_length
        )?;
        writeln!(
            &mut svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#333">#{} {}</text>"##,
            x,
            y_offset - 5.0,
            index + 1,
            escape(allocation.pallet.display_name())
        )?;

        for placement in &allocation.placements {
            let px = x + (placement.x / SCALE);
            let py = y_offset + (placement.y / SCALE);
            let pw = placement.width / SCALE;
            let ph = placement.length / SCALE;
            let (fill, stroke) = if placement.orientation.is_tilted() {
                ("#FF9800", "#E65100")
            } else {
                ("#4CAF50", "#2E7D32")
            };

            writeln!(
                &mut svg,
                r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="1" opacity="0.8"/>"##,
                px, py, pw, ph, fill, stroke
            )?;

            let label = if placement.orientation.is_tilted() {
                format!("{} (T)", placement.item_name)
            } else {
                placement.item_name.clone()
            };
            writeln!(
                &mut svg,
                r##"  <text x="{}" y="{}" font-family="Arial" font-size="9" fill="#fff" text-anchor="middle">{}</text>"##,
                px + pw / 2.0,
                py + ph / 2.0 + 3.0,
                escape(&label)
            )?;
        }

        y_offset += pallet_length + PALLET_SPACING / SCALE;
    }

    writeln!(
        &mut svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#666">Pallets: {} | Total: {:.2}</text>"##,
        MARGIN,
        svg_height - MARGIN / 2.0,
        result.pallet_count,
        result.total_gross
    )?;
    writeln!(&mut svg, "</svg>")?;

    Ok(svg)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
