//! Drawing the [`DotPlot`] into a PNG file
//!
//! The figure is 8 × 10 inches at 300 DPI: the data area and the color bar
//! fill the 8 inch width, the term labels extend it to the left. It is drawn
//! into an in-memory RGB buffer, cropped to the bounding box of everything
//! that is not background and then encoded.
use std::fmt::Display;
use std::path::Path;

use image::{imageops, RgbImage};
use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::plot::colormap::normalize;
use crate::plot::DotPlot;
use crate::{OraError, OraResult};

const DPI: f64 = 300.0;
/// Width of data area and color bar, the y labels are added on top of it
const FIGURE_WIDTH_INCHES: f64 = 8.0;
const FIGURE_HEIGHT_INCHES: f64 = 10.0;
const COLORBAR_WIDTH_INCHES: f64 = 1.4;
const PAD_INCHES: f64 = 0.1;

const FONT: &str = "sans-serif";
const TITLE_PT: f64 = 14.0;
const AXIS_DESC_PT: f64 = 12.0;
const TICK_PT: f64 = 10.0;

const TITLE: &str = "Most enriched GO terms (dot plot)";
const X_DESC: &str = "-log10(Adjusted P-value)";
const COLORBAR_DESC: &str = "Adjusted P-value";

const MARKER_ALPHA: f64 = 0.7;
const GRID_ALPHA: f64 = 0.3;
const COLORBAR_STEPS: u32 = 256;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Converts a length in points (1/72 inch) to pixels
fn px(points: f64) -> f64 {
    points * DPI / 72.0
}

/// Converts a length in points (1/72 inch) to whole pixels
fn px_u32(points: f64) -> u32 {
    // lengths are small, positive constants
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pixels = px(points).round() as u32;
    pixels
}

fn inches(value: f64) -> u32 {
    px_u32(value * 72.0)
}

/// Marker radius in pixels for a marker size given in pt²
///
/// The size is the square of the marker diameter, as in matplotlib's `s`.
fn marker_radius(area: f64) -> u32 {
    px_u32(area.sqrt() / 2.0)
}

/// Canvas size in pixels for a y label area of `label_width` pixels
fn canvas_size(label_width: u32) -> (u32, u32) {
    (
        label_width + inches(FIGURE_WIDTH_INCHES),
        inches(FIGURE_HEIGHT_INCHES),
    )
}

fn plot_error<E: Display>(err: E) -> OraError {
    OraError::Plot(err.to_string())
}

pub(super) fn draw(plot: &DotPlot, path: &Path) -> OraResult<()> {
    let tick_font = (FONT, px(TICK_PT)).into_font();
    let mut longest_label = 0;
    for row in plot.rows() {
        let (width, _) = tick_font.box_size(row.term()).map_err(plot_error)?;
        longest_label = longest_label.max(width);
    }
    let y_label_area = longest_label + px_u32(12.0);

    let colorbar_width = inches(COLORBAR_WIDTH_INCHES);
    let (width, height) = canvas_size(y_label_area);
    debug!("Drawing {} terms on a {}x{} canvas", plot.len(), width, height);

    let mut buffer = vec![255u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        let (dots, colorbar) = root.split_horizontally(width - colorbar_width);
        draw_dots(plot, &dots, y_label_area)?;
        draw_colorbar(plot, &colorbar)?;
        root.present().map_err(plot_error)?;
    }

    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| OraError::Plot("canvas buffer has the wrong size".to_string()))?;
    tight_crop(&image, inches(PAD_INCHES)).save(path)?;
    Ok(())
}

fn draw_dots(plot: &DotPlot, area: &Area, y_label_area: u32) -> OraResult<()> {
    let slots = i32::try_from(plot.len()).map_err(plot_error)?;
    let x_max = plot
        .rows()
        .iter()
        .map(|row| row.significance())
        .fold(0.0, f64::max);
    let x_range = 0.0..(x_max * 1.1).max(1.0);

    // integer ranges are inclusive, `0..slots - 1` has one segment per term
    let mut chart = ChartBuilder::on(area)
        .caption(TITLE, (FONT, px(TITLE_PT)))
        .margin(px_u32(8.0))
        .x_label_area_size(px_u32(40.0))
        .y_label_area_size(y_label_area)
        .build_cartesian_2d(x_range, (0..slots - 1).into_segmented())
        .map_err(plot_error)?;

    let term_label = |value: &SegmentValue<i32>| match value {
        SegmentValue::CenterOf(slot) => usize::try_from(*slot)
            .ok()
            .and_then(|idx| plot.rows().get(idx))
            .map(|row| row.term().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .bold_line_style(BLACK.mix(GRID_ALPHA))
        .light_line_style(TRANSPARENT)
        .y_labels(plot.len())
        .y_label_formatter(&term_label)
        .x_desc(X_DESC)
        .label_style((FONT, px(TICK_PT)))
        .axis_desc_style((FONT, px(AXIS_DESC_PT)))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(plot.rows().iter().zip(0..).map(|(row, slot)| {
            Circle::new(
                (row.significance(), SegmentValue::CenterOf(slot)),
                marker_radius(row.marker_area()),
                row.color().mix(MARKER_ALPHA).filled(),
            )
        }))
        .map_err(plot_error)?;
    Ok(())
}

fn draw_colorbar(plot: &DotPlot, area: &Area) -> OraResult<()> {
    let (min, max) = plot.pvalue_range();
    let (low, high) = if max > min {
        (min, max)
    } else if min > 0.0 {
        (min * 0.5, min * 1.5)
    } else {
        (0.0, 1.0)
    };

    let mut chart = ChartBuilder::on(area)
        .margin(px_u32(8.0))
        .margin_top(px_u32(TITLE_PT + 16.0))
        .x_label_area_size(px_u32(40.0))
        .y_label_area_size(px_u32(56.0))
        .build_cartesian_2d(0.0..1.0, low..high)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&|value: &f64| format!("{value:.1e}"))
        .y_desc(COLORBAR_DESC)
        .label_style((FONT, px(TICK_PT)))
        .axis_desc_style((FONT, px(AXIS_DESC_PT)))
        .draw()
        .map_err(plot_error)?;

    let colormap = plot.colormap();
    let step = (high - low) / f64::from(COLORBAR_STEPS);
    chart
        .draw_series((0..COLORBAR_STEPS).map(|idx| {
            let bottom = low + step * f64::from(idx);
            let top = bottom + step;
            let color = colormap.color(normalize((bottom + top) / 2.0, min, max));
            Rectangle::new([(0.0, bottom), (1.0, top)], color.mix(MARKER_ALPHA).filled())
        }))
        .map_err(plot_error)?;
    Ok(())
}

/// Crops the image to all non-white pixels, keeping `pad` pixels of margin
///
/// Fully white images are returned unchanged.
fn tight_crop(image: &RgbImage, pad: u32) -> RgbImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0 == [255, 255, 255] {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((left, top, right, bottom)) => {
                (left.min(x), top.min(y), right.max(x), bottom.max(y))
            }
        });
    }

    let Some((left, top, right, bottom)) = bounds else {
        return image.clone();
    };
    let left = left.saturating_sub(pad);
    let top = top.saturating_sub(pad);
    let right = right.saturating_add(pad).min(image.width() - 1);
    let bottom = bottom.saturating_add(pad).min(image.height() - 1);
    imageops::crop_imm(image, left, top, right - left + 1, bottom - top + 1).to_image()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::enrichment::{Enrichment, EnrichmentTable};
    use image::Rgb;

    #[test]
    fn crop_to_content_with_padding() {
        let mut image = RgbImage::from_pixel(100, 80, Rgb([255, 255, 255]));
        image.put_pixel(40, 30, Rgb([8, 48, 107]));
        image.put_pixel(60, 50, Rgb([0, 0, 0]));

        let cropped = tight_crop(&image, 5);
        assert_eq!(cropped.dimensions(), (31, 31));
        assert_eq!(cropped.get_pixel(5, 5), &Rgb([8, 48, 107]));
        assert_eq!(cropped.get_pixel(25, 25), &Rgb([0, 0, 0]));
    }

    #[test]
    fn padding_stops_at_the_border() {
        let mut image = RgbImage::from_pixel(20, 20, Rgb([255, 255, 255]));
        image.put_pixel(1, 18, Rgb([0, 0, 0]));

        let cropped = tight_crop(&image, 5);
        assert_eq!(cropped.dimensions(), (7, 7));
    }

    #[test]
    fn blank_image_is_unchanged() {
        let image = RgbImage::from_pixel(10, 12, Rgb([255, 255, 255]));
        assert_eq!(tight_crop(&image, 3).dimensions(), (10, 12));
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(inches(8.0), 2400);
        assert_eq!(inches(10.0), 3000);
        assert_eq!(px_u32(72.0), 300);
        // 50 pt² is a circle of ~3.5 pt radius
        assert_eq!(marker_radius(50.0), 15);
        assert_eq!(marker_radius(4.0), 4);
        assert_eq!(marker_radius(0.0), 0);
    }

    #[test]
    fn canvas_grows_with_labels() {
        assert_eq!(canvas_size(0), (2400, 3000));
        assert_eq!(canvas_size(512), (2912, 3000));
    }

    #[test]
    fn render_several_terms() {
        let table: EnrichmentTable = vec![
            Enrichment::new("respiratory chain complex IV (GO:0045277)", 0.0009, "COX4I2;ND1"),
            Enrichment::new("electron transport (GO:0006123)", 0.0128, "COX4I2"),
            Enrichment::new("cellular respiration (GO:0045333)", 0.0421, "ND1;ATP6"),
        ]
        .into_iter()
        .collect();
        let plot = DotPlot::from_table(&table);
        assert_eq!(plot.len(), 3);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dotplot.png");
        draw(&plot, &path).unwrap();

        let (width, height) = image::image_dimensions(&path).unwrap();
        assert!(width > 0 && height > 0);
        assert!(height <= 3000);
    }

    #[test]
    fn render_single_term() {
        let table: EnrichmentTable = vec![Enrichment::new(
            "cytochrome-c oxidase activity (GO:0004129)",
            0.01,
            "COX4I2",
        )]
        .into_iter()
        .collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dotplot.png");
        draw(&DotPlot::from_table(&table), &path).unwrap();
        assert!(path.is_file());
    }
}
