//! Detector focal-plane plotting.
//!
//! Renders the detectors of a hardware model into a chart: one circle per
//! detector colored by band, a tick through each center showing the
//! polarization angle, and optional pixel/polarization labels. Output is
//! SVG or PNG, chosen by the output file extension.

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

use crate::model::{Hardware, Polarization};
use crate::sim::layout::{quat_from_array, quat_to_xieta};

/// Errors raised while plotting.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("hardware model contains no detectors")]
    Empty,
    #[error("unsupported plot format {0:?} (use .svg or .png)")]
    UnsupportedFormat(String),
    #[error("render failed: {0}")]
    Render(String),
}

/// Plot window and annotation options.
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    /// Plot width in degrees; derived from the detector extent if unset
    pub width: Option<f64>,
    /// Plot height in degrees; derived from the detector extent if unset
    pub height: Option<f64>,
    /// Annotate with pixel and polarization labels
    pub labels: bool,
}

/// Fixed per-band color palette, cycled in sorted band order.
const BAND_COLORS: [RGBColor; 10] = [
    RGBColor(66, 133, 244),
    RGBColor(219, 68, 55),
    RGBColor(244, 180, 0),
    RGBColor(15, 157, 88),
    RGBColor(171, 71, 188),
    RGBColor(0, 172, 193),
    RGBColor(255, 112, 67),
    RGBColor(158, 157, 36),
    RGBColor(92, 107, 192),
    RGBColor(240, 98, 146),
];

/// One detector prepared for drawing.
struct PlotDet {
    xi: f64,
    eta: f64,
    gamma: f64,
    radius: f64,
    band_idx: usize,
    pol: Polarization,
    pixel_label: Option<String>,
}

/// Everything the renderer needs, precomputed from the model.
struct Scene {
    dets: Vec<PlotDet>,
    bands: Vec<String>,
    x_range: (f64, f64),
    y_range: (f64, f64),
    size_px: (u32, u32),
    px_per_deg: f64,
}

const PLOT_WIDTH_PX: u32 = 1200;
/// Fraction of the canvas left for the plotting area after margins.
const INNER_FRACTION: f64 = 0.85;

impl Scene {
    fn build(hw: &Hardware, opts: &PlotOptions) -> Result<Self, PlotError> {
        if hw.detectors.is_empty() {
            return Err(PlotError::Empty);
        }

        let bands: Vec<String> = {
            let mut bands: Vec<String> =
                hw.detectors.values().map(|d| d.band.clone()).collect();
            bands.sort();
            bands.dedup();
            bands
        };

        let mut dets = Vec::with_capacity(hw.detectors.len());
        for det in hw.detectors.values() {
            let q = quat_from_array(&det.quat);
            let (xi, eta, gamma) = quat_to_xieta(&q);

            // circle radius from the wafer pitch through the tube platescale
            let radius = hw
                .wafers
                .get(&det.wafer_slot)
                .and_then(|wafer| {
                    hw.tubes
                        .get(&wafer.tube)
                        .map(|tube| wafer.pixel_pitch_mm * tube.platescale / 2.0 * 0.85)
                })
                .unwrap_or(0.05);

            // label each pixel once, at its lower-band A detector
            let pixel_label = if det.pol == Polarization::A
                && hw
                    .wafers
                    .get(&det.wafer_slot)
                    .map(|wafer| wafer.bands.first() == Some(&det.band))
                    .unwrap_or(false)
            {
                Some(format!("{}_p{:03}", det.wafer_slot, det.pixel))
            } else {
                None
            };

            let band_idx = bands
                .iter()
                .position(|b| *b == det.band)
                .unwrap_or(0);
            dets.push(PlotDet {
                xi: xi.to_degrees(),
                eta: eta.to_degrees(),
                gamma,
                radius,
                band_idx,
                pol: det.pol,
                pixel_label,
            });
        }

        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for d in &dets {
            x_min = x_min.min(d.xi - d.radius);
            x_max = x_max.max(d.xi + d.radius);
            y_min = y_min.min(d.eta - d.radius);
            y_max = y_max.max(d.eta + d.radius);
        }

        let cx = (x_min + x_max) / 2.0;
        let cy = (y_min + y_max) / 2.0;
        let width = opts.width.unwrap_or(((x_max - x_min) * 1.1).max(0.1));
        let height = opts.height.unwrap_or(((y_max - y_min) * 1.1).max(0.1));

        let height_px = ((PLOT_WIDTH_PX as f64) * height / width)
            .round()
            .clamp(200.0, 3000.0) as u32;

        Ok(Self {
            dets,
            bands,
            x_range: (cx - width / 2.0, cx + width / 2.0),
            y_range: (cy - height / 2.0, cy + height / 2.0),
            size_px: (PLOT_WIDTH_PX, height_px),
            px_per_deg: (PLOT_WIDTH_PX as f64) / width * INNER_FRACTION,
        })
    }
}

fn band_color(idx: usize) -> RGBColor {
    BAND_COLORS[idx % BAND_COLORS.len()]
}

/// Plot the detectors of a model into `path`.
///
/// The output format follows the file extension: `.svg` or `.png`.
pub fn plot_detectors(hw: &Hardware, path: &Path, opts: &PlotOptions) -> Result<(), PlotError> {
    let scene = Scene::build(hw, opts)?;
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "svg" => {
            let root = SVGBackend::new(path, scene.size_px).into_drawing_area();
            render(&root, &scene, opts.labels)?;
            root.present().map_err(|e| PlotError::Render(e.to_string()))
        }
        "png" => {
            let root = BitMapBackend::new(path, scene.size_px).into_drawing_area();
            render(&root, &scene, opts.labels)?;
            root.present().map_err(|e| PlotError::Render(e.to_string()))
        }
        other => Err(PlotError::UnsupportedFormat(other.to_string())),
    }
}

fn render<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    labels: bool,
) -> Result<(), PlotError>
where
    DB::ErrorType: 'static,
{
    let err = |e: DrawingAreaErrorKind<DB::ErrorType>| PlotError::Render(e.to_string());

    root.fill(&WHITE).map_err(err)?;

    let mut chart = ChartBuilder::on(root)
        .caption("Detector focal plane", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(
            scene.x_range.0..scene.x_range.1,
            scene.y_range.0..scene.y_range.1,
        )
        .map_err(err)?;

    chart
        .configure_mesh()
        .x_desc("Xi (degrees)")
        .y_desc("Eta (degrees)")
        .light_line_style(BLACK.mix(0.08))
        .draw()
        .map_err(err)?;

    // one series per band so the legend carries the band names
    for (idx, band) in scene.bands.iter().enumerate() {
        let color = band_color(idx);
        chart
            .draw_series(
                scene
                    .dets
                    .iter()
                    .filter(|d| d.band_idx == idx)
                    .map(|d| {
                        let r_px = (d.radius * scene.px_per_deg).round().max(1.0) as i32;
                        Circle::new((d.xi, d.eta), r_px, color.mix(0.45).filled())
                    }),
            )
            .map_err(err)?
            .label(band.clone())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    // polarization ticks through each detector center
    chart
        .draw_series(scene.dets.iter().map(|d| {
            let dx = 0.8 * d.radius * d.gamma.cos();
            let dy = 0.8 * d.radius * d.gamma.sin();
            PathElement::new(
                vec![(d.xi - dx, d.eta - dy), (d.xi + dx, d.eta + dy)],
                BLACK.mix(0.7),
            )
        }))
        .map_err(err)?;

    if labels {
        chart
            .draw_series(scene.dets.iter().map(|d| {
                let dx = 0.35 * d.radius * d.gamma.cos();
                let dy = 0.35 * d.radius * d.gamma.sin();
                Text::new(
                    d.pol.to_string(),
                    (d.xi + dx, d.eta + dy),
                    ("sans-serif", 9).into_font(),
                )
            }))
            .map_err(err)?;
        chart
            .draw_series(
                scene
                    .dets
                    .iter()
                    .filter_map(|d| d.pixel_label.as_ref().map(|label| (d, label)))
                    .map(|(d, label)| {
                        Text::new(
                            label.clone(),
                            (d.xi, d.eta + 1.15 * d.radius),
                            ("sans-serif", 9).into_font(),
                        )
                    }),
            )
            .map_err(err)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.4))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{nominal, sim_telescope_detectors};

    #[test]
    fn test_empty_model_is_an_error() {
        let hw = Hardware::new();
        let opts = PlotOptions::default();
        assert!(matches!(
            Scene::build(&hw, &opts),
            Err(PlotError::Empty)
        ));
    }

    #[test]
    fn test_scene_window_from_options() {
        let mut hw = nominal();
        sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        let opts = PlotOptions {
            width: Some(40.0),
            height: Some(20.0),
            labels: false,
        };
        let scene = Scene::build(&hw, &opts).unwrap();
        assert!((scene.x_range.1 - scene.x_range.0 - 40.0).abs() < 1e-9);
        assert!((scene.y_range.1 - scene.y_range.0 - 20.0).abs() < 1e-9);
        // aspect ratio carries into the canvas size
        assert_eq!(scene.size_px.0, 1200);
        assert_eq!(scene.size_px.1, 600);
    }

    #[test]
    fn test_scene_window_defaults_cover_detectors() {
        let mut hw = nominal();
        sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        let scene = Scene::build(&hw, &PlotOptions::default()).unwrap();
        for d in &scene.dets {
            assert!(d.xi > scene.x_range.0 && d.xi < scene.x_range.1);
            assert!(d.eta > scene.y_range.0 && d.eta < scene.y_range.1);
        }
    }

    #[test]
    fn test_pixel_labeled_once() {
        let mut hw = nominal();
        sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        let scene = Scene::build(&hw, &PlotOptions::default()).unwrap();
        let labeled = scene.dets.iter().filter(|d| d.pixel_label.is_some()).count();
        // one label per optical pixel: 7 LF wafers of 37 pixels
        assert_eq!(labeled, 7 * 37);
    }

    #[test]
    fn test_unsupported_format() {
        let mut hw = nominal();
        sim_telescope_detectors(&mut hw, "SAT3").unwrap();
        let result = plot_detectors(
            &hw,
            Path::new("/tmp/out.pdf"),
            &PlotOptions::default(),
        );
        assert!(matches!(result, Err(PlotError::UnsupportedFormat(_))));
    }
}
