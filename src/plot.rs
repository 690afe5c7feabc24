use std::path::Path;

use log::info;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use crate::error::{HeartError, Result};

pub const DEFAULT_PLOT_PATH: &str = "actual_vs_predicted.png";

const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// Bundled so that captions and axis labels render without system fonts.
static SANS_SERIF: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

fn register_fonts() -> Result<()> {
    /* Re-registering replaces the same entry, so every plot call may do it */
    register_font("sans-serif", FontStyle::Normal, SANS_SERIF)
        .map_err(|_| HeartError::Plot("bundled font is not a valid OpenType file".to_string()))
}

/// Scatter of actual against predicted labels, one column per test sample.
pub fn actual_vs_predicted(path: &Path, actual: &[i32], predicted: &[i32]) -> Result<()> {
    register_fonts()?;
    draw(path, actual, predicted).map_err(|e| HeartError::Plot(e.to_string()))?;
    info!("plot saved to {:?}", path);
    Ok(())
}

fn draw(
    path: &Path,
    actual: &[i32],
    predicted: &[i32],
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let samples = actual.len().max(predicted.len()).max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Actual vs Predicted - Heart Disease Risk (First {} Samples)",
                samples
            ),
            ("sans-serif", 20).into_font(),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(-1f64..samples as f64, -0.5f64..1.5f64)?;

    chart
        .configure_mesh()
        .x_desc("Sample Index")
        .y_desc("Disease Presence (0 or 1)")
        .y_labels(3)
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart
        .draw_series(
            actual
                .iter()
                .enumerate()
                .map(|(i, v)| Circle::new((i as f64, f64::from(*v)), 6, BLUE.filled())),
        )?
        .label("Actual")
        .legend(|(x, y)| Circle::new((x + 10, y), 6, BLUE.filled()));

    chart
        .draw_series(
            predicted
                .iter()
                .enumerate()
                .map(|(i, v)| Cross::new((i as f64, f64::from(*v)), 6, ORANGE.stroke_width(2))),
        )?
        .label("Predicted")
        .legend(|(x, y)| Cross::new((x + 10, y), 6, ORANGE.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Width and height from the IHDR chunk of a PNG file.
    pub(crate) fn png_dimensions(path: &Path) -> (u32, u32) {
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(&bytes[12..16], b"IHDR");
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        (width, height)
    }

    #[test]
    fn writes_a_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_PLOT_PATH);
        actual_vs_predicted(&path, &[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap();

        assert_eq!(png_dimensions(&path), (1200, 600));
    }

    #[test]
    fn labelled_plot_differs_from_blank_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let labelled = dir.path().join("labelled.png");
        let actual: Vec<i32> = (0..50).map(|i| i % 2).collect();
        let predicted: Vec<i32> = (0..50).map(|i| (i / 3) % 2).collect();
        actual_vs_predicted(&labelled, &actual, &predicted).unwrap();

        let blank = dir.path().join("blank.png");
        let root = BitMapBackend::new(&blank, (1200, 600)).into_drawing_area();
        root.fill(&WHITE).unwrap();
        root.present().unwrap();
        drop(root);

        let labelled_bytes = std::fs::read(&labelled).unwrap();
        let blank_bytes = std::fs::read(&blank).unwrap();
        assert!(labelled_bytes.len() > blank_bytes.len());
    }

    #[test]
    fn empty_series_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        actual_vs_predicted(&path, &[], &[]).unwrap();
        assert_eq!(png_dimensions(&path), (1200, 600));
    }
}
