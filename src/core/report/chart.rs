//! Grade distribution bar chart
//!
//! The histogram is drawn with a plotters `ChartBuilder` over a segmented x
//! axis (one segment per grade band) into an in-memory RGB buffer, then
//! encoded to PNG. The report picks the image up through [`ChartSurface`].

use crate::core::analytics::GradeDistribution;
use crate::core::error::{GradebookError, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::prelude::*;

/// Caption drawn above the bars
pub const CHART_TITLE: &str = "Number of Students per Percentage Range";

/// Smallest accepted chart side in pixels
pub const MIN_CHART_SIZE: u32 = 100;
/// Largest chart side in pixels; bigger requests are clamped
pub const MAX_CHART_SIZE: u32 = 4000;

const BAR_FILL: RGBColor = RGBColor(54, 162, 235);

const MARGIN: u32 = 10;
const LABEL_AREA: u32 = 40;
const BAR_MARGIN: u32 = 12;
/// Up to this many students every count gets its own y tick
const UNIT_TICK_LIMIT: usize = 10;

/// Anything the report can snapshot as a PNG image
pub trait ChartSurface {
    /// PNG bytes of the current chart, or `None` when it cannot be captured
    fn capture_image(&self) -> Option<Vec<u8>>;

    /// Pixel size of the captured image
    fn dimensions(&self) -> (u32, u32);
}

/// Bar chart of a course's grade distribution
#[derive(Debug, Clone)]
pub struct DistributionChart {
    distribution: GradeDistribution,
    width: u32,
    height: u32,
}

impl DistributionChart {
    /// Chart of `distribution` at `width` x `height` pixels
    ///
    /// Sides above [`MAX_CHART_SIZE`] are clamped.
    #[must_use]
    pub fn new(distribution: GradeDistribution, width: u32, height: u32) -> Self {
        Self {
            distribution,
            width: width.min(MAX_CHART_SIZE),
            height: height.min(MAX_CHART_SIZE),
        }
    }

    /// Top of the y axis: one above the largest band, so the tallest bar
    /// never touches the frame
    #[must_use]
    pub fn y_axis_max(&self) -> usize {
        self.distribution.max_count().max(1) + 1
    }

    /// Number of y labels; unit steps for small classes
    fn y_label_count(&self) -> usize {
        let top = self.y_axis_max();
        if top <= UNIT_TICK_LIMIT {
            top + 1
        } else {
            UNIT_TICK_LIMIT
        }
    }

    /// Rasterise the chart and encode it as PNG
    ///
    /// Text needs a system font. When none can be loaded the bars are drawn
    /// without caption or axis labels.
    ///
    /// # Errors
    /// Returns [`GradebookError::Chart`] if the size is below
    /// [`MIN_CHART_SIZE`] or drawing or encoding fails
    pub fn render_png(&self) -> Result<Vec<u8>> {
        if self.width < MIN_CHART_SIZE || self.height < MIN_CHART_SIZE {
            return Err(GradebookError::Chart(format!(
                "chart size {}x{} is below the {MIN_CHART_SIZE}px minimum",
                self.width, self.height
            )));
        }

        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        if let Err(e) = self.draw(&mut buffer, true) {
            crate::warn!("Chart labels could not be drawn ({e}), rendering bars only");
            buffer.fill(0);
            self.draw(&mut buffer, false)
                .map_err(|e| GradebookError::Chart(e.to_string()))?;
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(&buffer, self.width, self.height, ColorType::Rgb8)
            .map_err(|e| GradebookError::Chart(e.to_string()))?;
        Ok(png)
    }

    fn draw(&self, buffer: &mut [u8], labelled: bool) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let labels = self.distribution.labels;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(MARGIN);
        if labelled {
            builder
                .caption(CHART_TITLE, ("sans-serif", 18))
                .x_label_area_size(LABEL_AREA)
                .y_label_area_size(LABEL_AREA);
        }
        let mut chart =
            builder.build_cartesian_2d((0..labels.len()).into_segmented(), 0..self.y_axis_max())?;

        if labelled {
            chart
                .configure_mesh()
                .disable_x_mesh()
                .y_labels(self.y_label_count())
                .x_desc("Percentage")
                .y_desc("Students")
                .x_label_formatter(&|value| bucket_label(&labels, value))
                .draw()?;
        }

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BAR_FILL.filled())
                .margin(BAR_MARGIN)
                .data(self.distribution.data.iter().copied().enumerate()),
        )?;

        root.present()?;
        Ok(())
    }
}

/// Band label under a segment of the x axis
fn bucket_label(labels: &[&'static str], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i).copied().unwrap_or_default().to_string()
        }
        SegmentValue::Last => String::new(),
    }
}

impl ChartSurface for DistributionChart {
    fn capture_image(&self) -> Option<Vec<u8>> {
        match self.render_png() {
            Ok(png) => Some(png),
            Err(e) => {
                crate::debug!("Chart capture failed: {e}");
                None
            }
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
