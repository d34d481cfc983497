use crate::models::ChartView;
use crate::ui::escape_html;
use chrono::{DateTime, Local};
use std::fmt::Write;

pub const Y_MIN: f64 = 0.0;
pub const Y_MAX: f64 = 100.0;
pub const AXIS_TITLE: &str = "Demand %";
pub const DATASET_LABEL: &str = "Predicted Demand (%)";

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 260.0;
const PADDING_LEFT: f64 = 56.0;
const PADDING_RIGHT: f64 = 20.0;
const PADDING_Y: f64 = 34.0;
const TOP: f64 = 24.0;
const MAX_X_LABELS: usize = 12;

/// Append-only (label, value) history of predictions.
#[derive(Debug, Clone, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub recorded_at: Vec<DateTime<Local>>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub y_min: f64,
    pub y_max: f64,
    pub axis_title: &'static str,
    pub dataset_label: &'static str,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            y_min: Y_MIN,
            y_max: Y_MAX,
            axis_title: AXIS_TITLE,
            dataset_label: DATASET_LABEL,
        }
    }
}

/// A drawn bar chart. Its data arrays are rebound on every redraw; the
/// config never changes after construction.
#[derive(Debug, Clone)]
pub struct BarChart {
    config: ChartConfig,
    labels: Vec<String>,
    values: Vec<f64>,
    recorded_at: Vec<DateTime<Local>>,
    revision: u64,
}

impl BarChart {
    fn new(config: ChartConfig, series: &ChartSeries) -> Self {
        Self {
            config,
            labels: series.labels.clone(),
            values: series.values.clone(),
            recorded_at: series.recorded_at.clone(),
            revision: 1,
        }
    }

    fn update(&mut self, series: &ChartSeries) {
        self.labels.clone_from(&series.labels);
        self.values.clone_from(&series.values);
        self.recorded_at.clone_from(&series.recorded_at);
        self.revision += 1;
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn to_svg(&self) -> String {
        render_bars(&self.config, &self.labels, &self.values, &self.recorded_at)
    }
}

#[derive(Debug, Default)]
pub struct ChartSeriesUpdater {
    series: ChartSeries,
    chart: Option<BarChart>,
}

impl ChartSeriesUpdater {
    pub fn next_label(&self) -> String {
        format!("P{}", self.series.len() + 1)
    }

    pub fn append(&mut self, label: String, value: f64, recorded_at: DateTime<Local>) {
        self.series.labels.push(label);
        self.series.values.push(value);
        self.series.recorded_at.push(recorded_at);
    }

    pub fn render(&mut self) {
        match self.chart.as_mut() {
            Some(chart) => chart.update(&self.series),
            None => self.chart = Some(BarChart::new(ChartConfig::default(), &self.series)),
        }
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn chart(&self) -> Option<&BarChart> {
        self.chart.as_ref()
    }

    pub fn view(&self) -> ChartView {
        ChartView {
            labels: self.series.labels.clone(),
            values: self.series.values.clone(),
            revision: self.chart.as_ref().map_or(0, BarChart::revision),
        }
    }

    /// SVG body for the chart element; a placeholder until the first render.
    pub fn to_svg(&self) -> String {
        match &self.chart {
            Some(chart) => chart.to_svg(),
            None => empty_chart(),
        }
    }
}

fn empty_chart() -> String {
    r#"<text class="chart-label" x="50%" y="50%" text-anchor="middle">No predictions yet</text>"#
        .to_string()
}

fn render_bars(
    config: &ChartConfig,
    labels: &[String],
    values: &[f64],
    recorded_at: &[DateTime<Local>],
) -> String {
    if values.is_empty() {
        return empty_chart();
    }

    let range = config.y_max - config.y_min;
    let plot_width = WIDTH - PADDING_LEFT - PADDING_RIGHT;
    let scale_y = (HEIGHT - TOP - PADDING_Y) / range;
    let y = |value: f64| HEIGHT - PADDING_Y - (value.clamp(config.y_min, config.y_max) - config.y_min) * scale_y;
    let slot = plot_width / values.len() as f64;
    let bar_width = (slot * 0.7).max(1.0);

    let mut svg = String::new();

    let ticks = 4;
    for i in 0..=ticks {
        let value = config.y_min + range * f64::from(i) / f64::from(ticks);
        let y_pos = y(value);
        let _ = write!(
            svg,
            r#"<line class="chart-grid" x1="{PADDING_LEFT}" y1="{y_pos:.2}" x2="{x2}" y2="{y_pos:.2}" /><text class="chart-label" x="{lx}" y="{ty:.2}" text-anchor="end">{value}</text>"#,
            x2 = WIDTH - PADDING_RIGHT,
            lx = PADDING_LEFT - 10.0,
            ty = y_pos + 4.0,
        );
    }

    let _ = write!(
        svg,
        r#"<text class="chart-title" x="14" y="{mid:.2}" text-anchor="middle" transform="rotate(-90 14 {mid:.2})">{title}</text>"#,
        mid = (TOP + HEIGHT - PADDING_Y) / 2.0,
        title = escape_html(config.axis_title),
    );

    let label_every = values.len().div_ceil(MAX_X_LABELS).max(1);
    for (index, (label, value)) in labels.iter().zip(values).enumerate() {
        let center = PADDING_LEFT + slot * (index as f64 + 0.5);
        let top = y(*value);
        let height = (HEIGHT - PADDING_Y) - top;
        let when = recorded_at
            .get(index)
            .map(|at| at.format(" at %H:%M:%S").to_string())
            .unwrap_or_default();
        let _ = write!(
            svg,
            r#"<rect class="chart-bar" x="{x:.2}" y="{top:.2}" width="{bar_width:.2}" height="{height:.2}"><title>{label}: {value}{when}</title></rect>"#,
            x = center - bar_width / 2.0,
            label = escape_html(label),
        );
        if index % label_every == 0 {
            let _ = write!(
                svg,
                r#"<text class="chart-label" x="{center:.2}" y="{ly}" text-anchor="middle">{label}</text>"#,
                ly = HEIGHT - PADDING_Y + 18.0,
                label = escape_html(label),
            );
        }
    }

    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(updater: &mut ChartSeriesUpdater, value: f64) {
        let label = updater.next_label();
        updater.append(label, value, Local::now());
        updater.render();
    }

    #[test]
    fn labels_are_sequential() {
        let mut updater = ChartSeriesUpdater::default();
        for value in [73.2, 73.2, 0.0, 99.0] {
            push(&mut updater, value);
        }
        assert_eq!(updater.series().labels, vec!["P1", "P2", "P3", "P4"]);
        assert_eq!(updater.series().values, vec![73.2, 73.2, 0.0, 99.0]);
    }

    #[test]
    fn first_render_builds_chart_then_redraws_in_place() {
        let mut updater = ChartSeriesUpdater::default();
        assert!(updater.chart().is_none());
        assert!(updater.to_svg().contains("No predictions yet"));

        push(&mut updater, 40.0);
        let chart = updater.chart().expect("chart after first render");
        assert_eq!(chart.revision(), 1);
        assert_eq!(chart.config(), &ChartConfig::default());

        push(&mut updater, 60.0);
        let chart = updater.chart().unwrap();
        assert_eq!(chart.revision(), 2);
        assert_eq!(chart.config().y_max, 100.0);
        assert_eq!(updater.view().labels, vec!["P1", "P2"]);
        assert_eq!(updater.view().revision, 2);
    }

    #[test]
    fn svg_has_one_bar_per_point_and_fixed_axis() {
        let mut updater = ChartSeriesUpdater::default();
        push(&mut updater, 25.0);
        push(&mut updater, 150.0);
        push(&mut updater, -5.0);

        let svg = updater.to_svg();
        assert_eq!(svg.matches("<rect class=\"chart-bar\"").count(), 3);
        assert!(svg.contains("Demand %"));
        assert!(svg.contains(">100</text>"));
        assert!(svg.contains(">0</text>"));
        // clamped to the top of the axis
        assert!(svg.contains(&format!("y=\"{TOP:.2}\"")));
        assert!(svg.contains("P2: 150"));
    }

    #[test]
    fn crowded_x_labels_are_thinned() {
        let mut updater = ChartSeriesUpdater::default();
        for _ in 0..30 {
            push(&mut updater, 50.0);
        }
        let svg = updater.to_svg();
        assert_eq!(svg.matches("<rect class=\"chart-bar\"").count(), 30);
        assert!(svg.contains(">P1</text>"));
        assert!(!svg.contains(">P2</text>"));
        assert!(svg.contains(">P4</text>"));
    }
}
