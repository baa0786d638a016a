//! Terminal rendering of the panel and the hourly chart.

use std::{collections::BTreeMap, fmt::Write as _, io};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};
use weather_core::{ChartRenderer, ChartSeries, CitySummary, Panel, RenderTarget};

const CHART_WIDTH: u16 = 64;
const CHART_HEIGHT: u16 = 12;

/// Render target for a terminal session.
///
/// Keeps every region in a [`Panel`] for [`format_panel`], and announces the
/// loading state on `status` as soon as the view switches it on, since the
/// panel itself is only printed once a lookup has finished.
#[derive(Debug)]
pub struct TerminalPanel<W = io::Stderr> {
    panel: Panel,
    status: W,
}

impl TerminalPanel {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: io::Write> TerminalPanel<W> {
    pub fn new(status: W) -> Self {
        Self {
            panel: Panel::default(),
            status,
        }
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }
}

impl<W: io::Write> RenderTarget for TerminalPanel<W> {
    fn set_loading(&mut self, loading: bool) {
        if loading && !self.panel.loading {
            // A closed stderr only loses the indicator.
            let _ = writeln!(self.status, "Loading...");
            let _ = self.status.flush();
        }
        self.panel.set_loading(loading);
    }

    fn show_error(&mut self, message: &str) {
        self.panel.show_error(message);
    }

    fn hide_error(&mut self) {
        self.panel.hide_error();
    }

    fn set_status(&mut self, status: &str) {
        self.panel.set_status(status);
    }

    fn set_sub_status(&mut self, sub_status: &str) {
        self.panel.set_sub_status(sub_status);
    }

    fn set_temperature(&mut self, text: &str) {
        self.panel.set_temperature(text);
    }

    fn set_wind(&mut self, text: &str) {
        self.panel.set_wind(text);
    }

    fn set_uv_index(&mut self, text: &str) {
        self.panel.set_uv_index(text);
    }

    fn set_location(&mut self, name: &str) {
        self.panel.set_location(name);
    }

    fn set_humidity(&mut self, text: &str) {
        self.panel.set_humidity(text);
    }

    fn set_details(&mut self, text: &str) {
        self.panel.set_details(text);
    }

    fn set_icon_url(&mut self, url: &str) {
        self.panel.set_icon_url(url);
    }

    fn set_other_cities(&mut self, cities: &[CitySummary]) {
        self.panel.set_other_cities(cities);
    }

    fn set_range_labels(&mut self, labels: Option<(&str, &str)>) {
        self.panel.set_range_labels(labels);
    }

    fn set_clock(&mut self, time: &str, date: &str) {
        self.panel.set_clock(time, date);
    }
}

/// Draws each chart with ratatui into an off-screen buffer and keeps the rows.
#[derive(Debug, Default)]
pub struct TextChart {
    next_id: u64,
    charts: BTreeMap<u64, Vec<String>>,
}

impl TextChart {
    /// Lines of the most recently drawn chart that is still alive.
    pub fn current(&self) -> Option<&[String]> {
        self.charts.values().next_back().map(Vec::as_slice)
    }

    pub fn live_count(&self) -> usize {
        self.charts.len()
    }
}

impl ChartRenderer for TextChart {
    type Handle = u64;

    fn render(&mut self, series: &ChartSeries) -> u64 {
        self.next_id += 1;
        self.charts.insert(self.next_id, draw(series));
        self.next_id
    }

    fn destroy(&mut self, handle: u64) {
        self.charts.remove(&handle);
    }
}

fn draw(series: &ChartSeries) -> Vec<String> {
    let mut lines = vec![series.label.clone()];

    let Some(range) = series.range() else {
        lines.push("  (no hourly data for today)".to_string());
        return lines;
    };

    let data: Vec<(f64, f64)> = series
        .temperatures()
        .into_iter()
        .enumerate()
        .map(|(i, t)| (i as f64, t))
        .collect();

    // Axes need a non-empty span on both bounds.
    let last_x = data.len().saturating_sub(1).max(1) as f64;
    let (low, high) = if range.high > range.low {
        (range.low, range.high)
    } else {
        (range.low - 1.0, range.high + 1.0)
    };

    let mut x_labels = series.labels();
    if x_labels.len() < 2 {
        x_labels.push("");
    }
    let y_labels = vec![format!("{low}°"), format!("{high}°")];

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .data(&data);
    let chart = Chart::new(vec![dataset])
        .x_axis(Axis::default().bounds([0.0, last_x]).labels(x_labels))
        .y_axis(Axis::default().bounds([low, high]).labels(y_labels));

    let area = Rect::new(0, 0, CHART_WIDTH, CHART_HEIGHT);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);

    lines.extend(buffer.content.chunks(usize::from(area.width)).map(|row| {
        row.iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
            .trim_end()
            .to_string()
    }));
    lines.extend(
        series
            .points
            .iter()
            .map(|point| format!("  {:>5}  {}", point.label, point.tooltip())),
    );

    lines
}

/// Everything the view wrote, laid out for a terminal.
pub fn format_panel(panel: &Panel, chart: Option<&[String]>) -> String {
    let mut out = String::new();

    if panel.loading {
        let _ = writeln!(out, "Loading...");
    }

    if let Some((time, date)) = &panel.clock {
        let _ = writeln!(out, "{date}  {time}");
    }

    if let Some(error) = &panel.error {
        let _ = writeln!(out, "Error: {error}");
    }

    if !panel.location.is_empty() {
        let _ = writeln!(out, "{}", panel.location);
        let _ = writeln!(
            out,
            "  {}  {} / {}",
            panel.temperature, panel.status, panel.sub_status
        );
        let _ = writeln!(
            out,
            "  {}   Humidity: {}   {}",
            panel.wind, panel.humidity, panel.uv_index
        );
        let _ = writeln!(out, "  {}", panel.details);
        let _ = writeln!(out, "  Icon: {}", panel.icon_url);
    }

    if !panel.other_cities.is_empty() {
        let cities: Vec<_> = panel.other_cities.iter().map(|c| c.label()).collect();
        let _ = writeln!(out, "Other cities: {}", cities.join("  "));
    }

    if let Some(lines) = chart {
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
    }

    if let Some((low, high)) = &panel.range_labels {
        let _ = writeln!(out, "{low}   {high}");
    }

    out
}
