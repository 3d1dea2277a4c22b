use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Row, Table, Widget},
};

use crate::constants::{CHART_BAR_RESOLUTION, CHART_BAR_WIDTH, PREVIEW_MAX_COLUMN_WIDTH};
use crate::tabular::{Cell as DataCell, Chart, Dataset};

const SERIES_COLORS: [Color; 2] = [Color::Cyan, Color::Yellow];

/// Bordered table of a dataset's rows with a leading row-number column
pub struct PreviewTable<'a> {
    pub dataset: &'a Dataset,
    pub title: &'a str,
}

impl<'a> PreviewTable<'a> {
    fn column_widths(&self) -> Vec<u16> {
        let index_width = self.dataset.height().saturating_sub(1).to_string().len().max(1);
        let mut widths = vec![index_width as u16];

        for (idx, column) in self.dataset.columns().iter().enumerate() {
            let longest = self
                .dataset
                .column_values(idx)
                .map(|cell| cell.to_string().chars().count())
                .chain(std::iter::once(column.name.chars().count()))
                .max()
                .unwrap_or(1);
            widths.push((longest as u16).clamp(3, PREVIEW_MAX_COLUMN_WIDTH));
        }
        widths
    }

    /// (width, height) needed to show every row without truncation
    pub fn size_hint(&self) -> (u16, u16) {
        let widths = self.column_widths();
        // Borders plus one space between columns
        let width = widths
            .iter()
            .fold(1u16, |acc, w| acc.saturating_add(*w).saturating_add(1));
        let height = u16::try_from(self.dataset.height())
            .unwrap_or(u16::MAX)
            .saturating_add(3);
        (width, height)
    }
}

impl<'a> Widget for PreviewTable<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Columns past the right border are not laid out at all
        let column_widths = self.column_widths();
        let visible = column_widths
            .iter()
            .scan(1u16, |end, w| {
                *end = end.saturating_add(*w).saturating_add(1);
                Some(*end)
            })
            .take_while(|end| *end <= area.width)
            .count()
            .max(1);

        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(self.dataset.columns().iter().map(|c| Cell::from(c.name.clone())))
                .take(visible),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.dataset.rows().iter().enumerate().map(|(idx, row)| {
            let index = Cell::from(idx.to_string()).style(Style::default().fg(Color::DarkGray));
            Row::new(std::iter::once(index).chain(row.iter().map(|cell| match cell {
                DataCell::Missing => {
                    Cell::from(cell.to_string()).style(Style::default().fg(Color::DarkGray))
                }
                _ => Cell::from(cell.to_string()),
            }))
            .take(visible))
        });

        let widths: Vec<Constraint> = column_widths
            .into_iter()
            .take(visible)
            .map(Constraint::Length)
            .collect();

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .title(self.title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        Widget::render(table, area, buf);
    }
}

/// Grouped bar chart: one group per row, one bar per charted column
pub struct ChartView<'a> {
    pub chart: &'a Chart,
    pub title: &'a str,
    pub max_rows: usize,
}

impl<'a> ChartView<'a> {
    fn rows_shown(&self) -> usize {
        self.chart.row_count().min(self.max_rows)
    }

    fn bar_width(&self) -> u16 {
        let longest = self
            .chart
            .series
            .iter()
            .flat_map(|s| s.values.iter().take(self.max_rows))
            .map(|v| format_value(*v).len())
            .max()
            .unwrap_or(0) as u16;
        longest.clamp(CHART_BAR_WIDTH, 8)
    }

    /// Width needed for the shown rows
    pub fn width_hint(&self) -> u16 {
        let groups = u16::try_from(self.rows_shown()).unwrap_or(u16::MAX);
        let bars = self.chart.series.len() as u16;
        let group_width = bars * self.bar_width() + bars.saturating_sub(1);
        let legend = u16::try_from(self.legend().chars().count())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        groups
            .saturating_mul(group_width)
            .saturating_add(groups.saturating_sub(1).saturating_mul(2))
            .saturating_add(2)
            .max(legend)
    }

    /// Largest positive value among the shown rows
    fn peak(&self) -> Option<f64> {
        self.chart
            .series
            .iter()
            .flat_map(|s| s.values.iter().take(self.max_rows).flatten())
            .copied()
            .filter(|v| v.is_finite() && *v > 0.0)
            .reduce(f64::max)
    }

    fn legend(&self) -> String {
        let names: Vec<&str> = self.chart.series.iter().map(|s| s.name.as_str()).collect();
        format!("{} [{}]", self.title, names.join(" | "))
    }
}

impl<'a> Widget for ChartView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bar_width = self.bar_width();
        let peak = self.peak();
        let mut chart = BarChart::default()
            .block(
                Block::default()
                    .title(self.legend())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .bar_width(bar_width)
            .bar_gap(1)
            .group_gap(2)
            .max(CHART_BAR_RESOLUTION as u64);

        for row in 0..self.rows_shown() {
            let bars: Vec<Bar> = self
                .chart
                .series
                .iter()
                .enumerate()
                .map(|(idx, series)| {
                    let value = series.values.get(row).copied().flatten();
                    Bar::default()
                        .value(scaled(value, peak))
                        .text_value(format_value(value))
                        .style(Style::default().fg(SERIES_COLORS[idx % SERIES_COLORS.len()]))
                })
                .collect();

            chart = chart.data(
                BarGroup::default()
                    .label(Line::from(row.to_string()))
                    .bars(&bars),
            );
        }

        chart.render(area, buf);
    }
}

/// Bar height relative to `peak`; negative values and gaps plot as empty bars
fn scaled(value: Option<f64>, peak: Option<f64>) -> u64 {
    match (value, peak) {
        (Some(v), Some(peak)) if v.is_finite() && v > 0.0 => {
            ((v / peak).min(1.0) * CHART_BAR_RESOLUTION).round() as u64
        }
        _ => 0,
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => DataCell::Float(v).to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_values() {
        assert_eq!(scaled(Some(4.0), Some(8.0)), 5_000);
        assert_eq!(scaled(Some(8.0), Some(8.0)), 10_000);
        assert_eq!(scaled(Some(-1.0), Some(8.0)), 0);
        assert_eq!(scaled(None, Some(8.0)), 0);
        assert_eq!(scaled(Some(1.0), None), 0);
        assert_eq!(format_value(Some(2.5)), "2.5");
        assert_eq!(format_value(None), "-");
    }

    #[test]
    fn test_scaled_stays_bounded_for_huge_values() {
        let peak = Some(1.7e18);
        assert_eq!(scaled(Some(1.7e18), peak), 10_000);
        assert_eq!(scaled(Some(1e30), Some(1e30)), 10_000);
        assert!(scaled(Some(1.0), peak) < 10_000);
    }

    #[test]
    fn test_size_hint_saturates_for_wide_datasets() {
        let header: Vec<String> = (0..17_000).map(|i| format!("c{}", i)).collect();
        let row: Vec<&str> = vec!["1"; 17_000];
        let content = format!("{}\n{}\n", header.join(","), row.join(","));
        let ds = crate::tabular::parse_csv("wide.csv", content.as_bytes()).unwrap();

        let (width, height) = PreviewTable {
            dataset: &ds,
            title: "wide.csv",
        }
        .size_hint();
        assert_eq!(width, u16::MAX);
        assert_eq!(height, 4);
    }
}
