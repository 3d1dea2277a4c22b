use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::tabular::{Chart, Dataset};

use super::widgets::{ChartView, PreviewTable};

/// Render a widget off-screen and return its text, one line per row
pub fn render_to_text<W: Widget>(widget: W, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf);

    let mut out = String::new();
    for y in 0..height {
        let line: String = (0..width).map(|x| buf[(x, y)].symbol()).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Terminal width when stdout is a terminal, capped at `max`
pub fn terminal_width(max: u16) -> u16 {
    crossterm::terminal::size()
        .map(|(width, _)| width)
        .unwrap_or(max)
        .min(max)
}

pub fn render_preview(dataset: &Dataset, title: &str, max_width: u16) -> String {
    let widget = PreviewTable { dataset, title };
    let (width, height) = widget.size_hint();
    render_to_text(widget, width.min(max_width), height)
}

pub fn render_chart(
    chart: &Chart,
    title: &str,
    height: u16,
    max_rows: usize,
    max_width: u16,
) -> String {
    let widget = ChartView {
        chart,
        title,
        max_rows,
    };
    let width = widget.width_hint().min(max_width);
    let mut text = render_to_text(widget, width, height);
    if chart.row_count() > max_rows {
        text.push_str(&format!("(first {} of {} rows)\n", max_rows, chart.row_count()));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::{parse_csv, visualize};

    #[test]
    fn test_preview_lists_columns_and_rows() {
        let ds = parse_csv("p.csv", b"name,score\nalpha,1.5\nbeta,\n").unwrap();
        let text = render_preview(&ds, "data.csv", 120);

        assert!(text.contains("data.csv"));
        assert!(text.contains("name"));
        assert!(text.contains("score"));
        assert!(text.contains("alpha"));
        assert!(text.contains("1.5"));
        assert!(text.contains("NaN"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_chart_renders_legend_and_values() {
        let ds = parse_csv("c.csv", b"a,b\n1,2\n3,4\n").unwrap();
        let chart = visualize(&ds).unwrap();
        let text = render_chart(&chart, "Chart", 12, 20, 120);

        assert!(text.contains("Chart [a | b]"));
        assert_eq!(text.lines().count(), 12);
    }

    #[test]
    fn test_chart_with_huge_values() {
        let ds = parse_csv(
            "ts.csv",
            b"ts,v\n1700000000000000000,1\n1700000000000000001,2\n",
        )
        .unwrap();
        let chart = visualize(&ds).unwrap();
        let text = render_chart(&chart, "Chart", 12, 20, 120);
        assert_eq!(text.lines().count(), 12);

        let ds = parse_csv("big.csv", b"a,b\n1e30,2\n1,3\n").unwrap();
        let chart = visualize(&ds).unwrap();
        let text = render_chart(&chart, "Chart", 12, 20, 120);
        assert!(text.contains("Chart [a | b]"));
    }

    #[test]
    fn test_preview_of_very_wide_dataset() {
        let header: Vec<String> = (0..17_000).map(|i| format!("c{}", i)).collect();
        let row = vec!["1"; 17_000].join(",");
        let content = format!("{}\n{}\n", header.join(","), row);
        let ds = parse_csv("wide.csv", content.as_bytes()).unwrap();

        let text = render_preview(&ds.head(5), "wide.csv", 120);
        assert!(text.contains("wide.csv"));
        assert!(text.lines().all(|line| line.chars().count() <= 120));
    }

    #[test]
    fn test_chart_truncation_note() {
        let content: String = std::iter::once("n\n".to_string())
            .chain((1..=30).map(|i| format!("{}\n", i)))
            .collect();
        let ds = parse_csv("long.csv", content.as_bytes()).unwrap();
        let chart = visualize(&ds).unwrap();
        let text = render_chart(&chart, "Chart", 10, 20, 200);

        assert!(text.contains("(first 20 of 30 rows)"));
    }
}
