// Gateway module for TUI rendering - follows the Train Station Pattern
// All external access must go through this gateway

mod render;
mod widgets;

pub use render::{render_chart, render_preview, render_to_text, terminal_width};
pub use widgets::{ChartView, PreviewTable};
