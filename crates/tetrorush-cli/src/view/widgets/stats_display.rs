use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetrorush_engine::GameSnapshot;

use super::style;

pub struct StatsDisplay<'a> {
    snapshot: &'a GameSnapshot,
    high_score: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot, high_score: usize) -> Self {
        Self {
            snapshot,
            high_score,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// High score including the running game, so a new record shows up live.
    fn best_score(&self) -> usize {
        usize::max(self.high_score, self.snapshot.score)
    }
}

type Value = &'static dyn for<'s, 'a> Fn(&'s StatsDisplay<'a>) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|stats| stats.snapshot.score.to_string()),
    Row::FullLabel("HIGH SCORE:"),
    Row::FullValue(&|stats| stats.best_score().to_string()),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|stats| stats.snapshot.level.to_string()),
    Row::LabelValue("LINES:", &|stats| stats.snapshot.lines.to_string()),
    Row::LabelValue("PIECES:", &|stats| {
        stats.snapshot.completed_pieces.to_string()
    }),
    Row::LabelValue("SPEED:", &|stats| {
        format!("{}ms", stats.snapshot.fall_interval_ms)
    }),
    Row::Empty,
    Row::LabelValue("SINGLES:", &|stats| {
        stats.snapshot.line_cleared_counter[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", &|stats| {
        stats.snapshot.line_cleared_counter[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", &|stats| {
        stats.snapshot.line_cleared_counter[3].to_string()
    }),
    Row::LabelValue("TETRIS:", &|stats| {
        stats.snapshot.line_cleared_counter[4].to_string()
    }),
    Row::LabelValue("5+ LINES:", &|stats| {
        stats.snapshot.line_cleared_counter[5].to_string()
    }),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(&self), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(&self), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
