//! The heatmap widget proper: paints the bucket grid, labels, legend,
//! selection markers, and tooltip into a [`Buffer`], and records cell
//! geometry in its state so mouse events can be resolved afterwards.

use super::config::{Frequency, HeatmapConfig};
use super::grid::{bucket_end, bucket_match, Grid};
use crate::records::{StatusKind, StatusRecord};
use crate::theme::{LABEL_STYLE, SELECTION_COLOR};
use ratatui::{prelude::*, widgets::*};
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

/// Terminal columns per cell-unit column: two painted plus one gap.
const CELL_STRIDE: u16 = 3;
const CELL_WIDTH: u16 = 2;

/// Lines above the grid: group labels and their rule.
const LABEL_LINES: u16 = 2;

/// Lines below the grid: a blank gap and the legend row.
const LEGEND_LINES: u16 = 2;

const ACS_HLINE: char = '─';
const ACS_TTEE: char = '┬';
const MARKER_LEFT: char = '▐';
const MARKER_RIGHT: char = '▌';

/// Painted width and height of one bucket, in terminal cells.
fn cell_extent(frequency: Frequency) -> (u16, u16) {
    match frequency {
        Frequency::Hour | Frequency::Day => (CELL_WIDTH, 1),
        Frequency::Week => (CELL_WIDTH, 7),
        // a month block spans four cell-unit columns, minus the last gap
        Frequency::Month => (4 * CELL_STRIDE - 1, 4),
    }
}

/// Rows the widget wants when the pane is not being resized by hand.
pub(crate) fn natural_height(config: &HeatmapConfig) -> u16 {
    let legend = if config.legend_enabled {
        LEGEND_LINES
    } else {
        0
    };
    LABEL_LINES + config.frequency.grid_rows() + legend
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Heatmap<'a> {
    config: &'a HeatmapConfig,
    records: &'a [StatusRecord],
    now: OffsetDateTime,
}

impl<'a> Heatmap<'a> {
    pub(crate) fn new(config: &'a HeatmapConfig, records: &'a [StatusRecord]) -> Heatmap<'a> {
        Heatmap::at(config, records, OffsetDateTime::now_utc())
    }

    /// Like [`Heatmap::new`] but with an explicit clock.  The configured lag
    /// is applied here, so callers always pass the real wall time.
    pub(crate) fn at(
        config: &'a HeatmapConfig,
        records: &'a [StatusRecord],
        clock: OffsetDateTime,
    ) -> Heatmap<'a> {
        Heatmap {
            config,
            records,
            now: clock - Duration::hours(config.lag_hours),
        }
    }
}

/// Screen footprint of one rendered bucket, clipped to the render area.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct CellGeom {
    rect: Rect,
    start: OffsetDateTime,
    kind: StatusKind,
    timestamp: Option<i64>,
}

/// Payload handed to the host when a cell is clicked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CellClick {
    pub(crate) start: OffsetDateTime,
    pub(crate) timestamp: Option<i64>,
}

/// Mouse-facing state.  The cell list is rebuilt from scratch on every
/// render; selection and hover are keyed by bucket start so they survive
/// re-renders and layout changes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HeatmapState {
    cells: Vec<CellGeom>,
    selected: Option<OffsetDateTime>,
    hover: Option<OffsetDateTime>,
}

impl HeatmapState {
    /// Updates the hovered bucket from a pointer position.  Returns `true`
    /// when the hover target changed and a redraw is warranted.
    pub(crate) fn hover_at(&mut self, at: Position) -> bool {
        let over = self.cell_at(at).map(|cell| cell.start);
        let changed = over != self.hover;
        self.hover = over;
        changed
    }

    /// Resolves a left click.  With clicks disabled nothing is selected and
    /// no payload is produced.
    pub(crate) fn click_at(&mut self, at: Position, click_enabled: bool) -> Option<CellClick> {
        if !click_enabled {
            return None;
        }
        let cell = self.cell_at(at)?;
        let click = CellClick {
            start: cell.start,
            timestamp: cell.timestamp,
        };
        self.selected = Some(cell.start);
        Some(click)
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn cell_at(&self, at: Position) -> Option<&CellGeom> {
        self.cells.iter().find(|cell| cell.rect.contains(at))
    }
}

impl StatefulWidget for Heatmap<'_> {
    type State = HeatmapState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.cells.clear();
        if area.is_empty() {
            return;
        }
        let grid = Grid::compute(self.now, self.config);
        let margin = grid
            .row_labels
            .iter()
            .map(|label| label.chars().count())
            .max()
            .map_or(0, |width| u16::try_from(width).unwrap_or(0) + 1);
        let (cell_w, cell_h) = cell_extent(self.config.frequency);
        let grid_width = grid
            .buckets
            .iter()
            .map(|b| b.col * CELL_STRIDE + cell_w)
            .max()
            .unwrap_or(0);
        let mut canvas = Canvas::new(area, buf);

        for group in &grid.col_groups {
            canvas.mvprint(0, margin + group.col * CELL_STRIDE, &group.label, LABEL_STYLE);
        }
        canvas.hline(1, margin, ACS_HLINE, grid_width);
        for group in &grid.col_groups {
            canvas.mvaddch(1, margin + group.col * CELL_STRIDE, ACS_TTEE, None);
        }

        for bucket in &grid.buckets {
            let record = bucket_match(self.records, bucket.start, self.config.frequency);
            let kind = record.map_or(StatusKind::None, |r| r.kind);
            let rect = canvas.fill(
                LABEL_LINES + bucket.row * cell_h,
                margin + bucket.col * CELL_STRIDE,
                cell_w,
                cell_h,
                self.config.palette.color(kind),
            );
            if !rect.is_empty() {
                state.cells.push(CellGeom {
                    rect,
                    start: bucket.start,
                    kind,
                    timestamp: record.and_then(|r| r.timestamp),
                });
            }
        }

        for (i, label) in (0u16..).zip(&grid.row_labels) {
            canvas.mvprint(LABEL_LINES + i, 0, label, LABEL_STYLE);
        }

        if let Some(selected) = state.selected {
            if let Some(cell) = state.cells.iter().find(|c| c.start == selected) {
                canvas.vmark(cell.rect.x.wrapping_sub(1), cell.rect, MARKER_LEFT);
                canvas.vmark(cell.rect.right(), cell.rect, MARKER_RIGHT);
            }
        }

        if self.config.legend_enabled {
            let mut spans = Vec::new();
            for kind in StatusKind::ALL {
                spans.push(Span::styled(
                    "██",
                    Style::new().fg(self.config.palette.color(kind)),
                ));
                spans.push(Span::raw(" "));
                spans.push(Span::raw(self.config.locale.status_label(kind).to_owned()));
                spans.push(Span::raw("  "));
            }
            canvas.mvline(LABEL_LINES + grid.rows + 1, margin, Line::from(spans));
        }

        if self.config.tooltip_enabled {
            if let Some(cell) = state
                .hover
                .and_then(|start| state.cells.iter().find(|c| c.start == start))
                .copied()
            {
                draw_tooltip(area, buf, self.config, &cell);
            }
        }
    }
}

/// A three-line bordered overlay naming the hovered bucket's status and its
/// half-open time span.  Placed above the cell, or flipped below when the
/// cell is too close to the top edge.
fn draw_tooltip(area: Rect, buf: &mut Buffer, config: &HeatmapConfig, cell: &CellGeom) {
    let fmt = format_description!("[day] [month repr:short] [hour]:00");
    let start = cell.start.format(fmt).unwrap_or_default();
    let end = bucket_end(cell.start, config.frequency)
        .format(fmt)
        .unwrap_or_default();
    let line = Line::from(vec![
        Span::styled(
            config.locale.status_label(cell.kind).to_owned(),
            Style::new().fg(config.palette.color(cell.kind)),
        ),
        Span::raw(format!(
            " {} {start} to {end}",
            config.locale.for_period
        )),
    ]);
    let width = u16::try_from(line.width()).unwrap_or(u16::MAX).saturating_add(2);
    let y = if cell.rect.y >= area.y.saturating_add(3) {
        cell.rect.y - 3
    } else {
        cell.rect.bottom()
    };
    let x = cell
        .rect
        .x
        .min(area.right().saturating_sub(width))
        .max(area.x);
    let tip = Rect {
        x,
        y,
        width,
        height: 3,
    }
    .intersection(area);
    if tip.is_empty() {
        return;
    }
    Clear.render(tip, buf);
    Paragraph::new(line).block(Block::bordered()).render(tip, buf);
}

/// Bounds-checked drawing into a sub-area of the frame's buffer.
#[derive(Debug)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> Canvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Canvas<'a> {
        Canvas { area, buf }
    }

    fn mvaddch(&mut self, y: u16, x: u16, ch: char, fg: Option<Color>) {
        if y < self.area.height && x < self.area.width {
            if let Some(cell) = self
                .buf
                .cell_mut(Position::new(x + self.area.x, y + self.area.y))
            {
                cell.set_char(ch);
                if let Some(color) = fg {
                    cell.set_fg(color);
                }
            }
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        self.mvline(y, x, Line::styled(s.as_ref().to_owned(), style));
    }

    fn mvline(&mut self, y: u16, x: u16, line: Line<'_>) {
        if y < self.area.height && x < self.area.width {
            let width = u16::try_from(line.width()).unwrap_or(u16::MAX);
            // A Paragraph truncates text extending past the area, as long as
            // the Rect handed to it stays inside the frame.
            Paragraph::new(line).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), Style::new());
    }

    /// Paints a background rectangle at area-relative coordinates and returns
    /// the absolute painted Rect, clipped to the area (possibly empty).
    fn fill(&mut self, y: u16, x: u16, width: u16, height: u16, color: Color) -> Rect {
        let rect = Rect {
            x: self.area.x.saturating_add(x),
            y: self.area.y.saturating_add(y),
            width,
            height,
        }
        .intersection(self.area);
        for yy in rect.top()..rect.bottom() {
            for xx in rect.left()..rect.right() {
                if let Some(cell) = self.buf.cell_mut(Position::new(xx, yy)) {
                    cell.set_char(' ');
                    cell.set_bg(color);
                }
            }
        }
        rect
    }

    /// A vertical edge marker along one side of a cell, at an absolute
    /// column.  Silently skipped when the column falls outside the area.
    fn vmark(&mut self, x: u16, rect: Rect, ch: char) {
        if x < self.area.left() || x >= self.area.right() {
            return;
        }
        for y in rect.top()..rect.bottom() {
            if let Some(cell) = self.buf.cell_mut(Position::new(x, y)) {
                cell.set_char(ch);
                cell.set_fg(SELECTION_COLOR);
            }
        }
    }
}
