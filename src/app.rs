use crate::heatmap::{natural_height, Heatmap, HeatmapConfig, HeatmapState};
use crate::help::Help;
use crate::notify::Notice;
use crate::records::StatusRecord;
use crate::resize::{PaneSize, ResizeHandle, HANDLE_GLYPH};
use crate::theme::{severity_style, BASE_STYLE, HANDLE_STYLE};
use crossterm::event::{
    read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Position, Rect},
    text::Line,
    widgets::{Paragraph, StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::macros::format_description;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    config: HeatmapConfig,
    records: Vec<StatusRecord>,
    chart: HeatmapState,
    pane: PaneSize,
    /// Where the pane landed on the last render; mouse events are resolved
    /// against this.
    pane_rect: Rect,
    resize: ResizeHandle,
    notice: Option<Notice>,
    state: AppState,
}

impl App {
    pub(crate) fn new(config: HeatmapConfig, records: Vec<StatusRecord>) -> App {
        let pane = natural_pane(&config);
        App {
            config,
            records,
            chart: HeatmapState::default(),
            pane,
            pane_rect: Rect::ZERO,
            resize: ResizeHandle::default(),
            notice: None,
            state: AppState::Viewing,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match read()? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                    self.state = AppState::Quitting;
                } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                    self.beep()?;
                }
            }
            Event::Mouse(event) => self.handle_mouse(&event),
            // Redraw on resize, and we might as well redraw on other stuff
            // too
            _ => (),
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Viewing => match key {
                KeyCode::Char('f') => {
                    self.config.frequency = self.config.frequency.next();
                    self.reset_pane();
                    true
                }
                KeyCode::Char('t') => {
                    self.config.tooltip_enabled = !self.config.tooltip_enabled;
                    true
                }
                KeyCode::Char('g') => {
                    self.config.legend_enabled = !self.config.legend_enabled;
                    true
                }
                KeyCode::Char('w') => {
                    self.config.week_start = self.config.week_start.toggled();
                    true
                }
                KeyCode::Char('0') | KeyCode::Home => {
                    self.reset_pane();
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Viewing;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn handle_mouse(&mut self, event: &MouseEvent) {
        if self.resize.on_mouse(event, self.pane_rect, &mut self.pane) || self.resize.dragging() {
            return;
        }
        let at = Position::new(event.column, event.row);
        match event.kind {
            MouseEventKind::Moved => {
                self.chart.hover_at(at);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(click) = self.chart.click_at(at, self.config.click_enabled) {
                    let fmt = format_description!("[day] [month repr:short] [hour]:00");
                    let when = click.start.format(fmt).unwrap_or_default();
                    let text = match click.timestamp {
                        Some(ts) => format!("Selected {when} (timestamp {ts})"),
                        None => format!("Selected {when}"),
                    };
                    self.notice = Some(Notice::info(text));
                }
            }
            _ => (),
        }
    }

    fn reset_pane(&mut self) {
        self.pane = natural_pane(&self.config);
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

/// The pane the chart asks for before any manual resizing: its configured
/// width, the widget's natural height, and one row for the resize handle.
fn natural_pane(config: &HeatmapConfig) -> PaneSize {
    PaneSize {
        width: config.width,
        height: natural_height(config) + 1,
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(area, BASE_STYLE);
        // the last row is reserved for notices
        let body_height = area.height.saturating_sub(1);
        let pane = Rect {
            x: area.x,
            y: area.y,
            width: self.pane.width.min(area.width),
            height: self.pane.height.min(body_height),
        };
        self.pane_rect = pane;
        let chart_area = Rect {
            height: pane.height.saturating_sub(1),
            ..pane
        };
        Heatmap::new(&self.config, &self.records).render(chart_area, buf, &mut self.chart);
        let handle = ResizeHandle::handle_area(pane);
        if let Some(cell) = buf.cell_mut(Position::new(handle.x, handle.y)) {
            cell.set_char(HANDLE_GLYPH);
            cell.set_style(HANDLE_STYLE);
        }
        if let Some(ref notice) = self.notice {
            let footer = Rect {
                x: area.x,
                y: area.bottom() - 1,
                width: area.width,
                height: 1,
            };
            Paragraph::new(Line::styled(
                notice.text.clone(),
                severity_style(notice.severity),
            ))
            .render(footer, buf);
        }
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Viewing,
    Helping,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::{Frequency, WeekStart};

    fn app() -> App {
        App::new(HeatmapConfig::default(), Vec::new())
    }

    fn rendered(app: &mut App, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_frequency_key_cycles_and_resets_pane() {
        let mut app = app();
        assert_eq!(app.config.frequency, Frequency::Day);
        // shrink the pane by hand first
        app.pane = PaneSize {
            width: 40,
            height: 8,
        };
        assert!(app.handle_key(KeyCode::Char('f')));
        assert_eq!(app.config.frequency, Frequency::Week);
        assert_eq!(app.pane, natural_pane(&app.config));
    }

    #[test]
    fn test_toggle_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('t')));
        assert!(!app.config.tooltip_enabled);
        assert!(app.handle_key(KeyCode::Char('g')));
        assert!(!app.config.legend_enabled);
        assert!(app.handle_key(KeyCode::Char('w')));
        assert_eq!(app.config.week_start, WeekStart::Monday);
        assert!(app.handle_key(KeyCode::Char('w')));
        assert_eq!(app.config.week_start, WeekStart::Sunday);
    }

    #[test]
    fn test_quit_and_help_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('?')));
        // any key dismisses the help overlay
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Viewing);
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting());
    }

    #[test]
    fn test_invalid_key_rejected() {
        let mut app = app();
        assert!(!app.handle_key(KeyCode::Char('x')));
    }

    #[test]
    fn test_handle_glyph_drawn() {
        let mut app = app();
        let buf = rendered(&mut app, 160, 24);
        // default day pane: 11 chart rows plus the handle row
        assert_eq!(app.pane_rect.height, 12);
        assert_eq!(buf.cell((0, 11)).unwrap().symbol(), "◣");
    }

    #[test]
    fn test_resize_drag_grows_pane() {
        let mut app = app();
        rendered(&mut app, 160, 24);
        let handle = ResizeHandle::handle_area(app.pane_rect);
        app.handle_mouse(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            handle.x,
            handle.y,
        ));
        app.handle_mouse(&mouse(
            MouseEventKind::Drag(MouseButton::Left),
            handle.x + 10,
            handle.y + 5,
        ));
        assert_eq!(app.pane.width, 130);
        assert_eq!(app.pane.height, 17);
    }

    #[test]
    fn test_click_sets_notice() {
        let mut app = App::new(
            HeatmapConfig::builder().frequency(Frequency::Month).build(),
            Vec::new(),
        );
        rendered(&mut app, 160, 24);
        // the first month block always starts at the top-left of the grid
        app.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 2));
        let notice = app.notice.unwrap();
        assert!(notice.text.starts_with("Selected"));
    }

    #[test]
    fn test_click_ignored_when_disabled() {
        let mut app = App::new(
            HeatmapConfig::builder()
                .frequency(Frequency::Month)
                .click_enabled(false)
                .build(),
            Vec::new(),
        );
        rendered(&mut app, 160, 24);
        app.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 2));
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_footer_shows_notice() {
        let mut app = app();
        app.notice = Some(Notice::error("boom"));
        let buf = rendered(&mut app, 160, 24);
        let footer = (0..5)
            .map(|x| buf.cell((x, 23)).map_or(" ", ratatui::buffer::Cell::symbol))
            .collect::<String>();
        assert!(footer.starts_with("boom"));
    }
}
