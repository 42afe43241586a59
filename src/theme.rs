use crate::notify::Severity;
use crate::records::StatusKind;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const LABEL_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

/// Stroke color for the selected cell's edge markers.
pub(crate) const SELECTION_COLOR: Color = Color::Rgb(0x00, 0x88, 0xcc);

pub(crate) const HANDLE_STYLE: Style = Style::new().fg(Color::DarkGray).bg(Color::Black);

/// Cell colors per status kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Palette {
    pub(crate) none: Color,
    pub(crate) success: Color,
    pub(crate) warning: Color,
    pub(crate) error: Color,
    pub(crate) nodata: Color,
}

impl Palette {
    pub(crate) fn color(&self, kind: StatusKind) -> Color {
        match kind {
            StatusKind::None => self.none,
            StatusKind::Success => self.success,
            StatusKind::Warning => self.warning,
            StatusKind::Error => self.error,
            StatusKind::NoData => self.nodata,
        }
    }
}

impl Default for Palette {
    fn default() -> Palette {
        Palette {
            none: Color::Rgb(0xe1, 0xe1, 0xe1),
            success: Color::Rgb(0x21, 0xe3, 0xa3),
            warning: Color::Rgb(0xff, 0xcc, 0x00),
            error: Color::Rgb(0xff, 0x00, 0x00),
            nodata: Color::Rgb(0xf3, 0x9b, 0x9b),
        }
    }
}

pub(crate) fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Error => BASE_STYLE.fg(Color::LightRed).add_modifier(Modifier::BOLD),
        Severity::Info => BASE_STYLE.fg(Color::LightBlue),
        Severity::Warning => BASE_STYLE.fg(Color::LightYellow),
    }
}
