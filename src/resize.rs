//! Mouse-drag resize affordance for the chart pane.
//!
//! A one-cell handle sits at the host's bottom-left corner.  Pressing the
//! left button on it starts a drag; every drag motion reapplies the pointer
//! delta to the size captured at press time, clamped to the configured
//! minimums.  A motion event without the button held means the button was
//! released outside the terminal and ends the drag without resizing.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

pub(crate) const HANDLE_GLYPH: char = '◣';

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ResizeConfig {
    pub(crate) min_width: u16,
    pub(crate) min_height: u16,
    pub(crate) resizable_width: bool,
    pub(crate) resizable_height: bool,
}

impl Default for ResizeConfig {
    fn default() -> ResizeConfig {
        ResizeConfig {
            min_width: 20,
            min_height: 6,
            resizable_width: true,
            resizable_height: true,
        }
    }
}

/// The host's current dimensions, owned by the caller and mutated in place
/// during a drag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PaneSize {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Dragging { origin: Position, start: PaneSize },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct ResizeHandle {
    config: ResizeConfig,
    state: DragState,
}

impl ResizeHandle {
    pub(crate) fn new(config: ResizeConfig) -> ResizeHandle {
        ResizeHandle {
            config,
            state: DragState::Idle,
        }
    }

    /// The one-cell hit area at the host's bottom-left corner.
    pub(crate) fn handle_area(host: Rect) -> Rect {
        Rect {
            x: host.x,
            y: host.y + host.height.saturating_sub(1),
            width: 1,
            height: 1,
        }
    }

    pub(crate) fn dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Feeds one mouse event.  Returns `true` when the pane size changed.
    pub(crate) fn on_mouse(&mut self, event: &MouseEvent, host: Rect, size: &mut PaneSize) -> bool {
        let at = Position::new(event.column, event.row);
        match (self.state, event.kind) {
            (DragState::Idle, MouseEventKind::Down(MouseButton::Left)) => {
                if Self::handle_area(host).contains(at) {
                    self.state = DragState::Dragging {
                        origin: at,
                        start: *size,
                    };
                }
                false
            }
            (DragState::Dragging { origin, start }, MouseEventKind::Drag(MouseButton::Left)) => {
                let mut changed = false;
                if self.config.resizable_width {
                    let width = resized(start.width, origin.x, at.x, self.config.min_width);
                    changed |= width != size.width;
                    size.width = width;
                }
                if self.config.resizable_height {
                    let height = resized(start.height, origin.y, at.y, self.config.min_height);
                    changed |= height != size.height;
                    size.height = height;
                }
                changed
            }
            // Motion without the button held: the release happened outside
            // the terminal, so end the drag without resizing.
            (
                DragState::Dragging { .. },
                MouseEventKind::Moved | MouseEventKind::Up(MouseButton::Left),
            ) => {
                self.state = DragState::Idle;
                false
            }
            _ => false,
        }
    }
}

fn resized(start: u16, from: u16, to: u16, min: u16) -> u16 {
    let candidate = i32::from(start) + i32::from(to) - i32::from(from);
    u16::try_from(candidate.max(i32::from(min))).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: crossterm::event::KeyModifiers::NONE,
        }
    }

    fn host() -> Rect {
        Rect::new(0, 0, 60, 20)
    }

    const DOWN: MouseEventKind = MouseEventKind::Down(MouseButton::Left);
    const DRAG: MouseEventKind = MouseEventKind::Drag(MouseButton::Left);
    const UP: MouseEventKind = MouseEventKind::Up(MouseButton::Left);

    #[test]
    fn test_drag_grows_pane() {
        let mut handle = ResizeHandle::default();
        let mut size = PaneSize {
            width: 60,
            height: 20,
        };
        handle.on_mouse(&mouse(DOWN, 0, 19), host(), &mut size);
        assert!(handle.dragging());
        assert!(handle.on_mouse(&mouse(DRAG, 10, 24), host(), &mut size));
        assert_eq!(
            size,
            PaneSize {
                width: 70,
                height: 25
            }
        );
        handle.on_mouse(&mouse(UP, 10, 24), host(), &mut size);
        assert!(!handle.dragging());
    }

    #[test]
    fn test_clamped_to_minimums() {
        let mut handle = ResizeHandle::default();
        let mut size = PaneSize {
            width: 60,
            height: 20,
        };
        handle.on_mouse(&mouse(DOWN, 0, 19), host(), &mut size);
        handle.on_mouse(&mouse(DRAG, 0, 0), host(), &mut size);
        handle.on_mouse(&mouse(UP, 0, 0), host(), &mut size);
        assert_eq!(
            size,
            PaneSize {
                width: 20,
                height: 6
            }
        );
    }

    #[test]
    fn test_no_resize_while_idle() {
        let mut handle = ResizeHandle::default();
        let mut size = PaneSize {
            width: 60,
            height: 20,
        };
        assert!(!handle.on_mouse(&mouse(DRAG, 30, 30), host(), &mut size));
        assert_eq!(
            size,
            PaneSize {
                width: 60,
                height: 20
            }
        );
    }

    #[test]
    fn test_press_off_handle_does_not_start_drag() {
        let mut handle = ResizeHandle::default();
        let mut size = PaneSize {
            width: 60,
            height: 20,
        };
        handle.on_mouse(&mouse(DOWN, 30, 10), host(), &mut size);
        assert!(!handle.dragging());
    }

    #[test]
    fn test_motion_without_button_is_implicit_release() {
        let mut handle = ResizeHandle::default();
        let mut size = PaneSize {
            width: 60,
            height: 20,
        };
        handle.on_mouse(&mouse(DOWN, 0, 19), host(), &mut size);
        assert!(!handle.on_mouse(&mouse(MouseEventKind::Moved, 40, 25), host(), &mut size));
        assert!(!handle.dragging());
        assert_eq!(
            size,
            PaneSize {
                width: 60,
                height: 20
            }
        );
        // further drags are ignored until the next press
        handle.on_mouse(&mouse(DRAG, 50, 30), host(), &mut size);
        assert_eq!(size.width, 60);
    }

    #[test]
    fn test_fixed_width_axis() {
        let mut handle = ResizeHandle::new(ResizeConfig {
            resizable_width: false,
            ..ResizeConfig::default()
        });
        let mut size = PaneSize {
            width: 60,
            height: 20,
        };
        handle.on_mouse(&mouse(DOWN, 0, 19), host(), &mut size);
        handle.on_mouse(&mouse(DRAG, 30, 25), host(), &mut size);
        assert_eq!(
            size,
            PaneSize {
                width: 60,
                height: 26
            }
        );
    }

    #[test]
    fn test_deltas_reapply_from_press_time_size() {
        let mut handle = ResizeHandle::default();
        let mut size = PaneSize {
            width: 60,
            height: 20,
        };
        handle.on_mouse(&mouse(DOWN, 5, 19), host(), &mut size);
        handle.on_mouse(&mouse(DRAG, 25, 19), host(), &mut size);
        assert_eq!(size.width, 80);
        // moving back toward the origin shrinks again, not cumulatively
        handle.on_mouse(&mouse(DRAG, 10, 19), host(), &mut size);
        assert_eq!(size.width, 65);
    }
}
