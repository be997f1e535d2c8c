//! Input events.
//!
//! Events come from the [`Backend`](crate::backend::Backend) and are routed
//! by the application loop: mouse events go to the active widget or to the
//! widget under the cursor, keyboard events go to the active widget.

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Modifier keys held while the event was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierMask: u32 {
        const SHIFT_LEFT = 1 << 0;
        const ALT_LEFT = 1 << 1;
        const META_LEFT = 1 << 2;
        const CTRL_LEFT = 1 << 3;
        const SHIFT_RIGHT = 1 << 4;
        const ALT_RIGHT = 1 << 5;
        const META_RIGHT = 1 << 6;
        const CTRL_RIGHT = 1 << 7;

        const SHIFT = Self::SHIFT_LEFT.bits() | Self::SHIFT_RIGHT.bits();
        const ALT = Self::ALT_LEFT.bits() | Self::ALT_RIGHT.bits();
        const META = Self::META_LEFT.bits() | Self::META_RIGHT.bits();
        const CTRL = Self::CTRL_LEFT.bits() | Self::CTRL_RIGHT.bits();
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Keyboard key code (SDL-compatible values for the named keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const BACKSPACE: KeyCode = KeyCode(8);
    pub const TAB: KeyCode = KeyCode(9);
    pub const RETURN: KeyCode = KeyCode(13);
    pub const ESCAPE: KeyCode = KeyCode(27);
    pub const SPACE: KeyCode = KeyCode(32);
}

/// Pointer state carried by mouse events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub position: Point,
    /// Button that changed, for button-down/up events.
    pub button: Option<MouseButton>,
    /// Scroll amount, for wheel events.
    pub wheel: f32,
}

impl MouseEvent {
    pub fn at(position: Point) -> Self {
        Self {
            position,
            button: None,
            wheel: 0.0,
        }
    }

    pub fn with_button(position: Point, button: MouseButton) -> Self {
        Self {
            position,
            button: Some(button),
            wheel: 0.0,
        }
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    None,
    /// Posted by the application; carries an opaque user value.
    App(u64),
    /// The user asked to close the window.
    Close,
    /// The window contents were lost and must be redrawn.
    Exposed,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    TextInput(char),
    MouseButtonDown(MouseEvent),
    MouseButtonUp(MouseEvent),
    MouseMove(MouseEvent),
    MouseWheel(MouseEvent),
}

/// An input event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub modifiers: ModifierMask,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            modifiers: ModifierMask::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierMask) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn mouse_down(position: Point, button: MouseButton) -> Self {
        Self::new(EventKind::MouseButtonDown(MouseEvent::with_button(position, button)))
    }

    pub fn mouse_up(position: Point, button: MouseButton) -> Self {
        Self::new(EventKind::MouseButtonUp(MouseEvent::with_button(position, button)))
    }

    pub fn mouse_move(position: Point) -> Self {
        Self::new(EventKind::MouseMove(MouseEvent::at(position)))
    }

    /// Pointer data for the four mouse event kinds.
    pub fn mouse(&self) -> Option<&MouseEvent> {
        match &self.kind {
            EventKind::MouseButtonDown(m)
            | EventKind::MouseButtonUp(m)
            | EventKind::MouseMove(m)
            | EventKind::MouseWheel(m) => Some(m),
            _ => None,
        }
    }

    /// Mouse events are routed through the pick surface.
    pub fn requires_picking(&self) -> bool {
        self.mouse().is_some()
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(
            self.kind,
            EventKind::KeyDown(_) | EventKind::KeyUp(_) | EventKind::TextInput(_)
        )
    }

    pub fn has_shift(&self) -> bool {
        self.modifiers.intersects(ModifierMask::SHIFT)
    }

    pub fn has_alt(&self) -> bool {
        self.modifiers.intersects(ModifierMask::ALT)
    }

    pub fn has_meta(&self) -> bool {
        self.modifiers.intersects(ModifierMask::META)
    }

    pub fn has_ctrl(&self) -> bool {
        self.modifiers.intersects(ModifierMask::CTRL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_bit_order() {
        assert_eq!(ModifierMask::SHIFT_LEFT.bits(), 1);
        assert_eq!(ModifierMask::CTRL_LEFT.bits(), 8);
        assert_eq!(ModifierMask::CTRL_RIGHT.bits(), 128);
    }

    #[test]
    fn test_combined_predicates() {
        let e = Event::new(EventKind::KeyDown(KeyCode::RETURN))
            .with_modifiers(ModifierMask::SHIFT_RIGHT | ModifierMask::CTRL_LEFT);
        assert!(e.has_shift());
        assert!(e.has_ctrl());
        assert!(!e.has_alt());
        assert!(!e.has_meta());
    }

    #[test]
    fn test_picking_classification() {
        let p = Point::new(3, 4);
        assert!(Event::mouse_down(p, MouseButton::Left).requires_picking());
        assert!(Event::mouse_move(p).requires_picking());
        assert!(!Event::new(EventKind::KeyUp(KeyCode::SPACE)).requires_picking());
        assert!(Event::new(EventKind::TextInput('a')).is_keyboard());
        assert!(!Event::new(EventKind::Exposed).is_keyboard());
        assert_eq!(Event::mouse_move(p).mouse().map(|m| m.position), Some(p));
    }
}
