//! Keyboard and pointer-button mapping.
//!
//! Shortcuts are matched on the key text Slint delivers in its `KeyEvent`,
//! so special keys compare against `slint::platform::Key` code points.

use slint::platform::Key;

/// Modifier state accompanying a key or pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    /// Command key on macOS.
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        meta: false,
        shift: false,
        alt: false,
    };

    pub fn ctrl() -> Self {
        Self {
            control: true,
            ..Self::NONE
        }
    }

    pub fn ctrl_shift() -> Self {
        Self {
            control: true,
            shift: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn primary(&self) -> bool {
        self.control || self.meta
    }
}

/// Editor action triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ResetView,
    CancelConnection,
}

/// Map key text plus modifiers to an editor command.
pub fn map_key(text: &str, modifiers: Modifiers) -> Option<EditorCommand> {
    let mut chars = text.chars();
    let key = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    if key == char::from(Key::Escape) {
        return Some(EditorCommand::CancelConnection);
    }
    if !modifiers.primary() {
        return None;
    }

    match key.to_ascii_lowercase() {
        'z' if modifiers.shift => Some(EditorCommand::Redo),
        'z' => Some(EditorCommand::Undo),
        'y' => Some(EditorCommand::Redo),
        '+' | '=' => Some(EditorCommand::ZoomIn),
        '-' => Some(EditorCommand::ZoomOut),
        '0' => Some(EditorCommand::ResetView),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Middle button, or Alt with the left button, pans the canvas.
pub fn is_pan_gesture(button: PointerButton, modifiers: Modifiers) -> bool {
    match button {
        PointerButton::Middle => true,
        PointerButton::Left => modifiers.alt,
        PointerButton::Right => false,
    }
}

/// Wheel events only zoom while Ctrl/Cmd is held.
pub fn is_zoom_wheel(modifiers: Modifiers) -> bool {
    modifiers.primary()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slint::SharedString;

    fn meta() -> Modifiers {
        Modifiers {
            meta: true,
            ..Modifiers::NONE
        }
    }

    // ========================================================================
    // Shortcuts
    // ========================================================================

    #[test]
    fn test_undo_redo_shortcuts() {
        assert_eq!(map_key("z", Modifiers::ctrl()), Some(EditorCommand::Undo));
        assert_eq!(map_key("z", meta()), Some(EditorCommand::Undo));
        assert_eq!(map_key("Z", Modifiers::ctrl_shift()), Some(EditorCommand::Redo));
        assert_eq!(map_key("y", Modifiers::ctrl()), Some(EditorCommand::Redo));
    }

    #[test]
    fn test_zoom_shortcuts() {
        assert_eq!(map_key("+", Modifiers::ctrl()), Some(EditorCommand::ZoomIn));
        assert_eq!(map_key("=", Modifiers::ctrl()), Some(EditorCommand::ZoomIn));
        assert_eq!(map_key("-", Modifiers::ctrl()), Some(EditorCommand::ZoomOut));
        assert_eq!(map_key("0", meta()), Some(EditorCommand::ResetView));
    }

    #[test]
    fn test_plain_keys_do_nothing() {
        assert_eq!(map_key("z", Modifiers::NONE), None);
        assert_eq!(map_key("0", Modifiers::NONE), None);
        assert_eq!(map_key("q", Modifiers::ctrl()), None);
        assert_eq!(map_key("", Modifiers::ctrl()), None);
    }

    #[test]
    fn test_escape_needs_no_modifier() {
        let escape = SharedString::from(Key::Escape);
        assert_eq!(map_key(&escape, Modifiers::NONE), Some(EditorCommand::CancelConnection));
        assert_eq!(map_key(&escape, Modifiers::ctrl()), Some(EditorCommand::CancelConnection));
    }

    // ========================================================================
    // Pointer gestures
    // ========================================================================

    #[test]
    fn test_pan_gesture() {
        assert!(is_pan_gesture(PointerButton::Middle, Modifiers::NONE));
        assert!(is_pan_gesture(
            PointerButton::Left,
            Modifiers {
                alt: true,
                ..Modifiers::NONE
            }
        ));
        assert!(!is_pan_gesture(PointerButton::Left, Modifiers::NONE));
        assert!(!is_pan_gesture(PointerButton::Right, Modifiers::NONE));
    }

    #[test]
    fn test_zoom_wheel_requires_primary_modifier() {
        assert!(is_zoom_wheel(Modifiers::ctrl()));
        assert!(!is_zoom_wheel(Modifiers::NONE));
    }
}
