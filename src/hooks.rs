//! Collaborator callbacks
//!
//! The screen drives its environment (PTY reply stream, window system,
//! input encoder) through a single capability record handed over at
//! construction. Every hook defaults to a no-op, so owners install only
//! what they need. All hooks fire synchronously during command
//! dispatch, in command order.

use std::fmt;

use crate::buffer::BufferKind;
use crate::color::{DynamicColorName, RgbColor};
use crate::command::{Command, MouseProtocol, MouseTransport, MouseWheelMode};
use crate::cursor::{CursorDisplay, CursorShape};

/// Callbacks the screen fires toward its collaborators.
pub struct ScreenHooks {
    /// VT reply stream destined for the PTY writer.
    pub reply: Box<dyn FnMut(&str)>,
    /// Fired after the window title changes (set or restore).
    pub on_window_title_changed: Box<dyn FnMut()>,
    /// CSI resize request: columns, rows, and whether they are pixels.
    pub resize_window: Box<dyn FnMut(usize, usize, bool)>,
    pub set_application_keypad_mode: Box<dyn FnMut(bool)>,
    pub set_bracketed_paste: Box<dyn FnMut(bool)>,
    pub set_mouse_protocol: Box<dyn FnMut(MouseProtocol, bool)>,
    pub set_mouse_transport: Box<dyn FnMut(MouseTransport)>,
    pub set_mouse_wheel_mode: Box<dyn FnMut(MouseWheelMode)>,
    pub use_application_cursor_keys: Box<dyn FnMut(bool)>,
    pub set_generate_focus_events: Box<dyn FnMut(bool)>,
    pub set_cursor_style: Box<dyn FnMut(CursorDisplay, CursorShape)>,
    /// Fired when the active buffer flips between main and alternate.
    pub on_buffer_changed: Box<dyn FnMut(BufferKind)>,
    pub bell: Box<dyn FnMut()>,
    /// Desktop notification request: title, body.
    pub notify: Box<dyn FnMut(&str, &str)>,
    /// Query a dynamic color; `None` suppresses the OSC reply.
    pub request_dynamic_color: Box<dyn FnMut(DynamicColorName) -> Option<RgbColor>>,
    pub set_dynamic_color: Box<dyn FnMut(DynamicColorName, RgbColor)>,
    pub reset_dynamic_color: Box<dyn FnMut(DynamicColorName)>,
    /// Trace hook fired once per dispatched batch.
    pub on_commands: Box<dyn FnMut(&[Command])>,
}

impl Default for ScreenHooks {
    fn default() -> Self {
        Self {
            reply: Box::new(|_| {}),
            on_window_title_changed: Box::new(|| {}),
            resize_window: Box::new(|_, _, _| {}),
            set_application_keypad_mode: Box::new(|_| {}),
            set_bracketed_paste: Box::new(|_| {}),
            set_mouse_protocol: Box::new(|_, _| {}),
            set_mouse_transport: Box::new(|_| {}),
            set_mouse_wheel_mode: Box::new(|_| {}),
            use_application_cursor_keys: Box::new(|_| {}),
            set_generate_focus_events: Box::new(|_| {}),
            set_cursor_style: Box::new(|_, _| {}),
            on_buffer_changed: Box::new(|_| {}),
            bell: Box::new(|| {}),
            notify: Box::new(|_, _| {}),
            request_dynamic_color: Box::new(|_| None),
            set_dynamic_color: Box::new(|_, _| {}),
            reset_dynamic_color: Box::new(|_| {}),
            on_commands: Box::new(|_| {}),
        }
    }
}

impl ScreenHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a reply sink.
    pub fn with_reply(mut self, reply: impl FnMut(&str) + 'static) -> Self {
        self.reply = Box::new(reply);
        self
    }

    /// Install a bell handler.
    pub fn with_bell(mut self, bell: impl FnMut() + 'static) -> Self {
        self.bell = Box::new(bell);
        self
    }
}

impl fmt::Debug for ScreenHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScreenHooks { .. }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_default_hooks_are_noops() {
        let mut hooks = ScreenHooks::default();
        (hooks.reply)("\x1b[0n");
        (hooks.bell)();
        assert_eq!((hooks.request_dynamic_color)(DynamicColorName::TextCursorColor), None);
    }

    #[test]
    fn test_with_reply_captures() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut hooks = ScreenHooks::new().with_reply(move |s| sink.borrow_mut().push(s.to_owned()));
        (hooks.reply)("ok");
        assert_eq!(seen.borrow().as_slice(), ["ok"]);
    }
}
