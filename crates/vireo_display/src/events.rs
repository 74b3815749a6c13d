/*
    Vireo
    https://github.com/vireo-emu/vireo

    Copyright 2025 Vireo Contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    vireo_display::events.rs

    Host event model. A windowing backend translates its native events into
    these before handing them to the scheduler's event pump.
*/

use crate::types::{DisplayDimensions, OutputId};
use strum_macros::Display;

/// Modifier key state as last reported by the host. Left and right variants
/// are tracked separately because the grab exit combo may bind to a specific
/// side (e.g. Right-Ctrl).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub lctrl:  bool,
    pub rctrl:  bool,
    pub lalt:   bool,
    pub ralt:   bool,
    pub lshift: bool,
    pub rshift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        lctrl:  false,
        rctrl:  false,
        lalt:   false,
        ralt:   false,
        lshift: false,
        rshift: false,
    };
}

/// Pointer buttons, including the synthetic wheel "buttons" a wheel event is
/// expanded into.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
    Side,
    Extra,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
}

impl PointerButton {
    #[inline]
    pub const fn bit(&self) -> u32 {
        match self {
            PointerButton::Left => 1 << 0,
            PointerButton::Middle => 1 << 1,
            PointerButton::Right => 1 << 2,
            PointerButton::Side => 1 << 3,
            PointerButton::Extra => 1 << 4,
            PointerButton::WheelUp => 1 << 5,
            PointerButton::WheelDown => 1 << 6,
            PointerButton::WheelLeft => 1 << 7,
            PointerButton::WheelRight => 1 << 8,
        }
    }

    /// All buttons that participate in press/release bitmask tracking.
    pub const TRACKED: [PointerButton; 5] = [
        PointerButton::Left,
        PointerButton::Middle,
        PointerButton::Right,
        PointerButton::Side,
        PointerButton::Extra,
    ];
}

/// Bitmask of currently-held pointer buttons.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonMask(u32);

impl ButtonMask {
    pub const EMPTY: ButtonMask = ButtonMask(0);

    #[inline]
    pub fn contains(&self, button: PointerButton) -> bool {
        self.0 & button.bit() != 0
    }

    #[inline]
    pub fn with(&self, button: PointerButton, pressed: bool) -> ButtonMask {
        if pressed {
            ButtonMask(self.0 | button.bit())
        }
        else {
            ButtonMask(self.0 & !button.bit())
        }
    }

    #[inline]
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ButtonMask {
    fn from(raw: u32) -> Self {
        ButtonMask(raw)
    }
}

/// Per-window host events.
#[derive(Clone, Debug, PartialEq)]
pub enum HostWindowEvent {
    FocusGained,
    FocusLost,
    /// Pointer entered the window client area.
    Enter,
    Resized(DisplayDimensions),
    Exposed,
    Minimized,
    Restored,
    Shown,
    Hidden,
    CloseRequested,
}

/// A raw host event as drained from the event pump. Every variant that
/// originates from a window carries the [`OutputId`] the backend resolved it
/// to.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    KeyDown {
        output:   OutputId,
        scancode: u32,
        mods:     Modifiers,
        repeat:   bool,
    },
    KeyUp {
        output:   OutputId,
        scancode: u32,
        mods:     Modifiers,
    },
    TextInput {
        output: OutputId,
        text:   String,
    },
    /// Pointer motion. `x`/`y` are window-relative coordinates, `dx`/`dy`
    /// relative deltas, `buttons` the hold state at the time of the event.
    MouseMotion {
        output:  OutputId,
        x:       i32,
        y:       i32,
        dx:      i32,
        dy:      i32,
        buttons: ButtonMask,
    },
    MouseButton {
        output:  OutputId,
        button:  PointerButton,
        pressed: bool,
        x:       i32,
        y:       i32,
    },
    /// Wheel motion in detents. Positive `dy` scrolls up.
    MouseWheel {
        output: OutputId,
        dx:     i32,
        dy:     i32,
    },
    Window {
        output: OutputId,
        event:  HostWindowEvent,
    },
    /// Application-level quit request (e.g. last window closed by the host).
    Quit,
}

impl HostEvent {
    /// Whether this event counts as guest-directed input for refresh-rate
    /// governing. Window events do not reset the idle counter.
    pub fn is_input(&self) -> bool {
        !matches!(self, HostEvent::Window { .. } | HostEvent::Quit)
    }

    /// The output this event addresses, if any.
    pub fn output(&self) -> Option<OutputId> {
        match self {
            HostEvent::KeyDown { output, .. }
            | HostEvent::KeyUp { output, .. }
            | HostEvent::TextInput { output, .. }
            | HostEvent::MouseMotion { output, .. }
            | HostEvent::MouseButton { output, .. }
            | HostEvent::MouseWheel { output, .. }
            | HostEvent::Window { output, .. } => Some(*output),
            HostEvent::Quit => None,
        }
    }
}

/// Non-blocking source of pending host events. One scheduler tick drains the
/// pump to exhaustion.
pub trait EventPump {
    fn poll_event(&mut self) -> Option<HostEvent>;
}
