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

    vireo_display::grab.rs

    Grab/focus state machine: pointer capture, host cursor visibility,
    fullscreen toggling, and the grab-restore latch that survives a window
    recreation.

    Invariants kept here:
      - Focus loss releases an active grab, except in fullscreen.
      - Leaving fullscreen restores the grab state saved on entry.
      - A grab dropped by window recreation is re-acquired on the next focus
        gain, before any further input is routed.
*/

use crate::{
    backend::DisplayBackend,
    events::EventPump,
    sink::GuestInputSink,
    scheduler::DisplayScheduler,
};

impl<P, S, B> DisplayScheduler<P, S, B>
where
    P: EventPump,
    S: GuestInputSink,
    B: DisplayBackend,
{
    /// Whether pointer coordinates currently flow as absolute positions.
    #[inline]
    pub(crate) fn absolute_mode(&self) -> bool {
        self.input.absolute_enabled()
    }

    pub(crate) fn hide_host_cursor(&mut self, _idx: usize) {
        if self.params.show_cursor {
            return;
        }
        if self.absolute_mode() {
            self.backend.show_cursor(false);
        }
        else {
            self.backend.set_relative_pointer(true);
        }
    }

    pub(crate) fn show_host_cursor(&mut self, _idx: usize) {
        if self.params.show_cursor {
            return;
        }
        if !self.absolute_mode() {
            self.backend.set_relative_pointer(false);
        }
        let guest_sprite = self.input.guest_cursor() && (self.input.is_grabbed() || self.absolute_mode());
        self.backend.set_guest_cursor_sprite(guest_sprite);
        self.backend.show_cursor(true);
    }

    /// Capture the pointer on one output. No-op for outputs that don't
    /// participate in grabbing, or when the window isn't focused.
    pub(crate) fn grab_start(&mut self, idx: usize) {
        let out = &self.outputs[idx];
        if !out.grab_allowed {
            return;
        }
        let id = out.id;
        if !self.backend.has_focus(id) {
            log::debug!("Ignoring grab request for unfocused {}", id);
            return;
        }

        if self.input.guest_cursor() {
            if !self.absolute_mode() {
                let (x, y) = self.input.guest_pos();
                self.backend.warp_pointer(id, x, y);
            }
        }
        else {
            self.hide_host_cursor(idx);
        }
        self.backend.set_grab(id, true);
        self.input.grab_on();
        self.update_caption(idx);
    }

    pub(crate) fn grab_end(&mut self, idx: usize) {
        let id = self.outputs[idx].id;
        self.backend.set_grab(id, false);
        self.input.grab_off();
        self.show_host_cursor(idx);
        self.update_caption(idx);
    }

    /// Absolute-pointer auto grab: capture only if the host pointer is
    /// already inside the window.
    pub(crate) fn absolute_pointer_grab(&mut self, idx: usize) {
        let id = self.outputs[idx].id;
        if !self.backend.has_focus(id) {
            return;
        }
        let (x, y) = self.backend.pointer_position();
        let dims = self.backend.window_size(id);
        if x > 0 && x < dims.w as i32 - 1 && y > 0 && y < dims.h as i32 - 1 {
            self.grab_start(idx);
        }
    }

    pub(crate) fn toggle_fullscreen(&mut self, idx: usize) {
        let id = self.outputs[idx].id;
        let entering = !self.input.fullscreen();
        self.input.set_fullscreen(entering);
        self.backend.set_fullscreen(id, entering);

        if entering {
            self.input.save_grab();
            self.grab_start(idx);
        }
        else if !self.input.saved_grab() && !self.absolute_mode() {
            self.grab_end(idx);
        }
        self.backend.redraw(id);
    }

    pub(crate) fn on_focus_gained(&mut self, idx: usize) {
        self.outputs[idx].ignore_hotkeys = self.input.combo_held();
        if self.input.take_grab_restore_pending() {
            // Grab dropped by a window recreation; re-acquire before any
            // further input is routed.
            if self.input.is_grabbed() {
                self.grab_end(idx);
            }
            self.grab_start(idx);
        }
        if !self.input.is_grabbed() && self.absolute_mode() {
            self.absolute_pointer_grab(idx);
        }
    }

    pub(crate) fn on_focus_lost(&mut self, idx: usize) {
        if self.input.grab_restore_pending() {
            // The recreation transient; the latch stays armed for the focus
            // gain that follows.
            return;
        }
        if self.input.is_grabbed() && !self.input.fullscreen() {
            self.grab_end(idx);
        }
    }

    pub(crate) fn on_pointer_enter(&mut self, idx: usize) {
        if !self.input.is_grabbed() && self.absolute_mode() {
            self.absolute_pointer_grab(idx);
        }
        // A hotkey combo held while entering came from outside; swallow
        // hotkeys until it is released.
        self.outputs[idx].ignore_hotkeys = self.input.combo_held();
    }

    pub(crate) fn update_caption(&mut self, idx: usize) {
        let id = self.outputs[idx].id;
        let status = if !self.running {
            " [Stopped]".to_string()
        }
        else if self.input.is_grabbed() {
            format!(" - Press {} to exit grab", self.input.policy().exit_combo())
        }
        else {
            String::new()
        };
        let title = if self.params.app_name.is_empty() {
            format!("Vireo ({}){}", id, status)
        }
        else {
            format!("Vireo ({}-{}){}", self.params.app_name, id, status)
        };
        self.backend.set_title(id, &title);
    }
}
