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

    vireo_display::input.rs

    Input router: classifies drained host events and dispatches them to the
    grab machine, the hotkey decoder, the guest input sink, or the window
    lifecycle handlers.
*/

use crate::{
    backend::DisplayBackend,
    events::{EventPump, HostEvent, HostWindowEvent, Modifiers, PointerButton},
    scheduler::{DisplayScheduler, SchedulerEvent},
    sink::GuestInputSink,
    transition::TransitionKind,
};

// Host scancodes (USB HID usage page 0x07) for the hotkey set.
pub(crate) const SCANCODE_F: u32 = 9;
pub(crate) const SCANCODE_G: u32 = 10;
pub(crate) const SCANCODE_U: u32 = 24;
pub(crate) const SCANCODE_DIGIT_1: u32 = 30;
pub(crate) const SCANCODE_DIGIT_2: u32 = 31;
pub(crate) const SCANCODE_DIGIT_9: u32 = 38;

impl<P, S, B> DisplayScheduler<P, S, B>
where
    P: EventPump,
    S: GuestInputSink,
    B: DisplayBackend,
{
    /// Dispatch one drained host event. Called only from the tick's drain
    /// loop; routing is fully synchronous except for mode transitions, which
    /// are deferred to the timer phase.
    pub(crate) fn route_event(&mut self, ev: HostEvent) {
        if let Some(id) = ev.output() {
            if id.idx() >= self.outputs.len() {
                log::warn!("Dropping event for unknown {}: {:?}", id, ev);
                return;
            }
        }

        match ev {
            HostEvent::KeyDown {
                output,
                scancode,
                mods,
                repeat,
            } => self.handle_keydown(output.idx(), scancode, mods, repeat),
            HostEvent::KeyUp { output, scancode, mods } => self.handle_keyup(output.idx(), scancode, mods),
            HostEvent::TextInput { output, text } => self.handle_text_input(output.idx(), &text),
            HostEvent::MouseMotion {
                output,
                x,
                y,
                dx,
                dy,
                buttons,
            } => {
                self.input.set_buttons(buttons);
                self.handle_motion(output.idx(), x, y, dx, dy);
            }
            HostEvent::MouseButton {
                output,
                button,
                pressed,
                x,
                y,
            } => self.handle_button(output.idx(), button, pressed, x, y),
            HostEvent::MouseWheel { output, dx, dy } => self.handle_wheel(output.idx(), dx, dy),
            HostEvent::Window { output, event } => self.handle_window_event(output.idx(), event),
            HostEvent::Quit => {
                if self.params.window_close {
                    self.emit(SchedulerEvent::ShutdownRequested);
                }
            }
        }
    }

    fn handle_keydown(&mut self, idx: usize, scancode: u32, mods: Modifiers, repeat: bool) {
        self.input.set_mods(mods);

        // Suppression disables hotkey decoding only; the key itself still
        // flows to the guest below.
        if self.input.combo_held()
            && !self.outputs[idx].ignore_hotkeys
            && !repeat
            && self.handle_hotkey(idx, scancode)
        {
            return;
        }

        if self.outputs[idx].grab_allowed {
            self.sink.key_event(scancode, true);
            self.sink.sync();
        }
    }

    /// Decode one hotkey. Returns true if the key was consumed.
    fn handle_hotkey(&mut self, idx: usize, scancode: u32) -> bool {
        match scancode {
            // Secondary outputs only; the primary window is never hidden.
            SCANCODE_DIGIT_2..=SCANCODE_DIGIT_9 => {
                if self.input.is_grabbed() {
                    self.grab_end(idx);
                }
                let target = (scancode - SCANCODE_DIGIT_1) as usize;
                self.toggle_output_window(target);
                true
            }
            SCANCODE_F => {
                self.toggle_fullscreen(idx);
                true
            }
            SCANCODE_G => {
                // Acquiring is always allowed; fullscreen only pins an
                // existing grab in place.
                if !self.input.is_grabbed() {
                    self.grab_start(idx);
                }
                else if !self.input.fullscreen() {
                    self.grab_end(idx);
                }
                true
            }
            SCANCODE_U => {
                // Surface refresh goes through the transition scheduler so
                // the context swap never happens mid-dispatch.
                let id = self.outputs[idx].id;
                if let Err(e) = self.request_mode_transition(id, TransitionKind::RefreshRaster, None) {
                    log::warn!("Refresh request for {} rejected: {}", id, e);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_keyup(&mut self, idx: usize, scancode: u32, mods: Modifiers) {
        self.input.set_mods(mods);
        self.outputs[idx].ignore_hotkeys = false;
        if self.outputs[idx].grab_allowed {
            self.sink.key_event(scancode, false);
            self.sink.sync();
        }
    }

    fn handle_text_input(&mut self, idx: usize, text: &str) {
        // Graphic outputs get raw scancodes; text flows only to the rest.
        if !self.outputs[idx].grab_allowed {
            self.sink.text_input(text);
            self.sink.sync();
        }
    }

    fn handle_motion(&mut self, idx: usize, x: i32, y: i32, dx: i32, dy: i32) {
        if !self.outputs[idx].grab_allowed {
            return;
        }

        if self.absolute_mode() {
            let dims = self.outputs[idx].dims;
            let max_x = dims.w as i32 - 1;
            let max_y = dims.h as i32 - 1;
            if self.input.is_grabbed()
                && !self.input.fullscreen()
                && (x <= 0 || y <= 0 || x >= max_x || y >= max_y)
            {
                // Pointer escaped to the window edge: release first, then
                // let the position through.
                self.grab_end(idx);
            }
            else if !self.input.is_grabbed() && x > 0 && x < max_x && y > 0 && y < max_y {
                self.grab_start(idx);
            }
        }

        if self.input.is_grabbed() || self.absolute_mode() {
            self.forward_pointer(idx, x, y, dx, dy);
        }
    }

    fn forward_pointer(&mut self, idx: usize, x: i32, y: i32, dx: i32, dy: i32) {
        if self.absolute_mode() {
            self.sink.pointer_abs(x, y, self.outputs[idx].dims);
        }
        else {
            self.sink.pointer_rel(dx, dy);
            self.input.move_guest_pos(dx, dy);
        }
        self.sink.sync();
    }

    fn handle_button(&mut self, idx: usize, button: PointerButton, pressed: bool, x: i32, y: i32) {
        if !self.outputs[idx].grab_allowed {
            return;
        }

        // Ungrabbed relative mode: left-button release captures instead of
        // forwarding.
        if !self.absolute_mode() && !self.input.is_grabbed() {
            if button == PointerButton::Left && !pressed {
                self.grab_start(idx);
            }
            return;
        }

        self.input.set_buttons(self.input.buttons().with(button, pressed));
        if self.absolute_mode() {
            self.sink.pointer_abs(x, y, self.outputs[idx].dims);
        }
        self.sink.pointer_button(button, pressed);
        self.sink.sync();
    }

    fn handle_wheel(&mut self, idx: usize, dx: i32, dy: i32) {
        if !self.outputs[idx].grab_allowed {
            return;
        }

        // Vertical motion wins over horizontal; a wheel detent becomes a
        // press/release pair.
        let button = if dy > 0 {
            PointerButton::WheelUp
        }
        else if dy < 0 {
            PointerButton::WheelDown
        }
        else if dx > 0 {
            PointerButton::WheelLeft
        }
        else if dx < 0 {
            PointerButton::WheelRight
        }
        else {
            return;
        };

        self.sink.pointer_button(button, true);
        self.sink.sync();
        self.sink.pointer_button(button, false);
        self.sink.sync();
    }

    fn handle_window_event(&mut self, idx: usize, event: HostWindowEvent) {
        match event {
            HostWindowEvent::FocusGained => self.on_focus_gained(idx),
            HostWindowEvent::FocusLost => self.on_focus_lost(idx),
            HostWindowEvent::Enter => self.on_pointer_enter(idx),
            HostWindowEvent::Resized(dims) => {
                self.outputs[idx].window_dims = Some(dims);
                self.backend.redraw(self.outputs[idx].id);
            }
            HostWindowEvent::Exposed => {
                self.backend.redraw(self.outputs[idx].id);
            }
            HostWindowEvent::Minimized | HostWindowEvent::Hidden => {
                self.outputs[idx].hidden = true;
                self.outputs[idx].governor.on_minimized();
            }
            HostWindowEvent::Restored | HostWindowEvent::Shown => {
                self.outputs[idx].hidden = false;
                self.outputs[idx].governor.on_restored();
                self.backend.redraw(self.outputs[idx].id);
            }
            HostWindowEvent::CloseRequested => {
                if idx == 0 {
                    if self.params.window_close {
                        self.emit(SchedulerEvent::ShutdownRequested);
                    }
                }
                else {
                    // Secondary outputs just hide; Ctrl-Alt-<n> brings them
                    // back.
                    self.toggle_output_window(idx);
                }
            }
        }
    }

    /// Hide or re-show a secondary output window.
    pub(crate) fn toggle_output_window(&mut self, target: usize) {
        if self.input.fullscreen() {
            return;
        }
        let Some(out) = self.outputs.get_mut(target) else {
            return;
        };
        let id = out.id;
        out.hidden = !out.hidden;
        let hidden = out.hidden;
        if hidden {
            out.governor.on_minimized();
        }
        else {
            out.governor.on_restored();
        }
        self.backend.show_window(id, !hidden);
        if !hidden {
            self.backend.redraw(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::{ButtonMask, HostEvent, Modifiers},
        mock::{fixture, BackendOp, InputSample},
        types::{DisplayDimensions, OutputId},
    };
    use web_time::Duration;

    const CTRL_ALT: Modifiers = Modifiers {
        lctrl:  true,
        rctrl:  false,
        lalt:   true,
        ralt:   false,
        lshift: false,
        rshift: false,
    };

    fn key_down(sched: &mut crate::mock::MockScheduler, scancode: u32, mods: Modifiers) {
        sched.pump_mut().push(HostEvent::KeyDown {
            output: OutputId(0),
            scancode,
            mods,
            repeat: false,
        });
        sched.on_tick();
    }

    #[test]
    fn grab_hotkey_toggles_capture() {
        let (mut sched, _rx, _time) = fixture();

        key_down(&mut sched, SCANCODE_G, CTRL_ALT);
        assert!(sched.is_grabbed());
        // The hotkey must not leak to the guest.
        assert!(!sched
            .sink()
            .samples
            .iter()
            .any(|s| matches!(s, InputSample::Key { .. })));

        key_down(&mut sched, SCANCODE_G, CTRL_ALT);
        assert!(!sched.is_grabbed());
    }

    #[test]
    fn plain_keys_forward_to_sink() {
        let (mut sched, _rx, _time) = fixture();
        key_down(&mut sched, 4, Modifiers::NONE); // 'a'
        assert_eq!(
            sched.sink().samples,
            vec![
                InputSample::Key {
                    scancode: 4,
                    pressed:  true,
                },
                InputSample::Sync,
            ]
        );
    }

    #[test]
    fn hotkey_suppression_until_keyup() {
        let (mut sched, _rx, _time) = fixture();
        // Combo held while the pointer entered: suppression armed.
        sched.input.set_mods(CTRL_ALT);
        sched.pump_mut().push(HostEvent::Window {
            output: OutputId(0),
            event:  crate::events::HostWindowEvent::Enter,
        });
        sched.on_tick();

        // The would-be fullscreen hotkey does not fire, but the key itself
        // still reaches the guest.
        key_down(&mut sched, SCANCODE_F, CTRL_ALT);
        assert!(!sched.is_fullscreen());
        assert_eq!(
            sched.sink().samples,
            vec![
                InputSample::Key {
                    scancode: SCANCODE_F,
                    pressed:  true,
                },
                InputSample::Sync,
            ]
        );

        // Key-up clears suppression; the hotkey works again.
        sched.pump_mut().push(HostEvent::KeyUp {
            output:   OutputId(0),
            scancode: SCANCODE_F,
            mods:     Modifiers::NONE,
        });
        sched.on_tick();
        key_down(&mut sched, SCANCODE_F, CTRL_ALT);
        assert!(sched.is_fullscreen());
    }

    #[test]
    fn left_release_starts_grab_in_relative_mode() {
        let (mut sched, _rx, _time) = fixture();

        sched.pump_mut().push(HostEvent::MouseButton {
            output:  OutputId(0),
            button:  PointerButton::Left,
            pressed: true,
            x:       10,
            y:       10,
        });
        sched.pump_mut().push(HostEvent::MouseButton {
            output:  OutputId(0),
            button:  PointerButton::Left,
            pressed: false,
            x:       10,
            y:       10,
        });
        sched.on_tick();

        assert!(sched.is_grabbed());
        // Neither press nor release reached the guest.
        assert!(sched.sink().samples.is_empty());
    }

    #[test]
    fn relative_motion_forwards_only_while_grabbed() {
        let (mut sched, _rx, _time) = fixture();

        sched.pump_mut().push(HostEvent::MouseMotion {
            output:  OutputId(0),
            x:       50,
            y:       50,
            dx:      5,
            dy:      -3,
            buttons: ButtonMask::EMPTY,
        });
        sched.on_tick();
        assert!(sched.sink().samples.is_empty());

        sched.grab_start(0);
        sched.pump_mut().push(HostEvent::MouseMotion {
            output:  OutputId(0),
            x:       55,
            y:       47,
            dx:      5,
            dy:      -3,
            buttons: ButtonMask::EMPTY,
        });
        sched.on_tick();
        assert_eq!(
            sched.sink().samples,
            vec![InputSample::Rel { dx: 5, dy: -3 }, InputSample::Sync]
        );
    }

    #[test]
    fn absolute_edge_release_happens_before_forward() {
        let (mut sched, _rx, _time) = fixture();
        sched.input.set_absolute_enabled(true);
        sched.grab_start(0);
        assert!(sched.is_grabbed());

        // Pointer at the right edge of the 640-wide surface.
        sched.pump_mut().push(HostEvent::MouseMotion {
            output:  OutputId(0),
            x:       639,
            y:       200,
            dx:      2,
            dy:      0,
            buttons: ButtonMask::EMPTY,
        });
        sched.on_tick();

        assert!(!sched.is_grabbed());
        // The position is still delivered after the release.
        assert_eq!(
            sched.sink().samples,
            vec![
                InputSample::Abs {
                    x:      639,
                    y:      200,
                    bounds: DisplayDimensions::new(640, 480),
                },
                InputSample::Sync,
            ]
        );
    }

    #[test]
    fn wheel_expands_to_press_release_with_vertical_priority() {
        let (mut sched, _rx, _time) = fixture();
        sched.pump_mut().push(HostEvent::MouseWheel {
            output: OutputId(0),
            dx:     1,
            dy:     1,
        });
        sched.on_tick();

        assert_eq!(
            sched.sink().samples,
            vec![
                InputSample::Button {
                    button:  PointerButton::WheelUp,
                    pressed: true,
                },
                InputSample::Sync,
                InputSample::Button {
                    button:  PointerButton::WheelUp,
                    pressed: false,
                },
                InputSample::Sync,
            ]
        );
    }

    #[test]
    fn fullscreen_hotkey_round_trip() {
        let (mut sched, _rx, _time) = fixture();
        key_down(&mut sched, SCANCODE_F, CTRL_ALT);
        assert!(sched.is_fullscreen());
        assert!(sched
            .backend()
            .ops
            .contains(&BackendOp::SetFullscreen(OutputId(0), true)));

        key_down(&mut sched, SCANCODE_F, CTRL_ALT);
        assert!(!sched.is_fullscreen());
    }

    #[test]
    fn digit_hotkey_toggles_secondary_window() {
        let (mut sched, _rx, _time) = fixture();
        sched.add_output(DisplayDimensions::new(320, 200), false).unwrap();

        // Ctrl-Alt-2 hides output 1.
        key_down(&mut sched, SCANCODE_DIGIT_1 + 1, CTRL_ALT);
        assert!(sched.output(OutputId(1)).unwrap().is_hidden());
        assert!(sched
            .backend()
            .ops
            .contains(&BackendOp::ShowWindow(OutputId(1), false)));
        // Hidden outputs idle at the minimized cadence.
        assert_eq!(
            sched.refresh_interval(OutputId(1)).unwrap(),
            Duration::from_millis(500)
        );

        key_down(&mut sched, SCANCODE_DIGIT_1 + 1, CTRL_ALT);
        assert!(!sched.output(OutputId(1)).unwrap().is_hidden());
    }

    #[test]
    fn digit_hotkey_releases_grab_before_hiding() {
        let (mut sched, _rx, _time) = fixture();
        sched.add_output(DisplayDimensions::new(320, 200), false).unwrap();
        sched.grab_start(0);
        assert!(sched.is_grabbed());

        key_down(&mut sched, SCANCODE_DIGIT_2, CTRL_ALT);
        assert!(!sched.is_grabbed(), "grab must end before a window is hidden");
        assert!(sched.output(OutputId(1)).unwrap().is_hidden());
    }

    #[test]
    fn digit_one_is_not_a_hotkey() {
        let (mut sched, _rx, _time) = fixture();
        key_down(&mut sched, SCANCODE_DIGIT_1, CTRL_ALT);

        // The primary window stays up and the key goes to the guest.
        assert!(!sched.output(OutputId(0)).unwrap().is_hidden());
        assert!(sched.sink().samples.contains(&InputSample::Key {
            scancode: SCANCODE_DIGIT_1,
            pressed:  true,
        }));
    }

    #[test]
    fn horizontal_wheel_maps_positive_dx_to_wheel_left() {
        let (mut sched, _rx, _time) = fixture();
        sched.pump_mut().push(HostEvent::MouseWheel {
            output: OutputId(0),
            dx:     1,
            dy:     0,
        });
        sched.on_tick();

        assert_eq!(
            sched.sink().samples,
            vec![
                InputSample::Button {
                    button:  PointerButton::WheelLeft,
                    pressed: true,
                },
                InputSample::Sync,
                InputSample::Button {
                    button:  PointerButton::WheelLeft,
                    pressed: false,
                },
                InputSample::Sync,
            ]
        );
    }

    #[test]
    fn grab_hotkey_acquires_in_fullscreen_but_never_releases() {
        let (mut sched, _rx, _time) = fixture();
        sched.toggle_fullscreen(0);
        assert!(sched.is_grabbed());

        // The release half is pinned while fullscreen.
        key_down(&mut sched, SCANCODE_G, CTRL_ALT);
        assert!(sched.is_grabbed());

        // An ungrabbed fullscreen window can still be captured.
        sched.grab_end(0);
        key_down(&mut sched, SCANCODE_G, CTRL_ALT);
        assert!(sched.is_grabbed());
    }

    #[test]
    fn text_input_routes_only_to_non_graphic_outputs() {
        let (mut sched, _rx, _time) = fixture();
        sched.add_output(DisplayDimensions::new(320, 200), false).unwrap();

        sched.pump_mut().push(HostEvent::TextInput {
            output: OutputId(0),
            text:   "x".to_string(),
        });
        sched.pump_mut().push(HostEvent::TextInput {
            output: OutputId(1),
            text:   "ls\n".to_string(),
        });
        sched.on_tick();

        assert_eq!(
            sched.sink().samples,
            vec![InputSample::Text("ls\n".to_string()), InputSample::Sync]
        );
    }

    #[test]
    fn idle_ticks_throttle_refresh_per_output() {
        let (mut sched, _rx, _time) = fixture();
        sched.add_output(DisplayDimensions::new(320, 200), true).unwrap();

        // Input on output 0 only.
        key_down(&mut sched, 4, Modifiers::NONE);
        assert_eq!(
            sched.refresh_interval(OutputId(0)).unwrap(),
            Duration::from_millis(10)
        );

        // Idle long enough for both governors to throttle; output 0 keeps
        // getting input and stays busy.
        for _ in 0..8 {
            key_down(&mut sched, 4, Modifiers::NONE);
        }
        assert_eq!(
            sched.refresh_interval(OutputId(0)).unwrap(),
            Duration::from_millis(10)
        );
        assert_eq!(
            sched.refresh_interval(OutputId(1)).unwrap(),
            Duration::from_millis(30),
            "untouched output must throttle independently"
        );
    }

    #[test]
    fn quit_event_emits_shutdown() {
        let (mut sched, rx, _time) = fixture();
        sched.pump_mut().push(HostEvent::Quit);
        sched.on_tick();
        assert!(matches!(
            rx.try_recv(),
            Ok(crate::scheduler::SchedulerEvent::ShutdownRequested)
        ));
    }

    #[test]
    fn quit_ignored_when_window_close_disabled() {
        let (mut sched, rx, _time) = crate::mock::fixture_with(crate::scheduler::SchedulerParams {
            window_close: false,
            ..Default::default()
        });
        sched.pump_mut().push(HostEvent::Quit);
        sched.on_tick();
        assert!(rx.try_recv().is_err());
    }
}
