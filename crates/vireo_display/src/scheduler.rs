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

    vireo_display::scheduler.rs

    The DisplayScheduler orchestrator. One tick = drain the event pump to
    exhaustion, route each event synchronously, advance the per-output
    refresh governors, then run due timers. Event routing and the
    grab/transition machinery live in sibling modules as impl blocks on this
    type.
*/

use crate::{
    backend::{DisplayBackend, NativeHandle, WindowFlags},
    events::EventPump,
    governor::RefreshParams,
    output::OutputWindow,
    sink::GuestInputSink,
    state::{InputState, ModifierPolicy},
    timer::{Clock, TimerQueue},
    transition::{ModeTransition, TransitionState},
    types::{DisplayDimensions, OutputId},
    DisplayError,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use web_time::Duration;

/// Notifications emitted by the scheduler for the frontend (and any
/// passthrough consumer) to drain.
#[derive(Clone, Debug)]
pub enum SchedulerEvent {
    /// A mode-transition request reached its terminal state.
    TransitionComplete { output: OutputId, generation: u64 },
    /// A mode-transition was aborted; the output continues in its prior
    /// mode.
    TransitionFailed {
        output:     OutputId,
        generation: u64,
        reason:     String,
    },
    /// The passthrough consumer gained or lost ownership of the native
    /// window handle.
    PassthroughActive {
        output: OutputId,
        active: bool,
        handle: Option<NativeHandle>,
    },
    /// The host asked to close the application.
    ShutdownRequested,
}

/// Events carried by the scheduler's timer queue.
pub(crate) enum TimerEvent {
    ModeTransition(OutputId),
}

/// Static scheduler configuration.
#[derive(Clone, Debug)]
pub struct SchedulerParams {
    /// Name shown in window captions.
    pub app_name: String,
    pub refresh: RefreshParams,
    /// Always keep the host cursor visible (never hide on grab).
    pub show_cursor: bool,
    /// Whether host-initiated window close / quit is honored.
    pub window_close: bool,
    pub start_fullscreen: bool,
    pub modifier_policy: ModifierPolicy,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        SchedulerParams {
            app_name: String::new(),
            refresh: RefreshParams::default(),
            show_cursor: false,
            window_close: true,
            start_fullscreen: false,
            modifier_policy: ModifierPolicy::default(),
        }
    }
}

pub struct DisplayScheduler<P, S, B> {
    pub(crate) pump:    P,
    pub(crate) sink:    S,
    pub(crate) backend: B,

    pub(crate) outputs: Vec<OutputWindow>,
    pub(crate) transitions: Vec<ModeTransition>,
    pub(crate) input: InputState,

    pub(crate) clock:  Box<dyn Clock>,
    pub(crate) timers: TimerQueue<TimerEvent>,

    pub(crate) events_tx: Sender<SchedulerEvent>,
    pub(crate) params: SchedulerParams,

    pub(crate) running: bool,
    pub(crate) last_running: bool,
    pub(crate) last_warp_ms: u64,
}

impl<P, S, B> DisplayScheduler<P, S, B>
where
    P: EventPump,
    S: GuestInputSink,
    B: DisplayBackend,
{
    /// Create a scheduler over the given collaborators. Returns the receiver
    /// end of the notification channel.
    pub fn new(
        pump: P,
        sink: S,
        backend: B,
        clock: Box<dyn Clock>,
        params: SchedulerParams,
    ) -> (Self, Receiver<SchedulerEvent>) {
        let (events_tx, events_rx) = unbounded();
        let input = InputState::new(params.modifier_policy, params.start_fullscreen);
        (
            DisplayScheduler {
                pump,
                sink,
                backend,
                outputs: Vec::new(),
                transitions: Vec::new(),
                input,
                clock,
                timers: TimerQueue::new(),
                events_tx,
                params,
                running: true,
                last_running: true,
                last_warp_ms: 0,
            },
            events_rx,
        )
    }

    /// Attach a new virtual output. The host window and the raster rendering
    /// path are created eagerly; accelerated contexts only ever appear
    /// through mode transitions.
    pub fn add_output(&mut self, dims: DisplayDimensions, grab_allowed: bool) -> Result<OutputId, DisplayError> {
        let id = OutputId(self.outputs.len());
        let flags = WindowFlags {
            fullscreen: self.input.fullscreen(),
            hidden: false,
            accelerated: false,
        };
        self.backend
            .create_window(id, dims, flags)
            .map_err(|e| DisplayError::ResourceCreation(e.to_string()))?;

        let mut out = OutputWindow::new(id, dims, grab_allowed, &self.params.refresh);
        out.raster = Some(
            self.backend
                .create_raster_context(id)
                .map_err(|e| DisplayError::ResourceCreation(e.to_string()))?,
        );
        self.outputs.push(out);
        self.transitions.push(ModeTransition::new(id));
        self.update_caption(id.idx());

        // A fullscreen session grabs the primary output immediately.
        if id == OutputId::PRIMARY && self.input.fullscreen() {
            self.grab_start(id.idx());
        }
        Ok(id)
    }

    /// One cooperative scheduler tick.
    pub fn on_tick(&mut self) {
        if self.running != self.last_running {
            self.last_running = self.running;
            for idx in 0..self.outputs.len() {
                self.update_caption(idx);
            }
        }

        let mut saw_input = vec![false; self.outputs.len()];
        while let Some(ev) = self.pump.poll_event() {
            if ev.is_input() {
                if let Some(id) = ev.output() {
                    if let Some(flag) = saw_input.get_mut(id.idx()) {
                        *flag = true;
                    }
                }
            }
            self.route_event(ev);
        }

        for (idx, saw) in saw_input.iter().enumerate() {
            self.outputs[idx].governor.on_tick(*saw);
        }

        // Timer phase: mode transitions advance here, never inline with
        // event routing.
        let now = self.clock.now_ms();
        for tev in self.timers.take_due(now) {
            match tev {
                TimerEvent::ModeTransition(id) => self.fire_transition(id.idx()),
            }
        }
    }

    /// Update the VM run state reflected in window captions.
    pub fn set_vm_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Host window geometry changed.
    pub fn notify_window_resized(&mut self, output: OutputId, width: u32, height: u32) {
        let Some(out) = self.outputs.get_mut(output.idx()) else {
            log::warn!("notify_window_resized: no such output {}", output);
            return;
        };
        out.window_dims = Some(DisplayDimensions::new(width, height));
        self.backend.redraw(output);
    }

    /// Surface dimensions plus fullscreen flag, for a passthrough consumer
    /// sizing its own swapchain.
    pub fn passthrough_geometry(&self, output: OutputId) -> Option<(DisplayDimensions, bool)> {
        self.outputs
            .get(output.idx())
            .map(|out| (out.dims, self.input.fullscreen()))
    }

    /// Guest cursor moved or changed visibility (device-driven).
    pub fn notify_guest_cursor(&mut self, output: OutputId, x: i32, y: i32, on: bool) {
        let idx = output.idx();
        let Some(out) = self.outputs.get(idx) else {
            return;
        };
        if !out.grab_allowed {
            return;
        }

        if on {
            if !self.input.guest_cursor() {
                self.show_host_cursor(idx);
            }
            if self.input.is_grabbed() || self.absolute_mode() {
                self.backend.set_guest_cursor_sprite(true);
                if !self.absolute_mode() {
                    self.backend.warp_pointer(output, x, y);
                }
            }
        }
        else if self.input.is_grabbed() {
            self.hide_host_cursor(idx);
        }
        self.input.set_guest_cursor(on, (x, y));
    }

    /// Rate-limited variant of [`notify_guest_cursor`] for passthrough
    /// consumers that report cursor positions every frame.
    pub fn warp_guest_cursor(&mut self, output: OutputId, x: i32, y: i32, on: bool) {
        let now = self.clock.now_ms();
        let interval = self.params.refresh.default.as_millis() as u64;
        if !on || now >= self.last_warp_ms + interval {
            self.last_warp_ms = now;
            self.notify_guest_cursor(output, x, y, on);
        }
    }

    /// The guest's pointer device switched between absolute and relative
    /// mode.
    pub fn notify_pointer_mode_changed(&mut self) {
        if self.outputs.is_empty() {
            return;
        }
        if self.sink.is_absolute() {
            if !self.input.absolute_enabled() {
                self.input.set_absolute_enabled(true);
                self.backend.set_relative_pointer(false);
                self.absolute_pointer_grab(OutputId::PRIMARY.idx());
            }
        }
        else if self.input.absolute_enabled() {
            if !self.input.fullscreen() {
                self.grab_end(OutputId::PRIMARY.idx());
            }
            self.input.set_absolute_enabled(false);
        }
    }

    /// Push a notification to the frontend channel. A dropped receiver is
    /// not fatal to the scheduler.
    pub(crate) fn emit(&self, ev: SchedulerEvent) {
        if let Err(e) = self.events_tx.send(ev) {
            log::warn!("Scheduler event receiver dropped: {}", e);
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn output(&self, id: OutputId) -> Option<&OutputWindow> {
        self.outputs.get(id.idx())
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    pub fn is_grabbed(&self) -> bool {
        self.input.is_grabbed()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.input.fullscreen()
    }

    pub fn refresh_interval(&self, id: OutputId) -> Option<Duration> {
        self.outputs.get(id.idx()).map(|out| out.refresh_interval())
    }

    pub fn transition_state(&self, id: OutputId) -> Option<TransitionState> {
        self.transitions.get(id.idx()).map(|t| t.state())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn pump_mut(&mut self) -> &mut P {
        &mut self.pump
    }
}
