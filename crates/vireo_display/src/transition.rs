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

    vireo_display::transition.rs

    Mode-transition scheduler. Render-mode changes (raster pause/resume,
    surface refresh, accelerated passthrough acquire/release) are never
    applied inline with event routing: a request parks here and its work runs
    when the one-shot timer fires in the tick's timer phase. A newer request
    for the same output supersedes the parked one and re-arms the same timer,
    so at most one timer per output is ever live.
*/

use crate::{
    backend::{ContextParams, DisplayBackend, WindowFlags},
    events::EventPump,
    scheduler::{DisplayScheduler, SchedulerEvent, TimerEvent},
    sink::GuestInputSink,
    timer::TimerHandle,
    types::{DisplayDimensions, OutputId},
    DisplayError,
};
use strum_macros::Display;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Pending,
}

/// What a mode-transition request asks for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TransitionKind {
    /// Tear down the raster path; an external consumer draws into the window
    /// with its own means.
    PauseRaster,
    /// Restore the raster path after a pause.
    ResumeRaster,
    /// Destroy and recreate the raster context in place (surface refresh
    /// hotkey).
    RefreshRaster,
    /// Full accelerated handoff: driver hint, context creation, native
    /// handle capture.
    AcquireAccelerated(ContextParams),
    /// End the accelerated session and restore the raster path and saved
    /// geometry.
    ReleaseAccelerated,
}

#[derive(Clone, Debug)]
pub struct ModeTransitionRequest {
    pub kind:       TransitionKind,
    /// Window geometry to apply as the final transition step.
    pub size:       Option<DisplayDimensions>,
    pub generation: u64,
}

/// Per-output transition ledger.
pub struct ModeTransition {
    output: OutputId,
    state: TransitionState,
    pending: Option<ModeTransitionRequest>,
    timer: Option<TimerHandle>,
    generation: u64,
    /// Window geometry captured when an accelerated session starts, restored
    /// on release unless the release names its own size.
    saved_dims: Option<DisplayDimensions>,
    /// True while the raster path is torn down (paused or accelerated).
    render_pause: bool,
    /// A second passthrough consumer attached while a session was active; it
    /// re-engages the pause when the primary session releases.
    secondary_layered: bool,
}

impl ModeTransition {
    pub fn new(output: OutputId) -> Self {
        ModeTransition {
            output,
            state: TransitionState::Idle,
            pending: None,
            timer: None,
            generation: 0,
            saved_dims: None,
            render_pause: false,
            secondary_layered: false,
        }
    }

    #[inline]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    #[inline]
    pub fn render_paused(&self) -> bool {
        self.render_pause
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<P, S, B> DisplayScheduler<P, S, B>
where
    P: EventPump,
    S: GuestInputSink,
    B: DisplayBackend,
{
    /// Queue a render-mode change for an output. Returns the request
    /// generation; completion or failure is reported asynchronously on the
    /// scheduler event channel, tagged with the same generation.
    pub fn request_mode_transition(
        &mut self,
        output: OutputId,
        kind: TransitionKind,
        size: Option<DisplayDimensions>,
    ) -> Result<u64, DisplayError> {
        let idx = output.idx();
        if idx >= self.outputs.len() {
            return Err(DisplayError::InvalidRequest(format!("no such output {}", output)));
        }

        let trans = &mut self.transitions[idx];
        trans.generation += 1;
        let generation = trans.generation;

        // Requests already satisfied by the current mode complete without
        // touching any context.
        let immediate = match &kind {
            TransitionKind::PauseRaster if trans.render_pause && trans.pending.is_none() => true,
            TransitionKind::ResumeRaster if !trans.render_pause && trans.pending.is_none() => true,
            TransitionKind::AcquireAccelerated(_) if trans.render_pause => {
                // A second consumer layering on an active session; it
                // re-engages the pause when that session ends.
                trans.secondary_layered = true;
                true
            }
            _ => false,
        };
        if immediate {
            log::debug!(
                "Mode transition {:?} for {} satisfied immediately (gen {})",
                kind,
                output,
                generation
            );
            self.emit(SchedulerEvent::TransitionComplete { output, generation });
            return Ok(generation);
        }

        let now = self.clock.now_ms();
        let trans = &mut self.transitions[idx];
        let req = ModeTransitionRequest { kind, size, generation };
        if trans.pending.replace(req).is_some() {
            // Supersede: re-arm the existing timer rather than creating a
            // second one.
            log::debug!("Superseding pending transition for {} (gen {})", output, generation);
            if let Some(handle) = trans.timer {
                self.timers.rearm(handle, now, 0);
            }
        }
        else {
            trans.state = TransitionState::Pending;
            let handle = self.timers.schedule_once(now, 0, TimerEvent::ModeTransition(output));
            self.transitions[idx].timer = Some(handle);
        }
        Ok(generation)
    }

    /// Execute the parked request for one output. Runs in the tick's timer
    /// phase.
    pub(crate) fn fire_transition(&mut self, idx: usize) {
        let output = self.outputs[idx].id;
        self.transitions[idx].timer = None;
        let Some(req) = self.transitions[idx].pending.take() else {
            // Stale timer for a request that was consumed elsewhere.
            self.transitions[idx].state = TransitionState::Idle;
            return;
        };
        let generation = req.generation;
        let mut final_size = req.size;
        log::debug!("Firing mode transition {:?} for {} (gen {})", req.kind, output, generation);

        match req.kind {
            TransitionKind::PauseRaster => {
                if let Some(raster) = self.outputs[idx].raster.take() {
                    self.backend.destroy_raster_context(output, raster);
                }
                self.transitions[idx].render_pause = true;
                self.emit(SchedulerEvent::PassthroughActive {
                    output,
                    active: true,
                    handle: None,
                });
            }
            TransitionKind::ResumeRaster => {
                if self.outputs[idx].raster.is_none() && self.outputs[idx].accel.is_none() {
                    match self.backend.create_raster_context(output) {
                        Ok(ctx) => self.outputs[idx].raster = Some(ctx),
                        Err(e) => {
                            self.fail_transition(idx, output, generation, e.to_string());
                            return;
                        }
                    }
                }
                if let Some(pos) = self.outputs[idx].position.take() {
                    self.backend.set_window_position(output, pos);
                }
                self.transitions[idx].render_pause = false;
                self.backend.redraw(output);
                self.emit(SchedulerEvent::PassthroughActive {
                    output,
                    active: false,
                    handle: None,
                });
            }
            TransitionKind::RefreshRaster => {
                if self.outputs[idx].accel.is_none() && !self.transitions[idx].render_pause {
                    if let Some(raster) = self.outputs[idx].raster.take() {
                        self.backend.destroy_raster_context(output, raster);
                    }
                    match self.backend.create_raster_context(output) {
                        Ok(ctx) => self.outputs[idx].raster = Some(ctx),
                        Err(e) => {
                            self.fail_transition(idx, output, generation, e.to_string());
                            return;
                        }
                    }
                    self.backend.redraw(output);
                }
            }
            TransitionKind::AcquireAccelerated(params) => {
                if self.outputs[idx].accel.is_some() {
                    log::warn!("{} is already accelerated", output);
                }
                else if let Err(reason) = self.acquire_accelerated(idx, output, &params) {
                    self.fail_transition(idx, output, generation, reason);
                    return;
                }
            }
            TransitionKind::ReleaseAccelerated => {
                if let Some(accel) = self.outputs[idx].accel.take() {
                    self.backend.destroy_accel_context(output, accel);
                }
                if self.backend.set_render_driver_hint(false) {
                    if let Err(e) = self.recreate_window(idx, false) {
                        self.fail_transition(idx, output, generation, e.to_string());
                        return;
                    }
                }
                if self.outputs[idx].raster.is_none() {
                    match self.backend.create_raster_context(output) {
                        Ok(ctx) => self.outputs[idx].raster = Some(ctx),
                        Err(e) => {
                            self.fail_transition(idx, output, generation, e.to_string());
                            return;
                        }
                    }
                }
                if let Some(pos) = self.outputs[idx].position.take() {
                    self.backend.set_window_position(output, pos);
                }
                if final_size.is_none() {
                    final_size = self.transitions[idx].saved_dims.take();
                }
                else {
                    self.transitions[idx].saved_dims = None;
                }
                self.transitions[idx].render_pause = false;
                self.backend.redraw(output);
                self.emit(SchedulerEvent::PassthroughActive {
                    output,
                    active: false,
                    handle: None,
                });
            }
        }

        // Geometry is always the final step, after the mode itself is live.
        if let Some(size) = final_size {
            self.backend.set_window_size(output, size);
            self.outputs[idx].dims = size;
        }

        self.transitions[idx].state = TransitionState::Idle;
        self.emit(SchedulerEvent::TransitionComplete { output, generation });

        // A layered consumer re-engages as a fresh request of its own.
        if self.transitions[idx].secondary_layered && !self.transitions[idx].render_pause {
            self.transitions[idx].secondary_layered = false;
            match self.request_mode_transition(output, TransitionKind::PauseRaster, None) {
                Ok(generation) => {
                    log::debug!("Layered passthrough re-engaging on {} (gen {})", output, generation)
                }
                Err(e) => log::error!("Layered passthrough re-engage on {} rejected: {}", output, e),
            }
        }
    }

    /// Accelerated handoff. The raster context is only destroyed after the
    /// accelerated context exists, so a failed acquire leaves the raster
    /// path intact.
    fn acquire_accelerated(&mut self, idx: usize, output: OutputId, params: &ContextParams) -> Result<(), String> {
        self.transitions[idx].saved_dims = Some(self.backend.window_size(output));
        self.outputs[idx].position = Some(self.backend.window_position(output));

        let hint_changed = self.backend.set_render_driver_hint(true);
        if hint_changed {
            if let Err(e) = self.recreate_window(idx, true) {
                self.backend.set_render_driver_hint(false);
                return Err(e.to_string());
            }
        }

        match self.backend.create_accel_context(output, params) {
            Ok(ctx) => {
                let native = ctx.native;
                self.outputs[idx].accel = Some(ctx);
                if let Some(raster) = self.outputs[idx].raster.take() {
                    self.backend.destroy_raster_context(output, raster);
                }
                self.transitions[idx].render_pause = true;
                self.emit(SchedulerEvent::PassthroughActive {
                    output,
                    active: true,
                    handle: Some(native),
                });
                Ok(())
            }
            Err(e) => {
                // Roll the driver hint back so the raster path keeps the
                // window it understands.
                if self.backend.set_render_driver_hint(false) && hint_changed {
                    if let Err(e2) = self.recreate_window(idx, false) {
                        log::error!("Window restore after failed acquire on {}: {}", output, e2);
                    }
                }
                self.transitions[idx].saved_dims = None;
                Err(e.to_string())
            }
        }
    }

    fn fail_transition(&mut self, idx: usize, output: OutputId, generation: u64, reason: String) {
        log::error!("Mode transition for {} failed (gen {}): {}", output, generation, reason);
        self.transitions[idx].state = TransitionState::Idle;
        self.emit(SchedulerEvent::TransitionFailed {
            output,
            generation,
            reason,
        });
    }

    /// Destroy and recreate an output's native window, preserving position
    /// and the raster context. An active grab cannot survive the native
    /// window; it is dropped here and the restore latch armed for the focus
    /// gain on the new window.
    pub(crate) fn recreate_window(&mut self, idx: usize, accelerated: bool) -> Result<(), anyhow::Error> {
        let output = self.outputs[idx].id;
        let pos = self.backend.window_position(output);

        if self.input.is_grabbed() {
            self.grab_end(idx);
            self.input.set_grab_restore_pending(true);
        }

        let had_raster = if let Some(raster) = self.outputs[idx].raster.take() {
            self.backend.destroy_raster_context(output, raster);
            true
        }
        else {
            false
        };

        self.backend.destroy_window(output);
        let flags = WindowFlags {
            fullscreen: self.input.fullscreen(),
            hidden: self.outputs[idx].hidden,
            accelerated,
        };
        self.backend.create_window(output, self.outputs[idx].dims, flags)?;
        self.backend.set_window_position(output, pos);

        if had_raster {
            self.outputs[idx].raster = Some(self.backend.create_raster_context(output)?);
        }
        self.update_caption(idx);
        Ok(())
    }
}
