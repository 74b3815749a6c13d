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

    vireo_display::lib.rs

    Display update and host input scheduling core.
*/

//! `vireo_display` coordinates asynchronous host input, device-driven display
//! refreshes, and timer-based render-mode transitions for an emulator
//! frontend, without ever mutating a render resource while the same tick is
//! mid-dispatch over an event for that resource.
//!
//! The crate is toolkit-agnostic: the windowing system, the guest input
//! queue, and the wall clock are consumed through the [`DisplayBackend`],
//! [`GuestInputSink`], [`EventPump`] and [`Clock`] traits. Everything runs on
//! a single cooperative tick: [`DisplayScheduler::on_tick`] drains the event
//! pump to exhaustion, routes each event synchronously, advances the
//! per-output refresh governors, and finally runs due timers. Render-mode
//! changes (raster path teardown/recreate, accelerated passthrough contexts)
//! are never applied inline; they are queued through the mode-transition
//! scheduler and advance when its one-shot timer fires.

pub mod backend;
pub mod events;
pub mod governor;
mod grab;
mod input;
pub mod output;
pub mod scheduler;
pub mod sink;
pub mod state;
pub mod timer;
pub mod transition;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

use thiserror::Error;

pub use backend::{AccelContext, ContextParams, DisplayBackend, NativeHandle, RasterContext, WindowFlags};
pub use events::{ButtonMask, EventPump, HostEvent, HostWindowEvent, Modifiers, PointerButton};
pub use governor::{RefreshGovernor, RefreshParams};
pub use output::OutputWindow;
pub use scheduler::{DisplayScheduler, SchedulerEvent, SchedulerParams};
pub use sink::GuestInputSink;
pub use state::{GrabState, InputState, ModifierPolicy};
pub use timer::{Clock, SystemClock, TimerHandle, TimerQueue};
pub use transition::{ModeTransitionRequest, TransitionKind, TransitionState};
pub use types::{DisplayDimensions, OutputId, WindowPosition};

/// Errors surfaced by the display scheduler. Recoverable conditions (focus
/// mismatches, duplicate pause/resume requests) are logged and swallowed
/// internally and never appear here.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Resource creation failed: {0}")]
    ResourceCreation(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
