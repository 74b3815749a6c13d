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

    vireo_backend_null::lib.rs

    A windowless DisplayBackend. Windows are bookkeeping records, contexts
    are counters, and every operation is logged. Paired with QueuePump and
    NullInputSink this drives the scheduler end to end with no host toolkit,
    for the headless frontend and integration tests.
*/

use std::collections::{HashMap, VecDeque};

use vireo_display::{
    AccelContext,
    ContextParams,
    DisplayBackend,
    DisplayDimensions,
    EventPump,
    GuestInputSink,
    HostEvent,
    NativeHandle,
    PointerButton,
    RasterContext,
    WindowFlags,
    WindowPosition,
};

use anyhow::{anyhow, Error};
use vireo_display::OutputId;

/// State kept for one virtual window.
#[derive(Clone, Debug)]
pub struct NullWindow {
    pub dims: DisplayDimensions,
    pub position: WindowPosition,
    pub fullscreen: bool,
    pub visible: bool,
    pub title: String,
    pub grabbed: bool,
}

/// A display backend with no host windowing system behind it.
pub struct NullBackend {
    windows: HashMap<OutputId, NullWindow>,
    focus_window: Option<OutputId>,
    pointer: (i32, i32),
    relative_pointer: bool,
    cursor_visible: bool,
    hint_accelerated: bool,
    next_ctx: u64,
    redraws: u64,
    /// Fault injection: fail the next accelerated context creation.
    pub fail_accel: bool,
}

impl NullBackend {
    pub fn new() -> Self {
        NullBackend {
            windows: HashMap::new(),
            focus_window: None,
            pointer: (0, 0),
            relative_pointer: false,
            cursor_visible: true,
            hint_accelerated: false,
            next_ctx: 0,
            redraws: 0,
            fail_accel: false,
        }
    }

    pub fn window(&self, output: OutputId) -> Option<&NullWindow> {
        self.windows.get(&output)
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn is_relative_pointer(&self) -> bool {
        self.relative_pointer
    }

    /// Simulate the host moving focus to one window (or away entirely).
    pub fn set_focus(&mut self, output: Option<OutputId>) {
        self.focus_window = output;
    }

    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.pointer = (x, y);
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        NullBackend::new()
    }
}

impl DisplayBackend for NullBackend {
    fn create_window(&mut self, output: OutputId, dims: DisplayDimensions, flags: WindowFlags) -> Result<(), Error> {
        log::debug!("create_window: {} {} flags: {:?}", output, dims, flags);
        self.windows.insert(output, NullWindow {
            dims,
            position: WindowPosition::default(),
            fullscreen: flags.fullscreen,
            visible: !flags.hidden,
            title: String::new(),
            grabbed: false,
        });
        if self.focus_window.is_none() {
            self.focus_window = Some(output);
        }
        Ok(())
    }

    fn destroy_window(&mut self, output: OutputId) {
        log::debug!("destroy_window: {}", output);
        self.windows.remove(&output);
    }

    fn window_size(&self, output: OutputId) -> DisplayDimensions {
        self.windows.get(&output).map(|w| w.dims).unwrap_or_default()
    }

    fn set_window_size(&mut self, output: OutputId, dims: DisplayDimensions) {
        if let Some(w) = self.windows.get_mut(&output) {
            w.dims = dims;
        }
    }

    fn window_position(&self, output: OutputId) -> WindowPosition {
        self.windows.get(&output).map(|w| w.position).unwrap_or_default()
    }

    fn set_window_position(&mut self, output: OutputId, pos: WindowPosition) {
        if let Some(w) = self.windows.get_mut(&output) {
            w.position = pos;
        }
    }

    fn set_fullscreen(&mut self, output: OutputId, fullscreen: bool) {
        if let Some(w) = self.windows.get_mut(&output) {
            w.fullscreen = fullscreen;
        }
    }

    fn show_window(&mut self, output: OutputId, visible: bool) {
        if let Some(w) = self.windows.get_mut(&output) {
            w.visible = visible;
        }
    }

    fn set_title(&mut self, output: OutputId, title: &str) {
        if let Some(w) = self.windows.get_mut(&output) {
            w.title = title.to_string();
        }
    }

    fn has_focus(&self, output: OutputId) -> bool {
        self.focus_window == Some(output)
    }

    fn set_grab(&mut self, output: OutputId, grab: bool) {
        log::debug!("set_grab: {} {}", output, grab);
        if let Some(w) = self.windows.get_mut(&output) {
            w.grabbed = grab;
        }
    }

    fn set_relative_pointer(&mut self, relative: bool) {
        self.relative_pointer = relative;
    }

    fn show_cursor(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn set_guest_cursor_sprite(&mut self, guest: bool) {
        log::trace!("set_guest_cursor_sprite: {}", guest);
    }

    fn warp_pointer(&mut self, output: OutputId, x: i32, y: i32) {
        log::trace!("warp_pointer: {} to {},{}", output, x, y);
        self.pointer = (x, y);
    }

    fn pointer_position(&self) -> (i32, i32) {
        self.pointer
    }

    fn create_raster_context(&mut self, output: OutputId) -> Result<RasterContext, Error> {
        self.next_ctx += 1;
        log::debug!("create_raster_context: {} id {}", output, self.next_ctx);
        Ok(RasterContext { id: self.next_ctx })
    }

    fn destroy_raster_context(&mut self, output: OutputId, ctx: RasterContext) {
        log::debug!("destroy_raster_context: {} id {}", output, ctx.id);
    }

    fn create_accel_context(&mut self, output: OutputId, params: &ContextParams) -> Result<AccelContext, Error> {
        if self.fail_accel {
            return Err(anyhow!("accelerated context unavailable"));
        }
        self.next_ctx += 1;
        log::debug!("create_accel_context: {} id {} params: {:?}", output, self.next_ctx, params);
        Ok(AccelContext {
            id:     self.next_ctx,
            native: NativeHandle(0x4000_0000 + self.next_ctx),
        })
    }

    fn destroy_accel_context(&mut self, output: OutputId, ctx: AccelContext) {
        log::debug!("destroy_accel_context: {} id {}", output, ctx.id);
    }

    fn set_render_driver_hint(&mut self, accelerated: bool) -> bool {
        let changed = self.hint_accelerated != accelerated;
        self.hint_accelerated = accelerated;
        changed
    }

    fn redraw(&mut self, output: OutputId) {
        log::trace!("redraw: {}", output);
        self.redraws += 1;
    }
}

/// Everything the router submitted toward the guest, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum GuestSample {
    Key { scancode: u32, pressed: bool },
    Text(String),
    Rel { dx: i32, dy: i32 },
    Abs { x: i32, y: i32, bounds: DisplayDimensions },
    Button { button: PointerButton, pressed: bool },
    Sync,
}

/// Recording input sink standing in for an emulation core's input queue.
pub struct NullInputSink {
    pub samples: Vec<GuestSample>,
    pub absolute: bool,
}

impl NullInputSink {
    pub fn new() -> Self {
        NullInputSink {
            samples: Vec::new(),
            absolute: false,
        }
    }

    /// Key samples only, press state preserved.
    pub fn key_samples(&self) -> Vec<(u32, bool)> {
        self.samples
            .iter()
            .filter_map(|s| match s {
                GuestSample::Key { scancode, pressed } => Some((*scancode, *pressed)),
                _ => None,
            })
            .collect()
    }
}

impl Default for NullInputSink {
    fn default() -> Self {
        NullInputSink::new()
    }
}

impl GuestInputSink for NullInputSink {
    fn key_event(&mut self, scancode: u32, pressed: bool) {
        self.samples.push(GuestSample::Key { scancode, pressed });
    }

    fn text_input(&mut self, text: &str) {
        self.samples.push(GuestSample::Text(text.to_string()));
    }

    fn pointer_rel(&mut self, dx: i32, dy: i32) {
        self.samples.push(GuestSample::Rel { dx, dy });
    }

    fn pointer_abs(&mut self, x: i32, y: i32, bounds: DisplayDimensions) {
        self.samples.push(GuestSample::Abs { x, y, bounds });
    }

    fn pointer_button(&mut self, button: PointerButton, pressed: bool) {
        self.samples.push(GuestSample::Button { button, pressed });
    }

    fn sync(&mut self) {
        self.samples.push(GuestSample::Sync);
    }

    fn is_absolute(&self) -> bool {
        self.absolute
    }
}

/// An event pump fed from a queue.
pub struct QueuePump {
    queue: VecDeque<HostEvent>,
}

impl QueuePump {
    pub fn new() -> Self {
        QueuePump {
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, ev: HostEvent) {
        self.queue.push_back(ev);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for QueuePump {
    fn default() -> Self {
        QueuePump::new()
    }
}

impl EventPump for QueuePump {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.queue.pop_front()
    }
}
