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

    vireo_display::mock.rs

    Recording test doubles for the scheduler's collaborator traits, plus a
    manually-advanced clock. Test-only.
*/

use crate::{
    backend::{AccelContext, ContextParams, DisplayBackend, NativeHandle, RasterContext, WindowFlags},
    events::{EventPump, HostEvent, PointerButton},
    scheduler::{DisplayScheduler, SchedulerEvent, SchedulerParams},
    sink::GuestInputSink,
    timer::Clock,
    types::{DisplayDimensions, OutputId, WindowPosition},
};
use anyhow::anyhow;
use crossbeam_channel::Receiver;
use std::{
    cell::Cell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

pub(crate) struct MockPump {
    pub queue: VecDeque<HostEvent>,
}

impl MockPump {
    pub fn new() -> Self {
        MockPump {
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, ev: HostEvent) {
        self.queue.push_back(ev);
    }
}

impl EventPump for MockPump {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.queue.pop_front()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum InputSample {
    Key { scancode: u32, pressed: bool },
    Text(String),
    Rel { dx: i32, dy: i32 },
    Abs { x: i32, y: i32, bounds: DisplayDimensions },
    Button { button: PointerButton, pressed: bool },
    Sync,
}

pub(crate) struct MockSink {
    pub samples: Vec<InputSample>,
    pub absolute: bool,
}

impl MockSink {
    pub fn new() -> Self {
        MockSink {
            samples: Vec::new(),
            absolute: false,
        }
    }
}

impl GuestInputSink for MockSink {
    fn key_event(&mut self, scancode: u32, pressed: bool) {
        self.samples.push(InputSample::Key { scancode, pressed });
    }

    fn text_input(&mut self, text: &str) {
        self.samples.push(InputSample::Text(text.to_string()));
    }

    fn pointer_rel(&mut self, dx: i32, dy: i32) {
        self.samples.push(InputSample::Rel { dx, dy });
    }

    fn pointer_abs(&mut self, x: i32, y: i32, bounds: DisplayDimensions) {
        self.samples.push(InputSample::Abs { x, y, bounds });
    }

    fn pointer_button(&mut self, button: PointerButton, pressed: bool) {
        self.samples.push(InputSample::Button { button, pressed });
    }

    fn sync(&mut self) {
        self.samples.push(InputSample::Sync);
    }

    fn is_absolute(&self) -> bool {
        self.absolute
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum BackendOp {
    CreateWindow(OutputId, bool),
    DestroyWindow(OutputId),
    SetWindowSize(OutputId, DisplayDimensions),
    SetWindowPosition(OutputId, WindowPosition),
    SetFullscreen(OutputId, bool),
    ShowWindow(OutputId, bool),
    SetTitle(OutputId, String),
    SetGrab(OutputId, bool),
    SetRelativePointer(bool),
    ShowCursor(bool),
    GuestCursorSprite(bool),
    WarpPointer(OutputId, i32, i32),
    CreateRaster(OutputId),
    DestroyRaster(OutputId),
    CreateAccel(OutputId),
    DestroyAccel(OutputId),
    DriverHint(bool),
    Redraw(OutputId),
}

pub(crate) struct MockBackend {
    pub ops: Vec<BackendOp>,
    pub focus: bool,
    pub pointer: (i32, i32),
    pub fail_accel: bool,
    pub accel_creations: u32,
    sizes: HashMap<OutputId, DisplayDimensions>,
    positions: HashMap<OutputId, WindowPosition>,
    hint_accelerated: bool,
    next_ctx: u64,
}

impl MockBackend {
    pub fn new() -> Self {
        MockBackend {
            ops: Vec::new(),
            focus: true,
            pointer: (100, 100),
            fail_accel: false,
            accel_creations: 0,
            sizes: HashMap::new(),
            positions: HashMap::new(),
            hint_accelerated: false,
            next_ctx: 0,
        }
    }

    pub fn op_count(&self, f: impl Fn(&BackendOp) -> bool) -> usize {
        self.ops.iter().filter(|op| f(op)).count()
    }
}

impl DisplayBackend for MockBackend {
    fn create_window(&mut self, output: OutputId, dims: DisplayDimensions, flags: WindowFlags) -> Result<(), anyhow::Error> {
        self.ops.push(BackendOp::CreateWindow(output, flags.accelerated));
        self.sizes.insert(output, dims);
        self.positions.entry(output).or_default();
        Ok(())
    }

    fn destroy_window(&mut self, output: OutputId) {
        self.ops.push(BackendOp::DestroyWindow(output));
    }

    fn window_size(&self, output: OutputId) -> DisplayDimensions {
        self.sizes.get(&output).copied().unwrap_or_default()
    }

    fn set_window_size(&mut self, output: OutputId, dims: DisplayDimensions) {
        self.ops.push(BackendOp::SetWindowSize(output, dims));
        self.sizes.insert(output, dims);
    }

    fn window_position(&self, output: OutputId) -> WindowPosition {
        self.positions.get(&output).copied().unwrap_or_default()
    }

    fn set_window_position(&mut self, output: OutputId, pos: WindowPosition) {
        self.ops.push(BackendOp::SetWindowPosition(output, pos));
        self.positions.insert(output, pos);
    }

    fn set_fullscreen(&mut self, output: OutputId, fullscreen: bool) {
        self.ops.push(BackendOp::SetFullscreen(output, fullscreen));
    }

    fn show_window(&mut self, output: OutputId, visible: bool) {
        self.ops.push(BackendOp::ShowWindow(output, visible));
    }

    fn set_title(&mut self, output: OutputId, title: &str) {
        self.ops.push(BackendOp::SetTitle(output, title.to_string()));
    }

    fn has_focus(&self, _output: OutputId) -> bool {
        self.focus
    }

    fn set_grab(&mut self, output: OutputId, grab: bool) {
        self.ops.push(BackendOp::SetGrab(output, grab));
    }

    fn set_relative_pointer(&mut self, relative: bool) {
        self.ops.push(BackendOp::SetRelativePointer(relative));
    }

    fn show_cursor(&mut self, visible: bool) {
        self.ops.push(BackendOp::ShowCursor(visible));
    }

    fn set_guest_cursor_sprite(&mut self, guest: bool) {
        self.ops.push(BackendOp::GuestCursorSprite(guest));
    }

    fn warp_pointer(&mut self, output: OutputId, x: i32, y: i32) {
        self.ops.push(BackendOp::WarpPointer(output, x, y));
    }

    fn pointer_position(&self) -> (i32, i32) {
        self.pointer
    }

    fn create_raster_context(&mut self, output: OutputId) -> Result<RasterContext, anyhow::Error> {
        self.ops.push(BackendOp::CreateRaster(output));
        self.next_ctx += 1;
        Ok(RasterContext { id: self.next_ctx })
    }

    fn destroy_raster_context(&mut self, output: OutputId, _ctx: RasterContext) {
        self.ops.push(BackendOp::DestroyRaster(output));
    }

    fn create_accel_context(&mut self, output: OutputId, _params: &ContextParams) -> Result<AccelContext, anyhow::Error> {
        self.ops.push(BackendOp::CreateAccel(output));
        if self.fail_accel {
            return Err(anyhow!("accelerated context creation failed"));
        }
        self.accel_creations += 1;
        self.next_ctx += 1;
        Ok(AccelContext {
            id:     self.next_ctx,
            native: NativeHandle(0x1000 + self.next_ctx),
        })
    }

    fn destroy_accel_context(&mut self, output: OutputId, _ctx: AccelContext) {
        self.ops.push(BackendOp::DestroyAccel(output));
    }

    fn set_render_driver_hint(&mut self, accelerated: bool) -> bool {
        self.ops.push(BackendOp::DriverHint(accelerated));
        let changed = self.hint_accelerated != accelerated;
        self.hint_accelerated = accelerated;
        changed
    }

    fn redraw(&mut self, output: OutputId) {
        self.ops.push(BackendOp::Redraw(output));
    }
}

/// Manually-advanced millisecond clock shared with the test body.
pub(crate) struct ManualClock(pub Rc<Cell<u64>>);

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

pub(crate) type MockScheduler = DisplayScheduler<MockPump, MockSink, MockBackend>;

/// A scheduler over mocks with one grab-capable primary output attached.
pub(crate) fn fixture() -> (MockScheduler, Receiver<SchedulerEvent>, Rc<Cell<u64>>) {
    fixture_with(SchedulerParams::default())
}

pub(crate) fn fixture_with(params: SchedulerParams) -> (MockScheduler, Receiver<SchedulerEvent>, Rc<Cell<u64>>) {
    let time = Rc::new(Cell::new(0u64));
    let clock = ManualClock(Rc::clone(&time));
    let (mut sched, events_rx) =
        DisplayScheduler::new(MockPump::new(), MockSink::new(), MockBackend::new(), Box::new(clock), params);
    sched
        .add_output(DisplayDimensions::new(640, 480), true)
        .expect("mock output creation cannot fail");
    (sched, events_rx, time)
}
