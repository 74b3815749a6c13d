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

    vireo_display::backend.rs

    Defines the DisplayBackend trait that abstracts the host windowing system
    and its rendering contexts. A backend owns the native windows; the
    scheduler owns the lifetime of the contexts created through it.
*/

use crate::types::{DisplayDimensions, OutputId, WindowPosition};
use anyhow::Error;

/// Opaque handle to a platform-native window, handed to a passthrough
/// consumer for the duration of an accelerated session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NativeHandle(pub u64);

/// Parameters for an accelerated context, chosen by the passthrough consumer
/// requesting it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContextParams {
    pub buffer_bits:  u8,
    pub depth_bits:   u8,
    pub stencil_bits: u8,
    pub alpha:        bool,
    pub msaa_samples: u8,
    pub core_profile: bool,
}

impl Default for ContextParams {
    fn default() -> Self {
        ContextParams {
            buffer_bits:  32,
            depth_bits:   24,
            stencil_bits: 8,
            alpha:        false,
            msaa_samples: 0,
            core_profile: false,
        }
    }
}

/// An owned raster (2D) rendering context. Only the mode-transition
/// scheduler creates or destroys these.
#[derive(Debug, PartialEq, Eq)]
pub struct RasterContext {
    pub id: u64,
}

/// An owned accelerated rendering context, plus the native window handle
/// captured for the passthrough consumer.
#[derive(Debug, PartialEq, Eq)]
pub struct AccelContext {
    pub id:     u64,
    pub native: NativeHandle,
}

/// Creation flags for an output window.
#[derive(Copy, Clone, Debug, Default)]
pub struct WindowFlags {
    pub fullscreen:  bool,
    pub hidden:      bool,
    pub accelerated: bool,
}

/// Host windowing-system operations consumed by the scheduler. Implementors
/// wrap a concrete toolkit; `vireo_backend_null` provides a recording
/// implementation for headless operation and tests.
///
/// All methods are called from the single scheduler tick; no implementation
/// needs to be thread-safe.
pub trait DisplayBackend {
    fn create_window(&mut self, output: OutputId, dims: DisplayDimensions, flags: WindowFlags) -> Result<(), Error>;
    fn destroy_window(&mut self, output: OutputId);

    fn window_size(&self, output: OutputId) -> DisplayDimensions;
    fn set_window_size(&mut self, output: OutputId, dims: DisplayDimensions);
    fn window_position(&self, output: OutputId) -> WindowPosition;
    fn set_window_position(&mut self, output: OutputId, pos: WindowPosition);

    fn set_fullscreen(&mut self, output: OutputId, fullscreen: bool);
    fn show_window(&mut self, output: OutputId, visible: bool);
    fn set_title(&mut self, output: OutputId, title: &str);
    fn has_focus(&self, output: OutputId) -> bool;

    /// Exclusive pointer/keyboard capture for one window.
    fn set_grab(&mut self, output: OutputId, grab: bool);
    /// Host-global relative pointer mode (deltas instead of positions).
    fn set_relative_pointer(&mut self, relative: bool);
    fn show_cursor(&mut self, visible: bool);
    /// Switch between the guest-defined cursor sprite and the host's normal
    /// cursor shape.
    fn set_guest_cursor_sprite(&mut self, guest: bool);
    fn warp_pointer(&mut self, output: OutputId, x: i32, y: i32);
    /// Current pointer position, window-relative to the focused window.
    fn pointer_position(&self) -> (i32, i32);

    fn create_raster_context(&mut self, output: OutputId) -> Result<RasterContext, Error>;
    fn destroy_raster_context(&mut self, output: OutputId, ctx: RasterContext);
    fn create_accel_context(&mut self, output: OutputId, params: &ContextParams) -> Result<AccelContext, Error>;
    fn destroy_accel_context(&mut self, output: OutputId, ctx: AccelContext);

    /// Select the render driver for subsequently created windows. Returns
    /// true if the hint changed, which requires the window to be recreated
    /// before the new driver takes effect.
    fn set_render_driver_hint(&mut self, accelerated: bool) -> bool;

    /// Request a redraw of the output's display surface.
    fn redraw(&mut self, output: OutputId);
}
