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

    vireo_display::output.rs

    Per-output window record. Contexts are owned here but only the
    mode-transition scheduler creates or destroys them.
*/

use crate::{
    backend::{AccelContext, RasterContext},
    governor::{RefreshGovernor, RefreshParams},
    types::{DisplayDimensions, OutputId, WindowPosition},
};
use web_time::Duration;

pub struct OutputWindow {
    pub id: OutputId,
    /// Guest-visible surface dimensions for this output.
    pub(crate) dims: DisplayDimensions,
    /// Last host window size reported through notify_window_resized.
    pub(crate) window_dims: Option<DisplayDimensions>,
    pub(crate) hidden: bool,
    /// Whether this output participates in pointer grab/forwarding. Text
    /// consoles do not.
    pub(crate) grab_allowed: bool,
    /// Saved window position, restored after window recreation.
    pub(crate) position: Option<WindowPosition>,
    pub(crate) raster: Option<RasterContext>,
    pub(crate) accel: Option<AccelContext>,
    /// Hotkeys suppressed since the last focus gain, until the next key-up.
    pub(crate) ignore_hotkeys: bool,
    pub(crate) governor: RefreshGovernor,
}

impl OutputWindow {
    pub fn new(id: OutputId, dims: DisplayDimensions, grab_allowed: bool, refresh: &RefreshParams) -> Self {
        OutputWindow {
            id,
            dims,
            window_dims: None,
            hidden: false,
            grab_allowed,
            position: None,
            raster: None,
            accel: None,
            ignore_hotkeys: false,
            governor: RefreshGovernor::new(refresh),
        }
    }

    #[inline]
    pub fn dims(&self) -> DisplayDimensions {
        self.dims
    }

    #[inline]
    pub fn window_dims(&self) -> Option<DisplayDimensions> {
        self.window_dims
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[inline]
    pub fn grab_allowed(&self) -> bool {
        self.grab_allowed
    }

    #[inline]
    pub fn has_raster_context(&self) -> bool {
        self.raster.is_some()
    }

    #[inline]
    pub fn has_accel_context(&self) -> bool {
        self.accel.is_some()
    }

    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        self.governor.interval()
    }
}
