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

    vireo_display::types.rs

    Small shared value types: output handles, dimensions, positions.
*/

use std::fmt::{Display, Formatter};

/// Handle identifying one virtual display output.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct OutputId(pub usize);

impl OutputId {
    /// The primary output. Passthrough consumers and pointer-mode changes
    /// always address this one.
    pub const PRIMARY: OutputId = OutputId(0);

    #[inline]
    pub fn idx(&self) -> usize {
        self.0
    }
}

impl Default for OutputId {
    fn default() -> Self {
        OutputId(0)
    }
}

impl From<usize> for OutputId {
    fn from(idx: usize) -> Self {
        OutputId(idx)
    }
}

impl From<OutputId> for usize {
    fn from(id: OutputId) -> usize {
        id.0
    }
}

impl Display for OutputId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "output{}", self.0)
    }
}

/// Width and height of a surface or window, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayDimensions {
    pub w: u32,
    pub h: u32,
}

impl DisplayDimensions {
    pub fn new(w: u32, h: u32) -> Self {
        DisplayDimensions { w, h }
    }
}

impl From<(u32, u32)> for DisplayDimensions {
    fn from(t: (u32, u32)) -> Self {
        DisplayDimensions { w: t.0, h: t.1 }
    }
}

impl From<DisplayDimensions> for (u32, u32) {
    fn from(dim: DisplayDimensions) -> Self {
        (dim.w, dim.h)
    }
}

impl Display for DisplayDimensions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// A window position in host screen coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    pub fn new(x: i32, y: i32) -> Self {
        WindowPosition { x, y }
    }
}

impl From<(i32, i32)> for WindowPosition {
    fn from(t: (i32, i32)) -> Self {
        WindowPosition { x: t.0, y: t.1 }
    }
}
