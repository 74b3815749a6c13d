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

    vireo_display::sink.rs

    The guest input sink: where routed input samples go.
*/

use crate::{
    events::PointerButton,
    types::DisplayDimensions,
};

/// Submission interface to the guest's input queue. Implemented by the
/// emulation core's input subsystem.
pub trait GuestInputSink {
    /// Raw key transition, unmodified host scancode.
    fn key_event(&mut self, scancode: u32, pressed: bool);

    /// Text input for non-graphic outputs.
    fn text_input(&mut self, text: &str);

    /// Relative pointer motion.
    fn pointer_rel(&mut self, dx: i32, dy: i32);

    /// Absolute pointer position, scaled by the guest against `bounds`.
    fn pointer_abs(&mut self, x: i32, y: i32, bounds: DisplayDimensions);

    fn pointer_button(&mut self, button: PointerButton, pressed: bool);

    /// Commit queued samples as one batch.
    fn sync(&mut self);

    /// Whether the guest currently consumes absolute coordinates rather than
    /// relative deltas.
    fn is_absolute(&self) -> bool;
}
