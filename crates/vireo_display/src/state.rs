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

    vireo_display::state.rs

    Process-wide input state: grab/focus state, pointer mode, guest cursor
    tracking, and the modifier policy for the grab exit combo. One explicit
    value with controlled mutation, owned by the scheduler.
*/

use crate::events::{ButtonMask, Modifiers};
use strum_macros::Display;

/// Pointer-capture state of the scheduler.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum GrabState {
    Ungrabbed,
    Grabbed,
}

/// Which modifier combination toggles/exits the grab.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ModifierPolicy {
    #[default]
    CtrlAlt,
    CtrlAltShift,
    RightCtrl,
}

impl ModifierPolicy {
    /// Whether the full combo for this policy is currently held.
    pub fn combo_held(&self, mods: &Modifiers) -> bool {
        match self {
            ModifierPolicy::CtrlAlt => mods.lctrl && mods.lalt,
            ModifierPolicy::CtrlAltShift => mods.lctrl && mods.lalt && mods.lshift,
            ModifierPolicy::RightCtrl => mods.rctrl,
        }
    }

    /// Caption text describing the exit combination.
    pub fn exit_combo(&self) -> &'static str {
        match self {
            ModifierPolicy::CtrlAlt => "Ctrl-Alt-G",
            ModifierPolicy::CtrlAltShift => "Ctrl-Alt-Shift-G",
            ModifierPolicy::RightCtrl => "Right-Ctrl-G",
        }
    }
}

/// Single-instance input state. Mutation goes through the methods below so
/// the grab/focus invariants stay in one place.
pub struct InputState {
    grab: GrabState,
    fullscreen: bool,
    /// Grab state saved when entering fullscreen, restored on leaving it.
    saved_grab: bool,
    /// Local absolute-pointer override, toggled by pointer-mode change
    /// notifications from the guest.
    absolute_enabled: bool,
    guest_cursor: bool,
    guest_pos: (i32, i32),
    /// Set when a window recreate drops an active grab; consumed by the next
    /// focus gain, which re-acquires the grab before routing further input.
    grab_restore_pending: bool,
    buttons: ButtonMask,
    mods: Modifiers,
    policy: ModifierPolicy,
}

impl InputState {
    pub fn new(policy: ModifierPolicy, fullscreen: bool) -> Self {
        InputState {
            grab: GrabState::Ungrabbed,
            fullscreen,
            saved_grab: false,
            absolute_enabled: false,
            guest_cursor: false,
            guest_pos: (0, 0),
            grab_restore_pending: false,
            buttons: ButtonMask::EMPTY,
            mods: Modifiers::NONE,
            policy,
        }
    }

    #[inline]
    pub fn grab(&self) -> GrabState {
        self.grab
    }

    #[inline]
    pub fn is_grabbed(&self) -> bool {
        self.grab == GrabState::Grabbed
    }

    #[inline]
    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    #[inline]
    pub fn absolute_enabled(&self) -> bool {
        self.absolute_enabled
    }

    #[inline]
    pub fn guest_cursor(&self) -> bool {
        self.guest_cursor
    }

    #[inline]
    pub fn guest_pos(&self) -> (i32, i32) {
        self.guest_pos
    }

    #[inline]
    pub fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    #[inline]
    pub fn mods(&self) -> Modifiers {
        self.mods
    }

    #[inline]
    pub fn policy(&self) -> ModifierPolicy {
        self.policy
    }

    #[inline]
    pub fn combo_held(&self) -> bool {
        self.policy.combo_held(&self.mods)
    }

    pub(crate) fn grab_on(&mut self) {
        self.grab = GrabState::Grabbed;
    }

    pub(crate) fn grab_off(&mut self) {
        self.grab = GrabState::Ungrabbed;
    }

    pub(crate) fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub(crate) fn save_grab(&mut self) {
        self.saved_grab = self.is_grabbed();
    }

    pub(crate) fn saved_grab(&self) -> bool {
        self.saved_grab
    }

    pub(crate) fn set_absolute_enabled(&mut self, enabled: bool) {
        self.absolute_enabled = enabled;
    }

    pub(crate) fn set_guest_cursor(&mut self, active: bool, pos: (i32, i32)) {
        self.guest_cursor = active;
        self.guest_pos = pos;
    }

    pub(crate) fn move_guest_pos(&mut self, dx: i32, dy: i32) {
        self.guest_pos.0 += dx;
        self.guest_pos.1 += dy;
    }

    pub(crate) fn set_grab_restore_pending(&mut self, pending: bool) {
        self.grab_restore_pending = pending;
    }

    pub(crate) fn grab_restore_pending(&self) -> bool {
        self.grab_restore_pending
    }

    pub(crate) fn take_grab_restore_pending(&mut self) -> bool {
        std::mem::take(&mut self.grab_restore_pending)
    }

    pub(crate) fn set_buttons(&mut self, buttons: ButtonMask) {
        self.buttons = buttons;
    }

    pub(crate) fn set_mods(&mut self, mods: Modifiers) {
        self.mods = mods;
    }
}
