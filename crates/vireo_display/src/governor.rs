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

    vireo_display::governor.rs

    Per-output refresh-rate governor. Adapts the display update interval
    between a busy and a default cadence based on observed input idleness,
    with hysteresis so a single idle tick does not throttle.
*/

use web_time::Duration;

pub const REFRESH_INTERVAL_BUSY: Duration = Duration::from_millis(10);
pub const REFRESH_INTERVAL_DEFAULT: Duration = Duration::from_millis(30);
pub const REFRESH_INTERVAL_MINIMIZED: Duration = Duration::from_millis(500);

/// Refresh cadence parameters.
#[derive(Copy, Clone, Debug)]
pub struct RefreshParams {
    pub busy:      Duration,
    pub default:   Duration,
    pub minimized: Duration,
    /// Consecutive idle ticks before throttling back to the default
    /// interval. When None, derived from the busy/default ratio.
    pub max_idle:  Option<u32>,
}

impl Default for RefreshParams {
    fn default() -> Self {
        RefreshParams {
            busy:      REFRESH_INTERVAL_BUSY,
            default:   REFRESH_INTERVAL_DEFAULT,
            minimized: REFRESH_INTERVAL_MINIMIZED,
            max_idle:  None,
        }
    }
}

impl RefreshParams {
    /// Idle tick budget covering two default refresh periods of busy-rate
    /// polling, so bursty input has to stay absent for a while before the
    /// rate drops.
    pub fn derived_max_idle(&self) -> u32 {
        let busy_ms = self.busy.as_millis().max(1) as u32;
        let default_ms = self.default.as_millis() as u32;
        2 * default_ms / busy_ms + 1
    }
}

#[derive(Clone, Debug)]
pub struct RefreshGovernor {
    idle_count: u32,
    max_idle:   u32,
    busy:       Duration,
    default:    Duration,
    minimized:  Duration,
    interval:   Duration,
}

impl RefreshGovernor {
    pub fn new(params: &RefreshParams) -> Self {
        RefreshGovernor {
            idle_count: 0,
            max_idle:   params.max_idle.unwrap_or_else(|| params.derived_max_idle()),
            busy:       params.busy,
            default:    params.default,
            minimized:  params.minimized,
            interval:   params.default,
        }
    }

    /// Advance one scheduler tick. `saw_input` is whether the event pump
    /// yielded at least one input event for this output.
    pub fn on_tick(&mut self, saw_input: bool) {
        if saw_input {
            self.idle_count = 0;
            self.interval = self.busy;
        }
        else if self.idle_count < self.max_idle {
            self.idle_count += 1;
            if self.idle_count >= self.max_idle {
                self.interval = self.default;
            }
        }
    }

    /// Window minimized: slow interval unconditionally, independent of the
    /// idle counter.
    pub fn on_minimized(&mut self) {
        self.interval = self.minimized;
    }

    pub fn on_restored(&mut self) {
        self.interval = self.default;
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn idle_count(&self) -> u32 {
        self.idle_count
    }

    #[inline]
    pub fn max_idle(&self) -> u32 {
        self.max_idle
    }
}
