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

    vireo_headless::lib.rs

    Vireo headless front-end main library component.

    Runs the display scheduler against the null backend with a short scripted
    event sequence, ticking at whatever cadence the refresh governor settles
    on. Useful for exercising the full stack without a host toolkit.
*/

use vireo_backend_null::{NullBackend, NullInputSink, QueuePump};
use vireo_config::ConfigFileParams;
use vireo_display::{
    ContextParams,
    DisplayScheduler,
    HostEvent,
    Modifiers,
    OutputId,
    SchedulerEvent,
    SystemClock,
    TransitionKind,
};

const DEMO_TICKS: u32 = 120;

// Scancodes for the scripted session (USB HID usage page 0x07).
const SCANCODE_A: u32 = 4;
const SCANCODE_G: u32 = 10;

const CTRL_ALT: Modifiers = Modifiers {
    lctrl:  true,
    rctrl:  false,
    lalt:   true,
    ralt:   false,
    lshift: false,
    rshift: false,
};

pub fn run() {
    env_logger::init();

    // Resolve configuration by parsing the configuration toml and merging it
    // with command line arguments. Headless operation doesn't require a
    // config file; missing files fall back to defaults.
    let config = match vireo_config::read_config_file("./vireo.toml") {
        Ok(config) => config,
        Err(e) => match e.downcast_ref::<std::io::Error>() {
            Some(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Configuration file not found; continuing with defaults.");
                ConfigFileParams::default()
            }
            Some(e) => {
                eprintln!("Unknown IO error reading configuration file:\n{}", e);
                std::process::exit(1);
            }
            None => {
                eprintln!(
                    "Failed to parse configuration file. There may be a typo or otherwise invalid toml:\n{}",
                    e
                );
                std::process::exit(1);
            }
        },
    };

    let params = config.scheduler_params();
    let (mut sched, events_rx) = DisplayScheduler::new(
        QueuePump::new(),
        NullInputSink::new(),
        NullBackend::new(),
        Box::new(SystemClock::new()),
        params,
    );

    // One output per config window definition, or a single default output.
    if config.frontend.window.is_empty() {
        sched
            .add_output((640, 480).into(), true)
            .unwrap_or_else(|e| {
                eprintln!("Failed to create output: {}", e);
                std::process::exit(1);
            });
    }
    else {
        for window in &config.frontend.window {
            let id = sched
                .add_output((window.width, window.height).into(), window.graphic)
                .unwrap_or_else(|e| {
                    eprintln!("Failed to create output: {}", e);
                    std::process::exit(1);
                });
            log::info!(
                "Created {} ({}x{}, graphic: {})",
                id,
                window.width,
                window.height,
                window.graphic
            );
        }
    }

    log::info!("Starting scripted session for {} ticks...", DEMO_TICKS);

    'demo: for tick in 0..DEMO_TICKS {
        script_tick(&mut sched, tick);
        sched.on_tick();

        for ev in events_rx.try_iter() {
            match ev {
                SchedulerEvent::TransitionComplete { output, generation } => {
                    log::info!("[{:3}] transition complete on {} (gen {})", tick, output, generation);
                }
                SchedulerEvent::TransitionFailed {
                    output,
                    generation,
                    reason,
                } => {
                    log::error!("[{:3}] transition failed on {} (gen {}): {}", tick, output, generation, reason);
                }
                SchedulerEvent::PassthroughActive { output, active, handle } => {
                    log::info!("[{:3}] passthrough on {}: active={} handle={:?}", tick, output, active, handle);
                }
                SchedulerEvent::ShutdownRequested => {
                    log::info!("[{:3}] shutdown requested", tick);
                    break 'demo;
                }
            }
        }

        if let Some(interval) = sched.refresh_interval(OutputId::PRIMARY) {
            std::thread::sleep(interval);
        }
    }

    let samples = sched.sink().samples.len();
    log::info!(
        "Session done. Guest received {} input samples; grabbed: {}",
        samples,
        sched.is_grabbed()
    );
}

/// Inject the scripted host events for one tick.
fn script_tick(
    sched: &mut DisplayScheduler<QueuePump, NullInputSink, NullBackend>,
    tick: u32,
) {
    let out = OutputId::PRIMARY;
    match tick {
        // Grab the pointer with the hotkey.
        10 => {
            sched.pump_mut().push(HostEvent::KeyDown {
                output: out,
                scancode: SCANCODE_G,
                mods: CTRL_ALT,
                repeat: false,
            });
            sched.pump_mut().push(HostEvent::KeyUp {
                output:   out,
                scancode: SCANCODE_G,
                mods:     Modifiers::NONE,
            });
        }
        // A little typing and pointer traffic.
        20 => {
            sched.pump_mut().push(HostEvent::KeyDown {
                output: out,
                scancode: SCANCODE_A,
                mods: Modifiers::NONE,
                repeat: false,
            });
            sched.pump_mut().push(HostEvent::KeyUp {
                output:   out,
                scancode: SCANCODE_A,
                mods:     Modifiers::NONE,
            });
            sched.pump_mut().push(HostEvent::MouseMotion {
                output:  out,
                x:       320,
                y:       240,
                dx:      8,
                dy:      -2,
                buttons: Default::default(),
            });
        }
        // Accelerated passthrough session.
        40 => {
            if let Err(e) = sched.request_mode_transition(out, TransitionKind::AcquireAccelerated(ContextParams::default()), None)
            {
                log::error!("acquire request rejected: {}", e);
            }
        }
        70 => {
            if let Err(e) = sched.request_mode_transition(out, TransitionKind::ReleaseAccelerated, None) {
                log::error!("release request rejected: {}", e);
            }
        }
        // Let go of the pointer again.
        100 => {
            sched.pump_mut().push(HostEvent::KeyDown {
                output: out,
                scancode: SCANCODE_G,
                mods: CTRL_ALT,
                repeat: false,
            });
            sched.pump_mut().push(HostEvent::KeyUp {
                output:   out,
                scancode: SCANCODE_G,
                mods:     Modifiers::NONE,
            });
        }
        _ => {}
    }
}
