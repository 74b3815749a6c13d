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
*/

//! The `vireo_config` crate provides functionality for parsing Vireo's main
//! configuration file and overlaying command line arguments on top of the
//! configuration file settings. Command line arguments always take priority
//! over the configuration file.
//!
//! Features:
//! - `use_bpaf`: Enable BPAF support for command line argument parsing.

#[cfg(feature = "use_bpaf")]
mod bpaf_config;

use std::{path::Path, str::FromStr};

use vireo_display::{governor::RefreshParams, ModifierPolicy, SchedulerParams};

#[cfg(feature = "use_bpaf")]
use bpaf::Bpaf;
#[cfg(feature = "use_bpaf")]
pub use bpaf_config::{cli_args, CmdLineArgs};

use cfg_if::cfg_if;
use serde_derive::Deserialize;
use web_time::Duration;

const fn _default_true() -> bool {
    true
}
const fn _default_busy_ms() -> u64 {
    10
}
const fn _default_default_ms() -> u64 {
    30
}
const fn _default_minimized_ms() -> u64 {
    500
}
const fn _default_width() -> u32 {
    640
}
const fn _default_height() -> u32 {
    480
}

/// Which modifier combination toggles/exits the pointer grab.
#[cfg_attr(feature = "use_bpaf", derive(Bpaf))]
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
pub enum GrabModifier {
    CtrlAlt,
    CtrlAltShift,
    RightCtrl,
}

impl Default for GrabModifier {
    fn default() -> Self {
        GrabModifier::CtrlAlt
    }
}

impl FromStr for GrabModifier {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, String>
    where
        Self: Sized,
    {
        match s.to_lowercase().as_str() {
            "ctrl-alt" | "ctrlalt" => Ok(GrabModifier::CtrlAlt),
            "ctrl-alt-shift" | "ctrlaltshift" => Ok(GrabModifier::CtrlAltShift),
            "right-ctrl" | "rightctrl" => Ok(GrabModifier::RightCtrl),
            _ => Err("Bad value for grab_modifier".to_string()),
        }
    }
}

impl From<GrabModifier> for ModifierPolicy {
    fn from(g: GrabModifier) -> Self {
        match g {
            GrabModifier::CtrlAlt => ModifierPolicy::CtrlAlt,
            GrabModifier::CtrlAltShift => ModifierPolicy::CtrlAltShift,
            GrabModifier::RightCtrl => ModifierPolicy::RightCtrl,
        }
    }
}

/// One output window definition from the `[[frontend.window]]` array.
#[derive(Clone, Debug, Deserialize)]
pub struct WindowDefinition {
    pub name: Option<String>,
    #[serde(default = "_default_width")]
    pub width: u32,
    #[serde(default = "_default_height")]
    pub height: u32,
    /// Graphic outputs get raw scancodes and participate in pointer grab;
    /// non-graphic outputs receive text input.
    #[serde(default = "_default_true")]
    pub graphic: bool,
}

impl Default for WindowDefinition {
    fn default() -> Self {
        WindowDefinition {
            name: None,
            width: _default_width(),
            height: _default_height(),
            graphic: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Display {
    #[serde(default = "_default_busy_ms")]
    pub busy_interval_ms: u64,
    #[serde(default = "_default_default_ms")]
    pub default_interval_ms: u64,
    #[serde(default = "_default_minimized_ms")]
    pub minimized_interval_ms: u64,
    /// Idle tick budget before throttling. Derived from the interval ratio
    /// when absent.
    pub max_idle_ticks: Option<u32>,
}

impl Default for Display {
    fn default() -> Self {
        Display {
            busy_interval_ms: _default_busy_ms(),
            default_interval_ms: _default_default_ms(),
            minimized_interval_ms: _default_minimized_ms(),
            max_idle_ticks: None,
        }
    }
}

impl From<&Display> for RefreshParams {
    fn from(d: &Display) -> Self {
        RefreshParams {
            busy:      Duration::from_millis(d.busy_interval_ms),
            default:   Duration::from_millis(d.default_interval_ms),
            minimized: Duration::from_millis(d.minimized_interval_ms),
            max_idle:  d.max_idle_ticks,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Frontend {
    pub app_name: Option<String>,
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default = "_default_true")]
    pub window_close: bool,
    #[serde(default)]
    pub show_cursor: bool,
    pub grab_modifier: Option<GrabModifier>,
    #[serde(default)]
    pub window: Vec<WindowDefinition>,
}

impl Default for Frontend {
    fn default() -> Self {
        Frontend {
            app_name: None,
            fullscreen: false,
            window_close: true,
            show_cursor: false,
            grab_modifier: None,
            window: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFileParams {
    #[serde(default)]
    pub frontend: Frontend,
    #[serde(default)]
    pub display: Display,
}

impl ConfigFileParams {
    pub fn overlay(&mut self, shell_args: CmdLineArgs) {
        if let Some(app_name) = shell_args.app_name {
            self.frontend.app_name = Some(app_name);
        }
        if let Some(grab_modifier) = shell_args.grab_modifier {
            self.frontend.grab_modifier = Some(grab_modifier);
        }

        self.frontend.fullscreen |= shell_args.fullscreen;
        self.frontend.show_cursor |= shell_args.show_cursor;
        self.frontend.window_close &= !shell_args.no_quit;

        if let Some(busy) = shell_args.busy_interval_ms {
            self.display.busy_interval_ms = busy;
        }
        if let Some(default) = shell_args.default_interval_ms {
            self.display.default_interval_ms = default;
        }
        if let Some(minimized) = shell_args.minimized_interval_ms {
            self.display.minimized_interval_ms = minimized;
        }
        if let Some(max_idle) = shell_args.max_idle_ticks {
            self.display.max_idle_ticks = Some(max_idle);
        }
    }

    /// Collapse the parsed configuration into scheduler parameters.
    pub fn scheduler_params(&self) -> SchedulerParams {
        SchedulerParams {
            app_name: self.frontend.app_name.clone().unwrap_or_default(),
            refresh: RefreshParams::from(&self.display),
            show_cursor: self.frontend.show_cursor,
            window_close: self.frontend.window_close,
            start_fullscreen: self.frontend.fullscreen,
            modifier_policy: self.frontend.grab_modifier.unwrap_or_default().into(),
        }
    }
}

pub fn read_config(toml_string: impl AsRef<str>, shell_args: CmdLineArgs) -> Result<ConfigFileParams, anyhow::Error> {
    let mut toml_args: ConfigFileParams;

    toml_args = toml::from_str(toml_string.as_ref())?;

    // Command line arguments override config file arguments
    cfg_if! {
        if #[cfg(feature = "use_bpaf")] {
            toml_args.overlay(shell_args);
        }
    }

    Ok(toml_args)
}

/// Read the TOML configuration from a file path, parse and overlay command
/// line arguments.
pub fn read_config_file<P>(default_path: P) -> Result<ConfigFileParams, anyhow::Error>
where
    P: AsRef<Path>,
{
    let shell_args: CmdLineArgs;

    cfg_if! {
        if #[cfg(feature = "use_bpaf")] {
            log::debug!("Reading command line arguments...");
            shell_args = cli_args().run();
        } else {
            log::debug!("Argument reading disabled...");
            shell_args = CmdLineArgs::default();
        }
    }

    // Allow configuration file path to be overridden by command line argument 'config_file'
    let toml_string = if let Some(configfile_path) = shell_args.config_file.as_ref() {
        std::fs::read_to_string(configfile_path)?
    }
    else {
        std::fs::read_to_string(default_path)?
    };

    read_config(toml_string, shell_args)
}

/// Read the TOML configuration from a string, parse and overlay command line
/// arguments.
pub fn read_config_string(toml_string: impl AsRef<str>) -> Result<ConfigFileParams, anyhow::Error> {
    let shell_args: CmdLineArgs;

    cfg_if! {
        if #[cfg(feature = "use_bpaf")] {
            log::debug!("Reading command line arguments...");
            shell_args = cli_args().run();
        } else {
            log::debug!("Argument reading disabled...");
            shell_args = CmdLineArgs::default();
        }
    }

    read_config(toml_string, shell_args)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [frontend]
        app_name = "pc98"
        fullscreen = false
        show_cursor = true
        grab_modifier = "RightCtrl"

        [[frontend.window]]
        name = "vga"
        width = 800
        height = 600

        [[frontend.window]]
        name = "monitor"
        graphic = false

        [display]
        busy_interval_ms = 5
        default_interval_ms = 20
        max_idle_ticks = 4
    "#;

    #[test]
    fn parse_sample_config() {
        let config = read_config(SAMPLE, CmdLineArgs::default()).unwrap();
        assert_eq!(config.frontend.app_name.as_deref(), Some("pc98"));
        assert_eq!(config.frontend.grab_modifier, Some(GrabModifier::RightCtrl));
        assert!(config.frontend.window_close, "window_close defaults on");

        assert_eq!(config.frontend.window.len(), 2);
        assert_eq!(config.frontend.window[0].width, 800);
        assert!(config.frontend.window[0].graphic);
        assert!(!config.frontend.window[1].graphic);
        assert_eq!(config.frontend.window[1].width, 640, "width falls back to default");

        assert_eq!(config.display.busy_interval_ms, 5);
        assert_eq!(config.display.minimized_interval_ms, 500, "minimized falls back to default");
        assert_eq!(config.display.max_idle_ticks, Some(4));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = read_config("", CmdLineArgs::default()).unwrap();
        let params = config.scheduler_params();
        assert_eq!(params.refresh.busy, Duration::from_millis(10));
        assert_eq!(params.refresh.default, Duration::from_millis(30));
        assert!(params.window_close);
        assert!(!params.start_fullscreen);
        assert_eq!(params.modifier_policy, ModifierPolicy::CtrlAlt);
    }

    #[test]
    fn command_line_wins_over_file() {
        let shell_args = CmdLineArgs {
            fullscreen: true,
            no_quit: true,
            default_interval_ms: Some(50),
            grab_modifier: Some(GrabModifier::CtrlAltShift),
            ..CmdLineArgs::default()
        };
        let config = read_config(SAMPLE, shell_args).unwrap();
        assert!(config.frontend.fullscreen);
        assert!(!config.frontend.window_close);
        assert_eq!(config.display.default_interval_ms, 50);

        let params = config.scheduler_params();
        assert_eq!(params.modifier_policy, ModifierPolicy::CtrlAltShift);
        assert!(params.start_fullscreen);
    }

    #[test]
    fn grab_modifier_from_str_variants() {
        assert_eq!("ctrl-alt".parse::<GrabModifier>(), Ok(GrabModifier::CtrlAlt));
        assert_eq!("RightCtrl".parse::<GrabModifier>(), Ok(GrabModifier::RightCtrl));
        assert!("super".parse::<GrabModifier>().is_err());
    }
}
