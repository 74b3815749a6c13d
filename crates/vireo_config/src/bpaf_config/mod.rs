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

use std::path::PathBuf;

use crate::GrabModifier;

use bpaf::Bpaf;

#[cfg_attr(feature = "use_bpaf", derive(Bpaf))]
#[cfg_attr(feature = "use_bpaf", bpaf(options, version, generate(cli_args)))]
#[derive(Debug, Default)]
pub struct CmdLineArgs {
    #[bpaf(long("config_file"), long("configfile"))]
    pub config_file: Option<PathBuf>,

    #[bpaf(long("app_name"), long("name"))]
    pub app_name: Option<String>,

    #[bpaf(long("full_screen"), long("fullscreen"), switch)]
    pub fullscreen: bool,

    #[bpaf(long("show_cursor"), long("showcursor"), switch)]
    pub show_cursor: bool,

    #[bpaf(long("no_quit"), long("noquit"), switch)]
    pub no_quit: bool,

    #[bpaf(long)]
    pub grab_modifier: Option<GrabModifier>,

    // Refresh cadence overrides
    #[bpaf(long)]
    pub busy_interval_ms: Option<u64>,
    #[bpaf(long)]
    pub default_interval_ms: Option<u64>,
    #[bpaf(long)]
    pub minimized_interval_ms: Option<u64>,
    #[bpaf(long)]
    pub max_idle_ticks: Option<u32>,
}
