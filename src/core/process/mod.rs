// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Child processes for the external tools: `mvn`, `oc` and user commands.
//!
//! ```text
//! ProcessBuilder::new("mvn").arg("-B").cwd(repo).capture()
//!   .run(&cancel)
//!       --> tokio::process::Command, stdout/stderr drained line by line
//!       --> ProcessOutput { exit_code, stdout, stderr, interrupted }
//! ```
//!
//! Output is always drained so a chatty child never blocks on a full pipe;
//! [`builder::OutputMode`] decides whether lines are logged, kept, or both.

pub mod builder;
mod runner;
