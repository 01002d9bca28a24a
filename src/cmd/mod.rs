// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   fleet (every per-pair operation), catalog, config
//! ```

pub mod catalog;
pub mod config;
pub mod fleet;
