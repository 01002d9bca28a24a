// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          fleet / catalog / config
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML, env, CLI overrides |
//!              '-------------+-------------'
//!                            v
//!        forge search --> fleet loop (repository x branch)
//!                            |
//!                            v
//!                   ops --> release / prod_tag
//!                            |
//!        +--------+-------+--+-----+----------+
//!        v        v       v        v          v
//!       git     build    net    platform   confirm
//!     git CLI   mvn    catalog     oc      y/N gate
//!
//!   +-----------------------------------------+
//!   |  core     process builder and runner    |
//!   +-----------------------------------------+
//!   |  foundation  error, logging, version,   |
//!   |              utility                    |
//!   +-----------------------------------------+
//! ```

pub mod build;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod confirm;
pub mod context;
pub mod core;
pub mod error;
pub mod fleet;
pub mod forge;
pub mod git;
pub mod logging;
pub mod net;
pub mod ops;
pub mod platform;
pub mod release;
pub mod utility;
pub mod version;

#[cfg(test)]
mod test_utils;
