// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!        ops / release / fleet
//!               |
//!               v
//!     Publisher (dry-run aware writes)
//!               |
//!               v
//!      ,------------------,
//!      | RepositoryClient |
//!      '--------+---------'
//!               |
//!               v
//!           ShellGit
//!    gix (reads) + git CLI (writes)
//! ```

pub mod backend;
pub mod publish;

pub use backend::{RepositoryClient, ShellGit, WorkingTreeStatus};
pub use publish::Publisher;
