//! 2048 (workspace facade crate).
//!
//! Re-exports the member crates under one roof so consumers can depend on a
//! single package: `twenty48::{types, core, env, adapter}`.

pub use twenty48_adapter as adapter;
pub use twenty48_core as core;
pub use twenty48_env as env;
pub use twenty48_types as types;
