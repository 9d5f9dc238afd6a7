// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`env`] builds the child environment from `KEY=VALUE` overrides.
//! - [`command`] holds the immutable [`CommandDef`] and the single-use
//!   [`Runnable`] launch descriptor.
//! - [`routine`] owns the single-flight executor: one background task that
//!   runs at most one process at a time and reports a [`RoutineOut`] per
//!   command.
//! - [`init`] runs the optional setup command once at startup.

pub mod command;
pub mod env;
pub mod init;
pub mod routine;

pub use command::{CommandDef, Runnable};
pub use env::{build_environment, make_environment};
pub use init::{init_result, run_init};
pub use routine::{Routine, RoutineOut, run_routine, spawn_routine};
