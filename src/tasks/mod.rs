//! Background Tasks Module
//!
//! Long-running tasks spawned at server start:
//! - expiration sweeper: removes expired entries at a fixed interval
//! - auto-save: persists a snapshot at a fixed interval
//! - shutdown-save: waits for an OS signal, saves once, then triggers
//!   the shutdown broadcast
//!
//! All periodic tasks listen on a shutdown broadcast receiver and exit
//! within one tick of the signal.

mod autosave;
mod shutdown;
mod sweeper;

pub use autosave::spawn_autosave_task;
pub use shutdown::spawn_shutdown_save;
pub use sweeper::spawn_sweeper_task;
