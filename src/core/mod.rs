//! Runtime core: panic recovery and shutdown coordination.
//!
//! Internal modules:
//! - [`runner`]: one protected invocation (panic recovery + report);
//! - [`once`]: fire-and-forget protected execution;
//! - [`actor`]: persistent restart loop and its handle;
//! - [`supervisor`]: shutdown-waiter trait and supervision tree.

mod actor;
mod once;
mod runner;
mod supervisor;

pub use actor::{spawn_persistent, PersistentHandle};
pub use once::{run_isolated, spawn_isolated};
pub use runner::protect;
pub use supervisor::{ShutdownWaiter, TreeSupervisor};
