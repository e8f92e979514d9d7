//! # Job abstractions.
//!
//! - [`Job`] — trait for the opaque unit of work a persistent task re-invokes
//! - [`JobFn`] — closure-backed job implementation
//! - [`JobRef`] — shared reference to a job (`Arc<dyn Job>`)

mod job;
mod job_fn;

pub use job::{BoxJobFuture, Job};
pub use job_fn::{JobFn, JobRef};
