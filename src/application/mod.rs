//! Application layer: the transaction lifecycle.
//!
//! `TransactionController` is the entry point. It owns the form, submits
//! through `SubmissionClient` and tracks the accepted transaction with a
//! `StatusPoller` task registered in a single `TransactionSlot`.

pub mod controller;
pub mod notifier;
pub mod poller;
pub mod slot;
pub mod submission;
