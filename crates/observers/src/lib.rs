//! Reusable observers for Strand simulation runs.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work with any event type exposing the right data.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for observers
//!   ([`HasProgress`], [`HasSample`], [`HasDivergence`])
//!
//! # Observers
//!
//! - [`ProgressObserver`] — percentage notifications at evenly spaced marks
//! - [`DivergenceLogger`] — records and logs the divergence report
//! - [`TraceRecorder`] — collects named traces for plotting
//!
//! Observers see every event but never change what a run computes.
//!
//! [`Observer`]: strand_core::Observer
//! [`HasProgress`]: traits::HasProgress
//! [`HasSample`]: traits::HasSample
//! [`HasDivergence`]: traits::HasDivergence

mod divergence;
mod progress;
mod trace;
pub mod traits;

pub use divergence::DivergenceLogger;
pub use progress::ProgressObserver;
pub use trace::{TraceRecorder, Traceable};
