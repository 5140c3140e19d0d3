//! Batched 1-out-of-2 base oblivious transfer following the Naor-Pinkas
//! construction (cf. <https://dl.acm.org/doi/10.5555/365411.365502>) over
//! the NIST P-256 prime order group.
//!
//! A single invocation runs `n` independent transfers between the same pair
//! of parties, amortizing one shared group element across the batch. The
//! sender comes away with two 128-bit keys per instance, the receiver with
//! the one selected by its choice bit, and neither party learns anything
//! beyond that. The keys are meant to seed an OT extension protocol; the
//! protocol targets semi-honest security.
//!
//! Communication happens through the [`channel::Channel`] trait, which can
//! be implemented for arbitrary transports. [`channel::SimpleChannel`]
//! provides an in-process loopback implementation used by the tests and
//! benchmarks.
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod channel;
pub mod ot;

mod group;
