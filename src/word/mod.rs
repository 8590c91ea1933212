//! Machine words and overflow policies.
//!
//! Every memory cell, the accumulator and every I/O value is a [`Word`].
//! How a word behaves after ADD/SUB, and what "positive" means for BRP,
//! is decided by the machine's [`WordPolicy`].

mod policy;

pub use policy::WordPolicy;

/// A single mailbox / accumulator value.
///
/// Stored as `i64` for every policy; the policy keeps values inside its
/// own range.
pub type Word = i64;
