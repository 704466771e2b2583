//! External collaborators.
//!
//! Thin subprocess wrappers around the tools sshm delegates to: key-pair
//! generation (`ssh-keygen`), Git remote inspection/mutation (`git`), and
//! the one-shot SSH authentication probe (`ssh -T`). These are glue, not
//! design: each call is a bounded, synchronous round-trip.

pub mod git;
pub mod keygen;
pub mod ssh;
