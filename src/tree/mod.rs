//! Bundle trees
//!
//! Walking, fingerprinting and synchronizing directory trees under an
//! exclusion/preservation [`Policy`](crate::policy::Policy).

pub mod hasher;
pub mod sync;
pub mod walker;
