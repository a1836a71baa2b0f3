pub mod analysis;
pub mod config;
mod consistent_hashring;
pub mod metrics;
pub mod observability;

pub use crate::consistent_hashring::{
    HashFn,
    HashRing,
    RingError,
    default_hash,
};
