//! Top-level facade crate for the coin flip service.
//!
//! Re-exports core types and the server library so users can depend on a single crate.

pub mod core {
    pub use coinflip_core::*;
}

pub mod server {
    pub use coinflip_server::*;
}
