//! Utility building blocks shared across layers.
//!
//! - [`code_generator`] - Counter-backed base-62 short codes
//! - [`clock`] - Injectable time source
//! - [`client_key`] - Client identity extraction for admission control
//! - [`target_url`] - Validation of URLs submitted for shortening

pub mod client_key;
pub mod clock;
pub mod code_generator;
pub mod target_url;
