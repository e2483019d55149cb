//! Feature encoding of match states for learned evaluators.
//!
//! ## Overview
//!
//! - **Trait**: `StateEncoder` turns a state into a fixed-length `Vec<f32>`
//!   seen from one seat
//! - **Jaipur**: `JaipurEncoder` emits normalized public information plus
//!   the perspective player's own hand
//!
//! ## Usage
//!
//! ```rust
//! use rust_jaipur::core::{JaipurConfig, PlayerId};
//! use rust_jaipur::encoding::{JaipurEncoder, StateEncoder};
//! use rust_jaipur::rules::new_match;
//!
//! let state = new_match(JaipurConfig::default(), 2, 3).unwrap();
//! let encoder = JaipurEncoder::new(2);
//! let features = encoder.encode(&state, PlayerId::new(0));
//! assert_eq!(features.len(), encoder.feature_count());
//! ```

pub mod encoder;

pub use encoder::{JaipurEncoder, StateEncoder};
