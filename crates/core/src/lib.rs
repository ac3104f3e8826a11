//! Pedigree and heredity core for poultry breeding applications.
//!
//! The crate answers three questions about a herd: what an individual's
//! family tree looks like, how related two candidate mates are (and the
//! offspring risk that implies), and what plumage an offspring of two
//! genotypes will plausibly display. Individuals are owned by the calling
//! application and reached through the [`herd::IndividualStore`] contract;
//! every result is a freshly computed, immutable value.

pub mod error;
pub mod genetics;
pub mod herd;
pub mod types;

pub use error::{BreedingError, Result};
