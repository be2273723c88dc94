//! # Uniform Sources
//!
//! Every sampler in this crate consumes uniform variates in `[0, 1)` through
//! the [`UniformSource`] trait and takes the source as an explicit `&mut`
//! argument. There is no global random state, so runs are reproducible from
//! a seed and independent streams never interfere.
//!
//! ## Module Structure
//!
//! - [`UniformSource`]: the trait the samplers are generic over
//! - [`VariateRng`]: seeded wrapper over `rand::rngs::StdRng`
//!
//! The congruential engine in [`crate::lcg`] also implements
//! [`UniformSource`] and can drive any sampler.
//!
//! ## Usage Example
//!
//! ```rust
//! use variate_sampling::rng::{UniformSource, VariateRng};
//!
//! let mut rng = VariateRng::from_seed(12345);
//! let u = rng.next_uniform();
//! assert!((0.0..1.0).contains(&u));
//! ```

mod source;

pub use source::{UniformSource, VariateRng};
