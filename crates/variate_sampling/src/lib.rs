//! # variate_sampling: Random Variate Generation
//!
//! ## Layer 2 Role
//!
//! variate_sampling turns uniform random numbers into variates from other
//! distributions. It depends on `variate_core` for the symbolic engine and
//! the root finder.
//!
//! - [`lcg`]: Mixed congruential generator (raw, normalised, streaming)
//! - [`rng`]: The [`UniformSource`] trait and the seeded [`VariateRng`]
//! - [`inversion`]: Density → CDF → inverse CDF, with branch selection
//! - [`acceptance`]: Acceptance-rejection with supplied or computed bound
//! - [`inverse_transform`]: Inverse-transform sampling (catalogue or user inverse)
//! - [`catalog`]: Named distributions with `loc`/`scale`
//!
//! ## Randomness
//!
//! Every sampler takes its uniform source as an explicit `&mut` argument;
//! nothing in this crate touches global random state.
//!
//! ## Usage Examples
//!
//! ```rust
//! use variate_sampling::{
//!     invert_density, sample_auto_bound, sample_user_inverse, Clamp, Density, Support,
//!     VariateRng,
//! };
//!
//! let mut rng = VariateRng::from_seed(2024);
//! let density = Density::parse("3*x^2").unwrap();
//! let support = Support::new(0.0, 1.0).unwrap();
//!
//! // Acceptance-rejection with a grid-computed bound
//! let accepted = sample_auto_bound(&mut rng, &support, &density, 1_000).unwrap();
//! assert!(accepted.is_some());
//!
//! // Inverse transform through the symbolic inverse CDF
//! let inversion = invert_density(&density, Some(0.0)).unwrap();
//! let quantile = inversion.select_branch(&support).unwrap();
//! let draws = sample_user_inverse(&mut rng, 10, quantile.expr(), &Clamp::unbounded()).unwrap();
//! assert!(draws.iter().all(|&x| (0.0..=1.0).contains(&x)));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialisation for parameters, results and catalogue requests

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod acceptance;
pub mod catalog;
pub mod config;
pub mod density;
pub mod error;
pub mod inverse_transform;
pub mod inversion;
pub mod lcg;
pub mod rng;

pub use acceptance::{sample_auto_bound, sample_with_bound, Acceptance, AcceptanceRejection};
pub use catalog::{CatalogDistribution, DistributionSpec, CATALOG_NAMES};
pub use config::{CancellationToken, SamplerConfig, SamplerConfigBuilder};
pub use density::{Density, Support};
pub use error::{ConfigError, SamplingError};
pub use inverse_transform::{sample_catalog, sample_user_inverse, Clamp, InverseTransform};
pub use inversion::{invert_density, DensityInversion, Inverse, InverseBranch};
pub use lcg::{
    generate_sequence, generate_uniform_sequence, CongruentialGenerator, RecurrenceParams,
    MAX_UNIFORM_MODULUS,
};
pub use rng::{UniformSource, VariateRng};
