//! Numerical methods supporting the samplers.
//!
//! - [`solvers`]: Bracketing root finders used to locate critical points of
//!   densities when bounding them for acceptance-rejection sampling

pub mod solvers;
