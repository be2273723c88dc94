//! # Mixed Congruential Generator
//!
//! The recurrence `x[k+1] = (a * x[k] + c) mod m` started from the seed `x0`.
//!
//! - [`generate_sequence`] returns one period (or a prefix of it) as raw
//!   integers: generation stops right after the seed reappears, or after
//!   `max_iter + 1` values, whichever comes first.
//! - [`generate_uniform_sequence`] maps the same values to the midpoints
//!   `(x + 0.5) / m` of the `m` equal cells of `(0, 1)`.
//! - [`CongruentialGenerator`] is the unbounded streaming form and
//!   implements [`UniformSource`], so it can drive every sampler.
//!
//! Products are formed in `u128`, so any `u64` parameters are safe for the
//! integer sequence. The uniform forms additionally require
//! `m <= 2^52` ([`MAX_UNIFORM_MODULUS`]): beyond that `(x + 0.5) / m` is no
//! longer exact in `f64` and the top cell rounds to `1.0`.

use tracing::debug;

use crate::error::SamplingError;
use crate::rng::UniformSource;

/// Largest modulus whose cell midpoints all stay strictly inside `(0, 1)`.
pub const MAX_UNIFORM_MODULUS: u64 = 1 << 52;

/// Upper bound on the up-front allocation for a sequence.
const PREALLOCATION_LIMIT: u64 = 1 << 20;

/// Parameters of the congruential recurrence.
///
/// # Examples
///
/// ```rust
/// use variate_sampling::lcg::{generate_sequence, RecurrenceParams};
///
/// let params = RecurrenceParams::new(5, 3, 16, 1, 100);
/// let sequence = generate_sequence(&params).unwrap();
/// assert_eq!(sequence.len(), 16);
/// assert_eq!(*sequence.last().unwrap(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecurrenceParams {
    /// Multiplier.
    pub a: u64,
    /// Increment.
    pub c: u64,
    /// Modulus (positive).
    pub m: u64,
    /// Seed, strictly below the modulus.
    pub x0: u64,
    /// Iteration cap: at most `max_iter + 1` values are produced.
    pub max_iter: u64,
}

impl RecurrenceParams {
    /// Creates a parameter set without validating it.
    pub fn new(a: u64, c: u64, m: u64, x0: u64, max_iter: u64) -> Self {
        Self {
            a,
            c,
            m,
            x0,
            max_iter,
        }
    }

    /// Checks `m > 0` and `x0 < m`.
    ///
    /// # Errors
    ///
    /// [`SamplingError::Domain`] when either condition fails.
    pub fn validate(&self) -> Result<(), SamplingError> {
        if self.m == 0 {
            return Err(SamplingError::domain("modulus m must be positive"));
        }
        if self.x0 >= self.m {
            return Err(SamplingError::domain(format!(
                "seed x0 = {} must be below the modulus m = {}",
                self.x0, self.m
            )));
        }
        Ok(())
    }

    /// [`validate`](Self::validate) plus `m <= MAX_UNIFORM_MODULUS`.
    ///
    /// # Errors
    ///
    /// [`SamplingError::Domain`] when any condition fails.
    pub fn validate_uniform(&self) -> Result<(), SamplingError> {
        self.validate()?;
        if self.m > MAX_UNIFORM_MODULUS {
            return Err(SamplingError::domain(format!(
                "modulus m = {} exceeds 2^52; uniforms would round to 1.0",
                self.m
            )));
        }
        Ok(())
    }

    #[inline]
    fn step(&self, current: u64) -> u64 {
        let next = (u128::from(self.a) * u128::from(current) + u128::from(self.c))
            % u128::from(self.m);
        // Strictly below m, which fits in u64
        next as u64
    }
}

/// Generates the raw congruential sequence.
///
/// The seed itself is not emitted unless the recurrence returns to it, in
/// which case it is the final element.
///
/// # Errors
///
/// [`SamplingError::Domain`] if `m = 0` or `x0 >= m`.
pub fn generate_sequence(params: &RecurrenceParams) -> Result<Vec<u64>, SamplingError> {
    params.validate()?;

    let capacity = params
        .max_iter
        .saturating_add(1)
        .min(params.m)
        .min(PREALLOCATION_LIMIT);
    let mut values = Vec::with_capacity(capacity as usize);
    let mut current = params.x0;
    let mut iteration = 0u64;

    loop {
        let next = params.step(current);
        values.push(next);
        if next == params.x0 || iteration >= params.max_iter {
            break;
        }
        current = next;
        iteration += 1;
    }

    debug!(
        a = params.a,
        c = params.c,
        m = params.m,
        x0 = params.x0,
        generated = values.len(),
        closed_cycle = values.last() == Some(&params.x0),
        "congruential sequence generated"
    );
    Ok(values)
}

/// Generates the sequence mapped to `(x + 0.5) / m`.
///
/// ```rust
/// use variate_sampling::lcg::{generate_uniform_sequence, RecurrenceParams};
///
/// let params = RecurrenceParams::new(5, 3, 16, 1, 100);
/// let uniforms = generate_uniform_sequence(&params).unwrap();
/// assert_eq!(uniforms[0], 8.5 / 16.0);
/// ```
///
/// # Errors
///
/// [`SamplingError::Domain`] if `m = 0`, `x0 >= m` or `m > 2^52`.
pub fn generate_uniform_sequence(params: &RecurrenceParams) -> Result<Vec<f64>, SamplingError> {
    params.validate_uniform()?;
    let m = params.m as f64;
    Ok(generate_sequence(params)?
        .into_iter()
        .map(|x| (x as f64 + 0.5) / m)
        .collect())
}

/// Streaming congruential generator.
///
/// Emits `(x + 0.5) / m` for each successive state without a period cap;
/// after `m` values (at most) the stream repeats.
///
/// ```rust
/// use variate_sampling::lcg::{CongruentialGenerator, RecurrenceParams};
/// use variate_sampling::rng::UniformSource;
///
/// let mut generator = CongruentialGenerator::new(RecurrenceParams::new(5, 3, 16, 1, 0)).unwrap();
/// assert_eq!(generator.next_value(), 8);
/// assert_eq!(generator.next_uniform(), 11.5 / 16.0);
/// ```
#[derive(Clone, Debug)]
pub struct CongruentialGenerator {
    params: RecurrenceParams,
    state: u64,
}

impl CongruentialGenerator {
    /// Creates a generator positioned at the seed `x0`.
    ///
    /// `max_iter` is ignored by the streaming form.
    ///
    /// # Errors
    ///
    /// [`SamplingError::Domain`] if `m = 0`, `x0 >= m` or `m > 2^52`.
    pub fn new(params: RecurrenceParams) -> Result<Self, SamplingError> {
        params.validate_uniform()?;
        Ok(Self {
            params,
            state: params.x0,
        })
    }

    /// Advances the recurrence and returns the raw state.
    #[inline]
    pub fn next_value(&mut self) -> u64 {
        self.state = self.params.step(self.state);
        self.state
    }

    /// Current state (the last value emitted, or the seed).
    #[inline]
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Parameters of the recurrence.
    pub fn params(&self) -> &RecurrenceParams {
        &self.params
    }
}

impl UniformSource for CongruentialGenerator {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        (self.next_value() as f64 + 0.5) / self.params.m as f64
    }
}
