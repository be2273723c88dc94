//! Published congruential-generator scenarios.

use variate_sampling::{
    generate_sequence, generate_uniform_sequence, CongruentialGenerator, RecurrenceParams,
    SamplingError, UniformSource,
};

#[test]
fn test_full_period_mod_16() {
    let params = RecurrenceParams::new(5, 3, 16, 1, 100);
    let raw = generate_sequence(&params).unwrap();
    assert_eq!(
        raw,
        vec![8, 11, 10, 5, 12, 15, 14, 9, 0, 3, 2, 13, 4, 7, 6, 1]
    );

    // Full period: every residue appears once
    let mut sorted = raw.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..16).collect::<Vec<u64>>());
}

#[test]
fn test_normalised_full_period_mod_16() {
    let params = RecurrenceParams::new(5, 3, 16, 1, 100);
    let uniforms = generate_uniform_sequence(&params).unwrap();
    let expected: Vec<f64> = [8, 11, 10, 5, 12, 15, 14, 9, 0, 3, 2, 13, 4, 7, 6, 1]
        .iter()
        .map(|&x| (x as f64 + 0.5) / 16.0)
        .collect();
    assert_eq!(uniforms, expected);

    // Midpoints of the 16 cells average to exactly one half
    let mean = uniforms.iter().sum::<f64>() / uniforms.len() as f64;
    assert_eq!(mean, 0.5);
}

#[test]
fn test_partial_period_with_cap() {
    // Multiplier 3 mod 16 has period 4 from seed 1 with c = 0: 3, 9, 11, 1
    let params = RecurrenceParams::new(3, 0, 16, 1, 100);
    assert_eq!(generate_sequence(&params).unwrap(), vec![3, 9, 11, 1]);

    let capped = RecurrenceParams::new(3, 0, 16, 1, 1);
    assert_eq!(generate_sequence(&capped).unwrap(), vec![3, 9]);
}

#[test]
fn test_invalid_parameters() {
    for params in [
        RecurrenceParams::new(5, 3, 0, 0, 10),
        RecurrenceParams::new(5, 3, 16, 16, 10),
        RecurrenceParams::new(5, 3, 16, 99, 10),
    ] {
        assert!(matches!(
            generate_sequence(&params),
            Err(SamplingError::Domain(_))
        ));
        assert!(matches!(
            generate_uniform_sequence(&params),
            Err(SamplingError::Domain(_))
        ));
    }
}

#[test]
fn test_streaming_generator_wraps_around() {
    let params = RecurrenceParams::new(5, 3, 16, 1, 0);
    let mut generator = CongruentialGenerator::new(params).unwrap();
    let first: Vec<f64> = (0..16).map(|_| generator.next_uniform()).collect();
    let second: Vec<f64> = (0..16).map(|_| generator.next_uniform()).collect();
    assert_eq!(first, second);
}
