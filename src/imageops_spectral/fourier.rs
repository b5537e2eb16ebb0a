//! One-dimensional discrete Fourier transforms.
//!
//! Two variants compute the same mathematical result:
//!
//! * the naive DFT, `O(N²)`, accepts any length;
//! * the recursive radix-2 FFT, `O(N log N)`, requires a power-of-two length.
//!
//! The forward transforms are unnormalized. Both inverses divide by `N`:
//! `idft` once at the end, `ifft` by halving at every recursion level.

use crate::error::TransformError;
use num_complex::Complex;
use std::f64::consts::PI;

/// Direction of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    /// Sign of the exponent: `-1` forward, `+1` inverse.
    #[inline]
    const fn sign(self) -> f64 {
        match self {
            Self::Forward => -1.0,
            Self::Inverse => 1.0,
        }
    }
}

/// Which 1D primitive to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformVariant {
    /// Direct evaluation of the definition; any length
    Naive,
    /// Radix-2 decimation in time; power-of-two lengths only
    #[default]
    Fast,
}

impl TransformVariant {
    /// Checks that `length` can be processed by this variant.
    ///
    /// # Errors
    ///
    /// * `TransformError::InvalidDimension` - `Fast` with a length that is not a power of two
    pub fn validate_length(self, length: usize) -> Result<(), TransformError> {
        match self {
            Self::Naive => Ok(()),
            Self::Fast => ensure_power_of_two(length),
        }
    }

    /// Runs the 1D transform of this variant in the given direction.
    ///
    /// # Errors
    ///
    /// * `TransformError::InvalidDimension` - see [`TransformVariant::validate_length`]
    pub fn apply(
        self,
        signal: &[Complex<f64>],
        direction: Direction,
    ) -> Result<Vec<Complex<f64>>, TransformError> {
        match (self, direction) {
            (Self::Naive, Direction::Forward) => Ok(dft(signal)),
            (Self::Naive, Direction::Inverse) => Ok(idft(signal)),
            (Self::Fast, Direction::Forward) => fft(signal),
            (Self::Fast, Direction::Inverse) => ifft(signal),
        }
    }
}

/// Lengths 0 and 1 are accepted: the recursion returns them unchanged.
fn ensure_power_of_two(length: usize) -> Result<(), TransformError> {
    if length <= 1 || length.is_power_of_two() {
        Ok(())
    } else {
        Err(TransformError::InvalidDimension { length })
    }
}

/// Forward DFT by direct evaluation: `X[k] = Σ x[n]·e^(−2πi·k·n/N)`.
pub fn dft(signal: &[Complex<f64>]) -> Vec<Complex<f64>> {
    naive(signal, Direction::Forward)
}

/// Inverse DFT by direct evaluation: `x[n] = (1/N)·Σ X[k]·e^(2πi·k·n/N)`.
pub fn idft(spectrum: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let n = spectrum.len() as f64;
    naive(spectrum, Direction::Inverse)
        .into_iter()
        .map(|v| v / n)
        .collect()
}

fn naive(signal: &[Complex<f64>], direction: Direction) -> Vec<Complex<f64>> {
    let n = signal.len();
    let step = direction.sign() * 2.0 * PI / n as f64;
    (0..n)
        .map(|k| {
            signal
                .iter()
                .enumerate()
                .map(|(t, &value)| {
                    // k·t mod N keeps the angle small for long signals
                    let phase = step * ((k * t) % n) as f64;
                    value * Complex::from_polar(1.0, phase)
                })
                .sum()
        })
        .collect()
}

/// Forward radix-2 FFT.
///
/// # Errors
///
/// * `TransformError::InvalidDimension` - the length is not a power of two
pub fn fft(signal: &[Complex<f64>]) -> Result<Vec<Complex<f64>>, TransformError> {
    ensure_power_of_two(signal.len())?;
    Ok(radix2(signal, Direction::Forward))
}

/// Inverse radix-2 FFT, normalized by `1/N`.
///
/// # Errors
///
/// * `TransformError::InvalidDimension` - the length is not a power of two
pub fn ifft(spectrum: &[Complex<f64>]) -> Result<Vec<Complex<f64>>, TransformError> {
    ensure_power_of_two(spectrum.len())?;
    Ok(radix2(spectrum, Direction::Inverse))
}

fn radix2(signal: &[Complex<f64>], direction: Direction) -> Vec<Complex<f64>> {
    let n = signal.len();
    if n <= 1 {
        return signal.to_vec();
    }

    let even: Vec<_> = signal.iter().step_by(2).copied().collect();
    let odd: Vec<_> = signal.iter().skip(1).step_by(2).copied().collect();
    let even = radix2(&even, direction);
    let odd = radix2(&odd, direction);

    let half = n / 2;
    let mut combined = vec![Complex::new(0.0, 0.0); n];
    for k in 0..half {
        let twiddle = Complex::from_polar(1.0, direction.sign() * 2.0 * PI * k as f64 / n as f64);
        let t = twiddle * odd[k];
        combined[k] = even[k] + t;
        combined[k + half] = even[k] - t;
    }

    // Halving at each of the log2(N) levels gives the overall 1/N.
    if direction == Direction::Inverse {
        for value in &mut combined {
            *value = *value / 2.0;
        }
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[Complex<f64>], b: &[Complex<f64>], tolerance: f64) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            let scale = x.norm().max(y.norm()).max(1.0);
            assert!(
                (x - y).norm() <= tolerance * scale,
                "{x} differs from {y}"
            );
        }
    }

    fn ramp(n: usize) -> Vec<Complex<f64>> {
        (0..n)
            .map(|i| Complex::new(i as f64 * 0.5 - 1.0, (i % 3) as f64))
            .collect()
    }

    #[test]
    fn dft_of_impulse_is_flat() {
        let mut signal = vec![Complex::new(0.0, 0.0); 6];
        signal[0] = Complex::new(1.0, 0.0);
        let spectrum = dft(&signal);
        assert_close(&spectrum, &vec![Complex::new(1.0, 0.0); 6], 1e-12);
    }

    #[test]
    fn dft_of_constant_concentrates_in_dc() {
        let signal = vec![Complex::new(2.0, 0.0); 5];
        let spectrum = dft(&signal);
        assert!((spectrum[0] - Complex::new(10.0, 0.0)).norm() < 1e-12);
        for value in &spectrum[1..] {
            assert!(value.norm() < 1e-12);
        }
    }

    #[test]
    fn fft_matches_dft() {
        for n in [1, 2, 8, 16, 64] {
            let signal = ramp(n);
            assert_close(&fft(&signal).unwrap(), &dft(&signal), 1e-6);
        }
    }

    #[test]
    fn inverses_recover_signal() {
        for n in [3, 7, 8, 32] {
            let signal = ramp(n);
            assert_close(&idft(&dft(&signal)), &signal, 1e-9);
        }
        for n in [2, 8, 32] {
            let signal = ramp(n);
            assert_close(&ifft(&fft(&signal).unwrap()).unwrap(), &signal, 1e-9);
        }
    }

    #[test]
    fn fft_rejects_non_power_of_two() {
        let signal = ramp(12);
        assert_eq!(
            fft(&signal),
            Err(TransformError::InvalidDimension { length: 12 })
        );
        assert_eq!(
            ifft(&signal),
            Err(TransformError::InvalidDimension { length: 12 })
        );
    }

    #[test]
    fn trivial_lengths_pass_through() {
        assert!(fft(&[]).unwrap().is_empty());
        let one = [Complex::new(3.0, -1.0)];
        assert_eq!(fft(&one).unwrap(), one.to_vec());
        assert_eq!(ifft(&one).unwrap(), one.to_vec());
    }

    #[test]
    fn variant_dispatch() {
        let signal = ramp(8);
        let fast = TransformVariant::Fast
            .apply(&signal, Direction::Forward)
            .unwrap();
        let naive = TransformVariant::Naive
            .apply(&signal, Direction::Forward)
            .unwrap();
        assert_close(&fast, &naive, 1e-6);
        assert!(TransformVariant::Naive.validate_length(12).is_ok());
        assert!(TransformVariant::Fast.validate_length(12).is_err());
    }
}
