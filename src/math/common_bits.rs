//! Extraction of the leading bits shared by a set of doubles.

const MANTISSA_BITS: u32 = 52;

/// Accumulates the sign, exponent and leading mantissa bits common to all
/// added values.
///
/// If the values differ in sign or exponent the common value is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonBits {
    initialized: bool,
    common_bits: u64,
    common_sign_exp: u64,
}

impl CommonBits {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one value into the common bits.
    pub fn add(&mut self, num: f64) {
        let num_bits = num.to_bits();
        if !self.initialized {
            self.initialized = true;
            self.common_bits = num_bits;
            self.common_sign_exp = sign_exp_bits(num_bits);
            return;
        }

        if sign_exp_bits(num_bits) != self.common_sign_exp {
            self.common_bits = 0;
            return;
        }

        let common_mantissa = common_most_significant_mantissa_bits(self.common_bits, num_bits);
        self.common_bits = zero_lower_bits(self.common_bits, 64 - (12 + common_mantissa));
    }

    /// The value made of the common bits.
    #[must_use]
    pub fn common(&self) -> f64 {
        f64::from_bits(self.common_bits)
    }
}

fn sign_exp_bits(bits: u64) -> u64 {
    bits >> MANTISSA_BITS
}

fn bit(bits: u64, i: u32) -> u64 {
    (bits >> i) & 1
}

fn common_most_significant_mantissa_bits(a: u64, b: u64) -> u32 {
    let mut count = 0;
    for i in (0..MANTISSA_BITS).rev() {
        if bit(a, i) != bit(b, i) {
            return count;
        }
        count += 1;
    }
    MANTISSA_BITS
}

fn zero_lower_bits(bits: u64, n: u32) -> u64 {
    if n >= 64 {
        return 0;
    }
    let mask = (1_u64 << n) - 1;
    bits & !mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common_of(values: &[f64]) -> f64 {
        let mut cb = CommonBits::new();
        for &v in values {
            cb.add(v);
        }
        cb.common()
    }

    #[test]
    fn shared_prefix_is_kept() {
        assert!((common_of(&[8.5, 8.25]) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_value_is_its_own_common() {
        assert!((common_of(&[123.456]) - 123.456).abs() < f64::EPSILON);
    }

    #[test]
    fn different_exponents_have_no_common_bits() {
        assert!(common_of(&[1.0, 1000.0]).abs() < f64::EPSILON);
        assert!(common_of(&[5.0, -5.0]).abs() < f64::EPSILON);
    }

    #[test]
    fn large_offsets_are_extracted() {
        let c = common_of(&[1_000_000.125, 1_000_000.5, 1_000_001.0]);
        assert!(c > 999_000.0 && c <= 1_000_000.125);
    }
}
