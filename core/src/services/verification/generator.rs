//! Verification code generation

use rand::rngs::OsRng;
use rand::Rng;

use crate::domain::entities::verification_record::CODE_LENGTH;

/// Generates fixed-length numeric verification codes
///
/// Codes are drawn from the OS CSPRNG, uniformly over the full
/// fixed-length range with no leading zero, so the default length of 6
/// yields values in `100000..=999999`.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: u32,
}

impl CodeGenerator {
    /// Create a generator for codes of the given digit count
    ///
    /// Lengths outside `1..=18` are clamped so the sampled range always
    /// fits in a `u64`.
    pub fn new(length: u32) -> Self {
        Self {
            length: length.clamp(1, 18),
        }
    }

    /// Digit count of generated codes, after clamping
    ///
    /// Anything that checks submitted codes against this generator's
    /// output must use this value, not the raw configured length.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Generate a new code
    pub fn generate(&self) -> String {
        let mut rng = OsRng;
        let low = 10u64.pow(self.length - 1);
        let high = 10u64.pow(self.length) - 1;
        rng.gen_range(low..=high).to_string()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(CODE_LENGTH as u32)
    }
}
