//! Short numeric codes that let a second device find a room.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of decimal digits in a join code.
pub const JOIN_CODE_LEN: usize = 6;

/// A join code: exactly [`JOIN_CODE_LEN`] ASCII digits, leading zeros kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinCode(String);

impl JoinCode {
    /// Draws a uniformly random code from `rng`.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let code = (0..JOIN_CODE_LEN)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        JoinCode(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for JoinCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == JOIN_CODE_LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(JoinCode(s.to_string()))
        } else {
            Err(CoreError::InvalidJoinCode {
                value: s.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_codes_are_six_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let code = JoinCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), JOIN_CODE_LEN);
            assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
            assert_eq!(code.as_str().parse::<JoinCode>().unwrap(), code);
        }
    }

    #[test]
    fn same_seed_same_code() {
        let a = JoinCode::generate(&mut StdRng::seed_from_u64(42));
        let b = JoinCode::generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn parse_keeps_leading_zeros() {
        assert_eq!("000123".parse::<JoinCode>().unwrap().to_string(), "000123");
    }

    #[test]
    fn parse_rejects_wrong_shapes() {
        for bad in ["12345", "1234567", "12a456", "", " 12345"] {
            assert!(bad.parse::<JoinCode>().is_err(), "accepted {bad:?}");
        }
    }
}
