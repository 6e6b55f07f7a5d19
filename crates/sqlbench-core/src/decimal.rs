// SQLBench - SQL Query Benchmarking Harness
//
// Copyright (c) 2025 SQLBench contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Exact fixed-point decimal arithmetic for benchmark statistics.
//!
//! Reported statistics must be reproducible across runs, so the engine never
//! uses binary floating point for a reported value. [`Decimal`] is an
//! unscaled `i128` paired with a decimal scale; division and rescaling round
//! half-up (half away from zero), matching arbitrary-precision decimal
//! semantics. A binary `f64` square root is used only as the seed for the
//! Babylonian iteration in [`sqrt`].

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;
use thiserror::Error;

/// A fixed-point decimal value: `unscaled * 10^(-scale)`.
///
/// Equality and ordering compare numeric values, not representations:
/// `2` at scale 0 equals `2.00000` at scale 5.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    unscaled: i128,
    scale: u32,
}

/// Error produced when parsing a string into a [`Decimal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal literal '{input}'")]
pub struct ParseDecimalError {
    /// The rejected input.
    pub input: String,
}

impl Decimal {
    /// A zero value at scale 0.
    pub const ZERO: Decimal = Decimal {
        unscaled: 0,
        scale: 0,
    };

    /// Create a value from its unscaled integer and scale.
    ///
    /// `Decimal::new(1_500, 3)` is `1.500`.
    pub const fn new(unscaled: i128, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    /// Create an integer value at scale 0.
    pub const fn from_int(value: i64) -> Self {
        Self {
            unscaled: value as i128,
            scale: 0,
        }
    }

    /// A zero value carrying the given scale (renders as `0.000` for scale 3).
    pub const fn zero(scale: u32) -> Self {
        Self { unscaled: 0, scale }
    }

    /// The decimal scale (number of fractional digits carried).
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// The unscaled integer representation.
    pub const fn unscaled(&self) -> i128 {
        self.unscaled
    }

    /// True when the numeric value is zero, at any scale.
    pub const fn is_zero(&self) -> bool {
        self.unscaled == 0
    }

    /// Divide by `divisor`, producing a value at `scale`, rounding half-up.
    ///
    /// # Panics
    ///
    /// Panics on division by a zero divisor, like integer division.
    pub fn divide(&self, divisor: &Decimal, scale: u32) -> Decimal {
        let exp = scale as i64 + divisor.scale as i64 - self.scale as i64;
        let (num, den) = if exp >= 0 {
            (self.unscaled * pow10(exp as u32), divisor.unscaled)
        } else {
            (self.unscaled, divisor.unscaled * pow10((-exp) as u32))
        };
        Decimal::new(div_half_up(num, den), scale)
    }

    /// Rescale, rounding half-up when digits are dropped.
    pub fn with_scale(&self, scale: u32) -> Decimal {
        match scale.cmp(&self.scale) {
            Ordering::Equal => *self,
            Ordering::Greater => {
                Decimal::new(self.unscaled * pow10(scale - self.scale), scale)
            }
            Ordering::Less => {
                Decimal::new(div_half_up(self.unscaled, pow10(self.scale - scale)), scale)
            }
        }
    }

    /// Approximate the value as an `f64`. Used only for seeding [`sqrt`],
    /// never for reported output.
    pub fn to_f64(&self) -> f64 {
        self.unscaled as f64 / 10f64.powi(self.scale as i32)
    }

    fn aligned(&self, other: &Decimal) -> (i128, i128, u32) {
        let scale = self.scale.max(other.scale);
        let a = self.unscaled * pow10(scale - self.scale);
        let b = other.unscaled * pow10(scale - other.scale);
        (a, b, scale)
    }
}

/// Square root via Babylonian (Newton) iteration at fixed decimal precision.
///
/// The iteration is seeded from the `f64` square root's shortest decimal
/// form, then refined with `x' = (num/x + x) / 2` where both divisions round
/// half-up at `work_scale`, until two successive iterates compare equal.
/// The converged value is rounded to `scale`. The fixed-point result can
/// legitimately differ from a pure `f64` square root by one unit in the
/// last place.
pub fn sqrt(num: &Decimal, scale: u32, work_scale: u32) -> Decimal {
    if num.is_zero() {
        return Decimal::zero(scale);
    }
    let two = Decimal::from_int(2);
    let seed = format!("{}", num.to_f64().sqrt());
    let mut x1 = match seed.parse::<Decimal>() {
        Ok(d) if !d.is_zero() => d,
        _ => Decimal::new(1, work_scale),
    };
    let mut x0 = Decimal::ZERO;
    // The fixed-scale iteration can oscillate between two adjacent values
    // for unlucky inputs; cap the loop rather than trust convergence.
    for _ in 0..64 {
        if x0 == x1 {
            break;
        }
        x0 = x1;
        x1 = num.divide(&x0, work_scale);
        x1 = (x1 + x0).divide(&two, work_scale);
    }
    x1.with_scale(scale)
}

fn pow10(exp: u32) -> i128 {
    10i128.pow(exp)
}

/// Signed integer division rounding half away from zero.
fn div_half_up(num: i128, den: i128) -> i128 {
    let sign = num.signum() * den.signum();
    let (num, den) = (num.unsigned_abs(), den.unsigned_abs());
    let mut quotient = num / den;
    if (num % den) * 2 >= den {
        quotient += 1;
    }
    sign * quotient as i128
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        let (a, b, scale) = self.aligned(&rhs);
        Decimal::new(a + b, scale)
    }
}

impl Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        let (a, b, scale) = self.aligned(&rhs);
        Decimal::new(a - b, scale)
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal::new(self.unscaled * rhs.unscaled, self.scale + rhs.scale)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Decimal) -> bool {
        let (a, b, _) = self.aligned(other);
        a == b
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Decimal) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Decimal) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let abs = self.unscaled.unsigned_abs();
        if self.scale == 0 {
            return write!(f, "{sign}{abs}");
        }
        let divisor = pow10(self.scale) as u128;
        let integral = abs / divisor;
        let fraction = abs % divisor;
        write!(
            f,
            "{sign}{integral}.{fraction:0width$}",
            width = self.scale as usize
        )
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDecimalError {
            input: s.to_string(),
        };
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1i128, rest),
            None => (1i128, s.strip_prefix('+').unwrap_or(s)),
        };
        let (integral, fraction) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if integral.is_empty() && fraction.is_empty() {
            return Err(err());
        }
        if !integral.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }
        let mut unscaled: i128 = 0;
        for b in integral.bytes().chain(fraction.bytes()) {
            unscaled = unscaled
                .checked_mul(10)
                .and_then(|v| v.checked_add((b - b'0') as i128))
                .ok_or_else(err)?;
        }
        Ok(Decimal::new(sign * unscaled, fraction.len() as u32))
    }
}

impl Serialize for Decimal {
    /// Serializes as the exact decimal string, e.g. `"0.020"`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
