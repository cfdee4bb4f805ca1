/*!
    Rational numbers for time bases.
*/

use std::fmt;
use std::time::Duration;

/**
    A rational number, used for stream time bases.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /**
        Returns the value as a float, or zero for a zero denominator.
    */
    pub fn to_f64(self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            self.num as f64 / self.den as f64
        }
    }

    /**
        Convert a timestamp expressed in this time base to a duration.

        Negative timestamps and invalid time bases yield `None`.
    */
    pub fn to_duration(self, ts: i64) -> Option<Duration> {
        if ts < 0 || self.num <= 0 || self.den <= 0 {
            return None;
        }
        Some(Duration::from_secs_f64(ts as f64 * self.to_f64()))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_to_duration() {
        let tb = Rational::new(1, 90000);
        assert_eq!(tb.to_duration(180000), Some(Duration::from_secs(2)));
        assert_eq!(tb.to_duration(-1), None);
        assert_eq!(Rational::new(1, 0).to_duration(10), None);
    }

    #[test]
    fn rational_display() {
        assert_eq!(Rational::new(1001, 30000).to_string(), "1001/30000");
    }
}
