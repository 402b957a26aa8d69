//! Closed real intervals.
//!
//! Bounds are `f64` with `-∞` allowed as a lower bound and `+∞` as an upper
//! bound. There is no empty interval: every value of this type describes at
//! least one real number.

use core::fmt;

use thiserror::Error;

use crate::domain::BooleanSet;

/// Rejected bounds when building an interval from caller data.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IntervalError {
    #[error("interval bound is not a number")]
    NotANumber,
    #[error("lower bound {lo} is greater than upper bound {hi}")]
    Inverted { lo: f64, hi: f64 },
    #[error("interval [{lo}, {hi}] contains no real number")]
    NoRealValue { lo: f64, hi: f64 },
}

/// The set of reals `{ v | lo <= v <= hi }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    /// Builds `[lo, hi]`.
    ///
    /// # Panics
    ///
    /// Panics if the bounds are rejected by [`Interval::try_new`].
    pub fn new(lo: f64, hi: f64) -> Self {
        match Self::try_new(lo, hi) {
            Ok(interval) => interval,
            Err(e) => panic!("invalid interval: {}", e),
        }
    }

    pub fn try_new(lo: f64, hi: f64) -> Result<Self, IntervalError> {
        if lo.is_nan() || hi.is_nan() {
            return Err(IntervalError::NotANumber);
        }
        if lo > hi {
            return Err(IntervalError::Inverted { lo, hi });
        }
        if lo == f64::INFINITY || hi == f64::NEG_INFINITY {
            return Err(IntervalError::NoRealValue { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// The whole real line, `[-∞, +∞]`.
    pub fn entire() -> Self {
        Self {
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
        }
    }

    /// The degenerate interval `[value, value]`.
    pub fn singleton(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn is_singleton(&self) -> bool {
        self.lo == self.hi
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    pub fn contains_zero(&self) -> bool {
        self.contains(0.0)
    }

    /// Whether every value of `other` is also in `self`.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    pub fn add(&self, other: &Interval) -> Interval {
        Self::from_bounds(self.lo + other.lo, self.hi + other.hi)
    }

    pub fn sub(&self, other: &Interval) -> Interval {
        Self::from_bounds(self.lo - other.hi, self.hi - other.lo)
    }

    pub fn mul(&self, other: &Interval) -> Interval {
        Self::hull_of_corners([
            mul_bound(self.lo, other.lo),
            mul_bound(self.lo, other.hi),
            mul_bound(self.hi, other.lo),
            mul_bound(self.hi, other.hi),
        ])
    }

    /// Division by an interval that contains zero gives [`Interval::entire`].
    pub fn div(&self, other: &Interval) -> Interval {
        if other.contains_zero() {
            return Interval::entire();
        }
        Self::hull_of_corners([
            self.lo / other.lo,
            self.lo / other.hi,
            self.hi / other.lo,
            self.hi / other.hi,
        ])
    }

    /// Convex hull of both intervals.
    pub fn union(&self, other: &Interval) -> Interval {
        Interval {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
        }
    }

    pub fn lt(&self, other: &Interval) -> BooleanSet {
        if self.hi < other.lo {
            BooleanSet::True
        } else if self.lo >= other.hi {
            BooleanSet::False
        } else {
            BooleanSet::Unknown
        }
    }

    pub fn le(&self, other: &Interval) -> BooleanSet {
        if self.hi <= other.lo {
            BooleanSet::True
        } else if self.lo > other.hi {
            BooleanSet::False
        } else {
            BooleanSet::Unknown
        }
    }

    pub fn gt(&self, other: &Interval) -> BooleanSet {
        other.lt(self)
    }

    pub fn ge(&self, other: &Interval) -> BooleanSet {
        other.le(self)
    }

    /// Only two equal singletons are certainly equal; disjoint intervals are
    /// certainly not.
    pub fn equal(&self, other: &Interval) -> BooleanSet {
        if self.is_singleton() && other.is_singleton() && self.lo == other.lo {
            BooleanSet::True
        } else if self.hi < other.lo || other.hi < self.lo {
            BooleanSet::False
        } else {
            BooleanSet::Unknown
        }
    }

    pub fn not_equal(&self, other: &Interval) -> BooleanSet {
        !self.equal(other)
    }

    // Bounds coming out of arithmetic may overflow to the wrong infinity or
    // turn into NaN; widen instead of breaking the invariant.
    fn from_bounds(lo: f64, hi: f64) -> Interval {
        if lo.is_nan() || hi.is_nan() {
            return Interval::entire();
        }
        Interval {
            lo: if lo == f64::INFINITY { f64::MAX } else { lo },
            hi: if hi == f64::NEG_INFINITY { f64::MIN } else { hi },
        }
    }

    fn hull_of_corners(corners: [f64; 4]) -> Interval {
        if corners.iter().any(|c| c.is_nan()) {
            return Interval::entire();
        }
        let lo = corners.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = corners.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self::from_bounds(lo, hi)
    }
}

// Zero times an infinite bound is zero: the bound is a limit, not a value.
fn mul_bound(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 { 0.0 } else { a * b }
}

struct Bound(f64);

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == f64::NEG_INFINITY {
            write!(f, "-∞")
        } else if self.0 == f64::INFINITY {
            write!(f, "+∞")
        } else if self.0 == 0.0 {
            // Avoid printing `-0`.
            write!(f, "0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", Bound(self.lo), Bound(self.hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INF: f64 = f64::INFINITY;

    fn iv(lo: f64, hi: f64) -> Interval {
        Interval::new(lo, hi)
    }

    /// A few intervals with mixed signs, singletons and infinite bounds.
    fn corpus() -> Vec<Interval> {
        vec![
            iv(0.0, 0.0),
            iv(3.0, 3.0),
            iv(-2.0, 5.0),
            iv(1.0, 4.0),
            iv(-7.5, -0.5),
            iv(0.0, 10.0),
            iv(-100.0, 100.0),
            iv(2.0, INF),
            iv(-INF, -3.0),
            Interval::entire(),
        ]
    }

    /// Deterministic sample of points inside an interval, endpoints included.
    fn samples(interval: &Interval) -> Vec<f64> {
        let lo = interval.lo().max(-1e6);
        let hi = interval.hi().min(1e6);
        let steps = 8;
        (0..=steps)
            .map(|i| lo + (hi - lo) * (i as f64) / (steps as f64))
            .collect()
    }

    #[test]
    fn test_try_new_rejects_bad_bounds() {
        assert_eq!(Interval::try_new(1.0, 0.0), Err(IntervalError::Inverted { lo: 1.0, hi: 0.0 }));
        assert_eq!(Interval::try_new(f64::NAN, 0.0), Err(IntervalError::NotANumber));
        assert!(matches!(
            Interval::try_new(INF, INF),
            Err(IntervalError::NoRealValue { .. })
        ));
        assert!(matches!(
            Interval::try_new(-INF, -INF),
            Err(IntervalError::NoRealValue { .. })
        ));
        assert_eq!(Interval::try_new(-INF, INF), Ok(Interval::entire()));
    }

    #[test]
    #[should_panic(expected = "invalid interval")]
    fn test_new_panics_on_inverted_bounds() {
        Interval::new(2.0, 1.0);
    }

    #[test]
    fn test_add_is_exact_on_bounds() {
        for a in corpus() {
            for b in corpus() {
                let sum = a.add(&b);
                assert_eq!(sum.lo(), a.lo() + b.lo(), "{} + {}", a, b);
                assert_eq!(sum.hi(), a.hi() + b.hi(), "{} + {}", a, b);
            }
        }
    }

    #[test]
    fn test_sub() {
        assert_eq!(iv(1.0, 4.0).sub(&iv(-2.0, 5.0)), iv(-4.0, 6.0));
        assert_eq!(iv(2.0, INF).sub(&iv(2.0, INF)), Interval::entire());
    }

    #[test]
    fn test_mul_four_corners() {
        assert_eq!(iv(-2.0, 5.0).mul(&iv(1.0, 4.0)), iv(-8.0, 20.0));
        assert_eq!(iv(-7.5, -0.5).mul(&iv(-2.0, 5.0)), iv(-37.5, 15.0));
        assert_eq!(iv(0.0, 0.0).mul(&Interval::entire()), iv(0.0, 0.0));
        assert_eq!(iv(2.0, INF).mul(&iv(-INF, -3.0)), iv(-INF, -6.0));
    }

    #[test]
    fn test_div_by_interval_containing_zero_is_entire() {
        assert_eq!(iv(1.0, 4.0).div(&iv(-2.0, 5.0)), Interval::entire());
        assert_eq!(iv(1.0, 4.0).div(&iv(0.0, 10.0)), Interval::entire());
        assert_eq!(iv(1.0, 4.0).div(&iv(0.0, 0.0)), Interval::entire());
    }

    #[test]
    fn test_div() {
        assert_eq!(iv(1.0, 4.0).div(&iv(2.0, 4.0)), iv(0.25, 2.0));
        assert_eq!(iv(-2.0, 6.0).div(&iv(-2.0, -1.0)), iv(-6.0, 2.0));
        assert_eq!(iv(1.0, 4.0).div(&iv(2.0, INF)), iv(0.0, 2.0));
    }

    #[test]
    fn test_arithmetic_contains_concrete_results() {
        for a in corpus() {
            for b in corpus() {
                let sum = a.add(&b);
                let difference = a.sub(&b);
                let product = a.mul(&b);
                let quotient = a.div(&b);
                for x in samples(&a) {
                    for y in samples(&b) {
                        assert!(sum.contains(x + y), "{} + {} not in {}", x, y, sum);
                        assert!(difference.contains(x - y), "{} - {} not in {}", x, y, difference);
                        assert!(product.contains(x * y), "{} * {} not in {}", x, y, product);
                        if y != 0.0 {
                            assert!(
                                quotient.contains(x / y),
                                "{} / {} not in {}",
                                x,
                                y,
                                quotient
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_union_is_convex_hull() {
        assert_eq!(iv(0.0, 1.0).union(&iv(5.0, 6.0)), iv(0.0, 6.0));
        assert_eq!(iv(-INF, -3.0).union(&iv(0.0, 0.0)), iv(-INF, 0.0));
        for a in corpus() {
            assert_eq!(a.union(&a), a);
            for b in corpus() {
                let hull = a.union(&b);
                assert!(hull.encloses(&a) && hull.encloses(&b));
            }
        }
    }

    #[test]
    fn test_lt_and_gt() {
        assert_eq!(iv(0.0, 5.0).lt(&iv(6.0, 7.0)), BooleanSet::True);
        assert_eq!(iv(0.0, 5.0).lt(&iv(5.0, 7.0)), BooleanSet::Unknown);
        assert_eq!(iv(5.0, 9.0).lt(&iv(0.0, 5.0)), BooleanSet::False);
        assert_eq!(iv(0.0, 5.0).lt(&iv(0.0, 0.0)), BooleanSet::False);
        assert_eq!(iv(6.0, 7.0).gt(&iv(0.0, 5.0)), BooleanSet::True);
        assert_eq!(Interval::entire().gt(&iv(10.0, 10.0)), BooleanSet::Unknown);
    }

    #[test]
    fn test_le_and_ge() {
        assert_eq!(iv(0.0, 5.0).le(&iv(5.0, 7.0)), BooleanSet::True);
        assert_eq!(iv(0.0, 5.0).le(&iv(4.0, 7.0)), BooleanSet::Unknown);
        assert_eq!(iv(5.0, 9.0).le(&iv(0.0, 4.0)), BooleanSet::False);
        assert_eq!(iv(5.0, 9.0).ge(&iv(0.0, 5.0)), BooleanSet::True);
        assert_eq!(iv(0.0, 4.0).ge(&iv(5.0, 9.0)), BooleanSet::False);
    }

    #[test]
    fn test_eq_and_ne() {
        assert_eq!(iv(3.0, 3.0).equal(&iv(3.0, 3.0)), BooleanSet::True);
        assert_eq!(iv(3.0, 3.0).not_equal(&iv(3.0, 3.0)), BooleanSet::False);
        assert_eq!(iv(0.0, 2.0).equal(&iv(3.0, 4.0)), BooleanSet::False);
        assert_eq!(iv(0.0, 2.0).not_equal(&iv(3.0, 4.0)), BooleanSet::True);
        assert_eq!(iv(0.0, 3.0).equal(&iv(3.0, 4.0)), BooleanSet::Unknown);
        assert_eq!(iv(0.0, 3.0).equal(&iv(0.0, 3.0)), BooleanSet::Unknown);
        assert_eq!(iv(0.0, 3.0).not_equal(&iv(1.0, 1.0)), BooleanSet::Unknown);
    }

    #[test]
    fn test_comparisons_agree_with_concrete_samples() {
        type Relation = (fn(&Interval, &Interval) -> BooleanSet, fn(f64, f64) -> bool, &'static str);
        let relations: [Relation; 6] = [
            (Interval::lt, |x, y| x < y, "<"),
            (Interval::le, |x, y| x <= y, "<="),
            (Interval::gt, |x, y| x > y, ">"),
            (Interval::ge, |x, y| x >= y, ">="),
            (Interval::equal, |x, y| x == y, "=="),
            (Interval::not_equal, |x, y| x != y, "!="),
        ];
        for a in corpus() {
            for b in corpus() {
                for (abstract_op, concrete_op, symbol) in relations {
                    let result = abstract_op(&a, &b);
                    for x in samples(&a) {
                        for y in samples(&b) {
                            assert!(
                                result.possibly(concrete_op(x, y)),
                                "{} {} {} gave {} for {} and {}",
                                a,
                                symbol,
                                b,
                                result,
                                x,
                                y
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(iv(10.0, 15.0).to_string(), "[10,15]");
        assert_eq!(iv(-0.0, 2.5).to_string(), "[0,2.5]");
        assert_eq!(Interval::entire().to_string(), "[-∞,+∞]");
    }
}
