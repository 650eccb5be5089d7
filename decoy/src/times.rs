//! The [`times`](self) module contains the types that define how often a
//! call is expected to happen, or how often a rule may be applied.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::{
    Bound, Range, RangeBounds, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Keeps track of how often a rule was applied.
#[derive(Default, Debug)]
pub struct Times {
    /// Number of times the rule was already applied.
    pub count: AtomicUsize,

    /// Allowed number of applications.
    pub range: TimesRange,
}

impl Times {
    /// Create a new [`Times`] instance from the passed `range`.
    pub fn new<R: Into<TimesRange>>(range: R) -> Self {
        Self {
            count: AtomicUsize::default(),
            range: range.into(),
        }
    }

    /// Increment the current count and return the previous one.
    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::Relaxed)
    }

    /// Current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Return `true` if upper bound of the range is reached.
    pub fn is_done(&self) -> bool {
        match &self.range.upper {
            Bound::Unbounded => false,
            Bound::Included(x) => self.count() >= *x,
            Bound::Excluded(x) => self.count() + 1 >= *x,
        }
    }
}

/// Range of expected calls with a lower and an upper limit.
///
/// Similar to [`RangeBounds`] from the standard library but as struct instead
/// of trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimesRange {
    lower: Bound<usize>,
    upper: Bound<usize>,
}

impl TimesRange {
    /// At least once. Default expectation of call assertions.
    #[must_use]
    pub fn once_or_more() -> Self {
        Self::from(1..)
    }

    #[must_use]
    pub fn never() -> Self {
        Self::from(0)
    }

    /// Returns `true` if `count` lies within this range.
    #[must_use]
    pub fn contains(&self, count: usize) -> bool {
        (self.lower, self.upper).contains(&count)
    }

    /// Inclusive upper limit, `None` if the range is unbounded.
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        match self.inclusive() {
            Some((_, upper)) => upper,
            None => Some(0),
        }
    }

    /// Inclusive bounds of the range, `None` if the range is empty.
    fn inclusive(&self) -> Option<(usize, Option<usize>)> {
        let lower = match self.lower {
            Bound::Unbounded => 0,
            Bound::Included(x) => x,
            Bound::Excluded(x) => x.checked_add(1)?,
        };
        let upper = match self.upper {
            Bound::Unbounded => None,
            Bound::Included(x) => Some(x),
            Bound::Excluded(x) => Some(x.checked_sub(1)?),
        };

        match upper {
            Some(upper) if upper < lower => None,
            upper => Some((lower, upper)),
        }
    }
}

impl Default for TimesRange {
    fn default() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }
}

impl Display for TimesRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.inclusive() {
            None | Some((0, Some(0))) => write!(f, "never"),
            Some((1, Some(1))) => write!(f, "exactly once"),
            Some((lower, Some(upper))) if lower == upper => write!(f, "exactly {lower} times"),
            Some((0, None)) => write!(f, "any number of times"),
            Some((1, None)) => write!(f, "once or more"),
            Some((lower, None)) => write!(f, "at least {lower} times"),
            Some((0, Some(1))) => write!(f, "no more than once"),
            Some((0, Some(upper))) => write!(f, "no more than {upper} times"),
            Some((lower, Some(upper))) => write!(f, "between {lower} and {upper} times"),
        }
    }
}

impl From<usize> for TimesRange {
    fn from(value: usize) -> Self {
        Self {
            lower: Bound::Included(value),
            upper: Bound::Included(value),
        }
    }
}

macro_rules! impl_from_range_bounds {
    ($x:ty) => {
        impl From<$x> for TimesRange {
            fn from(value: $x) -> Self {
                Self {
                    lower: value.start_bound().cloned(),
                    upper: value.end_bound().cloned(),
                }
            }
        }
    };
}

impl_from_range_bounds!(Range<usize>);
impl_from_range_bounds!(RangeFrom<usize>);
impl_from_range_bounds!(RangeFull);
impl_from_range_bounds!(RangeInclusive<usize>);
impl_from_range_bounds!(RangeTo<usize>);
impl_from_range_bounds!(RangeToInclusive<usize>);
