use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

use crate::output::ArgumentValueFormatter;
use crate::types::Value;

use super::{describe, describe_text, predicate, Constraint, ConstraintManager, Describe};

/// Types that have a `null` value.
pub trait Nullable {
    /// Returns `true` if the value is `null`.
    fn is_null_value(&self) -> bool;
}

impl<T> Nullable for Option<T> {
    fn is_null_value(&self) -> bool {
        self.is_none()
    }
}

impl Nullable for Value {
    fn is_null_value(&self) -> bool {
        self.is_null()
    }
}

macro_rules! comparison {
    ($method:ident, $trait:ident::$op:ident, $text:literal) => {
        #[doc = concat!("Argument is ", $text, " `value`.")]
        fn $method<V>(&self, value: V) -> Constraint
        where
            T: $trait<V>,
            V: Clone + Into<Value> + Send + Sync + 'static,
        {
            let shown = value.clone().into();

            self.matches_with(
                predicate(move |x: &T| Ok(x.$op(&value))),
                describe_value(self.formatter(), concat!($text, " "), shown),
            )
        }
    };
}

macro_rules! string_constraint {
    ($method:ident, str::$op:ident, $text:literal) => {
        #[doc = concat!("Argument is a ", $text, " `pattern`.")]
        fn $method<P: Into<String>>(&self, pattern: P) -> Constraint
        where
            T: AsRef<str>,
        {
            let pattern = pattern.into();
            let text = format!(concat!($text, " \"{}\""), pattern);

            self.matches_with(
                predicate(move |x: &T| Ok(x.as_ref().$op(pattern.as_str()))),
                describe_text(text),
            )
        }
    };
}

/// Commonly used constraints, available on every [`ConstraintManager`].
pub trait ConstraintManagerExt<T: 'static>: ConstraintManager<T> + Sized {
    /// Argument is ignored, every value compatible with `T` matches.
    fn ignored(&self) -> Constraint {
        self.matches_with(predicate(|_: &T| Ok(true)), describe_text("Ignored"))
    }

    fn is_null(&self) -> Constraint
    where
        T: Nullable,
    {
        self.matches_with(
            predicate(|x: &T| Ok(x.is_null_value())),
            describe_text("NULL"),
        )
    }

    fn is_not_null(&self) -> Constraint
    where
        T: Nullable,
    {
        self.matches_with(
            predicate(|x: &T| Ok(!x.is_null_value())),
            describe_text("NOT NULL"),
        )
    }

    comparison!(is_equal_to, PartialEq::eq, "equal to");
    comparison!(is_not_equal_to, PartialEq::ne, "not equal to");
    comparison!(less_than, PartialOrd::lt, "less than");
    comparison!(less_than_or_equal_to, PartialOrd::le, "less than or equal to");
    comparison!(greater_than, PartialOrd::gt, "greater than");
    comparison!(greater_than_or_equal_to, PartialOrd::ge, "greater than or equal to");

    /// Argument is contained in `range`.
    fn in_range<R, V>(&self, range: R) -> Constraint
    where
        R: RangeBounds<V> + Send + Sync + 'static,
        T: PartialOrd<V>,
        V: PartialOrd<T> + Clone + Into<Value> + Send + Sync + 'static,
    {
        let lower = match range.start_bound() {
            Bound::Unbounded => ("[", None),
            Bound::Included(x) => ("[", Some(x.clone().into())),
            Bound::Excluded(x) => ("(", Some(x.clone().into())),
        };
        let upper = match range.end_bound() {
            Bound::Unbounded => ("]", None),
            Bound::Included(x) => ("]", Some(x.clone().into())),
            Bound::Excluded(x) => (")", Some(x.clone().into())),
        };
        let formatter = self.formatter().clone();

        self.matches_with(
            predicate(move |x: &T| Ok(range.contains(x))),
            describe(move |w| {
                w.write("in range ");
                w.write(lower.0);
                match &lower.1 {
                    Some(v) => formatter.write_value(w, v)?,
                    None => w.write("_"),
                }
                w.write(", ");
                match &upper.1 {
                    Some(v) => formatter.write_value(w, v)?,
                    None => w.write("_"),
                }
                w.write(upper.0);

                Ok(())
            }),
        )
    }

    string_constraint!(starts_with, str::starts_with, "string that starts with");
    string_constraint!(ends_with, str::ends_with, "string that ends with");
    string_constraint!(contains_str, str::contains, "string that contains");

    /// Argument is an empty string.
    fn is_empty(&self) -> Constraint
    where
        T: AsRef<str>,
    {
        self.matches_with(
            predicate(|x: &T| Ok(x.as_ref().is_empty())),
            describe_text("empty string"),
        )
    }

    /// Argument is a sequence that contains `item`.
    fn contains<E>(&self, item: E) -> Constraint
    where
        T: AsRef<[E]>,
        E: PartialEq + Clone + Into<Value> + Send + Sync + 'static,
    {
        let shown = item.clone().into();

        self.matches_with(
            predicate(move |x: &T| Ok(x.as_ref().contains(&item))),
            describe_value(self.formatter(), "sequence that contains the value ", shown),
        )
    }

    /// Argument is a sequence with the same elements in the same order as `items`.
    fn is_same_sequence_as<I, E>(&self, items: I) -> Constraint
    where
        I: IntoIterator<Item = E>,
        T: AsRef<[E]>,
        E: PartialEq + Clone + Into<Value> + Send + Sync + 'static,
    {
        let items = items.into_iter().collect::<Vec<_>>();
        let shown = items.iter().cloned().map(Into::into).collect::<Vec<Value>>();
        let formatter = self.formatter().clone();

        self.matches_with(
            predicate(move |x: &T| Ok(x.as_ref() == items.as_slice())),
            describe(move |w| {
                formatter.write_list(w, &shown)?;

                Ok(())
            }),
        )
    }
}

impl<T, M> ConstraintManagerExt<T> for M
where
    T: 'static,
    M: ConstraintManager<T>,
{
}

fn describe_value(
    formatter: &Arc<ArgumentValueFormatter>,
    prefix: &'static str,
    value: Value,
) -> Describe {
    let formatter = formatter.clone();

    describe(move |w| {
        w.write(prefix);
        formatter.write_value(w, &value)?;

        Ok(())
    })
}
