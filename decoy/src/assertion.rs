//! The [`assertion`](self) module checks that a call happened the expected
//! number of times and builds the report if it did not.

use crate::call::Call;
use crate::error::{Error, Result};
use crate::output::{OutputWriter, StringOutputWriter};
use crate::specification::CallSpecification;
use crate::times::TimesRange;

/// Number of calls in `calls` that match `specification`.
///
/// # Errors
/// Returns [`Error::UserCallback`] if a user supplied predicate failed.
pub fn count_matching(specification: &CallSpecification, calls: &[Call]) -> Result<usize> {
    let mut count = 0;

    for call in calls {
        if specification.matches(call)? {
            count += 1;
        }
    }

    Ok(count)
}

/// Assert that `calls` contains a number of calls matching `specification`
/// that lies within `times`.
///
/// # Errors
/// Returns [`Error::Expectation`] with a report listing all recorded calls
/// if the assertion failed, and [`Error::UserCallback`] if a user supplied
/// predicate or description failed.
pub fn must_have_happened<R>(specification: &CallSpecification, calls: &[Call], times: R) -> Result<()>
where
    R: Into<TimesRange>,
{
    let times = times.into();
    let count = count_matching(specification, calls)?;

    if times.contains(count) {
        return Ok(());
    }

    tracing::debug!(
        call = %specification.method(),
        expected = %times,
        found = count,
        "call assertion failed"
    );

    Err(Error::expectation(report(specification, calls, times, count)?))
}

/// Assert that no call in `calls` matches `specification`.
///
/// # Errors
/// See [`must_have_happened`].
pub fn must_not_have_happened(specification: &CallSpecification, calls: &[Call]) -> Result<()> {
    must_have_happened(specification, calls, TimesRange::never())
}

fn report(
    specification: &CallSpecification,
    calls: &[Call],
    times: TimesRange,
    count: usize,
) -> Result<String> {
    let formatter = specification.context().formatter();
    let mut w = StringOutputWriter::new();

    w.write_line();
    w.write_line();
    w.indent();
    w.write("Assertion failed for the following call:");
    w.write_line();

    w.indent();
    specification.write_description(&mut w)?;
    w.write_line();
    w.unindent();

    w.write(&format!("Expected to find it {times} "));

    if calls.is_empty() {
        w.write("but no calls were made to the fake object.");
        w.write_line();
    } else {
        match count {
            0 => w.write("but didn't find it among the calls:"),
            1 => w.write("but found it once among the calls:"),
            2 => w.write("but found it twice among the calls:"),
            n => w.write(&format!("but found it {n} times among the calls:")),
        }
        w.write_line();

        w.indent();
        for (i, call) in calls.iter().enumerate() {
            w.write(&format!("{}: ", i + 1));
            call.write_description(formatter, &mut w)?;
            w.write_line();
        }
        w.unindent();
    }

    w.unindent();
    w.write_line();

    Ok(w.into_string())
}
