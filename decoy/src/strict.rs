//! The [`strict`](self) module contains the rule of strict fakes: a strict
//! fake rejects every call that was not configured explicitly.

use crate::call::{Call, MethodKind};
use crate::error::{Error, Result};
use crate::rule::{Assignments, CallRule};

bitflags::bitflags! {
    /// Members a strict fake accepts without explicit configuration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StrictFakeOptions: u32 {
        /// Every unconfigured call is rejected.
        const NONE = 0;
        /// Allow calls to `Equals`.
        const ALLOW_EQUALS = 1;
        /// Allow calls to `GetHashCode`.
        const ALLOW_GET_HASH_CODE = 2;
        /// Allow calls to `ToString`.
        const ALLOW_TO_STRING = 4;
        /// Allow subscribing to and unsubscribing from events.
        const ALLOW_EVENTS = 8;
        /// Allow all members every object has.
        const ALLOW_OBJECT_METHODS = Self::ALLOW_EQUALS.bits()
            | Self::ALLOW_GET_HASH_CODE.bits()
            | Self::ALLOW_TO_STRING.bits();
    }
}

impl Default for StrictFakeOptions {
    fn default() -> Self {
        Self::NONE
    }
}

/// Rule that rejects calls to a strict fake.
///
/// The rule is applicable to every call, except calls to members that are
/// allowed by the [`StrictFakeOptions`]. Applying it fails with an
/// [`Error::Expectation`] naming the call.
#[derive(Default, Debug, Clone, Copy)]
pub struct StrictFakeRule {
    options: StrictFakeOptions,
}

impl StrictFakeRule {
    #[must_use]
    pub fn new(options: StrictFakeOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> StrictFakeOptions {
        self.options
    }

    fn allows(&self, kind: &MethodKind) -> bool {
        let required = match kind {
            MethodKind::Equals => StrictFakeOptions::ALLOW_EQUALS,
            MethodKind::GetHashCode => StrictFakeOptions::ALLOW_GET_HASH_CODE,
            MethodKind::ToString => StrictFakeOptions::ALLOW_TO_STRING,
            MethodKind::EventAdd(_) | MethodKind::EventRemove(_) => StrictFakeOptions::ALLOW_EVENTS,
            MethodKind::Ordinary => return false,
        };

        self.options.contains(required)
    }
}

impl CallRule for StrictFakeRule {
    fn is_applicable_to(&self, call: &Call) -> Result<bool> {
        Ok(!self.allows(call.method().kind()))
    }

    fn apply(&self, call: &Call) -> Result<Assignments> {
        let mut message = format!("Call to unconfigured method of strict fake: {call}.");

        if call.method().kind().is_event() {
            message.push_str(
                "\nIf you want to handle events on a strict fake, enable StrictFakeOptions::ALLOW_EVENTS.",
            );
        }

        tracing::debug!(%call, options = ?self.options, "strict fake rejected call");

        Err(Error::expectation(message))
    }
}
