//! Decoder configuration.

use std::fmt;
use std::str::FromStr;

/// What to do with a choice variant key that is present but carries nothing.
///
/// "Nothing" means a primitive variant with no value, no id and no
/// extensions (`"_valueString": {}`), or under [`EmptyChoicePolicy::Reject`]
/// also a complex variant with no content (`"occurrencePeriod": {}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmptyChoicePolicy {
    /// Skip an empty primitive variant as if its key were absent. An empty
    /// complex variant is kept as a present, empty value.
    #[default]
    Absent,
    /// Fail with `EmptyChoiceValue` for empty primitive and complex variants.
    Reject,
}

impl EmptyChoicePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmptyChoicePolicy::Absent => "absent",
            EmptyChoicePolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for EmptyChoicePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmptyChoicePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absent" => Ok(EmptyChoicePolicy::Absent),
            "reject" => Ok(EmptyChoicePolicy::Reject),
            other => Err(format!(
                "unknown empty choice policy '{other}' (expected 'absent' or 'reject')"
            )),
        }
    }
}

/// Options threaded through every decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub empty_choice: EmptyChoicePolicy,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_choice(mut self, policy: EmptyChoicePolicy) -> Self {
        self.empty_choice = policy;
        self
    }
}
