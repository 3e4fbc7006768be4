//! FHIR primitive kinds and their wire shapes.
//!
//! Each kind knows how to read itself from the raw JSON value stored under a
//! primitive key and how to write itself back. A raw value that does not
//! match the kind's lexical rules is rejected; the codec turns that into a
//! `TypeMismatch` naming [`PrimitiveType::KIND`].

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use chrono::{DateTime as ChronoDateTime, NaiveDate, NaiveTime};
use rust_decimal::Decimal as RustDecimal;
use serde_json::{Number, Value};

/// A scalar type that can sit in the value slot of a primitive element.
pub trait PrimitiveType:
    Clone + fmt::Debug + PartialEq + Eq + Hash + Send + Sync + 'static
{
    /// FHIR type name (`dateTime`, `positiveInt`, ...).
    const KIND: &'static str;

    /// Reads the raw wire value, returning `None` when the shape is wrong.
    fn from_json(value: &Value) -> Option<Self>;

    fn to_json(&self) -> Value;
}

macro_rules! text_primitive {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Validates `value` against the lexical rules of this kind.
            pub fn parse(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                let check: fn(&str) -> bool = $check;
                if check(&value) { Some($name(value)) } else { None }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PrimitiveType for $name {
            const KIND: &'static str = $kind;

            fn from_json(value: &Value) -> Option<Self> {
                value.as_str().and_then(|s| Self::parse(s))
            }

            fn to_json(&self) -> Value {
                Value::String(self.0.clone())
            }
        }
    };
}

macro_rules! free_text {
    ($($name:ident),+) => {
        $(
            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    $name(value.to_string())
                }
            }

            impl From<String> for $name {
                fn from(value: String) -> Self {
                    $name(value)
                }
            }
        )+
    };
}

text_primitive!(
    /// `string`
    FhirString,
    "string",
    |_| true
);
text_primitive!(
    /// `markdown`
    Markdown,
    "markdown",
    |_| true
);
text_primitive!(
    /// `xhtml`, the narrative `div`. Content is kept verbatim.
    Xhtml,
    "xhtml",
    |_| true
);
text_primitive!(
    /// `uri`: any string without whitespace.
    Uri,
    "uri",
    |s| !s.chars().any(char::is_whitespace)
);
text_primitive!(
    /// `code`: tokens separated by single spaces.
    Code,
    "code",
    is_code
);
text_primitive!(
    /// `id`: 1-64 characters from `[A-Za-z0-9-.]`.
    Id,
    "id",
    is_id
);
text_primitive!(
    /// `base64Binary`. Content is not decoded, only carried.
    Base64Binary,
    "base64Binary",
    |_| true
);
text_primitive!(
    /// `date`: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    Date,
    "date",
    is_partial_date
);
text_primitive!(
    /// `dateTime`: a partial date, or a full timestamp with zone offset.
    DateTime,
    "dateTime",
    |s| is_partial_date(s) || is_full_timestamp(s)
);
text_primitive!(
    /// `instant`: a full timestamp with zone offset.
    Instant,
    "instant",
    is_full_timestamp
);
text_primitive!(
    /// `time`: `hh:mm:ss` with optional fraction.
    Time,
    "time",
    |s| s.len() >= 8 && NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok()
);

free_text!(FhirString, Markdown, Xhtml, Base64Binary);

fn is_code(s: &str) -> bool {
    !s.is_empty()
        && s
            .split(' ')
            .all(|token| !token.is_empty() && !token.chars().any(char::is_whitespace))
}

fn is_id(s: &str) -> bool {
    (1..=64).contains(&s.len())
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.chars().all(|c| c.is_ascii_digit())
}

fn is_partial_date(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    match parts.as_slice() {
        [year] => is_digits(year, 4),
        [year, month] => {
            is_digits(year, 4)
                && is_digits(month, 2)
                && month.parse::<u32>().is_ok_and(|m| (1..=12).contains(&m))
        }
        [year, _, _] => {
            is_digits(year, 4)
                && s.len() == 10
                && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        }
        _ => false,
    }
}

fn is_full_timestamp(s: &str) -> bool {
    s.contains('T') && ChronoDateTime::parse_from_rfc3339(s).is_ok()
}

/// `boolean`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Boolean(pub bool);

impl From<bool> for Boolean {
    fn from(value: bool) -> Self {
        Boolean(value)
    }
}

impl PrimitiveType for Boolean {
    const KIND: &'static str = "boolean";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool().map(Boolean)
    }

    fn to_json(&self) -> Value {
        Value::Bool(self.0)
    }
}

/// `integer`: signed 32-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Integer(pub i32);

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Integer(value)
    }
}

impl PrimitiveType for Integer {
    const KIND: &'static str = "integer";

    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Integer)
    }

    fn to_json(&self) -> Value {
        Value::from(self.0)
    }
}

/// `positiveInt`: 1 or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositiveInt(u32);

impl PositiveInt {
    pub fn new(value: u32) -> Option<Self> {
        (value >= 1).then_some(PositiveInt(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl PrimitiveType for PositiveInt {
    const KIND: &'static str = "positiveInt";

    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .and_then(PositiveInt::new)
    }

    fn to_json(&self) -> Value {
        Value::from(self.0)
    }
}

/// `unsignedInt`: 0 or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnsignedInt(pub u32);

impl From<u32> for UnsignedInt {
    fn from(value: u32) -> Self {
        UnsignedInt(value)
    }
}

impl PrimitiveType for UnsignedInt {
    const KIND: &'static str = "unsignedInt";

    fn from_json(value: &Value) -> Option<Self> {
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(UnsignedInt)
    }

    fn to_json(&self) -> Value {
        Value::from(self.0)
    }
}

/// `decimal`. The scale written on the wire is kept (`1.50` stays `1.50`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal(pub RustDecimal);

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl PrimitiveType for Decimal {
    const KIND: &'static str = "decimal";

    fn from_json(value: &Value) -> Option<Self> {
        let Value::Number(number) = value else {
            return None;
        };
        let text = number.to_string();
        RustDecimal::from_str(&text)
            .or_else(|_| RustDecimal::from_scientific(&text))
            .ok()
            .map(Decimal)
    }

    fn to_json(&self) -> Value {
        let text = self.0.to_string();
        match serde_json::from_str::<Number>(&text) {
            Ok(number) => Value::Number(number),
            Err(_) => Value::String(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_code_rules() {
        assert!(Code::parse("image/png").is_some());
        assert!(Code::parse("two words").is_some());
        assert!(Code::parse("").is_none());
        assert!(Code::parse(" leading").is_none());
        assert!(Code::parse("double  space").is_none());
        assert!(Code::parse("tab\tinside").is_none());
    }

    #[test]
    fn test_id_rules() {
        assert!(Id::parse("a1").is_some());
        assert!(Id::parse("example-1.v2").is_some());
        assert!(Id::parse("under_score").is_none());
        assert!(Id::parse("x".repeat(65)).is_none());
    }

    #[test]
    fn test_date_precision() {
        assert!(Date::parse("2020").is_some());
        assert!(Date::parse("2020-02").is_some());
        assert!(Date::parse("2020-02-29").is_some());
        assert!(Date::parse("2019-02-29").is_none());
        assert!(Date::parse("2020-13").is_none());
        assert!(Date::parse("20-01-01").is_none());
    }

    #[test]
    fn test_date_time_forms() {
        assert!(DateTime::parse("2020-01-01").is_some());
        assert!(DateTime::parse("2015-02-07T13:28:17-05:00").is_some());
        assert!(DateTime::parse("2015-02-07T13:28:17.239+02:00").is_some());
        assert!(DateTime::parse("2015-02-07T13:28:17Z").is_some());
        assert!(DateTime::parse("2015-02-07T13:28").is_none());
        assert!(Instant::parse("2015-02-07").is_none());
        assert!(Instant::parse("2015-02-07T13:28:17Z").is_some());
    }

    #[test]
    fn test_time() {
        assert!(Time::parse("09:30:00").is_some());
        assert!(Time::parse("09:30:00.125").is_some());
        assert!(Time::parse("9:30").is_none());
    }

    #[test]
    fn test_numeric_kinds() {
        assert_eq!(Integer::from_json(&json!(-4)), Some(Integer(-4)));
        assert_eq!(Integer::from_json(&json!("4")), None);
        assert_eq!(Integer::from_json(&json!(4_000_000_000u64)), None);
        assert_eq!(PositiveInt::from_json(&json!(0)), None);
        assert_eq!(PositiveInt::from_json(&json!(640)), PositiveInt::new(640));
        assert_eq!(UnsignedInt::from_json(&json!(0)), Some(UnsignedInt(0)));
        assert_eq!(UnsignedInt::from_json(&json!(-1)), None);
        assert_eq!(Boolean::from_json(&json!("true")), None);
    }

    #[test]
    fn test_decimal_keeps_scale() {
        let raw: Value = serde_json::from_str("1.50").unwrap();
        let decimal = Decimal::from_json(&raw).unwrap();
        assert_eq!(decimal.0, dec!(1.50));
        assert_eq!(decimal.to_json().to_string(), "1.50");
        assert_eq!(Decimal::from_json(&json!("1.5")), None);
    }

    #[test]
    fn test_text_round_trip() {
        let uri = Uri::from_json(&json!("http://example.org/ext")).unwrap();
        assert_eq!(uri.to_json(), json!("http://example.org/ext"));
        assert_eq!(Uri::from_json(&json!("has space")), None);
        assert_eq!(FhirString::from("x").as_str(), "x");
    }
}
