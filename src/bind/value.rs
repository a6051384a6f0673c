//! Coercion of raw request strings into typed field values.
//!
//! The set of supported types is closed: [`Scalar`] is sealed, and a field
//! whose type does not implement [`BindValue`] is rejected when the
//! `Bind` derive is expanded.

use super::descriptor::{FieldType, Kind};
use super::uri::UriRef;
use chrono::{DateTime, FixedOffset, Utc};

mod sealed {
    pub trait Sealed {}
}

/// A scalar type that a raw string can be coerced into.
pub trait Scalar: sealed::Sealed + Sized {
    const KIND: Kind;

    /// Value used when the raw string is empty.
    fn zero() -> Self;

    /// Coerce a non-empty raw string, `None` if it is malformed.
    fn parse(raw: &str) -> Option<Self>;
}

/// A field type the binder can populate.
///
/// Implemented for every [`Scalar`] and for `Option` of every scalar.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be bound from a request",
    label = "unsupported field type",
    note = "bindable types are String, bool, i16, i32, i64, isize, DateTime<FixedOffset>, DateTime<Utc>, UriRef and Option of any of them"
)]
pub trait BindValue: Sized {
    const FIELD_TYPE: FieldType;

    /// Value of a field that is left unset.
    fn zero() -> Self;

    /// Coerce a raw string, `None` if it is malformed.
    fn coerce(raw: &str) -> Option<Self>;
}

/// Permissive boolean literals: `1`, `t`, `true`, `0`, `f`, `false`, any case.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

impl sealed::Sealed for String {}

impl Scalar for String {
    const KIND: Kind = Kind::String;

    fn zero() -> Self {
        String::new()
    }

    fn parse(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl sealed::Sealed for bool {}

impl Scalar for bool {
    const KIND: Kind = Kind::Bool;

    fn zero() -> Self {
        false
    }

    fn parse(raw: &str) -> Option<Self> {
        parse_bool(raw)
    }
}

macro_rules! int_scalar {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Scalar for $ty {
                const KIND: Kind = Kind::Int;

                fn zero() -> Self {
                    0
                }

                fn parse(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
}

int_scalar!(i16, i32, i64, isize);

impl sealed::Sealed for DateTime<FixedOffset> {}

impl Scalar for DateTime<FixedOffset> {
    const KIND: Kind = Kind::Time;

    fn zero() -> Self {
        DateTime::default()
    }

    fn parse(raw: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(raw).ok()
    }
}

impl sealed::Sealed for DateTime<Utc> {}

impl Scalar for DateTime<Utc> {
    const KIND: Kind = Kind::Time;

    fn zero() -> Self {
        DateTime::default()
    }

    fn parse(raw: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

impl sealed::Sealed for UriRef {}

impl Scalar for UriRef {
    const KIND: Kind = Kind::Url;

    fn zero() -> Self {
        UriRef::default()
    }

    fn parse(raw: &str) -> Option<Self> {
        UriRef::parse(raw)
    }
}

macro_rules! scalar_field {
    ($($ty:ty),*) => {
        $(
            impl BindValue for $ty {
                const FIELD_TYPE: FieldType = FieldType {
                    kind: <$ty as Scalar>::KIND,
                    is_optional: false,
                };

                fn zero() -> Self {
                    <$ty as Scalar>::zero()
                }

                fn coerce(raw: &str) -> Option<Self> {
                    if raw.is_empty() {
                        return Some(<$ty as Scalar>::zero());
                    }
                    <$ty as Scalar>::parse(raw)
                }
            }
        )*
    };
}

scalar_field!(
    String,
    bool,
    i16,
    i32,
    i64,
    isize,
    DateTime<FixedOffset>,
    DateTime<Utc>,
    UriRef
);

impl<T: Scalar> BindValue for Option<T> {
    const FIELD_TYPE: FieldType = FieldType {
        kind: T::KIND,
        is_optional: true,
    };

    fn zero() -> Self {
        None
    }

    fn coerce(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return Some(None);
        }
        T::parse(raw).map(Some)
    }
}
