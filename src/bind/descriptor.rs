//! Field descriptors parsed from `#[bind("...")]` tags.
//!
//! The tag grammar is `name[,option]*`, where option is one of `path`,
//! `required` or `omitempty`. Unknown options are ignored so that tags can
//! grow new options without breaking older binaries.

use crate::error::ErrorKind;

/// Tag value that disables binding for a field.
pub const SKIP: &str = "-";

/// Where a field's raw value is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Location {
    /// Query-string parameter (the default).
    #[default]
    Query,
    /// Value captured from the route pattern.
    Path,
}

impl Location {
    /// Error kind reported when a field at this location fails.
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            Location::Query => ErrorKind::InvalidInput,
            Location::Path => ErrorKind::InvalidArg,
        }
    }
}

/// Underlying scalar kind of a bindable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int,
    String,
    Time,
    Url,
}

impl Kind {
    /// Cause reported when a raw value cannot be coerced into this kind.
    ///
    /// String coercion cannot fail, so `String` falls back to the generic
    /// wording and is never reported.
    pub fn invalid(&self, name: &str) -> String {
        let what = match self {
            Kind::Bool => "boolean value",
            Kind::Int => "number",
            Kind::Time => "time format",
            Kind::Url => "URL format",
            Kind::String => "value",
        };
        format!("invalid {what} for field: {name}")
    }
}

/// Static type information of a field, supplied by its Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    pub kind: Kind,
    /// `Option<_>` fields bind an empty value to `None`.
    pub is_optional: bool,
}

/// Parsed description of one bindable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub location: Location,
    pub required: bool,
    pub omit_empty: bool,
    pub kind: Kind,
    pub is_optional: bool,
}

impl FieldDescriptor {
    /// Parse a tag for a field of type `ty`.
    ///
    /// Returns `None` when the field must be ignored: an empty tag, the
    /// [`SKIP`] marker, or a tag without a name.
    pub fn parse(tag: &str, ty: FieldType) -> Option<Self> {
        if tag.is_empty() || tag == SKIP {
            return None;
        }

        let mut parts = tag.split(',');
        let name = parts.next().filter(|name| !name.is_empty())?;

        let mut descriptor = FieldDescriptor {
            name: name.to_string(),
            location: Location::Query,
            required: false,
            omit_empty: false,
            kind: ty.kind,
            is_optional: ty.is_optional,
        };

        for option in parts {
            match option {
                "path" => descriptor.location = Location::Path,
                "required" => descriptor.required = true,
                "omitempty" => descriptor.omit_empty = true,
                _ => {}
            }
        }

        Some(descriptor)
    }

    /// Error kind for failures of this field.
    pub fn error_kind(&self) -> ErrorKind {
        self.location.error_kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INT: FieldType = FieldType {
        kind: Kind::Int,
        is_optional: false,
    };

    #[test]
    fn test_parse_name_only() {
        let d = FieldDescriptor::parse("val", INT).unwrap();
        assert_eq!(d.name, "val");
        assert_eq!(d.location, Location::Query);
        assert!(!d.required);
        assert!(!d.omit_empty);
        assert_eq!(d.kind, Kind::Int);
    }

    #[test]
    fn test_parse_combined_options() {
        let d = FieldDescriptor::parse("pk,path,required", INT).unwrap();
        assert_eq!(d.name, "pk");
        assert_eq!(d.location, Location::Path);
        assert!(d.required);
        assert_eq!(d.error_kind(), ErrorKind::InvalidArg);

        let d = FieldDescriptor::parse("job_id,omitempty", INT).unwrap();
        assert!(d.omit_empty);
        assert_eq!(d.error_kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_parse_ignores_unknown_options() {
        let d = FieldDescriptor::parse("val,deprecated,required", INT).unwrap();
        assert!(d.required);
        assert_eq!(d.location, Location::Query);
    }

    #[test]
    fn test_parse_skipped_tags() {
        assert_eq!(FieldDescriptor::parse("", INT), None);
        assert_eq!(FieldDescriptor::parse("-", INT), None);
        assert_eq!(FieldDescriptor::parse(",path", INT), None);
    }

    #[test]
    fn test_parse_keeps_field_type() {
        let ty = FieldType {
            kind: Kind::Time,
            is_optional: true,
        };
        let d = FieldDescriptor::parse("since", ty).unwrap();
        assert_eq!(d.kind, Kind::Time);
        assert!(d.is_optional);
    }
}
