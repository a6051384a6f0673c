//! Populates typed structures from a request's path values and query string.

use super::descriptor::{FieldDescriptor, FieldType, Location};
use super::value::BindValue;
use crate::error::Error;
use crate::http::Request;
use std::collections::HashMap;

/// A structure that can be populated from a [`Request`].
///
/// Normally derived with `#[derive(Bind)]`:
///
/// ```rust
/// use plumb::Bind;
///
/// #[derive(Bind)]
/// struct JobArgs {
///     #[bind("pk,path,required")]
///     pk: i64,
///     #[bind("job_id,omitempty")]
///     job_id: Option<String>,
/// }
/// ```
pub trait Bind: Sized {
    /// Bind every tagged field in declaration order, stopping at the first
    /// field that fails.
    fn bind(req: &Request) -> Result<Self, Error>;
}

/// Descriptor table of one target type, indexed by bound-field position.
///
/// `None` entries are fields whose tag parses to no descriptor; they are
/// left at their zero value.
pub type Descriptors = Vec<Option<FieldDescriptor>>;

/// Parse the descriptor table for a target type.
pub fn descriptors(tags: &[(&str, FieldType)]) -> Descriptors {
    tags.iter()
        .map(|(tag, ty)| FieldDescriptor::parse(tag, *ty))
        .collect()
}

/// Per-request binding state: raw value sources and the descriptor table.
pub struct Binder<'a> {
    req: &'a Request,
    query: HashMap<String, String>,
    descriptors: &'a [Option<FieldDescriptor>],
}

impl<'a> Binder<'a> {
    /// Create a binder over `req`, parsing its query string once.
    pub fn new(req: &'a Request, descriptors: &'a [Option<FieldDescriptor>]) -> Self {
        Self {
            req,
            query: parse_query(req.query.as_deref().unwrap_or("")),
            descriptors,
        }
    }

    /// Raw value for a descriptor; absence reads as the empty string.
    pub fn raw_value(&self, descriptor: &FieldDescriptor) -> &str {
        match descriptor.location {
            Location::Path => self.req.path_value(&descriptor.name),
            Location::Query => self
                .query
                .get(&descriptor.name)
                .map(String::as_str)
                .unwrap_or(""),
        }
    }

    /// Bind the field at `index` in the descriptor table.
    pub fn field<T: BindValue>(&self, index: usize) -> Result<T, Error> {
        let Some(descriptor) = self.descriptors.get(index).and_then(Option::as_ref) else {
            return Ok(T::zero());
        };

        let raw = self.raw_value(descriptor);

        if raw.is_empty() {
            if descriptor.required {
                return Err(Error::new(
                    descriptor.error_kind(),
                    format!("missing required field: {}", descriptor.name),
                ));
            }

            if descriptor.omit_empty {
                return Ok(T::zero());
            }
        }

        T::coerce(raw).ok_or_else(|| {
            Error::new(descriptor.error_kind(), descriptor.kind.invalid(&descriptor.name))
        })
    }
}

/// Parse a query string; the first occurrence of a repeated key wins.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}
