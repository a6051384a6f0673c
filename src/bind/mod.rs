//! Typed request binding.
//!
//! A target structure declares, per field, where its value comes from:
//!
//! ```text
//! #[bind("pk,path,required")]   path value `pk`, must be present
//! #[bind("job_id,omitempty")]   query parameter `job_id`, may be empty
//! #[bind("-")]                  never bound, left at Default
//! ```
//!
//! `#[derive(Bind)]` turns those tags into a descriptor table that is parsed
//! once per type and cached, and into a `bind` function that populates the
//! fields in declaration order. The first failing field aborts binding.

mod binder;
mod descriptor;
mod uri;
mod value;

pub use binder::{descriptors, parse_query, Bind, Binder, Descriptors};
pub use descriptor::{FieldDescriptor, FieldType, Kind, Location, SKIP};
pub use uri::UriRef;
pub use value::{parse_bool, BindValue, Scalar};
