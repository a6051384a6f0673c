//! Procedural macros for the plumb request binder.
//!
//! This crate provides `#[derive(Bind)]`, which implements `plumb::Bind` for
//! a struct with named fields.
//!
//! # Example
//!
//! ```ignore
//! use plumb::Bind;
//!
//! #[derive(Bind)]
//! struct ListJobs {
//!     #[bind("owner,path,required")]
//!     owner: String,
//!     #[bind("page")]
//!     page: i32,
//!     #[bind("since,omitempty")]
//!     since: Option<chrono::DateTime<chrono::Utc>>,
//!     // Not bound, left at Default.
//!     cursor: Option<String>,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, LitStr};

/// Tag that disables binding for a field.
const SKIP: &str = "-";

/// A field of the target struct and its optional bind tag.
struct BindField<'a> {
    field: &'a Field,
    tag: Option<LitStr>,
}

impl<'a> BindField<'a> {
    fn parse(field: &'a Field) -> syn::Result<Self> {
        let mut tag: Option<LitStr> = None;

        for attr in &field.attrs {
            if !attr.path().is_ident("bind") {
                continue;
            }

            if tag.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate bind attribute"));
            }

            let lit: LitStr = attr.parse_args().map_err(|_| {
                syn::Error::new_spanned(
                    attr,
                    "expected #[bind(\"name[,path][,required][,omitempty]\")]",
                )
            })?;

            let value = lit.value();
            if value != SKIP && value.split(',').next().unwrap_or_default().is_empty() {
                return Err(syn::Error::new_spanned(&lit, "bind tag must start with a name"));
            }

            tag = Some(lit);
        }

        // A skipped field behaves exactly like an untagged one.
        let tag = tag.filter(|lit| lit.value() != SKIP);

        Ok(Self { field, tag })
    }
}

/// Derive `plumb::Bind` for a struct.
///
/// Each field tagged with `#[bind("...")]` is populated from the request's
/// path values (`path` option) or query string (default), in declaration
/// order. Untagged fields and fields tagged `#[bind("-")]` are initialised
/// with `Default::default()`.
///
/// Bound fields must have a bindable type: `String`, `bool`, `i16`, `i32`,
/// `i64`, `isize`, `DateTime<FixedOffset>`, `DateTime<Utc>`, `UriRef`, or an
/// `Option` of one of those.
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_bind(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_bind(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Bind can only be derived for structs",
            ))
        }
    };

    let named = match fields {
        Fields::Named(named) => &named.named,
        Fields::Unit => {
            return Ok(quote! {
                impl #impl_generics ::plumb::bind::Bind for #name #ty_generics #where_clause {
                    fn bind(
                        _req: &::plumb::http::Request,
                    ) -> ::core::result::Result<Self, ::plumb::Error> {
                        ::core::result::Result::Ok(Self)
                    }
                }
            });
        }
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                fields,
                "Bind requires named fields",
            ))
        }
    };

    let mut tags = Vec::new();
    let mut inits = Vec::new();

    for field in named {
        let field = BindField::parse(field)?;
        let ident = &field.field.ident;
        let ty = &field.field.ty;

        match field.tag {
            Some(tag) => {
                let index = tags.len();
                tags.push(quote! {
                    (#tag, <#ty as ::plumb::bind::BindValue>::FIELD_TYPE)
                });
                inits.push(quote! {
                    #ident: binder.field::<#ty>(#index)?
                });
            }
            None => inits.push(quote! {
                #ident: ::core::default::Default::default()
            }),
        }
    }

    if tags.is_empty() {
        return Ok(quote! {
            impl #impl_generics ::plumb::bind::Bind for #name #ty_generics #where_clause {
                fn bind(
                    _req: &::plumb::http::Request,
                ) -> ::core::result::Result<Self, ::plumb::Error> {
                    ::core::result::Result::Ok(Self { #(#inits),* })
                }
            }
        });
    }

    // Field types of a generic struct may depend on its parameters, so the
    // table can only be cached for non-generic targets.
    let descriptors = if input.generics.type_params().next().is_some() {
        quote! {
            let descriptors = &::plumb::bind::descriptors(&[#(#tags),*]);
        }
    } else {
        quote! {
            static DESCRIPTORS: ::std::sync::OnceLock<::plumb::bind::Descriptors> =
                ::std::sync::OnceLock::new();
            let descriptors = DESCRIPTORS.get_or_init(|| ::plumb::bind::descriptors(&[#(#tags),*]));
        }
    };

    Ok(quote! {
        impl #impl_generics ::plumb::bind::Bind for #name #ty_generics #where_clause {
            fn bind(
                req: &::plumb::http::Request,
            ) -> ::core::result::Result<Self, ::plumb::Error> {
                #descriptors
                let binder = ::plumb::bind::Binder::new(req, descriptors);

                ::core::result::Result::Ok(Self { #(#inits),* })
            }
        }
    })
}
