use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta};

/// Derive a columnar `*Timeseries` companion for a per-step flux record.
///
/// Every field of the record must be `f64`. The generated struct holds one
/// `Vec<f64>` per field and provides `with_capacity`, `push`, `len`,
/// `is_empty`, `column` (lookup by field name) and `last` (the most recent
/// record rebuilt from the columns). The record itself gains a
/// `field_names()` associated function listing its columns in declaration
/// order.
///
/// `#[fluxes(timeseries_name = "Name")]` overrides the default
/// `{Record}Timeseries` name.
#[proc_macro_derive(Fluxes, attributes(fluxes))]
pub fn derive_fluxes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let record = &input.ident;
    let series = timeseries_name(input)?.unwrap_or_else(|| format_ident!("{}Timeseries", record));

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    record,
                    "Fluxes requires a struct with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(record, "Fluxes can only be derived for structs")),
    };

    let mut idents = Vec::with_capacity(fields.len());
    for field in fields {
        if !is_f64(&field.ty) {
            return Err(syn::Error::new_spanned(&field.ty, "Fluxes fields must all be f64"));
        }
        // Named fields always carry an ident.
        if let Some(ident) = &field.ident {
            idents.push(ident);
        }
    }
    let Some(first) = idents.first() else {
        return Err(syn::Error::new_spanned(record, "Fluxes record must have at least one field"));
    };

    let names: Vec<String> = idents.iter().map(|i| i.to_string()).collect();

    Ok(quote! {
        /// Columnar storage of per-step flux records.
        #[derive(Debug, Clone, Default)]
        pub struct #series {
            #(pub #idents: Vec<f64>,)*
        }

        impl #series {
            /// Pre-allocate every column for `n` steps.
            pub fn with_capacity(n: usize) -> Self {
                Self {
                    #(#idents: Vec::with_capacity(n),)*
                }
            }

            /// Append one step.
            pub fn push(&mut self, f: &#record) {
                #(self.#idents.push(f.#idents);)*
            }

            /// Number of stored steps.
            pub fn len(&self) -> usize {
                self.#first.len()
            }

            pub fn is_empty(&self) -> bool {
                self.#first.is_empty()
            }

            /// Column for a field name, or `None` if the record has no such field.
            pub fn column(&self, name: &str) -> Option<&[f64]> {
                match name {
                    #(#names => Some(self.#idents.as_slice()),)*
                    _ => None,
                }
            }

            /// The most recently pushed record.
            pub fn last(&self) -> Option<#record> {
                Some(#record {
                    #(#idents: *self.#idents.last()?,)*
                })
            }
        }

        impl #record {
            /// Field names in declaration order.
            pub fn field_names() -> &'static [&'static str] {
                &[#(#names),*]
            }
        }
    })
}

fn timeseries_name(input: &DeriveInput) -> syn::Result<Option<proc_macro2::Ident>> {
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("fluxes")) {
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;
        for meta in nested {
            let Meta::NameValue(nv) = meta else { continue };
            if !nv.path.is_ident("timeseries_name") {
                return Err(syn::Error::new_spanned(nv.path, "unknown fluxes attribute"));
            }
            if let syn::Expr::Lit(syn::ExprLit { lit: Lit::Str(s), .. }) = &nv.value {
                return Ok(Some(format_ident!("{}", s.value())));
            }
            return Err(syn::Error::new_spanned(nv.value, "timeseries_name must be a string"));
        }
    }
    Ok(None)
}

fn is_f64(ty: &syn::Type) -> bool {
    matches!(ty, syn::Type::Path(p) if p.qself.is_none() && p.path.is_ident("f64"))
}
