use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta};

/// Derive macro that generates a column-oriented `*Series` struct for
/// recording one value per field and per time step. All fields in the
/// source struct must be `f64`.
///
/// The generated series struct has the same fields as `Vec<f64>`, with
/// `with_capacity`, `push`, `len`, `is_empty`, `row`, `column` and
/// `columns`. A `field_names()` associated function is added to the
/// source struct.
///
/// Use `#[trajectory(series_name = "CustomName")]` to override the default
/// series struct name (`{StructName}Series`).
#[proc_macro_derive(Trajectory, attributes(trajectory))]
pub fn derive_trajectory(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let vis = &input.vis;

    let series_name = match extract_series_name(&input) {
        Ok(custom) => custom.unwrap_or_else(|| format_ident!("{}Series", name)),
        Err(e) => return e.to_compile_error().into(),
    };

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "Trajectory can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Trajectory can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    if fields.is_empty() {
        return syn::Error::new_spanned(name, "Trajectory struct must have at least one field")
            .to_compile_error()
            .into();
    }

    let mut field_idents = Vec::new();
    for field in fields {
        if !is_f64_type(&field.ty) {
            return syn::Error::new_spanned(&field.ty, "Trajectory derive: all fields must be f64")
                .to_compile_error()
                .into();
        }
        if let Some(ident) = field.ident.as_ref() {
            field_idents.push(ident);
        }
    }

    let first_field = field_idents[0];
    let field_name_strs: Vec<String> = field_idents.iter().map(|f| f.to_string()).collect();

    let series_fields = field_idents.iter().map(|f| quote! { pub #f: Vec<f64> });
    let with_cap_fields = field_idents.iter().map(|f| quote! { #f: Vec::with_capacity(n) });
    let push_fields = field_idents.iter().map(|f| quote! { self.#f.push(r.#f); });
    let row_fields = field_idents.iter().map(|f| quote! { #f: self.#f[i] });
    let column_arms = field_idents
        .iter()
        .zip(&field_name_strs)
        .map(|(f, s)| quote! { #s => Some(self.#f.as_slice()), });
    let column_pairs = field_idents
        .iter()
        .zip(&field_name_strs)
        .map(|(f, s)| quote! { (#s, self.#f.as_slice()) });

    let expanded = quote! {
        /// Column-oriented buffer with one entry per recorded step.
        #[derive(Debug, Clone, Default, PartialEq)]
        #vis struct #series_name {
            #(#series_fields,)*
        }

        impl #series_name {
            /// Pre-allocate all columns for `n` steps.
            pub fn with_capacity(n: usize) -> Self {
                Self {
                    #(#with_cap_fields,)*
                }
            }

            /// Append one step.
            pub fn push(&mut self, r: &#name) {
                #(#push_fields)*
            }

            /// Number of recorded steps.
            pub fn len(&self) -> usize {
                self.#first_field.len()
            }

            /// Returns `true` if no step has been recorded.
            pub fn is_empty(&self) -> bool {
                self.#first_field.is_empty()
            }

            /// Step `i` as a record, if recorded.
            pub fn row(&self, i: usize) -> Option<#name> {
                if i >= self.len() {
                    return None;
                }
                Some(#name {
                    #(#row_fields,)*
                })
            }

            /// Column by field name.
            pub fn column(&self, name: &str) -> Option<&[f64]> {
                match name {
                    #(#column_arms)*
                    _ => None,
                }
            }

            /// All columns in field order.
            pub fn columns(&self) -> Vec<(&'static str, &[f64])> {
                vec![#(#column_pairs),*]
            }
        }

        impl #name {
            /// Returns the field names of this record.
            pub fn field_names() -> &'static [&'static str] {
                &[#(#field_name_strs),*]
            }
        }
    };

    expanded.into()
}

fn extract_series_name(input: &DeriveInput) -> syn::Result<Option<proc_macro2::Ident>> {
    for attr in &input.attrs {
        if !attr.path().is_ident("trajectory") {
            continue;
        }
        let nested = attr.parse_args_with(
            syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated,
        )?;
        for meta in nested {
            if let Meta::NameValue(nv) = meta {
                if nv.path.is_ident("series_name") {
                    if let syn::Expr::Lit(expr_lit) = &nv.value {
                        if let Lit::Str(lit_str) = &expr_lit.lit {
                            return Ok(Some(format_ident!("{}", lit_str.value())));
                        }
                    }
                    return Err(syn::Error::new_spanned(
                        &nv.value,
                        "series_name must be a string literal",
                    ));
                }
            }
        }
    }
    Ok(None)
}

fn is_f64_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        type_path.path.is_ident("f64")
    } else {
        false
    }
}
