// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Result, Type};

const MAX_FIELDS: usize = 12;

struct FieldInfo<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    key: String,
    skip: bool,
}

fn parse_field(field: &syn::Field) -> Result<FieldInfo<'_>> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
    let mut key = ident.to_string();
    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("stencil") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let name: LitStr = meta.value()?.parse()?;
                key = name.value();
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `rename = \"...\"`"))
            }
        })?;
    }
    Ok(FieldInfo {
        ident,
        ty: &field.ty,
        key,
        skip,
    })
}

pub(crate) fn expand(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Describe can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "Describe requires named fields",
        ));
    };

    let fields = named
        .named
        .iter()
        .map(parse_field)
        .collect::<Result<Vec<_>>>()?;
    let retained: Vec<&FieldInfo> = fields.iter().filter(|field| !field.skip).collect();
    let skipped: Vec<&FieldInfo> = fields.iter().filter(|field| field.skip).collect();

    if retained.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "Describe requires at least one non-skipped field",
        ));
    }
    if retained.len() > MAX_FIELDS {
        return Err(syn::Error::new_spanned(
            input,
            format!("Describe supports at most {MAX_FIELDS} non-skipped fields"),
        ));
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let compound_ty = format_ident!("Compound{}", retained.len());
    let factory = format_ident!("compound{}", retained.len());

    let node_types = retained.iter().map(|field| {
        let ty = field.ty;
        quote!(stencil_core::node::LazyNode<#ty>)
    });

    let field_exprs = retained.iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let key = &field.key;
        quote! {
            stencil_core::schema::field(
                #key,
                stencil_core::node::LazyNode::new(),
                |owner: &Self| ::core::clone::Clone::clone(&owner.#ident),
            )
            .with_setter(|owner: &mut Self, value: &#ty| {
                owner.#ident = ::core::clone::Clone::clone(value);
            })
        }
    });

    let combine_params = retained.iter().map(|field| field.ident);
    let retained_inits = retained.iter().map(|field| {
        let ident = field.ident;
        quote!(#ident)
    });
    let skipped_inits = skipped.iter().map(|field| {
        let ident = field.ident;
        quote!(#ident: ::core::default::Default::default())
    });

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics stencil_core::Describe for #name #ty_generics #where_clause {
            type Node = stencil_core::node::#compound_ty<Self, #(#node_types),*>;

            fn describe() -> Self::Node {
                stencil_core::schema::#factory(
                    #(#field_exprs,)*
                    |#(#combine_params),*| Self {
                        #(#retained_inits,)*
                        #(#skipped_inits,)*
                    },
                )
            }
        }
    })
}
