//! Implementation of the `#[derive(ExtensionClass)]` macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Type, parse_macro_input};

use crate::attrs::{ClassAttrs, FieldAttrs};

pub fn derive_extension_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_extension_inner(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_extension_inner(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let attrs = ClassAttrs::from_attrs(&input.attrs)?;

    let Some(base) = attrs.base.as_ref() else {
        return Err(syn::Error::new_spanned(
            name,
            "missing `#[class(base = ...)]` naming the engine class to extend",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "extension classes cannot be generic",
        ));
    }

    let class_name = attrs.name.clone().unwrap_or_else(|| name.to_string());
    let flags = generate_flags(&attrs);
    let init_body = generate_init(input)?;

    Ok(quote! {
        impl ::gdbind::ExtensionClass for #name {
            const CLASS_NAME: &'static str = #class_name;
            const FLAGS: ::gdbind::ClassFlags = #flags;
            type Base = #base;

            fn init(base: ::gdbind::Base<Self::Base>) -> Self {
                #init_body
            }

            fn virtual_lookup(name: &str) -> ::core::option::Option<::gdbind::VirtualThunk> {
                <#base as ::gdbind::HasVirtuals<Self>>::virtual_by_name(name)
            }
        }
    })
}

fn generate_flags(attrs: &ClassAttrs) -> TokenStream2 {
    let mut flags = Vec::new();
    if !attrs.hidden {
        flags.push(quote! { ::gdbind::ClassFlags::EXPOSED });
    }
    if attrs.abstract_class {
        flags.push(quote! { ::gdbind::ClassFlags::ABSTRACT });
    }
    if attrs.overridable {
        flags.push(quote! { ::gdbind::ClassFlags::VIRTUAL });
    }
    if flags.is_empty() {
        return quote! { ::gdbind::ClassFlags::empty() };
    }
    quote! { ::gdbind::ClassFlags::empty() #(.union(#flags))* }
}

/// Whether a field holds the `Base<..>` handle.
fn is_base_field(field: &Field) -> bool {
    match &field.ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Base"),
        _ => false,
    }
}

fn generate_init(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ExtensionClass can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ExtensionClass needs a struct with named fields, one of type `Base<..>`",
        ));
    };

    let mut base_seen = false;
    let mut inits = Vec::new();
    for field in &fields.named {
        let ident = &field.ident;
        if is_base_field(field) {
            if base_seen {
                return Err(syn::Error::new_spanned(field, "only one `Base<..>` field is allowed"));
            }
            base_seen = true;
            inits.push(quote! { #ident: base });
            continue;
        }
        let field_attrs = FieldAttrs::from_attrs(&field.attrs)?;
        let value = match field_attrs.init {
            Some(expr) => quote! { #expr },
            None => quote! { ::core::default::Default::default() },
        };
        inits.push(quote! { #ident: #value });
    }

    if !base_seen {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "missing a field of type `Base<..>`",
        ));
    }

    Ok(quote! {
        Self { #(#inits),* }
    })
}
