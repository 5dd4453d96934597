//! Attribute parsing for `#[class(...)]`.

use syn::{Attribute, Expr, LitStr, Path};

/// Parsed `#[class(...)]` attributes on a struct.
#[derive(Debug, Default)]
pub struct ClassAttrs {
    pub base: Option<Path>,
    /// Override name (default: Rust struct name)
    pub name: Option<String>,
    pub abstract_class: bool,
    pub overridable: bool,
    pub hidden: bool,
}

/// Parsed `#[class(...)]` attributes on a field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub init: Option<Expr>,
}

impl ClassAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("class") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("base") {
                    result.base = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.name = Some(value.value());
                } else if meta.path.is_ident("abstract_class") {
                    result.abstract_class = true;
                } else if meta.path.is_ident("overridable") {
                    result.overridable = true;
                } else if meta.path.is_ident("hidden") {
                    result.hidden = true;
                } else {
                    return Err(meta.error(format!(
                        "unknown class attribute: {}",
                        meta.path.get_ident().map(|i| i.to_string()).unwrap_or_default()
                    )));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}

impl FieldAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("class") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("init") {
                    result.init = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown field attribute, expected `init = ...`"))
                }
            })?;
        }

        Ok(result)
    }
}
