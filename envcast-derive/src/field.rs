use syn::{Expr, Field, Ident, LitStr, Meta, Type, ext::IdentExt};

use crate::helpers::parse_option;

pub struct FieldRepr {
    pub ident: Ident,
    pub ty: Type,
    /// Environment variable the field is read from.
    pub from: LitStr,
    /// `#[env(decoder = ...)]`
    pub decoder: Option<Expr>,
    /// `#[env(default = ...)]`
    pub default: Option<Expr>,
    pub doc_attrs: Vec<syn::Attribute>,
}

impl FieldRepr {
    pub fn parse(field: &Field) -> syn::Result<FieldRepr> {
        let ident = field.ident.clone().ok_or_else(|| {
            syn::Error::new_spanned(field, "DecodeEnv derive only supports named fields")
        })?;

        let mut has_env_attr = false;
        let mut from = None;
        let mut decoder = None;
        let mut default = None;

        for attr in &field.attrs {
            if !attr.path().is_ident("env") {
                continue;
            }
            has_env_attr = true;

            if matches!(attr.meta, Meta::Path(_)) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("from") {
                    from = Some(meta.value()?.parse::<LitStr>()?);
                } else if meta.path.is_ident("decoder") {
                    decoder = Some(meta.value()?.parse::<Expr>()?);
                } else if meta.path.is_ident("default") {
                    default = Some(meta.value()?.parse::<Expr>()?);
                } else {
                    let path = meta.path.get_ident().map(ToString::to_string);
                    return Err(meta.error(format!(
                        "unsupported env attribute: {}",
                        path.unwrap_or_default()
                    )));
                }

                Ok(())
            })?;
        }

        if !has_env_attr {
            return Err(syn::Error::new_spanned(
                field,
                "every field needs an `#[env]` attribute",
            ));
        }

        if default.is_some() && parse_option(&field.ty).is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "Optional fields cannot have a default",
            ));
        }

        let from = from.unwrap_or_else(|| {
            LitStr::new(&ident.unraw().to_string().to_uppercase(), ident.span())
        });
        let doc_attrs = field
            .attrs
            .iter()
            .filter(|attr| attr.path().is_ident("doc"))
            .cloned()
            .collect();

        Ok(FieldRepr {
            ident,
            ty: field.ty.clone(),
            from,
            decoder,
            default,
            doc_attrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn parse(field: Field) -> syn::Result<FieldRepr> {
        FieldRepr::parse(&field)
    }

    #[test]
    fn name_defaults_to_uppercase_field() {
        let field = parse(parse_quote! {
            #[env]
            database_url: String
        })
        .unwrap();

        assert_eq!(field.from.value(), "DATABASE_URL");
        assert!(field.decoder.is_none());
    }

    #[test]
    fn raw_identifiers_are_unprefixed() {
        let field = parse(parse_quote! {
            #[env]
            r#type: String
        })
        .unwrap();

        assert_eq!(field.from.value(), "TYPE");
    }

    #[test]
    fn reads_all_keys() {
        let field = parse(parse_quote! {
            #[env(from = "AGE", decoder = as_number(), default = 1)]
            age: f64
        })
        .unwrap();

        assert_eq!(field.from.value(), "AGE");
        assert!(field.decoder.is_some());
        assert!(matches!(field.default, Some(Expr::Lit(_))));
    }

    #[test]
    fn string_default_stays_a_literal() {
        let field = parse(parse_quote! {
            #[env(default = "Diablo")]
            game: String
        })
        .unwrap();

        assert!(matches!(field.default, Some(Expr::Lit(_))));
    }

    #[test]
    fn rejects_default_on_option() {
        let result = parse(parse_quote! {
            #[env(default = "x")]
            game: Option<String>
        });

        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_attribute() {
        let result = parse(parse_quote! { game: String });

        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_key() {
        let result = parse(parse_quote! {
            #[env(nested)]
            game: String
        });

        assert!(result.is_err());
    }
}
