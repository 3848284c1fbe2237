use syn::{GenericArgument, PathArguments, Type};

/// Returns `T` when `ty` is spelled `Option<T>`.
pub fn parse_option(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };

    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }

    let PathArguments::AngleBracketed(generic_args) = &segment.arguments else {
        return None;
    };

    match generic_args.args.first() {
        Some(GenericArgument::Type(inner_type)) if generic_args.args.len() == 1 => Some(inner_type),
        _ => None,
    }
}
