mod field;
mod helpers;

use darling::{FromDeriveInput, ast::Data};
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{DeriveInput, Ident, Visibility, parse_macro_input};

use crate::field::FieldRepr;

#[proc_macro_derive(DecodeEnv, attributes(env))]
pub fn derive_decode_env(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match impl_derive(input) {
        Ok(output) => output.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn impl_derive(input: DeriveInput) -> darling::Result<TokenStream> {
    let receiver = DecodeEnvReceiver::from_derive_input(&input)?;

    let mut accumulator = darling::Error::accumulator();

    if !matches!(receiver.vis, Visibility::Public(_)) {
        accumulator.push(
            darling::Error::custom("DecodeEnv derive requires a public struct")
                .with_span(&receiver.ident.span()),
        );
    }

    let Data::Struct(fields) = receiver.data else {
        unreachable!("darling only accepts structs with named fields");
    };
    let fields: Vec<FieldRepr> = fields
        .iter()
        .filter_map(|field| accumulator.handle(FieldRepr::parse(field).map_err(Into::into)))
        .collect();

    accumulator.finish()?;

    let derive = DecodeEnvStruct {
        ident: receiver.ident,
        fields,
    };
    Ok(derive.to_token_stream())
}

#[derive(FromDeriveInput)]
#[darling(supports(struct_named))]
struct DecodeEnvReceiver {
    ident: Ident,
    vis: Visibility,
    data: Data<(), syn::Field>,
}

struct DecodeEnvStruct {
    ident: Ident,
    fields: Vec<FieldRepr>,
}

struct ConstTokens {
    private_path: TokenStream,
    builder_name: Ident,
    decoders_name: Ident,
    source_ident: Ident,
    decoders_ident: Ident,
    missing_ident: Ident,
    failures_ident: Ident,
}

impl ToTokens for DecodeEnvStruct {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let consts = ConstTokens {
            private_path: quote!(__envcast::__private),
            builder_name: format_ident!("{}Builder", self.ident),
            decoders_name: format_ident!("__{}Decoders", self.ident),
            source_ident: format_ident!("__envcast_source"),
            decoders_ident: format_ident!("__envcast_decoders"),
            missing_ident: format_ident!("__envcast_missing"),
            failures_ident: format_ident!("__envcast_failures"),
        };

        let impl_struct = self.impl_struct(&consts);
        let builder_struct = self.builder_struct(&consts);
        let decoders_struct = self.decoders_struct(&consts);
        let impl_decode_env = self.impl_decode_env(&consts);
        let impl_decode_env_builder = self.impl_decode_env_builder(&consts);
        let impl_builder = self.impl_builder(&consts);

        tokens.extend(quote! {
            const _: () = {
                extern crate envcast as __envcast;

                #impl_struct

                #builder_struct

                #decoders_struct

                #impl_decode_env

                #impl_decode_env_builder

                #impl_builder
            };
        });
    }
}

impl DecodeEnvStruct {
    fn impl_struct(&self, consts: &ConstTokens) -> TokenStream {
        let struct_name = &self.ident;
        let private_path = &consts.private_path;
        let builder_name = &consts.builder_name;

        quote! {
            impl #struct_name {
                /// Starts decoding from the environment. Values set on the
                /// builder take the place of the environment variable.
                pub fn from_env() -> #builder_name {
                    <Self as #private_path::DecodeEnv>::from_env()
                }

                /// Lists every variable as a `NAME=default` line.
                pub fn requirements() -> ::std::string::String {
                    let mut requirements = ::std::string::String::new();
                    <Self as #private_path::DecodeEnv>::requirements(&mut requirements);
                    requirements
                }
            }
        }
    }

    fn builder_struct(&self, consts: &ConstTokens) -> TokenStream {
        let builder_name = &consts.builder_name;
        let fields = self.fields.iter().map(|field| {
            let ident = &field.ident;
            let ty = &field.ty;

            quote! { #ident: ::std::option::Option<#ty> }
        });

        quote! {
            pub struct #builder_name {
                #(#fields,)*
            }
        }
    }

    /// One decoder per field, built once per decoding run.
    fn decoders_struct(&self, consts: &ConstTokens) -> TokenStream {
        let private_path = &consts.private_path;
        let decoders_name = &consts.decoders_name;

        let definitions = self.fields.iter().map(|field| {
            let ident = &field.ident;
            let ty = &field.ty;

            quote! { #ident: #private_path::Decoder<#ty> }
        });

        let inits = self.fields.iter().map(|field| {
            let ident = &field.ident;
            let ty = &field.ty;
            let decoder = match &field.decoder {
                Some(decoder) => quote! { #decoder },
                None => quote! { <#ty as #private_path::DefaultDecoder>::decoder() },
            };

            match &field.default {
                Some(default) => quote! { #ident: (#decoder).with_default(#default) },
                None => quote! { #ident: #decoder },
            }
        });

        quote! {
            struct #decoders_name {
                #(#definitions,)*
            }

            impl #decoders_name {
                fn new() -> Self {
                    Self {
                        #(#inits,)*
                    }
                }
            }
        }
    }

    fn impl_decode_env(&self, consts: &ConstTokens) -> TokenStream {
        let struct_name = &self.ident;
        let private_path = &consts.private_path;
        let builder_name = &consts.builder_name;
        let decoders_name = &consts.decoders_name;
        let decoders_ident = &consts.decoders_ident;

        let inits = self.fields.iter().map(|field| {
            let ident = &field.ident;

            quote! { #ident: ::std::option::Option::None }
        });

        let requirements = self.fields.iter().map(|field| {
            let ident = &field.ident;
            let from = &field.from;

            quote! {
                #private_path::push_requirement(requirements, #from, &#decoders_ident.#ident);
            }
        });

        quote! {
            impl #private_path::DecodeEnv for #struct_name {
                type Builder = #builder_name;

                fn from_env() -> Self::Builder {
                    #builder_name {
                        #(#inits,)*
                    }
                }

                fn requirements(requirements: &mut ::std::string::String) {
                    let #decoders_ident = #decoders_name::new();
                    #(#requirements)*
                }
            }
        }
    }

    fn impl_decode_env_builder(&self, consts: &ConstTokens) -> TokenStream {
        let struct_name = &self.ident;
        let struct_name_str = struct_name.to_string();
        let field_count = self.fields.len();
        let private_path = &consts.private_path;
        let builder_name = &consts.builder_name;
        let decoders_name = &consts.decoders_name;
        let source_ident = &consts.source_ident;
        let decoders_ident = &consts.decoders_ident;
        let missing_ident = &consts.missing_ident;
        let failures_ident = &consts.failures_ident;

        // Every variable is read exactly once, before any decoder runs.
        let lookups = self.fields.iter().map(|field| {
            let ident = &field.ident;
            let local = local_ident(ident);
            let from = &field.from;

            quote! {
                let #local = match self.#ident {
                    ::std::option::Option::Some(value) => #private_path::Field::Set(value),
                    ::std::option::Option::None => #private_path::Field::Raw(
                        #missing_ident.lookup(#source_ident, #from, &#decoders_ident.#ident),
                    ),
                };
            }
        });

        let decodes = self.fields.iter().map(|field| {
            let ident = &field.ident;
            let local = local_ident(ident);
            let from = &field.from;

            quote! {
                let #local = match #local {
                    #private_path::Field::Set(value) => ::std::option::Option::Some(value),
                    #private_path::Field::Raw(raw) => {
                        #failures_ident.decode(#from, &#decoders_ident.#ident, raw.as_deref())
                    }
                };
            }
        });

        let returns = self.fields.iter().map(|field| {
            let ident = &field.ident;
            let local = local_ident(ident);

            quote! {
                #ident: match #local {
                    ::std::option::Option::Some(value) => value,
                    ::std::option::Option::None => {
                        return ::std::result::Result::Err(#failures_ident.into_error());
                    }
                }
            }
        });

        quote! {
            impl #private_path::DecodeEnvBuilder for #builder_name {
                type Target = #struct_name;

                #[allow(unused_mut, unused_variables)]
                fn finalize_from<S: #private_path::Source + ?Sized>(
                    self,
                    #source_ident: &S,
                ) -> ::std::result::Result<Self::Target, #private_path::EnvironmentError> {
                    let _span = #private_path::decode_span(#struct_name_str, #field_count);
                    let #decoders_ident = #decoders_name::new();

                    let mut #missing_ident = #private_path::MissingVariables::new();
                    #(#lookups)*
                    #missing_ident.finish()?;

                    let mut #failures_ident = #private_path::DecodeFailures::new();
                    #(#decodes)*

                    ::std::result::Result::Ok(#struct_name {
                        #(#returns,)*
                    })
                }
            }
        }
    }

    fn impl_builder(&self, consts: &ConstTokens) -> TokenStream {
        let private_path = &consts.private_path;
        let builder_name = &consts.builder_name;

        let setters = self.fields.iter().map(|field| {
            let ident = &field.ident;
            let ty = &field.ty;
            let doc_attrs = &field.doc_attrs;

            quote! {
                #(#doc_attrs)*
                pub fn #ident(mut self, #ident: #ty) -> Self {
                    self.#ident = ::std::option::Option::Some(#ident);
                    self
                }
            }
        });

        quote! {
            impl #builder_name {
                #(#setters)*

                /// Decodes the remaining fields from the process environment.
                pub fn finalize(
                    self,
                ) -> ::std::result::Result<
                    <Self as #private_path::DecodeEnvBuilder>::Target,
                    #private_path::EnvironmentError,
                > {
                    #private_path::DecodeEnvBuilder::finalize_from(self, &#private_path::ProcessEnv)
                }

                /// Decodes the remaining fields from `source`.
                pub fn finalize_from<S: #private_path::Source + ?Sized>(
                    self,
                    source: &S,
                ) -> ::std::result::Result<
                    <Self as #private_path::DecodeEnvBuilder>::Target,
                    #private_path::EnvironmentError,
                > {
                    #private_path::DecodeEnvBuilder::finalize_from(self, source)
                }
            }
        }
    }
}

fn local_ident(field: &Ident) -> Ident {
    use syn::ext::IdentExt;

    format_ident!("__envcast_field_{}", field.unraw())
}
