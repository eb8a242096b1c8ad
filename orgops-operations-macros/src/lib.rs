//! `#[operation]` attribute macro
//!
//! Attaches verb/noun/description metadata to an operation struct by
//! generating its `orgops_operations::Operation` impl.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, DeriveInput, Ident, Lit, LitStr, Token,
};

/// Attribute macro for defining an operation
///
/// ```ignore
/// #[operation(verb = "create", noun = "lineage", description = "Create a lineage")]
/// #[derive(Debug, Serialize, Deserialize)]
/// pub struct CreateLineage {
///     pub name: String,
///     pub position_ids: Vec<PositionId>,
/// }
/// ```
///
/// Verb and noun must be single lowercase words so that `op_string()`
/// always splits back into exactly two tokens.
#[proc_macro_attribute]
pub fn operation(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as OperationArgs);
    let input = parse_macro_input!(item as DeriveInput);

    if !matches!(input.data, syn::Data::Struct(_)) {
        return syn::Error::new_spanned(&input.ident, "operation macro only supports structs")
            .to_compile_error()
            .into();
    }

    let name = &input.ident;
    let verb = args.verb.value();
    let noun = args.noun.value();
    let description = args.description.value();

    let expanded = quote! {
        #input

        impl orgops_operations::Operation for #name {
            fn verb(&self) -> &'static str {
                #verb
            }

            fn noun(&self) -> &'static str {
                #noun
            }

            fn description(&self) -> &'static str {
                #description
            }
        }
    };

    TokenStream::from(expanded)
}

struct OperationArgs {
    verb: LitStr,
    noun: LitStr,
    description: LitStr,
}

impl Parse for OperationArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut verb = None;
        let mut noun = None;
        let mut description = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value = match input.parse::<Lit>()? {
                Lit::Str(s) => s,
                other => return Err(syn::Error::new_spanned(other, "expected string literal")),
            };

            match ident.to_string().as_str() {
                "verb" => verb = Some(single_word(value)?),
                "noun" => noun = Some(single_word(value)?),
                "description" => description = Some(value),
                other => {
                    return Err(syn::Error::new_spanned(
                        ident,
                        format!("unknown attribute: {}", other),
                    ))
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(OperationArgs {
            verb: verb.ok_or_else(|| input.error("missing 'verb' attribute"))?,
            noun: noun.ok_or_else(|| input.error("missing 'noun' attribute"))?,
            description: description.ok_or_else(|| input.error("missing 'description' attribute"))?,
        })
    }
}

fn single_word(lit: LitStr) -> syn::Result<LitStr> {
    let value = lit.value();
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_');
    if valid {
        Ok(lit)
    } else {
        Err(syn::Error::new_spanned(
            lit,
            format!("'{}' must be a single lowercase word", value),
        ))
    }
}
