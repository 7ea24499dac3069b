use crate::catalog::CatalogInput;
use proc_macro::TokenStream;
use syn::parse_macro_input;

mod catalog;

/// See `conceptgraph::catalog` for documentation.
#[proc_macro]
pub fn catalog(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as CatalogInput);
    input.compile().into()
}
