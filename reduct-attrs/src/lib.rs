mod error_kind;

use error_kind::Target;
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the [`ErrorKind`] trait for the given struct.
///
/// Only structs are supported. Tuple structs are rejected.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```
/// use reduct_attrs::ErrorKind;
/// use reduct_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "expression must be a list", labels = ["this expression"])]
/// pub struct ExpectedList;
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                  |
/// | ----------- | ---------------------------------------------------------------------------- |
/// | `message`   | The message displayed at the top of the error when it is displayed.          |
/// | `labels`    | The texts of the labels that point to each span of the error, in order.      |
/// | `help`      | Optional help text for the error, describing what the user can do to fix it. |
///
/// Each tag accepts an expression that should evaluate to a [`String`] (or an array of them, for
/// `labels`). The expressions are evaluated with `self` in scope, and for structs with named
/// fields, the fields themselves are also in scope (tuple structs are not supported).
///
/// Labels that have no matching span are skipped, so an error can be reported even when the
/// offending region could not be located.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match Target::new(input) {
        Ok(target) => target.expand().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
