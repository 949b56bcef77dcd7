use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::{spanned::Spanned, Data, DeriveInput, Expr, Fields, Ident, Result};

/// The tags given in the `#[error(...)]` attribute.
#[derive(Debug, Default)]
struct Tags {
    message: Option<Expr>,
    labels: Option<Expr>,
    help: Option<Expr>,
}

impl Tags {
    /// Reads the tags of the first `#[error(...)]` attribute.
    fn from_attrs(input: &DeriveInput) -> Result<Self> {
        let mut tags = Tags::default();
        let Some(attr) = input.attrs.iter().find(|attr| attr.path().is_ident("error")) else {
            return Err(syn::Error::new_spanned(&input.ident, "missing `error` attribute"));
        };

        attr.parse_nested_meta(|meta| {
            let slot = if meta.path.is_ident("message") {
                &mut tags.message
            } else if meta.path.is_ident("labels") {
                &mut tags.labels
            } else if meta.path.is_ident("help") {
                &mut tags.help
            } else {
                return Err(meta.error("expected `message`, `labels` or `help`"));
            };

            if slot.is_some() {
                return Err(meta.error("tag given more than once"));
            }
            *slot = Some(meta.value()?.parse()?);
            Ok(())
        })?;

        if tags.message.is_none() {
            return Err(syn::Error::new_spanned(attr, "missing `message` tag in `error` attribute"));
        }
        Ok(tags)
    }
}

/// A struct deriving `ErrorKind`.
pub struct Target {
    name: Ident,
    bindings: TokenStream2,
    tags: Tags,
}

impl Target {
    pub fn new(input: DeriveInput) -> Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new(input.span(), "`ErrorKind` can only be derived for structs"));
        };
        let bindings = field_bindings(&input.ident, &data.fields);
        let tags = Tags::from_attrs(&input)?;
        Ok(Self { name: input.ident, bindings, tags })
    }

    /// Generates the implementation of `ErrorKind`.
    pub fn expand(&self) -> TokenStream2 {
        let Self { name, bindings, tags } = self;
        let message = &tags.message;
        let labels = match &tags.labels {
            Some(labels) => quote! { #labels },
            None => quote! { std::iter::empty::<String>() },
        };
        let help = tags.help.as_ref().map(|help| quote! { report.set_help(#help); });

        quote! {
            impl ErrorKind for #name {
                fn as_any(&self) -> &dyn std::any::Any {
                    self
                }

                fn message(&self) -> String {
                    #bindings
                    (#message).to_string()
                }

                fn build_report<'a>(
                    &self,
                    src_id: &'a str,
                    spans: &[std::ops::Range<usize>],
                ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                    #bindings

                    let labels = #labels
                        .into_iter()
                        .zip(spans)
                        .map(|(text, span)| {
                            let text = text.to_string();
                            let label = ariadne::Label::new((src_id, span.clone()))
                                .with_color(reduct_error::EXPR);
                            if text.is_empty() { label } else { label.with_message(text) }
                        })
                        .collect::<Vec<_>>();

                    let offset = spans.first().map_or(0, |span| span.start);
                    #[allow(unused_mut)]
                    let mut report = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                        .with_message(self.message())
                        .with_labels(labels);
                    #help
                    report.finish()
                }
            }
        }
    }
}

/// Binds the named fields of the struct, so the tags can refer to them directly.
fn field_bindings(name: &Ident, fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(named) => {
            let names = named.named.iter().map(|field| &field.ident);
            quote! {
                #[allow(unused_variables)]
                let #name { #(#names),* } = self;
            }
        },
        Fields::Unnamed(_) => {
            quote_spanned! { name.span() => compile_error!("`ErrorKind` cannot be derived for tuple structs"); }
        },
        Fields::Unit => TokenStream2::new(),
    }
}
