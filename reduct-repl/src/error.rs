use ariadne::Source;
use reduct_core::{session::Failure, Session};

/// Utility enum to package errors that can occur while reading / evaluating a document.
pub enum Error {
    /// The input is not a well-formed markup document.
    Parse(reduct_error::Error),

    /// The document does not describe a valid expression.
    Build(reduct_core::Error),

    /// The evaluation of the expression failed.
    Eval(Failure),
}

impl Error {
    /// Report this error to stderr.
    ///
    /// Evaluation errors are reported against the rendering of the expression as it was when the
    /// error occurred, not against the input.
    pub fn report_to_stderr(&self, input: &str, session: &Session) {
        let result = match self {
            Self::Parse(err) => err.report_to_stderr("input", input),
            Self::Build(err) => err.kind
                .build_report("input", &[0..input.len()])
                .eprint(("input", Source::from(input))),
            Self::Eval(failure) => {
                let rendered = session.render(failure.root);
                failure.error.report_to_stderr("expression", &rendered)
            },
        };
        if let Err(err) = result {
            eprintln!("could not write the report: {}", err);
        }
    }
}

impl From<reduct_error::Error> for Error {
    fn from(err: reduct_error::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<reduct_core::Error> for Error {
    fn from(err: reduct_core::Error) -> Self {
        Self::Build(err)
    }
}

impl From<Failure> for Error {
    fn from(failure: Failure) -> Self {
        Self::Eval(failure)
    }
}
