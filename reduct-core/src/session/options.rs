use crate::number::PRECISION;

/// Options controlling a [`Session`](super::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// The maximum number of reducers a single evaluation can apply before it is aborted with
    /// [`StepLimitExceeded`](crate::error::kind::StepLimitExceeded).
    ///
    /// Reducers can rewrite an expression into one that reduces back to the original, so this
    /// bounds evaluations that would never finish otherwise.
    pub max_steps: usize,

    /// How deeply references can be nested in deserialized expressions: a reference whose target
    /// contains a reference counts as two levels, and so on.
    pub max_reference_depth: usize,

    /// How deeply expressions can be nested in a deserialized document. The root is at depth 1.
    /// The limit applies to each referenced document on its own.
    pub max_nesting_depth: usize,

    /// The number of bits of precision of the floating-point numbers created while reducing.
    pub precision: u32,

    /// Whether [`Session::evaluate`](super::Session::evaluate) keeps a copy of each successful
    /// result, for `Expression.LastResult`.
    pub record_last_result: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_steps: 1 << 16,
            max_reference_depth: 8,
            max_nesting_depth: 256,
            precision: PRECISION,
            record_last_result: true,
        }
    }
}

impl SessionOptions {
    /// Wraps the given [`SessionOptions`] into a builder for further customization.
    pub fn into_builder(self) -> SessionOptionsBuilder {
        SessionOptionsBuilder(self)
    }
}

/// Helper struct to build a [`SessionOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptionsBuilder(SessionOptions);

impl SessionOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of reducers applied by a single evaluation. See
    /// [`SessionOptions::max_steps`] for more information.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.0.max_steps = max_steps;
        self
    }

    /// Sets the maximum nesting of references. See [`SessionOptions::max_reference_depth`] for
    /// more information.
    pub fn max_reference_depth(mut self, depth: usize) -> Self {
        self.0.max_reference_depth = depth;
        self
    }

    /// Sets the maximum nesting of expressions in deserialized documents. See
    /// [`SessionOptions::max_nesting_depth`] for more information.
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.0.max_nesting_depth = depth;
        self
    }

    /// Sets the precision of floating-point numbers, in bits.
    pub fn precision(mut self, precision: u32) -> Self {
        self.0.precision = precision;
        self
    }

    /// Sets whether to keep the last result of an evaluation.
    pub fn record_last_result(mut self, record: bool) -> Self {
        self.0.record_last_result = record;
        self
    }

    /// Builds the [`SessionOptions`] struct.
    pub fn build(self) -> SessionOptions {
        self.0
    }
}
