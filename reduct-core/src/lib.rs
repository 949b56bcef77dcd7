//! Expression trees, and the asynchronous core that reduces them.
//!
//! An expression is a tree of tagged nodes. The [`kind`] of a node, looked up by tag in a
//! [`Registry`], decides how many children it can have and which attributes it carries. A
//! [`Session`] owns every node in a single [`Tree`] and reduces expressions to their normal form
//! by applying the [`reduce::Reducer`]s registered for their tags, until none applies.
//!
//! Besides arithmetic and comparison, the built-in reducers edit expressions structurally
//! (`Expression.Append`, `Expression.Insert`, `Expression.Child`, ...), build expressions of any
//! kind (`Expression.CreateExpressionTree`), and convert expressions to and from the markup
//! format of [`reduct_markup`] (`Expression.Serialize`, `Expression.Deserialize`).
//!
//! ```
//! use futures::executor::block_on;
//! use reduct_core::{kind::tag, Session};
//!
//! let mut session = Session::default();
//! let items = [1, 2, 1].map(|n| session.integer(n));
//! let list = session.list(items);
//! let group = session.node(tag::GROUP, [list]).unwrap();
//!
//! let result = block_on(session.evaluate(group)).unwrap();
//! assert_eq!(session.display(result), "{{1, 2}, {2, 1}}");
//! ```

pub mod error;
pub mod kind;
pub mod markup;
pub mod number;
pub mod oracle;
pub mod path;
pub mod reduce;
pub mod registry;
pub mod session;
pub mod tree;

pub use error::Error;
pub use registry::Registry;
pub use session::Session;
pub use tree::{NodeId, Tree};
