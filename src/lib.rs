//! # sqlrig
//!
//! A fluent, parameter-safe SQL statement builder with a thin
//! record-mapping layer on top.
//!
//! ## Features
//!
//! - **Statement builder**: one chainable method per SQL clause, accumulating
//!   text and positional arguments together ([`Sql`])
//! - **Condition compiler**: nested AND/OR trees, comparisons, and embedded
//!   sub-queries flatten into one parenthesized predicate with arguments in
//!   placeholder order ([`Cond`], [`Cmp`])
//! - **Closed input types**: expressions, comparisons, and condition trees
//!   are tagged unions dispatched with exhaustive matches, not runtime type
//!   inspection
//! - **Driver-agnostic**: execution goes through the [`Driver`] trait; the
//!   core emits a single fixed placeholder marker and never speaks a
//!   driver-specific dialect
//! - **Record mapping**: [`Model`] binds a table and primary key and
//!   composes the builder into `get`/`one`/`all`/`count`/`add`/`update`/
//!   `delete`/`save`
//!
//! ## Example
//!
//! ```
//! use sqlrig::{sql, Cmp, Cond};
//!
//! let mut q = sql("");
//! q.select(["id", "name"])
//!     .from("song")
//!     .where_(Cond::any([
//!         Cond::from(Cmp::eq("singer", "Jay Chou")),
//!         Cond::from(Cmp::eq("singer", "Mayday")),
//!     ]))
//!     .order_by("id DESC")
//!     .limit(10);
//!
//! assert_eq!(
//!     q.as_str(),
//!     "SELECT id, name FROM song WHERE (singer = %s OR singer = %s) ORDER BY id DESC LIMIT 10"
//! );
//! assert_eq!(q.args().len(), 2);
//! ```

pub mod cond;
pub mod error;
pub mod expr;
pub mod model;
pub mod session;
pub mod sql;
pub mod value;

pub use cond::{Cmp, CmpRhs, Cond, InList, Joiner, Operand};
pub use error::{Error, Result};
pub use expr::{Expr, IdentList};
pub use model::{Model, Saved};
pub use session::{Driver, ExecResult, Row, Session};
pub use sql::{Limit, PLACEHOLDER, SetArg, Sql, sql};
pub use value::Value;
