//! The statement accumulator.
//!
//! [`Sql`] stores SQL text and bound arguments side by side and is mutated
//! in place by chained clause calls:
//!
//! ```ignore
//! use sqlrig::{sql, Cmp};
//!
//! let mut q = sql("");
//! q.select("*")
//!     .from("song")
//!     .where_(Cmp::eq("name", "Common Jasmin Orange"))
//!     .limit(1);
//!
//! assert_eq!(q.as_str(), "SELECT * FROM song WHERE (name = %s) LIMIT 1");
//! ```
//!
//! A finished builder can also be wrapped as a sub-query and spliced into
//! another builder's FROM or WHERE, carrying its arguments along.

mod builder;


pub use builder::{Limit, SetArg, Sql};

/// The positional parameter marker emitted for every bound argument.
///
/// The core emits this single fixed marker only; any driver-specific
/// placeholder translation belongs to the [`Driver`](crate::Driver)
/// implementation.
pub const PLACEHOLDER: &str = "%s";

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}
