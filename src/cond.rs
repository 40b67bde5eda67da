//! The condition compiler.
//!
//! This module provides [`Cmp`] (a single comparison) and [`Cond`] (a
//! recursive boolean tree of comparisons) for building WHERE/HAVING clauses.
//! Compiling a condition yields a single parenthesized SQL fragment and a
//! flat argument list whose order matches the left-to-right placeholder
//! order at every nesting depth.

use crate::error::{Error, Result};
use crate::sql::{PLACEHOLDER, Sql};
use crate::value::Value;

/// The right-hand side of a scalar comparison: a bound value or a sub-query.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A scalar bound through one placeholder.
    Value(Value),
    /// A fragment spliced in directly, carrying its own arguments.
    Sub(Sql),
}

macro_rules! operand_from_scalar {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for Operand {
            fn from(v: $t) -> Self {
                Operand::Value(v.into())
            }
        }
    )*};
}

operand_from_scalar!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, &str, String,
);

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<Sql> for Operand {
    fn from(sql: Sql) -> Self {
        Operand::Sub(sql)
    }
}

/// The operand of an IN / NOT IN comparison.
#[derive(Debug, Clone)]
pub enum InList {
    /// One placeholder per element.
    Values(Vec<Value>),
    /// A sub-query spliced in directly.
    Sub(Sql),
}

impl<T: Into<Value>> From<Vec<T>> for InList {
    fn from(items: Vec<T>) -> Self {
        InList::Values(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for InList {
    fn from(items: [T; N]) -> Self {
        InList::Values(items.into_iter().map(Into::into).collect())
    }
}

impl From<Sql> for InList {
    fn from(sql: Sql) -> Self {
        InList::Sub(sql)
    }
}

/// A single comparison.
///
/// The operator of [`Cmp::Op`] is interpolated literally and never
/// parameterized; that is a deliberate trust boundary. Only values are bound.
#[derive(Debug, Clone)]
pub enum Cmp {
    /// A literal boolean predicate, zero arguments.
    Raw(String),
    /// `column = value` or `column = (subquery)`.
    Eq(String, Operand),
    /// `column BETWEEN lo AND hi`.
    Between(String, Value, Value),
    /// `column IN (...)`.
    In(String, InList),
    /// `column NOT IN (...)`.
    NotIn(String, InList),
    /// Any other operator, with literal operator text.
    Op {
        column: String,
        op: String,
        operand: Operand,
    },
}

/// Dynamic right-hand side for [`Cmp::parse`].
#[derive(Debug, Clone)]
pub enum CmpRhs {
    Value(Value),
    Pair(Value, Value),
    Values(Vec<Value>),
    Sub(Sql),
}

macro_rules! cmp_rhs_from_scalar {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for CmpRhs {
            fn from(v: $t) -> Self {
                CmpRhs::Value(v.into())
            }
        }
    )*};
}

cmp_rhs_from_scalar!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, &str, String,
);

impl From<Value> for CmpRhs {
    fn from(v: Value) -> Self {
        CmpRhs::Value(v)
    }
}

impl From<Sql> for CmpRhs {
    fn from(sql: Sql) -> Self {
        CmpRhs::Sub(sql)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for CmpRhs {
    fn from((a, b): (A, B)) -> Self {
        CmpRhs::Pair(a.into(), b.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for CmpRhs {
    fn from(items: Vec<T>) -> Self {
        CmpRhs::Values(items.into_iter().map(Into::into).collect())
    }
}

impl Cmp {
    /// Create a literal predicate with zero arguments.
    pub fn raw(text: impl Into<String>) -> Self {
        Cmp::Raw(text.into())
    }

    /// Create an equality comparison.
    pub fn eq(column: impl Into<String>, operand: impl Into<Operand>) -> Self {
        Cmp::Eq(column.into(), operand.into())
    }

    /// Create a BETWEEN comparison.
    pub fn between(column: impl Into<String>, lo: impl Into<Value>, hi: impl Into<Value>) -> Self {
        Cmp::Between(column.into(), lo.into(), hi.into())
    }

    /// Create an IN comparison.
    pub fn in_list(column: impl Into<String>, operand: impl Into<InList>) -> Self {
        Cmp::In(column.into(), operand.into())
    }

    /// Create a NOT IN comparison.
    pub fn not_in(column: impl Into<String>, operand: impl Into<InList>) -> Self {
        Cmp::NotIn(column.into(), operand.into())
    }

    /// Create a comparison with an explicit operator.
    pub fn op(
        column: impl Into<String>,
        op: impl Into<String>,
        operand: impl Into<Operand>,
    ) -> Self {
        Cmp::Op {
            column: column.into(),
            op: op.into(),
            operand: operand.into(),
        }
    }

    /// Build a comparison from a column, an operator string, and a
    /// dynamic right-hand side.
    ///
    /// The operator is interpreted case-insensitively: `BETWEEN` requires a
    /// pair of bounds, `IN`/`NOT IN` require a value list or sub-query, any
    /// other operator takes a scalar or sub-query and is interpolated
    /// literally. A shape mismatch fails fast with
    /// [`Error::MalformedComparison`].
    pub fn parse(
        column: impl Into<String>,
        op: &str,
        rhs: impl Into<CmpRhs>,
    ) -> Result<Self> {
        let column = column.into();
        let rhs = rhs.into();

        match op.to_uppercase().as_str() {
            "BETWEEN" => match rhs {
                CmpRhs::Pair(lo, hi) => Ok(Cmp::Between(column, lo, hi)),
                CmpRhs::Values(vals) => match <[Value; 2]>::try_from(vals) {
                    Ok([lo, hi]) => Ok(Cmp::Between(column, lo, hi)),
                    Err(_) => Err(Error::malformed(format!(
                        "BETWEEN on `{column}` requires exactly two bounds"
                    ))),
                },
                _ => Err(Error::malformed(format!(
                    "BETWEEN on `{column}` requires exactly two bounds"
                ))),
            },
            "IN" => match rhs {
                CmpRhs::Values(vals) => Ok(Cmp::In(column, InList::Values(vals))),
                CmpRhs::Sub(sql) => Ok(Cmp::In(column, InList::Sub(sql))),
                _ => Err(Error::malformed(format!(
                    "IN on `{column}` requires a value list or sub-query"
                ))),
            },
            "NOT IN" => match rhs {
                CmpRhs::Values(vals) => Ok(Cmp::NotIn(column, InList::Values(vals))),
                CmpRhs::Sub(sql) => Ok(Cmp::NotIn(column, InList::Sub(sql))),
                _ => Err(Error::malformed(format!(
                    "NOT IN on `{column}` requires a value list or sub-query"
                ))),
            },
            _ => match rhs {
                CmpRhs::Value(v) => Ok(Cmp::Op {
                    column,
                    op: op.to_string(),
                    operand: Operand::Value(v),
                }),
                CmpRhs::Sub(sql) => Ok(Cmp::Op {
                    column,
                    op: op.to_string(),
                    operand: Operand::Sub(sql),
                }),
                _ => Err(Error::malformed(format!(
                    "operator `{op}` on `{column}` takes a single operand"
                ))),
            },
        }
    }

    /// Compile into `(text, args)`.
    pub fn compile(self) -> (String, Vec<Value>) {
        match self {
            Cmp::Raw(text) => (text, Vec::new()),
            Cmp::Eq(column, operand) => compile_operator(column, "=", operand),
            Cmp::Between(column, lo, hi) => (
                format!("{column} BETWEEN {PLACEHOLDER} AND {PLACEHOLDER}"),
                vec![lo, hi],
            ),
            Cmp::In(column, operand) => compile_in(column, "IN", operand),
            Cmp::NotIn(column, operand) => compile_in(column, "NOT IN", operand),
            Cmp::Op {
                column,
                op,
                operand,
            } => compile_operator(column, &op, operand),
        }
    }
}

fn compile_operator(column: String, op: &str, operand: Operand) -> (String, Vec<Value>) {
    match operand {
        Operand::Value(v) => (format!("{column} {op} {PLACEHOLDER}"), vec![v]),
        Operand::Sub(sql) => {
            let (text, args) = sql.into_parts();
            (format!("{column} {op} {text}"), args)
        }
    }
}

fn compile_in(column: String, op: &str, operand: InList) -> (String, Vec<Value>) {
    match operand {
        InList::Values(vals) => {
            // One marker per element, joined without spaces.
            let markers = vec![PLACEHOLDER; vals.len()].join(",");
            (format!("{column} {op} ({markers})"), vals)
        }
        InList::Sub(sql) => {
            let (text, args) = sql.into_parts();
            (format!("{column} {op} {text}"), args)
        }
    }
}

/// The boolean connective joining sibling members of a condition group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Joiner {
    And,
    Or,
    /// Any other SQL boolean joiner, interpolated literally.
    Other(String),
}

impl Joiner {
    pub fn as_str(&self) -> &str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
            Joiner::Other(s) => s,
        }
    }
}

/// A recursive boolean condition tree.
///
/// Compiling any non-trivial tree yields a single outer-parenthesized string
/// and a flat argument list in left-to-right depth-first order. A group
/// carries exactly one [`Joiner`], so there is no "first key of a mapping"
/// ambiguity to resolve.
#[derive(Debug, Clone)]
pub enum Cond {
    /// Omit the clause entirely; compiles to `("", [])`.
    Empty,
    /// Trusted literal predicate text, no outer parentheses, no arguments.
    Raw(String),
    /// A single comparison; normalized to a one-element AND group.
    Cmp(Cmp),
    /// Members joined by one connective, wrapped in one pair of parentheses.
    Group(Joiner, Vec<Cond>),
}

impl Cond {
    /// Join members with AND.
    pub fn all(members: impl IntoIterator<Item = impl Into<Cond>>) -> Self {
        Cond::Group(Joiner::And, members.into_iter().map(Into::into).collect())
    }

    /// Join members with OR.
    pub fn any(members: impl IntoIterator<Item = impl Into<Cond>>) -> Self {
        Cond::Group(Joiner::Or, members.into_iter().map(Into::into).collect())
    }

    /// Join members with an arbitrary connective.
    pub fn group(joiner: Joiner, members: impl IntoIterator<Item = impl Into<Cond>>) -> Self {
        Cond::Group(joiner, members.into_iter().map(Into::into).collect())
    }

    /// Build an AND group of equality comparisons from column/value pairs.
    pub fn eq_all<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Cond::Group(
            Joiner::And,
            pairs
                .into_iter()
                .map(|(k, v)| Cond::Cmp(Cmp::Eq(k.into(), Operand::Value(v.into()))))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cond::Empty)
    }

    /// Compile into `(text, args)`.
    ///
    /// `Empty` yields empty text so the builder can skip the clause keyword.
    /// A literal string passes through untouched. Everything else compiles
    /// to one outer-parenthesized expression; argument order matches the
    /// left-to-right placeholder order at every depth.
    pub fn compile(self) -> (String, Vec<Value>) {
        match self {
            Cond::Empty => (String::new(), Vec::new()),
            Cond::Raw(text) => (text, Vec::new()),
            Cond::Cmp(cmp) => Cond::Group(Joiner::And, vec![Cond::Cmp(cmp)]).compile(),
            Cond::Group(joiner, members) => {
                let mut items = Vec::with_capacity(members.len());
                let mut args = Vec::new();
                for member in members {
                    match member {
                        Cond::Empty => {}
                        Cond::Raw(text) => items.push(text),
                        Cond::Cmp(cmp) => {
                            let (text, mut cmp_args) = cmp.compile();
                            items.push(text);
                            args.append(&mut cmp_args);
                        }
                        group @ Cond::Group(..) => {
                            let (text, mut group_args) = group.compile();
                            items.push(text);
                            args.append(&mut group_args);
                        }
                    }
                }
                let sep = format!(" {} ", joiner.as_str());
                (format!("({})", items.join(&sep)), args)
            }
        }
    }
}

impl From<&str> for Cond {
    fn from(s: &str) -> Self {
        Cond::Raw(s.to_string())
    }
}

impl From<String> for Cond {
    fn from(s: String) -> Self {
        Cond::Raw(s)
    }
}

impl From<Cmp> for Cond {
    fn from(cmp: Cmp) -> Self {
        Cond::Cmp(cmp)
    }
}

impl<T: Into<Cond>> From<Vec<T>> for Cond {
    fn from(members: Vec<T>) -> Self {
        Cond::all(members)
    }
}

impl<T: Into<Cond>, const N: usize> From<[T; N]> for Cond {
    fn from(members: [T; N]) -> Self {
        Cond::all(members)
    }
}
