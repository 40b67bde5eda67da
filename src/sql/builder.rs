use super::PLACEHOLDER;
use crate::cond::Cond;
use crate::error::{Error, Result};
use crate::expr::{Expr, IdentList};
use crate::value::Value;

/// A parameter-safe dynamic SQL builder.
///
/// `Sql` accumulates statement text and bound arguments together; every
/// clause method appends to both and returns `&mut Self` for chaining. The
/// invariant maintained throughout is that the number of placeholder markers
/// in the text equals the number of accumulated arguments, in left-to-right
/// order ([`Sql::validate`] checks it before execution).
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct Sql {
    sql: String,
    args: Vec<Value>,
}

/// Argument to [`Sql::limit`].
///
/// LIMIT bounds cannot be parameterized portably in the target grammar, so
/// they are interpolated directly rather than bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Limit {
    /// Both bounds omitted; the clause is skipped entirely.
    Skip,
    /// `LIMIT n`.
    Count(u64),
    /// `LIMIT offset, count`.
    OffsetCount(u64, u64),
}

macro_rules! limit_from_int {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for Limit {
            fn from(n: $t) -> Self {
                Limit::Count(n as u64)
            }
        }

        impl From<($t, $t)> for Limit {
            fn from((a, b): ($t, $t)) -> Self {
                Limit::OffsetCount(a as u64, b as u64)
            }
        }

        impl From<[$t; 2]> for Limit {
            fn from([a, b]: [$t; 2]) -> Self {
                Limit::OffsetCount(a as u64, b as u64)
            }
        }

        impl From<Option<$t>> for Limit {
            fn from(n: Option<$t>) -> Self {
                match n {
                    Some(n) => Limit::Count(n as u64),
                    None => Limit::Skip,
                }
            }
        }

        impl From<(Option<$t>, Option<$t>)> for Limit {
            fn from(bounds: (Option<$t>, Option<$t>)) -> Self {
                match bounds {
                    (None, None) => Limit::Skip,
                    (Some(a), None) | (None, Some(a)) => Limit::Count(a as u64),
                    (Some(a), Some(b)) => Limit::OffsetCount(a as u64, b as u64),
                }
            }
        }
    )*};
}

limit_from_int!(u32, u64, usize, i32, i64);

/// Argument to [`Sql::set`]: column/value pairs or a raw expression.
#[derive(Debug, Clone)]
pub enum SetArg {
    /// One `` `col`=%s `` assignment per pair, in insertion order.
    Pairs(Vec<(String, Value)>),
    /// A compiled expression appended verbatim, e.g. `num = num + 1`.
    Expr(Expr),
}

impl From<Expr> for SetArg {
    fn from(expr: Expr) -> Self {
        SetArg::Expr(expr)
    }
}

impl From<&str> for SetArg {
    fn from(s: &str) -> Self {
        SetArg::Expr(Expr::Raw(s.to_string()))
    }
}

impl From<String> for SetArg {
    fn from(s: String) -> Self {
        SetArg::Expr(Expr::Raw(s))
    }
}

impl From<Sql> for SetArg {
    fn from(sql: Sql) -> Self {
        SetArg::Expr(Expr::Sub(sql))
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for SetArg {
    fn from(pairs: Vec<(K, V)>) -> Self {
        SetArg::Pairs(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for SetArg {
    fn from(pairs: [(K, V); N]) -> Self {
        SetArg::Pairs(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Sql {
    /// Create a new builder with an initial SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        Self {
            sql: initial_sql.into(),
            args: Vec::new(),
        }
    }

    /// Create a builder from already-compiled text and arguments.
    pub fn with_args(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Create an empty builder.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The accumulated statement text.
    pub fn as_str(&self) -> &str {
        &self.sql
    }

    /// The accumulated arguments, in placeholder order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Consume the builder, returning `(text, args)`.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }

    /// Check the placeholder/argument parity invariant.
    pub fn validate(&self) -> Result<()> {
        let markers = self.sql.matches(PLACEHOLDER).count();
        if markers != self.args.len() {
            return Err(Error::validation(format!(
                "placeholders({markers}) != args({})",
                self.args.len()
            )));
        }
        Ok(())
    }

    // ==================== Low-level primitives ====================

    /// Append raw SQL (no arguments).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append a placeholder marker and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.sql.push_str(PLACEHOLDER);
        self.args.push(value.into());
        self
    }

    /// Append another fragment, consuming it.
    pub fn push_sql(&mut self, other: Sql) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.args.extend(other.args);
        self
    }

    fn push_expr(&mut self, expr: Expr) -> &mut Self {
        let (text, args) = expr.compile();
        self.sql.push_str(&text);
        self.args.extend(args);
        self
    }

    fn push_cond(&mut self, keyword: &str, cond: Cond) -> &mut Self {
        let (text, args) = cond.compile();
        if !text.is_empty() {
            self.sql.push_str(keyword);
            self.sql.push_str(&text);
        }
        self.args.extend(args);
        self
    }

    // ==================== Clause methods ====================

    /// Append `SELECT <expr>`.
    pub fn select(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.push("SELECT ").push_expr(expr.into())
    }

    /// Append `DELETE`.
    pub fn delete(&mut self) -> &mut Self {
        self.push("DELETE")
    }

    /// Append `DELETE <expr>` (multi-table form).
    pub fn delete_tables(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.push("DELETE ").push_expr(expr.into())
    }

    /// Append ` FROM <expr>`.
    pub fn from(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.push(" FROM ").push_expr(expr.into())
    }

    /// Append ` USE INDEX(...)`. Identifiers are quoted, never bound.
    pub fn use_index(&mut self, idents: impl Into<IdentList>) -> &mut Self {
        self.push(" USE INDEX(");
        self.sql.push_str(&idents.into().to_quoted());
        self.push(")")
    }

    /// Append ` IGNORE INDEX(...)`. Identifiers are quoted, never bound.
    pub fn ignore_index(&mut self, idents: impl Into<IdentList>) -> &mut Self {
        self.push(" IGNORE INDEX(");
        self.sql.push_str(&idents.into().to_quoted());
        self.push(")")
    }

    /// Append a full join clause verbatim, preceded by a space.
    ///
    /// The caller supplies the complete join SQL; nothing is compiled.
    pub fn join(&mut self, join_sql: &str) -> &mut Self {
        self.push(" ");
        self.push(join_sql)
    }

    /// Append ` WHERE <cond>`; skipped entirely when the condition
    /// compiles to empty text (e.g. [`Cond::Empty`]).
    pub fn where_(&mut self, cond: impl Into<Cond>) -> &mut Self {
        self.push_cond(" WHERE ", cond.into())
    }

    /// Append ` GROUP BY <expr>`.
    pub fn group_by(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.push(" GROUP BY ").push_expr(expr.into())
    }

    /// Append ` HAVING <cond>`; same skipping rule as [`Sql::where_`].
    pub fn having(&mut self, cond: impl Into<Cond>) -> &mut Self {
        self.push_cond(" HAVING ", cond.into())
    }

    /// Append ` ORDER BY <expr>`; a no-op when the expression is empty.
    pub fn order_by(&mut self, expr: impl Into<Expr>) -> &mut Self {
        let expr = expr.into();
        if expr.is_empty() {
            return self;
        }
        self.push(" ORDER BY ").push_expr(expr)
    }

    /// Append a LIMIT clause; see [`Limit`] for the accepted forms.
    pub fn limit(&mut self, limit: impl Into<Limit>) -> &mut Self {
        match limit.into() {
            Limit::Skip => self,
            Limit::Count(n) => {
                self.sql.push_str(&format!(" LIMIT {n}"));
                self
            }
            Limit::OffsetCount(offset, count) => {
                self.sql.push_str(&format!(" LIMIT {offset}, {count}"));
                self
            }
        }
    }

    /// Append `INSERT INTO` with a quoted table name.
    pub fn insert(&mut self, table: &str) -> &mut Self {
        self.push("INSERT INTO `");
        self.push(table);
        self.push("`")
    }

    /// Append `UPDATE` with a quoted table name.
    pub fn update(&mut self, table: &str) -> &mut Self {
        self.push("UPDATE `");
        self.push(table);
        self.push("`")
    }

    /// Append a parenthesized quoted column list: `` (`a`, `b`) ``.
    pub fn cols(&mut self, idents: impl Into<IdentList>) -> &mut Self {
        self.push(" (");
        self.sql.push_str(&idents.into().to_quoted());
        self.push(")")
    }

    /// Append ` VALUES (...)`, one placeholder group per row.
    ///
    /// Arguments are extended in row order, supporting both single-row and
    /// multi-row batch inserts.
    pub fn vals<R>(&mut self, rows: R) -> &mut Self
    where
        R: IntoIterator,
        R::Item: IntoIterator,
        <R::Item as IntoIterator>::Item: Into<Value>,
    {
        self.push(" VALUES ");
        for (i, row) in rows.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push("(");
            for (j, value) in row.into_iter().enumerate() {
                if j > 0 {
                    self.push(",");
                }
                self.push_bind(value);
            }
            self.push(")");
        }
        self
    }

    /// Append a SET clause.
    ///
    /// Column/value pairs render as `` `col`=%s `` assignments in insertion
    /// order with the trailing separator trimmed; an expression argument is
    /// compiled and appended verbatim (supports `num = num + 1` style with
    /// no arguments).
    pub fn set(&mut self, arg: impl Into<SetArg>) -> &mut Self {
        self.push(" SET ");
        match arg.into() {
            SetArg::Pairs(pairs) => {
                let trim = !pairs.is_empty();
                for (column, value) in pairs {
                    self.push("`");
                    self.push(&column);
                    self.push("`=");
                    self.push_bind(value);
                    self.push(", ");
                }
                if trim {
                    self.sql.truncate(self.sql.len() - 2);
                }
                self
            }
            SetArg::Expr(expr) => self.push_expr(expr),
        }
    }

    /// Append ` AS` with a quoted alias.
    pub fn alias(&mut self, name: &str) -> &mut Self {
        self.push(" AS `");
        self.push(name);
        self.push("`")
    }

    /// Wrap the accumulated text in parentheses, optionally aliased, so the
    /// builder can be embedded in another builder's FROM or WHERE.
    ///
    /// Arguments are untouched and travel with the fragment when it is
    /// later spliced into a parent.
    pub fn as_subquery(&mut self, alias: Option<&str>) -> &mut Self {
        self.sql = match alias {
            None => format!("({})", self.sql),
            Some(alias) => format!("({}) AS `{alias}`", self.sql),
        };
        self
    }

    /// Quote a single identifier or a sequence of identifiers:
    /// `` `a` `` or `` `a`, `b` ``.
    ///
    /// No escaping of embedded backticks is performed; the caller must
    /// supply safe identifiers.
    pub fn add_quote(idents: impl Into<IdentList>) -> String {
        idents.into().to_quoted()
    }
}

impl std::fmt::Display for Sql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}
