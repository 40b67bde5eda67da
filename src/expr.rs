//! Expression inputs for clause methods.
//!
//! Clause methods like `select`, `from` and `group_by` accept anything that
//! converts into an [`Expr`]: a raw SQL string, a finished [`Sql`] fragment
//! (for sub-queries), or a sequence of either. Compilation turns an `Expr`
//! into a text fragment plus the arguments it binds, keeping argument order
//! aligned with placeholder order.

use crate::sql::Sql;
use crate::value::Value;

/// An expression input: raw text, a sub-query fragment, or a list of inputs.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Raw SQL text, passed through verbatim with zero arguments.
    Raw(String),
    /// An embedded fragment; its text and arguments are spliced in directly.
    Sub(Sql),
    /// A sequence of inputs, joined with `", "`.
    List(Vec<Expr>),
}

impl Expr {
    /// Build a list expression from anything convertible to `Expr`.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Expr::List(items.into_iter().map(Into::into).collect())
    }

    /// True when compiling would produce empty text and no arguments.
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::Raw(s) => s.is_empty(),
            Expr::Sub(sql) => sql.as_str().is_empty() && sql.args().is_empty(),
            Expr::List(items) => items.is_empty(),
        }
    }

    /// Compile into `(text, args)`.
    ///
    /// - `Sub` is an identity passthrough of the fragment's own text/args.
    /// - `Raw` yields the string with no arguments.
    /// - `List` compiles each element, joins texts with `", "` and
    ///   concatenates arguments in sequence order. An empty list yields
    ///   `("", [])`; cardinality is the caller's concern.
    pub fn compile(self) -> (String, Vec<Value>) {
        match self {
            Expr::Raw(s) => (s, Vec::new()),
            Expr::Sub(sql) => sql.into_parts(),
            Expr::List(items) => {
                let mut texts = Vec::with_capacity(items.len());
                let mut args = Vec::new();
                for item in items {
                    let (text, mut item_args) = item.compile();
                    texts.push(text);
                    args.append(&mut item_args);
                }
                (texts.join(", "), args)
            }
        }
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Raw(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Raw(s)
    }
}

impl From<Sql> for Expr {
    fn from(sql: Sql) -> Self {
        Expr::Sub(sql)
    }
}

impl<T: Into<Expr>> From<Vec<T>> for Expr {
    fn from(items: Vec<T>) -> Self {
        Expr::list(items)
    }
}

impl<T: Into<Expr>, const N: usize> From<[T; N]> for Expr {
    fn from(items: [T; N]) -> Self {
        Expr::list(items)
    }
}

/// One or more identifiers destined for backtick quoting.
///
/// No escaping of embedded backticks is performed; identifier safety is the
/// caller's responsibility.
#[derive(Debug, Clone)]
pub struct IdentList(Vec<String>);

impl IdentList {
    /// Render as `` `a` `` or `` `a`, `b` ``.
    pub fn to_quoted(&self) -> String {
        let mut out = String::new();
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push('`');
            out.push_str(name);
            out.push('`');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for IdentList {
    fn from(s: &str) -> Self {
        IdentList(vec![s.to_string()])
    }
}

impl From<String> for IdentList {
    fn from(s: String) -> Self {
        IdentList(vec![s])
    }
}

impl<S: Into<String>> From<Vec<S>> for IdentList {
    fn from(items: Vec<S>) -> Self {
        IdentList(items.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for IdentList {
    fn from(items: [S; N]) -> Self {
        IdentList(items.into_iter().map(Into::into).collect())
    }
}
