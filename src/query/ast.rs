//! Abstract syntax tree for query expressions.

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Null literal
    Null,
    /// Boolean literal
    Boolean(bool),
    /// Integer literal
    Integer(i64),
    /// Float literal
    Float(f64),
    /// String literal
    Str(String),
    /// Name reference: the root binding `_`, a comprehension or lambda
    /// variable, or (when called) a builtin function
    Ident(String),
    /// List literal: `[a, b, c]`
    List(Vec<Expr>),
    /// Unary operation: `not e`, `-e`
    Unary(UnaryOp, Box<Expr>),
    /// Binary operation: `a + b`, `a and b`, `a in b`, ...
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// Conditional: `cond ? a : b`
    Ternary {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// Subscript: `e[i]`
    Index(Box<Expr>, Box<Expr>),
    /// Slice: `e[a:b]`, either bound optional
    Slice(Box<Expr>, Option<Box<Expr>>, Option<Box<Expr>>),
    /// Attribute access: `e.name` (always rejected at evaluation)
    Attribute(Box<Expr>, String),
    /// Function call: `name(args)`
    Call(String, Vec<Expr>),
    /// Lambda: `x => body`, accepted only as an argument to map/filter
    Lambda { param: String, body: Box<Expr> },
    /// Comprehension: `[element for var in iterable if condition]`
    Comprehension {
        element: Box<Expr>,
        var: String,
        iterable: Box<Expr>,
        condition: Option<Box<Expr>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}
