//! Query expression parser.
//!
//! A recursive-descent parser over the closed query grammar. The grammar is
//! the sandbox: only literals, the root binding, operators, subscripts,
//! comprehensions, lambdas, and calls to named functions can be expressed,
//! so nothing outside the allow-list is reachable by construction.

use super::ast::{BinOp, Expr, UnaryOp};
use super::error::QueryError;

/// Maximum grammar nesting before parsing is abandoned. Keeps a pasted wall
/// of brackets from exhausting the stack; reported as a syntax error like any
/// other malformed query.
const MAX_NESTING: usize = 200;

/// Parser for query expression strings.
pub struct Parser {
    chars: Vec<char>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn new(query: &str) -> Self {
        Self {
            chars: query.chars().collect(),
            position: 0,
            depth: 0,
        }
    }

    fn enter_nested(&mut self) -> Result<(), QueryError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.error_here("query is nested too deeply".to_string()));
        }
        Ok(())
    }

    fn leave_nested(&mut self) {
        self.depth -= 1;
    }

    /// Parses a query string into an expression.
    pub fn parse(query: &str) -> Result<Expr, QueryError> {
        let mut parser = Parser::new(query);
        parser.skip_whitespace();
        let expr = parser.parse_expr()?;
        parser.skip_whitespace();
        if !parser.is_eof() {
            let found: String = parser.chars[parser.position..].iter().collect();
            return Err(parser.error_here(format!("unexpected trailing input '{}'", found)));
        }
        Ok(expr)
    }

    fn parse_expr(&mut self) -> Result<Expr, QueryError> {
        self.enter_nested()?;
        let expr = self.parse_ternary();
        self.leave_nested();
        expr
    }

    fn parse_ternary(&mut self) -> Result<Expr, QueryError> {
        let cond = self.parse_or()?;
        self.skip_whitespace();
        if self.peek() == Some('?') {
            self.next();
            let then_branch = self.parse_expr()?;
            self.skip_whitespace();
            self.expect(':')?;
            let else_branch = self.parse_expr()?;
            return Ok(Expr::Ternary {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }
        Ok(cond)
    }

    fn parse_or(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            let right = self.parse_and()?;
            left = Expr::Binary(BinOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_not()?;
        while self.eat_keyword("and") {
            let right = self.parse_not()?;
            left = Expr::Binary(BinOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, QueryError> {
        if self.eat_keyword("not") {
            self.enter_nested()?;
            let operand = self.parse_not();
            self.leave_nested();
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(operand?)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, QueryError> {
        let left = self.parse_additive()?;
        self.skip_whitespace();

        let op = if self.eat_str("==") {
            BinOp::Eq
        } else if self.eat_str("!=") {
            BinOp::Ne
        } else if self.eat_str("<=") {
            BinOp::Le
        } else if self.eat_str(">=") {
            BinOp::Ge
        } else if self.peek() == Some('<') {
            self.next();
            BinOp::Lt
        } else if self.peek() == Some('>') {
            self.next();
            BinOp::Gt
        } else if self.eat_keyword("in") {
            BinOp::In
        } else {
            return Ok(left);
        };

        let right = self.parse_additive()?;
        Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
    }

    fn parse_additive(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_term()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some('+') => BinOp::Add,
                Some('-') => BinOp::Sub,
                _ => break,
            };
            self.next();
            let right = self.parse_term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, QueryError> {
        let mut left = self.parse_unary()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some('*') => BinOp::Mul,
                Some('/') => BinOp::Div,
                Some('%') => BinOp::Mod,
                _ => break,
            };
            self.next();
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, QueryError> {
        self.skip_whitespace();
        if self.peek() == Some('-') {
            self.next();
            self.enter_nested()?;
            let operand = self.parse_unary();
            self.leave_nested();
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(operand?)));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, QueryError> {
        let mut expr = self.parse_primary()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('[') => {
                    expr = self.parse_subscript(expr)?;
                }
                Some('.') => {
                    // attribute access parses, but evaluation always
                    // rejects it with a pointer at bracket syntax
                    self.next();
                    let name = self.parse_identifier()?;
                    expr = Expr::Attribute(Box::new(expr), name);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Parses `[index]`, `[start:end]`, `[:end]`, `[start:]`, or `[:]`
    /// after a primary expression.
    fn parse_subscript(&mut self, target: Expr) -> Result<Expr, QueryError> {
        self.expect('[')?;
        self.skip_whitespace();

        if self.peek() == Some(':') {
            self.next();
            let end = self.parse_slice_end()?;
            return Ok(Expr::Slice(Box::new(target), None, end));
        }

        let first = self.parse_expr()?;
        self.skip_whitespace();

        if self.peek() == Some(':') {
            self.next();
            let end = self.parse_slice_end()?;
            return Ok(Expr::Slice(Box::new(target), Some(Box::new(first)), end));
        }

        self.expect(']')?;
        Ok(Expr::Index(Box::new(target), Box::new(first)))
    }

    fn parse_slice_end(&mut self) -> Result<Option<Box<Expr>>, QueryError> {
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.next();
            return Ok(None);
        }
        let end = self.parse_expr()?;
        self.skip_whitespace();
        self.expect(']')?;
        Ok(Some(Box::new(end)))
    }

    fn parse_primary(&mut self) -> Result<Expr, QueryError> {
        self.skip_whitespace();
        match self.peek() {
            Some('\'') | Some('"') => self.parse_string(),
            Some('(') => {
                self.next();
                let expr = self.parse_expr()?;
                self.skip_whitespace();
                self.expect(')')?;
                Ok(expr)
            }
            Some('[') => self.parse_list_or_comprehension(),
            Some(ch) if ch.is_ascii_digit() => self.parse_number(),
            Some(ch) if ch.is_alphanumeric() || ch == '_' => self.parse_name(),
            Some(ch) => Err(self.error_here(format!("unexpected character '{}'", ch))),
            None => Err(self.error_here("unexpected end of query".to_string())),
        }
    }

    fn parse_name(&mut self) -> Result<Expr, QueryError> {
        let start = self.position;
        let word = self.parse_identifier()?;

        match word.as_str() {
            "true" => return Ok(Expr::Boolean(true)),
            "false" => return Ok(Expr::Boolean(false)),
            "null" => return Ok(Expr::Null),
            "not" | "and" | "or" | "in" | "for" | "if" => {
                self.position = start;
                return Err(self.error_here(format!("unexpected keyword '{}'", word)));
            }
            _ => {}
        }

        self.skip_whitespace();
        if self.peek() == Some('(') {
            let args = self.parse_call_args()?;
            return Ok(Expr::Call(word, args));
        }
        if self.peek() == Some('=') && self.peek_at(1) == Some('>') {
            self.next();
            self.next();
            let body = self.parse_expr()?;
            return Ok(Expr::Lambda {
                param: word,
                body: Box::new(body),
            });
        }

        Ok(Expr::Ident(word))
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, QueryError> {
        self.expect('(')?;
        self.skip_whitespace();

        let mut args = Vec::new();
        if self.peek() == Some(')') {
            self.next();
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.next();
                }
                Some(')') => {
                    self.next();
                    break;
                }
                Some(ch) => {
                    return Err(
                        self.error_here(format!("expected ',' or ')', found '{}'", ch))
                    )
                }
                None => {
                    return Err(self.error_here("unexpected end of query, expected ')'".to_string()))
                }
            }
        }
        Ok(args)
    }

    fn parse_list_or_comprehension(&mut self) -> Result<Expr, QueryError> {
        self.expect('[')?;
        self.skip_whitespace();

        if self.peek() == Some(']') {
            self.next();
            return Ok(Expr::List(Vec::new()));
        }

        let first = self.parse_expr()?;

        if self.eat_keyword("for") {
            let var = self.parse_identifier()?;
            if !self.eat_keyword("in") {
                return Err(self.error_here("expected 'in' in comprehension".to_string()));
            }
            let iterable = self.parse_expr()?;
            let condition = if self.eat_keyword("if") {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            self.skip_whitespace();
            self.expect(']')?;
            return Ok(Expr::Comprehension {
                element: Box::new(first),
                var,
                iterable: Box::new(iterable),
                condition,
            });
        }

        let mut elements = vec![first];
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.next();
                    elements.push(self.parse_expr()?);
                }
                Some(']') => {
                    self.next();
                    break;
                }
                Some(ch) => {
                    return Err(
                        self.error_here(format!("expected ',' or ']', found '{}'", ch))
                    )
                }
                None => {
                    return Err(self.error_here("unexpected end of query, expected ']'".to_string()))
                }
            }
        }
        Ok(Expr::List(elements))
    }

    fn parse_string(&mut self) -> Result<Expr, QueryError> {
        let quote = match self.next() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error_here("expected string".to_string())),
        };

        let mut value = String::new();
        loop {
            match self.next() {
                Some(ch) if ch == quote => break,
                Some('\\') => match self.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('\'') => value.push('\''),
                    Some('"') => value.push('"'),
                    Some(ch) => {
                        return Err(
                            self.error_here(format!("invalid escape sequence '\\{}'", ch))
                        )
                    }
                    None => {
                        return Err(self.error_here("unexpected end of string".to_string()))
                    }
                },
                Some(ch) => value.push(ch),
                None => {
                    return Err(self.error_here(format!(
                        "unterminated string, expected closing quote {}",
                        quote
                    )))
                }
            }
        }
        Ok(Expr::Str(value))
    }

    fn parse_number(&mut self) -> Result<Expr, QueryError> {
        let start = self.position;
        let mut text = String::new();
        let mut is_float = false;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.next();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            text.push('.');
            self.next();
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    text.push(ch);
                    self.next();
                } else {
                    break;
                }
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let mut exp = String::from("e");
            let mut lookahead = 1;
            if matches!(self.peek_at(1), Some('+') | Some('-')) {
                exp.push(self.peek_at(1).unwrap());
                lookahead = 2;
            }
            if self.peek_at(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..lookahead {
                    self.next();
                }
                while let Some(ch) = self.peek() {
                    if ch.is_ascii_digit() {
                        exp.push(ch);
                        self.next();
                    } else {
                        break;
                    }
                }
                text.push_str(&exp);
            }
        }

        if is_float {
            text.parse::<f64>()
                .map(Expr::Float)
                .map_err(|_| self.error_at(start, format!("invalid number '{}'", text)))
        } else {
            text.parse::<i64>()
                .map(Expr::Integer)
                .map_err(|_| self.error_at(start, format!("number '{}' is too large", text)))
        }
    }

    fn parse_identifier(&mut self) -> Result<String, QueryError> {
        self.skip_whitespace();
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            Err(self.error_here("expected identifier".to_string()))
        } else {
            Ok(name)
        }
    }

    /// Consumes `keyword` if it appears next as a whole word.
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let saved = self.position;
        self.skip_whitespace();
        for expected in keyword.chars() {
            if self.peek() != Some(expected) {
                self.position = saved;
                return false;
            }
            self.next();
        }
        // word boundary
        if self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.position = saved;
            return false;
        }
        true
    }

    /// Consumes `s` if it appears next verbatim.
    fn eat_str(&mut self, s: &str) -> bool {
        let saved = self.position;
        for expected in s.chars() {
            if self.peek() != Some(expected) {
                self.position = saved;
                return false;
            }
            self.next();
        }
        true
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn expect(&mut self, expected: char) -> Result<(), QueryError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.next();
                Ok(())
            }
            Some(ch) => Err(self.error_here(format!(
                "expected '{}', found '{}'",
                expected, ch
            ))),
            None => Err(self.error_here(format!(
                "unexpected end of query, expected '{}'",
                expected
            ))),
        }
    }

    fn error_here(&self, message: String) -> QueryError {
        self.error_at(self.position, message)
    }

    fn error_at(&self, position: usize, message: String) -> QueryError {
        QueryError::Syntax { message, position }
    }
}
