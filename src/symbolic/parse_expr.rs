//! a module turns a String expression into a symbolic expression
//!
//! # Example
//! ```rust, ignore
//! use RustedPDE::symbolic::symbolic_engine::Expr;
//! let input = "D*c^2 + exp(r)";
//! let parsed_expression = Expr::parse_expression(input);
//! println!(" parsed_expression {}", parsed_expression);
//! ```

use crate::symbolic::symbolic_engine::Expr;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' => {
                i += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // scientific notation: 1e-3, 2.5E+4
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let num_str: String = chars[start..i].iter().collect();
                let num = num_str
                    .parse::<f64>()
                    .unwrap_or_else(|_| panic!("malformed number: {}", num_str));
                tokens.push(Token::Num(num));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_')
                {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                tokens.push(Token::Ident(ident));
            }
            _ => panic!("unexpected character '{}' in expression {}", c, input),
        }
    }
    tokens
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

//  grammar (standard precedence, '^' is right-associative and binds
//  tighter than unary minus):
//      expr   := term (('+'|'-') term)*
//      term   := unary (('*'|'/') unary)*
//      unary  := '-' unary | power
//      power  := atom ('^' unary)?
//      atom   := number | ident | ident '(' expr ')' | '(' expr ')'
impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, token: Token) {
        let got = self.next();
        if got != Some(token.clone()) {
            panic!("expected {:?}, got {:?}", token, got);
        }
    }

    fn parse_expr(&mut self) -> Expr {
        let mut lhs = self.parse_term();
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Plus => {
                    self.next();
                    let rhs = self.parse_term();
                    lhs = Expr::Add(lhs.boxed(), rhs.boxed());
                }
                Token::Minus => {
                    self.next();
                    let rhs = self.parse_term();
                    lhs = Expr::Sub(lhs.boxed(), rhs.boxed());
                }
                _ => break,
            }
        }
        lhs
    }

    fn parse_term(&mut self) -> Expr {
        let mut lhs = self.parse_unary();
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Star => {
                    self.next();
                    let rhs = self.parse_unary();
                    lhs = Expr::Mul(lhs.boxed(), rhs.boxed());
                }
                Token::Slash => {
                    self.next();
                    let rhs = self.parse_unary();
                    lhs = Expr::Div(lhs.boxed(), rhs.boxed());
                }
                _ => break,
            }
        }
        lhs
    }

    fn parse_unary(&mut self) -> Expr {
        if self.peek() == Some(&Token::Minus) {
            self.next();
            let inner = self.parse_unary();
            return Expr::Mul(Expr::Const(-1.0).boxed(), inner.boxed());
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Expr {
        let base = self.parse_atom();
        if self.peek() == Some(&Token::Caret) {
            self.next();
            let exp = self.parse_unary();
            return Expr::Pow(base.boxed(), exp.boxed());
        }
        base
    }

    fn parse_atom(&mut self) -> Expr {
        match self.next() {
            Some(Token::Num(val)) => Expr::Const(val),
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.next();
                    let arg = self.parse_expr();
                    self.expect(Token::RParen);
                    match name.as_str() {
                        "exp" => Expr::Exp(arg.boxed()),
                        "ln" | "log" => Expr::Ln(arg.boxed()),
                        _ => panic!("unknown function name: {}", name),
                    }
                } else {
                    Expr::Var(name)
                }
            }
            Some(Token::LParen) => {
                let inner = self.parse_expr();
                self.expect(Token::RParen);
                inner
            }
            other => panic!("unexpected token {:?}", other),
        }
    }
}

impl Expr {
    /// Parses a string into a symbolic expression.
    ///
    /// Supported syntax: numbers (incl. scientific notation), variable names,
    /// `+ - * / ^`, parentheses, `exp(..)` and `ln(..)`/`log(..)`.
    ///
    /// # Panics
    /// Panics on malformed input.
    pub fn parse_expression(input: &str) -> Expr {
        let tokens = tokenize(input);
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_expr();
        if parser.pos != parser.tokens.len() {
            panic!(
                "unparsed trailing tokens in expression {}: {:?}",
                input,
                &parser.tokens[parser.pos..]
            );
        }
        expr
    }

    /// Parses a vector of strings into symbolic expressions.
    pub fn parse_vector_expression(input: Vec<&str>) -> Vec<Expr> {
        input.iter().map(|s| Expr::parse_expression(s)).collect()
    }
}
