//! Single-pass scanner and shunting-yard reordering.
//!
//! `tokenize` walks the source once, classifying characters as it goes,
//! and produces the postfix token queue the compiler consumes. Operator
//! ordering uses an operator stack against the static table; grouping,
//! calls, index access, array and object literals and the ternary ride
//! the same stack as context markers.
//!
//! Two scanning quirks are part of the language: a second `.` inside a
//! number starts a new literal (so `1.2.3` scans as `1.2` then `.3`),
//! and string literals take no escape processing, ending at the first
//! matching quote.

use crate::error::ExprError;
use crate::operators::{self, Associativity, OperatorDefinition};
use crate::token::{Token, TokenValue, ARG_COMPUTED, ARG_FUNCTION_NAME, ARG_IDENTIFIER, ARG_NONE};

/// Scans `input` into a postfix token queue.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    Tokenizer::new(input).run()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Operand,
    Operator,
    Open,
    Comma,
    Colon,
}

enum StackItem {
    Op(&'static OperatorDefinition),
    /// `(` used for grouping; vanishes at `)`.
    Group,
    /// `(` in call position; counts comma-separated arguments.
    Call { args: i32 },
    /// `[` in index position; closes into a computed `.` token.
    Index,
    /// `[` opening an array literal.
    ArrayLit { items: i32 },
    /// `{` opening an object literal.
    ObjectLit { colons: i32, commas: i32 },
    /// `?` awaiting its `:`.
    Ternary,
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    output: Vec<Token>,
    stack: Vec<StackItem>,
    prev: Prev,
    /// Whether the previous significant token was a numeric literal;
    /// decides `.`-after-operand between member access and a chained
    /// decimal.
    number_operand: bool,
    last_op: String,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$' || c == '@'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            pos: 0,
            output: Vec::new(),
            stack: Vec::new(),
            prev: Prev::Start,
            number_operand: false,
            last_op: String::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ExprError> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
                continue;
            }
            let starts_number = c.is_ascii_digit() || (c == '.' && self.starts_decimal());
            if starts_number {
                self.lex_number();
            } else {
                match c {
                    '.' => self.lex_member()?,
                    '\'' | '"' => self.lex_string()?,
                    c if is_ident_start(c) => self.lex_word()?,
                    '(' => self.open_paren(),
                    ')' => self.close_paren()?,
                    '[' => self.open_bracket(),
                    ']' => self.close_bracket()?,
                    '{' => self.open_brace(),
                    '}' => self.close_brace()?,
                    ',' => self.comma()?,
                    '?' => self.question()?,
                    ':' => self.colon()?,
                    ';' => {
                        return Err(ExprError::StraySemicolon {
                            expression: self.source(),
                        })
                    }
                    other => self.lex_operator(other)?,
                }
            }
            self.number_operand = starts_number;
        }
        self.finish()
    }

    // ---- character access

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance_by(&mut self, bytes: usize) {
        self.pos += bytes;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn digit_after_dot(&self) -> bool {
        self.input[self.pos..]
            .chars()
            .nth(1)
            .is_some_and(|c| c.is_ascii_digit())
    }

    /// Whether a `.` at the cursor begins a decimal literal. A digit has
    /// to follow, and the preceding token must not be a non-numeric
    /// operand: `a.1` reads the `1` property of `a`, while `1.2.3`
    /// chains a second literal off the completed `1.2`.
    fn starts_decimal(&self) -> bool {
        if !self.digit_after_dot() {
            return false;
        }
        self.prev != Prev::Operand || self.number_operand
    }

    fn source(&self) -> String {
        self.input.to_string()
    }

    fn missing_operand(&self) -> ExprError {
        ExprError::MissingOperand {
            operator: self.last_op.clone(),
            expression: self.source(),
        }
    }

    // ---- operands

    fn consume_digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn lex_number(&mut self) {
        let start = self.pos;
        self.consume_digits();
        if self.peek() == Some('.') {
            self.advance();
            self.consume_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let mut after = self.input[self.pos..].chars().skip(1);
            let exponent_follows = match after.next() {
                Some('+') | Some('-') => matches!(after.next(), Some(d) if d.is_ascii_digit()),
                Some(d) => d.is_ascii_digit(),
                None => false,
            };
            if exponent_follows {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                self.consume_digits();
            }
        }
        let value = self.input[start..self.pos].parse::<f64>().unwrap_or(f64::NAN);
        self.output.push(Token::number(value));
        self.prev = Prev::Operand;
    }

    fn lex_string(&mut self) -> Result<(), ExprError> {
        let start = self.pos;
        let Some(quote) = self.advance() else {
            return Err(ExprError::UnterminatedString {
                expression: self.source(),
            });
        };
        loop {
            match self.advance() {
                Some(c) if c == quote => break,
                Some(_) => {}
                None => {
                    return Err(ExprError::UnterminatedString {
                        expression: self.source(),
                    })
                }
            }
        }
        self.output
            .push(Token::text(&self.input[start..self.pos], ARG_NONE));
        self.prev = Prev::Operand;
        Ok(())
    }

    fn lex_word(&mut self) -> Result<(), ExprError> {
        let start = self.pos;
        if self.peek() == Some('@') {
            self.advance();
        }
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.advance();
        }
        let word = &self.input[start..self.pos];
        if word == "@" {
            return Err(ExprError::UnexpectedCharacter {
                found: '@',
                position: start,
                expression: self.source(),
            });
        }
        let arg_count = match word {
            "true" | "false" | "null" | "undefined" => ARG_NONE,
            _ => ARG_IDENTIFIER,
        };
        self.output.push(Token::text(word, arg_count));
        self.prev = Prev::Operand;
        Ok(())
    }

    /// Static member access: push the `.` operator, then emit the key
    /// word straight to the output so the accessor closes over it.
    fn lex_member(&mut self) -> Result<(), ExprError> {
        if self.prev == Prev::Operator {
            return Err(self.missing_operand());
        }
        if self.prev != Prev::Operand {
            self.last_op = ".".to_string();
            return Err(self.missing_operand());
        }
        self.advance();
        let dot = operators::member();
        self.flush_tighter(dot);
        self.stack.push(StackItem::Op(dot));
        self.last_op = ".".to_string();
        self.skip_whitespace();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.advance();
        }
        if start == self.pos {
            return Err(self.missing_operand());
        }
        self.output
            .push(Token::text(&self.input[start..self.pos], ARG_NONE));
        self.prev = Prev::Operand;
        Ok(())
    }

    // ---- grouping and literals

    fn open_paren(&mut self) {
        self.advance();
        if self.prev == Prev::Operand {
            self.flush_member_ops();
            self.mark_function_name();
            self.stack.push(StackItem::Call { args: 0 });
        } else {
            self.stack.push(StackItem::Group);
        }
        self.prev = Prev::Open;
    }

    fn close_paren(&mut self) -> Result<(), ExprError> {
        self.advance();
        if self.prev == Prev::Operator {
            return Err(self.missing_operand());
        }
        self.flush_to_context()?;
        match self.stack.pop() {
            Some(StackItem::Group) => {
                self.prev = Prev::Operand;
                Ok(())
            }
            Some(StackItem::Call { args }) => {
                let count = if self.prev == Prev::Operand { args + 1 } else { args };
                self.output.push(Token::text("()", count));
                self.prev = Prev::Operand;
                Ok(())
            }
            _ => Err(ExprError::MismatchedDelimiter {
                delimiter: ')',
                expression: self.source(),
            }),
        }
    }

    fn open_bracket(&mut self) {
        self.advance();
        if self.prev == Prev::Operand {
            self.flush_member_ops();
            self.stack.push(StackItem::Index);
        } else {
            self.stack.push(StackItem::ArrayLit { items: 0 });
        }
        self.prev = Prev::Open;
    }

    fn close_bracket(&mut self) -> Result<(), ExprError> {
        self.advance();
        if self.prev == Prev::Operator {
            return Err(self.missing_operand());
        }
        self.flush_to_context()?;
        match self.stack.pop() {
            Some(StackItem::Index) => {
                if self.prev != Prev::Operand {
                    self.last_op = "[]".to_string();
                    return Err(self.missing_operand());
                }
                self.output.push(Token::text(".", ARG_COMPUTED));
                self.prev = Prev::Operand;
                Ok(())
            }
            Some(StackItem::ArrayLit { items }) => {
                let count = items + if self.prev == Prev::Operand { 1 } else { 0 };
                let arg_count = if count == 0 { ARG_IDENTIFIER } else { count };
                self.output.push(Token::text("[]", arg_count));
                self.prev = Prev::Operand;
                Ok(())
            }
            _ => Err(ExprError::MismatchedDelimiter {
                delimiter: ']',
                expression: self.source(),
            }),
        }
    }

    fn open_brace(&mut self) {
        self.advance();
        self.stack.push(StackItem::ObjectLit {
            colons: 0,
            commas: 0,
        });
        self.prev = Prev::Open;
    }

    fn close_brace(&mut self) -> Result<(), ExprError> {
        self.advance();
        if self.prev == Prev::Operator {
            return Err(self.missing_operand());
        }
        self.flush_to_context()?;
        match self.stack.pop() {
            Some(StackItem::ObjectLit { colons, commas }) => {
                let has_content = self.prev == Prev::Operand || colons > 0 || commas > 0;
                let pairs = if !has_content {
                    0
                } else if self.prev == Prev::Operand && colons == commas + 1 {
                    colons
                } else if self.prev == Prev::Comma && colons == commas {
                    // trailing comma after a complete pair
                    colons
                } else {
                    return Err(ExprError::MalformedObject {
                        expression: self.source(),
                    });
                };
                self.output.push(Token::text("{}", pairs));
                self.prev = Prev::Operand;
                Ok(())
            }
            _ => Err(ExprError::MismatchedDelimiter {
                delimiter: '}',
                expression: self.source(),
            }),
        }
    }

    fn comma(&mut self) -> Result<(), ExprError> {
        self.advance();
        if self.prev == Prev::Operator {
            return Err(self.missing_operand());
        }
        if self.prev != Prev::Operand {
            return Err(ExprError::UnexpectedComma {
                expression: self.source(),
            });
        }
        self.flush_to_context()?;
        match self.stack.last_mut() {
            Some(StackItem::Call { args }) => *args += 1,
            Some(StackItem::ArrayLit { items }) => *items += 1,
            Some(StackItem::ObjectLit { commas, .. }) => *commas += 1,
            _ => {
                return Err(ExprError::UnexpectedComma {
                    expression: self.source(),
                })
            }
        }
        self.prev = Prev::Comma;
        Ok(())
    }

    // ---- ternary

    fn question(&mut self) -> Result<(), ExprError> {
        self.advance();
        if self.prev == Prev::Operator {
            return Err(self.missing_operand());
        }
        self.last_op = "?".to_string();
        if self.prev != Prev::Operand {
            return Err(self.missing_operand());
        }
        self.flush_tighter(operators::ternary());
        self.stack.push(StackItem::Ternary);
        self.prev = Prev::Operator;
        Ok(())
    }

    fn colon(&mut self) -> Result<(), ExprError> {
        self.advance();
        if self.prev == Prev::Operator {
            return Err(self.missing_operand());
        }
        self.last_op = ":".to_string();
        if self.prev != Prev::Operand {
            return Err(ExprError::UnexpectedColon {
                expression: self.source(),
            });
        }
        // pop completed operators; stop at any marker
        loop {
            let top = match self.stack.last() {
                Some(StackItem::Op(def)) => *def,
                _ => break,
            };
            self.stack.pop();
            self.emit_op(top);
        }
        if matches!(self.stack.last(), Some(StackItem::Ternary)) {
            self.stack.pop();
            self.stack.push(StackItem::Op(operators::ternary()));
        } else if let Some(StackItem::ObjectLit { colons, .. }) = self.stack.last_mut() {
            *colons += 1;
        } else {
            return Err(ExprError::UnexpectedColon {
                expression: self.source(),
            });
        }
        self.prev = Prev::Colon;
        Ok(())
    }

    // ---- operators

    fn lex_operator(&mut self, c: char) -> Result<(), ExprError> {
        let rest = &self.input[self.pos..];
        let Some(matched) = operators::match_symbol(rest) else {
            return Err(ExprError::UnexpectedCharacter {
                found: c,
                position: self.pos,
                expression: self.source(),
            });
        };
        let matched_len = matched.symbol.len();
        let unary_position = self.prev != Prev::Operand;

        let def = match matched.symbol {
            "+" if unary_position => operators::unary_plus(),
            "-" if unary_position => operators::unary_minus(),
            "++" | "--" if !unary_position => {
                // postfix form: the operand is already complete
                self.advance_by(matched_len);
                self.flush_tighter(matched);
                self.output.push(Token::text(matched.symbol, ARG_NONE));
                self.prev = Prev::Operand;
                return Ok(());
            }
            _ => matched,
        };

        self.advance_by(matched_len);
        self.flush_tighter(def);
        self.stack.push(StackItem::Op(def));
        self.last_op = def.symbol.to_string();
        self.prev = Prev::Operator;
        Ok(())
    }

    // ---- stack discipline

    fn emit_op(&mut self, def: &'static OperatorDefinition) {
        self.output.push(Token::text(def.symbol, ARG_NONE));
    }

    /// Pops operators that bind at least as tightly as `incoming`
    /// (strictly tighter for right-associative incomers).
    fn flush_tighter(&mut self, incoming: &'static OperatorDefinition) {
        loop {
            let top = match self.stack.last() {
                Some(StackItem::Op(def)) => *def,
                _ => break,
            };
            let pops = top.precedence < incoming.precedence
                || (top.precedence == incoming.precedence
                    && incoming.associativity == Associativity::Left);
            if !pops {
                break;
            }
            self.stack.pop();
            self.emit_op(top);
        }
    }

    /// Pops member accessors so a call or index applies to the whole
    /// chain built so far.
    fn flush_member_ops(&mut self) {
        let member_precedence = operators::member().precedence;
        loop {
            let top = match self.stack.last() {
                Some(StackItem::Op(def)) if def.precedence == member_precedence => *def,
                _ => break,
            };
            self.stack.pop();
            self.emit_op(top);
        }
    }

    /// Pops operators until a context marker; a pending `?` here means
    /// its `:` can no longer arrive.
    fn flush_to_context(&mut self) -> Result<(), ExprError> {
        loop {
            match self.stack.last() {
                Some(StackItem::Op(def)) => {
                    let def = *def;
                    self.stack.pop();
                    self.emit_op(def);
                }
                Some(StackItem::Ternary) => {
                    return Err(ExprError::MalformedTernary {
                        expression: self.source(),
                    })
                }
                _ => return Ok(()),
            }
        }
    }

    /// Retags a bare identifier that turned out to be a callee.
    fn mark_function_name(&mut self) {
        if let Some(last) = self.output.last_mut() {
            if last.arg_count == ARG_IDENTIFIER && matches!(last.value, TokenValue::Text(_)) {
                last.arg_count = ARG_FUNCTION_NAME;
            }
        }
    }

    fn finish(mut self) -> Result<Vec<Token>, ExprError> {
        if self.prev == Prev::Operator || self.prev == Prev::Colon {
            return Err(self.missing_operand());
        }
        while let Some(item) = self.stack.pop() {
            match item {
                StackItem::Op(def) => self.emit_op(def),
                StackItem::Ternary => {
                    return Err(ExprError::MalformedTernary {
                        expression: self.source(),
                    })
                }
                StackItem::Group | StackItem::Call { .. } => {
                    return Err(ExprError::MismatchedDelimiter {
                        delimiter: '(',
                        expression: self.source(),
                    })
                }
                StackItem::Index | StackItem::ArrayLit { .. } => {
                    return Err(ExprError::MismatchedDelimiter {
                        delimiter: '[',
                        expression: self.source(),
                    })
                }
                StackItem::ObjectLit { .. } => {
                    return Err(ExprError::MismatchedDelimiter {
                        delimiter: '{',
                        expression: self.source(),
                    })
                }
            }
        }
        Ok(self.output)
    }
}
