use std::fmt;

/// Function-name identifier: the token is a bare identifier immediately
/// followed by a call.
pub const ARG_FUNCTION_NAME: i32 = -2;
/// Plain identifier, or the empty array literal `[]`.
pub const ARG_IDENTIFIER: i32 = -1;
/// Literal, operator, static member access, zero-argument call or empty
/// object literal.
pub const ARG_NONE: i32 = 0;
/// Computed index form of the `.` accessor (`base[index]`).
pub const ARG_COMPUTED: i32 = 1;

/// One entry of the postfix token queue the tokenizer produces.
///
/// `arg_count` is overloaded the way the queue consumer expects it:
/// negative values tag identifiers ([`ARG_IDENTIFIER`],
/// [`ARG_FUNCTION_NAME`]) and the empty array literal, zero covers
/// literals, operators and static member access, and positive values
/// carry an arity: call argument count for `()`, element count for `[]`,
/// pair count for `{}`, and [`ARG_COMPUTED`] on `.` for a computed index.
///
/// Operator tokens use the table symbol as their text; unary plus and
/// minus appear as `u+` / `u-` so they stay distinct from their binary
/// forms. String literal tokens keep their surrounding quotes. An
/// identifier beginning with `@` names a template alias.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub value: TokenValue,
    pub arg_count: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    Text(String),
    Number(f64),
}

impl Token {
    pub fn text(value: impl Into<String>, arg_count: i32) -> Token {
        Token {
            value: TokenValue::Text(value.into()),
            arg_count,
        }
    }

    pub fn number(value: f64) -> Token {
        Token {
            value: TokenValue::Number(value),
            arg_count: ARG_NONE,
        }
    }

    /// The token text, when it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(text) => Some(text),
            TokenValue::Number(_) => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::Text(text) => write!(f, "{}/{}", text, self.arg_count),
            TokenValue::Number(n) => write!(f, "{}/{}", n, self.arg_count),
        }
    }
}
