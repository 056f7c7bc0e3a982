//! Formula tokenizer
//!
//! Turns formula source into a flat token list. The tokenizer never fails: characters
//! it does not understand become [`Token::Unknown`] and are reported by the parser.
//!
//! A cell reference such as `B12` is emitted as two tokens, [`Token::RefStart`] with
//! the column letters and [`Token::RowNumber`] with the digits. The parser decides
//! whether the pair is a reference or part of a function name like `LOG10`.

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(f64),
    String(String),

    // Names and references
    Identifier(String),
    RefStart(String),
    RowNumber(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,
    Colon,

    /// Any character outside the formula grammar
    Unknown(char),
}

/// Tokenize a formula
///
/// A leading `=` (after trimming) is stripped first.
///
/// # Example
/// ```rust
/// use gridcalc_formula::tokenizer::{tokenize, Token};
///
/// let tokens = tokenize("=A1+2");
/// assert_eq!(
///     tokens,
///     vec![
///         Token::RefStart("A".into()),
///         Token::RowNumber("1".into()),
///         Token::Plus,
///         Token::Number(2.0),
///     ]
/// );
/// ```
pub fn tokenize(source: &str) -> Vec<Token> {
    let source = source.trim();
    let source = source.strip_prefix('=').unwrap_or(source);

    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.scan_token() {
        tokens.push(token);
    }
    tokens
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a letter run so the following digits become a row number
    pending_row: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending_row: false,
        }
    }

    // === Token scanning ===

    fn scan_token(&mut self) -> Option<Token> {
        if self.pending_row {
            self.pending_row = false;
            return Some(self.scan_row_number());
        }

        self.skip_whitespace();

        let c = self.peek_char()?;

        let token = match c {
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' => self.single(Token::Star),
            '/' => self.single(Token::Slash),
            '^' => self.single(Token::Caret),
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            ',' => self.single(Token::Comma),
            ':' => self.single(Token::Colon),
            '=' => self.single(Token::Equal),
            '<' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => self.single(Token::LessEqual),
                    Some('>') => self.single(Token::NotEqual),
                    _ => Token::LessThan,
                }
            }
            '>' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.single(Token::GreaterEqual)
                } else {
                    Token::GreaterThan
                }
            }
            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            '.' if self.peek_char_at(1).map_or(false, |c| c.is_ascii_digit()) => {
                self.scan_number()
            }
            c if c.is_ascii_alphabetic() => self.scan_letters(),
            other => self.single(Token::Unknown(other)),
        };

        Some(token)
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn scan_string(&mut self) -> Token {
        self.advance(); // Skip opening quote

        let mut s = String::new();
        while let Some(c) = self.peek_char() {
            if c == '"' {
                // Check for escaped quote ("")
                if self.peek_char_at(1) == Some('"') {
                    s.push('"');
                    self.advance();
                    self.advance();
                } else {
                    break;
                }
            } else {
                s.push(c);
                self.advance();
            }
        }

        // Skip closing quote (an unterminated literal runs to end of input)
        if self.peek_char() == Some('"') {
            self.advance();
        }

        Token::String(s)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;

        // Integer part
        self.skip_digits();

        // Decimal part, at most one point
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        let num_str = &self.input[start..self.pos];
        match num_str.parse::<f64>() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Unknown('.'),
        }
    }

    fn scan_letters(&mut self) -> Token {
        let start = self.pos;
        while self.peek_char().map_or(false, |c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        let letters = self.input[start..self.pos].to_string();

        if self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.pending_row = true;
            Token::RefStart(letters)
        } else {
            Token::Identifier(letters)
        }
    }

    fn scan_row_number(&mut self) -> Token {
        let start = self.pos;
        self.skip_digits();
        Token::RowNumber(self.input[start..self.pos].to_string())
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            tokenize("=1 + 2.5*3"),
            vec![
                Token::Number(1.0),
                Token::Plus,
                Token::Number(2.5),
                Token::Star,
                Token::Number(3.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_leading_point() {
        assert_eq!(tokenize(".5"), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("1.2.3"), vec![Token::Number(1.2), Token::Number(0.3)]);
    }

    #[test]
    fn test_tokenize_reference_split() {
        assert_eq!(
            tokenize("=SUM(a1:B12)"),
            vec![
                Token::Identifier("SUM".into()),
                Token::LeftParen,
                Token::RefStart("a".into()),
                Token::RowNumber("1".into()),
                Token::Colon,
                Token::RefStart("B".into()),
                Token::RowNumber("12".into()),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_comparison() {
        assert_eq!(
            tokenize("1<>2<=3>=4<5>6=7"),
            vec![
                Token::Number(1.0),
                Token::NotEqual,
                Token::Number(2.0),
                Token::LessEqual,
                Token::Number(3.0),
                Token::GreaterEqual,
                Token::Number(4.0),
                Token::LessThan,
                Token::Number(5.0),
                Token::GreaterThan,
                Token::Number(6.0),
                Token::Equal,
                Token::Number(7.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_string() {
        assert_eq!(
            tokenize(r#"="say ""hi""", "x"#),
            vec![
                Token::String("say \"hi\"".into()),
                Token::Comma,
                Token::String("x".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_unknown() {
        assert_eq!(
            tokenize("1 & $A1"),
            vec![
                Token::Number(1.0),
                Token::Unknown('&'),
                Token::Unknown('$'),
                Token::RefStart("A".into()),
                Token::RowNumber("1".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("=").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
