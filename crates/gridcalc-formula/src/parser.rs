//! Formula parser
//!
//! A shunting-yard parser that turns tokens into a postfix [`Instruction`] stream,
//! extended with function calls, variadic argument counting and `ref:ref` ranges.
//!
//! Parsing never fails. Malformed input is compiled into [`Instruction::Error`]
//! instructions and parsing carries on; the evaluator reports the first one.

use crate::rpn::{BinaryOperator, Instruction, NEGATE_PRECEDENCE};
use crate::tokenizer::{tokenize, Token};
use gridcalc_core::{CellAddress, CellError, CellRange, SheetLimits};

/// Parse a formula string into a postfix instruction stream
///
/// References are checked against the default [`SheetLimits`].
///
/// # Example
/// ```rust
/// use gridcalc_formula::{parse_formula, rpn::to_postfix_string};
///
/// assert_eq!(to_postfix_string(&parse_formula("=1+2*3")), "1 2 3 * +");
/// assert_eq!(to_postfix_string(&parse_formula("=SUM(A1:A3)")), "A1:A3 SUM/1");
/// ```
pub fn parse_formula(formula: &str) -> Vec<Instruction> {
    parse_formula_with_limits(formula, &SheetLimits::default())
}

/// Parse a formula string, resolving references against the given limits
pub fn parse_formula_with_limits(formula: &str, limits: &SheetLimits) -> Vec<Instruction> {
    parse_tokens(tokenize(formula), limits)
}

/// Parse an already tokenized formula
pub fn parse_tokens(tokens: Vec<Token>, limits: &SheetLimits) -> Vec<Instruction> {
    let items = resolve_references(tokens, limits);
    let mut parser = FormulaParser::new(items);
    parser.parse();
    parser.output
}

/// Token after reference resolution
#[derive(Debug, Clone, PartialEq)]
enum Item {
    Token(Token),
    Ref(CellAddress),
    BadRef,
}

/// Fuse `RefStart` + `RowNumber` pairs into resolved references
///
/// A pair directly followed by `(` is a function name (`LOG10`) instead.
fn resolve_references(tokens: Vec<Token>, limits: &SheetLimits) -> Vec<Item> {
    let mut items = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        let letters = match token {
            Token::RefStart(letters) => letters,
            other => {
                items.push(Item::Token(other));
                continue;
            }
        };

        // Letters without digits are never emitted as RefStart; be lenient
        let digits = match iter.next_if(|t| matches!(t, Token::RowNumber(_))) {
            Some(Token::RowNumber(digits)) => digits,
            _ => {
                items.push(Item::Token(Token::Identifier(letters)));
                continue;
            }
        };

        if iter.peek() == Some(&Token::LeftParen) {
            items.push(Item::Token(Token::Identifier(format!("{}{}", letters, digits))));
            continue;
        }

        items.push(resolve_reference(&letters, &digits, limits));
    }

    items
}

fn resolve_reference(letters: &str, digits: &str, limits: &SheetLimits) -> Item {
    let col = CellAddress::letters_to_column(letters).ok();
    let row = CellAddress::parse_row_number(digits);

    match (row, col) {
        (Some(row), Some(col)) => {
            let addr = CellAddress::new(row, col);
            if limits.contains(&addr) {
                Item::Ref(addr)
            } else {
                Item::BadRef
            }
        }
        _ => Item::BadRef,
    }
}

/// Entries of the operator stack
#[derive(Debug)]
enum StackEntry {
    Binary(BinaryOperator),
    Negate,
    LeftParen,
    Function { name: String, commas: usize },
}

impl StackEntry {
    fn precedence(&self) -> Option<u8> {
        match self {
            StackEntry::Binary(op) => Some(op.precedence()),
            StackEntry::Negate => Some(NEGATE_PRECEDENCE),
            StackEntry::LeftParen | StackEntry::Function { .. } => None,
        }
    }
}

struct FormulaParser {
    items: Vec<Item>,
    pos: usize,
    output: Vec<Instruction>,
    stack: Vec<StackEntry>,
    /// True where an operand is expected (start, after an operator, `(` or `,`)
    expect_operand: bool,
    /// True right after a function's opening parenthesis
    call_opened: bool,
}

impl FormulaParser {
    fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            pos: 0,
            output: Vec::new(),
            stack: Vec::new(),
            expect_operand: true,
            call_opened: false,
        }
    }

    fn parse(&mut self) {
        while let Some(item) = self.next_item() {
            let call_opened = std::mem::replace(&mut self.call_opened, false);

            match item {
                Item::Ref(addr) => self.parse_reference(addr),
                Item::BadRef => self.parse_bad_reference(),
                Item::Token(token) => self.parse_token(token, call_opened),
            }
        }

        self.finish();
    }

    fn parse_token(&mut self, token: Token, call_opened: bool) {
        match token {
            Token::Number(n) => self.push_operand(Instruction::Number(n)),
            Token::String(s) => self.push_operand(Instruction::Text(s)),
            Token::Identifier(name) => self.parse_identifier(name),

            Token::Plus if self.expect_operand => {} // Unary plus is a no-op
            Token::Minus if self.expect_operand => self.stack.push(StackEntry::Negate),

            Token::Plus => self.push_binary(BinaryOperator::Add),
            Token::Minus => self.push_binary(BinaryOperator::Subtract),
            Token::Star => self.push_binary(BinaryOperator::Multiply),
            Token::Slash => self.push_binary(BinaryOperator::Divide),
            Token::Caret => self.push_binary(BinaryOperator::Power),
            Token::Equal => self.push_binary(BinaryOperator::Equal),
            Token::NotEqual => self.push_binary(BinaryOperator::NotEqual),
            Token::LessThan => self.push_binary(BinaryOperator::LessThan),
            Token::LessEqual => self.push_binary(BinaryOperator::LessEqual),
            Token::GreaterThan => self.push_binary(BinaryOperator::GreaterThan),
            Token::GreaterEqual => self.push_binary(BinaryOperator::GreaterEqual),

            Token::LeftParen => {
                self.stack.push(StackEntry::LeftParen);
                self.expect_operand = true;
            }
            Token::RightParen => self.parse_right_paren(call_opened),
            Token::Comma => self.parse_comma(),

            // A colon is only valid between two references
            Token::Colon => self.emit_error(CellError::Error),

            // Orphan digits cannot come out of the tokenizer
            Token::RowNumber(_) | Token::RefStart(_) | Token::Unknown(_) => {
                self.emit_error(CellError::Error)
            }
        }
    }

    fn parse_reference(&mut self, start: CellAddress) {
        if self.peek_item() != Some(&Item::Token(Token::Colon)) {
            self.push_operand(Instruction::Ref(start));
            return;
        }

        match self.items.get(self.pos + 1) {
            Some(Item::Ref(end)) => {
                let end = *end;
                self.pos += 2;
                self.push_operand(Instruction::Range(CellRange::new(start, end)));
            }
            Some(Item::BadRef) => {
                self.pos += 2;
                self.emit_error(CellError::Ref);
            }
            // Leave the colon to be reported on its own
            _ => self.push_operand(Instruction::Ref(start)),
        }
    }

    fn parse_bad_reference(&mut self) {
        // Swallow a range tail so `A0:B2` yields a single #REF!
        if self.peek_item() == Some(&Item::Token(Token::Colon)) {
            if let Some(Item::Ref(_) | Item::BadRef) = self.items.get(self.pos + 1) {
                self.pos += 2;
            }
        }
        self.emit_error(CellError::Ref);
    }

    fn parse_identifier(&mut self, name: String) {
        if self.peek_item() == Some(&Item::Token(Token::LeftParen)) {
            self.pos += 1;
            self.stack.push(StackEntry::Function { name, commas: 0 });
            self.expect_operand = true;
            self.call_opened = true;
        } else {
            self.emit_error(CellError::Name);
        }
    }

    fn parse_comma(&mut self) {
        self.pop_operators();

        match self.stack.last_mut() {
            Some(StackEntry::Function { commas, .. }) => *commas += 1,
            _ => self.emit_error(CellError::Error),
        }
        self.expect_operand = true;
    }

    fn parse_right_paren(&mut self, call_opened: bool) {
        self.pop_operators();

        match self.stack.pop() {
            Some(StackEntry::LeftParen) => {}
            Some(StackEntry::Function { name, commas }) => {
                let argc = if call_opened { 0 } else { commas + 1 };
                self.output.push(Instruction::Call { name, argc });
            }
            _ => self.emit_error(CellError::Error),
        }
        self.expect_operand = false;
    }

    fn finish(&mut self) {
        while let Some(entry) = self.stack.pop() {
            match entry {
                StackEntry::Binary(op) => self.output.push(Instruction::Binary(op)),
                StackEntry::Negate => self.output.push(Instruction::Negate),
                StackEntry::LeftParen | StackEntry::Function { .. } => {
                    self.output.push(Instruction::Error(CellError::Error))
                }
            }
        }
    }

    // === Helper methods ===

    fn push_operand(&mut self, instruction: Instruction) {
        self.output.push(instruction);
        self.expect_operand = false;
    }

    fn emit_error(&mut self, err: CellError) {
        self.output.push(Instruction::Error(err));
        self.expect_operand = false;
    }

    fn push_binary(&mut self, op: BinaryOperator) {
        let prec = op.precedence();
        while let Some(top) = self.stack.last().and_then(StackEntry::precedence) {
            let pops = top > prec || (top == prec && !op.is_right_associative());
            if !pops {
                break;
            }
            self.pop_one();
        }
        self.stack.push(StackEntry::Binary(op));
        self.expect_operand = true;
    }

    /// Pop operators until a parenthesis or function marker is on top
    fn pop_operators(&mut self) {
        while self.stack.last().and_then(StackEntry::precedence).is_some() {
            self.pop_one();
        }
    }

    fn pop_one(&mut self) {
        match self.stack.pop() {
            Some(StackEntry::Binary(op)) => self.output.push(Instruction::Binary(op)),
            Some(StackEntry::Negate) => self.output.push(Instruction::Negate),
            Some(entry) => self.stack.push(entry),
            None => {}
        }
    }

    fn next_item(&mut self) -> Option<Item> {
        let item = self.items.get(self.pos).cloned();
        self.pos += 1;
        item
    }

    fn peek_item(&self) -> Option<&Item> {
        self.items.get(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpn::to_postfix_string;
    use pretty_assertions::assert_eq;

    fn postfix(formula: &str) -> String {
        to_postfix_string(&parse_formula(formula))
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(postfix("=1+2*3"), "1 2 3 * +");
        assert_eq!(postfix("=(1+2)*3"), "1 2 + 3 *");
        assert_eq!(postfix("=1-2-3"), "1 2 - 3 -");
        assert_eq!(postfix("=2^3^2"), "2 3 2 ^ ^");
        assert_eq!(postfix("=1+2>2*1"), "1 2 + 2 1 * >");
    }

    #[test]
    fn test_parse_unary() {
        assert_eq!(postfix("=-2^2"), "2 NEG 2 ^");
        assert_eq!(postfix("=3*-A1"), "3 A1 NEG *");
        assert_eq!(postfix("=+5"), "5");
        assert_eq!(postfix("=1--1"), "1 1 NEG -");
    }

    #[test]
    fn test_parse_references() {
        assert_eq!(postfix("=a1+ZZ100"), "A1 ZZ100 +");
        assert_eq!(postfix("=B3:A1"), "A1:B3");
    }

    #[test]
    fn test_parse_function_calls() {
        assert_eq!(postfix("=SUM(A1:A3)"), "A1:A3 SUM/1");
        assert_eq!(postfix("=PI()"), "PI/0");
        assert_eq!(postfix("=MAX(1, 2+3, 4)"), "1 2 3 + 4 MAX/3");
        assert_eq!(postfix("=IF(A1>0,SUM(1,2),-1)"), "A1 0 > 1 2 SUM/2 1 NEG IF/3");
        assert_eq!(postfix("=LOG10(100)"), "100 LOG10/1");
        assert_eq!(postfix("=SUM((1+2))"), "1 2 + SUM/1");
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(
            parse_formula(r#"=CONCAT("a", 1)"#),
            vec![
                Instruction::Text("a".into()),
                Instruction::Number(1.0),
                Instruction::Call {
                    name: "CONCAT".into(),
                    argc: 2
                },
            ]
        );
    }

    #[test]
    fn test_parse_name_error() {
        assert_eq!(postfix("=foo+1"), "#NAME? 1 +");
    }

    #[test]
    fn test_parse_ref_errors() {
        assert_eq!(postfix("=A0"), "#REF!");
        assert_eq!(postfix("=A99999999999"), "#REF!");
        assert_eq!(postfix("=A10001"), "#REF!");
        assert_eq!(postfix("=SUM(A0:B2)"), "#REF! SUM/1");

        let limits = SheetLimits::new(10, 2);
        let program = parse_formula_with_limits("=C1", &limits);
        assert_eq!(program, vec![Instruction::Error(CellError::Ref)]);
    }

    #[test]
    fn test_parse_syntax_errors() {
        assert_eq!(postfix("=(1+2"), "1 2 + #ERROR");
        assert_eq!(postfix("=1+2)"), "1 2 + #ERROR");
        assert_eq!(postfix("=1,2"), "1 #ERROR 2");
        assert_eq!(postfix("=1:2"), "1 #ERROR 2");
        assert_eq!(postfix("=1 & 2"), "1 #ERROR 2");
        assert_eq!(postfix("=SUM(1"), "1 #ERROR");
    }
}
