mod error;
mod expr;
mod stmt;
mod token_cursor;

use errors::{LoxError, LoxErrors};
use scanner::{Token, TokenKind};

pub use error::{ParserError, ParserErrorType};
pub use expr::{Expr, LiteralValue};
pub use stmt::Stmt;
pub use token_cursor::{CursorError, TokenCursor};

use TokenKind::*;

type Result<T> = std::result::Result<T, ParserError>;

/// Whether a bare expression statement has to end with `;`.
///
/// `print` statements always need one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpressionTerminator {
    /// A trailing `;` is consumed when present.
    #[default]
    Optional,
    Required,
}

/// Tokens at which a statement may begin, used to resume after an error.
const STATEMENT_KEYWORDS: [TokenKind; 8] = [Class, Fun, Var, For, If, While, Print, Return];

/// Groupings and unary operators deeper than this are rejected instead of
/// recursing until the stack runs out.
pub const MAX_NESTING_DEPTH: usize = 128;

#[derive(Debug)]
pub struct Parser<'t, 'a> {
    cursor: TokenCursor<'t, 'a>,
    terminator: ExpressionTerminator,
    depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> std::result::Result<Self, CursorError> {
        Self::with_terminator(tokens, ExpressionTerminator::default())
    }

    pub fn with_terminator(
        tokens: &'t [Token<'a>],
        terminator: ExpressionTerminator,
    ) -> std::result::Result<Self, CursorError> {
        Ok(Self { cursor: TokenCursor::new(tokens)?, terminator, depth: 0 })
    }

    /// Parses statements until the end marker.
    ///
    /// After a failed statement the parser resynchronizes and keeps going, so
    /// the error list holds every error found in one pass.
    pub fn parse(mut self) -> std::result::Result<Vec<Stmt<'a>>, LoxErrors> {
        let mut errors = LoxErrors::default();
        let mut stmts = Vec::new();

        while !self.cursor.is_at_end() {
            let start = self.cursor.position();
            match self.statement() {
                Ok(stmt) => {
                    log::debug!("parsed {}", stmt);
                    stmts.push(stmt)
                }
                Err(e) => {
                    log::debug!("{}", e);
                    errors.push(e.into());
                    self.synchronize(start);
                }
            }
        }

        if errors.is_empty() {
            Ok(stmts)
        } else {
            Err(errors)
        }
    }

    /// Parses a single expression that has to span the whole token stream.
    pub fn parse_expression(mut self) -> std::result::Result<Expr<'a>, LoxError> {
        let expr = self.expression()?;

        if !self.cursor.is_at_end() {
            let token = self.cursor.peek();
            return Err(ParserError::new(ParserErrorType::ExpectedEndOfExpression, token).into());
        }

        Ok(expr)
    }

    fn statement(&mut self) -> Result<Stmt<'a>> {
        if self.cursor.match_any(&[Print]) {
            return self.print_statement();
        }

        self.expression_statement()
    }

    fn print_statement(&mut self) -> Result<Stmt<'a>> {
        let value = self.expression()?;

        self.cursor.consume(Semicolon, ParserErrorType::ExpectedSemicolonAfterValue)?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<Stmt<'a>> {
        let value = self.expression()?;

        match self.terminator {
            ExpressionTerminator::Optional => {
                self.cursor.match_any(&[Semicolon]);
            }
            ExpressionTerminator::Required => {
                self.cursor.consume(Semicolon, ParserErrorType::ExpectedSemicolonAfterExpression)?;
            }
        }

        Ok(Stmt::Expression(value))
    }

    fn expression(&mut self) -> Result<Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        self.left_associative(&[BangEqual, EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        self.left_associative(&[Greater, GreaterEqual, Less, LessEqual], Self::term)
    }

    fn term(&mut self) -> Result<Expr<'a>> {
        self.left_associative(&[Minus, Plus], Self::factor)
    }

    fn factor(&mut self) -> Result<Expr<'a>> {
        self.left_associative(&[Slash, Star], Self::unary)
    }

    /// One binary precedence level: `operand (operator operand)*`, folded to the left.
    fn left_associative(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> Result<Expr<'a>>,
    ) -> Result<Expr<'a>> {
        let mut expr = operand(self)?;

        while let Some(&operator) = self.cursor.match_token(operators) {
            let right = operand(self)?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'a>> {
        if let Some(&operator) = self.cursor.match_token(&[Bang, Minus]) {
            let operand = self.nested(Self::unary)?;
            return Ok(Expr::unary(operator, operand));
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        if self.cursor.match_any(&[False]) {
            return Ok(Expr::Literal(LiteralValue::Boolean(false)));
        }
        if self.cursor.match_any(&[True]) {
            return Ok(Expr::Literal(LiteralValue::Boolean(true)));
        }
        if self.cursor.match_any(&[Nil]) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        if let Some(token) = self.cursor.match_token(&[Number, Str]) {
            // The scanner always attaches a literal to these; treat a missing one as nil.
            let value = token.literal.map_or(LiteralValue::Nil, LiteralValue::from);
            return Ok(Expr::Literal(value));
        }

        if self.cursor.match_any(&[LeftParen]) {
            let expr = self.nested(Self::expression)?;
            self.cursor.consume(RightParen, ParserErrorType::MissingRightParen)?;
            return Ok(Expr::grouping(expr));
        }

        let token = self.cursor.peek();
        Err(ParserError::new(ParserErrorType::UnexpectedToken(token.lexeme.to_string()), token))
    }

    /// Runs `rule` one nesting level deeper, failing at the current token once
    /// [`MAX_NESTING_DEPTH`] is reached.
    fn nested(&mut self, rule: fn(&mut Self) -> Result<Expr<'a>>) -> Result<Expr<'a>> {
        if self.depth >= MAX_NESTING_DEPTH {
            let error = ParserErrorType::TooDeeplyNested(MAX_NESTING_DEPTH);
            return Err(ParserError::new(error, self.cursor.peek()));
        }

        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Skips to the next likely statement boundary: just after a `;`, or just
    /// before a statement keyword. Always moves past at least one token when
    /// the failed statement consumed none, so parsing cannot get stuck.
    fn synchronize(&mut self, statement_start: usize) {
        if self.cursor.position() == statement_start {
            self.cursor.advance();
        }

        while !self.cursor.is_at_end() {
            if self.cursor.previous().is_some_and(|t| t.kind == Semicolon) {
                break;
            }
            if STATEMENT_KEYWORDS.contains(&self.cursor.peek().kind) {
                break;
            }
            self.cursor.advance();
        }

        let token = self.cursor.peek();
        log::debug!("resynchronized at '{}' ({})", token, token.position());
    }
}

#[cfg(test)]
mod tests {
    use cursor::{Col, Line, Position};
    use pretty_assertions::assert_eq;
    use scanner::scan;

    use super::*;

    #[ctor::ctor]
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn parse(source: &str) -> std::result::Result<Vec<String>, LoxErrors> {
        let tokens = scan(source).unwrap();
        let stmts = Parser::new(&tokens).unwrap().parse()?;
        Ok(stmts.iter().map(|s| s.to_string()).collect())
    }

    fn parse_strict(source: &str) -> std::result::Result<Vec<String>, LoxErrors> {
        let tokens = scan(source).unwrap();
        let parser = Parser::with_terminator(&tokens, ExpressionTerminator::Required).unwrap();
        Ok(parser.parse()?.iter().map(|s| s.to_string()).collect())
    }

    fn render_expression(source: &str) -> String {
        let tokens = scan(source).unwrap();
        Parser::new(&tokens).unwrap().parse_expression().unwrap().to_string()
    }

    fn error(line: usize, col: usize, error: ParserErrorType) -> LoxError {
        LoxError { line: Line(line), col: Col(col), message: error.to_string() }
    }

    fn at(line: usize, col: usize) -> Position {
        Position::new(Line(line), Col(col))
    }

    #[test]
    fn single_number_literal() {
        for (lexeme, n) in [("0", 0.0), ("7", 7.0), ("3.5", 3.5), ("1234.0625", 1234.0625)] {
            let tokens = [
                Token::new(Number, lexeme, at(1, 1)).with_literal(scanner::Literal::Number(n)),
                Token::new(Eof, "", at(1, lexeme.len() + 1)),
            ];
            let stmts = Parser::new(&tokens).unwrap().parse().unwrap();
            assert_eq!(stmts, vec![Stmt::Expression(Expr::Literal(LiteralValue::Number(n)))]);
        }
    }

    #[test]
    fn empty_stream() {
        assert_eq!(Parser::new(&[]).unwrap_err(), CursorError::OutOfBounds);
        assert_eq!(parse("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn left_associative() {
        let minus = |col| Token::new(Minus, "-", at(1, col));
        let number = |n| Expr::Literal(LiteralValue::Number(n));
        let expected =
            Expr::binary(Expr::binary(number(1.0), minus(3), number(2.0)), minus(7), number(3.0));

        let tokens = scan("1 - 2 - 3").unwrap();
        let parsed = Parser::new(&tokens).unwrap().parse_expression().unwrap();

        assert_eq!(parsed.to_string(), expected.to_string());
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), "((1 2 -) 3 -)");

        assert_eq!(render_expression("8 / 4 / 2"), "((8 4 /) 2 /)");
        assert_eq!(render_expression("1 < 2 < 3"), "((1 2 <) 3 <)");
        assert_eq!(render_expression("1 == 2 != 3"), "((1 2 ==) 3 !=)");
    }

    #[test]
    fn precedence() {
        assert_eq!(render_expression("1 + 2 * 3"), "(1 (2 3 *) +)");
        assert_eq!(render_expression("1 * 2 + 3"), "((1 2 *) 3 +)");
        assert_eq!(render_expression("1 == 2 < 3 + 4 * -5"), "(1 (2 (3 (4 (- 5) *) +) <) ==)");
        assert_eq!(render_expression("(1 + 2) * 3"), "((group (1 2 +)) 3 *)");
        assert_eq!(render_expression("!true == false"), "((! true) false ==)");
    }

    #[test]
    fn unary_chains_nest_to_the_right() {
        let tokens = scan("- - 5").unwrap();
        let parsed = Parser::new(&tokens).unwrap().parse_expression().unwrap();

        let Expr::Unary { operator: outer, operand } = parsed else { panic!("expected unary") };
        let Expr::Unary { operator: inner, operand } = *operand else {
            panic!("expected nested unary")
        };
        assert_eq!((outer.kind, outer.col), (Minus, Col(1)));
        assert_eq!((inner.kind, inner.col), (Minus, Col(3)));
        assert_eq!(*operand, Expr::Literal(LiteralValue::Number(5.0)));

        assert_eq!(render_expression("!!true"), "(! (! true))");
    }

    #[test]
    fn operator_is_the_consumed_token() {
        let tokens = scan("1\n  >= 2").unwrap();
        let parsed = Parser::new(&tokens).unwrap().parse_expression().unwrap();

        let Expr::Binary { operator, .. } = parsed else { panic!("expected binary") };
        assert_eq!(operator, tokens[1]);
    }

    #[test]
    fn literals() {
        assert_eq!(
            parse("nil; true; false; \"some text\"; 12.5;").unwrap(),
            vec!["(expr nil)", "(expr true)", "(expr false)", "(expr some text)", "(expr 12.5)"]
        );
    }

    #[test]
    fn grouping() {
        assert_eq!(render_expression("(true)"), "(group true)");
        assert_eq!(render_expression("((1))"), "(group (group 1))");
    }

    #[test]
    fn rendering_is_stable_for_literals() {
        for source in ["1", "2.5", "true", "false", "nil"] {
            let rendered = render_expression(source);
            assert_eq!(rendered, source);
            assert_eq!(render_expression(&rendered), rendered);
        }
    }

    #[test]
    fn missing_right_paren() {
        assert_eq!(
            parse("(1 + 2").unwrap_err(),
            LoxErrors(vec![error(1, 7, ParserErrorType::MissingRightParen)])
        );
    }

    #[test]
    fn print_without_semicolon() {
        assert_eq!(
            parse("print 1").unwrap_err(),
            LoxErrors(vec![error(1, 8, ParserErrorType::ExpectedSemicolonAfterValue)])
        );
    }

    #[test]
    fn print_statements() {
        assert_eq!(
            parse("print 1 + 2;\nprint \"hi\";").unwrap(),
            vec!["(print (1 2 +))", "(print hi)"]
        );
    }

    #[test]
    fn unexpected_token() {
        assert_eq!(
            parse("1 + ;").unwrap_err(),
            LoxErrors(vec![error(1, 5, ParserErrorType::UnexpectedToken(";".to_string()))])
        );
        assert_eq!(
            parse("print").unwrap_err(),
            LoxErrors(vec![error(1, 6, ParserErrorType::UnexpectedToken("".to_string()))])
        );
    }

    #[test]
    fn expression_terminator_is_optional_by_default() {
        assert_eq!(parse("1 2; 3").unwrap(), vec!["(expr 1)", "(expr 2)", "(expr 3)"]);
    }

    #[test]
    fn expression_terminator_can_be_required() {
        assert_eq!(parse_strict("1; -2;").unwrap(), vec!["(expr 1)", "(expr (- 2))"]);
        assert_eq!(
            parse_strict("1").unwrap_err(),
            LoxErrors(vec![error(1, 2, ParserErrorType::ExpectedSemicolonAfterExpression)])
        );
    }

    #[test]
    fn synchronize_after_error() {
        let source = "print 1 print 2;\n(3;\nprint 4;";
        assert_eq!(
            parse(source).unwrap_err(),
            LoxErrors(vec![
                error(1, 9, ParserErrorType::ExpectedSemicolonAfterValue),
                error(2, 3, ParserErrorType::MissingRightParen),
            ])
        );
    }

    #[test]
    fn synchronize_skips_unsupported_statements() {
        assert_eq!(
            parse("var x = 1; print 2;\n)").unwrap_err(),
            LoxErrors(vec![
                error(1, 1, ParserErrorType::UnexpectedToken("var".to_string())),
                error(2, 1, ParserErrorType::UnexpectedToken(")".to_string())),
            ])
        );
    }

    #[test]
    fn expression_must_span_all_tokens() {
        let tokens = scan("1 2").unwrap();
        assert_eq!(
            Parser::new(&tokens).unwrap().parse_expression().unwrap_err(),
            error(1, 3, ParserErrorType::ExpectedEndOfExpression)
        );
    }

    #[test]
    fn unterminated_expression_continues_into_next_line() {
        assert_eq!(parse("\"text\"\n-3 4").unwrap(), vec!["(expr (text 3 -))", "(expr 4)"]);
        assert_eq!(
            parse("\"text\";\n-3 4").unwrap(),
            vec!["(expr text)", "(expr (- 3))", "(expr 4)"]
        );
    }

    #[test]
    fn nesting_up_to_the_limit() {
        let depth = MAX_NESTING_DEPTH;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let rendered = parse(&source).unwrap();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].matches("(group").count(), depth);

        let source = format!("{}1", "-".repeat(depth));
        assert_eq!(parse(&source).unwrap().len(), 1);
    }

    #[test]
    fn deep_grouping_is_an_error() {
        let source = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
        assert_eq!(
            parse(&source).unwrap_err(),
            LoxErrors(vec![error(
                1,
                MAX_NESTING_DEPTH + 2,
                ParserErrorType::TooDeeplyNested(MAX_NESTING_DEPTH)
            )])
        );
    }

    #[test]
    fn deep_unary_chain_is_an_error() {
        let source = format!("print {}1;\nprint 2;", "!".repeat(5_000));
        assert_eq!(
            parse(&source).unwrap_err(),
            LoxErrors(vec![error(
                1,
                "print ".len() + MAX_NESTING_DEPTH + 2,
                ParserErrorType::TooDeeplyNested(MAX_NESTING_DEPTH)
            )])
        );
    }
}
