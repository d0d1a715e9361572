//! The statement splitting state machine.

use crate::dialect::{Delimiter, DialectRules};

use super::error::SplitError;
use super::statement::SqlStatement;
use super::token::{Keyword, Token, TokenKind};

/// Statement heads longer than this are classified as-is; block and
/// transaction patterns never need more context.
const SIMPLIFIED_WORD_CAP: u32 = 8;

/// What the scanner has decided about the current statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    /// Not enough of the head seen yet.
    Unknown,
    /// Plain statement; block keywords inside it are ignored.
    Generic,
    /// Block-capable statement; open/close keywords adjust the depth.
    Block,
}

/// Mutable scan state, reset for every statement.
#[derive(Debug)]
struct ParserState {
    block_depth: u32,
    paren_depth: u32,
    kind: StatementKind,
    simplified: String,
    words: u32,
    pending_begin: bool,
    after_end: bool,
}

impl ParserState {
    fn new() -> Self {
        Self {
            block_depth: 0,
            paren_depth: 0,
            kind: StatementKind::Unknown,
            simplified: String::new(),
            words: 0,
            pending_begin: false,
            after_end: false,
        }
    }

    fn simplified(&self) -> &str {
        &self.simplified
    }

    /// Appends a word to the simplified, literal-collapsed statement head
    /// and re-classifies while the head is still short.
    fn push_simplified(&mut self, text: &str, rules: &DialectRules) {
        if self.words >= SIMPLIFIED_WORD_CAP {
            if self.kind == StatementKind::Unknown {
                self.kind = StatementKind::Generic;
            }
            return;
        }
        if !self.simplified.is_empty() {
            self.simplified.push(' ');
        }
        for c in text.chars() {
            self.simplified.push(c.to_ascii_uppercase());
        }
        self.words += 1;
        if self.kind == StatementKind::Unknown && rules.is_block_statement(&self.simplified) {
            self.kind = StatementKind::Block;
        }
    }

    /// A `BEGIN` only opens a block once the next token shows it is not
    /// `BEGIN TRANSACTION`/`WORK`/`TRAN` (or a bare transaction-start
    /// followed by the delimiter).
    fn resolve_pending_begin(&mut self, cancelled: bool) {
        if self.pending_begin {
            self.pending_begin = false;
            if !cancelled {
                self.block_depth += 1;
            }
        }
    }

    fn observe(&mut self, token: &Token, rules: &DialectRules) {
        match token.kind {
            TokenKind::Word(kw) => self.observe_word(kw, &token.text, rules),
            TokenKind::StringLiteral
            | TokenKind::QuotedIdentifier
            | TokenKind::LeftParen
            | TokenKind::RightParen
            | TokenKind::Symbol(_) => {
                self.resolve_pending_begin(false);
                self.after_end = false;
            }
            TokenKind::Comment | TokenKind::Delimiter | TokenKind::Eof => {}
        }
    }

    fn observe_word(&mut self, kw: Option<Keyword>, text: &str, rules: &DialectRules) {
        self.push_simplified(text, rules);

        let cancels = kw.is_some_and(|k| k.cancels_begin());
        self.resolve_pending_begin(cancels);

        if self.after_end {
            self.after_end = false;
            // END IF / END CASE / END LOOP close one block; the trailing
            // keyword must not open a new one
            if kw.is_some_and(|k| k.is_opener()) {
                return;
            }
        }

        match kw {
            Some(Keyword::End) => {
                self.block_depth = self.block_depth.saturating_sub(1);
                self.after_end = true;
            }
            Some(k) if k.is_opener()
                && self.kind == StatementKind::Block
                && rules.is_block_open_keyword(text) =>
            {
                if k == Keyword::Begin {
                    self.pending_begin = true;
                } else {
                    self.block_depth += 1;
                }
            }
            _ => {}
        }
    }
}

/// Splits a script into executable statements.
///
/// The sequence is lazy, forward-only and non-restartable: statements are
/// produced on demand and iteration ends permanently at the first error or
/// at end of input.
pub struct StatementTokenizer<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    col: u32,
    line_has_content: bool,
    rules: &'a DialectRules,
    delimiter: Delimiter,
    finished: bool,
}

impl<'a> StatementTokenizer<'a> {
    /// Creates a tokenizer starting with the dialect's default delimiter.
    #[must_use]
    pub fn new(input: &'a str, rules: &'a DialectRules) -> Self {
        let delimiter = rules.default_delimiter.clone();
        Self::with_delimiter(input, rules, delimiter)
    }

    /// Creates a tokenizer with an explicit active delimiter.
    #[must_use]
    pub fn with_delimiter(input: &'a str, rules: &'a DialectRules, delimiter: Delimiter) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
            line_has_content: false,
            rules,
            delimiter,
            finished: false,
        }
    }

    /// The delimiter currently in effect.
    #[must_use]
    pub const fn active_delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
            self.line_has_content = false;
        } else {
            self.col += 1;
            if !c.is_whitespace() {
                self.line_has_content = true;
            }
        }
        Some(c)
    }

    fn advance_bytes(&mut self, n: usize) {
        let target = self.pos + n;
        while self.pos < target && self.advance().is_some() {}
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn line_comment_len(&self) -> Option<usize> {
        self.rules
            .line_comment_markers
            .iter()
            .find(|marker| self.rest().starts_with(**marker))
            .map(|marker| marker.len())
    }

    fn consume_line_comment(&mut self, marker_len: usize) {
        self.advance_bytes(marker_len);
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn consume_block_comment(&mut self) -> Result<(), SplitError> {
        let (line, col) = (self.line, self.col);
        self.advance_bytes(2);
        let mut depth = 1u32;
        loop {
            if self.rest().starts_with("*/") {
                self.advance_bytes(2);
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            } else if self.rules.nested_block_comments && self.rest().starts_with("/*") {
                self.advance_bytes(2);
                depth += 1;
            } else if self.advance().is_none() {
                return Err(SplitError::Unterminated {
                    construct: "block comment",
                    line,
                    col,
                });
            }
        }
    }

    /// Skips whitespace and comments between statements.
    fn skip_trivia(&mut self) -> Result<(), SplitError> {
        loop {
            self.skip_whitespace();
            if let Some(len) = self.line_comment_len() {
                self.consume_line_comment(len);
                continue;
            }
            if self.rest().starts_with("/*") {
                self.consume_block_comment()?;
                continue;
            }
            return Ok(());
        }
    }

    /// Quoted run closed by `quote`, with doubled-quote escapes and
    /// optionally backslash escapes.
    fn consume_quoted(
        &mut self,
        quote: char,
        backslash_escapes: bool,
        construct: &'static str,
    ) -> Result<(), SplitError> {
        let (line, col) = (self.line, self.col);
        self.advance();
        loop {
            match self.peek() {
                None => {
                    return Err(SplitError::Unterminated {
                        construct,
                        line,
                        col,
                    })
                }
                Some(c) if c == quote => {
                    self.advance();
                    if self.peek() == Some(quote) {
                        self.advance();
                    } else {
                        return Ok(());
                    }
                }
                Some('\\') if backslash_escapes => {
                    self.advance();
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn consume_bracket_identifier(&mut self) -> Result<(), SplitError> {
        let (line, col) = (self.line, self.col);
        self.advance();
        loop {
            match self.advance() {
                None => {
                    return Err(SplitError::Unterminated {
                        construct: "bracketed identifier",
                        line,
                        col,
                    })
                }
                Some(']') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    /// Attempts `$tag$ … $tag$`; returns false when the `$` does not open a
    /// dollar quote (e.g. a positional parameter).
    fn try_consume_dollar_quoted(&mut self) -> Result<bool, SplitError> {
        let rest = self.rest();
        let mut tag_len = 0usize;
        for c in rest[1..].chars() {
            if c == '$' {
                break;
            }
            if !(c.is_ascii_alphanumeric() || c == '_') {
                return Ok(false);
            }
            tag_len += c.len_utf8();
        }
        let opener_len = tag_len + 2;
        if rest.len() < opener_len || !rest[1 + tag_len..].starts_with('$') {
            return Ok(false);
        }
        let opener = &rest[..opener_len];
        let (line, col) = (self.line, self.col);
        let Some(close) = rest[opener_len..].find(opener) else {
            return Err(SplitError::Unterminated {
                construct: "dollar-quoted string",
                line,
                col,
            });
        };
        self.advance_bytes(opener_len + close + opener_len);
        Ok(true)
    }

    /// Whether the raw delimiter text starts at the scan position, with no
    /// boundary checks applied.
    fn delimiter_text_at_pos(&self) -> bool {
        let token = self.delimiter.token();
        self.rest()
            .get(..token.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(token))
    }

    /// The active delimiter, if it starts at the scan position and survives
    /// the word-boundary and alone-on-line checks.
    fn match_delimiter(&self) -> Option<usize> {
        let token = self.delimiter.token();
        let candidate = self.rest().get(..token.len())?;
        if !candidate.eq_ignore_ascii_case(token) {
            return None;
        }
        if self.delimiter.is_word() {
            let after = self.rest()[token.len()..].chars().next();
            if after.is_some_and(|c| c.is_alphanumeric() || c == '_') {
                return None;
            }
        }
        if self.delimiter.is_alone_on_line() && self.line_has_content {
            return None;
        }
        Some(token.len())
    }

    /// `DELIMITER <token>` directive line; the token runs to end of line.
    fn try_delimiter_directive(&mut self) -> bool {
        const DIRECTIVE: &str = "DELIMITER";
        let rest = self.rest();
        let Some(head) = rest.get(..DIRECTIVE.len()) else {
            return false;
        };
        if !head.eq_ignore_ascii_case(DIRECTIVE) {
            return false;
        }
        if !rest[DIRECTIVE.len()..]
            .chars()
            .next()
            .is_some_and(|c| c == ' ' || c == '\t')
        {
            return false;
        }
        self.advance_bytes(DIRECTIVE.len());
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            token.push(c);
            self.advance();
        }
        let token = token.trim();
        if !token.is_empty() {
            self.delimiter = Delimiter::new(token);
        }
        true
    }

    fn next_token(&mut self, state: &mut ParserState) -> Result<Token, SplitError> {
        self.skip_whitespace();
        let (line, col) = (self.line, self.col);
        let paren_depth = state.paren_depth;
        let start = self.pos;

        let token = |kind, text| Token::new(kind, text, line, col, paren_depth);

        let Some(c) = self.peek() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };

        if let Some(len) = self.line_comment_len() {
            self.consume_line_comment(len);
            return Ok(token(
                TokenKind::Comment,
                self.input[start..self.pos].to_string(),
            ));
        }
        if self.rest().starts_with("/*") {
            self.consume_block_comment()?;
            return Ok(token(
                TokenKind::Comment,
                self.input[start..self.pos].to_string(),
            ));
        }

        // A boundary candidate only counts outside parens and blocks; inside
        // them the text falls through to ordinary scanning. A pending BEGIN
        // has not opened anything yet, so `BEGIN;` still splits as a plain
        // transaction start.
        if state.block_depth == 0 && state.paren_depth == 0 {
            if let Some(len) = self.match_delimiter() {
                self.advance_bytes(len);
                return Ok(token(
                    TokenKind::Delimiter,
                    self.input[start..self.pos].to_string(),
                ));
            }
        }

        if self.rules.string_quotes.contains(&c) {
            self.consume_quoted(c, self.rules.backslash_escapes, "string literal")?;
            return Ok(token(
                TokenKind::StringLiteral,
                self.input[start..self.pos].to_string(),
            ));
        }
        if self.rules.dollar_quoting && c == '$' && self.try_consume_dollar_quoted()? {
            return Ok(token(
                TokenKind::StringLiteral,
                self.input[start..self.pos].to_string(),
            ));
        }
        if self.rules.identifier_quotes.contains(&c) {
            self.consume_quoted(c, false, "quoted identifier")?;
            return Ok(token(
                TokenKind::QuotedIdentifier,
                self.input[start..self.pos].to_string(),
            ));
        }
        if self.rules.bracket_identifiers && c == '[' {
            self.consume_bracket_identifier()?;
            return Ok(token(
                TokenKind::QuotedIdentifier,
                self.input[start..self.pos].to_string(),
            ));
        }

        if c == '(' {
            self.advance();
            state.paren_depth += 1;
            return Ok(token(TokenKind::LeftParen, String::from("(")));
        }
        if c == ')' {
            self.advance();
            state.paren_depth = state.paren_depth.saturating_sub(1);
            return Ok(token(TokenKind::RightParen, String::from(")")));
        }

        if c.is_alphanumeric() || c == '_' {
            // `$` continues a word, except where a symbol delimiter starts
            // (`END$$` under a `DELIMITER $$` directive must still split).
            while let Some(c) = self.peek() {
                if !(c.is_alphanumeric() || c == '_' || c == '$') {
                    break;
                }
                if !self.delimiter.is_word() && self.delimiter_text_at_pos() {
                    break;
                }
                self.advance();
            }
            let text = &self.input[start..self.pos];
            return Ok(token(
                TokenKind::Word(Keyword::from_word(text)),
                text.to_string(),
            ));
        }

        self.advance();
        Ok(token(TokenKind::Symbol(c), c.to_string()))
    }

    fn scan_statement(&mut self) -> Result<Option<SqlStatement>, SplitError> {
        'statement: loop {
            loop {
                self.skip_trivia()?;
                if self.at_eof() {
                    return Ok(None);
                }
                if self.rules.delimiter_directive && self.try_delimiter_directive() {
                    continue;
                }
                break;
            }

            let mut state = ParserState::new();
            let start = self.pos;
            let start_line = self.line;

            loop {
                let token = self.next_token(&mut state)?;
                match token.kind {
                    TokenKind::Eof => {
                        if state.block_depth > 0 {
                            return Err(SplitError::UnexpectedEof {
                                depth: state.block_depth,
                                line: start_line,
                            });
                        }
                        let sql = self.input[start..self.pos].trim_end();
                        if sql.is_empty() {
                            return Ok(None);
                        }
                        return Ok(Some(self.finish(sql, start_line, &state)));
                    }
                    TokenKind::Delimiter => {
                        let end = self.pos - token.text.len();
                        let sql = self.input[start..end].trim_end();
                        if sql.is_empty() {
                            continue 'statement;
                        }
                        return Ok(Some(self.finish(sql, start_line, &state)));
                    }
                    TokenKind::Comment => {}
                    _ => state.observe(&token, self.rules),
                }
            }
        }
    }

    fn finish(&self, sql: &str, line: u32, state: &ParserState) -> SqlStatement {
        let can_execute_in_transaction = !self.rules.is_non_transactional(state.simplified());
        SqlStatement::new(sql, line, can_execute_in_transaction, self.delimiter.clone())
    }
}

impl Iterator for StatementTokenizer<'_> {
    type Item = Result<SqlStatement, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.scan_statement() {
            Ok(Some(statement)) => Some(Ok(statement)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{generic, mysql, postgres, sqlite, sqlserver};

    fn split(input: &str, rules: &DialectRules) -> Vec<SqlStatement> {
        StatementTokenizer::new(input, rules)
            .collect::<Result<Vec<_>, _>>()
            .expect("script must split")
    }

    #[test]
    fn test_two_statements() {
        let rules = generic::rules();
        let statements = split("SELECT 1; SELECT 2;", &rules);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].sql(), "SELECT 1");
        assert_eq!(statements[1].sql(), "SELECT 2");
        assert!(statements.iter().all(SqlStatement::can_execute_in_transaction));
    }

    #[test]
    fn test_trailing_statement_without_delimiter() {
        let rules = generic::rules();
        let statements = split("SELECT 1; SELECT 2", &rules);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].sql(), "SELECT 2");
    }

    #[test]
    fn test_comment_only_input_yields_nothing() {
        let rules = generic::rules();
        assert!(split("-- nothing here\n/* or here */", &rules).is_empty());
        assert!(split("   \n\t  ", &rules).is_empty());
    }

    #[test]
    fn test_delimiter_inside_string_literal() {
        let rules = generic::rules();
        let statements = split("INSERT INTO t VALUES ('a;b');", &rules);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_delimiter_inside_escaped_string() {
        let rules = generic::rules();
        let statements = split("SELECT 'it''s; fine';", &rules);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_delimiter_inside_parens() {
        let rules = generic::rules();
        let statements = split("SELECT f(';'); SELECT 2;", &rules);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_line_numbers() {
        let rules = generic::rules();
        let statements = split("SELECT 1;\n\nSELECT 2;\n", &rules);
        assert_eq!(statements[0].line(), 1);
        assert_eq!(statements[1].line(), 3);
    }

    #[test]
    fn test_stray_delimiters_skipped() {
        let rules = generic::rules();
        let statements = split(";;SELECT 1;;", &rules);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_begin_end_block_single_statement() {
        let rules = generic::rules();
        let statements = split("BEGIN SELECT 1; END;", &rules);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].sql(), "BEGIN SELECT 1; END");
    }

    #[test]
    fn test_nested_blocks() {
        let rules = generic::rules();
        let statements = split("BEGIN BEGIN SELECT 1; END; END; SELECT 2;", &rules);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].sql(), "SELECT 2");
    }

    #[test]
    fn test_begin_transaction_is_not_a_block() {
        let rules = generic::rules();
        let statements = split("BEGIN TRANSACTION; SELECT 1; COMMIT;", &rules);
        assert_eq!(statements.len(), 3);
    }

    #[test]
    fn test_bare_begin_is_not_a_block() {
        let rules = generic::rules();
        let statements = split("BEGIN; SELECT 1; COMMIT;", &rules);
        assert_eq!(statements.len(), 3);
    }

    #[test]
    fn test_end_if_does_not_reopen_block() {
        let rules = generic::rules();
        let script = "BEGIN IF x THEN SELECT 1; END IF; END; SELECT 2;";
        let statements = split(script, &rules);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_case_in_plain_statement_is_ignored() {
        let rules = generic::rules();
        let statements = split("SELECT CASE WHEN a THEN 1 ELSE 2 END FROM t; SELECT 2;", &rules);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_drop_table_if_exists_is_not_a_block() {
        let rules = mysql::rules();
        let statements = split("DROP TABLE IF EXISTS t; SELECT 1;", &rules);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_mysql_procedure_body() {
        let rules = mysql::rules();
        let script = "CREATE PROCEDURE p()\nBEGIN\n  IF x THEN SELECT 1; END IF;\nEND;\nSELECT 2;";
        let statements = split(script, &rules);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].sql().starts_with("CREATE PROCEDURE"));
    }

    #[test]
    fn test_mysql_delimiter_directive() {
        let rules = mysql::rules();
        let script = "DELIMITER //\nCREATE PROCEDURE p()\nBEGIN\n SELECT 1;\nEND//\nSELECT 2//";
        let statements = split(script, &rules);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].delimiter().token(), "//");
    }

    #[test]
    fn test_mysql_hash_comment_and_backslash_escape() {
        let rules = mysql::rules();
        let statements = split("# leading comment\nSELECT 'a\\'; b';", &rules);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_postgres_dollar_quoting() {
        let rules = postgres::rules();
        let script = "CREATE FUNCTION f() RETURNS void AS $$\nBEGIN\n  SELECT 1;\nEND;\n$$ LANGUAGE plpgsql;\nSELECT 2;";
        let statements = split(script, &rules);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_postgres_tagged_dollar_quoting() {
        let rules = postgres::rules();
        let statements = split("SELECT $tag$ ; $notyet$ ; $tag$;", &rules);
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_postgres_concurrent_index_is_non_transactional() {
        let rules = postgres::rules();
        let statements = split("CREATE INDEX CONCURRENTLY idx ON t (c);", &rules);
        assert_eq!(statements.len(), 1);
        assert!(!statements[0].can_execute_in_transaction());
    }

    #[test]
    fn test_postgres_nested_block_comment() {
        let rules = postgres::rules();
        let statements = split("/* outer /* inner */ still out */ SELECT 1;", &rules);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].sql(), "SELECT 1");
    }

    #[test]
    fn test_sqlserver_go_delimiter() {
        let rules = sqlserver::rules();
        let script = "CREATE TABLE t (id INT)\nGO\nINSERT INTO t VALUES (1)\ngo\n";
        let statements = split(script, &rules);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_go_not_matched_inside_goto_or_mid_line() {
        let rules = sqlserver::rules();
        let script = "SELECT 'x' -- GO\nGOTO done\nGO";
        let statements = split(script, &rules);
        assert_eq!(statements.len(), 1);
        assert!(statements[0].sql().contains("GOTO done"));
    }

    #[test]
    fn test_sqlite_trigger_body() {
        let rules = sqlite::rules();
        let script = "CREATE TRIGGER trg AFTER INSERT ON t\nBEGIN\n  UPDATE t SET n = n + 1;\nEND;\nSELECT 1;";
        let statements = split(script, &rules);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_unterminated_string_is_fatal() {
        let rules = generic::rules();
        let err = StatementTokenizer::new("SELECT 'oops;", &rules)
            .next()
            .expect("one item")
            .expect_err("must fail");
        assert_eq!(
            err,
            SplitError::Unterminated {
                construct: "string literal",
                line: 1,
                col: 8,
            }
        );
    }

    #[test]
    fn test_unterminated_block_comment_is_fatal() {
        let rules = generic::rules();
        let err = StatementTokenizer::new("SELECT 1; /* open", &rules)
            .nth(1)
            .expect("second item")
            .expect_err("must fail");
        assert!(matches!(
            err,
            SplitError::Unterminated {
                construct: "block comment",
                ..
            }
        ));
    }

    #[test]
    fn test_unclosed_block_at_eof_is_fatal() {
        let rules = generic::rules();
        let err = StatementTokenizer::new("BEGIN SELECT 1;", &rules)
            .next()
            .expect("one item")
            .expect_err("must fail");
        assert!(matches!(err, SplitError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_iteration_stops_after_error() {
        let rules = generic::rules();
        let mut tokenizer = StatementTokenizer::new("SELECT 'open", &rules);
        assert!(tokenizer.next().is_some_and(|r| r.is_err()));
        assert!(tokenizer.next().is_none());
    }
}
