use std::any::TypeId;
use std::borrow::Cow;

use sqlparser::dialect::{Dialect, GenericDialect};
use sqlparser::tokenizer::{Location, Token, TokenWithSpan, Tokenizer, Whitespace};

use crate::GeosqlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LexemeKind {
    Word,
    QuotedIdent(char),
    Literal,
    Space,
    Comment,
    Period,
    Comma,
    LParen,
    RParen,
    SemiColon,
    Other,
    /// Everything from the point where the tokenizer gave up, kept verbatim.
    Unreadable,
}

/// A classified slice of the statement. Concatenating the texts of every
/// lexeme returned by [`lex`] reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexeme<'a> {
    pub(crate) kind: LexemeKind,
    pub(crate) text: Cow<'a, str>,
}

impl<'a> Lexeme<'a> {
    pub(crate) fn space() -> Self {
        Self {
            kind: LexemeKind::Space,
            text: Cow::Borrowed(" "),
        }
    }

    pub(crate) fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == LexemeKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    pub(crate) fn is_any_keyword(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| self.is_keyword(keyword))
    }

    pub(crate) fn is_trivia(&self) -> bool {
        matches!(self.kind, LexemeKind::Space | LexemeKind::Comment)
    }

    /// Plain identifiers only: `[A-Za-z0-9_]+`.
    pub(crate) fn is_plain_identifier(&self) -> bool {
        self.kind == LexemeKind::Word
            && !self.text.is_empty()
            && self
                .text
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }

    /// Identifier value without delimiters, for bare and quoted identifiers.
    pub(crate) fn identifier_value(&self) -> Option<String> {
        match self.kind {
            LexemeKind::Word => Some(self.text.to_string()),
            LexemeKind::QuotedIdent(quote) => Some(unquote(&self.text, quote)),
            _ => None,
        }
    }

    /// Comparison key used when matching expressions token by token.
    pub(crate) fn match_key(&self) -> String {
        match self.identifier_value() {
            Some(value) => value.to_ascii_lowercase(),
            None => self.text.to_string(),
        }
    }

    /// Line comments own their terminating newline; collapsing the whitespace
    /// after one that does not would comment out the rest of the statement.
    fn is_open_line_comment(&self) -> bool {
        self.kind == LexemeKind::Comment
            && !self.text.starts_with("/*")
            && !self.text.ends_with('\n')
    }
}

/// Generic SQL as Spark reads it: backslash escapes inside string literals
/// and identifiers with a numeric prefix such as `2024_sales`.
#[derive(Debug, Default)]
struct SparkSqlDialect(GenericDialect);

impl Dialect for SparkSqlDialect {
    fn dialect(&self) -> TypeId {
        self.0.dialect()
    }

    fn is_delimited_identifier_start(&self, ch: char) -> bool {
        self.0.is_delimited_identifier_start(ch)
    }

    fn is_identifier_start(&self, ch: char) -> bool {
        self.0.is_identifier_start(ch)
    }

    fn is_identifier_part(&self, ch: char) -> bool {
        self.0.is_identifier_part(ch)
    }

    fn supports_unicode_string_literal(&self) -> bool {
        self.0.supports_unicode_string_literal()
    }

    fn supports_pipe_operator(&self) -> bool {
        self.0.supports_pipe_operator()
    }

    fn supports_nested_comments(&self) -> bool {
        self.0.supports_nested_comments()
    }

    fn supports_string_escape_constant(&self) -> bool {
        self.0.supports_string_escape_constant()
    }

    fn supports_string_literal_backslash_escape(&self) -> bool {
        true
    }

    fn supports_numeric_prefix(&self) -> bool {
        true
    }
}

/// Lexes `sql` losslessly. When the tokenizer fails part way, the lexemes
/// read so far are kept and the rest of the statement becomes a single
/// [`LexemeKind::Unreadable`] lexeme.
pub(crate) fn lex(sql: &str) -> Result<Vec<Lexeme<'_>>, GeosqlError> {
    let dialect = SparkSqlDialect::default();
    let mut tokens: Vec<TokenWithSpan> = Vec::new();
    let failure = Tokenizer::new(&dialect, sql)
        .with_unescape(false)
        .tokenize_with_location_into_buf(&mut tokens)
        .err();

    let mut cursor = SourceCursor::new(sql);
    let mut starts = Vec::with_capacity(tokens.len());
    for token in &tokens {
        starts.push(seek(&mut cursor, &token.span.start)?);
    }
    if starts.first().is_some_and(|start| *start != 0) {
        return Err(GeosqlError::new("tokenizer skipped leading statement text"));
    }
    let readable_end = match (&failure, tokens.last()) {
        (None, _) => sql.len(),
        (Some(_), None) => 0,
        (Some(_), Some(last)) => seek(&mut cursor, &last.span.end)?,
    };

    let mut lexemes = Vec::with_capacity(tokens.len() + 1);
    for (index, token) in tokens.iter().enumerate() {
        let start = starts[index];
        let end = starts.get(index + 1).copied().unwrap_or(readable_end);
        lexemes.push(Lexeme {
            kind: classify(&token.token),
            text: Cow::Borrowed(&sql[start..end]),
        });
    }
    if let Some(err) = failure {
        if readable_end < sql.len() {
            log::debug!("statement unreadable from byte {readable_end}: {err}");
            lexemes.push(Lexeme {
                kind: LexemeKind::Unreadable,
                text: Cow::Borrowed(&sql[readable_end..]),
            });
        }
    }
    Ok(lexemes)
}

fn seek(cursor: &mut SourceCursor<'_>, location: &Location) -> Result<usize, GeosqlError> {
    cursor.seek(location).ok_or_else(|| {
        GeosqlError::new(format!(
            "token location {}:{} does not map into the statement",
            location.line, location.column
        ))
    })
}

fn classify(token: &Token) -> LexemeKind {
    match token {
        Token::Word(word) => match word.quote_style {
            None => LexemeKind::Word,
            Some(quote) => LexemeKind::QuotedIdent(quote),
        },
        Token::Whitespace(Whitespace::SingleLineComment { .. })
        | Token::Whitespace(Whitespace::MultiLineComment(_)) => LexemeKind::Comment,
        Token::Whitespace(_) => LexemeKind::Space,
        Token::SingleQuotedString(_)
        | Token::DoubleQuotedString(_)
        | Token::NationalStringLiteral(_)
        | Token::EscapedStringLiteral(_)
        | Token::HexStringLiteral(_)
        | Token::DollarQuotedString(_) => LexemeKind::Literal,
        Token::Period => LexemeKind::Period,
        Token::Comma => LexemeKind::Comma,
        Token::LParen => LexemeKind::LParen,
        Token::RParen => LexemeKind::RParen,
        Token::SemiColon => LexemeKind::SemiColon,
        _ => LexemeKind::Other,
    }
}

/// Walks the source in step with the tokenizer's 1-based line/column
/// counting, which advances one column per `char`.
struct SourceCursor<'a> {
    source: &'a str,
    offset: usize,
    line: u64,
    column: u64,
}

impl<'a> SourceCursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn seek(&mut self, location: &Location) -> Option<usize> {
        let target = (location.line, location.column);
        while (self.line, self.column) < target {
            let ch = self.source[self.offset..].chars().next()?;
            self.offset += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ((self.line, self.column) == target).then_some(self.offset)
    }
}

pub(crate) fn unquote(text: &str, quote: char) -> String {
    let close = match quote {
        '[' => ']',
        other => other,
    };
    let inner = text
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(close))
        .unwrap_or(text);
    let doubled = format!("{close}{close}");
    inner.replace(&doubled, &close.to_string())
}

pub(crate) fn render(lexemes: &[Lexeme<'_>]) -> String {
    let mut out = String::with_capacity(lexemes.iter().map(|lexeme| lexeme.text.len()).sum());
    for lexeme in lexemes {
        out.push_str(&lexeme.text);
    }
    out
}

pub(crate) fn next_significant(lexemes: &[Lexeme<'_>], from: usize) -> Option<usize> {
    (from..lexemes.len()).find(|index| !lexemes[*index].is_trivia())
}

pub(crate) fn previous_significant(lexemes: &[Lexeme<'_>], before: usize) -> Option<usize> {
    (0..before).rev().find(|index| !lexemes[*index].is_trivia())
}

pub(crate) fn matching_paren(lexemes: &[Lexeme<'_>], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, lexeme) in lexemes.iter().enumerate().skip(open) {
        match lexeme.kind {
            LexemeKind::LParen => depth += 1,
            LexemeKind::RParen => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Collapses whitespace runs to a single space and trims both ends.
/// Literals and comments pass through verbatim.
pub(crate) fn collapse_whitespace<'a>(lexemes: Vec<Lexeme<'a>>) -> Vec<Lexeme<'a>> {
    let mut out: Vec<Lexeme<'a>> = Vec::with_capacity(lexemes.len());
    let mut pending_space = false;
    for lexeme in lexemes {
        if lexeme.kind == LexemeKind::Space {
            pending_space = true;
            continue;
        }
        if pending_space {
            if let Some(separator) = out.last().and_then(separator_after) {
                out.push(separator);
            }
        }
        pending_space = false;
        out.push(lexeme);
    }
    out
}

fn separator_after<'a>(previous: &Lexeme<'_>) -> Option<Lexeme<'a>> {
    if previous.kind == LexemeKind::Comment && previous.text.ends_with('\n') {
        return None;
    }
    if previous.is_open_line_comment() {
        return Some(Lexeme {
            kind: LexemeKind::Space,
            text: Cow::Borrowed("\n"),
        });
    }
    Some(Lexeme::space())
}

/// Parenthesis depth and innermost enclosing call for every lexeme.
pub(crate) struct Nesting {
    depth: Vec<usize>,
    call: Vec<Option<usize>>,
}

impl Nesting {
    pub(crate) fn of(lexemes: &[Lexeme<'_>]) -> Self {
        let mut depth = Vec::with_capacity(lexemes.len());
        let mut call = Vec::with_capacity(lexemes.len());
        let mut stack: Vec<Option<usize>> = Vec::new();
        for (index, lexeme) in lexemes.iter().enumerate() {
            match lexeme.kind {
                LexemeKind::LParen => {
                    depth.push(stack.len());
                    call.push(stack.last().copied().flatten());
                    let opener = previous_significant(lexemes, index)
                        .filter(|previous| lexemes[*previous].kind == LexemeKind::Word);
                    stack.push(opener);
                }
                LexemeKind::RParen => {
                    stack.pop();
                    depth.push(stack.len());
                    call.push(stack.last().copied().flatten());
                }
                _ => {
                    depth.push(stack.len());
                    call.push(stack.last().copied().flatten());
                }
            }
        }
        Self { depth, call }
    }

    pub(crate) fn depth(&self, index: usize) -> usize {
        self.depth.get(index).copied().unwrap_or(0)
    }

    /// Whether the lexeme sits directly inside a call to one of `functions`.
    pub(crate) fn inside_call(
        &self,
        lexemes: &[Lexeme<'_>],
        index: usize,
        functions: &[&str],
    ) -> bool {
        self.call
            .get(index)
            .copied()
            .flatten()
            .is_some_and(|opener| lexemes[opener].is_any_keyword(functions))
    }
}
