use std::borrow::Cow;

use crate::lexer::{lex, render, unquote, Lexeme, LexemeKind, Nesting};
use crate::pipeline::registry::RuleOutcome;
use crate::GeosqlError;

/// `AS` inside these calls introduces a type, not an alias.
pub(super) const TYPE_CAST_CALLS: &[&str] = &["cast", "try_cast", "safe_cast"];

pub(crate) fn rewrite_statement(sql: &str) -> Result<RuleOutcome, GeosqlError> {
    let mut lexemes = lex(sql)?;
    let nesting = Nesting::of(&lexemes);

    let targets = alias_positions(&lexemes, &nesting)
        .into_iter()
        .filter(|index| lexemes[*index].kind == LexemeKind::QuotedIdent('"'))
        .collect::<Vec<_>>();
    for index in targets {
        let alias = unquote(&lexemes[index].text, '"');
        lexemes[index] = Lexeme {
            kind: LexemeKind::QuotedIdent('`'),
            text: Cow::Owned(format!("`{}`", alias.replace('`', "``"))),
        };
    }

    Ok(RuleOutcome::from_rewrite(sql, render(&lexemes)))
}

/// Indexes of the lexemes that follow an alias-introducing `AS`, separated
/// from it by whitespace only.
pub(super) fn alias_positions(lexemes: &[Lexeme<'_>], nesting: &Nesting) -> Vec<usize> {
    let mut positions = Vec::new();
    for (index, lexeme) in lexemes.iter().enumerate() {
        if !lexeme.is_keyword("as") || nesting.inside_call(lexemes, index, TYPE_CAST_CALLS) {
            continue;
        }
        let mut cursor = index + 1;
        while lexemes
            .get(cursor)
            .is_some_and(|lexeme| lexeme.kind == LexemeKind::Space)
        {
            cursor += 1;
        }
        if cursor < lexemes.len() {
            positions.push(cursor);
        }
    }
    positions
}
