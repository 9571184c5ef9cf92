use std::borrow::Cow;

use crate::lexer::{lex, render, unquote, Lexeme, LexemeKind, Nesting};
use crate::pipeline::registry::RuleOutcome;
use crate::GeosqlError;

use super::alias_quotes::alias_positions;

pub(crate) fn rewrite_statement(sql: &str) -> Result<RuleOutcome, GeosqlError> {
    let mut lexemes = lex(sql)?;
    let nesting = Nesting::of(&lexemes);

    let renames = alias_positions(&lexemes, &nesting)
        .into_iter()
        .filter_map(|index| {
            let content = quoted_alias_content(&lexemes[index])?;
            sanitized_name(&content).map(|name| (index, name))
        })
        .collect::<Vec<_>>();
    for (index, name) in renames {
        lexemes[index] = Lexeme {
            kind: LexemeKind::Word,
            text: Cow::Owned(name),
        };
    }

    Ok(RuleOutcome::from_rewrite(sql, render(&lexemes)))
}

fn quoted_alias_content(lexeme: &Lexeme<'_>) -> Option<String> {
    match lexeme.kind {
        LexemeKind::QuotedIdent('"') => Some(unquote(&lexeme.text, '"')),
        LexemeKind::Literal if lexeme.text.starts_with('\'') => Some(unquote(&lexeme.text, '\'')),
        _ => None,
    }
}

/// `COUNT(*)` becomes `count_rows`, `COUNT(primary_category)` becomes
/// `count_primary_category`. Anything not shaped like `name(argument)` is
/// left alone.
fn sanitized_name(content: &str) -> Option<String> {
    let content = content.trim();
    let open = content.find('(')?;
    let function = content[..open].trim();
    let argument = content[open + 1..].strip_suffix(')')?.trim();
    if function.is_empty()
        || argument.is_empty()
        || !function
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        || function.starts_with(|ch: char| ch.is_ascii_digit())
    {
        return None;
    }

    let raw = if argument == "*" {
        format!("{function}_rows")
    } else {
        format!("{function}_{argument}")
    };
    let mut name = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            name.push(ch.to_ascii_lowercase());
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    let name = name.trim_matches('_').to_string();
    (!name.is_empty()).then_some(name)
}
