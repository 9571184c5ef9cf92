use std::collections::BTreeSet;

use crate::lexer::{
    lex, matching_paren, next_significant, previous_significant, Lexeme, LexemeKind, Nesting,
};
use crate::pipeline::registry::RuleOutcome;
use crate::{GeosqlError, RewriteConfig};

const REFERENCE_KEYWORDS: &[&str] = &["from", "join", "in"];

/// Calls whose arguments use `FROM`/`IN` as separators rather than to
/// introduce a relation.
const SEPARATOR_CALLS: &[&str] = &["extract", "substring", "trim", "position", "overlay"];

/// Words that can follow `FROM`/`JOIN` without naming a table.
const NON_RELATION_WORDS: &[&str] = &["lateral", "only", "select", "unnest", "values"];

struct Reference {
    keyword: usize,
    parts: Vec<usize>,
    end: usize,
}

pub(crate) fn rewrite_statement(
    sql: &str,
    config: &RewriteConfig,
) -> Result<RuleOutcome, GeosqlError> {
    let lexemes = lex(sql)?;
    let nesting = Nesting::of(&lexemes);
    let ctes = cte_names(&lexemes);

    let mut out = String::with_capacity(sql.len() + 32);
    let mut index = 0;
    while index < lexemes.len() {
        let reference = match_reference(&lexemes, &nesting, index)
            .filter(|reference| needs_namespace(&lexemes, reference, config, &ctes));
        let Some(reference) = reference else {
            out.push_str(&lexemes[index].text);
            index += 1;
            continue;
        };

        out.push_str(&lexemes[reference.keyword].text);
        out.push(' ');
        out.push_str(&config.default_namespace);
        out.push('.');
        for part in reference.parts[0]..reference.end {
            out.push_str(&lexemes[part].text);
        }
        index = reference.end;
    }

    Ok(RuleOutcome::from_rewrite(sql, out))
}

fn match_reference(lexemes: &[Lexeme<'_>], nesting: &Nesting, index: usize) -> Option<Reference> {
    let keyword = &lexemes[index];
    if !keyword.is_any_keyword(REFERENCE_KEYWORDS) {
        return None;
    }
    if nesting.inside_call(lexemes, index, SEPARATOR_CALLS) {
        return None;
    }
    if keyword.is_keyword("from")
        && previous_significant(lexemes, index)
            .is_some_and(|previous| lexemes[previous].is_keyword("distinct"))
    {
        return None;
    }

    let mut cursor = index + 1;
    while lexemes
        .get(cursor)
        .is_some_and(|lexeme| lexeme.kind == LexemeKind::Space)
    {
        cursor += 1;
    }
    if cursor == index + 1 {
        return None;
    }

    let first = lexemes.get(cursor)?;
    if !first.is_plain_identifier() || first.is_any_keyword(NON_RELATION_WORDS) {
        return None;
    }
    let mut parts = vec![cursor];
    cursor += 1;
    while lexemes.get(cursor).is_some_and(|lexeme| lexeme.kind == LexemeKind::Period)
        && lexemes
            .get(cursor + 1)
            .is_some_and(Lexeme::is_plain_identifier)
    {
        parts.push(cursor + 1);
        cursor += 2;
    }

    // `name(` is a table function, `name.` continues a name we cannot read.
    let follower = next_significant(lexemes, cursor).map(|next| lexemes[next].kind);
    if follower == Some(LexemeKind::LParen) {
        return None;
    }
    if lexemes.get(cursor).is_some_and(|lexeme| lexeme.kind == LexemeKind::Period) {
        return None;
    }

    Some(Reference {
        keyword: index,
        parts,
        end: cursor,
    })
}

fn needs_namespace(
    lexemes: &[Lexeme<'_>],
    reference: &Reference,
    config: &RewriteConfig,
    ctes: &BTreeSet<String>,
) -> bool {
    let first = &lexemes[reference.parts[0]].text;
    match reference.parts.len() {
        1 => !ctes.contains(&first.to_ascii_lowercase()),
        2 => !config.is_qualified_namespace(first),
        _ => false,
    }
}

/// Names bound by `WITH [RECURSIVE] name [(cols)] AS [[NOT] MATERIALIZED] (...)`.
fn cte_names(lexemes: &[Lexeme<'_>]) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for (index, lexeme) in lexemes.iter().enumerate() {
        if lexeme.is_keyword("with") {
            collect_cte_list(lexemes, index, &mut names);
        }
    }
    names
}

fn collect_cte_list(
    lexemes: &[Lexeme<'_>],
    with: usize,
    names: &mut BTreeSet<String>,
) -> Option<()> {
    let mut cursor = next_significant(lexemes, with + 1)?;
    if lexemes[cursor].is_keyword("recursive") {
        cursor = next_significant(lexemes, cursor + 1)?;
    }
    loop {
        let name = lexemes[cursor].identifier_value()?;
        cursor = next_significant(lexemes, cursor + 1)?;
        if lexemes[cursor].kind == LexemeKind::LParen {
            cursor = next_significant(lexemes, matching_paren(lexemes, cursor)? + 1)?;
        }
        if !lexemes[cursor].is_keyword("as") {
            return None;
        }
        cursor = next_significant(lexemes, cursor + 1)?;
        if lexemes[cursor].is_keyword("not") {
            cursor = next_significant(lexemes, cursor + 1)?;
        }
        if lexemes[cursor].is_keyword("materialized") {
            cursor = next_significant(lexemes, cursor + 1)?;
        }
        if lexemes[cursor].kind != LexemeKind::LParen {
            return None;
        }
        let close = matching_paren(lexemes, cursor)?;
        names.insert(name.to_ascii_lowercase());

        cursor = next_significant(lexemes, close + 1)?;
        if lexemes[cursor].kind != LexemeKind::Comma {
            return Some(());
        }
        cursor = next_significant(lexemes, cursor + 1)?;
    }
}
