use std::borrow::Cow;
use std::ops::Range;

use crate::lexer::{
    collapse_whitespace, lex, matching_paren, next_significant, render, Lexeme, LexemeKind,
    Nesting,
};
use crate::pipeline::registry::RuleOutcome;
use crate::{GeosqlError, RewriteConfig};

/// Words that end a `GROUP BY` list at its own nesting level.
const GROUP_BY_TERMINATORS: &[&str] = &[
    "having",
    "order",
    "limit",
    "offset",
    "fetch",
    "window",
    "qualify",
    "union",
    "intersect",
    "except",
    "with",
];

/// Expressions compared token by token, ignoring whitespace and comments;
/// identifiers compare case-insensitively and without quotes.
type Signature = Vec<String>;

struct GroupByClause {
    list_start: usize,
    items: Vec<Range<usize>>,
    end: usize,
}

pub(crate) fn rewrite_statement(
    sql: &str,
    config: &RewriteConfig,
) -> Result<RuleOutcome, GeosqlError> {
    let fallback = config.fallback_geometry_alias.as_deref();
    let lexemes = collapse_whitespace(lex(sql)?);
    let targets = group_by_targets(&lexemes, config);
    let mut stripped = strip_group_by_targets(&lexemes, &targets, fallback);
    let emptied_tail = match stripped.last_mut() {
        Some(tail) if tail.kind == LexemeKind::Unreadable => {
            tail.text = Cow::Owned(normalize_unreadable(&tail.text, fallback));
            tail.text.is_empty()
        }
        _ => false,
    };
    if emptied_tail {
        stripped.pop();
    }
    Ok(RuleOutcome::from_rewrite(
        sql,
        render(&collapse_whitespace(stripped)),
    ))
}

/// Text the tokenizer could not read gets the plain-text treatment:
/// whitespace runs collapse and `GROUP BY <fallback>` is dropped.
fn normalize_unreadable(text: &str, fallback: Option<&str>) -> String {
    let mut normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let Some(alias) = fallback else {
        return normalized;
    };
    let target = format!("GROUP BY {alias}");
    let mut from = 0;
    while let Some(found) = normalized[from..].find(&target) {
        let start = from + found;
        let end = start + target.len();
        if normalized[end..].starts_with(|ch: char| ch.is_ascii_alphanumeric() || ch == '_') {
            from = end;
            continue;
        }
        let start = if normalized[..start].ends_with(' ') {
            start - 1
        } else {
            start
        };
        normalized.replace_range(start..end, "");
        from = start;
    }
    normalized
}

fn is_fallback_alias(item: &[Lexeme<'_>], fallback: Option<&str>) -> bool {
    match (item, fallback) {
        ([lexeme], Some(alias)) => lexeme.kind == LexemeKind::Word && lexeme.text == alias,
        _ => false,
    }
}

fn signature(lexemes: &[Lexeme<'_>]) -> Signature {
    lexemes
        .iter()
        .filter(|lexeme| !lexeme.is_trivia())
        .map(Lexeme::match_key)
        .collect()
}

/// Geometry serialization calls in the first projection list and their
/// aliases.
fn group_by_targets(lexemes: &[Lexeme<'_>], config: &RewriteConfig) -> Vec<Signature> {
    let mut targets = Vec::new();
    let nesting = Nesting::of(lexemes);
    let Some(span) = projection_span(lexemes, &nesting) else {
        return targets;
    };

    let mut index = span.start;
    while index < span.end {
        let lexeme = &lexemes[index];
        let close = if lexeme.kind == LexemeKind::Word && config.is_geometry_function(&lexeme.text)
        {
            next_significant(lexemes, index + 1)
                .filter(|open| lexemes[*open].kind == LexemeKind::LParen)
                .and_then(|open| matching_paren(lexemes, open))
        } else {
            None
        };
        let Some(close) = close else {
            index += 1;
            continue;
        };

        targets.push(signature(&lexemes[index..=close]));
        if let Some(alias) = alias_after(lexemes, close) {
            targets.push(vec![alias.to_ascii_lowercase()]);
        }
        index = close + 1;
    }
    targets
}

/// Lexemes strictly between the first `SELECT` and the `FROM` at its level.
fn projection_span(lexemes: &[Lexeme<'_>], nesting: &Nesting) -> Option<Range<usize>> {
    let select = lexemes.iter().position(|lexeme| lexeme.is_keyword("select"))?;
    let depth = nesting.depth(select);
    for index in select + 1..lexemes.len() {
        if nesting.depth(index) < depth {
            return None;
        }
        if nesting.depth(index) == depth && lexemes[index].is_keyword("from") {
            return Some(select + 1..index);
        }
    }
    None
}

fn alias_after(lexemes: &[Lexeme<'_>], close: usize) -> Option<String> {
    let keyword = next_significant(lexemes, close + 1)?;
    if !lexemes[keyword].is_keyword("as") {
        return None;
    }
    let alias = next_significant(lexemes, keyword + 1)?;
    lexemes[alias].identifier_value()
}

/// Removes matching `GROUP BY` items. The fallback alias only matches as a
/// bare word spelled exactly as configured.
fn strip_group_by_targets<'a>(
    lexemes: &[Lexeme<'a>],
    targets: &[Signature],
    fallback: Option<&str>,
) -> Vec<Lexeme<'a>> {
    let mut out: Vec<Lexeme<'a>> = Vec::with_capacity(lexemes.len());
    let mut index = 0;
    while index < lexemes.len() {
        let Some(clause) = group_by_clause(lexemes, index) else {
            out.push(lexemes[index].clone());
            index += 1;
            continue;
        };

        let kept = clause
            .items
            .iter()
            .filter(|item| {
                let item = &lexemes[(*item).clone()];
                !targets.contains(&signature(item)) && !is_fallback_alias(item, fallback)
            })
            .cloned()
            .collect::<Vec<_>>();

        if kept.len() == clause.items.len() {
            out.extend(lexemes[index..clause.end].iter().cloned());
        } else if kept.is_empty() {
            while out.last().is_some_and(|lexeme| lexeme.kind == LexemeKind::Space) {
                out.pop();
            }
        } else {
            out.extend(lexemes[index..clause.list_start].iter().cloned());
            for (position, item) in kept.into_iter().enumerate() {
                if position > 0 {
                    out.push(Lexeme {
                        kind: LexemeKind::Comma,
                        text: Cow::Borrowed(","),
                    });
                    out.push(Lexeme::space());
                }
                out.extend(lexemes[item].iter().cloned());
            }
        }
        index = clause.end;
    }
    out
}

fn group_by_clause(lexemes: &[Lexeme<'_>], index: usize) -> Option<GroupByClause> {
    if !lexemes[index].is_keyword("group") {
        return None;
    }
    let by = next_significant(lexemes, index + 1).filter(|by| lexemes[*by].is_keyword("by"))?;
    let list_start = next_significant(lexemes, by + 1)?;

    let mut items = Vec::new();
    let mut item_start = list_start;
    let mut depth = 0usize;
    let mut cursor = list_start;
    while cursor < lexemes.len() {
        let lexeme = &lexemes[cursor];
        match lexeme.kind {
            LexemeKind::LParen => depth += 1,
            LexemeKind::RParen if depth == 0 => break,
            LexemeKind::RParen => depth -= 1,
            LexemeKind::SemiColon if depth == 0 => break,
            LexemeKind::Unreadable => break,
            LexemeKind::Comma if depth == 0 => {
                items.push(trim_trivia(lexemes, item_start..cursor));
                item_start = cursor + 1;
            }
            LexemeKind::Word if depth == 0 && lexeme.is_any_keyword(GROUP_BY_TERMINATORS) => break,
            _ => {}
        }
        cursor += 1;
    }
    items.push(trim_trivia(lexemes, item_start..cursor));
    items.retain(|item| !item.is_empty());

    let end = items.last().map_or(list_start, |item| item.end);
    Some(GroupByClause {
        list_start,
        items,
        end,
    })
}

fn trim_trivia(lexemes: &[Lexeme<'_>], mut range: Range<usize>) -> Range<usize> {
    while range.start < range.end && lexemes[range.start].is_trivia() {
        range.start += 1;
    }
    while range.end > range.start && lexemes[range.end - 1].is_trivia() {
        range.end -= 1;
    }
    range
}
