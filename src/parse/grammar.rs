use winnow::ascii::{multispace1, Caseless};
use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::{one_of, rest, take_until, take_while};

use crate::{CorrectionRule, ExclusionRule};

// -- Sections ---------------------------------------------------------------

/// The category a directive line is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    Exclusions,
    Priority,
    Custom,
}

/// Skip ahead to just past the first occurrence of `pattern`.
fn seek<'i>(pattern: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    preceded(take_until(0.., pattern), pattern)
}

fn header(input: &mut &str) -> ModalResult<Section> {
    alt((
        seek("general rules:").value(Section::General),
        (seek("exclusion"), seek(":")).value(Section::Exclusions),
        (seek("priority keyword"), seek(":")).value(Section::Priority),
        seek("findings to list first").value(Section::Priority),
        (seek("custom rule"), opt('s'), ':').value(Section::Custom),
    ))
    .parse_next(input)
}

/// Recognize a section header anywhere in the line, ignoring ASCII case.
pub(crate) fn section_header(line: &str) -> Option<Section> {
    let lowered = line.to_ascii_lowercase();
    header.parse_next(&mut lowered.as_str()).ok()
}

/// Lines ending in a colon are treated as headers by the flat grammars.
pub(crate) fn is_colon_header(line: &str) -> bool {
    line.ends_with(':')
}

/// Illustrative lines are never directives.
pub(crate) fn is_example(line: &str) -> bool {
    line.starts_with("Example")
}

// -- Bullets ----------------------------------------------------------------

const BULLETS: [char; 17] = [
    '•', '●', '○', '■', '□', '▪', '▫', '◆', '◇', '★', '☆', '→', '›', '»', '-', '*', '‣',
];

fn marker(input: &mut &str) -> ModalResult<()> {
    (one_of(BULLETS), take_while(0.., char::is_whitespace))
        .void()
        .parse_next(input)
}

/// Drop one leading bullet or dash marker, then trim.
pub(crate) fn strip_bullet(line: &str) -> &str {
    let mut input = line;
    let _ = opt(marker).parse_next(&mut input);
    input.trim()
}

// -- Exclusions -------------------------------------------------------------

fn condition<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded(multispace1, take_until(1.., ')'))
        .parse_next(input)
        .and_then(|cond| ')'.parse_next(input).map(|_| cond))
}

fn find_caseless(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .as_bytes()
        .get(from..)?
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
        .map(|pos| pos + from)
}

/// `<finding> (unless <condition>)`, case-insensitive, anywhere in the line.
/// Anything else is a bare finding.
pub(crate) fn exclusion(line: &str) -> ExclusionRule {
    const OPEN: &str = "(unless";

    let mut from = 1;
    while let Some(at) = find_caseless(line, OPEN, from) {
        let finding = line[..at].trim();
        let mut tail = &line[at + OPEN.len()..];
        if let Ok(cond) = condition.parse_next(&mut tail) {
            let cond = cond.trim();
            if !finding.is_empty() && !cond.is_empty() {
                return ExclusionRule::unless(finding, cond);
            }
        }
        from = at + 1;
    }
    ExclusionRule::finding(line.trim())
}

// -- Corrections ------------------------------------------------------------

fn replace_keyword<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    preceded((Caseless("replace"), multispace1), rest).parse_next(input)
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// `Replace <find> with <replace> [(<description>)]`, quotes optional, found
/// anywhere in the line (`Always replace X with Y` counts).
///
/// The split happens at the last ` with `, so a phrase to find may itself
/// contain the word.
pub(crate) fn correction(line: &str) -> Option<CorrectionRule> {
    let mut from = 0;
    while let Some(at) = find_caseless(line, "replace", from) {
        let mut input = &line[at..];
        if let Ok(body) = replace_keyword.parse_next(&mut input) {
            if let Some(rule) = correction_body(body) {
                return Some(rule);
            }
        }
        from = at + 1;
    }
    None
}

fn correction_body(body: &str) -> Option<CorrectionRule> {
    let lowered = body.to_ascii_lowercase();
    let split = lowered.rfind(" with ")?;
    let find = unquote(&body[..split]);
    let mut target = body[split + " with ".len()..].trim();

    let mut description = None;
    if target.ends_with(')') {
        if let Some(open) = target.rfind('(') {
            let inner = target[open + 1..target.len() - 1].trim();
            if !inner.is_empty() {
                description = Some(inner.to_owned());
            }
            target = target[..open].trim();
        }
    }
    let replace = unquote(target);

    if find.is_empty() || replace.is_empty() {
        return None;
    }
    let rule = CorrectionRule::new(find, replace);
    Some(match description {
        Some(d) => rule.describe(d),
        None => rule,
    })
}
