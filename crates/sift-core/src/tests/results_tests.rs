//! Tests for match excerpts and deduplication.

use camino::Utf8Path;

use crate::{AliasBindingSet, LineCol, Match, Span, dedup_matches, extended_code_frame, prepare_code};

const SOURCE: &str = "fn main() {\n    let a = call(\n        1,\n    );\n}\nlast\n";

fn span_of(needle: &str) -> Span {
    let start = SOURCE.find(needle).unwrap_or_else(|| panic!("{needle:?} not in source"));
    let end = start + needle.len();
    let position = |offset: usize| {
        let before = &SOURCE[..offset];
        let line = before.matches('\n').count() as u32;
        let column = (offset - before.rfind('\n').map_or(0, |nl| nl + 1)) as u32;
        LineCol::new(line, column)
    };
    Span::new(start, end, position(start), position(end))
}

#[test]
fn prepare_code_strips_first_line_indentation() {
    let (code, base) = prepare_code(SOURCE, &span_of("let a = call(\n        1,\n    );"));
    assert_eq!(base, 4);
    assert_eq!(code, "let a = call(\n    1,\n);");
}

#[test]
fn prepare_code_keeps_unindented_code() {
    let (code, base) = prepare_code(SOURCE, &span_of("last"));
    assert_eq!((code.as_str(), base), ("last", 0));
}

#[test]
fn short_matches_gain_context_lines() {
    let frame = extended_code_frame(SOURCE, &span_of("1,"));
    assert_eq!(frame.start_line, 1);
    assert_eq!(frame.code, "    let a = call(\n        1,\n    );");
}

#[test]
fn long_matches_keep_their_lines() {
    let frame = extended_code_frame(SOURCE, &span_of("let a = call(\n        1,\n    );"));
    assert_eq!(frame.start_line, 1);
    assert_eq!(frame.code, "    let a = call(\n        1,\n    );");
}

#[test]
fn first_line_matches_only_extend_downwards() {
    let frame = extended_code_frame(SOURCE, &span_of("fn main"));
    assert_eq!(frame.start_line, 0);
    assert_eq!(frame.code, "fn main() {\n    let a = call(");
}

#[test]
fn dedup_keeps_first_of_each_span() {
    let path = Utf8Path::new("a.toy");
    let span = span_of("last");
    let other = span_of("1,");
    let matches = vec![
        Match::new(path, 0, span, SOURCE, AliasBindingSet::new()),
        Match::new(path, 1, span, SOURCE, AliasBindingSet::new()),
        Match::new(path, 1, other, SOURCE, AliasBindingSet::new()),
        Match::new(Utf8Path::new("b.toy"), 1, span, SOURCE, AliasBindingSet::new()),
    ];
    let kept: Vec<_> = dedup_matches(matches)
        .iter()
        .map(|found| (found.file_path().to_string(), found.query_index()))
        .collect();
    assert_eq!(
        kept,
        vec![
            ("a.toy".to_owned(), 0),
            ("a.toy".to_owned(), 1),
            ("b.toy".to_owned(), 1),
        ]
    );
}

#[test]
fn match_serialises_camel_case_fields() {
    let found = Match::new(Utf8Path::new("a.toy"), 0, span_of("last"), SOURCE, AliasBindingSet::new());
    let json = serde_json::to_value(&found).unwrap_or_else(|err| panic!("serialise: {err}"));
    assert_eq!(json["filePath"], "a.toy");
    assert_eq!(json["code"], "last");
    assert_eq!(json["extendedCodeFrame"]["startLine"], 4);
    assert!(json["aliases"]["identifierAliases"].as_object().is_some());
}
