/*!
 * Tests for quote-aware citation scanning
 */

use exhibit_linker::exhibits::matcher::{CitationMatches, find_citations};

/// Test the canonical citation form
#[test]
fn test_find_citations_withScenarioText_shouldLocateWholeQuotedSpan() {
    let text = r#"... see "EXHIBIT 20160217 exhibit desc" for proof"#;
    let matches: Vec<_> = find_citations(text).collect();

    assert_eq!(matches.len(), 1);
    let citation = &matches[0];
    assert_eq!(citation.key, "20160217 exhibit desc");
    assert_eq!(citation.start, text.find('"').unwrap());
    assert!(text[citation.start..citation.end()].starts_with('"'));
    assert!(text[citation.start..citation.end()].ends_with('"'));
}

/// Test that the key never contains the quotes nor the id token
#[test]
fn test_find_citations_withPageMarkerId_shouldReturnDigitLeadingKey() {
    let text = "\u{201C}EXHIBIT AA p11 20160217 exhibit desc\u{201D}";
    let citation = find_citations(text).next().expect("citation");

    assert_eq!(citation.key, "20160217 exhibit desc");
    assert_eq!(citation.quote_open, '\u{201C}');
    assert_eq!(citation.quote_close, '\u{201D}');
    assert_eq!(citation.start, 0);
    assert_eq!(citation.len, text.len());
}

/// Test scanning several citations with text between them
#[test]
fn test_find_citations_withSeveralCitations_shouldReturnThemInOrder() {
    let text = r#"first "EXH - 1 a", then "EXHIBIT B 2 b" and finally "EXHIBIT -- 3 c"."#;
    let keys: Vec<_> = find_citations(text).map(|m| m.key).collect();
    assert_eq!(keys, vec!["1 a", "2 b", "3 c"]);
}

/// Test that ordinary quoted text is not a citation
#[test]
fn test_find_citations_withPlainQuotes_shouldIgnoreThem() {
    let text = r#"He said "hello" and "EXHIBIT" and "EXH AB" and "2019 report"."#;
    assert_eq!(find_citations(text).count(), 0);
}

/// Test that a whitespace run after the keyword is accepted
#[test]
fn test_find_citations_withWhitespaceRuns_shouldMatch() {
    let text = "\"EXHIBIT\t AA p3\n 42 notes\"";
    let citation = find_citations(text).next().expect("citation");
    assert_eq!(citation.key, "42 notes");
}

/// Test monotonic progress: at most one match per quote-delimited substring
#[test]
fn test_find_citations_withManyCandidates_shouldNotExceedQuotedSubstrings() {
    let mut text = String::new();
    for i in 0..50 {
        text.push_str(&format!("\"EXH - {} item\" ", i));
        text.push_str("\"not a citation\" ");
    }
    let quoted_substrings = text.matches('"').count() / 2;

    let matches: Vec<_> = find_citations(&text).collect();

    assert_eq!(matches.len(), 50);
    assert!(matches.len() <= quoted_substrings);
    for pair in matches.windows(2) {
        assert!(pair[0].end() <= pair[1].start, "matches must not overlap");
    }
}

/// Test that a key swallows text up to the next quote of any style
#[test]
fn test_find_citations_withUnterminatedFirstCitation_shouldCloseOnNextQuote() {
    let text = "\"EXH - 1 open ... \u{201D} trailing";
    let citation = find_citations(text).next().expect("citation");
    assert_eq!(citation.key, "1 open ... ");
    assert_eq!(citation.quote_close, '\u{201D}');
}

/// Test resuming a scan from an offset
#[test]
fn test_citation_matches_withOffsetPastFirst_shouldReturnRemaining() {
    let text = r#""EXH - 1 a" "EXH - 2 b" "EXH - 3 c""#;
    let mut scan = find_citations(text);
    let first = scan.next().expect("first");

    let rest: Vec<_> = CitationMatches::new(text, first.end()).map(|m| m.key).collect();
    assert_eq!(rest, vec!["2 b", "3 c"]);
}

/// Test offsets beyond the text are clamped
#[test]
fn test_citation_matches_withOffsetBeyondText_shouldBeEmpty() {
    let text = r#""EXH - 1 a""#;
    assert_eq!(CitationMatches::new(text, 1000).count(), 0);
}
