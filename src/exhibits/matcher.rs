/*!
 * Quote-aware citation scanner.
 *
 * Finds citations of the form `"EXHIBIT <id> <key>"` in a text node. The
 * opening and closing quote may each be a straight or a curly double quote,
 * independently of each other.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters accepted as either end of a citation
pub const QUOTE_CHARS: [char; 3] = ['"', '\u{201C}', '\u{201D}'];

/// Citation grammar.
///
/// The id token is optional; when present it is a word optionally followed
/// by a page marker and/or a dash, or a bare dash. The key is everything from
/// the first digit up to the next quote.
static CITATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        (?P<open>["\u{201C}\u{201D}])
        EXH(?:IBIT)?
        \s+
        (?:
            (?: \w+ (?:\s+p\d+)? (?:\s+(?:--|[-\u{2013}\u{2014}]))? | -- | [-\u{2013}\u{2014}] )
            \s+
        )?
        (?P<key>[0-9][^"\u{201C}\u{201D}]*)
        (?P<close>["\u{201C}\u{201D}])
        "#,
    )
    .expect("Invalid citation regex")
});

pub fn is_quote_char(c: char) -> bool {
    QUOTE_CHARS.contains(&c)
}

/// A citation located in the text it was scanned from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationMatch {
    /// Byte offset of the opening quote
    pub start: usize,

    /// Byte length of the whole span, both quotes included
    pub len: usize,

    pub quote_open: char,

    pub quote_close: char,

    /// Lookup key: the digit-leading remainder, quotes excluded
    pub key: String,
}

impl CitationMatch {
    /// Byte offset just past the closing quote
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Lazy left-to-right scan over one text.
///
/// After each candidate, scanning resumes past the whole span, so the same
/// citation is never examined twice whether or not its key resolves. The
/// closing quote belongs to its span and never opens the next citation.
pub struct CitationMatches<'t> {
    text: &'t str,
    pos: usize,
    done: bool,
}

impl<'t> CitationMatches<'t> {
    pub fn new(text: &'t str, start: usize) -> Self {
        Self {
            text,
            pos: start.min(text.len()),
            done: false,
        }
    }

    /// Current scan position
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for CitationMatches<'_> {
    type Item = CitationMatch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(caps) = CITATION_REGEX.captures_at(self.text, self.pos) else {
            self.done = true;
            self.pos = self.text.len();
            return None;
        };

        let (Some(whole), Some(open), Some(key), Some(close)) = (
            caps.get(0),
            caps.name("open"),
            caps.name("key"),
            caps.name("close"),
        ) else {
            self.done = true;
            return None;
        };

        self.pos = whole.end();

        let quote_open = open.as_str().chars().next()?;
        let quote_close = close.as_str().chars().next()?;

        Some(CitationMatch {
            start: whole.start(),
            len: whole.len(),
            quote_open,
            quote_close,
            key: key.as_str().to_string(),
        })
    }
}

impl std::iter::FusedIterator for CitationMatches<'_> {}

/// Scan a whole text from the beginning
pub fn find_citations(text: &str) -> CitationMatches<'_> {
    CitationMatches::new(text, 0)
}
