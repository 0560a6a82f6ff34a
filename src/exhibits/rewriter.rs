/*!
 * Citation rewriting for a single text node.
 *
 * Matches are located against the original text, while replacements are
 * spliced into a working copy. Every splice shifts the later matches by the
 * running length delta before they are applied.
 */

use std::ops::Range;

use log::{debug, trace, warn};

use crate::exhibits::matcher::{CitationMatch, find_citations};
use crate::exhibits::reference_table::ReferenceTable;
use crate::exhibits::usage::UsageTracker;

/// Keyword written into every rewritten citation
pub const EXHIBIT_KEYWORD: &str = "EXHIBIT";

/// Hyperlink annotation over a byte range of the rewritten text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    pub range: Range<usize>,
    pub url: String,
}

/// One replacement, located against the text as it was when the splice
/// happened (earlier splices already applied)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub range: Range<usize>,
    pub replacement: String,
}

/// Outcome of rewriting one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Final text after all splices
    pub text: String,

    /// Splices that changed the text, in application order
    pub splices: Vec<Splice>,

    /// Links to attach, in text order, never overlapping. Citations that
    /// already read canonically still carry their link.
    pub links: Vec<LinkSpan>,

    /// Number of citations whose text changed
    pub replacements: usize,
}

impl Rewrite {
    /// Whether the node text needs to be written back
    pub fn is_modified(&self) -> bool {
        !self.splices.is_empty()
    }
}

/// Build the canonical citation text for a resolved match
fn render_citation(citation: &CitationMatch, label: &str) -> String {
    format!(
        "{}{} {} {}{}",
        citation.quote_open, EXHIBIT_KEYWORD, label, citation.key, citation.quote_close
    )
}

/// Rewrites citations against a reference table
#[derive(Debug, Clone, Copy)]
pub struct TextRewriter<'a> {
    table: &'a ReferenceTable,
    attach_links: bool,
}

impl<'a> TextRewriter<'a> {
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self {
            table,
            attach_links: true,
        }
    }

    /// Enable or disable hyperlink annotations
    pub fn with_links(mut self, attach_links: bool) -> Self {
        self.attach_links = attach_links;
        self
    }

    /// Scan and rewrite `text` in one pass
    pub fn rewrite(&self, text: &str, usage: &mut UsageTracker) -> Rewrite {
        self.apply(text, find_citations(text), usage)
    }

    /// Apply matches located against `text`, in scan order.
    ///
    /// Matches that do not fit `text` (out of bounds, off a char boundary,
    /// or overlapping an earlier match) are skipped with a warning.
    pub fn apply<I>(&self, text: &str, matches: I, usage: &mut UsageTracker) -> Rewrite
    where
        I: IntoIterator<Item = CitationMatch>,
    {
        let mut output = text.to_string();
        let mut splices = Vec::new();
        let mut links = Vec::new();
        let mut delta: isize = 0;
        let mut scanned_to = 0;

        for citation in matches {
            if citation.start < scanned_to || text.get(citation.start..citation.end()).is_none() {
                warn!(
                    "Ignoring citation at {}..{} that does not fit the text",
                    citation.start,
                    citation.end()
                );
                continue;
            }
            scanned_to = citation.end();

            let Some(entry) = self.table.lookup(&citation.key) else {
                warn!("Exhibit not found: {}", citation.key);
                usage.record_miss(&citation.key);
                continue;
            };
            usage.mark_used(&citation.key);

            let replacement = render_citation(&citation, &entry.label);
            let start = citation.start.saturating_add_signed(delta);
            let end = start + citation.len;

            if output[start..end] == replacement {
                trace!("Exhibit already labeled: {}", replacement);
            } else {
                debug!(
                    "Exhibit replacement: {} -> {}",
                    &output[start..end],
                    replacement
                );
                output.replace_range(start..end, &replacement);
                delta += replacement.len() as isize - citation.len as isize;
                splices.push(Splice {
                    range: start..end,
                    replacement,
                });
            }

            if self.attach_links {
                if let Some(url) = &entry.url {
                    let label_start = start + citation.quote_open.len_utf8();
                    let label_end = label_start + EXHIBIT_KEYWORD.len() + 1 + entry.label.len();
                    links.push(LinkSpan {
                        range: label_start..label_end,
                        url: url.clone(),
                    });
                }
            }
        }

        Rewrite {
            text: output,
            replacements: splices.len(),
            splices,
            links,
        }
    }
}
