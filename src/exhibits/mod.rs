/*!
 * Exhibit citation handling.
 *
 * - `reference_table`: exhibit keys, labels and URLs
 * - `matcher`: quote-aware citation scanning
 * - `rewriter`: in-place citation splicing for one text
 * - `usage`: used/missed key bookkeeping and the unused report
 */

pub mod matcher;
pub mod reference_table;
pub mod rewriter;
pub mod usage;

// Re-export main types
pub use matcher::{CitationMatch, CitationMatches, find_citations};
pub use reference_table::{ExhibitSpec, ReferenceEntry, ReferenceTable};
pub use rewriter::{LinkSpan, Rewrite, Splice, TextRewriter};
pub use usage::UsageTracker;
