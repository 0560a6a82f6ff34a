/*!
 * Document tree traversal.
 *
 * Visits nodes pre-order, children in index order, and rewrites each text
 * leaf in place before moving on to its next sibling. Only changed citations
 * are spliced, so the rest of a leaf keeps its formatting. The reference table
 * and the usage tracker are passed in explicitly; nothing is global.
 */

use log::{debug, trace};

use crate::document::{DocumentProvider, NodeKind};
use crate::exhibits::{ReferenceTable, TextRewriter, UsageTracker};

/// Counters collected during a walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Every node visited, containers included
    pub nodes_visited: usize,
    pub text_nodes: usize,
    /// Text nodes written back
    pub rewritten_nodes: usize,
    pub replacements: usize,
    /// Links added or changed
    pub links: usize,
}

impl WalkStats {
    /// Accumulate another walk's counters
    pub fn add(&mut self, other: &WalkStats) {
        self.nodes_visited += other.nodes_visited;
        self.text_nodes += other.text_nodes;
        self.rewritten_nodes += other.rewritten_nodes;
        self.replacements += other.replacements;
        self.links += other.links;
    }
}

/// Walks a document and rewrites every citation it can resolve
pub struct TreeWalker<'a> {
    rewriter: TextRewriter<'a>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self {
            rewriter: TextRewriter::new(table),
        }
    }

    pub fn with_links(mut self, attach_links: bool) -> Self {
        self.rewriter = self.rewriter.with_links(attach_links);
        self
    }

    /// Walk the subtree under `root`.
    ///
    /// Provider errors abort the walk and are returned unchanged; nodes
    /// visited before the failure stay rewritten.
    pub fn walk<P>(
        &self,
        provider: &mut P,
        root: &P::Node,
        usage: &mut UsageTracker,
    ) -> Result<WalkStats, P::Error>
    where
        P: DocumentProvider,
    {
        let mut stats = WalkStats::default();
        self.visit(provider, root, usage, &mut stats)?;
        Ok(stats)
    }

    fn visit<P>(
        &self,
        provider: &mut P,
        node: &P::Node,
        usage: &mut UsageTracker,
        stats: &mut WalkStats,
    ) -> Result<(), P::Error>
    where
        P: DocumentProvider,
    {
        stats.nodes_visited += 1;
        match provider.node_kind(node)? {
            NodeKind::Text => self.visit_text(provider, node, usage, stats),
            NodeKind::Container => {
                let count = provider.child_count(node)?;
                for index in 0..count {
                    let child = provider.child(node, index)?;
                    self.visit(provider, &child, usage, stats)?;
                }
                Ok(())
            }
        }
    }

    fn visit_text<P>(
        &self,
        provider: &mut P,
        node: &P::Node,
        usage: &mut UsageTracker,
        stats: &mut WalkStats,
    ) -> Result<(), P::Error>
    where
        P: DocumentProvider,
    {
        stats.text_nodes += 1;
        let text = provider.text(node)?;
        let rewrite = self.rewriter.rewrite(&text, usage);

        if rewrite.is_modified() {
            debug!(
                "Rewrote {} citation(s), text length {} -> {}",
                rewrite.replacements,
                text.len(),
                rewrite.text.len()
            );
            for splice in &rewrite.splices {
                provider.replace_range(node, splice.range.clone(), &splice.replacement)?;
            }
            stats.rewritten_nodes += 1;
            stats.replacements += rewrite.replacements;
        } else {
            trace!("No exhibit replacements in text node of {} bytes", text.len());
        }

        for link in &rewrite.links {
            let current = provider.link_url(node, link.range.clone())?;
            if current.as_deref() != Some(link.url.as_str()) {
                provider.set_link_url(node, link.range.clone(), &link.url)?;
                stats.links += 1;
            }
        }

        Ok(())
    }
}

/// Result of a complete relabeling run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub stats: WalkStats,
    /// Keys cited but missing from the table, in scan order
    pub misses: Vec<String>,
    /// Table keys never cited, sorted
    pub unused: Vec<String>,
}

/// Relabel one document and report unused exhibits
pub fn relabel_document<P>(
    provider: &mut P,
    root: &P::Node,
    table: &ReferenceTable,
    attach_links: bool,
) -> Result<RunReport, P::Error>
where
    P: DocumentProvider,
{
    let mut usage = UsageTracker::new();
    let stats = TreeWalker::new(table)
        .with_links(attach_links)
        .walk(provider, root, &mut usage)?;
    let unused = usage.report_unused(table);

    Ok(RunReport {
        stats,
        misses: usage.misses().to_vec(),
        unused,
    })
}
