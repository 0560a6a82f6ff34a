use anyhow::{Context, Result, anyhow};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::document::{Document, RunReport, TreeWalker, WalkStats};
use crate::exhibits::{ReferenceTable, UsageTracker};
use crate::file_utils::FileManager;

// @module: Application controller for document relabeling

/// How a run writes its results
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overwrite the input document instead of writing a sibling output
    pub in_place: bool,

    /// Replace existing output documents
    pub force_overwrite: bool,

    /// Rewrite in memory and report, but write nothing
    pub dry_run: bool,
}

/// Outcome for one document file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,

    /// Where the document was written, if it was
    pub output: Option<PathBuf>,

    /// Skipped because the output already exists
    pub skipped: bool,

    pub stats: WalkStats,

    /// Keys missed in this file, in scan order
    pub misses: Vec<String>,
}

/// Outcome for a folder run
#[derive(Debug, Clone, Default)]
pub struct FolderReport {
    pub files: Vec<FileReport>,

    /// Files that failed to load, rewrite or save
    pub failed: usize,

    /// Counters summed over all files
    pub stats: WalkStats,

    /// Exhibits not cited by any file of the folder
    pub unused: Vec<String>,
}

/// Main application controller for exhibit relabeling
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Exhibits resolved from the configuration
    table: ReferenceTable,

    // @field: Files a folder run must not treat as documents
    excluded: Vec<PathBuf>,
}

impl Controller {
    /// Build a controller from a loaded configuration.
    ///
    /// `config_dir` anchors a relative `exhibits_file`.
    pub fn with_config(config: Config, config_dir: &Path) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let table = config
            .reference_table(config_dir)
            .context("Failed to build exhibit table")?;

        if table.is_empty() {
            warn!("No exhibits configured, every citation will be reported as not found");
        } else {
            info!("Loaded {} exhibit(s)", table.len());
        }

        let exhibits_path = config.exhibits_path(config_dir);
        let mut controller = Self::with_table(config, table);
        if let Some(path) = exhibits_path {
            controller = controller.exclude(path);
        }
        Ok(controller)
    }

    /// Build a controller around an existing table
    pub fn with_table(config: Config, table: ReferenceTable) -> Self {
        Self {
            config,
            table,
            excluded: Vec::new(),
        }
    }

    /// Skip `path` in folder runs (configuration and exhibit map files)
    pub fn exclude<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.excluded.push(path.as_ref().to_path_buf());
        self
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Relabel a single document file and report unused exhibits
    pub fn run(&self, input_file: &Path, options: &RunOptions) -> Result<RunReport> {
        let mut usage = UsageTracker::new();
        let report = self.process_file(input_file, options, &mut usage)?;
        let unused = usage.report_unused(&self.table);

        Ok(RunReport {
            stats: report.stats,
            misses: report.misses,
            unused,
        })
    }

    /// Relabel every document in a folder.
    ///
    /// One usage tracker spans the whole folder, so an exhibit is unused
    /// only if no file cites it. A failing file is logged and counted.
    pub fn run_folder(&self, input_dir: &Path, options: &RunOptions) -> Result<FolderReport> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let relabel = &self.config.relabel;
        let documents =
            FileManager::find_documents(input_dir, &relabel.document_extension, &relabel.output_suffix)?;
        let documents: Vec<PathBuf> = documents
            .into_iter()
            .filter(|path| {
                let excluded = self
                    .excluded
                    .iter()
                    .any(|skip| FileManager::same_file(path, skip));
                if excluded {
                    debug!("Skipping {:?}, not a document", path);
                }
                !excluded
            })
            .collect();
        info!("Found {} document(s) in {:?}", documents.len(), input_dir);

        let mut usage = UsageTracker::new();
        let mut folder = FolderReport::default();

        for path in documents {
            match self.process_file(&path, options, &mut usage) {
                Ok(report) => {
                    folder.stats.add(&report.stats);
                    folder.files.push(report);
                }
                Err(e) => {
                    error!("Error processing {:?}: {:#}", path, e);
                    folder.failed += 1;
                }
            }
        }

        folder.unused = usage.report_unused(&self.table);
        info!(
            "Finished processing {} file(s): {} replacement(s), {} failure(s)",
            folder.files.len(),
            folder.stats.replacements,
            folder.failed
        );

        Ok(folder)
    }

    fn output_path(&self, input_file: &Path, options: &RunOptions) -> PathBuf {
        if options.in_place {
            return input_file.to_path_buf();
        }
        let relabel = &self.config.relabel;
        let output_dir = input_file.parent().unwrap_or(Path::new("."));
        FileManager::generate_output_path(
            input_file,
            output_dir,
            &relabel.output_suffix,
            &relabel.document_extension,
        )
    }

    fn process_file(
        &self,
        input_file: &Path,
        options: &RunOptions,
        usage: &mut UsageTracker,
    ) -> Result<FileReport> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = self.output_path(input_file, options);
        if !options.in_place && !options.dry_run && output_path.exists() && !options.force_overwrite {
            warn!(
                "Skipping {:?}, output already exists (use -f to force overwrite)",
                input_file
            );
            return Ok(FileReport {
                input: input_file.to_path_buf(),
                output: None,
                skipped: true,
                stats: WalkStats::default(),
                misses: Vec::new(),
            });
        }

        let mut document = Document::from_file(input_file)
            .with_context(|| format!("Failed to load document: {:?}", input_file))?;

        let misses_before = usage.misses().len();
        let root = document.root();
        let stats = TreeWalker::new(&self.table)
            .with_links(self.config.relabel.attach_links)
            .walk(&mut document, &root, usage)
            .with_context(|| format!("Failed to relabel document: {:?}", input_file))?;
        let misses = usage.misses()[misses_before..].to_vec();

        info!(
            "{:?}: {} replacement(s) in {} of {} text node(s), {} not found",
            input_file,
            stats.replacements,
            stats.rewritten_nodes,
            stats.text_nodes,
            misses.len()
        );

        let changed = stats.rewritten_nodes > 0 || stats.links > 0;
        let write_needed = !options.dry_run && (!options.in_place || changed);
        let output = if write_needed {
            document.save(&output_path)?;
            info!("Success: {:?}", output_path);
            Some(output_path)
        } else {
            None
        };

        debug!("Processed {:?} in {:?}", input_file, start_time.elapsed());

        Ok(FileReport {
            input: input_file.to_path_buf(),
            output,
            skipped: false,
            stats,
            misses,
        })
    }
}
