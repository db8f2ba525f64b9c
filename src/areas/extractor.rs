use crate::areas::pipeline::ExtractionPipeline;
use crate::areas::workspace::Workspace;
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;

/// Directory name extraction results land in when no target is given,
/// matching the original tool's layout.
pub const DEFAULT_TARGET_DIR: &str = "extracted";

/// Behavior switches for a batch run.
#[derive(Debug, Clone, Default)]
pub struct ExtractorOptions {
    /// Scan subdirectories too (the default matches the original tool and
    /// only looks at the top level)
    pub recursive: bool,
    /// All-or-nothing: abort the whole batch on the first failure instead
    /// of reporting it and moving on
    pub strict: bool,
    /// Print the content of extracted text files to the console
    pub preview: bool,
}

/// Orchestrates scanning, extraction and console reporting.
///
/// Console output goes through an injected writer so commands stay
/// testable without capturing stdout.
pub struct Extractor {
    workspace: Workspace,
    target_dir: PathBuf,
    options: ExtractorOptions,
    writer: Box<dyn Write>,
}

impl Extractor {
    pub fn new(
        data_dir: &str,
        target_dir: Option<&str>,
        options: ExtractorOptions,
        writer: Box<dyn Write>,
    ) -> anyhow::Result<Self> {
        let data_dir = std::fs::canonicalize(data_dir)
            .with_context(|| format!("Invalid data directory: {data_dir}"))?;
        let target_dir = match target_dir {
            Some(target) => PathBuf::from(target),
            None => data_dir.join(DEFAULT_TARGET_DIR),
        };

        Ok(Extractor {
            workspace: Workspace::new(data_dir.into()),
            target_dir,
            options,
            writer,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn target_dir(&self) -> &PathBuf {
        &self.target_dir
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    pub(crate) fn pipeline(&self) -> ExtractionPipeline {
        ExtractionPipeline::new(self.target_dir.clone(), !self.options.strict)
    }

    pub(crate) fn writer(&mut self) -> &mut dyn Write {
        self.writer.as_mut()
    }
}
