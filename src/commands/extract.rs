use crate::areas::extractor::Extractor;
use crate::areas::pipeline::ExtractionPipeline;
use crate::areas::workspace::CompressedFile;
use crate::artifacts::report::ExtractionReport;
use anyhow::Context;
use bytes::Bytes;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

impl Extractor {
    /// Scans the workspace and extracts every discovered `.Z` file.
    ///
    /// Failures are isolated per file: one corrupt archive does not block
    /// the rest of the batch unless strict mode is set.
    pub fn extract_all(&mut self) -> anyhow::Result<()> {
        let files = self.workspace().scan(self.options().recursive)?;
        if files.is_empty() {
            writeln!(self.writer(), "No .Z files found in the directory.")?;
            return Ok(());
        }

        let pipeline = self.pipeline();
        let mut failed_files = 0usize;

        for file in files {
            writeln!(self.writer(), "Processing file: {}", file.path.display())?;

            match self.extract_one(&pipeline, &file) {
                Ok(report) if report.is_clean() => {}
                Ok(_) => failed_files += 1,
                Err(err) if self.options().strict => {
                    return Err(err.context(format!("Failed to extract {:?}", file.path)));
                }
                Err(err) => {
                    failed_files += 1;
                    writeln!(
                        self.writer(),
                        "{} extracting {}: {err:#}",
                        "Error".red().bold(),
                        file.path.display()
                    )?;
                }
            }
        }

        if failed_files == 0 {
            writeln!(self.writer(), "{}", "All extractions complete.".green())?;
        } else {
            writeln!(
                self.writer(),
                "{}",
                format!("Extractions complete with {failed_files} failed file(s).").yellow()
            )?;
        }

        Ok(())
    }

    fn extract_one(
        &mut self,
        pipeline: &ExtractionPipeline,
        file: &CompressedFile,
    ) -> anyhow::Result<ExtractionReport> {
        let output_name = file.output_name()?;
        let kind = if file.archive { ".tar.Z" } else { ".Z" };
        writeln!(
            self.writer(),
            "Detected {kind} file. Extracting {}...",
            file.path.display()
        )?;

        let input = self.workspace().open(file)?;
        let report = pipeline
            .extract(input, &output_name, file.archive)
            .with_context(|| format!("Failed to extract {:?}", file.path))?;

        self.render_report(&report)?;
        Ok(report)
    }

    fn render_report(&mut self, report: &ExtractionReport) -> anyhow::Result<()> {
        let preview = self.options().preview;
        let target_dir = self.target_dir().clone();

        for entry in report.written() {
            writeln!(self.writer(), "Extracted: {}", entry.path.display())?;
            if preview && entry.bytes > 0 {
                self.preview_file(&target_dir.join(&entry.path))?;
            }
        }
        for failure in report.failures() {
            writeln!(
                self.writer(),
                "{} {}: {}",
                "Skipped".yellow(),
                failure.path.display(),
                failure.reason
            )?;
        }

        Ok(())
    }

    /// Prints an extracted file's content to the console, the way the
    /// original tool echoed every text file it unpacked.
    fn preview_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let content = Bytes::from(
            std::fs::read(path).with_context(|| format!("Failed to read back {path:?}"))?,
        );

        writeln!(self.writer(), "Content of {}:", path.display())?;
        writeln!(self.writer(), "------------------------")?;
        writeln!(self.writer(), "{}", String::from_utf8_lossy(&content))?;
        writeln!(self.writer(), "------------------------")?;

        Ok(())
    }
}
