use crate::artifacts::errors::{ExtractError, Result};
use crate::artifacts::lzw::decoder::LzwDecoder;
use crate::artifacts::report::ExtractionReport;
use crate::artifacts::tar::header::EntryKind;
use crate::artifacts::tar::reader::{TarEntry, TarReader};
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag a caller can set to abort extraction; checked between decode
/// steps, so an abort takes effect without waiting for the whole file.
pub type CancelFlag = Arc<AtomicBool>;

const COPY_BUFFER_SIZE: usize = 8192;

/// Drives the LZW decoder into either a single output file or the tar
/// reader, materializing results under the target directory.
///
/// The pipeline owns no stream state of its own; independent instances can
/// run concurrently over different inputs without coordination.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    target_dir: PathBuf,
    /// Keep going past entry-local failures instead of aborting the file
    continue_on_error: bool,
    cancel: CancelFlag,
}

impl ExtractionPipeline {
    pub fn new(target_dir: PathBuf, continue_on_error: bool) -> Self {
        ExtractionPipeline {
            target_dir,
            continue_on_error,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Returns the flag that aborts this pipeline when set.
    pub fn cancel_flag(&self) -> CancelFlag {
        Arc::clone(&self.cancel)
    }

    /// Decodes one `.Z` stream. In archive mode the decompressed bytes are
    /// unpacked entry by entry; otherwise they are written to a single file
    /// named `output_name` under the target directory.
    pub fn extract<R: Read>(
        &self,
        input: R,
        output_name: &str,
        archive: bool,
    ) -> Result<ExtractionReport> {
        let decoder = LzwDecoder::new(input)?;
        let mut report = ExtractionReport::default();

        if archive {
            self.extract_archive(decoder, &mut report)?;
        } else {
            self.extract_single_file(decoder, output_name, &mut report)?;
        }

        Ok(report)
    }

    fn extract_single_file<R: Read>(
        &self,
        mut decoder: LzwDecoder<R>,
        output_name: &str,
        report: &mut ExtractionReport,
    ) -> Result<()> {
        std::fs::create_dir_all(&self.target_dir)?;
        let dest = self.target_dir.join(output_name);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&dest)?;

        match self.copy_cancellable(&mut decoder, &mut file) {
            Ok(bytes) => {
                report.record_written(PathBuf::from(output_name), bytes);
                Ok(())
            }
            Err(err) => {
                // never leave a silently truncated result behind
                drop(file);
                let _ = std::fs::remove_file(&dest);
                Err(err)
            }
        }
    }

    fn extract_archive<R: Read>(
        &self,
        decoder: LzwDecoder<R>,
        report: &mut ExtractionReport,
    ) -> Result<()> {
        std::fs::create_dir_all(&self.target_dir)?;
        let mut reader = TarReader::new(decoder);

        loop {
            if self.cancel.load(Ordering::Relaxed) {
                return Err(ExtractError::Interrupted);
            }

            let Some(entry) = reader.next_entry()? else {
                return Ok(());
            };
            let entry_name = entry.header().name.clone();

            match self.write_entry(entry) {
                Ok(Some((path, bytes))) => report.record_written(path, bytes),
                Ok(None) => {}
                // entry-local failures leave the stream position intact,
                // so the archive can continue when the policy allows it
                Err(err) if self.continue_on_error && is_entry_local(&err) => {
                    report.record_failure(entry_name, err.to_string());
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Materializes one entry. Returns the relative path and byte count of
    /// what was written, or `None` for skipped entry kinds.
    fn write_entry<R: Read>(&self, mut entry: TarEntry<'_, R>) -> Result<Option<(PathBuf, u64)>> {
        let kind = entry.header().kind;
        match kind {
            EntryKind::Directory => {
                let rel = entry.sanitized_path()?;
                if rel.as_os_str().is_empty() {
                    // a "./" entry names the target directory itself
                    return Ok(None);
                }
                std::fs::create_dir_all(self.target_dir.join(&rel))?;
                Ok(Some((rel, 0)))
            }
            EntryKind::Regular => {
                let rel = entry.sanitized_path()?;
                let dest = self.target_dir.join(&rel);
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                // overwrite policy: always replace an existing file
                let mut file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&dest)?;

                let bytes = match self.copy_cancellable(&mut entry, &mut file) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        drop(file);
                        let _ = std::fs::remove_file(&dest);
                        return Err(err);
                    }
                };

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let mode = entry.header().mode.permissions();
                    if mode != 0 {
                        let permissions = std::fs::Permissions::from_mode(mode);
                        std::fs::set_permissions(&dest, permissions)?;
                    }
                }

                Ok(Some((rel, bytes)))
            }
            // links, devices and FIFOs are out of scope; their bodies are
            // consumed by the reader when advancing
            _ => Ok(None),
        }
    }

    fn copy_cancellable<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> Result<u64> {
        let mut buffer = [0u8; COPY_BUFFER_SIZE];
        let mut total = 0u64;

        loop {
            if self.cancel.load(Ordering::Relaxed) {
                return Err(ExtractError::Interrupted);
            }

            let count = reader.read(&mut buffer).map_err(ExtractError::from_io)?;
            if count == 0 {
                return Ok(total);
            }
            writer.write_all(&buffer[..count])?;
            total += count as u64;
        }
    }
}

/// Whether a failure is confined to the entry being written, as opposed to
/// corrupting the position of the underlying stream. Engine failures
/// surface as their own variants and are never entry-local.
fn is_entry_local(err: &ExtractError) -> bool {
    matches!(
        err,
        ExtractError::PathTraversal(_) | ExtractError::Io(_)
    )
}
