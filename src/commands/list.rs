use crate::areas::extractor::Extractor;
use crate::areas::workspace::CompressedFile;
use crate::artifacts::lzw::decoder::LzwDecoder;
use crate::artifacts::report::EntryInfo;
use crate::artifacts::tar::reader::TarReader;
use colored::Colorize;
use std::io::Write;

impl Extractor {
    /// Shows what each discovered `.Z` file would extract to, without
    /// writing anything.
    pub fn list(&mut self) -> anyhow::Result<()> {
        let files = self.workspace().scan(self.options().recursive)?;
        if files.is_empty() {
            writeln!(self.writer(), "No .Z files found in the directory.")?;
            return Ok(());
        }

        for file in files {
            writeln!(
                self.writer(),
                "{}",
                file.path.display().to_string().bold()
            )?;

            let result = if file.archive {
                self.list_archive(&file)
            } else {
                self.list_single(&file)
            };

            if let Err(err) = result {
                if self.options().strict {
                    return Err(err);
                }
                writeln!(self.writer(), "  {} {err:#}", "Error:".red())?;
            }
        }

        Ok(())
    }

    fn list_single(&mut self, file: &CompressedFile) -> anyhow::Result<()> {
        let input = self.workspace().open(file)?;
        let mut decoder = LzwDecoder::new(input)?;
        let bytes = std::io::copy(&mut decoder, &mut std::io::sink())?;

        writeln!(self.writer(), "  - {bytes:>9} {}", file.output_name()?)?;
        Ok(())
    }

    fn list_archive(&mut self, file: &CompressedFile) -> anyhow::Result<()> {
        let input = self.workspace().open(file)?;
        let decoder = LzwDecoder::new(input)?;
        let mut reader = TarReader::new(decoder);

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry()? {
            let header = entry.header();
            entries.push(EntryInfo::new(
                header.name.clone(),
                header.size,
                header.kind,
                header.mtime,
            ));
        }

        for info in entries {
            writeln!(
                self.writer(),
                "  {} {:>9} {} {}",
                info.kind.symbol(),
                info.size,
                info.mtime_string(),
                info.path.display()
            )?;
        }

        Ok(())
    }
}
