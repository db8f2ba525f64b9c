use crate::areas::extractor::Extractor;
use crate::artifacts::lzw::decoder::LzwDecoder;
use anyhow::Context;
use std::fs::File;
use std::io::BufReader;

impl Extractor {
    /// Decompresses a single `.Z` file to the console writer, `zcat` style.
    pub fn cat(&mut self, path: &str) -> anyhow::Result<()> {
        let handle = File::open(path).with_context(|| format!("Failed to open {path}"))?;
        let mut decoder = LzwDecoder::new(BufReader::new(handle))
            .with_context(|| format!("Failed to decode {path}"))?;

        std::io::copy(&mut decoder, &mut self.writer())
            .with_context(|| format!("Failed to decode {path}"))?;

        Ok(())
    }
}
