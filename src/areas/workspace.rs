use anyhow::Context;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix identifying compressed files
pub const COMPRESSED_SUFFIX: &str = ".Z";

/// Suffix identifying compressed tar archives
pub const ARCHIVE_SUFFIX: &str = ".tar.Z";

/// The directory being scanned for compressed files.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

/// One discovered `.Z` file and its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedFile {
    pub path: PathBuf,
    /// True for `.tar.Z` payloads, which are unpacked entry by entry
    pub archive: bool,
}

impl CompressedFile {
    /// Output file name: the input name minus the compressed suffix.
    pub fn output_name(&self) -> anyhow::Result<String> {
        let name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {:?}", self.path))?;

        name.strip_suffix(COMPRESSED_SUFFIX)
            .map(String::from)
            .ok_or_else(|| anyhow::anyhow!("Not a compressed file: {name}"))
    }
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lists the `.Z` files under the workspace, sorted by path. A depth of
    /// one matches the original behavior of scanning only the top level.
    pub fn scan(&self, recursive: bool) -> anyhow::Result<Vec<CompressedFile>> {
        if !self.path.exists() {
            anyhow::bail!("The specified path does not exist: {:?}", self.path);
        }
        if !self.path.is_dir() {
            anyhow::bail!("The specified path is not a directory: {:?}", self.path);
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files = WalkDir::new(&self.path)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| Self::classify(entry.path()))
            .collect::<Vec<_>>();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(files)
    }

    /// Classifies a path as a compressed file, or `None` when it is not one.
    /// The suffix match is case-sensitive: `.z` files are a different
    /// (pack-era) format.
    fn classify(path: &Path) -> Option<CompressedFile> {
        let name = path.file_name()?.to_str()?;
        let stem = name.strip_suffix(COMPRESSED_SUFFIX)?;
        if stem.is_empty() {
            return None;
        }

        Some(CompressedFile {
            path: path.to_path_buf(),
            archive: name.ends_with(ARCHIVE_SUFFIX),
        })
    }

    pub fn open(&self, file: &CompressedFile) -> anyhow::Result<BufReader<File>> {
        let handle = File::open(&file.path)
            .with_context(|| format!("Failed to open {:?}", file.path))?;
        Ok(BufReader::new(handle))
    }
}
