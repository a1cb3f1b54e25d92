use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use palace_logging::palace_info;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::document_filename;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("unusable output directory: {0}")]
    OutputDir(String),
    #[error("could not write document: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` when missing. An existing non-directory path is an error.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// A scraped page ready to be written as markdown with frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownDocument<'a> {
    pub url: &'a str,
    pub title: Option<&'a str>,
    pub fetched_utc: &'a str,
    pub body: &'a str,
}

impl MarkdownDocument<'_> {
    pub fn filename(&self) -> String {
        document_filename(self.title, self.url)
    }

    pub fn render(&self) -> String {
        format!(
            "---\nurl: {url}\ntitle: {title}\nfetched_utc: {fetched}\n---\n\n{body}\n",
            url = self.url,
            title = self.title.unwrap_or("untitled"),
            fetched = self.fetched_utc,
            body = self.body.trim_end(),
        )
    }
}

/// Writes documents into one directory. Each write goes to a temp file first and
/// is renamed into place, so readers never see a half-written document.
#[derive(Debug, Clone)]
pub struct MarkdownWriter {
    dir: PathBuf,
}

impl MarkdownWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_document(&self, doc: &MarkdownDocument<'_>) -> Result<PathBuf, PersistError> {
        let path = self.write(&doc.filename(), &doc.render())?;
        palace_info!("Wrote {} ({} bytes)", path.display(), doc.body.len());
        Ok(path)
    }

    fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Rename over an existing file is atomic on unix but fails on windows.
        #[cfg(windows)]
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
