//! Local filesystem storage implementation.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{PathsConfig, SubpageKind};

/// Landing page file in a course's scratch folder.
const LANDING_PAGE: &str = "course.html";
/// Canonical syllabus in a course's output folder.
const CANONICAL_SYLLABUS: &str = "syllabus.pdf";
/// Material subfolder in a course's output folder.
const MATERIAL_DIR: &str = "material";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    scratch_root: PathBuf,
    output_root: PathBuf,
}

impl LocalStorage {
    /// Create a storage over a scratch tree and an output tree.
    pub fn new(scratch_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Storage rooted at the configured directories.
    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(&paths.html_dir, &paths.courses_dir)
    }

    /// Paths belonging to one course folder.
    pub fn course(&self, folder: &str) -> CourseDirs {
        CourseDirs {
            folder: folder.to_string(),
            scratch: self.scratch_root.join(folder),
            output: self.output_root.join(folder),
        }
    }

    /// Create the scratch, output and material folders of a course.
    pub async fn ensure_course_dirs(&self, dirs: &CourseDirs) -> Result<()> {
        tokio::fs::create_dir_all(&dirs.scratch).await?;
        tokio::fs::create_dir_all(dirs.material_dir()).await?;
        Ok(())
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    pub async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        Self::ensure_dir(path).await?;

        let tmp = tmp_path(path);
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Write UTF-8 text atomically.
    pub async fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        self.write_bytes(path, text.as_bytes()).await
    }

    /// Read bytes, returning None if file doesn't exist.
    pub async fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read text, returning None if file doesn't exist.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; cached pages are only
    /// ever re-parsed as HTML.
    pub async fn read_text(&self, path: &Path) -> Result<Option<String>> {
        Ok(self
            .read_bytes(path)
            .await?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Whether a file exists. I/O errors count as absent.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Scratch and output locations of one course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDirs {
    pub folder: String,
    pub scratch: PathBuf,
    pub output: PathBuf,
}

impl CourseDirs {
    pub fn landing_page(&self) -> PathBuf {
        self.scratch.join(LANDING_PAGE)
    }

    /// Scratch copy of a subpage: `{tag}.html`, or `{tag}.pdf` for the syllabus file.
    pub fn subpage(&self, kind: SubpageKind) -> PathBuf {
        let ext = match kind {
            SubpageKind::SyllabusFile => "pdf",
            _ => "html",
        };
        self.scratch.join(format!("{}.{ext}", kind.tag()))
    }

    pub fn canonical_syllabus(&self) -> PathBuf {
        self.output.join(CANONICAL_SYLLABUS)
    }

    pub fn material_dir(&self) -> PathBuf {
        self.output.join(MATERIAL_DIR)
    }

    pub fn material(&self, file_name: &str) -> PathBuf {
        self.material_dir().join(file_name)
    }
}
