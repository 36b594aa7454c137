use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::analyzer::language::Language;
use crate::constants::analysis::MAX_FILE_SIZE;

/// Default directories to skip
const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    ".git",
    "build",
    "dist",
    "__pycache__",
    "vendor",
    ".venv",
];

/// Walks a directory for files the analyzer understands
pub struct FileScanner {
    root: PathBuf,
    exclude: Vec<String>,
    max_file_size: u64,
}

impl FileScanner {
    /// Scanner with the default skip directories excluded
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let exclude = DEFAULT_SKIP_DIRS
            .iter()
            .flat_map(|d| [format!("{}/**", d), format!("**/{}/**", d)])
            .collect();
        Self {
            root: root.as_ref().to_path_buf(),
            exclude,
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Additional glob patterns, matched against paths relative to the root
    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude.extend(patterns);
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Supported files under the root, sorted by path
    pub fn scan(&self) -> Vec<ScannedFile> {
        let supported = Language::supported_extensions();
        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() || self.should_exclude(path) {
                continue;
            }

            let Some(extension) = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
            else {
                continue;
            };
            if !supported.contains(&extension.as_str()) {
                continue;
            }

            if let Ok(metadata) = path.metadata() {
                if metadata.len() > self.max_file_size {
                    tracing::debug!(path = %path.display(), size = metadata.len(), "Skipping large file");
                    continue;
                }

                files.push(ScannedFile {
                    path: path.to_path_buf(),
                    relative: self.relative(path),
                    size: metadata.len(),
                    extension,
                });
            }
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        files
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let relative = self.relative(path);

        self.exclude.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(&relative))
                .unwrap_or(false)
        })
    }
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated
    pub relative: String,
    pub size: u64,
    pub extension: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_filters_supported_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app.py", "def f():\n    pass\n");
        write(dir.path(), "web/site.css", ".a {}\n");
        write(dir.path(), "notes.txt", "hello\n");
        write(dir.path(), "node_modules/lib/index.js", "function x() {}\n");

        let files: Vec<String> = FileScanner::new(dir.path())
            .scan()
            .into_iter()
            .map(|f| f.relative)
            .collect();

        assert_eq!(files, vec!["app.py", "web/site.css"]);
    }

    #[test]
    fn test_custom_exclude_and_size_limit() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "keep.rs", "fn a() {}\n");
        write(dir.path(), "gen/out.rs", "fn b() {}\n");
        write(dir.path(), "big.js", &"x".repeat(64));

        let files: Vec<String> = FileScanner::new(dir.path())
            .with_exclude(vec!["gen/**".to_string()])
            .with_max_file_size(32)
            .scan()
            .into_iter()
            .map(|f| f.relative)
            .collect();

        assert_eq!(files, vec!["keep.rs"]);
    }
}
