//! File discovery for batch tagging.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use prism_core::config::ProcessingConfig;

/// Discovers image files under the paths given on the command line.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Discover all supported image files at a path.
    ///
    /// A file path is returned as-is when its extension is supported; a
    /// directory is walked recursively. Results are sorted by path so
    /// batch output order is deterministic.
    pub fn discover(&self, path: &Path) -> Vec<PathBuf> {
        if path.is_file() {
            if self.is_supported(path) {
                return vec![path.to_path_buf()];
            }
            return vec![];
        }

        let mut files: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && self.is_supported(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// Discover across multiple command-line paths, preserving argument
    /// order between paths.
    pub fn discover_all(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths.iter().flat_map(|p| self.discover(p)).collect()
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported() {
        let discovery = FileDiscovery::new(ProcessingConfig::default());

        assert!(discovery.is_supported(Path::new("test.png")));
        assert!(discovery.is_supported(Path::new("test.PNG")));
        assert!(discovery.is_supported(Path::new("test.jpeg")));
        assert!(discovery.is_supported(Path::new("test.webp")));
        assert!(!discovery.is_supported(Path::new("test.txt")));
        assert!(!discovery.is_supported(Path::new("test.onnx")));
    }

    #[test]
    fn test_discover_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let discovery = FileDiscovery::new(ProcessingConfig::default());
        let files = discovery.discover(dir.path());
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.png", "b.png"]);
    }

    #[test]
    fn test_discover_single_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, b"x").unwrap();

        let discovery = FileDiscovery::new(ProcessingConfig::default());
        assert!(discovery.discover(&path).is_empty());
    }
}
