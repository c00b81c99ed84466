use crate::config::FileConfig;
use crate::error::{ConversionError, Result};
use globset::{GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Async discovery of record type export files
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// File extensions to include (e.g., ["xml"])
    extensions: Vec<String>,
    /// Include patterns set
    include_set: Option<GlobSet>,
    /// Exclude patterns set
    exclude_set: Option<GlobSet>,
    /// Maximum depth for directory traversal (None = unlimited)
    max_depth: Option<usize>,
}

impl FileDiscovery {
    /// Create a new FileDiscovery instance
    pub fn new() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            include_set: None,
            exclude_set: None,
            max_depth: None,
        }
    }

    /// Build a discovery engine from the file section of the configuration
    pub fn from_config(config: &FileConfig) -> Result<Self> {
        Ok(Self::new()
            .with_extensions(config.extensions.clone())
            .with_include_patterns(config.include_patterns.clone())?
            .with_exclude_patterns(config.exclude_patterns.clone())?
            .with_max_depth(config.max_depth))
    }

    /// Set file extensions to discover
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.to_lowercase())
            .collect();
        self
    }

    /// Add include patterns
    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.include_set = build_glob_set(patterns, "include")?;
        Ok(self)
    }

    /// Add exclude patterns
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.exclude_set = build_glob_set(patterns, "exclude")?;
        Ok(self)
    }

    /// Set maximum traversal depth
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Discover export files in the given path (file or directory), sorted by path
    pub async fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(path).await.map_err(ConversionError::from)?;

        if metadata.is_file() {
            if self.should_process(path) {
                return Ok(vec![path.to_path_buf()]);
            } else {
                return Ok(Vec::new());
            }
        }

        let mut files = Vec::new();

        let mut read_dir =
            fs::read_dir(path)
                .await
                .map_err(|e| ConversionError::FileSystemTraversal {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;

        while let Some(entry) = read_dir.next_entry().await.map_err(ConversionError::from)? {
            let entry_path = entry.path();

            // Symlinks are never followed
            if entry_path.is_symlink() {
                continue;
            }

            // Entries of the root directory are at depth 0
            if let Err(e) = self
                .discover_files_recursive(&entry_path, 0, &mut files)
                .await
            {
                eprintln!("Warning: Error processing {}: {}", entry_path.display(), e);
            }
        }

        // read_dir order is platform dependent; batches run in path order
        files.sort();
        Ok(files)
    }

    /// Recursive helper for discovering files
    fn discover_files_recursive<'a>(
        &'a self,
        path: &'a Path,
        depth: usize,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            if let Some(max_depth) = self.max_depth
                && depth > max_depth
            {
                return Ok(());
            }

            let metadata = fs::metadata(path).await.map_err(ConversionError::from)?;

            if metadata.is_file() {
                if self.should_process(path) {
                    files.push(path.to_path_buf());
                }
            } else if metadata.is_dir() {
                // Files at max_depth are collected, directories there are not entered
                if let Some(max_depth) = self.max_depth
                    && depth >= max_depth
                {
                    return Ok(());
                }

                let mut read_dir = fs::read_dir(path).await.map_err(ConversionError::from)?;

                while let Some(entry) =
                    read_dir.next_entry().await.map_err(ConversionError::from)?
                {
                    let entry_path = entry.path();

                    if entry_path.is_symlink() {
                        continue;
                    }

                    if let Err(e) = self
                        .discover_files_recursive(&entry_path, depth + 1, files)
                        .await
                    {
                        eprintln!("Warning: Error processing {}: {}", entry_path.display(), e);
                    }
                }
            }

            Ok(())
        })
    }

    /// Check if a file should be processed based on extensions and patterns
    pub fn should_process(&self, path: &Path) -> bool {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(extension) if self.extensions.contains(&extension.to_lowercase()) => {}
            _ => return false,
        }

        if let Some(exclude_set) = &self.exclude_set
            && exclude_set.is_match(path)
        {
            return false;
        }

        // If include patterns are given, at least one must match
        if let Some(include_set) = &self.include_set {
            return include_set.is_match(path);
        }

        true
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

fn build_glob_set(patterns: Vec<String>, kind: &str) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = globset::GlobBuilder::new(&pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| {
                ConversionError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
        builder.add(glob);
    }

    let set = builder.build().map_err(|e| {
        ConversionError::Config(format!("Failed to build {} glob set: {}", kind, e))
    })?;
    Ok(Some(set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;
    use tokio::fs;

    const EXPORT: &str = r#"<?xml version="1.0"?><recordTypeHaul/>"#;

    async fn create_test_directory() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("sales")).await.unwrap();
        fs::create_dir_all(root.join("archive/2023")).await.unwrap();

        fs::write(root.join("Invoice.xml"), EXPORT).await.unwrap();
        fs::write(root.join("Customer.XML"), EXPORT).await.unwrap();
        fs::write(root.join("notes.txt"), "not an export").await.unwrap();
        fs::write(root.join("sales/Order.xml"), EXPORT).await.unwrap();
        fs::write(root.join("archive/2023/OldCase.xml"), EXPORT)
            .await
            .unwrap();
        fs::write(root.join("archive/2023/OldCase.md"), "# rendered")
            .await
            .unwrap();

        temp_dir
    }

    fn names(files: &[PathBuf]) -> HashSet<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_discover_export_files() {
        let temp_dir = create_test_directory().await;
        let discovery = FileDiscovery::new();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();

        assert_eq!(files.len(), 4);
        let file_names = names(&files);
        assert!(file_names.contains("Invoice.xml"));
        assert!(file_names.contains("Customer.XML"));
        assert!(file_names.contains("Order.xml"));
        assert!(file_names.contains("OldCase.xml"));
    }

    #[tokio::test]
    async fn test_discovered_files_are_sorted() {
        let temp_dir = create_test_directory().await;
        let files = FileDiscovery::new()
            .discover_files(temp_dir.path())
            .await
            .unwrap();

        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[tokio::test]
    async fn test_max_depth_limit() {
        let temp_dir = create_test_directory().await;
        let discovery = FileDiscovery::new().with_max_depth(Some(1));

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();

        // archive/2023/OldCase.xml sits at depth 2
        let file_names = names(&files);
        assert_eq!(files.len(), 3);
        assert!(file_names.contains("Order.xml"));
        assert!(!file_names.contains("OldCase.xml"));
    }

    #[tokio::test]
    async fn test_include_patterns() {
        let temp_dir = create_test_directory().await;
        let discovery = FileDiscovery::new()
            .with_include_patterns(vec!["**/sales/**".to_string()])
            .unwrap();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();

        assert_eq!(names(&files), HashSet::from(["Order.xml".to_string()]));
    }

    #[tokio::test]
    async fn test_exclude_patterns() {
        let temp_dir = create_test_directory().await;
        let discovery = FileDiscovery::new()
            .with_exclude_patterns(vec!["**/archive/**".to_string()])
            .unwrap();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();

        assert_eq!(files.len(), 3);
        assert!(!names(&files).contains("OldCase.xml"));
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = FileDiscovery::new().with_include_patterns(vec!["a[".to_string()]);
        assert!(matches!(result, Err(ConversionError::Config(_))));
    }

    #[tokio::test]
    async fn test_single_file_path() {
        let temp_dir = create_test_directory().await;
        let discovery = FileDiscovery::new();

        let invoice = temp_dir.path().join("Invoice.xml");
        let files = discovery.discover_files(&invoice).await.unwrap();
        assert_eq!(files, vec![invoice]);

        let notes = temp_dir.path().join("notes.txt");
        assert!(discovery.discover_files(&notes).await.unwrap().is_empty());
    }

    #[test]
    fn test_should_process() {
        let discovery = FileDiscovery::new();

        assert!(discovery.should_process(Path::new("Invoice.xml")));
        assert!(discovery.should_process(Path::new("Invoice.XML")));
        assert!(!discovery.should_process(Path::new("Invoice.md")));
        assert!(!discovery.should_process(Path::new("Invoice")));
    }

    #[test]
    fn test_from_config() {
        let config = FileConfig {
            extensions: vec!["HAUL".to_string()],
            include_patterns: vec![],
            exclude_patterns: vec!["**/tmp/**".to_string()],
            max_depth: Some(0),
        };
        let discovery = FileDiscovery::from_config(&config).unwrap();

        assert!(discovery.should_process(Path::new("rt.haul")));
        assert!(!discovery.should_process(Path::new("rt.xml")));
        assert!(!discovery.should_process(Path::new("/x/tmp/rt.haul")));
    }

    #[tokio::test]
    async fn test_default_config_stays_at_top_level() {
        let temp_dir = create_test_directory().await;
        let discovery = FileDiscovery::from_config(&FileConfig::default()).unwrap();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();

        assert_eq!(
            names(&files),
            HashSet::from(["Invoice.xml".to_string(), "Customer.XML".to_string()])
        );
    }

    #[tokio::test]
    async fn test_nonexistent_directory() {
        let discovery = FileDiscovery::new();
        let result = discovery
            .discover_files(Path::new("/nonexistent/path"))
            .await;

        match result.unwrap_err() {
            ConversionError::Io(_) => {}
            _ => panic!("Expected IO error"),
        }
    }
}
