use crate::error::{BazaarError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|s| s == "md" || s == "markdown")
        .unwrap_or(false)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

/// Expand files and directories into a sorted, deduplicated list of markdown files
pub fn resolve_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(markdown_files_under(path, path, &GlobSet::empty()));
        } else {
            log::warn!("skipping {}: not a file or directory", path.display());
        }
    }
    files.sort();
    files.dedup();
    files
}

/// Compile patterns into one set. `*` stays inside a path component, `**` crosses them.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    Ok(builder.build()?)
}

/// All markdown files below `dir`, skipping hidden entries and anything whose
/// path relative to `base` matches `excluded`
pub fn markdown_files_under(dir: &Path, base: &Path, excluded: &GlobSet) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| {
            let relative = e.path().strip_prefix(base).unwrap_or(e.path());
            !is_hidden(e) && !excluded.is_match(relative)
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_markdown(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Files below `dir` whose path relative to `dir` matches `patterns`. Sorted.
pub fn files_matching(dir: &Path, patterns: &GlobSet) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .strip_prefix(dir)
                .is_ok_and(|relative| patterns.is_match(relative))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BazaarError::file_not_found(path),
        _ => BazaarError::Io(e),
    })
}

/// Write through a temp file in the target directory, then rename over the target
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| BazaarError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_files_walks_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.md"), "").unwrap();
        fs::write(root.join("b.markdown"), "").unwrap();
        fs::write(root.join("c.txt"), "").unwrap();
        fs::create_dir(root.join("subdir")).unwrap();
        fs::write(root.join("subdir/d.md"), "").unwrap();

        let files = resolve_files(&[root.to_path_buf(), root.join("a.md")]);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_markdown_files_under_skips_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("docs/ignore")).unwrap();
        fs::create_dir_all(root.join("docs/.hidden")).unwrap();
        fs::write(root.join("docs/keep.md"), "").unwrap();
        fs::write(root.join("docs/ignore/skip.md"), "").unwrap();
        fs::write(root.join("docs/.hidden/skip.md"), "").unwrap();

        let excluded = build_globset(&["docs/ignore/**".to_string()]).unwrap();
        let files = markdown_files_under(&root.join("docs"), root, &excluded);
        assert_eq!(files, vec![root.join("docs/keep.md")]);
    }

    #[test]
    fn test_files_matching_layout_globs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("p1/skills/s1")).unwrap();
        fs::create_dir_all(root.join("p1/agents/nested")).unwrap();
        fs::write(root.join("p1/skills/s1/SKILL.md"), "").unwrap();
        fs::write(root.join("p1/skills/s1/README.md"), "").unwrap();
        fs::write(root.join("p1/agents/a.md"), "").unwrap();
        fs::write(root.join("p1/agents/notes.txt"), "").unwrap();
        fs::write(root.join("p1/agents/nested/deep.md"), "").unwrap();

        let skills = build_globset(&["*/skills/*/SKILL.md".to_string()]).unwrap();
        assert_eq!(
            files_matching(root, &skills),
            vec![root.join("p1/skills/s1/SKILL.md")]
        );

        let agents = build_globset(&["*/agents/*.md".to_string()]).unwrap();
        assert_eq!(
            files_matching(root, &agents),
            vec![root.join("p1/agents/a.md")]
        );

        let anywhere = build_globset(&["*/agents/**/*.md".to_string()]).unwrap();
        assert_eq!(files_matching(root, &anywhere).len(), 2);
    }

    #[test]
    fn test_build_globset_rejects_bad_pattern() {
        let err = build_globset(&["plugins/[".to_string()]).unwrap_err();
        assert!(matches!(err, BazaarError::Glob(_)));
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.md");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_to_string(Path::new("/nonexistent/file.md")).unwrap_err();
        assert!(matches!(err, BazaarError::FileNotFound { .. }));
    }
}
