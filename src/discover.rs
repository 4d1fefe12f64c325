use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Recursively collect `*.pdf` files (extension matched case-insensitively), sorted by path.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("input directory {:?} does not exist", dir);
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_pdf_name(&entry.file_name().to_string_lossy()) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    info!("Found {} PDF files under {:?}", found.len(), dir);
    Ok(found)
}

fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_suffix_case_insensitive() {
        assert!(is_pdf_name("egzamin_2019.pdf"));
        assert!(is_pdf_name("EGZAMIN.PDF"));
        assert!(is_pdf_name("mixed.Pdf"));
        assert!(!is_pdf_name("notes.pdf.txt"));
        assert!(!is_pdf_name("pdf"));
    }

    #[test]
    fn walks_nested_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("2019").join("marzec");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join("b.PDF"), b"").unwrap();
        std::fs::write(nested.join("a.pdf"), b"").unwrap();
        std::fs::write(nested.join("readme.txt"), b"").unwrap();
        std::fs::create_dir_all(tmp.path().join("folder.pdf")).unwrap();

        let found = find_pdfs(tmp.path()).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.strip_prefix(tmp.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"b.PDF".to_string()));
        assert!(found.iter().any(|p| p.ends_with("2019/marzec/a.pdf")));
    }

    #[test]
    fn missing_dir_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(find_pdfs(&tmp.path().join("nope")).is_err());
    }
}
