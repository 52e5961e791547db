use std::path::{Path, PathBuf};

/// Исходный документ, прочитанный с диска
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Имя файла без расширения
    pub id: String,
    pub path: PathBuf,
    pub filename: String,
    pub text: String,
}

/// Что нашлось в каталоге
#[derive(Debug, Default)]
pub struct LoadedDirectory {
    pub documents: Vec<SourceDocument>,
    pub files_found: usize,
    pub skipped: usize,
}

/// Формат исходного файла, определяется по расширению
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Pdf,
    Text,
}

impl SourceFormat {
    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "pdf" => Some(SourceFormat::Pdf),
            "txt" | "md" => Some(SourceFormat::Text),
            _ => None,
        }
    }
}

/// Читает PDF и текстовые файлы каталога (без рекурсии), в порядке имён.
///
/// Прочие форматы пропускаются с предупреждением; файлы, из которых не
/// удалось извлечь текст или которые пусты, тоже пропускаются.
pub fn load_directory(dir: &Path) -> std::io::Result<LoadedDirectory> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut loaded = LoadedDirectory {
        files_found: paths.len(),
        ..Default::default()
    };

    for path in paths {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let Some(format) = SourceFormat::from_extension(&extension) else {
            tracing::warn!(
                "Skipping {}: only .pdf, .txt and .md sources are supported",
                path.display()
            );
            loaded.skipped += 1;
            continue;
        };

        match read_document(&path, format) {
            Some(doc) => loaded.documents.push(doc),
            None => loaded.skipped += 1,
        }
    }

    Ok(loaded)
}

fn read_document(path: &Path, format: SourceFormat) -> Option<SourceDocument> {
    let text = match format {
        SourceFormat::Pdf => extract_pdf_text(path),
        SourceFormat::Text => std::fs::read_to_string(path).map_err(|e| e.to_string()),
    };
    let text = match text {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Error reading {}: {}", path.display(), e);
            return None;
        }
    };

    let filename = path.file_name()?.to_string_lossy().to_string();
    let id = path.file_stem()?.to_string_lossy().to_string();

    if text.trim().is_empty() {
        tracing::warn!("No text extracted for document '{}', skipping.", id);
        return None;
    }

    tracing::debug!("Extracted {} characters from {}", text.len(), path.display());
    let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    Some(SourceDocument {
        id,
        path,
        filename,
        text,
    })
}

/// Текст всех страниц PDF по порядку
fn extract_pdf_text(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let doc = lopdf::Document::load_mem(&bytes).map_err(|e| e.to_string())?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Ok(String::new());
    }
    doc.extract_text(&pages).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::fs;

    /// Одностраничный PDF с одной строкой текста
    fn write_pdf(path: &Path, line: &str) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_pdf_text_is_extracted() {
        let dir = tempfile::tempdir().unwrap();
        write_pdf(&dir.path().join("pmegp_guidelines.pdf"), "PMEGP margin money subsidy");

        let loaded = load_directory(dir.path()).unwrap();
        assert_eq!(loaded.files_found, 1);
        assert_eq!(loaded.skipped, 0);

        let doc = &loaded.documents[0];
        assert_eq!(doc.id, "pmegp_guidelines");
        assert_eq!(doc.filename, "pmegp_guidelines.pdf");
        assert!(doc.text.contains("PMEGP margin money subsidy"), "got {:?}", doc.text);
    }

    #[test]
    fn test_load_directory_filters_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b_policy.txt"), "Foreign trade policy text").unwrap();
        fs::write(dir.path().join("a_notes.md"), "# Notes\n\nSome notes").unwrap();
        fs::write(dir.path().join("empty.txt"), "   ").unwrap();
        // битый PDF: только сигнатура
        fs::write(dir.path().join("scan.pdf"), [0x25, 0x50, 0x44, 0x46]).unwrap();
        fs::write(dir.path().join("table.xlsx"), "not a source").unwrap();

        let loaded = load_directory(dir.path()).unwrap();
        assert_eq!(loaded.files_found, 5);
        assert_eq!(loaded.skipped, 3);

        let ids: Vec<&str> = loaded.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a_notes", "b_policy"]);
        assert_eq!(loaded.documents[1].filename, "b_policy.txt");
        assert!(loaded.documents[1].path.is_absolute());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_directory(&dir.path().join("nope")).is_err());
    }
}
