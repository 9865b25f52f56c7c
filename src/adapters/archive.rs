use crate::utils::error::{ImportError, Result};
use std::io::{Read, Write};
use zip::write::{FileOptions, ZipWriter};

pub fn is_archive(path: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// 將快照包成只有一個檔案的 ZIP
pub fn pack_snapshot(entry_name: &str, document: &[u8]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file::<_, ()>(entry_name, FileOptions::default())?;
    zip.write_all(document)?;

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Returns the first `.json` entry of the archive.
pub fn unpack_snapshot(archive_name: &str, data: &[u8]) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_file() && entry.name().ends_with(".json") {
            tracing::debug!("Reading '{}' from archive '{}'", entry.name(), archive_name);
            let mut document = Vec::new();
            entry.read_to_end(&mut document)?;
            return Ok(document);
        }
    }

    Err(ImportError::parse(
        archive_name,
        "archive does not contain a .json snapshot",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_unpack() {
        let document = br#"{"services": []}"#;
        let packed = pack_snapshot("mock-snapshot.json", document).unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(packed.clone())).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_index(0).unwrap().name(), "mock-snapshot.json");

        assert_eq!(unpack_snapshot("export.zip", &packed).unwrap(), document.to_vec());
    }

    #[test]
    fn test_archive_without_json_entry() {
        let packed = pack_snapshot("readme.txt", b"hello").unwrap();
        let err = unpack_snapshot("export.zip", &packed).unwrap_err();
        assert!(matches!(err, ImportError::ParseError { .. }));
    }

    #[test]
    fn test_is_archive() {
        assert!(is_archive("exports/mock.zip"));
        assert!(is_archive("EXPORT.ZIP"));
        assert!(!is_archive("snapshot.json"));
    }
}
