use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::path::Path;

const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1 MiB

pub enum FileContent {
    Mapped(Mmap),
    Buffered(String),
}

impl FileContent {
    /// Borrow the content as UTF-8 text.
    pub fn text(&self) -> io::Result<&str> {
        match self {
            FileContent::Mapped(mmap) => std::str::from_utf8(mmap)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            FileContent::Buffered(s) => Ok(s.as_str()),
        }
    }
}

/// Read a whole file; files above the threshold are memory-mapped. The handle
/// is released before returning.
pub fn read_file_smart<P: AsRef<Path>>(path: P) -> io::Result<FileContent> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)?;

    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", path.display()),
        ));
    }

    if metadata.len() > MMAP_THRESHOLD {
        let file = File::open(path)?;

        // Safety: the mapping is only read, and the file is not expected to
        // change while a merge runs
        let mmap = unsafe { Mmap::map(&file) }?;

        Ok(FileContent::Mapped(mmap))
    } else {
        Ok(FileContent::Buffered(std::fs::read_to_string(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_file_is_buffered() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.hpp");
        std::fs::write(&p, "int x;\n").unwrap();

        let content = read_file_smart(&p).unwrap();
        assert!(matches!(content, FileContent::Buffered(_)));
        assert_eq!(content.text().unwrap(), "int x;\n");
    }

    #[test]
    fn test_large_file_is_mapped() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("big.cpp");
        let body = "// filler line for mapping\n".repeat(50_000);
        std::fs::write(&p, &body).unwrap();

        let content = read_file_smart(&p).unwrap();
        assert!(matches!(content, FileContent::Mapped(_)));
        assert_eq!(content.text().unwrap().len(), body.len());
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_file_smart(dir.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file_smart(dir.path().join("nope.hpp")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
