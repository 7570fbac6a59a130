use std::{fs, path::PathBuf};

use elka_core::fs::Mode;
use embedded_io::{ErrorKind, ErrorType};
use log::{debug, warn};

/// Host filesystem rooted at a base directory.
pub struct StdFilesystem {
    root: PathBuf,
}

impl StdFilesystem {
    pub fn new_with_base_path(root: PathBuf) -> Self {
        debug!("Filesystem root: {:?}", root);
        StdFilesystem { root }
    }
}

impl ErrorType for StdFilesystem {
    type Error = ErrorKind;
}

impl elka_core::fs::Filesystem for StdFilesystem {
    type File = StdFile;

    fn open_file(&self, path: &str, mode: Mode) -> Result<StdFile, ErrorKind> {
        let path = self.root.join(path);
        let mut options = fs::OpenOptions::new();
        match mode {
            Mode::Read => options.read(true),
            Mode::Write => options.write(true).create(true).truncate(true),
        };
        let opened = options.open(&path).and_then(StdFile::new);
        opened.map_err(|err| {
            warn!("Cannot open {:?} for {:?}: {}", path, mode, err);
            embedded_io::Error::kind(&err)
        })
    }

    fn exists(&self, path: &str) -> Result<bool, ErrorKind> {
        self.root
            .join(path)
            .try_exists()
            .map_err(|err| embedded_io::Error::kind(&err))
    }
}

/// Unbuffered file handle; writers above it emit whole rows at a time.
pub struct StdFile {
    file: fs::File,
    size: usize,
}

impl StdFile {
    fn new(file: fs::File) -> std::io::Result<Self> {
        let size = usize::try_from(file.metadata()?.len()).unwrap_or(usize::MAX);
        Ok(StdFile { file, size })
    }
}

impl elka_core::fs::File for StdFile {
    fn size(&self) -> usize {
        self.size
    }
}

impl ErrorType for StdFile {
    type Error = std::io::Error;
}

impl embedded_io::Read for StdFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        std::io::Read::read(&mut self.file, buf)
    }
}

impl embedded_io::Write for StdFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        std::io::Write::write(&mut self.file, buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::Write::flush(&mut self.file)
    }
}

#[cfg(test)]
mod tests {
    use elka_core::fs::{File, Filesystem};
    use embedded_io::{Read, Write};

    use super::*;

    fn temp_root(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("elka-std-fs-{}-{}", test, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_then_read() {
        let dir = temp_root("rw");
        let fs = StdFilesystem::new_with_base_path(dir.clone());

        assert!(!fs.exists("table.bin").unwrap());
        let mut out = fs.open_file("table.bin", Mode::Write).unwrap();
        out.write_all(&[1, 2, 3, 4]).unwrap();
        out.flush().unwrap();
        drop(out);
        assert!(fs.exists("table.bin").unwrap());

        let mut input = fs.open_file("table.bin", Mode::Read).unwrap();
        assert_eq!(input.size(), 4);
        let mut buffer = [0u8; 4];
        input.read_exact(&mut buffer).unwrap();
        assert_eq!(buffer, [1, 2, 3, 4]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_open_errors_keep_their_kind() {
        let dir = temp_root("errors");
        let fs = StdFilesystem::new_with_base_path(dir.clone());
        std::fs::create_dir_all(dir.join("sub")).unwrap();

        assert_eq!(fs.open_file("missing.bin", Mode::Read).err(), Some(ErrorKind::NotFound));
        let kind = fs.open_file("sub", Mode::Write).err();
        assert!(kind.is_some());
        assert_ne!(kind, Some(ErrorKind::NotFound));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
