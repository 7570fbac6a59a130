use embedded_io::{ErrorType, Read, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

pub trait File: Read + Write {
    fn size(&self) -> usize;
}

pub trait Filesystem: ErrorType {
    type File: File;

    fn open_file(&self, path: &str, mode: Mode) -> Result<Self::File, Self::Error>;
    fn exists(&self, path: &str) -> Result<bool, Self::Error>;
}
