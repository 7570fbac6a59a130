//! C header and Rust source generation for bitmap tables.

use core::fmt;

use embedded_io::Write;
use log::{info, trace};
use strum_macros::{EnumIter, EnumString};

use crate::bitmap::Bitmap;

pub type Symbol = heapless::String<64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    C,
    Rust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum NumberStyle {
    /// `0x95`
    Hex,
    /// `149`
    Dec,
    /// `-107`, the byte reinterpreted as signed
    SDec,
    /// `0b10010101`
    Bin,
}

impl NumberStyle {
    fn c_type(self) -> &'static str {
        match self {
            NumberStyle::SDec => "int8_t",
            _ => "uint8_t",
        }
    }

    fn rust_type(self) -> &'static str {
        match self {
            NumberStyle::SDec => "i8",
            _ => "u8",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Options<'a> {
    pub name: &'a str,
    /// C include guard, defaults to `name`
    pub guard: Option<&'a str>,
    pub includes: &'a [&'a str],
    pub language: Language,
    pub style: NumberStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    IoError(embedded_io::ErrorKind),
    Format,
    InvalidName,
    NameTooLong,
}

type Result<T> = core::result::Result<T, SourceError>;

/// Derives a table symbol from a file name: `elka-small.h` becomes `ELKA_SMALL`.
pub fn symbol_name(file_name: &str) -> Result<Symbol> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = base.split('.').next().unwrap_or(base);
    let stem = if stem.is_empty() { "IMAGE" } else { stem };

    let mut symbol = Symbol::new();
    for ch in stem.chars() {
        let ch = if ch == '-' { '_' } else { ch.to_ascii_uppercase() };
        symbol.push(ch).map_err(|_| SourceError::NameTooLong)?;
    }
    validate_name(&symbol)?;
    Ok(symbol)
}

/// Accepts names usable as both a C and a Rust identifier.
pub fn validate_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return Err(SourceError::InvalidName),
    }
    if !chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(SourceError::InvalidName);
    }
    if name.len() > Symbol::new().capacity() {
        return Err(SourceError::NameTooLong);
    }
    Ok(())
}

pub fn write(file: &mut impl Write, bitmap: &Bitmap, options: &Options) -> Result<()> {
    validate_name(options.name)?;
    let guard = options.guard.unwrap_or(options.name);
    validate_name(guard)?;

    match options.language {
        Language::C => write_c(file, bitmap, options, guard)?,
        Language::Rust => write_rust(file, bitmap, options)?,
    }
    file.flush().map_err(SourceError::from_io_error)?;

    info!(
        "Generated {:?} table {} ({}x{}, {} bytes)",
        options.language,
        options.name,
        bitmap.width(),
        bitmap.height(),
        bitmap.len()
    );
    Ok(())
}

fn write_c(file: &mut impl Write, bitmap: &Bitmap, options: &Options, guard: &str) -> Result<()> {
    let name = options.name;
    emit(file, format_args!("#ifndef __{guard}\n#define __{guard}\n\n"))?;
    for include in options.includes {
        emit(file, format_args!("#include {include}\n"))?;
    }
    emit(file, format_args!("#define {name}_HEIGHT {}\n", bitmap.height()))?;
    emit(file, format_args!("#define {name}_WIDTH {}\n", bitmap.width()))?;
    emit(file, format_args!("#define {name}_PIXEL_SIZE {}\n", bitmap.pixel_size()))?;
    emit(file, format_args!("#define {name}_LENGTH ("))?;
    write_length_product(file, name)?;
    emit(file, format_args!(")\n"))?;
    emit(
        file,
        format_args!("static const {} {name}[{name}_LENGTH] = {{\n", options.style.c_type()),
    )?;
    write_rows(file, bitmap, options.style)?;
    emit(file, format_args!("}};\n#endif //__{guard}\n"))
}

fn write_rust(file: &mut impl Write, bitmap: &Bitmap, options: &Options) -> Result<()> {
    let name = options.name;
    emit(file, format_args!("pub const {name}_HEIGHT: usize = {};\n", bitmap.height()))?;
    emit(file, format_args!("pub const {name}_WIDTH: usize = {};\n", bitmap.width()))?;
    emit(file, format_args!("pub const {name}_PIXEL_SIZE: usize = {};\n", bitmap.pixel_size()))?;
    emit(file, format_args!("pub const {name}_LENGTH: usize = "))?;
    write_length_product(file, name)?;
    emit(file, format_args!(";\n"))?;
    emit(
        file,
        format_args!("pub static {name}: [{}; {name}_LENGTH] = [\n", options.style.rust_type()),
    )?;
    write_rows(file, bitmap, options.style)?;
    emit(file, format_args!("];\n"))
}

fn write_length_product(file: &mut impl Write, name: &str) -> Result<()> {
    emit(file, format_args!("{name}_WIDTH * {name}_HEIGHT * {name}_PIXEL_SIZE"))
}

fn write_rows(file: &mut impl Write, bitmap: &Bitmap, style: NumberStyle) -> Result<()> {
    for (index, row) in bitmap.rows().enumerate() {
        trace!("Writing row {} ({} bytes)", index, row.len());
        for &value in row {
            match style {
                NumberStyle::Hex => emit(file, format_args!("0x{value:02x}, "))?,
                NumberStyle::Dec => emit(file, format_args!("{value:3}, "))?,
                NumberStyle::SDec => emit(file, format_args!("{:3}, ", value as i8))?,
                NumberStyle::Bin => emit(file, format_args!("0b{value:08b}, "))?,
            }
        }
        emit(file, format_args!("\n"))?;
    }
    Ok(())
}

impl SourceError {
    pub(crate) fn from_io_error(err: impl embedded_io::Error) -> Self {
        Self::IoError(err.kind())
    }
}

/// Bridges `core::fmt` output onto an `embedded_io` writer, keeping the I/O error.
struct FmtAdapter<'a, W: Write> {
    inner: &'a mut W,
    error: Option<embedded_io::ErrorKind>,
}

impl<W: Write> fmt::Write for FmtAdapter<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.inner.write_all(s.as_bytes()).map_err(|err| {
            self.error = Some(embedded_io::Error::kind(&err));
            fmt::Error
        })
    }
}

fn emit<W: Write>(file: &mut W, args: fmt::Arguments<'_>) -> Result<()> {
    let mut adapter = FmtAdapter {
        inner: file,
        error: None,
    };
    fmt::write(&mut adapter, args).map_err(|_| match adapter.error {
        Some(kind) => SourceError::IoError(kind),
        None => SourceError::Format,
    })
}
