use std::process::ExitCode;

use argh::FromArgs;
use elka_core::{
    bitmap::{Bitmap, BitmapError},
    container::{
        raw::{self, RawError},
        source::{self, Language, NumberStyle, SourceError},
    },
    fs::{File, Filesystem, Mode},
    res::img::elka::{ELKA_BITMAP, HEIGHT, PIXEL_SIZE, WIDTH},
};
use embedded_io::Write;
use log::{error, info, warn};

use crate::std_fs::StdFilesystem;

mod std_fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
enum Output {
    C,
    Rust,
    Raw,
}

#[derive(FromArgs)]
/// Export the built-in elka bitmap, or a raw dump, as a C header, Rust source or raw bytes
struct Args {
    /// output file path
    #[argh(option, short = 'o')]
    output: String,

    /// output format: c, rust or raw
    #[argh(option, short = 'l', default = "Output::C")]
    language: Output,

    /// value style: hex, dec, sdec or bin
    #[argh(option, default = "NumberStyle::Hex")]
    style: NumberStyle,

    /// table symbol name
    #[argh(option, short = 'n')]
    name: Option<String>,

    /// include guard for C output, defaults to the name
    #[argh(option)]
    guard: Option<String>,

    /// header to include in C output, repeatable (default <stdint.h>)
    #[argh(option)]
    include: Vec<String>,

    /// raw dump to export instead of the built-in table
    #[argh(option, short = 'i')]
    input: Option<String>,

    /// width of the raw input
    #[argh(option, default = "WIDTH")]
    width: usize,

    /// height of the raw input
    #[argh(option, default = "HEIGHT")]
    height: usize,

    /// bytes per pixel of the raw input
    #[argh(option, default = "PIXEL_SIZE")]
    pixel_size: usize,
}

#[derive(Debug)]
enum ExportError {
    Fs(embedded_io::ErrorKind),
    Raw(RawError),
    Source(SourceError),
}

impl From<embedded_io::ErrorKind> for ExportError {
    fn from(err: embedded_io::ErrorKind) -> Self {
        ExportError::Fs(err)
    }
}

impl From<RawError> for ExportError {
    fn from(err: RawError) -> Self {
        ExportError::Raw(err)
    }
}

impl From<SourceError> for ExportError {
    fn from(err: SourceError) -> Self {
        ExportError::Source(err)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    match export(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Export to {} failed: {:?}", args.output, err);
            ExitCode::FAILURE
        }
    }
}

fn export(args: &Args) -> Result<(), ExportError> {
    let fs = StdFilesystem::new_with_base_path(".".into());

    let mut buffer = Vec::new();
    let bitmap = match &args.input {
        Some(path) => load_raw(&fs, path, args, &mut buffer)?,
        None => ELKA_BITMAP,
    };
    info!(
        "Exporting {}x{} bitmap ({} bytes per pixel) as {:?}",
        bitmap.width(),
        bitmap.height(),
        bitmap.pixel_size(),
        args.language
    );

    let language = match args.language {
        Output::Raw => {
            let mut out = fs.open_file(&args.output, Mode::Write)?;
            return Ok(raw::write(&mut out, &bitmap)?);
        }
        Output::C => Language::C,
        Output::Rust => Language::Rust,
    };

    let name = match (&args.name, &args.input) {
        (Some(name), _) => name.clone(),
        (None, Some(input)) => source::symbol_name(input)?.as_str().to_owned(),
        (None, None) => String::from("ELKA"),
    };
    let includes: Vec<&str> = if args.include.is_empty() {
        vec!["<stdint.h>"]
    } else {
        args.include.iter().map(String::as_str).collect()
    };
    let options = source::Options {
        name: &name,
        guard: args.guard.as_deref(),
        includes: &includes,
        language,
        style: args.style,
    };

    // Render before opening so a rejected name leaves the old output alone.
    let mut rendered = Vec::new();
    source::write(&mut rendered, &bitmap, &options)?;

    let mut out = fs.open_file(&args.output, Mode::Write)?;
    out.write_all(&rendered)
        .and_then(|()| out.flush())
        .map_err(|err| ExportError::Fs(embedded_io::Error::kind(&err)))
}

fn load_raw<'a>(
    fs: &StdFilesystem,
    path: &str,
    args: &Args,
    buffer: &'a mut Vec<u8>,
) -> Result<Bitmap<'a>, ExportError> {
    let size = raw::expected_size(args.width, args.height, args.pixel_size)
        .ok_or(RawError::Bitmap(BitmapError::Overflow))?;
    let mut file = fs.open_file(path, Mode::Read)?;
    if file.size() != size {
        warn!("{} holds {} bytes, expected {}", path, file.size(), size);
    }
    buffer.resize(size, 0);
    Ok(raw::read(&mut file, args.width, args.height, args.pixel_size, buffer)?)
}
