//! Document file loading.
//!
//! Loads a document from a file path or from raw stdin bytes, detecting the
//! format from the file extension (or taking it explicitly for stdin),
//! decompressing gzip input, and enforcing the size ceiling before parsing.
//! The loaded root must be a mapping; the path notation the rest of the tool
//! uses assumes one.

use crate::document::node::Value;
use crate::document::parser::{from_json, from_jsonl, from_yaml};
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Files above this size are rejected before parsing.
pub const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Jsonl,
    Yaml,
}

impl Format {
    /// Determines the format from a file path's extension.
    ///
    /// A trailing `.gz` suffix is ignored: `data.jsonl.gz` is JSONL.
    /// Unknown extensions default to JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Format {
        let path_str = path.as_ref().to_string_lossy();
        let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

        if base.ends_with(".jsonl") || base.ends_with(".ndjson") {
            Format::Jsonl
        } else if base.ends_with(".yaml") || base.ends_with(".yml") {
            Format::Yaml
        } else {
            Format::Json
        }
    }

    /// Parses a format name as given on the command line.
    pub fn from_name(name: &str) -> Option<Format> {
        match name.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "jsonl" | "ndjson" => Some(Format::Jsonl),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Jsonl => write!(f, "jsonl"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}

/// Errors that can occur while loading a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The file does not exist.
    NotFound { path: String },
    /// The file or stream could not be read (I/O, UTF-8, or gzip failure).
    Unreadable { path: String, message: String },
    /// The file exceeds `MAX_FILE_SIZE`.
    TooLarge { size: u64 },
    /// The content is not valid in the declared format.
    Parse { message: String },
    /// The document parsed, but its root is not a mapping.
    RootNotMapping { found: &'static str },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound { path } => write!(f, "File not found: {}", path),
            LoadError::Unreadable { path, message } => {
                write!(f, "Failed to read {}: {}", path, message)
            }
            LoadError::TooLarge { size } => write!(
                f,
                "File is too large to load: {} bytes (limit is {} bytes)",
                size, MAX_FILE_SIZE
            ),
            LoadError::Parse { message } => write!(f, "Failed to parse document: {}", message),
            LoadError::RootNotMapping { found } => write!(
                f,
                "Document root must be a mapping, found {}",
                found
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// Loads and parses a document file from the filesystem.
///
/// The format is taken from `format` if given, otherwise detected from the
/// file extension. Files ending in `.gz` are decompressed first. Files above
/// `MAX_FILE_SIZE` are rejected without being read.
pub fn load_file<P: AsRef<Path>>(path: P, format: Option<Format>) -> Result<Value, LoadError> {
    let path_ref = path.as_ref();
    let path_str = path_ref.to_string_lossy().to_string();

    let metadata = fs::metadata(path_ref).map_err(|e| classify_io_error(&path_str, &e))?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(LoadError::TooLarge {
            size: metadata.len(),
        });
    }

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref).map_err(|message| LoadError::Unreadable {
            path: path_str.clone(),
            message,
        })?
    } else {
        fs::read_to_string(path_ref).map_err(|e| classify_io_error(&path_str, &e))?
    };

    let format = format.unwrap_or_else(|| Format::from_path(path_ref));
    parse_content(&content, format)
}

/// Parses raw stdin bytes as a document in the declared format.
///
/// Gzip-compressed input is detected by the magic bytes `1f 8b` and
/// decompressed first.
pub fn load_stdin(bytes: &[u8], format: Format) -> Result<Value, LoadError> {
    if bytes.len() as u64 > MAX_FILE_SIZE {
        return Err(LoadError::TooLarge {
            size: bytes.len() as u64,
        });
    }

    let content = if bytes.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(bytes).map_err(|message| LoadError::Unreadable {
            path: "<stdin>".to_string(),
            message,
        })?
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|_| LoadError::Unreadable {
            path: "<stdin>".to_string(),
            message: "Invalid UTF-8 in stdin".to_string(),
        })?
    };

    parse_content(&content, format)
}

fn parse_content(content: &str, format: Format) -> Result<Value, LoadError> {
    let parsed = match format {
        Format::Json => from_json(content),
        Format::Jsonl => from_jsonl(content),
        Format::Yaml => from_yaml(content),
    };

    let value = parsed.map_err(|e| LoadError::Parse {
        message: format!("{:#}", e),
    })?;

    ensure_mapping_root(value)
}

fn ensure_mapping_root(value: Value) -> Result<Value, LoadError> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(LoadError::RootNotMapping {
            found: value.type_name(),
        })
    }
}

fn classify_io_error(path: &str, error: &std::io::Error) -> LoadError {
    if error.kind() == std::io::ErrorKind::NotFound {
        LoadError::NotFound {
            path: path.to_string(),
        }
    } else {
        LoadError::Unreadable {
            path: path.to_string(),
            message: error.to_string(),
        }
    }
}

fn read_gzipped_file(path: &Path) -> Result<String, String> {
    use flate2::read::GzDecoder;

    let file = fs::File::open(path).map_err(|e| e.to_string())?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .map_err(|_| "failed to decompress gzipped file - file may be corrupted".to_string())?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String, String> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .map_err(|_| "failed to decompress gzipped stdin".to_string())?;
    Ok(content)
}
