//! Line sources
//!
//! A line source is any iterator whose items convert into a [`Line`] through
//! [`IntoLine`]: plain strings for in-memory data, or `io::Result<String>`
//! for readers. The first line is the header.
//!
//! Opening a source (standard input, a file, or an HTTP(S) URL with the
//! `remote` feature) happens here and nowhere else. Samplers only pull lines.
//! Byte sources are UTF-8 unless another [`Encoding`] is named, in which case
//! they are transcoded to UTF-8 as they stream.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;
use tracing::debug;

use crate::traits::{Result, SampleError};

/// One line of input, without its terminator
pub type Line = String;

/// Boxed line iterator as produced by [`open`]
pub type BoxedLines = Box<dyn Iterator<Item = io::Result<String>>>;

/// Conversion of a line source item into a [`Line`]
///
/// Trailing `\n` and `\r` are stripped; nothing else is touched.
pub trait IntoLine {
    fn into_line(self) -> Result<Line>;
}

impl IntoLine for String {
    fn into_line(self) -> Result<Line> {
        Ok(strip_terminator(self))
    }
}

impl IntoLine for &str {
    fn into_line(self) -> Result<Line> {
        Ok(trim_terminator(self).to_owned())
    }
}

impl IntoLine for &String {
    fn into_line(self) -> Result<Line> {
        self.as_str().into_line()
    }
}

impl<E: Into<SampleError>> IntoLine for std::result::Result<String, E> {
    fn into_line(self) -> Result<Line> {
        self.map(strip_terminator).map_err(Into::into)
    }
}

fn trim_terminator(line: &str) -> &str {
    line.trim_end_matches(|c: char| c == '\n' || c == '\r')
}

fn strip_terminator(mut line: String) -> String {
    let len = trim_terminator(&line).len();
    line.truncate(len);
    line
}

/// Look up an encoding by its WHATWG label, e.g. `latin1` or `utf-16le`
pub fn encoding_for(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| SampleError::invalid("encoding", format!("unknown label {:?}", label)))
}

/// Lines from any UTF-8 reader
///
/// An undecodable line surfaces as an `InvalidData` I/O error.
pub fn reader_lines<R: Read + 'static>(reader: R) -> BoxedLines {
    Box::new(BufReader::new(reader).lines())
}

/// Lines from a reader in `encoding`, transcoded to UTF-8
///
/// A leading byte order mark is honored and removed. Bytes that are invalid
/// in `encoding` become U+FFFD, except for UTF-8, which stays strict.
pub fn decoded_lines<R: Read + 'static>(reader: R, encoding: &'static Encoding) -> BoxedLines {
    if encoding == UTF_8 {
        return reader_lines(reader);
    }
    debug!(encoding = encoding.name(), "transcoding input");
    let decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .build(reader);
    reader_lines(decoder)
}

/// Lines from standard input
pub fn stdin_lines(encoding: &'static Encoding) -> BoxedLines {
    if encoding == UTF_8 {
        Box::new(io::stdin().lock().lines())
    } else {
        decoded_lines(io::stdin(), encoding)
    }
}

/// Lines from a local file
pub fn file_lines(path: &Path, encoding: &'static Encoding) -> Result<BoxedLines> {
    let file = File::open(path).map_err(|err| SampleError::SourceUnavailable {
        location: path.display().to_string(),
        reason: err.to_string(),
    })?;
    debug!("reading input from file {}", path.display());
    Ok(decoded_lines(file, encoding))
}

/// Lines from an HTTP(S) resource
///
/// The body is streamed; it is never buffered whole.
#[cfg(feature = "remote")]
pub fn url_lines(url: &str, encoding: &'static Encoding) -> Result<BoxedLines> {
    debug!("fetching input from {}", url);
    let response = ureq::get(url)
        .call()
        .map_err(|err| SampleError::SourceUnavailable {
            location: url.to_owned(),
            reason: err.to_string(),
        })?;
    Ok(decoded_lines(response.into_body().into_reader(), encoding))
}

/// True if `input` names an HTTP(S) resource rather than a path
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Open an input by name
///
/// `None` or `-` means standard input, `http://` and `https://` prefixes are
/// fetched remotely, anything else is a file path.
pub fn open(input: Option<&str>, encoding: &'static Encoding) -> Result<BoxedLines> {
    match input {
        None | Some("-") => Ok(stdin_lines(encoding)),
        Some(url) if is_url(url) => open_url(url, encoding),
        Some(path) => file_lines(Path::new(path), encoding),
    }
}

#[cfg(feature = "remote")]
fn open_url(url: &str, encoding: &'static Encoding) -> Result<BoxedLines> {
    url_lines(url, encoding)
}

#[cfg(not(feature = "remote"))]
fn open_url(url: &str, _encoding: &'static Encoding) -> Result<BoxedLines> {
    Err(SampleError::SourceUnavailable {
        location: url.to_owned(),
        reason: "built without the `remote` feature".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_strip_terminators() {
        assert_eq!("a,b\n".into_line().unwrap(), "a,b");
        assert_eq!("a,b\r\n".into_line().unwrap(), "a,b");
        assert_eq!(String::from("a,b\r\n\n").into_line().unwrap(), "a,b");
        assert_eq!("  a,b  ".into_line().unwrap(), "  a,b  ");
    }

    #[test]
    fn test_io_result_lines() {
        let ok: io::Result<String> = Ok("x\r".to_string());
        assert_eq!(ok.into_line().unwrap(), "x");

        let err: io::Result<String> = Err(io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(matches!(err.into_line(), Err(SampleError::Io(_))));
    }

    #[test]
    fn test_reader_lines() {
        let lines: Vec<String> = reader_lines(Cursor::new(b"h\r\n1\n2".to_vec()))
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["h", "1", "2"]);
    }

    #[test]
    fn test_non_utf8_needs_encoding() {
        // "name\ndéjà\n" in windows-1252
        let bytes = b"name\nd\xe9j\xe0\n".to_vec();

        let mut plain = reader_lines(Cursor::new(bytes.clone()));
        assert_eq!(plain.next().unwrap().unwrap(), "name");
        let err = plain.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let encoding = encoding_for("windows-1252").unwrap();
        let lines: Vec<String> = decoded_lines(Cursor::new(bytes), encoding)
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["name", "déjà"]);
    }

    #[test]
    fn test_utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "k\n\u{e9}\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let encoding = encoding_for("utf-16le").unwrap();
        let lines: Vec<String> = decoded_lines(Cursor::new(bytes), encoding)
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["k", "\u{e9}"]);
    }

    #[test]
    fn test_encoding_labels() {
        assert_eq!(encoding_for("latin1").unwrap().name(), "windows-1252");
        assert_eq!(encoding_for(" UTF-8 ").unwrap(), UTF_8);
        let err = encoding_for("klingon").unwrap_err();
        assert!(matches!(err, SampleError::InvalidParameter { name: "encoding", .. }));
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/data.csv"));
        assert!(is_url("http://localhost/x"));
        assert!(!is_url("data/http.csv"));
        assert!(!is_url("-"));
    }

    #[test]
    fn test_missing_file() {
        let err = open(Some("/definitely/not/here.csv"), UTF_8).err().unwrap();
        assert!(matches!(err, SampleError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_file_lines() {
        let path = std::env::temp_dir().join(format!("csvsample-src-{}.csv", std::process::id()));
        std::fs::write(&path, b"a,b\n1,\xfc\n").unwrap();

        let lines: Vec<String> = file_lines(&path, encoding_for("latin1").unwrap())
            .unwrap()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["a,b", "1,\u{fc}"]);

        std::fs::remove_file(&path).unwrap();
    }
}
