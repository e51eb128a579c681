//! Lazy line-to-fields reader
//!
//! Yields one [`FieldLine`] per input line. The sequence is finite and
//! consumed once; rereading a file requires a fresh [`LineReader::open`].

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// How much of each line is stripped before splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimMode {
    /// Strip only the line terminator (`\n` or `\r\n`).
    #[default]
    Terminator,
    /// Strip all leading and trailing whitespace.
    Whitespace,
}

impl TrimMode {
    /// Apply the policy to a raw line as returned by `read_line`.
    pub fn apply<'a>(&self, raw: &'a str) -> &'a str {
        match self {
            TrimMode::Terminator => {
                let line = raw.strip_suffix('\n').unwrap_or(raw);
                line.strip_suffix('\r').unwrap_or(line)
            }
            TrimMode::Whitespace => raw.trim(),
        }
    }
}

/// Errors raised while acquiring or reading the input.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Input file missing or unreadable.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Failure while reading a line (including invalid UTF-8).
    #[error("read failed at line {line}: {source}")]
    Io {
        /// 1-based line number being read.
        line: usize,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Fields of a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    /// 1-based line number within the input.
    pub number: usize,
    /// Fields split on the delimiter, terminator already stripped.
    pub fields: Vec<String>,
}

/// Streaming reader splitting each line on a single-character delimiter.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    delimiter: char,
    trim: TrimMode,
    buf: String,
    line: usize,
    done: bool,
}

impl LineReader<BufReader<File>> {
    /// Open `path` for reading.
    pub fn open(
        path: impl AsRef<Path>,
        delimiter: char,
        trim: TrimMode,
    ) -> Result<Self, ReadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file), delimiter, trim))
    }
}

impl<R: BufRead> LineReader<R> {
    /// Wrap an already-buffered source.
    pub fn new(inner: R, delimiter: char, trim: TrimMode) -> Self {
        Self {
            inner,
            delimiter,
            trim,
            buf: String::new(),
            line: 0,
            done: false,
        }
    }

    /// Number of lines yielded so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<FieldLine, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        let number = self.line + 1;
        match self.inner.read_line(&mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line = number;
                let fields = self
                    .trim
                    .apply(&self.buf)
                    .split(self.delimiter)
                    .map(str::to_owned)
                    .collect();
                Some(Ok(FieldLine { number, fields }))
            }
            Err(source) => {
                // A failed read poisons the stream; later lines are never yielded.
                self.done = true;
                Some(Err(ReadError::Io {
                    line: number,
                    source,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &str, delimiter: char, trim: TrimMode) -> Vec<FieldLine> {
        LineReader::new(Cursor::new(input.as_bytes()), delimiter, trim)
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_strips_only_terminator() {
        let lines = collect("a b \n c\r\nlast", ' ', TrimMode::Terminator);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].fields, vec!["a", "b", ""]);
        assert_eq!(lines[1].fields, vec!["", "c"]);
        assert_eq!(lines[2].fields, vec!["last"]);
        assert_eq!(lines[2].number, 3);
    }

    #[test]
    fn test_whitespace_mode_trims_both_ends() {
        let lines = collect("  a b \t\n", ' ', TrimMode::Whitespace);
        assert_eq!(lines[0].fields, vec!["a", "b"]);
    }

    #[test]
    fn test_custom_delimiter_keeps_spaces() {
        let lines = collect("x y,1.5,k k\n", ',', TrimMode::Terminator);
        assert_eq!(lines[0].fields, vec!["x y", "1.5", "k k"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(collect("", ' ', TrimMode::Terminator).is_empty());
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let bytes: &[u8] = b"ok\n\xff\xfe\n";
        let mut reader = LineReader::new(Cursor::new(bytes), ' ', TrimMode::Terminator);
        assert!(reader.next().unwrap().is_ok());
        match reader.next() {
            Some(Err(ReadError::Io { line, .. })) => assert_eq!(line, 2),
            other => panic!("expected io error, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = LineReader::open("/definitely/not/here.txt", ' ', TrimMode::Terminator)
            .unwrap_err();
        assert!(matches!(err, ReadError::Open { .. }));
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
