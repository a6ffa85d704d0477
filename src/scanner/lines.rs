//! Line iteration over a dump that may contain invalid UTF-8.

use std::borrow::Cow;
use std::io::{self, BufRead};

/// Decode bytes as UTF-8, silently dropping invalid sequences.
///
/// Unlike [`String::from_utf8_lossy`], no replacement character is inserted.
pub fn decode_ignoring_invalid(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(text) => {
                out.push_str(text);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(len) => rest = &after[len..],
                    // truncated sequence at the end of input
                    None => break,
                }
            }
        }
    }
    Cow::Owned(out)
}

/// Iterator over the lines of a dump, terminator included.
///
/// A line ends at `\n`, `\r\n` or a bare `\r`.
pub struct DumpLines<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> DumpLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    fn read_line(&mut self) -> io::Result<usize> {
        self.buf.clear();
        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(self.buf.len());
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    let ends_with_cr = available[i] == b'\r';
                    self.buf.extend_from_slice(&available[..=i]);
                    self.reader.consume(i + 1);
                    if ends_with_cr {
                        self.take_lf_after_cr()?;
                    }
                    return Ok(self.buf.len());
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }

    // the `\n` of a `\r\n` pair may start the next buffered chunk
    fn take_lf_after_cr(&mut self) -> io::Result<()> {
        let next_is_lf = loop {
            match self.reader.fill_buf() {
                Ok(bytes) => break bytes.first() == Some(&b'\n'),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if next_is_lf {
            self.buf.push(b'\n');
            self.reader.consume(1);
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for DumpLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_line() {
            Ok(0) => None,
            Ok(_) => Some(Ok(decode_ignoring_invalid(&self.buf).into_owned())),
            Err(e) => Some(Err(e)),
        }
    }
}
