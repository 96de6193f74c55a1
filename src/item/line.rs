use std::io::{self, BufRead};

use crate::error::{DelimitedError, Result};

struct LineEnd {
    /// Bytes of line content before the terminator.
    content: usize,
    /// Whether the terminator was a carriage return, in which case a directly
    /// following line feed belongs to the same terminator.
    carriage_return: bool,
}

/// Finds the first `\n` or `\r` in `available`.
fn find_line_end(available: &[u8]) -> Option<LineEnd> {
    available
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .map(|content| LineEnd {
            content,
            carriage_return: available[content] == b'\r',
        })
}

/// What [`scan_chunk`] did with one buffer fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Chunk {
    /// Bytes to hand back to the buffered reader with `consume`.
    pub consumed: usize,
    /// The line in `buf` is complete.
    pub complete: bool,
    /// Line content was appended to `buf`.
    pub extended: bool,
}

/// Scans one non-empty buffer fill, appending line content to `buf`.
///
/// `skip_lf` carries a pending CR across calls so a CRLF split over two
/// buffer fills is still treated as one terminator.
pub(crate) fn scan_chunk(available: &[u8], skip_lf: &mut bool, buf: &mut Vec<u8>) -> Chunk {
    if *skip_lf {
        *skip_lf = false;
        if available[0] == b'\n' {
            return Chunk {
                consumed: 1,
                complete: false,
                extended: false,
            };
        }
    }

    match find_line_end(available) {
        Some(end) => {
            buf.extend_from_slice(&available[..end.content]);
            *skip_lf = end.carriage_return;
            Chunk {
                consumed: end.content + 1,
                complete: true,
                extended: true,
            }
        }
        None => {
            buf.extend_from_slice(available);
            Chunk {
                consumed: available.len(),
                complete: false,
                extended: true,
            }
        }
    }
}

/// Reads one physical line into `buf`, accepting CR, LF and CRLF terminators.
///
/// Returns `false` at end of stream when nothing was read.
pub(crate) fn read_physical_line<B: BufRead + ?Sized>(
    reader: &mut B,
    skip_lf: &mut bool,
    buf: &mut Vec<u8>,
) -> io::Result<bool> {
    buf.clear();
    let mut read_any = false;

    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(read_any);
        }

        let chunk = scan_chunk(available, skip_lf, buf);
        reader.consume(chunk.consumed);
        if chunk.complete {
            return Ok(true);
        }
        read_any |= chunk.extended;
    }
}

pub(crate) fn decode_line(buf: Vec<u8>) -> Result<String> {
    String::from_utf8(buf)
        .map_err(|error| DelimitedError::Stream(format!("Line is not valid UTF-8: {}", error)))
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor};

    use super::*;

    fn lines(data: &str, capacity: usize) -> Vec<String> {
        let mut reader = BufReader::with_capacity(capacity, Cursor::new(data.as_bytes().to_vec()));
        let mut skip_lf = false;
        let mut buf = Vec::new();
        let mut result = Vec::new();
        while read_physical_line(&mut reader, &mut skip_lf, &mut buf).unwrap() {
            result.push(String::from_utf8(buf.clone()).unwrap());
        }
        result
    }

    #[test]
    fn should_accept_every_terminator_style() {
        assert_eq!(
            lines("One\rTwo\nThree\r\nFour", 64),
            vec!["One", "Two", "Three", "Four"]
        );
    }

    #[test]
    fn crlf_split_across_buffers_should_be_one_terminator() {
        // capacity 4 puts "\r" and "\n" of the first terminator in different fills
        assert_eq!(lines("abc\r\ndef\r\n", 4), vec!["abc", "def"]);
    }

    #[test]
    fn empty_lines_should_be_kept() {
        assert_eq!(lines("\n\na\n", 8), vec!["", "", "a"]);
    }

    #[test]
    fn pending_carriage_return_should_swallow_one_line_feed() {
        let mut skip_lf = true;
        let mut buf = Vec::new();

        let chunk = scan_chunk(b"\nab", &mut skip_lf, &mut buf);
        assert_eq!(
            chunk,
            Chunk {
                consumed: 1,
                complete: false,
                extended: false
            }
        );
        assert!(!skip_lf);

        let chunk = scan_chunk(b"ab\rc", &mut skip_lf, &mut buf);
        assert_eq!(chunk.consumed, 3);
        assert!(chunk.complete);
        assert!(skip_lf);
        assert_eq!(buf, b"ab");
    }

    #[test]
    fn empty_input_should_have_no_lines() {
        assert!(lines("", 8).is_empty());
    }
}
