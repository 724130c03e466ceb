// File: ./src/source.rs
// Yields raw text lines from any buffered reader.
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Iterator over the lines of a reader, with `\n` / `\r\n` stripped.
///
/// Invalid UTF-8 and read failures surface as `io::Error` items.
pub struct LineSource<R> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }

    /// Number of lines yielded so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl LineSource<BufReader<File>> {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.ends_with('\n') {
                    buf.pop();
                    if buf.ends_with('\r') {
                        buf.pop();
                    }
                }
                self.line_no += 1;
                log::trace!("line {}: {:?}", self.line_no, buf);
                Some(Ok(buf))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn strips_both_line_endings() {
        let source = LineSource::new(Cursor::new("a\r\nb\n\nc"));
        let lines: Vec<String> = source.map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn counts_lines() {
        let mut source = LineSource::new(Cursor::new("one\ntwo\n"));
        while source.next().is_some() {}
        assert_eq!(source.line_no(), 2);
    }
}
