//! [`SourceFile`]: a minimal line-offset index over a source buffer (§6.3).
//! Exists so the CLI driver can turn a byte offset into a `(line, column)`
//! pair when reporting an error; no file-watching, no incremental
//! re-indexing, no encoding detection beyond UTF-8.

/// A source buffer plus the byte offset of the start of each line,
/// computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The byte offset where line `i` (0-indexed) starts.
    pub fn line_offset(&self, i: usize) -> Option<usize> {
        self.line_starts.get(i).copied()
    }

    /// The byte offset just past line `i`'s content, before its trailing
    /// newline (or the end of the buffer, for the last line).
    pub fn line_end_offset(&self, i: usize) -> Option<usize> {
        let start = self.line_offset(i)?;
        Some(match self.line_starts.get(i + 1) {
            Some(&next_start) => self.text[start..next_start].trim_end_matches('\n').len() + start,
            None => self.text.len(),
        })
    }

    /// The text of line `i` (0-indexed), without its trailing newline.
    pub fn line(&self, i: usize) -> Option<&str> {
        let start = self.line_offset(i)?;
        let end = self.line_end_offset(i)?;
        Some(&self.text[start..end])
    }

    /// Which line (0-indexed) a byte offset falls on.
    pub fn line_number_of_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }

    /// `(line, column)`, both 0-indexed, for a byte offset.
    pub fn line_and_column(&self, offset: usize) -> (usize, usize) {
        let line = self.line_number_of_offset(offset);
        let column = offset.saturating_sub(self.line_starts[line]);
        (line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_lines() {
        let src = SourceFile::new("a = 1\nb = 2\nc = 3");
        assert_eq!(src.line_count(), 3);
        assert_eq!(src.line(0), Some("a = 1"));
        assert_eq!(src.line(1), Some("b = 2"));
        assert_eq!(src.line(2), Some("c = 3"));
    }

    #[test]
    fn resolves_offset_to_line_and_column() {
        let src = SourceFile::new("a = 1\nb = 2\n");
        assert_eq!(src.line_and_column(0), (0, 0));
        assert_eq!(src.line_and_column(6), (1, 0));
        assert_eq!(src.line_and_column(8), (1, 2));
    }

    #[test]
    fn handles_empty_input() {
        let src = SourceFile::new("");
        assert_eq!(src.line_count(), 1);
        assert_eq!(src.line(0), Some(""));
    }
}
