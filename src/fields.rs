//! Splitting header and row lines into fields
//!
//! Only what column lookup needs: one line at a time, a single-byte
//! delimiter, and double-quoted fields that may contain the delimiter.
//! Quoted newlines cannot occur since every input unit is already one line.

use csv_core::{ReadRecordResult, Reader, ReaderBuilder};

use crate::traits::{Result, SampleError};

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b',';

/// Byte order mark some editors put in front of the header
const BOM: char = '\u{feff}';

/// Splits single lines into fields
///
/// One parser and its output buffers are reused across calls, so looking up
/// a field does not allocate once the buffers have grown to the widest row.
/// Field values are returned exactly as written apart from CSV unquoting;
/// only [`column_index`](Self::column_index) drops a leading byte order mark.
///
/// # Example
///
/// ```
/// use csvsample::fields::FieldSplitter;
///
/// let mut splitter = FieldSplitter::new(b',');
/// let fields = splitter.split(1, r#"id,"last, first",age"#).unwrap();
/// assert_eq!(fields, vec!["id", "last, first", "age"]);
/// ```
#[derive(Debug)]
pub struct FieldSplitter {
    reader: Reader,
    /// Unquoted field bytes, back to back
    output: Vec<u8>,
    /// End offset of each field in `output`
    ends: Vec<usize>,
}

impl FieldSplitter {
    /// Create a splitter for the given delimiter
    pub fn new(delimiter: u8) -> Self {
        Self {
            reader: ReaderBuilder::new().delimiter(delimiter).build(),
            output: vec![0; 256],
            ends: vec![0; 16],
        }
    }

    /// Parse `line` into the internal buffers, returning the field count
    fn parse(&mut self, line: &str) -> usize {
        self.reader.reset();
        let mut input = line.as_bytes();
        let (mut out, mut fields) = (0, 0);

        loop {
            let (result, nin, nout, nend) = self.reader.read_record(
                input,
                &mut self.output[out..],
                &mut self.ends[fields..],
            );
            input = &input[nin..];
            out += nout;
            fields += nend;

            match result {
                // Next pass sees empty input, which ends the line
                ReadRecordResult::InputEmpty => {}
                ReadRecordResult::OutputFull => {
                    let len = self.output.len();
                    self.output.resize(len * 2, 0);
                }
                ReadRecordResult::OutputEndsFull => {
                    let len = self.ends.len();
                    self.ends.resize(len * 2, 0);
                }
                ReadRecordResult::Record => return fields,
                ReadRecordResult::End => return 0,
            }
        }
    }

    /// Text of parsed field `index`
    fn text(&self, line_no: u64, index: usize) -> Result<&str> {
        let start = if index == 0 { 0 } else { self.ends[index - 1] };
        std::str::from_utf8(&self.output[start..self.ends[index]]).map_err(|err| {
            SampleError::Csv {
                line: line_no,
                reason: err.to_string(),
            }
        })
    }

    /// Split `line` into owned field values
    pub fn split(&mut self, line_no: u64, line: &str) -> Result<Vec<String>> {
        let fields = self.parse(line);
        (0..fields)
            .map(|index| self.text(line_no, index).map(str::to_owned))
            .collect()
    }

    /// Field at `index`, or `RowParse` if the row is too short
    pub fn field(&mut self, line_no: u64, line: &str, index: usize) -> Result<&str> {
        let fields = self.parse(line);
        if index >= fields {
            return Err(SampleError::RowParse {
                line: line_no,
                column_index: index,
                fields,
            });
        }
        self.text(line_no, index)
    }

    /// Resolve `column` to its zero-based position in `header`
    ///
    /// Matching is exact and case-sensitive; the first match wins. A byte
    /// order mark at the start of the header is not part of the first name.
    pub fn column_index(&mut self, header: &str, column: &str) -> Result<usize> {
        let header = header.strip_prefix(BOM).unwrap_or(header);
        let fields = self.parse(header);
        for index in 0..fields {
            if self.text(1, index)? == column {
                return Ok(index);
            }
        }
        Err(SampleError::ColumnNotFound {
            column: column.to_owned(),
        })
    }
}

impl Default for FieldSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        let mut splitter = FieldSplitter::default();
        assert_eq!(splitter.split(2, "1,2,3").unwrap(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_split_quoted_delimiter() {
        let mut splitter = FieldSplitter::default();
        let fields = splitter.split(2, r#"a,"b,c",d"#).unwrap();
        assert_eq!(fields, vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_split_empty_fields() {
        let mut splitter = FieldSplitter::default();
        assert_eq!(splitter.split(2, "a,,c").unwrap(), vec!["a", "", "c"]);
        assert_eq!(splitter.split(2, ",").unwrap(), vec!["", ""]);
    }

    #[test]
    fn test_split_empty_line() {
        let mut splitter = FieldSplitter::default();
        assert!(splitter.split(2, "").unwrap().is_empty());
    }

    #[test]
    fn test_custom_delimiter() {
        let mut splitter = FieldSplitter::new(b'\t');
        assert_eq!(splitter.split(2, "a\tb,c").unwrap(), vec!["a", "b,c"]);
    }

    #[test]
    fn test_column_index() {
        let mut splitter = FieldSplitter::default();
        assert_eq!(splitter.column_index("id,name,age", "name").unwrap(), 1);
        assert_eq!(splitter.column_index("id,name,age", "id").unwrap(), 0);
    }

    #[test]
    fn test_column_index_first_duplicate_wins() {
        let mut splitter = FieldSplitter::default();
        assert_eq!(splitter.column_index("x,y,x", "x").unwrap(), 0);
    }

    #[test]
    fn test_column_index_case_sensitive() {
        let mut splitter = FieldSplitter::default();
        let err = splitter.column_index("Name,age", "name").unwrap_err();
        assert!(matches!(err, SampleError::ColumnNotFound { ref column } if column == "name"));
    }

    #[test]
    fn test_row_bom_is_part_of_field() {
        let mut splitter = FieldSplitter::default();
        assert_eq!(splitter.field(3, "\u{feff}x,1", 0).unwrap(), "\u{feff}x");
        assert_eq!(splitter.split(3, "\u{feff}x,1").unwrap(), vec!["\u{feff}x", "1"]);
    }

    #[test]
    fn test_header_bom_ignored_for_lookup() {
        let mut splitter = FieldSplitter::default();
        assert_eq!(splitter.column_index("\u{feff}id,name", "id").unwrap(), 0);
        assert_eq!(splitter.column_index("\u{feff}id,name", "name").unwrap(), 1);
    }

    #[test]
    fn test_wide_row_grows_buffers() {
        let mut splitter = FieldSplitter::default();
        let row: Vec<String> = (0..500).map(|i| format!("value_{:04}", i)).collect();
        let line = row.join(",");

        assert_eq!(splitter.split(2, &line).unwrap(), row);
        assert_eq!(splitter.field(3, &line, 499).unwrap(), "value_0499");
        assert_eq!(splitter.field(4, "a,b", 1).unwrap(), "b");
    }

    #[test]
    fn test_non_utf8_split_reports_line() {
        // A non-ASCII delimiter byte can cut a multi-byte character in half
        let mut splitter = FieldSplitter::new(0xA9);
        let err = splitter.split(6, "a\u{e9}b").unwrap_err();
        assert!(matches!(err, SampleError::Csv { line: 6, .. }));
    }

    #[test]
    fn test_field_too_short() {
        let mut splitter = FieldSplitter::default();
        assert_eq!(splitter.field(3, "a,b", 1).unwrap(), "b");

        let err = splitter.field(4, "a", 1).unwrap_err();
        assert!(matches!(
            err,
            SampleError::RowParse {
                line: 4,
                column_index: 1,
                fields: 1
            }
        ));
    }
}
