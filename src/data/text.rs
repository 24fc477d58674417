//! Line-oriented text format for labeled examples
//!
//! Each record is one line in SVMlight/libsvm style:
//! label [weight:w] index:value index:value ...
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! -1 weight:2.5 2:0.3 5:2.1
//!
//! Empty lines and `#` comments are ignored. The printer always writes the
//! last stored value, even when it is zero, so a vector's stored length
//! survives a save/load cycle.

use crate::core::{DataError, DataVector, LabeledExample, Result, WeightLabel, MAX_FEATURES};
use log::trace;
use std::io::{BufRead, ErrorKind, Lines, Write};

const WEIGHT_KEY: &str = "weight";
const QID_KEY: &str = "qid";

/// First feature index used in the text format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// Indices start at 0
    Zero,
    /// Indices start at 1 (libsvm convention)
    #[default]
    One,
}

impl IndexBase {
    fn offset(self) -> usize {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

/// Options for reading and writing the text format
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Index convention for `index:value` pairs
    pub index_base: IndexBase,
    /// Treat `#` as the start of a comment
    pub skip_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            index_base: IndexBase::One,
            skip_comments: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index_base(mut self, index_base: IndexBase) -> Self {
        self.index_base = index_base;
        self
    }

    pub fn with_skip_comments(mut self, skip_comments: bool) -> Self {
        self.skip_comments = skip_comments;
        self
    }
}

/// Iterator over the examples in a text stream
///
/// Yields one `Result` per record. Line numbers in parse errors are 1-based.
pub struct ExampleIterator<R> {
    lines: Lines<R>,
    line_num: usize,
    options: ParseOptions,
}

impl<R: BufRead> ExampleIterator<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParseOptions::default())
    }

    pub fn with_options(reader: R, options: ParseOptions) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
            options,
        }
    }
}

impl<R: BufRead> Iterator for ExampleIterator<R> {
    type Item = Result<LabeledExample>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.lines.next()?;
            self.line_num += 1;
            let line = match next {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    return Some(Err(DataError::parse(self.line_num, e.to_string())));
                }
                Err(e) => return Some(Err(DataError::IoError(e))),
            };

            let content = if self.options.skip_comments {
                line.split('#').next().unwrap_or("")
            } else {
                line.as_str()
            };
            let content = content.trim();
            if content.is_empty() {
                continue;
            }

            let parsed = parse_line(content, &self.options)
                .map_err(|message| DataError::parse(self.line_num, message));
            if let Ok(example) = &parsed {
                trace!(
                    "line {}: label {} with {} stored values",
                    self.line_num,
                    example.label(),
                    example.data_ref().stored_len()
                );
            }
            return Some(parsed);
        }
    }
}

/// Parse one non-empty record
fn parse_line(line: &str, options: &ParseOptions) -> std::result::Result<LabeledExample, String> {
    let mut parts = line.split_whitespace();

    let label_str = parts.next().ok_or_else(|| "Empty line".to_string())?;
    let label = label_str
        .parse::<f64>()
        .map_err(|_| format!("Invalid label: {label_str}"))?;

    let mut weight = 1.0;
    let mut pairs = Vec::new();
    let mut last_index: Option<usize> = None;

    for token in parts {
        let (key, value_str) = token
            .split_once(':')
            .ok_or_else(|| format!("Invalid feature format: {token}"))?;

        let value = value_str
            .parse::<f64>()
            .map_err(|_| format!("Invalid feature value: {value_str}"))?;

        match key {
            WEIGHT_KEY => {
                weight = value;
                continue;
            }
            QID_KEY => continue,
            _ => {}
        }

        let raw_index = key
            .parse::<usize>()
            .map_err(|_| format!("Invalid feature index: {key}"))?;
        let index = raw_index
            .checked_sub(options.index_base.offset())
            .ok_or_else(|| format!("Feature index must be positive: {raw_index}"))?;
        if index >= MAX_FEATURES {
            return Err(format!("Feature index too large: {raw_index}"));
        }

        if let Some(prev) = last_index {
            if index <= prev {
                return Err(format!(
                    "Feature indices must be strictly increasing: {raw_index} follows {}",
                    prev + options.index_base.offset()
                ));
            }
        }
        last_index = Some(index);
        pairs.push((index, value));
    }

    let data = DataVector::from_sparse(pairs).map_err(|e| e.to_string())?;
    Ok(LabeledExample::with_metadata(data, WeightLabel::new(weight, label)))
}

/// Write one example as a single line
pub fn write_example<W: Write>(
    writer: &mut W,
    example: &LabeledExample,
    index_base: IndexBase,
) -> Result<()> {
    write!(writer, "{}", example.label())?;

    let weight = example.weight();
    if weight != 1.0 {
        write!(writer, " {WEIGHT_KEY}:{weight}")?;
    }

    let values = example.data_ref().as_slice();
    let last = values.len().checked_sub(1);
    for (i, &value) in values.iter().enumerate() {
        if value != 0.0 || Some(i) == last {
            write!(writer, " {}:{}", i + index_base.offset(), value)?;
        }
    }

    writeln!(writer)?;
    Ok(())
}

/// Write every example in order, returning how many were written
pub fn write_examples<'a, W, I>(writer: &mut W, examples: I, index_base: IndexBase) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a LabeledExample>,
{
    let mut count = 0;
    for example in examples {
        write_example(writer, example, index_base)?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(line: &str) -> std::result::Result<LabeledExample, String> {
        parse_line(line, &ParseOptions::default())
    }

    fn print(example: &LabeledExample) -> String {
        let mut out = Vec::new();
        write_example(&mut out, example, IndexBase::One).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_line_basic() {
        let example = parse("+1 1:0.5 3:1.2").unwrap();

        assert_eq!(example.label(), 1.0);
        assert_eq!(example.weight(), 1.0);
        // 1-based to 0-based, gap filled with an explicit zero
        assert_eq!(example.data().to_array(), vec![0.5, 0.0, 1.2]);
        assert_eq!(example.data().logical_len(), 3);
    }

    #[test]
    fn test_parse_line_keeps_label_value() {
        // Labels are not mapped to +1/-1
        let example = parse("2.75 1:1.0").unwrap();
        assert_eq!(example.label(), 2.75);

        let example = parse("-3").unwrap();
        assert_eq!(example.label(), -3.0);
        assert!(example.data().is_empty());
    }

    #[test]
    fn test_parse_line_weight_and_qid() {
        let example = parse("-1 weight:0.25 qid:7 2:4.0").unwrap();
        assert_eq!(example.label(), -1.0);
        assert_eq!(example.weight(), 0.25);
        assert_eq!(example.data().to_array(), vec![0.0, 4.0]);
    }

    #[test]
    fn test_parse_line_invalid_format() {
        // Invalid feature format
        assert!(parse("+1 1").is_err());

        // Invalid index
        assert!(parse("+1 abc:1.0").is_err());

        // Invalid value
        assert!(parse("+1 1:abc").is_err());

        // Invalid label
        assert!(parse("positive 1:1.0").is_err());

        // Zero index with 1-based convention
        assert!(parse("+1 0:1.0").is_err());

        // Out-of-order and duplicate indices
        assert!(parse("+1 3:1.0 2:1.0").is_err());
        assert!(parse("+1 2:1.0 2:1.0").is_err());

        // Indices that cannot be materialized
        let err = parse("1 18446744073709551615:1").unwrap_err();
        assert!(err.contains("Feature index too large"));
        assert!(parse("1 4000000000000:1").is_err());
        let zero_based = ParseOptions::new().with_index_base(IndexBase::Zero);
        assert!(parse_line("1 18446744073709551615:1", &zero_based).is_err());
    }

    #[test]
    fn test_zero_based_indices() {
        let options = ParseOptions::new().with_index_base(IndexBase::Zero);
        let example = parse_line("1 0:1.0 2:3.0", &options).unwrap();
        assert_eq!(example.data().to_array(), vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_iterator_skips_comments_and_blank_lines() {
        let data = "# header\n+1 1:0.5\n\n   \n-1 2:0.3 # trailing\n";
        let examples: Vec<_> = ExampleIterator::new(Cursor::new(data))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].label(), 1.0);
        assert_eq!(examples[1].data().to_array(), vec![0.0, 0.3]);
    }

    #[test]
    fn test_iterator_reports_line_number() {
        let data = "+1 1:0.5\n# comment\n-1 2:oops\n";
        let mut iter = ExampleIterator::new(Cursor::new(data));

        assert!(iter.next().unwrap().is_ok());
        match iter.next().unwrap() {
            Err(DataError::ParseError { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("oops"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_iterator_invalid_utf8_reports_line_number() {
        let data: &[u8] = b"+1 1:0.5\n-1 \xff\xfe:1\n";
        let mut iter = ExampleIterator::new(data);

        assert!(iter.next().unwrap().is_ok());
        assert!(matches!(
            iter.next().unwrap(),
            Err(DataError::ParseError { line: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_label_text_round_trip() {
        let example = LabeledExample::with_metadata(
            DataVector::from_dense(vec![f64::INFINITY, 0.0, f64::NAN]),
            WeightLabel::new(f64::NEG_INFINITY, f64::NAN),
        );
        let text = print(&example);
        assert_eq!(text, "NaN weight:-inf 1:inf 3:NaN\n");

        let reparsed = parse(text.trim()).unwrap();
        assert!(reparsed.label().is_nan());
        assert_eq!(reparsed.weight(), f64::NEG_INFINITY);
        let values = reparsed.data().to_array();
        assert_eq!(values[0], f64::INFINITY);
        assert_eq!(values[1], 0.0);
        assert!(values[2].is_nan());
    }

    #[test]
    fn test_iterator_without_comment_handling() {
        let options = ParseOptions::new().with_skip_comments(false);
        let mut iter = ExampleIterator::with_options(Cursor::new("# not a comment\n"), options);
        assert!(iter.next().unwrap().is_err());
    }

    #[test]
    fn test_write_example_sparse_entries() {
        let example = LabeledExample::new(DataVector::from_dense(vec![1.0, 0.0, 3.0]), -1.0);
        assert_eq!(print(&example), "-1 1:1 3:3\n");
    }

    #[test]
    fn test_write_example_keeps_trailing_zero() {
        let example = LabeledExample::new(DataVector::from_dense(vec![0.5, 0.0, 0.0]), 1.0);
        assert_eq!(print(&example), "1 1:0.5 3:0\n");

        let reparsed = parse(print(&example).trim()).unwrap();
        assert_eq!(reparsed.data().to_array(), vec![0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_write_example_weight() {
        let example = LabeledExample::with_metadata(
            DataVector::from_dense(vec![2.0]),
            WeightLabel::new(0.5, 1.0),
        );
        assert_eq!(print(&example), "1 weight:0.5 1:2\n");
    }

    #[test]
    fn test_write_empty_vector() {
        let example = LabeledExample::new(DataVector::new(), 4.0);
        assert_eq!(print(&example), "4\n");
    }

    #[test]
    fn test_write_examples_counts() {
        let examples = vec![
            LabeledExample::new(DataVector::from_dense(vec![1.0]), 1.0),
            LabeledExample::new(DataVector::from_dense(vec![2.0]), -1.0),
        ];
        let mut out = Vec::new();
        let written = write_examples(&mut out, &examples, IndexBase::Zero).unwrap();
        assert_eq!(written, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "1 0:1\n-1 0:2\n");
    }

    #[test]
    fn test_float_text_is_exact() {
        let values = vec![0.1, 1.0 / 3.0, -2.5e-12, 123456.789];
        let example = LabeledExample::new(DataVector::from_dense(values.clone()), 0.3);
        let reparsed = parse(print(&example).trim()).unwrap();
        assert_eq!(reparsed.data().to_array(), values);
        assert_eq!(reparsed.label(), 0.3);
    }
}
