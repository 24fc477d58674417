//! In-memory labeled dataset with text load/save

use crate::core::{DataError, DataVector, Dataset, LabeledExample, Result, WeightLabel};
use crate::data::text::{write_examples, ExampleIterator, ParseOptions};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Ordered, append-only collection of labeled examples
#[derive(Debug, Clone, Default)]
pub struct LabeledDataset {
    examples: Vec<LabeledExample>,
    num_features: usize,
    options: ParseOptions,
}

impl LabeledDataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dataset whose dimensionality is at least `num_features`
    pub fn with_num_features(num_features: usize) -> Self {
        Self {
            num_features,
            ..Self::default()
        }
    }

    /// Use non-default text format options for `load` and `save`
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Load a dataset from a text file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut dataset = Self::new();
        dataset.load(path)?;
        Ok(dataset)
    }

    pub fn num_examples(&self) -> usize {
        self.examples.len()
    }

    /// Maximum logical length across all examples, or the fixed minimum
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Detached copy of the example at `index`
    pub fn get_example(&self, index: usize) -> Result<LabeledExample> {
        self.examples
            .get(index)
            .cloned()
            .ok_or(DataError::IndexOutOfBounds {
                index,
                len: self.examples.len(),
            })
    }

    /// Borrow the example at `index`
    pub fn get(&self, index: usize) -> Option<&LabeledExample> {
        self.examples.get(index)
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledExample> {
        self.examples.iter()
    }

    pub fn labels(&self) -> Vec<f64> {
        self.examples.iter().map(|e| e.label()).collect()
    }

    /// Append a copy of `example` with its weight reset to 1.0
    pub fn add_example(&mut self, example: &LabeledExample) {
        let metadata = WeightLabel::new(1.0, example.label());
        self.push(LabeledExample::with_metadata(
            DataVector::from_dense(example.data_ref().to_array()),
            metadata,
        ));
    }

    fn push(&mut self, example: LabeledExample) {
        self.num_features = self.num_features.max(example.data_ref().logical_len());
        self.examples.push(example);
    }

    /// Append every record in the named text file
    ///
    /// Stops at the first malformed record. Examples read before the error
    /// stay in the dataset.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("Loading examples from {}", path.display());

        let file = File::open(path).map_err(|e| DataError::open(path, e))?;
        let added = self.load_from_reader(BufReader::new(file))?;

        debug!("Loaded {} examples from {}", added, path.display());
        Ok(())
    }

    /// Append every record from a text stream, returning how many were added
    pub fn load_from_reader<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut added = 0;
        for example in ExampleIterator::with_options(reader, self.options.clone()) {
            let example = example?;
            // Re-pack the parsed vector densely, keeping the parsed metadata
            let data = DataVector::from_dense(example.data_ref().to_array());
            self.push(LabeledExample::with_metadata(data, example.metadata()));
            added += 1;
        }
        Ok(added)
    }

    /// Write every example to the named file, replacing its contents
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("Saving {} examples to {}", self.examples.len(), path.display());

        let file = File::create(path).map_err(|e| DataError::open(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write every example to a text stream
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_examples(writer, &self.examples, self.options.index_base)?;
        Ok(())
    }
}

impl Dataset for LabeledDataset {
    fn num_examples(&self) -> usize {
        LabeledDataset::num_examples(self)
    }

    fn num_features(&self) -> usize {
        LabeledDataset::num_features(self)
    }

    fn get_example(&self, index: usize) -> Result<LabeledExample> {
        LabeledDataset::get_example(self, index)
    }

    fn labels(&self) -> Vec<f64> {
        LabeledDataset::labels(self)
    }
}

impl Extend<LabeledExample> for LabeledDataset {
    fn extend<I: IntoIterator<Item = LabeledExample>>(&mut self, iter: I) {
        for example in iter {
            self.push(example);
        }
    }
}

impl FromIterator<LabeledExample> for LabeledDataset {
    fn from_iter<I: IntoIterator<Item = LabeledExample>>(iter: I) -> Self {
        let mut dataset = Self::new();
        dataset.extend(iter);
        dataset
    }
}

impl<'a> IntoIterator for &'a LabeledDataset {
    type Item = &'a LabeledExample;
    type IntoIter = std::slice::Iter<'a, LabeledExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}
