//! Recording files and dataset export.
//!
//! Reader: parses the tab-separated recordings written by BrainFlow's
//! `DataFilter::write_file`: one line per sample, one column per board
//! row, no header.  Writer: the inverse, plus a minimal safetensors writer
//! for exporting the assembled feature table.
use anyhow::{bail, Context, Result};
use ndarray::Array2;
use std::io::Write;
use std::path::Path;

/// Source of raw sample matrices.
pub trait RecordingReader {
    /// Read `path` as a `[rows, samples]` matrix.
    fn read(&self, path: &Path) -> Result<Array2<f64>>;
}

/// Reader for BrainFlow's tab-separated recording format.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvRecordingReader;

impl RecordingReader for TsvRecordingReader {
    fn read(&self, path: &Path) -> Result<Array2<f64>> {
        read_tsv(path)
    }
}

/// Read a tab-separated recording and transpose it to `[rows, samples]`.
pub fn read_tsv(path: &Path) -> Result<Array2<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut values: Vec<f64> = Vec::new();
    let mut n_cols = 0usize;
    let mut n_samples = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading line {}", line + 1))?;
        let mut cells: Vec<&str> = record.iter().collect();
        // Tolerate a trailing delimiter.
        while cells.last().is_some_and(|c| c.trim().is_empty()) {
            cells.pop();
        }
        if cells.is_empty() {
            continue;
        }
        if n_samples == 0 {
            n_cols = cells.len();
        } else if cells.len() != n_cols {
            bail!("line {}: {} columns, expected {n_cols}", line + 1, cells.len());
        }
        for cell in cells {
            let v: f64 = cell
                .trim()
                .parse()
                .with_context(|| format!("line {}: bad value {cell:?}", line + 1))?;
            values.push(v);
        }
        n_samples += 1;
    }
    if n_samples == 0 {
        bail!("{} contains no samples", path.display());
    }

    // Rows on disk are samples; reversing the axes gives [rows, samples].
    let by_sample = Array2::from_shape_vec((n_samples, n_cols), values)?;
    Ok(by_sample.reversed_axes().as_standard_layout().to_owned())
}

/// Write `data` (`[rows, samples]`) in the format [`read_tsv`] reads.
pub fn write_recording(path: &Path, data: &Array2<f64>) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for sample in data.columns() {
        writer.write_record(sample.iter().map(|v| format!("{v:.6}")))?;
    }
    writer.flush()?;
    Ok(())
}

// ── safetensors writer ────────────────────────────────────────────────────────

/// Simple safetensors file writer for F64 and I32 tensors.
///
/// ```rust,no_run
/// use eegfocus::io::StWriter;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_f64("x", &[1.0, 2.0, 3.0], &[1, 3]);
/// w.add_i32("y", &[0, 1, 1], &[3]);
/// w.write(Path::new("/tmp/out.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl StWriter {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "F64", shape.to_vec()));
    }

    pub fn add_f64_arr2(&mut self, name: &str, arr: &Array2<f64>) {
        let data: Vec<f64> = arr.iter().copied().collect();
        self.add_f64(name, &data, &[arr.nrows(), arr.ncols()]);
    }

    pub fn add_i32(&mut self, name: &str, data: &[i32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries.push((name.to_string(), bytes, "I32", shape.to_vec()));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(name.clone(), serde_json::json!({
                "dtype": dtype,
                "shape": shape,
                "data_offsets": [offset, offset + data.len()],
            }));
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes.into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}
