use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{SoyDataset, StateRecord};

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Why a report could not be loaded. A missing file gets its own variant so
/// the UI can show a distinct message; everything else carries row/column
/// context from the parser.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error(transparent)]
    Parse(#[from] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a soy report from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-delimited UTF-8 with a header row (the report's
///   native format)
/// * `.parquet` – flat columns with the same names
///
/// Either the whole file parses or an error is returned; there is no
/// partially populated dataset.
pub fn load_file(path: &Path) -> Result<SoyDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path).map_err(LoadError::Parse),
        "parquet" | "pq" => load_parquet(path).map_err(LoadError::Parse),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least `sigla_uf`, `year`,
/// `soja_area_nao_desmat`, `tco2eq`, `lr_surplus`, `qtd_cars`.  Columns are
/// matched by header name; extra columns are ignored.  A non-numeric cell in
/// a numeric column is an error, never a silent zero.
fn load_csv(path: &Path) -> Result<SoyDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    parse_csv(file)
}

/// Parse report rows from any reader.  Split out so tests can feed
/// in-memory bytes.
pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<SoyDataset> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut records = Vec::new();
    for (row_no, result) in csv_reader.deserialize::<StateRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    Ok(SoyDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet report with flat scalar columns.
///
/// Expected schema (column order irrelevant, lookup is by name):
/// - `sigla_uf`: Utf8
/// - `year`: Int32 or Int64
/// - `soja_area_nao_desmat`, `tco2eq`, `lr_surplus`: Float64 or Float32
/// - `qtd_cars`: Int32 or Int64
fn load_parquet(path: &Path) -> Result<SoyDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        let col = |name: &str| -> Result<&Arc<dyn Array>> {
            let idx = schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
            Ok(batch.column(idx))
        };

        let state_col = col("sigla_uf")?;
        let year_col = col("year")?;
        let soy_col = col("soja_area_nao_desmat")?;
        let carbon_col = col("tco2eq")?;
        let surplus_col = col("lr_surplus")?;
        let cars_col = col("qtd_cars")?;

        for row in 0..n_rows {
            records.push(StateRecord {
                state_code: extract_string(state_col, row)
                    .with_context(|| format!("Row {row}: 'sigla_uf'"))?,
                year: extract_i64(year_col, row)
                    .with_context(|| format!("Row {row}: 'year'"))? as i32,
                soy_area_undeforested: extract_f64(soy_col, row)
                    .with_context(|| format!("Row {row}: 'soja_area_nao_desmat'"))?,
                carbon_on_soil: extract_f64(carbon_col, row)
                    .with_context(|| format!("Row {row}: 'tco2eq'"))?,
                legal_reserve_surplus: extract_f64(surplus_col, row)
                    .with_context(|| format!("Row {row}: 'lr_surplus'"))?,
                active_registrations: extract_i64(cars_col, row)
                    .with_context(|| format!("Row {row}: 'qtd_cars'"))?,
            });
        }
    }

    Ok(SoyDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    let arr = col
        .as_any()
        .downcast_ref::<StringArray>()
        .with_context(|| format!("expected Utf8 column, got {:?}", col.data_type()))?;
    Ok(arr.value(row).to_string())
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        // Pandas sometimes writes whole-number metric columns as integers.
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        other => bail!("expected numeric column, got {other:?}"),
    }
}

fn extract_i64(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(arr.value(row) as i64)
        }
        other => bail!("expected integer column, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
sigla_uf,year,soja_area_nao_desmat,tco2eq,lr_surplus,qtd_cars
MT,2020,100.0,10.0,5.0,2
MT,2021,50.0,5.0,2.0,1
PA,2020,30.5,3.0,1.0,1
";

    #[test]
    fn csv_rows_become_typed_records() {
        let ds = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].state_code, "MT");
        assert_eq!(ds.records[0].year, 2020);
        assert_eq!(ds.records[2].soy_area_undeforested, 30.5);
        assert_eq!(ds.records[2].active_registrations, 1);
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), vec![2020, 2021]);
        assert_eq!(
            ds.state_codes.iter().cloned().collect::<Vec<_>>(),
            vec!["MT".to_string(), "PA".to_string()]
        );
    }

    #[test]
    fn columns_are_matched_by_name_not_position() {
        let reordered = "\
year,qtd_cars,sigla_uf,lr_surplus,tco2eq,soja_area_nao_desmat
2020,2,MT,5.0,10.0,100.0
";
        let ds = parse_csv(reordered.as_bytes()).unwrap();
        assert_eq!(ds.records[0].state_code, "MT");
        assert_eq!(ds.records[0].soy_area_undeforested, 100.0);
        assert_eq!(ds.records[0].active_registrations, 2);
    }

    #[test]
    fn non_numeric_soy_area_is_an_error() {
        let bad = "\
sigla_uf,year,soja_area_nao_desmat,tco2eq,lr_surplus,qtd_cars
MT,2020,not-a-number,10.0,5.0,2
";
        let err = parse_csv(bad.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 0"), "unexpected error: {err:#}");
    }

    #[test]
    fn missing_column_is_an_error() {
        let bad = "\
sigla_uf,year,tco2eq,lr_surplus,qtd_cars
MT,2020,10.0,5.0,2
";
        assert!(parse_csv(bad.as_bytes()).is_err());
    }

    #[test]
    fn nonexistent_path_yields_not_found() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        // Any path that exists; the extension check runs after the existence
        // check.
        let err = load_file(Path::new("Cargo.toml")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(_)));
    }
}
