use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use parquet::arrow::ArrowWriter;

/// All 27 federative units, roughly ordered by soy relevance first.
const UF_CODES: [&str; 27] = [
    "MT", "PR", "RS", "GO", "MS", "BA", "MG", "SP", "TO", "MA", "PI", "PA", "SC", "RO", "DF",
    "AC", "AL", "AM", "AP", "CE", "ES", "PB", "PE", "RJ", "RN", "RR", "SE",
];

const YEARS: [i32; 3] = [2020, 2021, 2022];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

struct Row {
    state_code: &'static str,
    year: i32,
    soy_area: f64,
    carbon: f64,
    lr_surplus: f64,
    cars: i64,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::with_capacity(UF_CODES.len() * YEARS.len());
    for (rank, code) in UF_CODES.iter().enumerate() {
        // Soy production falls off sharply outside the big producers.
        let scale = 2_000_000.0 / (1.0 + rank as f64);
        for year in YEARS {
            let growth = 1.0 + 0.05 * (year - YEARS[0]) as f64;
            let soy_area = scale * growth * (0.7 + 0.6 * rng.next_f64());
            rows.push(Row {
                state_code: code,
                year,
                soy_area,
                carbon: soy_area * (2.0 + rng.next_f64()),
                lr_surplus: soy_area * 0.3 * rng.next_f64(),
                cars: (50.0 + scale / 5_000.0 * rng.next_f64()) as i64,
            });
        }
    }
    rows
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record([
        "sigla_uf",
        "year",
        "soja_area_nao_desmat",
        "tco2eq",
        "lr_surplus",
        "qtd_cars",
    ])?;
    for row in rows {
        writer.write_record([
            row.state_code.to_string(),
            row.year.to_string(),
            format!("{:.2}", row.soy_area),
            format!("{:.2}", row.carbon),
            format!("{:.2}", row.lr_surplus),
            row.cars.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("sigla_uf", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("soja_area_nao_desmat", DataType::Float64, false),
        Field::new("tco2eq", DataType::Float64, false),
        Field::new("lr_surplus", DataType::Float64, false),
        Field::new("qtd_cars", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.state_code).collect::<Vec<_>>(),
            )),
            Arc::new(Int32Array::from(
                rows.iter().map(|r| r.year).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.soy_area).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.carbon).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.lr_surplus).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.cars).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// A stub geography: one rectangle per state, laid out on a grid.  Keyed by
/// the same `sigla_uf` codes as the report, which is all the join needs.
fn write_geojson_stub(path: &str) -> Result<()> {
    let mut features = Vec::with_capacity(UF_CODES.len());
    for (i, code) in UF_CODES.iter().enumerate() {
        let col = (i % 6) as f64;
        let row = (i / 6) as f64;
        let lon0 = -73.0 + col * 4.5;
        let lat0 = 5.0 - row * 4.5;
        let ring = vec![
            vec![lon0, lat0 - 4.0],
            vec![lon0 + 4.0, lat0 - 4.0],
            vec![lon0 + 4.0, lat0],
            vec![lon0, lat0],
            vec![lon0, lat0 - 4.0],
        ];

        let properties = serde_json::json!({ "sigla_uf": code })
            .as_object()
            .cloned();

        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
            id: None,
            properties,
            foreign_members: None,
        });
    }

    let collection = GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    });
    std::fs::write(path, collection.to_string()).context("writing GeoJSON stub")?;
    Ok(())
}

fn main() -> Result<()> {
    std::fs::create_dir_all("data").context("creating data directory")?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, "data/sample_report.csv")?;
    write_parquet(&rows, "data/sample_report.parquet")?;
    write_geojson_stub("data/br_uf_stub.geojson")?;

    println!(
        "Wrote {} rows to data/sample_report.csv, data/sample_report.parquet \
         and {} states to data/br_uf_stub.geojson",
        rows.len(),
        UF_CODES.len()
    );
    Ok(())
}
