//! Writes a synthetic passenger list to `sample_passengers.csv` and
//! `sample_passengers.parquet` for trying the dashboard without the Kaggle file.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const PASSENGERS: usize = 400;

/// Deterministic splitmix64 generator; good enough for sample data.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SampleRow {
    passenger_id: i64,
    survived: i64,
    pclass: i64,
    name: String,
    sex: &'static str,
    age: Option<f64>,
    fare: Option<f64>,
    embarked: Option<&'static str>,
}

fn generate(rng: &mut SampleRng) -> Vec<SampleRow> {
    let surnames = ["Smith", "Brown", "Kelly", "Andersson", "Sage", "Goodwin", "Rice", "Carter"];
    let male_titles = ["Mr.", "Master."];
    let female_titles = ["Mrs.", "Miss."];
    let given = ["John", "Mary", "William", "Anna", "Thomas", "Elin", "James", "Ellen"];

    (0..PASSENGERS)
        .map(|i| {
            let pclass = match rng.unit() {
                u if u < 0.24 => 1,
                u if u < 0.45 => 2,
                _ => 3,
            };
            let female = rng.chance(0.35);
            let age = (!rng.chance(0.2)).then(|| {
                let a = (rng.unit() + rng.unit() + rng.unit()) / 3.0 * 70.0 + 0.4;
                (a * 2.0).round() / 2.0
            });
            let base_fare = match pclass {
                1 => 30.0 + rng.unit() * 480.0,
                2 => 10.0 + rng.unit() * 60.0,
                _ => 5.0 + rng.unit() * 25.0,
            };
            let fare = (!rng.chance(0.02)).then(|| (base_fare * 100.0_f64).round() / 100.0);
            let embarked = (!rng.chance(0.01)).then(|| *rng.pick(&["S", "S", "S", "C", "Q"]));

            let mut p_survive: f64 = if female { 0.74 } else { 0.19 };
            p_survive += match pclass {
                1 => 0.15,
                2 => 0.02,
                _ => -0.1,
            };
            if age.is_some_and(|a| a < 10.0) {
                p_survive += 0.2;
            }
            let survived = rng.chance(p_survive.clamp(0.02, 0.98));

            let title = if female {
                rng.pick(&female_titles)
            } else {
                rng.pick(&male_titles)
            };
            let name = format!("{}, {} {}", rng.pick(&surnames), title, rng.pick(&given));

            SampleRow {
                passenger_id: i as i64 + 1,
                survived: i64::from(survived),
                pclass,
                name,
                sex: if female { "female" } else { "male" },
                age,
                fare,
                embarked,
            }
        })
        .collect()
}

fn write_csv(rows: &[SampleRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("PassengerId", DataType::Int64, false),
        Field::new("Survived", DataType::Boolean, false),
        Field::new("Pclass", DataType::Int64, false),
        Field::new("Name", DataType::Utf8, false),
        Field::new("Sex", DataType::Utf8, false),
        Field::new("Age", DataType::Float64, true),
        Field::new("Fare", DataType::Float64, true),
        Field::new("Embarked", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.passenger_id))),
            Arc::new(BooleanArray::from(rows.iter().map(|r| r.survived == 1).collect::<Vec<_>>())),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.pclass))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.name.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sex))),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.age).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.fare).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.embarked).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "sample_passengers.csv")?;
    write_parquet(&rows, "sample_passengers.parquet")?;

    let survivors = rows.iter().filter(|r| r.survived == 1).count();
    println!(
        "Wrote {} passengers ({survivors} survivors) to sample_passengers.csv and sample_passengers.parquet",
        rows.len()
    );
    Ok(())
}
