use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DatasetError;
use super::model::{CellValue, Passenger, PassengerClass, PassengerDataset, Port, Sex};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a passenger dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one passenger per line (the Kaggle layout works as-is)
/// * `.json`    – `[{ "Survived": 1, "Pclass": 3, ... }, ...]`
/// * `.parquet` – flat scalar columns with the same names
pub fn load_file(path: &Path) -> Result<PassengerDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => Err(DatasetError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} passengers from {} (ports: {:?})",
        dataset.len(),
        path.display(),
        dataset.ports
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Column resolution shared by every format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Survived,
    Class,
    Sex,
    Age,
    Fare,
    Embarked,
    Name,
}

impl Field {
    const ALL: [Field; 7] = [
        Field::Survived,
        Field::Class,
        Field::Sex,
        Field::Age,
        Field::Fare,
        Field::Embarked,
        Field::Name,
    ];

    fn column(self) -> &'static str {
        match self {
            Field::Survived => "survived",
            Field::Class => "pclass",
            Field::Sex => "sex",
            Field::Age => "age",
            Field::Fare => "fare",
            Field::Embarked => "embarked",
            Field::Name => "name",
        }
    }

    fn matches(self, header: &str) -> bool {
        let header = header.trim().to_ascii_lowercase();
        header == self.column() || (self == Field::Class && header == "passenger_class")
    }

    /// Optional columns may be missing from the file; every value is then absent.
    fn required(self) -> bool {
        !matches!(self, Field::Age | Field::Fare | Field::Embarked)
    }
}

/// Position of each known field in a row of cells.
#[derive(Debug)]
struct ColumnIndex {
    positions: [Option<usize>; 7],
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, DatasetError> {
        let mut positions = [None; 7];
        for (slot, field) in positions.iter_mut().zip(Field::ALL) {
            *slot = headers.iter().position(|h| field.matches(h));
            if slot.is_none() && field.required() {
                return Err(DatasetError::MissingColumn(field.column()));
            }
        }
        Ok(ColumnIndex { positions })
    }

    fn cell<'a>(&self, cells: &'a [CellValue], field: Field) -> &'a CellValue {
        const NULL: &CellValue = &CellValue::Null;
        self.positions[field as usize]
            .and_then(|i| cells.get(i))
            .unwrap_or(NULL)
    }
}

fn invalid(row: usize, field: Field, cell: &CellValue) -> DatasetError {
    DatasetError::InvalidValue {
        row,
        column: field.column(),
        value: cell.to_string(),
    }
}

/// Interpret one row of cells as a passenger.
fn parse_passenger(
    row: usize,
    cells: &[CellValue],
    columns: &ColumnIndex,
) -> Result<Passenger, DatasetError> {
    let survived = {
        let cell = columns.cell(cells, Field::Survived);
        match cell {
            CellValue::Bool(b) => *b,
            CellValue::Text(s) if s.trim().eq_ignore_ascii_case("true") => true,
            CellValue::Text(s) if s.trim().eq_ignore_ascii_case("false") => false,
            other => match other.as_f64() {
                Some(v) if v == 0.0 => false,
                Some(v) if v == 1.0 => true,
                _ => return Err(invalid(row, Field::Survived, cell)),
            },
        }
    };

    let class = {
        let cell = columns.cell(cells, Field::Class);
        cell.as_f64()
            .filter(|v| v.fract() == 0.0)
            .and_then(|v| PassengerClass::from_number(v as i64))
            .ok_or_else(|| invalid(row, Field::Class, cell))?
    };

    let sex = {
        let cell = columns.cell(cells, Field::Sex);
        match cell {
            CellValue::Text(s) => Sex::parse(s),
            _ => None,
        }
        .ok_or_else(|| invalid(row, Field::Sex, cell))?
    };

    let age = optional_amount(row, Field::Age, columns.cell(cells, Field::Age))?;
    let fare = optional_amount(row, Field::Fare, columns.cell(cells, Field::Fare))?;

    let embarked = {
        let cell = columns.cell(cells, Field::Embarked);
        if cell.is_missing() {
            None
        } else {
            match cell {
                CellValue::Text(s) => {
                    Some(Port::parse(s).ok_or_else(|| invalid(row, Field::Embarked, cell))?)
                }
                _ => return Err(invalid(row, Field::Embarked, cell)),
            }
        }
    };

    let name = match columns.cell(cells, Field::Name) {
        CellValue::Null => String::new(),
        other => other.to_string(),
    };

    Ok(Passenger {
        id: row,
        survived,
        class,
        sex,
        age,
        fare,
        embarked,
        name,
    })
}

fn optional_amount(row: usize, field: Field, cell: &CellValue) -> Result<Option<f64>, DatasetError> {
    if cell.is_missing() {
        return Ok(None);
    }
    match cell.as_f64() {
        // Parquet float columns written by pandas use NaN for missing values.
        Some(v) if v.is_nan() => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(invalid(row, field, cell)),
    }
}

fn build_dataset(headers: &[String], rows: impl IntoIterator<Item = Vec<CellValue>>) -> Result<PassengerDataset> {
    let columns = ColumnIndex::resolve(headers)?;
    let passengers = rows
        .into_iter()
        .enumerate()
        .map(|(row, cells)| parse_passenger(row, &cells, &columns))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PassengerDataset::from_passengers(passengers))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV table with a header row. Empty cells are missing values.
pub fn read_csv<R: Read>(input: R) -> Result<PassengerDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(csv_cell).collect());
    }

    build_dataset(&headers, rows)
}

/// CSV cells stay text so display strings such as names survive unchanged.
/// Numeric fields are parsed later through [`CellValue::as_f64`].
fn csv_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Survived": 0, "Pclass": 3, "Name": "Braund, Mr. Owen Harris",
///     "Sex": "male", "Age": 22.0, "Fare": 7.25, "Embarked": "S" },
///   ...
/// ]
/// ```
pub fn read_json(text: &str) -> Result<PassengerDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records.iter().filter_map(|rec| rec.as_object()).map(|obj| {
        headers
            .iter()
            .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect::<Vec<CellValue>>()
    });

    build_dataset(&headers, rows.collect::<Vec<_>>())
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Columns of types other than strings,
/// integers, floats and booleans (e.g. dictionary-encoded categoricals) are
/// cast to strings first.
fn load_parquet(path: &Path) -> Result<PassengerDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch
            .columns()
            .iter()
            .map(normalize_column)
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| extract_cell(col, row)).collect());
        }
    }

    build_dataset(&headers, rows)
}

fn is_scalar(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn normalize_column(col: &ArrayRef) -> Result<ArrayRef> {
    if is_scalar(col.data_type()) {
        return Ok(col.clone());
    }
    arrow::compute::cast(col.as_ref(), &DataType::Utf8)
        .with_context(|| format!("casting {:?} column to strings", col.data_type()))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let int = |v: Option<i64>| v.map(CellValue::Integer).unwrap_or(CellValue::Null);
    match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| CellValue::Text(s.value(row).to_string()))
            .unwrap_or(CellValue::Null),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| CellValue::Text(s.value(row).to_string()))
            .unwrap_or(CellValue::Null),
        DataType::Boolean => col
            .as_boolean_opt()
            .map(|b| CellValue::Bool(b.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Int8 => int(col.as_primitive_opt::<Int8Type>().map(|a| a.value(row) as i64)),
        DataType::Int16 => int(col.as_primitive_opt::<Int16Type>().map(|a| a.value(row) as i64)),
        DataType::Int32 => int(col.as_primitive_opt::<Int32Type>().map(|a| a.value(row) as i64)),
        DataType::Int64 => int(col.as_primitive_opt::<Int64Type>().map(|a| a.value(row))),
        DataType::UInt8 => int(col.as_primitive_opt::<UInt8Type>().map(|a| a.value(row) as i64)),
        DataType::UInt16 => int(col.as_primitive_opt::<UInt16Type>().map(|a| a.value(row) as i64)),
        DataType::UInt32 => int(col.as_primitive_opt::<UInt32Type>().map(|a| a.value(row) as i64)),
        DataType::UInt64 => int(
            col.as_primitive_opt::<UInt64Type>()
                .and_then(|a| i64::try_from(a.value(row)).ok()),
        ),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float(a.value(row) as f64))
            .unwrap_or(CellValue::Null),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row)))
            .unwrap_or(CellValue::Null),
        _ => CellValue::Null,
    }
}
