use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before it is interpreted as a passenger field
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from CSV, JSON or Parquet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the cell as a number; text is parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    /// Empty strings count as missing, the same way an empty CSV cell does.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Ticket class. Ordered first → third so group-bys come out in class order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PassengerClass {
    First,
    Second,
    Third,
}

impl PassengerClass {
    pub const ALL: [PassengerClass; 3] = [
        PassengerClass::First,
        PassengerClass::Second,
        PassengerClass::Third,
    ];

    pub fn number(self) -> u8 {
        match self {
            PassengerClass::First => 1,
            PassengerClass::Second => 2,
            PassengerClass::Third => 3,
        }
    }

    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(PassengerClass::First),
            2 => Some(PassengerClass::Second),
            3 => Some(PassengerClass::Third),
            _ => None,
        }
    }
}

impl From<PassengerClass> for u8 {
    fn from(class: PassengerClass) -> u8 {
        class.number()
    }
}

impl TryFrom<u8> for PassengerClass {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        PassengerClass::from_number(n as i64).ok_or_else(|| format!("invalid passenger class {n}"))
    }
}

impl fmt::Display for PassengerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.number().to_string())
    }
}

/// Port of embarkation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Port {
    /// Cherbourg
    C,
    /// Queenstown
    Q,
    /// Southampton
    S,
}

impl Port {
    pub const ALL: [Port; 3] = [Port::C, Port::Q, Port::S];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Some(Port::C),
            "Q" => Some(Port::Q),
            "S" => Some(Port::S),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Port::C => "C",
            Port::Q => "Q",
            Port::S => "S",
        }
    }

    pub fn town(self) -> &'static str {
        match self {
            Port::C => "Cherbourg",
            Port::Q => "Queenstown",
            Port::S => "Southampton",
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

// ---------------------------------------------------------------------------
// Passenger – one row of the dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    /// Zero-based position in the source file.
    pub id: usize,
    pub survived: bool,
    pub class: PassengerClass,
    pub sex: Sex,
    pub age: Option<f64>,
    pub fare: Option<f64>,
    pub embarked: Option<Port>,
    pub name: String,
}

// ---------------------------------------------------------------------------
// PassengerDataset – the immutable base dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with the column extents the sidebar needs.
#[derive(Debug, Clone, Default)]
pub struct PassengerDataset {
    passengers: Vec<Passenger>,
    /// Embarkation ports observed at least once.
    pub ports: BTreeSet<Port>,
    /// Observed `(min, max)` age, if any age is present.
    pub age_extent: Option<(f64, f64)>,
    /// Observed `(min, max)` fare, if any fare is present.
    pub fare_extent: Option<(f64, f64)>,
}

impl PassengerDataset {
    /// Build the dataset, renumbering ids to row positions.
    pub fn from_passengers(mut passengers: Vec<Passenger>) -> Self {
        for (i, p) in passengers.iter_mut().enumerate() {
            p.id = i;
        }
        let ports = passengers.iter().filter_map(|p| p.embarked).collect();
        let age_extent = extent(passengers.iter().filter_map(|p| p.age));
        let fare_extent = extent(passengers.iter().filter_map(|p| p.fare));
        PassengerDataset {
            passengers,
            ports,
            age_extent,
            fare_extent,
        }
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
