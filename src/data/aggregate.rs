//! Derived views computed from a [`FilteredView`].
//!
//! Every function here is pure and recomputes from scratch. An empty view
//! yields zero counts and empty tables; rates never divide by zero.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::filter::FilteredView;
use super::model::{Passenger, PassengerClass, Port, Sex};
use crate::config::DashboardConfig;

/// `part / whole * 100`, or 0 when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// One decimal place followed by a percent sign, e.g. `38.4%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Running survivor tally for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    passengers: usize,
    survivors: usize,
}

impl Tally {
    fn add(&mut self, p: &Passenger) {
        self.passengers += 1;
        self.survivors += usize::from(p.survived);
    }

    fn rate(&self) -> f64 {
        percentage(self.survivors, self.passengers)
    }
}

// ---------------------------------------------------------------------------
// Summary counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurvivalSummary {
    pub total: usize,
    pub survived: usize,
    pub died: usize,
    /// Percentage of `total`, 0 for an empty view.
    pub survival_rate: f64,
}

pub fn survival_summary(view: &FilteredView<'_>) -> SurvivalSummary {
    let total = view.len();
    let survived = view.iter().filter(|p| p.survived).count();
    SurvivalSummary {
        total,
        survived,
        died: total - survived,
        survival_rate: percentage(survived, total),
    }
}

// ---------------------------------------------------------------------------
// Rate by sex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SexSurvival {
    pub male: f64,
    pub female: f64,
}

impl SexSurvival {
    pub fn rate(&self, sex: Sex) -> f64 {
        match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
        }
    }
}

/// Survival percentage per sex; a sex with no rows reports 0.
pub fn survival_by_sex(view: &FilteredView<'_>) -> SexSurvival {
    let mut male = Tally::default();
    let mut female = Tally::default();
    for p in view.iter() {
        match p.sex {
            Sex::Male => male.add(p),
            Sex::Female => female.add(p),
        }
    }
    SexSurvival {
        male: male.rate(),
        female: female.rate(),
    }
}

// ---------------------------------------------------------------------------
// Age groups
// ---------------------------------------------------------------------------

/// Ten-year age buckets, left-closed. Everything from 70 up lands in `Over70`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeGroup {
    #[serde(rename = "0-9")]
    Under10,
    #[serde(rename = "10-19")]
    Teens,
    #[serde(rename = "20-29")]
    Twenties,
    #[serde(rename = "30-39")]
    Thirties,
    #[serde(rename = "40-49")]
    Forties,
    #[serde(rename = "50-59")]
    Fifties,
    #[serde(rename = "60-69")]
    Sixties,
    #[serde(rename = "70+")]
    Over70,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 8] = [
        AgeGroup::Under10,
        AgeGroup::Teens,
        AgeGroup::Twenties,
        AgeGroup::Thirties,
        AgeGroup::Forties,
        AgeGroup::Fifties,
        AgeGroup::Sixties,
        AgeGroup::Over70,
    ];

    /// Bucket for an age; `None` for negative or non-finite input.
    pub fn from_age(age: f64) -> Option<Self> {
        if !age.is_finite() || age < 0.0 {
            return None;
        }
        let decade = (age / 10.0).floor() as usize;
        Some(Self::ALL[decade.min(Self::ALL.len() - 1)])
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Under10 => "0-9",
            AgeGroup::Teens => "10-19",
            AgeGroup::Twenties => "20-29",
            AgeGroup::Thirties => "30-39",
            AgeGroup::Forties => "40-49",
            AgeGroup::Fifties => "50-59",
            AgeGroup::Sixties => "60-69",
            AgeGroup::Over70 => "70+",
        }
    }

    /// Position in bucket order, used as a chart axis coordinate.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

fn age_group(p: &Passenger) -> Option<AgeGroup> {
    p.age.and_then(AgeGroup::from_age)
}

// ---------------------------------------------------------------------------
// Heatmap: age group × class
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub age_group: AgeGroup,
    pub class: PassengerClass,
    pub survival_rate: f64,
    pub passengers: usize,
}

/// One cell per observed (age group, class) pair, ordered by age group then
/// class. Pairs without passengers are left out rather than reported as 0.
/// Passengers of unknown age are not placed in any cell.
pub fn age_class_heatmap(view: &FilteredView<'_>) -> Vec<HeatmapCell> {
    let mut tallies: BTreeMap<(AgeGroup, PassengerClass), Tally> = BTreeMap::new();
    for p in view.iter() {
        if let Some(group) = age_group(p) {
            tallies.entry((group, p.class)).or_default().add(p);
        }
    }
    tallies
        .into_iter()
        .map(|((age_group, class), tally)| HeatmapCell {
            age_group,
            class,
            survival_rate: tally.rate(),
            passengers: tally.passengers,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Embarkation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmbarkationRate {
    pub port: Port,
    pub survival_rate: f64,
    pub passengers: usize,
}

/// Survival percentage per observed port, in port order. Passengers with no
/// recorded port are dropped from this table only.
pub fn survival_by_port(view: &FilteredView<'_>) -> Vec<EmbarkationRate> {
    let mut tallies: BTreeMap<Port, Tally> = BTreeMap::new();
    for p in view.iter() {
        if let Some(port) = p.embarked {
            tallies.entry(port).or_default().add(p);
        }
    }
    tallies
        .into_iter()
        .map(|(port, tally)| EmbarkationRate {
            port,
            survival_rate: tally.rate(),
            passengers: tally.passengers,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeGroupSurvivors {
    pub age_group: AgeGroup,
    pub survivors: usize,
}

/// The `n` age groups with the most survivors, most first. Equal counts keep
/// bucket order; groups without survivors are not listed.
pub fn top_age_groups(view: &FilteredView<'_>, n: usize) -> Vec<AgeGroupSurvivors> {
    let mut counts: BTreeMap<AgeGroup, usize> = BTreeMap::new();
    for p in view.iter().filter(|p| p.survived) {
        if let Some(group) = age_group(p) {
            *counts.entry(group).or_default() += 1;
        }
    }
    let mut ranking: Vec<AgeGroupSurvivors> = counts
        .into_iter()
        .map(|(age_group, survivors)| AgeGroupSurvivors {
            age_group,
            survivors,
        })
        .collect();
    // `sort_by` is stable, so ties stay in bucket order.
    ranking.sort_by(|a, b| b.survivors.cmp(&a.survivors));
    ranking.truncate(n);
    ranking
}

/// A row of the "highest fares" table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareRow {
    pub name: String,
    pub class: PassengerClass,
    pub sex: Sex,
    pub age: Option<f64>,
    pub fare: Option<f64>,
    pub survived: bool,
}

impl From<&Passenger> for FareRow {
    fn from(p: &Passenger) -> Self {
        FareRow {
            name: p.name.clone(),
            class: p.class,
            sex: p.sex,
            age: p.age,
            fare: p.fare,
            survived: p.survived,
        }
    }
}

/// The `n` highest fares, descending. Equal fares keep row order and
/// passengers without a fare come last.
pub fn top_fares(view: &FilteredView<'_>, n: usize) -> Vec<FareRow> {
    let mut rows: Vec<&Passenger> = view.iter().collect();
    rows.sort_by(|a, b| match (a.fare, b.fare) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    rows.into_iter().take(n).map(FareRow::from).collect()
}

// ---------------------------------------------------------------------------
// All views at once
// ---------------------------------------------------------------------------

/// Everything the dashboard draws for one set of filter criteria.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedViews {
    pub row_count: usize,
    pub summary: SurvivalSummary,
    pub by_sex: SexSurvival,
    pub heatmap: Vec<HeatmapCell>,
    pub embarkation: Vec<EmbarkationRate>,
    pub top_age_groups: Vec<AgeGroupSurvivors>,
    pub top_fares: Vec<FareRow>,
}

impl DerivedViews {
    pub fn compute(view: &FilteredView<'_>, config: &DashboardConfig) -> Self {
        DerivedViews {
            row_count: view.len(),
            summary: survival_summary(view),
            by_sex: survival_by_sex(view),
            heatmap: age_class_heatmap(view),
            embarkation: survival_by_port(view),
            top_age_groups: top_age_groups(view, config.top_age_groups),
            top_fares: top_fares(view, config.top_fares),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PassengerDataset;

    fn passenger(survived: bool, age: Option<f64>, fare: Option<f64>) -> Passenger {
        Passenger {
            id: 0,
            survived,
            class: PassengerClass::Third,
            sex: Sex::Male,
            age,
            fare,
            embarked: Some(Port::S),
            name: String::new(),
        }
    }

    #[test]
    fn age_groups_are_left_closed_with_overflow() {
        assert_eq!(AgeGroup::from_age(0.0), Some(AgeGroup::Under10));
        assert_eq!(AgeGroup::from_age(9.99), Some(AgeGroup::Under10));
        assert_eq!(AgeGroup::from_age(10.0), Some(AgeGroup::Teens));
        assert_eq!(AgeGroup::from_age(69.9), Some(AgeGroup::Sixties));
        assert_eq!(AgeGroup::from_age(70.0), Some(AgeGroup::Over70));
        assert_eq!(AgeGroup::from_age(80.0), Some(AgeGroup::Over70));
        assert_eq!(AgeGroup::from_age(-1.0), None);
        assert_eq!(AgeGroup::Over70.label(), "70+");
    }

    #[test]
    fn empty_view_degrades_to_zeros() {
        let ds = PassengerDataset::default();
        let view = FilteredView::all(&ds);
        let views = DerivedViews::compute(&view, &DashboardConfig::default());
        assert!(views.is_empty());
        assert_eq!(
            views.summary,
            SurvivalSummary {
                total: 0,
                survived: 0,
                died: 0,
                survival_rate: 0.0
            }
        );
        assert_eq!(views.by_sex, SexSurvival { male: 0.0, female: 0.0 });
        assert!(views.heatmap.is_empty());
        assert!(views.embarkation.is_empty());
        assert!(views.top_age_groups.is_empty());
        assert!(views.top_fares.is_empty());
    }

    #[test]
    fn top_age_groups_ties_keep_bucket_order() {
        let ds = PassengerDataset::from_passengers(vec![
            passenger(true, Some(45.0), None),
            passenger(true, Some(5.0), None),
            passenger(true, Some(25.0), None),
            passenger(true, Some(27.0), None),
            passenger(false, Some(15.0), None),
            passenger(true, None, None),
        ]);
        let ranking = top_age_groups(&FilteredView::all(&ds), 5);
        let labels: Vec<(&str, usize)> = ranking
            .iter()
            .map(|r| (r.age_group.label(), r.survivors))
            .collect();
        assert_eq!(labels, vec![("20-29", 2), ("0-9", 1), ("40-49", 1)]);

        assert_eq!(top_age_groups(&FilteredView::all(&ds), 1).len(), 1);
    }

    #[test]
    fn top_fares_sorts_descending_with_missing_last() {
        let mut rows = vec![
            passenger(false, None, Some(7.25)),
            passenger(false, None, None),
            passenger(true, None, Some(512.33)),
            passenger(false, None, Some(7.25)),
        ];
        for (i, p) in rows.iter_mut().enumerate() {
            p.name = format!("p{i}");
        }
        let ds = PassengerDataset::from_passengers(rows);
        let top = top_fares(&FilteredView::all(&ds), 10);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["p2", "p0", "p3", "p1"]);
        assert_eq!(top_fares(&FilteredView::all(&ds), 2).len(), 2);
    }

    #[test]
    fn heatmap_omits_unobserved_pairs() {
        let mut first = passenger(true, Some(35.0), None);
        first.class = PassengerClass::First;
        let ds = PassengerDataset::from_passengers(vec![
            first,
            passenger(false, Some(31.0), None),
            passenger(true, Some(33.0), None),
            passenger(true, None, None),
        ]);
        let cells = age_class_heatmap(&FilteredView::all(&ds));
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].class, PassengerClass::First);
        assert_eq!(cells[0].survival_rate, 100.0);
        assert_eq!(cells[1].class, PassengerClass::Third);
        assert_eq!(cells[1].survival_rate, 50.0);
        assert_eq!(cells[1].passengers, 2);
    }

    #[test]
    fn percent_formatting_uses_one_decimal() {
        assert_eq!(format_percent(38.383838), "38.4%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert!((percentage(1, 3) - 33.333).abs() < 1e-3);
        assert_eq!(percentage(5, 0), 0.0);
    }
}
