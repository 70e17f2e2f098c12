use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Passenger, PassengerClass, PassengerDataset, Port, Sex};
use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// What an empty multi-select means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelection {
    /// Nothing selected → no filtering on that attribute.
    #[default]
    PassThrough,
    /// Nothing selected → every row is excluded.
    ExcludeAll,
}

/// Inclusive numeric range. A missing value always lies inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        NumericRange { min, max }
    }

    pub fn contains(&self, value: Option<f64>) -> bool {
        match value {
            Some(v) => v >= self.min && v <= self.max,
            None => true,
        }
    }
}

/// Slider domain and default selection for one numeric attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBounds {
    /// Lowest value the slider can reach.
    pub lo: f64,
    /// Highest value the slider can reach.
    pub hi: f64,
    pub step: f64,
    /// Range selected at startup and after a reset.
    pub default: NumericRange,
}

/// Slider domains for age and fare, derived once from the base dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterBounds {
    pub age: SliderBounds,
    pub fare: SliderBounds,
}

impl FilterBounds {
    /// Age uses whole years, so the observed extent is widened outwards to
    /// integers; fare keeps the exact observed extent.
    pub fn from_dataset(dataset: &PassengerDataset, config: &DashboardConfig) -> Self {
        let age_default = match dataset.age_extent {
            Some((lo, hi)) => NumericRange::new(lo.floor(), hi.ceil()),
            None => NumericRange::new(0.0, config.age_ceiling_floor),
        };
        let fare_default = match dataset.fare_extent {
            Some((lo, hi)) => NumericRange::new(lo, hi),
            None => NumericRange::new(0.0, config.fare_ceiling_floor),
        };
        FilterBounds {
            age: SliderBounds {
                lo: 0.0,
                hi: config.age_ceiling_floor.max(age_default.max),
                step: 1.0,
                default: age_default,
            },
            fare: SliderBounds {
                lo: 0.0,
                hi: config.fare_ceiling_floor.max(fare_default.max),
                step: 0.5,
                default: fare_default,
            },
        }
    }
}

/// The complete set of user selections. Replaced as a whole on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub embarked: BTreeSet<Port>,
    pub sex: BTreeSet<Sex>,
    pub class: BTreeSet<PassengerClass>,
    pub age: NumericRange,
    pub fare: NumericRange,
}

impl Default for FilterCriteria {
    /// Selects nothing and spans every number; only meaningful before a
    /// dataset is loaded.
    fn default() -> Self {
        FilterCriteria {
            embarked: BTreeSet::new(),
            sex: BTreeSet::new(),
            class: BTreeSet::new(),
            age: NumericRange::new(f64::NEG_INFINITY, f64::INFINITY),
            fare: NumericRange::new(f64::NEG_INFINITY, f64::INFINITY),
        }
    }
}

impl FilterCriteria {
    /// Everything selected: observed ports, both sexes, all classes, full ranges.
    pub fn defaults(dataset: &PassengerDataset, bounds: &FilterBounds) -> Self {
        FilterCriteria {
            embarked: dataset.ports.clone(),
            sex: Sex::ALL.into_iter().collect(),
            class: PassengerClass::ALL.into_iter().collect(),
            age: bounds.age.default,
            fare: bounds.fare.default,
        }
    }

    /// Whether a single passenger passes every predicate.
    pub fn matches(&self, p: &Passenger, policy: EmptySelection) -> bool {
        let embarked_ok = match p.embarked {
            Some(port) => selected(&self.embarked, &port, policy),
            // An empty selection under ExcludeAll still excludes unknown ports.
            None => !(self.embarked.is_empty() && policy == EmptySelection::ExcludeAll),
        };
        embarked_ok
            && selected(&self.sex, &p.sex, policy)
            && selected(&self.class, &p.class, policy)
            && self.age.contains(p.age)
            && self.fare.contains(p.fare)
    }
}

fn selected<T: Ord>(set: &BTreeSet<T>, value: &T, policy: EmptySelection) -> bool {
    if set.is_empty() {
        return policy == EmptySelection::PassThrough;
    }
    set.contains(value)
}

/// Return indices of passengers that pass all active filters, in row order.
pub fn filtered_indices(
    dataset: &PassengerDataset,
    criteria: &FilterCriteria,
    policy: EmptySelection,
) -> Vec<usize> {
    dataset
        .passengers()
        .iter()
        .enumerate()
        .filter(|(_, p)| criteria.matches(p, policy))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView – a read-only subset of the base dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a PassengerDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a PassengerDataset, criteria: &FilterCriteria, policy: EmptySelection) -> Self {
        FilteredView {
            dataset,
            indices: filtered_indices(dataset, criteria, policy),
        }
    }

    /// The whole dataset, unfiltered.
    pub fn all(dataset: &'a PassengerDataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Passenger> + '_ {
        let passengers = self.dataset.passengers();
        self.indices.iter().map(move |&i| &passengers[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger(
        sex: Sex,
        class: PassengerClass,
        age: Option<f64>,
        fare: Option<f64>,
        embarked: Option<Port>,
    ) -> Passenger {
        Passenger {
            id: 0,
            survived: false,
            class,
            sex,
            age,
            fare,
            embarked,
            name: String::new(),
        }
    }

    fn dataset() -> PassengerDataset {
        use PassengerClass::*;
        PassengerDataset::from_passengers(vec![
            passenger(Sex::Female, First, Some(29.0), Some(100.0), Some(Port::C)),
            passenger(Sex::Male, Third, Some(22.0), Some(7.0), Some(Port::S)),
            passenger(Sex::Male, Third, None, Some(8.0), Some(Port::S)),
            passenger(Sex::Female, Second, Some(40.0), None, None),
        ])
    }

    fn defaults(ds: &PassengerDataset) -> FilterCriteria {
        let bounds = FilterBounds::from_dataset(ds, &DashboardConfig::default());
        FilterCriteria::defaults(ds, &bounds)
    }

    #[test]
    fn defaults_select_everything() {
        let ds = dataset();
        let criteria = defaults(&ds);
        assert_eq!(
            filtered_indices(&ds, &criteria, EmptySelection::PassThrough),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn bounds_widen_to_configured_ceilings() {
        let ds = dataset();
        let bounds = FilterBounds::from_dataset(&ds, &DashboardConfig::default());
        assert_eq!(bounds.age.hi, 80.0);
        assert_eq!(bounds.age.default, NumericRange::new(22.0, 40.0));
        assert_eq!(bounds.fare.hi, 600.0);
        assert_eq!(bounds.fare.default, NumericRange::new(7.0, 100.0));

        let rich = PassengerDataset::from_passengers(vec![passenger(
            Sex::Male,
            PassengerClass::First,
            Some(80.5),
            Some(612.33),
            None,
        )]);
        let bounds = FilterBounds::from_dataset(&rich, &DashboardConfig::default());
        assert_eq!(bounds.age.hi, 81.0);
        assert_eq!(bounds.fare.hi, 612.33);
    }

    #[test]
    fn bounds_without_numeric_values_fall_back_to_ceilings() {
        let ds = PassengerDataset::from_passengers(vec![passenger(
            Sex::Male,
            PassengerClass::First,
            None,
            None,
            None,
        )]);
        let bounds = FilterBounds::from_dataset(&ds, &DashboardConfig::default());
        assert_eq!(bounds.age.default, NumericRange::new(0.0, 80.0));
        assert_eq!(bounds.fare.default, NumericRange::new(0.0, 600.0));
    }

    #[test]
    fn missing_values_pass_numeric_and_port_filters() {
        let ds = dataset();
        let mut criteria = defaults(&ds);
        criteria.age = NumericRange::new(25.0, 35.0);
        assert_eq!(
            filtered_indices(&ds, &criteria, EmptySelection::PassThrough),
            vec![0, 2]
        );

        let mut criteria = defaults(&ds);
        criteria.embarked = [Port::C].into_iter().collect();
        criteria.fare = NumericRange::new(50.0, 600.0);
        // Row 3 has neither port nor fare and survives both filters.
        assert_eq!(
            filtered_indices(&ds, &criteria, EmptySelection::PassThrough),
            vec![0, 3]
        );
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = dataset();
        let mut criteria = defaults(&ds);
        criteria.age = NumericRange::new(22.0, 29.0);
        criteria.fare = NumericRange::new(7.0, 100.0);
        assert_eq!(
            filtered_indices(&ds, &criteria, EmptySelection::PassThrough),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn empty_selection_policies() {
        let ds = dataset();
        let mut criteria = defaults(&ds);
        criteria.sex.clear();
        assert_eq!(
            filtered_indices(&ds, &criteria, EmptySelection::PassThrough).len(),
            4
        );
        assert!(filtered_indices(&ds, &criteria, EmptySelection::ExcludeAll).is_empty());

        let mut criteria = defaults(&ds);
        criteria.embarked.clear();
        assert_eq!(
            filtered_indices(&ds, &criteria, EmptySelection::PassThrough).len(),
            4
        );
        assert!(filtered_indices(&ds, &criteria, EmptySelection::ExcludeAll).is_empty());
    }

    #[test]
    fn categorical_filters_combine_with_and() {
        let ds = dataset();
        let mut criteria = defaults(&ds);
        criteria.sex = [Sex::Male].into_iter().collect();
        criteria.class = [PassengerClass::Third].into_iter().collect();
        criteria.fare = NumericRange::new(7.5, 600.0);
        assert_eq!(
            filtered_indices(&ds, &criteria, EmptySelection::PassThrough),
            vec![2]
        );
    }

    #[test]
    fn view_iterates_in_row_order() {
        let ds = dataset();
        let view = FilteredView::all(&ds);
        assert_eq!(view.len(), 4);
        let ids: Vec<usize> = view.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
