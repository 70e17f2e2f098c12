use std::collections::BTreeSet;

use proptest::prelude::*;

use survival_dashboard::config::DashboardConfig;
use survival_dashboard::data::filter::{EmptySelection, FilterCriteria, FilteredView, NumericRange};
use survival_dashboard::data::model::{Passenger, PassengerClass, PassengerDataset, Port, Sex};
use survival_dashboard::state::render;

fn passenger_strategy() -> impl Strategy<Value = Passenger> {
    (
        any::<bool>(),
        prop::sample::select(PassengerClass::ALL.to_vec()),
        prop::sample::select(Sex::ALL.to_vec()),
        prop::option::of(0.0..90.0f64),
        prop::option::of(0.0..700.0f64),
        prop::option::of(prop::sample::select(Port::ALL.to_vec())),
    )
        .prop_map(|(survived, class, sex, age, fare, embarked)| Passenger {
            id: 0,
            survived,
            class,
            sex,
            age,
            fare,
            embarked,
            name: String::new(),
        })
}

fn subset<T: Ord + Clone + std::fmt::Debug + 'static>(all: Vec<T>) -> impl Strategy<Value = BTreeSet<T>> {
    prop::sample::subsequence(all.clone(), 0..=all.len()).prop_map(|v| v.into_iter().collect())
}

fn range_strategy(hi: f64) -> impl Strategy<Value = NumericRange> {
    (0.0..hi, 0.0..hi).prop_map(|(a, b)| NumericRange::new(a.min(b), a.max(b)))
}

fn criteria_strategy() -> impl Strategy<Value = FilterCriteria> {
    (
        subset(Port::ALL.to_vec()),
        subset(Sex::ALL.to_vec()),
        subset(PassengerClass::ALL.to_vec()),
        range_strategy(90.0),
        range_strategy(700.0),
    )
        .prop_map(|(embarked, sex, class, age, fare)| FilterCriteria {
            embarked,
            sex,
            class,
            age,
            fare,
        })
}

fn policy_strategy() -> impl Strategy<Value = EmptySelection> {
    prop::sample::select(vec![EmptySelection::PassThrough, EmptySelection::ExcludeAll])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_filtered_view_is_an_ordered_subset(
        passengers in prop::collection::vec(passenger_strategy(), 0..60),
        criteria in criteria_strategy(),
        policy in policy_strategy(),
    ) {
        let ds = PassengerDataset::from_passengers(passengers);
        let view = FilteredView::new(&ds, &criteria, policy);
        prop_assert!(view.len() <= ds.len());
        prop_assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
        for p in view.iter() {
            prop_assert!(criteria.matches(p, policy));
            prop_assert_eq!(Some(p), ds.passengers().get(p.id));
        }
    }

    #[test]
    fn prop_derived_views_stay_in_bounds(
        passengers in prop::collection::vec(passenger_strategy(), 0..60),
        criteria in criteria_strategy(),
        policy in policy_strategy(),
    ) {
        let ds = PassengerDataset::from_passengers(passengers);
        let config = DashboardConfig { empty_selection: policy, ..DashboardConfig::default() };
        let (indices, views) = render(&ds, &criteria, &config);
        let s = views.summary;

        prop_assert_eq!(views.row_count, indices.len());
        prop_assert_eq!(s.survived + s.died, s.total);
        prop_assert!((0.0..=100.0).contains(&s.survival_rate));
        if s.total == 0 {
            prop_assert_eq!(s.survival_rate, 0.0);
        }
        prop_assert!((0.0..=100.0).contains(&views.by_sex.male));
        prop_assert!((0.0..=100.0).contains(&views.by_sex.female));

        prop_assert!(views.heatmap.iter().all(|c| c.passengers > 0));
        prop_assert!(views.embarkation.iter().all(|r| r.passengers > 0));

        prop_assert_eq!(views.top_fares.len(), indices.len().min(10));
        let fares: Vec<f64> = views.top_fares.iter().map(|r| r.fare.unwrap_or(f64::NEG_INFINITY)).collect();
        prop_assert!(fares.windows(2).all(|w| w[0] >= w[1]));

        prop_assert!(views.top_age_groups.len() <= 5);
        prop_assert!(views.top_age_groups.windows(2).all(|w| w[0].survivors >= w[1].survivors));
    }

    #[test]
    fn prop_recomputation_is_idempotent(
        passengers in prop::collection::vec(passenger_strategy(), 0..40),
        criteria in criteria_strategy(),
    ) {
        let ds = PassengerDataset::from_passengers(passengers);
        let config = DashboardConfig::default();
        let first = render(&ds, &criteria, &config);
        let second = render(&ds, &criteria, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_missing_values_never_filtered_out_by_ranges(
        passengers in prop::collection::vec(passenger_strategy(), 1..40),
        age in range_strategy(90.0),
        fare in range_strategy(700.0),
    ) {
        let ds = PassengerDataset::from_passengers(passengers);
        let criteria = FilterCriteria {
            embarked: BTreeSet::new(),
            sex: BTreeSet::new(),
            class: BTreeSet::new(),
            age,
            fare,
        };
        let view = FilteredView::new(&ds, &criteria, EmptySelection::PassThrough);
        let kept: BTreeSet<usize> = view.indices().iter().copied().collect();
        for p in ds.passengers() {
            if p.age.is_none() && p.fare.is_none() {
                prop_assert!(kept.contains(&p.id));
            }
        }
    }
}
