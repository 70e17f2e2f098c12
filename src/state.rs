use std::sync::Arc;

use crate::color::Theme;
use crate::config::DashboardConfig;
use crate::data::aggregate::DerivedViews;
use crate::data::filter::{FilterBounds, FilterCriteria, FilteredView};
use crate::data::model::{PassengerClass, PassengerDataset, Port, Sex};

// ---------------------------------------------------------------------------
// Recompute pipeline
// ---------------------------------------------------------------------------

/// Filter the dataset and aggregate the result. Pure: the same inputs always
/// give the same views.
pub fn render(
    dataset: &PassengerDataset,
    criteria: &FilterCriteria,
    config: &DashboardConfig,
) -> (Vec<usize>, DerivedViews) {
    let view = FilteredView::new(dataset, criteria, config.empty_selection);
    let views = DerivedViews::compute(&view, config);
    (view.indices().to_vec(), views)
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One session's state, independent of rendering. The dataset is shared
/// read-only; criteria and derived views belong to this session alone.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Arc<PassengerDataset>>,

    /// Slider domains for the loaded dataset.
    pub bounds: Option<FilterBounds>,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Indices of passengers passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Views computed from `visible_indices`.
    pub views: Option<DerivedViews>,

    /// Chart palette. Has no effect on the data.
    pub theme: Theme,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            theme: config.theme,
            config,
            dataset: None,
            bounds: None,
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            views: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset filters to select everything.
    pub fn set_dataset(&mut self, dataset: Arc<PassengerDataset>) {
        let bounds = FilterBounds::from_dataset(&dataset, &self.config);
        self.criteria = FilterCriteria::defaults(&dataset, &bounds);
        self.bounds = Some(bounds);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute visible rows and every derived view from scratch.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            self.visible_indices.clear();
            self.views = None;
            return;
        };
        let (indices, views) = render(ds, &self.criteria, &self.config);
        log::debug!(
            "Recomputed views: {} of {} passengers match {:?}",
            indices.len(),
            ds.len(),
            self.criteria
        );
        self.visible_indices = indices;
        self.views = Some(views);
    }

    /// Replace the criteria as a whole. No-op when nothing changed.
    pub fn apply_criteria(&mut self, criteria: FilterCriteria) {
        if criteria != self.criteria {
            self.criteria = criteria;
            self.refilter();
        }
    }

    /// Restore every filter to its full default selection.
    pub fn reset_filters(&mut self) {
        let defaults = match (&self.dataset, &self.bounds) {
            (Some(ds), Some(bounds)) => FilterCriteria::defaults(ds, bounds),
            _ => return,
        };
        self.apply_criteria(defaults);
    }

    pub fn toggle_port(&mut self, port: Port) {
        let mut next = self.criteria.clone();
        toggle(&mut next.embarked, port);
        self.apply_criteria(next);
    }

    pub fn toggle_sex(&mut self, sex: Sex) {
        let mut next = self.criteria.clone();
        toggle(&mut next.sex, sex);
        self.apply_criteria(next);
    }

    pub fn toggle_class(&mut self, class: PassengerClass) {
        let mut next = self.criteria.clone();
        toggle(&mut next.class, class);
        self.apply_criteria(next);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}

fn toggle<T: Ord>(set: &mut std::collections::BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::NumericRange;
    use crate::data::model::Passenger;

    fn dataset() -> Arc<PassengerDataset> {
        let rows = [
            (true, PassengerClass::First, Sex::Female, Some(29.0), Some(100.0), Some(Port::C)),
            (false, PassengerClass::Third, Sex::Male, Some(22.0), Some(7.0), Some(Port::S)),
            (true, PassengerClass::Third, Sex::Male, None, Some(8.0), Some(Port::S)),
            (false, PassengerClass::Second, Sex::Female, Some(40.0), Some(26.0), None),
        ];
        let passengers = rows
            .into_iter()
            .map(|(survived, class, sex, age, fare, embarked)| Passenger {
                id: 0,
                survived,
                class,
                sex,
                age,
                fare,
                embarked,
                name: String::new(),
            })
            .collect();
        Arc::new(PassengerDataset::from_passengers(passengers))
    }

    #[test]
    fn loading_a_dataset_selects_everything() {
        let mut state = AppState::default();
        assert!(state.views.is_none());
        state.set_dataset(dataset());
        assert_eq!(state.visible_indices, vec![0, 1, 2, 3]);
        let views = state.views.as_ref().unwrap();
        assert_eq!(views.summary.total, 4);
        assert_eq!(views.summary.survival_rate, 50.0);
    }

    #[test]
    fn toggles_recompute_and_reset_restores() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.toggle_sex(Sex::Male);
        assert_eq!(state.visible_indices, vec![0, 3]);
        assert_eq!(state.views.as_ref().unwrap().by_sex.male, 0.0);

        state.toggle_class(PassengerClass::Second);
        assert_eq!(state.visible_indices, vec![0]);

        state.toggle_port(Port::C);
        // Row 3 (no port) would pass but is excluded by class.
        assert!(state.visible_indices.is_empty());
        assert!(state.views.as_ref().unwrap().is_empty());

        state.reset_filters();
        assert_eq!(state.visible_indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn applying_criteria_is_idempotent() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        let mut criteria = state.criteria.clone();
        criteria.age = NumericRange::new(25.0, 35.0);

        state.apply_criteria(criteria.clone());
        let first = state.views.clone();
        state.apply_criteria(criteria);
        assert_eq!(state.views, first);
        assert_eq!(state.visible_indices, vec![0, 2]);
    }

    #[test]
    fn sessions_share_the_dataset_but_not_criteria() {
        let ds = dataset();
        let mut a = AppState::default();
        let mut b = AppState::default();
        a.set_dataset(Arc::clone(&ds));
        b.set_dataset(Arc::clone(&ds));

        a.toggle_sex(Sex::Female);
        assert_eq!(a.visible_indices, vec![1, 2]);
        assert_eq!(b.visible_indices, vec![0, 1, 2, 3]);
        assert_eq!(Arc::strong_count(&ds), 3);
    }
}
