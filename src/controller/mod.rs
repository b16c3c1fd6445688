//! Selection-and-reshape controller.
//!
//! Owns the one piece of mutable view state: the current `SeriesSet`,
//! the selectable level list, and the label-to-color assignment. Every
//! control change goes through [`Controller::on_control_changed`], which
//! rebuilds the series wholesale and commits only on success. A failed
//! recomputation leaves the previous, still-valid view in place.

pub mod palette;

use std::collections::BTreeSet;

use tracing::debug;

use crate::aggregate::aggregate;
use crate::error::ChartError;
use crate::models::{AggregatedRow, GroupKey, Record, Series, SeriesSet};
use palette::ColorAssignment;

/// Legend label for the single series shown when no grouping is active.
pub const UNGROUPED_LABEL: &str = "suicide_rate";

/// A control change coming in from the UI layer.
///
/// Year bounds and grouping keys arrive as the raw widget strings;
/// validation happens here, not in the widgets.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    /// The grouping selector changed ("country", "sex", "age", "none").
    GroupKeyChanged(String),
    /// The start/end year selectors changed.
    YearBoundsChanged { start: String, end: String },
    /// The set of checked level boxes changed (indices into the level list).
    ActiveLevelsChanged(Vec<usize>),
}

/// Filter and reshape aggregated rows into plot-ready series.
///
/// Rows are restricted to `[year_start, year_end]` inclusive. Ungrouped
/// data produces exactly one series labeled "suicide_rate"; grouped data
/// produces one series per active level that has at least one point in
/// the window. Points are sorted by year within each series.
pub fn recompute(
    rows: &[AggregatedRow],
    key: GroupKey,
    year_start: i32,
    year_end: i32,
    active_levels: &[String],
    colors: &mut ColorAssignment,
) -> Result<SeriesSet, ChartError> {
    if year_start > year_end {
        return Err(ChartError::InvalidRange(format!(
            "start year {} is after end year {}",
            year_start, year_end
        )));
    }

    let in_range = |r: &AggregatedRow| r.year >= year_start && r.year <= year_end;

    let (title, series) = if key == GroupKey::None {
        let mut points: Vec<(i32, f64)> = rows
            .iter()
            .filter(|r| in_range(r))
            .map(|r| (r.year, r.rate))
            .collect();
        points.sort_by_key(|&(year, _)| year);

        let title = format!(
            "International Suicide Rates Between {} and {}",
            year_start, year_end
        );
        (title, vec![make_series(UNGROUPED_LABEL.to_string(), points)])
    } else {
        let mut series = Vec::new();
        for label in active_levels {
            let mut points: Vec<(i32, f64)> = rows
                .iter()
                .filter(|r| in_range(r) && r.key.as_deref() == Some(label.as_str()))
                .map(|r| (r.year, r.rate))
                .collect();
            points.sort_by_key(|&(year, _)| year);

            // Levels with no rows in the window drop out of the legend.
            if points.is_empty() {
                continue;
            }
            series.push(make_series(label.clone(), points));
        }

        let title = format!(
            "International Suicide Rates Grouped By {} ({} - {})",
            key, year_start, year_end
        );
        (title, series)
    };

    let labels: Vec<String> = series.iter().map(|s| s.label.clone()).collect();
    let colors = colors
        .assign(&labels)?
        .into_iter()
        .map(String::from)
        .collect();

    Ok(SeriesSet {
        title,
        series,
        colors,
    })
}

fn make_series(label: String, points: Vec<(i32, f64)>) -> Series {
    let (years, rates) = points.into_iter().unzip();
    Series {
        label,
        years,
        rates,
    }
}

/// The sorted distinct level values present in the grouped rows,
/// regardless of any year filter. Repopulates the selectable level list.
pub fn levels_of(rows: &[AggregatedRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.key.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Owns the current selection and view state for the line chart.
///
/// Single-threaded and callback-driven: each event runs to completion
/// and atomically replaces the prior `SeriesSet` before the next event
/// is processed.
pub struct Controller {
    records: Vec<Record>,
    rows: Vec<AggregatedRow>,
    group_key: GroupKey,
    year_start: i32,
    year_end: i32,
    levels: Vec<String>,
    active: Vec<usize>,
    colors: ColorAssignment,
    current: SeriesSet,
}

impl Controller {
    /// Build a controller with an initial selection and compute the
    /// first `SeriesSet`.
    ///
    /// With grouping active, only the first level starts checked,
    /// matching the reset that a grouping-key change performs.
    pub fn new(
        records: Vec<Record>,
        group_key: GroupKey,
        year_start: i32,
        year_end: i32,
    ) -> Result<Self, ChartError> {
        if year_start > year_end {
            return Err(ChartError::InvalidRange(format!(
                "start year {} is after end year {}",
                year_start, year_end
            )));
        }

        let rows = aggregate(&records, group_key);
        let levels = levels_of(&rows);
        let active = default_active(group_key, &levels);
        let mut colors = ColorAssignment::default();

        let labels = active_labels(&levels, &active);
        let current = recompute(&rows, group_key, year_start, year_end, &labels, &mut colors)?;

        Ok(Self {
            records,
            rows,
            group_key,
            year_start,
            year_end,
            levels,
            active,
            colors,
            current,
        })
    }

    /// The current series set.
    pub fn series_set(&self) -> &SeriesSet {
        &self.current
    }

    /// The full selectable level list for the current grouping key.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Indices of the currently checked levels.
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// The current grouping key.
    pub fn group_key(&self) -> GroupKey {
        self.group_key
    }

    /// The current inclusive year bounds.
    pub fn year_bounds(&self) -> (i32, i32) {
        (self.year_start, self.year_end)
    }

    /// Single entry point for all control changes.
    ///
    /// Dispatches by event kind, recomputes, and commits the new state
    /// only on success; any failure leaves every piece of controller
    /// state untouched.
    pub fn on_control_changed(&mut self, event: ControlEvent) -> Result<&SeriesSet, ChartError> {
        debug!("control changed: {:?}", event);

        match event {
            ControlEvent::GroupKeyChanged(value) => {
                let key: GroupKey = value.parse()?;
                let rows = aggregate(&self.records, key);
                let levels = levels_of(&rows);
                // Stale checkbox indices must not survive a key change.
                let active = default_active(key, &levels);
                let mut colors = ColorAssignment::default();

                let labels = active_labels(&levels, &active);
                let set = recompute(&rows, key, self.year_start, self.year_end, &labels, &mut colors)?;

                self.group_key = key;
                self.rows = rows;
                self.levels = levels;
                self.active = active;
                self.colors = colors;
                self.current = set;
            }
            ControlEvent::YearBoundsChanged { start, end } => {
                let start_year: i32 = start
                    .trim()
                    .parse()
                    .map_err(|_| ChartError::InvalidRange(format!("not a year: {:?}", start)))?;
                let end_year: i32 = end
                    .trim()
                    .parse()
                    .map_err(|_| ChartError::InvalidRange(format!("not a year: {:?}", end)))?;
                if start_year > end_year {
                    return Err(ChartError::InvalidRange(format!(
                        "start year {} is after end year {}",
                        start_year, end_year
                    )));
                }

                let labels = active_labels(&self.levels, &self.active);
                let mut colors = self.colors.clone();
                let set = recompute(
                    &self.rows,
                    self.group_key,
                    start_year,
                    end_year,
                    &labels,
                    &mut colors,
                )?;

                self.year_start = start_year;
                self.year_end = end_year;
                self.colors = colors;
                self.current = set;
            }
            ControlEvent::ActiveLevelsChanged(indices) => {
                let mut active: Vec<usize> = indices
                    .into_iter()
                    .filter(|&i| i < self.levels.len())
                    .collect();
                active.sort_unstable();
                active.dedup();

                let labels = active_labels(&self.levels, &active);
                let mut colors = self.colors.clone();
                let set = recompute(
                    &self.rows,
                    self.group_key,
                    self.year_start,
                    self.year_end,
                    &labels,
                    &mut colors,
                )?;

                self.active = active;
                self.colors = colors;
                self.current = set;
            }
        }

        Ok(&self.current)
    }
}

fn default_active(key: GroupKey, levels: &[String]) -> Vec<usize> {
    if key == GroupKey::None || levels.is_empty() {
        Vec::new()
    } else {
        vec![0]
    }
}

fn active_labels(levels: &[String], active: &[usize]) -> Vec<String> {
    active
        .iter()
        .filter_map(|&i| levels.get(i).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(country: &str, year: i32, sex: &str, count: f64, pop: f64) -> Record {
        Record {
            country: country.to_string(),
            year,
            sex: sex.to_string(),
            age: "25-34 years".to_string(),
            suicides_no: count,
            population: pop,
        }
    }

    fn sample_records() -> Vec<Record> {
        vec![
            make_record("A", 2000, "male", 10.0, 100_000.0),
            make_record("A", 2001, "male", 20.0, 100_000.0),
            make_record("B", 2000, "female", 5.0, 50_000.0),
            make_record("B", 2001, "female", 10.0, 50_000.0),
        ]
    }

    #[test]
    fn test_ungrouped_single_series() {
        let ctl = Controller::new(sample_records(), GroupKey::None, 2000, 2001).unwrap();
        let set = ctl.series_set();

        assert_eq!(set.series.len(), 1);
        assert_eq!(set.series[0].label, UNGROUPED_LABEL);
        assert_eq!(set.series[0].years, vec![2000, 2001]);
        assert_eq!(set.colors.len(), 1);
        assert_eq!(
            set.title,
            "International Suicide Rates Between 2000 and 2001"
        );
        // Ungrouped data has no selectable levels.
        assert!(ctl.levels().is_empty());
    }

    #[test]
    fn test_grouped_defaults_to_first_level() {
        let ctl = Controller::new(sample_records(), GroupKey::Country, 2000, 2001).unwrap();

        assert_eq!(ctl.levels(), &["A".to_string(), "B".to_string()]);
        assert_eq!(ctl.active(), &[0]);
        assert_eq!(ctl.series_set().series.len(), 1);
        assert_eq!(ctl.series_set().series[0].label, "A");
        assert_eq!(
            ctl.series_set().title,
            "International Suicide Rates Grouped By country (2000 - 2001)"
        );
    }

    #[test]
    fn test_spec_example_two_countries() {
        let records = vec![
            make_record("A", 2000, "male", 10.0, 100_000.0),
            make_record("B", 2000, "female", 5.0, 50_000.0),
        ];
        let mut ctl = Controller::new(records, GroupKey::Country, 2000, 2000).unwrap();
        let set = ctl
            .on_control_changed(ControlEvent::ActiveLevelsChanged(vec![0, 1]))
            .unwrap();

        assert_eq!(set.series.len(), 2);
        assert_eq!(set.series[0].label, "A");
        assert_eq!(set.series[0].years, vec![2000]);
        assert_eq!(set.series[0].rates, vec![1.0]);
        assert_eq!(set.series[1].label, "B");
        assert_eq!(set.series[1].rates, vec![1.0]);
    }

    #[test]
    fn test_color_count_matches_series_count() {
        let mut ctl = Controller::new(sample_records(), GroupKey::Country, 2000, 2001).unwrap();
        let set = ctl
            .on_control_changed(ControlEvent::ActiveLevelsChanged(vec![0, 1]))
            .unwrap();
        assert_eq!(set.colors.len(), set.series.len());

        let set = ctl
            .on_control_changed(ControlEvent::ActiveLevelsChanged(vec![1]))
            .unwrap();
        assert_eq!(set.colors.len(), set.series.len());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let rows = aggregate(&sample_records(), GroupKey::Country);
        let labels = vec!["A".to_string(), "B".to_string()];

        let mut colors = ColorAssignment::default();
        let first = recompute(&rows, GroupKey::Country, 2000, 2001, &labels, &mut colors).unwrap();
        let second = recompute(&rows, GroupKey::Country, 2000, 2001, &labels, &mut colors).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_single_year_window() {
        let rows = aggregate(&sample_records(), GroupKey::Country);
        let labels = vec!["A".to_string(), "B".to_string()];
        let mut colors = ColorAssignment::default();

        let set = recompute(&rows, GroupKey::Country, 2000, 2000, &labels, &mut colors).unwrap();
        for series in &set.series {
            assert!(series.years.len() <= 1);
        }
    }

    #[test]
    fn test_group_key_change_resets_levels_and_selection() {
        let mut ctl = Controller::new(sample_records(), GroupKey::Country, 2000, 2001).unwrap();
        ctl.on_control_changed(ControlEvent::ActiveLevelsChanged(vec![0, 1]))
            .unwrap();

        ctl.on_control_changed(ControlEvent::GroupKeyChanged("sex".to_string()))
            .unwrap();

        assert_eq!(ctl.levels(), &["female".to_string(), "male".to_string()]);
        assert_eq!(ctl.active(), &[0]);
        assert_eq!(ctl.series_set().series.len(), 1);
        assert_eq!(ctl.series_set().series[0].label, "female");
    }

    #[test]
    fn test_invalid_group_key_leaves_state_untouched() {
        let mut ctl = Controller::new(sample_records(), GroupKey::Country, 2000, 2001).unwrap();
        let before = ctl.series_set().clone();

        let err = ctl
            .on_control_changed(ControlEvent::GroupKeyChanged("region".to_string()))
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidGroupKey(_)));

        assert_eq!(ctl.series_set(), &before);
        assert_eq!(ctl.group_key(), GroupKey::Country);
    }

    #[test]
    fn test_invalid_year_bounds() {
        let mut ctl = Controller::new(sample_records(), GroupKey::None, 2000, 2001).unwrap();

        let err = ctl
            .on_control_changed(ControlEvent::YearBoundsChanged {
                start: "abc".to_string(),
                end: "2001".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidRange(_)));

        let err = ctl
            .on_control_changed(ControlEvent::YearBoundsChanged {
                start: "2010".to_string(),
                end: "2001".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidRange(_)));

        assert_eq!(ctl.year_bounds(), (2000, 2001));
    }

    #[test]
    fn test_palette_exhaustion_keeps_previous_view() {
        let records: Vec<Record> = (0..25)
            .map(|i| make_record(&format!("country{:02}", i), 2000, "male", 1.0, 10_000.0))
            .collect();

        let mut ctl = Controller::new(records, GroupKey::Country, 2000, 2000).unwrap();
        let before = ctl.series_set().clone();
        let all_indices: Vec<usize> = (0..25).collect();

        let err = ctl
            .on_control_changed(ControlEvent::ActiveLevelsChanged(all_indices))
            .unwrap_err();
        assert!(matches!(err, ChartError::PaletteExhausted { .. }));

        // Fail-safe: the stale-but-valid view survives.
        assert_eq!(ctl.series_set(), &before);
        assert_eq!(ctl.active(), &[0]);
    }

    #[test]
    fn test_colors_stable_across_reactivation() {
        let mut ctl = Controller::new(sample_records(), GroupKey::Country, 2000, 2001).unwrap();

        let set = ctl
            .on_control_changed(ControlEvent::ActiveLevelsChanged(vec![0, 1]))
            .unwrap();
        let color_b = set.colors[1].clone();

        ctl.on_control_changed(ControlEvent::ActiveLevelsChanged(vec![0]))
            .unwrap();
        let set = ctl
            .on_control_changed(ControlEvent::ActiveLevelsChanged(vec![0, 1]))
            .unwrap();

        assert_eq!(set.colors[1], color_b);
    }

    #[test]
    fn test_year_window_filters_points() {
        let mut ctl = Controller::new(sample_records(), GroupKey::None, 2000, 2001).unwrap();
        let set = ctl
            .on_control_changed(ControlEvent::YearBoundsChanged {
                start: "2001".to_string(),
                end: "2001".to_string(),
            })
            .unwrap();

        assert_eq!(set.series[0].years, vec![2001]);
        // 30 suicides over 150,000 people.
        assert_eq!(set.series[0].rates, vec![2.0]);
    }

    #[test]
    fn test_out_of_range_level_indices_ignored() {
        let mut ctl = Controller::new(sample_records(), GroupKey::Country, 2000, 2001).unwrap();
        let set = ctl
            .on_control_changed(ControlEvent::ActiveLevelsChanged(vec![1, 99]))
            .unwrap();

        assert_eq!(set.series.len(), 1);
        assert_eq!(set.series[0].label, "B");
    }
}
