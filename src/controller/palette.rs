//! Fixed chart palette and stable label-to-color assignment.

use std::collections::{HashMap, HashSet};

use crate::error::ChartError;

/// The fixed 20-color palette (Category20c hex values).
///
/// Upper bound on the number of simultaneously plotted series.
pub const PALETTE: [&str; 20] = [
    "#3182bd", "#6baed6", "#9ecae1", "#c6dbef", "#e6550d", "#fd8d3c", "#fdae6b", "#fdd0a2",
    "#31a354", "#74c476", "#a1d99b", "#c7e9c0", "#756bb1", "#9e9ac8", "#bcbddc", "#dadaeb",
    "#636363", "#969696", "#bdbdbd", "#d9d9d9",
];

/// Stable label-to-palette-slot assignment.
///
/// A label keeps its slot across recomputations under the same grouping
/// key. New labels take the lowest unassigned slot; slots held by labels
/// that are no longer displayed are reclaimed only when the palette would
/// otherwise run out. Reset whenever the grouping key changes.
#[derive(Debug, Clone, Default)]
pub struct ColorAssignment {
    assigned: HashMap<String, usize>,
}

impl ColorAssignment {
    /// Drop all assignments (grouping key changed).
    pub fn reset(&mut self) {
        self.assigned.clear();
    }

    /// Assign one color per label, in label order.
    ///
    /// Fails with `PaletteExhausted` when more labels are requested than
    /// the palette has colors. The returned list is always exactly as
    /// long as `labels`.
    pub fn assign(&mut self, labels: &[String]) -> Result<Vec<&'static str>, ChartError> {
        if labels.len() > PALETTE.len() {
            return Err(ChartError::PaletteExhausted {
                needed: labels.len(),
                available: PALETTE.len(),
            });
        }

        let new_count = labels
            .iter()
            .filter(|l| !self.assigned.contains_key(*l))
            .count();
        if new_count > PALETTE.len() - self.assigned.len() {
            // Reclaim slots from labels that are no longer displayed.
            self.assigned.retain(|label, _| labels.contains(label));
        }

        let used: HashSet<usize> = self.assigned.values().copied().collect();
        let mut free = (0..PALETTE.len()).filter(|slot| !used.contains(slot));

        let mut colors = Vec::with_capacity(labels.len());
        for label in labels {
            let slot = match self.assigned.get(label) {
                Some(&slot) => slot,
                None => {
                    let slot = free.next().ok_or(ChartError::PaletteExhausted {
                        needed: labels.len(),
                        available: PALETTE.len(),
                    })?;
                    self.assigned.insert(label.clone(), slot);
                    slot
                }
            };
            colors.push(PALETTE[slot]);
        }

        Ok(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_one_color_per_label() {
        let mut colors = ColorAssignment::default();
        let out = colors.assign(&labels(&["a", "b", "c"])).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], PALETTE[0]);
        assert_eq!(out[1], PALETTE[1]);
        assert_eq!(out[2], PALETTE[2]);
    }

    #[test]
    fn test_labels_keep_colors_across_calls() {
        let mut colors = ColorAssignment::default();
        colors.assign(&labels(&["a", "b", "c"])).unwrap();

        // Deactivate "b", then bring it back: "b" keeps its color and
        // "c" never moves.
        let out = colors.assign(&labels(&["a", "c"])).unwrap();
        assert_eq!(out, vec![PALETTE[0], PALETTE[2]]);

        let out = colors.assign(&labels(&["a", "b", "c"])).unwrap();
        assert_eq!(out, vec![PALETTE[0], PALETTE[1], PALETTE[2]]);
    }

    #[test]
    fn test_exhaustion_at_palette_size() {
        let mut colors = ColorAssignment::default();
        let too_many: Vec<String> = (0..21).map(|i| format!("level{}", i)).collect();

        let err = colors.assign(&too_many).unwrap_err();
        assert_eq!(
            err,
            ChartError::PaletteExhausted {
                needed: 21,
                available: 20
            }
        );

        // Exactly the palette size still succeeds.
        let just_enough: Vec<String> = (0..20).map(|i| format!("level{}", i)).collect();
        assert_eq!(colors.assign(&just_enough).unwrap().len(), 20);
    }

    #[test]
    fn test_stale_slots_reclaimed_when_needed() {
        let mut colors = ColorAssignment::default();
        let first: Vec<String> = (0..20).map(|i| format!("old{}", i)).collect();
        colors.assign(&first).unwrap();

        // All slots are held by stale labels; a fresh set must still fit.
        let second = labels(&["x", "y"]);
        let out = colors.assign(&second).unwrap();
        assert_eq!(out.len(), 2);
        assert_ne!(out[0], out[1]);
    }

    #[test]
    fn test_reset_clears_assignments() {
        let mut colors = ColorAssignment::default();
        colors.assign(&labels(&["a", "b"])).unwrap();
        colors.reset();

        let out = colors.assign(&labels(&["z"])).unwrap();
        assert_eq!(out, vec![PALETTE[0]]);
    }
}
