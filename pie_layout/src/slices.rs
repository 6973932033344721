// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named chart slices in insertion order.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{ColorValue, LayoutError};

/// One named slice of the pie.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    name: String,
    value: f64,
    color: ColorValue,
}

impl Slice {
    /// Slice name; also its legend label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slice value (non-negative).
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Fill color for the wedge and the legend key.
    pub fn color(&self) -> ColorValue {
        self.color
    }
}

/// Sorting order for [`SliceSet::sort_by_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest value first.
    Asc,
    /// Largest value first.
    Desc,
}

/// An ordered set of slices keyed by name.
///
/// Iteration order is insertion order. Updating an existing name keeps its
/// position; only [`SliceSet::sort_by_value`] reorders.
#[derive(Clone, Debug, Default)]
pub struct SliceSet {
    slices: Vec<Slice>,
    index: HashMap<String, usize>,
}

impl SliceSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a slice at the end, or overwrites the value and color of an
    /// existing slice with the same name in place.
    ///
    /// Values must be finite and non-negative. A value of zero is allowed: the
    /// slice keeps its legend key but gets no wedge.
    pub fn add_or_update(
        &mut self,
        name: impl Into<String>,
        value: f64,
        color: ColorValue,
    ) -> Result<(), LayoutError> {
        let name = name.into();
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvalidSliceValue { name, value });
        }
        if let Some(&i) = self.index.get(&name) {
            let slice = &mut self.slices[i];
            slice.value = value;
            slice.color = color;
        } else {
            self.index.insert(name.clone(), self.slices.len());
            self.slices.push(Slice { name, value, color });
        }
        Ok(())
    }

    /// Removes the named slice, returning it. Unknown names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<Slice> {
        let i = self.index.remove(name)?;
        let removed = self.slices.remove(i);
        for pos in self.index.values_mut() {
            if *pos > i {
                *pos -= 1;
            }
        }
        Some(removed)
    }

    /// Looks up a slice by name.
    pub fn get(&self, name: &str) -> Option<&Slice> {
        self.index.get(name).map(|&i| &self.slices[i])
    }

    /// Number of slices, including zero-valued ones.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Returns `true` if there are no slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slices in display order.
    pub fn iter(&self) -> core::slice::Iter<'_, Slice> {
        self.slices.iter()
    }

    /// Sum of all slice values; `0.0` when empty.
    pub fn total_value(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// The angular share of `slice`, in degrees: `360 * value / total`.
    ///
    /// Fails with [`LayoutError::DegenerateChart`] when the total is zero.
    pub fn proportional_span(&self, slice: &Slice) -> Result<f64, LayoutError> {
        let total = self.total_value();
        if total <= 0.0 {
            return Err(LayoutError::DegenerateChart);
        }
        Ok(360.0 * slice.value / total)
    }

    /// Every slice with its angular share, in display order.
    ///
    /// Sums the values once, so prefer this over [`Self::proportional_span`]
    /// when walking the whole set.
    pub fn proportional_spans(
        &self,
    ) -> Result<impl Iterator<Item = (&Slice, f64)> + '_, LayoutError> {
        let total = self.total_value();
        if total <= 0.0 {
            return Err(LayoutError::DegenerateChart);
        }
        Ok(self.slices.iter().map(move |s| (s, 360.0 * s.value / total)))
    }

    /// Reorders the slices by value. Equal values keep their relative order.
    pub fn sort_by_value(&mut self, order: SortOrder) {
        self.slices.sort_by(|a, b| {
            let ord = a.value.total_cmp(&b.value);
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        for (i, slice) in self.slices.iter().enumerate() {
            if let Some(pos) = self.index.get_mut(&slice.name) {
                *pos = i;
            }
        }
    }
}

impl<'a> IntoIterator for &'a SliceSet {
    type Item = &'a Slice;
    type IntoIter = core::slice::Iter<'a, Slice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn names(set: &SliceSet) -> Vec<&str> {
        set.iter().map(Slice::name).collect()
    }

    #[test]
    fn update_keeps_first_insertion_position() {
        let mut set = SliceSet::new();
        set.add_or_update("A", 1.0, ColorValue::BLACK).unwrap();
        set.add_or_update("B", 2.0, ColorValue::BLACK).unwrap();
        set.add_or_update("C", 3.0, ColorValue::BLACK).unwrap();
        set.add_or_update("A", 10.0, ColorValue::WHITE).unwrap();

        assert_eq!(names(&set), vec!["A", "B", "C"]);
        let a = set.get("A").unwrap();
        assert_eq!(a.value(), 10.0);
        assert_eq!(a.color(), ColorValue::WHITE);
        assert_eq!(set.total_value(), 15.0);
    }

    #[test]
    fn remove_reindexes_later_slices() {
        let mut set = SliceSet::new();
        for (name, v) in [("A", 1.0), ("B", 2.0), ("C", 3.0)] {
            set.add_or_update(name, v, ColorValue::BLACK).unwrap();
        }
        assert!(set.remove("missing").is_none());
        assert_eq!(set.remove("A").unwrap().name(), "A");
        assert_eq!(names(&set), vec!["B", "C"]);

        set.add_or_update("C", 5.0, ColorValue::WHITE).unwrap();
        set.add_or_update("A", 1.0, ColorValue::BLACK).unwrap();
        assert_eq!(names(&set), vec!["B", "C", "A"]);
        assert_eq!(set.get("C").unwrap().value(), 5.0);
    }

    #[test]
    fn spans_are_proportional() {
        let mut set = SliceSet::new();
        set.add_or_update("A", 1.0, ColorValue::BLACK).unwrap();
        set.add_or_update("B", 1.0, ColorValue::BLACK).unwrap();
        set.add_or_update("C", 2.0, ColorValue::BLACK).unwrap();

        let spans: Vec<f64> = set
            .iter()
            .map(|s| set.proportional_span(s).unwrap())
            .collect();
        assert_eq!(spans, vec![90.0, 90.0, 180.0]);

        let walked: Vec<(&str, f64)> = set
            .proportional_spans()
            .unwrap()
            .map(|(s, span)| (s.name(), span))
            .collect();
        assert_eq!(walked, vec![("A", 90.0), ("B", 90.0), ("C", 180.0)]);
    }

    #[test]
    fn zero_total_is_degenerate() {
        let mut set = SliceSet::new();
        assert_eq!(set.total_value(), 0.0);
        set.add_or_update("A", 0.0, ColorValue::BLACK).unwrap();
        let a = set.get("A").unwrap();
        assert_eq!(set.proportional_span(a), Err(LayoutError::DegenerateChart));
        assert!(matches!(
            set.proportional_spans(),
            Err(LayoutError::DegenerateChart)
        ));
    }

    #[test]
    fn rejects_negative_and_non_finite_values() {
        let mut set = SliceSet::new();
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = set.add_or_update("A", bad, ColorValue::BLACK).unwrap_err();
            assert!(matches!(err, LayoutError::InvalidSliceValue { .. }));
        }
        assert!(set.is_empty());
    }

    #[test]
    fn sort_is_opt_in_and_stable() {
        let mut set = SliceSet::new();
        for (name, v) in [("A", 2.0), ("B", 5.0), ("C", 2.0), ("D", 1.0)] {
            set.add_or_update(name, v, ColorValue::BLACK).unwrap();
        }
        assert_eq!(names(&set), vec!["A", "B", "C", "D"]);

        set.sort_by_value(SortOrder::Desc);
        assert_eq!(names(&set), vec!["B", "A", "C", "D"]);

        set.sort_by_value(SortOrder::Asc);
        assert_eq!(names(&set), vec!["D", "A", "C", "B"]);

        set.remove("A");
        assert_eq!(set.get("B").unwrap().value(), 5.0);
        assert_eq!(names(&set), vec!["D", "C", "B"]);
    }
}
