/// A linear constraint read back from the native instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Lower bound on the row activity, possibly `-inf`.
    pub lower: f64,
    /// Upper bound on the row activity, possibly `inf`.
    pub upper: f64,
    /// `(variable index, coefficient)` pairs in the order the solver stores them.
    pub entries: Vec<(usize, f64)>,
}

impl Row {
    /// Returns the number of non-zero entries in the row.
    pub fn non_zeroes(&self) -> usize {
        self.entries.len()
    }

    /// Returns the coefficient of the variable at `index`, or `None` if it does not appear in the row.
    pub fn coefficient(&self, index: usize) -> Option<f64> {
        self.entries
            .iter()
            .find(|(var, _)| *var == index)
            .map(|(_, coef)| *coef)
    }

    /// Returns the entries sorted by variable index.
    pub fn sorted_entries(&self) -> Vec<(usize, f64)> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|(var, _)| *var);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        let row = Row {
            lower: 2.,
            upper: 8.,
            entries: vec![(3, 1.5), (0, -2.)],
        };
        assert_eq!(row.non_zeroes(), 2);
        assert_eq!(row.coefficient(3), Some(1.5));
        assert_eq!(row.coefficient(1), None);
        assert_eq!(row.sorted_entries(), vec![(0, -2.), (3, 1.5)]);
    }
}
