use std::fmt;

/// A snapshot of the primal solution and objective value of a solved model.
#[derive(Clone, PartialEq)]
pub struct Solution {
    pub(crate) values: Vec<f64>,
    pub(crate) obj_val: f64,
}

impl Solution {
    /// Returns the objective value of the solution.
    pub fn objective_value(&self) -> f64 {
        self.obj_val
    }

    /// Returns the value of every variable, in variable-index order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the value of the variable at `index`.
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Returns the number of variables in the solution.
    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no solution values were available.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Solution with obj val: {}", self.obj_val)?;
        for (i, val) in self.values.iter().enumerate() {
            if *val != 0.0 {
                writeln!(f, "Var x{i}={val}")?;
            }
        }
        Ok(())
    }
}
