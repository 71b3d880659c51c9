use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::highs::{HighsPtr, to_highs_int};
use crate::{Column, Config, HighsStatus, ModelStatus, Row, Solution, VarType, ffi, marshal};

/// Represents an optimization model held by one native HiGHS instance.
///
/// Every method checks its input before calling into HiGHS, so a rejected
/// call leaves the native model untouched. Calls the native solver itself
/// rejects come back as [`HighsStatus::Error`].
#[non_exhaustive]
#[derive(Debug)]
pub struct Model {
    highs: HighsPtr,
}

/// An enum representing the objective sense of an optimization model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjSense {
    /// The problem is a minimization problem.
    Minimize,
    /// The problem is a maximization problem.
    Maximize,
}

impl Model {
    /// Creates an empty model with the default [`Config`].
    pub fn new() -> Result<Self> {
        Self::with_config(&Config::default())
    }

    /// Creates an empty model and applies `config` to its native instance.
    pub fn with_config(config: &Config) -> Result<Self> {
        let mut highs = HighsPtr::new()?;
        highs.apply_config(config)?;
        tracing::debug!(
            component = "bridge",
            operation = "create",
            ?config,
            "Created HiGHS instance"
        );
        Ok(Model { highs })
    }

    /// Replaces the model with the one stored in the file at `path`.
    ///
    /// The format follows the file extension (`.lp`, `.mps`, ...). A file the
    /// solver cannot open or parse is reported as [`Error::Io`].
    pub fn read_model(&mut self, path: &str) -> Result<HighsStatus> {
        let c_path = marshal::path_to_cstring(path, "read_model")?;
        let status = self.highs.read_model(&c_path)?;
        io_result(status, "read_model", path)
    }

    /// Writes the model to the file at `path`, in the format given by its extension.
    pub fn write_model(&mut self, path: &str) -> Result<HighsStatus> {
        let c_path = marshal::path_to_cstring(path, "write_model")?;
        let status = self.highs.write_model(&c_path)?;
        io_result(status, "write_model", path)
    }

    /// Writes the current solution to the file at `path`.
    pub fn write_solution(&mut self, path: &str) -> Result<HighsStatus> {
        let c_path = marshal::path_to_cstring(path, "write_solution")?;
        let status = self.highs.write_solution(&c_path)?;
        io_result(status, "write_solution", path)
    }

    /// Removes every variable and constraint, and the objective.
    pub fn clear_model(&mut self) -> Result<HighsStatus> {
        let status = self.highs.clear_model()?;
        Ok(forwarded("clear_model", status))
    }

    /// Discards the solver state and the solution, keeping the model.
    pub fn clear_solver(&mut self) -> Result<HighsStatus> {
        let status = self.highs.clear_solver()?;
        Ok(forwarded("clear_solver", status))
    }

    /// Solves the model, blocking until the solver returns.
    ///
    /// The returned status only tells whether the solver ran; query
    /// [`Model::model_status`] for the outcome.
    pub fn run(&mut self) -> Result<HighsStatus> {
        tracing::debug!(
            component = "bridge",
            operation = "run",
            variables = self.highs.n_cols(),
            constraints = self.highs.n_rows(),
            "Running HiGHS"
        );
        let status = self.highs.run()?;
        tracing::debug!(
            component = "bridge",
            operation = "run",
            %status,
            model_status = %self.highs.model_status(),
            "HiGHS returned"
        );
        Ok(status)
    }

    /// Appends a variable with bounds `[lower, upper]` and zero cost.
    ///
    /// The new variable's index is the previous variable count.
    pub fn add_variable(&mut self, lower: f64, upper: f64) -> Result<HighsStatus> {
        check_bounds("add_variable", lower, upper)?;
        let status = self.highs.add_var(lower, upper)?;
        Ok(forwarded("add_variable", status))
    }

    /// Appends a variable with bounds `[lower, upper]` and objective coefficient `cost`.
    pub fn add_variable_with_cost(
        &mut self,
        cost: f64,
        lower: f64,
        upper: f64,
    ) -> Result<HighsStatus> {
        check_bounds("add_variable_with_cost", lower, upper)?;
        check_finite("add_variable_with_cost", "cost", cost)?;
        let status = self.highs.add_col(cost, lower, upper)?;
        Ok(forwarded("add_variable_with_cost", status))
    }

    /// Appends one variable per pair of `lowers` and `uppers`.
    pub fn add_variables(&mut self, lowers: &[f64], uppers: &[f64]) -> Result<HighsStatus> {
        const CONTEXT: &str = "add_variables";
        check_lengths(CONTEXT, "lower bounds", lowers.len(), "upper bounds", uppers.len())?;
        for (&lower, &upper) in lowers.iter().zip(uppers) {
            check_bounds(CONTEXT, lower, upper)?;
        }
        let status = self.highs.add_vars(lowers, uppers)?;
        Ok(forwarded(CONTEXT, status))
    }

    /// Deletes the variable at `index`. Variables after it shift down by one.
    pub fn delete_variable(&mut self, index: usize) -> Result<HighsStatus> {
        let col = self.col_index("delete_variable", index)?;
        let status = self.highs.delete_col(col)?;
        Ok(forwarded("delete_variable", status))
    }

    /// Sets the bounds of the variable at `index`.
    pub fn change_variable_bounds(
        &mut self,
        index: usize,
        lower: f64,
        upper: f64,
    ) -> Result<HighsStatus> {
        const CONTEXT: &str = "change_variable_bounds";
        let col = self.col_index(CONTEXT, index)?;
        check_bounds(CONTEXT, lower, upper)?;
        let status = self.highs.change_col_bounds(col, lower, upper)?;
        Ok(forwarded(CONTEXT, status))
    }

    /// Sets the integrality class of the variable at `index`.
    pub fn change_variable_integrality(
        &mut self,
        index: usize,
        var_type: VarType,
    ) -> Result<HighsStatus> {
        let col = self.col_index("change_variable_integrality", index)?;
        let status = self.highs.change_col_integrality(col, var_type)?;
        Ok(forwarded("change_variable_integrality", status))
    }

    /// Appends the constraint `lower <= sum(coefficients[k] * x[indices[k]]) <= upper`.
    ///
    /// `indices` need not be sorted but must be unique and refer to existing variables.
    pub fn add_constraint(
        &mut self,
        coefficients: &[f64],
        indices: &[usize],
        lower: f64,
        upper: f64,
    ) -> Result<HighsStatus> {
        const CONTEXT: &str = "add_constraint";
        check_lengths(CONTEXT, "coefficients", coefficients.len(), "indices", indices.len())?;
        check_bounds(CONTEXT, lower, upper)?;
        let cols = self.col_indices(CONTEXT, indices)?;
        let mut seen = HashSet::with_capacity(indices.len());
        if let Some(duplicate) = indices.iter().find(|&&i| !seen.insert(i)) {
            return Err(Error::invalid_argument(
                CONTEXT,
                format!("variable index {duplicate} appears more than once"),
            ));
        }
        for &value in coefficients {
            check_finite(CONTEXT, "coefficient", value)?;
        }
        let status = self.highs.add_row(lower, upper, &cols, coefficients)?;
        Ok(forwarded(CONTEXT, status))
    }

    /// Deletes the constraint at `index`. Constraints after it shift down by one.
    pub fn delete_constraint(&mut self, index: usize) -> Result<HighsStatus> {
        let row = self.row_index("delete_constraint", index)?;
        let status = self.highs.delete_row(row)?;
        Ok(forwarded("delete_constraint", status))
    }

    /// Sets the bounds of the constraint at `index`.
    pub fn change_constraint_bounds(
        &mut self,
        index: usize,
        lower: f64,
        upper: f64,
    ) -> Result<HighsStatus> {
        const CONTEXT: &str = "change_constraint_bounds";
        let row = self.row_index(CONTEXT, index)?;
        check_bounds(CONTEXT, lower, upper)?;
        let status = self.highs.change_row_bounds(row, lower, upper)?;
        Ok(forwarded(CONTEXT, status))
    }

    /// Sets the objective sense and offset, then the cost of each listed variable.
    ///
    /// Variables not listed keep their cost. The whole request is checked
    /// before anything is changed. If HiGHS rejects one of the steps, the
    /// previous sense, offset and costs are put back and the failing step is
    /// reported as [`Error::NativeFailure`].
    pub fn set_objective(
        &mut self,
        coefficients: &[f64],
        indices: &[usize],
        sense: ObjSense,
        offset: f64,
    ) -> Result<HighsStatus> {
        const CONTEXT: &str = "set_objective";
        check_lengths(CONTEXT, "coefficients", coefficients.len(), "indices", indices.len())?;
        check_finite(CONTEXT, "offset", offset)?;
        for &value in coefficients {
            check_finite(CONTEXT, "coefficient", value)?;
        }
        let cols = self.col_indices(CONTEXT, indices)?;

        let previous = ObjectiveSnapshot::take(&self.highs, &cols)?;
        match self.apply_objective(&cols, coefficients, sense, offset) {
            Ok(status) => Ok(forwarded(CONTEXT, status)),
            Err(err) => {
                tracing::warn!(
                    component = "bridge",
                    operation = CONTEXT,
                    error = %err,
                    "Restoring previous objective"
                );
                previous.restore(&mut self.highs);
                Err(err)
            }
        }
    }

    fn apply_objective(
        &mut self,
        cols: &[ffi::HighsInt],
        coefficients: &[f64],
        sense: ObjSense,
        offset: f64,
    ) -> Result<HighsStatus> {
        let mut status = require(
            self.highs.change_obj_sense(sense)?,
            "Highs_changeObjectiveSense",
        )?;
        status = merge(
            status,
            require(
                self.highs.change_obj_offset(offset)?,
                "Highs_changeObjectiveOffset",
            )?,
        );
        for (&col, &cost) in cols.iter().zip(coefficients) {
            status = merge(
                status,
                require(self.highs.change_col_cost(col, cost)?, "Highs_changeColCost")?,
            );
        }
        Ok(status)
    }

    /// Returns the outcome of the most recent run.
    pub fn model_status(&self) -> ModelStatus {
        self.highs.model_status()
    }

    /// Returns one value per variable, in index order.
    ///
    /// The result is empty when no solution has been computed. It is only
    /// an error ([`Error::ResourceExhaustion`]) if the result cannot be allocated.
    pub fn solution_values(&self) -> Result<Vec<f64>> {
        if !self.highs.has_primal_solution() {
            return Ok(Vec::new());
        }
        match self.highs.col_values() {
            Ok(values) => Ok(values),
            Err(err @ Error::ResourceExhaustion(_)) => Err(err),
            Err(err) => {
                tracing::warn!(
                    component = "bridge",
                    operation = "solution_values",
                    error = %err,
                    "Solution unavailable, returning no values"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Returns the objective value of the most recent run.
    ///
    /// Without a solution the value is whatever HiGHS reports, usually zero.
    pub fn objective_value(&self) -> f64 {
        self.highs.obj_val()
    }

    /// Returns a snapshot of the current solution.
    pub fn solution(&self) -> Result<Solution> {
        Ok(Solution {
            values: self.solution_values()?,
            obj_val: self.objective_value(),
        })
    }

    /// Returns the number of variables.
    pub fn num_variables(&self) -> usize {
        self.highs.n_cols()
    }

    /// Returns the number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.highs.n_rows()
    }

    /// Returns the bounds and cost of the variable at `index`.
    pub fn variable(&self, index: usize) -> Result<Column> {
        let col = self.col_index("variable", index)?;
        self.highs.col(col)
    }

    /// Returns the bounds and coefficients of the constraint at `index`.
    pub fn constraint(&self, index: usize) -> Result<Row> {
        let row = self.row_index("constraint", index)?;
        self.highs.row(row)
    }

    /// Returns the objective sense.
    pub fn objective_sense(&self) -> Result<ObjSense> {
        self.highs.obj_sense()
    }

    /// Returns the constant term of the objective.
    pub fn objective_offset(&self) -> Result<f64> {
        self.highs.obj_offset()
    }

    fn col_index(&self, context: &'static str, index: usize) -> Result<ffi::HighsInt> {
        check_index(context, "variable", index, self.highs.n_cols())
    }

    fn col_indices(&self, context: &'static str, indices: &[usize]) -> Result<Vec<ffi::HighsInt>> {
        let n_cols = self.highs.n_cols();
        indices
            .iter()
            .map(|&index| check_index(context, "variable", index, n_cols))
            .collect()
    }

    fn row_index(&self, context: &'static str, index: usize) -> Result<ffi::HighsInt> {
        check_index(context, "constraint", index, self.highs.n_rows())
    }
}

/// Objective state touched by [`Model::set_objective`], restored when HiGHS
/// rejects one of its steps.
struct ObjectiveSnapshot {
    sense: ObjSense,
    offset: f64,
    costs: Vec<(ffi::HighsInt, f64)>,
}

impl ObjectiveSnapshot {
    fn take(highs: &HighsPtr, cols: &[ffi::HighsInt]) -> Result<Self> {
        let costs = cols
            .iter()
            .map(|&col| highs.col(col).map(|column| (col, column.cost)))
            .collect::<Result<Vec<_>>>()?;
        Ok(ObjectiveSnapshot {
            sense: highs.obj_sense()?,
            offset: highs.obj_offset()?,
            costs,
        })
    }

    fn restore(self, highs: &mut HighsPtr) {
        // reverse order, so the first snapshot of a repeated index wins
        let mut restored = true;
        for &(col, cost) in self.costs.iter().rev() {
            restored &= is_applied(highs.change_col_cost(col, cost));
        }
        restored &= is_applied(highs.change_obj_offset(self.offset));
        restored &= is_applied(highs.change_obj_sense(self.sense));
        if !restored {
            tracing::error!(
                component = "bridge",
                operation = "set_objective",
                "Previous objective could not be fully restored"
            );
        }
    }
}

fn is_applied(result: Result<HighsStatus>) -> bool {
    matches!(result, Ok(status) if status.is_success())
}

fn forwarded(operation: &'static str, status: HighsStatus) -> HighsStatus {
    tracing::trace!(component = "bridge", operation, %status, "Forwarded to HiGHS");
    status
}

fn io_result(status: HighsStatus, operation: &'static str, path: &str) -> Result<HighsStatus> {
    if status == HighsStatus::Error {
        return Err(Error::Io {
            operation,
            path: path.to_owned(),
        });
    }
    Ok(forwarded(operation, status))
}

fn require(status: HighsStatus, operation: &'static str) -> Result<HighsStatus> {
    if status == HighsStatus::Error {
        return Err(Error::native(operation, "returned an error status"));
    }
    Ok(status)
}

fn merge(a: HighsStatus, b: HighsStatus) -> HighsStatus {
    if a == HighsStatus::Warning || b == HighsStatus::Warning {
        HighsStatus::Warning
    } else {
        a
    }
}

fn check_bounds(context: &'static str, lower: f64, upper: f64) -> Result<()> {
    if lower.is_nan() || upper.is_nan() {
        return Err(Error::invalid_argument(context, "bounds must not be NaN"));
    }
    if lower > upper {
        return Err(Error::invalid_argument(
            context,
            format!("lower bound {lower} exceeds upper bound {upper}"),
        ));
    }
    Ok(())
}

fn check_finite(context: &'static str, what: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid_argument(
            context,
            format!("{what} must be finite, got {value}"),
        ));
    }
    Ok(())
}

fn check_lengths(
    context: &'static str,
    first: &str,
    first_len: usize,
    second: &str,
    second_len: usize,
) -> Result<()> {
    if first_len != second_len {
        return Err(Error::invalid_argument(
            context,
            format!("{first_len} {first} but {second_len} {second}"),
        ));
    }
    Ok(())
}

fn check_index(
    context: &'static str,
    what: &str,
    index: usize,
    count: usize,
) -> Result<ffi::HighsInt> {
    if index >= count {
        return Err(Error::invalid_argument(
            context,
            format!("{what} index {index} is out of range, the model has {count}"),
        ));
    }
    to_highs_int(index, context)
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rayon::prelude::*;
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::Presolve;

    fn two_variable_model() -> Model {
        let mut model = Model::new().unwrap();
        model.add_variables(&[0., 0.], &[10., 10.]).unwrap();
        model.add_constraint(&[1., 1.], &[0, 1], 2., 8.).unwrap();
        model
            .set_objective(&[1., 1.], &[0, 1], ObjSense::Minimize, 0.)
            .unwrap();
        model
    }

    fn assert_invalid_argument<T: std::fmt::Debug>(result: Result<T>) {
        assert!(
            matches!(result, Err(Error::InvalidArgument { .. })),
            "expected InvalidArgument, got {result:?}"
        );
    }

    #[test]
    fn two_variable_scenario() {
        let mut model = two_variable_model();
        assert_eq!(model.run().unwrap(), HighsStatus::Ok);
        assert_eq!(model.model_status(), ModelStatus::Optimal);

        let obj_val = model.objective_value();
        assert!((2.0..=8.0).contains(&obj_val));
        assert!((obj_val - 2.).abs() < 1e-6);

        let values = model.solution_values().unwrap();
        assert_eq!(values.len(), model.num_variables());
        assert!((values[0] + values[1] - 2.).abs() < 1e-6);
    }

    #[test]
    fn solution_read_from_lp_file() {
        let mut model = Model::new().unwrap();
        model.read_model("data/test/two_var.lp").unwrap();
        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.num_constraints(), 2);

        model.run().unwrap();
        assert_eq!(model.model_status(), ModelStatus::Optimal);
        assert!((model.objective_value() - 2.).abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut model = Model::new().unwrap();
        let err = model.read_model("data/test/does_not_exist.lp").unwrap_err();
        assert_eq!(
            err,
            Error::Io {
                operation: "read_model",
                path: "data/test/does_not_exist.lp".into()
            }
        );
    }

    #[test]
    fn empty_path_is_rejected() {
        let mut model = Model::new().unwrap();
        assert_invalid_argument(model.read_model(""));
        assert_invalid_argument(model.write_model(""));
        assert_invalid_argument(model.write_solution("a\0b"));
    }

    #[test]
    fn inverted_bounds_leave_model_unchanged() {
        let mut model = Model::new().unwrap();
        assert_invalid_argument(model.add_variable(5., 1.));
        assert_eq!(model.num_variables(), 0);

        model.add_variable(0., 1.).unwrap();
        assert_invalid_argument(model.change_variable_bounds(0, 3., 2.));
        assert_invalid_argument(model.change_variable_bounds(0, f64::NAN, 2.));
        let column = model.variable(0).unwrap();
        assert_eq!((column.lower, column.upper), (0., 1.));
        assert_eq!(model.num_variables(), 1);
    }

    #[test]
    fn random_bounds() {
        let mut rng = rand::thread_rng();
        let mut model = Model::new().unwrap();
        let mut expected = 0;
        for _ in 0..200 {
            let lower: f64 = rng.gen_range(-10.0..10.0);
            let upper: f64 = rng.gen_range(-10.0..10.0);
            let result = model.add_variable(lower, upper);
            if lower <= upper {
                assert!(result.unwrap().is_success());
                expected += 1;
            } else {
                assert_invalid_argument(result);
            }
            assert_eq!(model.num_variables(), expected);
        }

        if expected > 0 {
            let index = expected - 1;
            let lower: f64 = rng.gen_range(-10.0..0.0);
            let upper: f64 = rng.gen_range(0.0..10.0);
            model.change_variable_bounds(index, lower, upper).unwrap();
            let column = model.variable(index).unwrap();
            assert_eq!((column.lower, column.upper), (lower, upper));
        }
    }

    #[test]
    fn add_variables_checks_shapes() {
        let mut model = Model::new().unwrap();
        assert_invalid_argument(model.add_variables(&[0., 0.], &[1.]));
        assert_invalid_argument(model.add_variables(&[0., 2.], &[1., 1.]));
        assert_eq!(model.num_variables(), 0);

        model.add_variables(&[0., -1.], &[1., 1.]).unwrap();
        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.variable(1).unwrap().lower, -1.);
    }

    #[test]
    fn add_variable_with_cost() {
        let mut model = Model::new().unwrap();
        model.add_variable_with_cost(3.5, 0., 4.).unwrap();
        assert_eq!(
            model.variable(0).unwrap(),
            Column {
                lower: 0.,
                upper: 4.,
                cost: 3.5
            }
        );
    }

    #[test]
    fn delete_variable_shifts_indices() {
        let mut model = Model::new().unwrap();
        model.add_variables(&[0., 0., 0.], &[1., 2., 3.]).unwrap();

        model.delete_variable(1).unwrap();
        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.variable(1).unwrap().upper, 3.);

        assert_invalid_argument(model.delete_variable(2));
        assert_eq!(model.num_variables(), 2);
    }

    #[test]
    fn add_constraint_stores_pairs() {
        let mut model = Model::new().unwrap();
        model.add_variables(&[0., 0., 0.], &[1., 1., 1.]).unwrap();
        model
            .add_constraint(&[2., 3.], &[2, 0], 1., 5.)
            .unwrap();

        let row = model.constraint(0).unwrap();
        assert_eq!((row.lower, row.upper), (1., 5.));
        assert_eq!(row.sorted_entries(), vec![(0, 3.), (2, 2.)]);
        assert_eq!(row.coefficient(1), None);
    }

    #[test]
    fn rejected_constraints_add_no_row() {
        let mut model = Model::new().unwrap();
        model.add_variables(&[0., 0.], &[1., 1.]).unwrap();

        assert_invalid_argument(model.add_constraint(&[1., 2.], &[0], 0., 1.));
        assert_invalid_argument(model.add_constraint(&[1.], &[2], 0., 1.));
        assert_invalid_argument(model.add_constraint(&[1., 1.], &[1, 1], 0., 1.));
        assert_invalid_argument(model.add_constraint(&[1.], &[0], 2., 1.));
        assert_invalid_argument(model.add_constraint(&[f64::NAN], &[0], 0., 1.));
        assert_eq!(model.num_constraints(), 0);
    }

    #[test]
    fn constraint_bounds_and_deletion() {
        let mut model = Model::new().unwrap();
        model.add_variable(0., 1.).unwrap();
        model.add_constraint(&[1.], &[0], 0., 1.).unwrap();
        model.add_constraint(&[2.], &[0], 0., 2.).unwrap();

        model.change_constraint_bounds(1, -1., 4.).unwrap();
        assert_invalid_argument(model.change_constraint_bounds(1, 5., 4.));
        assert_invalid_argument(model.change_constraint_bounds(2, 0., 1.));

        model.delete_constraint(0).unwrap();
        assert_eq!(model.num_constraints(), 1);
        let row = model.constraint(0).unwrap();
        assert_eq!((row.lower, row.upper), (-1., 4.));
        assert_eq!(row.coefficient(0), Some(2.));

        assert_invalid_argument(model.delete_constraint(1));
    }

    #[test]
    fn set_objective_applies_every_field() {
        let mut model = Model::new().unwrap();
        model.add_variables(&[0., 0.], &[1., 1.]).unwrap();
        model
            .set_objective(&[2.], &[1], ObjSense::Maximize, 1.5)
            .unwrap();

        assert_eq!(model.objective_sense().unwrap(), ObjSense::Maximize);
        assert_eq!(model.objective_offset().unwrap(), 1.5);
        assert_eq!(model.variable(0).unwrap().cost, 0.);
        assert_eq!(model.variable(1).unwrap().cost, 2.);
    }

    #[test]
    fn rejected_objective_changes_nothing() {
        let mut model = Model::new().unwrap();
        model.add_variables(&[0., 0.], &[1., 1.]).unwrap();
        model
            .set_objective(&[1., 1.], &[0, 1], ObjSense::Minimize, 0.)
            .unwrap();

        assert_invalid_argument(model.set_objective(&[5., 5.], &[0, 7], ObjSense::Maximize, 3.));
        assert_invalid_argument(model.set_objective(&[5.], &[0, 1], ObjSense::Maximize, 3.));
        assert_invalid_argument(model.set_objective(&[5.], &[0], ObjSense::Maximize, f64::NAN));

        assert_eq!(model.objective_sense().unwrap(), ObjSense::Minimize);
        assert_eq!(model.objective_offset().unwrap(), 0.);
        assert_eq!(model.variable(0).unwrap().cost, 1.);
    }

    #[test]
    fn snapshot_restores_touched_objective() {
        let mut model = Model::new().unwrap();
        model.add_variables(&[0., 0.], &[1., 1.]).unwrap();
        model
            .set_objective(&[1., 2.], &[0, 1], ObjSense::Minimize, 0.5)
            .unwrap();

        // a repeated index restores the value it had before the first change
        let snapshot = ObjectiveSnapshot::take(&model.highs, &[1, 1]).unwrap();
        model
            .set_objective(&[7., 9.], &[0, 1], ObjSense::Maximize, 4.)
            .unwrap();
        snapshot.restore(&mut model.highs);

        assert_eq!(model.objective_sense().unwrap(), ObjSense::Minimize);
        assert_eq!(model.objective_offset().unwrap(), 0.5);
        assert_eq!(model.variable(1).unwrap().cost, 2.);
        assert_eq!(model.variable(0).unwrap().cost, 7.);
    }

    #[test]
    fn integrality() {
        let mut model = Model::new().unwrap();
        model.add_variable(0., 10.).unwrap();
        model
            .add_constraint(&[2.], &[0], f64::NEG_INFINITY, 7.)
            .unwrap();
        model
            .set_objective(&[1.], &[0], ObjSense::Maximize, 0.)
            .unwrap();

        model.run().unwrap();
        assert!((model.objective_value() - 3.5).abs() < 1e-6);

        model
            .change_variable_integrality(0, VarType::Integer)
            .unwrap();
        model.run().unwrap();
        assert_eq!(model.model_status(), ModelStatus::Optimal);
        assert!((model.objective_value() - 3.).abs() < 1e-6);
        assert!((model.solution_values().unwrap()[0] - 3.).abs() < 1e-6);

        assert_invalid_argument(model.change_variable_integrality(1, VarType::Integer));
    }

    #[test]
    fn queries_are_idempotent() {
        let mut model = two_variable_model();
        model.run().unwrap();

        let status = model.model_status();
        let obj_val = model.objective_value();
        for _ in 0..3 {
            assert_eq!(model.model_status(), status);
            assert_eq!(model.objective_value(), obj_val);
        }
    }

    #[test]
    fn no_values_before_run() {
        let model = two_variable_model();
        assert_eq!(model.model_status(), ModelStatus::NotSet);
        assert!(model.solution_values().unwrap().is_empty());
    }

    #[test]
    fn clear_model_and_solver() {
        let mut model = two_variable_model();
        model.run().unwrap();

        assert!(model.clear_solver().unwrap().is_success());
        assert_eq!(model.num_variables(), 2);

        assert!(model.clear_model().unwrap().is_success());
        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.num_constraints(), 0);
    }

    #[test]
    fn write_and_read_lp() {
        let path = "model_roundtrip_test.lp";
        let mut model = two_variable_model();
        model.write_model(path).unwrap();

        let mut read_model = Model::new().unwrap();
        read_model.read_model(path).unwrap();
        assert_eq!(read_model.num_variables(), model.num_variables());
        assert_eq!(read_model.num_constraints(), model.num_constraints());

        model.run().unwrap();
        read_model.run().unwrap();
        assert_eq!(model.model_status(), read_model.model_status());
        assert!((model.objective_value() - read_model.objective_value()).abs() < 1e-9);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn write_solution() {
        let path = "model_solution_test.sol";
        let mut model = two_variable_model();
        model.run().unwrap();
        model.write_solution(path).unwrap();
        assert!(Path::new(path).exists());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn with_config() {
        let config = Config::default()
            .with_presolve(Presolve::Off)
            .with_time_limit(60.);
        let mut model = Model::with_config(&config).unwrap();
        model.add_variable(1., 2.).unwrap();
        model
            .set_objective(&[1.], &[0], ObjSense::Minimize, 0.)
            .unwrap();
        model.run().unwrap();
        assert_eq!(model.model_status(), ModelStatus::Optimal);
        assert!((model.objective_value() - 1.).abs() < 1e-9);
    }

    #[test]
    fn models_in_parallel() {
        let statuses = (0..32)
            .into_par_iter()
            .map(|_| {
                let mut model = two_variable_model();
                model.run().unwrap();
                model.model_status()
            })
            .collect::<Vec<_>>();

        assert!(statuses.iter().all(|&s| s == ModelStatus::Optimal));
    }
}
