use std::ffi::{CStr, c_void};
use std::ptr::null_mut;

use crate::error::{Error, Result};
use crate::{
    Column, Config, HighsStatus, ModelStatus, ObjSense, Row, VarType, ffi, highs_call, marshal,
};

/// Owns one native solver instance. The instance is destroyed exactly once, on drop.
///
/// Every method forwards to the native API without validating its input;
/// callers must check indices, shapes and bounds first.
#[non_exhaustive]
#[derive(Debug)]
pub(crate) struct HighsPtr {
    raw: *mut c_void,
}

// A native instance has no thread affinity. Access goes through `&mut self`
// or through the registry's per-entry mutex.
unsafe impl Send for HighsPtr {}

impl HighsPtr {
    pub(crate) fn new() -> Result<Self> {
        let raw = unsafe { ffi::Highs_create() };
        if raw.is_null() {
            return Err(Error::Initialization(
                "Highs_create returned a null instance".into(),
            ));
        }
        Ok(HighsPtr { raw })
    }

    pub(crate) fn apply_config(&mut self, config: &Config) -> Result<()> {
        self.set_bool_option(c"output_flag", config.output_flag)?;
        self.set_bool_option(c"log_to_console", config.output_flag)?;
        if let Some(limit) = config.time_limit {
            self.set_double_option(c"time_limit", limit)?;
        }
        if let Some(gap) = config.mip_rel_gap {
            self.set_double_option(c"mip_rel_gap", gap)?;
        }
        if let Some(presolve) = config.presolve {
            self.set_string_option(c"presolve", presolve.as_option_value())?;
        }
        Ok(())
    }

    fn set_bool_option(&mut self, name: &CStr, value: bool) -> Result<()> {
        let status = highs_call!(Highs_setBoolOptionValue(
            self.raw,
            name.as_ptr(),
            ffi::HighsInt::from(value)
        ))?;
        option_result(name, status)
    }

    fn set_double_option(&mut self, name: &CStr, value: f64) -> Result<()> {
        let status = highs_call!(Highs_setDoubleOptionValue(self.raw, name.as_ptr(), value))?;
        option_result(name, status)
    }

    fn set_string_option(&mut self, name: &CStr, value: &CStr) -> Result<()> {
        let status = highs_call!(Highs_setStringOptionValue(
            self.raw,
            name.as_ptr(),
            value.as_ptr()
        ))?;
        option_result(name, status)
    }

    pub(crate) fn read_model(&mut self, path: &CStr) -> Result<HighsStatus> {
        highs_call!(Highs_readModel(self.raw, path.as_ptr()))
    }

    pub(crate) fn write_model(&mut self, path: &CStr) -> Result<HighsStatus> {
        highs_call!(Highs_writeModel(self.raw, path.as_ptr()))
    }

    pub(crate) fn write_solution(&mut self, path: &CStr) -> Result<HighsStatus> {
        highs_call!(Highs_writeSolution(self.raw, path.as_ptr()))
    }

    pub(crate) fn clear_model(&mut self) -> Result<HighsStatus> {
        highs_call!(Highs_clearModel(self.raw))
    }

    pub(crate) fn clear_solver(&mut self) -> Result<HighsStatus> {
        highs_call!(Highs_clearSolver(self.raw))
    }

    pub(crate) fn run(&mut self) -> Result<HighsStatus> {
        highs_call!(Highs_run(self.raw))
    }

    pub(crate) fn n_cols(&self) -> usize {
        let n = unsafe { ffi::Highs_getNumCol(self.raw) };
        usize::try_from(n).unwrap_or(0)
    }

    pub(crate) fn n_rows(&self) -> usize {
        let n = unsafe { ffi::Highs_getNumRow(self.raw) };
        usize::try_from(n).unwrap_or(0)
    }

    fn n_nz(&self) -> usize {
        let n = unsafe { ffi::Highs_getNumNz(self.raw) };
        usize::try_from(n).unwrap_or(0)
    }

    pub(crate) fn add_var(&mut self, lower: f64, upper: f64) -> Result<HighsStatus> {
        highs_call!(Highs_addVar(self.raw, lower, upper))
    }

    pub(crate) fn add_col(&mut self, cost: f64, lower: f64, upper: f64) -> Result<HighsStatus> {
        highs_call!(Highs_addCol(
            self.raw,
            cost,
            lower,
            upper,
            0,
            std::ptr::null(),
            std::ptr::null()
        ))
    }

    pub(crate) fn add_vars(&mut self, lower: &[f64], upper: &[f64]) -> Result<HighsStatus> {
        debug_assert_eq!(lower.len(), upper.len());
        let n = to_highs_int(lower.len(), "add_variables")?;
        highs_call!(Highs_addVars(self.raw, n, lower.as_ptr(), upper.as_ptr()))
    }

    pub(crate) fn delete_col(&mut self, col: ffi::HighsInt) -> Result<HighsStatus> {
        highs_call!(Highs_deleteColsByRange(self.raw, col, col))
    }

    pub(crate) fn change_col_bounds(
        &mut self,
        col: ffi::HighsInt,
        lower: f64,
        upper: f64,
    ) -> Result<HighsStatus> {
        highs_call!(Highs_changeColBounds(self.raw, col, lower, upper))
    }

    pub(crate) fn change_col_integrality(
        &mut self,
        col: ffi::HighsInt,
        var_type: VarType,
    ) -> Result<HighsStatus> {
        highs_call!(Highs_changeColIntegrality(self.raw, col, var_type.into()))
    }

    pub(crate) fn change_col_cost(&mut self, col: ffi::HighsInt, cost: f64) -> Result<HighsStatus> {
        highs_call!(Highs_changeColCost(self.raw, col, cost))
    }

    pub(crate) fn add_row(
        &mut self,
        lower: f64,
        upper: f64,
        index: &[ffi::HighsInt],
        value: &[f64],
    ) -> Result<HighsStatus> {
        debug_assert_eq!(index.len(), value.len());
        let nnz = to_highs_int(index.len(), "add_constraint")?;
        highs_call!(Highs_addRow(
            self.raw,
            lower,
            upper,
            nnz,
            index.as_ptr(),
            value.as_ptr()
        ))
    }

    pub(crate) fn delete_row(&mut self, row: ffi::HighsInt) -> Result<HighsStatus> {
        highs_call!(Highs_deleteRowsByRange(self.raw, row, row))
    }

    pub(crate) fn change_row_bounds(
        &mut self,
        row: ffi::HighsInt,
        lower: f64,
        upper: f64,
    ) -> Result<HighsStatus> {
        highs_call!(Highs_changeRowBounds(self.raw, row, lower, upper))
    }

    pub(crate) fn change_obj_sense(&mut self, sense: ObjSense) -> Result<HighsStatus> {
        highs_call!(Highs_changeObjectiveSense(self.raw, sense.into()))
    }

    pub(crate) fn change_obj_offset(&mut self, offset: f64) -> Result<HighsStatus> {
        highs_call!(Highs_changeObjectiveOffset(self.raw, offset))
    }

    pub(crate) fn obj_sense(&self) -> Result<ObjSense> {
        let mut sense: ffi::HighsInt = ffi::kHighsObjSenseMinimize;
        let status = highs_call!(Highs_getObjectiveSense(self.raw, &mut sense))?;
        if status == HighsStatus::Error {
            return Err(Error::native("Highs_getObjectiveSense", "error status"));
        }
        Ok(if sense == ffi::kHighsObjSenseMaximize {
            ObjSense::Maximize
        } else {
            ObjSense::Minimize
        })
    }

    pub(crate) fn obj_offset(&self) -> Result<f64> {
        let mut offset = 0.0;
        let status = highs_call!(Highs_getObjectiveOffset(self.raw, &mut offset))?;
        if status == HighsStatus::Error {
            return Err(Error::native("Highs_getObjectiveOffset", "error status"));
        }
        Ok(offset)
    }

    pub(crate) fn model_status(&self) -> ModelStatus {
        let status = unsafe { ffi::Highs_getModelStatus(self.raw) };
        status.into()
    }

    pub(crate) fn obj_val(&self) -> f64 {
        unsafe { ffi::Highs_getObjectiveValue(self.raw) }
    }

    /// Returns `true` once the instance holds primal values for the current model.
    pub(crate) fn has_primal_solution(&self) -> bool {
        let mut solution_status: ffi::HighsInt = ffi::kHighsSolutionStatusNone;
        let status = unsafe {
            ffi::Highs_getIntInfoValue(
                self.raw,
                c"primal_solution_status".as_ptr(),
                &mut solution_status,
            )
        };
        status != ffi::kHighsStatusError && solution_status != ffi::kHighsSolutionStatusNone
    }

    /// Returns the primal column values. The other solution arrays are not requested.
    pub(crate) fn col_values(&self) -> Result<Vec<f64>> {
        let mut col_value = marshal::result_buffer(self.n_cols(), "solution_values")?;
        let status = highs_call!(Highs_getSolution(
            self.raw,
            col_value.as_mut_ptr(),
            null_mut(),
            null_mut(),
            null_mut()
        ))?;
        if status == HighsStatus::Error {
            return Err(Error::native("Highs_getSolution", "error status"));
        }
        Ok(col_value)
    }

    pub(crate) fn col(&self, col: ffi::HighsInt) -> Result<Column> {
        let mut num_col: ffi::HighsInt = 0;
        let mut cost = 0.0;
        let mut lower = 0.0;
        let mut upper = 0.0;
        let mut num_nz: ffi::HighsInt = 0;
        let status = highs_call!(Highs_getColsByRange(
            self.raw,
            col,
            col,
            &mut num_col,
            &mut cost,
            &mut lower,
            &mut upper,
            &mut num_nz,
            null_mut(),
            null_mut(),
            null_mut()
        ))?;
        if status == HighsStatus::Error || num_col != 1 {
            return Err(Error::native("Highs_getColsByRange", "column not returned"));
        }
        Ok(Column { lower, upper, cost })
    }

    pub(crate) fn row(&self, row: ffi::HighsInt) -> Result<Row> {
        // the whole matrix bounds the size of any single row
        let capacity = self.n_nz().max(1);
        let mut num_row: ffi::HighsInt = 0;
        let mut lower = 0.0;
        let mut upper = 0.0;
        let mut num_nz: ffi::HighsInt = 0;
        let mut start: [ffi::HighsInt; 1] = [0];
        let mut index: Vec<ffi::HighsInt> = vec![0; capacity];
        let mut value = vec![0.0; capacity];
        let status = highs_call!(Highs_getRowsByRange(
            self.raw,
            row,
            row,
            &mut num_row,
            &mut lower,
            &mut upper,
            &mut num_nz,
            start.as_mut_ptr(),
            index.as_mut_ptr(),
            value.as_mut_ptr()
        ))?;
        if status == HighsStatus::Error || num_row != 1 {
            return Err(Error::native("Highs_getRowsByRange", "row not returned"));
        }
        let num_nz = usize::try_from(num_nz).unwrap_or(0).min(capacity);
        let entries = index[..num_nz]
            .iter()
            .zip(&value[..num_nz])
            .map(|(i, v)| (usize::try_from(*i).unwrap_or(usize::MAX), *v))
            .collect();
        Ok(Row {
            lower,
            upper,
            entries,
        })
    }
}

impl Drop for HighsPtr {
    fn drop(&mut self) {
        unsafe { ffi::Highs_destroy(self.raw) };
    }
}

impl From<ObjSense> for ffi::HighsInt {
    fn from(val: ObjSense) -> Self {
        match val {
            ObjSense::Minimize => ffi::kHighsObjSenseMinimize,
            ObjSense::Maximize => ffi::kHighsObjSenseMaximize,
        }
    }
}

pub(crate) fn to_highs_int(value: usize, context: &'static str) -> Result<ffi::HighsInt> {
    ffi::HighsInt::try_from(value).map_err(|_| {
        Error::invalid_argument(context, format!("{value} exceeds the solver's index range"))
    })
}

fn option_result(name: &CStr, status: HighsStatus) -> Result<()> {
    if status == HighsStatus::Error {
        return Err(Error::Initialization(format!(
            "option `{}` was rejected",
            name.to_string_lossy()
        )));
    }
    Ok(())
}
