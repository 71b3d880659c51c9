//! C ABI over the process-wide instance registry.
//!
//! Every function takes an opaque handle obtained from [`hb_create`]. Calls
//! that forward to HiGHS return its status code (`0` ok, `1` warning, `2`
//! error). Failures detected by the bridge return a negative code from
//! [`crate::error`] and leave a message readable through [`hb_last_error`]
//! on the calling thread. Panics never unwind into the caller.

use std::any::Any;
use std::cell::RefCell;
use std::ffi::{CString, c_char};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::{Arc, Mutex};

use crate::error::{ERR_INTERNAL_PANIC, Error, Result};
use crate::marshal::{self, HbDoubleArray};
use crate::registry::{self, Handle, Registry};
use crate::{Config, Model, ModelStatus, ObjSense, VarType};

static INSTANCES: Registry<Model> = Registry::new();

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(operation: &'static str, message: String) {
    LAST_ERROR.with(|slot| {
        *slot.borrow_mut() = Some(marshal::message_to_cstring(&format!(
            "{operation}: {message}"
        )));
    });
}

fn report(operation: &'static str, err: &Error) {
    tracing::warn!(
        component = "bridge",
        operation,
        code = err.code(),
        error = %err,
        "Call rejected"
    );
    set_last_error(operation, err.to_string());
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// Runs `body`, turning errors and panics into the value produced by `failed`.
fn boundary<T>(
    operation: &'static str,
    failed: fn(i32) -> T,
    body: impl FnOnce() -> Result<T>,
) -> T {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            report(operation, &err);
            failed(err.code())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(component = "bridge", operation, %message, "Panic caught at the C ABI");
            set_last_error(operation, format!("internal panic: {message}"));
            failed(ERR_INTERNAL_PANIC)
        }
    }
}

fn code_boundary(operation: &'static str, body: impl FnOnce() -> Result<i32>) -> i32 {
    boundary(operation, std::convert::identity, body)
}

/// Resolves `handle`. Entry points call this before checking any other argument.
fn resolve(handle: u64) -> Result<Arc<Mutex<Model>>> {
    INSTANCES.get(Handle::from_raw(handle))
}

fn locked<T>(entry: &Mutex<Model>, body: impl FnOnce(&mut Model) -> Result<T>) -> Result<T> {
    let mut model = registry::lock(entry);
    body(&mut model)
}

fn with_model<T>(handle: u64, body: impl FnOnce(&mut Model) -> Result<T>) -> Result<T> {
    locked(&*resolve(handle)?, body)
}

fn index(context: &'static str, value: i32) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::invalid_argument(context, format!("index {value} is negative")))
}

fn count(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Creates a solver instance configured from the `HIGHS_BRIDGE_*` environment.
///
/// Returns `0` and sets the last error if the instance cannot be created.
#[unsafe(no_mangle)]
pub extern "C" fn hb_create() -> u64 {
    boundary(
        "hb_create",
        |_| Handle::NULL.as_raw(),
        || {
            let config =
                Config::from_env().map_err(|err| Error::Initialization(err.to_string()))?;
            let model = Model::with_config(&config)?;
            let handle = INSTANCES.insert(model);
            tracing::debug!(
                component = "bridge",
                operation = "hb_create",
                handle = handle.as_raw(),
                "Registered instance"
            );
            Ok(handle.as_raw())
        },
    )
}

/// Destroys the instance behind `handle`.
///
/// Destroying `0` does nothing. Destroying an unknown or already destroyed
/// handle fails with the invalid-handle code.
#[unsafe(no_mangle)]
pub extern "C" fn hb_destroy(handle: u64) -> i32 {
    code_boundary("hb_destroy", || {
        let handle = Handle::from_raw(handle);
        if handle.is_null() {
            return Ok(0);
        }
        INSTANCES.remove(handle)?;
        tracing::debug!(
            component = "bridge",
            operation = "hb_destroy",
            handle = handle.as_raw(),
            "Released instance"
        );
        Ok(0)
    })
}

/// Returns the number of live instances.
#[unsafe(no_mangle)]
pub extern "C" fn hb_instance_count() -> usize {
    INSTANCES.len()
}

/// Reads a model file into the instance.
///
/// # Safety
///
/// `path` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hb_read_model(handle: u64, path: *const c_char) -> i32 {
    code_boundary("hb_read_model", || {
        let entry = resolve(handle)?;
        let path = unsafe { marshal::read_str(path, "read_model") }?;
        locked(&entry, |model| model.read_model(&path)).map(|s| s.code())
    })
}

/// Writes the instance's model to a file.
///
/// # Safety
///
/// `path` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hb_write_model(handle: u64, path: *const c_char) -> i32 {
    code_boundary("hb_write_model", || {
        let entry = resolve(handle)?;
        let path = unsafe { marshal::read_str(path, "write_model") }?;
        locked(&entry, |model| model.write_model(&path)).map(|s| s.code())
    })
}

/// Writes the instance's solution to a file.
///
/// # Safety
///
/// `path` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hb_write_solution(handle: u64, path: *const c_char) -> i32 {
    code_boundary("hb_write_solution", || {
        let entry = resolve(handle)?;
        let path = unsafe { marshal::read_str(path, "write_solution") }?;
        locked(&entry, |model| model.write_solution(&path)).map(|s| s.code())
    })
}

/// Removes every variable and constraint from the instance.
#[unsafe(no_mangle)]
pub extern "C" fn hb_clear_model(handle: u64) -> i32 {
    code_boundary("hb_clear_model", || {
        with_model(handle, Model::clear_model).map(|s| s.code())
    })
}

/// Discards the solver state and the solution, keeping the model.
#[unsafe(no_mangle)]
pub extern "C" fn hb_clear_solver(handle: u64) -> i32 {
    code_boundary("hb_clear_solver", || {
        with_model(handle, Model::clear_solver).map(|s| s.code())
    })
}

/// Solves the model. Blocks until HiGHS returns.
#[unsafe(no_mangle)]
pub extern "C" fn hb_run(handle: u64) -> i32 {
    code_boundary("hb_run", || with_model(handle, Model::run).map(|s| s.code()))
}

/// Appends a variable with zero cost.
#[unsafe(no_mangle)]
pub extern "C" fn hb_add_variable(handle: u64, lower: f64, upper: f64) -> i32 {
    code_boundary("hb_add_variable", || {
        with_model(handle, |model| model.add_variable(lower, upper)).map(|s| s.code())
    })
}

/// Appends a variable with objective coefficient `cost`.
#[unsafe(no_mangle)]
pub extern "C" fn hb_add_variable_with_cost(handle: u64, cost: f64, lower: f64, upper: f64) -> i32 {
    code_boundary("hb_add_variable_with_cost", || {
        with_model(handle, |model| model.add_variable_with_cost(cost, lower, upper))
            .map(|s| s.code())
    })
}

/// Appends one variable per pair of bounds.
///
/// # Safety
///
/// Each non-null pointer must be valid for reads of its length.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hb_add_variables(
    handle: u64,
    lowers: *const f64,
    lowers_len: usize,
    uppers: *const f64,
    uppers_len: usize,
) -> i32 {
    const CONTEXT: &str = "add_variables";
    code_boundary("hb_add_variables", || {
        let entry = resolve(handle)?;
        let lowers = unsafe { marshal::copy_in(lowers, lowers_len, CONTEXT, "lowers") }?;
        let uppers = unsafe { marshal::copy_in(uppers, uppers_len, CONTEXT, "uppers") }?;
        locked(&entry, |model| model.add_variables(&lowers, &uppers)).map(|s| s.code())
    })
}

/// Deletes a variable. Later variables shift down by one.
#[unsafe(no_mangle)]
pub extern "C" fn hb_delete_variable(handle: u64, variable: i32) -> i32 {
    code_boundary("hb_delete_variable", || {
        let entry = resolve(handle)?;
        let variable = index("delete_variable", variable)?;
        locked(&entry, |model| model.delete_variable(variable)).map(|s| s.code())
    })
}

/// Sets the bounds of a variable.
#[unsafe(no_mangle)]
pub extern "C" fn hb_change_variable_bounds(
    handle: u64,
    variable: i32,
    lower: f64,
    upper: f64,
) -> i32 {
    code_boundary("hb_change_variable_bounds", || {
        let entry = resolve(handle)?;
        let variable = index("change_variable_bounds", variable)?;
        locked(&entry, |model| {
            model.change_variable_bounds(variable, lower, upper)
        })
        .map(|s| s.code())
    })
}

/// Sets a variable's integrality from its kind code (`0` continuous to `4` implicit integer).
#[unsafe(no_mangle)]
pub extern "C" fn hb_change_variable_integrality(handle: u64, variable: i32, kind: i32) -> i32 {
    code_boundary("hb_change_variable_integrality", || {
        let entry = resolve(handle)?;
        let variable = index("change_variable_integrality", variable)?;
        let var_type = VarType::try_from(kind)?;
        locked(&entry, |model| {
            model.change_variable_integrality(variable, var_type)
        })
        .map(|s| s.code())
    })
}

/// Appends a constraint over the listed variables.
///
/// # Safety
///
/// Each non-null pointer must be valid for reads of its length.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hb_add_constraint(
    handle: u64,
    coefficients: *const f64,
    coefficients_len: usize,
    indices: *const i32,
    indices_len: usize,
    lower: f64,
    upper: f64,
) -> i32 {
    const CONTEXT: &str = "add_constraint";
    code_boundary("hb_add_constraint", || {
        let entry = resolve(handle)?;
        let coefficients =
            unsafe { marshal::copy_in(coefficients, coefficients_len, CONTEXT, "coefficients") }?;
        let indices = unsafe { marshal::copy_in(indices, indices_len, CONTEXT, "indices") }?;
        let indices = indices
            .into_iter()
            .map(|i| index(CONTEXT, i))
            .collect::<Result<Vec<_>>>()?;
        locked(&entry, |model| {
            model.add_constraint(&coefficients, &indices, lower, upper)
        })
        .map(|s| s.code())
    })
}

/// Deletes a constraint. Later constraints shift down by one.
#[unsafe(no_mangle)]
pub extern "C" fn hb_delete_constraint(handle: u64, constraint: i32) -> i32 {
    code_boundary("hb_delete_constraint", || {
        let entry = resolve(handle)?;
        let constraint = index("delete_constraint", constraint)?;
        locked(&entry, |model| model.delete_constraint(constraint)).map(|s| s.code())
    })
}

/// Sets the bounds of a constraint.
#[unsafe(no_mangle)]
pub extern "C" fn hb_change_constraint_bounds(
    handle: u64,
    constraint: i32,
    lower: f64,
    upper: f64,
) -> i32 {
    code_boundary("hb_change_constraint_bounds", || {
        let entry = resolve(handle)?;
        let constraint = index("change_constraint_bounds", constraint)?;
        locked(&entry, |model| {
            model.change_constraint_bounds(constraint, lower, upper)
        })
        .map(|s| s.code())
    })
}

/// Sets the objective sense and offset, then the cost of each listed variable.
///
/// # Safety
///
/// Each non-null pointer must be valid for reads of its length.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hb_set_objective(
    handle: u64,
    coefficients: *const f64,
    coefficients_len: usize,
    indices: *const i32,
    indices_len: usize,
    minimize: bool,
    offset: f64,
) -> i32 {
    const CONTEXT: &str = "set_objective";
    code_boundary("hb_set_objective", || {
        let entry = resolve(handle)?;
        let coefficients =
            unsafe { marshal::copy_in(coefficients, coefficients_len, CONTEXT, "coefficients") }?;
        let indices = unsafe { marshal::copy_in(indices, indices_len, CONTEXT, "indices") }?;
        let indices = indices
            .into_iter()
            .map(|i| index(CONTEXT, i))
            .collect::<Result<Vec<_>>>()?;
        let sense = if minimize {
            ObjSense::Minimize
        } else {
            ObjSense::Maximize
        };
        locked(&entry, |model| {
            model.set_objective(&coefficients, &indices, sense, offset)
        })
        .map(|s| s.code())
    })
}

/// Returns the model status code (`0` not set to `15` unknown).
#[unsafe(no_mangle)]
pub extern "C" fn hb_get_model_status(handle: u64) -> i32 {
    code_boundary("hb_get_model_status", || {
        with_model(handle, |model| Ok(model.model_status().code()))
    })
}

/// Writes one value per variable into `out`. The array is empty, but not
/// null, when no solution has been computed.
///
/// # Safety
///
/// `out` must be null or valid for writes. The array written must be
/// released with [`hb_double_array_free`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hb_get_solution_values(handle: u64, out: *mut HbDoubleArray) -> i32 {
    code_boundary("hb_get_solution_values", || {
        let entry = resolve(handle)?;
        if out.is_null() {
            return Err(Error::invalid_argument("solution_values", "output pointer is null"));
        }
        unsafe { out.write(HbDoubleArray::null()) };
        let values = locked(&entry, |model| model.solution_values())?;
        unsafe { out.write(HbDoubleArray::from_vec(values)) };
        Ok(0)
    })
}

/// Writes the objective value into `out`.
///
/// # Safety
///
/// `out` must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hb_get_objective_value(handle: u64, out: *mut f64) -> i32 {
    code_boundary("hb_get_objective_value", || {
        let entry = resolve(handle)?;
        if out.is_null() {
            return Err(Error::invalid_argument("objective_value", "output pointer is null"));
        }
        let value = locked(&entry, |model| Ok(model.objective_value()))?;
        unsafe { out.write(value) };
        Ok(0)
    })
}

/// Returns the number of variables, or a negative error code.
#[unsafe(no_mangle)]
pub extern "C" fn hb_get_variable_count(handle: u64) -> i32 {
    code_boundary("hb_get_variable_count", || {
        with_model(handle, |model| Ok(count(model.num_variables())))
    })
}

/// Returns the number of constraints, or a negative error code.
#[unsafe(no_mangle)]
pub extern "C" fn hb_get_constraint_count(handle: u64) -> i32 {
    code_boundary("hb_get_constraint_count", || {
        with_model(handle, |model| Ok(count(model.num_constraints())))
    })
}

/// Releases an array returned by [`hb_get_solution_values`].
///
/// # Safety
///
/// `array` must come from this library and must not be freed twice.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hb_double_array_free(array: HbDoubleArray) {
    unsafe { array.free() }
}

/// Returns the message of the last failure on this thread, or null.
///
/// The pointer stays valid until the next failing call on this thread or
/// [`hb_clear_error`].
#[unsafe(no_mangle)]
pub extern "C" fn hb_last_error() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(ptr::null(), |message| message.as_ptr())
    })
}

/// Forgets the last error of this thread.
#[unsafe(no_mangle)]
pub extern "C" fn hb_clear_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

fn classify(code: i32, predicate: fn(ModelStatus) -> bool) -> bool {
    ModelStatus::from_code(code).is_some_and(predicate)
}

/// Returns `true` if `code` is the optimal model status.
#[unsafe(no_mangle)]
pub extern "C" fn hb_is_optimal(code: i32) -> bool {
    classify(code, ModelStatus::is_optimal)
}

/// Returns `true` if `code` is the infeasible model status.
#[unsafe(no_mangle)]
pub extern "C" fn hb_is_infeasible(code: i32) -> bool {
    classify(code, ModelStatus::is_infeasible)
}

/// Returns `true` for both unbounded statuses.
#[unsafe(no_mangle)]
pub extern "C" fn hb_is_unbounded(code: i32) -> bool {
    classify(code, ModelStatus::is_unbounded)
}

/// Returns `true` for the five error model statuses.
#[unsafe(no_mangle)]
pub extern "C" fn hb_is_error(code: i32) -> bool {
    classify(code, ModelStatus::is_error)
}
