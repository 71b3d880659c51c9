//! Handle-based bridge to the [HiGHS](https://highs.dev) linear and mixed-integer solver.
//!
//! [`Model`] owns one native solver instance and checks every input before it
//! reaches native code. The [`capi`] module exposes the same operations over
//! a C ABI, identifying instances by opaque integer handles kept in a
//! [`Registry`].
//!
//! ```no_run
//! use highs_bridge::{Model, ModelStatus, ObjSense};
//!
//! let mut model = Model::new().unwrap();
//! model.add_variables(&[0., 0.], &[10., 10.]).unwrap();
//! model.add_constraint(&[1., 1.], &[0, 1], 2., 8.).unwrap();
//! model.set_objective(&[1., 1.], &[0, 1], ObjSense::Minimize, 0.).unwrap();
//! model.run().unwrap();
//! assert_eq!(model.model_status(), ModelStatus::Optimal);
//! ```

pub use highs_sys as ffi;

/// Calls a native function and translates its status integer.
macro_rules! highs_call {
    ($function_name:ident ($($param:expr),* $(,)?)) => {
        $crate::retcode::check_status(
            unsafe { $crate::ffi::$function_name($($param),*) },
            stringify!($function_name),
        )
    };
}
pub(crate) use highs_call;

/// Contains the C ABI entry points.
pub mod capi;
/// Contains the read-back representation of a constraint.
pub mod constraint;
/// Contains the typed solver options applied at instance creation.
pub mod config;
/// Contains the error type shared by every operation.
pub mod error;
mod highs;
/// Contains the buffer and string conversions used at the C ABI.
pub mod marshal;
/// Contains the validated model API.
pub mod model;
/// Contains the handle registry.
pub mod registry;
/// Contains the status returned by native calls.
pub mod retcode;
/// Contains the solution snapshot.
pub mod solution;
/// Contains the model status enumeration and its classification helpers.
pub mod status;
/// Contains the variable kinds and the read-back representation of a variable.
pub mod variable;

pub use config::{Config, Presolve};
pub use constraint::Row;
pub use error::{Error, Result};
pub use model::{Model, ObjSense};
pub use registry::{Handle, Registry};
pub use retcode::HighsStatus;
pub use solution::Solution;
pub use status::ModelStatus;
pub use variable::{Column, VarType};
