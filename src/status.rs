use std::fmt;

use crate::ffi;

/// Outcome of the most recent solve attempt.
///
/// The discriminants are the codes used at the C ABI.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ModelStatus {
    /// No solve has been attempted yet.
    NotSet = 0,
    /// The model could not be loaded.
    LoadError = 1,
    /// The model is inconsistent.
    ModelError = 2,
    /// Presolve failed.
    PresolveError = 3,
    /// The solver failed.
    SolveError = 4,
    /// Postsolve failed.
    PostsolveError = 5,
    /// The model has no variables and no constraints.
    ModelEmpty = 6,
    /// An optimal solution is available.
    Optimal = 7,
    /// The model was proven infeasible.
    Infeasible = 8,
    /// The model was proven either infeasible or unbounded.
    UnboundedOrInfeasible = 9,
    /// The model was proven unbounded.
    Unbounded = 10,
    /// The objective bound was reached.
    ObjectiveBound = 11,
    /// The objective target was reached.
    ObjectiveTarget = 12,
    /// The time limit was reached.
    TimeLimit = 13,
    /// The iteration limit was reached.
    IterationLimit = 14,
    /// The status is not known.
    Unknown = 15,
}

impl ModelStatus {
    const ALL: [ModelStatus; 16] = [
        ModelStatus::NotSet,
        ModelStatus::LoadError,
        ModelStatus::ModelError,
        ModelStatus::PresolveError,
        ModelStatus::SolveError,
        ModelStatus::PostsolveError,
        ModelStatus::ModelEmpty,
        ModelStatus::Optimal,
        ModelStatus::Infeasible,
        ModelStatus::UnboundedOrInfeasible,
        ModelStatus::Unbounded,
        ModelStatus::ObjectiveBound,
        ModelStatus::ObjectiveTarget,
        ModelStatus::TimeLimit,
        ModelStatus::IterationLimit,
        ModelStatus::Unknown,
    ];

    /// Returns the code used for this status at the C ABI.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Parses a C ABI model status code.
    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Returns `true` if an optimal solution was found.
    pub fn is_optimal(self) -> bool {
        self == ModelStatus::Optimal
    }

    /// Returns `true` if the model was proven infeasible.
    pub fn is_infeasible(self) -> bool {
        self == ModelStatus::Infeasible
    }

    /// Returns `true` for `Unbounded` and `UnboundedOrInfeasible`.
    pub fn is_unbounded(self) -> bool {
        matches!(
            self,
            ModelStatus::Unbounded | ModelStatus::UnboundedOrInfeasible
        )
    }

    /// Returns `true` for the five error variants.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            ModelStatus::LoadError
                | ModelStatus::ModelError
                | ModelStatus::PresolveError
                | ModelStatus::SolveError
                | ModelStatus::PostsolveError
        )
    }
}

impl From<ffi::HighsInt> for ModelStatus {
    /// Converts a native model status. Statuses newer than this enumeration
    /// (solution limit, interrupt) are reported as `Unknown`.
    #[allow(non_upper_case_globals)]
    fn from(val: ffi::HighsInt) -> Self {
        match val {
            ffi::kHighsModelStatusNotset => ModelStatus::NotSet,
            ffi::kHighsModelStatusLoadError => ModelStatus::LoadError,
            ffi::kHighsModelStatusModelError => ModelStatus::ModelError,
            ffi::kHighsModelStatusPresolveError => ModelStatus::PresolveError,
            ffi::kHighsModelStatusSolveError => ModelStatus::SolveError,
            ffi::kHighsModelStatusPostsolveError => ModelStatus::PostsolveError,
            ffi::kHighsModelStatusModelEmpty => ModelStatus::ModelEmpty,
            ffi::kHighsModelStatusOptimal => ModelStatus::Optimal,
            ffi::kHighsModelStatusInfeasible => ModelStatus::Infeasible,
            ffi::kHighsModelStatusUnboundedOrInfeasible => ModelStatus::UnboundedOrInfeasible,
            ffi::kHighsModelStatusUnbounded => ModelStatus::Unbounded,
            ffi::kHighsModelStatusObjectiveBound => ModelStatus::ObjectiveBound,
            ffi::kHighsModelStatusObjectiveTarget => ModelStatus::ObjectiveTarget,
            ffi::kHighsModelStatusTimeLimit => ModelStatus::TimeLimit,
            ffi::kHighsModelStatusIterationLimit => ModelStatus::IterationLimit,
            ffi::kHighsModelStatusUnknown => ModelStatus::Unknown,
            other => {
                tracing::warn!(
                    component = "bridge",
                    operation = "model_status",
                    native_status = other,
                    "Unrecognized native model status, reporting Unknown"
                );
                ModelStatus::Unknown
            }
        }
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelStatus::NotSet => "Not set",
            ModelStatus::LoadError => "Load error",
            ModelStatus::ModelError => "Model error",
            ModelStatus::PresolveError => "Presolve error",
            ModelStatus::SolveError => "Solve error",
            ModelStatus::PostsolveError => "Postsolve error",
            ModelStatus::ModelEmpty => "Model empty",
            ModelStatus::Optimal => "Optimal",
            ModelStatus::Infeasible => "Infeasible",
            ModelStatus::UnboundedOrInfeasible => "Unbounded or infeasible",
            ModelStatus::Unbounded => "Unbounded",
            ModelStatus::ObjectiveBound => "Objective bound reached",
            ModelStatus::ObjectiveTarget => "Objective target reached",
            ModelStatus::TimeLimit => "Time limit reached",
            ModelStatus::IterationLimit => "Iteration limit reached",
            ModelStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}
