use crate::error::Error;
use crate::ffi;

/// Integrality class of a variable.
///
/// The discriminants are the codes used at the C ABI.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum VarType {
    /// The variable may take any value between its bounds.
    Continuous = 0,
    /// The variable must take an integer value.
    Integer = 1,
    /// The variable is zero or lies between its bounds.
    SemiContinuous = 2,
    /// The variable is zero or an integer between its bounds.
    SemiInteger = 3,
    /// The variable is integral in every feasible solution without being declared so.
    ImplicitInteger = 4,
}

impl VarType {
    /// Returns the code used for this kind at the C ABI.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for VarType {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Error> {
        match code {
            0 => Ok(VarType::Continuous),
            1 => Ok(VarType::Integer),
            2 => Ok(VarType::SemiContinuous),
            3 => Ok(VarType::SemiInteger),
            4 => Ok(VarType::ImplicitInteger),
            other => Err(Error::invalid_argument(
                "change_variable_integrality",
                format!("unrecognized variable kind {other}"),
            )),
        }
    }
}

impl From<VarType> for ffi::HighsInt {
    fn from(val: VarType) -> Self {
        match val {
            VarType::Continuous => ffi::kHighsVarTypeContinuous,
            VarType::Integer => ffi::kHighsVarTypeInteger,
            VarType::SemiContinuous => ffi::kHighsVarTypeSemiContinuous,
            VarType::SemiInteger => ffi::kHighsVarTypeSemiInteger,
            VarType::ImplicitInteger => ffi::kHighsVarTypeImplicitInteger,
        }
    }
}

/// Bounds and cost of a variable, read back from the native instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Lower bound, possibly `-inf`.
    pub lower: f64,
    /// Upper bound, possibly `inf`.
    pub upper: f64,
    /// Objective coefficient.
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for kind in [
            VarType::Continuous,
            VarType::Integer,
            VarType::SemiContinuous,
            VarType::SemiInteger,
            VarType::ImplicitInteger,
        ] {
            assert_eq!(VarType::try_from(kind.code()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(matches!(
            VarType::try_from(5),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            VarType::try_from(-1),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn native_values() {
        assert_eq!(
            ffi::HighsInt::from(VarType::Continuous),
            ffi::kHighsVarTypeContinuous
        );
        assert_eq!(
            ffi::HighsInt::from(VarType::ImplicitInteger),
            ffi::kHighsVarTypeImplicitInteger
        );
    }
}
