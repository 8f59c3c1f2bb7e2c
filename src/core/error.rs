use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum QuantumError {
    InvalidQubitIndex { index: usize, num_qubits: usize },
    DimensionMismatch { left: usize, right: usize },
    NonUnitaryGate(String),
    DegenerateState(f64),
    InvalidState(String),
    EmptyShots,
    InvalidParameter(String),
}

pub type QResult<T> = Result<T, QuantumError>;

impl fmt::Display for QuantumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantumError::InvalidQubitIndex { index, num_qubits } => {
                write!(f, "Invalid Qubit Index: {} (register has {} qubits)", index, num_qubits)
            }
            QuantumError::DimensionMismatch { left, right } => {
                write!(f, "Dimension Mismatch: {} qubits vs {} qubits", left, right)
            }
            QuantumError::NonUnitaryGate(msg) => write!(f, "Non-Unitary Gate: {}", msg),
            QuantumError::DegenerateState(norm) => {
                write!(f, "Degenerate State: norm {:e} is below tolerance", norm)
            }
            QuantumError::InvalidState(msg) => write!(f, "Invalid State: {}", msg),
            QuantumError::EmptyShots => write!(f, "Empty Shots: shot count must be positive"),
            QuantumError::InvalidParameter(msg) => write!(f, "Invalid Parameter: {}", msg),
        }
    }
}

impl std::error::Error for QuantumError {}

impl QuantumError {
    pub fn invalid_state(message: &str) -> Self { QuantumError::InvalidState(message.to_string()) }
    pub fn invalid_parameter(message: &str) -> Self { QuantumError::InvalidParameter(message.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn test_invalid_index_error() {
        let err = QuantumError::InvalidQubitIndex { index: 3, num_qubits: 2 };
        assert_eq!(format!("{}", err), "Invalid Qubit Index: 3 (register has 2 qubits)");
    }
    #[test] fn test_dimension_mismatch_error() {
        let err = QuantumError::DimensionMismatch { left: 1, right: 2 };
        assert_eq!(format!("{}", err), "Dimension Mismatch: 1 qubits vs 2 qubits");
    }
    #[test] fn test_empty_shots_error() {
        assert_eq!(format!("{}", QuantumError::EmptyShots), "Empty Shots: shot count must be positive");
    }
    #[test] fn test_invalid_state_error() {
        let err = QuantumError::invalid_state("length 3 is not a power of two");
        assert_eq!(format!("{}", err), "Invalid State: length 3 is not a power of two");
    }
}
