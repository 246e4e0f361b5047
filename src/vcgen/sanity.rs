//! Checks run on declarations before their proof rules

use crate::absyn::{OperationEntry, ProcedureDec};
use crate::error::{Error, Result};

/// Checks that a procedure's signature implements its operation
pub struct ValidOperationDeclChecker<'a> {
    operation: &'a OperationEntry,
    procedure: &'a ProcedureDec,
}

impl<'a> ValidOperationDeclChecker<'a> {
    pub fn new(operation: &'a OperationEntry, procedure: &'a ProcedureDec) -> Self {
        Self {
            operation,
            procedure,
        }
    }

    pub fn check(&self) -> Result<()> {
        let (op, proc) = (self.operation, self.procedure);
        if op.params.len() != proc.params.len() {
            return Err(self.mismatch(format!(
                "operation takes {} parameter(s), procedure takes {}",
                op.params.len(),
                proc.params.len()
            )));
        }
        for (expected, actual) in op.params.iter().zip(&proc.params) {
            if expected.name != actual.name {
                return Err(self.mismatch(format!(
                    "parameter {} is named {} in the operation",
                    actual.name, expected.name
                )));
            }
            if !expected.mode.accepts(actual.mode) {
                return Err(self.mismatch(format!(
                    "parameter {} is {} in the operation but {} in the procedure",
                    actual.name, expected.mode, actual.mode
                )));
            }
            if expected.type_name != actual.type_name {
                return Err(self.mismatch(format!(
                    "parameter {} has type {} in the operation but {} in the procedure",
                    actual.name, expected.type_name, actual.type_name
                )));
            }
        }
        Ok(())
    }

    fn mismatch(&self, message: String) -> Error {
        Error::OperationMismatch {
            procedure: self.procedure.name.clone(),
            message,
            location: self.procedure.location.clone(),
        }
    }
}
