use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

const ISSUED: &str = "Issued";
const RETURNED: &str = "Returned";

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum LoanKind {
    Issued,
    Returned,
}

impl LoanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanKind::Issued => ISSUED,
            LoanKind::Returned => RETURNED,
        }
    }
}

impl TryFrom<&str> for LoanKind {
    type Error = Report<KernelError>;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            ISSUED => Ok(LoanKind::Issued),
            RETURNED => Ok(LoanKind::Returned),
            _ => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown loan kind: {value}"))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::LoanKind;
    use crate::KernelError;

    #[test]
    fn parses_stored_names() {
        assert_eq!(LoanKind::try_from("Issued").unwrap(), LoanKind::Issued);
        assert_eq!(LoanKind::try_from("Returned").unwrap(), LoanKind::Returned);
        let error = LoanKind::try_from("issued").unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Internal);
    }
}
