use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, LoanEvent, LoanKind, UserId};
use crate::KernelError;

/// Write side of the ledger. Events are only ever appended.
#[async_trait::async_trait]
pub trait LoanEventModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Records one event; id and timestamp are assigned by the store.
    async fn append(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
        kind: LoanKind,
    ) -> error_stack::Result<LoanEvent, KernelError>;
}

pub trait DependOnLoanEventModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanEventModifier: LoanEventModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_event_modifier(&self) -> &Self::LoanEventModifier;
}
