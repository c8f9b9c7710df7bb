use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, LoanEvent, LoanHistory, UserId};
use crate::event::UserHoldings;
use crate::KernelError;

/// Read side of the ledger. All sequences are in append order.
#[async_trait::async_trait]
pub trait LoanEventQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LoanEvent>, KernelError>;

    async fn find_by_book_id(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<LoanEvent>, KernelError>;

    async fn find_history_by_user_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError>;

    async fn has_outstanding_loan(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<bool, KernelError> {
        let events = self.find_by_user_id(con, user_id).await?;
        Ok(UserHoldings::replay(&events).has_outstanding())
    }

    async fn is_currently_issued(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        let events = self.find_by_user_id(con, user_id).await?;
        Ok(UserHoldings::replay(&events).is_issued(book_id))
    }
}

pub trait DependOnLoanEventQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanEventQuery: LoanEventQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_event_query(&self) -> &Self::LoanEventQuery;
}
