use error_stack::Report;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{User, UserEmail, UserId};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_email(
        &self,
        con: &mut InMemoryTransaction,
        email: &UserEmail,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con
            .working
            .users
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }
}

#[async_trait::async_trait]
impl UserModifier for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        if con
            .working
            .users
            .iter()
            .any(|existing| existing.email() == user.email())
        {
            return Err(Report::new(KernelError::DuplicateEmail));
        }
        con.working.users.push(user.clone());
        Ok(())
    }

    // The whole store is already held by the transaction.
    async fn lock(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        if con.working.users.iter().any(|user| user.id() == user_id) {
            Ok(())
        } else {
            Err(Report::new(KernelError::Internal)
                .attach_printable(format!("User {:?} vanished while locking", user_id)))
        }
    }
}
