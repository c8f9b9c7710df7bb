use std::collections::HashMap;

use crate::entity::{BookId, LoanEvent, LoanKind, UserId};
use crate::event::Applier;

/// Loan state of one user, rebuilt from that user's ledger events.
///
/// Remembers the latest event kind per book; a book whose latest kind is
/// [`LoanKind::Issued`] is currently held by the user.
#[derive(Debug, Default, Clone)]
pub struct UserHoldings {
    latest: HashMap<BookId, LoanKind>,
}

impl UserHoldings {
    pub fn replay<'a>(events: impl IntoIterator<Item = &'a LoanEvent>) -> Self {
        let mut holdings = Self::default();
        events.into_iter().for_each(|event| holdings.apply(event));
        holdings
    }

    pub fn is_issued(&self, book_id: &BookId) -> bool {
        matches!(self.latest.get(book_id), Some(LoanKind::Issued))
    }

    pub fn held_books(&self) -> impl Iterator<Item = &BookId> {
        self.latest
            .iter()
            .filter(|(_, kind)| **kind == LoanKind::Issued)
            .map(|(book_id, _)| book_id)
    }

    pub fn has_outstanding(&self) -> bool {
        self.held_books().next().is_some()
    }
}

impl Applier<&LoanEvent> for UserHoldings {
    fn apply(&mut self, event: &LoanEvent) {
        self.latest.insert(event.book_id().clone(), *event.kind());
    }
}

/// Circulation of one book, rebuilt from that book's ledger events.
#[derive(Debug, Default, Clone)]
pub struct BookCirculation {
    latest: HashMap<UserId, LoanKind>,
}

impl BookCirculation {
    pub fn replay<'a>(events: impl IntoIterator<Item = &'a LoanEvent>) -> Self {
        let mut circulation = Self::default();
        events.into_iter().for_each(|event| circulation.apply(event));
        circulation
    }

    /// Copies currently out on loan.
    pub fn outstanding(&self) -> usize {
        self.latest
            .values()
            .filter(|kind| **kind == LoanKind::Issued)
            .count()
    }
}

impl Applier<&LoanEvent> for BookCirculation {
    fn apply(&mut self, event: &LoanEvent) {
        self.latest.insert(event.user_id().clone(), *event.kind());
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use crate::entity::{BookId, CreatedAt, LoanEvent, LoanEventId, LoanKind, UserId};
    use crate::event::{BookCirculation, UserHoldings};

    fn event(id: i64, user: &UserId, book: &BookId, kind: LoanKind) -> LoanEvent {
        LoanEvent::new(
            LoanEventId::new(id),
            user.clone(),
            book.clone(),
            kind,
            CreatedAt::now(),
        )
    }

    #[test]
    fn latest_event_per_book_decides_holding() {
        let user = UserId::new(Uuid::new_v4());
        let dune = BookId::new(Uuid::new_v4());
        let orwell = BookId::new(Uuid::new_v4());
        let events = vec![
            event(1, &user, &dune, LoanKind::Issued),
            event(2, &user, &dune, LoanKind::Returned),
            event(3, &user, &orwell, LoanKind::Issued),
        ];

        let holdings = UserHoldings::replay(&events);
        assert!(holdings.has_outstanding());
        assert!(!holdings.is_issued(&dune));
        assert!(holdings.is_issued(&orwell));
        assert_eq!(holdings.held_books().collect::<Vec<_>>(), vec![&orwell]);

        let holdings = UserHoldings::replay(&events[..2]);
        assert!(!holdings.has_outstanding());
    }

    #[test]
    fn counts_outstanding_copies_per_borrower() {
        let book = BookId::new(Uuid::new_v4());
        let alice = UserId::new(Uuid::new_v4());
        let bob = UserId::new(Uuid::new_v4());
        let events = vec![
            event(1, &alice, &book, LoanKind::Issued),
            event(2, &bob, &book, LoanKind::Issued),
            event(3, &alice, &book, LoanKind::Returned),
        ];

        assert_eq!(BookCirculation::replay(&events).outstanding(), 1);
        assert_eq!(BookCirculation::replay(&events[..2]).outstanding(), 2);
        assert_eq!(BookCirculation::default().outstanding(), 0);
    }
}
