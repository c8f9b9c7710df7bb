mod loan;

pub use self::loan::*;

/// Folds one ledger event into a derived state.
pub trait Applier<T> {
    fn apply(&mut self, event: T);
}
