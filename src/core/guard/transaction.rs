/*!
 * Transaction Guards
 *
 * RAII guards for all-or-nothing acquisition with automatic rollback
 */

use tracing::debug;

/// Transaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction in progress
    Active,
    /// Transaction committed successfully
    Committed,
    /// Transaction rolled back
    RolledBack,
}

/// Order in which recorded items are undone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackOrder {
    /// Undo the most recently recorded item first
    Reverse,
    /// Undo items in the order they were recorded
    Forward,
}

/// Transaction guard with automatic rollback
///
/// Holds a context (allocator, translator, ...) and the items acquired through
/// it. Dropping an uncommitted guard hands every recorded item back to the
/// undo function.
///
/// # Example
///
/// ```ignore
/// let mut tx = TransactionGuard::new(&mut *allocator, RollbackOrder::Reverse, |a, slot| {
///     a.release(slot)
/// });
/// for _ in 0..count {
///     let slot = tx.context().allocate(module, loc)?; // early return rolls back
///     tx.record(slot);
/// }
/// let slots = tx.commit();
/// ```
pub struct TransactionGuard<C, T, F>
where
    F: FnMut(&mut C, T),
{
    context: C,
    records: Vec<T>,
    undo: F,
    order: RollbackOrder,
    state: TransactionState,
}

impl<C, T, F> TransactionGuard<C, T, F>
where
    F: FnMut(&mut C, T),
{
    /// Begin a new transaction over `context`
    pub fn new(context: C, order: RollbackOrder, undo: F) -> Self {
        Self {
            context,
            records: Vec::new(),
            undo,
            order,
            state: TransactionState::Active,
        }
    }

    /// Access the context to acquire the next item
    #[inline]
    pub fn context(&mut self) -> &mut C {
        &mut self.context
    }

    /// Record an acquired item so it is undone on rollback
    #[inline]
    pub fn record(&mut self, item: T) {
        self.records.push(item);
    }

    #[inline]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    #[inline]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Keep everything acquired and hand the items to the caller
    pub fn commit(mut self) -> Vec<T> {
        self.state = TransactionState::Committed;
        std::mem::take(&mut self.records)
    }

    /// Undo everything acquired so far
    pub fn rollback(mut self) {
        self.do_rollback();
    }

    fn do_rollback(&mut self) {
        if self.state != TransactionState::Active {
            return;
        }

        let mut records = std::mem::take(&mut self.records);
        debug!(count = records.len(), order = ?self.order, "Rolling back transaction");
        if self.order == RollbackOrder::Reverse {
            records.reverse();
        }
        for item in records {
            (self.undo)(&mut self.context, item);
        }
        self.state = TransactionState::RolledBack;
    }
}

impl<C, T, F> Drop for TransactionGuard<C, T, F>
where
    F: FnMut(&mut C, T),
{
    fn drop(&mut self) {
        self.do_rollback();
    }
}
