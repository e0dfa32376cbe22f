/*!
 * RAII Resource Guards
 *
 * Scoped acquisition with automatic cleanup.
 *
 * - **TransactionGuard**: all-or-nothing acquisition with rollback on drop
 *
 * ## Example
 *
 * ```ignore
 * let mut tx = TransactionGuard::new(ctx, RollbackOrder::Reverse, undo);
 * tx.record(acquire(tx.context())?);
 * let acquired = tx.commit(); // Or auto-rollback on drop
 * ```
 */

mod transaction;

pub use transaction::{RollbackOrder, TransactionGuard, TransactionState};
