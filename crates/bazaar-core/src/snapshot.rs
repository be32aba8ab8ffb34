//! Render snapshot assembly.
//!
//! The renderer never reads [`ShopState`] directly. It receives a
//! [`ShopSnapshot`]: a serializable copy of everything it draws.

use bazaar_types::ShopSnapshot;

use crate::queue::CustomerQueue;
use crate::tick::ShopState;

/// Build the snapshot for the current state.
pub fn build_snapshot(state: &ShopState) -> ShopSnapshot {
    let customers = state
        .queue
        .customers()
        .iter()
        .map(|c| c.to_view(CustomerQueue::is_at_counter(c)))
        .collect();

    ShopSnapshot {
        tick: state.clock.tick(),
        customers,
        active_index: state.queue.active_index(),
        selected_item: state.selected_item,
        money: state.ledger.money(),
        day: state.clock.day(),
        reputation: state.ledger.reputation(),
        time_display: state.clock.time_display(),
        phase: state.clock.phase(),
        stock: state.stock.levels(),
        flashes: state.flashes.active().to_vec(),
        last_summary: state.last_summary.clone(),
    }
}
