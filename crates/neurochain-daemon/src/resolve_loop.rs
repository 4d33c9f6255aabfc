// crates/neurochain-daemon/src/resolve_loop.rs
//
// Background conflict-resolution loop: periodically pulls peer chains and
// adopts the longest valid one.

use std::sync::Arc;

use neurochain_rpc::{LedgerService, ResolveOutcome};

use crate::peers::PeerRegistry;

/// Run the background resolve loop.
///
/// Every `interval_secs`, fetches `chain/get` from each configured peer
/// (through the service's peer source) and applies the longest-valid-chain
/// rule. Never returns.
pub async fn run_resolve_loop(
    service: LedgerService,
    registry: Arc<PeerRegistry>,
    interval_secs: u64,
) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let outcome = service.resolve_with_peers().await;
        report_round(&registry, &outcome).await;
    }
}

/// Log a resolution round.
async fn report_round(registry: &PeerRegistry, outcome: &ResolveOutcome) {
    let alive = registry
        .all_peer_states()
        .await
        .iter()
        .filter(|p| p.alive)
        .count();

    if outcome.replaced {
        tracing::info!(
            "Resolve: adopted peer chain of {} blocks ({} of {} peers reachable)",
            outcome.length,
            alive,
            registry.configured_peer_urls().len()
        );
    } else {
        tracing::trace!(
            "Resolve: kept local chain of {} blocks ({} candidates, {} rejected, {} peers reachable)",
            outcome.length,
            outcome.candidates,
            outcome.rejected,
            alive
        );
    }
    if outcome.rejected > 0 {
        tracing::warn!("Resolve: {} peer chain(s) failed validation", outcome.rejected);
    }
}
