//! End-to-end scenarios: a scripted chain drives the full dependency graph
//! from context emission to vault snapshot.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;
    use primitive_types::U256;
    use tokio::time::timeout;

    use library::math::units::{rad, wad};
    use vaults::calls::vat::create_vat_line;
    use vaults::errors::CallError;
    use vaults::vault::create_vault;
    use vaults::VaultId;

    use crate::fixture::{
        script_eth_a_vault, urn_contents, Scripted, TestChain, ACCOUNT, CDP_MANAGER, ETH_PIP, URN,
        VAT,
    };
    use crate::fixture::{eth_price, peek_result};

    const WAIT: Duration = Duration::from_millis(500);
    const QUIET: Duration = Duration::from_millis(100);

    /// Test: Should assemble the full ETH-A vault once every input resolves
    #[tokio::test]
    async fn test_end_to_end_eth_a_vault() {
        let mut chain = TestChain::new();
        script_eth_a_vault(&chain.transport);

        let vault_stream = create_vault(chain.context_stream(), VaultId(1));
        let mut sub = vault_stream.subscribe();
        chain.connect();

        let vault = timeout(WAIT, sub.next())
            .await
            .expect("vault should emit")
            .expect("stream should not complete")
            .expect("stream should not fail");

        assert_eq!(vault.id, VaultId(1));
        assert_eq!(vault.ilk, "ETH-A");
        assert_eq!(vault.token, "ETH");
        assert_eq!(vault.address, URN);
        assert_eq!(vault.owner, ACCOUNT);
        assert!(vault.controller);

        // debt = 10 × 1.05 = 10.5
        assert_eq!(vault.debt, U256::exp10(17) * 105u64);
        // collateral value = 10 × 2500 = 25000
        assert_eq!(vault.collateral_value, wad() * 25000u64);
        // ratio = 25000 / 10.5 ≈ 2380.95
        let ratio = vault.collateralization_ratio.expect("has debt");
        assert!(ratio > U256::exp10(27) * 2380u64 && ratio < U256::exp10(27) * 2381u64);
        assert!(vault.available_debt > U256::zero());
        assert!(vault.free_collateral > U256::zero());
    }

    /// Test: Should terminate the vault stream when urn resolution fails
    #[tokio::test]
    async fn test_urn_resolution_failure_terminates_the_stream() {
        let mut chain = TestChain::new();
        script_eth_a_vault(&chain.transport);
        chain.transport.clear(CDP_MANAGER, "urns");
        chain
            .transport
            .script(CDP_MANAGER, "urns", Scripted::Fail("connection reset"));

        let vault_stream = create_vault(chain.context_stream(), VaultId(1));
        let mut sub = vault_stream.subscribe();
        chain.connect();

        let first = timeout(WAIT, sub.next())
            .await
            .expect("failure should surface")
            .expect("stream should deliver the failure before completing");
        match first {
            Err(CallError::Transport { method, .. }) => assert_eq!(method, "urns"),
            other => panic!("expected a transport failure, got {other:?}"),
        }

        // Terminated: no partial vault is ever produced.
        assert!(timeout(WAIT, sub.next())
            .await
            .expect("should complete")
            .is_none());
    }

    /// Test: Should never emit for a position id that does not exist
    #[tokio::test]
    async fn test_missing_position_never_emits() {
        let mut chain = TestChain::new();
        script_eth_a_vault(&chain.transport);
        // The transport has no record for unknown ids — absent, not zero.
        chain.transport.clear(CDP_MANAGER, "urns");
        chain
            .transport
            .script(CDP_MANAGER, "urns", Scripted::Empty);

        let vault_stream = create_vault(chain.context_stream(), VaultId(9999));
        let mut sub = vault_stream.subscribe();
        chain.connect();

        // Absent is not an error and not a zeroed vault: just no emission.
        assert!(timeout(QUIET, sub.next()).await.is_err());
    }

    /// Test: Should withhold the vault while the price feed has no value
    #[tokio::test]
    async fn test_absent_price_suppresses_the_vault() {
        let mut chain = TestChain::new();
        script_eth_a_vault(&chain.transport);
        chain.transport.clear(ETH_PIP, "peek");
        chain
            .transport
            .script(ETH_PIP, "peek", peek_result(U256::zero(), false));

        let vault_stream = create_vault(chain.context_stream(), VaultId(1));
        let mut sub = vault_stream.subscribe();
        chain.connect();

        assert!(timeout(QUIET, sub.next()).await.is_err());
    }

    /// Test: Should refresh the snapshot when a new block changes the urn
    #[tokio::test]
    async fn test_new_block_refreshes_the_snapshot() {
        let mut chain = TestChain::new();
        script_eth_a_vault(&chain.transport);
        // Second read of the urn sees two more units of collateral locked.
        chain
            .transport
            .script(VAT, "urns", urn_contents(wad() * 12u64, wad() * 10u64));

        let vault_stream = create_vault(chain.context_stream(), VaultId(1));
        let mut sub = vault_stream.subscribe();
        chain.connect();

        let first = timeout(WAIT, sub.next())
            .await
            .expect("vault should emit")
            .expect("stream alive")
            .expect("no failure");
        assert_eq!(first.collateral, wad() * 10u64);

        chain.next_block();

        // Each refreshed input re-emits the combined snapshot; wait for the
        // one that reflects the new urn contents.
        let mut refreshed = None;
        for _ in 0..32 {
            let vault = timeout(WAIT, sub.next())
                .await
                .expect("stream should keep emitting")
                .expect("stream alive")
                .expect("no failure");
            if vault.collateral == wad() * 12u64 {
                refreshed = Some(vault);
                break;
            }
        }
        let refreshed = refreshed.expect("snapshot should pick up the new urn");
        assert_eq!(refreshed.price, eth_price());
        // Same rate, more collateral: debt unchanged.
        assert_eq!(refreshed.debt, first.debt);
    }

    /// Test: Should stop emitting on disconnect without raising a failure
    #[tokio::test]
    async fn test_disconnect_completes_without_failure() {
        let mut chain = TestChain::new();
        script_eth_a_vault(&chain.transport);

        let vault_stream = create_vault(chain.context_stream(), VaultId(1));
        let mut sub = vault_stream.subscribe();
        chain.connect();

        let first = timeout(WAIT, sub.next())
            .await
            .expect("vault should emit")
            .expect("stream alive");
        assert!(first.is_ok());

        chain.disconnect();

        // Drain whatever was already in flight; the stream must end without
        // ever delivering an error.
        loop {
            match timeout(WAIT, sub.next()).await.expect("should wind down") {
                Some(Ok(_)) => continue,
                Some(Err(err)) => panic!("disconnect must not fail the stream: {err}"),
                None => break,
            }
        }
    }

    /// Test: Should read the global debt ceiling as its own stream
    #[tokio::test]
    async fn test_global_debt_ceiling_stream() {
        let mut chain = TestChain::new();
        chain
            .transport
            .script(VAT, "Line", crate::fixture::uint(rad() * 50_000_000u64));

        let line = create_vat_line(chain.context_stream());
        let mut sub = line.subscribe();
        chain.connect();

        let value = timeout(WAIT, sub.next())
            .await
            .expect("line should emit")
            .expect("stream alive")
            .expect("no failure");
        assert_eq!(value, rad() * 50_000_000u64);
    }
}
