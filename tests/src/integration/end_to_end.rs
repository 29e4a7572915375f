//! # End-to-End Scenarios
//!
//! The full mini-app session: cold start on empty storage, mint,
//! cooldown, boundary checks at 59 999ms and 60 000ms, and the wire
//! payload the host receives. Plus degraded-storage sessions and
//! cross-session reload.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mint_cooldown::adapters::{
        InMemoryKvStore, ManualClock, MockChainClient, RecordingNotifier,
    };
    use mint_cooldown::{
        Clock, KeyValueStore, MintAppConfig, MintCooldownController, MintCooldownError, MintService,
        NotificationRegistration,
    };

    const START_MS: u64 = 1_700_000_000_000;

    fn inking_config() -> MintAppConfig {
        crate::init_tracing();
        MintAppConfig {
            app_name: "Inking".to_string(),
            storage_prefix: "inking".to_string(),
            registration_storage_key: "inking-notification-details".to_string(),
            notification: mint_cooldown::NotificationContent {
                title: "Inking".to_string(),
                body: "This is a test notification".to_string(),
                target_url: "https://inking.example.com".to_string(),
            },
            ..Default::default()
        }
    }

    fn registration() -> NotificationRegistration {
        NotificationRegistration {
            url: "https://api.host.example/v1/notify".to_string(),
            token: "tok-e2e".to_string(),
        }
    }

    #[tokio::test]
    async fn test_full_session_from_empty_storage() {
        let kv = Arc::new(InMemoryKvStore::new());
        let chain = Arc::new(MockChainClient::new(0));
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(ManualClock::new(START_MS));
        let controller = MintCooldownController::new(
            inking_config(),
            "0xfeed",
            kv.clone(),
            chain,
            notifier.clone(),
            clock.clone(),
        )
        .unwrap();

        // Cold start: nothing persisted
        controller.initialize();
        let status = controller.status();
        assert_eq!(status.minted_count, 0);
        assert!(status.eligible);

        controller.set_notification_registration(registration()).unwrap();

        // Mint at t=0 of the scenario
        let handle = controller.request_mint().await.unwrap();
        controller.await_mint_confirmation(handle).await.unwrap();
        let status = controller.status();
        assert_eq!(status.minted_count, 1);
        assert!(!status.eligible);

        // One millisecond before the boundary
        clock.set(START_MS + 59_999);
        controller.tick(clock.now_ms()).await;
        let cooldown = controller.evaluate_cooldown(clock.now_ms());
        assert!(!cooldown.eligible);
        assert_eq!(cooldown.remaining_ms, 1);
        assert_eq!(notifier.count(), 0);

        // Exactly at the boundary
        clock.set(START_MS + 60_000);
        controller.tick(clock.now_ms()).await;
        assert!(controller.evaluate_cooldown(clock.now_ms()).eligible);
        assert_eq!(notifier.count(), 1);

        // The dispatched payload is the host wire shape with a fresh id
        let (url, payload) = &notifier.dispatched()[0];
        assert_eq!(url, "https://api.host.example/v1/notify");
        assert_eq!(payload.notification_id, format!("inking-{}", START_MS + 60_000));
        assert_eq!(payload.title, "Inking");
        assert_eq!(payload.tokens, vec!["tok-e2e".to_string()]);

        let wire = serde_json::to_value(payload).unwrap();
        assert!(wire.get("notificationId").is_some());
        assert!(wire.get("targetUrl").is_some());
        assert!(wire.get("notification_id").is_none());

        // Minting is open again
        assert!(controller.request_mint().await.is_ok());
    }

    #[tokio::test]
    async fn test_state_survives_reload() {
        let kv = Arc::new(InMemoryKvStore::new());
        let chain = Arc::new(MockChainClient::new(0));
        let clock = Arc::new(ManualClock::new(START_MS));

        let first = MintCooldownController::new(
            inking_config(),
            "0xfeed",
            kv.clone(),
            chain.clone(),
            Arc::new(RecordingNotifier::new()),
            clock.clone(),
        )
        .unwrap();
        first.initialize();
        first.set_notification_registration(registration()).unwrap();
        let handle = first.request_mint().await.unwrap();
        first.await_mint_confirmation(handle).await.unwrap();

        // A new session against the same storage picks up mid-cooldown
        clock.advance(10_000);
        let second = MintCooldownController::new(
            inking_config(),
            "0xfeed",
            kv,
            chain,
            Arc::new(RecordingNotifier::new()),
            clock.clone(),
        )
        .unwrap();
        second.initialize();
        let status = second.status();
        assert_eq!(status.minted_count, 1);
        assert_eq!(status.last_mint_at, Some(START_MS));
        assert_eq!(status.remaining_ms, 50_000);
        assert!(status.registered);
    }

    #[tokio::test]
    async fn test_counts_are_isolated_per_account_and_prefix() {
        let kv = Arc::new(InMemoryKvStore::new());
        let chain = Arc::new(MockChainClient::new(0));
        let clock = Arc::new(ManualClock::new(START_MS));

        let a = MintCooldownController::new(
            inking_config(),
            "0xaaaa",
            kv.clone(),
            chain.clone(),
            Arc::new(RecordingNotifier::new()),
            clock.clone(),
        )
        .unwrap();
        a.initialize();
        a.reconcile_on_chain_balance(5).unwrap();

        let b = MintCooldownController::new(
            inking_config(),
            "0xbbbb",
            kv.clone(),
            chain,
            Arc::new(RecordingNotifier::new()),
            clock,
        )
        .unwrap();
        b.initialize();
        assert_eq!(b.status().minted_count, 0);
        assert_eq!(
            kv.get("inking-nft-count-0xaaaa").unwrap(),
            Some("5".to_string())
        );
    }

    #[tokio::test]
    async fn test_degraded_storage_session_stays_functional() {
        let kv = Arc::new(InMemoryKvStore::new());
        let chain = Arc::new(MockChainClient::new(2));
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(ManualClock::new(START_MS));
        let controller = MintCooldownController::new(
            inking_config(),
            "0xfeed",
            kv.clone(),
            chain,
            notifier.clone(),
            clock.clone(),
        )
        .unwrap();

        kv.fail_reads(true);
        kv.fail_writes(true);
        controller.initialize();
        assert_eq!(controller.status().minted_count, 0);

        // Persistence fails but the in-memory session keeps working
        let err = controller.reconcile_on_chain_balance(2).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(controller.status().minted_count, 2);

        let err = controller.on_mint_confirmed(clock.now_ms()).unwrap_err();
        assert!(err.is_storage());
        let status = controller.status();
        assert_eq!(status.minted_count, 3);
        assert!(!status.eligible);
    }

    #[tokio::test]
    async fn test_chain_failure_is_surfaced_without_state_change() {
        let kv = Arc::new(InMemoryKvStore::new());
        let chain = Arc::new(MockChainClient::new(0));
        let clock = Arc::new(ManualClock::new(START_MS));
        let controller = MintCooldownController::new(
            inking_config(),
            "0xfeed",
            kv,
            chain.clone(),
            Arc::new(RecordingNotifier::new()),
            clock,
        )
        .unwrap();
        controller.initialize();

        chain.fail_calls(true);
        let err = controller.request_mint().await.unwrap_err();
        assert!(matches!(err, MintCooldownError::ChainCallFailed(_)));
        let err = controller.refresh_balance().await.unwrap_err();
        assert!(matches!(err, MintCooldownError::ChainCallFailed(_)));

        let status = controller.status();
        assert_eq!(status.minted_count, 0);
        assert!(status.eligible);
        assert!(status.last_error.is_some());
    }

    #[tokio::test]
    async fn test_reconciliation_commutes_with_confirmation() {
        let kv = Arc::new(InMemoryKvStore::new());
        let chain = Arc::new(MockChainClient::new(0));
        let clock = Arc::new(ManualClock::new(START_MS));
        let controller = MintCooldownController::new(
            inking_config(),
            "0xfeed",
            kv,
            chain,
            Arc::new(RecordingNotifier::new()),
            clock.clone(),
        )
        .unwrap();
        controller.initialize();

        // Confirmation lands before the (stale) balance read
        controller.on_mint_confirmed(clock.now_ms()).unwrap();
        controller.reconcile_on_chain_balance(0).unwrap();
        assert_eq!(controller.status().minted_count, 1);

        // A later read that includes the mint is a no-op
        controller.reconcile_on_chain_balance(1).unwrap();
        assert_eq!(controller.status().minted_count, 1);
    }
}
