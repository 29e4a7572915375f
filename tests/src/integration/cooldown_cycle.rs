//! # Cooldown Cycle Integration Tests
//!
//! Drives the controller through full cooldown cycles at the production
//! tick resolution (100ms) and verifies the one-dispatch-per-cycle
//! contract from every angle: polling storms, rearming, opt-out during a
//! live window, and dispatch failure.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mint_cooldown::adapters::{
        InMemoryKvStore, ManualClock, MockChainClient, RecordingNotifier,
    };
    use mint_cooldown::{
        Clock, MintAppConfig, MintCooldownController, MintService, NotificationRegistration,
    };

    const COOLDOWN_MS: u64 = 60_000;
    const TICK_MS: u64 = 100;
    const START_MS: u64 = 1_700_000_000_000;

    struct Harness {
        controller: MintCooldownController,
        notifier: Arc<RecordingNotifier>,
        clock: Arc<ManualClock>,
    }

    fn harness() -> Harness {
        crate::init_tracing();
        let kv = Arc::new(InMemoryKvStore::new());
        let chain = Arc::new(MockChainClient::new(0));
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(ManualClock::new(START_MS));
        let controller = MintCooldownController::new(
            MintAppConfig::default(),
            "0x00aa",
            kv,
            chain,
            notifier.clone(),
            clock.clone(),
        )
        .unwrap();
        controller.initialize();
        Harness {
            controller,
            notifier,
            clock,
        }
    }

    fn registration() -> NotificationRegistration {
        NotificationRegistration {
            url: "https://api.host.example/v1/notify".to_string(),
            token: "tok-cycle".to_string(),
        }
    }

    /// Advance through one full cooldown window, ticking every 100ms
    async fn run_full_window(h: &Harness) {
        for _ in 0..(COOLDOWN_MS / TICK_MS) {
            h.controller.tick(h.clock.advance(TICK_MS)).await;
        }
    }

    #[tokio::test]
    async fn test_exactly_one_dispatch_across_600_ticks() {
        let h = harness();
        h.controller.set_notification_registration(registration()).unwrap();
        h.controller.on_mint_confirmed(h.clock.now_ms()).unwrap();

        // 600 ticks spanning the whole 60s window
        run_full_window(&h).await;

        assert_eq!(h.notifier.count(), 1);

        // Keep polling well past the edge: still one
        for _ in 0..100 {
            h.controller.tick(h.clock.advance(TICK_MS)).await;
        }
        assert_eq!(h.notifier.count(), 1);
    }

    #[tokio::test]
    async fn test_new_mint_rearms_dispatch() {
        let h = harness();
        h.controller.set_notification_registration(registration()).unwrap();

        h.controller.on_mint_confirmed(h.clock.now_ms()).unwrap();
        run_full_window(&h).await;
        assert_eq!(h.notifier.count(), 1);

        // Second cycle after a new confirmed mint
        h.controller.on_mint_confirmed(h.clock.now_ms()).unwrap();
        run_full_window(&h).await;
        assert_eq!(h.notifier.count(), 2);
    }

    #[tokio::test]
    async fn test_disable_during_cooldown_prevents_dispatch() {
        let h = harness();
        h.controller.set_notification_registration(registration()).unwrap();
        h.controller.on_mint_confirmed(h.clock.now_ms()).unwrap();

        // Opt out halfway through the window
        for _ in 0..300 {
            h.controller.tick(h.clock.advance(TICK_MS)).await;
        }
        h.controller.clear_notification_registration().unwrap();

        // Cross the edge and keep going
        for _ in 0..400 {
            h.controller.tick(h.clock.advance(TICK_MS)).await;
        }
        assert_eq!(h.notifier.count(), 0);
        assert!(h.controller.status().eligible);
    }

    #[tokio::test]
    async fn test_reenabling_after_missed_edge_does_not_fire_late() {
        let h = harness();
        h.controller.set_notification_registration(registration()).unwrap();
        h.controller.on_mint_confirmed(h.clock.now_ms()).unwrap();

        h.controller.clear_notification_registration().unwrap();
        run_full_window(&h).await;
        assert_eq!(h.notifier.count(), 0);

        // The edge already passed unregistered; re-opting in must not
        // produce a stale dispatch for the finished cycle
        h.controller.set_notification_registration(registration()).unwrap();
        for _ in 0..50 {
            h.controller.tick(h.clock.advance(TICK_MS)).await;
        }
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_failed_dispatch_forfeits_the_cycle() {
        let h = harness();
        h.controller.set_notification_registration(registration()).unwrap();
        h.notifier.fail_dispatch(true);
        h.controller.on_mint_confirmed(h.clock.now_ms()).unwrap();

        run_full_window(&h).await;
        // One attempt reached the endpoint and failed; no replay follows
        assert_eq!(h.notifier.count(), 1);
        for _ in 0..100 {
            h.controller.tick(h.clock.advance(TICK_MS)).await;
        }
        assert_eq!(h.notifier.count(), 1);

        // The next cycle gets a fresh attempt
        h.notifier.fail_dispatch(false);
        h.controller.on_mint_confirmed(h.clock.now_ms()).unwrap();
        run_full_window(&h).await;
        assert_eq!(h.notifier.count(), 2);
    }

    #[tokio::test]
    async fn test_watch_loop_dispatches_from_background_task() {
        let kv = Arc::new(InMemoryKvStore::new());
        let chain = Arc::new(MockChainClient::new(0));
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(ManualClock::new(START_MS));
        // Fast real-time ticks; logical time still comes from the manual clock
        let config = MintAppConfig {
            tick_interval_ms: 5,
            ..Default::default()
        };
        let controller = MintCooldownController::new(
            config,
            "0x00aa",
            kv,
            chain,
            notifier.clone(),
            clock.clone(),
        )
        .unwrap();
        controller.initialize();
        controller.on_mint_confirmed(clock.now_ms()).unwrap();
        controller.set_notification_registration(registration()).unwrap();
        controller.start_watch().unwrap();

        // Let the loop observe the active window, then expire it
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        clock.advance(COOLDOWN_MS);
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        controller.stop_watch();
        assert_eq!(notifier.count(), 1);
    }
}
