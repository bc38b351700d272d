//! Long runs with several observers and backend restarts.
//!
//! ## Scenarios
//!
//! - CH-01: three observers churn for 2000 cycles without overlapping sessions
//! - CH-02: the same seed replays the same run
//! - CH-03: backend stop rate matches its configured cadence

#[cfg(test)]
mod tests {
    use crate::assertions::{
        assert_alternates, assert_backend_alternates, assert_no_attempts_while_stopped,
        assert_ticks_monotonic, count,
    };
    use crate::fixtures::{observer, quiet_config, Rig};
    use endurance_core::{Cadence, Config, Event, Termination};

    const OBSERVERS: [&str; 3] = ["parent_station_1", "parent_station_2", "parent_station_3"];

    fn churn_config(seed: u64) -> Config {
        let mut config = quiet_config(seed);
        config.observers.push(observer(OBSERVERS[0], 2, 2));
        config.observers.push(observer(OBSERVERS[1], 3, 5));
        config.observers.push(observer(OBSERVERS[2], 5, 3));
        config.backend.stop_every_cycles = Cadence::from(40);
        config.backend.start_every_cycles = Cadence::from(6);
        config.run.max_cycles = Some(2000);
        config
    }

    /// CH-01: Every observer alternates and no session is leaked.
    #[tokio::test(start_paused = true)]
    async fn ch_01_churn_keeps_sessions_exclusive() {
        let rig = Rig::new();
        let report = rig
            .harness(churn_config(41))
            .run(std::future::pending())
            .await
            .unwrap();

        assert!(matches!(report.termination, Termination::Finished { ref by } if by == "pacer"));
        assert_eq!(report.ticks, 2000);

        let entries = report.journal.entries();
        let mut results: Vec<_> = OBSERVERS
            .iter()
            .map(|name| assert_alternates(&entries, name))
            .collect();
        results.push(assert_no_attempts_while_stopped(&entries, true));
        results.push(assert_backend_alternates(&entries, true));
        results.push(assert_ticks_monotonic(&entries));
        for result in results {
            assert!(result.passed, "{}: {:?}", result.description, result.failure_details);
        }

        for name in OBSERVERS {
            let connects = count(&entries, |e| {
                matches!(e, Event::ObserverConnected { observer } if observer == name)
            });
            assert!(connects > 10, "{} connected only {} times", name, connects);
        }

        let attempts = count(&entries, |e| matches!(e, Event::ConnectAttempt { .. }));
        assert_eq!(rig.app.launcher().opened(), 1 + attempts);
        assert_eq!(rig.live_sessions(), 0);
    }

    /// CH-02: Two runs from one seed produce identical journals.
    #[tokio::test(start_paused = true)]
    async fn ch_02_seed_replays_run() {
        let mut config = churn_config(42);
        config.run.max_cycles = Some(300);

        let first = Rig::new()
            .harness(config.clone())
            .run(std::future::pending())
            .await
            .unwrap();
        let second = Rig::new()
            .harness(config)
            .run(std::future::pending())
            .await
            .unwrap();

        assert_eq!(first.seed, 42);
        assert_eq!(first.journal.entries(), second.journal.entries());
    }

    /// CH-03: Stop every 10 cycles, restart at once; stops land within
    /// four standard deviations of a tenth of the running cycles.
    #[tokio::test(start_paused = true)]
    async fn ch_03_stop_rate_matches_cadence() {
        let rig = Rig::new();
        let mut config = quiet_config(43);
        config.backend.stop_every_cycles = Cadence::from(10);
        config.backend.start_every_cycles = Cadence::ALWAYS;
        config.run.tick_ms = 1;
        config.run.max_cycles = Some(20_000);

        let report = rig.harness(config).run(std::future::pending()).await.unwrap();
        assert!(!report.is_failure(), "{}", report.termination);

        let entries = report.journal.entries();
        let stops = count(&entries, |e| matches!(e, Event::BackendStopped)) as f64;
        let starts = count(&entries, |e| matches!(e, Event::BackendStarted)) as f64;

        // every stopped cycle restarts, so the rest drew a stop trial
        let running_cycles = report.ticks as f64 - starts;
        let expected = running_cycles * 0.1;
        let sigma = (running_cycles * 0.1 * 0.9).sqrt();
        assert!(
            (stops - expected).abs() < 4.0 * sigma,
            "{} stops over {} running cycles",
            stops,
            running_cycles
        );
    }
}
