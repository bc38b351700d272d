//! Observers and a stopped backend.
//!
//! ## Scenarios
//!
//! - BD-01: backend down for the whole run, nobody attempts to connect
//! - BD-02: backend comes back, observers connect from the next cycle on
//! - BD-03: stops and restarts never overlap a connect attempt

#[cfg(test)]
mod tests {
    use crate::assertions::{
        assert_backend_alternates, assert_connected_by, assert_no_attempts_while_stopped, count,
    };
    use crate::fixtures::{observer, quiet_config, Rig};
    use endurance_core::{BackendStatus, Cadence, Event, Termination};
    use endurance_infra::MockServiceControl;

    /// BD-01: Stopped backend, never restarted.
    #[tokio::test(start_paused = true)]
    async fn bd_01_no_attempts_while_stopped() {
        let rig = Rig::with_control(MockServiceControl::stopped());
        let mut config = quiet_config(21);
        config.observers.push(observer("parent_station_1", 1, 1));
        config.run.max_cycles = Some(100);

        let report = rig.harness(config).run(std::future::pending()).await.unwrap();

        assert!(matches!(report.termination, Termination::Finished { .. }));
        let entries = report.journal.entries();
        assert_eq!(
            count(&entries, |e| matches!(e, Event::ConnectAttempt { .. })),
            0
        );
        assert!(matches!(
            entries.last().map(|e| &e.event),
            Some(Event::RunEnded {
                backend: BackendStatus::Stopped,
                ..
            })
        ));
        // only the station ever opened a browser
        assert_eq!(rig.app.launcher().opened(), 1);
        assert_eq!(rig.control.starts(), 0);
    }

    /// BD-02: Injector restarts the backend in cycle 1; the observer, queued
    /// ahead of it, connects in cycle 2.
    #[tokio::test(start_paused = true)]
    async fn bd_02_connects_after_restart() {
        let rig = Rig::with_control(MockServiceControl::stopped());
        let mut config = quiet_config(22);
        config.observers.push(observer("parent_station_1", 1, 0));
        config.backend.start_every_cycles = Cadence::ALWAYS;
        config.run.max_cycles = Some(5);

        let report = rig.harness(config).run(std::future::pending()).await.unwrap();
        let entries = report.journal.entries();

        let started = entries
            .iter()
            .find(|e| e.event == Event::BackendStarted)
            .map(|e| e.tick);
        assert_eq!(started, Some(0));

        let first_attempt = entries
            .iter()
            .find(|e| matches!(e.event, Event::ConnectAttempt { .. }))
            .map(|e| e.tick);
        assert_eq!(first_attempt, Some(1));

        let connected = assert_connected_by(&entries, "parent_station_1", 1);
        assert!(connected.passed, "{:?}", connected.failure_details);
        assert!(rig.control.is_up());
    }

    /// BD-03: Frequent stops and starts with eager observers.
    #[tokio::test(start_paused = true)]
    async fn bd_03_attempts_only_while_running() {
        let rig = Rig::new();
        let mut config = quiet_config(23);
        config.observers.push(observer("parent_station_1", 2, 3));
        config.observers.push(observer("parent_station_2", 4, 2));
        config.backend.stop_every_cycles = Cadence::from(8);
        config.backend.start_every_cycles = Cadence::from(3);
        config.run.max_cycles = Some(1000);

        let report = rig.harness(config).run(std::future::pending()).await.unwrap();
        assert!(!report.is_failure(), "{}", report.termination);

        let entries = report.journal.entries();
        for result in [
            assert_no_attempts_while_stopped(&entries, true),
            assert_backend_alternates(&entries, true),
        ] {
            assert!(result.passed, "{}: {:?}", result.description, result.failure_details);
        }

        let stops = count(&entries, |e| matches!(e, Event::BackendStopped));
        assert!(stops > 0);
        assert_eq!(stops, rig.control.stops());
        assert_eq!(rig.live_sessions(), 0);
    }
}
