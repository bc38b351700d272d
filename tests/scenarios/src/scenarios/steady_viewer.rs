//! A single observer that connects at once and never lets go.
//!
//! ## Scenarios
//!
//! - SV-01: connects in the first cycle and stays connected for 1001 cycles
//! - SV-02: the station keeps streaming for the whole run
//! - SV-03: the journal is on disk, one JSON line per event

#[cfg(test)]
mod tests {
    use crate::assertions::{
        assert_alternates, assert_connected_by, assert_never_disconnected, assert_ticks_monotonic,
        count,
    };
    use crate::fixtures::{observer, quiet_config, Rig};
    use endurance_core::{Event, Termination};

    const VIEWER: &str = "parent_station_1";

    fn steady_config() -> endurance_core::Config {
        let mut config = quiet_config(11);
        config.observers.push(observer(VIEWER, 1, 0));
        config.run.max_cycles = Some(1001);
        config
    }

    /// SV-01: One observer with connect every cycle and no disconnects.
    #[tokio::test(start_paused = true)]
    async fn sv_01_connects_once_and_stays() {
        let rig = Rig::new();
        let report = rig
            .harness(steady_config())
            .run(std::future::pending())
            .await
            .unwrap();

        assert!(matches!(report.termination, Termination::Finished { ref by } if by == "pacer"));
        assert_eq!(report.ticks, 1001);

        let entries = report.journal.entries();
        for result in [
            assert_connected_by(&entries, VIEWER, 0),
            assert_never_disconnected(&entries, VIEWER),
            assert_alternates(&entries, VIEWER),
            assert_ticks_monotonic(&entries),
        ] {
            assert!(result.passed, "{}: {:?}", result.description, result.failure_details);
        }
        assert_eq!(
            count(&entries, |e| matches!(e, Event::ConnectAttempt { .. })),
            1
        );

        // station plus the one observer session, both closed at the end
        assert_eq!(rig.app.launcher().opened(), 2);
        assert_eq!(rig.live_sessions(), 0);
    }

    /// SV-02: Station checks pass every cycle while the toggle reads Stop.
    #[tokio::test(start_paused = true)]
    async fn sv_02_station_streams_throughout() {
        let rig = Rig::new();
        let mut config = quiet_config(12);
        config.run.max_cycles = Some(500);

        let report = rig.harness(config).run(std::future::pending()).await.unwrap();

        assert!(!report.is_failure());
        assert_eq!(report.ticks, 500);
        // station, fault injector, pacer
        assert_eq!(report.steps, 500 * 3);
        let entries = report.journal.entries();
        assert_eq!(
            count(&entries, |e| matches!(e, Event::StationStreaming)),
            1
        );
    }

    /// SV-03: Journal lands on disk as JSON lines with the run's events.
    #[tokio::test(start_paused = true)]
    async fn sv_03_journal_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("journal.jsonl");
        let rig = Rig::new();
        let mut config = steady_config();
        config.run.max_cycles = Some(10);
        config.run.journal_path = Some(path.clone());

        let report = rig.harness(config).run(std::future::pending()).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), report.journal.entries().len());
        assert!(written.starts_with("{\"tick\":0,\"event\":\"station_streaming\"}"));
        assert!(written.contains("\"observer_connected\""));
        assert!(written.contains("\"run_ended\""));
    }
}
