//! The first failing check ends the run.
//!
//! ## Scenarios
//!
//! - FL-01: stream disappears in cycle 5, run halts before cycle 6
//! - FL-02: station stops streaming, the station is blamed
//! - FL-03: backend stop command fails
//! - FL-04: backend ignores a stop command
//! - FL-05: observer cannot open a browser
//! - FL-06: Ctrl-C before the first cycle
//! - FL-07: Ctrl-C while the station is still starting

#[cfg(test)]
mod tests {
    use crate::fixtures::{observer, quiet_config, Rig, Saboteur};
    use endurance_core::{BackendStatus, Cadence, Event, FatalError, HarnessError, Termination};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const VIEWER: &str = "parent_station_1";

    fn fatal(termination: &Termination) -> (&str, &FatalError) {
        match termination {
            Termination::Fatal { actor, error } => (actor.as_str(), error),
            other => panic!("expected a fatal termination, got {}", other),
        }
    }

    /// FL-01: Observer sees the stream vanish on cycle 5.
    #[tokio::test(start_paused = true)]
    async fn fl_01_stream_loss_halts_before_next_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let rig = Rig::new();
        let mut config = quiet_config(31);
        config.observers.push(observer(VIEWER, 1, 0));
        config.run.diagnostics_dir = Some(dir.path().to_path_buf());

        let mut assembly = rig.harness(config).assemble().await.unwrap();
        let app = rig.app.clone();
        let saboteur = Saboteur::new(assembly.clock().clone(), 4, move || app.hide_stream());
        let saboteur_steps = saboteur.steps();
        assembly.push(Box::new(saboteur));

        let report = assembly.run(std::future::pending()).await;

        let (actor, error) = fatal(&report.termination);
        assert_eq!(actor, VIEWER);
        assert!(matches!(error, FatalError::Invariant { detail, .. } if detail.contains("not displayed")));
        assert_eq!(report.ticks, 4);
        // four full passes of five actors, then station and observer
        assert_eq!(report.steps, 4 * 5 + 2);
        assert_eq!(saboteur_steps.load(Ordering::SeqCst), 4);

        assert!(dir.path().join(format!("{}-4.png", VIEWER)).exists());
        assert_eq!(rig.live_sessions(), 0);
    }

    /// FL-02: Station toggle flips back to Start.
    #[tokio::test(start_paused = true)]
    async fn fl_02_station_stops_streaming() {
        let rig = Rig::new();
        let mut config = quiet_config(32);
        config.observers.push(observer(VIEWER, 1, 0));

        let mut assembly = rig.harness(config).assemble().await.unwrap();
        let app = rig.app.clone();
        assembly.push(Box::new(Saboteur::new(
            assembly.clock().clone(),
            2,
            move || app.stop_streaming(),
        )));

        let report = assembly.run(std::future::pending()).await;

        let (actor, error) = fatal(&report.termination);
        assert_eq!(actor, "station");
        assert!(matches!(error, FatalError::Invariant { .. }));
        assert_eq!(report.ticks, 2);
        assert_eq!(rig.live_sessions(), 0);
    }

    /// FL-03: Stop command errors out.
    #[tokio::test(start_paused = true)]
    async fn fl_03_backend_command_failure() {
        let rig = Rig::new();
        rig.control.fail_next_stop("daemon unreachable");
        let mut config = quiet_config(33);
        config.backend.stop_every_cycles = Cadence::ALWAYS;

        let report = rig.harness(config).run(std::future::pending()).await.unwrap();

        let (actor, error) = fatal(&report.termination);
        assert_eq!(actor, "fault-injector");
        assert!(matches!(error, FatalError::Infra { .. }));
        assert!(error.to_string().contains("daemon unreachable"));
        assert_eq!(report.ticks, 0);
        assert!(rig.control.is_up());
    }

    /// FL-04: Stop reports success but the backend keeps running.
    #[tokio::test(start_paused = true)]
    async fn fl_04_backend_ignores_stop() {
        let rig = Rig::new();
        rig.control.ignore_commands(true);
        let mut config = quiet_config(34);
        config.backend.stop_every_cycles = Cadence::ALWAYS;

        let report = rig.harness(config).run(std::future::pending()).await.unwrap();

        let (actor, error) = fatal(&report.termination);
        assert_eq!(actor, "fault-injector");
        assert!(matches!(
            error,
            FatalError::BackendMismatch {
                expected: BackendStatus::Stopped,
                observed: BackendStatus::Running,
                ..
            }
        ));
        // the cell was never switched, so the journal has no stop either
        let entries = report.journal.entries();
        assert!(!entries.iter().any(|e| e.event == Event::BackendStopped));
    }

    /// FL-05: Browser session for the observer cannot be opened.
    #[tokio::test(start_paused = true)]
    async fn fl_05_observer_session_fails_to_open() {
        let rig = Rig::new();
        let mut config = quiet_config(35);
        config.observers.push(observer(VIEWER, 1, 0));

        let assembly = rig.harness(config).assemble().await.unwrap();
        rig.app.launcher().fail_next_open("hub out of nodes");
        let report = assembly.run(std::future::pending()).await;

        let (actor, error) = fatal(&report.termination);
        assert_eq!(actor, VIEWER);
        assert!(matches!(error, FatalError::Driver { .. }));
        assert_eq!(report.ticks, 0);
        assert_eq!(rig.live_sessions(), 0);
    }

    /// FL-06: Shutdown signalled once the station is streaming.
    #[tokio::test(start_paused = true)]
    async fn fl_06_interrupt_releases_station() {
        let rig = Rig::new();
        let mut config = quiet_config(36);
        config.observers.push(observer(VIEWER, 1, 0));

        let assembly = rig.harness(config).assemble().await.unwrap();
        assert_eq!(rig.live_sessions(), 1);
        let report = assembly.run(std::future::ready(())).await;

        assert!(matches!(report.termination, Termination::Interrupted));
        assert!(!report.is_failure());
        assert_eq!((report.ticks, report.steps), (0, 0));
        assert_eq!(rig.live_sessions(), 0);

        let entries = report.journal.entries();
        assert!(matches!(
            entries.last().map(|e| &e.event),
            Some(Event::RunEnded { termination, .. }) if termination == "interrupted"
        ));
    }

    /// FL-07: Shutdown signalled while the station is still coming up.
    #[tokio::test(start_paused = true)]
    async fn fl_07_interrupt_during_startup_closes_station() {
        let rig = Rig::new();
        rig.app.stall_station();

        let err = rig
            .harness(quiet_config(37))
            .run(tokio::time::sleep(Duration::from_secs(3)))
            .await;

        assert!(matches!(err, Err(HarnessError::Interrupted)));
        assert_eq!(rig.app.launcher().opened(), 1);
        assert_eq!(rig.live_sessions(), 0);
    }
}
