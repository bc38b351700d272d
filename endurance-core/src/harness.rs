//! Wiring: turns a [`Config`] plus a browser launcher and a backend control
//! into a ready-to-run actor queue.

use crate::account::Credentials;
use crate::backend::{backend_status, BackendStatus, BackendView};
use crate::clock::TickClock;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::fault_injector::FaultInjector;
use crate::journal::{Event, Journal};
use crate::observer::{Observer, ObserverContext};
use crate::pacer::Pacer;
use crate::scheduler::{Scheduler, Termination};
use crate::station::{AccountSetup, Station};
use crate::trial::SeedSequence;
use crate::{Actor, HarnessError};
use endurance_driver::SessionLauncher;
use endurance_infra::ServiceControl;
use futures_util::FutureExt;
use std::future::Future;
use std::sync::Arc;

/// Builds and runs one endurance run.
pub struct Harness {
    config: Config,
    launcher: Arc<dyn SessionLauncher>,
    control: Arc<dyn ServiceControl>,
}

impl Harness {
    /// Create a harness.
    pub fn new(
        config: Config,
        launcher: Arc<dyn SessionLauncher>,
        control: Arc<dyn ServiceControl>,
    ) -> Self {
        Self {
            config,
            launcher,
            control,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start the station and build the actor queue.
    ///
    /// Queue order is station, observers (in configured order), fault
    /// injector, pacer.
    pub async fn assemble(&self) -> Result<Assembly, HarnessError> {
        self.assemble_until(std::future::pending::<()>()).await
    }

    /// Like [`Self::assemble`], but gives up with
    /// [`HarnessError::Interrupted`] once `shutdown` completes.
    ///
    /// `shutdown` is polled once before anything is opened, then raced
    /// against station bring-up.
    pub async fn assemble_until<F>(&self, shutdown: F) -> Result<Assembly, HarnessError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let config = &self.config;
        config.validate()?;

        if shutdown.as_mut().now_or_never().is_some() {
            return Err(HarnessError::Interrupted);
        }

        let clock = TickClock::new();
        let journal = match &config.run.journal_path {
            Some(path) => {
                let journal = Journal::with_file(clock.clone(), path).map_err(|source| {
                    HarnessError::Journal {
                        path: path.clone(),
                        source,
                    }
                })?;
                tracing::info!(path = %path.display(), "journal streaming to file");
                journal
            }
            None => Journal::new(clock.clone()),
        };
        let diagnostics = Diagnostics::new(config.run.diagnostics_dir.clone(), clock.clone());
        let mut seeds = match config.run.seed {
            Some(seed) => SeedSequence::new(seed),
            None => SeedSequence::from_entropy(),
        };
        tracing::info!(seed = seeds.seed(), "trial seed");

        let (credentials, setup) = match config.account.credentials() {
            Some(credentials) => (credentials, AccountSetup::Login),
            None => (Credentials::generate(), AccountSetup::Create),
        };

        let verify = config.backend.verify_transitions;
        let initial = if verify {
            BackendStatus::from_running(self.control.is_running().await?)
        } else {
            BackendStatus::Running
        };
        tracing::info!(service = self.control.service(), status = %initial, "backend");
        let switch = backend_status(initial);
        let backend = switch.view();

        let station = Station::start(
            self.launcher.as_ref(),
            &config.app,
            &credentials,
            setup,
            diagnostics.clone(),
            &journal,
            shutdown.as_mut(),
        )
        .await?;

        let mut actors: Vec<Box<dyn Actor>> = vec![Box::new(station)];

        let ctx = ObserverContext {
            launcher: Arc::clone(&self.launcher),
            app: config.app.clone(),
            credentials,
            backend: backend.clone(),
            journal: journal.clone(),
            diagnostics,
        };
        for observer in &config.observers {
            actors.push(Box::new(Observer::new(
                observer,
                seeds.next_trials(),
                ctx.clone(),
            )));
        }

        actors.push(Box::new(
            FaultInjector::new(
                Arc::clone(&self.control),
                switch,
                config.backend.stop_every_cycles.probability(),
                config.backend.start_every_cycles.probability(),
                seeds.next_trials(),
                journal.clone(),
            )
            .verify_transitions(verify),
        ));

        actors.push(Box::new(
            Pacer::new(config.run.tick(), clock.clone()).budget(config.run.max_cycles),
        ));

        Ok(Assembly {
            scheduler: Scheduler::new(actors),
            clock,
            journal,
            backend,
            seed: seeds.seed(),
        })
    }

    /// Assemble and run until termination.
    ///
    /// `shutdown` covers startup too: completing it while the station comes
    /// up returns [`HarnessError::Interrupted`].
    pub async fn run<F>(&self, shutdown: F) -> Result<RunReport, HarnessError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let assembly = self.assemble_until(shutdown.as_mut()).await?;
        Ok(assembly.run(shutdown).await)
    }
}

/// A started station plus the queued actors, ready to run.
pub struct Assembly {
    scheduler: Scheduler,
    clock: TickClock,
    journal: Journal,
    backend: BackendView,
    seed: u64,
}

impl Assembly {
    /// Append an extra actor after the pacer.
    pub fn push(&mut self, actor: Box<dyn Actor>) {
        self.scheduler.push(actor);
    }

    /// Names of the queued actors, in order.
    pub fn actor_names(&self) -> Vec<&str> {
        self.scheduler.names()
    }

    /// The run's cycle counter.
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// The run's journal.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Read-only backend status.
    pub fn backend(&self) -> &BackendView {
        &self.backend
    }

    /// Master seed of every trial stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Drive the scheduler to termination.
    pub async fn run<F>(mut self, shutdown: F) -> RunReport
    where
        F: Future<Output = ()>,
    {
        tracing::info!(actors = ?self.scheduler.names(), "run starting");
        let termination = self.scheduler.run(shutdown).await;
        let ticks = self.clock.now();

        match &termination {
            Termination::Fatal { actor, error } => {
                tracing::error!(%actor, %error, ticks, "run failed")
            }
            other => tracing::info!(termination = %other, ticks, "run ended"),
        }

        self.journal.record(Event::RunEnded {
            termination: termination.to_string(),
            backend: self.backend.status(),
        });

        RunReport {
            termination,
            ticks,
            steps: self.scheduler.steps(),
            seed: self.seed,
            journal: self.journal,
        }
    }
}

/// Outcome of a run.
#[derive(Debug)]
pub struct RunReport {
    /// Why the run ended.
    pub termination: Termination,
    /// Completed cycles.
    pub ticks: u64,
    /// Actor steps executed.
    pub steps: u64,
    /// Master seed, for replaying the trial sequence.
    pub seed: u64,
    /// Everything that happened.
    pub journal: Journal,
}

impl RunReport {
    /// Returns true if the run ended on a fatal step.
    pub fn is_failure(&self) -> bool {
        self.termination.is_fatal()
    }
}
