//! Deploy Use Case
//!
//! Orchestrates the two-phase deployment protocol:
//! 1. Prepare: resolve credentials and parse tasks for every host
//! 2. Precheck: check every task of every host; any failure aborts the run
//!    before a single connection is opened
//! 3. Deploy: per host, open one connection, run its tasks in order, close
//!
//! Hosts deploy sequentially unless `DeployOptions::jobs` allows a bounded
//! worker pool. Either way the precheck barrier is global and each host's
//! tasks keep their declared order.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use tracing::{debug, info, warn};

use crate::config::HostSpec;
use crate::domain::entities::{HostJob, JobState, Task, TaskAction, TaskOutcome};
use crate::domain::ports::{
    Connection, Connector, CredentialResolver, DeployEvent, DeployEventSink, NoopEventSink,
};

use super::error::DeployError;
use super::options::DeployOptions;
use super::result::DeployResult;

/// Deploy use case - orchestrates precheck and deploy across hosts
///
/// Parameterized by its ports so tests can run it against an in-memory
/// transport.
pub struct DeployUseCase<C, R>
where
    C: Connector,
    R: CredentialResolver,
{
    connector: C,
    resolver: R,
    event_sink: Arc<dyn DeployEventSink>,
}

impl<C, R> DeployUseCase<C, R>
where
    C: Connector,
    R: CredentialResolver,
{
    pub fn new(connector: C, resolver: R) -> Self {
        Self {
            connector,
            resolver,
            event_sink: Arc::new(NoopEventSink),
        }
    }

    pub fn with_event_sink(mut self, event_sink: Arc<dyn DeployEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Run the whole protocol for the given hosts
    pub fn execute(
        &self,
        hosts: &[HostSpec],
        options: &DeployOptions,
    ) -> Result<DeployResult, DeployError> {
        let mut jobs = self.prepare(hosts)?;
        let tasks = jobs.iter().map(|job| job.tasks().len()).sum();

        self.event_sink.on_event(DeployEvent::Started {
            hosts: jobs.len(),
            tasks,
        });

        self.precheck_all(&mut jobs)?;
        self.event_sink
            .on_event(DeployEvent::PrecheckPassed { hosts: jobs.len() });

        let mut result = DeployResult {
            hosts: jobs.len(),
            tasks,
            prechecked: tasks,
            check_only: options.check_only,
            ..DeployResult::new()
        };

        if !options.check_only {
            result.executed = self.deploy_all(&mut jobs, options.jobs)?;
            result.deployed_hosts = jobs
                .iter()
                .filter(|job| job.state() == JobState::Deployed)
                .map(HostJob::id)
                .collect();
        }

        self.event_sink.on_event(DeployEvent::Completed {
            hosts: result.hosts,
            tasks: if options.check_only {
                result.prechecked
            } else {
                result.executed
            },
            check_only: options.check_only,
        });

        Ok(result)
    }

    /// Resolve credentials and parse tasks; fails on the first bad host
    pub fn prepare(&self, hosts: &[HostSpec]) -> Result<Vec<HostJob>, DeployError> {
        hosts
            .iter()
            .enumerate()
            .map(|(host, spec)| {
                let credentials = self
                    .resolver
                    .resolve(&spec.connection)
                    .map_err(|source| DeployError::Credentials { host, source })?;

                let tasks = spec
                    .tasks
                    .iter()
                    .map(|raw| {
                        Task::parse(raw).map_err(|source| DeployError::Parse {
                            host,
                            task: raw.clone(),
                            source,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                debug!(host, remote = %credentials.target(), tasks = tasks.len(), "host parsed");
                Ok(HostJob::new(host, credentials, tasks))
            })
            .collect()
    }

    /// Precheck every task of every job, in order
    pub fn precheck_all(&self, jobs: &mut [HostJob]) -> Result<(), DeployError> {
        for job in jobs.iter_mut() {
            let host = job.id();
            let failure = job.tasks().iter().find_map(|task| {
                task.precheck()
                    .err()
                    .map(|source| (task.raw().to_string(), source))
            });

            if let Some((task, source)) = failure {
                job.mark_failed();
                return Err(DeployError::Precheck { host, task, source });
            }

            job.mark_prechecked();
            debug!(host, "precheck passed");
            self.event_sink.on_event(DeployEvent::HostPrechecked {
                host,
                tasks: job.tasks().len(),
            });
        }
        Ok(())
    }

    /// Deploy every prechecked job, returning the number of tasks executed
    pub fn deploy_all(&self, jobs: &mut [HostJob], workers: usize) -> Result<usize, DeployError> {
        if workers <= 1 || jobs.len() <= 1 {
            let mut executed = 0;
            for job in jobs.iter_mut() {
                executed += self.deploy_host(job)?;
            }
            return Ok(executed);
        }
        self.deploy_parallel(jobs, workers.min(jobs.len()))
    }

    /// Deploy one job over a single connection
    pub fn deploy_host(&self, job: &mut HostJob) -> Result<usize, DeployError> {
        let host = job.id();
        let target = job.credentials().target();

        if job.state() != JobState::Prechecked {
            return Err(DeployError::NotPrechecked { host, target });
        }

        info!(host, remote = %target, tasks = job.tasks().len(), "deploying host");
        self.event_sink.on_event(DeployEvent::HostStarted {
            host,
            target: target.clone(),
        });

        let mut connection = match self.connector.connect(job.credentials()) {
            Ok(connection) => connection,
            Err(source) => {
                job.mark_failed();
                return Err(DeployError::Connect {
                    host,
                    target,
                    source,
                });
            }
        };

        let outcome = self.run_tasks(job, &mut connection);

        if let Err(err) = connection.close() {
            warn!(host, remote = %target, error = %err, "error closing connection");
        }

        match outcome {
            Ok(executed) => {
                job.mark_deployed();
                self.event_sink.on_event(DeployEvent::HostCompleted {
                    host,
                    tasks: executed,
                });
                Ok(executed)
            }
            Err(err) => {
                job.mark_failed();
                Err(err)
            }
        }
    }

    fn run_tasks(&self, job: &HostJob, connection: &mut Connection) -> Result<usize, DeployError> {
        let host = job.id();
        let remote_dir = job.remote_dir();

        for (index, task) in job.tasks().iter().enumerate() {
            self.event_sink.on_event(DeployEvent::TaskStarted {
                host,
                index,
                task: task.raw().to_string(),
            });

            let outcome =
                task.execute(connection, &remote_dir)
                    .map_err(|source| DeployError::Execute {
                        host,
                        index,
                        task: task.raw().to_string(),
                        source,
                    })?;

            match (outcome, task.action()) {
                (TaskOutcome::Command { output }, TaskAction::Command { command_line }) => {
                    debug!(
                        host,
                        index,
                        command = %command_line,
                        output = %output.trim_end(),
                        "command finished"
                    );
                    self.event_sink.on_event(DeployEvent::CommandOutput {
                        host,
                        index,
                        command: command_line.clone(),
                        output,
                    });
                }
                (TaskOutcome::Transferred { bytes }, _) => {
                    debug!(host, index, bytes, "transfer finished");
                }
                (TaskOutcome::Command { .. }, _) => {}
            }

            self.event_sink
                .on_event(DeployEvent::TaskCompleted { host, index });
        }

        Ok(job.tasks().len())
    }

    /// Bounded worker pool over jobs in input order.
    ///
    /// After the first failure no new job is started; the error reported is
    /// the one with the lowest host id.
    fn deploy_parallel(&self, jobs: &mut [HostJob], workers: usize) -> Result<usize, DeployError> {
        let queue = Mutex::new(jobs.iter_mut());
        let abort = AtomicBool::new(false);
        let executed = AtomicUsize::new(0);
        let failures = Mutex::new(Vec::new());

        thread::scope(|scope| {
            for worker in 0..workers {
                let (queue, abort, executed, failures) = (&queue, &abort, &executed, &failures);
                scope.spawn(move || {
                    debug!(worker, "deploy worker started");
                    while !abort.load(Ordering::SeqCst) {
                        let next = queue
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .next();
                        let Some(job) = next else {
                            break;
                        };
                        match self.deploy_host(job) {
                            Ok(count) => {
                                executed.fetch_add(count, Ordering::SeqCst);
                            }
                            Err(err) => {
                                abort.store(true, Ordering::SeqCst);
                                failures
                                    .lock()
                                    .unwrap_or_else(PoisonError::into_inner)
                                    .push(err);
                            }
                        }
                    }
                });
            }
        });

        let mut failures = failures
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        failures.sort_by_key(DeployError::host);
        match failures.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(executed.into_inner()),
        }
    }
}
