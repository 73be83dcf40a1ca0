//! Concurrent evaluation of a configuration grid.
//!
//! Every grid point gets its own predictor and its own trace reader, so
//! workers share no mutable state and need no locks around predictor
//! tables. A failed evaluation is reported as its own outcome and never
//! disturbs sibling runs.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use itertools::iproduct;
use thiserror::Error;

use crate::predictor::{BimodalPredictor, ConfigError};
use crate::sim::{self, EvalError, EvalStats};
use crate::trace::TraceReader;

/// Default number of pool workers.
pub const DEFAULT_WORKERS: usize = 4;

/// Default counter widths swept by the grid.
pub const DEFAULT_COUNTER_BITS: &[u32] = &[1, 2, 3, 4, 5];

/// Default table address widths swept by the grid.
pub const DEFAULT_ADDR_BITS: &[u32] = &[3, 6, 9, 12, 15];

/// Any failure of one evaluation run, construction or replay.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// One point of the configuration grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub counter_bits: u32,
    pub addr_bits: u32,
    pub trace: PathBuf,
}

impl RunConfig {
    /// Build a fresh predictor and trace reader, then replay the whole
    /// trace once.
    pub fn run(&self) -> Result<EvalStats, RunError> {
        let mut bp = BimodalPredictor::new(self.counter_bits, self.addr_bits)?;
        let trace = TraceReader::open(&self.trace).map_err(EvalError::from)?;
        Ok(sim::evaluate(&mut bp, trace)?)
    }
}

impl std::fmt::Display for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.trace.display(),
            self.counter_bits,
            self.addr_bits
        )
    }
}

/// The result of one grid point, success or failure.
#[derive(Debug)]
pub struct SweepOutcome {
    pub config: RunConfig,
    pub result: Result<EvalStats, RunError>,
}

/// The full parameter grid for one sweep.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    pub counter_bits: Vec<u32>,
    pub addr_bits: Vec<u32>,
    pub traces: Vec<PathBuf>,
    pub workers: usize,
}

impl SweepConfig {
    /// Sweep `traces` with the default parameter grid.
    pub fn with_default_grid(traces: Vec<PathBuf>) -> Self {
        Self {
            counter_bits: DEFAULT_COUNTER_BITS.to_vec(),
            addr_bits: DEFAULT_ADDR_BITS.to_vec(),
            traces,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Number of grid points this sweep will evaluate.
    pub fn grid_size(&self) -> usize {
        self.counter_bits.len() * self.addr_bits.len() * self.traces.len()
    }
}

enum Task {
    Run(Job),
    Terminate,
}

type Job = Box<dyn FnOnce() -> SweepOutcome + Send + 'static>;
type SharedTaskReceiver = Arc<Mutex<Receiver<Task>>>;

/// A fixed-size pool of workers executing independent evaluation runs.
///
/// Jobs queue on a shared channel; each worker pulls the next job when
/// idle and sends its outcome back on a result channel, so outcomes
/// arrive in completion order, not submission order.
pub struct SweepRunner {
    workers: Vec<Worker>,
    task_tx: Sender<Task>,
    outcome_rx: Receiver<SweepOutcome>,
}

impl SweepRunner {
    /// Spawn a pool of `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        let (task_tx, task_rx) = mpsc::channel();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        let task_rx = Arc::new(Mutex::new(task_rx));
        let workers = (0..workers)
            .map(|_| Worker::spawn(Arc::clone(&task_rx), outcome_tx.clone()))
            .collect();

        Self {
            workers,
            task_tx,
            outcome_rx,
        }
    }

    /// Queue one evaluation run.
    pub fn submit(&mut self, config: RunConfig) {
        log::debug!("submitting {}", config);
        let job = Box::new(move || {
            let result = config.run();
            SweepOutcome { config, result }
        });
        if self.task_tx.send(Task::Run(job)).is_err() {
            // Only possible once every worker has died.
            log::error!("worker pool is gone, dropping submission");
        }
    }

    /// Signal that no more work is coming and hand back the outcomes.
    ///
    /// The returned iterator blocks on each `next` until another run
    /// finishes, then joins the pool once the last outcome is drained.
    pub fn finish(self) -> SweepResults {
        for _ in &self.workers {
            let _ = self.task_tx.send(Task::Terminate);
        }
        SweepResults {
            workers: self.workers,
            outcome_rx: self.outcome_rx,
        }
    }
}

/// Iterator over sweep outcomes in completion order.
pub struct SweepResults {
    workers: Vec<Worker>,
    outcome_rx: Receiver<SweepOutcome>,
}

impl Iterator for SweepResults {
    type Item = SweepOutcome;
    fn next(&mut self) -> Option<Self::Item> {
        self.outcome_rx.recv().ok()
    }
}

/// Join all worker handles.
impl Drop for SweepResults {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }
    }
}

/// A worker thread waiting for evaluation jobs.
struct Worker {
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn a thread and enter a loop, pulling the next queued job or
    /// exiting on a terminate message (or a closed queue).
    fn spawn(tasks: SharedTaskReceiver, outcomes: Sender<SweepOutcome>) -> Self {
        let handle = thread::spawn(move || loop {
            let task = {
                let Ok(queue) = tasks.lock() else { break };
                match queue.recv() {
                    Ok(task) => task,
                    Err(_) => break,
                }
            };
            match task {
                Task::Run(job) => {
                    if outcomes.send(job()).is_err() {
                        break;
                    }
                }
                Task::Terminate => break,
            }
        });
        Self {
            handle: Some(handle),
        }
    }
}

/// Enumerate the cartesian grid of a [`SweepConfig`] and run every
/// point on the pool.
pub fn run_sweep(cfg: &SweepConfig) -> SweepResults {
    let mut runner = SweepRunner::new(cfg.workers);
    log::info!(
        "sweeping {} configurations on {} workers",
        cfg.grid_size(),
        cfg.workers.max(1)
    );
    for (&counter_bits, &addr_bits, trace) in
        iproduct!(&cfg.counter_bits, &cfg.addr_bits, &cfg.traces)
    {
        runner.submit(RunConfig {
            counter_bits,
            addr_bits,
            trace: trace.clone(),
        });
    }
    runner.finish()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// A trace file that is cleaned up when the test is done with it.
    struct TempTrace(PathBuf);
    impl TempTrace {
        fn write(name: &str, text: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "bimodal-{}-{}.trace",
                name,
                std::process::id()
            ));
            fs::write(&path, text).unwrap();
            Self(path)
        }
        fn path(&self) -> &Path {
            &self.0
        }
    }
    impl Drop for TempTrace {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn run_config_reports_known_accuracy() {
        let trace = TempTrace::write("ref", "4 1\n4 1\n4 0\n");
        let cfg = RunConfig {
            counter_bits: 2,
            addr_bits: 1,
            trace: trace.path().to_path_buf(),
        };
        let stats = cfg.run().unwrap();
        assert_eq!((stats.hits, stats.brns), (1, 3));
    }

    #[test]
    fn bad_configuration_fails_without_touching_the_trace() {
        let cfg = RunConfig {
            counter_bits: 0,
            addr_bits: 3,
            trace: PathBuf::from("/nonexistent/never-opened.trace"),
        };
        assert!(matches!(
            cfg.run(),
            Err(RunError::Config(ConfigError::CounterBits(0)))
        ));
    }

    #[test]
    fn failures_do_not_abort_sibling_runs() {
        let trace = TempTrace::write("mixed", "4 1\n8 0\n4 1\n");
        let mut runner = SweepRunner::new(2);
        runner.submit(RunConfig {
            counter_bits: 0, // invalid
            addr_bits: 3,
            trace: trace.path().to_path_buf(),
        });
        runner.submit(RunConfig {
            counter_bits: 2,
            addr_bits: 3,
            trace: trace.path().to_path_buf(),
        });
        runner.submit(RunConfig {
            counter_bits: 2,
            addr_bits: 3,
            trace: PathBuf::from("/nonexistent/missing.trace"),
        });

        let outcomes: Vec<_> = runner.finish().collect();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.iter().filter(|o| o.result.is_ok()).count(), 1);
    }

    #[test]
    fn single_worker_drains_the_whole_grid() {
        let trace = TempTrace::write("grid", "4 1\n4 0\n8 1\n");
        let cfg = SweepConfig {
            counter_bits: vec![1, 2],
            addr_bits: vec![0, 1, 3],
            traces: vec![trace.path().to_path_buf()],
            workers: 1,
        };
        assert_eq!(cfg.grid_size(), 6);
        let outcomes: Vec<_> = run_sweep(&cfg).collect();
        assert_eq!(outcomes.len(), 6);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }

    #[test]
    fn sweep_runs_are_isolated_and_deterministic() {
        let trace = TempTrace::write("det", "4 1\n8 0\n12 1\n4 1\n8 0\n");
        let cfg = RunConfig {
            counter_bits: 3,
            addr_bits: 2,
            trace: trace.path().to_path_buf(),
        };
        let first = cfg.run().unwrap();
        let second = cfg.run().unwrap();
        assert_eq!(first, second);
    }
}
