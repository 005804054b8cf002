use super::error::EngineError;
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Core budget assumed when the host's parallelism cannot be queried.
pub const DEFAULT_CORES: usize = 4;

/// How a core budget is split between concurrent sampling jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolPlan {
    pub worker_slots: usize,
    pub threads_per_worker: usize,
}

/// `worker_slots = min(cores, jobs)`, `threads_per_worker = cores / worker_slots`.
///
/// The remainder of the division stays unused. With no jobs a single slot gets every core.
pub fn plan(total_cores: usize, job_count: usize) -> PoolPlan {
    let total_cores = total_cores.max(1);
    let worker_slots = total_cores.min(job_count).max(1);
    PoolPlan {
        worker_slots,
        threads_per_worker: total_cores / worker_slots,
    }
}

pub fn detect_cores() -> usize {
    match std::thread::available_parallelism() {
        Ok(n) => n.get(),
        Err(e) => {
            warn!(
                error = %e,
                default = DEFAULT_CORES,
                "Could not detect core count. Using default."
            );
            DEFAULT_CORES
        }
    }
}

/// A bounded pool running one job per input with a blocking join.
///
/// Results are returned in input order. There is no per-job timeout and no cancellation.
pub struct SamplingPool {
    plan: PoolPlan,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl SamplingPool {
    pub fn new(plan: PoolPlan) -> Result<Self, EngineError> {
        info!(
            worker_slots = plan.worker_slots,
            threads_per_worker = plan.threads_per_worker,
            "Sizing sampling pool."
        );
        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(plan.worker_slots)
            .thread_name(|i| format!("sampling-{}", i))
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        Ok(Self {
            plan,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn plan(&self) -> PoolPlan {
        self.plan
    }

    pub fn run<J, R, F>(&self, jobs: &[J], job: F) -> Vec<R>
    where
        J: Sync,
        R: Send,
        F: Fn(&J, usize) -> R + Sync,
    {
        let threads = self.plan.threads_per_worker;

        #[cfg(feature = "parallel")]
        let results: Vec<R> = self
            .pool
            .install(|| jobs.par_iter().map(|j| job(j, threads)).collect());

        #[cfg(not(feature = "parallel"))]
        let results: Vec<R> = jobs.iter().map(|j| job(j, threads)).collect();

        results
    }
}
