use confbench::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;
const SPINNER_TEMPLATE: &str = "{spinner:.green} {prefix:.bold}";
const MOLECULE_TEMPLATE: &str =
    "{prefix:.bold:>10} [{bar:36.cyan/blue}] {pos}/{len} molecules ({elapsed})";

/// Shows one line per workflow phase: a spinner until the phase knows how many molecules it
/// walks, then a molecule counter.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::drawing_to(ProgressDrawTarget::stderr())
    }

    /// Tracks phases without drawing, for `--quiet` runs and tests.
    pub fn hidden() -> Self {
        Self::drawing_to(ProgressDrawTarget::hidden())
    }

    fn drawing_to(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(style(SPINNER_TEMPLATE));
        bar.finish_and_clear();
        Self {
            bar: Arc::new(Mutex::new(bar)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = Arc::clone(&self.bar);
        Box::new(move |event: Progress| {
            let Ok(bar) = bar.lock() else {
                warn!("Progress bar lock is poisoned; dropping progress event.");
                return;
            };
            apply(&bar, event);
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::PhaseStart { name } => {
            bar.reset();
            bar.set_length(0);
            bar.set_style(style(SPINNER_TEMPLATE));
            bar.set_prefix(name);
            bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        Progress::TaskStart { total_steps } => {
            bar.disable_steady_tick();
            bar.set_style(style(MOLECULE_TEMPLATE).progress_chars("=> "));
            bar.set_length(total_steps);
            bar.set_position(0);
        }
        Progress::TaskIncrement => bar.inc(1),
        Progress::TaskFinish => {
            if let Some(length) = bar.length() {
                bar.set_position(length);
            }
        }
        Progress::PhaseFinish => {
            bar.disable_steady_tick();
            bar.finish();
        }
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn new_handler_is_idle() {
        let handler = CliProgressHandler::hidden();
        let bar = handler.bar.lock().unwrap();
        assert_eq!(bar.length(), Some(0));
        assert!(bar.is_finished());
    }

    #[test]
    fn phase_events_drive_prefix_and_molecule_count() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Collecting" });
        {
            let bar = handler.bar.lock().unwrap();
            assert_eq!(bar.prefix(), "Collecting");
            assert!(!bar.is_finished());
        }

        callback(Progress::TaskStart { total_steps: 5 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskIncrement);
        {
            let bar = handler.bar.lock().unwrap();
            assert_eq!(bar.length(), Some(5));
            assert_eq!(bar.position(), 2);
        }

        // molecules skipped without an increment still complete the count
        callback(Progress::TaskFinish);
        assert_eq!(handler.bar.lock().unwrap().position(), 5);

        callback(Progress::PhaseFinish);
        assert!(handler.bar.lock().unwrap().is_finished());
    }

    #[test]
    fn next_phase_starts_from_zero() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();
        for name in ["Collecting", "Archiving"] {
            callback(Progress::PhaseStart { name });
            callback(Progress::TaskStart { total_steps: 3 });
            assert_eq!(handler.bar.lock().unwrap().position(), 0);
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        }
        assert_eq!(handler.bar.lock().unwrap().prefix(), "Archiving");
    }

    #[test]
    fn sampling_workers_can_report_concurrently() {
        let handler = CliProgressHandler::hidden();
        let callback = Arc::new(handler.get_callback());
        callback(Progress::TaskStart { total_steps: 4 });

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let callback = Arc::clone(&callback);
                thread::spawn(move || callback(Progress::TaskIncrement))
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(handler.bar.lock().unwrap().position(), 4);
    }
}
