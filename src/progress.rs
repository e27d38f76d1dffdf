// src/progress.rs
/// Lightweight progress reporting for a run.
/// Frontends implement this to surface status to users; the CLI prints lines.
pub trait Progress {
    /// Called at the start with the number of stages.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one pipeline stage completes.
    fn stage_done(&mut self, _stage: Stage) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Pipeline stages in run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Registry,
    Listing,
    Merge,
    Compose,
    Write,
}

impl Stage {
    pub const ALL: [Stage; 5] = [Stage::Registry, Stage::Listing, Stage::Merge, Stage::Compose, Stage::Write];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Registry => "ownership registry",
            Stage::Listing => "listing",
            Stage::Merge => "merge",
            Stage::Compose => "report",
            Stage::Write => "write",
        }
    }
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Numbered stage lines on stderr.
#[derive(Default)]
pub struct StderrProgress {
    total: usize,
    done: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("  {msg}");
    }

    fn stage_done(&mut self, stage: Stage) {
        self.done += 1;
        eprintln!("[{}/{}] {} done", self.done, self.total, stage.label());
    }
}
