use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use autostash_blocks::BlockRegistry;
use autostash_chunk::{VoxelCoord, VoxelSnapshot};
use autostash_search::{ChestLocator, ContainerQueue, LocateStats, SearchWindow};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::host::RequesterId;

/// Everything a search needs, captured on the coordination thread.
pub struct SearchRequest {
    pub requester: RequesterId,
    pub snapshot: VoxelSnapshot,
    pub window: SearchWindow,
    pub start: VoxelCoord,
}

pub struct SearchOutcome {
    pub requester: RequesterId,
    pub queue: ContainerQueue,
    pub stats: LocateStats,
}

enum Report {
    Found(SearchOutcome),
    /// The search thread died before producing a queue.
    Lost(RequesterId),
}

/// Sends `Lost` on drop unless a result went out first.
struct ReportGuard {
    requester: RequesterId,
    tx: Option<Sender<Report>>,
}

impl ReportGuard {
    fn deliver(mut self, queue: ContainerQueue, stats: LocateStats) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Report::Found(SearchOutcome {
                requester: self.requester,
                queue,
                stats,
            }));
        }
    }
}

impl Drop for ReportGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Report::Lost(self.requester));
        }
    }
}

/// Runs each search on its own thread and hands finished queues back over a
/// channel. Only the owning thread drains results.
pub struct SearchWorker {
    reg: Arc<BlockRegistry>,
    tx: Sender<Report>,
    rx: Receiver<Report>,
    ready: Vec<SearchOutcome>,
    in_flight: usize,
    spawned: u64,
}

impl SearchWorker {
    pub fn new(reg: Arc<BlockRegistry>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            reg,
            tx,
            rx,
            ready: Vec::new(),
            in_flight: 0,
            spawned: 0,
        }
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Searches still running plus results received but not yet drained.
    #[inline]
    pub fn pending(&self) -> usize {
        self.in_flight + self.ready.len()
    }

    pub fn spawn(&mut self, req: SearchRequest) -> io::Result<()> {
        let reg = self.reg.clone();
        let SearchRequest {
            requester,
            snapshot,
            window,
            start,
        } = req;
        self.spawn_job(requester, move || ChestLocator::new(&snapshot, &reg, window).run(start))
    }

    fn spawn_job<F>(&mut self, requester: RequesterId, job: F) -> io::Result<()>
    where
        F: FnOnce() -> (ContainerQueue, LocateStats) + Send + 'static,
    {
        let guard = ReportGuard {
            requester,
            tx: Some(self.tx.clone()),
        };
        let id = self.spawned;
        thread::Builder::new()
            .name(format!("autostash-search-{id}"))
            .spawn(move || {
                let (queue, stats) = job();
                guard.deliver(queue, stats);
            })?;
        self.spawned += 1;
        self.in_flight += 1;
        Ok(())
    }

    fn settle(&mut self, report: Report) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match report {
            Report::Found(out) => self.ready.push(out),
            Report::Lost(requester) => {
                log::warn!(target: "search", "search for requester {} died without a result", requester);
            }
        }
    }

    /// Blocks up to `timeout` for one more search to settle. Returns false on
    /// timeout or when nothing is in flight.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(report) => {
                self.settle(report);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Finished searches, oldest first. Never blocks.
    pub fn drain(&mut self) -> Vec<SearchOutcome> {
        while let Ok(report) = self.rx.try_recv() {
            self.settle(report);
        }
        std::mem::take(&mut self.ready)
    }
}
