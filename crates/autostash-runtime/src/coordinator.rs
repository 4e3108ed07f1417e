use std::io;
use std::sync::Arc;
use std::time::Duration;

use autostash_blocks::BlockRegistry;
use autostash_chunk::{ChunkSource, VoxelCoord, VoxelSnapshot};
use autostash_items::{ExclusionSet, ItemCatalog, TransferStep};
use autostash_search::{SearchWindow, VERTICAL_REACH};

use crate::chain::{ChainContext, ChainEvent, ChainOutcome, ChainStep, TickChain, visit_container};
use crate::feature::{Feature, FeatureGate, Unrestricted};
use crate::host::{AllowAll, DepositHost, InteractionPolicy, InventoryFilter, RequesterId, StandardContainers};
use crate::message::Message;
use crate::scheduler::TickScheduler;
use crate::worker::{SearchRequest, SearchWorker};

/// Work the coordination thread runs on a later tick.
#[derive(Debug)]
pub enum Task {
    ChainStep(TickChain),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestStatus {
    Searching,
    Denied,
}

/// What one call to [`Coordinator::tick`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub searches_received: usize,
    pub events: Vec<(RequesterId, ChainEvent)>,
    pub finished: Vec<(RequesterId, ChainOutcome)>,
}

/// Owns deposit state on the coordination thread: feature checks, snapshot
/// capture, search workers, and the chains their results start.
pub struct Coordinator {
    registry: Arc<BlockRegistry>,
    catalog: Arc<ItemCatalog>,
    exclusions: ExclusionSet,
    vertical_reach: i32,
    gate: Box<dyn FeatureGate>,
    policy: Box<dyn InteractionPolicy>,
    filter: Box<dyn InventoryFilter>,
    scheduler: TickScheduler<Task>,
    worker: SearchWorker,
}

impl Coordinator {
    pub fn new(registry: Arc<BlockRegistry>, catalog: Arc<ItemCatalog>) -> Self {
        Self {
            worker: SearchWorker::new(registry.clone()),
            registry,
            catalog,
            exclusions: ExclusionSet::new(),
            vertical_reach: VERTICAL_REACH,
            gate: Box::new(Unrestricted),
            policy: Box::new(AllowAll),
            filter: Box::new(StandardContainers),
            scheduler: TickScheduler::new(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Narrows the search window. Reach never exceeds [`VERTICAL_REACH`].
    pub fn with_vertical_reach(mut self, reach: i32) -> Self {
        self.vertical_reach = reach.clamp(0, VERTICAL_REACH);
        self
    }

    pub fn with_gate(mut self, gate: impl FeatureGate + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    pub fn with_policy(mut self, policy: impl InteractionPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_filter(mut self, filter: impl InventoryFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Nothing searching, no result waiting for handoff, nothing scheduled.
    pub fn is_idle(&self) -> bool {
        self.worker.pending() == 0 && self.scheduler.is_empty()
    }

    /// Searches running or finished but not yet turned into chains.
    pub fn pending_searches(&self) -> usize {
        self.worker.pending()
    }

    /// Captures the area around `eye` and starts a background search from it.
    pub fn request_deposit_all<H>(
        &mut self,
        host: &mut H,
        requester: RequesterId,
        eye: VoxelCoord,
    ) -> io::Result<RequestStatus>
    where
        H: DepositHost + ChunkSource,
    {
        if !self.gate.permits(requester, Feature::DepositAll) {
            host.send(
                requester,
                Message::NoPermissionForFeature {
                    feature: Feature::DepositAll,
                },
            );
            return Ok(RequestStatus::Denied);
        }
        let window = SearchWindow::around_eye(eye.y, host.world_height(), self.vertical_reach);
        let snapshot = VoxelSnapshot::capture(&*host, eye.chunk());
        self.worker.spawn(SearchRequest {
            requester,
            snapshot,
            window,
            start: eye,
        })?;
        log::info!(
            target: "chain",
            "[tick {}] requester {} deposit-all from {} y={}..={}",
            self.now(),
            requester,
            eye,
            window.min_y,
            window.max_y
        );
        Ok(RequestStatus::Searching)
    }

    /// Deposits into one chosen container right away, hotbar included.
    pub fn quick_deposit<H>(
        &mut self,
        host: &mut H,
        requester: RequesterId,
        at: VoxelCoord,
    ) -> Option<TransferStep>
    where
        H: DepositHost + ?Sized,
    {
        if !self.gate.permits(requester, Feature::QuickDeposit) {
            host.send(
                requester,
                Message::NoPermissionForFeature {
                    feature: Feature::QuickDeposit,
                },
            );
            return None;
        }
        let ctx = ChainContext {
            catalog: &self.catalog,
            exclusions: &self.exclusions,
            policy: self.policy.as_ref(),
            filter: self.filter.as_ref(),
            tick: self.scheduler.now(),
        };
        match visit_container(requester, at, true, true, &ctx, host) {
            Ok(step) => {
                log::info!(
                    target: "deposit",
                    "[tick {}] requester {} quick deposit at {}: moved={} full={}",
                    ctx.tick,
                    requester,
                    at,
                    step.items_moved,
                    step.destination_full
                );
                host.send(
                    requester,
                    Message::QuickDeposit {
                        moved: step.items_moved,
                        destination_full: step.destination_full,
                    },
                );
                Some(step)
            }
            Err(reason) => {
                log::info!(target: "deposit", "[tick {}] quick deposit at {} skipped: {:?}", ctx.tick, at, reason);
                host.send(requester, Message::ContainerUnavailable);
                None
            }
        }
    }

    /// Blocks up to `timeout` for an in-flight search to report back.
    pub fn wait_for_search(&mut self, timeout: Duration) -> bool {
        self.worker.wait(timeout)
    }

    /// Hands finished searches to new chains one tick out, runs everything due
    /// now, then moves the clock forward.
    pub fn tick<H: DepositHost + ?Sized>(&mut self, host: &mut H) -> TickReport {
        let mut report = TickReport {
            tick: self.scheduler.now(),
            ..TickReport::default()
        };

        for out in self.worker.drain() {
            log::info!(
                target: "chain",
                "[tick {}] requester {} search done: {} container(s), visited={} obstructed={}",
                report.tick,
                out.requester,
                out.queue.len(),
                out.stats.visited,
                out.stats.obstructed
            );
            report.searches_received += 1;
            self.scheduler
                .schedule_after(1, Task::ChainStep(TickChain::new(out.requester, out.queue)));
        }

        let ctx = ChainContext {
            catalog: &self.catalog,
            exclusions: &self.exclusions,
            policy: self.policy.as_ref(),
            filter: self.filter.as_ref(),
            tick: report.tick,
        };
        while let Some(job) = self.scheduler.pop_ready() {
            match job.task {
                Task::ChainStep(chain) => {
                    let requester = chain.requester();
                    match chain.step(&ctx, host) {
                        ChainStep::Continue(next, event) => {
                            report.events.push((requester, event));
                            self.scheduler.schedule_after(1, Task::ChainStep(next));
                        }
                        ChainStep::Done(outcome) => report.finished.push((requester, outcome)),
                    }
                }
            }
        }

        self.scheduler.advance_tick();
        report
    }
}
