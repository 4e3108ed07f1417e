use autostash_chunk::VoxelCoord;
use autostash_items::{ExclusionSet, ItemCatalog, TransferStep, deposit_matching};
use autostash_search::ContainerQueue;

use crate::host::{DepositHost, InteractionPolicy, InventoryFilter, OpenContainer, RequesterId};
use crate::message::Message;

/// Running totals for one deposit-all request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub total_items_moved: u64,
    /// Some visited container was left without an empty slot.
    pub destination_full: bool,
}

impl TransferSummary {
    pub fn record(&mut self, step: TransferStep) {
        self.total_items_moved += u64::from(step.items_moved);
        self.destination_full |= step.destination_full;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The interaction policy vetoed the visit.
    Cancelled,
    /// Nothing holding items stands there any more.
    InventoryUnavailable,
    NotManageable,
}

/// What happened at one container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainEvent {
    Deposited { at: VoxelCoord, step: TransferStep },
    Skipped { at: VoxelCoord, reason: SkipReason },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Queue exhausted; the summary message was sent.
    Completed(TransferSummary),
    /// Requester went away mid-chain; nothing was sent.
    Abandoned(TransferSummary),
}

impl ChainOutcome {
    pub fn summary(&self) -> TransferSummary {
        match self {
            ChainOutcome::Completed(s) | ChainOutcome::Abandoned(s) => *s,
        }
    }
}

pub enum ChainStep {
    Continue(TickChain, ChainEvent),
    Done(ChainOutcome),
}

/// Shared, read-only collaborators for a step.
pub struct ChainContext<'a> {
    pub catalog: &'a ItemCatalog,
    pub exclusions: &'a ExclusionSet,
    pub policy: &'a dyn InteractionPolicy,
    pub filter: &'a dyn InventoryFilter,
    pub tick: u64,
}

/// Visits one discovered container per step until the queue runs dry.
#[derive(Debug)]
pub struct TickChain {
    requester: RequesterId,
    queue: ContainerQueue,
    summary: TransferSummary,
    respect_filter: bool,
}

impl TickChain {
    pub fn new(requester: RequesterId, queue: ContainerQueue) -> Self {
        Self {
            requester,
            queue,
            summary: TransferSummary::default(),
            respect_filter: true,
        }
    }

    /// Lets the chain deposit into inventories the filter would reject.
    pub fn ignoring_filter(mut self) -> Self {
        self.respect_filter = false;
        self
    }

    #[inline]
    pub fn requester(&self) -> RequesterId {
        self.requester
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn summary(&self) -> TransferSummary {
        self.summary
    }

    pub fn step<H: DepositHost + ?Sized>(mut self, ctx: &ChainContext<'_>, host: &mut H) -> ChainStep {
        if !host.is_online(self.requester) {
            log::info!(
                target: "chain",
                "[tick {}] requester {} offline; dropping chain with {} container(s) left, {} item(s) moved",
                ctx.tick,
                self.requester,
                self.queue.len(),
                self.summary.total_items_moved
            );
            return ChainStep::Done(ChainOutcome::Abandoned(self.summary));
        }

        let Some(at) = self.queue.pop_front() else {
            host.send(
                self.requester,
                Message::SuccessfulDepositAll {
                    moved: self.summary.total_items_moved,
                },
            );
            log::info!(
                target: "chain",
                "[tick {}] requester {} done: moved={} full={}",
                ctx.tick,
                self.requester,
                self.summary.total_items_moved,
                self.summary.destination_full
            );
            return ChainStep::Done(ChainOutcome::Completed(self.summary));
        };

        let event = match visit_container(self.requester, at, false, self.respect_filter, ctx, host) {
            Ok(step) => {
                self.summary.record(step);
                ChainEvent::Deposited { at, step }
            }
            Err(reason) => ChainEvent::Skipped { at, reason },
        };
        log::debug!(target: "chain", "[tick {}] requester {} {:?}", ctx.tick, self.requester, event);
        ChainStep::Continue(self, event)
    }
}

/// Resolves `at` against the live world and deposits into it.
pub fn visit_container<H: DepositHost + ?Sized>(
    requester: RequesterId,
    at: VoxelCoord,
    include_hotbar: bool,
    respect_filter: bool,
    ctx: &ChainContext<'_>,
    host: &mut H,
) -> Result<TransferStep, SkipReason> {
    let block = host.block_at(at).ok_or(SkipReason::InventoryUnavailable)?;
    if !ctx.policy.allows(requester, at, block) {
        return Err(SkipReason::Cancelled);
    }
    let OpenContainer { player, holder } = host
        .open(requester, at)
        .ok_or(SkipReason::InventoryUnavailable)?;
    let destination = holder
        .container_inventory()
        .ok_or(SkipReason::InventoryUnavailable)?;
    if respect_filter && !ctx.filter.is_manageable(destination) {
        return Err(SkipReason::NotManageable);
    }
    Ok(deposit_matching(
        player,
        destination,
        include_hotbar,
        ctx.exclusions,
        ctx.catalog,
    ))
}
