//! Off-thread container discovery and the tick-driven deposit chains it feeds.
#![forbid(unsafe_code)]

mod chain;
mod coordinator;
mod feature;
mod host;
mod message;
mod scheduler;
mod worker;

pub use chain::{
    ChainContext, ChainEvent, ChainOutcome, ChainStep, SkipReason, TickChain, TransferSummary,
    visit_container,
};
pub use coordinator::{Coordinator, RequestStatus, Task, TickReport};
pub use feature::{Feature, FeatureGate, FeatureTable, Unrestricted};
pub use host::{
    AllowAll, DepositHost, InteractionPolicy, InventoryFilter, InventoryHolder, OpenContainer,
    RequesterId, StandardContainers,
};
pub use message::{Message, MessageSink};
pub use scheduler::{Scheduled, TickScheduler};
pub use worker::{SearchOutcome, SearchRequest, SearchWorker};
