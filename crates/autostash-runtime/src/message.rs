use std::fmt;

use crate::feature::Feature;
use crate::host::RequesterId;

/// Player-facing notices produced by the deposit flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    SuccessfulDepositAll { moved: u64 },
    QuickDeposit { moved: u32, destination_full: bool },
    NoPermissionForFeature { feature: Feature },
    ContainerUnavailable,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::SuccessfulDepositAll { moved } => {
                write!(f, "Deposited {} items into nearby chests.", moved)
            }
            Message::QuickDeposit {
                moved,
                destination_full,
            } => {
                write!(f, "Deposited {} items.", moved)?;
                if *destination_full {
                    f.write_str(" That container is now full.")?;
                }
                Ok(())
            }
            Message::NoPermissionForFeature { feature } => {
                write!(f, "You don't have permission to use {}.", feature)
            }
            Message::ContainerUnavailable => f.write_str("That container can't be used right now."),
        }
    }
}

pub trait MessageSink {
    fn send(&mut self, requester: RequesterId, message: Message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_counts() {
        assert_eq!(
            Message::SuccessfulDepositAll { moved: 12 }.to_string(),
            "Deposited 12 items into nearby chests."
        );
        assert_eq!(
            Message::QuickDeposit {
                moved: 3,
                destination_full: true
            }
            .to_string(),
            "Deposited 3 items. That container is now full."
        );
        assert_eq!(
            Message::NoPermissionForFeature {
                feature: Feature::DepositAll
            }
            .to_string(),
            "You don't have permission to use deposit all."
        );
    }
}
