//! # Chain Events
//!
//! Observable side effects of a call. The only event this system emits is
//! the native asset transfer, serialized in the shape test harnesses
//! expect:
//!
//! ```json
//! {"event":"stx_transfer_event","data":{"amount":"10","sender":"ST1...","recipient":"ST1....wallet"}}
//! ```

use serde::{Deserialize, Serialize};
use tlock_core::{Amount, Principal};

/// A committed movement of the native asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Quantity moved (serialized as a decimal string).
    pub amount: Amount,
    /// Principal debited.
    pub sender: Principal,
    /// Principal credited.
    pub recipient: Principal,
}

/// An event emitted while executing a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ChainEvent {
    /// Native asset transfer.
    StxTransferEvent(TransferEvent),
}

impl ChainEvent {
    /// The wire name of the event kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StxTransferEvent(_) => "stx_transfer_event",
        }
    }

    /// The transfer payload, if this is a transfer event.
    pub fn as_transfer(&self) -> Option<&TransferEvent> {
        match self {
            Self::StxTransferEvent(t) => Some(t),
        }
    }
}

impl From<TransferEvent> for ChainEvent {
    fn from(t: TransferEvent) -> Self {
        Self::StxTransferEvent(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transfer_event_wire_shape() {
        let deployer = Principal::standard("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM").unwrap();
        let wallet = Principal::contract(&deployer, "wallet").unwrap();
        let event = ChainEvent::from(TransferEvent {
            amount: Amount::new(10),
            sender: deployer,
            recipient: wallet,
        });
        assert_eq!(event.name(), "stx_transfer_event");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "stx_transfer_event",
                "data": {
                    "amount": "10",
                    "sender": "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM",
                    "recipient": "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.wallet",
                }
            })
        );
    }
}
