//! Every operation attempted from every wallet state, by every role.
//!
//! Pins the rejection code for each (state, operation, caller) cell and
//! checks that a rejected call never changes the state, the balances or
//! the event log.

use tlock_core::{Amount, BlockHeight, Principal};
use tlock_ledger::{AssetTransfer, InMemoryLedger, SimulatedChain};
use tlock_state::{CallContext, Operation, TimelockedWallet, WalletError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Setup {
    Uninitialized,
    LockedEarly,
    LockedMature,
    Claimed,
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Owner,
    Beneficiary,
    Stranger,
}

const ALL_SETUPS: [Setup; 4] = [
    Setup::Uninitialized,
    Setup::LockedEarly,
    Setup::LockedMature,
    Setup::Claimed,
];
const ALL_ROLES: [Role; 3] = [Role::Owner, Role::Beneficiary, Role::Stranger];
const ALL_OPS: [Operation; 3] = [Operation::Lock, Operation::Bestow, Operation::Claim];

fn principal(s: &str) -> Principal {
    Principal::standard(s).unwrap()
}

fn owner() -> Principal {
    principal("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM")
}

fn beneficiary() -> Principal {
    principal("ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5")
}

fn stranger() -> Principal {
    principal("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG")
}

fn who(role: Role) -> Principal {
    match role {
        Role::Owner => owner(),
        Role::Beneficiary => beneficiary(),
        Role::Stranger => stranger(),
    }
}

struct World {
    wallet: TimelockedWallet,
    chain: SimulatedChain,
    ledger: InMemoryLedger,
}

impl World {
    fn new() -> Self {
        let mut ledger = InMemoryLedger::new();
        for p in [owner(), beneficiary(), stranger()] {
            ledger.credit(&p, Amount::new(1_000)).unwrap();
        }
        Self {
            wallet: TimelockedWallet::deploy(owner(), "wallet").unwrap(),
            chain: SimulatedChain::new(BlockHeight(1)),
            ledger,
        }
    }

    fn call(&mut self, op: Operation, caller: &Principal) -> Result<bool, WalletError> {
        let mut ctx = CallContext::new(caller, &self.chain, &mut self.ledger);
        match op {
            Operation::Lock => self
                .wallet
                .lock(&mut ctx, beneficiary(), BlockHeight(10), Amount::new(100)),
            Operation::Bestow => self.wallet.bestow(&mut ctx, beneficiary()),
            Operation::Claim => self.wallet.claim(&mut ctx),
        }
    }

    fn prepared(setup: Setup) -> Self {
        let mut world = Self::new();
        if matches!(setup, Setup::Uninitialized) {
            return world;
        }
        world.call(Operation::Lock, &owner()).unwrap();
        if matches!(setup, Setup::LockedEarly) {
            return world;
        }
        world.chain.mine_empty_blocks(20);
        if matches!(setup, Setup::LockedMature) {
            return world;
        }
        world.call(Operation::Claim, &beneficiary()).unwrap();
        world
    }

    fn snapshot(&self) -> (String, Vec<Amount>, usize) {
        let balances = [owner(), beneficiary(), stranger(), self.wallet.contract_principal().clone()]
            .iter()
            .map(|p| self.ledger.balance(p))
            .collect();
        (
            self.wallet.state().as_str().to_string(),
            balances,
            self.ledger.event_count(),
        )
    }
}

/// Expected outcome: `None` for success, `Some(code)` for rejection.
fn expected(setup: Setup, op: Operation, role: Role) -> Option<u32> {
    use Operation::*;
    use Role::*;
    use Setup::*;
    match (op, setup, role) {
        (Lock, _, Beneficiary | Stranger) => Some(100),
        (Lock, Uninitialized, Owner) => None,
        (Lock, _, Owner) => Some(101),

        (Bestow | Claim, Uninitialized, _) => Some(104),
        (Bestow | Claim, _, Owner | Stranger) => Some(104),
        (Bestow | Claim, Claimed, Beneficiary) => Some(106),
        (Bestow, _, Beneficiary) => None,
        (Claim, LockedEarly, Beneficiary) => Some(105),
        (Claim, LockedMature, Beneficiary) => None,
    }
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

#[test]
fn every_cell_returns_the_pinned_outcome() {
    for setup in ALL_SETUPS {
        for op in ALL_OPS {
            for role in ALL_ROLES {
                let mut world = World::prepared(setup);
                let outcome = world.call(op, &who(role));
                match expected(setup, op, role) {
                    None => assert_eq!(
                        outcome,
                        Ok(true),
                        "{op} by {role:?} from {setup:?} should succeed"
                    ),
                    Some(code) => assert_eq!(
                        outcome.map_err(|e| e.code()),
                        Err(code),
                        "{op} by {role:?} from {setup:?}"
                    ),
                }
            }
        }
    }
}

#[test]
fn rejected_calls_leave_no_trace() {
    for setup in ALL_SETUPS {
        for op in ALL_OPS {
            for role in ALL_ROLES {
                if expected(setup, op, role).is_none() {
                    continue;
                }
                let mut world = World::prepared(setup);
                let before = world.snapshot();
                let history = world.wallet.history().len();
                let _ = world.call(op, &who(role));
                assert_eq!(world.snapshot(), before, "{op} by {role:?} from {setup:?}");
                assert_eq!(world.wallet.history().len(), history);
            }
        }
    }
}

#[test]
fn claimed_is_terminal() {
    let mut world = World::prepared(Setup::Claimed);
    assert!(world.wallet.state().is_terminal());
    world.chain.mine_empty_blocks(100);
    for op in ALL_OPS {
        for role in ALL_ROLES {
            assert!(world.call(op, &who(role)).is_err());
        }
    }
    assert_eq!(world.wallet.state().as_str(), "CLAIMED");
}
