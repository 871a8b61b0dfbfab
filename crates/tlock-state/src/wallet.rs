//! # Time-Locked Wallet
//!
//! [`TimelockedWallet`] owns the single lock record of one contract
//! instance. Operations receive their collaborators through a
//! [`CallContext`]: the calling principal, the chain clock and the asset
//! transfer service. Nothing is read from ambient state, so every
//! transition can be driven deterministically in tests.
//!
//! ## Preconditions
//!
//! | Operation | Checks, in order |
//! |---|---|
//! | `lock` | owner (100), not locked (101), height in future (102), amount > 0 (103) |
//! | `bestow` | beneficiary (104), not claimed (106) |
//! | `claim` | beneficiary (104), not claimed (106), unlocked (105) |
//!
//! The first failing check wins. The asset transfer runs only after every
//! check has passed, and the record is written only after the transfer
//! commits.

use serde::{Deserialize, Serialize};
use tlock_core::{Amount, BlockHeight, Principal, ValidationError};
use tlock_ledger::{AssetTransfer, ChainClock};

use crate::error::{AuthorizedRole, WalletError};

// ── Call context ───────────────────────────────────────────────────────

/// Collaborators for a single call.
pub struct CallContext<'a> {
    /// Principal that signed the call.
    pub caller: &'a Principal,
    /// Source of the current block height.
    pub clock: &'a dyn ChainClock,
    /// Asset transfer service holding all balances.
    pub ledger: &'a mut dyn AssetTransfer,
}

impl<'a> CallContext<'a> {
    /// Bundle the collaborators for one call.
    pub fn new(
        caller: &'a Principal,
        clock: &'a dyn ChainClock,
        ledger: &'a mut dyn AssetTransfer,
    ) -> Self {
        Self {
            caller,
            clock,
            ledger,
        }
    }
}

// ── Operations ─────────────────────────────────────────────────────────

/// The public operations of the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Deposit funds and name a beneficiary.
    Lock,
    /// Hand the claim right to another principal.
    Bestow,
    /// Withdraw the funds after the unlock height.
    Claim,
}

impl Operation {
    /// The public function name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Bestow => "bestow",
            Self::Claim => "claim",
        }
    }

    /// Look up an operation by its public function name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lock" => Some(Self::Lock),
            "bestow" => Some(Self::Bestow),
            "claim" => Some(Self::Claim),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Record and state ───────────────────────────────────────────────────

/// The escrow record written by the first successful `lock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Principal that funded the escrow.
    pub locker: Principal,
    /// Principal currently entitled to claim.
    pub beneficiary: Principal,
    /// Height at or after which the funds may be claimed.
    pub unlock_height: BlockHeight,
    /// Escrowed quantity of the native asset.
    pub amount: Amount,
    /// Set once the lock is established; never cleared.
    pub is_locked: bool,
}

/// Lifecycle of the wallet.
///
/// Deserialization rejects a record with a zero amount or a cleared
/// `is_locked` flag, since no transition can produce either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    content = "record",
    rename_all = "SCREAMING_SNAKE_CASE",
    try_from = "StateRepr"
)]
pub enum WalletState {
    /// No lock has been established.
    Uninitialized,
    /// Funds are held for the record's beneficiary.
    Locked(LockRecord),
    /// Funds were paid out. Terminal state.
    Claimed(LockRecord),
}

impl WalletState {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Locked(_) => "LOCKED",
            Self::Claimed(_) => "CLAIMED",
        }
    }

    /// Whether this state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Claimed(_))
    }

    /// The lock record, once one exists.
    pub fn record(&self) -> Option<&LockRecord> {
        match self {
            Self::Uninitialized => None,
            Self::Locked(r) | Self::Claimed(r) => Some(r),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "status", content = "record", rename_all = "SCREAMING_SNAKE_CASE")]
enum StateRepr {
    Uninitialized,
    Locked(LockRecord),
    Claimed(LockRecord),
}

impl TryFrom<StateRepr> for WalletState {
    type Error = ValidationError;

    fn try_from(repr: StateRepr) -> Result<Self, Self::Error> {
        let check = |record: &LockRecord| {
            if record.amount.is_zero() {
                return Err(ValidationError::InvalidSnapshot(
                    "lock record holds a zero amount".into(),
                ));
            }
            if !record.is_locked {
                return Err(ValidationError::InvalidSnapshot(
                    "lock record has is_locked cleared".into(),
                ));
            }
            Ok(())
        };
        match repr {
            StateRepr::Uninitialized => Ok(Self::Uninitialized),
            StateRepr::Locked(r) => check(&r).map(|()| Self::Locked(r)),
            StateRepr::Claimed(r) => check(&r).map(|()| Self::Claimed(r)),
        }
    }
}

impl std::fmt::Display for WalletState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed transition, kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransition {
    /// The operation that committed.
    pub operation: Operation,
    /// Who called it.
    pub caller: Principal,
    /// Chain height at execution.
    pub height: BlockHeight,
    /// State name before the call.
    pub from: String,
    /// State name after the call.
    pub to: String,
}

// ── Wallet ─────────────────────────────────────────────────────────────

/// A deployed time-locked wallet.
///
/// A deserialized wallet must hold a contract principal issued by its
/// owner, and any lock record must name the owner as locker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WalletRepr")]
pub struct TimelockedWallet {
    owner: Principal,
    contract: Principal,
    state: WalletState,
    history: Vec<WalletTransition>,
}

#[derive(Deserialize)]
struct WalletRepr {
    owner: Principal,
    contract: Principal,
    state: WalletState,
    #[serde(default)]
    history: Vec<WalletTransition>,
}

impl TryFrom<WalletRepr> for TimelockedWallet {
    type Error = ValidationError;

    fn try_from(repr: WalletRepr) -> Result<Self, Self::Error> {
        if !repr.contract.is_contract() || repr.contract.issuer() != repr.owner {
            return Err(ValidationError::InvalidSnapshot(format!(
                "{} is not a contract issued by {}",
                repr.contract, repr.owner
            )));
        }
        if let Some(record) = repr.state.record() {
            if record.locker != repr.owner {
                return Err(ValidationError::InvalidSnapshot(format!(
                    "lock record names {} as locker, owner is {}",
                    record.locker, repr.owner
                )));
            }
        }
        Ok(Self {
            owner: repr.owner,
            contract: repr.contract,
            state: repr.state,
            history: repr.history,
        })
    }
}

impl TimelockedWallet {
    /// Deploy a wallet owned by `owner` under the contract name `name`.
    ///
    /// The contract's holding account is the principal `<owner>.<name>`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidContractName`] for a malformed name.
    pub fn deploy(owner: Principal, name: &str) -> Result<Self, ValidationError> {
        let contract = Principal::contract(&owner, name)?;
        tracing::info!(%owner, %contract, "wallet deployed");
        Ok(Self {
            owner,
            contract,
            state: WalletState::Uninitialized,
            history: Vec::new(),
        })
    }

    /// The principal allowed to lock funds.
    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    /// The contract's own holding account.
    pub fn contract_principal(&self) -> &Principal {
        &self.contract
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &WalletState {
        &self.state
    }

    /// The lock record, if a lock was ever established.
    pub fn record(&self) -> Option<&LockRecord> {
        self.state.record()
    }

    /// The principal currently entitled to claim.
    pub fn beneficiary(&self) -> Option<&Principal> {
        self.record().map(|r| &r.beneficiary)
    }

    /// The unlock height, if locked.
    pub fn unlock_height(&self) -> Option<BlockHeight> {
        self.record().map(|r| r.unlock_height)
    }

    /// Amount still held in escrow (zero before lock and after claim).
    pub fn locked_amount(&self) -> Amount {
        match &self.state {
            WalletState::Locked(r) => r.amount,
            _ => Amount::ZERO,
        }
    }

    /// Committed transitions, oldest first.
    pub fn history(&self) -> &[WalletTransition] {
        &self.history
    }

    /// Lock `amount` for `beneficiary` until `unlock_height`.
    ///
    /// Transfers `amount` from the caller to the contract and writes the
    /// lock record.
    ///
    /// # Errors
    ///
    /// - [`WalletError::NotAuthorized`] (100) if the caller is not the owner.
    /// - [`WalletError::AlreadyLocked`] (101) if a lock exists.
    /// - [`WalletError::UnlockHeightInPast`] (102) if `unlock_height` is not
    ///   after the current height.
    /// - [`WalletError::ZeroAmount`] (103) if `amount` is zero.
    /// - [`WalletError::TransferFailed`] if the deposit cannot be moved.
    pub fn lock(
        &mut self,
        ctx: &mut CallContext<'_>,
        beneficiary: Principal,
        unlock_height: BlockHeight,
        amount: Amount,
    ) -> Result<bool, WalletError> {
        let caller = ctx.caller;
        let current_height = ctx.clock.current_height();

        if caller != &self.owner {
            return Err(rejected(
                Operation::Lock,
                caller,
                WalletError::NotAuthorized {
                    caller: caller.clone(),
                    role: AuthorizedRole::Owner,
                },
            ));
        }
        if !matches!(self.state, WalletState::Uninitialized) {
            return Err(rejected(Operation::Lock, caller, WalletError::AlreadyLocked));
        }
        if unlock_height <= current_height {
            return Err(rejected(
                Operation::Lock,
                caller,
                WalletError::UnlockHeightInPast {
                    unlock_height,
                    current_height,
                },
            ));
        }
        if amount.is_zero() {
            return Err(rejected(Operation::Lock, caller, WalletError::ZeroAmount));
        }

        ctx.ledger
            .transfer(caller, &self.contract, amount)
            .map_err(|e| rejected(Operation::Lock, caller, e.into()))?;

        tracing::info!(
            locker = %caller,
            %beneficiary,
            %unlock_height,
            %amount,
            "funds locked"
        );
        let from = self.state.as_str();
        self.state = WalletState::Locked(LockRecord {
            locker: caller.clone(),
            beneficiary,
            unlock_height,
            amount,
            is_locked: true,
        });
        self.push_transition(Operation::Lock, caller, current_height, from);
        Ok(true)
    }

    /// Hand the claim right to `new_beneficiary`.
    ///
    /// No asset moves and no event is emitted.
    ///
    /// # Errors
    ///
    /// - [`WalletError::NotAuthorized`] (104) if the caller is not the
    ///   current beneficiary (including before any lock exists).
    /// - [`WalletError::AlreadyClaimed`] (106) after the funds were claimed.
    pub fn bestow(
        &mut self,
        ctx: &mut CallContext<'_>,
        new_beneficiary: Principal,
    ) -> Result<bool, WalletError> {
        let caller = ctx.caller;
        self.authorize_beneficiary(Operation::Bestow, caller)?;

        let current_height = ctx.clock.current_height();
        if let WalletState::Locked(record) = &mut self.state {
            tracing::debug!(
                previous = %record.beneficiary,
                next = %new_beneficiary,
                "claim right bestowed"
            );
            record.beneficiary = new_beneficiary;
        }
        self.push_transition(Operation::Bestow, caller, current_height, "LOCKED");
        Ok(true)
    }

    /// Pay the escrowed amount out to the caller.
    ///
    /// # Errors
    ///
    /// - [`WalletError::NotAuthorized`] (104) if the caller is not the
    ///   current beneficiary.
    /// - [`WalletError::AlreadyClaimed`] (106) if already paid out.
    /// - [`WalletError::NotYetUnlocked`] (105) before the unlock height.
    /// - [`WalletError::TransferFailed`] if the payout cannot be moved.
    pub fn claim(&mut self, ctx: &mut CallContext<'_>) -> Result<bool, WalletError> {
        let caller = ctx.caller;
        self.authorize_beneficiary(Operation::Claim, caller)?;

        let record = match &self.state {
            WalletState::Locked(r) => r.clone(),
            // authorize_beneficiary admits only the Locked state.
            _ => return Err(rejected(Operation::Claim, caller, WalletError::AlreadyClaimed)),
        };

        let current_height = ctx.clock.current_height();
        if current_height < record.unlock_height {
            return Err(rejected(
                Operation::Claim,
                caller,
                WalletError::NotYetUnlocked {
                    unlock_height: record.unlock_height,
                    current_height,
                },
            ));
        }

        ctx.ledger
            .transfer(&self.contract, caller, record.amount)
            .map_err(|e| rejected(Operation::Claim, caller, e.into()))?;

        tracing::info!(beneficiary = %caller, amount = %record.amount, "funds claimed");
        let from = self.state.as_str();
        self.state = WalletState::Claimed(record);
        self.push_transition(Operation::Claim, caller, current_height, from);
        Ok(true)
    }

    /// Require `caller` to be the beneficiary of an unclaimed lock.
    fn authorize_beneficiary(
        &self,
        operation: Operation,
        caller: &Principal,
    ) -> Result<(), WalletError> {
        if self.beneficiary() != Some(caller) {
            return Err(rejected(
                operation,
                caller,
                WalletError::NotAuthorized {
                    caller: caller.clone(),
                    role: AuthorizedRole::Beneficiary,
                },
            ));
        }
        if self.state.is_terminal() {
            return Err(rejected(operation, caller, WalletError::AlreadyClaimed));
        }
        Ok(())
    }

    fn push_transition(
        &mut self,
        operation: Operation,
        caller: &Principal,
        height: BlockHeight,
        from: &str,
    ) {
        self.history.push(WalletTransition {
            operation,
            caller: caller.clone(),
            height,
            from: from.to_string(),
            to: self.state.as_str().to_string(),
        });
    }
}

fn rejected(operation: Operation, caller: &Principal, err: WalletError) -> WalletError {
    tracing::warn!(%operation, %caller, code = err.code(), "rejected: {err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tlock_ledger::{InMemoryLedger, SimulatedChain};

    fn deployer() -> Principal {
        Principal::standard("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM").unwrap()
    }

    fn wallet_1() -> Principal {
        Principal::standard("ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5").unwrap()
    }

    fn wallet_2() -> Principal {
        Principal::standard("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG").unwrap()
    }

    struct Fixture {
        wallet: TimelockedWallet,
        chain: SimulatedChain,
        ledger: InMemoryLedger,
    }

    impl Fixture {
        fn new() -> Self {
            let mut ledger = InMemoryLedger::new();
            for p in [deployer(), wallet_1(), wallet_2()] {
                ledger.credit(&p, Amount::new(1_000)).unwrap();
            }
            Self {
                wallet: TimelockedWallet::deploy(deployer(), "wallet").unwrap(),
                chain: SimulatedChain::new(BlockHeight(1)),
                ledger,
            }
        }

        fn lock(
            &mut self,
            caller: &Principal,
            beneficiary: Principal,
            unlock: u64,
            amount: u128,
        ) -> Result<bool, WalletError> {
            let mut ctx = CallContext::new(caller, &self.chain, &mut self.ledger);
            self.wallet
                .lock(&mut ctx, beneficiary, BlockHeight(unlock), Amount::new(amount))
        }

        fn bestow(&mut self, caller: &Principal, to: Principal) -> Result<bool, WalletError> {
            let mut ctx = CallContext::new(caller, &self.chain, &mut self.ledger);
            self.wallet.bestow(&mut ctx, to)
        }

        fn claim(&mut self, caller: &Principal) -> Result<bool, WalletError> {
            let mut ctx = CallContext::new(caller, &self.chain, &mut self.ledger);
            self.wallet.claim(&mut ctx)
        }

        fn locked() -> Self {
            let mut f = Self::new();
            f.lock(&deployer(), wallet_1(), 10, 10).unwrap();
            f
        }
    }

    #[test]
    fn deploy_starts_uninitialized() {
        let wallet = TimelockedWallet::deploy(deployer(), "wallet").unwrap();
        assert_eq!(wallet.state(), &WalletState::Uninitialized);
        assert_eq!(wallet.owner(), &deployer());
        assert_eq!(
            wallet.contract_principal().to_string(),
            "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.wallet"
        );
        assert!(wallet.record().is_none());
        assert!(wallet.beneficiary().is_none());
        assert_eq!(wallet.locked_amount(), Amount::ZERO);
    }

    #[test]
    fn deploy_rejects_bad_contract_name() {
        assert!(TimelockedWallet::deploy(deployer(), "not a name").is_err());
    }

    #[test]
    fn lock_moves_funds_and_writes_record() {
        let mut f = Fixture::new();
        assert_eq!(f.lock(&deployer(), wallet_1(), 10, 10), Ok(true));

        let record = f.wallet.record().unwrap();
        assert_eq!(record.locker, deployer());
        assert_eq!(record.beneficiary, wallet_1());
        assert_eq!(record.unlock_height, BlockHeight(10));
        assert_eq!(record.amount, Amount::new(10));
        assert!(record.is_locked);

        let contract = f.wallet.contract_principal().clone();
        assert_eq!(f.ledger.balance(&contract), Amount::new(10));
        assert_eq!(f.ledger.balance(&deployer()), Amount::new(990));

        assert_eq!(f.ledger.event_count(), 1);
        let event = f.ledger.events()[0].as_transfer().unwrap();
        assert_eq!(event.sender, deployer());
        assert_eq!(event.recipient, contract);
        assert_eq!(event.amount, Amount::new(10));
    }

    #[test]
    fn lock_by_non_owner_is_100() {
        let mut f = Fixture::new();
        let err = f.lock(&wallet_1(), wallet_2(), 10, 10).unwrap_err();
        assert_eq!(err.code(), 100);
        assert_eq!(f.wallet.state(), &WalletState::Uninitialized);
        assert_eq!(f.ledger.event_count(), 0);
    }

    #[test]
    fn second_lock_is_101() {
        let mut f = Fixture::locked();
        let err = f.lock(&deployer(), wallet_2(), 50, 5).unwrap_err();
        assert_eq!(err.code(), 101);
        assert_eq!(f.ledger.event_count(), 1);
        assert_eq!(f.wallet.beneficiary(), Some(&wallet_1()));
    }

    #[test]
    fn second_lock_by_non_owner_reports_authorization_first() {
        let mut f = Fixture::locked();
        assert_eq!(f.lock(&wallet_1(), wallet_2(), 50, 5).unwrap_err().code(), 100);
    }

    #[test]
    fn lock_with_past_or_current_height_is_102() {
        let mut f = Fixture::new();
        f.chain.mine_empty_blocks(11);
        let err = f.lock(&deployer(), wallet_1(), 10, 10).unwrap_err();
        assert_eq!(err.code(), 102);

        let current = f.chain.current_height().value();
        let err = f.lock(&deployer(), wallet_1(), current, 10).unwrap_err();
        assert_eq!(err.code(), 102);
        assert_eq!(f.ledger.event_count(), 0);
    }

    #[test]
    fn lock_zero_amount_is_103() {
        let mut f = Fixture::new();
        assert_eq!(f.lock(&deployer(), wallet_1(), 10, 0).unwrap_err().code(), 103);
        assert_eq!(f.wallet.state(), &WalletState::Uninitialized);
    }

    #[test]
    fn lock_with_insufficient_balance_writes_nothing() {
        let mut f = Fixture::new();
        let err = f.lock(&deployer(), wallet_1(), 10, 5_000).unwrap_err();
        assert!(matches!(err, WalletError::TransferFailed(_)));
        assert_eq!(err.code(), 1);
        assert_eq!(f.wallet.state(), &WalletState::Uninitialized);
        assert_eq!(f.ledger.balance(&deployer()), Amount::new(1_000));
        assert_eq!(f.ledger.event_count(), 0);
        assert!(f.wallet.history().is_empty());

        // A corrected retry still succeeds.
        assert_eq!(f.lock(&deployer(), wallet_1(), 10, 500), Ok(true));
    }

    #[test]
    fn bestow_by_beneficiary_reassigns() {
        let mut f = Fixture::locked();
        assert_eq!(f.bestow(&wallet_1(), wallet_2()), Ok(true));
        assert_eq!(f.wallet.beneficiary(), Some(&wallet_2()));
        assert_eq!(f.ledger.event_count(), 1);
    }

    #[test]
    fn bestow_by_locker_or_stranger_is_104() {
        let mut f = Fixture::locked();
        assert_eq!(f.bestow(&deployer(), wallet_2()).unwrap_err().code(), 104);
        assert_eq!(f.bestow(&wallet_2(), wallet_2()).unwrap_err().code(), 104);
        assert_eq!(f.wallet.beneficiary(), Some(&wallet_1()));
    }

    #[test]
    fn bestow_before_lock_is_104() {
        let mut f = Fixture::new();
        assert_eq!(f.bestow(&wallet_1(), wallet_2()).unwrap_err().code(), 104);
    }

    #[test]
    fn bestow_to_self_and_back_to_locker_allowed() {
        let mut f = Fixture::locked();
        assert_eq!(f.bestow(&wallet_1(), wallet_1()), Ok(true));
        assert_eq!(f.bestow(&wallet_1(), deployer()), Ok(true));
        assert_eq!(f.wallet.beneficiary(), Some(&deployer()));
    }

    #[test]
    fn previous_beneficiary_loses_rights_after_bestow() {
        let mut f = Fixture::locked();
        f.bestow(&wallet_1(), wallet_2()).unwrap();
        f.chain.mine_empty_blocks(20);
        assert_eq!(f.claim(&wallet_1()).unwrap_err().code(), 104);
        assert_eq!(f.bestow(&wallet_1(), wallet_1()).unwrap_err().code(), 104);
        assert_eq!(f.claim(&wallet_2()), Ok(true));
    }

    #[test]
    fn claim_before_unlock_is_105() {
        let mut f = Fixture::locked();
        let err = f.claim(&wallet_1()).unwrap_err();
        assert_eq!(err.code(), 105);
        assert_eq!(f.wallet.locked_amount(), Amount::new(10));
    }

    #[test]
    fn claim_by_stranger_is_104_at_any_height() {
        let mut f = Fixture::locked();
        assert_eq!(f.claim(&wallet_2()).unwrap_err().code(), 104);
        f.chain.mine_empty_blocks(100);
        assert_eq!(f.claim(&wallet_2()).unwrap_err().code(), 104);
        assert_eq!(f.claim(&deployer()).unwrap_err().code(), 104);
    }

    #[test]
    fn claim_at_exact_unlock_height_succeeds() {
        let mut f = Fixture::locked();
        f.chain.mine_empty_blocks(9);
        assert_eq!(f.chain.current_height(), BlockHeight(10));
        assert_eq!(f.claim(&wallet_1()), Ok(true));

        let contract = f.wallet.contract_principal().clone();
        assert_eq!(f.ledger.balance(&contract), Amount::ZERO);
        assert_eq!(f.ledger.balance(&wallet_1()), Amount::new(1_010));
        let event = f.ledger.events()[1].as_transfer().unwrap();
        assert_eq!(event.sender, contract);
        assert_eq!(event.recipient, wallet_1());
        assert_eq!(event.amount, Amount::new(10));
        assert!(f.wallet.state().is_terminal());
        assert_eq!(f.wallet.locked_amount(), Amount::ZERO);
    }

    #[test]
    fn second_claim_is_106_without_events() {
        let mut f = Fixture::locked();
        f.chain.mine_empty_blocks(10);
        f.claim(&wallet_1()).unwrap();
        assert_eq!(f.claim(&wallet_1()).unwrap_err().code(), 106);
        assert_eq!(f.bestow(&wallet_1(), wallet_2()).unwrap_err().code(), 106);
        assert_eq!(f.claim(&wallet_2()).unwrap_err().code(), 104);
        assert_eq!(f.ledger.event_count(), 2);
        // The record survives the claim.
        assert!(f.wallet.record().unwrap().is_locked);
    }

    #[test]
    fn lock_after_claim_is_still_101() {
        let mut f = Fixture::locked();
        f.chain.mine_empty_blocks(10);
        f.claim(&wallet_1()).unwrap();
        assert_eq!(f.lock(&deployer(), wallet_2(), 100, 1).unwrap_err().code(), 101);
    }

    #[test]
    fn history_records_committed_transitions_only() {
        let mut f = Fixture::locked();
        let _ = f.bestow(&deployer(), wallet_2());
        f.bestow(&wallet_1(), wallet_2()).unwrap();
        f.chain.mine_empty_blocks(10);
        f.claim(&wallet_2()).unwrap();

        let ops: Vec<Operation> = f.wallet.history().iter().map(|t| t.operation).collect();
        assert_eq!(ops, vec![Operation::Lock, Operation::Bestow, Operation::Claim]);
        let last = f.wallet.history().last().unwrap();
        assert_eq!(last.from, "LOCKED");
        assert_eq!(last.to, "CLAIMED");
        assert_eq!(last.height, BlockHeight(11));
    }

    #[test]
    fn operation_names_round_trip() {
        for op in [Operation::Lock, Operation::Bestow, Operation::Claim] {
            assert_eq!(Operation::from_name(op.as_str()), Some(op));
        }
        assert_eq!(Operation::from_name("withdraw"), None);
    }

    #[test]
    fn state_serializes_with_status_tag() {
        let f = Fixture::locked();
        let value = serde_json::to_value(f.wallet.state()).unwrap();
        assert_eq!(value["status"], "LOCKED");
        assert_eq!(value["record"]["amount"], "10");
        assert_eq!(value["record"]["unlock_height"], 10);
    }

    #[test]
    fn locked_wallet_snapshot_reloads() {
        let mut f = Fixture::locked();
        f.bestow(&wallet_1(), wallet_2()).unwrap();
        let json = serde_json::to_string(&f.wallet).unwrap();
        let back: TimelockedWallet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.state(), f.wallet.state());
        assert_eq!(back.contract_principal(), f.wallet.contract_principal());
        assert_eq!(back.history().len(), 2);
    }

    #[test]
    fn locked_record_with_zero_amount_is_rejected() {
        let f = Fixture::locked();
        let mut value = serde_json::to_value(f.wallet.state()).unwrap();
        value["record"]["amount"] = serde_json::json!("0");
        let err = serde_json::from_value::<WalletState>(value).unwrap_err();
        assert!(err.to_string().contains("zero amount"), "{err}");
    }

    #[test]
    fn record_with_cleared_lock_flag_is_rejected() {
        let f = Fixture::locked();
        let mut value = serde_json::to_value(f.wallet.state()).unwrap();
        value["status"] = serde_json::json!("CLAIMED");
        value["record"]["is_locked"] = serde_json::json!(false);
        let err = serde_json::from_value::<WalletState>(value).unwrap_err();
        assert!(err.to_string().contains("is_locked"), "{err}");
    }

    #[test]
    fn wallet_with_foreign_contract_is_rejected() {
        let f = Fixture::locked();
        let mut value = serde_json::to_value(&f.wallet).unwrap();
        value["contract"] = serde_json::json!(wallet_1().to_string());
        let err = serde_json::from_value::<TimelockedWallet>(value).unwrap_err();
        assert!(err.to_string().contains("not a contract"), "{err}");

        let mut value = serde_json::to_value(&f.wallet).unwrap();
        value["contract"] = serde_json::json!(format!("{}.wallet", wallet_2()));
        assert!(serde_json::from_value::<TimelockedWallet>(value).is_err());
    }

    #[test]
    fn lock_record_from_another_locker_is_rejected() {
        let f = Fixture::locked();
        let mut value = serde_json::to_value(&f.wallet).unwrap();
        value["state"]["record"]["locker"] = serde_json::json!(wallet_2().to_string());
        let err = serde_json::from_value::<TimelockedWallet>(value).unwrap_err();
        assert!(err.to_string().contains("as locker"), "{err}");
    }

    proptest! {
        /// Claim by the beneficiary succeeds exactly when the chain has
        /// reached the unlock height, and funds are conserved either way.
        #[test]
        fn claim_gated_by_height(
            unlock in 2u64..200,
            wait in 0u64..300,
            amount in 1u128..1_000,
        ) {
            let mut f = Fixture::new();
            f.lock(&deployer(), wallet_1(), unlock, amount).unwrap();
            f.chain.mine_empty_blocks(wait);
            let reached = f.chain.current_height() >= BlockHeight(unlock);
            let result = f.claim(&wallet_1());
            prop_assert_eq!(result.is_ok(), reached);
            if !reached {
                prop_assert_eq!(result.unwrap_err().code(), 105);
            }
            prop_assert_eq!(f.ledger.total_supply(), Some(Amount::new(3_000)));
        }

        /// Any non-owner lock attempt is rejected with 100 and leaves the
        /// wallet untouched.
        #[test]
        fn only_owner_locks(unlock in 0u64..100, amount in 0u128..2_000) {
            let mut f = Fixture::new();
            for caller in [wallet_1(), wallet_2()] {
                let err = f.lock(&caller, wallet_1(), unlock, amount).unwrap_err();
                prop_assert_eq!(err.code(), 100);
            }
            prop_assert_eq!(f.wallet.state(), &WalletState::Uninitialized);
            prop_assert_eq!(f.ledger.event_count(), 0);
        }
    }
}
