//! Access control (spec.md §4.6): an `ADMIN` role for reserve
//! initialization, pause and freeze, plus a borrow-delegation allowance.
//!
//! Grounded on `liquidity_pool/src/liquidity.rs`'s `#[only_owner]`
//! modifier pattern, reworked into an explicit guard function per
//! spec.md REDESIGN FLAGS ("modifiers become explicit guard expressions
//! at each operation entry"). The source declares a `LIQUIDATOR` role
//! but never enforces it (spec.md §4.6) — liquidation stays open to any
//! caller here too, so no such role is modeled.
//!
//! Borrow delegation (spec.md §9 Open Question 2): the source lets
//! `borrow(asset, amount, onBehalfOf)` charge debt to `onBehalfOf` while
//! paying out `caller`, without `onBehalfOf`'s consent. DESIGN.md
//! decided this is a defect to fix rather than reproduce: `onBehalfOf`
//! must either be the caller, or have granted the caller a delegation
//! beforehand, in the same approve/allowance shape the supply ledger
//! already uses for `TransferOnLiquidation`.

use std::collections::HashSet;

use lending_common::{AccountId, LendingError, LendingResult};

#[derive(Debug, Default)]
pub struct AccessControl {
    admins: HashSet<AccountId>,
    /// `(on_behalf_of, delegate)` pairs: `on_behalf_of` has authorized
    /// `delegate` to call `borrow` charging debt to `on_behalf_of`.
    borrow_delegations: HashSet<(AccountId, AccountId)>,
}

impl AccessControl {
    /// Bootstraps a single default admin at construction (spec.md §4.6).
    pub fn new(default_admin: AccountId) -> Self {
        let mut admins = HashSet::new();
        admins.insert(default_admin);
        Self {
            admins,
            borrow_delegations: HashSet::new(),
        }
    }

    pub fn is_admin(&self, account: &AccountId) -> bool {
        self.admins.contains(account)
    }

    pub fn require_admin(&self, caller: &AccountId) -> LendingResult<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(LendingError::Unauthorized {
                caller: caller.clone(),
                role: "ADMIN",
            })
        }
    }

    pub fn grant_admin(&mut self, caller: &AccountId, new_admin: AccountId) -> LendingResult<()> {
        self.require_admin(caller)?;
        self.admins.insert(new_admin);
        Ok(())
    }

    pub fn revoke_admin(&mut self, caller: &AccountId, admin: &AccountId) -> LendingResult<()> {
        self.require_admin(caller)?;
        self.admins.remove(admin);
        Ok(())
    }

    /// `on_behalf_of` authorizes `delegate` to borrow on their behalf.
    pub fn approve_borrow_delegation(&mut self, on_behalf_of: AccountId, delegate: AccountId) {
        self.borrow_delegations.insert((on_behalf_of, delegate));
    }

    pub fn revoke_borrow_delegation(&mut self, on_behalf_of: &AccountId, delegate: &AccountId) {
        self.borrow_delegations.remove(&(on_behalf_of.clone(), delegate.clone()));
    }

    /// A caller may borrow on behalf of `on_behalf_of` if they are the
    /// same account, or if `on_behalf_of` has delegated to them.
    pub fn require_borrow_authorized(&self, caller: &AccountId, on_behalf_of: &AccountId) -> LendingResult<()> {
        if caller == on_behalf_of || self.borrow_delegations.contains(&(on_behalf_of.clone(), caller.clone())) {
            Ok(())
        } else {
            Err(LendingError::BorrowNotDelegated {
                caller: caller.clone(),
                on_behalf_of: on_behalf_of.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_admin_is_bootstrapped() {
        let admin = AccountId::new("admin");
        let access = AccessControl::new(admin.clone());
        assert!(access.is_admin(&admin));
        assert!(access.require_admin(&admin).is_ok());
    }

    #[test]
    fn non_admin_is_rejected() {
        let admin = AccountId::new("admin");
        let access = AccessControl::new(admin);
        let stranger = AccountId::new("stranger");
        assert!(access.require_admin(&stranger).is_err());
    }

    #[test]
    fn self_borrow_never_needs_delegation() {
        let access = AccessControl::new(AccountId::new("admin"));
        let user = AccountId::new("user1");
        assert!(access.require_borrow_authorized(&user, &user).is_ok());
    }

    #[test]
    fn undelegated_borrow_on_behalf_of_another_is_rejected() {
        let access = AccessControl::new(AccountId::new("admin"));
        let caller = AccountId::new("caller");
        let owner = AccountId::new("owner");
        assert!(access.require_borrow_authorized(&caller, &owner).is_err());
    }

    #[test]
    fn approved_delegation_authorizes_the_delegate() {
        let mut access = AccessControl::new(AccountId::new("admin"));
        let caller = AccountId::new("caller");
        let owner = AccountId::new("owner");
        access.approve_borrow_delegation(owner.clone(), caller.clone());
        assert!(access.require_borrow_authorized(&caller, &owner).is_ok());
        access.revoke_borrow_delegation(&owner, &caller);
        assert!(access.require_borrow_authorized(&caller, &owner).is_err());
    }
}
