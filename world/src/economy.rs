//! Gold ledger and base hit points.

use mystic_towers_core::{Gold, Health};

/// Gold balance shared by rewards, placements and upgrades.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Economy {
    balance: Gold,
}

impl Economy {
    pub(crate) const fn new(starting: Gold) -> Self {
        Self { balance: starting }
    }

    pub(crate) const fn balance(&self) -> Gold {
        self.balance
    }

    pub(crate) fn earn(&mut self, amount: Gold) {
        self.balance = Gold::new(self.balance.get().saturating_add(amount.get()));
    }

    /// Deducts `amount` when affordable. Leaves the balance untouched otherwise.
    #[must_use]
    pub(crate) fn spend(&mut self, amount: Gold) -> bool {
        match self.balance.get().checked_sub(amount.get()) {
            Some(remaining) => {
                self.balance = Gold::new(remaining);
                true
            }
            None => false,
        }
    }
}

/// Hit points of the defended base.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Base {
    health: Health,
}

impl Base {
    pub(crate) const fn new(health: Health) -> Self {
        Self { health }
    }

    pub(crate) const fn health(&self) -> Health {
        self.health
    }

    pub(crate) const fn is_destroyed(&self) -> bool {
        self.health.is_zero()
    }

    pub(crate) fn damage(&mut self, amount: u32) -> Health {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub(crate) fn breach(&mut self) {
        self.health = Health::ZERO;
    }
}
