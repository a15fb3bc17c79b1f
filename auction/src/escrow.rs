//! Interfaces of the external collaborators the engine talks to.
//!
//! The engine never custodies funds. All payments and refunds flow through
//! the escrow, and principal checks are delegated to the host's access
//! control.

use primitive_types::{H160, U256};

#[cfg_attr(test, mockall::automock)]
pub trait Escrow: Send + Sync {
    /// Takes custody of a payment made by a node operator.
    fn receive(&self, from: H160, amount: U256) -> anyhow::Result<()>;

    /// Returns funds to a node operator.
    fn refund(&self, to: H160, amount: U256) -> anyhow::Result<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait AccessControl: Send + Sync {
    /// Whether the caller may mutate auction parameters and the whitelist.
    fn is_admin(&self, caller: H160) -> bool;

    /// Whether the caller is the allocator, the only principal permitted to
    /// trigger cluster allocation.
    fn is_allocator(&self, caller: H160) -> bool;
}
