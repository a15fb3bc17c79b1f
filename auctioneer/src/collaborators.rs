//! Deployment-time implementations of the engine's collaborator traits.

use auction::escrow::{AccessControl, Escrow};
use primitive_types::{H160, U256};
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

/// Escrow that records transfers instead of moving funds. Settlement against
/// the custody backend happens out of band from the recorded flows.
#[derive(Debug, Default)]
pub struct LoggingEscrow {
    flows: Mutex<HashMap<H160, Flow>>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flow {
    pub received: U256,
    pub refunded: U256,
}

impl LoggingEscrow {
    pub fn flow(&self, account: &H160) -> Flow {
        let flows = self.flows.lock().unwrap();
        flows.get(account).copied().unwrap_or_default()
    }
}

impl Escrow for LoggingEscrow {
    fn receive(&self, from: H160, amount: U256) -> anyhow::Result<()> {
        let mut flows = self.flows.lock().unwrap();
        let flow = flows.entry(from).or_default();
        flow.received = flow
            .received
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("escrow balance overflow for {:?}", from))?;
        tracing::info!(?from, %amount, "escrow receive");
        Ok(())
    }

    fn refund(&self, to: H160, amount: U256) -> anyhow::Result<()> {
        let mut flows = self.flows.lock().unwrap();
        let flow = flows.entry(to).or_default();
        flow.refunded = flow
            .refunded
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("escrow balance overflow for {:?}", to))?;
        tracing::info!(?to, %amount, "escrow refund");
        Ok(())
    }
}

/// Admins and the allocator are fixed at startup through command line
/// arguments.
#[derive(Debug)]
pub struct StaticAccessControl {
    admins: HashSet<H160>,
    allocator: H160,
}

impl StaticAccessControl {
    pub fn new(admins: impl IntoIterator<Item = H160>, allocator: H160) -> Self {
        Self {
            admins: admins.into_iter().collect(),
            allocator,
        }
    }
}

impl AccessControl for StaticAccessControl {
    fn is_admin(&self, caller: H160) -> bool {
        self.admins.contains(&caller)
    }

    fn is_allocator(&self, caller: H160) -> bool {
        self.allocator == caller
    }
}
