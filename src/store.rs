use crate::error::{BillingError, Result};
use crate::schema::Contract;
use log::debug;
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Change notification emitted by a contract store, carrying the affected
/// contract id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Created(String),
    Updated(String),
    Deleted(String),
}

/// The persistence collaborator the billing core reads and writes contract
/// records through. Keyed by contract id; no schema enforcement beyond the
/// `Contract` shape, and no read-after-write guarantee beyond "callers supply
/// current data" — implementations own their consistency.
pub trait ContractStore {
    fn create(&mut self, contract: Contract) -> Result<()>;
    fn update(&mut self, contract: Contract) -> Result<()>;
    fn delete(&mut self, id: &str) -> Result<()>;
    fn get(&self, id: &str) -> Option<Contract>;
    fn list_all(&self) -> Vec<Contract>;
    /// Registers a change listener. Events arrive on the returned channel
    /// until the receiver is dropped.
    fn subscribe(&mut self) -> Receiver<StoreEvent>;
}

/// In-memory store, sufficient for the single-user deployment and for tests.
#[derive(Default)]
pub struct MemoryStore {
    contracts: BTreeMap<String, Contract>,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&mut self, event: StoreEvent) {
        // Dropped receivers fall out of the list on the next send
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl ContractStore for MemoryStore {
    fn create(&mut self, contract: Contract) -> Result<()> {
        contract.validate()?;
        if self.contracts.contains_key(&contract.id) {
            return Err(BillingError::ValidationError {
                contract: contract.id,
                details: "contract id already exists".to_string(),
            });
        }

        let id = contract.id.clone();
        debug!("storing contract {}", id);
        self.contracts.insert(id.clone(), contract);
        self.notify(StoreEvent::Created(id));
        Ok(())
    }

    fn update(&mut self, contract: Contract) -> Result<()> {
        contract.validate()?;
        if !self.contracts.contains_key(&contract.id) {
            return Err(BillingError::ContractNotFound(contract.id));
        }

        let id = contract.id.clone();
        self.contracts.insert(id.clone(), contract);
        self.notify(StoreEvent::Updated(id));
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        if self.contracts.remove(id).is_none() {
            return Err(BillingError::ContractNotFound(id.to_string()));
        }
        self.notify(StoreEvent::Deleted(id.to_string()));
        Ok(())
    }

    fn get(&self, id: &str) -> Option<Contract> {
        self.contracts.get(id).cloned()
    }

    fn list_all(&self) -> Vec<Contract> {
        self.contracts.values().cloned().collect()
    }

    fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }
}
