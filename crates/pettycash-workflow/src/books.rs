use std::collections::{BTreeMap, HashMap};

use pettycash_core::{
    CashReimbursement, CashRequest, Department, Float, FloatCustomization, PettyCashConfig,
    PettyCashError, Result,
};
use pettycash_denomination::DenominationTally;
use pettycash_finance::{FloatBalances, compute_balances};
use uuid::Uuid;

/// Every record the desk owns.
#[derive(Default)]
pub(crate) struct Books {
    pub floats: HashMap<Uuid, Float>,
    pub tallies: HashMap<Uuid, DenominationTally>,
    pub requests: HashMap<Uuid, CashRequest>,
    pub reimbursements: HashMap<Uuid, CashReimbursement>,
    pub customizations: HashMap<Uuid, FloatCustomization>,
    pub departments: BTreeMap<String, Department>,
    pub config: Option<PettyCashConfig>,
}

impl Books {
    pub fn float(&self, id: Uuid) -> Result<&Float> {
        self.floats
            .get(&id)
            .ok_or_else(|| PettyCashError::not_found("float", id))
    }

    pub fn float_mut(&mut self, id: Uuid) -> Result<&mut Float> {
        self.floats
            .get_mut(&id)
            .ok_or_else(|| PettyCashError::not_found("float", id))
    }

    pub fn tally(&self, float_id: Uuid) -> Result<&DenominationTally> {
        self.tallies
            .get(&float_id)
            .ok_or_else(|| PettyCashError::not_found("denomination tally", float_id))
    }

    pub fn tally_mut(&mut self, float_id: Uuid) -> Result<&mut DenominationTally> {
        self.tallies
            .get_mut(&float_id)
            .ok_or_else(|| PettyCashError::not_found("denomination tally", float_id))
    }

    pub fn request(&self, id: Uuid) -> Result<&CashRequest> {
        self.requests
            .get(&id)
            .ok_or_else(|| PettyCashError::not_found("cash request", id))
    }

    pub fn request_mut(&mut self, id: Uuid) -> Result<&mut CashRequest> {
        self.requests
            .get_mut(&id)
            .ok_or_else(|| PettyCashError::not_found("cash request", id))
    }

    pub fn reimbursement(&self, id: Uuid) -> Result<&CashReimbursement> {
        self.reimbursements
            .get(&id)
            .ok_or_else(|| PettyCashError::not_found("cash reimbursement", id))
    }

    pub fn reimbursement_mut(&mut self, id: Uuid) -> Result<&mut CashReimbursement> {
        self.reimbursements
            .get_mut(&id)
            .ok_or_else(|| PettyCashError::not_found("cash reimbursement", id))
    }

    pub fn customization(&self, id: Uuid) -> Result<&FloatCustomization> {
        self.customizations
            .get(&id)
            .ok_or_else(|| PettyCashError::not_found("float customization", id))
    }

    pub fn customization_mut(&mut self, id: Uuid) -> Result<&mut FloatCustomization> {
        self.customizations
            .get_mut(&id)
            .ok_or_else(|| PettyCashError::not_found("float customization", id))
    }

    /// The stored configuration, or the defaults when none was saved yet.
    pub fn config(&self) -> PettyCashConfig {
        self.config.clone().unwrap_or_default()
    }

    pub fn balances(&self, float: &Float) -> FloatBalances {
        compute_balances(float, self.requests.values(), self.reimbursements.values())
    }
}
