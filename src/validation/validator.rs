use crate::{Batch, error::DisperseError};
use ethers::types::{Address, U256};
use tracing::{debug, warn};

/// Validate stage of every distribution.
///
/// A batch passes only if the caller is not the distributor, the lists pair
/// up and no entry names the null address, the distributor itself, or a zero
/// amount. The first bad entry rejects the whole batch before anything moves.
pub struct Validator {
    distributor: Address,
}

impl Validator {
    pub fn new(distributor: Address) -> Self {
        Self { distributor }
    }

    pub fn validate<'a>(
        &self,
        caller: Address,
        recipients: &'a [Address],
        amounts: &'a [U256],
    ) -> Result<Batch<'a>, DisperseError> {
        // Custody cannot pay into itself.
        if caller == self.distributor {
            warn!("Rejecting batch: caller is the distributor {:?}", caller);
            return Err(DisperseError::InvalidCaller { caller });
        }

        let batch = Batch::new(recipients, amounts)?;

        for (index, (recipient, amount)) in batch.legs().enumerate() {
            if recipient.is_zero() || recipient == self.distributor {
                warn!("Rejecting batch: invalid recipient {:?} at index {}", recipient, index);
                return Err(DisperseError::InvalidRecipient { index, recipient });
            }
            if amount.is_zero() {
                warn!("Rejecting batch: zero amount at index {}", index);
                return Err(DisperseError::InvalidAmount { index });
            }
        }

        debug!("Batch of {} legs validated", batch.len());
        Ok(batch)
    }
}
