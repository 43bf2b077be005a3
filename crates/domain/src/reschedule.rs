// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reschedule negotiation.
//!
//! Either party may propose a new time. The other role approves (the
//! training moves) or either role rejects (the proposal is dropped). A new
//! proposal overwrites a pending one.

use crate::error::DomainError;
use crate::training::Training;
use crate::user::UserType;
use time::OffsetDateTime;

/// A pending request to move a training.
///
/// The new time and the proposer only exist together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescheduleProposal {
    /// The proposed start of the training.
    pub new_time: OffsetDateTime,
    /// The role that made the proposal.
    pub proposed_by: UserType,
}

impl Training {
    /// Returns true if a reschedule proposal is pending.
    #[must_use]
    pub const fn is_reschedule_proposed(&self) -> bool {
        self.proposed_reschedule.is_some()
    }

    /// Returns the pending proposal, if any.
    #[must_use]
    pub const fn proposed_reschedule(&self) -> Option<RescheduleProposal> {
        self.proposed_reschedule
    }

    /// Returns the proposed new time, if a proposal is pending.
    #[must_use]
    pub fn proposed_new_time(&self) -> Option<OffsetDateTime> {
        self.proposed_reschedule.map(|p| p.new_time)
    }

    /// Returns the role that proposed the pending reschedule.
    #[must_use]
    pub fn move_proposed_by(&self) -> Option<UserType> {
        self.proposed_reschedule.map(|p| p.proposed_by)
    }

    /// Records a reschedule proposal, replacing any pending one.
    ///
    /// # Errors
    ///
    /// Fails only if the training is canceled.
    pub const fn propose_reschedule(
        &mut self,
        new_time: OffsetDateTime,
        proposer: UserType,
    ) -> Result<(), DomainError> {
        if self.is_canceled() {
            return Err(DomainError::TrainingCanceled);
        }
        self.proposed_reschedule = Some(RescheduleProposal {
            new_time,
            proposed_by: proposer,
        });
        Ok(())
    }

    /// Accepts the pending proposal and moves the training.
    ///
    /// # Errors
    ///
    /// Fails if the training is canceled, nothing was proposed, or the
    /// approver has the same role as the proposer.
    pub fn approve_reschedule(&mut self, approver: UserType) -> Result<(), DomainError> {
        self.ensure_not_canceled()?;
        let proposal = self
            .proposed_reschedule
            .ok_or(DomainError::NoRescheduleRequested)?;

        if proposal.proposed_by == approver {
            return Err(DomainError::SameUserTypeApproval {
                user_type: approver,
            });
        }

        self.set_time(proposal.new_time);
        self.proposed_reschedule = None;
        Ok(())
    }

    /// Drops the pending proposal; the training time is unchanged.
    ///
    /// # Errors
    ///
    /// Fails if the training is canceled or nothing was proposed.
    pub fn reject_reschedule(&mut self) -> Result<(), DomainError> {
        self.ensure_not_canceled()?;
        if self.proposed_reschedule.is_none() {
            return Err(DomainError::NoRescheduleRequested);
        }
        self.proposed_reschedule = None;
        Ok(())
    }
}
