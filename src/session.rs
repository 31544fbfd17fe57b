//! Selection state of the contract screen.
//!
//! The screen walks owner → apartment → tenant and ends with a
//! [`ContractDraft`]. All correlated selection lives in [`ContractSession`]
//! and changes only through [`ContractSession::reduce`].

use std::fmt;

use crate::data::model::Role;
use crate::data::{Dataset, EntityId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SelectOwner(EntityId),
    SelectApartment(EntityId),
    SetTenant(EntityId),
    /// Undo the most recent selection.
    Back,
    ClearSelection,
    SaveContract,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    UnknownOwner(EntityId),
    UnknownApartment(EntityId),
    UnknownTenant(EntityId),
    ApartmentNotOwned {
        apartment: EntityId,
        owner: EntityId,
    },
    NoOwnerSelected,
    Incomplete(Step),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOwner(id) => write!(f, "No owner with id {id}"),
            Self::UnknownApartment(id) => write!(f, "No apartment with id {id}"),
            Self::UnknownTenant(id) => write!(f, "No tenant with id {id}"),
            Self::ApartmentNotOwned { apartment, owner } => {
                write!(f, "Apartment {apartment} does not belong to owner {owner}")
            }
            Self::NoOwnerSelected => f.write_str("Select an owner first"),
            Self::Incomplete(step) => write!(f, "Cannot save yet: {}", step.prompt()),
        }
    }
}

impl std::error::Error for SessionError {}

/// What the session is waiting for next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Owner,
    Apartment,
    Tenant,
    Confirm,
}

impl Step {
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Owner => "select an owner",
            Self::Apartment => "select an apartment",
            Self::Tenant => "select a tenant",
            Self::Confirm => "save the contract",
        }
    }
}

/// A contract ready to hand to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDraft {
    pub owner_id: EntityId,
    pub apartment_id: EntityId,
    pub tenant_id: EntityId,
    pub owner: String,
    pub apartment: String,
    pub tenant: String,
}

impl fmt::Display for ContractDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rents {} from {}",
            self.tenant, self.apartment, self.owner
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractSession {
    pub owner: Option<EntityId>,
    pub apartment: Option<EntityId>,
    pub tenant: Option<EntityId>,
    /// Draft produced by the last successful save.
    pub saved: Option<ContractDraft>,
}

impl ContractSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn step(&self) -> Step {
        match (&self.owner, &self.apartment, &self.tenant) {
            (None, _, _) => Step::Owner,
            (Some(_), None, _) => Step::Apartment,
            (Some(_), Some(_), None) => Step::Tenant,
            (Some(_), Some(_), Some(_)) => Step::Confirm,
        }
    }

    /// Applies `event`, returning the next session. `self` is left untouched
    /// when the event is rejected.
    pub fn reduce(&self, event: SessionEvent, dataset: &Dataset) -> Result<Self, SessionError> {
        let mut next = self.clone();
        match event {
            SessionEvent::SelectOwner(id) => {
                if !dataset.owners().any(|u| u.id == id) {
                    return Err(SessionError::UnknownOwner(id));
                }
                if next.owner.as_ref() != Some(&id) {
                    next.apartment = None;
                    next.tenant = None;
                }
                next.owner = Some(id);
                next.saved = None;
            }
            SessionEvent::SelectApartment(id) => {
                let owner = next.owner.clone().ok_or(SessionError::NoOwnerSelected)?;
                let apartment = dataset
                    .apartment(&id)
                    .ok_or_else(|| SessionError::UnknownApartment(id.clone()))?;
                if apartment.owner_id.as_ref() != Some(&owner) {
                    return Err(SessionError::ApartmentNotOwned {
                        apartment: id,
                        owner,
                    });
                }
                if next.apartment.as_ref() != Some(&id) {
                    next.tenant = None;
                }
                next.apartment = Some(id);
                next.saved = None;
            }
            SessionEvent::SetTenant(id) => {
                if !matches!(self.step(), Step::Tenant | Step::Confirm) {
                    return Err(SessionError::Incomplete(self.step()));
                }
                if !dataset.user(&id).is_some_and(|u| u.role == Role::Tenant) {
                    return Err(SessionError::UnknownTenant(id));
                }
                next.tenant = Some(id);
                next.saved = None;
            }
            SessionEvent::Back => match self.step() {
                Step::Owner => {}
                Step::Apartment => next.owner = None,
                Step::Tenant => next.apartment = None,
                Step::Confirm => next.tenant = None,
            },
            SessionEvent::ClearSelection => next = Self::new(),
            SessionEvent::SaveContract => {
                let draft = self.draft(dataset)?;
                next = Self {
                    saved: Some(draft),
                    ..Self::new()
                };
            }
        }
        Ok(next)
    }

    /// The contract the current selection describes.
    pub fn draft(&self, dataset: &Dataset) -> Result<ContractDraft, SessionError> {
        let (Some(owner_id), Some(apartment_id), Some(tenant_id)) =
            (&self.owner, &self.apartment, &self.tenant)
        else {
            return Err(SessionError::Incomplete(self.step()));
        };

        let owner = dataset
            .user(owner_id)
            .ok_or_else(|| SessionError::UnknownOwner(owner_id.clone()))?;
        let apartment = dataset
            .apartment(apartment_id)
            .ok_or_else(|| SessionError::UnknownApartment(apartment_id.clone()))?;
        let tenant = dataset
            .user(tenant_id)
            .ok_or_else(|| SessionError::UnknownTenant(tenant_id.clone()))?;

        Ok(ContractDraft {
            owner_id: owner_id.clone(),
            apartment_id: apartment_id.clone(),
            tenant_id: tenant_id.clone(),
            owner: owner.name.clone(),
            apartment: apartment.label(),
            tenant: tenant.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::join::tests::dataset;

    fn id(n: u64) -> EntityId {
        EntityId::Number(n)
    }

    fn apply(session: &ContractSession, events: Vec<SessionEvent>) -> ContractSession {
        let data = dataset();
        events.into_iter().fold(session.clone(), |s, e| s.reduce(e, &data).unwrap())
    }

    #[test]
    fn test_full_walkthrough() {
        let data = dataset();
        let session = apply(
            &ContractSession::new(),
            vec![
                SessionEvent::SelectOwner(id(1)),
                SessionEvent::SelectApartment(id(101)),
                SessionEvent::SetTenant(id(11)),
            ],
        );
        assert_eq!(session.step(), Step::Confirm);

        let saved = session.reduce(SessionEvent::SaveContract, &data).unwrap();
        let draft = saved.saved.clone().unwrap();
        assert_eq!(draft.apartment, "A-2");
        assert_eq!(draft.to_string(), "Elif Aydın rents A-2 from Zeynep Demir");
        assert_eq!(saved.step(), Step::Owner);
    }

    #[test]
    fn test_apartment_requires_owner() {
        let data = dataset();
        let err = ContractSession::new()
            .reduce(SessionEvent::SelectApartment(id(100)), &data)
            .unwrap_err();
        assert_eq!(err, SessionError::NoOwnerSelected);
    }

    #[test]
    fn test_apartment_must_belong_to_owner() {
        let data = dataset();
        let session = apply(&ContractSession::new(), vec![SessionEvent::SelectOwner(id(2))]);
        let err = session
            .reduce(SessionEvent::SelectApartment(id(100)), &data)
            .unwrap_err();
        assert!(matches!(err, SessionError::ApartmentNotOwned { .. }));
        assert_eq!(session.apartment, None);
    }

    #[test]
    fn test_new_owner_clears_apartment() {
        let data = dataset();
        let session = apply(
            &ContractSession::new(),
            vec![SessionEvent::SelectOwner(id(1)), SessionEvent::SelectApartment(id(100))],
        );
        let same = session.reduce(SessionEvent::SelectOwner(id(1)), &data).unwrap();
        assert_eq!(same.apartment, Some(id(100)));
        let other = session.reduce(SessionEvent::SelectOwner(id(2)), &data).unwrap();
        assert_eq!(other.apartment, None);
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let data = dataset();
        let session = ContractSession::new();
        assert_eq!(
            session.reduce(SessionEvent::SelectOwner(id(10)), &data),
            Err(SessionError::UnknownOwner(id(10)))
        );
        let session = apply(
            &session,
            vec![SessionEvent::SelectOwner(id(1)), SessionEvent::SelectApartment(id(100))],
        );
        assert_eq!(
            session.reduce(SessionEvent::SetTenant(id(1)), &data),
            Err(SessionError::UnknownTenant(id(1)))
        );
    }

    #[test]
    fn test_tenant_requires_apartment() {
        let data = dataset();
        assert_eq!(
            ContractSession::new().reduce(SessionEvent::SetTenant(id(10)), &data),
            Err(SessionError::Incomplete(Step::Owner))
        );
        let session = apply(&ContractSession::new(), vec![SessionEvent::SelectOwner(id(1))]);
        assert_eq!(
            session.reduce(SessionEvent::SetTenant(id(10)), &data),
            Err(SessionError::Incomplete(Step::Apartment))
        );
    }

    #[test]
    fn test_changing_owner_or_apartment_clears_tenant() {
        let picked = apply(
            &ContractSession::new(),
            vec![
                SessionEvent::SelectOwner(id(1)),
                SessionEvent::SelectApartment(id(101)),
                SessionEvent::SetTenant(id(11)),
            ],
        );

        let other_owner = apply(
            &picked,
            vec![SessionEvent::SelectOwner(id(2)), SessionEvent::SelectApartment(id(102))],
        );
        assert_eq!(other_owner.tenant, None);
        assert_eq!(other_owner.step(), Step::Tenant);

        let other_apartment = apply(&picked, vec![SessionEvent::SelectApartment(id(100))]);
        assert_eq!(other_apartment.tenant, None);
        assert_eq!(other_apartment.step(), Step::Tenant);

        let same_apartment = apply(&picked, vec![SessionEvent::SelectApartment(id(101))]);
        assert_eq!(same_apartment.tenant, Some(id(11)));
    }

    #[test]
    fn test_save_incomplete() {
        let data = dataset();
        let session = apply(&ContractSession::new(), vec![SessionEvent::SelectOwner(id(1))]);
        let err = session.reduce(SessionEvent::SaveContract, &data).unwrap_err();
        assert_eq!(err, SessionError::Incomplete(Step::Apartment));
        assert_eq!(err.to_string(), "Cannot save yet: select an apartment");
    }

    #[test]
    fn test_back_steps() {
        let session = apply(
            &ContractSession::new(),
            vec![
                SessionEvent::SelectOwner(id(1)),
                SessionEvent::SelectApartment(id(100)),
                SessionEvent::SetTenant(id(10)),
                SessionEvent::Back,
            ],
        );
        assert_eq!(session.step(), Step::Tenant);
        let session = apply(&session, vec![SessionEvent::Back, SessionEvent::Back]);
        assert_eq!(session, ContractSession::new());
    }

    #[test]
    fn test_error_converts_to_report() {
        fn save(data: &Dataset) -> color_eyre::Result<ContractSession> {
            Ok(ContractSession::new().reduce(SessionEvent::SaveContract, data)?)
        }
        assert!(save(&dataset()).is_err());
    }
}
