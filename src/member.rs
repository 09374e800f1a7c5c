use std::fmt;

use crate::error::{LoanError, LoanResult};

pub type MemberId = u64;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    #[cfg_attr(feature = "serde", serde(rename = "M"))]
    Male,
    #[cfg_attr(feature = "serde", serde(rename = "F"))]
    Female,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BranchOfService {
    ArmedForces,
    CoastGuard,
    Army,
    MarineCorps,
    FireProtection,
    Navy,
    JailManagementAndPenology,
}

impl fmt::Display for BranchOfService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BranchOfService::ArmedForces => "Armed Forces",
            BranchOfService::CoastGuard => "Philippine Coast Guard",
            BranchOfService::Army => "Philippine Army",
            BranchOfService::MarineCorps => "Philippine Marine Corps",
            BranchOfService::FireProtection => "Bureau of Fire Protection",
            BranchOfService::Navy => "Philippine Navy",
            BranchOfService::JailManagementAndPenology => "Bureau of Jail Management and Penology",
        };
        write!(f, "{name}")
    }
}

/// A borrower. Every loan belongs to exactly one member.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    pub id: MemberId,
    pub lastname: String,
    pub firstname: String,
    pub middlename: String,
    pub sex: Sex,
    pub branch_of_service: BranchOfService,
    /// Unique across members.
    pub service_no: String,
    pub occupation: String,
}

impl Member {
    pub fn new(
        id: MemberId,
        lastname: &str,
        firstname: &str,
        sex: Sex,
        branch_of_service: BranchOfService,
        service_no: &str,
    ) -> Self {
        Self {
            id,
            lastname: lastname.to_owned(),
            firstname: firstname.to_owned(),
            middlename: String::new(),
            sex,
            branch_of_service,
            service_no: service_no.to_owned(),
            occupation: String::new(),
        }
    }

    pub fn with_middlename(mut self, middlename: &str) -> Self {
        self.middlename = middlename.to_owned();
        self
    }

    pub fn with_occupation(mut self, occupation: &str) -> Self {
        self.occupation = occupation.to_owned();
        self
    }

    pub fn validate(&self) -> LoanResult<()> {
        if self.lastname.trim().is_empty() {
            return Err(LoanError::invalid("lastname", "required"));
        }
        if self.firstname.trim().is_empty() {
            return Err(LoanError::invalid("firstname", "required"));
        }
        if self.service_no.trim().is_empty() {
            return Err(LoanError::invalid("service_no", "required"));
        }
        Ok(())
    }

    /// Case-insensitive match on first or last name, or an exact id match
    /// when `query` is numeric.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        if query.parse::<MemberId>().is_ok_and(|id| id == self.id) {
            return true;
        }
        let needle = query.to_lowercase();
        self.firstname.to_lowercase().contains(&needle)
            || self.lastname.to_lowercase().contains(&needle)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lastname, self.firstname)
    }
}
