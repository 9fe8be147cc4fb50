//! Member directory: people with a contact email, an optional age and city.
//!
//! Emails are stored trimmed and lowercased and are unique; that uniqueness
//! is checked under the `members` guard like every other read-modify-write.

use super::next_id;
use boxoffice_core::environment::Clock;
use boxoffice_core::types::{Member, collections, names_match};
use boxoffice_core::{Collection, CollectionLocks, CollectionStore, DomainError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

/// Oldest accepted age.
pub const MAX_AGE: i64 = 150;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Query filters for listing members. Age bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFilters {
    /// Case-insensitive substring of name or email
    pub search: Option<String>,
    /// Lowest age kept
    pub min_age: Option<String>,
    /// Highest age kept
    pub max_age: Option<String>,
}

/// Fields for a new member.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMember {
    /// Display name
    pub name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Age in years
    pub age: Option<i64>,
    /// Home city
    pub city: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberUpdate {
    /// New name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New age
    pub age: Option<i64>,
    /// New city
    pub city: Option<String>,
}

/// Directory-wide statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    /// Number of members
    pub total_members: usize,
    /// Members with a recorded age
    pub members_with_age: usize,
    /// Mean age of members with one, one decimal; 0 when nobody has an age
    pub average_age: f64,
    /// Distinct cities, in first-seen order
    pub cities: Vec<String>,
}

/// Manages the member directory.
#[derive(Clone)]
pub struct MemberService {
    members: Collection<Member>,
    locks: CollectionLocks,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MemberService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberService")
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

impl MemberService {
    /// Create a member service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, locks: CollectionLocks, clock: Arc<dyn Clock>) -> Self {
        Self {
            members: Collection::new(store, collections::MEMBERS),
            locks,
            clock,
        }
    }

    /// List members matching every supplied filter.
    ///
    /// Members without an age never pass an age bound.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if an age bound is not a non-negative integer
    /// - [`DomainError::Storage`] if the collection cannot be read
    pub async fn list(&self, filters: &MemberFilters) -> Result<Vec<Member>> {
        let min_age = age_bound("minAge", filters.min_age.as_deref())?;
        let max_age = age_bound("maxAge", filters.max_age.as_deref())?;
        let mut members = self.members.read_all().await?;

        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            members.retain(|m| {
                m.name.to_lowercase().contains(&needle) || m.email.to_lowercase().contains(&needle)
            });
        }
        if let Some(min) = min_age {
            members.retain(|m| m.age.is_some_and(|age| u32::from(age) >= min));
        }
        if let Some(max) = max_age {
            members.retain(|m| m.age.is_some_and(|age| u32::from(age) <= max));
        }

        Ok(members)
    }

    /// Look up one member.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if no member has that id
    /// - [`DomainError::Storage`] if the collection cannot be read
    pub async fn get(&self, id: u64) -> Result<Member> {
        self.members
            .read_all()
            .await?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| DomainError::not_found("Member", id))
    }

    /// Add a member with the next free id.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if name or email is missing, the email is
    ///   malformed or the age is out of range
    /// - [`DomainError::Conflict`] if the email is already registered
    /// - [`DomainError::Storage`] if the collection cannot be read or written
    pub async fn create(&self, input: NewMember) -> Result<Member> {
        let (Some(name), Some(email)) = (non_blank(input.name.as_deref()), non_blank(input.email.as_deref()))
        else {
            return Err(DomainError::validation("Name and email are required"));
        };
        let email = normalize_email(email)?;
        let age = input.age.map(validate_age).transpose()?;

        let _guard = self.locks.acquire(collections::MEMBERS).await;
        let mut members = self.members.read_all().await?;
        ensure_unique_email(&members, &email, None)?;

        let now = self.clock.now();
        let member = Member {
            id: next_id(collections::MEMBERS, members.iter().map(|m| m.id))?,
            name: name.to_string(),
            email,
            age,
            city: non_blank(input.city.as_deref()).map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        members.push(member.clone());
        self.members.write_all(&members).await?;

        tracing::info!(id = member.id, email = %member.email, "Member created");
        Ok(member)
    }

    /// Apply a partial update. Id and creation time never change.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if no member has that id
    /// - [`DomainError::Validation`] if a supplied field is blank or out of range
    /// - [`DomainError::Conflict`] if the new email belongs to another member
    /// - [`DomainError::Storage`] if the collection cannot be read or written
    pub async fn update(&self, id: u64, update: MemberUpdate) -> Result<Member> {
        let _guard = self.locks.acquire(collections::MEMBERS).await;
        let mut members = self.members.read_all().await?;
        let index = position(&members, id)?;

        let name = match update.name.as_deref() {
            Some(raw) => Some(
                non_blank(Some(raw)).ok_or_else(|| DomainError::validation("Name cannot be empty"))?,
            ),
            None => None,
        };
        let email = update.email.as_deref().map(|raw| normalize_email(raw.trim())).transpose()?;
        if let Some(email) = &email {
            ensure_unique_email(&members, email, Some(id))?;
        }
        let age = update.age.map(validate_age).transpose()?;

        let member = &mut members[index];
        if let Some(name) = name {
            member.name = name.to_string();
        }
        if let Some(email) = email {
            member.email = email;
        }
        if age.is_some() {
            member.age = age;
        }
        if let Some(city) = update.city.as_deref() {
            member.city = non_blank(Some(city)).map(str::to_string);
        }
        member.updated_at = self.clock.now();
        let member = member.clone();
        self.members.write_all(&members).await?;

        tracing::info!(id, "Member updated");
        Ok(member)
    }

    /// Remove a member and return the removed record.
    ///
    /// # Errors
    ///
    /// - [`DomainError::NotFound`] if no member has that id
    /// - [`DomainError::Storage`] if the collection cannot be read or written
    pub async fn delete(&self, id: u64) -> Result<Member> {
        let _guard = self.locks.acquire(collections::MEMBERS).await;
        let mut members = self.members.read_all().await?;
        let index = position(&members, id)?;

        let member = members.remove(index);
        self.members.write_all(&members).await?;

        tracing::info!(id, email = %member.email, "Member deleted");
        Ok(member)
    }

    /// Directory-wide statistics.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Storage`] if the collection cannot be read.
    pub async fn stats(&self) -> Result<MemberStats> {
        let members = self.members.read_all().await?;

        let ages: Vec<u8> = members.iter().filter_map(|m| m.age).collect();
        #[allow(clippy::cast_precision_loss)]
        let average_age = if ages.is_empty() {
            0.0
        } else {
            let sum: u64 = ages.iter().map(|a| u64::from(*a)).sum();
            (sum as f64 / ages.len() as f64 * 10.0).round() / 10.0
        };

        let mut cities: Vec<String> = Vec::new();
        for city in members.iter().filter_map(|m| m.city.as_deref()) {
            if !cities.iter().any(|c| c == city) {
                cities.push(city.to_string());
            }
        }

        Ok(MemberStats {
            total_members: members.len(),
            members_with_age: ages.len(),
            average_age,
            cities,
        })
    }
}

/// Parse a member id path segment: a positive integer.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for anything else.
pub fn parse_id(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| DomainError::validation("Invalid member ID"))
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn position(members: &[Member], id: u64) -> Result<usize> {
    members
        .iter()
        .position(|m| m.id == id)
        .ok_or_else(|| DomainError::not_found("Member", id))
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.to_lowercase();
    let valid = EMAIL.as_ref().is_some_and(|re| re.is_match(&email));
    if valid {
        Ok(email)
    } else {
        Err(DomainError::validation("Invalid email format"))
    }
}

fn ensure_unique_email(members: &[Member], email: &str, except: Option<u64>) -> Result<()> {
    let taken = members
        .iter()
        .any(|m| Some(m.id) != except && names_match(&m.email, email));
    if taken {
        Err(DomainError::conflict("Email already exists"))
    } else {
        Ok(())
    }
}

fn validate_age(age: i64) -> Result<u8> {
    u8::try_from(age)
        .ok()
        .filter(|age| i64::from(*age) <= MAX_AGE)
        .ok_or_else(|| DomainError::validation("Age must be a number between 0 and 150"))
}

fn age_bound(field: &str, raw: Option<&str>) -> Result<Option<u32>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse::<u32>().map(Some).map_err(|_| {
            DomainError::validation(format!("{field} must be a non-negative integer"))
        }),
    }
}
