//! Buyer value objects and email-derived display names.

use serde::Serialize;
use serde_json::Value;

use super::fields::{first_str, first_text};
use super::PLACEHOLDER;

/// Accepted spellings for each buyer field on a raw buyer-like record.
const FIRST_NAME_PATHS: &[&str] = &["firstName", "name.first"];
const LAST_NAME_PATHS: &[&str] = &["lastName", "name.last"];
const EMAIL_PATHS: &[&str] = &["email", "emails.0", "emails.0.email"];
const CONTACT_ID_PATHS: &[&str] = &["contactId", "contact.contactId", "contactID"];

/// Where a directory record keeps its name and email.
const CONTACT_FIRST_PATHS: &[&str] = &["info.name.first", "name.first"];
const CONTACT_LAST_PATHS: &[&str] = &["info.name.last", "name.last"];
const CONTACT_EMAIL_PATHS: &[&str] = &["primaryEmail.email", "emails.0.email"];

/// Loosely populated buyer projection taken from an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyerCandidate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact_id: Option<String>,
}

impl BuyerCandidate {
    /// Projects a raw buyer record, accepting the known field spellings.
    pub fn from_value(buyer: &Value) -> Self {
        Self {
            first_name: first_str(buyer, FIRST_NAME_PATHS),
            last_name: first_str(buyer, LAST_NAME_PATHS),
            name: first_str(buyer, &["name"]),
            email: first_str(buyer, EMAIL_PATHS),
            contact_id: first_text(buyer, CONTACT_ID_PATHS),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_contact_id(mut self, contact_id: impl Into<String>) -> Self {
        self.contact_id = Some(contact_id.into());
        self
    }

    /// True when any of first name, last name or full name is known.
    pub fn has_name(&self) -> bool {
        [&self.first_name, &self.last_name, &self.name]
            .iter()
            .any(|field| non_empty(field).is_some())
    }

    pub fn has_email(&self) -> bool {
        non_empty(&self.email).is_some()
    }

    /// Fills the fields that are still empty from a directory record.
    pub fn fill_missing(&mut self, contact: &ContactDetails) {
        fill(&mut self.first_name, &contact.first_name);
        fill(&mut self.last_name, &contact.last_name);
        fill(&mut self.email, &contact.email);
    }

    /// Lets a directory record take precedence where it has data.
    pub fn overlay(&mut self, contact: &ContactDetails) {
        overlay(&mut self.first_name, &contact.first_name);
        overlay(&mut self.last_name, &contact.last_name);
        overlay(&mut self.email, &contact.email);
    }

    /// Builds the displayable buyer.
    ///
    /// The name is first and last joined by a space, else the full name,
    /// else derived from the email, else the placeholder.
    pub fn into_resolved(self) -> ResolvedBuyer {
        let joined = [non_empty(&self.first_name), non_empty(&self.last_name)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let email = non_empty(&self.email).map(str::to_string);

        let name = if !joined.is_empty() {
            joined
        } else if let Some(name) = non_empty(&self.name) {
            name.to_string()
        } else if let Some(email) = &email {
            email_derived_name(email)
        } else {
            PLACEHOLDER.to_string()
        };

        ResolvedBuyer {
            name,
            email: email.unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }
}

/// Name and email read from a directory record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ContactDetails {
    pub fn from_record(record: &Value) -> Self {
        Self {
            first_name: first_str(record, CONTACT_FIRST_PATHS),
            last_name: first_str(record, CONTACT_LAST_PATHS),
            email: first_str(record, CONTACT_EMAIL_PATHS),
        }
    }
}

/// Fully populated, human-displayable buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBuyer {
    pub name: String,
    pub email: String,
}

impl ResolvedBuyer {
    pub fn unknown() -> Self {
        Self {
            name: PLACEHOLDER.to_string(),
            email: PLACEHOLDER.to_string(),
        }
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty() && self.email != PLACEHOLDER
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty() && self.name != PLACEHOLDER
    }
}

/// Turns the local part of an email into a title-cased display name.
///
/// `.`, `_` and `-` runs become single spaces, digits stay attached to their
/// word, and only the first letter of each word is uppercased.
/// `john.doe99@x.com` becomes `John Doe99`.
pub fn email_derived_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let spaced: String = local
        .chars()
        .map(|c| if matches!(c, '.' | '_' | '-') { ' ' } else { c })
        .collect();

    let name = spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        name
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

fn fill(target: &mut Option<String>, source: &Option<String>) {
    if non_empty(target).is_none() {
        if let Some(value) = non_empty(source) {
            *target = Some(value.to_string());
        }
    }
}

fn overlay(target: &mut Option<String>, source: &Option<String>) {
    if let Some(value) = non_empty(source) {
        *target = Some(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn derives_name_from_email() {
        assert_eq!(email_derived_name("john.doe99@x.com"), "John Doe99");
        assert_eq!(email_derived_name("mary_ann--smith@x.com"), "Mary Ann Smith");
        assert_eq!(email_derived_name("mcDonald@x.com"), "McDonald");
    }

    #[test]
    fn empty_local_part_is_placeholder() {
        assert_eq!(email_derived_name("@example.com"), "—");
        assert_eq!(email_derived_name("..._@example.com"), "—");
        assert_eq!(email_derived_name(""), "—");
    }

    #[test]
    fn candidate_accepts_field_spellings() {
        let candidate = BuyerCandidate::from_value(&json!({
            "name": {"first": "Ada", "last": "Lovelace"},
            "emails": ["ada@example.com"],
            "contact": {"contactId": "c-1"}
        }));
        assert_eq!(candidate.first_name.as_deref(), Some("Ada"));
        assert_eq!(candidate.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(candidate.name, None);
        assert_eq!(candidate.email.as_deref(), Some("ada@example.com"));
        assert_eq!(candidate.contact_id.as_deref(), Some("c-1"));
    }

    #[test]
    fn candidate_reads_flat_fields() {
        let candidate = BuyerCandidate::from_value(&json!({
            "firstName": "Grace",
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "contactID": 42
        }));
        assert_eq!(candidate.first_name.as_deref(), Some("Grace"));
        assert_eq!(candidate.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(candidate.contact_id.as_deref(), Some("42"));
    }

    #[test]
    fn resolved_name_prefers_first_and_last() {
        let resolved = BuyerCandidate {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            name: Some("Countess".into()),
            ..Default::default()
        }
        .into_resolved();
        assert_eq!(resolved.name, "Ada Lovelace");
        assert_eq!(resolved.email, "—");
    }

    #[test]
    fn resolved_name_uses_full_name_then_email() {
        let named = BuyerCandidate {
            name: Some("Grace Hopper".into()),
            ..Default::default()
        };
        assert_eq!(named.into_resolved().name, "Grace Hopper");

        let emailed = BuyerCandidate::default().with_email("alan.turing@example.com");
        let resolved = emailed.into_resolved();
        assert_eq!(resolved.name, "Alan Turing");
        assert_eq!(resolved.email, "alan.turing@example.com");
    }

    #[test]
    fn empty_candidate_resolves_to_placeholders() {
        assert_eq!(BuyerCandidate::default().into_resolved(), ResolvedBuyer::unknown());
    }

    #[test]
    fn fill_missing_keeps_known_fields() {
        let mut candidate = BuyerCandidate {
            first_name: Some("Ada".into()),
            ..Default::default()
        };
        candidate.fill_missing(&ContactDetails {
            first_name: Some("Other".into()),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
        });
        assert_eq!(candidate.first_name.as_deref(), Some("Ada"));
        assert_eq!(candidate.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(candidate.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn overlay_only_replaces_with_present_values() {
        let mut candidate = BuyerCandidate::default().with_email("old@example.com");
        candidate.overlay(&ContactDetails {
            first_name: Some("Ada".into()),
            last_name: None,
            email: None,
        });
        assert_eq!(candidate.first_name.as_deref(), Some("Ada"));
        assert_eq!(candidate.email.as_deref(), Some("old@example.com"));
    }

    #[test]
    fn contact_details_from_directory_record() {
        let details = ContactDetails::from_record(&json!({
            "info": {"name": {"first": "Ada", "last": "Lovelace"}},
            "primaryEmail": {"email": "ada@example.com"}
        }));
        assert_eq!(details.first_name.as_deref(), Some("Ada"));
        assert_eq!(details.email.as_deref(), Some("ada@example.com"));

        let details = ContactDetails::from_record(&json!({
            "name": {"first": "Grace"},
            "emails": [{"email": "grace@example.com"}]
        }));
        assert_eq!(details.first_name.as_deref(), Some("Grace"));
        assert_eq!(details.email.as_deref(), Some("grace@example.com"));
    }

    proptest! {
        #[test]
        fn derived_name_is_never_empty(local in "[a-z0-9._-]{0,20}") {
            let name = email_derived_name(&format!("{}@example.com", local));
            prop_assert!(!name.is_empty());
        }

        #[test]
        fn derived_name_has_no_separators(local in "[a-z0-9._-]{1,20}") {
            let name = email_derived_name(&format!("{}@example.com", local));
            prop_assert!(!name.contains('.') && !name.contains('_') && !name.contains('-')
                || name == "—");
            prop_assert!(!name.contains("  "));
        }
    }
}
