//! Turn per-field raw values into a [`ParsedCertificate`].
//!
//! Every strategy produces a [`FieldValues`] map and hands it to the same
//! [`Assembler`], so a value read from a zone and one read by label scan are
//! cleaned and validated identically.

use std::collections::BTreeMap;

use super::rules::{
    extract_competency_codes, extract_period, is_checkbox_line, normalize_codes,
    split_text_and_period, tidy, FieldExtractor, NameParts, PersonalIdExtractor,
};
use crate::models::certificate::{ParsedCertificate, Signer, SignerRole};
use crate::schema::{FieldKey, RolePolicy, Schema};

/// Raw values keyed by field. The first value stored for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<FieldKey, String>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value unless it is blank or the field already has one.
    pub fn insert(&mut self, field: FieldKey, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() || self.values.contains_key(&field) {
            return false;
        }
        self.values.insert(field, value);
        true
    }

    pub fn get(&self, field: FieldKey) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Field cleanup and validation shared by all strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assembler {
    validate_personal_id: bool,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_personal_id_validation(mut self, validate: bool) -> Self {
        self.validate_personal_id = validate;
        self
    }

    pub fn personal_id_extractor(&self) -> PersonalIdExtractor {
        PersonalIdExtractor::new().with_validation(self.validate_personal_id)
    }

    /// Build a record from raw values.
    ///
    /// `role` is a role read explicitly (checkbox); without one the schema's
    /// role policy decides once a signer field is present.
    pub fn assemble(
        &self,
        schema: &Schema,
        values: &FieldValues,
        role: Option<SignerRole>,
    ) -> ParsedCertificate {
        let kind = schema.kind;
        let mut cert = ParsedCertificate::empty(kind);
        let get = |field: FieldKey| values.get(field).filter(|v| !schema.rejects(v));
        let text = |field: FieldKey| get(field).map(tidy).and_then(non_empty);

        let mut name = NameParts::from_parts(text(FieldKey::FirstName), text(FieldKey::LastName));
        if name.is_empty() {
            if let Some(combined) = get(FieldKey::NameLastFirst) {
                name = NameParts::from_last_first(combined).unwrap_or_default();
            }
        }
        cert.full_name = name.full;
        cert.first_name = name.first;
        cert.last_name = name.last;

        cert.personal_id = get(FieldKey::PersonalId)
            .and_then(|v| self.personal_id_extractor().extract(v))
            .map(|m| m.value);

        cert.specialty_header = text(FieldKey::Specialty);

        if let Some(raw) = get(FieldKey::CompetencyCodes) {
            cert.competency_codes = normalize_codes(schema.regime(), &extract_competency_codes(raw));
        }

        cert.subject = text(FieldKey::Subject);
        let mut period = get(FieldKey::Period).and_then(extract_period);
        if let Some(raw) = get(FieldKey::SubjectAndPeriod) {
            let (subject, inline_period) = split_text_and_period(raw);
            if cert.subject.is_none() {
                cert.subject = subject;
            }
            period = period.or(inline_period);
        }
        if kind.has_date_fields() {
            cert.service_period = period;
        }

        let blocks: Vec<&str> = [FieldKey::Description, FieldKey::Verification]
            .into_iter()
            .filter_map(get)
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .collect();
        if !blocks.is_empty() {
            cert.description = Some(blocks.join("\n\n"));
        }

        cert.course_leader = text(FieldKey::CourseLeader).filter(|v| is_checkbox_line(v).is_none());

        let mut signer = Signer {
            name: text(FieldKey::SignerName),
            speciality: text(FieldKey::SignerSpecialty),
            site: text(FieldKey::SignerSite),
            role: None,
        };
        if !signer.is_empty() || role.is_some() {
            signer.role = role.or_else(|| default_role(schema.role, &signer));
            cert.signer = Some(signer);
        }

        cert
    }
}

/// Role when no checkbox was read.
///
/// Course leaders rarely fill in specialty and site, supervisors always do.
fn default_role(policy: RolePolicy, signer: &Signer) -> Option<SignerRole> {
    if signer.is_empty() {
        return None;
    }
    match policy {
        RolePolicy::Supervisor => Some(SignerRole::Supervisor),
        RolePolicy::Checkbox if signer.speciality.is_some() || signer.site.is_some() => {
            Some(SignerRole::Supervisor)
        }
        RolePolicy::Checkbox => Some(SignerRole::CourseLeader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{get_schema, CertificateKind};
    use pretty_assertions::assert_eq;

    fn values(pairs: &[(FieldKey, &str)]) -> FieldValues {
        let mut v = FieldValues::new();
        for (k, s) in pairs {
            v.insert(*k, *s);
        }
        v
    }

    #[test]
    fn test_first_value_wins() {
        let mut v = FieldValues::new();
        assert!(v.insert(FieldKey::Subject, "Kirurgi"));
        assert!(!v.insert(FieldKey::Subject, "Ortopedi"));
        assert!(!v.insert(FieldKey::Description, "   "));
        assert_eq!(v.get(FieldKey::Subject), Some("Kirurgi"));
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_assemble_identity_and_codes() {
        let schema = get_schema(CertificateKind::Klin2015).unwrap();
        let v = values(&[
            (FieldKey::LastName, "Svensson"),
            (FieldKey::FirstName, "Anna"),
            (FieldKey::PersonalId, "861027-4857"),
            (FieldKey::CompetencyCodes, "b2, a1"),
        ]);
        let cert = Assembler::new().assemble(schema, &v, None);
        assert_eq!(cert.full_name.as_deref(), Some("Anna Svensson"));
        assert_eq!(cert.personal_id.as_deref(), Some("8610274857"));
        assert_eq!(cert.competency_codes, vec!["a1", "b2"]);
        assert_eq!(cert.signer, None);
    }

    #[test]
    fn test_combined_name_used_when_parts_missing() {
        let schema = get_schema(CertificateKind::Ausk2021).unwrap();
        let v = values(&[(FieldKey::NameLastFirst, "Svensson Anna Maria")]);
        let cert = Assembler::new().assemble(schema, &v, None);
        assert_eq!(cert.first_name.as_deref(), Some("Anna Maria"));
        assert_eq!(cert.last_name.as_deref(), Some("Svensson"));
    }

    #[test]
    fn test_site_and_period_split() {
        let schema = get_schema(CertificateKind::Ausk2015).unwrap();
        let v = values(&[(FieldKey::SubjectAndPeriod, "Hudkliniken SUS 250101 - 250301")]);
        let cert = Assembler::new().assemble(schema, &v, None);
        assert_eq!(cert.subject.as_deref(), Some("Hudkliniken SUS"));
        let period = cert.service_period.unwrap();
        assert_eq!(period.start_date.as_deref(), Some("2025-01-01"));
        assert_eq!(period.end_date.as_deref(), Some("2025-03-01"));
    }

    #[test]
    fn test_no_period_for_kinds_without_dates() {
        let schema = get_schema(CertificateKind::Utv2015).unwrap();
        let v = values(&[(FieldKey::Period, "250101 - 250301")]);
        let cert = Assembler::new().assemble(schema, &v, None);
        assert_eq!(cert.service_period, None);
    }

    #[test]
    fn test_description_and_verification_joined() {
        let schema = get_schema(CertificateKind::Tredjeland2021).unwrap();
        let v = values(&[
            (FieldKey::Description, "Kurs i akutmedicin"),
            (FieldKey::Verification, "Muntlig examination"),
        ]);
        let cert = Assembler::new().assemble(schema, &v, None);
        assert_eq!(cert.description.as_deref(), Some("Kurs i akutmedicin\n\nMuntlig examination"));
    }

    #[test]
    fn test_rejected_label_words() {
        let schema = get_schema(CertificateKind::Kurs2015).unwrap();
        let v = values(&[(FieldKey::Subject, "Kurs"), (FieldKey::LastName, "Sökande")]);
        let cert = Assembler::new().assemble(schema, &v, None);
        assert!(cert.is_empty());
    }

    #[test]
    fn test_course_role_defaults() {
        let schema = get_schema(CertificateKind::Kurs2021).unwrap();

        let leader = Assembler::new().assemble(schema, &values(&[(FieldKey::SignerName, "Eva Ek")]), None);
        assert_eq!(leader.signer.unwrap().role, Some(SignerRole::CourseLeader));

        let supervisor = Assembler::new().assemble(
            schema,
            &values(&[(FieldKey::SignerName, "Eva Ek"), (FieldKey::SignerSite, "Akutkliniken")]),
            None,
        );
        assert_eq!(supervisor.signer.unwrap().role, Some(SignerRole::Supervisor));

        let ticked = Assembler::new().assemble(
            schema,
            &values(&[(FieldKey::SignerSite, "Akutkliniken")]),
            Some(SignerRole::CourseLeader),
        );
        assert_eq!(ticked.signer.unwrap().role, Some(SignerRole::CourseLeader));
    }

    #[test]
    fn test_personal_id_validation() {
        let schema = get_schema(CertificateKind::Klin2015).unwrap();
        let v = values(&[(FieldKey::PersonalId, "861027-4858")]);
        assert!(Assembler::new().assemble(schema, &v, None).personal_id.is_some());
        let strict = Assembler::new().with_personal_id_validation(true);
        assert_eq!(strict.assemble(schema, &v, None).personal_id, None);
    }
}
