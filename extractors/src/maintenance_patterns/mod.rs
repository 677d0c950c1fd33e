mod catalog;
mod extractor;
mod normalizer;

pub use catalog::{load_rules, PatternCatalog};
pub use extractor::{extract, RawMaintenanceFields, RawTime};
pub use normalizer::{event_identity, normalize, parse_time};

use crate::error::CatalogError;
use regex::{Regex, RegexBuilder};
use shared_types::{PatternRule, RawEmailMessage};

/// A `PatternRule` with its regexes compiled.
#[derive(Debug, Clone)]
pub struct MaintenancePattern {
    rule: PatternRule,
    domain: Option<Regex>,
    subject: Option<Regex>,
    cid: Regex,
    start_time: Regex,
    end_time: Regex,
}

impl MaintenancePattern {
    pub fn compile(rule: PatternRule) -> Result<Self, CatalogError> {
        let partner = rule.partner_name.as_str();

        let domain = compile_filter(partner, "email_domain_pattern", &rule.email_domain_pattern)?;
        let subject =
            compile_filter(partner, "email_subject_pattern", &rule.email_subject_pattern)?;
        let cid = compile_extraction(partner, "maintenance_cid_pattern", &rule.maintenance_cid_pattern)?;
        let start_time = compile_extraction(
            partner,
            "maintenance_start_time_pattern",
            &rule.maintenance_start_time_pattern,
        )?;
        let end_time = compile_extraction(
            partner,
            "maintenance_end_time_pattern",
            &rule.maintenance_end_time_pattern,
        )?;

        Ok(Self {
            rule,
            domain,
            subject,
            cid,
            start_time,
            end_time,
        })
    }

    pub fn rule(&self) -> &PatternRule {
        &self.rule
    }

    pub fn partner_name(&self) -> &str {
        &self.rule.partner_name
    }

    /// Whether the sender and subject filters let this message through.
    pub fn applies_to(&self, message: &RawEmailMessage) -> bool {
        if let Some(domain) = &self.domain {
            if !domain.is_match(message.sender.trim()) {
                return false;
            }
        }

        if let Some(subject) = &self.subject {
            if !subject.is_match(&message.subject) {
                return false;
            }
        }

        true
    }
}

fn compile_filter(
    partner: &str,
    field: &'static str,
    pattern: &Option<String>,
) -> Result<Option<Regex>, CatalogError> {
    match pattern.as_deref() {
        None | Some("") => Ok(None),
        Some(pattern) => Regex::new(pattern)
            .map(Some)
            .map_err(|source| CatalogError::InvalidRegex {
                partner: partner.to_string(),
                field,
                source,
            }),
    }
}

fn compile_extraction(
    partner: &str,
    field: &'static str,
    pattern: &str,
) -> Result<Regex, CatalogError> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| CatalogError::InvalidRegex {
            partner: partner.to_string(),
            field,
            source,
        })?;

    // Group 0 is the whole match
    let groups = regex.captures_len() - 1;
    if groups != 1 {
        return Err(CatalogError::CaptureGroupCount {
            partner: partner.to_string(),
            field,
            groups,
        });
    }

    Ok(regex)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_applies_to_matching_message() {
        let pattern = partner_a();
        assert!(pattern.applies_to(&partner_a_email("")));
    }

    #[test]
    fn test_domain_filter_rejects_other_sender() {
        let pattern = partner_a();
        let message = RawEmailMessage::new("Scheduled Maintenance Notice", "noc@other.example");
        assert!(!pattern.applies_to(&message));
    }

    #[test]
    fn test_subject_filter_rejects_other_subject() {
        let pattern = partner_a();
        let message = RawEmailMessage::new("Invoice", "ops@partner.example");
        assert!(!pattern.applies_to(&message));
    }

    #[test]
    fn test_absent_filters_match_anything() {
        let mut rule = partner_a_rule();
        rule.email_domain_pattern = None;
        rule.email_subject_pattern = Some(String::new());
        let pattern = MaintenancePattern::compile(rule).unwrap();

        assert!(pattern.applies_to(&RawEmailMessage::new("anything", "anyone@anywhere")));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let mut rule = partner_a_rule();
        rule.maintenance_cid_pattern = "CID: ([A-Z".to_string();

        let err = MaintenancePattern::compile(rule).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidRegex {
                field: "maintenance_cid_pattern",
                ..
            }
        ));
    }

    #[test]
    fn test_extraction_pattern_needs_capture_group() {
        let mut rule = partner_a_rule();
        rule.maintenance_end_time_pattern = r"End:\s*\S+".to_string();

        let err = MaintenancePattern::compile(rule).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::CaptureGroupCount {
                field: "maintenance_end_time_pattern",
                groups: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_extraction_pattern_with_two_groups_is_rejected() {
        let mut rule = partner_a_rule();
        rule.maintenance_start_time_pattern = r"Start:\s*(\S+) (UTC|GMT)".to_string();

        let err = MaintenancePattern::compile(rule).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::CaptureGroupCount {
                field: "maintenance_start_time_pattern",
                groups: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_non_capturing_groups_are_allowed() {
        let mut rule = partner_a_rule();
        rule.maintenance_start_time_pattern = r"(?:Start|Begin):\s*(\S+)".to_string();

        assert!(MaintenancePattern::compile(rule).is_ok());
    }
}
