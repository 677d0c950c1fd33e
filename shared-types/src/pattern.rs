use serde::{Deserialize, Serialize};

/// One partner's notification-matching rule, as written in a pattern file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub partner_name: String,

    // Message filters; absent means "match anything"
    #[serde(default)]
    pub email_domain_pattern: Option<String>,
    #[serde(default)]
    pub email_subject_pattern: Option<String>,

    // Body extraction, each with a single capture group
    pub maintenance_cid_pattern: String,
    pub maintenance_start_time_pattern: String,
    pub maintenance_end_time_pattern: String,

    // strftime-style formats for the captured times
    pub start_time_format: String,
    pub end_time_format: String,
}
