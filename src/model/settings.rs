use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::follow_up::LeadStage;

/// Key of the singleton settings document.
pub const SETTINGS_KEY: &str = "inquiry_options";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub label: String,
}

impl OptionItem {
    pub fn new(label: &str) -> Self {
        OptionItem { label: label.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStageOption {
    pub label: String,
    #[serde(default)]
    pub sub_stages: Vec<String>,
}

/// Catalog of values accepted on writes. Changing it never invalidates data
/// that is already stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSettings {
    pub key: String,
    #[serde(default)]
    pub courses: Vec<OptionItem>,
    #[serde(default)]
    pub locations: Vec<OptionItem>,
    #[serde(default)]
    pub statuses: Vec<OptionItem>,
    #[serde(default)]
    pub lead_stages: Vec<LeadStageOption>,
}

impl Default for OptionSettings {
    fn default() -> Self {
        let items = |labels: &[&str]| labels.iter().map(|l| OptionItem::new(l)).collect::<Vec<_>>();
        let stage = |label: &str, subs: &[&str]| LeadStageOption {
            label: label.to_string(),
            sub_stages: subs.iter().map(|s| s.to_string()).collect(),
        };
        OptionSettings {
            key: SETTINGS_KEY.to_string(),
            courses: items(&["Full Stack Development", "Data Science", "Digital Marketing", "UI/UX Design"]),
            locations: items(&["Online", "Pune", "Mumbai", "Bangalore"]),
            statuses: items(&["hot", "warm", "cold", "walkin", "not_interested", "online_conversion"]),
            lead_stages: vec![
                stage("Cold", &["No Response", "Call Back Later"]),
                stage("Warm", &["Follow-up", "Counselling Scheduled", "Demo Attended"]),
                stage("Hot", &["Ready to Join", "Fees Discussion", "Confirmed Admission"]),
                stage("Not Interested", &["Budget Issue", "Joined Elsewhere", "Not Reachable"]),
                stage("Walkin", &["Visited Centre", "Walkin Scheduled"]),
                stage("Online-Conversion", &["Paid Online", "Enrolled Online"]),
            ],
        }
    }
}

impl OptionSettings {
    pub fn has_course(&self, label: &str) -> bool {
        self.courses.iter().any(|c| c.label == label)
    }

    pub fn has_location(&self, label: &str) -> bool {
        self.locations.iter().any(|l| l.label == label)
    }

    pub fn has_status(&self, label: &str) -> bool {
        self.statuses.iter().any(|s| s.label == label)
    }

    pub fn lead_stage(&self, label: &str) -> Option<&LeadStageOption> {
        self.lead_stages.iter().find(|s| s.label == label)
    }

    /// Labels must be non-empty and unique within each list. Lead stages
    /// must name a `LeadStage` so follow-ups can record them.
    pub fn validate(&self) -> Result<(), (String, String)> {
        let lists: [(&str, Vec<&str>); 4] = [
            ("courses", self.courses.iter().map(|i| i.label.as_str()).collect()),
            ("locations", self.locations.iter().map(|i| i.label.as_str()).collect()),
            ("statuses", self.statuses.iter().map(|i| i.label.as_str()).collect()),
            ("leadStages", self.lead_stages.iter().map(|i| i.label.as_str()).collect()),
        ];
        for (field, labels) in lists.iter() {
            let mut seen = HashSet::new();
            for label in labels {
                if label.trim().is_empty() {
                    return Err((field.to_string(), format!("{} contains an empty label", field)));
                }
                if !seen.insert(*label) {
                    return Err((field.to_string(), format!("{} contains duplicate label '{}'", field, label)));
                }
            }
        }
        for stage in &self.lead_stages {
            if LeadStage::from_label(&stage.label).is_none() {
                return Err(("leadStages".to_string(), format!("'{}' is not a known lead stage", stage.label)));
            }
            if stage.sub_stages.iter().any(|s| s.trim().is_empty()) {
                return Err(("leadStages".to_string(), format!("lead stage '{}' has an empty sub-stage", stage.label)));
            }
        }
        Ok(())
    }
}

/// Rewrites items of the old schema (`{value: ..}`) to `{label: ..}` in place.
/// Returns whether anything changed.
pub fn migrate_legacy_document(doc: &mut Document) -> bool {
    let mut changed = false;
    for field in ["courses", "locations", "statuses", "leadStages"] {
        if let Some(Bson::Array(items)) = doc.get_mut(field) {
            for item in items.iter_mut() {
                changed |= migrate_item(item);
                if let Bson::Document(stage) = item {
                    if let Some(Bson::Array(subs)) = stage.get_mut("subStages") {
                        for sub in subs.iter_mut() {
                            changed |= flatten_sub_stage(sub);
                        }
                    }
                }
            }
        }
    }
    changed
}

fn migrate_item(item: &mut Bson) -> bool {
    match item {
        Bson::String(label) => {
            let label = label.clone();
            *item = Bson::Document(bson::doc! { "label": label });
            true
        }
        Bson::Document(d) if !d.contains_key("label") => match d.remove("value") {
            Some(value) => {
                d.insert("label", value);
                true
            }
            None => false,
        },
        Bson::Document(d) if d.contains_key("value") => {
            d.remove("value");
            true
        }
        _ => false,
    }
}

fn flatten_sub_stage(sub: &mut Bson) -> bool {
    if let Bson::Document(d) = sub {
        let label = d.get_str("label").or_else(|_| d.get_str("value")).map(str::to_string);
        if let Ok(label) = label {
            *sub = Bson::String(label);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_default_catalog_is_valid() {
        let settings = OptionSettings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.has_location("Pune"));
        let hot = settings.lead_stage("Hot").unwrap();
        assert!(hot.sub_stages.iter().any(|s| s == "Confirmed Admission"));
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let mut settings = OptionSettings::default();
        settings.courses.push(OptionItem::new("Data Science"));
        let (field, _) = settings.validate().unwrap_err();
        assert_eq!(field, "courses");
    }

    #[test]
    fn test_lead_stages_must_be_recordable() {
        let mut settings = OptionSettings::default();
        settings.lead_stages.retain(|s| s.label != "Walkin");
        assert!(settings.validate().is_ok());

        settings.lead_stages.push(LeadStageOption {
            label: "Lost".to_string(),
            sub_stages: vec![],
        });
        let (field, message) = settings.validate().unwrap_err();
        assert_eq!(field, "leadStages");
        assert!(message.contains("Lost"));
    }

    #[test]
    fn test_migrate_value_to_label() {
        let mut legacy = doc! {
            "key": SETTINGS_KEY,
            "courses": [ { "value": "Java" }, { "label": "Python" } ],
            "locations": [ "Pune" ],
            "statuses": [],
            "leadStages": [ { "value": "Hot", "subStages": [ { "value": "Confirmed Admission" } ] } ],
        };
        assert!(migrate_legacy_document(&mut legacy));
        let settings: OptionSettings = bson::from_document(legacy.clone()).unwrap();
        assert!(settings.has_course("Java"));
        assert!(settings.has_course("Python"));
        assert!(settings.has_location("Pune"));
        assert_eq!(settings.lead_stage("Hot").unwrap().sub_stages, vec!["Confirmed Admission".to_string()]);

        // second pass is a no-op
        assert!(!migrate_legacy_document(&mut legacy));
    }
}
