use serde::{Deserialize, Serialize};

use crate::model::settings::{LeadStageOption, OptionItem, OptionSettings, SETTINGS_KEY};

/// Full replacement of the option catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub courses: Vec<OptionItem>,
    pub locations: Vec<OptionItem>,
    pub statuses: Vec<OptionItem>,
    pub lead_stages: Vec<LeadStageOption>,
}

impl From<UpdateSettingsRequest> for OptionSettings {
    fn from(request: UpdateSettingsRequest) -> Self {
        OptionSettings {
            key: SETTINGS_KEY.to_string(),
            courses: request.courses,
            locations: request.locations,
            statuses: request.statuses,
            lead_stages: request.lead_stages,
        }
    }
}
