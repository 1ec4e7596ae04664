use serde::Serialize;

use crate::dto::inquiry_dto::InquiryView;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_inquiries: u64,
    pub hot_inquiries: u64,
    pub warm_inquiries: u64,
    pub cold_inquiries: u64,
    pub presales_inquiries: u64,
    pub sales_inquiries: u64,
    pub my_inquiries: u64,
    pub my_attended_inquiries: u64,
    pub unassigned_inquiries: u64,
    /// Global, not scoped to the caller.
    pub admitted_students: u64,
    pub recent_inquiries: Vec<InquiryView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCount {
    pub location: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnattendedCounts {
    pub total: u64,
    pub by_location: Vec<LocationCount>,
}
