mod common;

use bson::oid::ObjectId;
use common::{create_request, eventually, Harness};
use leadflow_backend::dto::follow_up_dto::FollowUpRequest;
use leadflow_backend::dto::inquiry_dto::{ListInquiriesQuery, UpdateInquiryRequest};
use leadflow_backend::model::follow_up::{LeadStage, PresalesStatus};
use leadflow_backend::model::inquiry::{AssignmentStatus, Department, LeadStatus};
use leadflow_backend::model::user::Role;
use leadflow_backend::util::error::ServiceError;

fn oid(hex: &str) -> ObjectId {
    ObjectId::parse_str(hex).unwrap()
}

fn admission() -> FollowUpRequest {
    FollowUpRequest {
        lead_stage: Some(LeadStage::Hot),
        sub_stage: Some("Confirmed Admission".to_string()),
        message: Some("Paid the first instalment".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_second_claim_conflicts() {
    let h = Harness::new().await;
    let creator = h.user(Role::Presales).await;
    let first = h.user(Role::Presales).await;
    let second = h.user(Role::Presales).await;
    let service = &h.services.inquiry;

    let created = service.create_inquiry(&creator, create_request("+911234567890")).await.unwrap();
    assert_eq!(created.department, Department::Presales);
    assert_eq!(created.phone, "+911234567890");
    assert_eq!(created.assignment_status, AssignmentStatus::NotAssigned);
    assert_eq!(created.email.as_deref(), Some("aarav@example.com"));
    let id = oid(&created.id);

    let claimed = service.claim(&first, id).await.unwrap();
    assert_eq!(claimed.assignment_status, AssignmentStatus::Assigned);
    assert_eq!(claimed.assigned_to.unwrap().id, first.id.to_hex());
    assert!(!claimed.pending_first_follow_up);

    let err = service.claim(&second, id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_forward_claim_and_admit() {
    let h = Harness::new().await;
    let presales = h.user(Role::Presales).await;
    let sales = h.user(Role::Sales).await;
    let service = &h.services.inquiry;

    let created = service.create_inquiry(&presales, create_request("+911234567890")).await.unwrap();
    let id = oid(&created.id);
    service.claim(&presales, id).await.unwrap();

    let forwarded = service.forward_to_sales(&presales, id).await.unwrap();
    assert_eq!(forwarded.department, Department::Sales);
    assert_eq!(forwarded.assignment_status, AssignmentStatus::ForwardedToSales);
    assert!(forwarded.assigned_to.is_none());
    assert_eq!(forwarded.forwarded_by.unwrap().id, presales.id.to_hex());

    // the forwarder keeps it under "mine" but not in the default view
    let default_view = service.list_inquiries(&presales, ListInquiriesQuery::default()).await.unwrap();
    assert_eq!(default_view.total, 0);
    let mine = ListInquiriesQuery {
        assigned_to: Some("me".to_string()),
        ..Default::default()
    };
    assert_eq!(service.list_inquiries(&presales, mine).await.unwrap().total, 1);
    let own_id_upper = ListInquiriesQuery {
        assigned_to: Some(presales.id.to_hex().to_uppercase()),
        ..Default::default()
    };
    assert_eq!(service.list_inquiries(&presales, own_id_upper).await.unwrap().total, 1);

    let claimed = service.claim(&sales, id).await.unwrap();
    assert!(claimed.pending_first_follow_up);
    let err = service.move_to_unattended(&sales, id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let admitted = service.add_follow_up(&sales, id, admission()).await.unwrap();
    assert_eq!(admitted.status, LeadStatus::Hot);
    assert!(admitted.is_admitted);
    assert!(!admitted.pending_first_follow_up);
    let follow_up_created_at = admitted.follow_ups[0].created_at.clone();

    let active = service.list_inquiries(&sales, ListInquiriesQuery::default()).await.unwrap();
    assert_eq!(active.total, 0);
    let everything = ListInquiriesQuery {
        include_admitted: Some(true),
        ..Default::default()
    };
    assert_eq!(service.list_inquiries(&sales, everything).await.unwrap().total, 1);

    let students = service.list_admitted_students(&sales).await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].inquiry.id, created.id);
    assert_eq!(students[0].admission_date, follow_up_created_at);

    assert!(
        eventually(|| h
            .notifications
            .notifications()
            .iter()
            .any(|n| n.recipient == sales.id && n.message.contains("sales pool") && n.inquiry_id == Some(id)))
        .await
    );
}

#[tokio::test]
async fn test_phone_check_is_department_scoped() {
    let h = Harness::new().await;
    let presales = h.user(Role::Presales).await;
    let sales = h.user(Role::Sales).await;
    let admin = h.user(Role::Admin).await;
    let service = &h.services.inquiry;

    service.create_inquiry(&presales, create_request("+911234567890")).await.unwrap();

    let for_sales = service.check_phone_exists(&sales, "+911234567890").await.unwrap();
    assert!(!for_sales.exists);
    assert!(for_sales.inquiry.is_none());

    let for_admin = service.check_phone_exists(&admin, "+91 12345 67890").await.unwrap();
    assert!(for_admin.exists);
    assert_eq!(for_admin.inquiry.unwrap().department, Department::Presales);

    let sales_lead = service.create_inquiry(&sales, create_request("+911234567890")).await.unwrap();
    assert_eq!(sales_lead.department, Department::Sales);
    let found = service.check_phone_exists(&sales, "+911234567890").await.unwrap();
    assert_eq!(found.inquiry.unwrap().id, sales_lead.id);

    let err = service.check_phone_exists(&sales, "12345").await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { .. }));
}

#[tokio::test]
async fn test_unattend_twice_is_rejected() {
    let h = Harness::new().await;
    let presales = h.user(Role::Presales).await;
    let service = &h.services.inquiry;

    let created = service.create_inquiry(&presales, create_request("+911234567890")).await.unwrap();
    let id = oid(&created.id);
    service.claim(&presales, id).await.unwrap();

    let released = service.move_to_unattended(&presales, id).await.unwrap();
    assert_eq!(released.assignment_status, AssignmentStatus::NotAssigned);
    assert!(released.assigned_to.is_none());

    let err = service.move_to_unattended(&presales, id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn test_assign_and_reassign_rules() {
    let h = Harness::new().await;
    let admin = h.user(Role::Admin).await;
    let presales = h.user(Role::Presales).await;
    let colleague = h.user(Role::Presales).await;
    let retired = h.user_with(Role::Presales, false).await;
    let sales = h.user(Role::Sales).await;
    let service = &h.services.inquiry;

    let created = service.create_inquiry(&admin, create_request("+911234567890")).await.unwrap();
    let id = oid(&created.id);

    let err = service.assign(&sales, id, presales.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied(_)));

    let assigned = service.assign(&admin, id, presales.id).await.unwrap();
    assert_eq!(assigned.assignment_status, AssignmentStatus::Assigned);
    assert_eq!(assigned.assigned_to.unwrap().id, presales.id.to_hex());

    let err = service.reassign_to_presales(&presales, id, retired.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    let err = service.reassign_to_sales(&admin, id, sales.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let reassigned = service.reassign_to_presales(&presales, id, colleague.id).await.unwrap();
    assert_eq!(reassigned.assignment_status, AssignmentStatus::Reassigned);
    assert_eq!(reassigned.assigned_to.unwrap().id, colleague.id.to_hex());

    assert!(
        eventually(|| h
            .notifications
            .notifications()
            .iter()
            .any(|n| n.recipient == colleague.id))
        .await
    );
    assert!(
        eventually(|| h
            .activity
            .entries()
            .iter()
            .any(|e| e.action == "inquiry_reassigned" && e.inquiry_id == id))
        .await
    );
}

#[tokio::test]
async fn test_plain_user_sees_only_own_leads() {
    let h = Harness::new().await;
    let submitter = h.user(Role::User).await;
    let other = h.user(Role::User).await;
    let service = &h.services.inquiry;

    let own = service.create_inquiry(&submitter, create_request("+911234567890")).await.unwrap();
    assert_eq!(own.department, Department::Presales);

    assert_eq!(service.list_inquiries(&submitter, ListInquiriesQuery::default()).await.unwrap().total, 1);
    assert_eq!(service.list_inquiries(&other, ListInquiriesQuery::default()).await.unwrap().total, 0);

    let err = service.get_inquiry(&other, oid(&own.id)).await.unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied(_)));
    let err = service.list_admitted_students(&submitter).await.unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied(_)));
}

#[tokio::test]
async fn test_catalog_is_enforced_on_writes() {
    let h = Harness::new().await;
    let presales = h.user(Role::Presales).await;
    let service = &h.services.inquiry;

    let mut request = create_request("+911234567890");
    request.course = "Basket Weaving".to_string();
    match service.create_inquiry(&presales, request).await.unwrap_err() {
        ServiceError::Validation { field, .. } => assert_eq!(field, "course"),
        other => panic!("expected validation error, got {:?}", other),
    }

    let mut request = create_request("911234567890");
    request.status = Some(LeadStatus::Hot);
    match service.create_inquiry(&presales, request).await.unwrap_err() {
        ServiceError::Validation { field, .. } => assert_eq!(field, "phone"),
        other => panic!("expected validation error, got {:?}", other),
    }

    let created = service.create_inquiry(&presales, create_request("+911234567890")).await.unwrap();
    let update = UpdateInquiryRequest {
        preferred_location: Some("Atlantis".to_string()),
        ..Default::default()
    };
    let err = service.update_inquiry(&presales, oid(&created.id), update).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { .. }));
}

#[tokio::test]
async fn test_follow_up_lifecycle() {
    let h = Harness::new().await;
    let presales = h.user(Role::Presales).await;
    let sales = h.user(Role::Sales).await;
    let service = &h.services.inquiry;

    let created = service.create_inquiry(&presales, create_request("+911234567890")).await.unwrap();
    let id = oid(&created.id);

    let request = FollowUpRequest {
        title: Some("Intro call".to_string()),
        inquiry_status: Some(PresalesStatus::Cold),
        ..Default::default()
    };
    let with_follow_up = service.add_follow_up(&presales, id, request).await.unwrap();
    assert_eq!(with_follow_up.status, LeadStatus::Cold);
    let follow_up_id = oid(&with_follow_up.follow_ups[0].id);

    let edit = FollowUpRequest {
        inquiry_status: Some(PresalesStatus::Hot),
        ..Default::default()
    };
    let edited = service.update_follow_up(&presales, id, follow_up_id, edit).await.unwrap();
    assert_eq!(edited.status, LeadStatus::Hot);
    assert_eq!(edited.follow_ups[0].title.as_deref(), Some("Intro call"));
    assert!(edited.follow_ups[0].updated_at.is_some());

    let bad_stage = FollowUpRequest {
        lead_stage: Some(LeadStage::Cold),
        sub_stage: Some("Confirmed Admission".to_string()),
        ..Default::default()
    };
    let err = service.add_follow_up(&presales, id, bad_stage).await.unwrap_err();
    assert!(matches!(err, ServiceError::Validation { .. }));

    let err = service.delete_follow_up(&sales, id, follow_up_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied(_)));
    let err = service
        .update_follow_up(&presales, id, ObjectId::new(), FollowUpRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let emptied = service.delete_follow_up(&presales, id, follow_up_id).await.unwrap();
    assert!(emptied.follow_ups.is_empty());
}

#[tokio::test]
async fn test_list_pagination_and_filters() {
    let h = Harness::new().await;
    let admin = h.user(Role::Admin).await;
    let service = &h.services.inquiry;

    for (i, location) in ["Pune", "Mumbai", "Pune"].iter().enumerate() {
        let mut request = create_request(&format!("+91123456789{}", i));
        request.preferred_location = location.to_string();
        service.create_inquiry(&admin, request).await.unwrap();
    }

    let page = ListInquiriesQuery {
        page: Some(2),
        limit: Some(2),
        ..Default::default()
    };
    let second = service.list_inquiries(&admin, page).await.unwrap();
    assert_eq!(second.total, 3);
    assert_eq!(second.inquiries.len(), 1);
    assert_eq!(second.total_pages, Some(2));
    // newest first, so the last page holds the oldest
    assert_eq!(second.inquiries[0].phone, "+911234567890");

    let in_pune = ListInquiriesQuery {
        preferred_location: Some("Pune".to_string()),
        ..Default::default()
    };
    assert_eq!(service.list_inquiries(&admin, in_pune).await.unwrap().total, 2);

    let by_phone = ListInquiriesQuery {
        search: Some("1234567891".to_string()),
        ..Default::default()
    };
    let found = service.list_inquiries(&admin, by_phone).await.unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.inquiries[0].preferred_location, "Mumbai");

    let bad_date = ListInquiriesQuery {
        date_from: Some("yesterday".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.list_inquiries(&admin, bad_date).await.unwrap_err(),
        ServiceError::Validation { .. }
    ));
}

#[tokio::test]
async fn test_delete_permissions() {
    let h = Harness::new().await;
    let submitter = h.user(Role::User).await;
    let sales = h.user(Role::Sales).await;
    let service = &h.services.inquiry;

    let created = service.create_inquiry(&submitter, create_request("+911234567890")).await.unwrap();
    let id = oid(&created.id);

    let err = service.delete_inquiry(&sales, id).await.unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied(_)));

    service.delete_inquiry(&submitter, id).await.unwrap();
    let err = service.get_inquiry(&submitter, id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
