use roster_core::db::open_db_in_memory;
use roster_core::{
    ApiResponse, Page, PageRequest, SqliteStudentRepository, StudentDraft, StudentRecord,
    StudentService,
};

fn valid_draft() -> StudentDraft {
    StudentDraft {
        name: "Li Wei".to_string(),
        gender: Some("male".to_string()),
        phone: Some("13800001111".to_string()),
        age: Some(20),
        native_place: Some("Hangzhou".to_string()),
        major: Some("Computer Science".to_string()),
        email: Some("li@x.com".to_string()),
        tag: Some("honors, band".to_string()),
        remark: Some("transfer student".to_string()),
        ..StudentDraft::default()
    }
}

#[test]
fn valid_draft_passes_validation() {
    valid_draft().validate().unwrap();
    StudentDraft::new("Zhang San").validate().unwrap();
}

#[test]
fn blank_name_is_rejected() {
    let err = StudentDraft::new("   ").validate().unwrap_err();
    assert!(err.has_field("name"));
    assert_eq!(err.errors.len(), 1);
}

#[test]
fn validation_reports_every_violated_field() {
    let mut draft = valid_draft();
    draft.name = "n".repeat(65);
    draft.gender = Some("g".repeat(9));
    draft.phone = Some("138-0000".to_string());
    draft.email = Some("not-an-email".to_string());
    draft.major = Some("m".repeat(129));
    draft.remark = Some("r".repeat(513));

    let err = draft.validate().unwrap_err();
    for field in ["name", "gender", "phone", "email", "major", "remark"] {
        assert!(err.has_field(field), "missing violation for {field}");
    }
    assert!(!err.has_field("tag"));
    assert!(err.to_string().contains("phone must contain only digits"));
}

#[test]
fn length_limits_count_characters_not_bytes() {
    let mut draft = StudentDraft::new("李".repeat(64));
    draft.native_place = Some("浙".repeat(64));
    draft.validate().unwrap();

    draft.name = "李".repeat(65);
    assert!(draft.validate().unwrap_err().has_field("name"));
}

#[test]
fn phone_and_email_boundaries() {
    let mut draft = StudentDraft::new("Li Wei");
    draft.phone = Some("1".repeat(16));
    draft.email = Some(String::new());
    draft.validate().unwrap();

    draft.phone = Some("1".repeat(17));
    draft.email = Some(format!("{}@x.com", "a".repeat(27)));
    let err = draft.validate().unwrap_err();
    assert!(err.has_field("phone"));
    assert!(err.has_field("email"));
}

#[test]
fn record_tags_split_on_commas() {
    let record = StudentRecord::from_draft(1, &valid_draft(), 10);
    assert_eq!(record.tags(), vec!["honors", "band"]);

    let mut untagged = record.clone();
    untagged.tag = Some(" , ".to_string());
    assert!(untagged.tags().is_empty());
}

#[test]
fn from_draft_creates_active_record_with_equal_timestamps() {
    let record = StudentRecord::from_draft(7, &valid_draft(), 1_700_000_000_000);
    assert_eq!(record.id, 7);
    assert!(record.is_active());
    assert_eq!(record.created_at, record.updated_at);
    assert_eq!(record.to_draft(), valid_draft());
}

#[test]
fn record_serialization_uses_camel_case_wire_fields() {
    let mut draft = valid_draft();
    draft.owner_id = Some(3);
    draft.creator_id = Some(9);
    let record = StudentRecord::from_draft(42, &draft, 1_000);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], 42);
    assert_eq!(json["ownerId"], 3);
    assert_eq!(json["nativePlace"], "Hangzhou");
    assert_eq!(json["createdAt"], 1_000);
    assert_eq!(json["updatedAt"], 1_000);
    assert_eq!(json["deleted"], false);
    assert_eq!(json["creatorId"], 9);

    let decoded: StudentRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn draft_deserializes_with_missing_optional_fields() {
    let draft: StudentDraft =
        serde_json::from_str(r#"{"name":"Li Wei","phone":"13800001111"}"#).unwrap();
    assert_eq!(draft.name, "Li Wei");
    assert_eq!(draft.phone.as_deref(), Some("13800001111"));
    assert_eq!(draft.email, None);
}

#[test]
fn page_envelope_serializes_expected_shape() {
    let request = PageRequest::new(0, 2).unwrap();
    let page = Page::from_sorted(vec!["a", "b", "c"], &request);
    let response = ApiResponse::success(page, "Students retrieved successfully");

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Students retrieved successfully");
    let data = &json["data"];
    assert_eq!(data["content"], serde_json::json!(["a", "b"]));
    assert_eq!(data["currentPage"], 0);
    assert_eq!(data["totalItems"], 3);
    assert_eq!(data["totalPages"], 2);
    assert_eq!(data["size"], 2);
    assert_eq!(data["first"], true);
    assert_eq!(data["last"], false);
    assert_eq!(data["empty"], false);
}

#[test]
fn error_envelope_serializes_null_data() {
    let response = ApiResponse::<StudentRecord>::error("Student not found with ID: 5");
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
}

#[test]
fn delete_envelope_serializes_without_payload() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::try_new(&conn).unwrap());
    let id = service.create_student(&valid_draft()).unwrap().id;

    let response = if service.delete_student(id).unwrap() {
        ApiResponse::<()>::success_empty("Student deleted successfully")
    } else {
        ApiResponse::error(format!("Student not found with ID: {id}"))
    };

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Student deleted successfully");
    assert!(json["data"].is_null());
}
