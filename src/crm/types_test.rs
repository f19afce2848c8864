// ABOUTME: Tests for CRM wire types - payload shapes and OData envelopes.
// ABOUTME: Payload JSON must match what the CRM web UI sends.

use super::*;

#[test]
fn test_note_request_shape() {
    let note = NoteRequest::new("2024-07-12", "testing api function", "this is notes input");
    let json = serde_json::to_value(&note).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "eventTypeKey": 18,
            "published": true,
            "timeless": true,
            "startDate": "2024-07-12",
            "endDate": "2024-07-12",
            "subject": "testing api function",
            "notes": "this is notes input",
            "statusKey": 0
        })
    );
}

#[test]
fn test_task_request_defaults_omit_optional_fields() {
    let task = TaskRequest::new("Call back", "2024-07-12", "2024-07-19");
    let json = serde_json::to_value(&task).unwrap();

    assert_eq!(json["eventTypeKey"], TASK_EVENT_TYPE_KEY);
    assert_eq!(json["startDate"], "2024-07-12");
    assert_eq!(json["endDate"], "2024-07-19");
    assert_eq!(json["timeless"], true);
    assert!(json.get("priorityKey").is_none());
    assert!(json.get("userKey").is_none());
}

#[test]
fn test_task_request_builder() {
    let task = TaskRequest::new("Tour", "2024-07-12T09:00:00", "2024-07-12T10:00:00")
        .notes("bring keys")
        .priority(2)
        .assign_to("user-1")
        .timed();
    let json = serde_json::to_value(&task).unwrap();

    assert_eq!(json["notes"], "bring keys");
    assert_eq!(json["priorityKey"], 2);
    assert_eq!(json["userKey"], "user-1");
    assert_eq!(json["timeless"], false);
}

#[test]
fn test_datatable_request_exact_bytes() {
    let req = DataTableRequest::new(&["key", "name"], 25);
    let json = serde_json::to_string(&req).unwrap();

    assert_eq!(
        json,
        concat!(
            r#"{"draw":1,"columns":["#,
            r#"{"data":"key","name":"","searchable":true,"orderable":true,"search":{"value":"","regex":false}},"#,
            r#"{"data":"name","name":"","searchable":true,"orderable":true,"search":{"value":"","regex":false}}"#,
            r#"],"order":[{"column":0,"dir":"desc"}],"start":0,"length":25,"search":{"value":"","regex":false}}"#
        )
    );
}

#[test]
fn test_datatable_request_paging_and_order() {
    let req = DataTableRequest::new(LINKED_PROPERTY_COLUMNS, DATATABLE_PAGE_LENGTH)
        .start(200)
        .order_by(2, SortDir::Asc);
    let json = serde_json::to_value(&req).unwrap();

    assert_eq!(json["start"], 200);
    assert_eq!(json["length"], 100);
    assert_eq!(json["order"][0]["column"], 2);
    assert_eq!(json["order"][0]["dir"], "asc");
    assert_eq!(
        json["columns"].as_array().unwrap().len(),
        LINKED_PROPERTY_COLUMNS.len()
    );
}

#[test]
fn test_odata_page_deserialization() {
    let json = r#"{"@odata.context": "x", "value": [{"Key": "a", "FullName": "Ann"}, {"Key": "b"}]}"#;
    let page: ODataPage = serde_json::from_str(json).unwrap();

    assert_eq!(page.value.len(), 2);
    assert_eq!(page.value[0]["FullName"], "Ann");
    assert!(page.value[1].get("FullName").is_none());
}

#[test]
fn test_odata_page_without_value_is_malformed() {
    let result: Result<ODataPage, _> = serde_json::from_str(r#"{"error": "nope"}"#);
    assert!(result.is_err());
}

#[test]
fn test_odata_query_params() {
    let query = ODataQuery::new()
        .filter("Key eq 'p1'")
        .select(["Key", "Name"]);

    assert_eq!(
        query.params(100),
        vec![
            ("api-version", "1.0".to_string()),
            ("$filter", "Key eq 'p1'".to_string()),
            ("$select", "Key,Name".to_string()),
            ("$skip", "100".to_string()),
        ]
    );
}

#[test]
fn test_odata_query_default_params() {
    assert_eq!(
        ODataQuery::default().params(0),
        vec![("api-version", "1.0".to_string()), ("$skip", "0".to_string())]
    );
}
