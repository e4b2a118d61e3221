#[cmt_derive::api_model]
struct TrackPayload {
    track_name: String,
    display_order: u32,
}

#[test]
fn api_model_serializes_camel_case() {
    let payload = TrackPayload { track_name: "Systems".to_owned(), display_order: 2 };
    let json = serde_json::to_string(&payload).unwrap();
    assert!(json.contains("\"trackName\""));
    assert!(json.contains("\"displayOrder\""));
}

#[test]
fn api_model_rejects_unknown_fields() {
    let err = serde_json::from_str::<TrackPayload>(
        r#"{"trackName":"Systems","displayOrder":2,"bogus":true}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown field"));
}
