use super::*;

#[test]
fn test_request_omits_missing_system() {
    let request = ApiRequest {
        model: "claude-3-5-haiku-latest".to_string(),
        messages: vec![ApiMessage {
            role: "user".to_string(),
            content: "Hi".to_string(),
        }],
        system: None,
        max_tokens: 150,
        temperature: 0.8,
    };
    let json = serde_json::to_value(&request).unwrap();
    assert!(json.get("system").is_none());
    assert_eq!(json["max_tokens"], 150);
}

#[test]
fn test_request_includes_system() {
    let request = ApiRequest {
        model: "claude-3-5-haiku-latest".to_string(),
        messages: vec![],
        system: Some("Be brief.".to_string()),
        max_tokens: 100,
        temperature: 0.3,
    };
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["system"], "Be brief.");
}

#[test]
fn test_response_deserialization() {
    let body = r#"{
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": "Well done."}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 12, "output_tokens": 4}
    }"#;
    let response: ApiResponse = serde_json::from_str(body).unwrap();
    assert_eq!(response.content.len(), 1);
    assert_eq!(response.content[0].block_type, "text");
    assert_eq!(response.content[0].text.as_deref(), Some("Well done."));
    assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
}
