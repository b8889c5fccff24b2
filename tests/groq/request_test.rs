//! Request builder wire format tests.

use pantrybot::groq::completions::{build_request, ChatMessage, DEFAULT_MODEL};
use pantrybot::inventory::schema::{FUNCTION_NAME, SYSTEM_PROMPT};

#[test]
fn build_request_sets_model_messages_and_params() {
    let req = build_request(DEFAULT_MODEL, "adicione 2 kg de arroz");

    assert_eq!(req.model, "openai/gpt-oss-120b");
    assert_eq!(req.max_completion_tokens, 4000);
    assert_eq!(req.temperature, 0.0);

    assert_eq!(req.messages.len(), 2);
    assert_eq!(req.messages[0].role, "system");
    assert_eq!(req.messages[0].content, SYSTEM_PROMPT);
    assert_eq!(req.messages[1].role, "user");
    assert_eq!(req.messages[1].content, "adicione 2 kg de arroz");
}

#[test]
fn build_request_declares_exactly_one_forced_tool() {
    let req = build_request(DEFAULT_MODEL, "hello");

    assert_eq!(req.tools.len(), 1);
    assert_eq!(req.tools[0].kind, "function");
    assert_eq!(req.tools[0].function.name, FUNCTION_NAME);
    assert_eq!(
        req.tools[0].function.description,
        "Update inventory items with specific actions"
    );

    assert_eq!(req.tool_choice.kind, "function");
    assert_eq!(req.tool_choice.function.name, FUNCTION_NAME);
}

#[test]
fn serialized_request_uses_wire_field_names() {
    let req = build_request(DEFAULT_MODEL, "x");
    let value = serde_json::to_value(&req).expect("request should serialize");

    assert!(value.get("max_completion_tokens").is_some());
    assert_eq!(value["temperature"], 0.0);
    assert_eq!(value["tools"][0]["type"], "function");
    assert_eq!(value["tool_choice"]["type"], "function");
    assert_eq!(value["tool_choice"]["function"]["name"], "update_inventory");
}

#[test]
fn user_text_survives_a_serialization_round_trip() {
    let message = "subtraia 1 kilograma de arroz \"Tio João\" 🍚";
    let req = build_request(DEFAULT_MODEL, message);

    let serialized = serde_json::to_string(&req).expect("request should serialize");
    let value: serde_json::Value =
        serde_json::from_str(&serialized).expect("round trip should parse");

    let user: ChatMessage =
        serde_json::from_value(value["messages"][1].clone()).expect("user message should parse");
    assert_eq!(user.role, "user");
    assert_eq!(user.content, message);
}

#[test]
fn empty_message_is_passed_through_unvalidated() {
    // The relay is responsible for not invoking the builder on empty input;
    // the builder itself does no validation.
    let req = build_request(DEFAULT_MODEL, "");
    assert_eq!(req.messages[1].content, "");
}
