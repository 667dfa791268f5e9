use serde_json::{Value, json};
use wabtn_core::dispatch::{Action, DeliveryMode, NodeParameters, compose};
use wabtn_core::testkit::load_fixture;

const BANNER: &str = "https://cdn.example.com/banner.png";

fn template_record() -> Value {
    json!({
        "name": "order_update",
        "language": "en_US",
        "status": "APPROVED",
        "category": "UTILITY",
        "id": "1234",
        "parameter_format": "POSITIONAL",
        "components": [
            {"type": "HEADER", "format": "IMAGE", "example": {"header_handle": ["4::aW1hZ2U="]}},
            {"type": "BODY", "text": "Hi {{1}}, order {{2}} shipped",
             "example": {"body_text": [["Ann", "77"]]}},
            {"type": "FOOTER", "text": "Thanks for shopping"},
            {"type": "BUTTONS", "buttons": [
                {"type": "URL", "text": "Track", "url": "https://shop.example.com/t/{{1}}",
                 "example": ["https://shop.example.com/t/77"]}
            ]},
            {"type": "CAROUSEL", "cards": [{"card_index": 0, "components": []}]}
        ]
    })
}

/// Every field the host can send, so each variant has to pick only its own.
fn node_parameters(action: Action, proxy: bool) -> NodeParameters {
    serde_json::from_value(json!({
        "action": action,
        "message": "Your order is on its way",
        "listTitle": "Options",
        "phoneNumber": "15550001111",
        "senderPhoneDynamicOption": json!({
            "verified_name": "Acme",
            "code_verification_status": "VERIFIED",
            "display_phone_number": "+1 555 0100",
            "id": "1098"
        }).to_string(),
        "templates": template_record().to_string(),
        "headerAction": "image",
        "headerImageURL": BANNER,
        "footerToggle": true,
        "footer": "Thanks for shopping",
        "proxyUrlToggle": proxy,
        "proxyUrl": "https://proxy.example.com/messages",
        "plainButton": {"fieldValues": [
            {"buttonTitle": "A"}, {"buttonTitle": "B"}, {"buttonTitle": "C"}
        ]},
        "buttonWithDescription": {"section": [
            {"sectionTitle": "S1", "buttonInSection": {"buttons": [
                {"buttonTitle": "r1", "buttonDescription": "d1"}
            ]}},
            {"sectionTitle": "S2", "buttonInSection": {"buttons": [
                {"buttonTitle": "r2", "buttonDescription": "d2"}
            ]}}
        ]},
        "templateParameterList": {"parameters": [
            {"parameterValue": "Ann"}, {"parameterValue": "77"}
        ]}
    }))
    .expect("node parameters")
}

fn composed(action: Action, proxy: bool) -> Value {
    let params = node_parameters(action, proxy);
    let mode = params.delivery_mode();
    assert_eq!(mode.is_proxy(), proxy);
    let composed = compose(&params, &mode).expect("compose");
    serde_json::to_value(composed.payload).expect("serialize")
}

#[test]
fn native_payloads_match_fixtures() {
    let cases = [
        (Action::Message, "native/text.json"),
        (Action::InteractiveButtons, "native/buttons.json"),
        (Action::InteractiveList, "native/list.json"),
        (Action::Template, "native/template.json"),
    ];
    for (action, fixture) in cases {
        assert_eq!(composed(action, false), load_fixture(fixture), "{action}");
    }
}

#[test]
fn proxy_envelopes_match_fixtures() {
    let cases = [
        (Action::Message, "proxy/text.json"),
        (Action::InteractiveButtons, "proxy/buttons.json"),
        (Action::InteractiveList, "proxy/list.json"),
        (Action::Template, "proxy/template.json"),
    ];
    for (action, fixture) in cases {
        assert_eq!(composed(action, true), load_fixture(fixture), "{action}");
    }
}

#[test]
fn proxy_template_forwards_the_selected_record_verbatim() {
    let value = composed(Action::Template, true);
    assert_eq!(value["templateInformation"], template_record());
    assert_eq!(value["templateInformation"]["components"][4]["type"], "CAROUSEL");
}

#[test]
fn disabled_toggles_leave_footer_and_header_out() {
    let mut params = node_parameters(Action::InteractiveButtons, false);
    params.footer_toggle = false;
    params.header_action = Default::default();
    let value = serde_json::to_value(compose(&params, &DeliveryMode::Native).unwrap().payload)
        .unwrap();
    let interactive = value["interactive"].as_object().unwrap();
    assert!(!interactive.contains_key("footer"));
    assert!(!interactive.contains_key("header"));
}

#[test]
fn proxy_needs_both_toggle_and_url() {
    let mut params = node_parameters(Action::Message, true);
    params.proxy_url.clear();
    assert_eq!(params.delivery_mode(), DeliveryMode::Native);

    let params = node_parameters(Action::Message, false);
    let value = serde_json::to_value(
        compose(&params, &params.delivery_mode()).unwrap().payload,
    )
    .unwrap();
    assert_eq!(value, load_fixture("native/text.json"));
}

#[test]
fn template_without_parameters_sends_no_body_component() {
    let mut params = node_parameters(Action::Template, false);
    params.template_parameter_list.parameters.clear();
    params.header_action = Default::default();
    let value = serde_json::to_value(compose(&params, &DeliveryMode::Native).unwrap().payload)
        .unwrap();
    assert_eq!(value["template"]["components"], json!([]));

    let proxy = DeliveryMode::select(&params.proxy_url, true);
    let value = serde_json::to_value(compose(&params, &proxy).unwrap().payload).unwrap();
    assert_eq!(value["messageBody"], "Hi {{1}}, order {{2}} shipped");
    assert_eq!(value["templateData"], json!({"body": {}}));
}

#[test]
fn surplus_and_missing_template_parameters_in_proxy_body() {
    let mut params = node_parameters(Action::Template, true);
    params.template_parameter_list.parameters.truncate(1);
    let value = composed_from(&params);
    assert_eq!(value["messageBody"], "Hi Ann, order {{2}} shipped");

    let mut params = node_parameters(Action::Template, true);
    params
        .template_parameter_list
        .parameters
        .push(wabtn_core::dispatch::TemplateParameter {
            parameter_value: "unused".into(),
        });
    let value = composed_from(&params);
    assert_eq!(value["messageBody"], "Hi Ann, order 77 shipped");
    assert_eq!(value["templateData"]["body"]["parameters"][2], "unused");
}

fn composed_from(params: &NodeParameters) -> Value {
    serde_json::to_value(compose(params, &params.delivery_mode()).unwrap().payload).unwrap()
}
