use super::*;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 1,
        method: "Page.navigate".to_string(),
        params: Some(serde_json::json!({"url": "https://www.adres.gov.co/consulte-su-eps"})),
        session_id: Some("S1".to_string()),
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("Page.navigate"));
    assert!(json.contains("\"sessionId\":\"S1\""));
}

#[test]
fn test_cdp_request_omits_empty_fields() {
    let req = CdpRequest {
        id: 7,
        method: "Browser.close".to_string(),
        params: None,
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(!json.contains("params"));
    assert!(!json.contains("sessionId"));
}

#[test]
fn test_cdp_response_deserialize() {
    let json = r#"{"id": 1, "result": {"frameId": "abc"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(1));
    assert!(resp.result.is_some());
}

#[test]
fn test_cdp_event_deserialize() {
    let json = r#"{"method": "Target.targetCreated", "params": {"targetInfo": {}}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert!(resp.id.is_none());
    assert_eq!(resp.method.as_deref(), Some("Target.targetCreated"));
}

#[test]
fn test_target_info_deserialize() {
    let json = r#"{
        "targetId": "9F1C",
        "type": "page",
        "title": "Consulta BDUA",
        "url": "https://aplicaciones.adres.gov.co/bdua_internet/Pages/RespuestaConsulta.aspx",
        "attached": false,
        "openerId": "1A2B"
    }"#;
    let info: TargetInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.target_id, "9F1C");
    assert!(info.is_page());
    assert_eq!(info.opener_id.as_deref(), Some("1A2B"));
}

#[test]
fn test_service_worker_is_not_page() {
    let json = r#"{"targetId": "SW", "type": "service_worker", "title": "", "url": ""}"#;
    let info: TargetInfo = serde_json::from_str(json).unwrap();
    assert!(!info.is_page());
}

#[test]
fn test_browser_version_deserialize() {
    let json = r#"{
        "Browser": "HeadlessChrome/142.0.7444.59",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "V8-Version": "14.2.231.14",
        "webSocketDebuggerUrl": "ws://127.0.0.1:41873/devtools/browser/abc"
    }"#;
    let version: BrowserVersion = serde_json::from_str(json).unwrap();
    assert_eq!(version.browser, "HeadlessChrome/142.0.7444.59");
    assert!(version.web_socket_debugger_url.starts_with("ws://"));
}

#[test]
fn test_mouse_button_serialize() {
    let json = serde_json::to_string(&MouseButton::Left).unwrap();
    assert_eq!(json, "\"left\"");
}

#[test]
fn test_key_event_type_serialize() {
    let json = serde_json::to_string(&KeyEventType::KeyDown).unwrap();
    assert_eq!(json, "\"keyDown\"");
}

#[test]
fn test_iframe_node_deserialize() {
    let json = r#"{
        "nodeId": 14,
        "backendNodeId": 31,
        "nodeType": 1,
        "nodeName": "IFRAME",
        "localName": "iframe",
        "nodeValue": "",
        "frameId": "F1"
    }"#;
    let node: NodeInfo = serde_json::from_str(json).unwrap();
    assert_eq!(node.backend_node_id, 31);
    assert_eq!(node.node_name, "IFRAME");
    assert_eq!(node.frame_id.as_deref(), Some("F1"));
}

#[test]
fn test_unloaded_iframe_node_has_no_frame() {
    let node: NodeInfo =
        serde_json::from_str(r#"{"backendNodeId": 32, "nodeName": "IFRAME"}"#).unwrap();
    assert!(node.frame_id.is_none());
}

#[test]
fn test_iframe_target_is_not_a_page() {
    let json = r#"{"targetId": "F1", "type": "iframe", "url": "https://aplicaciones.adres.gov.co/bdua"}"#;
    let target: TargetInfo = serde_json::from_str(json).unwrap();
    assert!(target.is_iframe());
    assert!(!target.is_page());
}
