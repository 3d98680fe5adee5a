use eyes_core::driver::ELEMENT_KEY;
use eyes_core::{Driver, ElementRef, EyesError, Point, RectangleSize, WebDriverClient};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn screenshot_unwraps_value() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/session/wd-1/screenshot")
        .with_status(200)
        .with_body(r#"{"value":"aGVsbG8="}"#)
        .create_async()
        .await;

    let client = WebDriverClient::new(server.url(), "wd-1").unwrap();
    let screenshot = client.take_screenshot().await.expect("screenshot");

    mock.assert_async().await;
    assert_eq!(screenshot, "aGVsbG8=");
}

#[tokio::test]
async fn element_rect_is_rounded_into_location_and_size() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/session/wd-1/element/el-9/rect")
        .with_status(200)
        .with_body(r#"{"value":{"x":49.6,"y":100.2,"width":200.0,"height":39.5}}"#)
        .expect(2)
        .create_async()
        .await;

    let client = WebDriverClient::new(server.url(), "wd-1").unwrap();
    let element = ElementRef::new("el-9");

    assert_eq!(
        client.element_location(&element).await.unwrap(),
        Point::new(50, 100)
    );
    assert_eq!(
        client.element_size(&element).await.unwrap(),
        RectangleSize::new(200, 40)
    );
}

#[tokio::test]
async fn incomplete_rect_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/session/wd-1/element/el-9/rect")
        .with_status(200)
        .with_body(r#"{"value":{"x":1,"y":2}}"#)
        .create_async()
        .await;

    let client = WebDriverClient::new(server.url(), "wd-1").unwrap();
    let err = client
        .element_size(&ElementRef::new("el-9"))
        .await
        .unwrap_err();
    assert!(matches!(err, EyesError::IllegalArgument(_)));
    assert!(err.to_string().contains("'width'"));
}

#[tokio::test]
async fn scroll_position_runs_script() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/session/wd-1/execute/sync")
        .match_body(Matcher::PartialJson(json!({"args": []})))
        .with_status(200)
        .with_body(r#"{"value":[0,20.4]}"#)
        .create_async()
        .await;

    let client = WebDriverClient::new(server.url(), "wd-1").unwrap();
    assert_eq!(client.scroll_position().await.unwrap(), Point::new(0, 20));
}

#[tokio::test]
async fn find_element_reads_w3c_reference() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/session/wd-1/element")
        .match_body(Matcher::Json(
            json!({"using": "css selector", "value": "#cart"}),
        ))
        .with_status(200)
        .with_body(json!({"value": {ELEMENT_KEY: "el-3"}}).to_string())
        .create_async()
        .await;

    let client = WebDriverClient::new(server.url(), "wd-1").unwrap();
    let element = client.find_element("#cart").await.expect("element");
    assert_eq!(element.id(), "el-3");
}

#[tokio::test]
async fn driver_errors_carry_w3c_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/session/wd-1/screenshot")
        .with_status(404)
        .with_body(r#"{"value":{"error":"invalid session id","message":"session deleted"}}"#)
        .create_async()
        .await;

    let client = WebDriverClient::new(server.url(), "wd-1").unwrap();
    let err = client.take_screenshot().await.unwrap_err();
    match err {
        EyesError::Transport { status, message } => {
            assert_eq!(status.map(|s| s.as_u16()), Some(404));
            assert_eq!(message, "invalid session id: session deleted");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}
