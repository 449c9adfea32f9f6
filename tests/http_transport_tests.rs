use std::sync::Arc;
use tweetnet::core::kernel::{
    OAuth1Signer, QueryParams, RequestBuilder, ResponseFormat, ReqwestTransport, Transport,
    TransportConfig,
};
use tweetnet::endpoints::{NewDirectMessage, ShowUser, UpdateStatus};
use tweetnet::{build_client, ErrorKind, TwitterClientBuilder, TwitterConfig, UserTarget};
use wiremock::matchers::{body_string, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_id(id: u64) -> UserTarget {
    UserTarget::id(id).unwrap()
}

fn named(screen_name: &str) -> UserTarget {
    UserTarget::screen_name(screen_name).unwrap()
}

fn credentials(base_url: &str) -> TwitterConfig {
    TwitterConfig::new(
        "xvz1evFS4wEEPTGEFPHBog".to_string(),
        "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
        "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
        "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
    )
    .base_url(base_url)
}

#[tokio::test]
async fn test_transport_returns_non_2xx_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/users/show.json"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string("{\"errors\":[{\"message\":\"Over capacity\"}]}"),
        )
        .mount(&server)
        .await;

    let base_url = format!("{}/1", server.uri());
    let mut params = QueryParams::new();
    params.text("screen_name", "jack");
    let request = RequestBuilder::new(&base_url, ResponseFormat::Json)
        .build(reqwest::Method::GET, "users/show", &params, None)
        .unwrap();

    let transport = ReqwestTransport::new(TransportConfig::default()).unwrap();
    let response = transport.send(&request).await.unwrap();

    assert_eq!(response.status, 503);
    assert!(!response.is_success());
    assert!(response.body_text().contains("Over capacity"));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error_without_status() {
    let request = RequestBuilder::new("http://127.0.0.1:1/1", ResponseFormat::Json)
        .build(reqwest::Method::GET, "users/show", &QueryParams::new(), None)
        .unwrap();

    let transport = ReqwestTransport::new(TransportConfig::default().with_timeout(5)).unwrap();
    let err = transport.send(&request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_signed_post_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/direct_messages/new.json"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(header("User-Agent", "tweetnet-tests"))
        .and(header_exists("Authorization"))
        .and(body_string("screen_name=jack&text=hello%20there"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"id":1,"text":"hello there","recipient_screen_name":"jack"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = credentials(&format!("{}/1", server.uri())).user_agent("tweetnet-tests");
    let client = build_client(config).unwrap();

    let dm = client
        .invoke(NewDirectMessage::new(named("jack"), "hello there"))
        .await
        .unwrap();
    assert_eq!(dm.id, 1);
    assert_eq!(dm.recipient_screen_name, "jack");

    let received = server.received_requests().await.unwrap();
    let authorization = received[0]
        .headers
        .get("Authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(authorization.starts_with("OAuth "));
    assert!(authorization.contains("oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\""));
    assert!(authorization.contains("oauth_signature_method=\"HMAC-SHA1\""));
    assert!(authorization.contains("oauth_signature=\""));
}

#[tokio::test]
async fn test_public_get_without_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/users/show.xml"))
        .and(query_param("user_id", "12"))
        .and(query_param("include_entities", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<user><id>12</id><screen_name>jack</screen_name><verified>true</verified></user>",
            "application/xml",
        ))
        .mount(&server)
        .await;

    let config = TwitterConfig::read_only()
        .base_url(format!("{}/1", server.uri()))
        .format(ResponseFormat::Xml);
    let client = build_client(config).unwrap();

    let user = client
        .invoke(ShowUser {
            include_entities: true,
            ..ShowUser::new(user_id(12))
        })
        .await
        .unwrap();

    assert_eq!(user.id, 12);
    assert_eq!(user.screen_name, "jack");
    assert!(user.verified);

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("Authorization").is_none());
}

#[tokio::test]
async fn test_http_error_through_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/statuses/update.json"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string(r#"{"error":"Status is a duplicate."}"#),
        )
        .mount(&server)
        .await;

    let transport = Arc::new(ReqwestTransport::new(TransportConfig::default()).unwrap());
    let client = TwitterClientBuilder::new(credentials(&format!("{}/1", server.uri())))
        .with_authenticator(Arc::new(OAuth1Signer::new(
            "ck".to_string(),
            "cs".to_string(),
            "at".to_string(),
            "ats".to_string(),
        )))
        .build_with_transport(transport)
        .unwrap();

    let err = client
        .invoke(UpdateStatus::new("same old"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), Some(403));
    assert!(err.message().contains("duplicate"));
}
