#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::Json;
    use http::StatusCode;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::{json, Value};
    use serial_test::serial;

    use crate::handler::{HandlerConfig, TokenHandler};
    use crate::request::{build_request, Credentials};
    use crate::response::ResultEnvelope;
    use crate::tests::common::{map, spawn_axum, Router};
    use crate::transport::{ReqwestTransport, Transport};

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(5000).expect("reqwest client")
    }

    #[tokio::test]
    async fn posts_json_body_with_headers() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v2.1/tokens")
                    .header("authorization", "Bearer pk_test")
                    .header_exists("reb-api-consumer")
                    .json_body(json!({"method": "ach", "paymentInstrument": {"routingNumber": "123"}}));
                then.status(201).json_body(json!({"id": "tok_1"}));
            })
            .await;

        let credentials = Credentials { authorization: None, publishable_key: Some("pk_test".to_owned()) };
        let config = build_request(
            map(json!({"method": "ach", "paymentInstrument": {"routingNumber": "123"}})),
            Some(server.url("/v2.1/tokens").as_str()),
            &credentials,
        )
        .unwrap();

        let reply = transport().send(&config).await;
        mock.assert_async().await;
        assert!(reply.error.is_none());
        assert_eq!(reply.response.status_code, Some(201));
        assert_eq!(reply.body, json!({"id": "tok_1"}));
        assert_eq!(reply.response.raw_request.method, "POST");
    }

    #[tokio::test]
    async fn non_json_and_empty_bodies() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/text");
                then.status(502).body("bad gateway");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/empty");
                then.status(204);
            })
            .await;
        let credentials = Credentials { authorization: Some("sig".to_owned()), publishable_key: None };

        let config = build_request(map(json!({})), Some(server.url("/text").as_str()), &credentials).unwrap();
        let reply = transport().send(&config).await;
        assert_eq!(reply.response.status_code, Some(502));
        assert_eq!(reply.body, Value::String("bad gateway".to_owned()));

        let config = build_request(map(json!({})), Some(server.url("/empty").as_str()), &credentials).unwrap();
        let reply = transport().send(&config).await;
        assert_eq!(reply.response.status_code, Some(204));
        assert_eq!(reply.body, Value::Null);
    }

    #[tokio::test]
    async fn missing_endpoint_is_a_transport_error() {
        let config = build_request(map(json!({})), None, &Credentials::default()).unwrap();

        let reply = transport().send(&config).await;
        assert_eq!(reply.response.status_code, None);
        assert_eq!(reply.error.map(|e| e.to_string()).as_deref(), Some("Missing Rebilly endpoint"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = build_request(map(json!({})), Some(format!("http://{}/tokens", addr).as_str()), &Credentials::default()).unwrap();
        let reply = transport().send(&config).await;
        assert!(reply.error.is_some());
        assert_eq!(reply.body, Value::Null);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    #[serial]
    async fn create_token_against_live_endpoint() {
        let seen: Arc<Mutex<Vec<(HeaderMap, Value)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let router = Router::new().route("/tokens", post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let seen = seen_clone.clone();
            async move {
                seen.lock().unwrap().push((headers, body.clone()));
                (StatusCode::CREATED, Json(json!({"id": "tok_live", "method": body["method"]})))
            }
        }));
        let (server, addr) = spawn_axum(router).await;

        let config = HandlerConfig {
            endpoint: Some(format!("http://{}/tokens", addr)),
            authorization: Some("signature".to_owned()),
            publishable_key: None,
        };
        let handler = TokenHandler::new(config, vec![], transport());

        let envelopes: Arc<Mutex<Vec<ResultEnvelope>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = envelopes.clone();
        let payload = map(json!({"paymentInstrument": {"pan": "4111111111111111", "expYear": "2030"}}));
        handler
            .create_token(payload.into(), move |envelope: ResultEnvelope| sink.lock().unwrap().push(envelope), None)
            .await
            .unwrap();

        let envelopes = envelopes.lock().unwrap();
        assert_eq!(envelopes.len(), 1);
        assert!(!envelopes[0].error, "{:?}", envelopes[0]);
        assert_eq!(envelopes[0].status_code, Some(201));
        assert_eq!(envelopes[0].data, Some(json!({"id": "tok_live", "method": "payment-card"})));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (headers, body) = &seen[0];
        assert_eq!(headers["reb-auth"], "signature");
        assert!(headers.get("authorization").is_none());
        assert!(headers["reb-api-consumer"].to_str().unwrap().starts_with("RebillySDK/JS-Token "));
        assert_eq!(body["method"], "payment-card");

        server.abort();
    }
}
