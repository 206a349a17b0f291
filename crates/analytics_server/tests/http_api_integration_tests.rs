// HTTP API integration tests for analytics_server endpoints

#[cfg(test)]
mod http_api_tests {
    use analytics_server::{
        build_router, AppConfig, AppState, ErrorResponse, TrackResponse, DATA_ROUTE, TRACK_ROUTE,
    };
    use analytics_store::AnalyticsSnapshot;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    const CODE: &str = "123456";

    // Test helper to create app state with a known access code
    fn create_test_state() -> AppState {
        let mut config = AppConfig::default();
        config.analytics.access_code = Some(CODE.to_string());
        AppState::new(config).unwrap()
    }

    fn track_request(body: &str, ip: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(TRACK_ROUTE)
            .header("content-type", "application/json")
            .header("user-agent", "integration-test");
        if let Some(ip) = ip {
            builder = builder.header("x-forwarded-for", ip);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn data_request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(DATA_ROUTE);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn track(app: &Router, path: &str, ip: Option<&str>) {
        let body = format!(r#"{{"path":"{}"}}"#, path);
        let (status, bytes) = send(app, track_request(&body, ip)).await;
        assert_eq!(status, StatusCode::OK);
        let response: TrackResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(response.success);
    }

    async fn fetch_snapshot(app: &Router) -> AnalyticsSnapshot {
        let (status, bytes) = send(app, data_request(Some("Bearer 123456"))).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let app = build_router(create_test_state());
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, bytes) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn test_track_then_query_top_pages() {
        let app = build_router(create_test_state());
        for _ in 0..3 {
            track(&app, "/docs/motors", Some("1.2.3.4")).await;
        }
        track(&app, "/docs/sensors", Some("5.6.7.8")).await;

        let snapshot = fetch_snapshot(&app).await;
        assert_eq!(snapshot.total_visits, 4);
        assert_eq!(snapshot.unique_visitors, 2);
        assert_eq!(snapshot.last_24h_visits, 4);
        assert_eq!(snapshot.last_7d_visits, 4);
        assert_eq!(snapshot.unique_visitors_24h, 2);
        assert_eq!(snapshot.top_pages[0].path, "/docs/motors");
        assert_eq!(snapshot.top_pages[0].count, 3);
        assert_eq!(snapshot.recent_page_views[0].path, "/docs/sensors");
        assert_eq!(
            snapshot.recent_page_views[0].user_agent.as_deref(),
            Some("integration-test")
        );
    }

    #[tokio::test]
    async fn test_repeat_ip_counts_once() {
        let app = build_router(create_test_state());
        track(&app, "/", Some("1.2.3.4")).await;
        track(&app, "/", Some("1.2.3.4, 10.0.0.1")).await;
        track(&app, "/", Some("5.6.7.8")).await;

        let snapshot = fetch_snapshot(&app).await;
        assert_eq!(snapshot.unique_visitors, 2);
        assert_eq!(snapshot.total_visits, 3);
    }

    #[tokio::test]
    async fn test_missing_ip_headers_record_unknown() {
        let app = build_router(create_test_state());
        track(&app, "/docs", None).await;

        let snapshot = fetch_snapshot(&app).await;
        assert_eq!(snapshot.recent_page_views[0].ip.as_deref(), Some("unknown"));
        assert_eq!(snapshot.unique_visitors, 1);
    }

    #[tokio::test]
    async fn test_track_without_path_is_recorded() {
        let app = build_router(create_test_state());
        let body = r#"{"referer":"https://example.com"}"#;
        let (status, _) = send(&app, track_request(body, None)).await;
        assert_eq!(status, StatusCode::OK);

        let snapshot = fetch_snapshot(&app).await;
        assert_eq!(snapshot.total_visits, 1);
        assert_eq!(snapshot.recent_page_views[0].path, "");
        assert_eq!(
            snapshot.recent_page_views[0].referer.as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_quietly() {
        let app = build_router(create_test_state());
        let (status, bytes) = send(&app, track_request("not json", None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let response: TrackResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!response.success);
        assert_eq!(fetch_snapshot(&app).await.total_visits, 0);
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let app = build_router(create_test_state());
        for body in ["[1,2]", r#""/docs""#, "null"] {
            let (status, _) = send(&app, track_request(body, None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        assert_eq!(fetch_snapshot(&app).await.total_visits, 0);
    }

    #[tokio::test]
    async fn test_wrong_typed_fields_still_record_visit() {
        let app = build_router(create_test_state());
        let (status, bytes) =
            send(&app, track_request(r#"{"path":"/docs","referer":7}"#, None)).await;

        assert_eq!(status, StatusCode::OK);
        let response: TrackResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(response.success);

        let (status, _) = send(&app, track_request(r#"{"path":42}"#, None)).await;
        assert_eq!(status, StatusCode::OK);

        let snapshot = fetch_snapshot(&app).await;
        assert_eq!(snapshot.total_visits, 2);
        assert_eq!(snapshot.recent_page_views[1].path, "/docs");
        assert!(snapshot.recent_page_views[1].referer.is_none());
        assert_eq!(snapshot.recent_page_views[0].path, "");
    }

    #[tokio::test]
    async fn test_dashboard_paths_are_not_recorded() {
        let app = build_router(create_test_state());
        track(&app, "/analytics-dashboard", Some("1.2.3.4")).await;
        track(&app, "/docs", Some("1.2.3.4")).await;

        let snapshot = fetch_snapshot(&app).await;
        assert_eq!(snapshot.total_visits, 1);
        assert_eq!(snapshot.top_pages.len(), 1);
        assert_eq!(snapshot.top_pages[0].path, "/docs");
    }

    #[tokio::test]
    async fn test_wrong_code_is_unauthorized() {
        let app = build_router(create_test_state());
        track(&app, "/docs/motors", Some("1.2.3.4")).await;

        let (status, bytes) = send(&app, data_request(Some("Bearer 000000"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Unauthorized" }));
        assert!(body.get("totalVisits").is_none());
    }

    #[tokio::test]
    async fn test_missing_or_malformed_authorization() {
        let app = build_router(create_test_state());

        let (status, _) = send(&app, data_request(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, data_request(Some(CODE))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, data_request(Some("Bearer 1234567"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unconfigured_code_is_internal_error() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let app = build_router(state);

        let (status, bytes) = send(&app, data_request(Some("Bearer 123456"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Internal server error");
    }

    #[tokio::test]
    async fn test_repeated_queries_match() {
        let app = build_router(create_test_state());
        track(&app, "/a", Some("1.1.1.1")).await;
        track(&app, "/b", Some("2.2.2.2")).await;

        let first = fetch_snapshot(&app).await;
        let second = fetch_snapshot(&app).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_retention_cap_from_config() {
        let mut config = AppConfig::default();
        config.analytics.access_code = Some(CODE.to_string());
        config.analytics.retention_cap = 2;
        let app = build_router(AppState::new(config).unwrap());

        for path in ["/1", "/2", "/3"] {
            track(&app, path, None).await;
        }

        let snapshot = fetch_snapshot(&app).await;
        assert_eq!(snapshot.total_visits, 3);
        assert_eq!(snapshot.last_24h_visits, 2);
        let recent: Vec<_> = snapshot
            .recent_page_views
            .iter()
            .map(|view| view.path.as_str())
            .collect();
        assert_eq!(recent, vec!["/3", "/2"]);
    }

    #[tokio::test]
    async fn test_concurrent_tracking() {
        let app = build_router(create_test_state());
        let mut handles = Vec::new();
        for i in 0..50 {
            let app = app.clone();
            handles.push(tokio::spawn(async move {
                let ip = format!("10.0.0.{}", i % 5);
                let body = format!(r#"{{"path":"/docs/{}"}}"#, i % 3);
                let request = Request::builder()
                    .method("POST")
                    .uri(TRACK_ROUTE)
                    .header("x-real-ip", ip)
                    .body(Body::from(body))
                    .unwrap();
                app.oneshot(request).await.unwrap().status()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        let snapshot = fetch_snapshot(&app).await;
        assert_eq!(snapshot.total_visits, 50);
        assert_eq!(snapshot.unique_visitors, 5);
        let counted: u64 = snapshot.top_pages.iter().map(|page| page.count).sum();
        assert_eq!(counted, 50);
    }
}
