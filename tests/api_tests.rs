//! End-to-end API tests through the router with a scripted fetcher and an
//! in-memory database
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use odonto_monitor::api::build_router;
use odonto_monitor::test_utils::{StubFetcher, TestContext, price_page};

async fn app(fetcher: StubFetcher) -> Router {
    let context = TestContext::new(fetcher).await.unwrap();
    build_router(context.state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_and_health() {
    let app = app(StubFetcher::new()).await;

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["hint"].as_str().unwrap().contains("/preco"));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["time"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn price_lookup() {
    let fetcher = StubFetcher::new()
        .with_page("https://www.dentalcremer.com.br/luva", price_page("89,90"))
        .with_page("https://www.dentalcremer.com.br/esgotado", "<p>Indisponível</p>".to_string())
        .with_failure("https://www.dentalcremer.com.br/fora", Some(503));
    let app = app(fetcher).await;

    let (status, body) = send(&app, get("/preco?url=https://www.dentalcremer.com.br/luva")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preco_atual"], 89.9);
    assert_eq!(body["site"], "dentalcremer");
    assert_eq!(body["url"], "https://www.dentalcremer.com.br/luva");
    assert!(body["timestamp"].is_string());

    let (status, body) = send(&app, get("/preco?url=https://www.dentalcremer.com.br/esgotado")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Price not found on page.");

    let (status, body) = send(&app, get("/preco?url=https://www.dentalcremer.com.br/fora")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "URL unreachable (status 503)");

    let (status, _) = send(&app, get("/preco")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn price_lookup_rejects_malformed_url_without_fetching() {
    let fetcher = StubFetcher::new();
    let app = app(fetcher.clone()).await;

    let (status, body) = send(&app, get("/preco?url=dentalcremer.com.br/luva")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("url"));

    let (status, _) = send(&app, get("/preco?url=ftp://dentalcremer.com.br/luva")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(fetcher.request_count(), 0);
}

#[tokio::test]
async fn drop_check_reports_only_drops() {
    let fetcher = StubFetcher::new()
        .with_page("https://www.suryadental.com.br/lima", price_page("129,90"))
        .with_page("https://www.suryadental.com.br/gaze", price_page("20,00"));
    let app = app(fetcher).await;

    let payload = json!({
        "itens": [
            {"url": "https://www.suryadental.com.br/lima", "preco_pago": 150.0, "produto": "Lima K-File"},
            {"url": "https://www.suryadental.com.br/gaze", "preco_pago": 15.0},
            {"url": "https://www.suryadental.com.br/sumiu", "preco_pago": 15.0},
            {"preco_pago": 10.0, "produto": "Sem URL"}
        ]
    });
    let (status, body) = send(&app, post_json("/verificar_quedas", &payload)).await;
    assert_eq!(status, StatusCode::OK);

    let drops = body["baixas"].as_array().unwrap();
    assert_eq!(drops.len(), 1);
    assert_eq!(drops[0]["preco_atual"], 129.9);
    assert_eq!(drops[0]["diferenca"], 20.1);
    assert_eq!(drops[0]["site"], "suryadental");
    assert_eq!(drops[0]["item"]["produto"], "Lima K-File");
    assert_eq!(drops[0]["item"]["preco_pago"], 150.0);
}

#[tokio::test]
async fn drop_check_validates_payload() {
    let app = app(StubFetcher::new()).await;

    let (status, _) = send(&app, post_json("/verificar_quedas", &json!({"itens": []}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        post_json("/verificar_quedas", &json!({"itens": [{"url": "https://x.test", "preco_pago": 0}]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("itens[0].preco_pago"));

    let (status, _) = send(&app, post_json("/verificar_quedas", &json!({"nada": 1}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_list_and_report() {
    let app = app(StubFetcher::new()).await;

    let payload = json!({
        "itens": [
            {"produto": "Lima K-File 25mm", "preco_pago": 80.0, "quantidade": 2,
             "url": "https://www.dentalcremer.com.br/lima", "data": "2024-05-10"},
            {"produto": "Gaze estéril", "preco_pago": 5.0, "quantidade": 4, "data": "2024-05-02"},
            {"produto": "Luva nitrílica", "preco_pago": 40.0, "data": "2024-04-30", "site": "dentalspeed"}
        ]
    });
    let (status, body) = send(&app, post_json("/registrar_compra", &payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "inseridos": 3}));

    let (status, body) = send(&app, get("/compras?mes=5&ano=2024")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_registros"], 2);
    let purchases = body["compras"].as_array().unwrap();
    assert_eq!(purchases[0]["produto"], "Lima K-File 25mm");
    assert_eq!(purchases[0]["categoria"], "Endodontia");
    assert_eq!(purchases[0]["valor_total"], 160.0);
    assert_eq!(purchases[0]["site"], "dentalcremer");
    assert_eq!(purchases[0]["data_compra"], "2024-05-10");
    assert_eq!(purchases[1]["produto"], "Gaze estéril");

    let (_, body) = send(&app, get("/compras?ano=2024")).await;
    assert_eq!(body["total_registros"], 3);
    assert_eq!(body["compras"][2]["site"], "dentalspeed");

    let (_, body) = send(&app, get("/compras")).await;
    assert_eq!(body["total_registros"], 3);

    let (status, body) = send(&app, get("/relatorio_mensal?ano=2024&mes=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ano"], 2024);
    assert_eq!(body["mes"], 5);
    assert_eq!(body["total_gasto"], 180.0);
    assert_eq!(body["por_item"][0]["item"], "Lima K-File 25mm");
    assert_eq!(body["por_item"][0]["total_qty"], 2);
    assert_eq!(body["por_item"][0]["gasto_medio"], 80.0);
    assert_eq!(body["por_item"][1]["categoria"], "Básico");
    assert_eq!(body["por_categoria"], json!({"Básico": 20.0, "Endodontia": 160.0}));
}

#[tokio::test]
async fn registration_rejects_invalid_batch_without_writing() {
    let app = app(StubFetcher::new()).await;

    let payload = json!({
        "itens": [
            {"produto": "Gaze", "preco_pago": 5.0},
            {"produto": "  ", "preco_pago": 5.0}
        ]
    });
    let (status, body) = send(&app, post_json("/registrar_compra", &payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("itens[1].produto"));

    let (_, body) = send(&app, get("/compras")).await;
    assert_eq!(body["total_registros"], 0);
}

#[tokio::test]
async fn report_validates_range() {
    let app = app(StubFetcher::new()).await;

    let (status, _) = send(&app, get("/relatorio_mensal?ano=2024&mes=13")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, get("/relatorio_mensal?ano=1999&mes=1")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, get("/relatorio_mensal?mes=1")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(&app, get("/compras?ano=1999")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("ano"));

    let (status, body) = send(&app, get("/relatorio_mensal?ano=2031&mes=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_gasto"], 0.0);
    assert_eq!(body["por_item"], json!([]));
    assert_eq!(body["por_categoria"], json!({}));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = app(StubFetcher::new()).await;
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
