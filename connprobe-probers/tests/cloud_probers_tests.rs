//! Cloud probers against in-process mock services.

use std::sync::Arc;

use axum::extract::{OriginalUri, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use connprobe_core::{ProbeOutcome, ProbeRequest};
use connprobe_fetch::{
    Endpoints, MasterKeySigner, ProbeContext, Prober, SharedKeyCredential, StaticCredential,
};
use connprobe_probers::{
    CosmosProber, InsightsProber, KeyVaultProber, ProbeDispatcher, StorageProber,
};
use reqwest::Method;
use url::Url;

const COSMOS_KEY: &str = "Y29ubnByb2JlLXRlc3QtbWFzdGVyLWtleS0wMTIzNDU2Nzg5";
const STORAGE_ACCOUNT: &str = "devstoreaccount1";
const STORAGE_KEY: &str = "c3RvcmFnZS10ZXN0LWtleS1tYXRlcmlhbA==";

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers.get(name).and_then(|v| v.to_str().ok()).unwrap_or_default()
}

fn context_with(endpoints: Endpoints, credential: StaticCredential) -> ProbeContext {
    ProbeContext::builder()
        .endpoints(endpoints)
        .credentials(Arc::new(credential))
        .build()
}

// ============================================================================
// Cosmos DB
// ============================================================================

async fn cosmos_dbs(headers: HeaderMap) -> impl IntoResponse {
    let date = header(&headers, "x-ms-date");
    let expected = MasterKeySigner::from_base64(COSMOS_KEY)
        .unwrap()
        .authorization("GET", "dbs", "", date)
        .unwrap();

    if header(&headers, "x-ms-version") != "2018-12-31" {
        return (StatusCode::BAD_REQUEST, "missing version".to_string());
    }
    if header(&headers, "authorization") == expected {
        (StatusCode::OK, r#"{"Databases":[],"_count":0}"#.to_string())
    } else {
        (StatusCode::UNAUTHORIZED, r#"{"code":"Unauthorized"}"#.to_string())
    }
}

#[tokio::test]
async fn test_cosmos_signed_request_accepted() {
    let base = serve(Router::new().route("/dbs", get(cosmos_dbs))).await;
    let input = format!("AccountEndpoint={base}/some/ignored/path;AccountKey={COSMOS_KEY}");

    let outcome = CosmosProber::new().probe(&ProbeContext::new(), &input).await.unwrap();

    assert_eq!(outcome, ProbeOutcome::new(200, r#"Body: {"Databases":[],"_count":0}"#));
}

#[tokio::test]
async fn test_cosmos_wrong_key_passes_through_401() {
    let base = serve(Router::new().route("/dbs", get(cosmos_dbs))).await;
    let input = format!("AccountEndpoint={base};AccountKey=d3Jvbmcta2V5");

    let outcome = CosmosProber::new().probe(&ProbeContext::new(), &input).await.unwrap();

    assert_eq!(outcome, ProbeOutcome::new(401, r#"Body: {"code":"Unauthorized"}"#));
}

#[tokio::test]
async fn test_cosmos_unreachable_endpoint() {
    let input = format!("AccountEndpoint=http://127.0.0.1:1/;AccountKey={COSMOS_KEY}");

    let outcome = ProbeDispatcher::new()
        .dispatch(&ProbeContext::new(), &ProbeRequest::new("cosmos", input))
        .await;

    assert_eq!(outcome.status_code, 500);
    assert!(outcome.message.starts_with("Request Error: "), "{}", outcome.message);
}

// ============================================================================
// Storage
// ============================================================================

async fn storage_account_info(
    base: String,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> impl IntoResponse {
    let url = Url::parse(&format!("{base}{uri}")).unwrap();
    let date = header(&headers, "x-ms-date");
    let version = header(&headers, "x-ms-version");
    let expected = SharedKeyCredential::new(STORAGE_ACCOUNT, STORAGE_KEY)
        .unwrap()
        .authorization(&Method::GET, &url, &[("x-ms-date", date), ("x-ms-version", version)])
        .unwrap();

    let query_ok = uri.query() == Some("restype=account&comp=properties");
    if query_ok && header(&headers, "authorization") == expected {
        (StatusCode::OK, [("x-ms-sku-name", "Standard_LRS")]).into_response()
    } else {
        (
            StatusCode::FORBIDDEN,
            [("x-ms-error-code", "AuthenticationFailed")],
            "<Error/>",
        )
            .into_response()
    }
}

async fn storage_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handler_base = base.clone();
    let app = Router::new().route(
        "/devstoreaccount1/",
        get(move |uri: OriginalUri, headers: HeaderMap| {
            storage_account_info(handler_base.clone(), uri, headers)
        }),
    );
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

#[tokio::test]
async fn test_storage_reports_sku() {
    let base = storage_server().await;
    let input = format!(
        "DefaultEndpointsProtocol=http;AccountName={STORAGE_ACCOUNT};AccountKey={STORAGE_KEY};\
         BlobEndpoint={base}/devstoreaccount1"
    );

    let outcome = StorageProber::new().probe(&ProbeContext::new(), &input).await.unwrap();

    assert_eq!(outcome, ProbeOutcome::ok("Account devstoreaccount1 Info: Standard_LRS"));
}

#[tokio::test]
async fn test_storage_rejected_reports_error_code() {
    let base = storage_server().await;
    let input = format!(
        "AccountName={STORAGE_ACCOUNT};AccountKey=b3RoZXIta2V5;BlobEndpoint={base}/devstoreaccount1/"
    );

    let outcome = ProbeDispatcher::new()
        .dispatch(&ProbeContext::new(), &ProbeRequest::new("storage", input))
        .await;

    assert_eq!(
        outcome,
        ProbeOutcome::new(
            500,
            "Get Account devstoreaccount1 Info Error: HTTP 403: AuthenticationFailed"
        )
    );
}

// ============================================================================
// Application Insights
// ============================================================================

async fn insights_metric(Path(app_id): Path<String>, headers: HeaderMap) -> impl IntoResponse {
    let key = header(&headers, "x-api-key").to_string();
    if key.is_empty() {
        return (StatusCode::FORBIDDEN, "missing key".to_string());
    }
    (StatusCode::OK, format!("{app_id}|{key}"))
}

async fn insights_context() -> ProbeContext {
    let base = serve(Router::new().route(
        "/v1/apps/{app_id}/metrics/requests/duration",
        get(insights_metric),
    ))
    .await;
    context_with(
        Endpoints {
            insights_url: base,
            ..Endpoints::default()
        },
        StaticCredential::new("unused"),
    )
}

#[tokio::test]
async fn test_insights_key_keeps_semicolons() {
    let ctx = insights_context().await;

    let outcome = InsightsProber::new().probe(&ctx, "idA;partB;partC").await.unwrap();

    assert_eq!(outcome, ProbeOutcome::new(200, "Body: idA|partB;partC"));
}

#[tokio::test]
async fn test_insights_without_key_passes_through() {
    let ctx = insights_context().await;

    let outcome = InsightsProber::new().probe(&ctx, "abc").await.unwrap();

    assert_eq!(outcome, ProbeOutcome::new(403, "Body: missing key"));
}

// ============================================================================
// Key Vault
// ============================================================================

async fn vault_secrets(Path(vault): Path<String>, headers: HeaderMap) -> impl IntoResponse {
    if header(&headers, "authorization") != "Bearer vault-token" {
        return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"error": "Unauthorized"})));
    }
    let body = match vault.as_str() {
        "full" => serde_json::json!({
            "value": [
                {"id": "https://full.vault.azure.net/secrets/alpha"},
                {"id": "https://full.vault.azure.net/secrets/beta"}
            ],
            "nextLink": null
        }),
        "forbidden" => {
            return (StatusCode::FORBIDDEN, Json(serde_json::json!({"error": "Forbidden"})));
        }
        _ => serde_json::json!({"value": []}),
    };
    (StatusCode::OK, Json(body))
}

async fn vault_context(credential: StaticCredential) -> ProbeContext {
    let base = serve(Router::new().route("/{vault}/secrets", get(vault_secrets))).await;
    context_with(
        Endpoints {
            key_vault_url: format!("{base}/{{name}}"),
            ..Endpoints::default()
        },
        credential,
    )
}

#[tokio::test]
async fn test_keyvault_first_secret() {
    let ctx = vault_context(StaticCredential::new("vault-token")).await;

    let outcome = KeyVaultProber::new().probe(&ctx, "full").await.unwrap();

    assert_eq!(
        outcome,
        ProbeOutcome::ok("KeyVault full: First Secret ID: https://full.vault.azure.net/secrets/alpha")
    );
}

#[tokio::test]
async fn test_keyvault_empty_is_no_content() {
    let ctx = vault_context(StaticCredential::new("vault-token")).await;

    let outcome = KeyVaultProber::new().probe(&ctx, "empty").await.unwrap();

    assert_eq!(outcome, ProbeOutcome::new(204, "KeyVault empty: Secret Not Found"));
}

#[tokio::test]
async fn test_keyvault_listing_rejected() {
    let ctx = vault_context(StaticCredential::new("vault-token")).await;

    let outcome = ProbeDispatcher::new()
        .dispatch(&ctx, &ProbeRequest::new("keyvault", "forbidden"))
        .await;

    assert_eq!(
        outcome,
        ProbeOutcome::new(500, r#"List Secrets Error: HTTP 403: {"error":"Forbidden"}"#)
    );
}

#[tokio::test]
async fn test_keyvault_without_credentials() {
    let ctx = vault_context(StaticCredential::failing("no environment credential")).await;

    let outcome = ProbeDispatcher::new()
        .dispatch(&ctx, &ProbeRequest::new("keyvault", "full"))
        .await;

    assert_eq!(outcome.status_code, 500);
    assert!(outcome.message.starts_with("Auth Error: "), "{}", outcome.message);
}
