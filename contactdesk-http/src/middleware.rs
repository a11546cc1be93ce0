use axum::{
    extract::Request,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
};

/// Paths answered by handlers rather than the static site.
const API_PREFIXES: &[&str] = &["/contact", "/health", "/api-docs", "/swagger-ui"];

/// Browsers posting with `fetch(url, {body: JSON.stringify(..)})` send
/// `text/plain`; treat every POST body as JSON unless it says otherwise.
pub async fn normalize_content_type(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        let is_json = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);
        if !is_json {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
    }
    next.run(request).await
}

/// Set `Cache-Control` on responses that don't carry one.
///
/// Successful GET/HEAD responses outside the API get `public, max-age=N`;
/// everything else gets `no-store`.
pub async fn cache_control(request: Request, next: Next, max_age: u64) -> Response {
    let cacheable_request = (request.method() == Method::GET
        || request.method() == Method::HEAD)
        && !is_api_path(request.uri().path());

    let mut response = next.run(request).await;
    if response.headers().contains_key(CACHE_CONTROL) {
        return response;
    }

    let value = if cacheable_request && response.status().is_success() {
        HeaderValue::from_str(&format!("public, max-age={}", max_age))
            .unwrap_or(HeaderValue::from_static("no-store"))
    } else {
        HeaderValue::from_static("no-store")
    };
    response.headers_mut().insert(CACHE_CONTROL, value);
    response
}

fn is_api_path(path: &str) -> bool {
    API_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .map(|rest| rest.starts_with('/'))
                .unwrap_or(false)
    })
}
