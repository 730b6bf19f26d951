//! HTTP 传输层
//!
//! 把"发一个请求、拿回状态码和响应体"抽象成 trait：
//! 生产环境走 `web_sys::fetch`，测试注入 mock 客户端。
//! 认证头、信封解码等 API 语义都在上层的 `ApiClient` 中，
//! 本模块只关心字节进出。

use dormdesk_shared::protocol::HttpMethod;
use std::collections::HashMap;

/// 传输层错误
#[derive(Debug)]
pub enum HttpError {
    /// 请求构建失败
    RequestBuildFailed(String),
    /// 网络请求失败
    NetworkError(String),
    /// 响应解析失败
    ResponseParseFailed(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::RequestBuildFailed(msg) => write!(f, "请求构建失败: {}", msg),
            HttpError::NetworkError(msg) => write!(f, "网络错误: {}", msg),
            HttpError::ResponseParseFailed(msg) => write!(f, "响应解析失败: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// 通用 HTTP 请求结构
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// 通用 HTTP 响应结构
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 2xx 判定
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性 (Trait)
///
/// 使用 async_trait，(?Send) 是因为 wasm 单线程环境下
/// JS 相关类型不是 Send 的。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: 浏览器 Fetch 客户端 (Production)
// =========================================================

#[cfg(target_arch = "wasm32")]
pub use fetch::FetchHttpClient;

#[cfg(target_arch = "wasm32")]
mod fetch {
    use super::{HttpClient, HttpError, HttpRequest, HttpResponse};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, Response};

    /// 基于 `web_sys::fetch` 的轻量级客户端
    #[derive(Clone, Copy, Default)]
    pub struct FetchHttpClient;

    #[async_trait::async_trait(?Send)]
    impl HttpClient for FetchHttpClient {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            let headers = Headers::new()
                .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Headers 失败: {:?}", e)))?;

            for (key, value) in &req.headers {
                headers.set(key, value).map_err(|e| {
                    HttpError::RequestBuildFailed(format!("设置 Header 失败: {:?}", e))
                })?;
            }

            let opts = RequestInit::new();
            opts.set_method(req.method.as_str());
            opts.set_headers(&headers.into());

            if let Some(body) = &req.body {
                opts.set_body(&JsValue::from_str(body));
            }

            let request = Request::new_with_str_and_init(&req.url, &opts)
                .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

            let window = web_sys::window()
                .ok_or_else(|| HttpError::NetworkError("无法获取 window 对象".to_string()))?;

            let resp_value = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

            let response: Response = resp_value.dyn_into().map_err(|e| {
                HttpError::ResponseParseFailed(format!("Response 类型转换失败: {:?}", e))
            })?;

            let status = response.status();

            let promise = response
                .text()
                .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
            let text = JsFuture::from(promise)
                .await
                .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

            Ok(HttpResponse {
                status,
                body: text.as_string().unwrap_or_default(),
            })
        }
    }
}
