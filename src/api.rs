//! API 客户端适配器
//!
//! 所有出站请求的单一通道：
//! - 按请求实时从持久化存储读取 token 并附加 Bearer 认证头
//!   （不在内存缓存，避免并发登出后的脏 token）；
//! - 全局拦截 401：触发注入的回调强制登出，任何无关请求都一样；
//! - 非 2xx 响应提取服务端消息，提取不到用通用兜底文案；
//! - 2xx 响应经过信封归一化，形态不符时大声失败。
//!
//! 端点语义由 `dormdesk_shared::protocol::ApiRequest` 静态描述，
//! 本模块对任意端点泛型发送，不为每个端点手写方法。

use crate::web::http::{HttpClient, HttpError, HttpRequest};
use crate::web::storage::KeyValueStore;
use dormdesk_shared::envelope::{decode_envelope, extract_error_message};
use dormdesk_shared::protocol::{ApiRequest, HttpMethod};
use dormdesk_shared::{BEARER_PREFIX, HEADER_AUTHORIZATION};
use std::cell::RefCell;
use std::rc::Rc;

/// 持久化 token 的存储键。写入方只有会话层；本模块只读。
pub const STORAGE_TOKEN_KEY: &str = "dormdesk_token";

/// 网络/HTTP 失败时展示给用户的通用兜底文案
pub const GENERIC_FAILURE: &str = "请求失败，请稍后重试";

// =========================================================
// 错误类型
// =========================================================

#[derive(Debug)]
pub enum ApiError {
    /// 传输层失败（网络不可达、请求构建失败等）
    Network(String),
    /// 服务端返回了非 2xx（消息已尽量取自响应体）
    Api { status: u16, message: String },
    /// 响应解码失败（两种信封形态都不匹配）
    Decode(String),
    /// 401：会话已失效，全局登出已被触发
    SessionExpired,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "网络错误: {}", msg),
            ApiError::Api { status, message } => write!(f, "[{}] {}", status, message),
            ApiError::Decode(msg) => write!(f, "响应解码失败: {}", msg),
            ApiError::SessionExpired => write!(f, "会话已失效，请重新登录"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        ApiError::Network(e.to_string())
    }
}

impl ApiError {
    /// 展示给用户的消息：服务端消息优先，其余场景用兜底文案
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message, .. } => message.clone(),
            ApiError::SessionExpired => self.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

// =========================================================
// 客户端
// =========================================================

type UnauthorizedHook = Rc<dyn Fn()>;

/// 泛型 API 客户端
///
/// 传输层与存储层都是注入的 trait 实现：
/// 生产环境为 fetch + LocalStorage，测试为 mock + 内存存储。
pub struct ApiClient<C: HttpClient, S: KeyValueStore> {
    base_url: String,
    transport: C,
    storage: Rc<S>,
    /// 401 时触发的强制登出回调，应用引导阶段注入
    unauthorized_hook: RefCell<Option<UnauthorizedHook>>,
}

impl<C: HttpClient, S: KeyValueStore> ApiClient<C, S> {
    pub fn new(base_url: impl Into<String>, transport: C, storage: Rc<S>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            storage,
            unauthorized_hook: RefCell::new(None),
        }
    }

    /// 注入 401 回调（引导时由会话层接线）
    pub fn set_unauthorized_hook(&self, hook: impl Fn() + 'static) {
        *self.unauthorized_hook.borrow_mut() = Some(Rc::new(hook));
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送任意协议端点请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> Result<R::Response, ApiError> {
        let url = self.url(R::PATH);
        let mut http_req = HttpRequest::new(&url, R::METHOD);

        // token 每次实时读取，登出后立即失效
        if let Some(token) = self.storage.get(STORAGE_TOKEN_KEY) {
            let value = format!("{}{}", BEARER_PREFIX, token);
            http_req = http_req.with_header(HEADER_AUTHORIZATION, &value);
        }

        if R::METHOD != HttpMethod::Get {
            let body =
                serde_json::to_string(req).map_err(|e| ApiError::Decode(e.to_string()))?;
            http_req = http_req
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        let res = self.transport.send(http_req).await?;

        if res.status == 401 {
            // 先释放 borrow 再调用：回调里可能再次进入客户端
            let hook = self.unauthorized_hook.borrow().clone();
            if let Some(hook) = hook {
                hook();
            }
            return Err(ApiError::SessionExpired);
        }

        if !res.ok() {
            let message =
                extract_error_message(&res.body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
            return Err(ApiError::Api {
                status: res.status,
                message,
            });
        }

        decode_envelope(&res.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// =========================================================
// 单元测试 (mock 传输层，无浏览器环境)
// =========================================================
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::web::http::HttpResponse;
    use crate::web::storage::MemoryStore;
    use dormdesk_shared::LoginRequest;
    use dormdesk_shared::protocol::{ListPaymentsRequest, ProfileRequest};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// 发送记录（HttpRequest 自身不做 Clone，拆字段记录）
    pub struct SentRequest {
        pub url: String,
        pub method: HttpMethod,
        pub headers: std::collections::HashMap<String, String>,
        pub body: Option<String>,
    }

    /// 队列式 mock 客户端：按顺序吐出预置响应，并记录每次请求
    pub struct MockHttpClient {
        responses: RefCell<VecDeque<(u16, String)>>,
        pub log: RefCell<Vec<SentRequest>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self {
                responses: RefCell::new(VecDeque::new()),
                log: RefCell::new(Vec::new()),
            }
        }

        pub fn push_response(&self, status: u16, body: &str) {
            self.responses
                .borrow_mut()
                .push_back((status, body.to_string()));
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.log.borrow_mut().push(SentRequest {
                url: req.url.clone(),
                method: req.method,
                headers: req.headers.clone(),
                body: req.body.clone(),
            });
            let (status, body) = self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or((500, String::new()));
            Ok(HttpResponse { status, body })
        }
    }

    fn client(storage: Rc<MemoryStore>) -> ApiClient<Rc<MockHttpClient>, MemoryStore> {
        ApiClient::new("http://dorm.test/api/", Rc::new(MockHttpClient::new()), storage)
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for Rc<MockHttpClient> {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            (**self).send(req).await
        }
    }

    const PROFILE_BODY: &str =
        r#"{"id":1,"name":"Admin","email":"a@t.com","role":{"name":"admin"}}"#;

    #[tokio::test]
    async fn bearer_token_is_read_fresh_per_request() {
        let storage = Rc::new(MemoryStore::new());
        let transport = Rc::new(MockHttpClient::new());
        let api = ApiClient::new("http://dorm.test/api", transport.clone(), storage.clone());

        storage.seed(STORAGE_TOKEN_KEY, "abc");
        transport.push_response(200, PROFILE_BODY);
        api.send(&ProfileRequest).await.unwrap();

        // 并发登出：存储里的 token 没了，下一个请求必须不带认证头
        storage.remove(STORAGE_TOKEN_KEY);
        transport.push_response(200, PROFILE_BODY);
        api.send(&ProfileRequest).await.unwrap();

        let log = transport.log.borrow();
        assert_eq!(
            log[0].headers.get(HEADER_AUTHORIZATION).map(String::as_str),
            Some("Bearer abc")
        );
        assert!(!log[1].headers.contains_key(HEADER_AUTHORIZATION));
        assert_eq!(log[0].url, "http://dorm.test/api/users/profile");
    }

    #[tokio::test]
    async fn unauthorized_fires_global_hook() {
        let storage = Rc::new(MemoryStore::new());
        let transport = Rc::new(MockHttpClient::new());
        let api = ApiClient::new("http://dorm.test/api", transport.clone(), storage.clone());

        let fired = Rc::new(Cell::new(0u32));
        let fired_in_hook = fired.clone();
        api.set_unauthorized_hook(move || fired_in_hook.set(fired_in_hook.get() + 1));

        // 一个与认证毫不相关的资源请求返回 401
        storage.seed(STORAGE_TOKEN_KEY, "stale");
        transport.push_response(401, r#"{"message":"Unauthenticated."}"#);
        let err = api.send(&ListPaymentsRequest).await.unwrap_err();

        assert!(matches!(err, ApiError::SessionExpired));
        assert_eq!(fired.get(), 1);
    }

    #[tokio::test]
    async fn server_message_is_surfaced_with_fallback() {
        let storage = Rc::new(MemoryStore::new());
        let transport = Rc::new(MockHttpClient::new());
        let api = ApiClient::new("http://dorm.test/api", transport.clone(), storage);

        transport.push_response(422, r#"{"message":"邮箱格式不正确"}"#);
        let req = LoginRequest {
            email: "bad".to_string(),
            password: "x".to_string(),
        };
        match api.send(&req).await.unwrap_err() {
            ApiError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "邮箱格式不正确");
            }
            other => panic!("unexpected: {}", other),
        }

        // 响应体不含可读消息时使用兜底文案
        transport.push_response(500, "oops not json");
        match api.send(&req).await.unwrap_err() {
            ApiError::Api { message, .. } => assert_eq!(message, GENERIC_FAILURE),
            other => panic!("unexpected: {}", other),
        }
    }

    #[tokio::test]
    async fn post_serializes_body_and_get_does_not() {
        let storage = Rc::new(MemoryStore::new());
        let transport = Rc::new(MockHttpClient::new());
        let api = ApiClient::new("http://dorm.test/api", transport.clone(), storage);

        transport.push_response(
            200,
            r#"{"data":{"token":"t","user":{"id":1,"name":"U","email":"u@t.com","role":{"name":"student"}}}}"#,
        );
        let req = LoginRequest {
            email: "u@t.com".to_string(),
            password: "secret".to_string(),
        };
        let res = api.send(&req).await.unwrap();
        assert_eq!(res.token, "t");

        transport.push_response(200, "[]");
        api.send(&ListPaymentsRequest).await.unwrap();

        let log = transport.log.borrow();
        assert_eq!(log[0].method, HttpMethod::Post);
        assert!(log[0].body.as_deref().unwrap().contains("u@t.com"));
        assert_eq!(
            log[0].headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(log[1].method, HttpMethod::Get);
        assert!(log[1].body.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let storage = Rc::new(MemoryStore::new());
        let api = client(storage);
        assert_eq!(api.url("/rooms"), "http://dorm.test/api/rooms");
        assert_eq!(api.url("rooms"), "http://dorm.test/api/rooms");
    }
}
