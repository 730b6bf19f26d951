use super::*;
use crate::api::tests::MockHttpClient;
use crate::web::storage::MemoryStore;
use dormdesk_shared::protocol::ListPaymentsRequest;
use dormdesk_shared::RoleInfo;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// =========================================================
// Shared Mock Components
// =========================================================

struct TestContext {
    /// Operation log to verify calling order
    log: RefCell<Vec<String>>,
    fail_login: Cell<bool>,
    fail_profile: Cell<bool>,
    fail_reset: Cell<bool>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            log: RefCell::new(Vec::new()),
            fail_login: Cell::new(false),
            fail_profile: Cell::new(false),
            fail_reset: Cell::new(false),
        }
    }

    fn push_log(&self, msg: String) {
        self.log.borrow_mut().push(msg);
    }
}

fn admin_user() -> User {
    User {
        id: 1,
        name: "Admin".to_string(),
        first_name: None,
        last_name: None,
        email: "admin@test.com".to_string(),
        role: RoleInfo::new("admin"),
    }
}

struct MockSessionApi {
    ctx: Rc<TestContext>,
}

#[async_trait::async_trait(?Send)]
impl SessionApi for MockSessionApi {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.ctx.push_log(format!("api:login:{}", req.email));
        if self.ctx.fail_login.get() {
            return Err(ApiError::Api {
                status: 401,
                message: "邮箱或密码错误".to_string(),
            });
        }
        Ok(LoginResponse {
            token: "abc".to_string(),
            user: admin_user(),
        })
    }

    async fn register(&self, req: &RegisterRequest) -> Result<LoginResponse, ApiError> {
        self.ctx.push_log(format!("api:register:{}", req.email));
        if self.ctx.fail_login.get() {
            return Err(ApiError::Api {
                status: 422,
                message: "邮箱已被占用".to_string(),
            });
        }
        Ok(LoginResponse {
            token: "fresh".to_string(),
            user: admin_user(),
        })
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.ctx.push_log("api:profile".to_string());
        if self.ctx.fail_profile.get() {
            return Err(ApiError::SessionExpired);
        }
        Ok(admin_user())
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.ctx.push_log(format!("api:reset:{}", req.email));
        if self.ctx.fail_reset.get() {
            return Err(ApiError::Network("连接超时".to_string()));
        }
        Ok(())
    }
}

// Helper to create engine instance
fn setup_env() -> (
    Rc<TestContext>,
    Rc<MemoryStore>,
    SessionEngine<MockSessionApi, MemoryStore>,
) {
    let ctx = Rc::new(TestContext::new());
    let storage = Rc::new(MemoryStore::new());
    let api = MockSessionApi { ctx: ctx.clone() };
    let engine = SessionEngine::new(Rc::new(api), storage.clone());
    (ctx, storage, engine)
}

fn valid_creds() -> LoginRequest {
    LoginRequest {
        email: "admin@test.com".to_string(),
        password: "secret".to_string(),
    }
}

// =========================================================
// 登录 / 注册
// =========================================================

#[tokio::test]
async fn login_success_sets_session_and_persists_token() {
    let (_ctx, storage, engine) = setup_env();
    let mut state = SessionState::default();

    engine.login(&mut state, valid_creds()).await.unwrap();

    assert!(state.is_authenticated());
    assert_eq!(state.user_role(), Some("admin"));
    assert_eq!(state.token.as_deref(), Some("abc"));
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("abc"));
}

#[tokio::test]
async fn login_failure_records_error_and_rethrows() {
    let (ctx, storage, engine) = setup_env();
    ctx.fail_login.set(true);
    let mut state = SessionState::default();

    let result = engine.login(&mut state, valid_creds()).await;

    assert!(result.is_err());
    assert_eq!(state.error.as_deref(), Some("邮箱或密码错误"));
    assert!(!state.is_authenticated());
    // 失败不得触碰持久化状态
    assert!(!storage.contains(STORAGE_TOKEN_KEY));
}

#[tokio::test]
async fn register_success_holds_session() {
    let (_ctx, storage, engine) = setup_env();
    let mut state = SessionState::default();

    let payload = RegisterRequest {
        name: "新同学".to_string(),
        email: "new@test.com".to_string(),
        password: "secret".to_string(),
        first_name: None,
        last_name: None,
    };
    engine.register(&mut state, payload).await.unwrap();

    assert!(state.is_authenticated());
    assert_eq!(storage.get(STORAGE_TOKEN_KEY).as_deref(), Some("fresh"));
}

// =========================================================
// 登出
// =========================================================

#[tokio::test]
async fn logout_is_idempotent() {
    let (_ctx, storage, engine) = setup_env();
    let mut state = SessionState::default();
    engine.login(&mut state, valid_creds()).await.unwrap();

    engine.logout(&mut state);
    let after_first = state.clone();
    engine.logout(&mut state);

    assert_eq!(state, after_first);
    assert_eq!(state.user, None);
    assert_eq!(state.token, None);
    assert!(!storage.contains(STORAGE_TOKEN_KEY));
}

// =========================================================
// 引导恢复
// =========================================================

#[tokio::test]
async fn initialize_restores_persisted_session() {
    let (_ctx, storage, engine) = setup_env();
    storage.seed(STORAGE_TOKEN_KEY, "persisted");
    let mut state = SessionState::default();
    assert!(state.loading);

    engine.initialize(&mut state).await;

    assert!(!state.loading);
    assert_eq!(state.token.as_deref(), Some("persisted"));
    assert_eq!(state.user_role(), Some("admin"));
}

#[tokio::test]
async fn initialize_with_invalid_token_degrades_to_logout() {
    let (ctx, storage, engine) = setup_env();
    storage.seed(STORAGE_TOKEN_KEY, "expired");
    ctx.fail_profile.set(true);
    let mut state = SessionState::default();

    engine.initialize(&mut state).await;

    assert!(!state.loading);
    assert_eq!(state.token, None);
    assert_eq!(state.user, None);
    assert!(!storage.contains(STORAGE_TOKEN_KEY));
}

#[tokio::test]
async fn initialize_without_token_skips_profile_fetch() {
    let (ctx, _storage, engine) = setup_env();
    let mut state = SessionState::default();

    engine.initialize(&mut state).await;

    assert!(!state.loading);
    assert!(!state.is_authenticated());
    assert!(ctx.log.borrow().is_empty());
}

// =========================================================
// 资料刷新与后台探测
// =========================================================

#[tokio::test]
async fn load_profile_surfaces_error_without_logout() {
    let (ctx, storage, engine) = setup_env();
    let mut state = SessionState::default();
    engine.login(&mut state, valid_creds()).await.unwrap();

    ctx.fail_profile.set(true);
    let result = engine.load_profile(&mut state).await;

    assert!(result.is_err());
    assert!(state.error.is_some());
    // 显式刷新失败不降级登出
    assert!(state.is_authenticated());
    assert!(storage.contains(STORAGE_TOKEN_KEY));
}

#[tokio::test]
async fn check_auth_degrades_to_logout() {
    let (ctx, storage, engine) = setup_env();
    let mut state = SessionState::default();
    engine.login(&mut state, valid_creds()).await.unwrap();

    ctx.fail_profile.set(true);
    engine.check_auth(&mut state).await;

    assert!(!state.is_authenticated());
    assert_eq!(state.user, None);
    assert!(!storage.contains(STORAGE_TOKEN_KEY));
}

#[tokio::test]
async fn reset_password_failure_is_store_error_only() {
    let (ctx, _storage, engine) = setup_env();
    let mut state = SessionState::default();
    engine.login(&mut state, valid_creds()).await.unwrap();

    ctx.fail_reset.set(true);
    engine.reset_password(&mut state, "admin@test.com").await;

    assert!(state.error.is_some());
    // 会话不受影响
    assert!(state.is_authenticated());
}

// =========================================================
// 全局 401 拦截（经由真实 ApiClient）
// =========================================================

#[tokio::test]
async fn unrelated_401_forces_logout_via_hook() {
    let storage = Rc::new(MemoryStore::new());
    let transport = Rc::new(MockHttpClient::new());
    let api = Rc::new(ApiClient::new(
        "http://dorm.test/api",
        transport.clone(),
        storage.clone(),
    ));
    let engine = Rc::new(SessionEngine::new(api.clone(), storage.clone()));
    let state = Rc::new(RefCell::new(SessionState::default()));

    // 正常登录
    transport.push_response(
        200,
        r#"{"token":"abc","user":{"id":1,"name":"Admin","email":"admin@test.com","role":{"name":"admin"}}}"#,
    );
    {
        let mut s = state.borrow_mut();
        engine.login(&mut s, valid_creds()).await.unwrap();
        assert!(s.is_authenticated());
    }

    // 接线：401 等价于调用 logout()
    {
        let state = state.clone();
        let engine = engine.clone();
        api.set_unauthorized_hook(move || {
            let mut s = state.borrow_mut();
            engine.logout(&mut s);
        });
    }

    // 与认证无关的资源请求返回 401
    transport.push_response(401, r#"{"message":"Unauthenticated."}"#);
    let err = api.send(&ListPaymentsRequest).await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert!(!state.borrow().is_authenticated());
    assert!(!storage.contains(STORAGE_TOKEN_KEY));
}
