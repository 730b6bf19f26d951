//! 会话核心逻辑
//!
//! 特点：
//! 1. 纯 Rust 实现，不依赖 leptos 信号与 DOM。
//! 2. 高内聚：token 的内存副本与持久化副本只在这里写入。
//! 3. 易测试：注入 mock 的 `SessionApi` / `KeyValueStore` 即可单元测试。
//!
//! 并发说明：宿主是单线程事件循环，动作之间不加锁；
//! 同一动作的重复并发调用（例如双击登录）不做序列化，
//! 后完成的响应覆盖先完成的。

use crate::api::{ApiClient, ApiError, STORAGE_TOKEN_KEY};
use crate::web::http::HttpClient;
use crate::web::storage::KeyValueStore;
use dormdesk_shared::protocol::ProfileRequest;
use dormdesk_shared::{LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, User};
use std::rc::Rc;

use super::SessionState;

/// 会话相关的后端端点
///
/// `ApiClient` 是生产实现；测试注入 mock。
#[async_trait::async_trait(?Send)]
pub trait SessionApi {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn register(&self, req: &RegisterRequest) -> Result<LoginResponse, ApiError>;
    async fn profile(&self) -> Result<User, ApiError>;
    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<(), ApiError>;
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient, S: KeyValueStore> SessionApi for ApiClient<C, S> {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send(req).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<LoginResponse, ApiError> {
        self.send(req).await
    }

    async fn profile(&self) -> Result<User, ApiError> {
        self.send(&ProfileRequest).await
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<(), ApiError> {
        self.send(req).await.map(|_| ())
    }
}

/// 会话引擎
///
/// "谁登录了"的唯一事实来源，也是唯一允许改写 token 的组件。
pub struct SessionEngine<A: SessionApi, S: KeyValueStore> {
    api: Rc<A>,
    storage: Rc<S>,
}

impl<A: SessionApi, S: KeyValueStore> SessionEngine<A, S> {
    pub fn new(api: Rc<A>, storage: Rc<S>) -> Self {
        Self { api, storage }
    }

    /// 登录
    ///
    /// 成功：写入内存 token + user，持久化 token。
    /// 失败：记录服务端消息（或兜底文案）并**重新抛出**，
    /// 表单需要同步反应；持久化状态不动。
    pub async fn login(
        &self,
        state: &mut SessionState,
        creds: LoginRequest,
    ) -> Result<(), ApiError> {
        state.error = None;
        match self.api.login(&creds).await {
            Ok(res) => {
                self.apply_login(state, res);
                Ok(())
            }
            Err(err) => {
                state.loading = false;
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// 注册（与登录同一契约：成功即持有会话）
    pub async fn register(
        &self,
        state: &mut SessionState,
        payload: RegisterRequest,
    ) -> Result<(), ApiError> {
        state.error = None;
        match self.api.register(&payload).await {
            Ok(res) => {
                self.apply_login(state, res);
                Ok(())
            }
            Err(err) => {
                state.loading = false;
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    fn apply_login(&self, state: &mut SessionState, res: LoginResponse) {
        self.storage.set(STORAGE_TOKEN_KEY, &res.token);
        state.token = Some(res.token);
        state.user = Some(res.user);
        state.loading = false;
    }

    /// 登出：清内存、删持久化 token。幂等，已登出时调用安全。
    pub fn logout(&self, state: &mut SessionState) {
        state.user = None;
        state.token = None;
        state.error = None;
        self.storage.remove(STORAGE_TOKEN_KEY);
    }

    /// 应用启动时恢复会话
    ///
    /// 读取持久化 token：没有则直接结束加载；有则装入内存并拉取
    /// 个人资料，拉取失败视为 token 失效，降级为登出。
    /// 本方法永不向上抛错——引导阶段的异常会卡死整个 UI。
    pub async fn initialize(&self, state: &mut SessionState) {
        if let Some(token) = self.storage.get(STORAGE_TOKEN_KEY) {
            state.token = Some(token);
            match self.api.profile().await {
                Ok(user) => state.user = Some(user),
                Err(_) => self.logout(state),
            }
        }
        state.loading = false;
    }

    /// 显式刷新个人资料：失败只记录错误，不强制登出
    pub async fn load_profile(&self, state: &mut SessionState) -> Result<(), ApiError> {
        match self.api.profile().await {
            Ok(user) => {
                state.user = Some(user);
                state.error = None;
                Ok(())
            }
            Err(err) => {
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// 后台会话探测：失败降级为登出，永不抛错
    pub async fn check_auth(&self, state: &mut SessionState) {
        match self.api.profile().await {
            Ok(user) => state.user = Some(user),
            Err(_) => self.logout(state),
        }
    }

    /// 触发服务端发送重置密码邮件（fire-and-forget）
    ///
    /// 失败只表现为 store 错误。
    pub async fn reset_password(&self, state: &mut SessionState, email: &str) {
        let req = ResetPasswordRequest {
            email: email.to_string(),
        };
        match self.api.reset_password(&req).await {
            Ok(()) => state.error = None,
            Err(err) => state.error = Some(err.user_message()),
        }
    }
}

#[cfg(test)]
mod tests;
