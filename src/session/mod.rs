//! 会话模块
//!
//! 管理用户认证状态，与路由系统解耦：
//! 路由服务只消费注入的认证/角色信号，不反向依赖本模块。
//! 核心逻辑在 [`engine`] 中，平台无关、可单元测试；
//! 本文件是 leptos 信号层的薄封装。

pub mod engine;

pub use engine::{SessionApi, SessionEngine};

use dormdesk_shared::User;
use leptos::prelude::*;

/// 会话状态
///
/// 不变量：`user` 存在 ⇒ `token` 存在。
/// 反向在引导恢复的短暂窗口内不严格成立
/// （token 已装入、个人资料还在路上）。
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    /// 引导窗口标志：初始为 true，`initialize` 完成后恒为 false
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            loading: true,
            error: None,
        }
    }
}

impl SessionState {
    /// 认证判定 = token 是否在场
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// 当前角色名（路由守卫的唯一输入）
    pub fn user_role(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.role_name())
    }

    /// 完整姓名（first+last，缺失时回退组合显示名）
    pub fn full_name(&self) -> Option<String> {
        self.user.as_ref().map(|u| u.full_name())
    }
}

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub state: ReadSignal<SessionState>,
    pub set_state: WriteSignal<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(SessionState::default());
        Self { state, set_state }
    }

    /// 认证状态信号（注入路由服务）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated())
    }

    /// 角色名信号（注入路由守卫）
    pub fn role_signal(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.get().user_role().map(String::from))
    }

    /// 引导加载信号（App 在其为 true 时不渲染路由出口）
    pub fn loading_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().loading)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

// =========================================================
// wasm 动作封装：信号 <-> 引擎
// =========================================================

#[cfg(target_arch = "wasm32")]
pub use actions::*;

#[cfg(target_arch = "wasm32")]
mod actions {
    use super::{SessionContext, SessionEngine};
    use crate::api::{ApiClient, ApiError};
    use crate::web::http::FetchHttpClient;
    use crate::web::storage::LocalStorage;
    use dormdesk_shared::{LoginRequest, RegisterRequest};
    use std::rc::Rc;

    /// 生产环境的 API 客户端类型
    pub type AppApi = ApiClient<FetchHttpClient, LocalStorage>;
    /// 生产环境的会话引擎类型
    pub type AppSessionEngine = SessionEngine<AppApi, LocalStorage>;

    /// 从 Context 获取会话引擎
    pub fn use_session_engine() -> Rc<AppSessionEngine> {
        leptos::prelude::use_context::<Rc<AppSessionEngine>>()
            .expect("SessionEngine should be provided")
    }

    /// 从 Context 获取 API 客户端
    pub fn use_api() -> Rc<AppApi> {
        leptos::prelude::use_context::<Rc<AppApi>>().expect("ApiClient should be provided")
    }

    /// 登录并更新信号状态
    ///
    /// 提交中的按钮状态由表单自己的局部信号管理，
    /// `loading` 只属于引导窗口。
    pub async fn login(
        ctx: SessionContext,
        engine: &AppSessionEngine,
        creds: LoginRequest,
    ) -> Result<(), ApiError> {
        let mut state = ctx.state.get_untracked();
        let result = engine.login(&mut state, creds).await;
        ctx.set_state.set(state);
        result
    }

    /// 注册并更新信号状态
    pub async fn register(
        ctx: SessionContext,
        engine: &AppSessionEngine,
        payload: RegisterRequest,
    ) -> Result<(), ApiError> {
        let mut state = ctx.state.get_untracked();
        let result = engine.register(&mut state, payload).await;
        ctx.set_state.set(state);
        result
    }

    /// 登出（同步，幂等）
    ///
    /// 导航不在这里发生：路由服务监听认证信号并自动重定向。
    pub fn logout(ctx: SessionContext, engine: &AppSessionEngine) {
        let mut state = ctx.state.get_untracked();
        engine.logout(&mut state);
        ctx.set_state.set(state);
    }

    /// 应用引导：恢复持久化会话，完成前路由出口不渲染
    pub async fn initialize(ctx: SessionContext, engine: &AppSessionEngine) {
        let mut state = ctx.state.get_untracked();
        engine.initialize(&mut state).await;
        ctx.set_state.set(state);
    }

    /// 显式刷新个人资料
    pub async fn load_profile(
        ctx: SessionContext,
        engine: &AppSessionEngine,
    ) -> Result<(), ApiError> {
        let mut state = ctx.state.get_untracked();
        let result = engine.load_profile(&mut state).await;
        ctx.set_state.set(state);
        result
    }

    /// 后台会话探测
    pub async fn check_auth(ctx: SessionContext, engine: &AppSessionEngine) {
        let mut state = ctx.state.get_untracked();
        engine.check_auth(&mut state).await;
        ctx.set_state.set(state);
    }

    /// 触发重置密码邮件
    pub async fn reset_password(ctx: SessionContext, engine: &AppSessionEngine, email: &str) {
        let mut state = ctx.state.get_untracked();
        engine.reset_password(&mut state, email).await;
        ctx.set_state.set(state);
    }
}
