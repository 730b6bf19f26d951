//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"请求 -> 守卫 -> 处理 -> 加载"的导航流程。
//!
//! 守卫本身是纯函数（见 `route::decide`），这里只负责：
//! 注入会话信号、执行重定向副作用、维护 History 与文档标题。
//! 会话引导（`session::initialize`）必须在本服务挂载前完成，
//! 守卫求值时资料已经就绪，不做任何异步工作。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, NavDecision, decide};
use crate::logging::log_info;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 设置文档标题——每次路由落定都执行，无论放行还是重定向
fn apply_document_title(route: AppRoute) {
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        doc.set_title(&format!("{} - DormDesk", route.meta().title));
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证与角色信号由外部注入，与会话模块解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态（注入的信号）
    is_authenticated: Signal<bool>,
    /// 当前角色名（注入的信号，守卫的唯一输入）
    role: Signal<Option<String>>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>, role: Signal<Option<String>>) -> Self {
        // 初始路由从 URL 解析；守卫由挂载时的 Effect 立即补上
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
            role,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 路由落定：写 History、设标题、更新信号
    fn enter(&self, route: AppRoute, use_push: bool) {
        if use_push {
            push_history_state(route.to_path());
        } else {
            replace_history_state(route.to_path());
        }
        apply_document_title(route);
        self.set_route.set(route);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let is_auth = self.is_authenticated.get_untracked();
        let role = self.role.get_untracked();

        // 已认证用户访问登录/注册页：直接送往着陆页
        if target.should_redirect_when_authenticated() && is_auth {
            log_info!("[Router] Already authenticated. Redirecting to Dashboard.");
            self.enter(AppRoute::landing(), use_push);
            return;
        }

        match decide(&target.meta(), role.as_deref()) {
            NavDecision::Allow => self.enter(target, use_push),
            NavDecision::RedirectLogin => {
                log_info!("[Router] Access denied (unauthenticated). Redirecting to Login.");
                self.enter(AppRoute::auth_failure_redirect(), use_push);
            }
            NavDecision::RedirectLanding => {
                log_info!("[Router] Access denied (role). Redirecting to Dashboard.");
                self.enter(AppRoute::landing(), use_push);
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let this = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑；重定向用 replace，避免污染历史栈
            let target = AppRoute::from_path(&current_path());
            this.navigate_to_route(target, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证/角色状态变化时对当前路由重新过守卫
    ///
    /// Effect 首次执行即覆盖"深链接直达"的初始守卫，
    /// 之后登录、登出、401 强制登出都会触发重定向。
    fn setup_auth_redirect(&self) {
        let this = *self;

        Effect::new(move |_| {
            let is_auth = this.is_authenticated.get();
            let role = this.role.get();
            let route = this.current_route.get_untracked();

            if route.should_redirect_when_authenticated() && is_auth {
                log_info!("[Router] Auth state changed: logged in, redirecting to dashboard.");
                this.enter(AppRoute::landing(), true);
                return;
            }

            match decide(&route.meta(), role.as_deref()) {
                // 放行也要落标题：首次挂载（深链接直达）走的就是这条路径
                NavDecision::Allow => apply_document_title(route),
                NavDecision::RedirectLogin => {
                    log_info!("[Router] Auth state changed: logged out, redirecting to login.");
                    this.enter(AppRoute::auth_failure_redirect(), false);
                }
                NavDecision::RedirectLanding => {
                    log_info!("[Router] Role not permitted here, redirecting to dashboard.");
                    this.enter(AppRoute::landing(), false);
                }
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>, role: Signal<Option<String>>) -> RouterService {
    let router = RouterService::new(is_authenticated, role);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在会话引导完成后挂载。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 当前角色名信号
    role: Signal<Option<String>>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated, role);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
