//! DormDesk 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫（领域模型，纯函数）
//! - `web::router`: 路由服务（核心引擎，History API）
//! - `session`: 会话状态管理（平台无关引擎 + 信号层）
//! - `stores`: 资源缓存（列表 + 选中记录的持久化镜像）
//! - `api`: 出站请求适配器（认证头、401 拦截、信封解码）
//! - `components`: UI 组件层
//!
//! 逻辑层在原生目标上编译并测试；只有 DOM/History/fetch
//! 相关的薄层限定在 wasm32。

pub mod api;
pub mod config;
pub(crate) mod logging;
pub mod session;
pub mod stores;

#[cfg(target_arch = "wasm32")]
mod components {
    mod icons;
    mod layout;

    pub mod dashboard;
    pub mod guests;
    pub mod login;
    pub mod messages;
    pub mod payments;
    pub mod profile;
    pub mod register;
    pub mod room_types;
    pub mod rooms;
    pub mod settings;
    pub mod students;
}

// 原生 Web API 封装模块
// 对浏览器原生 API 的轻量级封装，平台无关的部分（trait、路由表）
// 在所有目标上编译。
pub(crate) mod web {
    pub mod http;
    pub mod route;
    #[cfg(target_arch = "wasm32")]
    pub mod router;
    pub mod storage;
}

#[cfg(target_arch = "wasm32")]
pub use app::App;

#[cfg(target_arch = "wasm32")]
mod app {
    use crate::api::ApiClient;
    use crate::components::dashboard::DashboardPage;
    use crate::components::guests::GuestsPage;
    use crate::components::login::LoginPage;
    use crate::components::messages::MessagesPage;
    use crate::components::payments::PaymentsPage;
    use crate::components::profile::ProfilePage;
    use crate::components::register::RegisterPage;
    use crate::components::room_types::RoomTypesPage;
    use crate::components::rooms::RoomsPage;
    use crate::components::settings::SettingsPage;
    use crate::components::students::StudentsPage;
    use crate::config::RuntimeConfig;
    use crate::session::{self, AppApi, AppSessionEngine, SessionContext, SessionEngine};
    use crate::stores::Stores;
    use crate::web::http::FetchHttpClient;
    use crate::web::route::AppRoute;
    use crate::web::router::{Router, RouterOutlet};
    use crate::web::storage::LocalStorage;
    use leptos::prelude::*;
    use leptos::task::spawn_local;
    use std::rc::Rc;

    /// 路由匹配函数
    ///
    /// 根据 AppRoute 枚举返回对应的视图组件。
    fn route_matcher(route: AppRoute) -> AnyView {
        match route {
            AppRoute::Login => view! { <LoginPage /> }.into_any(),
            AppRoute::Register => view! { <RegisterPage /> }.into_any(),
            AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
            AppRoute::Students => view! { <StudentsPage /> }.into_any(),
            AppRoute::Guests => view! { <GuestsPage /> }.into_any(),
            AppRoute::Rooms => view! { <RoomsPage /> }.into_any(),
            AppRoute::RoomTypes => view! { <RoomTypesPage /> }.into_any(),
            AppRoute::Payments => view! { <PaymentsPage /> }.into_any(),
            AppRoute::Messages => view! { <MessagesPage /> }.into_any(),
            AppRoute::Settings => view! { <SettingsPage /> }.into_any(),
            AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
            AppRoute::NotFound => view! {
                <div class="flex items-center justify-center min-h-screen bg-base-200">
                    <div class="text-center">
                        <h1 class="text-6xl font-bold text-error">"404"</h1>
                        <p class="text-xl mt-4">"页面未找到"</p>
                    </div>
                </div>
            }
            .into_any(),
        }
    }

    #[component]
    pub fn App() -> impl IntoView {
        // 1. 装配服务：显式创建上下文对象，不用模块级单例
        let config = RuntimeConfig::from_build_env();
        let storage = Rc::new(LocalStorage);
        let api: Rc<AppApi> = Rc::new(ApiClient::new(
            config.api_base_url.clone(),
            FetchHttpClient,
            storage.clone(),
        ));
        let engine: Rc<AppSessionEngine> = Rc::new(SessionEngine::new(api.clone(), storage.clone()));

        let session_ctx = SessionContext::new();
        let stores = Stores::new(storage);

        provide_context(session_ctx);
        provide_context(api.clone());
        provide_context(engine.clone());
        provide_context(stores);

        // 界面默认语言写到文档根元素
        if let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            let _ = root.set_attribute("lang", &config.default_locale);
        }

        // 2. 全局 401 拦截：任何请求撞上 401 都等价于 logout()
        {
            let engine = engine.clone();
            api.set_unauthorized_hook(move || {
                session::logout(session_ctx, &engine);
            });
        }

        // 3. 会话引导：恢复持久化 token 并拉取资料；
        //    完成之前路由出口不挂载，守卫求值时资料必然就绪
        {
            let engine = engine.clone();
            spawn_local(async move {
                session::initialize(session_ctx, &engine).await;
            });
        }

        let loading = session_ctx.loading_signal();
        let is_authenticated = session_ctx.is_authenticated_signal();
        let role = session_ctx.role_signal();

        view! {
            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex items-center justify-center min-h-screen">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <Router is_authenticated=is_authenticated role=role>
                    <RouterOutlet matcher=route_matcher />
                </Router>
            </Show>
        }
    }
}
