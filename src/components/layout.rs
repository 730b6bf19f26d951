//! 应用外壳：顶栏 + 按角色过滤的侧边栏
//!
//! 侧边栏直接从路由表构建：`meta.sidebar` 为真且守卫放行的
//! 路由才出现，带 `parent` 的条目缩进挂在父级下面。
//! 权限过滤只是显示层的便利——真正的拦截在路由守卫。

use crate::components::icons::{Building, LogOut};
use crate::session::{check_auth, logout, use_session, use_session_engine};
use crate::web::route::{AppRoute, NavDecision, decide};
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 当前角色可见的侧边栏条目（父级在前，子级紧随其后）
fn sidebar_entries(role: Option<&str>) -> Vec<AppRoute> {
    let visible: Vec<AppRoute> = AppRoute::ALL
        .into_iter()
        .filter(|r| {
            let meta = r.meta();
            meta.sidebar && decide(&meta, role) == NavDecision::Allow
        })
        .collect();

    // 顶级条目按表序排列，子级插到父级后面
    let mut ordered = Vec::with_capacity(visible.len());
    for route in visible.iter().filter(|r| r.meta().parent.is_none()) {
        ordered.push(*route);
        for child in visible.iter().filter(|r| r.meta().parent == Some(*route)) {
            ordered.push(*child);
        }
    }
    ordered
}

#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let session = use_session();
    let engine = use_session_engine();
    let router = use_router();

    // 受保护页面挂载时做一次后台会话探测：
    // token 已在服务端失效的话，这里会降级登出并被路由送回登录页
    {
        let engine = engine.clone();
        spawn_local(async move {
            check_auth(session, &engine).await;
        });
    }

    let entries = move || {
        let state = session.state.get();
        sidebar_entries(state.user_role())
    };

    let full_name = move || {
        session
            .state
            .get()
            .full_name()
            .unwrap_or_else(|| "未登录".to_string())
    };

    let on_logout = move |_| {
        // 导航由路由服务监听认证信号自动完成
        logout(session, &engine);
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow">
                <div class="flex-1 gap-2">
                    <Building attr:class="h-6 w-6 text-primary" />
                    <span class="text-xl font-bold">"DormDesk 宿舍管理"</span>
                </div>
                <div class="flex-none gap-2">
                    <span class="text-sm text-base-content/70 hidden md:inline">
                        {full_name}
                    </span>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "退出登录"
                    </button>
                </div>
            </div>

            <div class="flex">
                <aside class="w-56 min-h-screen bg-base-100 shadow-inner hidden md:block">
                    <ul class="menu p-4 gap-1">
                        <For
                            each=entries
                            key=|route| route.to_path()
                            children=move |route| {
                                let meta = route.meta();
                                let indent = meta.parent.is_some();
                                let is_active = move || router.current_route().get() == route;
                                view! {
                                    <li class=move || if indent { "ml-4" } else { "" }>
                                        <a
                                            class=move || if is_active() { "active" } else { "" }
                                            on:click=move |_| router.navigate(route.to_path())
                                        >
                                            {meta.title}
                                        </a>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </aside>

                <main class="flex-1 p-4 md:p-8">{children()}</main>
            </div>
        </div>
    }
}

/// 页面内的轻提示（3 秒后自动消失）
#[component]
pub fn Toast(notice: ReadSignal<Option<(String, bool)>>, set_notice: WriteSignal<Option<(String, bool)>>) -> impl IntoView {
    Effect::new(move |_| {
        if notice.get().is_some() {
            set_timeout(
                move || set_notice.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <Show when=move || notice.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let (_, is_err) = notice.get().unwrap();
                    if is_err {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notice.get().unwrap().0}</span>
                </div>
            </div>
        </Show>
    }
}
