//! 个人资料页
//!
//! "刷新资料"走 `load_profile`：失败只显示错误，不会把人登出
//! （与启动时的后台探测是两种不同的失败语义）。

use crate::components::icons::RefreshCw;
use crate::components::layout::{AppShell, Toast};
use crate::session::{load_profile, use_session, use_session_engine};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_session();
    let engine = use_session_engine();

    let (refreshing, set_refreshing) = signal(false);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);

    let on_refresh = {
        let engine = engine.clone();
        move |_| {
            set_refreshing.set(true);
            let engine = engine.clone();
            spawn_local(async move {
                if let Err(err) = load_profile(session, &engine).await {
                    set_notice.set(Some((err.user_message(), true)));
                } else {
                    set_notice.set(Some(("资料已刷新".to_string(), false)));
                }
                set_refreshing.set(false);
            });
        }
    };

    let field = move |label: &'static str, value: String| {
        view! {
            <div>
                <div class="text-sm opacity-60">{label}</div>
                <div class="font-medium">{value}</div>
            </div>
        }
    };

    view! {
        <AppShell>
            <Toast notice=notice set_notice=set_notice />
            <div class="max-w-2xl mx-auto space-y-6">
                <div class="flex items-center justify-between">
                    <h2 class="text-2xl font-bold">"个人资料"</h2>
                    <button on:click=on_refresh disabled=move || refreshing.get() class="btn btn-ghost btn-circle btn-sm">
                        <RefreshCw attr:class=move || if refreshing.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                    </button>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body grid grid-cols-1 md:grid-cols-2 gap-4">
                        {move || {
                            let state = session.state.get();
                            match state.user {
                                Some(user) => view! {
                                    <>
                                        {field("姓名", user.full_name())}
                                        {field("显示名", user.name.clone())}
                                        {field("邮箱", user.email.clone())}
                                        {field("角色", user.role.name.clone())}
                                    </>
                                }.into_any(),
                                None => view! {
                                    <p class="text-base-content/50">"资料尚未加载。"</p>
                                }.into_any(),
                            }
                        }}
                    </div>
                </div>
            </div>
        </AppShell>
    }
}
