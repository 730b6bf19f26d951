//! 登录页

use crate::components::icons::ShieldCheck;
use crate::session::{login, reset_password, use_session, use_session_engine};
use crate::web::router::use_router;
use dormdesk_shared::LoginRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let engine = use_session_engine();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = {
        let engine = engine.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            // 字段级校验：两个字段都必填
            if email.get().trim().is_empty() || password.get().is_empty() {
                set_error_msg.set(Some("请填写邮箱和密码".to_string()));
                return;
            }

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let engine = engine.clone();
            let creds = LoginRequest {
                email: email.get().trim().to_string(),
                password: password.get(),
            };
            spawn_local(async move {
                // 登录动作失败时会重新抛出，表单在这里同步反应；
                // 成功后的跳转由路由服务的认证监听完成
                if let Err(err) = login(session, &engine, creds).await {
                    set_error_msg.set(Some(err.user_message()));
                }
                set_is_submitting.set(false);
            });
        }
    };

    let on_forgot = {
        let engine = engine.clone();
        move |_| {
            let address = email.get().trim().to_string();
            if address.is_empty() {
                set_error_msg.set(Some("请先填写邮箱，再申请重置密码".to_string()));
                return;
            }
            let engine = engine.clone();
            spawn_local(async move {
                // fire-and-forget：失败只会出现在会话错误里
                reset_password(session, &engine, &address).await;
            });
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"DormDesk"</h1>
                        <p class="text-base-content/70">"登录宿舍管理系统"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap()}</span>
                            </div>
                        </Show>
                        // 后台动作（如重置密码）失败时的会话级错误
                        <Show when=move || {
                            error_msg.get().is_none() && session.state.get().error.is_some()
                        }>
                            <div role="alert" class="alert alert-warning text-sm py-2">
                                <span>{move || session.state.get().error.unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"邮箱"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="admin@example.edu"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                            <label class="label">
                                <a class="label-text-alt link link-hover" on:click=on_forgot>
                                    "忘记密码？"
                                </a>
                            </label>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "登录中..." }.into_any()
                                } else {
                                    "登录".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "还没有账号？"
                            <a class="link link-primary ml-1" on:click=move |_| router.navigate("/register")>
                                "注册"
                            </a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
