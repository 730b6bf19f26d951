//! 注册页

use crate::session::{register, use_session, use_session_engine};
use crate::web::router::use_router;
use dormdesk_shared::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 表单状态结构体
///
/// 整合零散的 signal：持有数据、校验并转换为请求对象。
#[derive(Clone, Copy)]
struct RegisterForm {
    name: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
    first_name: RwSignal<String>,
    last_name: RwSignal<String>,
}

impl RegisterForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
        }
    }

    /// 字段级校验后转换为 API 请求对象
    fn validate(&self) -> Result<RegisterRequest, String> {
        let name = self.name.get().trim().to_string();
        let email = self.email.get().trim().to_string();
        let password = self.password.get();

        if name.is_empty() {
            return Err("请填写显示名".to_string());
        }
        if email.is_empty() || !email.contains('@') {
            return Err("请填写有效的邮箱".to_string());
        }
        if password.chars().count() < 8 {
            return Err("密码至少需要 8 个字符".to_string());
        }

        let optional = |sig: RwSignal<String>| {
            let v = sig.get().trim().to_string();
            if v.is_empty() { None } else { Some(v) }
        };

        Ok(RegisterRequest {
            name,
            email,
            password,
            first_name: optional(self.first_name),
            last_name: optional(self.last_name),
        })
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = use_session();
    let engine = use_session_engine();
    let router = use_router();

    let form = RegisterForm::new();
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = {
        let engine = engine.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();

            let payload = match form.validate() {
                Ok(p) => p,
                Err(msg) => {
                    set_error_msg.set(Some(msg));
                    return;
                }
            };

            set_is_submitting.set(true);
            set_error_msg.set(None);

            let engine = engine.clone();
            spawn_local(async move {
                // 注册成功即持有会话，跳转交给路由服务
                if let Err(err) = register(session, &engine, payload).await {
                    set_error_msg.set(Some(err.user_message()));
                }
                set_is_submitting.set(false);
            });
        }
    };

    let text_input = move |id: &'static str,
                           label: &'static str,
                           kind: &'static str,
                           sig: RwSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    on:input=move |ev| sig.set(event_target_value(&ev))
                    prop:value=sig
                    class="input input-bordered"
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold mb-4">"注册账号"</h1>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap()}</span>
                            </div>
                        </Show>

                        {text_input("name", "显示名", "text", form.name)}
                        {text_input("email", "邮箱", "email", form.email)}
                        {text_input("password", "密码", "password", form.password)}
                        <div class="grid grid-cols-2 gap-2">
                            {text_input("first_name", "名（可选）", "text", form.first_name)}
                            {text_input("last_name", "姓（可选）", "text", form.last_name)}
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "提交中..." }.into_any()
                                } else {
                                    "注册".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "已有账号？"
                            <a class="link link-primary ml-1" on:click=move |_| router.navigate("/")>
                                "返回登录"
                            </a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
