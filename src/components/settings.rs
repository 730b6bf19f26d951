//! 系统设置页（仅 sudo 可达，由路由守卫保证）

use crate::components::layout::{AppShell, Toast};
use crate::session::use_api;
use dormdesk_shared::AppSettings;
use dormdesk_shared::chrono::NaiveDate;
use dormdesk_shared::protocol::{GetSettingsRequest, UpdateSettingsRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SettingsPage() -> impl IntoView {
    let api = use_api();

    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);

    // 表单字段（从服务端设置填充）
    let locale = RwSignal::new(String::new());
    let semester = RwSignal::new(String::new());
    let deadline = RwSignal::new(String::new());
    let registration_open = RwSignal::new(false);

    {
        let api = api.clone();
        spawn_local(async move {
            match api.send(&GetSettingsRequest).await {
                Ok(settings) => {
                    locale.set(settings.default_locale);
                    semester.set(settings.semester);
                    deadline.set(
                        settings
                            .payment_deadline
                            .map(|d| d.to_string())
                            .unwrap_or_default(),
                    );
                    registration_open.set(settings.registration_open);
                }
                Err(e) => {
                    set_notice.set(Some((format!("加载设置失败: {}", e.user_message()), true)))
                }
            }
            set_loading.set(false);
        });
    }

    let on_save = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let term = semester.get().trim().to_string();
            if term.is_empty() {
                set_notice.set(Some(("请填写当前学期".to_string(), true)));
                return;
            }
            let payment_deadline = {
                let raw = deadline.get().trim().to_string();
                if raw.is_empty() {
                    None
                } else {
                    match raw.parse::<NaiveDate>() {
                        Ok(d) => Some(d),
                        Err(_) => {
                            set_notice.set(Some(("缴费截止日期格式应为 YYYY-MM-DD".to_string(), true)));
                            return;
                        }
                    }
                }
            };
            let req = UpdateSettingsRequest {
                settings: AppSettings {
                    default_locale: locale.get().trim().to_string(),
                    semester: term,
                    payment_deadline,
                    registration_open: registration_open.get(),
                },
            };
            set_saving.set(true);
            let api = api.clone();
            spawn_local(async move {
                match api.send(&req).await {
                    Ok(_) => set_notice.set(Some(("设置已保存".to_string(), false))),
                    Err(e) => set_notice.set(Some((e.user_message(), true))),
                }
                set_saving.set(false);
            });
        }
    };

    view! {
        <AppShell>
            <Toast notice=notice set_notice=set_notice />
            <div class="max-w-2xl mx-auto space-y-6">
                <h2 class="text-2xl font-bold">"系统设置"</h2>

                <Show
                    when=move || !loading.get()
                    fallback=|| view! {
                        <div class="flex justify-center py-12">
                            <span class="loading loading-spinner loading-lg"></span>
                        </div>
                    }
                >
                    <div class="card bg-base-100 shadow-xl">
                        <form class="card-body gap-3" on:submit=on_save.clone()>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"默认语言"</span></label>
                                <input class="input input-bordered" prop:value=locale
                                    on:input=move |ev| locale.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"当前学期"</span></label>
                                <input class="input input-bordered" placeholder="2026-春" prop:value=semester
                                    on:input=move |ev| semester.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"缴费截止日期"</span></label>
                                <input class="input input-bordered" type="date" prop:value=deadline
                                    on:input=move |ev| deadline.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control">
                                <label class="label cursor-pointer justify-start gap-3">
                                    <input
                                        type="checkbox"
                                        class="toggle toggle-primary"
                                        prop:checked=registration_open
                                        on:change=move |ev| registration_open.set(event_target_checked(&ev))
                                    />
                                    <span class="label-text">"开放新生注册"</span>
                                </label>
                            </div>
                            <div class="form-control mt-4">
                                <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                                    {move || if saving.get() { "保存中..." } else { "保存设置" }}
                                </button>
                            </div>
                        </form>
                    </div>
                </Show>
            </div>
        </AppShell>
    }
}
