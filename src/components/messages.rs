use crate::components::icons::{Plus, RefreshCw};
use crate::components::layout::{AppShell, Toast};
use crate::session::use_api;
use dormdesk_shared::Message;
use dormdesk_shared::protocol::{ListMessagesRequest, SendMessageRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn MessagesPage() -> impl IntoView {
    let api = use_api();

    let (messages, set_messages) = signal(Vec::<Message>::new());
    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);

    // 表单字段：收件人留空表示全员广播
    let recipient = RwSignal::new(String::new());
    let subject = RwSignal::new(String::new());
    let body = RwSignal::new(String::new());

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.send(&ListMessagesRequest).await {
                    Ok(mut list) => {
                        list.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
                        set_messages.set(list);
                    }
                    Err(e) => {
                        set_notice.set(Some((format!("加载消息失败: {}", e.user_message()), true)))
                    }
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let on_send = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let subject_text = subject.get().trim().to_string();
            let body_text = body.get().trim().to_string();
            if subject_text.is_empty() || body_text.is_empty() {
                set_notice.set(Some(("请填写主题和内容".to_string(), true)));
                return;
            }
            let recipient_id = {
                let raw = recipient.get().trim().to_string();
                if raw.is_empty() {
                    None
                } else {
                    match raw.parse::<u64>() {
                        Ok(id) => Some(id),
                        Err(_) => {
                            set_notice.set(Some(("收件人编号必须是数字".to_string(), true)));
                            return;
                        }
                    }
                }
            };
            let req = SendMessageRequest {
                recipient_id,
                subject: subject_text,
                body: body_text,
            };
            let api = api.clone();
            spawn_local(async move {
                match api.send(&req).await {
                    Ok(sent) => {
                        set_messages.update(|list| list.insert(0, sent));
                        subject.set(String::new());
                        body.set(String::new());
                        set_notice.set(Some(("消息已发送".to_string(), false)));
                    }
                    Err(e) => set_notice.set(Some((e.user_message(), true))),
                }
            });
        }
    };

    view! {
        <AppShell>
            <Toast notice=notice set_notice=set_notice />
            <div class="max-w-4xl mx-auto space-y-6">
                <div class="flex items-center justify-between">
                    <h2 class="text-2xl font-bold">"站内消息"</h2>
                    <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle btn-sm">
                        <RefreshCw attr:class=move || if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                    </button>
                </div>

                <div class="card bg-base-100 shadow">
                    <form class="card-body gap-2" on:submit=on_send>
                        <div class="grid grid-cols-1 md:grid-cols-3 gap-2">
                            <div class="form-control">
                                <label class="label"><span class="label-text">"收件人编号（留空广播）"</span></label>
                                <input class="input input-bordered input-sm" type="number" prop:value=recipient
                                    on:input=move |ev| recipient.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control md:col-span-2">
                                <label class="label"><span class="label-text">"主题"</span></label>
                                <input class="input input-bordered input-sm" prop:value=subject
                                    on:input=move |ev| subject.set(event_target_value(&ev)) />
                            </div>
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"内容"</span></label>
                            <textarea class="textarea textarea-bordered" rows="3" prop:value=body
                                on:input=move |ev| body.set(event_target_value(&ev))></textarea>
                        </div>
                        <div class="flex justify-end">
                            <button type="submit" class="btn btn-primary btn-sm gap-2">
                                <Plus attr:class="h-4 w-4" /> "发送"
                            </button>
                        </div>
                    </form>
                </div>

                <div class="space-y-2">
                    <Show when=move || messages.with(|l| l.is_empty()) && !loading.get()>
                        <div class="text-center py-8 text-base-content/50">"暂无消息。"</div>
                    </Show>
                    <For
                        each=move || messages.get()
                        key=|m| m.id
                        children=move |message| {
                            let is_broadcast = message.recipient_id.is_none();
                            view! {
                                <div class="card bg-base-100 shadow">
                                    <div class="card-body py-4">
                                        <div class="flex items-center justify-between">
                                            <h3 class="font-bold">
                                                {message.subject.clone()}
                                                <Show when=move || is_broadcast>
                                                    <span class="badge badge-neutral badge-sm ml-2">"广播"</span>
                                                </Show>
                                            </h3>
                                            <span class="text-sm opacity-60">
                                                {message.sent_at.format("%Y-%m-%d %H:%M").to_string()}
                                            </span>
                                        </div>
                                        <p class="text-sm text-base-content/80">{message.body.clone()}</p>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>
        </AppShell>
    }
}
