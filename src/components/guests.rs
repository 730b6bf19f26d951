use crate::components::icons::{Plus, RefreshCw, Trash2};
use crate::components::layout::{AppShell, Toast};
use crate::session::use_api;
use dormdesk_shared::DormGuest;
use dormdesk_shared::chrono::NaiveDate;
use dormdesk_shared::protocol::{CreateGuestRequest, DeleteGuestRequest, ListGuestsRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn GuestsPage() -> impl IntoView {
    let api = use_api();

    let (guests, set_guests) = signal(Vec::<DormGuest>::new());
    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);

    // 表单字段
    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let check_in = RwSignal::new(String::new());
    let check_out = RwSignal::new(String::new());

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.send(&ListGuestsRequest).await {
                    Ok(list) => set_guests.set(list),
                    Err(e) => {
                        set_notice.set(Some((format!("加载访客失败: {}", e.user_message()), true)))
                    }
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let on_create = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let first = first_name.get().trim().to_string();
            let last = last_name.get().trim().to_string();
            if first.is_empty() || last.is_empty() {
                set_notice.set(Some(("请填写访客姓名".to_string(), true)));
                return;
            }
            let Ok(check_in_date) = check_in.get().trim().parse::<NaiveDate>() else {
                set_notice.set(Some(("入住日期格式应为 YYYY-MM-DD".to_string(), true)));
                return;
            };
            let check_out_date = {
                let raw = check_out.get().trim().to_string();
                if raw.is_empty() {
                    None
                } else {
                    match raw.parse::<NaiveDate>() {
                        Ok(d) => Some(d),
                        Err(_) => {
                            set_notice.set(Some(("离店日期格式应为 YYYY-MM-DD".to_string(), true)));
                            return;
                        }
                    }
                }
            };
            let req = CreateGuestRequest {
                first_name: first,
                last_name: last,
                email: None,
                host_student_id: None,
                room_id: None,
                check_in: check_in_date,
                check_out: check_out_date,
            };
            let api = api.clone();
            spawn_local(async move {
                match api.send(&req).await {
                    Ok(created) => {
                        set_guests.update(|list| list.push(created));
                        first_name.set(String::new());
                        last_name.set(String::new());
                        set_notice.set(Some(("访客已登记".to_string(), false)));
                    }
                    Err(e) => set_notice.set(Some((e.user_message(), true))),
                }
            });
        }
    };

    let handle_delete = {
        let api = api.clone();
        move |id: u64| {
            let api = api.clone();
            spawn_local(async move {
                match api.send(&DeleteGuestRequest { id }).await {
                    Ok(()) => {
                        set_guests.update(|list| list.retain(|g| g.id != id));
                        set_notice.set(Some(("访客已移除".to_string(), false)));
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
                    <h2 class="text-2xl font-bold">"访客管理"</h2>
                    <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle btn-sm">
                        <RefreshCw attr:class=move || if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                    </button>
                </div>

                <div class="card bg-base-100 shadow">
                    <form class="card-body grid grid-cols-2 md:grid-cols-5 gap-2 items-end" on:submit=on_create>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"名"</span></label>
                            <input class="input input-bordered input-sm" prop:value=first_name
                                on:input=move |ev| first_name.set(event_target_value(&ev)) />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"姓"</span></label>
                            <input class="input input-bordered input-sm" prop:value=last_name
                                on:input=move |ev| last_name.set(event_target_value(&ev)) />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"入住日期"</span></label>
                            <input class="input input-bordered input-sm" type="date" prop:value=check_in
                                on:input=move |ev| check_in.set(event_target_value(&ev)) />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"离店日期"</span></label>
                            <input class="input input-bordered input-sm" type="date" prop:value=check_out
                                on:input=move |ev| check_out.set(event_target_value(&ev)) />
                        </div>
                        <button type="submit" class="btn btn-primary btn-sm gap-2">
                            <Plus attr:class="h-4 w-4" /> "登记访客"
                        </button>
                    </form>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"姓名"</th>
                                    <th>"入住"</th>
                                    <th>"离店"</th>
                                    <th class="hidden md:table-cell">"接待学生"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || guests.with(|l| l.is_empty()) && !loading.get()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "暂无访客。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || guests.get()
                                    key=|g| g.id
                                    children={
                                        let handle_delete = handle_delete.clone();
                                        move |guest| {
                                            let handle_delete = handle_delete.clone();
                                            let id = guest.id;
                                            view! {
                                                <tr>
                                                    <td class="font-bold">{format!("{} {}", guest.first_name, guest.last_name)}</td>
                                                    <td>{guest.check_in.to_string()}</td>
                                                    <td>{guest.check_out.map(|d| d.to_string()).unwrap_or_else(|| "在住".to_string())}</td>
                                                    <td class="hidden md:table-cell font-mono">
                                                        {guest.host_student_id.map(|s| format!("#{}", s)).unwrap_or_else(|| "—".to_string())}
                                                    </td>
                                                    <td>
                                                        <button
                                                            class="btn btn-ghost btn-sm text-error"
                                                            on:click=move |_| handle_delete(id)
                                                        >
                                                            <Trash2 attr:class="h-4 w-4" />
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </AppShell>
    }
}
