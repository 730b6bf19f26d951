use crate::components::icons::{Plus, RefreshCw, Trash2};
use crate::components::layout::{AppShell, Toast};
use crate::session::use_api;
use crate::stores::use_stores;
use dormdesk_shared::format_cents;
use dormdesk_shared::protocol::{
    CreateRoomTypeRequest, DeleteRoomTypeRequest, ListRoomTypesRequest,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn RoomTypesPage() -> impl IntoView {
    let api = use_api();
    let stores = use_stores();
    let room_types = stores.room_types.clone();

    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);

    // 表单字段
    let name = RwSignal::new(String::new());
    let capacity = RwSignal::new("4".to_string());
    let price_yuan = RwSignal::new(String::new());

    room_types.restore_selected();

    let load = {
        let api = api.clone();
        let room_types = room_types.clone();
        move || {
            let api = api.clone();
            let room_types = room_types.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.send(&ListRoomTypesRequest).await {
                    Ok(list) => room_types.set_list(list),
                    Err(e) => {
                        set_notice.set(Some((format!("加载房型失败: {}", e.user_message()), true)))
                    }
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let types_list = room_types.list;
    let selected = room_types.selected;

    let on_create = {
        let api = api.clone();
        let room_types = room_types.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            // 字段级校验：名称必填，价格按"元"输入、以"分"上送
            let type_name = name.get().trim().to_string();
            if type_name.is_empty() {
                set_notice.set(Some(("请填写房型名称".to_string(), true)));
                return;
            }
            let Ok(cap) = capacity.get().trim().parse::<u32>() else {
                set_notice.set(Some(("床位数必须是正整数".to_string(), true)));
                return;
            };
            let Ok(yuan) = price_yuan.get().trim().parse::<f64>() else {
                set_notice.set(Some(("月租金必须是数字".to_string(), true)));
                return;
            };
            let req = CreateRoomTypeRequest {
                name: type_name,
                capacity: cap,
                monthly_price_cents: (yuan * 100.0).round() as i64,
            };
            let api = api.clone();
            let room_types = room_types.clone();
            spawn_local(async move {
                match api.send(&req).await {
                    Ok(created) => {
                        room_types.list.update(|list| list.push(created));
                        name.set(String::new());
                        price_yuan.set(String::new());
                        set_notice.set(Some(("房型已创建".to_string(), false)));
                    }
                    Err(e) => set_notice.set(Some((e.user_message(), true))),
                }
            });
        }
    };

    let handle_delete = {
        let api = api.clone();
        let room_types = room_types.clone();
        move |id: u64| {
            let api = api.clone();
            let room_types = room_types.clone();
            spawn_local(async move {
                match api.send(&DeleteRoomTypeRequest { id }).await {
                    Ok(()) => {
                        room_types.list.update(|list| list.retain(|t| t.id != id));
                        if room_types.selected.get_untracked().map(|t| t.id) == Some(id) {
                            room_types.clear_selected();
                        }
                        set_notice.set(Some(("房型已删除".to_string(), false)));
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
                    <h2 class="text-2xl font-bold">"房型管理"</h2>
                    <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle btn-sm">
                        <RefreshCw attr:class=move || if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                    </button>
                </div>

                <div class="card bg-base-100 shadow">
                    <form class="card-body grid grid-cols-2 md:grid-cols-4 gap-2 items-end" on:submit=on_create>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"名称"</span></label>
                            <input class="input input-bordered input-sm" prop:value=name
                                on:input=move |ev| name.set(event_target_value(&ev)) />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"床位数"</span></label>
                            <input class="input input-bordered input-sm" type="number" prop:value=capacity
                                on:input=move |ev| capacity.set(event_target_value(&ev)) />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"月租金（元）"</span></label>
                            <input class="input input-bordered input-sm" type="number" step="0.01" prop:value=price_yuan
                                on:input=move |ev| price_yuan.set(event_target_value(&ev)) />
                        </div>
                        <button type="submit" class="btn btn-primary btn-sm gap-2">
                            <Plus attr:class="h-4 w-4" /> "新建房型"
                        </button>
                    </form>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"名称"</th>
                                    <th>"床位数"</th>
                                    <th>"月租金"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || types_list.with(|l| l.is_empty()) && !loading.get()>
                                    <tr>
                                        <td colspan="4" class="text-center py-8 text-base-content/50">
                                            "还没有房型。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || types_list.get()
                                    key=|t| t.id
                                    children={
                                        let room_types = room_types.clone();
                                        let handle_delete = handle_delete.clone();
                                        move |room_type| {
                                            let room_types = room_types.clone();
                                            let handle_delete = handle_delete.clone();
                                            let id = room_type.id;
                                            let row = room_type.clone();
                                            view! {
                                                <tr
                                                    class=move || {
                                                        if selected.get().map(|t| t.id) == Some(id) {
                                                            "bg-primary/10 cursor-pointer"
                                                        } else {
                                                            "cursor-pointer"
                                                        }
                                                    }
                                                    on:click=move |_| room_types.set_selected(row.clone())
                                                >
                                                    <td class="font-bold">{room_type.name.clone()}</td>
                                                    <td>{room_type.capacity}</td>
                                                    <td class="font-mono">{format_cents(room_type.monthly_price_cents)}</td>
                                                    <td>
                                                        <button
                                                            class="btn btn-ghost btn-sm text-error"
                                                            on:click=move |ev| {
                                                                ev.stop_propagation();
                                                                handle_delete(id);
                                                            }
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
