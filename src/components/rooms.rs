//! 房间管理页
//!
//! 列表 + 行选中（持久化镜像，跳转后返回仍然高亮）+ 新建 + 删除。

use crate::components::icons::{Plus, RefreshCw, Trash2};
use crate::components::layout::{AppShell, Toast};
use crate::session::use_api;
use crate::stores::use_stores;
use dormdesk_shared::protocol::{
    CreateRoomRequest, DeleteRoomRequest, ListRoomTypesRequest, ListRoomsRequest,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 新建房间的表单状态
#[derive(Clone, Copy)]
struct RoomForm {
    number: RwSignal<String>,
    floor: RwSignal<String>,
    room_type_id: RwSignal<String>,
    capacity: RwSignal<String>,
    notes: RwSignal<String>,
}

impl RoomForm {
    fn new() -> Self {
        Self {
            number: RwSignal::new(String::new()),
            floor: RwSignal::new("1".to_string()),
            room_type_id: RwSignal::new(String::new()),
            capacity: RwSignal::new("4".to_string()),
            notes: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.number.set(String::new());
        self.floor.set("1".to_string());
        self.room_type_id.set(String::new());
        self.capacity.set("4".to_string());
        self.notes.set(String::new());
    }

    /// 扁平表单状态 -> API 请求对象（字段级校验）
    fn validate(&self) -> Result<CreateRoomRequest, String> {
        let number = self.number.get().trim().to_string();
        if number.is_empty() {
            return Err("请填写房间号".to_string());
        }
        let floor: i32 = self
            .floor
            .get()
            .trim()
            .parse()
            .map_err(|_| "楼层必须是整数".to_string())?;
        let room_type_id: u64 = self
            .room_type_id
            .get()
            .trim()
            .parse()
            .map_err(|_| "请选择房型".to_string())?;
        let capacity: u32 = self
            .capacity
            .get()
            .trim()
            .parse()
            .map_err(|_| "床位数必须是正整数".to_string())?;
        if capacity == 0 {
            return Err("床位数必须大于 0".to_string());
        }

        let notes = self.notes.get().trim().to_string();
        Ok(CreateRoomRequest {
            number,
            floor,
            room_type_id,
            capacity,
            notes: if notes.is_empty() { None } else { Some(notes) },
        })
    }
}

#[component]
pub fn RoomsPage() -> impl IntoView {
    let api = use_api();
    let stores = use_stores();
    let rooms = stores.rooms.clone();
    let room_types = stores.room_types.clone();

    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);
    let (show_form, set_show_form) = signal(false);
    let form = RoomForm::new();

    // 返回本页时恢复上次的选中行
    rooms.restore_selected();

    let load = {
        let api = api.clone();
        let rooms = rooms.clone();
        let room_types = room_types.clone();
        move || {
            let api = api.clone();
            let rooms = rooms.clone();
            let room_types = room_types.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.send(&ListRoomsRequest).await {
                    Ok(list) => rooms.set_list(list),
                    Err(e) => {
                        set_notice.set(Some((format!("加载房间失败: {}", e.user_message()), true)))
                    }
                }
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

    let rooms_list = rooms.list;
    let selected = rooms.selected;
    let types_list = room_types.list;

    let on_create = {
        let api = api.clone();
        let rooms = rooms.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let req = match form.validate() {
                Ok(r) => r,
                Err(msg) => {
                    set_notice.set(Some((msg, true)));
                    return;
                }
            };
            let api = api.clone();
            let rooms = rooms.clone();
            spawn_local(async move {
                match api.send(&req).await {
                    Ok(created) => {
                        rooms.list.update(|list| list.push(created));
                        form.reset();
                        set_show_form.set(false);
                        set_notice.set(Some(("房间已创建".to_string(), false)));
                    }
                    Err(e) => set_notice.set(Some((e.user_message(), true))),
                }
            });
        }
    };

    let handle_delete = {
        let api = api.clone();
        let rooms = rooms.clone();
        move |id: u64| {
            let api = api.clone();
            let rooms = rooms.clone();
            spawn_local(async move {
                match api.send(&DeleteRoomRequest { id }).await {
                    Ok(()) => {
                        rooms.list.update(|list| list.retain(|r| r.id != id));
                        if rooms.selected.get_untracked().map(|r| r.id) == Some(id) {
                            rooms.clear_selected();
                        }
                        set_notice.set(Some(("房间已删除".to_string(), false)));
                    }
                    Err(e) => set_notice.set(Some((e.user_message(), true))),
                }
            });
        }
    };

    view! {
        <AppShell>
            <Toast notice=notice set_notice=set_notice />
            <div class="max-w-5xl mx-auto space-y-6">
                <div class="flex items-center justify-between">
                    <h2 class="text-2xl font-bold">"房间管理"</h2>
                    <div class="flex gap-2">
                        <button on:click=move |_| set_show_form.update(|v| *v = !*v) class="btn btn-primary btn-sm gap-2">
                            <Plus attr:class="h-4 w-4" /> "新建房间"
                        </button>
                        <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle btn-sm">
                            <RefreshCw attr:class=move || if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                        </button>
                    </div>
                </div>

                <Show when=move || show_form.get()>
                    <div class="card bg-base-100 shadow">
                        <form class="card-body grid grid-cols-2 md:grid-cols-5 gap-2 items-end" on:submit=on_create.clone()>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"房间号"</span></label>
                                <input class="input input-bordered input-sm" prop:value=form.number
                                    on:input=move |ev| form.number.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"楼层"</span></label>
                                <input class="input input-bordered input-sm" type="number" prop:value=form.floor
                                    on:input=move |ev| form.floor.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"房型"</span></label>
                                <select class="select select-bordered select-sm"
                                    on:change=move |ev| form.room_type_id.set(event_target_value(&ev))>
                                    <option value="" selected=move || form.room_type_id.get().is_empty()>"请选择"</option>
                                    <For
                                        each=move || types_list.get()
                                        key=|t| t.id
                                        children=move |t| {
                                            view! { <option value=t.id.to_string()>{t.name.clone()}</option> }
                                        }
                                    />
                                </select>
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"床位数"</span></label>
                                <input class="input input-bordered input-sm" type="number" prop:value=form.capacity
                                    on:input=move |ev| form.capacity.set(event_target_value(&ev)) />
                            </div>
                            <button type="submit" class="btn btn-primary btn-sm">"保存"</button>
                        </form>
                    </div>
                </Show>

                <div class="card bg-base-100 shadow-xl">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"房间号"</th>
                                    <th>"楼层"</th>
                                    <th>"房型"</th>
                                    <th>"入住 / 床位"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || rooms_list.with(|l| l.is_empty()) && !loading.get()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "还没有房间。点击右上角新建一间。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || rooms_list.get()
                                    key=|r| r.id
                                    children={
                                        let rooms = rooms.clone();
                                        let handle_delete = handle_delete.clone();
                                        move |room| {
                                            let rooms = rooms.clone();
                                            let handle_delete = handle_delete.clone();
                                            let id = room.id;
                                            let type_id = room.room_type_id;
                                            let row = room.clone();
                                            let type_name = move || {
                                                types_list.with(|ts| {
                                                    ts.iter()
                                                        .find(|t| t.id == type_id)
                                                        .map(|t| t.name.clone())
                                                        .unwrap_or_else(|| format!("#{}", type_id))
                                                })
                                            };
                                            view! {
                                                <tr
                                                    class=move || {
                                                        if selected.get().map(|r| r.id) == Some(id) {
                                                            "bg-primary/10 cursor-pointer"
                                                        } else {
                                                            "cursor-pointer"
                                                        }
                                                    }
                                                    on:click=move |_| rooms.set_selected(row.clone())
                                                >
                                                    <td class="font-mono font-bold">{room.number.clone()}</td>
                                                    <td>{room.floor}</td>
                                                    <td>{type_name}</td>
                                                    <td>{format!("{} / {}", room.occupied, room.capacity)}</td>
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
