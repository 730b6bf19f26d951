use crate::components::icons::{Plus, RefreshCw, Trash2};
use crate::components::layout::{AppShell, Toast};
use crate::session::use_api;
use crate::stores::use_stores;
use dormdesk_shared::protocol::{CreateStudentRequest, DeleteStudentRequest, ListStudentsRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 新建学生的表单状态
#[derive(Clone, Copy)]
struct StudentForm {
    first_name: RwSignal<String>,
    last_name: RwSignal<String>,
    email: RwSignal<String>,
    phone: RwSignal<String>,
    room_id: RwSignal<String>,
}

impl StudentForm {
    fn new() -> Self {
        Self {
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            room_id: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.first_name.set(String::new());
        self.last_name.set(String::new());
        self.email.set(String::new());
        self.phone.set(String::new());
        self.room_id.set(String::new());
    }

    fn validate(&self) -> Result<CreateStudentRequest, String> {
        let first_name = self.first_name.get().trim().to_string();
        let last_name = self.last_name.get().trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err("请填写姓名".to_string());
        }
        let email = self.email.get().trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err("请填写有效的邮箱".to_string());
        }
        let phone = self.phone.get().trim().to_string();
        let room_id = {
            let raw = self.room_id.get().trim().to_string();
            if raw.is_empty() {
                None
            } else {
                Some(raw.parse::<u64>().map_err(|_| "房间编号必须是数字".to_string())?)
            }
        };
        Ok(CreateStudentRequest {
            first_name,
            last_name,
            email,
            phone: if phone.is_empty() { None } else { Some(phone) },
            room_id,
        })
    }
}

#[component]
pub fn StudentsPage() -> impl IntoView {
    let api = use_api();
    let stores = use_stores();
    let students = stores.students.clone();

    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);
    let (show_form, set_show_form) = signal(false);
    let form = StudentForm::new();

    students.restore_selected();

    let load = {
        let api = api.clone();
        let students = students.clone();
        move || {
            let api = api.clone();
            let students = students.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.send(&ListStudentsRequest).await {
                    Ok(list) => students.set_list(list),
                    Err(e) => {
                        set_notice.set(Some((format!("加载学生失败: {}", e.user_message()), true)))
                    }
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let students_list = students.list;
    let selected = students.selected;

    let on_create = {
        let api = api.clone();
        let students = students.clone();
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
            let students = students.clone();
            spawn_local(async move {
                match api.send(&req).await {
                    Ok(created) => {
                        students.list.update(|list| list.push(created));
                        form.reset();
                        set_show_form.set(false);
                        set_notice.set(Some(("学生已登记".to_string(), false)));
                    }
                    Err(e) => set_notice.set(Some((e.user_message(), true))),
                }
            });
        }
    };

    let handle_delete = {
        let api = api.clone();
        let students = students.clone();
        move |id: u64| {
            let api = api.clone();
            let students = students.clone();
            spawn_local(async move {
                match api.send(&DeleteStudentRequest { id }).await {
                    Ok(()) => {
                        students.list.update(|list| list.retain(|s| s.id != id));
                        if students.selected.get_untracked().map(|s| s.id) == Some(id) {
                            students.clear_selected();
                        }
                        set_notice.set(Some(("学生已移除".to_string(), false)));
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
                    <h2 class="text-2xl font-bold">"学生管理"</h2>
                    <div class="flex gap-2">
                        <button on:click=move |_| set_show_form.update(|v| *v = !*v) class="btn btn-primary btn-sm gap-2">
                            <Plus attr:class="h-4 w-4" /> "登记学生"
                        </button>
                        <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle btn-sm">
                            <RefreshCw attr:class=move || if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                        </button>
                    </div>
                </div>

                <Show when=move || show_form.get()>
                    <div class="card bg-base-100 shadow">
                        <form class="card-body grid grid-cols-2 md:grid-cols-6 gap-2 items-end" on:submit=on_create.clone()>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"名"</span></label>
                                <input class="input input-bordered input-sm" prop:value=form.first_name
                                    on:input=move |ev| form.first_name.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"姓"</span></label>
                                <input class="input input-bordered input-sm" prop:value=form.last_name
                                    on:input=move |ev| form.last_name.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"邮箱"</span></label>
                                <input class="input input-bordered input-sm" type="email" prop:value=form.email
                                    on:input=move |ev| form.email.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"电话"</span></label>
                                <input class="input input-bordered input-sm" prop:value=form.phone
                                    on:input=move |ev| form.phone.set(event_target_value(&ev)) />
                            </div>
                            <div class="form-control">
                                <label class="label"><span class="label-text">"房间编号"</span></label>
                                <input class="input input-bordered input-sm" type="number" prop:value=form.room_id
                                    on:input=move |ev| form.room_id.set(event_target_value(&ev)) />
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
                                    <th>"姓名"</th>
                                    <th>"邮箱"</th>
                                    <th class="hidden md:table-cell">"电话"</th>
                                    <th class="hidden md:table-cell">"房间"</th>
                                    <th>"入住日期"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || students_list.with(|l| l.is_empty()) && !loading.get()>
                                    <tr>
                                        <td colspan="6" class="text-center py-8 text-base-content/50">
                                            "还没有学生记录。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || students_list.get()
                                    key=|s| s.id
                                    children={
                                        let students = students.clone();
                                        let handle_delete = handle_delete.clone();
                                        move |student| {
                                            let students = students.clone();
                                            let handle_delete = handle_delete.clone();
                                            let id = student.id;
                                            let row = student.clone();
                                            view! {
                                                <tr
                                                    class=move || {
                                                        if selected.get().map(|s| s.id) == Some(id) {
                                                            "bg-primary/10 cursor-pointer"
                                                        } else {
                                                            "cursor-pointer"
                                                        }
                                                    }
                                                    on:click=move |_| students.set_selected(row.clone())
                                                >
                                                    <td class="font-bold">{student.full_name()}</td>
                                                    <td>{student.email.clone()}</td>
                                                    <td class="hidden md:table-cell">
                                                        {student.phone.clone().unwrap_or_else(|| "—".to_string())}
                                                    </td>
                                                    <td class="hidden md:table-cell font-mono">
                                                        {student.room_id.map(|r| format!("#{}", r)).unwrap_or_else(|| "未分配".to_string())}
                                                    </td>
                                                    <td>{student.enrolled_at.to_string()}</td>
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
