//! 缴费页
//!
//! 管理员看到全部记录，学生只会从后端拿到自己的记录——
//! 过滤在服务端完成，客户端不再区分。

use crate::components::icons::{Plus, RefreshCw};
use crate::components::layout::{AppShell, Toast};
use crate::session::use_api;
use crate::stores::use_stores;
use dormdesk_shared::protocol::{CreatePaymentRequest, ListPaymentsRequest};
use dormdesk_shared::{PaymentStatus, format_cents};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn PaymentsPage() -> impl IntoView {
    let api = use_api();
    let stores = use_stores();
    let payments = stores.payments.clone();

    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);

    // 表单字段
    let student_id = RwSignal::new(String::new());
    let amount_yuan = RwSignal::new(String::new());
    let semester = RwSignal::new(String::new());

    payments.restore_selected();

    let load = {
        let api = api.clone();
        let payments = payments.clone();
        move || {
            let api = api.clone();
            let payments = payments.clone();
            set_loading.set(true);
            spawn_local(async move {
                match api.send(&ListPaymentsRequest).await {
                    Ok(list) => payments.set_list(list),
                    Err(e) => {
                        set_notice.set(Some((format!("加载缴费失败: {}", e.user_message()), true)))
                    }
                }
                set_loading.set(false);
            });
        }
    };
    load();

    let payments_list = payments.list;
    let selected = payments.selected;

    let on_submit_payment = {
        let api = api.clone();
        let payments = payments.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Ok(sid) = student_id.get().trim().parse::<u64>() else {
                set_notice.set(Some(("学生编号必须是数字".to_string(), true)));
                return;
            };
            let Ok(yuan) = amount_yuan.get().trim().parse::<f64>() else {
                set_notice.set(Some(("金额必须是数字".to_string(), true)));
                return;
            };
            let term = semester.get().trim().to_string();
            if term.is_empty() {
                set_notice.set(Some(("请填写学期".to_string(), true)));
                return;
            }
            let req = CreatePaymentRequest {
                student_id: sid,
                amount_cents: (yuan * 100.0).round() as i64,
                semester: term,
            };
            let api = api.clone();
            let payments = payments.clone();
            spawn_local(async move {
                match api.send(&req).await {
                    Ok(created) => {
                        payments.list.update(|list| list.push(created));
                        semester.set(String::new());
                        amount_yuan.set(String::new());
                        set_notice.set(Some(("缴费已提交，等待审批".to_string(), false)));
                    }
                    Err(e) => set_notice.set(Some((e.user_message(), true))),
                }
            });
        }
    };

    let status_badge = |status: PaymentStatus| match status {
        PaymentStatus::Pending => ("待审批", "badge badge-warning badge-outline"),
        PaymentStatus::Approved => ("已通过", "badge badge-success badge-outline"),
        PaymentStatus::Rejected => ("已驳回", "badge badge-error badge-outline"),
    };

    view! {
        <AppShell>
            <Toast notice=notice set_notice=set_notice />
            <div class="max-w-5xl mx-auto space-y-6">
                <div class="flex items-center justify-between">
                    <h2 class="text-2xl font-bold">"缴费记录"</h2>
                    <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle btn-sm">
                        <RefreshCw attr:class=move || if loading.get() { "h-4 w-4 animate-spin" } else { "h-4 w-4" } />
                    </button>
                </div>

                <div class="card bg-base-100 shadow">
                    <form class="card-body grid grid-cols-2 md:grid-cols-4 gap-2 items-end" on:submit=on_submit_payment>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"学生编号"</span></label>
                            <input class="input input-bordered input-sm" type="number" prop:value=student_id
                                on:input=move |ev| student_id.set(event_target_value(&ev)) />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"金额（元）"</span></label>
                            <input class="input input-bordered input-sm" type="number" step="0.01" prop:value=amount_yuan
                                on:input=move |ev| amount_yuan.set(event_target_value(&ev)) />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"学期"</span></label>
                            <input class="input input-bordered input-sm" placeholder="2026-春" prop:value=semester
                                on:input=move |ev| semester.set(event_target_value(&ev)) />
                        </div>
                        <button type="submit" class="btn btn-primary btn-sm gap-2">
                            <Plus attr:class="h-4 w-4" /> "提交缴费"
                        </button>
                    </form>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"学生"</th>
                                    <th>"学期"</th>
                                    <th>"金额"</th>
                                    <th>"状态"</th>
                                    <th class="hidden md:table-cell">"提交时间"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || payments_list.with(|l| l.is_empty()) && !loading.get()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "暂无缴费记录。"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || payments_list.get()
                                    key=|p| p.id
                                    children={
                                        let payments = payments.clone();
                                        move |payment| {
                                            let payments = payments.clone();
                                            let id = payment.id;
                                            let row = payment.clone();
                                            let (label, class) = status_badge(payment.status);
                                            view! {
                                                <tr
                                                    class=move || {
                                                        if selected.get().map(|p| p.id) == Some(id) {
                                                            "bg-primary/10 cursor-pointer"
                                                        } else {
                                                            "cursor-pointer"
                                                        }
                                                    }
                                                    on:click=move |_| payments.set_selected(row.clone())
                                                >
                                                    <td class="font-mono">{format!("#{}", payment.student_id)}</td>
                                                    <td>{payment.semester.clone()}</td>
                                                    <td class="font-mono">{format_cents(payment.amount_cents)}</td>
                                                    <td><div class=class>{label}</div></td>
                                                    <td class="hidden md:table-cell text-sm opacity-70">
                                                        {payment.created_at.format("%Y-%m-%d %H:%M").to_string()}
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
