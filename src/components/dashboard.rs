//! 控制面板：统计卡片 + 最近缴费
//!
//! 统计值由客户端聚合（见 `stores::stats`），不依赖统计端点。

use crate::components::icons::RefreshCw;
use crate::components::layout::{AppShell, Toast};
use crate::session::use_api;
use crate::stores::stats::{DashboardStats, load_dashboard_stats};
use crate::stores::use_stores;
use dormdesk_shared::protocol::ListPaymentsRequest;
use dormdesk_shared::{PaymentStatus, format_cents};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = use_api();
    let stores = use_stores();
    let payments = stores.payments.clone();

    let (stats, set_stats) = signal(DashboardStats::default());
    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Option::<(String, bool)>::None);

    let load = {
        let api = api.clone();
        let payments = payments.clone();
        move || {
            let api = api.clone();
            let payments = payments.clone();
            set_loading.set(true);
            spawn_local(async move {
                match load_dashboard_stats(&api).await {
                    Ok(s) => set_stats.set(s),
                    Err(e) => set_notice.set(Some((format!("统计加载失败: {}", e.user_message()), true))),
                }
                // 最近缴费列表复用缴费 store 的缓存
                match api.send(&ListPaymentsRequest).await {
                    Ok(list) => payments.set_list(list),
                    Err(e) => set_notice.set(Some((format!("缴费加载失败: {}", e.user_message()), true))),
                }
                set_loading.set(false);
            });
        }
    };
    load();

    // 列表信号是 Copy 的，闭包可以随处复制
    let payments_list = payments.list;
    let recent_payments = move || {
        payments_list.with(|list| {
            let mut items = list.clone();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            items.truncate(5);
            items
        })
    };

    let status_badge = |status: PaymentStatus| match status {
        PaymentStatus::Pending => ("待审批", "badge badge-warning badge-outline"),
        PaymentStatus::Approved => ("已通过", "badge badge-success badge-outline"),
        PaymentStatus::Rejected => ("已驳回", "badge badge-error badge-outline"),
    };

    view! {
        <AppShell>
            <Toast notice=notice set_notice=set_notice />
            <div class="max-w-5xl mx-auto space-y-8">
                <div class="flex items-center justify-between">
                    <h2 class="text-2xl font-bold">"控制面板"</h2>
                    <button
                        on:click=move |_| load()
                        disabled=move || loading.get()
                        class="btn btn-ghost btn-circle"
                    >
                        <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                </div>

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-title">"在住学生"</div>
                        <div class="stat-value text-primary">{move || stats.get().total_students}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"房间总数"</div>
                        <div class="stat-value">{move || stats.get().total_rooms}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"剩余床位"</div>
                        <div class="stat-value text-success">{move || stats.get().free_beds}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"待审批缴费"</div>
                        <div class="stat-value text-warning">{move || stats.get().pending_payments}</div>
                    </div>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="p-6 pb-2">
                            <h3 class="card-title">"最近缴费"</h3>
                        </div>
                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"学生"</th>
                                        <th>"学期"</th>
                                        <th>"金额"</th>
                                        <th>"状态"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || recent_payments().is_empty() && !loading.get()>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                "暂无缴费记录。"
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=recent_payments
                                        key=|p| p.id
                                        children=move |payment| {
                                            let (label, class) = status_badge(payment.status);
                                            view! {
                                                <tr>
                                                    <td class="font-mono">{format!("#{}", payment.student_id)}</td>
                                                    <td>{payment.semester.clone()}</td>
                                                    <td class="font-mono">{format_cents(payment.amount_cents)}</td>
                                                    <td><div class=class>{label}</div></td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </div>
        </AppShell>
    }
}
