//! 控制面板统计聚合
//!
//! 面板顶部的统计卡片不依赖专门的统计端点：
//! 拉取学生、房间、缴费三张列表后在客户端折叠出汇总值。
//! 折叠本身是纯函数，网络部分只在 wasm 侧。

use dormdesk_shared::{Payment, PaymentStatus, Room, Student};

/// 面板统计值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total_students: usize,
    pub total_rooms: usize,
    /// 全部房间的剩余床位之和
    pub free_beds: u64,
    /// 待审批的缴费笔数
    pub pending_payments: usize,
}

/// 把三张实体列表折叠成统计值
pub fn aggregate(students: &[Student], rooms: &[Room], payments: &[Payment]) -> DashboardStats {
    DashboardStats {
        total_students: students.len(),
        total_rooms: rooms.len(),
        free_beds: rooms.iter().map(|r| u64::from(r.free_beds())).sum(),
        pending_payments: payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Pending)
            .count(),
    }
}

// =========================================================
// wasm 侧加载
// =========================================================

#[cfg(target_arch = "wasm32")]
pub async fn load_dashboard_stats(
    api: &crate::session::AppApi,
) -> Result<DashboardStats, crate::api::ApiError> {
    use dormdesk_shared::protocol::{ListPaymentsRequest, ListRoomsRequest, ListStudentsRequest};

    // 串行拉取即可：面板首屏，无并发要求
    let students = api.send(&ListStudentsRequest).await?;
    let rooms = api.send(&ListRoomsRequest).await?;
    let payments = api.send(&ListPaymentsRequest).await?;
    Ok(aggregate(&students, &rooms, &payments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dormdesk_shared::chrono::{NaiveDate, TimeZone, Utc};

    fn student(id: u64) -> Student {
        Student {
            id,
            user_id: None,
            first_name: "一".to_string(),
            last_name: "学生".to_string(),
            email: format!("s{}@test.com", id),
            phone: None,
            room_id: None,
            enrolled_at: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        }
    }

    fn room(id: u64, capacity: u32, occupied: u32) -> Room {
        Room {
            id,
            number: format!("{}", 100 + id),
            floor: 1,
            room_type_id: 1,
            capacity,
            occupied,
            notes: None,
        }
    }

    fn payment(id: u64, status: PaymentStatus) -> Payment {
        Payment {
            id,
            student_id: 1,
            amount_cents: 120_000,
            semester: "2025-秋".to_string(),
            status,
            created_at: Utc.with_ymd_and_hms(2025, 9, 5, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn aggregates_counts_and_free_beds() {
        let students = vec![student(1), student(2), student(3)];
        let rooms = vec![room(1, 4, 2), room(2, 2, 2), room(3, 6, 1)];
        let payments = vec![
            payment(1, PaymentStatus::Pending),
            payment(2, PaymentStatus::Approved),
            payment(3, PaymentStatus::Pending),
            payment(4, PaymentStatus::Rejected),
        ];

        let stats = aggregate(&students, &rooms, &payments);
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.total_rooms, 3);
        assert_eq!(stats.free_beds, 2 + 0 + 5);
        assert_eq!(stats.pending_payments, 2);
    }

    #[test]
    fn empty_inputs_fold_to_default() {
        assert_eq!(aggregate(&[], &[], &[]), DashboardStats::default());
    }
}
