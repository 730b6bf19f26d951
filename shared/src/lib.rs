//! DormDesk 共享数据模型
//!
//! 前端与后端 API 之间的领域模型与协议定义。
//! 此 crate 不依赖任何平台 API（无 web_sys / 无 DOM），
//! 可以在 wasm32 与原生目标上编译和测试。

use serde::{Deserialize, Serialize};

pub use chrono;

pub mod envelope;
pub mod protocol;

use chrono::{DateTime, NaiveDate, Utc};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 认证头名称
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// Bearer 方案前缀（拼接 token 时使用）
pub const BEARER_PREFIX: &str = "Bearer ";

// =========================================================
// 角色 (Roles)
// =========================================================

/// 固定的角色集合
///
/// 角色名是贯穿整个系统的唯一授权轴：
/// 路由守卫、侧边栏过滤都只看角色名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 超级管理员
    Sudo,
    /// 宿舍管理员
    Admin,
    /// 在住学生
    Student,
    /// 访客
    Guest,
}

impl Role {
    /// 全部角色（守卫矩阵测试会遍历它）
    pub const ALL: [Role; 4] = [Role::Sudo, Role::Admin, Role::Student, Role::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Sudo => "sudo",
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Guest => "guest",
        }
    }

    /// 从 wire 上的角色名解析，未知名字返回 None
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sudo" => Some(Role::Sudo),
            "admin" => Some(Role::Admin),
            "student" => Some(Role::Student),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 用户身上携带的角色 wire 形态：`{ "name": "admin" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub name: String,
}

impl RoleInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn is(&self, role: Role) -> bool {
        self.name == role.as_str()
    }
}

impl From<Role> for RoleInfo {
    fn from(role: Role) -> Self {
        Self::new(role.as_str())
    }
}

// =========================================================
// 用户 (User)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    /// 组合显示名（后端生成，始终存在）
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    pub role: RoleInfo,
}

impl User {
    pub fn role_name(&self) -> &str {
        &self.role.name
    }

    /// 完整姓名：优先 "first last"，两者缺一则回退到组合显示名
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            _ => self.name.clone(),
        }
    }
}

// =========================================================
// 宿舍实体 (Dormitory Entities)
// =========================================================

/// 房型（容量与月租金定价）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: u64,
    pub name: String,
    pub capacity: u32,
    /// 月租金，以分为单位（避免浮点金额）
    pub monthly_price_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: u64,
    pub number: String,
    pub floor: i32,
    pub room_type_id: u64,
    pub capacity: u32,
    pub occupied: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Room {
    /// 剩余床位（占用数异常超出容量时饱和为 0）
    pub fn free_beds(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<u64>,
    pub enrolled_at: NaiveDate,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// 短期住宿的访客（区别于角色 `Role::Guest`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DormGuest {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 接待该访客的学生
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_student_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<u64>,
    pub check_in: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveDate>,
}

// =========================================================
// 缴费 (Payments)
// =========================================================

/// 审批流转由后端负责，前端只读展示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    pub student_id: u64,
    pub amount_cents: i64,
    pub semester: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// 金额展示：分 -> "¥12.00"
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("¥{}{}.{:02}", sign, abs / 100, abs % 100)
}

// =========================================================
// 消息 (Messages)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub sender_id: u64,
    /// None 表示全员广播
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<u64>,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

// =========================================================
// 系统设置 (Settings)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub default_locale: String,
    pub semester: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub registration_open: bool,
}

// =========================================================
// 认证请求/响应 (Auth Payloads)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: 1,
            name: "张三".to_string(),
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            email: "zhang@test.com".to_string(),
            role: RoleInfo::new("student"),
        }
    }

    #[test]
    fn full_name_prefers_first_and_last() {
        let u = user(Some("San"), Some("Zhang"));
        assert_eq!(u.full_name(), "San Zhang");
    }

    #[test]
    fn full_name_falls_back_to_display_name() {
        assert_eq!(user(None, None).full_name(), "张三");
        assert_eq!(user(Some("San"), None).full_name(), "张三");
        assert_eq!(user(None, Some("Zhang")).full_name(), "张三");
    }

    #[test]
    fn role_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_name(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_name("superuser"), None);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Sudo).unwrap();
        assert_eq!(json, "\"sudo\"");
    }

    #[test]
    fn nested_role_deserializes() {
        let json = r#"{"id":1,"name":"Admin","email":"a@test.com","role":{"name":"admin"}}"#;
        let u: User = serde_json::from_str(json).unwrap();
        assert!(u.role.is(Role::Admin));
        assert_eq!(u.role_name(), "admin");
    }

    #[test]
    fn cents_format() {
        assert_eq!(format_cents(120_000), "¥1200.00");
        assert_eq!(format_cents(5), "¥0.05");
        assert_eq!(format_cents(-150), "¥-1.50");
        assert_eq!(format_cents(-50), "¥-0.50");
    }

    #[test]
    fn free_beds_saturates() {
        let room = Room {
            id: 1,
            number: "301".to_string(),
            floor: 3,
            room_type_id: 1,
            capacity: 2,
            occupied: 5,
            notes: None,
        };
        assert_eq!(room.free_beds(), 0);
    }
}
