//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、每条路由的访问元数据，
//! 以及导航守卫的纯函数判定。

use dormdesk_shared::Role;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 控制面板（认证后的着陆页）
    Dashboard,
    /// 学生管理
    Students,
    /// 访客管理
    Guests,
    /// 房间管理
    Rooms,
    /// 房型管理
    RoomTypes,
    /// 缴费记录
    Payments,
    /// 站内消息
    Messages,
    /// 系统设置
    Settings,
    /// 个人资料
    Profile,
    /// 页面未找到
    NotFound,
}

/// 路由访问元数据
///
/// 不变量：`roles` 存在时 `requires_auth` 必为 true
/// （角色限制蕴含认证要求），由测试对全表断言。
/// `roles: Some(&[])` 是合法的"软停用"写法：任何角色都进不去。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    /// None 表示"任何已认证角色"
    pub roles: Option<&'static [Role]>,
    /// 是否出现在侧边栏
    pub sidebar: bool,
    /// 侧边栏分组的父级路由
    pub parent: Option<AppRoute>,
    /// 文档标题
    pub title: &'static str,
}

impl RouteMeta {
    /// 公开路由（无认证要求）的缺省元数据
    const fn public(title: &'static str) -> Self {
        Self {
            requires_auth: false,
            roles: None,
            sidebar: false,
            parent: None,
            title,
        }
    }
}

const MANAGERS: &[Role] = &[Role::Sudo, Role::Admin];
const PAYERS: &[Role] = &[Role::Sudo, Role::Admin, Role::Student];
const SUDO_ONLY: &[Role] = &[Role::Sudo];

impl AppRoute {
    /// 全部路由（守卫矩阵测试与侧边栏构建会遍历它）
    pub const ALL: [AppRoute; 12] = [
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::Dashboard,
        AppRoute::Students,
        AppRoute::Guests,
        AppRoute::Rooms,
        AppRoute::RoomTypes,
        AppRoute::Payments,
        AppRoute::Messages,
        AppRoute::Settings,
        AppRoute::Profile,
        AppRoute::NotFound,
    ];

    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/students" => Self::Students,
            "/guests" => Self::Guests,
            "/rooms" => Self::Rooms,
            "/room-types" => Self::RoomTypes,
            "/payments" => Self::Payments,
            "/messages" => Self::Messages,
            "/settings" => Self::Settings,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Students => "/students",
            Self::Guests => "/guests",
            Self::Rooms => "/rooms",
            Self::RoomTypes => "/room-types",
            Self::Payments => "/payments",
            Self::Messages => "/messages",
            Self::Settings => "/settings",
            Self::Profile => "/profile",
            Self::NotFound => "/404",
        }
    }

    /// 路由访问元数据（静态路由表）
    pub fn meta(&self) -> RouteMeta {
        match self {
            Self::Login => RouteMeta::public("登录"),
            Self::Register => RouteMeta::public("注册"),
            Self::NotFound => RouteMeta::public("页面未找到"),
            Self::Dashboard => RouteMeta {
                requires_auth: true,
                roles: None,
                sidebar: true,
                parent: None,
                title: "控制面板",
            },
            Self::Students => RouteMeta {
                requires_auth: true,
                roles: Some(MANAGERS),
                sidebar: true,
                parent: None,
                title: "学生管理",
            },
            Self::Guests => RouteMeta {
                requires_auth: true,
                roles: Some(MANAGERS),
                sidebar: true,
                parent: None,
                title: "访客管理",
            },
            Self::Rooms => RouteMeta {
                requires_auth: true,
                roles: Some(MANAGERS),
                sidebar: true,
                parent: None,
                title: "房间管理",
            },
            Self::RoomTypes => RouteMeta {
                requires_auth: true,
                roles: Some(MANAGERS),
                sidebar: true,
                parent: Some(AppRoute::Rooms),
                title: "房型管理",
            },
            Self::Payments => RouteMeta {
                requires_auth: true,
                roles: Some(PAYERS),
                sidebar: true,
                parent: None,
                title: "缴费记录",
            },
            Self::Messages => RouteMeta {
                requires_auth: true,
                roles: None,
                sidebar: true,
                parent: None,
                title: "站内消息",
            },
            Self::Settings => RouteMeta {
                requires_auth: true,
                roles: Some(SUDO_ONLY),
                sidebar: true,
                parent: None,
                title: "系统设置",
            },
            Self::Profile => RouteMeta {
                requires_auth: true,
                roles: None,
                sidebar: false,
                parent: None,
                title: "个人资料",
            },
        }
    }

    /// 定义已认证用户是否应该离开此路由（登录/注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 认证失败时的重定向目标（根路由 = 登录页）
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 认证成功后的着陆页
    pub fn landing() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 导航守卫 (Navigation Guard)
// =========================================================

/// 单次导航尝试的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDecision {
    /// 放行
    Allow,
    /// 拒绝：未认证，重定向到根路由（登录页）
    RedirectLogin,
    /// 拒绝：已认证但角色无权限，重定向到着陆页
    RedirectLanding,
}

/// **核心守卫逻辑：纯函数判定**
///
/// 按顺序求值：
/// 1. 无认证要求 → 放行；
/// 2. 需要认证但没有会话 → 重定向到登录页；
/// 3. 带角色限制 → 当前角色在集合内才放行，否则重定向到着陆页
///    （用户已认证，只是无权访问这一条路由）；
/// 4. 无角色限制 → 任何已认证角色放行。
///
/// 守卫内部不做任何异步工作：调用时会话资料必须已经加载完毕。
pub fn decide(meta: &RouteMeta, role_name: Option<&str>) -> NavDecision {
    if !meta.requires_auth {
        return NavDecision::Allow;
    }

    let Some(role_name) = role_name else {
        return NavDecision::RedirectLogin;
    };

    match meta.roles {
        Some(allowed) => {
            if allowed.iter().any(|r| r.as_str() == role_name) {
                NavDecision::Allow
            } else {
                NavDecision::RedirectLanding
            }
        }
        None => NavDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 每条路由对每个角色的期望判定，手工维护的真值表
    fn expected(route: AppRoute, role: Option<Role>) -> NavDecision {
        use AppRoute::*;
        use NavDecision::*;

        // 公开路由对任何人放行
        if matches!(route, Login | Register | NotFound) {
            return Allow;
        }
        // 其余路由一律要求认证
        let Some(role) = role else {
            return RedirectLogin;
        };
        match route {
            Dashboard | Messages | Profile => Allow,
            Students | Guests | Rooms | RoomTypes => match role {
                Role::Sudo | Role::Admin => Allow,
                _ => RedirectLanding,
            },
            Payments => match role {
                Role::Sudo | Role::Admin | Role::Student => Allow,
                Role::Guest => RedirectLanding,
            },
            Settings => match role {
                Role::Sudo => Allow,
                _ => RedirectLanding,
            },
            Login | Register | NotFound => unreachable!(),
        }
    }

    #[test]
    fn guard_matrix_is_exhaustive() {
        for route in AppRoute::ALL {
            let meta = route.meta();
            for role in Role::ALL {
                assert_eq!(
                    decide(&meta, Some(role.as_str())),
                    expected(route, Some(role)),
                    "route {:?} role {:?}",
                    route,
                    role,
                );
            }
            assert_eq!(
                decide(&meta, None),
                expected(route, None),
                "route {:?} unauthenticated",
                route,
            );
        }
    }

    #[test]
    fn roles_imply_requires_auth() {
        for route in AppRoute::ALL {
            let meta = route.meta();
            if meta.roles.is_some() {
                assert!(meta.requires_auth, "route {:?} violates invariant", route);
            }
        }
    }

    #[test]
    fn unauthorized_role_lands_on_dashboard_not_login() {
        // sudo 专属路由 + admin 会话：重定向到着陆页而不是登录页
        let meta = AppRoute::Settings.meta();
        assert_eq!(decide(&meta, Some("admin")), NavDecision::RedirectLanding);
    }

    #[test]
    fn empty_role_set_soft_disables_route() {
        let disabled = RouteMeta {
            requires_auth: true,
            roles: Some(&[]),
            sidebar: false,
            parent: None,
            title: "停用",
        };
        for role in Role::ALL {
            assert_eq!(
                decide(&disabled, Some(role.as_str())),
                NavDecision::RedirectLanding
            );
        }
        // 未认证时仍然优先踢回登录页
        assert_eq!(decide(&disabled, None), NavDecision::RedirectLogin);
    }

    #[test]
    fn missing_restrictions_mean_public() {
        let public = RouteMeta::public("公开页");
        assert_eq!(decide(&public, None), NavDecision::Allow);
        assert_eq!(decide(&public, Some("guest")), NavDecision::Allow);
    }

    #[test]
    fn unknown_role_name_is_denied_membership() {
        // 后端返回了路由表不认识的角色名：不放行带限制的路由
        let meta = AppRoute::Rooms.meta();
        assert_eq!(
            decide(&meta, Some("janitor")),
            NavDecision::RedirectLanding
        );
        // 但无角色限制的认证路由仍然放行
        let dash = AppRoute::Dashboard.meta();
        assert_eq!(decide(&dash, Some("janitor")), NavDecision::Allow);
    }

    #[test]
    fn path_round_trip() {
        for route in AppRoute::ALL {
            if route == AppRoute::NotFound {
                continue;
            }
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/nonsense"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
    }

    #[test]
    fn login_and_register_bounce_authenticated_users() {
        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert!(AppRoute::Register.should_redirect_when_authenticated());
        assert!(!AppRoute::Dashboard.should_redirect_when_authenticated());
    }
}
