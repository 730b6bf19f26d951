//! 运行时配置
//!
//! 构建环境变量可以覆盖默认值，实现配置解耦：
//! 部署方不改代码即可指向不同的后端。

/// 这些是默认值，如果构建时没有注入对应环境变量，则使用这些值
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_LOCALE: &str = "zh-CN";

/// 运行时配置结构体
///
/// 在编译期从环境变量读取（`option_env!`），运行期不再变化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// 后端 API 基地址（不含末尾斜杠）
    pub api_base_url: String,
    /// 界面默认语言
    pub default_locale: String,
    /// 测试模式开关（只影响测试工具层，业务逻辑不读它）
    pub test_mode: bool,
}

impl RuntimeConfig {
    /// 从构建环境装配配置
    ///
    /// - `DORMDESK_API_URL`: 后端基地址，读不到就用默认值
    /// - `DORMDESK_LOCALE`: 默认语言
    /// - `DORMDESK_TEST_MODE`: 设为 "1" 时开启测试模式
    pub fn from_build_env() -> Self {
        Self::assemble(
            option_env!("DORMDESK_API_URL"),
            option_env!("DORMDESK_LOCALE"),
            option_env!("DORMDESK_TEST_MODE"),
        )
    }

    fn assemble(api: Option<&str>, locale: Option<&str>, test_mode: Option<&str>) -> Self {
        Self {
            api_base_url: api
                .unwrap_or(DEFAULT_API_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            default_locale: locale.unwrap_or(DEFAULT_LOCALE).to_string(),
            test_mode: test_mode == Some("1"),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::assemble(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_absent() {
        let cfg = RuntimeConfig::assemble(None, None, None);
        assert_eq!(cfg.api_base_url, "http://localhost:8000/api");
        assert_eq!(cfg.default_locale, "zh-CN");
        assert!(!cfg.test_mode);
    }

    #[test]
    fn overrides_and_trailing_slash() {
        let cfg = RuntimeConfig::assemble(Some("https://dorm.example.edu/api/"), Some("en"), Some("1"));
        assert_eq!(cfg.api_base_url, "https://dorm.example.edu/api");
        assert_eq!(cfg.default_locale, "en");
        assert!(cfg.test_mode);
    }

    #[test]
    fn test_mode_requires_exact_flag() {
        let cfg = RuntimeConfig::assemble(None, None, Some("true"));
        assert!(!cfg.test_mode);
    }
}
