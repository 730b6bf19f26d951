//! 响应信封归一化
//!
//! 后端的响应有两种形态：裸负载（对象或数组），或者包装在
//! `{ "data": ... }` 信封里。消费方必须两种都能接受。
//! 这里把判定收敛到 API 边界的一个显式解码步骤：
//! 两种形态都解不出来时大声失败，而不是悄悄返回默认值。

use serde::de::DeserializeOwned;
use serde_json::Value;

/// 信封解码错误
#[derive(Debug)]
pub enum EnvelopeError {
    /// 响应体不是合法 JSON
    NotJson(String),
    /// 裸负载与 `data` 信封都无法匹配目标类型
    ShapeMismatch {
        bare: String,
        enveloped: Option<String>,
    },
}

impl std::fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeError::NotJson(msg) => write!(f, "响应体不是合法 JSON: {}", msg),
            EnvelopeError::ShapeMismatch { bare, enveloped } => {
                write!(f, "响应形态不匹配: 裸负载解析失败 ({})", bare)?;
                match enveloped {
                    Some(msg) => write!(f, "; data 信封解析失败 ({})", msg),
                    None => write!(f, "; 响应中也没有 data 字段"),
                }
            }
        }
    }
}

impl std::error::Error for EnvelopeError {}

/// 把两种响应形态归一化为一个类型化结果
///
/// 规则：
/// 1. 空响应体按 JSON `null` 处理（204 风格的删除端点返回 `()`）。
/// 2. 先尝试裸负载。
/// 3. 失败后，若顶层对象带有 `data` 字段，再尝试信封内容。
/// 4. 两者都失败则返回携带两条解析错误的 [`EnvelopeError`]。
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, EnvelopeError> {
    let trimmed = body.trim();
    let value: Value = if trimmed.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(trimmed).map_err(|e| EnvelopeError::NotJson(e.to_string()))?
    };

    let bare_err = match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => return Ok(parsed),
        Err(e) => e.to_string(),
    };

    let enveloped_err = match value.get("data") {
        Some(inner) => match serde_json::from_value::<T>(inner.clone()) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => Some(e.to_string()),
        },
        None => None,
    };

    Err(EnvelopeError::ShapeMismatch {
        bare: bare_err,
        enveloped: enveloped_err,
    })
}

/// 从错误响应体里提取人类可读的消息
///
/// 约定俗成的两种字段：`{"message": "..."}` 或 `{"error": "..."}`。
/// 都没有时返回 None，调用方自行使用通用兜底文案。
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    for key in ["message", "error"] {
        if let Some(msg) = value.get(key).and_then(Value::as_str) {
            if !msg.is_empty() {
                return Some(msg.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LoginResponse, Room};

    #[test]
    fn decodes_bare_payload() {
        let body = r#"{"token":"abc","user":{"id":1,"name":"Admin","email":"a@t.com","role":{"name":"admin"}}}"#;
        let parsed: LoginResponse = decode_envelope(body).unwrap();
        assert_eq!(parsed.token, "abc");
    }

    #[test]
    fn decodes_data_envelope() {
        let body = r#"{"data":{"token":"abc","user":{"id":1,"name":"Admin","email":"a@t.com","role":{"name":"admin"}}}}"#;
        let parsed: LoginResponse = decode_envelope(body).unwrap();
        assert_eq!(parsed.user.role.name, "admin");
    }

    #[test]
    fn decodes_enveloped_array() {
        let body = r#"{"data":[{"id":1,"number":"101","floor":1,"room_type_id":1,"capacity":4,"occupied":2}]}"#;
        let rooms: Vec<Room> = decode_envelope(body).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].free_beds(), 2);
    }

    #[test]
    fn empty_body_is_unit() {
        decode_envelope::<()>("").unwrap();
        decode_envelope::<()>("   ").unwrap();
    }

    #[test]
    fn neither_shape_fails_loudly() {
        let err = decode_envelope::<LoginResponse>(r#"{"data":{"nope":true}}"#).unwrap_err();
        match err {
            EnvelopeError::ShapeMismatch { enveloped, .. } => assert!(enveloped.is_some()),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn invalid_json_fails_loudly() {
        let err = decode_envelope::<Vec<Room>>("<html>502</html>").unwrap_err();
        assert!(matches!(err, EnvelopeError::NotJson(_)));
    }

    #[test]
    fn error_message_extraction() {
        assert_eq!(
            extract_error_message(r#"{"message":"密码错误"}"#).as_deref(),
            Some("密码错误")
        );
        assert_eq!(
            extract_error_message(r#"{"error":"invalid credentials"}"#).as_deref(),
            Some("invalid credentials")
        );
        assert_eq!(extract_error_message(r#"{"status":500}"#), None);
        assert_eq!(extract_error_message("not json"), None);
    }
}
