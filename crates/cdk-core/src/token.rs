use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// 属性值：字面量或对其他资源的延迟引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
    /// 字面字符串
    Literal(String),

    /// 引用资源本身（模板中的 `Ref`）
    Ref(String),

    /// 引用资源属性（模板中的 `Fn::GetAtt`）
    GetAtt(String, String),
}

impl Token {
    pub fn literal(value: impl Into<String>) -> Self {
        Token::Literal(value.into())
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Token::Literal(_))
    }

    /// 被引用资源的逻辑 ID
    pub fn target(&self) -> Option<&str> {
        match self {
            Token::Literal(_) => None,
            Token::Ref(id) | Token::GetAtt(id, _) => Some(id),
        }
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::Literal(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::Literal(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(v) => f.write_str(v),
            Token::Ref(id) => write!(f, "${{Token[Ref:{}]}}", id),
            Token::GetAtt(id, attr) => write!(f, "${{Token[{}.{}]}}", id, attr),
        }
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Token::Literal(v) => serializer.serialize_str(v),
            Token::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id)?;
                map.end()
            }
            Token::GetAtt(id, attr) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[id, attr])?;
                map.end()
            }
        }
    }
}
