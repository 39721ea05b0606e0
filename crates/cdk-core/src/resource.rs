use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::token::Token;

/// 待注册的资源定义
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// 构造 ID（在同一 Scope 内唯一）
    pub id: String,

    /// 资源类型，例如 `AWS::SQS::Queue`
    pub resource_type: String,

    /// 资源属性
    pub properties: Map<String, Value>,
}

impl Resource {
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            properties: Map::new(),
        }
    }

    /// 由可序列化的属性结构体创建资源
    pub fn from_props<P: Serialize>(
        id: impl Into<String>,
        resource_type: impl Into<String>,
        props: &P,
    ) -> Result<Self> {
        let properties = match serde_json::to_value(props)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("Value".to_string(), other);
                map
            }
        };

        Ok(Self {
            id: id.into(),
            resource_type: resource_type.into(),
            properties,
        })
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// 注册成功后返回的资源句柄
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    pub construct_id: String,
    pub logical_id: String,
    pub resource_type: String,
}

impl ResourceHandle {
    pub fn reference(&self) -> Token {
        Token::Ref(self.logical_id.clone())
    }

    pub fn attribute(&self, name: impl Into<String>) -> Token {
        Token::GetAtt(self.logical_id.clone(), name.into())
    }
}
