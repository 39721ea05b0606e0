use serde::Serialize;

use crate::error::Result;
use crate::resource::{Resource, ResourceHandle};
use crate::stack::Scope;
use crate::token::Token;

pub const TOPIC_RESOURCE_TYPE: &str = "AWS::SNS::Topic";

/// 通知主题配置
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
}

/// 已注册的通知主题
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    handle: ResourceHandle,
}

impl Topic {
    pub fn new(scope: &mut dyn Scope, id: &str, props: TopicProps) -> Result<Self> {
        let resource = Resource::from_props(id, TOPIC_RESOURCE_TYPE, &props)?;
        let handle = scope.register(resource)?;

        Ok(Self { handle })
    }

    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    /// 主题 ARN（`Ref` 返回 ARN）
    pub fn topic_arn(&self) -> Token {
        self.handle.reference()
    }

    pub fn topic_name(&self) -> Token {
        self.handle.attribute("TopicName")
    }
}
