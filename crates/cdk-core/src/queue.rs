use serde::Serialize;
use std::time::Duration;

use crate::error::Result;
use crate::resource::{Resource, ResourceHandle};
use crate::stack::Scope;
use crate::token::Token;

pub const QUEUE_RESOURCE_TYPE: &str = "AWS::SQS::Queue";

/// 队列配置
#[derive(Debug, Clone, PartialEq)]
pub struct QueueProps {
    /// 可见性超时
    pub visibility_timeout: Duration,

    /// 队列名称（不设置时由部署方生成）
    pub queue_name: Option<String>,

    /// 消息保留时间
    pub retention_period: Option<Duration>,
}

impl Default for QueueProps {
    fn default() -> Self {
        Self {
            visibility_timeout: Duration::from_secs(30),
            queue_name: None,
            retention_period: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct QueueProperties<'a> {
    visibility_timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    queue_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_retention_period: Option<u64>,
}

/// 已注册的消息队列
#[derive(Debug, Clone)]
pub struct Queue {
    handle: ResourceHandle,
}

impl Queue {
    pub fn new(scope: &mut dyn Scope, id: &str, props: QueueProps) -> Result<Self> {
        let properties = QueueProperties {
            visibility_timeout: props.visibility_timeout.as_secs(),
            queue_name: props.queue_name.as_deref(),
            message_retention_period: props.retention_period.map(|d| d.as_secs()),
        };
        let resource = Resource::from_props(id, QUEUE_RESOURCE_TYPE, &properties)?;
        let handle = scope.register(resource)?;

        Ok(Self { handle })
    }

    pub fn handle(&self) -> &ResourceHandle {
        &self.handle
    }

    pub fn queue_name(&self) -> Token {
        self.handle.attribute("QueueName")
    }

    pub fn queue_arn(&self) -> Token {
        self.handle.attribute("Arn")
    }

    pub fn queue_url(&self) -> Token {
        self.handle.reference()
    }
}
