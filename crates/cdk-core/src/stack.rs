use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{CdkError, Result};
use crate::resource::{Resource, ResourceHandle};

/// CloudFormation 逻辑 ID 的最大长度
const MAX_LOGICAL_ID_LEN: usize = 255;
const HASH_LEN: usize = 8;

/// 资源注册接收端
pub trait Scope {
    /// 节点路径
    fn path(&self) -> &str;

    /// 构造 ID 是否已注册
    fn contains(&self, construct_id: &str) -> bool;

    /// 注册资源定义，返回资源句柄
    fn register(&mut self, resource: Resource) -> Result<ResourceHandle>;
}

/// 栈：按注册顺序保存资源定义，并可合成为模板
pub struct Stack {
    name: String,
    description: Option<String>,
    entries: Vec<(ResourceHandle, Resource)>,
    index: HashMap<String, usize>,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按注册顺序返回资源句柄
    pub fn handles(&self) -> impl Iterator<Item = &ResourceHandle> {
        self.entries.iter().map(|(handle, _)| handle)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&ResourceHandle, &Resource)> {
        self.entries.iter().map(|(handle, resource)| (handle, resource))
    }

    pub fn get(&self, construct_id: &str) -> Option<(&ResourceHandle, &Resource)> {
        self.index
            .get(construct_id)
            .map(|&i| (&self.entries[i].0, &self.entries[i].1))
    }

    /// 合成模板
    pub fn synth(&self) -> Value {
        let mut resources = Map::new();
        for (handle, resource) in &self.entries {
            let mut body = Map::new();
            body.insert("Type".to_string(), json!(resource.resource_type));
            if !resource.properties.is_empty() {
                body.insert(
                    "Properties".to_string(),
                    Value::Object(resource.properties.clone()),
                );
            }
            resources.insert(handle.logical_id.clone(), Value::Object(body));
        }

        let mut template = Map::new();
        if let Some(description) = &self.description {
            template.insert("Description".to_string(), json!(description));
        }
        template.insert("Resources".to_string(), Value::Object(resources));

        info!(
            "Synthesized stack {} with {} resources",
            self.name,
            self.entries.len()
        );
        Value::Object(template)
    }

    pub fn synth_json(&self, pretty: bool) -> Result<String> {
        let template = self.synth();
        let json = if pretty {
            serde_json::to_string_pretty(&template)?
        } else {
            serde_json::to_string(&template)?
        };
        Ok(json)
    }
}

impl Scope for Stack {
    fn path(&self) -> &str {
        &self.name
    }

    fn contains(&self, construct_id: &str) -> bool {
        self.index.contains_key(construct_id)
    }

    fn register(&mut self, resource: Resource) -> Result<ResourceHandle> {
        if resource.id.is_empty() || resource.id.contains('/') {
            return Err(CdkError::InvalidId(resource.id));
        }
        if self.index.contains_key(&resource.id) {
            return Err(CdkError::DuplicateId(resource.id));
        }

        let handle = ResourceHandle {
            construct_id: resource.id.clone(),
            logical_id: logical_id(&resource.id),
            resource_type: resource.resource_type.clone(),
        };
        debug!(
            "Registered {} as {} ({})",
            handle.construct_id, handle.logical_id, handle.resource_type
        );

        self.index.insert(resource.id.clone(), self.entries.len());
        self.entries.push((handle.clone(), resource));
        Ok(handle)
    }
}

/// 由构造 ID 生成稳定的逻辑 ID：字母数字部分 + 8 位 SHA-256 摘要
pub fn logical_id(construct_id: &str) -> String {
    let mut human: String = construct_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    human.truncate(MAX_LOGICAL_ID_LEN - HASH_LEN);

    let digest = Sha256::digest(construct_id.as_bytes());
    format!("{}{}", human, hex::encode_upper(&digest[..HASH_LEN / 2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn queue(id: &str) -> Resource {
        Resource::new(id, "AWS::SQS::Queue").with_property("VisibilityTimeout", json!(300))
    }

    #[test]
    fn test_logical_id_is_alphanumeric_and_stable() {
        let a = logical_id("AWS_SQS_ApproximateAgeOfOldestMessage_GreaterThanThreshold_60_0_10_10");
        let b = logical_id("AWS_SQS_ApproximateAgeOfOldestMessage_GreaterThanThreshold_60_0_10_10");

        assert_eq!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(a.starts_with("AWSSQSApproximateAgeOfOldestMessage"));
    }

    #[test]
    fn test_logical_id_distinguishes_separators() {
        assert_ne!(logical_id("Queue_1"), logical_id("Queue1"));
    }

    #[test]
    fn test_logical_id_length_limit() {
        let long = "a".repeat(400);
        assert_eq!(logical_id(&long).len(), MAX_LOGICAL_ID_LEN);
    }

    #[test]
    fn test_register_and_get() {
        let mut stack = Stack::new("TestStack");
        let handle = stack.register(queue("HelloCdkQueue")).unwrap();

        assert_eq!(handle.construct_id, "HelloCdkQueue");
        assert!(handle.logical_id.starts_with("HelloCdkQueue"));
        assert_eq!(stack.len(), 1);

        assert!(stack.contains("HelloCdkQueue"));
        assert!(!stack.contains("Other"));

        let (found, resource) = stack.get("HelloCdkQueue").unwrap();
        assert_eq!(found, &handle);
        assert_eq!(resource.resource_type, "AWS::SQS::Queue");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut stack = Stack::new("TestStack");
        stack.register(queue("Q")).unwrap();

        let err = stack.register(queue("Q")).unwrap_err();
        assert!(matches!(err, CdkError::DuplicateId(id) if id == "Q"));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_invalid_id_rejected() {
        let mut stack = Stack::new("TestStack");
        assert!(matches!(stack.register(queue("")), Err(CdkError::InvalidId(_))));
        assert!(matches!(
            stack.register(queue("AWS/SQS")),
            Err(CdkError::InvalidId(_))
        ));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_synth_preserves_registration_order() {
        let mut stack = Stack::new("TestStack").with_description("test");
        let second = stack.register(queue("Zeta")).unwrap();
        let first = stack.register(Resource::new("Alpha", "AWS::SNS::Topic")).unwrap();

        let template = stack.synth();
        assert_eq!(template["Description"], json!("test"));

        let resources = template["Resources"].as_object().unwrap();
        let keys: Vec<_> = resources.keys().cloned().collect();
        assert_eq!(keys, vec![second.logical_id.clone(), first.logical_id.clone()]);

        assert_eq!(resources[&second.logical_id]["Properties"]["VisibilityTimeout"], json!(300));
        assert!(resources[&first.logical_id].get("Properties").is_none());
    }

    #[test]
    fn test_synth_json() {
        let mut stack = Stack::new("TestStack");
        stack.register(queue("Q")).unwrap();

        let compact = stack.synth_json(false).unwrap();
        assert!(!compact.contains('\n'));

        let parsed: Value = serde_json::from_str(&stack.synth_json(true).unwrap()).unwrap();
        assert_eq!(parsed, stack.synth());
    }
}
