use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File, FileFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::StackConfig;

pub const CONFIG_FILE_NAME: &str = "stack.toml";

/// 环境变量前缀，例如 `HELLO_CDK_QUEUE__VISIBILITY_TIMEOUT_SECS=120`
pub const ENV_PREFIX: &str = "HELLO_CDK";

/// 配置加载器
pub struct ConfigLoader {
    config_dir: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    /// 创建配置加载器
    pub fn new<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// 加载栈配置；文件不存在时使用默认配置，环境变量覆盖文件中的值
    pub fn load(&self) -> Result<StackConfig> {
        let config_path = self.config_path();
        let mut builder = Config::builder();

        if config_path.exists() {
            info!("Loading stack config from {}", config_path.display());
            builder = builder.add_source(File::new(
                config_path.to_str().ok_or_else(|| anyhow!("Invalid config path"))?,
                FileFormat::Toml,
            ));
        } else {
            info!(
                "No {} in {}, using defaults",
                CONFIG_FILE_NAME,
                self.config_dir.display()
            );
        }

        let config = builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let stack: StackConfig = config
            .try_deserialize()
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        debug!(
            "Loaded stack {} with {} alarm collections",
            stack.stack.name,
            stack.alarms.len()
        );
        Ok(stack)
    }

    /// 加载并验证配置
    pub fn validate(&self) -> Result<StackConfig> {
        let stack = self.load()?;
        stack.validate()?;
        Ok(stack)
    }

    /// 写出默认配置文件，已存在时报错
    pub fn write_default(&self) -> Result<PathBuf> {
        let config_path = self.config_path();
        if config_path.exists() {
            return Err(anyhow!("{} already exists", config_path.display()));
        }

        fs::create_dir_all(&self.config_dir)
            .with_context(|| format!("Failed to create {}", self.config_dir.display()))?;
        let content = toml::to_string_pretty(&StackConfig::default())?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        info!("Wrote default config to {}", config_path.display());
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdk_alarms::{ComparisonOperator, MetricId, TreatMissingData};
    use cdk_logging::LogFormat;
    use tempfile::tempdir;

    #[test]
    fn test_load_default_config() {
        let temp_dir = tempdir().unwrap();
        let loader = ConfigLoader::new(temp_dir.path()).with_env_prefix("HELLO_CDK_TEST_DEFAULT");

        let config = loader.load().unwrap();
        assert_eq!(config, StackConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_content = r#"
[stack]
name = "OrdersStack"
description = "orders queue with alarms"

[queue]
id = "OrdersQueue"
visibility_timeout_secs = 120

[topic]
enabled = false

[[alarms]]
metric = "sqs_approximate_age_of_oldest_message"
treat_missing_data = "not_breaching"

[[alarms.thresholds]]
comparison = "at_or_above"
threshold = 10
for_any_mins = 1

[[alarms.thresholds]]
comparison = "above"
threshold = 0
for_all_mins = 10

[logging]
level = "debug"
format = "json"
"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let loader = ConfigLoader::new(temp_dir.path()).with_env_prefix("HELLO_CDK_TEST_FILE");
        let config = loader.load().unwrap();

        assert_eq!(config.stack.name, "OrdersStack");
        assert_eq!(config.queue.id, "OrdersQueue");
        assert_eq!(config.queue.visibility_timeout_secs, 120);
        assert!(!config.topic.enabled);
        assert_eq!(config.logging.format, LogFormat::Json);

        let alarm = &config.alarms[0];
        assert_eq!(alarm.metric, MetricId::SqsApproximateAgeOfOldestMessage);
        assert_eq!(alarm.period_secs, 60);
        assert_eq!(alarm.treat_missing_data, TreatMissingData::NotBreaching);
        assert_eq!(alarm.thresholds.len(), 2);
        assert_eq!(
            alarm.thresholds[1].comparison,
            ComparisonOperator::GreaterThanThreshold
        );

        let thresholds = alarm.thresholds().unwrap();
        assert_eq!(thresholds[0].datapoints_to_alarm(), 1);
        assert_eq!(thresholds[1].datapoints_to_alarm(), 10);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[queue]\nvisibility_timeout_secs = 300\n",
        )
        .unwrap();

        std::env::set_var("HELLO_CDK_TEST_ENV_QUEUE__VISIBILITY_TIMEOUT_SECS", "45");
        let loader = ConfigLoader::new(temp_dir.path()).with_env_prefix("HELLO_CDK_TEST_ENV");
        let config = loader.load().unwrap();
        std::env::remove_var("HELLO_CDK_TEST_ENV_QUEUE__VISIBILITY_TIMEOUT_SECS");

        assert_eq!(config.queue.visibility_timeout_secs, 45);
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            r#"
[[alarms]]
metric = "sqs_number_of_messages_sent"

[[alarms.thresholds]]
comparison = "below"
threshold = 1
"#,
        )
        .unwrap();

        let loader = ConfigLoader::new(temp_dir.path()).with_env_prefix("HELLO_CDK_TEST_VALIDATE");
        assert!(loader.load().is_ok());
        assert!(loader.validate().is_err());
    }

    #[test]
    fn test_write_default() {
        let temp_dir = tempdir().unwrap();
        let loader = ConfigLoader::new(temp_dir.path().join("conf"))
            .with_env_prefix("HELLO_CDK_TEST_WRITE");

        let path = loader.write_default().unwrap();
        assert!(path.exists());
        assert!(loader.write_default().is_err());

        let config = loader.validate().unwrap();
        assert_eq!(config, StackConfig::default());
    }
}
