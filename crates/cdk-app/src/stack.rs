use anyhow::{Context, Result};
use cdk_alarms::{Alarm, AlarmCollectionBuilder};
use cdk_config::StackConfig;
use cdk_core::{Queue, QueueProps, Stack, Topic, TopicProps};
use tracing::{info, warn};

/// 队列 + 告警主题 + 告警集合
pub struct HelloCdkStack {
    pub stack: Stack,
    pub queue: Queue,
    pub topic: Option<Topic>,
    pub alarms: Vec<Alarm>,
}

/// 按配置定义整个栈
pub fn build_stack(config: &StackConfig) -> Result<HelloCdkStack> {
    let mut stack = Stack::new(&config.stack.name);
    if let Some(description) = &config.stack.description {
        stack = stack.with_description(description);
    }

    let queue = Queue::new(
        &mut stack,
        &config.queue.id,
        QueueProps {
            visibility_timeout: config.queue.visibility_timeout(),
            queue_name: config.queue.queue_name.clone(),
            retention_period: config.queue.retention_period(),
        },
    )
    .context("Failed to define queue")?;

    let topic = if config.topic.enabled {
        let topic = Topic::new(
            &mut stack,
            &config.topic.id,
            TopicProps {
                display_name: config.topic.display_name.clone(),
                topic_name: None,
            },
        )
        .context("Failed to define alarm topic")?;
        Some(topic)
    } else {
        None
    };

    let mut alarms = Vec::new();
    for alarm in &config.alarms {
        let dimension = match (alarm.metric.dimension_name(), &topic) {
            ("TopicName", Some(topic)) => topic.topic_name(),
            ("TopicName", None) => {
                anyhow::bail!("alarm on {} requires the alarm topic", alarm.metric)
            }
            _ => queue.queue_name(),
        };

        let mut builder = AlarmCollectionBuilder::new()
            .with_metric(alarm.metric)
            .with_dimensions([(alarm.metric.dimension_name(), dimension)])
            .with_period(alarm.period())
            .with_statistic(alarm.statistic)
            .with_treat_missing_data(alarm.treat_missing_data)
            .with_thresholds(alarm.thresholds()?);

        match (&topic, alarm.notify) {
            (Some(topic), true) => builder = builder.with_sns_topic(topic.clone()),
            (None, true) => warn!(
                "Alarm topic disabled, {} alarms will not notify",
                alarm.metric
            ),
            _ => {}
        }

        let built = builder
            .build(&mut stack)
            .with_context(|| format!("Failed to define alarms for {}", alarm.metric))?;
        alarms.extend(built);
    }

    info!(
        "Defined stack {}: {} resources, {} alarms",
        stack.name(),
        stack.len(),
        alarms.len()
    );

    Ok(HelloCdkStack {
        stack,
        queue,
        topic,
        alarms,
    })
}
