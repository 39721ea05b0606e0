use cdk_alarms::{AlarmCollectionBuilder, EvaluationWindow, MetricId, Threshold};
use cdk_core::{Queue, QueueProps, Stack, Topic, TopicProps};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut stack = Stack::new("QueueAlarmsDemo");

    let queue = Queue::new(
        &mut stack,
        "OrdersQueue",
        QueueProps {
            visibility_timeout: Duration::from_secs(300),
            ..Default::default()
        },
    )?;
    let topic = Topic::new(
        &mut stack,
        "OrdersAlarmTopic",
        TopicProps {
            display_name: Some("Orders queue alarms".to_string()),
            ..Default::default()
        },
    )?;

    // 最老消息等待超过 10 秒，或持续 10 分钟有积压
    let age_alarms = AlarmCollectionBuilder::new()
        .with_metric(MetricId::SqsApproximateAgeOfOldestMessage)
        .with_dimensions([("QueueName", queue.queue_name())])
        .with_thresholds([
            Threshold::at_or_above(10.0, EvaluationWindow::any_of(1))?,
            Threshold::above(0.0, EvaluationWindow::all_of(10))?,
        ])
        .with_sns_topic(topic.clone())
        .build(&mut stack)?;

    // 30 分钟内没有消息写入
    let idle_alarms = AlarmCollectionBuilder::new()
        .with_metric(MetricId::SqsNumberOfMessagesSent)
        .with_dimensions([("QueueName", queue.queue_name())])
        .with_thresholds([Threshold::at_or_below(0.0, EvaluationWindow::all_of(30))?])
        .with_sns_topic(topic)
        .build(&mut stack)?;

    for alarm in age_alarms.iter().chain(&idle_alarms) {
        println!("{} -> {}", alarm.id(), alarm.handle.logical_id);
    }

    println!("{}", stack.synth_json(true)?);
    Ok(())
}
