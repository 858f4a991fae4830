#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::anyhow;
    use serde_json::json;
    use tokio::time::sleep;

    use crate::modules::aggregator::process_modules;
    use crate::modules::static_fields::StaticModule;
    use crate::modules::{DataModule, FnModule, ModuleData};
    use crate::tests::common::map;

    #[tokio::test]
    async fn no_modules_produce_an_empty_map() {
        let data = process_modules(&[]).await.unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn immediate_and_delayed_modules_are_combined() {
        let modules: Vec<Arc<dyn DataModule>> = vec![
            Arc::new(FnModule::new("sync", || async { Ok(map(json!({"foo": "bar"}))) })),
            Arc::new(FnModule::new("delayed", || async {
                sleep(Duration::from_millis(100)).await;
                Ok(map(json!({"hello": "world"})))
            })),
        ];

        let data = process_modules(&modules).await.unwrap();
        assert_eq!(data["foo"], "bar");
        assert_eq!(data["hello"], "world");
    }

    #[tokio::test]
    async fn later_modules_win_even_when_they_finish_first() {
        let modules: Vec<Arc<dyn DataModule>> = vec![
            Arc::new(FnModule::new("slow", || async {
                sleep(Duration::from_millis(50)).await;
                Ok(map(json!({"fingerprint": "slow", "slowOnly": 1})))
            })),
            Arc::new(StaticModule::new(map(json!({"fingerprint": "fast"})))),
        ];

        let data = process_modules(&modules).await.unwrap();
        assert_eq!(data["fingerprint"], "fast");
        assert_eq!(data["slowOnly"], 1);
    }

    #[tokio::test]
    async fn nested_objects_are_replaced_not_merged() {
        let modules: Vec<Arc<dyn DataModule>> = vec![
            Arc::new(StaticModule::new(map(json!({"leadSource": {"campaign": "a", "medium": "b"}})))),
            Arc::new(StaticModule::new(map(json!({"leadSource": {"campaign": "c"}})))),
        ];

        let data = process_modules(&modules).await.unwrap();
        assert_eq!(data["leadSource"], json!({"campaign": "c"}));
    }

    #[tokio::test]
    async fn modules_run_concurrently() {
        let slow = || async {
            sleep(Duration::from_millis(200)).await;
            Ok::<_, anyhow::Error>(ModuleData::new())
        };
        let modules: Vec<Arc<dyn DataModule>> = vec![
            Arc::new(FnModule::new("a", slow)),
            Arc::new(FnModule::new("b", slow)),
            Arc::new(FnModule::new("c", slow)),
        ];

        let start = tokio::time::Instant::now();
        process_modules(&modules).await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(550), "modules ran sequentially");
    }

    #[tokio::test]
    async fn one_failing_module_fails_the_aggregation() {
        let modules: Vec<Arc<dyn DataModule>> = vec![
            Arc::new(StaticModule::new(map(json!({"foo": "bar"})))),
            Arc::new(FnModule::new("fingerprint", || async { Err(anyhow!("device unavailable")) })),
        ];

        let err = process_modules(&modules).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("fingerprint"), "{}", message);
        assert!(message.contains("device unavailable"), "{}", message);
    }
}
