use async_trait::async_trait;

use crate::error::CascadeResult;
use crate::model::Model;

/// Observer for the delete/restore lifecycle of a model type.
///
/// The pre-transition methods run synchronously before the persistence layer
/// commits the state change; returning an error aborts the transition. The
/// post-transition methods run after the change is applied.
#[async_trait]
pub trait ModelObserver: Send + Sync {
    async fn deleting(&self, _model: &dyn Model) -> CascadeResult<()> {
        Ok(())
    }

    async fn deleted(&self, _model: &dyn Model) -> CascadeResult<()> {
        Ok(())
    }

    async fn restoring(&self, _model: &dyn Model) -> CascadeResult<()> {
        Ok(())
    }

    async fn restored(&self, _model: &dyn Model) -> CascadeResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CascadeError;
    use std::any::Any;
    use std::sync::{Arc, Mutex};

    struct TestUser;

    #[async_trait]
    impl Model for TestUser {
        fn model_name(&self) -> &'static str {
            "user"
        }

        async fn delete(&self) -> CascadeResult<()> {
            Ok(())
        }

        async fn restore(&self) -> CascadeResult<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Clone)]
    struct TrackingObserver {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl TrackingObserver {
        fn new() -> Self {
            Self {
                events: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn get_events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelObserver for TrackingObserver {
        async fn deleting(&self, model: &dyn Model) -> CascadeResult<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("deleting: {}", model.model_name()));
            Ok(())
        }

        async fn restored(&self, model: &dyn Model) -> CascadeResult<()> {
            self.events
                .lock()
                .unwrap()
                .push(format!("restored: {}", model.model_name()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_observer_defaults_are_no_ops() {
        struct Silent;

        #[async_trait]
        impl ModelObserver for Silent {}

        let observer = Silent;
        assert!(observer.deleting(&TestUser).await.is_ok());
        assert!(observer.deleted(&TestUser).await.is_ok());
        assert!(observer.restoring(&TestUser).await.is_ok());
        assert!(observer.restored(&TestUser).await.is_ok());
    }

    #[tokio::test]
    async fn test_observer_receives_events() {
        let observer = TrackingObserver::new();

        observer.deleting(&TestUser).await.unwrap();
        observer.restored(&TestUser).await.unwrap();

        let events = observer.get_events();
        assert_eq!(events, vec!["deleting: user", "restored: user"]);
    }

    #[tokio::test]
    async fn test_observer_error_surfaces() {
        struct FailingObserver;

        #[async_trait]
        impl ModelObserver for FailingObserver {
            async fn deleting(&self, _model: &dyn Model) -> CascadeResult<()> {
                Err(CascadeError::configuration("deletion not allowed"))
            }
        }

        let observer = FailingObserver;
        let result = observer.deleting(&TestUser).await;

        assert!(matches!(result, Err(CascadeError::Configuration { .. })));
    }
}
