//! In-process producers

use crate::error::HaetaeResult;
use crate::producer::Producer;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::{Map, Value};

type ProduceFn = dyn Fn() -> BoxFuture<'static, HaetaeResult<Value>> + Send + Sync;

/// Producer backed by an async closure
pub struct FnProducer {
    name: String,
    func: Box<ProduceFn>,
}

impl FnProducer {
    /// Wrap an async closure
    ///
    /// ```rust,ignore
    /// let env = FnProducer::new("os", || async { Ok(json!({"os": std::env::consts::OS})) });
    /// ```
    pub fn new<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = HaetaeResult<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(move || Box::pin(func())),
        }
    }

    /// Producer that always yields a clone of `value`
    pub fn constant(value: Value) -> Self {
        Self::new("constant", move || {
            let value = value.clone();
            async move { Ok(value) }
        })
    }
}

#[async_trait]
impl Producer for FnProducer {
    async fn produce(&self) -> HaetaeResult<Value> {
        (self.func)().await
    }

    fn describe(&self) -> String {
        format!("fn {}", self.name)
    }
}

/// Default env producer: every run happens in the same (empty) environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEnv;

#[async_trait]
impl Producer for EmptyEnv {
    async fn produce(&self) -> HaetaeResult<Value> {
        Ok(Value::Object(Map::new()))
    }

    fn describe(&self) -> String {
        "{}".to_string()
    }
}
