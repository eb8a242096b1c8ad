//! Operation metadata and execution traits

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Metadata every operation carries
///
/// Normally generated by `#[operation(verb = ..., noun = ..., description = ...)]`.
pub trait Operation: Send + Sync {
    /// The action, e.g. "create"
    fn verb(&self) -> &'static str;

    /// The target entity, e.g. "lineage"
    fn noun(&self) -> &'static str;

    /// Human readable summary
    fn description(&self) -> &'static str;

    /// Canonical op string, e.g. "create lineage"
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Execute an operation against a context `C`, failing with `E`
#[async_trait]
pub trait Execute<C, E>: Operation
where
    C: Send + Sync,
    E: Send,
{
    /// Run the operation
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;

    /// Resource ids touched by a successful execution (used for per-resource logs)
    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogEntry;

    struct Ping;

    impl Operation for Ping {
        fn verb(&self) -> &'static str {
            "ping"
        }

        fn noun(&self) -> &'static str {
            "store"
        }

        fn description(&self) -> &'static str {
            "Check the store responds"
        }
    }

    #[async_trait]
    impl Execute<(), String> for Ping {
        async fn execute(&self, _ctx: &()) -> ExecutionResult<Value, String> {
            let value = serde_json::json!({"pong": true});
            ExecutionResult::Logged {
                log_entry: LogEntry::new(self.op_string(), Value::Null, value.clone(), None, 0),
                value,
            }
        }
    }

    #[test]
    fn test_op_string() {
        assert_eq!(Ping.op_string(), "ping store");
    }

    #[tokio::test]
    async fn test_execute_logged() {
        let result = Ping.execute(&()).await;
        assert!(result.should_log());
        let (value, entry) = result.split();
        assert_eq!(value.unwrap()["pong"], true);
        assert_eq!(entry.unwrap().op, "ping store");
    }
}
