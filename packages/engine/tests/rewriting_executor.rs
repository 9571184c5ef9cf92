use std::sync::Mutex;

use async_trait::async_trait;
use geosql_engine::{
    DialectRewriter, GeosqlError, QueryTransport, RewriteConfig, RewritingExecutor,
    StatementRewriter,
};

#[derive(Default)]
struct RecordingTransport {
    executed: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait(?Send)]
impl QueryTransport for RecordingTransport {
    async fn execute(&self, sql: &str) -> Result<(), GeosqlError> {
        if self.fail {
            return Err(GeosqlError::new("transport unavailable"));
        }
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(())
    }
}

struct CountingRewriter {
    calls: Mutex<usize>,
}

impl StatementRewriter for CountingRewriter {
    fn rewrite(&self, sql: &str) -> String {
        *self.calls.lock().unwrap() += 1;
        format!("{sql} /* rewritten */")
    }
}

#[tokio::test]
async fn executor_sends_rewritten_statement_to_transport() {
    let rewriter = DialectRewriter::new(RewriteConfig::with_default_namespace("catalog1"));
    let executor = RewritingExecutor::new(rewriter, RecordingTransport::default());

    executor
        .execute("SELECT name AS \"n\" FROM places")
        .await
        .unwrap();

    let executed = executor.transport().executed.lock().unwrap().clone();
    assert_eq!(executed, vec!["SELECT name AS `n` FROM catalog1.places"]);
    assert_eq!(executor.rewriter().config().default_namespace, "catalog1");
}

#[tokio::test]
async fn executor_rewrites_exactly_once_per_statement() {
    let rewriter = CountingRewriter {
        calls: Mutex::new(0),
    };
    let executor = RewritingExecutor::new(rewriter, RecordingTransport::default());

    executor.execute("SELECT 1").await.unwrap();
    executor.execute("SELECT 2").await.unwrap();

    assert_eq!(*executor.rewriter().calls.lock().unwrap(), 2);
    let executed = executor.transport().executed.lock().unwrap().clone();
    assert_eq!(
        executed,
        vec!["SELECT 1 /* rewritten */", "SELECT 2 /* rewritten */"]
    );
}

#[tokio::test]
async fn transport_errors_propagate() {
    let executor = RewritingExecutor::new(
        DialectRewriter::default(),
        RecordingTransport {
            fail: true,
            ..Default::default()
        },
    );

    let error = executor.execute("SELECT 1").await.unwrap_err();
    assert_eq!(error.message, "transport unavailable");
}
