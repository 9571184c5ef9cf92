use crate::pipeline::StatementPipeline;
use crate::{GeosqlError, QueryTransport, RewriteConfig};

/// Turns a client statement into one the target engine accepts.
pub trait StatementRewriter: Send + Sync {
    fn rewrite(&self, sql: &str) -> String;
}

/// The rule pipeline bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct DialectRewriter {
    config: RewriteConfig,
}

impl DialectRewriter {
    pub fn new(config: RewriteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }
}

impl StatementRewriter for DialectRewriter {
    fn rewrite(&self, sql: &str) -> String {
        StatementPipeline::new(&self.config).rewrite(sql)
    }
}

/// Generic execution path: every submitted statement is rewritten exactly
/// once and the result goes straight to the transport.
pub struct RewritingExecutor<R, T> {
    rewriter: R,
    transport: T,
}

impl<R, T> RewritingExecutor<R, T>
where
    R: StatementRewriter,
    T: QueryTransport,
{
    pub fn new(rewriter: R, transport: T) -> Self {
        Self {
            rewriter,
            transport,
        }
    }

    pub async fn execute(&self, sql: &str) -> Result<(), GeosqlError> {
        let rewritten = self.rewriter.rewrite(sql);
        log::debug!("executing rewritten statement: {rewritten}");
        self.transport.execute(&rewritten).await
    }

    pub fn rewriter(&self) -> &R {
        &self.rewriter
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
