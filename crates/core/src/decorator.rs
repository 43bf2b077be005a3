// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Handler traits and the middleware wrapped around every handler.
//!
//! Logging and metrics are passed in explicitly through [`Observability`];
//! handlers never reach for process-wide singletons. The parent span decides
//! where handler spans attach, so each application (and each test) can route
//! its own output.

use crate::error::AppError;
use gymhours_domain::ErrorKind;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{Span, debug, debug_span, warn};

/// Executes a state-changing operation.
pub trait CommandHandler<C>: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the command is rejected or cannot be executed.
    fn handle(&self, command: C) -> Result<(), AppError>;
}

/// Executes a read-only operation.
pub trait QueryHandler<Q, R>: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the query cannot be answered.
    fn handle(&self, query: Q) -> Result<R, AppError>;
}

/// Sink for handler counters.
pub trait MetricsClient: Send + Sync {
    fn inc(&self, key: &str, value: i64);
}

/// Discards every metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsClient for NoOpMetrics {
    fn inc(&self, _key: &str, _value: i64) {}
}

/// Keeps counters in memory.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    counters: Mutex<HashMap<String, i64>>,
}

impl InMemoryMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value of a counter, zero if it was never touched.
    #[must_use]
    pub fn get(&self, key: &str) -> i64 {
        self.counters.lock().get(key).copied().unwrap_or(0)
    }
}

impl MetricsClient for InMemoryMetrics {
    fn inc(&self, key: &str, value: i64) {
        *self.counters.lock().entry(key.to_string()).or_insert(0) += value;
    }
}

/// The logging and metrics handles given to every handler.
#[derive(Clone)]
pub struct Observability {
    span: Span,
    metrics: Arc<dyn MetricsClient>,
}

impl Observability {
    #[must_use]
    pub fn new(span: Span, metrics: Arc<dyn MetricsClient>) -> Self {
        Self { span, metrics }
    }

    /// No parent span and no metrics.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            span: Span::none(),
            metrics: Arc::new(NoOpMetrics),
        }
    }

    #[must_use]
    pub const fn span(&self) -> &Span {
        &self.span
    }

    #[must_use]
    pub fn metrics(&self) -> Arc<dyn MetricsClient> {
        Arc::clone(&self.metrics)
    }
}

impl Debug for Observability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observability")
            .field("span", &self.span)
            .finish_non_exhaustive()
    }
}

/// Opens a span per call and logs the outcome.
pub struct LoggingDecorator<H> {
    base: H,
    name: &'static str,
    parent: Span,
}

impl<H> LoggingDecorator<H> {
    pub const fn new(base: H, name: &'static str, parent: Span) -> Self {
        Self { base, name, parent }
    }
}

fn log_failure(err: &AppError, what: &str) {
    if err.kind() == ErrorKind::Infrastructure {
        warn!(error = %err, slug = err.slug(), "Failed to execute {what}");
    } else {
        debug!(error = %err, slug = err.slug(), "Failed to execute {what}");
    }
}

impl<C: Debug, H: CommandHandler<C>> CommandHandler<C> for LoggingDecorator<H> {
    fn handle(&self, command: C) -> Result<(), AppError> {
        let span = debug_span!(parent: &self.parent, "command", name = self.name, body = ?command);
        let _entered = span.enter();

        debug!("Executing command");
        let result = self.base.handle(command);
        match &result {
            Ok(()) => debug!("Command executed successfully"),
            Err(err) => log_failure(err, "command"),
        }
        result
    }
}

impl<Q: Debug, R, H: QueryHandler<Q, R>> QueryHandler<Q, R> for LoggingDecorator<H> {
    fn handle(&self, query: Q) -> Result<R, AppError> {
        let span = debug_span!(parent: &self.parent, "query", name = self.name, body = ?query);
        let _entered = span.enter();

        debug!("Executing query");
        let result = self.base.handle(query);
        match &result {
            Ok(_) => debug!("Query executed successfully"),
            Err(err) => log_failure(err, "query"),
        }
        result
    }
}

/// Counts successes and failures per handler.
pub struct MetricsDecorator<H> {
    base: H,
    name: &'static str,
    client: Arc<dyn MetricsClient>,
}

impl<H> MetricsDecorator<H> {
    pub fn new(base: H, name: &'static str, client: Arc<dyn MetricsClient>) -> Self {
        Self { base, name, client }
    }

    fn record<T>(&self, prefix: &str, result: &Result<T, AppError>) {
        let outcome = if result.is_ok() { "success" } else { "failure" };
        self.client
            .inc(&format!("{prefix}.{}.{outcome}", self.name), 1);
    }
}

impl<C, H: CommandHandler<C>> CommandHandler<C> for MetricsDecorator<H> {
    fn handle(&self, command: C) -> Result<(), AppError> {
        let result = self.base.handle(command);
        self.record("commands", &result);
        result
    }
}

impl<Q, R, H: QueryHandler<Q, R>> QueryHandler<Q, R> for MetricsDecorator<H> {
    fn handle(&self, query: Q) -> Result<R, AppError> {
        let result = self.base.handle(query);
        self.record("queries", &result);
        result
    }
}

/// Wraps a command handler with logging and metrics.
pub fn apply_command_decorators<C, H>(
    handler: H,
    name: &'static str,
    observability: &Observability,
) -> Box<dyn CommandHandler<C>>
where
    C: Debug + 'static,
    H: CommandHandler<C> + 'static,
{
    Box::new(LoggingDecorator::new(
        MetricsDecorator::new(handler, name, observability.metrics()),
        name,
        observability.span().clone(),
    ))
}

/// Wraps a query handler with logging and metrics.
pub fn apply_query_decorators<Q, R, H>(
    handler: H,
    name: &'static str,
    observability: &Observability,
) -> Box<dyn QueryHandler<Q, R>>
where
    Q: Debug + 'static,
    R: 'static,
    H: QueryHandler<Q, R> + 'static,
{
    Box::new(LoggingDecorator::new(
        MetricsDecorator::new(handler, name, observability.metrics()),
        name,
        observability.span().clone(),
    ))
}
