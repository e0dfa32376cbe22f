/*!
 * Monitoring
 * Tracing subscriber setup and span helpers
 */

mod tracer;

pub use tracer::{init_tracing, session_span, TRACE_JSON_ENV};
