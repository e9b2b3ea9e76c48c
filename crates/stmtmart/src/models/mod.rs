pub mod envelope;
pub mod statement;

pub use envelope::{EnvelopeCommandFailure, EnvelopeError, EnvelopeMeta, QueryEnvelope};
pub use statement::{
    StatementFilter, StatementRow, StmtConfig, TimeRange, config_json_schema,
    time_range_json_schema,
};
