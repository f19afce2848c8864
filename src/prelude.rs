// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use realnex::prelude::*;` to get started quickly.

pub use crate::config::{CrmConfig, ValidatorConfig};
pub use crate::crm::{
    CrmClient, DataTableRequest, NoteRequest, ODataPages, ODataQuery, PageSource,
    PaginatedFetcher, Record, RecordBatch, SortDir, StopRule, TaskRequest,
};
pub use crate::error::{ConfigError, CrmError, Error, ValidatorError};
pub use crate::validator::{
    BatchValidator, ERROR_PREFIX, LineTypeLookup, Pacing, PhoneValidatorClient, RateLimiter,
};
