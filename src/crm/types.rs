// ABOUTME: Wire types for the CRM API - OData envelopes and mutation payloads.
// ABOUTME: Field order matters for DataTable requests; serde emits declaration order.

use serde::{Deserialize, Serialize};

/// One dynamically shaped CRM row. Field sets depend on the entity type.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Rows returned by a single page fetch, in server order.
pub type RecordBatch = Vec<Record>;

/// Event type key the CRM uses for history notes.
pub const NOTE_EVENT_TYPE_KEY: u32 = 18;

/// Event type key the CRM uses for tasks.
pub const TASK_EVENT_TYPE_KEY: u32 = 1;

/// OData list envelope. A body without `value` is malformed.
#[derive(Debug, Deserialize)]
pub struct ODataPage {
    pub value: RecordBatch,
}

/// Optional OData query options applied to every page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ODataQuery {
    pub filter: Option<String>,
    pub select: Vec<String>,
}

impl ODataQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Query pairs for a page at `skip`, starting with the API version.
    pub fn params(&self, skip: u64) -> Vec<(&'static str, String)> {
        let mut params = vec![("api-version", "1.0".to_string())];
        if let Some(filter) = &self.filter {
            params.push(("$filter", filter.clone()));
        }
        if !self.select.is_empty() {
            params.push(("$select", self.select.join(",")));
        }
        params.push(("$skip", skip.to_string()));
        params
    }
}

/// History note posted against a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    pub event_type_key: u32,
    pub published: bool,
    pub timeless: bool,
    pub start_date: String,
    pub end_date: String,
    pub subject: String,
    pub notes: String,
    pub status_key: u32,
}

impl NoteRequest {
    /// A published, timeless note dated `date` (`YYYY-MM-DD`).
    pub fn new(date: impl Into<String>, subject: impl Into<String>, notes: impl Into<String>) -> Self {
        let date = date.into();
        Self {
            event_type_key: NOTE_EVENT_TYPE_KEY,
            published: true,
            timeless: true,
            start_date: date.clone(),
            end_date: date,
            subject: subject.into(),
            notes: notes.into(),
            status_key: 0,
        }
    }
}

/// Task event posted against a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub event_type_key: u32,
    pub published: bool,
    pub timeless: bool,
    pub start_date: String,
    pub end_date: String,
    pub subject: String,
    pub notes: String,
    pub status_key: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_key: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_key: Option<String>,
}

impl TaskRequest {
    /// An open task starting on `start_date` and due on `due_date`.
    pub fn new(
        subject: impl Into<String>,
        start_date: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            event_type_key: TASK_EVENT_TYPE_KEY,
            published: true,
            timeless: true,
            start_date: start_date.into(),
            end_date: due_date.into(),
            subject: subject.into(),
            notes: String::new(),
            status_key: 0,
            priority_key: None,
            user_key: None,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn priority(mut self, priority_key: u32) -> Self {
        self.priority_key = Some(priority_key);
        self
    }

    /// Assign the task to a CRM user.
    pub fn assign_to(mut self, user_key: impl Into<String>) -> Self {
        self.user_key = Some(user_key.into());
        self
    }

    /// Mark the dates as carrying a time of day.
    pub fn timed(mut self) -> Self {
        self.timeless = false;
        self
    }
}

/// Sort direction in a DataTable order clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataTableSearch {
    pub value: String,
    pub regex: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTableColumn {
    pub data: String,
    pub name: String,
    pub searchable: bool,
    pub orderable: bool,
    pub search: DataTableSearch,
}

impl DataTableColumn {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            name: String::new(),
            searchable: true,
            orderable: true,
            search: DataTableSearch::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTableOrder {
    pub column: usize,
    pub dir: SortDir,
}

/// Grid listing request, shaped like the CRM web UI's server-side table calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTableRequest {
    pub draw: u32,
    pub columns: Vec<DataTableColumn>,
    pub order: Vec<DataTableOrder>,
    pub start: u64,
    pub length: u64,
    pub search: DataTableSearch,
}

impl DataTableRequest {
    /// First page of `length` rows over `columns`, newest first on column 0.
    pub fn new(columns: &[&str], length: u64) -> Self {
        Self {
            draw: 1,
            columns: columns.iter().map(|c| DataTableColumn::new(*c)).collect(),
            order: vec![DataTableOrder {
                column: 0,
                dir: SortDir::Desc,
            }],
            start: 0,
            length,
            search: DataTableSearch::default(),
        }
    }

    pub fn start(mut self, start: u64) -> Self {
        self.start = start;
        self
    }

    pub fn order_by(mut self, column: usize, dir: SortDir) -> Self {
        self.order = vec![DataTableOrder { column, dir }];
        self
    }
}

/// Columns requested when listing properties linked to a contact.
pub const LINKED_PROPERTY_COLUMNS: &[&str] = &[
    "key",
    "name",
    "address",
    "city",
    "state",
    "zipCode",
    "propertyType",
    "role",
];

/// Columns requested when listing a contact's activities.
pub const ACTIVITY_COLUMNS: &[&str] = &[
    "startDate",
    "eventType",
    "subject",
    "notes",
    "status",
    "key",
];

/// Page length for DataTable listings.
pub const DATATABLE_PAGE_LENGTH: u64 = 100;
