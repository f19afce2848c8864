// ABOUTME: Integration tests verifying modules work together through the prelude.
// ABOUTME: Uses in-memory fakes, so no network is required.

use std::collections::HashMap;
use std::time::Duration;

use realnex::prelude::*;

/// A listing that serves canned row counts per offset.
struct CannedListing {
    pages: HashMap<u64, usize>,
}

#[async_trait::async_trait]
impl PageSource for CannedListing {
    async fn fetch_page(&self, skip: u64) -> Result<RecordBatch, CrmError> {
        let count = self.pages.get(&skip).copied().unwrap_or(0);
        Ok((0..count)
            .map(|i| {
                let mut record = Record::new();
                record.insert("Key".to_string(), serde_json::json!(format!("{}-{}", skip, i)));
                record
            })
            .collect())
    }
}

/// A lookup keyed by exact phone string.
struct DirectoryLookup {
    known: HashMap<&'static str, &'static str>,
}

#[async_trait::async_trait]
impl LineTypeLookup for DirectoryLookup {
    async fn line_type(&self, phone: &str) -> Result<String, ValidatorError> {
        match self.known.get(phone) {
            Some(line_type) => Ok(line_type.to_string()),
            None => Err(ValidatorError::Status {
                status: 422,
                body: format!("invalid phone {}", phone),
            }),
        }
    }
}

#[tokio::test]
async fn test_fetch_stops_after_empty_second_page() {
    let source = CannedListing {
        pages: HashMap::from([(0, 50)]),
    };

    let rows = PaginatedFetcher::default()
        .fetch_all(&source)
        .await
        .expect("fetch should succeed")
        .expect("rows should be present");

    assert_eq!(rows.len(), 50);
}

#[tokio::test]
async fn test_fetch_sums_full_rounds() {
    let pages: HashMap<u64, usize> = (0..13).map(|i| (i * 50, 50)).collect();
    let source = CannedListing { pages };

    let rows = PaginatedFetcher::default()
        .fetch_all(&source)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(rows.len(), 13 * 50);
}

#[tokio::test]
async fn test_validator_end_to_end_example() {
    let lookup = DirectoryLookup {
        known: HashMap::from([("+15551234567", "CELL PHONE")]),
    };
    let validator = BatchValidator::new(lookup, 2);

    let results = validator.validate(&["+15551234567", "bad-number"]).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0], "CELL PHONE");
    assert_eq!(results[1], "Error: validator returned 422: invalid phone bad-number");
}

#[tokio::test]
async fn test_validator_batches_follow_configured_size() {
    let lookup = DirectoryLookup {
        known: HashMap::from([("+1", "LANDLINE"), ("+2", "VOIP")]),
    };
    let mut config = ValidatorConfig::new("unused");
    config.batch_size = 3;
    let validator = BatchValidator::from_config(lookup, &config)
        .pacing(Pacing::FixedWindow(Duration::from_millis(5)));

    let phones = ["+1", "+2", "+3", "+1", "+2", "+3", "+1"];
    assert_eq!(validator.batch_count(phones.len()), 3);

    let results = validator.validate(&phones).await;
    assert_eq!(results.len(), 7);
    assert_eq!(results[0], "LANDLINE");
    assert_eq!(results[1], "VOIP");
    assert!(results[2].starts_with(ERROR_PREFIX));
    assert_eq!(results[6], "LANDLINE");
}

#[test]
fn test_payloads_from_prelude() {
    let note = NoteRequest::new("2024-07-12", "subject", "body");
    assert_eq!(note.start_date, note.end_date);

    let grid = DataTableRequest::new(&["key"], 10).order_by(0, SortDir::Asc);
    let json = serde_json::to_value(&grid).unwrap();
    assert_eq!(json["order"][0]["dir"], "asc");
}
