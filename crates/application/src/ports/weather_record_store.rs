//! Weather record storage port

use async_trait::async_trait;
use domain::entities::WeatherRecord;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for persisting weather records
///
/// Append-only: the collector only ever inserts.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherRecordStore: Send + Sync {
    /// Insert a record, returning it with the storage-assigned id
    async fn save(&self, record: WeatherRecord) -> Result<WeatherRecord, ApplicationError>;
}
