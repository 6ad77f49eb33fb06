//! Dimension value reconciler
//!
//! Dimension values are immutable once created, so there is no update path.

use npclient::{DimensionValue, NullClient};

/// Desired attributes of a dimension value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionValueDesired {
    pub dimension_id: u64,
    pub name: String,
    pub nrn: String,
}

/// What the API reports about a dimension value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionValueObserved {
    pub id: String,
    pub dimension_id: u64,
    pub name: String,
    pub nrn: String,
    pub slug: Option<String>,
    pub status: Option<String>,
}

impl DimensionValueObserved {
    fn from_record(record: DimensionValue, fallback_id: u64, dimension_id: u64) -> Self {
        Self {
            id: record.id.unwrap_or(fallback_id).to_string(),
            // the API omits the parent on some responses
            dimension_id: if record.dimension_id == 0 {
                dimension_id
            } else {
                record.dimension_id
            },
            name: record.name,
            nrn: record.nrn,
            slug: record.slug,
            status: record.status,
        }
    }
}

pub struct DimensionValueReconciler<'a> {
    client: &'a NullClient,
}

impl<'a> DimensionValueReconciler<'a> {
    pub fn new(client: &'a NullClient) -> Self {
        Self { client }
    }

    pub fn create(&self, desired: &DimensionValueDesired) -> npclient::Result<DimensionValueObserved> {
        let request = DimensionValue {
            dimension_id: desired.dimension_id,
            name: desired.name.clone(),
            nrn: desired.nrn.clone(),
            ..Default::default()
        };
        let created = self.client.create_dimension_value(&request)?;
        let id = created.id.ok_or_else(|| {
            npclient::Error::decode("creating dimension value", "response has no id")
        })?;
        log::info!("created dimension value {id} in dimension {}", desired.dimension_id);
        Ok(DimensionValueObserved::from_record(created, id, desired.dimension_id))
    }

    /// Fetch the value; `None` when it no longer exists
    pub fn read(&self, dimension_id: u64, id: u64) -> npclient::Result<Option<DimensionValueObserved>> {
        match self.client.get_dimension_value(dimension_id, id) {
            Ok(record) => Ok(Some(DimensionValueObserved::from_record(record, id, dimension_id))),
            Err(e) if e.is_not_found() => {
                log::info!("dimension value {id} not found in dimension {dimension_id}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn delete(&self, dimension_id: u64, id: u64) -> npclient::Result<()> {
        self.client.delete_dimension_value(dimension_id, id)?;
        log::info!("deleted dimension value {id} from dimension {dimension_id}");
        Ok(())
    }
}
