use fltr_gateway::{Gateway, GatewayError};

use crate::row::RowId;

/// A picklist value fetch for the row that just selected a picklist field.
///
/// The request is detached from the panel so the host can run it on its
/// own task and hand the outcome back whenever it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PicklistRequest {
    pub row: RowId,
    pub object_type: String,
    pub field_api_name: String,
}

/// A finished picklist fetch, ready for [`crate::FilterPanel::apply_picklist`]
#[derive(Debug)]
pub struct PicklistOutcome {
    pub request: PicklistRequest,
    pub values: Result<Vec<String>, GatewayError>,
}

impl PicklistRequest {
    pub async fn fetch(self, gateway: &dyn Gateway) -> PicklistOutcome {
        let values = gateway
            .fetch_picklist_values(&self.object_type, &self.field_api_name)
            .await;
        if let Err(err) = &values {
            tracing::warn!(row = %self.row, field = %self.field_api_name, error = %err, "picklist fetch failed");
        }
        PicklistOutcome {
            request: self,
            values,
        }
    }
}
