use contactdesk::ContactSubmission;
use contactdesk_relay::{RelayReport, RelayStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Form body accepted by `POST /contact`. Missing fields deserialize as empty
/// strings so validation can name the first one that is absent.
#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl From<ContactRequest> for ContactSubmission {
    fn from(req: ContactRequest) -> Self {
        ContactSubmission {
            name: req.name,
            email: req.email,
            phone: req.phone,
            message: req.message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    /// Always `"received"`
    pub status: String,
    /// Id assigned by the document store
    pub id: String,
    pub relayed: RelayedDto,
}

/// Per-service relay outcome: `"delivered"` or `"skipped"`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RelayedDto {
    pub sheet: String,
    pub messenger: String,
}

impl From<RelayReport> for RelayedDto {
    fn from(report: RelayReport) -> Self {
        Self {
            sheet: status_label(report.sheet).to_string(),
            messenger: status_label(report.messenger).to_string(),
        }
    }
}

fn status_label(status: RelayStatus) -> &'static str {
    match status {
        RelayStatus::Delivered => "delivered",
        RelayStatus::Skipped => "skipped",
    }
}
