// Intercom (SKUD) endpoints
//
// Thin callers over the authenticated request helper. The vendor returns
// intercom records with a nested role object; we flatten that down to
// the fields the rest of the workspace needs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::UfanetClient;
use crate::error::Error;

/// An intercom (door unit) shared with a contract.
#[derive(Debug, Clone, Serialize)]
pub struct Intercom {
    pub id: u64,
    /// Name of the contract's role on this intercom, e.g. the building
    /// entrance it guards.
    pub role_name: Option<String>,
    pub string_view: Option<String>,
    pub custom_name: Option<String>,
    pub address: Option<String>,
}

impl Intercom {
    /// Human-readable name: role, then string view, then custom name,
    /// then a numbered fallback.
    pub fn display_name(&self) -> String {
        self.role_name
            .clone()
            .or_else(|| self.string_view.clone())
            .or_else(|| self.custom_name.clone())
            .unwrap_or_else(|| format!("Intercom {}", self.id))
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawIntercom {
    id: u64,
    role: Option<RawRole>,
    string_view: Option<String>,
    custom_name: Option<String>,
    address: Option<String>,
}

#[derive(Deserialize)]
struct RawRole {
    name: Option<String>,
}

impl From<RawIntercom> for Intercom {
    fn from(raw: RawIntercom) -> Self {
        Self {
            id: raw.id,
            role_name: raw.role.and_then(|r| r.name),
            string_view: raw.string_view,
            custom_name: raw.custom_name,
            address: raw.address,
        }
    }
}

#[derive(Deserialize)]
struct OpenResult {
    #[serde(default)]
    result: bool,
}

impl UfanetClient {
    /// List intercoms shared with this contract.
    pub async fn list_intercoms(&self) -> Result<Vec<Intercom>, Error> {
        let raw: Vec<RawIntercom> = self.get_json("api/v0/skud/shared/").await?;
        debug!("fetched {} intercoms", raw.len());
        Ok(raw.into_iter().map(Intercom::from).collect())
    }

    /// Trigger the door relay of one intercom. Returns the server's
    /// confirmation flag.
    pub async fn open_intercom(&self, intercom_id: u64) -> Result<bool, Error> {
        let resp: OpenResult = self
            .get_json(&format!("api/v0/skud/shared/{intercom_id}/open/"))
            .await?;
        debug!("open intercom {} -> {}", intercom_id, resp.result);
        Ok(resp.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_fallback_chain() {
        let mut intercom = Intercom {
            id: 7,
            role_name: Some("Entrance 1".into()),
            string_view: Some("ул. Ленина 1".into()),
            custom_name: Some("Home".into()),
            address: None,
        };
        assert_eq!(intercom.display_name(), "Entrance 1");

        intercom.role_name = None;
        assert_eq!(intercom.display_name(), "ул. Ленина 1");

        intercom.string_view = None;
        assert_eq!(intercom.display_name(), "Home");

        intercom.custom_name = None;
        assert_eq!(intercom.display_name(), "Intercom 7");
    }
}
