use serde::{Deserialize, Serialize};

/// One inbound registration contact as reported by the PBX manager
/// interface. Field names on the wire are the manager's event keys.
///
/// Numeric-looking fields stay strings here: the manager reports "N/A"
/// for round trips it has not measured yet, and rendering decides how to
/// degrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationContact {
    #[serde(rename = "AOR")]
    pub aor: String,
    #[serde(rename = "URI", default)]
    pub uri: String,
    #[serde(rename = "UserAgent", default)]
    pub user_agent: String,
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "RoundtripUsec", default)]
    pub roundtrip_usec: String,
    #[serde(rename = "CallID", default)]
    pub call_id: String,
    #[serde(rename = "ViaAddress", default)]
    pub via_address: String,
    #[serde(rename = "RegExpire", default)]
    pub reg_expire: String,
}

/// Brand/model/firmware triple recovered from a device user-agent string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub brand: String,
    pub model: String,
    pub firmware: String,
}

impl DeviceInfo {
    pub fn unknown() -> Self {
        DeviceInfo {
            brand: "Unknown".to_string(),
            model: String::new(),
            firmware: String::new(),
        }
    }
}
