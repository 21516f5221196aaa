use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use shared_types::{ContactNumber, DirectoryEntry, NumberType};
use std::sync::Arc;

use crate::config::{DirectoryConfig, DirectoryLabels};
use crate::database::contact_numbers;
use crate::database::Database;
use crate::helpers::escape::escape_xml;

#[derive(Debug, Deserialize)]
pub struct DirectoryQuery {
    pub cgroup: Option<String>,
    pub e164: Option<String>,
}

/// `GET /directory.xml?cgroup=<group>&e164=<0|1>`
///
/// A failed query is logged and answered with an empty body; the phones
/// polling this endpoint have no use for an error page.
pub async fn directory_xml(
    db: web::Data<Arc<Database>>,
    config: web::Data<DirectoryConfig>,
    query: web::Query<DirectoryQuery>,
) -> ActixResult<HttpResponse> {
    let group = query
        .cgroup
        .clone()
        .unwrap_or_else(|| config.default_group.clone());
    let use_e164 = e164_requested(query.e164.as_deref(), config.use_e164_default);

    let body = match contact_numbers::list_for_group(db.async_connection.clone(), &group).await {
        Ok(rows) => render_directory(&group_by_display_name(rows), &config.labels, use_e164),
        Err(e) => {
            tracing::error!("Directory query for group {:?} failed: {}", group, e);
            String::new()
        }
    };

    Ok(HttpResponse::Ok().content_type("text/xml").body(body))
}

/// Only a literal "1" switches the export to E164 numbers; "0", absence
/// and anything unexpected read as off.
fn e164_requested(flag: Option<&str>, default_on: bool) -> bool {
    match flag {
        Some(flag) => flag == "1",
        None => default_on,
    }
}

/// Collapse consecutive rows sharing a display name into one entry,
/// keeping first-appearance order. Rows arrive sorted by display name,
/// so consecutive grouping is total grouping.
pub fn group_by_display_name(rows: Vec<ContactNumber>) -> Vec<DirectoryEntry> {
    let mut entries: Vec<DirectoryEntry> = Vec::new();
    for row in rows {
        match entries.last_mut() {
            Some(entry) if entry.name == row.display_name => entry.numbers.push(row),
            _ => entries.push(DirectoryEntry {
                name: row.display_name.clone(),
                numbers: vec![row],
            }),
        }
    }
    entries
}

/// Render the vendor phone-book XML document. One `DirectoryEntry` per
/// display name, one labeled `Telephone` tag per number, numbers ordered
/// by type rank. E164 numbers are used only when requested and never for
/// internal extensions.
pub fn render_directory(
    entries: &[DirectoryEntry],
    labels: &DirectoryLabels,
    use_e164: bool,
) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<CompanyIPPhoneDirectory clearlight=\"true\">\n",
    );

    for entry in entries {
        out.push_str("    <DirectoryEntry>\n");
        out.push_str(&format!(
            "        <Name>{}</Name>\n",
            escape_xml(&entry.name)
        ));

        let mut numbers: Vec<&ContactNumber> = entry.numbers.iter().collect();
        numbers.sort_by_key(|n| n.type_code.sort_rank());

        for contact in numbers {
            let number = if use_e164 && contact.type_code != NumberType::Internal {
                &contact.e164
            } else {
                &contact.number
            };
            out.push_str(&format!(
                "        <Telephone label=\"{}\">{}</Telephone>\n",
                escape_xml(labels.label_for(&contact.type_code)),
                escape_xml(number)
            ));
        }

        out.push_str("    </DirectoryEntry>\n");
    }

    out.push_str("</CompanyIPPhoneDirectory>\n");
    out
}
