use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use chrono::TimeZone;
use serde::Deserialize;
use shared_types::RegistrationContact;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::database::users;
use crate::database::{AsyncDbConnection, Database};
use crate::devices;
use crate::helpers::addresses;
use crate::helpers::escape::escape_html;
use crate::integrations::manager::ManagerClient;

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub showuri: Option<String>,
}

/// `GET /extensionstatus?showuri=<0|1>`
///
/// Renders one `<tr>` per live registration contact, in manager order.
/// The wrapping table and heading come from the host dashboard template.
pub async fn extension_status(
    db: web::Data<Arc<Database>>,
    manager: web::Data<Arc<ManagerClient>>,
    auth: web::Data<AuthConfig>,
    query: web::Query<StatusQuery>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    if !session_ok(&req, &auth) {
        return Ok(HttpResponse::Unauthorized()
            .content_type("text/plain")
            .body(
                "Not logged in! Please log in to your PBX dashboard before opening this page...",
            ));
    }

    let show_uri = query.showuri.as_deref() == Some("1");

    let contacts = match manager.inbound_registrations().await {
        Ok(contacts) => contacts,
        Err(e) => {
            tracing::error!("Registration contact query failed: {}", e);
            return Ok(HttpResponse::BadGateway()
                .content_type("text/plain")
                .body("Could not query the PBX for registration contacts."));
        }
    };

    let mut body = String::new();
    for contact in &contacts {
        let name = resolve_display_name(db.async_connection.clone(), &contact.aor).await;
        body.push_str(&render_row(contact, &name, show_uri, &chrono::Local));
    }

    Ok(HttpResponse::Ok().content_type("text/html").body(body))
}

fn session_ok(req: &HttpRequest, auth: &AuthConfig) -> bool {
    let Some(expected) = &auth.session_token else {
        return false;
    };
    req.cookie(&auth.session_cookie)
        .map(|cookie| cookie.value() == expected)
        .unwrap_or(false)
}

/// Virtual registrations prefix the extension with a 90/98 routing code;
/// strip it before the user lookup.
async fn resolve_display_name(conn: AsyncDbConnection, aor: &str) -> String {
    let extension = aor
        .strip_prefix("90")
        .or_else(|| aor.strip_prefix("98"))
        .unwrap_or(aor);

    match users::display_name(conn, extension).await {
        Ok(Some(name)) => name,
        Ok(None) => String::new(),
        Err(e) => {
            tracing::warn!("User lookup for extension {:?} failed: {}", extension, e);
            String::new()
        }
    }
}

/// One table row: AOR, display name, [URI], brand, model, firmware,
/// status, round trip, known addresses, expiry in the given timezone.
pub fn render_row<Tz>(
    contact: &RegistrationContact,
    display_name: &str,
    show_uri: bool,
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let device = devices::parse(&contact.user_agent);

    let mut row = String::from("    <tr>\n");
    row.push_str(&format!("      <td>{}</td>\n", escape_html(&contact.aor)));
    row.push_str(&format!("      <td>{}</td>\n", escape_html(display_name)));
    if show_uri {
        row.push_str(&format!("      <td>{}</td>\n", escape_html(&contact.uri)));
    }
    row.push_str(&format!("      <td>{}</td>\n", escape_html(&device.brand)));
    row.push_str(&format!("      <td>{}</td>\n", escape_html(&device.model)));
    row.push_str(&format!(
        "      <td>{}</td>\n",
        escape_html(&device.firmware)
    ));
    row.push_str(&format!("      <td>{}</td>\n", escape_html(&contact.status)));
    row.push_str(&format!(
        "      <td>{}</td>\n",
        render_roundtrip(&contact.roundtrip_usec)
    ));

    row.push_str("      <td>\n");
    row.push_str(&format!(
        "        <b>URI:</b> {}<br />\n",
        escape_html(addresses::uri_host(&contact.uri))
    ));
    row.push_str(&format!(
        "        <b>Via:</b> {}<br />\n",
        escape_html(addresses::via_host(&contact.via_address))
    ));
    row.push_str(&format!(
        "        <b>CallID:</b> {}<br />\n",
        escape_html(addresses::call_id_host(&contact.call_id))
    ));
    row.push_str("      </td>\n");

    row.push_str(&format!(
        "      <td>{}</td>\n",
        render_expiry(&contact.reg_expire, tz)
    ));
    row.push_str("    </tr>\n");
    row
}

/// Round trips arrive in microseconds, or as "N/A" before the first
/// qualify completes.
pub fn render_roundtrip(usec: &str) -> String {
    match usec.trim().parse::<f64>() {
        Ok(value) => format!("{:.1} ms", value / 1000.0),
        Err(_) => "-".to_string(),
    }
}

/// Registration expiry epoch rendered in the given timezone.
pub fn render_expiry<Tz>(epoch: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let parsed = epoch
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|seconds| chrono::DateTime::from_timestamp(seconds, 0));

    match parsed {
        Some(utc) => utc.with_timezone(tz).format("%Y/%m/%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn contact() -> RegistrationContact {
        RegistrationContact {
            aor: "417".to_string(),
            uri: "sip:417@64.53.207.74:1025;x-ast-orig-host=10.1.17.130:5060".to_string(),
            user_agent: "Yealink SIP-T54W 96.85.0.5".to_string(),
            status: "Avail".to_string(),
            roundtrip_usec: "23456".to_string(),
            call_id: "0_1362581122@192.168.101.161".to_string(),
            via_address: "10.202.40.37:5060".to_string(),
            reg_expire: "1700000000".to_string(),
        }
    }

    #[test]
    fn test_roundtrip_numeric_in_milliseconds() {
        assert_eq!(render_roundtrip("23456"), "23.5 ms");
        assert_eq!(render_roundtrip("4000"), "4.0 ms");
    }

    #[test]
    fn test_roundtrip_non_numeric_placeholder() {
        assert_eq!(render_roundtrip("N/A"), "-");
        assert_eq!(render_roundtrip(""), "-");
    }

    #[test]
    fn test_expiry_formatting() {
        assert_eq!(render_expiry("1700000000", &Utc), "2023/11/14 22:13:20");
        assert_eq!(render_expiry("not-an-epoch", &Utc), "-");
    }

    #[test]
    fn test_row_columns() {
        let row = render_row(&contact(), "Dock Phone", false, &Utc);

        assert!(row.starts_with("    <tr>\n"));
        assert!(row.ends_with("    </tr>\n"));
        assert!(row.contains("<td>417</td>"));
        assert!(row.contains("<td>Dock Phone</td>"));
        assert!(row.contains("<td>Yealink</td>"));
        assert!(row.contains("<td>T54W</td>"));
        assert!(row.contains("<td>96.85.0.5</td>"));
        assert!(row.contains("<td>Avail</td>"));
        assert!(row.contains("<td>23.5 ms</td>"));
        assert!(row.contains("<b>URI:</b> 64.53.207.74<br />"));
        assert!(row.contains("<b>Via:</b> 10.202.40.37<br />"));
        assert!(row.contains("<b>CallID:</b> 192.168.101.161<br />"));
        assert!(row.contains("<td>2023/11/14 22:13:20</td>"));
        // URI column is off by default
        assert!(!row.contains("sip:417@"));
    }

    #[test]
    fn test_row_with_uri_column() {
        let row = render_row(&contact(), "", true, &Utc);
        assert!(row.contains("<td>sip:417@64.53.207.74:1025;x-ast-orig-host=10.1.17.130:5060</td>"));
    }

    #[actix_web::test]
    async fn test_missing_session_is_refused() {
        use actix_web::{test, App};

        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::new(&dir.path().join("test.db")).unwrap());
        let manager = Arc::new(ManagerClient::new(&crate::config::PbxConfig::default()));
        let auth = AuthConfig {
            session_cookie: "pbx_session".to_string(),
            session_token: Some("sekrit".to_string()),
        };

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(manager))
                .app_data(web::Data::new(auth))
                .route("/extensionstatus", web::get().to(extension_status)),
        )
        .await;

        // No cookie at all
        let req = test::TestRequest::get().uri("/extensionstatus").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"Not logged in!"));

        // Wrong cookie value
        let req = test::TestRequest::get()
            .uri("/extensionstatus")
            .cookie(actix_web::cookie::Cookie::new("pbx_session", "guess"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_manager_failure_answers_bad_gateway() {
        use actix_web::{test, App};

        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::new(&dir.path().join("test.db")).unwrap());
        // Nothing listens on port 1
        let manager = Arc::new(ManagerClient::new(&crate::config::PbxConfig {
            manager_url: "http://127.0.0.1:1".to_string(),
            manager_user: None,
            manager_secret: None,
        }));
        let auth = AuthConfig {
            session_cookie: "pbx_session".to_string(),
            session_token: Some("sekrit".to_string()),
        };

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(manager))
                .app_data(web::Data::new(auth))
                .route("/extensionstatus", web::get().to(extension_status)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/extensionstatus")
            .cookie(actix_web::cookie::Cookie::new("pbx_session", "sekrit"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_row_degrades_on_unknown_device() {
        let mut c = contact();
        c.user_agent = "MysteryPhone 9000".to_string();
        c.roundtrip_usec = "N/A".to_string();
        c.call_id = "5nw8H9tLIoXbkewN-pn_1w..".to_string();
        let row = render_row(&c, "", false, &Utc);

        assert!(row.contains("<td>Unknown</td>"));
        assert!(row.contains("<td>-</td>"));
        assert!(row.contains("<b>CallID:</b> Not an IP<br />"));
    }
}
