use once_cell::sync::Lazy;
use regex::Regex;
use shared_types::DeviceInfo;
use std::borrow::Cow;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").unwrap());
static SPACE_OR_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s-]").unwrap());
static WS_OR_SLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s/]").unwrap());
static SIP_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^SIP[\s-]").unwrap());
static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]").unwrap());
static NO_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\D+)([\d.]+)(\D+.*)").unwrap());

/// How to split the remainder of a user-agent string once the vendor
/// token has been recognized. New vendors are a new table row, not a new
/// branch.
enum SplitRule {
    /// "<model> <firmware>", optionally behind a "SIP "/"SIP-" marker
    /// (Yealink), with some vendors using a dash instead of a space.
    ModelFirmware {
        strip_sip_marker: bool,
        split_on_dash: bool,
    },
    /// "<model>/<firmware>"
    ModelSlashFirmware,
    /// Softphones that report nothing but a version string.
    FirmwareOnly,
    /// Firmware is the first whitespace token of the remainder; the rest
    /// is free text.
    FirmwareFirstToken,
    /// Brand and model are baked into the vendor token itself.
    Fixed {
        brand: &'static str,
        model: &'static str,
    },
    /// "Linphone Desktop/<ver> (<os>, <toolkit>) LinphoneCore/<ver>"
    DesktopSuite,
}

const VENDOR_RULES: &[(&str, SplitRule)] = &[
    (
        "Yealink",
        SplitRule::ModelFirmware {
            strip_sip_marker: true,
            split_on_dash: false,
        },
    ),
    (
        "Zulu",
        SplitRule::ModelFirmware {
            strip_sip_marker: true,
            split_on_dash: false,
        },
    ),
    (
        "Z",
        SplitRule::ModelFirmware {
            strip_sip_marker: true,
            split_on_dash: false,
        },
    ),
    (
        "Grandstream",
        SplitRule::ModelFirmware {
            strip_sip_marker: false,
            split_on_dash: true,
        },
    ),
    (
        "OBIHAI",
        SplitRule::ModelFirmware {
            strip_sip_marker: false,
            split_on_dash: true,
        },
    ),
    (
        "Fanvil",
        SplitRule::ModelFirmware {
            strip_sip_marker: false,
            split_on_dash: true,
        },
    ),
    (
        "Acrobits",
        SplitRule::ModelFirmware {
            strip_sip_marker: false,
            split_on_dash: true,
        },
    ),
    (
        "Cisco",
        SplitRule::ModelFirmware {
            strip_sip_marker: false,
            split_on_dash: true,
        },
    ),
    ("Sangoma", SplitRule::ModelSlashFirmware),
    ("Zoiper", SplitRule::FirmwareOnly),
    ("MicroSIP", SplitRule::FirmwareOnly),
    ("Telephone", SplitRule::FirmwareOnly),
    (
        "snomPA1",
        SplitRule::Fixed {
            brand: "Snom",
            model: "PA1",
        },
    ),
    ("LinphoneiOS", SplitRule::FirmwareFirstToken),
    ("Linphone", SplitRule::DesktopSuite),
];

/// Break a device user-agent string into brand, model and firmware.
///
/// Pure and total: anything the vendor table and the prefix fallbacks do
/// not recognize comes back as brand "Unknown" with empty model and
/// firmware.
pub fn parse(ua: &str) -> DeviceInfo {
    let (vendor, rest) = split_vendor(ua);

    if let Some((_, rule)) = VENDOR_RULES.iter().find(|(name, _)| *name == vendor) {
        return apply_rule(rule, vendor, rest);
    }

    // Polycom bakes "<family>-<model>-UA" into the first token
    if vendor.starts_with("Polycom") {
        let model = vendor.split('-').nth(1).unwrap_or("").replace('_', " ");
        return DeviceInfo {
            brand: "Polycom".to_string(),
            model,
            firmware: rest.to_string(),
        };
    }

    // Algo intercoms report "Algo-<model>/<firmware>"
    if vendor.starts_with("Algo") {
        let mut parts = vendor.splitn(2, '-');
        let brand = parts.next().unwrap_or("Algo");
        let model = parts.next().unwrap_or("");
        return DeviceInfo {
            brand: brand.to_string(),
            model: model.to_string(),
            firmware: rest.to_string(),
        };
    }

    // Jitsi on Windows has no delimiter between name, version and platform
    if vendor.starts_with("Jitsi") {
        if let Some(caps) = NO_DELIMITER.captures(ua) {
            return DeviceInfo {
                brand: caps[1].to_string(),
                model: caps[3].to_string(),
                firmware: caps[2].to_string(),
            };
        }
    }

    DeviceInfo::unknown()
}

/// First token before whitespace or a slash selects the vendor rule.
fn split_vendor(ua: &str) -> (&str, &str) {
    match ua.find(|c: char| c.is_whitespace() || c == '/') {
        Some(i) => {
            let sep_len = ua[i..].chars().next().map(char::len_utf8).unwrap_or(1);
            (&ua[..i], &ua[i + sep_len..])
        }
        None => (ua, ""),
    }
}

fn apply_rule(rule: &SplitRule, vendor: &str, rest: &str) -> DeviceInfo {
    match rule {
        SplitRule::ModelFirmware {
            strip_sip_marker,
            split_on_dash,
        } => {
            let rest = if *strip_sip_marker {
                SIP_MARKER.replace(rest, "")
            } else {
                Cow::Borrowed(rest)
            };
            let sep = if *split_on_dash {
                &SPACE_OR_DASH
            } else {
                &WHITESPACE
            };
            let (model, firmware) = split_two(sep, rest.as_ref());
            DeviceInfo {
                brand: vendor.to_string(),
                model,
                firmware,
            }
        }
        SplitRule::ModelSlashFirmware => {
            let mut parts = rest.splitn(2, '/');
            DeviceInfo {
                brand: vendor.to_string(),
                model: parts.next().unwrap_or("").to_string(),
                firmware: parts.next().unwrap_or("").to_string(),
            }
        }
        SplitRule::FirmwareOnly => DeviceInfo {
            brand: vendor.to_string(),
            model: String::new(),
            firmware: rest.to_string(),
        },
        SplitRule::FirmwareFirstToken => {
            let (firmware, _) = split_two(&WHITESPACE, rest);
            DeviceInfo {
                brand: vendor.to_string(),
                model: String::new(),
                firmware,
            }
        }
        SplitRule::Fixed { brand, model } => DeviceInfo {
            brand: (*brand).to_string(),
            model: (*model).to_string(),
            firmware: rest.to_string(),
        },
        SplitRule::DesktopSuite => {
            let cleaned = PARENS.replace_all(rest, "");
            let parts: Vec<&str> = WS_OR_SLASH.split(cleaned.as_ref()).collect();
            DeviceInfo {
                brand: format!("{} {}", vendor, parts.first().copied().unwrap_or("")),
                model: parts.get(2).copied().unwrap_or("").to_string(),
                firmware: parts.get(1).copied().unwrap_or("").to_string(),
            }
        }
    }
}

fn split_two(sep: &Regex, s: &str) -> (String, String) {
    let mut pieces = sep.splitn(s, 2);
    let first = pieces.next().unwrap_or("").to_string();
    let second = pieces.next().unwrap_or("").to_string();
    (first, second)
}
