// crates/kisan-check-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Keep every user-facing line in one English/Hindi catalog.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//! Kisan Check stores user-facing strings in a small translation catalog so
//! console output can be shown in English or Hindi. All runtime output should
//! be routed through the [`t!`](crate::t) macro. Probe messages produced by the
//! core library are diagnostic and stay in English.
//!
//! ## Invariants
//! - The locale is chosen once per process and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Unknown placeholders are left in the output untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;

// ============================================================================
// SECTION: Locale
// ============================================================================

/// Supported CLI locales. [`Locale::En`] is the fallback.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Hindi.
    Hi,
}

impl Locale {
    /// Parses a locale tag such as `hi`, `HI`, or `hi-IN`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next() {
            Some("en") => Some(Self::En),
            Some("hi") => Some(Self::Hi),
            _ => None,
        }
    }

    /// Returns this locale's catalog entries.
    pub(crate) const fn catalog(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::En => CATALOG_EN,
            Self::Hi => CATALOG_HI,
        }
    }

    /// Looks up the template for `key` in this locale only.
    pub(crate) fn template(self, key: &str) -> Option<&'static str> {
        self.catalog().iter().find(|(entry, _)| *entry == key).map(|(_, template)| *template)
    }
}

/// Locale chosen for this process.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "kisan-check {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("logging.init_failed", "Failed to initialize logging: {error}"),
    ("config.load_failed", "Failed to load configuration: {error}"),
    ("client.init_failed", "Failed to initialize HTTP client: {error}"),
    ("run.header", "Testing farmer registry API at {target}"),
    ("run.check.started", "Running: {name}"),
    ("run.check.result", "[{status}] {name}: {message}"),
    ("run.case.result", "    [{status}] {name}: {message}"),
    ("run.check.warning", "    Warning: {warning}"),
    ("run.status.pass", "PASS"),
    ("run.status.fail", "FAIL"),
    ("run.summary", "Summary: {passed}/{total} checks passed"),
    ("run.summary.warnings", "Warnings: {count}"),
    ("run.verdict.pass", "All checks passed. The registry API conforms."),
    ("run.verdict.fail", "Some checks failed. See the results above."),
    ("report.json.ok", "JSON report written to {path}"),
    ("report.markdown.ok", "Markdown report written to {path}"),
    ("report.failed", "Failed to write report: {error}"),
    ("checks.line", "{index}. {key}: {title}"),
    ("check.health_check", "Health Check"),
    ("check.get_farmers_empty", "Get Farmers (Empty)"),
    ("check.db_connection", "Database Connection"),
    ("check.farmer_registration", "Farmer Registration (Valid)"),
    ("check.duplicate_check", "Duplicate Mobile Check"),
    ("check.validation", "Registration Validation"),
    ("check.get_farmers_with_data", "Get Farmers (With Data)"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'hi'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Hindi catalog entries.
const CATALOG_HI: &[(&str, &str)] = &[
    ("main.version", "kisan-check {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "आउटपुट"),
    ("output.write_failed", "{stream} पर लिखने में विफल: {error}"),
    ("logging.init_failed", "लॉगिंग शुरू करने में विफल: {error}"),
    ("config.load_failed", "कॉन्फ़िगरेशन लोड करने में विफल: {error}"),
    ("client.init_failed", "HTTP क्लाइंट शुरू करने में विफल: {error}"),
    ("run.header", "{target} पर किसान रजिस्ट्री API की जाँच"),
    ("run.check.started", "चल रहा है: {name}"),
    ("run.check.result", "[{status}] {name}: {message}"),
    ("run.case.result", "    [{status}] {name}: {message}"),
    ("run.check.warning", "    चेतावनी: {warning}"),
    ("run.status.pass", "सफल"),
    ("run.status.fail", "विफल"),
    ("run.summary", "सारांश: {total} में से {passed} जाँचें सफल"),
    ("run.summary.warnings", "चेतावनियाँ: {count}"),
    ("run.verdict.pass", "सभी जाँचें सफल रहीं। रजिस्ट्री API अनुरूप है।"),
    ("run.verdict.fail", "कुछ जाँचें विफल रहीं। ऊपर के परिणाम देखें।"),
    ("report.json.ok", "JSON रिपोर्ट {path} पर लिखी गई"),
    ("report.markdown.ok", "Markdown रिपोर्ट {path} पर लिखी गई"),
    ("report.failed", "रिपोर्ट लिखने में विफल: {error}"),
    ("checks.line", "{index}. {key}: {title}"),
    ("check.health_check", "स्वास्थ्य जाँच"),
    ("check.get_farmers_empty", "किसान सूची (खाली)"),
    ("check.db_connection", "डेटाबेस कनेक्शन"),
    ("check.farmer_registration", "किसान पंजीकरण (मान्य)"),
    ("check.duplicate_check", "डुप्लिकेट मोबाइल जाँच"),
    ("check.validation", "पंजीकरण सत्यापन"),
    ("check.get_farmers_with_data", "किसान सूची (डेटा सहित)"),
    ("i18n.lang.invalid_env", "{env} के लिए अमान्य मान: {value}। 'en' या 'hi' अपेक्षित है।"),
    (
        "i18n.disclaimer.machine_translated",
        "नोट: गैर-अंग्रेज़ी आउटपुट मशीन द्वारा अनुवादित है और गलत हो सकता है।",
    ),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` in the current locale, filling `{name}` placeholders
/// from `args`.
#[must_use]
pub fn translate(key: &str, args: &[(&str, String)]) -> String {
    let template = current_locale()
        .template(key)
        .or_else(|| Locale::En.template(key))
        .unwrap_or(key);
    fill_placeholders(template, args)
}

/// Substitutes every `{name}` in `template` whose name appears in `args`.
fn fill_placeholders(template: &str, args: &[(&str, String)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        output.push_str(&rest[.. open]);
        let after = &rest[open + 1 ..];
        let value = after.find('}').and_then(|close| {
            let name = &after[.. close];
            args.iter().find(|(arg, _)| *arg == name).map(|(_, value)| (value, close))
        });
        match value {
            Some((value, close)) => {
                output.push_str(value);
                rest = &after[close + 1 ..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a catalog key and named arguments.
///
/// ```ignore
/// t!("run.summary", passed = 6, total = 7)
/// ```
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {
        $crate::i18n::translate($key, &[$((stringify!($name), $value.to_string())),*])
    };
}
