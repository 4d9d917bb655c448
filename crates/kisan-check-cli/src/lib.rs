// crates/kisan-check-cli/src/lib.rs
// ============================================================================
// Module: Kisan Check CLI Library
// Description: Shared helpers for the Kisan Check command-line interface.
// Purpose: Provide reusable components (i18n) for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library houses the localized message catalog. The binary entry point
//! (`src/main.rs`) imports these helpers to keep all user-facing output
//! consistent across English and Hindi.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
