//! Field-format validation for product records.
//!
//! Every grammar lives here, so the create and update paths can never
//! diverge in what they accept. All predicates are total: they match the
//! whole input against a fixed anchored pattern and carry no state.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for part identifiers: 'SM' followed by exactly 7 digits
    static ref PART_ID_REGEX: Regex = Regex::new(r"^SM\d{7}$").unwrap();

    /// Regex for revisions: xxx.xx (e.g. 003.03)
    static ref REVISION_REGEX: Regex = Regex::new(r"^\d{3}\.\d{2}$").unwrap();

    /// Regex for ECU versions: xx.xx.xx (e.g. 01.02.03)
    static ref ECU_VERSION_REGEX: Regex = Regex::new(r"^\d{2}\.\d{2}\.\d{2}$").unwrap();

    /// Regex for checksums: 8 hexadecimal characters, either case
    static ref CHECKSUM_REGEX: Regex = Regex::new(r"^[0-9A-Fa-f]{8}$").unwrap();

    /// Regex for proto numbers: exactly 4 decimal digits
    static ref PROTO_NUMBER_REGEX: Regex = Regex::new(r"^\d{4}$").unwrap();
}

/// Validate a part identifier (e.g. SM1234567)
pub fn validate_part_id(value: &str) -> Result<(), String> {
    if !PART_ID_REGEX.is_match(value) {
        return Err("must follow format 'SMxxxxxxx' (SM + 7 digits)".to_string());
    }
    Ok(())
}

/// Validate a revision string (e.g. 003.03)
pub fn validate_revision(value: &str) -> Result<(), String> {
    if !REVISION_REGEX.is_match(value) {
        return Err("must follow format 'xxx.xx'".to_string());
    }
    Ok(())
}

/// Validate an ECU version string (e.g. 01.02.03)
pub fn validate_ecu_version(value: &str) -> Result<(), String> {
    if !ECU_VERSION_REGEX.is_match(value) {
        return Err("must follow format 'xx.xx.xx'".to_string());
    }
    Ok(())
}

/// Validate a checksum (e.g. 77CB3BB0)
pub fn validate_checksum(value: &str) -> Result<(), String> {
    if !CHECKSUM_REGEX.is_match(value) {
        return Err("must be 8 hexadecimal characters".to_string());
    }
    Ok(())
}

/// Validate a proto number (e.g. 1278)
pub fn validate_proto_number(value: &str) -> Result<(), String> {
    if !PROTO_NUMBER_REGEX.is_match(value) {
        return Err("must be a 4-digit number".to_string());
    }
    Ok(())
}

/// The grammar a stored field must satisfy.
///
/// Repository fields map onto one of these kinds; `FreeText` covers the
/// fields with no grammar (name, status, remark).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    PartId,
    Revision,
    EcuVersion,
    Checksum,
    ProtoNumber,
    FreeText,
}

impl FieldKind {
    pub fn validate(&self, value: &str) -> Result<(), String> {
        match self {
            FieldKind::PartId => validate_part_id(value),
            FieldKind::Revision => validate_revision(value),
            FieldKind::EcuVersion => validate_ecu_version(value),
            FieldKind::Checksum => validate_checksum(value),
            FieldKind::ProtoNumber => validate_proto_number(value),
            FieldKind::FreeText => Ok(()),
        }
    }
}
