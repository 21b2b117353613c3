//! Company registration records and the onboarding wizard payloads
//!
//! Wire format matches the onboarding client: the multipart request carries
//! a flat camelCase `registrationData` JSON part plus up to six file parts;
//! the stored record nests company/KYC/bank sections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registration lifecycle. `submitted` is entered on every (re)submission;
/// `approved`/`rejected` are administrative transitions made elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Submitted,
    Approved,
    Rejected,
}

/// Flat form data submitted by the onboarding wizard (`registrationData`
/// multipart part). File parts travel separately.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    // Step 1: company details
    pub company_name: Option<String>,
    pub company_size: Option<String>,
    pub company_contact: Option<String>,
    pub gstin: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub full_name: Option<String>,
    pub designation: Option<String>,

    // Step 2: KYC
    pub entity_type: Option<String>,

    // Step 3: bank details
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub branch_name: Option<String>,
    pub swift_code: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_city: Option<String>,
    pub bank_country: Option<String>,
}

/// One uploaded KYC/bank document as stored on the registration record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    /// Object-store path: `{userId}/{fieldName}_{millis}.{ext}`
    pub file_name: String,
    pub original_name: String,
    /// Long-lived (1 year) signed URL issued at upload time
    pub signed_url: String,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAddress {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPerson {
    pub full_name: Option<String>,
    pub designation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    pub company_name: Option<String>,
    pub company_size: Option<String>,
    pub company_contact: Option<String>,
    pub gstin: Option<String>,
    pub address: CompanyAddress,
    pub contact_person: ContactPerson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycDetails {
    pub entity_type: Option<String>,
    /// field name -> uploaded document, ordered for stable serialization
    pub documents: BTreeMap<String, UploadedDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub branch_name: Option<String>,
    pub swift_code: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_city: Option<String>,
    pub bank_country: Option<String>,
}

impl BankDetails {
    /// Redact the account number down to its last four characters. Every
    /// read path must return bank details through this, never raw.
    pub fn masked(&self) -> Self {
        let mut out = self.clone();
        out.account_number = self
            .account_number
            .as_deref()
            .map(|n| mask_account_number(n));
        out
    }
}

/// `"1234567890"` -> `"****7890"`; empty input stays empty.
pub fn mask_account_number(account_number: &str) -> String {
    if account_number.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = account_number.chars().collect();
    let keep = chars.len().min(4);
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("****{}", tail)
}

/// Full registration record, stored at `company_registration:{userId}`.
/// Resubmission overwrites the whole record (no partial merge).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRegistration {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub company_details: CompanyDetails,
    pub kyc_details: KycDetails,
    pub bank_details: BankDetails,
    pub status: RegistrationStatus,
    pub submitted_at: String,
    pub last_updated: String,
}

impl CompanyRegistration {
    /// Copy of the record safe for API responses (bank account redacted).
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        out.bank_details = self.bank_details.masked();
        out
    }
}

/// Response for a successful submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmitResponse {
    pub success: bool,
    pub registration_id: String,
    pub message: String,
    pub uploaded_documents: Vec<String>,
}

/// Response for the registration status check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingRegistrationResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<CompanyRegistration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response carrying a short-lived signed document URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUrlResponse {
    pub signed_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask_account_number("1234567890"), "****7890");
    }

    #[test]
    fn test_mask_short_numbers() {
        assert_eq!(mask_account_number("123"), "****123");
        assert_eq!(mask_account_number(""), "");
    }

    #[test]
    fn test_redacted_masks_only_account_number() {
        let reg = CompanyRegistration {
            id: "company_registration:u1".into(),
            user_id: "u1".into(),
            user_email: Some("ops@acme.example".into()),
            company_details: CompanyDetails {
                company_name: Some("Acme".into()),
                company_size: None,
                company_contact: Some("123".into()),
                gstin: None,
                address: CompanyAddress {
                    address_line1: Some("St".into()),
                    address_line2: None,
                    pincode: None,
                    country: Some("India".into()),
                    state: None,
                    city: Some("Pune".into()),
                },
                contact_person: ContactPerson {
                    full_name: Some("Z".into()),
                    designation: None,
                },
            },
            kyc_details: KycDetails {
                entity_type: Some("Private Limited Company".into()),
                documents: BTreeMap::new(),
            },
            bank_details: BankDetails {
                account_name: Some("Acme Ops".into()),
                account_number: Some("000111222333".into()),
                bank_name: Some("First Bank".into()),
                branch_name: None,
                swift_code: None,
                ifsc_code: Some("FIRB0001234".into()),
                bank_city: None,
                bank_country: None,
            },
            status: RegistrationStatus::Submitted,
            submitted_at: "2026-01-01T00:00:00Z".into(),
            last_updated: "2026-01-01T00:00:00Z".into(),
        };

        let redacted = reg.redacted();
        assert_eq!(redacted.bank_details.account_number.as_deref(), Some("****2333"));
        assert_eq!(redacted.bank_details.ifsc_code, reg.bank_details.ifsc_code);
        // The stored record itself is untouched
        assert_eq!(reg.bank_details.account_number.as_deref(), Some("000111222333"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RegistrationStatus::Submitted).unwrap(),
            "\"submitted\""
        );
        let parsed: RegistrationStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, RegistrationStatus::Rejected);
    }
}
