//! Company registration workflow engine
//!
//! Collects, validates and persists the three-step onboarding submission.
//! Validation is authoritative here regardless of what the wizard checked
//! client-side. Document uploads happen before any persistence; a failed
//! upload aborts the submission and leaves no registration record behind.

use chrono::Utc;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{error, info};

use crate::models::registration::{
    BankDetails, CompanyAddress, CompanyDetails, CompanyRegistration, ContactPerson, KycDetails,
    RegistrationForm, RegistrationStatus, UploadedDocument,
};
use crate::services::auth::AuthUser;
use crate::services::kv;
use crate::services::object_storage::{
    StorageService, DOCUMENT_URL_TTL_SECS, DOCUMENT_VIEW_TTL_SECS,
};
use crate::AppConfig;

/// Legal entity types accepted in step 2
pub const ENTITY_TYPES: &[&str] = &[
    "Private Limited Company",
    "Public Limited Company",
    "Limited Liability Partnership (LLP)",
    "Partnership Firm",
    "Sole Proprietorship",
    "NGO/Non-Profit",
    "Government Entity",
    "Other",
];

/// Company size brackets offered in step 1
pub const COMPANY_SIZES: &[&str] = &[
    "Startup (1-10 employees)",
    "Small Business (11-50 employees)",
    "Medium Business (51-200 employees)",
    "Large Enterprise (201-1000 employees)",
    "Corporation (1000+ employees)",
];

/// The six document fields a submission may carry, in upload order
pub const DOCUMENT_FIELDS: &[&str] = &[
    "identityProof",
    "companyIdentityProof",
    "incorporationCertificate",
    "memorandumOfAssociation",
    "articlesOfAssociation",
    "bankDocument",
];

/// KYC documents that must be present for step 2 to pass
pub const MANDATORY_KYC_FIELDS: &[&str] = &[
    "identityProof",
    "companyIdentityProof",
    "incorporationCertificate",
];

/// Bank supporting document required by step 3
pub const BANK_DOCUMENT_FIELD: &str = "bankDocument";

/// One file part received with the submission
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Ownership index record at `document_owner:{filename}`. Document access
/// is decided by looking this up, never by filename convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOwner {
    pub user_id: String,
    pub field: String,
    pub uploaded_at: String,
}

#[derive(Debug)]
pub enum RegistrationError {
    /// Required input missing or malformed; message names the fields
    Validation(String),
    /// Registration is approved and post-approval resubmission is disabled
    ResubmissionClosed,
    /// Caller does not own the requested document
    Forbidden,
    /// No such registration/document
    NotFound,
    /// Object-store write failed for one document field
    Upload { field: String, message: String },
    /// Object-store failure outside a single field upload
    Storage(String),
    Db(DbErr),
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationError::Validation(msg) => write!(f, "{}", msg),
            RegistrationError::ResubmissionClosed => {
                write!(f, "Registration already approved; resubmission is not allowed")
            }
            RegistrationError::Forbidden => write!(f, "Access denied"),
            RegistrationError::NotFound => write!(f, "Not found"),
            RegistrationError::Upload { field, message } => {
                write!(f, "Failed to upload {}: {}", field, message)
            }
            RegistrationError::Storage(msg) => write!(f, "Storage error: {}", msg),
            RegistrationError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for RegistrationError {}

impl From<DbErr> for RegistrationError {
    fn from(e: DbErr) -> Self {
        RegistrationError::Db(e)
    }
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Pure step validator mirroring the wizard's gating. No side effects.
pub fn step_is_valid(
    step: u32,
    form: &RegistrationForm,
    documents: &HashMap<String, DocumentUpload>,
) -> bool {
    match step {
        1 => {
            filled(&form.company_name)
                && filled(&form.company_contact)
                && filled(&form.address_line1)
                && filled(&form.city)
                && filled(&form.country)
                && filled(&form.full_name)
        }
        2 => {
            MANDATORY_KYC_FIELDS
                .iter()
                .all(|field| documents.contains_key(*field))
                && form
                    .entity_type
                    .as_deref()
                    .is_some_and(|t| ENTITY_TYPES.contains(&t))
        }
        3 => {
            filled(&form.account_name)
                && filled(&form.account_number)
                && filled(&form.bank_name)
                && filled(&form.ifsc_code)
                && documents.contains_key(BANK_DOCUMENT_FIELD)
        }
        _ => false,
    }
}

/// Authoritative server-side validation of the whole submission.
fn validate_submission(
    form: &RegistrationForm,
    documents: &HashMap<String, DocumentUpload>,
) -> Result<(), RegistrationError> {
    let mut missing: Vec<&str> = Vec::new();

    let step1: &[(&str, &Option<String>)] = &[
        ("companyName", &form.company_name),
        ("companyContact", &form.company_contact),
        ("addressLine1", &form.address_line1),
        ("city", &form.city),
        ("country", &form.country),
        ("fullName", &form.full_name),
    ];
    for (name, value) in step1 {
        if !filled(value) {
            missing.push(name);
        }
    }

    for field in MANDATORY_KYC_FIELDS {
        if !documents.contains_key(*field) {
            missing.push(field);
        }
    }

    let step3: &[(&str, &Option<String>)] = &[
        ("accountName", &form.account_name),
        ("accountNumber", &form.account_number),
        ("bankName", &form.bank_name),
        ("ifscCode", &form.ifsc_code),
    ];
    for (name, value) in step3 {
        if !filled(value) {
            missing.push(name);
        }
    }
    if !documents.contains_key(BANK_DOCUMENT_FIELD) {
        missing.push(BANK_DOCUMENT_FIELD);
    }

    if !missing.is_empty() {
        return Err(RegistrationError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    match form.entity_type.as_deref() {
        Some(t) if ENTITY_TYPES.contains(&t) => Ok(()),
        Some(t) => Err(RegistrationError::Validation(format!(
            "Unknown entity type: {}",
            t
        ))),
        None => Err(RegistrationError::Validation(
            "Missing required fields: entityType".to_string(),
        )),
    }
}

fn registration_key(user_id: &str) -> String {
    format!("company_registration:{}", user_id)
}

fn owner_key(file_name: &str) -> String {
    format!("document_owner:{}", file_name)
}

/// Outcome of a successful submission
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub registration_id: String,
    pub uploaded_documents: Vec<String>,
}

/// Validate, upload documents and persist the registration record.
///
/// Order matters: all object-store uploads complete before anything is
/// written to the KV store, and the record plus its ownership index entries
/// land in one transaction. An upload failure therefore leaves no partial
/// registration behind (orphaned objects are acceptable; records are not).
pub async fn submit(
    db: &DatabaseConnection,
    storage: &StorageService,
    config: &AppConfig,
    user: &AuthUser,
    form: RegistrationForm,
    documents: HashMap<String, DocumentUpload>,
) -> Result<SubmissionReceipt, RegistrationError> {
    validate_submission(&form, &documents)?;

    let key = registration_key(&user.id);

    // Resubmission is a full overwrite out of submitted/rejected. Out of
    // approved it is a deployment choice, closed by default.
    if let Some(existing) = kv::get(db, &key).await? {
        let status = existing
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("submitted");
        if status == "approved" && !config.allow_resubmit_after_approval {
            return Err(RegistrationError::ResubmissionClosed);
        }
    }

    let now = Utc::now();
    let now_iso = now.to_rfc3339();
    let millis = now.timestamp_millis();

    let mut uploaded: BTreeMap<String, UploadedDocument> = BTreeMap::new();
    for field in DOCUMENT_FIELDS {
        let Some(doc) = documents.get(*field) else {
            continue;
        };
        if doc.bytes.is_empty() {
            continue;
        }

        let extension = doc
            .original_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("bin");
        let file_name = format!("{}/{}_{}.{}", user.id, field, millis, extension);

        storage
            .upload(&file_name, doc.bytes.clone(), &doc.content_type)
            .await
            .map_err(|e| {
                error!(field, error = %e, "document upload failed");
                RegistrationError::Upload {
                    field: field.to_string(),
                    message: e.to_string(),
                }
            })?;

        let signed_url = storage
            .create_signed_url(&file_name, DOCUMENT_URL_TTL_SECS)
            .await
            .map_err(|e| {
                error!(field, error = %e, "signed url creation failed");
                RegistrationError::Upload {
                    field: field.to_string(),
                    message: format!("Failed to create access URL: {}", e),
                }
            })?;

        uploaded.insert(
            field.to_string(),
            UploadedDocument {
                file_name,
                original_name: doc.original_name.clone(),
                signed_url,
                uploaded_at: now_iso.clone(),
            },
        );
    }

    let record = CompanyRegistration {
        id: key.clone(),
        user_id: user.id.clone(),
        user_email: user.email.clone(),
        company_details: CompanyDetails {
            company_name: form.company_name,
            company_size: form.company_size,
            company_contact: form.company_contact,
            gstin: form.gstin,
            address: CompanyAddress {
                address_line1: form.address_line1,
                address_line2: form.address_line2,
                pincode: form.pincode,
                country: form.country,
                state: form.state,
                city: form.city,
            },
            contact_person: ContactPerson {
                full_name: form.full_name,
                designation: form.designation,
            },
        },
        kyc_details: KycDetails {
            entity_type: form.entity_type,
            documents: uploaded.clone(),
        },
        bank_details: BankDetails {
            account_name: form.account_name,
            account_number: form.account_number,
            bank_name: form.bank_name,
            branch_name: form.branch_name,
            swift_code: form.swift_code,
            ifsc_code: form.ifsc_code,
            bank_city: form.bank_city,
            bank_country: form.bank_country,
        },
        status: RegistrationStatus::Submitted,
        submitted_at: now_iso.clone(),
        last_updated: now_iso.clone(),
    };

    let record_value = serde_json::to_value(&record)
        .map_err(|e| RegistrationError::Storage(format!("serialize registration: {}", e)))?;

    // Record + ownership index land together or not at all
    let txn = db.begin().await?;
    kv::set(&txn, &key, record_value).await?;
    for (field, doc) in uploaded.iter() {
        let owner = DocumentOwner {
            user_id: user.id.clone(),
            field: field.clone(),
            uploaded_at: now_iso.clone(),
        };
        kv::set(
            &txn,
            &owner_key(&doc.file_name),
            serde_json::to_value(&owner)
                .map_err(|e| RegistrationError::Storage(format!("serialize owner: {}", e)))?,
        )
        .await?;
    }
    txn.commit().await?;

    info!(
        user_id = %user.id,
        documents = uploaded.len(),
        "company registration submitted"
    );

    Ok(SubmissionReceipt {
        registration_id: key,
        uploaded_documents: uploaded.keys().cloned().collect(),
    })
}

/// Stored registration for `user_id`, bank account redacted.
pub async fn check_existing(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<CompanyRegistration>, RegistrationError> {
    let Some(value) = kv::get(db, &registration_key(user_id)).await? else {
        return Ok(None);
    };
    let record: CompanyRegistration = serde_json::from_value(value)
        .map_err(|e| RegistrationError::Storage(format!("corrupt registration record: {}", e)))?;
    Ok(Some(record.redacted()))
}

/// Short-lived signed URL for one of the caller's own documents.
pub async fn document_url(
    db: &DatabaseConnection,
    storage: &StorageService,
    user_id: &str,
    file_name: &str,
) -> Result<String, RegistrationError> {
    let Some(value) = kv::get(db, &owner_key(file_name)).await? else {
        return Err(RegistrationError::NotFound);
    };
    let owner: DocumentOwner = serde_json::from_value(value)
        .map_err(|e| RegistrationError::Storage(format!("corrupt ownership record: {}", e)))?;

    if owner.user_id != user_id {
        return Err(RegistrationError::Forbidden);
    }

    storage
        .create_signed_url(file_name, DOCUMENT_VIEW_TTL_SECS)
        .await
        .map_err(|e| RegistrationError::Storage(e.to_string()))
}
