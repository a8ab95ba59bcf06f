//! Account service
//!
//! Creation, lookup, search, role update, and deletion of accounts,
//! orchestrated against the identity directory and downstream
//! subscription cleanup.

use chrono::Utc;
use gavel_api::Page;
use gavel_auth::model::{NON_THIRD_PARTY_ROLES, THIRD_PARTY_ROLES, is_third_party_role};
use gavel_common::BULK_DELETE_PAGE_SIZE;
use gavel_common::error::GavelError;
use gavel_common::traits::{
    DirectoryUser, IdentityDirectory, NotificationDispatcher, SubscriptionService,
};
use gavel_common::utils::is_valid_email;
use gavel_persistence::entity::accounts;
use gavel_persistence::sea_orm::*;
use gavel_persistence::{AuditAction, Provenance, Role};
use tracing::{info, warn};
use uuid::Uuid;

use crate::model::{AccountFilter, AccountRequest, CreationReport};
use crate::service::audit;

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<accounts::Model> {
    accounts::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| GavelError::AccountNotFound(id.to_string()).into())
}

pub async fn find_by_provenance(
    db: &DatabaseConnection,
    provenance: Provenance,
    provenance_user_id: &str,
) -> anyhow::Result<accounts::Model> {
    accounts::Entity::find()
        .filter(accounts::Column::Provenance.eq(provenance))
        .filter(accounts::Column::ProvenanceUserId.eq(provenance_user_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            GavelError::AccountNotFound(format!("{}/{}", provenance, provenance_user_id)).into()
        })
}

pub async fn search_page(
    db: &DatabaseConnection,
    filter: &AccountFilter,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<accounts::Model>> {
    let mut select = accounts::Entity::find();

    if let Some(prefix) = &filter.email_prefix
        && !prefix.is_empty()
    {
        select = select.filter(accounts::Column::Email.starts_with(prefix.as_str()));
    }

    // Third-party accounts are excluded unless roles are named explicitly
    if filter.roles.is_empty() {
        select = select.filter(accounts::Column::Role.is_in(NON_THIRD_PARTY_ROLES.iter().copied()));
    } else {
        select = select.filter(accounts::Column::Role.is_in(filter.roles.iter().copied()));
    }

    if !filter.provenances.is_empty() {
        select = select.filter(
            accounts::Column::Provenance.is_in(filter.provenances.iter().copied()),
        );
    }

    let paginator = select
        .order_by_asc(accounts::Column::Email)
        .paginate(db, page_size);
    let total_count = paginator.num_items().await?;

    if total_count == 0 {
        return Ok(Page::empty());
    }

    let page_items = paginator.fetch_page(page_no.saturating_sub(1)).await?;

    Ok(Page::new(total_count, page_no, page_size, page_items))
}

/// Management-information extract: every account, unfiltered
pub async fn mi_report(db: &DatabaseConnection) -> anyhow::Result<Vec<accounts::Model>> {
    Ok(accounts::Entity::find().all(db).await?)
}

fn validate_request(request: &AccountRequest) -> Result<(), String> {
    if !is_valid_email(&request.email) {
        return Err(format!("invalid email '{}'", request.email));
    }
    if request.role == Role::SystemAdmin {
        return Err(
            "system admin accounts must be created through the dedicated endpoint".to_string(),
        );
    }
    if is_third_party_role(request.role) != (request.provenance == Provenance::ThirdParty) {
        return Err(format!(
            "role {} is not valid for provenance {}",
            request.role, request.provenance
        ));
    }
    if request.provenance != Provenance::Aad && request.provenance_user_id.is_empty() {
        return Err("provenance user id is required".to_string());
    }
    Ok(())
}

/// Create a batch of accounts
///
/// Validation failures accumulate per record; the batch never aborts on
/// one bad candidate. A third-party candidate requires a system-admin
/// issuer and fails the whole batch up front.
pub async fn create_accounts(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    notifier: &dyn NotificationDispatcher,
    issuer_id: &str,
    requests: Vec<AccountRequest>,
) -> anyhow::Result<CreationReport> {
    let issuer = accounts::Entity::find_by_id(issuer_id).one(db).await?;
    let issuer_role = issuer.as_ref().map(|a| a.role);

    if !gavel_auth::can_create_accounts(issuer_role, requests.iter().map(|r| r.role)) {
        return Err(GavelError::Forbidden(
            "third party accounts can only be created by a system admin".to_string(),
        )
        .into());
    }

    let mut report = CreationReport::default();

    for request in requests {
        if let Err(message) = validate_request(&request) {
            report.record_error(&request.email, message);
            continue;
        }

        if accounts::Entity::find()
            .filter(accounts::Column::Email.eq(request.email.as_str()))
            .one(db)
            .await?
            .is_some()
        {
            report.record_error(
                &request.email,
                GavelError::DuplicateAccount(request.email.clone()).to_string(),
            );
            continue;
        }

        let provenance_user_id = if request.provenance == Provenance::Aad {
            // Directory-backed accounts get their external id from the
            // directory; a pre-existing entry is a duplicate
            match directory.get_user(&request.email).await {
                Ok(Some(_)) => {
                    report.record_error(
                        &request.email,
                        GavelError::DuplicateAccount(request.email.clone()).to_string(),
                    );
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    report.record_error(&request.email, e.to_string());
                    continue;
                }
            }

            let directory_user = DirectoryUser {
                email: request.email.clone(),
                first_name: request.first_name.clone().unwrap_or_default(),
                surname: request.surname.clone().unwrap_or_default(),
                role: request.role.as_str().to_string(),
            };
            match directory.create_user(&directory_user).await {
                Ok(external_id) => external_id,
                Err(e) => {
                    report.record_error(&request.email, e.to_string());
                    continue;
                }
            }
        } else {
            request.provenance_user_id.clone()
        };

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let entity = accounts::ActiveModel {
            id: Set(id.clone()),
            email: Set(request.email.clone()),
            first_name: Set(request.first_name.clone()),
            surname: Set(request.surname.clone()),
            role: Set(request.role),
            provenance: Set(request.provenance),
            provenance_user_id: Set(provenance_user_id),
            created_at: Set(now),
            last_verified_at: Set((request.role == Role::Verified).then_some(now)),
            last_signed_in_at: Set((request.role != Role::Verified).then_some(now)),
        };

        accounts::Entity::insert(entity).exec_without_returning(db).await?;

        let full_name = gavel_common::utils::full_name(
            request.first_name.as_deref().unwrap_or_default(),
            request.surname.as_deref().unwrap_or_default(),
        );
        if let Err(e) = notifier.send_welcome(&request.email, &full_name).await {
            warn!("welcome email to '{}' failed: {}", request.email, e);
        }

        if let Some(issuer) = &issuer {
            audit::record(
                db,
                issuer,
                AuditAction::AccountCreated,
                &format!("created {} account '{}'", request.role, id),
            )
            .await?;
        }

        info!("created account '{}' with role {}", id, request.role);
        report.record_created(id);
    }

    Ok(report)
}

/// Create a system admin through the dedicated path
///
/// Enforces the configured ceiling on system-admin accounts; duplicate
/// emails abort with an explicit error.
pub async fn create_system_admin(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    issuer_id: &str,
    request: AccountRequest,
    max_system_admins: u64,
) -> anyhow::Result<accounts::Model> {
    if !is_valid_email(&request.email) {
        return Err(GavelError::Validation(format!("invalid email '{}'", request.email)).into());
    }

    let existing = accounts::Entity::find()
        .filter(accounts::Column::Role.eq(Role::SystemAdmin))
        .count(db)
        .await?;
    if existing >= max_system_admins {
        return Err(GavelError::Validation(format!(
            "maximum number of system admin accounts ({}) reached",
            max_system_admins
        ))
        .into());
    }

    if accounts::Entity::find()
        .filter(accounts::Column::Email.eq(request.email.as_str()))
        .one(db)
        .await?
        .is_some()
    {
        return Err(GavelError::DuplicateAccount(request.email).into());
    }

    // Creation failure in the directory aborts the whole operation
    let directory_user = DirectoryUser {
        email: request.email.clone(),
        first_name: request.first_name.clone().unwrap_or_default(),
        surname: request.surname.clone().unwrap_or_default(),
        role: Role::SystemAdmin.as_str().to_string(),
    };
    let external_id = directory.create_user(&directory_user).await?;

    let now = Utc::now();
    let model = accounts::Model {
        id: Uuid::new_v4().to_string(),
        email: request.email,
        first_name: request.first_name,
        surname: request.surname,
        role: Role::SystemAdmin,
        provenance: Provenance::Aad,
        provenance_user_id: external_id,
        created_at: now,
        last_verified_at: None,
        last_signed_in_at: Some(now),
    };
    accounts::Entity::insert(accounts::ActiveModel::from(model.clone()))
        .exec_without_returning(db)
        .await?;

    if let Some(issuer) = accounts::Entity::find_by_id(issuer_id).one(db).await? {
        audit::record(
            db,
            &issuer,
            AuditAction::SystemAdminCreated,
            &format!("created system admin account '{}'", model.id),
        )
        .await?;
    }

    info!("created system admin account '{}'", model.id);
    Ok(model)
}

/// Delete an account and its external footprint
///
/// The local row is the source of truth: directory and subscription
/// cleanup are best-effort and never abort the local deletion.
pub async fn delete_account(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    subscriptions: &dyn SubscriptionService,
    id: &str,
) -> anyhow::Result<String> {
    let account = find_by_id(db, id).await?;

    if account.provenance.is_directory_backed() {
        if let Err(e) = directory.delete_user(&account.provenance_user_id).await {
            warn!(
                "directory deletion for account '{}' failed, continuing: {}",
                id, e
            );
        }
    }

    match subscriptions.delete_all_for_user(id).await {
        Ok(message) => info!("subscription cleanup for '{}': {}", id, message),
        Err(e) => warn!("subscription cleanup for '{}' failed: {}", id, e),
    }

    accounts::Entity::delete_by_id(id).exec(db).await?;

    Ok(format!("Account with ID {} has been deleted", id))
}

/// Delete every non-third-party account whose email starts with a prefix
///
/// Used for test-data cleanup. Pages through matches at a fixed size,
/// stopping on the first short page, then deletes the collected ids.
pub async fn delete_accounts_with_prefix(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    subscriptions: &dyn SubscriptionService,
    prefix: &str,
) -> anyhow::Result<String> {
    let mut ids = Vec::new();
    let mut page_no = 0u64;

    loop {
        let page: Vec<String> = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Id)
            .filter(accounts::Column::Email.starts_with(prefix))
            .filter(accounts::Column::Role.is_not_in(THIRD_PARTY_ROLES.iter().copied()))
            .order_by_asc(accounts::Column::Id)
            .offset(page_no * BULK_DELETE_PAGE_SIZE)
            .limit(BULK_DELETE_PAGE_SIZE)
            .into_tuple::<String>()
            .all(db)
            .await?;

        let fetched = page.len() as u64;
        ids.extend(page);

        // A short page (possibly empty) is the termination signal
        if fetched < BULK_DELETE_PAGE_SIZE {
            break;
        }
        page_no += 1;
    }

    let count = ids.len();
    for id in ids {
        if let Err(e) = delete_account(db, directory, subscriptions, &id).await {
            warn!("bulk deletion of account '{}' failed: {}", id, e);
        }
    }

    Ok(format!(
        "{} account(s) deleted with email starting with {}",
        count, prefix
    ))
}

/// Update the target account's role
///
/// Self-update is forbidden; the hierarchy rules decide the rest. A
/// directory-backed target gets the change pushed to the directory on a
/// best-effort basis before the local row is updated.
pub async fn update_role(
    db: &DatabaseConnection,
    directory: &dyn IdentityDirectory,
    issuer_id: &str,
    target_id: &str,
    new_role: Role,
) -> anyhow::Result<String> {
    let authorised =
        crate::service::authorisation::can_update_account(db, issuer_id, target_id).await?;
    if !authorised {
        return Err(GavelError::Forbidden(format!(
            "issuer '{}' may not update account '{}'",
            issuer_id, target_id
        ))
        .into());
    }

    let target = find_by_id(db, target_id).await?;

    if target.provenance.is_directory_backed() {
        if let Err(e) = directory
            .update_user_role(&target.provenance_user_id, new_role.as_str())
            .await
        {
            warn!(
                "directory role update for account '{}' failed, continuing: {}",
                target_id, e
            );
        }
    }

    let mut active: accounts::ActiveModel = target.into();
    active.role = Set(new_role);
    active.update(db).await?;

    if let Some(issuer) = accounts::Entity::find_by_id(issuer_id).one(db).await? {
        audit::record(
            db,
            &issuer,
            AuditAction::RoleUpdated,
            &format!("updated account '{}' to role {}", target_id, new_role),
        )
        .await?;
    }

    Ok(format!(
        "User with ID {} has been updated to a {}",
        target_id, new_role
    ))
}

/// Record a media re-verification, resetting the inactivity clock
pub async fn record_verification(
    db: &DatabaseConnection,
    provenance: Provenance,
    provenance_user_id: &str,
) -> anyhow::Result<accounts::Model> {
    let account = find_by_provenance(db, provenance, provenance_user_id).await?;
    let mut active: accounts::ActiveModel = account.into();
    active.last_verified_at = Set(Some(Utc::now()));
    Ok(active.update(db).await?)
}

/// Record an admin sign-in, resetting the inactivity clock
pub async fn record_sign_in(
    db: &DatabaseConnection,
    provenance: Provenance,
    provenance_user_id: &str,
) -> anyhow::Result<accounts::Model> {
    let account = find_by_provenance(db, provenance, provenance_user_id).await?;
    let mut active: accounts::ActiveModel = account.into();
    active.last_signed_in_at = Set(Some(Utc::now()));
    Ok(active.update(db).await?)
}

#[cfg(test)]
mod tests {
    use gavel_persistence::sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;
    use crate::service::lifecycle::test_support::{
        FailingDirectory, FakeDirectory, FakeNotifier, FakeSubscriptions,
    };

    fn admin(id: &str, role: Role) -> accounts::Model {
        accounts::Model {
            id: id.to_string(),
            email: format!("{id}@justice.gov.uk"),
            first_name: Some("Admin".to_string()),
            surname: Some("User".to_string()),
            role,
            provenance: Provenance::Aad,
            provenance_user_id: format!("ext-{id}"),
            created_at: Utc::now(),
            last_verified_at: None,
            last_signed_in_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_validate_request_rejects_bad_email() {
        let request = AccountRequest {
            email: "not-an-email".to_string(),
            first_name: None,
            surname: None,
            role: Role::Verified,
            provenance: Provenance::Aad,
            provenance_user_id: String::new(),
        };
        assert!(validate_request(&request).unwrap_err().contains("invalid email"));
    }

    #[test]
    fn test_validate_request_rejects_system_admin() {
        let request = AccountRequest {
            email: "admin@justice.gov.uk".to_string(),
            first_name: None,
            surname: None,
            role: Role::SystemAdmin,
            provenance: Provenance::Aad,
            provenance_user_id: String::new(),
        };
        assert!(
            validate_request(&request)
                .unwrap_err()
                .contains("dedicated endpoint")
        );
    }

    #[test]
    fn test_validate_request_role_provenance_mismatch() {
        let request = AccountRequest {
            email: "feed@example.com".to_string(),
            first_name: None,
            surname: None,
            role: Role::GeneralThirdParty,
            provenance: Provenance::Aad,
            provenance_user_id: "x".to_string(),
        };
        assert!(validate_request(&request).is_err());

        let request = AccountRequest {
            email: "feed@example.com".to_string(),
            first_name: None,
            surname: None,
            role: Role::GeneralThirdParty,
            provenance: Provenance::ThirdParty,
            provenance_user_id: "feed-1".to_string(),
        };
        assert!(validate_request(&request).is_ok());
    }

    #[tokio::test]
    async fn test_create_batch_partial_success() {
        let issuer = admin("boss", Role::SuperAdminCtsc);
        // Query order: issuer lookup, then a duplicate check per valid
        // candidate (the invalid one fails before any query)
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![issuer.clone()],
                Vec::<accounts::Model>::new(),
                Vec::<accounts::Model>::new(),
            ])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 2,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let directory = FakeDirectory::default();
        let notifier = FakeNotifier::default();

        let requests = vec![
            AccountRequest {
                email: "one@media.example".to_string(),
                first_name: Some("One".to_string()),
                surname: Some("Reporter".to_string()),
                role: Role::Verified,
                provenance: Provenance::Aad,
                provenance_user_id: String::new(),
            },
            AccountRequest {
                email: "broken".to_string(),
                first_name: None,
                surname: None,
                role: Role::Verified,
                provenance: Provenance::Aad,
                provenance_user_id: String::new(),
            },
            AccountRequest {
                email: "two@media.example".to_string(),
                first_name: Some("Two".to_string()),
                surname: Some("Reporter".to_string()),
                role: Role::Verified,
                provenance: Provenance::Aad,
                provenance_user_id: String::new(),
            },
        ];

        let report = create_accounts(&db, &directory, &notifier, "boss", requests)
            .await
            .unwrap();

        assert_eq!(report.created.len(), 2);
        assert_eq!(report.errored.len(), 1);
        assert_eq!(report.errored[0].email, "broken");
        assert_eq!(notifier.welcomes(), 2);
    }

    #[tokio::test]
    async fn test_created_account_retrievable_by_provenance() {
        let issuer = admin("boss", Role::SystemAdmin);
        let request = AccountRequest {
            email: "court.reporter@media.example".to_string(),
            first_name: Some("Court".to_string()),
            surname: Some("Reporter".to_string()),
            role: Role::Verified,
            provenance: Provenance::CftIdam,
            provenance_user_id: "cft-77".to_string(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![issuer], Vec::<accounts::Model>::new()])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 1,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let report = create_accounts(
            &db,
            &FakeDirectory::default(),
            &FakeNotifier::default(),
            "boss",
            vec![request.clone()],
        )
        .await
        .unwrap();
        assert_eq!(report.created.len(), 1);

        // The row the insert wrote, looked up the way a sign-in would
        let now = Utc::now();
        let stored = accounts::Model {
            id: report.created[0].clone(),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            surname: request.surname.clone(),
            role: request.role,
            provenance: request.provenance,
            provenance_user_id: request.provenance_user_id.clone(),
            created_at: now,
            last_verified_at: Some(now),
            last_signed_in_at: None,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored]])
            .into_connection();

        let found = find_by_provenance(&db, Provenance::CftIdam, "cft-77")
            .await
            .unwrap();
        assert_eq!(found.id, report.created[0]);
        assert_eq!(found.email, request.email);
        assert_eq!(found.role, request.role);
        assert_eq!(found.provenance, request.provenance);
    }

    #[tokio::test]
    async fn test_find_by_provenance_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();

        let err = find_by_provenance(&db, Provenance::CftIdam, "nobody")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GavelError>(),
            Some(GavelError::AccountNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_third_party_batch_requires_system_admin() {
        let issuer = admin("boss", Role::SuperAdminCtsc);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![issuer]])
            .into_connection();

        let directory = FakeDirectory::default();
        let notifier = FakeNotifier::default();

        let requests = vec![AccountRequest {
            email: "feed@example.com".to_string(),
            first_name: None,
            surname: None,
            role: Role::GeneralThirdParty,
            provenance: Provenance::ThirdParty,
            provenance_user_id: "feed-1".to_string(),
        }];

        let err = create_accounts(&db, &directory, &notifier, "boss", requests)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GavelError>(),
            Some(GavelError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_account_survives_directory_failure() {
        let target = admin("victim", Role::AdminLocal);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![target]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let directory = FailingDirectory;
        let subscriptions = FakeSubscriptions::default();

        let message = delete_account(&db, &directory, &subscriptions, "victim")
            .await
            .unwrap();

        assert!(message.contains("victim"));
        assert_eq!(subscriptions.cleanups(), vec!["victim".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_missing_account_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();

        let err = delete_account(&db, &FailingDirectory, &FakeSubscriptions::default(), "ghost")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GavelError>(),
            Some(GavelError::AccountNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_role_forbids_self() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = update_role(&db, &FakeDirectory::default(), "me", "me", Role::AdminCtsc)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GavelError>(),
            Some(GavelError::Forbidden(_))
        ));
    }
}
